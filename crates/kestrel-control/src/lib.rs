//! # Kestrel Control
//!
//! Linear flight model derivation for model-based control.
//!
//! Given a reference flight condition, this crate linearizes the
//! nonlinear dynamics of `kestrel-core` into a continuous-time
//! Jacobian pair (A, B), discretizes it for a fixed control period into
//! (Ad, Bd), and exposes the equilibrium-seeking control law
//!
//! ```text
//! u = u_eq − K · (x − x_ref)
//! ```
//!
//! The feedback gain K is supplied externally (e.g. from an LQR or MPC
//! design over the discrete pair); gain synthesis itself is out of
//! scope here. Without a gain, the law degenerates to the hover
//! feed-forward command.
//!
//! ## Modules
//!
//! - [`linearize`]: pure Jacobian and discretization functions
//! - [`controller`]: stateful [`LinearController`] caching the last
//!   computed model about its reference state
//! - [`config`]: serde-backed controller configuration

pub mod config;
pub mod controller;
pub mod linearize;

pub use config::{ControlConfig, ControlError};
pub use controller::{FeedbackGain, LinearController};
pub use linearize::{continuous_jacobians, discretize, InputMatrix, StateMatrix};
