//! # Kestrel Core
//!
//! Quadrotor flight dynamics library.
//!
//! This crate implements the nonlinear six-degree-of-freedom rigid-body
//! model of a quadrotor: the rotor mixer, the state derivative function,
//! and a fixed-step Runge-Kutta integrator that advances the vehicle
//! state one motor-command frame at a time. The companion crate
//! `kestrel-control` derives a discrete linear model from this one for
//! model-based control.
//!
//! ## Modules
//!
//! - [`math`]: attitude kinematics and fixed-step integration
//! - [`dynamics`]: the quadrotor model (state, parameters, mixer, stepper)
//! - [`config`]: serde-backed vehicle and simulation configuration

pub mod config;
pub mod dynamics;
pub mod math;

// Common type aliases
use nalgebra::{Matrix3, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// Gravity constant [m/s²]
pub const GRAVITY: f64 = 9.81;
