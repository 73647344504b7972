//! Dynamics models for Kestrel
//!
//! Implements the quadrotor rigid-body model: state and parameter
//! types, the rotor mixer, and the fixed-step integrator that owns the
//! live vehicle state.

pub mod quadrotor;

pub use quadrotor::*;
