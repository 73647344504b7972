//! Mathematical utilities for Kestrel
//!
//! Implements Euler-angle attitude kinematics and fixed-step
//! numerical integration.

pub mod attitude;
pub mod integrator;

pub use attitude::*;
pub use integrator::*;
