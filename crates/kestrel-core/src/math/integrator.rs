//! Fixed-step numerical integration
//!
//! Classical 4th-order Runge-Kutta for the rigid-body equations of
//! motion. The step size is fixed; accuracy control is the caller's
//! responsibility through the choice of step.

use nalgebra::SVector;

/// Generic RK4 integrator for any state vector
///
/// Solves dx/dt = f(t, x) over a single step of length `dt`.
///
/// # Arguments
/// * `x` - Current state
/// * `t` - Current time
/// * `dt` - Time step
/// * `f` - Derivative function f(t, x) -> dx/dt
///
/// # Returns
/// New state after integration
pub fn rk4<const N: usize, F>(
    x: &SVector<f64, N>,
    t: f64,
    dt: f64,
    f: F,
) -> SVector<f64, N>
where
    F: Fn(f64, &SVector<f64, N>) -> SVector<f64, N>,
{
    let k1 = f(t, x);
    let k2 = f(t + dt / 2.0, &(x + k1 * dt / 2.0));
    let k3 = f(t + dt / 2.0, &(x + k2 * dt / 2.0));
    let k4 = f(t + dt, &(x + k3 * dt));

    x + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
