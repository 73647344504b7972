//! Jacobian linearization and discretization
//!
//! Continuous-time linear model of the quadrotor dynamics about a
//! reference state x̄, with the input held at the hover equilibrium:
//!
//! δẋ = A·δx + B·δu
//!
//! A is block sparse in the [p, v, Θ, ω] layout:
//!
//! ```text
//!       p        v            Θ           ω
//! p  [  0   diag(1,1,-1)·R    0           0  ]
//! v  [  0    -(μ/m)·I      ∂g_b/∂Θ        0  ]
//! Θ  [  0        0            0           I  ]
//! ω  [  0        0            0           0  ]
//! ```
//!
//! The Θ-row identity is the small-rate linearization of the Euler-rate
//! transform; the thrust and torque columns of B follow from how the
//! mixer output enters the translational and rotational dynamics.
//!
//! Discretization for a control period dt uses the matrix exponential
//! truncated after the cubic term:
//!
//! Ad = I + A·dt + (A·dt)²/2 + (A·dt)³/6
//! Bd = (I·dt + A·dt²/2 + A²·dt³/6) · B
//!
//! With ‖A·dt‖ well below one at the nominal period this is accurate to
//! better than 1e-8; the cubic term is not optional, it contributes at
//! the 1e-4 level in the velocity rows of Bd.

use nalgebra::SMatrix;

use kestrel_core::dynamics::{
    QuadrotorParams, QuadrotorState, ATT, INPUT_DIM, POS, RATE, STATE_DIM, VEL,
};
use kestrel_core::math::{gravity_body_jacobian, rotation_body_to_world};
use kestrel_core::Mat3;

/// 12x12 state Jacobian
pub type StateMatrix = SMatrix<f64, STATE_DIM, STATE_DIM>;
/// 12x4 input Jacobian
pub type InputMatrix = SMatrix<f64, STATE_DIM, INPUT_DIM>;

/// Continuous-time Jacobian pair (A, B) about the reference state
///
/// Evaluated with the input held at the hover equilibrium, so the
/// velocity and angular-rate cross terms of the reference vanish.
pub fn continuous_jacobians(
    params: &QuadrotorParams,
    reference: &QuadrotorState,
) -> (StateMatrix, InputMatrix) {
    let rotation = rotation_body_to_world(&reference.attitude);

    let mut a = StateMatrix::zeros();

    // Position kinematics: ṗ = R·v with the world vertical negated
    let mut position_block = rotation;
    position_block.row_mut(2).neg_mut();
    a.fixed_view_mut::<3, 3>(POS, VEL).copy_from(&position_block);

    // Isotropic linear drag
    let drag = -params.drag_coeff / params.mass;
    a.fixed_view_mut::<3, 3>(VEL, VEL)
        .copy_from(&(drag * Mat3::identity()));

    // Gravity tilts with the attitude
    a.fixed_view_mut::<3, 3>(VEL, ATT)
        .copy_from(&gravity_body_jacobian(&reference.attitude, params.gravity));

    // Small-rate Euler kinematics: Θ̇ ≈ ω
    a.fixed_view_mut::<3, 3>(ATT, RATE).copy_from(&Mat3::identity());

    let mut b = InputMatrix::zeros();

    // Thrust enters the body z velocity through the mixer thrust row
    for j in 0..INPUT_DIM {
        b[(VEL + 2, j)] = -params.mixer[(0, j)] / params.mass;
    }

    // Torque rows of the mixer through the inertia inverse
    let torque_rows = params.inertia_inv * params.mixer.fixed_view::<3, 4>(1, 0);
    b.fixed_view_mut::<3, 4>(RATE, 0).copy_from(&torque_rows);

    (a, b)
}

/// Discretize (A, B) for a fixed control period
pub fn discretize(a: &StateMatrix, b: &InputMatrix, dt: f64) -> (StateMatrix, InputMatrix) {
    let a2 = a * a;
    let a3 = a2 * a;

    let ad = StateMatrix::identity()
        + a * dt
        + a2 * (dt * dt / 2.0)
        + a3 * (dt * dt * dt / 6.0);

    let bd = (StateMatrix::identity() * dt
        + a * (dt * dt / 2.0)
        + a2 * (dt * dt * dt / 6.0))
        * b;

    (ad, bd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    #[test]
    fn test_jacobian_block_sparsity() {
        let params = QuadrotorParams::default();
        let reference = QuadrotorState::with_attitude(0.3, -0.2, 0.9);
        let (a, _) = continuous_jacobians(&params, &reference);

        // Position and rate rows depend on nothing but velocity and
        // input respectively
        assert_abs_diff_eq!(
            a.fixed_view::<3, 3>(POS, POS).into_owned().norm(),
            0.0,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            a.fixed_view::<3, 3>(POS, ATT).into_owned().norm(),
            0.0,
            epsilon = 1e-15
        );
        assert_abs_diff_eq!(
            a.fixed_view::<3, 12>(RATE, 0).into_owned().norm(),
            0.0,
            epsilon = 1e-15
        );
        // Gravity does not depend on yaw
        assert_abs_diff_eq!(
            a.fixed_view::<3, 1>(VEL, ATT + 2).into_owned().norm(),
            0.0,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_jacobian_at_level_attitude() {
        let params = QuadrotorParams::default();
        let (a, b) = continuous_jacobians(&params, &QuadrotorState::default());

        // ṗ = v with the vertical negated
        assert_relative_eq!(a[(POS, VEL)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(a[(POS + 2, VEL + 2)], -1.0, epsilon = 1e-12);

        // Level-attitude gravity gradient: pitch tips gravity onto x,
        // roll onto y
        assert_relative_eq!(a[(VEL, ATT + 1)], -params.gravity, epsilon = 1e-12);
        assert_relative_eq!(a[(VEL + 1, ATT)], params.gravity, epsilon = 1e-12);

        // Each rotor accelerates the body straight down axis equally
        let thrust_row = -params.thrust_coeff / params.mass;
        for j in 0..INPUT_DIM {
            assert_relative_eq!(b[(VEL + 2, j)], thrust_row, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_input_jacobian_torque_rows() {
        let params = QuadrotorParams::default();
        let (_, b) = continuous_jacobians(&params, &QuadrotorState::default());

        let roll_gain = params.arm_length * params.thrust_coeff / params.inertia[(0, 0)];
        let yaw_gain = params.torque_coeff / params.inertia[(2, 2)];

        assert_relative_eq!(b[(RATE, 3)], roll_gain, epsilon = 1e-9);
        assert_relative_eq!(b[(RATE, 1)], -roll_gain, epsilon = 1e-9);
        assert_relative_eq!(b[(RATE + 2, 0)], -yaw_gain, epsilon = 1e-9);
        assert_relative_eq!(b[(RATE + 2, 1)], yaw_gain, epsilon = 1e-9);
    }

    #[test]
    fn test_discretize_zero_dynamics() {
        let a = StateMatrix::zeros();
        let mut b = InputMatrix::zeros();
        b[(VEL + 2, 0)] = -2.0;

        let (ad, bd) = discretize(&a, &b, 0.01);
        assert_relative_eq!(ad, StateMatrix::identity(), epsilon = 1e-15);
        assert_relative_eq!(bd, b * 0.01, epsilon = 1e-15);
    }

    #[test]
    fn test_discretize_matches_scalar_exponential() {
        // Pure drag decay: each velocity state follows e^(-λ·dt)
        let params = QuadrotorParams::default();
        let (a, b) = continuous_jacobians(&params, &QuadrotorState::default());
        let dt = 0.01;

        let (ad, _) = discretize(&a, &b, dt);
        let lambda = params.drag_coeff / params.mass;
        assert_relative_eq!(ad[(VEL, VEL)], (-lambda * dt).exp(), epsilon = 1e-12);
    }

    #[test]
    fn test_discretize_double_integrator_chain() {
        // Attitude integrates rate: the Θ/ω block of Ad is exactly dt
        // (the chain terminates, higher series terms vanish)
        let params = QuadrotorParams::default();
        let reference = QuadrotorState::with_attitude(0.5, 0.2, -0.4);
        let (a, b) = continuous_jacobians(&params, &reference);

        let dt = 0.01;
        let (ad, _) = discretize(&a, &b, dt);
        for i in 0..3 {
            assert_relative_eq!(ad[(ATT + i, RATE + i)], dt, epsilon = 1e-15);
        }
    }
}
