//! Equilibrium-tracking linear controller
//!
//! [`LinearController`] maintains a linear model of the vehicle about a
//! reference flight condition and maps state errors to motor commands:
//!
//! ```text
//! u = u_eq − K · (x − x_ref)
//! ```
//!
//! The model is refreshed in three stages, each overwriting the cached
//! result of the previous computation:
//!
//! 1. [`update_rotation`](LinearController::update_rotation): the
//!    body-to-world rotation at the reference attitude
//! 2. [`update_jacobians`](LinearController::update_jacobians): the
//!    continuous pair (A, B)
//! 3. [`discretize`](LinearController::discretize): the discrete pair
//!    (Ad, Bd) for the control period, from the most recent (A, B)
//!
//! [`linearize`](LinearController::linearize) runs all three in order.
//! Accessors return the last computed value and are zero-initialized
//! (identity for the rotation) before the first update; ordering is the
//! caller's obligation and is not re-validated.
//!
//! The feedback gain K comes from an external design (LQR/MPC over the
//! discrete pair); until one is installed the control law reduces to
//! the hover feed-forward.

use nalgebra::SMatrix;

use kestrel_core::dynamics::{
    MotorCommands, QuadrotorParams, QuadrotorState, INPUT_DIM, STATE_DIM,
};
use kestrel_core::math::rotation_body_to_world;
use kestrel_core::Mat3;

use crate::linearize::{continuous_jacobians, discretize, InputMatrix, StateMatrix};

/// 4x12 state-feedback gain
pub type FeedbackGain = SMatrix<f64, INPUT_DIM, STATE_DIM>;

/// Linear model of the vehicle about a reference state, with the
/// equilibrium control law
#[derive(Debug, Clone)]
pub struct LinearController {
    params: QuadrotorParams,
    control_dt: f64,
    reference: QuadrotorState,
    gain: Option<FeedbackGain>,
    rotation: Mat3,
    a: StateMatrix,
    b: InputMatrix,
    ad: StateMatrix,
    bd: InputMatrix,
}

impl LinearController {
    /// Default control period [s]
    pub const DEFAULT_PERIOD: f64 = 0.01;

    pub fn new(params: QuadrotorParams, control_dt: f64) -> Self {
        Self {
            params,
            control_dt,
            reference: QuadrotorState::default(),
            gain: None,
            rotation: Mat3::identity(),
            a: StateMatrix::zeros(),
            b: InputMatrix::zeros(),
            ad: StateMatrix::zeros(),
            bd: InputMatrix::zeros(),
        }
    }

    /// Set the reference state to linearize about
    pub fn set_reference(&mut self, reference: QuadrotorState) {
        self.reference = reference;
    }

    /// Set only the reference attitude, keeping the rest of the
    /// reference at rest
    pub fn set_attitude(&mut self, roll: f64, pitch: f64, yaw: f64) {
        self.reference = QuadrotorState::with_attitude(roll, pitch, yaw);
    }

    /// Install an externally designed state-feedback gain
    pub fn set_feedback_gain(&mut self, gain: FeedbackGain) {
        self.gain = Some(gain);
    }

    /// Remove the feedback gain, reverting to pure feed-forward
    pub fn clear_feedback_gain(&mut self) {
        self.gain = None;
    }

    /// Recompute the body-to-world rotation at the reference attitude
    pub fn update_rotation(&mut self) {
        self.rotation = rotation_body_to_world(&self.reference.attitude);
    }

    /// Recompute the continuous Jacobian pair (A, B) at the reference
    pub fn update_jacobians(&mut self) {
        let (a, b) = continuous_jacobians(&self.params, &self.reference);
        self.a = a;
        self.b = b;
    }

    /// Discretize the most recent (A, B) for the control period
    pub fn discretize(&mut self) {
        let (ad, bd) = discretize(&self.a, &self.b, self.control_dt);
        self.ad = ad;
        self.bd = bd;
    }

    /// Refresh the whole model: rotation, Jacobians, discrete pair
    pub fn linearize(&mut self) {
        self.update_rotation();
        self.update_jacobians();
        self.discretize();
    }

    /// Hover feed-forward: every rotor at the command balancing weight
    pub fn equilibrium_command(&self) -> MotorCommands {
        MotorCommands::repeat(self.params.hover_command())
    }

    /// Motor commands for the current state:
    /// u = u_eq − K·(x − x_ref), or the bare equilibrium command when
    /// no gain is installed
    pub fn calculate_control(&self, state: &QuadrotorState) -> MotorCommands {
        let mut u = self.equilibrium_command();
        if let Some(gain) = &self.gain {
            let error = state.to_vector() - self.reference.to_vector();
            u -= gain * error;
        }
        u
    }

    /// Reference state the model is linearized about
    pub fn reference(&self) -> QuadrotorState {
        self.reference.clone()
    }

    /// Control period [s]
    pub fn control_dt(&self) -> f64 {
        self.control_dt
    }

    /// Last computed body-to-world rotation
    pub fn rotation(&self) -> Mat3 {
        self.rotation
    }

    /// Last computed continuous state Jacobian
    pub fn a(&self) -> StateMatrix {
        self.a
    }

    /// Last computed continuous input Jacobian
    pub fn b(&self) -> InputMatrix {
        self.b
    }

    /// Last computed discrete state matrix
    pub fn ad(&self) -> StateMatrix {
        self.ad
    }

    /// Last computed discrete input matrix
    pub fn bd(&self) -> InputMatrix {
        self.bd
    }
}

impl Default for LinearController {
    fn default() -> Self {
        Self::new(QuadrotorParams::default(), Self::DEFAULT_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::Vector3;

    #[test]
    fn test_accessors_before_any_update() {
        let controller = LinearController::default();
        assert_relative_eq!(controller.rotation(), Mat3::identity(), epsilon = 1e-15);
        assert_abs_diff_eq!(controller.a().norm(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(controller.ad().norm(), 0.0, epsilon = 1e-15);
        assert_abs_diff_eq!(controller.bd().norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_equilibrium_command() {
        let controller = LinearController::default();
        let u = controller.equilibrium_command();
        for i in 0..4 {
            assert_relative_eq!(u[i], 0.55, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_control_without_gain_is_feed_forward() {
        let controller = LinearController::default();
        let mut state = QuadrotorState::default();
        state.position = Vector3::new(10.0, -3.0, 2.0);

        let u = controller.calculate_control(&state);
        assert_relative_eq!(u, controller.equilibrium_command(), epsilon = 1e-12);
    }

    #[test]
    fn test_control_feeds_back_state_error() {
        let mut controller = LinearController::default();

        // Unit gain from altitude error to every rotor
        let mut gain = FeedbackGain::zeros();
        for i in 0..4 {
            gain[(i, 2)] = 0.1;
        }
        controller.set_feedback_gain(gain);

        let mut state = QuadrotorState::default();
        state.position.z = 2.0;

        let u = controller.calculate_control(&state);
        for i in 0..4 {
            assert_relative_eq!(u[i], 0.55 - 0.2, epsilon = 1e-9);
        }

        controller.clear_feedback_gain();
        let u = controller.calculate_control(&state);
        assert_relative_eq!(u, controller.equilibrium_command(), epsilon = 1e-12);
    }

    #[test]
    fn test_linearize_matches_granular_sequence() {
        let mut composed = LinearController::default();
        composed.set_attitude(0.3, -0.1, 0.7);
        composed.linearize();

        let mut granular = LinearController::default();
        granular.set_attitude(0.3, -0.1, 0.7);
        granular.update_rotation();
        granular.update_jacobians();
        granular.discretize();

        assert_relative_eq!(composed.rotation(), granular.rotation(), epsilon = 1e-15);
        assert_relative_eq!(composed.a(), granular.a(), epsilon = 1e-15);
        assert_relative_eq!(composed.ad(), granular.ad(), epsilon = 1e-15);
        assert_relative_eq!(composed.bd(), granular.bd(), epsilon = 1e-15);
    }

    #[test]
    fn test_discretize_before_jacobians_uses_cached_zeros() {
        // Ordering is the caller's contract: discretizing first sees
        // the zero-initialized (A, B)
        let mut controller = LinearController::default();
        controller.set_attitude(0.4, 0.0, 0.0);
        controller.discretize();

        assert_relative_eq!(controller.ad(), StateMatrix::identity(), epsilon = 1e-15);
        assert_abs_diff_eq!(controller.bd().norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_reference_round_trip() {
        let mut controller = LinearController::default();
        let mut reference = QuadrotorState::default();
        reference.attitude = Vector3::new(0.1, 0.2, 0.3);
        reference.velocity = Vector3::new(1.0, 0.0, 0.0);
        controller.set_reference(reference.clone());

        assert_relative_eq!(
            controller.reference().to_vector(),
            reference.to_vector(),
            epsilon = 1e-15
        );
    }
}
