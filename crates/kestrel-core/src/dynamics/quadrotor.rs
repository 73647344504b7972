//! Quadrotor rigid-body dynamics
//!
//! Six-degree-of-freedom model with body-frame velocity and Euler
//! attitude:
//!
//! ṗ = R(Θ) · v        (world z reported as altitude, so ṗz is negated)
//! Θ̇ = T(φ, θ) · ω
//! v̇ = v × ω + g_b(Θ) + R(Θ)ᵀ·w − (T·e₃ + μ·v) / m
//! ω̇ = J⁻¹ (τ − ω × Jω)
//!
//! where:
//! - p: position (world frame)
//! - v: velocity (body frame)
//! - Θ: Euler attitude (roll, pitch, yaw)
//! - ω: angular velocity (body frame)
//! - T, τ: net thrust and body torque from the rotor mixer
//! - g_b: gravity resolved in the body frame
//! - w: constant world-frame wind disturbance acceleration
//! - μ: linear drag coefficient
//!
//! The body z-axis points down (thrust opposes gravity at level
//! attitude); the attitude kinematics are singular at ±90° pitch
//! (gimbal lock, see [`crate::math::euler_rate_matrix`]).

use nalgebra::{Matrix4, SVector, Vector3, Vector4};
use serde::{Deserialize, Serialize};

use crate::math::{euler_rate_matrix, gravity_body, rk4, rotation_body_to_world};
use crate::{Mat3, GRAVITY};

/// Number of state variables
pub const STATE_DIM: usize = 12;
/// Number of rotors / motor commands
pub const INPUT_DIM: usize = 4;

/// Index of the position block in the flat state vector
pub const POS: usize = 0;
/// Index of the body-velocity block
pub const VEL: usize = 3;
/// Index of the Euler-attitude block
pub const ATT: usize = 6;
/// Index of the body-rate block
pub const RATE: usize = 9;

/// Flat state vector [p, v, Θ, ω]
pub type StateVector = SVector<f64, STATE_DIM>;

/// Normalized per-rotor thrust commands, nominally in [0, 1].
/// Out-of-range commands are not rejected; they produce physically
/// invalid but well-defined results.
pub type MotorCommands = Vector4<f64>;

/// Quadrotor state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrotorState {
    /// Position [m] (world frame, z up as altitude)
    pub position: Vector3<f64>,
    /// Velocity [m/s] (body frame)
    pub velocity: Vector3<f64>,
    /// Euler attitude [rad]: roll, pitch, yaw
    pub attitude: Vector3<f64>,
    /// Angular velocity [rad/s] (body frame)
    pub angular_velocity: Vector3<f64>,
}

impl Default for QuadrotorState {
    fn default() -> Self {
        Self {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            attitude: Vector3::zeros(),
            angular_velocity: Vector3::zeros(),
        }
    }
}

impl QuadrotorState {
    /// Pack into the flat vector layout [p, v, Θ, ω]
    pub fn to_vector(&self) -> StateVector {
        let mut x = StateVector::zeros();
        x.fixed_rows_mut::<3>(POS).copy_from(&self.position);
        x.fixed_rows_mut::<3>(VEL).copy_from(&self.velocity);
        x.fixed_rows_mut::<3>(ATT).copy_from(&self.attitude);
        x.fixed_rows_mut::<3>(RATE).copy_from(&self.angular_velocity);
        x
    }

    /// Unpack from the flat vector layout [p, v, Θ, ω]
    pub fn from_vector(x: &StateVector) -> Self {
        Self {
            position: x.fixed_rows::<3>(POS).into_owned(),
            velocity: x.fixed_rows::<3>(VEL).into_owned(),
            attitude: x.fixed_rows::<3>(ATT).into_owned(),
            angular_velocity: x.fixed_rows::<3>(RATE).into_owned(),
        }
    }

    /// State with the given Euler attitude and everything else at rest
    pub fn with_attitude(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self {
            attitude: Vector3::new(roll, pitch, yaw),
            ..Default::default()
        }
    }
}

/// Net body wrench produced by the four rotors
#[derive(Debug, Clone, Default)]
pub struct ForceTorque {
    /// Net thrust magnitude [N], acting along the body down axis
    pub thrust: f64,
    /// Body torque [N·m]: roll, pitch, yaw
    pub torque: Vector3<f64>,
}

impl ForceTorque {
    pub fn new(thrust: f64, torque: Vector3<f64>) -> Self {
        Self { thrust, torque }
    }

    /// Hover wrench for the given parameters: thrust balancing weight,
    /// zero torque
    pub fn hover(params: &QuadrotorParams) -> Self {
        Self {
            thrust: params.hover_thrust(),
            torque: Vector3::zeros(),
        }
    }
}

/// Quadrotor parameters
///
/// Immutable after construction; the mixer and the inertia inverse are
/// derived once and never recomputed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuadrotorParams {
    /// Mass [kg]
    pub mass: f64,
    /// Gravity magnitude [m/s²]
    pub gravity: f64,
    /// Linear drag coefficient μ [N·s/m], isotropic
    pub drag_coeff: f64,
    /// Rotor thrust coefficient k1 [N per unit command]
    pub thrust_coeff: f64,
    /// Rotor reaction-torque coefficient k2 [N·m per unit command]
    pub torque_coeff: f64,
    /// Arm length [m] (center of mass to rotor axis)
    pub arm_length: f64,
    /// Inertia tensor [kg·m²] (body frame, diagonal)
    pub inertia: Mat3,
    /// Inverse inertia tensor
    pub inertia_inv: Mat3,
    /// Constant world-frame wind disturbance acceleration [m/s²]
    /// (north, east, 0)
    pub wind_accel: Vector3<f64>,
    /// Rotor mixer: motor commands -> [thrust, roll, pitch, yaw torque]
    pub mixer: Matrix4<f64>,
}

impl QuadrotorParams {
    /// Create parameters with diagonal inertia
    ///
    /// Rotors are numbered 1-4 in a plus configuration: 1 front, 2
    /// right, 3 back, 4 left; the front/back pair spins opposite the
    /// left/right pair, so diagonal command offsets couple into yaw.
    pub fn new(
        mass: f64,
        gravity: f64,
        drag_coeff: f64,
        thrust_coeff: f64,
        torque_coeff: f64,
        arm_length: f64,
        inertia_diag: Vector3<f64>,
    ) -> Self {
        let inertia = Mat3::from_diagonal(&inertia_diag);
        let inertia_inv = Mat3::from_diagonal(&Vector3::new(
            1.0 / inertia_diag.x,
            1.0 / inertia_diag.y,
            1.0 / inertia_diag.z,
        ));

        let k1 = thrust_coeff;
        let k2 = torque_coeff;
        let lk1 = arm_length * thrust_coeff;
        let mixer = Matrix4::new(
            k1, k1, k1, k1,
            0.0, -lk1, 0.0, lk1,
            lk1, 0.0, -lk1, 0.0,
            -k2, k2, -k2, k2,
        );

        Self {
            mass,
            gravity,
            drag_coeff,
            thrust_coeff,
            torque_coeff,
            arm_length,
            inertia,
            inertia_inv,
            wind_accel: Vector3::zeros(),
            mixer,
        }
    }

    /// Add a constant world-frame wind disturbance acceleration
    pub fn with_wind(mut self, wind_accel: Vector3<f64>) -> Self {
        self.wind_accel = wind_accel;
        self
    }

    /// Thrust balancing weight [N]
    pub fn hover_thrust(&self) -> f64 {
        self.mass * self.gravity
    }

    /// Per-rotor command at which thrust balances weight
    pub fn hover_command(&self) -> f64 {
        self.hover_thrust() / (INPUT_DIM as f64 * self.thrust_coeff)
    }

    /// Apply the mixer: motor commands to net thrust and body torque
    pub fn force_torque(&self, cmds: &MotorCommands) -> ForceTorque {
        let u = self.mixer * cmds;
        ForceTorque {
            thrust: u[0],
            torque: u.fixed_rows::<3>(1).into_owned(),
        }
    }
}

impl Default for QuadrotorParams {
    fn default() -> Self {
        // Bench-calibrated 1.1 kg plus-frame quadrotor; hover command
        // m·g / (4·k1) = 0.55
        Self::new(
            1.1,
            GRAVITY,
            0.0366667,
            4.905,
            0.1,
            0.225,
            Vector3::new(0.014575, 0.014575, 0.049),
        )
    }
}

/// Quadrotor dynamics model owning the live vehicle state
///
/// Each [`send_motor_cmds`](Self::send_motor_cmds) call mixes the
/// commands into a body wrench, holds it constant over one integration
/// step, and advances the state with classical RK4.
#[derive(Debug, Clone)]
pub struct QuadrotorDynamics {
    /// Vehicle parameters
    pub params: QuadrotorParams,
    state: QuadrotorState,
    dt: f64,
}

impl QuadrotorDynamics {
    /// Default integration step [s]
    pub const DEFAULT_STEP: f64 = 0.002;

    pub fn new(params: QuadrotorParams, dt: f64) -> Self {
        Self {
            params,
            state: QuadrotorState::default(),
            dt,
        }
    }

    /// Apply one frame of motor commands and advance the state by one
    /// integration step
    ///
    /// Commands are not range-checked. Near ±90° pitch the attitude
    /// kinematics are singular and the state degenerates to
    /// non-finite values (gimbal lock).
    pub fn send_motor_cmds(&mut self, cmds: &MotorCommands) {
        let wrench = self.params.force_torque(cmds);
        let x = self.state.to_vector();
        let next = rk4(&x, 0.0, self.dt, |_t, x| self.derivative_vector(x, &wrench));
        self.state = QuadrotorState::from_vector(&next);
    }

    /// Snapshot of the current state
    pub fn state(&self) -> QuadrotorState {
        self.state.clone()
    }

    /// Overwrite the current state
    pub fn set_state(&mut self, state: QuadrotorState) {
        self.state = state;
    }

    /// Integration step [s]
    pub fn dt(&self) -> f64 {
        self.dt
    }

    /// State derivative under the given wrench
    pub fn derivative(&self, state: &QuadrotorState, wrench: &ForceTorque) -> StateVector {
        self.derivative_vector(&state.to_vector(), wrench)
    }

    fn derivative_vector(&self, x: &StateVector, wrench: &ForceTorque) -> StateVector {
        let p = &self.params;
        let v = x.fixed_rows::<3>(VEL).into_owned();
        let attitude = x.fixed_rows::<3>(ATT).into_owned();
        let omega = x.fixed_rows::<3>(RATE).into_owned();

        let r_body_to_world = rotation_body_to_world(&attitude);

        // Position kinematics; world z is reported as altitude while the
        // body z-axis points down
        let mut pos_dot = r_body_to_world * v;
        pos_dot.z = -pos_dot.z;

        // Attitude kinematics, singular at ±90° pitch
        let att_dot = euler_rate_matrix(&attitude) * omega;

        // Translational dynamics in the rotating body frame
        let thrust = Vector3::new(0.0, 0.0, wrench.thrust);
        let vel_dot = v.cross(&omega)
            + gravity_body(&attitude, p.gravity)
            + r_body_to_world.transpose() * p.wind_accel
            - (thrust + p.drag_coeff * v) / p.mass;

        // Euler's rigid-body equation
        let rate_dot = p.inertia_inv * (wrench.torque - omega.cross(&(p.inertia * omega)));

        let mut xdot = StateVector::zeros();
        xdot.fixed_rows_mut::<3>(POS).copy_from(&pos_dot);
        xdot.fixed_rows_mut::<3>(VEL).copy_from(&vel_dot);
        xdot.fixed_rows_mut::<3>(ATT).copy_from(&att_dot);
        xdot.fixed_rows_mut::<3>(RATE).copy_from(&rate_dot);
        xdot
    }
}

impl Default for QuadrotorDynamics {
    fn default() -> Self {
        Self::new(QuadrotorParams::default(), Self::DEFAULT_STEP)
    }
}
