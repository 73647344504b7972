//! Vehicle and simulation configuration
//!
//! Serde-backed configuration structures with validated conversion
//! into the runtime parameter types. Defaults are the bench-calibrated
//! vehicle used by the validation suites.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dynamics::{QuadrotorDynamics, QuadrotorParams};
use crate::GRAVITY;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("mass must be positive, got {0}")]
    NonPositiveMass(f64),
    #[error("thrust coefficient must be positive, got {0}")]
    NonPositiveThrustCoeff(f64),
    #[error("drag coefficient must be non-negative, got {0}")]
    NegativeDragCoeff(f64),
    #[error("inertia diagonal must be positive, got {0:?}")]
    SingularInertia(Vector3<f64>),
    #[error("time step must be positive, got {0}")]
    NonPositiveTimeStep(f64),
}

/// Vehicle physical parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleConfig {
    /// Mass [kg]
    pub mass: f64,
    /// Gravity magnitude [m/s²]
    pub gravity: f64,
    /// Linear drag coefficient [N·s/m]
    pub drag_coeff: f64,
    /// Rotor thrust coefficient [N per unit command]
    pub thrust_coeff: f64,
    /// Rotor reaction-torque coefficient [N·m per unit command]
    pub torque_coeff: f64,
    /// Arm length [m]
    pub arm_length: f64,
    /// Inertia diagonal [kg·m²]
    pub inertia: Vector3<f64>,
    /// Constant world-frame wind disturbance acceleration [m/s²]
    pub wind_accel: Vector3<f64>,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            mass: 1.1,
            gravity: GRAVITY,
            drag_coeff: 0.0366667,
            thrust_coeff: 4.905,
            torque_coeff: 0.1,
            arm_length: 0.225,
            inertia: Vector3::new(0.014575, 0.014575, 0.049),
            wind_accel: Vector3::zeros(),
        }
    }
}

impl VehicleConfig {
    pub fn to_params(&self) -> Result<QuadrotorParams, ConfigError> {
        if self.mass <= 0.0 {
            return Err(ConfigError::NonPositiveMass(self.mass));
        }
        if self.thrust_coeff <= 0.0 {
            return Err(ConfigError::NonPositiveThrustCoeff(self.thrust_coeff));
        }
        if self.drag_coeff < 0.0 {
            return Err(ConfigError::NegativeDragCoeff(self.drag_coeff));
        }
        if self.inertia.x <= 0.0 || self.inertia.y <= 0.0 || self.inertia.z <= 0.0 {
            return Err(ConfigError::SingularInertia(self.inertia));
        }

        Ok(QuadrotorParams::new(
            self.mass,
            self.gravity,
            self.drag_coeff,
            self.thrust_coeff,
            self.torque_coeff,
            self.arm_length,
            self.inertia,
        )
        .with_wind(self.wind_accel))
    }
}

/// Simulation timing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    /// Dynamics integration step [s]
    pub step_dt: f64,
    /// Control update period [s], used for discretizing the linear model
    pub control_dt: f64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            step_dt: QuadrotorDynamics::DEFAULT_STEP,
            control_dt: 0.01,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_dt <= 0.0 {
            return Err(ConfigError::NonPositiveTimeStep(self.step_dt));
        }
        if self.control_dt <= 0.0 {
            return Err(ConfigError::NonPositiveTimeStep(self.control_dt));
        }
        Ok(())
    }
}

impl QuadrotorDynamics {
    /// Build a dynamics model from configuration
    pub fn from_config(
        vehicle: &VehicleConfig,
        sim: &SimConfig,
    ) -> Result<Self, ConfigError> {
        sim.validate()?;
        Ok(Self::new(vehicle.to_params()?, sim.step_dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_config_converts() {
        let params = VehicleConfig::default().to_params().unwrap();
        assert_relative_eq!(params.hover_command(), 0.55, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_mass_rejected() {
        let config = VehicleConfig {
            mass: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.to_params(),
            Err(ConfigError::NonPositiveMass(_))
        ));
    }

    #[test]
    fn test_singular_inertia_rejected() {
        let config = VehicleConfig {
            inertia: Vector3::new(0.01, 0.0, 0.02),
            ..Default::default()
        };
        assert!(matches!(
            config.to_params(),
            Err(ConfigError::SingularInertia(_))
        ));
    }

    #[test]
    fn test_sim_config_validation() {
        assert!(SimConfig::default().validate().is_ok());

        let bad = SimConfig {
            step_dt: -0.002,
            ..Default::default()
        };
        assert!(matches!(
            bad.validate(),
            Err(ConfigError::NonPositiveTimeStep(_))
        ));
    }

    #[test]
    fn test_dynamics_from_config() {
        let quad =
            QuadrotorDynamics::from_config(&VehicleConfig::default(), &SimConfig::default())
                .unwrap();
        assert_relative_eq!(quad.dt(), 0.002, epsilon = 1e-15);
    }
}
