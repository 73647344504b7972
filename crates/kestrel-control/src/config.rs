//! Controller configuration
//!
//! Serde-backed configuration for [`LinearController`], including an
//! optional externally designed feedback gain supplied as a flat
//! row-major table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kestrel_core::dynamics::{QuadrotorParams, INPUT_DIM, STATE_DIM};

use crate::controller::{FeedbackGain, LinearController};

/// Controller configuration errors
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("control period must be positive, got {0}")]
    NonPositivePeriod(f64),
    #[error("feedback gain must hold {expected} values (4x12, row-major), got {got}")]
    GainDimension { expected: usize, got: usize },
}

/// Controller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlConfig {
    /// Control update period [s]
    pub control_dt: f64,
    /// Optional row-major 4x12 feedback gain
    pub feedback_gain: Option<Vec<f64>>,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            control_dt: LinearController::DEFAULT_PERIOD,
            feedback_gain: None,
        }
    }
}

impl ControlConfig {
    pub fn to_controller(
        &self,
        params: QuadrotorParams,
    ) -> Result<LinearController, ControlError> {
        if self.control_dt <= 0.0 {
            return Err(ControlError::NonPositivePeriod(self.control_dt));
        }

        let mut controller = LinearController::new(params, self.control_dt);
        if let Some(values) = &self.feedback_gain {
            let expected = INPUT_DIM * STATE_DIM;
            if values.len() != expected {
                return Err(ControlError::GainDimension {
                    expected,
                    got: values.len(),
                });
            }
            controller.set_feedback_gain(FeedbackGain::from_row_slice(values));
        }
        Ok(controller)
    }
}
