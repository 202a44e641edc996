//! Integrator options.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ATOL_RADIUS, DEFAULT_ATOL_VELOCITY, DEFAULT_MAX_STEPS, DEFAULT_RK4_SUBSTEPS,
    DEFAULT_RTOL,
};
use crate::dynamics::State;
use crate::error::{require_positive, SimError};

/// Options shared by the integrators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverOptions {
    /// Relative tolerance (adaptive methods).
    pub rtol: f64,
    /// Absolute tolerance on the radius, in meters.
    pub atol_radius: f64,
    /// Absolute tolerance on the wall velocity, in m/s.
    pub atol_velocity: f64,
    /// First trial step in seconds (0 = choose automatically).
    pub initial_step: f64,
    /// Maximum number of attempted steps per run (0 = default).
    pub max_steps: u64,
    /// Fixed-step substeps per grid interval (0 = default).
    pub rk4_substeps: u32,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            rtol: DEFAULT_RTOL,
            atol_radius: DEFAULT_ATOL_RADIUS,
            atol_velocity: DEFAULT_ATOL_VELOCITY,
            initial_step: 0.0,
            max_steps: DEFAULT_MAX_STEPS,
            rk4_substeps: DEFAULT_RK4_SUBSTEPS,
        }
    }
}

impl SolverOptions {
    /// Normalize options, applying defaults where values are zero.
    #[must_use]
    pub fn normalize(mut self) -> Self {
        if self.rtol == 0.0 {
            self.rtol = DEFAULT_RTOL;
        }
        if self.atol_radius == 0.0 {
            self.atol_radius = DEFAULT_ATOL_RADIUS;
        }
        if self.atol_velocity == 0.0 {
            self.atol_velocity = DEFAULT_ATOL_VELOCITY;
        }
        if self.max_steps == 0 {
            self.max_steps = DEFAULT_MAX_STEPS;
        }
        if self.rk4_substeps == 0 {
            self.rk4_substeps = DEFAULT_RK4_SUBSTEPS;
        }
        self
    }

    /// Reject tolerances and budgets that cannot work.
    pub fn validate(&self) -> Result<(), SimError> {
        require_positive("rtol", self.rtol)?;
        if self.rtol >= 1.0 {
            return Err(SimError::invalid(format!(
                "rtol must be below 1 (got {})",
                self.rtol
            )));
        }
        require_positive("radius tolerance", self.atol_radius)?;
        require_positive("velocity tolerance", self.atol_velocity)?;
        if !self.initial_step.is_finite() || self.initial_step < 0.0 {
            return Err(SimError::invalid(format!(
                "initial step must be finite and non-negative (got {})",
                self.initial_step
            )));
        }
        if self.max_steps == 0 {
            return Err(SimError::invalid("max steps must be at least 1"));
        }
        if self.rk4_substeps == 0 {
            return Err(SimError::invalid("rk4 substeps must be at least 1"));
        }
        Ok(())
    }

    /// Per-component absolute tolerance as a state.
    #[must_use]
    pub fn atol(&self) -> State {
        State::new(self.atol_radius, self.atol_velocity)
    }
}
