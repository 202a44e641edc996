//! Error type shared by every simulation layer.

/// Error type for bubble simulations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimError {
    /// A parameter, grid, or option was rejected before any integration ran.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The radius left the physical domain (non-positive or non-finite).
    #[error("radius left the physical domain at t = {time:e} s (R = {radius:e} m)")]
    NumericalDomain {
        /// Simulation time at which the state was rejected.
        time: f64,
        /// Offending radius.
        radius: f64,
    },

    /// The integrator exhausted its step budget before reaching the end of the grid.
    #[error("step budget of {steps} steps exhausted at t = {time:e} s")]
    StepBudgetExceeded {
        /// Simulation time reached.
        time: f64,
        /// Number of attempted steps.
        steps: u64,
    },

    /// The adaptive step size collapsed below what floating point can represent.
    #[error("step size underflow at t = {time:e} s (h = {step:e} s)")]
    StepSizeUnderflow {
        /// Simulation time reached.
        time: f64,
        /// Last attempted step size.
        step: f64,
    },
}

impl SimError {
    /// Shorthand for [`SimError::InvalidParameter`].
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Whether the integrator failed to meet its tolerance within its budget.
    #[must_use]
    pub fn is_tolerance_failure(&self) -> bool {
        matches!(
            self,
            Self::StepBudgetExceeded { .. } | Self::StepSizeUnderflow { .. }
        )
    }
}

/// Require a strictly positive, finite value.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<f64, SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SimError::invalid(format!(
            "{name} must be positive and finite (got {value})"
        )))
    }
}
