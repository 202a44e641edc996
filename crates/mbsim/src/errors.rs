//! Error handling and exit codes.

use mbsim_core::{exit_codes, SimError};

/// Exit code for a simulation error.
#[must_use]
pub fn handle_error(err: &SimError) -> i32 {
    match err {
        SimError::InvalidParameter(_) => exit_codes::ERROR_CONFIG,
        SimError::NumericalDomain { .. } => exit_codes::ERROR_DOMAIN,
        SimError::StepBudgetExceeded { .. } | SimError::StepSizeUnderflow { .. } => {
            exit_codes::ERROR_TOLERANCE
        }
    }
}

/// Exit code for any application error.
///
/// Errors that do not wrap a [`SimError`] map to the generic code.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<SimError>()
        .map_or(exit_codes::ERROR_GENERIC, handle_error)
}
