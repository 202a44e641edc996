//! Orchestration interfaces.

use std::time::Duration;

use mbsim_core::SimError;

use crate::comparison::HarmonicComparison;
use crate::config::ExperimentConfig;
use crate::scenario::{ScenarioKind, ScenarioResult};

/// Trait for presenting results to the user.
pub trait ResultPresenter: Send + Sync {
    /// Present the configuration about to run.
    fn present_config(&self, config: &ExperimentConfig);

    /// Present one successful scenario.
    fn present_scenario(&self, result: &ScenarioResult);

    /// Present the resting/active comparison.
    fn present_comparison(&self, comparison: &HarmonicComparison);

    /// Present an error.
    fn present_error(&self, error: &str);
}

/// Outcome of a single scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Human-readable label.
    pub label: &'static str,
    /// The run's results or a structured error.
    pub outcome: Result<ScenarioResult, SimError>,
    /// Run duration.
    pub duration: Duration,
}

impl ScenarioOutcome {
    /// Whether the run succeeded.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}
