//! # mbsim-orchestration
//!
//! Scenario construction, parallel execution, and harmonic comparison.

pub mod comparison;
pub mod config;
pub mod interfaces;
pub mod orchestrator;
pub mod scenario;

pub use comparison::{compare_scenarios, HarmonicComparison, ScenarioHarmonics};
pub use config::ExperimentConfig;
pub use interfaces::{ResultPresenter, ScenarioOutcome};
pub use orchestrator::{execute_scenarios, execute_scenarios_with};
pub use scenario::{run_scenario, Scenario, ScenarioKind, ScenarioResult};
