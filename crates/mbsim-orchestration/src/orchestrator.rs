//! Core orchestration: scenario execution.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use mbsim_core::observers::NoOpObserver;
use mbsim_core::{DefaultFactory, Integrator, IntegratorFactory, ProgressObserver, SimError};
use mbsim_spectral::SpectrumAnalyzer;

use crate::config::ExperimentConfig;
use crate::interfaces::ScenarioOutcome;
use crate::scenario::{run_scenario, Scenario, ScenarioKind};

/// Run the resting and active scenarios with the default integrator factory.
pub fn execute_scenarios(config: &ExperimentConfig) -> Result<Vec<ScenarioOutcome>, SimError> {
    execute_scenarios_with(config, &DefaultFactory::new(), &NoOpObserver::new())
}

/// Run the resting and active scenarios.
///
/// Configuration problems are returned as an error before anything is
/// integrated. Once both scenarios are built, each run's failure is reported
/// in its own [`ScenarioOutcome`] and never hides the other run.
pub fn execute_scenarios_with(
    config: &ExperimentConfig,
    factory: &dyn IntegratorFactory,
    observer: &dyn ProgressObserver,
) -> Result<Vec<ScenarioOutcome>, SimError> {
    config.validate()?;
    let integrator = factory.get(&config.method)?;
    let scenarios = ScenarioKind::ALL
        .iter()
        .map(|&kind| Scenario::from_config(kind, config))
        .collect::<Result<Vec<_>, _>>()?;
    let analyzer = SpectrumAnalyzer::new();

    let start = Instant::now();
    let run = |index: usize| -> ScenarioOutcome {
        execute_one(&scenarios[index], config, &integrator, &analyzer, observer, index)
    };

    let outcomes = if config.parallel {
        // Two independent runs: join them on the rayon pool
        let (resting, active) = rayon::join(|| run(0), || run(1));
        vec![resting, active]
    } else {
        (0..scenarios.len()).map(run).collect()
    };

    info!(
        parallel = config.parallel,
        failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
        elapsed = ?start.elapsed(),
        "Scenarios finished"
    );
    Ok(outcomes)
}

fn execute_one(
    scenario: &Scenario,
    config: &ExperimentConfig,
    integrator: &Arc<dyn Integrator>,
    analyzer: &SpectrumAnalyzer,
    observer: &dyn ProgressObserver,
    index: usize,
) -> ScenarioOutcome {
    let start = Instant::now();
    let outcome = run_scenario(scenario, config, integrator.as_ref(), analyzer, observer, index);
    if let Err(err) = &outcome {
        warn!(scenario = scenario.label(), error = %err, "Scenario failed");
    }
    ScenarioOutcome {
        kind: scenario.kind,
        label: scenario.label(),
        outcome,
        duration: start.elapsed(),
    }
}
