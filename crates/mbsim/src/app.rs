//! Application entry point and dispatch.

use anyhow::{Context, Result};
use tracing::info;

use mbsim_cli::output::{write_report, ExperimentReport};
use mbsim_cli::presenter::CLIResultPresenter;
use mbsim_cli::progress::ProgressDisplay;
use mbsim_core::observers::{ChannelObserver, LoggingObserver};
use mbsim_core::DefaultFactory;
use mbsim_orchestration::{
    compare_scenarios, execute_scenarios_with, ExperimentConfig, ResultPresenter,
    ScenarioKind, ScenarioOutcome,
};

use crate::config::AppConfig;

/// Run the application.
pub fn run(config: &AppConfig) -> Result<()> {
    // Handle shell completion
    if let Some(shell) = config.completion {
        let mut cmd = <AppConfig as clap::CommandFactory>::command();
        mbsim_cli::completion::generate_completion(&mut cmd, shell, &mut std::io::stdout());
        return Ok(());
    }

    let experiment = config.experiment()?;
    run_cli(config, &experiment)
}

fn run_cli(config: &AppConfig, experiment: &ExperimentConfig) -> Result<()> {
    let presenter = CLIResultPresenter::new(config.verbose, config.quiet);
    presenter.present_config(experiment);

    let outcomes = if config.progress && !config.quiet {
        run_with_progress(experiment)?
    } else {
        execute_scenarios_with(experiment, &DefaultFactory::new(), &LoggingObserver::new())?
    };

    for outcome in &outcomes {
        match &outcome.outcome {
            Ok(result) => presenter.present_scenario(result),
            Err(err) => presenter.present_error(&format!("{}: {err}", outcome.label)),
        }
    }

    let comparison = compare_scenarios(&outcomes).ok();
    if let Some(comparison) = &comparison {
        presenter.present_comparison(comparison);
    }

    // Write whatever succeeded, failures included
    if let Some(path) = &config.output {
        let report = ExperimentReport::new(experiment, &outcomes, comparison.as_ref());
        write_report(path, &report)
            .with_context(|| format!("cannot write results to {}", path.display()))?;
        info!(path = %path.display(), "Results written");
    }

    first_failure(outcomes)
}

fn run_with_progress(experiment: &ExperimentConfig) -> Result<Vec<ScenarioOutcome>> {
    let (tx, rx) = crossbeam_channel::bounded(256);
    let labels = ScenarioKind::ALL.map(ScenarioKind::label);
    let handle = ProgressDisplay::new(&labels, experiment.samples).spawn(rx);

    let observer = ChannelObserver::new(tx);
    let outcomes = execute_scenarios_with(experiment, &DefaultFactory::new(), &observer);
    // Closing the channel ends the display thread
    drop(observer);
    if let Ok(display) = handle.join() {
        display.clear();
    }
    Ok(outcomes?)
}

fn first_failure(outcomes: Vec<ScenarioOutcome>) -> Result<()> {
    match outcomes.into_iter().find_map(|o| o.outcome.err()) {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
