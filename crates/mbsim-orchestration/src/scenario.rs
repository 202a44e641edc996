//! Resting and active scenarios.

use std::fmt;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

use mbsim_core::{
    BubbleDynamics, Integrator, ProgressObserver, ShellParameters, SimError, Trajectory,
};
use mbsim_spectral::{HarmonicSignature, Spectrum, SpectrumAnalyzer};

use crate::config::ExperimentConfig;

/// Which of the two shell states a run models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioKind {
    /// Baseline stiffness.
    Resting,
    /// Stiffness scaled by the active factor.
    Active,
}

impl ScenarioKind {
    /// Both kinds, in run order.
    pub const ALL: [Self; 2] = [Self::Resting, Self::Active];

    /// Human-readable label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Resting => "Resting neuron",
            Self::Active => "Active neuron (depolarized Vm)",
        }
    }
}

impl fmt::Display for ScenarioKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A scenario with its own shell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scenario {
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Shell used by this run only.
    pub shell: ShellParameters,
}

impl Scenario {
    /// Derive the scenario's shell from the configuration.
    ///
    /// The configuration's baseline shell is copied, never modified.
    pub fn from_config(kind: ScenarioKind, config: &ExperimentConfig) -> Result<Self, SimError> {
        let shell = match kind {
            ScenarioKind::Resting => config.shell,
            ScenarioKind::Active => config.shell.scaled(config.active_stiffness_factor)?,
        };
        Ok(Self { kind, shell })
    }

    /// Human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// Everything one scenario run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Human-readable label.
    pub label: &'static str,
    /// Shell elasticity χ used for the run.
    pub stiffness: f64,
    /// Integrator name.
    pub method: &'static str,
    /// Sampled radius and velocity.
    pub trajectory: Trajectory,
    /// Spectrum of `R(t) − R0`.
    pub spectrum: Spectrum,
    /// Levels at the drive frequency and its harmonics.
    pub signature: HarmonicSignature,
    /// Wall-clock time of the run.
    #[serde(skip)]
    pub duration: Duration,
}

/// Integrate one scenario from rest and analyze its radius deviation.
pub fn run_scenario(
    scenario: &Scenario,
    config: &ExperimentConfig,
    integrator: &dyn Integrator,
    analyzer: &SpectrumAnalyzer,
    observer: &dyn ProgressObserver,
    run_index: usize,
) -> Result<ScenarioResult, SimError> {
    let start = Instant::now();
    let stiffness = scenario.shell.elasticity();
    info!(
        scenario = scenario.label(),
        stiffness,
        method = integrator.name(),
        "Scenario started"
    );

    let system = BubbleDynamics::new(config.constants, config.drive, scenario.shell)?;
    let grid = config.time_grid()?;
    let trajectory = integrator.integrate(
        &system,
        system.initial_state(),
        &grid,
        &config.solver_options(),
        observer,
        run_index,
    )?;
    let spectrum = analyzer.analyze_deviation(&trajectory, config.constants.initial_radius)?;
    let signature =
        HarmonicSignature::measure(&spectrum, config.drive.frequency, config.harmonic_limit)?;

    let duration = start.elapsed();
    info!(
        scenario = scenario.label(),
        elapsed = ?duration,
        "Scenario finished"
    );
    Ok(ScenarioResult {
        kind: scenario.kind,
        label: scenario.label(),
        stiffness,
        method: integrator.name(),
        trajectory,
        spectrum,
        signature,
        duration,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbsim_core::observers::NoOpObserver;
    use mbsim_core::{DefaultFactory, IntegratorFactory};

    fn short_config() -> ExperimentConfig {
        ExperimentConfig {
            duration: 1.0e-6,
            samples: 1001,
            ..Default::default()
        }
    }

    #[test]
    fn labels() {
        assert_eq!(ScenarioKind::Resting.label(), "Resting neuron");
        assert_eq!(
            ScenarioKind::Active.to_string(),
            "Active neuron (depolarized Vm)"
        );
    }

    #[test]
    fn active_scenario_scales_a_copy() {
        let config = ExperimentConfig::default();
        let resting = Scenario::from_config(ScenarioKind::Resting, &config).unwrap();
        let active = Scenario::from_config(ScenarioKind::Active, &config).unwrap();
        assert!((resting.shell.elasticity() - 1.0).abs() < f64::EPSILON);
        assert!((active.shell.elasticity() - 0.5).abs() < f64::EPSILON);
        assert!((config.shell.elasticity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn run_produces_consistent_outputs() {
        let config = short_config();
        let scenario = Scenario::from_config(ScenarioKind::Resting, &config).unwrap();
        let integrator = DefaultFactory::new().get("dopri5").unwrap();
        let result = run_scenario(
            &scenario,
            &config,
            integrator.as_ref(),
            &SpectrumAnalyzer::new(),
            &NoOpObserver::new(),
            0,
        )
        .unwrap();
        assert_eq!(result.trajectory.len(), 1001);
        assert_eq!(result.spectrum.len(), 1001 / 2 + 1);
        assert_eq!(result.signature.levels().len(), 3);
        assert_eq!(result.method, "dopri5");
        assert_eq!(result.label, "Resting neuron");
        assert!((result.trajectory.radius()[0] - 2e-6).abs() < f64::EPSILON);
    }
}
