//! Application configuration from CLI flags, environment, and JSON files.

use std::path::PathBuf;

use clap::Parser;

use mbsim_core::{RuptureModel, ShellParameters, SimError};
use mbsim_orchestration::ExperimentConfig;

/// Coated microbubble simulator: compares the harmonic response of a
/// resting and a softened (active) Marmottant shell under a Rayleigh-Plesset
/// drive.
#[derive(Parser, Debug, Default)]
#[command(name = "mbsim", version, about)]
pub struct AppConfig {
    /// JSON experiment file; flags override its values.
    #[arg(long, value_name = "FILE", env = "MBSIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Initial (buckling) radius R0 in m.
    #[arg(long)]
    pub radius: Option<f64>,

    /// Liquid density in kg/m³.
    #[arg(long)]
    pub density: Option<f64>,

    /// Ambient pressure in Pa.
    #[arg(long)]
    pub ambient_pressure: Option<f64>,

    /// Speed of sound in the liquid in m/s.
    #[arg(long)]
    pub sound_speed: Option<f64>,

    /// Liquid viscosity in Pa·s.
    #[arg(long)]
    pub viscosity: Option<f64>,

    /// Polytropic index of the gas.
    #[arg(long)]
    pub polytropic_index: Option<f64>,

    /// Bulk surface tension σ0 in N/m.
    #[arg(long)]
    pub surface_tension: Option<f64>,

    /// Resting shell elasticity χ in N/m.
    #[arg(long)]
    pub elasticity: Option<f64>,

    /// Rupture-radius law of the shell: linear or matched.
    #[arg(long)]
    pub rupture: Option<RuptureModel>,

    /// Drive frequency in Hz.
    #[arg(long, env = "MBSIM_FREQUENCY")]
    pub frequency: Option<f64>,

    /// Drive pressure amplitude in Pa.
    #[arg(long, env = "MBSIM_PRESSURE_AMPLITUDE")]
    pub pressure_amplitude: Option<f64>,

    /// Simulated time in s.
    #[arg(long)]
    pub duration: Option<f64>,

    /// Number of output samples, endpoints included.
    #[arg(long)]
    pub samples: Option<usize>,

    /// Elasticity multiplier of the active scenario.
    #[arg(long)]
    pub active_factor: Option<f64>,

    /// Highest harmonic that must be resolved without aliasing.
    #[arg(long)]
    pub harmonics: Option<u32>,

    /// Integrator: dopri5 or rk4.
    #[arg(short, long, env = "MBSIM_METHOD")]
    pub method: Option<String>,

    /// Relative tolerance of the adaptive integrator.
    #[arg(long)]
    pub rtol: Option<f64>,

    /// Step budget per run.
    #[arg(long)]
    pub max_steps: Option<u64>,

    /// Fixed-step substeps per sample interval (rk4).
    #[arg(long)]
    pub substeps: Option<u32>,

    /// Run the scenarios one after the other.
    #[arg(long)]
    pub sequential: bool,

    /// Write trajectories, spectra and the comparison as JSON.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Show progress bars.
    #[arg(long)]
    pub progress: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode (tab-separated summary only).
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Generate shell completion.
    #[arg(long, value_enum)]
    pub completion: Option<clap_complete::Shell>,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Build the experiment: defaults, then the config file, then flags.
    pub fn experiment(&self) -> Result<ExperimentConfig, SimError> {
        let mut experiment = match &self.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    SimError::invalid(format!("cannot read {}: {e}", path.display()))
                })?;
                ExperimentConfig::from_json(&json)?
            }
            None => ExperimentConfig::default(),
        };
        self.apply_overrides(&mut experiment)?;
        Ok(experiment)
    }

    fn apply_overrides(&self, experiment: &mut ExperimentConfig) -> Result<(), SimError> {
        let constants = &mut experiment.constants;
        override_with(&mut constants.initial_radius, self.radius);
        override_with(&mut constants.liquid_density, self.density);
        override_with(&mut constants.ambient_pressure, self.ambient_pressure);
        override_with(&mut constants.sound_speed, self.sound_speed);
        override_with(&mut constants.viscosity, self.viscosity);
        override_with(&mut constants.polytropic_index, self.polytropic_index);
        override_with(&mut constants.surface_tension, self.surface_tension);

        override_with(&mut experiment.drive.frequency, self.frequency);
        override_with(
            &mut experiment.drive.pressure_amplitude,
            self.pressure_amplitude,
        );

        if self.elasticity.is_some() || self.rupture.is_some() {
            let shell = experiment.shell;
            experiment.shell = ShellParameters::with_rupture(
                self.elasticity.unwrap_or(shell.elasticity()),
                self.rupture.unwrap_or(shell.rupture()),
            )?;
        }

        override_with(&mut experiment.duration, self.duration);
        override_with(&mut experiment.samples, self.samples);
        override_with(
            &mut experiment.active_stiffness_factor,
            self.active_factor,
        );
        override_with(&mut experiment.harmonic_limit, self.harmonics);
        if let Some(method) = &self.method {
            experiment.method.clone_from(method);
        }

        override_with(&mut experiment.solver.rtol, self.rtol);
        override_with(&mut experiment.solver.max_steps, self.max_steps);
        override_with(&mut experiment.solver.rk4_substeps, self.substeps);
        if self.sequential {
            experiment.parallel = false;
        }
        Ok(())
    }
}

fn override_with<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
