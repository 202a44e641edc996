//! Experiment configuration.

use serde::{Deserialize, Serialize};

use mbsim_core::{
    BubbleDynamics, DriveParameters, PhysicalConstants, ShellParameters, SimError, SolverOptions,
    TimeGrid,
};

/// Default simulated time (5 µs).
pub const DEFAULT_DURATION: f64 = 5.0e-6;

/// Default number of output samples.
pub const DEFAULT_SAMPLES: usize = 5000;

/// Default stiffness factor of the active scenario.
pub const DEFAULT_ACTIVE_STIFFNESS_FACTOR: f64 = 0.5;

/// Default highest harmonic order that must be resolved.
pub const DEFAULT_HARMONIC_LIMIT: u32 = 3;

/// Default integrator name.
pub const DEFAULT_METHOD: &str = "dopri5";

/// Everything needed to run the resting/active pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    /// Bubble and liquid constants.
    pub constants: PhysicalConstants,
    /// Acoustic drive.
    pub drive: DriveParameters,
    /// Baseline (resting) shell.
    pub shell: ShellParameters,
    /// Simulated time in seconds; the grid spans `[0, duration]`.
    pub duration: f64,
    /// Number of output samples, endpoints included.
    pub samples: usize,
    /// χ multiplier applied to the baseline shell for the active scenario.
    pub active_stiffness_factor: f64,
    /// Highest harmonic of the drive that must be resolved without aliasing.
    pub harmonic_limit: u32,
    /// Integrator name.
    pub method: String,
    /// Integrator options.
    pub solver: SolverOptions,
    /// Run both scenarios concurrently.
    pub parallel: bool,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            drive: DriveParameters::default(),
            shell: ShellParameters::default(),
            duration: DEFAULT_DURATION,
            samples: DEFAULT_SAMPLES,
            active_stiffness_factor: DEFAULT_ACTIVE_STIFFNESS_FACTOR,
            harmonic_limit: DEFAULT_HARMONIC_LIMIT,
            method: DEFAULT_METHOD.to_string(),
            solver: SolverOptions::default(),
            parallel: true,
        }
    }
}

impl ExperimentConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        serde_json::from_str(json)
            .map_err(|e| SimError::invalid(format!("invalid configuration: {e}")))
    }

    /// Serialize the configuration as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SimError::invalid(format!("cannot serialize configuration: {e}")))
    }

    /// Check every parameter before any integration runs.
    pub fn validate(&self) -> Result<(), SimError> {
        self.constants.validate()?;
        self.drive.validate()?;
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(SimError::invalid(format!(
                "duration must be positive and finite (got {})",
                self.duration
            )));
        }
        if self.samples < 2 {
            return Err(SimError::invalid(format!(
                "at least 2 samples are required (got {})",
                self.samples
            )));
        }
        let active = self.shell.scaled(self.active_stiffness_factor)?;
        for shell in [self.shell, active] {
            BubbleDynamics::new(self.constants, self.drive, shell)?;
        }
        if self.harmonic_limit < 2 {
            return Err(SimError::invalid(format!(
                "harmonic limit must be at least 2 to measure the second harmonic (got {})",
                self.harmonic_limit
            )));
        }
        self.solver_options().validate()?;

        let required = self.required_sample_rate();
        let actual = self.sample_rate();
        if actual < required {
            return Err(SimError::invalid(format!(
                "sample rate {actual:.4e} Hz aliases harmonic {} of the {:.4e} Hz drive \
                 (needs at least {required:.4e} Hz; raise samples or shorten duration)",
                self.harmonic_limit, self.drive.frequency
            )));
        }
        Ok(())
    }

    /// Output sample rate `(samples − 1) / duration`.
    #[must_use]
    pub fn sample_rate(&self) -> f64 {
        self.samples.saturating_sub(1) as f64 / self.duration
    }

    /// Lowest sample rate that resolves `harmonic_limit` without aliasing.
    #[must_use]
    pub fn required_sample_rate(&self) -> f64 {
        2.0 * f64::from(self.harmonic_limit) * self.drive.frequency
    }

    /// Output samples per drive period.
    #[must_use]
    pub fn samples_per_cycle(&self) -> f64 {
        self.sample_rate() / self.drive.frequency
    }

    /// The shared output grid.
    pub fn time_grid(&self) -> Result<TimeGrid, SimError> {
        TimeGrid::linspace(0.0, self.duration, self.samples)
    }

    /// Solver options with zero fields replaced by defaults.
    #[must_use]
    pub fn solver_options(&self) -> SolverOptions {
        self.solver.clone().normalize()
    }
}
