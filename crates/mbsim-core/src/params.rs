//! Physical, drive, and shell parameters.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AMBIENT_PRESSURE, DEFAULT_DRIVE_AMPLITUDE, DEFAULT_DRIVE_FREQUENCY,
    DEFAULT_INITIAL_RADIUS, DEFAULT_LIQUID_DENSITY, DEFAULT_POLYTROPIC_INDEX,
    DEFAULT_SHELL_ELASTICITY, DEFAULT_SOUND_SPEED, DEFAULT_SURFACE_TENSION, DEFAULT_VISCOSITY,
};
use crate::error::{require_positive, SimError};

/// Physical constants of the bubble and the surrounding liquid (SI units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalConstants {
    /// Initial radius R0, also used as the buckling radius (m).
    pub initial_radius: f64,
    /// Liquid density ρ_L (kg/m³).
    pub liquid_density: f64,
    /// Ambient pressure P0 (Pa).
    pub ambient_pressure: f64,
    /// Speed of sound c (m/s).
    pub sound_speed: f64,
    /// Liquid viscosity μ_L (Pa·s).
    pub viscosity: f64,
    /// Polytropic index κ.
    pub polytropic_index: f64,
    /// Bulk surface tension σ0 (N/m).
    pub surface_tension: f64,
}

impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            initial_radius: DEFAULT_INITIAL_RADIUS,
            liquid_density: DEFAULT_LIQUID_DENSITY,
            ambient_pressure: DEFAULT_AMBIENT_PRESSURE,
            sound_speed: DEFAULT_SOUND_SPEED,
            viscosity: DEFAULT_VISCOSITY,
            polytropic_index: DEFAULT_POLYTROPIC_INDEX,
            surface_tension: DEFAULT_SURFACE_TENSION,
        }
    }
}

impl PhysicalConstants {
    /// Reject non-positive or non-finite constants.
    pub fn validate(&self) -> Result<(), SimError> {
        require_positive("initial radius", self.initial_radius)?;
        require_positive("liquid density", self.liquid_density)?;
        require_positive("ambient pressure", self.ambient_pressure)?;
        require_positive("sound speed", self.sound_speed)?;
        require_positive("viscosity", self.viscosity)?;
        require_positive("polytropic index", self.polytropic_index)?;
        require_positive("surface tension", self.surface_tension)?;
        Ok(())
    }

    /// Equilibrium gas pressure at R0, `P0 + 2σ0/R0`.
    #[must_use]
    pub fn initial_gas_pressure(&self) -> f64 {
        self.ambient_pressure + 2.0 * self.surface_tension / self.initial_radius
    }
}

/// Acoustic drive applied to the liquid far field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveParameters {
    /// Drive frequency f (Hz).
    pub frequency: f64,
    /// Drive pressure amplitude P_amp (Pa).
    pub pressure_amplitude: f64,
}

impl Default for DriveParameters {
    fn default() -> Self {
        Self {
            frequency: DEFAULT_DRIVE_FREQUENCY,
            pressure_amplitude: DEFAULT_DRIVE_AMPLITUDE,
        }
    }
}

impl DriveParameters {
    /// Reject a non-positive frequency or a negative/non-finite amplitude.
    ///
    /// A zero amplitude is accepted and yields an undriven (free) oscillation.
    pub fn validate(&self) -> Result<(), SimError> {
        require_positive("drive frequency", self.frequency)?;
        if !self.pressure_amplitude.is_finite() || self.pressure_amplitude < 0.0 {
            return Err(SimError::invalid(format!(
                "drive pressure amplitude must be finite and non-negative (got {})",
                self.pressure_amplitude
            )));
        }
        Ok(())
    }

    /// Drive period, in seconds.
    #[must_use]
    pub fn period(&self) -> f64 {
        1.0 / self.frequency
    }

    /// External drive pressure `P_amp · sin(2π f t)`.
    #[inline]
    #[must_use]
    pub fn pressure_at(&self, t: f64) -> f64 {
        self.pressure_amplitude * (std::f64::consts::TAU * self.frequency * t).sin()
    }
}

/// How the rupture radius is derived from σ0 and χ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuptureModel {
    /// `R_rupture = R_buckling · (1 + σ0/χ)`.
    ///
    /// The elastic branch reaches `2σ0 + σ0²/χ` there, so σ jumps down to σ0
    /// when the shell ruptures.
    #[default]
    Linear,
    /// `R_rupture = R_buckling · √(1 + σ0/χ)`; the elastic branch meets σ0.
    Matched,
}

impl RuptureModel {
    /// Ratio `R_rupture / R_buckling` for the given tensions.
    #[must_use]
    pub fn rupture_ratio(self, bulk_tension: f64, elasticity: f64) -> f64 {
        let stretch = 1.0 + bulk_tension / elasticity;
        match self {
            Self::Linear => stretch,
            Self::Matched => stretch.sqrt(),
        }
    }
}

impl std::str::FromStr for RuptureModel {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "matched" => Ok(Self::Matched),
            other => Err(SimError::invalid(format!("unknown rupture model: {other}"))),
        }
    }
}

/// Mechanical state of the shell.
///
/// Each scenario owns its own copy; deriving a perturbed shell produces a
/// new value instead of overwriting the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawShell", into = "RawShell")]
pub struct ShellParameters {
    elasticity: f64,
    rupture: RuptureModel,
}

impl ShellParameters {
    /// Create a shell with elasticity χ (N/m). χ must be positive and finite.
    pub fn new(elasticity: f64) -> Result<Self, SimError> {
        Self::with_rupture(elasticity, RuptureModel::default())
    }

    /// Create a shell with an explicit rupture model.
    pub fn with_rupture(elasticity: f64, rupture: RuptureModel) -> Result<Self, SimError> {
        require_positive("shell elasticity", elasticity)?;
        Ok(Self {
            elasticity,
            rupture,
        })
    }

    /// Shell elasticity χ.
    #[must_use]
    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Rupture model of this shell.
    #[must_use]
    pub fn rupture(&self) -> RuptureModel {
        self.rupture
    }

    /// A new shell whose elasticity is `factor · χ`.
    pub fn scaled(&self, factor: f64) -> Result<Self, SimError> {
        require_positive("stiffness factor", factor)?;
        Self::with_rupture(self.elasticity * factor, self.rupture)
    }
}

impl Default for ShellParameters {
    fn default() -> Self {
        Self {
            elasticity: DEFAULT_SHELL_ELASTICITY,
            rupture: RuptureModel::default(),
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawShell {
    #[serde(default = "default_elasticity")]
    elasticity: f64,
    #[serde(default)]
    rupture: RuptureModel,
}

fn default_elasticity() -> f64 {
    DEFAULT_SHELL_ELASTICITY
}

impl TryFrom<RawShell> for ShellParameters {
    type Error = SimError;

    fn try_from(raw: RawShell) -> Result<Self, Self::Error> {
        Self::with_rupture(raw.elasticity, raw.rupture)
    }
}

impl From<ShellParameters> for RawShell {
    fn from(shell: ShellParameters) -> Self {
        Self {
            elasticity: shell.elasticity,
            rupture: shell.rupture,
        }
    }
}
