//! Reference values for the simulation and solver defaults.
//!
//! Physical defaults describe a 2 µm perfluorocarbon-filled lipid
//! microbubble in water driven by a 5 MHz, 100 kPa ultrasound burst.

/// Initial (and buckling) bubble radius R0, in meters.
pub const DEFAULT_INITIAL_RADIUS: f64 = 2.0e-6;

/// Liquid density ρ_L, in kg/m³.
pub const DEFAULT_LIQUID_DENSITY: f64 = 998.0;

/// Ambient pressure P0, in Pa.
pub const DEFAULT_AMBIENT_PRESSURE: f64 = 101_325.0;

/// Speed of sound in the liquid, in m/s.
pub const DEFAULT_SOUND_SPEED: f64 = 1480.0;

/// Liquid dynamic viscosity μ_L, in Pa·s.
pub const DEFAULT_VISCOSITY: f64 = 0.001;

/// Polytropic index κ of the gas core.
pub const DEFAULT_POLYTROPIC_INDEX: f64 = 1.07;

/// Surface tension σ0 of the bare gas/water interface, in N/m.
pub const DEFAULT_SURFACE_TENSION: f64 = 0.072;

/// Shell elasticity χ of the resting shell, in N/m.
pub const DEFAULT_SHELL_ELASTICITY: f64 = 1.0;

/// Drive frequency, in Hz.
pub const DEFAULT_DRIVE_FREQUENCY: f64 = 5.0e6;

/// Drive pressure amplitude, in Pa.
pub const DEFAULT_DRIVE_AMPLITUDE: f64 = 100.0e3;

/// Default relative tolerance of the adaptive integrator.
pub const DEFAULT_RTOL: f64 = 1e-8;

/// Default absolute tolerance on the radius, in meters.
pub const DEFAULT_ATOL_RADIUS: f64 = 1e-15;

/// Default absolute tolerance on the wall velocity, in m/s.
pub const DEFAULT_ATOL_VELOCITY: f64 = 1e-9;

/// Default step budget for a single integration run (accepted + rejected).
pub const DEFAULT_MAX_STEPS: u64 = 5_000_000;

/// Default number of fixed RK4 substeps per grid interval.
pub const DEFAULT_RK4_SUBSTEPS: u32 = 8;

/// Minimum progress change (1%) before reporting an update.
pub const PROGRESS_REPORT_THRESHOLD: f64 = 0.01;

/// Relative tolerance used to decide whether a time grid is uniform.
pub const GRID_UNIFORMITY_TOLERANCE: f64 = 1e-9;

/// Exit codes for CLI applications.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// The radius left the physical domain.
    pub const ERROR_DOMAIN: i32 = 2;
    /// The integrator could not meet its tolerance within its budget.
    pub const ERROR_TOLERANCE: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}
