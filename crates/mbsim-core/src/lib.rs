//! # mbsim-core
//!
//! Core library for the mbsim microbubble simulator.
//! Implements the Marmottant shell law, the modified Rayleigh-Plesset
//! equation, and the integrators that march it across a time grid.

pub mod constants;
pub mod dopri;
pub mod dynamics;
pub mod error;
pub mod grid;
pub mod integrator;
pub mod observer;
pub mod observers;
pub mod options;
pub mod params;
pub mod progress;
pub mod registry;
pub mod rk4;
pub mod surface_tension;

// Re-exports
pub use constants::{exit_codes, PROGRESS_REPORT_THRESHOLD};
pub use dynamics::{BubbleDynamics, OdeSystem, State};
pub use error::SimError;
pub use grid::{TimeGrid, Trajectory};
pub use integrator::{GridIntegrator, Integrator, StepScheme};
pub use observer::{ProgressObserver, ProgressSubject};
pub use options::SolverOptions;
pub use params::{DriveParameters, PhysicalConstants, RuptureModel, ShellParameters};
pub use progress::ProgressUpdate;
pub use registry::{DefaultFactory, IntegratorFactory};
pub use surface_tension::{MarmottantShell, ShellRegime};

/// Integrate the bubble with default constants and drive, sampled on `grid`.
///
/// This is a convenience function for simple use cases. For progress
/// reporting or a different integrator, use the `Integrator` trait directly.
///
/// # Example
/// ```
/// use mbsim_core::{simulate, ShellParameters, TimeGrid};
///
/// let grid = TimeGrid::linspace(0.0, 2e-7, 201).unwrap();
/// let traj = simulate(ShellParameters::new(1.0).unwrap(), &grid).unwrap();
/// assert_eq!(traj.len(), 201);
/// assert_eq!(traj.radius()[0], 2e-6);
/// ```
pub fn simulate(shell: ShellParameters, grid: &TimeGrid) -> Result<Trajectory, SimError> {
    use observers::NoOpObserver;

    let system = BubbleDynamics::new(
        PhysicalConstants::default(),
        DriveParameters::default(),
        shell,
    )?;
    let integrator = GridIntegrator::new(std::sync::Arc::new(dopri::DormandPrince45::new()));
    integrator.integrate(
        &system,
        system.initial_state(),
        grid,
        &SolverOptions::default(),
        &NoOpObserver::new(),
        0,
    )
}
