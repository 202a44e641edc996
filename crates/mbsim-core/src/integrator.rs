//! Integrator traits and the `GridIntegrator` decorator.
//!
//! `Integrator` is the public trait consumed by orchestration.
//! `StepScheme` is the internal trait implemented by numerical methods: it
//! advances a state across one grid interval.
//! `GridIntegrator` is a decorator that walks the time grid, checks every
//! accepted state, and reports progress.

use std::sync::Arc;

use tracing::debug;

use crate::dynamics::{OdeSystem, State};
use crate::error::SimError;
use crate::grid::{TimeGrid, Trajectory};
use crate::observer::ProgressObserver;
use crate::options::SolverOptions;
use crate::progress::{ProgressThrottle, ProgressUpdate};

/// Public trait for time-domain integrators, consumed by orchestration.
pub trait Integrator: Send + Sync {
    /// Integrate `system` from `initial` at `grid.start()` and sample it at
    /// every grid point.
    fn integrate(
        &self,
        system: &dyn OdeSystem,
        initial: State,
        grid: &TimeGrid,
        opts: &SolverOptions,
        observer: &dyn ProgressObserver,
        run_index: usize,
    ) -> Result<Trajectory, SimError>;

    /// Get the name of this integrator.
    fn name(&self) -> &'static str;
}

/// Per-run bookkeeping carried from one grid interval to the next.
#[derive(Debug, Clone, Default)]
pub struct StepSession {
    /// Next trial step size (0 until the scheme picks one).
    pub step: f64,
    /// Derivative at the last accepted point, reusable as the next first stage.
    pub fsal: Option<(f64, State)>,
    /// Attempted steps, accepted and rejected.
    pub attempted: u64,
    /// Rejected steps.
    pub rejected: u64,
}

impl StepSession {
    /// Count one attempted step, failing once the budget is spent.
    pub fn charge(&mut self, t: f64, opts: &SolverOptions) -> Result<(), SimError> {
        if self.attempted >= opts.max_steps {
            return Err(SimError::StepBudgetExceeded {
                time: t,
                steps: self.attempted,
            });
        }
        self.attempted += 1;
        Ok(())
    }
}

/// Internal trait for numerical methods.
/// Wrapped by `GridIntegrator` which adds the grid walk and progress reporting.
pub trait StepScheme: Send + Sync {
    /// Advance `state` from `t0` to exactly `t1`.
    fn advance(
        &self,
        system: &dyn OdeSystem,
        t0: f64,
        t1: f64,
        state: State,
        opts: &SolverOptions,
        session: &mut StepSession,
    ) -> Result<State, SimError>;

    /// Get the name of this method.
    fn name(&self) -> &'static str;
}

/// Decorator that turns a `StepScheme` into a grid-sampling `Integrator`.
pub struct GridIntegrator {
    scheme: Arc<dyn StepScheme>,
}

impl GridIntegrator {
    /// Create a new `GridIntegrator` wrapping the given scheme.
    #[must_use]
    pub fn new(scheme: Arc<dyn StepScheme>) -> Self {
        Self { scheme }
    }
}

impl Integrator for GridIntegrator {
    fn integrate(
        &self,
        system: &dyn OdeSystem,
        initial: State,
        grid: &TimeGrid,
        opts: &SolverOptions,
        observer: &dyn ProgressObserver,
        run_index: usize,
    ) -> Result<Trajectory, SimError> {
        opts.validate()?;
        let name = self.scheme.name();
        let total = grid.len();
        let t_start = grid.start();
        check_accepted(t_start, initial)?;

        let mut trajectory = Trajectory::with_capacity(total);
        trajectory.push(t_start, initial);

        let mut session = StepSession::default();
        let mut throttle = ProgressThrottle::new();
        let mut state = initial;

        for (i, window) in grid.points().windows(2).enumerate() {
            let (t0, t1) = (window[0], window[1]);
            state = self
                .scheme
                .advance(system, t0, t1, state, opts, &mut session)?;
            check_accepted(t1, state)?;
            trajectory.push(t1, state);

            let update = ProgressUpdate::new(run_index, name, i + 2, total);
            if throttle.should_report(update.progress) {
                observer.on_progress(&update);
            }
        }

        debug!(
            method = name,
            run = run_index,
            samples = total,
            attempted = session.attempted,
            rejected = session.rejected,
            "Integration finished"
        );
        observer.on_progress(&ProgressUpdate::done(run_index, name, total));
        Ok(trajectory)
    }

    fn name(&self) -> &'static str {
        self.scheme.name()
    }
}

/// Reject an accepted state that left the physical domain.
fn check_accepted(t: f64, state: State) -> Result<(), SimError> {
    if state.is_physical() {
        Ok(())
    } else {
        Err(SimError::NumericalDomain {
            time: t,
            radius: state.radius,
        })
    }
}
