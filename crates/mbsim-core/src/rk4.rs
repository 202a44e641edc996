//! Classical fourth-order Runge-Kutta with a fixed number of substeps per
//! grid interval.

use crate::dynamics::{OdeSystem, State};
use crate::error::SimError;
use crate::integrator::{StepScheme, StepSession};
use crate::options::SolverOptions;

/// Fixed-step classical RK4.
///
/// Each grid interval is split into `SolverOptions::rk4_substeps` equal
/// steps. Any stage outside the physical domain aborts the run.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassicalRk4;

impl ClassicalRk4 {
    /// Create a new RK4 scheme.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    #[inline]
    fn step(system: &dyn OdeSystem, t: f64, y: State, h: f64) -> Result<State, SimError> {
        let half = 0.5 * h;
        let k1 = system.derivative(t, y)?;
        let k2 = system.derivative(t + half, y.add_scaled(k1, half))?;
        let k3 = system.derivative(t + half, y.add_scaled(k2, half))?;
        let k4 = system.derivative(t + h, y.add_scaled(k3, h))?;
        Ok(y + (k1 + (k2 + k3) * 2.0 + k4) * (h / 6.0))
    }
}

impl StepScheme for ClassicalRk4 {
    fn advance(
        &self,
        system: &dyn OdeSystem,
        t0: f64,
        t1: f64,
        state: State,
        opts: &SolverOptions,
        session: &mut StepSession,
    ) -> Result<State, SimError> {
        let substeps = opts.rk4_substeps.max(1);
        let h = (t1 - t0) / f64::from(substeps);
        let mut y = state;
        for i in 0..substeps {
            let t = t0 + h * f64::from(i);
            session.charge(t, opts)?;
            y = Self::step(system, t, y, h)?;
            if !y.is_physical() {
                return Err(SimError::NumericalDomain {
                    time: t + h,
                    radius: y.radius,
                });
            }
        }
        session.step = h;
        Ok(y)
    }

    fn name(&self) -> &'static str {
        "rk4"
    }
}
