//! Dormand-Prince 4(5) embedded Runge-Kutta scheme with adaptive step control.
//!
//! The fifth-order solution is propagated (local extrapolation) and the
//! embedded fourth-order solution only drives the error estimate. The last
//! stage is evaluated at the new point and reused as the first stage of the
//! next step (FSAL).

use tracing::trace;

use crate::dynamics::{OdeSystem, State};
use crate::error::SimError;
use crate::integrator::{StepScheme, StepSession};
use crate::options::SolverOptions;

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also row 7 of the tableau)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Fifth minus fourth order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339_200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Step-size controller settings.
const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;
const ERROR_EXPONENT: f64 = -1.0 / 5.0;

/// Steps shorter than this many ulps of the current time count as underflow.
const UNDERFLOW_ULPS: f64 = 16.0;

/// Outcome of one trial step.
struct Trial {
    state: State,
    /// Derivative at the new point.
    last_stage: State,
    /// Scaled RMS error estimate; accept when ≤ 1.
    error: f64,
}

/// Adaptive Dormand-Prince 4(5) scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct DormandPrince45;

impl DormandPrince45 {
    /// Create a new Dormand-Prince scheme.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn try_step(
        system: &dyn OdeSystem,
        t: f64,
        y: State,
        k1: State,
        h: f64,
        opts: &SolverOptions,
    ) -> Result<Trial, SimError> {
        let k2 = system.derivative(t + C2 * h, y.add_scaled(k1, h * A21))?;
        let k3 = system.derivative(t + C3 * h, y + (k1 * A31 + k2 * A32) * h)?;
        let k4 = system.derivative(t + C4 * h, y + (k1 * A41 + k2 * A42 + k3 * A43) * h)?;
        let k5 = system.derivative(
            t + C5 * h,
            y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h,
        )?;
        let k6 = system.derivative(
            t + h,
            y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h,
        )?;
        let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
        let k7 = system.derivative(t + h, y_new)?;

        let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;
        let atol = opts.atol();
        let scale = State::new(
            atol.radius + opts.rtol * y.radius.abs().max(y_new.radius.abs()),
            atol.velocity + opts.rtol * y.velocity.abs().max(y_new.velocity.abs()),
        );

        Ok(Trial {
            state: y_new,
            last_stage: k7,
            error: rms_ratio(err, scale),
        })
    }
}

impl StepScheme for DormandPrince45 {
    fn advance(
        &self,
        system: &dyn OdeSystem,
        t0: f64,
        t1: f64,
        state: State,
        opts: &SolverOptions,
        session: &mut StepSession,
    ) -> Result<State, SimError> {
        let mut k1 = match session.fsal {
            Some((t, k)) if t == t0 => k,
            _ => system.derivative(t0, state)?,
        };
        if session.step <= 0.0 {
            session.step = if opts.initial_step > 0.0 {
                opts.initial_step
            } else {
                starting_step(system, t0, state, k1, opts, t1 - t0)
            };
        }

        let mut t = t0;
        let mut y = state;
        let mut last_rejected = false;
        let mut domain_error: Option<SimError> = None;

        while t < t1 {
            let remaining = t1 - t;
            let lands_on_grid = session.step >= remaining;
            let h = if lands_on_grid { remaining } else { session.step };

            let min_step = UNDERFLOW_ULPS * f64::EPSILON * t.abs().max(t1.abs());
            if !h.is_finite() || (!lands_on_grid && h < min_step) {
                return Err(
                    domain_error.unwrap_or(SimError::StepSizeUnderflow { time: t, step: h })
                );
            }
            session.charge(t, opts)?;

            match Self::try_step(system, t, y, k1, h, opts) {
                Ok(trial) if trial.error <= 1.0 => {
                    let factor = if trial.error == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * trial.error.powf(ERROR_EXPONENT)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    let factor = if last_rejected { factor.min(1.0) } else { factor };
                    t = if lands_on_grid { t1 } else { t + h };
                    y = trial.state;
                    k1 = trial.last_stage;
                    session.step = h * factor;
                    last_rejected = false;
                    domain_error = None;
                }
                Ok(trial) => {
                    // NaN error estimates fall through to the minimum factor
                    let factor = (SAFETY * trial.error.powf(ERROR_EXPONENT)).max(MIN_FACTOR);
                    session.step = h * factor.min(SAFETY);
                    session.rejected += 1;
                    last_rejected = true;
                    trace!(t, h, error = trial.error, "Step rejected");
                }
                Err(err @ SimError::NumericalDomain { .. }) => {
                    session.step = h * MIN_FACTOR;
                    session.rejected += 1;
                    last_rejected = true;
                    trace!(t, h, "Trial stage left the physical domain");
                    domain_error = Some(err);
                }
                Err(err) => return Err(err),
            }
        }

        session.fsal = Some((t1, k1));
        Ok(y)
    }

    fn name(&self) -> &'static str {
        "dopri5"
    }
}

/// Root-mean-square of `err / scale` over both components.
#[inline]
fn rms_ratio(err: State, scale: State) -> f64 {
    let r = err.radius / scale.radius;
    let v = err.velocity / scale.velocity;
    ((r * r + v * v) / 2.0).sqrt()
}

/// Hairer-Wanner starting step estimate, capped at `max_step`.
fn starting_step(
    system: &dyn OdeSystem,
    t0: f64,
    y0: State,
    f0: State,
    opts: &SolverOptions,
    max_step: f64,
) -> f64 {
    let atol = opts.atol();
    let scale = State::new(
        atol.radius + opts.rtol * y0.radius.abs(),
        atol.velocity + opts.rtol * y0.velocity.abs(),
    );
    let d0 = rms_ratio(y0, scale);
    let d1 = rms_ratio(f0, scale);
    let h0 = if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
    .min(max_step);

    let Ok(f1) = system.derivative(t0 + h0, y0.add_scaled(f0, h0)) else {
        return h0;
    };
    let d2 = rms_ratio(f1 - f0, scale) / h0;
    let h1 = if d1.max(d2) <= 1e-15 {
        (h0 * 1e-3).max(1e-6 * max_step)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / 5.0)
    };
    (100.0 * h0).min(h1).min(max_step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::TimeGrid;
    use crate::integrator::{GridIntegrator, Integrator};
    use crate::observers::NoOpObserver;
    use std::sync::Arc;

    /// Harmonic oscillator x'' = -ω² x shifted so x stays positive.
    struct Oscillator {
        omega: f64,
    }

    impl OdeSystem for Oscillator {
        fn derivative(&self, _t: f64, s: State) -> Result<State, SimError> {
            Ok(State::new(
                s.velocity,
                -self.omega * self.omega * (s.radius - 2.0),
            ))
        }
    }

    fn integrate(
        system: &dyn OdeSystem,
        grid: &TimeGrid,
        opts: &SolverOptions,
    ) -> crate::grid::Trajectory {
        GridIntegrator::new(Arc::new(DormandPrince45::new()))
            .integrate(system, State::new(3.0, 0.0), grid, opts, &NoOpObserver::new(), 0)
            .unwrap()
    }

    #[test]
    fn tableau_rows_sum_to_nodes() {
        assert!((A21 - C2).abs() < 1e-15);
        assert!((A31 + A32 - C3).abs() < 1e-15);
        assert!((A41 + A42 + A43 - C4).abs() < 1e-15);
        assert!((A51 + A52 + A53 + A54 - C5).abs() < 1e-14);
        assert!((A61 + A62 + A63 + A64 + A65 - 1.0).abs() < 1e-14);
        assert!((B1 + B3 + B4 + B5 + B6 - 1.0).abs() < 1e-15);
        assert!((E1 + E3 + E4 + E5 + E6 + E7).abs() < 1e-15);
    }

    #[test]
    fn tracks_harmonic_oscillator() {
        let osc = Oscillator { omega: 3.0 };
        let grid = TimeGrid::linspace(0.0, 10.0, 201).unwrap();
        let opts = SolverOptions {
            rtol: 1e-10,
            atol_radius: 1e-12,
            atol_velocity: 1e-12,
            ..Default::default()
        };
        let traj = integrate(&osc, &grid, &opts);
        for (t, r) in traj.times().iter().zip(traj.radius()) {
            let exact = 2.0 + (3.0 * t).cos();
            assert!((r - exact).abs() < 1e-7, "t = {t}: {r} vs {exact}");
        }
    }

    #[test]
    fn lands_exactly_on_grid_points() {
        let osc = Oscillator { omega: 1.0 };
        let grid = TimeGrid::from_points(vec![0.0, 0.1, 0.35, 1.0, 4.0]).unwrap();
        let traj = integrate(&osc, &grid, &SolverOptions::default());
        assert_eq!(traj.times(), grid.points());
        let last = traj.final_state().unwrap();
        assert!((last.radius - (2.0 + 4.0f64.cos())).abs() < 1e-6);
    }

    #[test]
    fn explicit_initial_step_is_honoured() {
        let osc = Oscillator { omega: 1.0 };
        let grid = TimeGrid::linspace(0.0, 1.0, 3).unwrap();
        let opts = SolverOptions {
            initial_step: 1e-4,
            ..Default::default()
        };
        let traj = integrate(&osc, &grid, &opts);
        assert!((traj.radius()[2] - (2.0 + 1.0f64.cos())).abs() < 1e-6);
    }

    #[test]
    fn budget_exhaustion_is_reported() {
        let osc = Oscillator { omega: 50.0 };
        let grid = TimeGrid::linspace(0.0, 10.0, 3).unwrap();
        let opts = SolverOptions {
            max_steps: 10,
            ..Default::default()
        };
        let err = GridIntegrator::new(Arc::new(DormandPrince45::new()))
            .integrate(&osc, State::new(3.0, 0.0), &grid, &opts, &NoOpObserver::new(), 0)
            .unwrap_err();
        assert!(matches!(err, SimError::StepBudgetExceeded { steps: 10, .. }));
    }

    #[test]
    fn singular_system_underflows() {
        // y' = 1 / (1 - t) blows up at t = 1.
        struct Blowup;
        impl OdeSystem for Blowup {
            fn derivative(&self, t: f64, s: State) -> Result<State, SimError> {
                Ok(State::new(1.0 / (1.0 - t), s.velocity))
            }
        }
        let grid = TimeGrid::linspace(0.0, 2.0, 3).unwrap();
        let err = GridIntegrator::new(Arc::new(DormandPrince45::new()))
            .integrate(
                &Blowup,
                State::new(1.0, 0.0),
                &grid,
                &SolverOptions::default(),
                &NoOpObserver::new(),
                0,
            )
            .unwrap_err();
        assert!(err.is_tolerance_failure() || matches!(err, SimError::NumericalDomain { .. }));
    }

    #[test]
    fn rms_ratio_of_unit_errors_is_one() {
        let e = State::new(2.0, 3.0);
        assert!((rms_ratio(e, e) - 1.0).abs() < f64::EPSILON);
    }
}
