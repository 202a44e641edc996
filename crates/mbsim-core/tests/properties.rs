//! Property-based tests for the shell law and the integrators.

use std::sync::Arc;

use proptest::prelude::*;

use mbsim_core::dopri::DormandPrince45;
use mbsim_core::observers::NoOpObserver;
use mbsim_core::rk4::ClassicalRk4;
use mbsim_core::{
    BubbleDynamics, DriveParameters, GridIntegrator, Integrator, MarmottantShell,
    PhysicalConstants, RuptureModel, ShellParameters, ShellRegime, SolverOptions, TimeGrid,
    Trajectory,
};

fn shell(chi: f64, model: RuptureModel) -> MarmottantShell {
    MarmottantShell::new(
        &PhysicalConstants::default(),
        &ShellParameters::with_rupture(chi, model).unwrap(),
    )
}

fn run(integrator: &dyn Integrator, chi: f64, grid: &TimeGrid) -> Trajectory {
    let system = BubbleDynamics::new(
        PhysicalConstants::default(),
        DriveParameters::default(),
        ShellParameters::new(chi).unwrap(),
    )
    .unwrap();
    integrator
        .integrate(
            &system,
            system.initial_state(),
            grid,
            &SolverOptions::default(),
            &NoOpObserver::new(),
            0,
        )
        .unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// σ never decreases across the elastic regime.
    #[test]
    fn elastic_tension_is_monotonic(chi in 0.05f64..10.0, a in 0.0f64..1.0, b in 0.0f64..1.0) {
        let s = shell(chi, RuptureModel::Linear);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let span = s.rupture_radius() - s.buckling_radius();
        let r_lo = s.buckling_radius() + span * lo;
        let r_hi = s.buckling_radius() + span * hi;
        prop_assert!(s.tension(r_lo) <= s.tension(r_hi), "chi = {}", chi);
    }

    /// σ is continuous at the buckling radius for any χ.
    #[test]
    fn tension_continuous_at_buckling(chi in 0.05f64..10.0) {
        let s = shell(chi, RuptureModel::Linear);
        let rb = s.buckling_radius();
        let above = s.tension(rb * (1.0 + 1e-9));
        prop_assert!(above >= 0.0);
        prop_assert!(above < chi * 1e-8);
        prop_assert_eq!(s.tension(rb), 0.0);
    }

    /// σ is zero when buckled and σ0 once ruptured, whatever the model.
    #[test]
    fn plateaus_hold(chi in 0.05f64..10.0, matched in any::<bool>(), frac in 0.1f64..1.0) {
        let model = if matched { RuptureModel::Matched } else { RuptureModel::Linear };
        let s = shell(chi, model);
        let compressed = s.buckling_radius() * frac;
        let stretched = s.rupture_radius() / frac;
        prop_assert_eq!(s.regime(compressed), ShellRegime::Buckled);
        prop_assert_eq!(s.tension(compressed), 0.0);
        prop_assert_eq!(s.regime(stretched), ShellRegime::Ruptured);
        prop_assert!((s.tension(stretched) - 0.072).abs() < 1e-15);
    }

    /// Scaling χ yields a new shell and leaves the source untouched.
    #[test]
    fn scaling_does_not_mutate(chi in 0.05f64..10.0, factor in 0.01f64..4.0) {
        let base = ShellParameters::new(chi).unwrap();
        let scaled = base.scaled(factor).unwrap();
        prop_assert_eq!(base.elasticity(), chi);
        prop_assert!((scaled.elasticity() - chi * factor).abs() <= 1e-12 * chi * factor);
        prop_assert_eq!(scaled.rupture(), base.rupture());
    }

    /// Fixed-step RK4 tracks the adaptive solution over one drive period.
    #[test]
    fn rk4_tracks_dopri_over_one_period(chi in 0.3f64..2.0) {
        let grid = TimeGrid::linspace(0.0, 2e-7, 201).unwrap();
        let dopri = run(&GridIntegrator::new(Arc::new(DormandPrince45::new())), chi, &grid);
        let rk4 = run(&GridIntegrator::new(Arc::new(ClassicalRk4::new())), chi, &grid);
        let r0 = PhysicalConstants::default().initial_radius;
        for (a, b) in dopri.radius().iter().zip(rk4.radius()) {
            prop_assert!((a - b).abs() < 1e-3 * r0, "chi = {}: {} vs {}", chi, a, b);
        }
    }
}
