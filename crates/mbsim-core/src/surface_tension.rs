//! Marmottant model for the dynamic surface tension of a coated bubble.
//!
//! The shell behaves in three regimes depending on the radius:
//!
//! ```text
//!   σ(R) = 0                          R ≤ R_buckling      (buckled)
//!   σ(R) = χ · ((R / R_buckling)² − 1)  R_buckling < R < R_rupture  (elastic)
//!   σ(R) = σ0                         R ≥ R_rupture       (ruptured)
//! ```
//!
//! with `R_buckling = R0`. σ is continuous at the buckling radius. The
//! rupture radius depends on the shell's [`RuptureModel`]: the linear rule
//! `R_buckling · (1 + σ0/χ)` leaves a downward jump of `σ0 + σ0²/χ` where the
//! elastic branch hands over to σ0; the matched rule `R_buckling · √(1 + σ0/χ)`
//! is continuous there.

use crate::params::{PhysicalConstants, RuptureModel, ShellParameters};

/// Regime of the shell at a given radius.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellRegime {
    /// Compressed below the buckling radius; the shell carries no tension.
    Buckled,
    /// Between buckling and rupture; tension grows with area.
    Elastic,
    /// Stretched past the rupture radius; the bare interface is exposed.
    Ruptured,
}

/// Piecewise surface-tension law for one shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarmottantShell {
    elasticity: f64,
    bulk_tension: f64,
    r_buckling: f64,
    r_rupture: f64,
    rupture: RuptureModel,
}

impl MarmottantShell {
    /// Build the law for a validated shell around the bubble's initial radius.
    #[must_use]
    pub fn new(constants: &PhysicalConstants, shell: &ShellParameters) -> Self {
        let elasticity = shell.elasticity();
        let r_buckling = constants.initial_radius;
        let rupture = shell.rupture();
        Self {
            elasticity,
            bulk_tension: constants.surface_tension,
            r_buckling,
            r_rupture: r_buckling * rupture.rupture_ratio(constants.surface_tension, elasticity),
            rupture,
        }
    }

    /// Buckling radius (equal to R0).
    #[must_use]
    pub fn buckling_radius(&self) -> f64 {
        self.r_buckling
    }

    /// Rupture radius.
    #[must_use]
    pub fn rupture_radius(&self) -> f64 {
        self.r_rupture
    }

    /// Rupture model the boundary was derived with.
    #[must_use]
    pub fn rupture_model(&self) -> RuptureModel {
        self.rupture
    }

    /// Drop in σ when the elastic branch hands over to the rupture plateau.
    #[must_use]
    pub fn rupture_jump(&self) -> f64 {
        self.elastic_tension(self.r_rupture) - self.bulk_tension
    }

    /// Shell elasticity χ.
    #[must_use]
    pub fn elasticity(&self) -> f64 {
        self.elasticity
    }

    /// Classify a radius.
    #[inline]
    #[must_use]
    pub fn regime(&self, radius: f64) -> ShellRegime {
        if radius <= self.r_buckling {
            ShellRegime::Buckled
        } else if radius >= self.r_rupture {
            ShellRegime::Ruptured
        } else {
            ShellRegime::Elastic
        }
    }

    /// Surface tension σ(R), in N/m.
    #[inline]
    #[must_use]
    pub fn tension(&self, radius: f64) -> f64 {
        match self.regime(radius) {
            ShellRegime::Buckled => 0.0,
            ShellRegime::Elastic => self.elastic_tension(radius),
            ShellRegime::Ruptured => self.bulk_tension,
        }
    }

    /// The elastic-branch formula, evaluated regardless of regime.
    #[inline]
    #[must_use]
    pub fn elastic_tension(&self, radius: f64) -> f64 {
        let ratio = radius / self.r_buckling;
        self.elasticity * (ratio * ratio - 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(chi: f64) -> MarmottantShell {
        MarmottantShell::new(
            &PhysicalConstants::default(),
            &ShellParameters::new(chi).unwrap(),
        )
    }

    fn matched_shell(chi: f64) -> MarmottantShell {
        MarmottantShell::new(
            &PhysicalConstants::default(),
            &ShellParameters::with_rupture(chi, RuptureModel::Matched).unwrap(),
        )
    }

    #[test]
    fn boundaries_of_default_shell() {
        let s = shell(1.0);
        assert!((s.buckling_radius() - 2.0e-6).abs() < 1e-18);
        assert!((s.rupture_radius() - 2.144e-6).abs() < 1e-15);
    }

    #[test]
    fn zero_tension_at_buckling_radius() {
        let s = shell(1.0);
        let rb = s.buckling_radius();
        assert_eq!(s.regime(rb), ShellRegime::Buckled);
        assert_eq!(s.tension(rb), 0.0);
        assert!(s.elastic_tension(rb).abs() < 1e-15);
    }

    #[test]
    fn bulk_tension_at_rupture_radius() {
        for chi in [0.25, 0.5, 1.0, 2.0] {
            let s = shell(chi);
            let rr = s.rupture_radius();
            assert_eq!(s.regime(rr), ShellRegime::Ruptured);
            assert!((s.tension(rr) - 0.072).abs() < 1e-15);
        }
    }

    #[test]
    fn matched_rupture_is_continuous() {
        for chi in [0.25, 0.5, 1.0, 2.0] {
            let s = matched_shell(chi);
            let rr = s.rupture_radius();
            assert!((s.elastic_tension(rr) - 0.072).abs() < 1e-12, "chi = {chi}");
            assert!(s.rupture_jump().abs() < 1e-12);
            let below = rr * (1.0 - 1e-9);
            assert!((s.tension(below) - s.tension(rr)).abs() < 1e-6);
        }
    }

    #[test]
    fn linear_rupture_jump() {
        for chi in [0.5, 1.0] {
            let s = shell(chi);
            let expected = 0.072 + 0.072 * 0.072 / chi;
            assert!((s.rupture_jump() - expected).abs() < 1e-12, "chi = {chi}");
        }
    }

    #[test]
    fn regimes_by_radius() {
        let s = shell(1.0);
        assert_eq!(s.regime(1.0e-6), ShellRegime::Buckled);
        assert_eq!(s.regime(2.05e-6), ShellRegime::Elastic);
        assert_eq!(s.regime(3.0e-6), ShellRegime::Ruptured);
        assert_eq!(s.tension(1.0e-6), 0.0);
        assert!((s.tension(3.0e-6) - 0.072).abs() < f64::EPSILON);
    }

    #[test]
    fn elastic_tension_midpoint() {
        let s = shell(1.0);
        let r = 2.0e-6 * 1.05;
        assert!((s.tension(r) - (1.05f64 * 1.05 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn softer_shell_ruptures_later() {
        assert!(shell(0.5).rupture_radius() > shell(1.0).rupture_radius());
    }
}
