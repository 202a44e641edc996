//! Modified Rayleigh-Plesset equation of motion.
//!
//! The bubble wall obeys
//!
//! ```text
//!   ρ_L R R̈ + 3/2 ρ_L Ṙ² = (P0 + 2σ0/R0)(R0/R)^{3κ}(1 − 3κṘ/c)
//!                         − P0 − P_drive(t) − 2σ(R)/R − 4μ_L Ṙ/R
//! ```
//!
//! with σ(R) from the Marmottant shell. It is integrated as the first-order
//! system `(R, Ṙ)' = (Ṙ, R̈)`.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::params::{DriveParameters, PhysicalConstants, ShellParameters};
use crate::surface_tension::MarmottantShell;

/// Radial state of the bubble wall.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    /// Radius R (m).
    pub radius: f64,
    /// Wall velocity Ṙ (m/s).
    pub velocity: f64,
}

impl State {
    /// Create a state.
    #[must_use]
    pub const fn new(radius: f64, velocity: f64) -> Self {
        Self { radius, velocity }
    }

    /// A bubble at rest with the given radius.
    #[must_use]
    pub const fn at_rest(radius: f64) -> Self {
        Self::new(radius, 0.0)
    }

    /// `self + h · k`.
    #[inline]
    #[must_use]
    pub fn add_scaled(self, k: Self, h: f64) -> Self {
        Self {
            radius: self.radius + h * k.radius,
            velocity: self.velocity + h * k.velocity,
        }
    }

    /// Whether both components are finite.
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.radius.is_finite() && self.velocity.is_finite()
    }

    /// Whether the state lies in the physical domain (finite, R > 0).
    #[inline]
    #[must_use]
    pub fn is_physical(&self) -> bool {
        self.is_finite() && self.radius > 0.0
    }
}

impl Add for State {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.radius + rhs.radius, self.velocity + rhs.velocity)
    }
}

impl Sub for State {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.radius - rhs.radius, self.velocity - rhs.velocity)
    }
}

impl Mul<f64> for State {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.radius * rhs, self.velocity * rhs)
    }
}

/// A first-order ODE system over [`State`].
pub trait OdeSystem: Send + Sync {
    /// Time derivative of `state` at time `t`.
    fn derivative(&self, t: f64, state: State) -> Result<State, SimError>;
}

/// Right-hand side of the modified Rayleigh-Plesset equation for one shell.
///
/// Holds everything by value, so two instances with different shells never
/// share state.
#[derive(Debug, Clone, Copy)]
pub struct BubbleDynamics {
    constants: PhysicalConstants,
    drive: DriveParameters,
    shell: MarmottantShell,
    // Frozen pieces of the gas term
    gas_pressure0: f64,
    gas_exponent: f64,
}

impl BubbleDynamics {
    /// Build the evaluator. Constants and drive are validated here.
    pub fn new(
        constants: PhysicalConstants,
        drive: DriveParameters,
        shell: ShellParameters,
    ) -> Result<Self, SimError> {
        constants.validate()?;
        drive.validate()?;
        let law = MarmottantShell::new(&constants, &shell);
        if !law.rupture_radius().is_finite() {
            return Err(SimError::invalid(format!(
                "shell elasticity {:e} N/m gives an unbounded rupture radius",
                shell.elasticity()
            )));
        }
        Ok(Self {
            constants,
            drive,
            shell: law,
            gas_pressure0: constants.initial_gas_pressure(),
            gas_exponent: 3.0 * constants.polytropic_index,
        })
    }

    /// The shell law used by this evaluator.
    #[must_use]
    pub fn shell(&self) -> &MarmottantShell {
        &self.shell
    }

    /// Physical constants.
    #[must_use]
    pub fn constants(&self) -> &PhysicalConstants {
        &self.constants
    }

    /// Drive parameters.
    #[must_use]
    pub fn drive(&self) -> &DriveParameters {
        &self.drive
    }

    /// Initial state `(R0, 0)`.
    #[must_use]
    pub fn initial_state(&self) -> State {
        State::at_rest(self.constants.initial_radius)
    }

    /// Drive pressure at time `t`.
    #[inline]
    #[must_use]
    pub fn drive_pressure(&self, t: f64) -> f64 {
        self.drive.pressure_at(t)
    }

    /// Wall acceleration R̈.
    ///
    /// Rejects states outside the physical domain and any non-finite result.
    pub fn acceleration(&self, t: f64, state: State) -> Result<f64, SimError> {
        if !state.is_physical() {
            return Err(SimError::NumericalDomain {
                time: t,
                radius: state.radius,
            });
        }

        let State {
            radius: r,
            velocity: r_dot,
        } = state;
        let c = &self.constants;
        let sigma = self.shell.tension(r);

        let gas = self.gas_pressure0
            * (c.initial_radius / r).powf(self.gas_exponent)
            * (1.0 - self.gas_exponent * r_dot / c.sound_speed);
        let restoring = -c.ambient_pressure
            - self.drive_pressure(t)
            - 2.0 * sigma / r
            - 4.0 * c.viscosity * r_dot / r;

        let r_ddot =
            (gas + restoring - 1.5 * c.liquid_density * r_dot * r_dot) / (c.liquid_density * r);

        if r_ddot.is_finite() {
            Ok(r_ddot)
        } else {
            Err(SimError::NumericalDomain { time: t, radius: r })
        }
    }
}

impl OdeSystem for BubbleDynamics {
    #[inline]
    fn derivative(&self, t: f64, state: State) -> Result<State, SimError> {
        let r_ddot = self.acceleration(t, state)?;
        Ok(State::new(state.velocity, r_ddot))
    }
}
