//! Resting versus active harmonic comparison.

use serde::Serialize;

use mbsim_core::SimError;

use crate::interfaces::ScenarioOutcome;
use crate::scenario::{ScenarioKind, ScenarioResult};

/// Half-width, in bins, of the window in which the drive bin must be a
/// local maximum.
pub const LOCAL_PEAK_RADIUS: usize = 5;

/// Harmonic summary of one scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioHarmonics {
    /// Human-readable label.
    pub label: &'static str,
    /// Shell elasticity χ of the run.
    pub stiffness: f64,
    /// Drive bin is a local maximum of the spectrum.
    pub fundamental_is_local_peak: bool,
    /// Drive bin exceeds every measured harmonic.
    pub fundamental_dominates: bool,
    /// Second-harmonic magnitude.
    pub second_magnitude: f64,
    /// Second harmonic relative to the fundamental.
    pub second_relative_to_fundamental: f64,
    /// Second harmonic relative to the largest non-DC magnitude.
    pub second_relative_to_peak: f64,
}

impl ScenarioHarmonics {
    fn from_result(result: &ScenarioResult) -> Result<Self, SimError> {
        let signature = &result.signature;
        let (first, second) = signature
            .level(1)
            .zip(signature.level(2))
            .ok_or_else(|| {
                SimError::invalid(format!(
                    "{} has no second-harmonic measurement",
                    result.label
                ))
            })?;
        Ok(Self {
            label: result.label,
            stiffness: result.stiffness,
            fundamental_is_local_peak: result.spectrum.is_local_peak(first.bin, LOCAL_PEAK_RADIUS),
            fundamental_dominates: signature.fundamental_dominates(),
            second_magnitude: second.magnitude,
            second_relative_to_fundamental: second.relative_to_fundamental,
            second_relative_to_peak: second.relative_to_peak,
        })
    }
}

/// Side-by-side harmonic summary of the two scenarios.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicComparison {
    /// Baseline scenario.
    pub resting: ScenarioHarmonics,
    /// Softened-shell scenario.
    pub active: ScenarioHarmonics,
    /// Active over resting second-harmonic level, both relative to their
    /// largest non-DC magnitude.
    pub second_harmonic_ratio: f64,
}

impl HarmonicComparison {
    /// Whether the active shell shows the stronger relative second harmonic.
    #[must_use]
    pub fn active_second_harmonic_is_stronger(&self) -> bool {
        self.second_harmonic_ratio > 1.0
    }
}

/// Compare the resting and active runs.
///
/// Fails with the scenario's own error when either run failed.
pub fn compare_scenarios(outcomes: &[ScenarioOutcome]) -> Result<HarmonicComparison, SimError> {
    let find = |kind: ScenarioKind| -> Result<&ScenarioResult, SimError> {
        let outcome = outcomes
            .iter()
            .find(|o| o.kind == kind)
            .ok_or_else(|| SimError::invalid(format!("no {kind} scenario was run")))?;
        outcome.outcome.as_ref().map_err(Clone::clone)
    };

    let resting = ScenarioHarmonics::from_result(find(ScenarioKind::Resting)?)?;
    let active = ScenarioHarmonics::from_result(find(ScenarioKind::Active)?)?;
    let levels = (
        resting.second_relative_to_peak,
        active.second_relative_to_peak,
    );
    let second_harmonic_ratio = match levels {
        (r, a) if r > 0.0 => a / r,
        (_, a) if a > 0.0 => f64::INFINITY,
        _ => 1.0,
    };

    Ok(HarmonicComparison {
        resting,
        active,
        second_harmonic_ratio,
    })
}
