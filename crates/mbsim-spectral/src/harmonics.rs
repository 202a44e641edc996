//! Harmonic signature of a driven oscillator.

use serde::Serialize;

use mbsim_core::SimError;

use crate::spectrum::Spectrum;

/// Spectral level at one integer multiple of the drive frequency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HarmonicLevel {
    /// Harmonic order (1 = fundamental).
    pub order: u32,
    /// Nominal frequency `order · fundamental` (Hz).
    pub frequency: f64,
    /// Nearest spectral bin.
    pub bin: usize,
    /// Magnitude at that bin.
    pub magnitude: f64,
    /// Magnitude divided by the fundamental's magnitude.
    pub relative_to_fundamental: f64,
    /// Magnitude divided by the largest non-DC magnitude of the spectrum.
    pub relative_to_peak: f64,
}

/// Levels at the fundamental and its harmonics up to a maximum order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonicSignature {
    fundamental: f64,
    levels: Vec<HarmonicLevel>,
}

impl HarmonicSignature {
    /// Measure orders `1..=max_order` of `fundamental` in `spectrum`.
    ///
    /// Fails when a harmonic lies beyond the last bin.
    pub fn measure(
        spectrum: &Spectrum,
        fundamental: f64,
        max_order: u32,
    ) -> Result<Self, SimError> {
        if !fundamental.is_finite() || fundamental <= 0.0 {
            return Err(SimError::invalid(format!(
                "fundamental frequency must be positive and finite (got {fundamental})"
            )));
        }
        if max_order == 0 {
            return Err(SimError::invalid("harmonic order limit must be at least 1"));
        }

        let peak = spectrum.max_non_dc().unwrap_or(0.0);
        let mut levels = Vec::with_capacity(max_order as usize);
        for order in 1..=max_order {
            let frequency = fundamental * f64::from(order);
            let bin = spectrum.bin_of(frequency).ok_or_else(|| {
                SimError::invalid(format!(
                    "harmonic {order} at {frequency:e} Hz is above the Nyquist frequency ({:e} Hz)",
                    spectrum.nyquist()
                ))
            })?;
            let magnitude = spectrum.magnitudes()[bin];
            let base = levels
                .first()
                .map_or(magnitude, |first: &HarmonicLevel| first.magnitude);
            levels.push(HarmonicLevel {
                order,
                frequency,
                bin,
                magnitude,
                relative_to_fundamental: ratio(magnitude, base),
                relative_to_peak: ratio(magnitude, peak),
            });
        }

        Ok(Self {
            fundamental,
            levels,
        })
    }

    /// Drive frequency the signature was measured against.
    #[must_use]
    pub fn fundamental(&self) -> f64 {
        self.fundamental
    }

    /// Levels ordered by harmonic order.
    #[must_use]
    pub fn levels(&self) -> &[HarmonicLevel] {
        &self.levels
    }

    /// Level of a given order.
    #[must_use]
    pub fn level(&self, order: u32) -> Option<&HarmonicLevel> {
        self.levels.iter().find(|l| l.order == order)
    }

    /// Whether the fundamental exceeds every measured harmonic.
    #[must_use]
    pub fn fundamental_dominates(&self) -> bool {
        match self.levels.split_first() {
            Some((first, rest)) => rest.iter().all(|l| l.magnitude < first.magnitude),
            None => false,
        }
    }
}

fn ratio(value: f64, reference: f64) -> f64 {
    if reference > 0.0 {
        value / reference
    } else {
        0.0
    }
}
