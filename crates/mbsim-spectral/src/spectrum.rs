//! One-sided magnitude spectrum.

use serde::Serialize;

/// A spectral peak.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Peak {
    /// Bin index.
    pub bin: usize,
    /// Bin frequency (Hz).
    pub frequency: f64,
    /// Magnitude at the bin.
    pub magnitude: f64,
}

/// Frequency bins and magnitudes of a real signal, from DC to Nyquist.
///
/// `frequencies` and `magnitudes` always have the same length,
/// `⌊N/2⌋ + 1` for a signal of `N` samples.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    magnitudes: Vec<f64>,
    resolution: f64,
    sample_count: usize,
}

impl Spectrum {
    pub(crate) fn new(magnitudes: Vec<f64>, resolution: f64, sample_count: usize) -> Self {
        let frequencies = (0..magnitudes.len())
            .map(|k| k as f64 * resolution)
            .collect();
        Self {
            frequencies,
            magnitudes,
            resolution,
            sample_count,
        }
    }

    /// Bin frequencies in Hz.
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Magnitude `|X_k|` at every bin.
    #[must_use]
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Number of bins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    /// Whether the spectrum has no bins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Number of samples in the analyzed signal.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    /// Bin width `1 / (N · dt)`.
    #[must_use]
    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    /// Nyquist frequency `1 / (2 · dt)`.
    #[must_use]
    pub fn nyquist(&self) -> f64 {
        self.resolution * self.sample_count as f64 / 2.0
    }

    /// Nearest bin to `frequency`, or `None` outside the spectrum.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn bin_of(&self, frequency: f64) -> Option<usize> {
        if !frequency.is_finite() || frequency < 0.0 || self.resolution <= 0.0 {
            return None;
        }
        let bin = (frequency / self.resolution).round();
        if bin >= self.len() as f64 {
            return None;
        }
        Some(bin as usize)
    }

    /// Magnitude at the bin nearest to `frequency`.
    #[must_use]
    pub fn magnitude_at(&self, frequency: f64) -> Option<f64> {
        self.bin_of(frequency).map(|bin| self.magnitudes[bin])
    }

    /// Largest bin at or above `min_frequency`.
    #[must_use]
    pub fn peak_above(&self, min_frequency: f64) -> Option<Peak> {
        self.frequencies
            .iter()
            .zip(&self.magnitudes)
            .enumerate()
            .filter(|(_, (f, _))| **f >= min_frequency)
            .fold(None, |best: Option<Peak>, (bin, (&frequency, &magnitude))| match best {
                Some(p) if p.magnitude >= magnitude => Some(p),
                _ => Some(Peak {
                    bin,
                    frequency,
                    magnitude,
                }),
            })
    }

    /// Largest magnitude excluding DC.
    #[must_use]
    pub fn max_non_dc(&self) -> Option<f64> {
        self.magnitudes.iter().skip(1).copied().reduce(f64::max)
    }

    /// Whether `bin` is at least as large as every bin within `radius` of it.
    #[must_use]
    pub fn is_local_peak(&self, bin: usize, radius: usize) -> bool {
        let Some(&center) = self.magnitudes.get(bin) else {
            return false;
        };
        let lo = bin.saturating_sub(radius);
        let hi = (bin + radius).min(self.len() - 1);
        self.magnitudes[lo..=hi].iter().all(|&m| m <= center)
    }

    /// Magnitudes divided by the largest non-DC magnitude.
    ///
    /// Returns all zeros when every non-DC bin is zero.
    #[must_use]
    pub fn normalized(&self) -> Vec<f64> {
        match self.max_non_dc() {
            Some(peak) if peak > 0.0 => self.magnitudes.iter().map(|m| m / peak).collect(),
            _ => vec![0.0; self.len()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spectrum(magnitudes: Vec<f64>) -> Spectrum {
        let n = 2 * (magnitudes.len() - 1);
        Spectrum::new(magnitudes, 10.0, n)
    }

    #[test]
    fn frequencies_follow_resolution() {
        let s = spectrum(vec![0.0; 5]);
        assert_eq!(s.frequencies(), &[0.0, 10.0, 20.0, 30.0, 40.0]);
        assert_eq!(s.sample_count(), 8);
        assert!((s.nyquist() - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn bin_lookup_rounds_to_nearest() {
        let s = spectrum(vec![0.0; 5]);
        assert_eq!(s.bin_of(0.0), Some(0));
        assert_eq!(s.bin_of(14.9), Some(1));
        assert_eq!(s.bin_of(15.1), Some(2));
        assert_eq!(s.bin_of(40.0), Some(4));
        assert_eq!(s.bin_of(46.0), None);
        assert_eq!(s.bin_of(-1.0), None);
        assert_eq!(s.bin_of(f64::NAN), None);
    }

    #[test]
    fn peak_above_skips_low_bins() {
        let s = spectrum(vec![9.0, 1.0, 4.0, 2.0, 3.0]);
        let p = s.peak_above(5.0).unwrap();
        assert_eq!(p.bin, 2);
        assert!((p.frequency - 20.0).abs() < f64::EPSILON);
        assert_eq!(s.peak_above(0.0).unwrap().bin, 0);
        assert!(s.peak_above(100.0).is_none());
    }

    #[test]
    fn local_peak_window() {
        let s = spectrum(vec![9.0, 1.0, 4.0, 2.0, 3.0]);
        assert!(s.is_local_peak(2, 1));
        assert!(!s.is_local_peak(2, 2));
        assert!(s.is_local_peak(4, 1));
        assert!(s.is_local_peak(0, 4));
        assert!(!s.is_local_peak(9, 1));
    }

    #[test]
    fn normalized_by_largest_non_dc() {
        let s = spectrum(vec![9.0, 1.0, 4.0, 2.0, 3.0]);
        assert_eq!(s.max_non_dc(), Some(4.0));
        assert_eq!(s.normalized(), vec![2.25, 0.25, 1.0, 0.5, 0.75]);
        assert!((s.magnitude_at(20.0).unwrap() - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_spectrum_normalizes_to_zero() {
        let s = spectrum(vec![1.0, 0.0, 0.0]);
        assert_eq!(s.normalized(), vec![0.0; 3]);
    }
}
