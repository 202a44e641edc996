//! Forward DFT of real signals.

use parking_lot::Mutex;
use rustfft::num_complex::Complex;
use rustfft::FftPlanner;
use tracing::trace;

use mbsim_core::{SimError, Trajectory};

use crate::spectrum::Spectrum;

/// Computes one-sided magnitude spectra.
///
/// The planner caches FFT plans per length. It sits behind a mutex so one
/// analyzer can be shared by scenario runs on different threads; the lock is
/// held only while planning.
pub struct SpectrumAnalyzer {
    planner: Mutex<FftPlanner<f64>>,
}

impl SpectrumAnalyzer {
    /// Create a new analyzer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            planner: Mutex::new(FftPlanner::new()),
        }
    }

    /// Unnormalized forward DFT of `signal` sampled every `dt` seconds.
    ///
    /// Returns bins `k / (N · dt)` for `k = 0..=⌊N/2⌋` with magnitudes `|X_k|`.
    ///
    /// ```
    /// use mbsim_spectral::SpectrumAnalyzer;
    ///
    /// let signal = [1.0, 0.0, -1.0, 0.0];
    /// let spectrum = SpectrumAnalyzer::new().analyze(&signal, 0.25).unwrap();
    /// assert_eq!(spectrum.frequencies(), &[0.0, 1.0, 2.0]);
    /// assert!((spectrum.magnitudes()[1] - 2.0).abs() < 1e-12);
    /// ```
    pub fn analyze(&self, signal: &[f64], dt: f64) -> Result<Spectrum, SimError> {
        if signal.is_empty() {
            return Err(SimError::invalid("cannot analyze an empty signal"));
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimError::invalid(format!(
                "sample spacing must be positive and finite (got {dt})"
            )));
        }
        if let Some(i) = signal.iter().position(|x| !x.is_finite()) {
            return Err(SimError::invalid(format!(
                "signal contains a non-finite sample at index {i}"
            )));
        }

        let n = signal.len();
        let fft = self.planner.lock().plan_fft_forward(n);
        let mut buffer: Vec<Complex<f64>> =
            signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
        fft.process(&mut buffer);

        let bins = n / 2 + 1;
        let magnitudes = buffer[..bins].iter().map(|c| c.norm()).collect();
        trace!(samples = n, bins, dt, "Spectrum computed");
        Ok(Spectrum::new(magnitudes, 1.0 / (n as f64 * dt), n))
    }

    /// Spectrum of the radius deviation `R(t) − r0`.
    ///
    /// The trajectory must be sampled on a uniform grid.
    pub fn analyze_deviation(&self, trajectory: &Trajectory, r0: f64) -> Result<Spectrum, SimError> {
        let dt = trajectory.sample_spacing().ok_or_else(|| {
            SimError::invalid("spectral analysis needs at least 2 uniformly spaced samples")
        })?;
        self.analyze(&trajectory.radius_deviation(r0), dt)
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
