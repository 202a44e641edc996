//! Progress tracking types and utilities.

use crate::constants::PROGRESS_REPORT_THRESHOLD;

/// Progress update sent from integrators to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressUpdate {
    /// Run index (for multi-scenario runs).
    pub run_index: usize,
    /// Name of the integration method producing this update.
    pub method: &'static str,
    /// Current progress as a fraction in [0.0, 1.0].
    pub progress: f64,
    /// Number of grid samples produced so far.
    pub current_sample: usize,
    /// Total number of grid samples.
    pub total_samples: usize,
    /// Whether this is the final update.
    pub done: bool,
}

impl ProgressUpdate {
    /// Create a new progress update.
    #[must_use]
    pub fn new(run_index: usize, method: &'static str, current: usize, total: usize) -> Self {
        Self {
            run_index,
            method,
            progress: fraction(current, total),
            current_sample: current,
            total_samples: total,
            done: false,
        }
    }

    /// Create a completion update.
    #[must_use]
    pub fn done(run_index: usize, method: &'static str, total: usize) -> Self {
        Self {
            run_index,
            method,
            progress: 1.0,
            current_sample: total,
            total_samples: total,
            done: true,
        }
    }
}

fn fraction(current: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        (current as f64 / total as f64).clamp(0.0, 1.0)
    }
}

/// Decides when a sample count has advanced enough to be worth reporting.
#[derive(Debug, Clone)]
pub struct ProgressThrottle {
    last_reported: f64,
    threshold: f64,
}

impl ProgressThrottle {
    /// Throttle with the default 1% threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_threshold(PROGRESS_REPORT_THRESHOLD)
    }

    /// Throttle with a custom threshold.
    #[must_use]
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            last_reported: 0.0,
            threshold,
        }
    }

    /// Returns true (and records it) if `progress` moved by at least the threshold.
    #[inline]
    pub fn should_report(&mut self, progress: f64) -> bool {
        if progress - self.last_reported >= self.threshold {
            self.last_reported = progress;
            true
        } else {
            false
        }
    }
}

impl Default for ProgressThrottle {
    fn default() -> Self {
        Self::new()
    }
}
