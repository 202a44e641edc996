//! CLI output formatting and result export.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use mbsim_orchestration::{
    ExperimentConfig, HarmonicComparison, ScenarioKind, ScenarioOutcome, ScenarioResult,
};

/// Format a duration for display.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 0.001 {
        format!("{:.2}µs", secs * 1_000_000.0)
    } else if secs < 1.0 {
        format!("{:.2}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{secs:.3}s")
    } else {
        let mins = (secs / 60.0).floor() as u64;
        let remaining = secs - (mins as f64 * 60.0);
        format!("{mins}m{remaining:.1}s")
    }
}

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a frequency in Hz with an SI prefix.
#[must_use]
pub fn format_frequency(hz: f64) -> String {
    let abs = hz.abs();
    if abs >= 1e6 {
        format!("{:.2} MHz", hz / 1e6)
    } else if abs >= 1e3 {
        format!("{:.2} kHz", hz / 1e3)
    } else {
        format!("{hz:.2} Hz")
    }
}

/// Format a length in metres as µm or nm.
#[must_use]
pub fn format_length(m: f64) -> String {
    if m.abs() >= 1e-6 {
        format!("{:.4} µm", m * 1e6)
    } else {
        format!("{:.2} nm", m * 1e9)
    }
}

/// Format a ratio as a percentage.
#[must_use]
pub fn format_percent(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.2}%", ratio * 100.0)
    } else {
        "n/a".to_string()
    }
}

/// A run that produced no result.
#[derive(Debug, Clone, Serialize)]
pub struct FailedScenario {
    /// Scenario kind.
    pub kind: ScenarioKind,
    /// Human-readable label.
    pub label: &'static str,
    /// Error message.
    pub error: String,
}

/// Everything written by `--output`, for an external plotter.
#[derive(Debug, Serialize)]
pub struct ExperimentReport<'a> {
    pub config: &'a ExperimentConfig,
    pub scenarios: Vec<&'a ScenarioResult>,
    pub failures: Vec<FailedScenario>,
    pub comparison: Option<&'a HarmonicComparison>,
}

impl<'a> ExperimentReport<'a> {
    /// Collect the successful runs and the failures of one experiment.
    #[must_use]
    pub fn new(
        config: &'a ExperimentConfig,
        outcomes: &'a [ScenarioOutcome],
        comparison: Option<&'a HarmonicComparison>,
    ) -> Self {
        let scenarios = outcomes
            .iter()
            .filter_map(|o| o.outcome.as_ref().ok())
            .collect();
        let failures = outcomes
            .iter()
            .filter_map(|o| {
                o.outcome.as_ref().err().map(|e| FailedScenario {
                    kind: o.kind,
                    label: o.label,
                    error: e.to_string(),
                })
            })
            .collect();
        Self {
            config,
            scenarios,
            failures,
            comparison,
        }
    }
}

/// Write a report as pretty-printed JSON.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be created or written.
pub fn write_report(path: &Path, report: &ExperimentReport<'_>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, report)?;
    writer.flush()
}
