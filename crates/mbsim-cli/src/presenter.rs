//! CLI result presenter.

use mbsim_orchestration::{ExperimentConfig, HarmonicComparison, ResultPresenter, ScenarioResult};

use crate::output::{
    format_duration, format_frequency, format_length, format_number, format_percent,
};
use crate::ui::{highlight, print_error, print_header, print_success, print_warning};

/// CLI result presenter.
pub struct CLIResultPresenter {
    verbose: bool,
    quiet: bool,
}

impl CLIResultPresenter {
    #[must_use]
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }
}

impl ResultPresenter for CLIResultPresenter {
    fn present_config(&self, config: &ExperimentConfig) {
        if self.quiet {
            return;
        }
        print_header("Microbubble harmonic comparison");
        println!(
            "Drive: {} at {:.1} kPa",
            format_frequency(config.drive.frequency),
            config.drive.pressure_amplitude / 1e3
        );
        println!(
            "Bubble: R0 = {}, shell χ = {} N/m (active ×{})",
            format_length(config.constants.initial_radius),
            config.shell.elasticity(),
            config.active_stiffness_factor
        );
        println!(
            "Grid: {} samples over {:.2} µs ({:.1} samples per cycle)",
            format_number(config.samples as u64),
            config.duration * 1e6,
            config.samples_per_cycle()
        );
        println!("Method: {}", config.method);
        if self.verbose {
            println!(
                "Tolerances: rtol = {:e}, max steps = {}",
                config.solver.rtol,
                format_number(config.solver.max_steps)
            );
        }
    }

    fn present_scenario(&self, result: &ScenarioResult) {
        if self.quiet {
            let second = result
                .signature
                .level(2)
                .map_or(f64::NAN, |l| l.relative_to_peak);
            println!("{}\t{}\t{second:.6e}", result.kind, result.stiffness);
            return;
        }

        println!();
        print_header(result.label);
        println!("Stiffness χ: {} N/m", result.stiffness);
        println!(
            "Duration: {} ({})",
            format_duration(result.duration),
            result.method
        );
        let trajectory = &result.trajectory;
        if let (Some(min), Some(max)) = (trajectory.min_radius(), trajectory.max_radius()) {
            println!("Radius: {} .. {}", format_length(min), format_length(max));
        }

        println!(
            "  {:<6} {:>12} {:>14} {:>12} {:>12}",
            "order", "frequency", "magnitude", "vs f0", "vs peak"
        );
        for level in result.signature.levels() {
            println!(
                "  {:<6} {:>12} {:>14.4e} {:>12} {:>12}",
                level.order,
                format_frequency(level.frequency),
                level.magnitude,
                format_percent(level.relative_to_fundamental),
                format_percent(level.relative_to_peak),
            );
        }

        if self.verbose {
            if let Some(peak) = result.spectrum.peak_above(result.spectrum.resolution()) {
                println!(
                    "Largest non-DC bin: {} at {} ({:.4e})",
                    peak.bin,
                    format_frequency(peak.frequency),
                    peak.magnitude
                );
            }
            println!(
                "Resolution: {}, Nyquist: {}",
                format_frequency(result.spectrum.resolution()),
                format_frequency(result.spectrum.nyquist())
            );
        }
    }

    fn present_comparison(&self, comparison: &HarmonicComparison) {
        if self.quiet {
            println!("ratio\t{:.6}", comparison.second_harmonic_ratio);
            return;
        }

        println!();
        print_header("Comparison");
        for side in [&comparison.resting, &comparison.active] {
            let marker = if side.fundamental_is_local_peak && side.fundamental_dominates {
                "dominant"
            } else {
                "not dominant"
            };
            println!(
                "  {:<32} χ = {:<6} 2nd harmonic {:>8}  fundamental {marker}",
                side.label,
                side.stiffness,
                format_percent(side.second_relative_to_peak)
            );
        }

        let ratio = if comparison.second_harmonic_ratio.is_finite() {
            format!("{:.3}", comparison.second_harmonic_ratio)
        } else {
            "∞".to_string()
        };
        let summary = format!("active/resting second-harmonic ratio: {}", highlight(&ratio));
        if comparison.active_second_harmonic_is_stronger() {
            print_success(&summary);
        } else {
            print_warning(&summary);
        }
    }

    fn present_error(&self, error: &str) {
        print_error(error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbsim_orchestration::{compare_scenarios, execute_scenarios};

    fn short_config() -> ExperimentConfig {
        ExperimentConfig {
            duration: 1.0e-6,
            samples: 1001,
            ..Default::default()
        }
    }

    #[test]
    fn presenter_modes() {
        let presenter = CLIResultPresenter::new(true, false);
        assert!(presenter.verbose);
        assert!(!presenter.quiet);
        let presenter = CLIResultPresenter::new(false, true);
        assert!(presenter.quiet);
    }

    #[test]
    fn present_config_does_not_panic() {
        let config = ExperimentConfig::default();
        CLIResultPresenter::new(false, false).present_config(&config);
        CLIResultPresenter::new(true, false).present_config(&config);
        CLIResultPresenter::new(false, true).present_config(&config);
    }

    #[test]
    fn present_run_does_not_panic() {
        let outcomes = execute_scenarios(&short_config()).unwrap();
        let comparison = compare_scenarios(&outcomes).unwrap();
        for presenter in [
            CLIResultPresenter::new(false, false),
            CLIResultPresenter::new(true, false),
            CLIResultPresenter::new(false, true),
        ] {
            for outcome in &outcomes {
                presenter.present_scenario(outcome.outcome.as_ref().unwrap());
            }
            presenter.present_comparison(&comparison);
        }
    }

    #[test]
    fn present_infinite_ratio_does_not_panic() {
        let outcomes = execute_scenarios(&short_config()).unwrap();
        let mut comparison = compare_scenarios(&outcomes).unwrap();
        comparison.second_harmonic_ratio = f64::INFINITY;
        CLIResultPresenter::new(false, false).present_comparison(&comparison);
    }

    #[test]
    fn present_error_does_not_panic() {
        let presenter = CLIResultPresenter::new(false, false);
        presenter.present_error("radius left the physical domain");
        presenter.present_error("");
    }
}
