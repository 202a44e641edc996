//! End-to-end CLI integration tests.

use assert_cmd::Command;
use predicates::prelude::*;

fn mbsim() -> Command {
    let mut cmd = Command::cargo_bin("mbsim").expect("binary not found");
    cmd.env_remove("MBSIM_FREQUENCY")
        .env_remove("MBSIM_PRESSURE_AMPLITUDE")
        .env_remove("MBSIM_METHOD")
        .env_remove("MBSIM_CONFIG")
        .env("NO_COLOR", "1");
    cmd
}

/// One microsecond at 1001 samples keeps each run fast.
const SHORT: [&str; 4] = ["--duration", "1e-6", "--samples", "1001"];

#[test]
fn help_flag() {
    mbsim()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("microbubble"))
        .stdout(predicate::str::contains("--elasticity"));
}

#[test]
fn version_flag() {
    mbsim()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mbsim"));
}

#[test]
fn short_run_reports_both_scenarios() {
    mbsim()
        .args(SHORT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Resting neuron"))
        .stdout(predicate::str::contains("Active neuron (depolarized Vm)"))
        .stdout(predicate::str::contains("5.00 MHz"))
        .stdout(predicate::str::contains("second-harmonic ratio"));
}

#[test]
fn quiet_mode_prints_summary_lines() {
    mbsim()
        .args(SHORT)
        .arg("-q")
        .assert()
        .success()
        .stdout(predicate::str::contains("Resting neuron\t1\t"))
        .stdout(predicate::str::contains("Active neuron (depolarized Vm)\t0.5\t"))
        .stdout(predicate::str::contains("ratio\t"));
}

#[test]
fn rk4_method() {
    mbsim()
        .args(SHORT)
        .args(["--method", "rk4", "--sequential", "-v"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rk4"));
}

#[test]
fn env_sets_drive_frequency() {
    mbsim()
        .args(SHORT)
        .env("MBSIM_FREQUENCY", "4e6")
        .assert()
        .success()
        .stdout(predicate::str::contains("4.00 MHz"));
}

#[test]
fn zero_elasticity_is_a_config_error() {
    mbsim()
        .args(SHORT)
        .args(["--elasticity", "0"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("shell elasticity"));
}

#[test]
fn aliasing_grid_is_a_config_error() {
    mbsim()
        .args(["--samples", "100"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("aliases harmonic 3"));
}

#[test]
fn unknown_method_is_a_config_error() {
    mbsim()
        .args(SHORT)
        .args(["--method", "euler"])
        .assert()
        .code(4);
}

#[test]
fn exhausted_budget_is_a_tolerance_error() {
    mbsim()
        .args(SHORT)
        .args(["--max-steps", "1"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("step budget"));
}

#[test]
fn output_file_contains_results() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.json");
    mbsim()
        .args(SHORT)
        .args(["-q", "--output"])
        .arg(&path)
        .assert()
        .success();

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let scenarios = value["scenarios"].as_array().unwrap();
    assert_eq!(scenarios.len(), 2);
    assert_eq!(scenarios[0]["kind"], "resting");
    assert_eq!(
        scenarios[0]["trajectory"]["radius"].as_array().unwrap().len(),
        1001
    );
    assert_eq!(
        scenarios[1]["spectrum"]["magnitudes"].as_array().unwrap().len(),
        501
    );
    assert!(value["comparison"]["second_harmonic_ratio"].is_number());
}

#[test]
fn config_file_with_flag_override() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("experiment.json");
    std::fs::write(
        &path,
        r#"{"duration": 1e-6, "samples": 10, "shell": {"elasticity": 0.8}}"#,
    )
    .unwrap();

    mbsim()
        .arg("--config")
        .arg(&path)
        .assert()
        .code(4);

    mbsim()
        .arg("--config")
        .arg(&path)
        .args(["--samples", "1001", "-q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Resting neuron\t0.8\t"))
        .stdout(predicate::str::contains("\t0.4\t"));
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();
    mbsim().arg("--config").arg(&path).assert().code(4);
}

#[test]
fn bash_completion() {
    mbsim()
        .args(["--completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mbsim"));
}

#[test]
fn matched_rupture_model() {
    mbsim()
        .args(SHORT)
        .args(["--rupture", "matched", "-q"])
        .assert()
        .success();
}

#[test]
fn unknown_rupture_model_is_rejected() {
    mbsim()
        .args(["--rupture", "cubic"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown rupture model"));
}
