// Command-line integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const DICKENS: &str = "It was the best of times, it was the worst of times, it was the age of \
    wisdom, it was the age of foolishness, it was the epoch of belief, it was the epoch of \
    incredulity, it was the season of light";

fn stochlab() -> Command {
    Command::cargo_bin("stochlab").unwrap()
}

#[test]
fn test_counting_text_output() {
    stochlab()
        .args(["--seed", "1", "counting", "--paths", "200"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Counting process"))
        .stdout(predicate::str::contains("dispersion"));
}

#[test]
fn test_moments_json_output() {
    let output = stochlab()
        .args(["--format", "json", "moments", "2", "4", "4", "4", "5", "5", "7", "9"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["kind"], "moments");
    assert!((json["online"]["mean"].as_f64().unwrap() - 5.0).abs() < 1e-12);
    assert!((json["batch"]["variance"].as_f64().unwrap() - 32.0 / 7.0).abs() < 1e-12);
}

#[test]
fn test_seeded_runs_are_identical() {
    let run = || {
        stochlab()
            .args(["--seed", "42", "--format", "json", "walk", "--paths", "100"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_caesar_recovers_shift() {
    stochlab()
        .args(["caesar", DICKENS, "--shift", "11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#1 key=11"));
}

#[test]
fn test_rsa_recovers_private_exponent() {
    stochlab()
        .args(["rsa", DICKENS, "--e", "17", "--language", "english"])
        .assert()
        .success()
        .stdout(predicate::str::contains("true d=2753"))
        .stdout(predicate::str::contains("#1 key=2753"));
}

#[test]
fn test_invalid_step_probability_fails() {
    stochlab()
        .args(["counting", "--steps", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("exceeds 1"));
}

#[test]
fn test_rsa_rejects_non_prime() {
    stochlab()
        .args(["rsa", "hello", "--p", "60"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not prime"));
}

#[test]
fn test_run_scenario_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scenario.toml");
    fs::write(
        &path,
        r#"
seed = 5

[scenario]
kind = "stability"
transform = { kind = "shift", by = 1e8 }
"#,
    )
    .unwrap();

    stochlab()
        .args(["run", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("most accurate: Batch"));
}

#[test]
fn test_stability_defaults_to_scaled_base() {
    stochlab()
        .arg("stability")
        .assert()
        .success()
        .stdout(predicate::str::contains("Scale(10000000000.0)"))
        .stdout(predicate::str::contains("no single most accurate method"));
}

#[test]
fn test_rust_log_enables_tracing_without_debug_flag() {
    stochlab()
        .env("RUST_LOG", "stochlab=debug")
        .args(["moments", "1", "2", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("running scenario"));

    stochlab()
        .env_remove("RUST_LOG")
        .args(["moments", "1", "2", "3"])
        .assert()
        .success()
        .stderr(predicate::str::contains("running scenario").not());
}

#[test]
fn test_run_rejects_bad_scenario_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[scenario]\nkind = \"counting\"\nrate = \"fast\"\n").unwrap();

    stochlab()
        .args(["run", "-c"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("configuration error"));
}
