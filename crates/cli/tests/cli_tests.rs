//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "ecp-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Energy Consumption Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("health"), "Should show health command");
    assert!(stdout.contains("model-info"), "Should show model-info command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "ecp-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("ecp"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "ecp-cli", "--", "predict", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("--temperature"), "Should show temperature flag");
    assert!(stdout.contains("--hvac"), "Should show hvac flag");
    assert!(stdout.contains("--json"), "Should show json override flag");
}

/// Test that an unreachable API produces a clean error
#[test]
fn test_health_unreachable_api() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "ecp-cli",
            "--",
            "--api-url",
            "http://127.0.0.1:1",
            "health",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(
        !output.status.success(),
        "Health against a dead endpoint should fail"
    );
}
