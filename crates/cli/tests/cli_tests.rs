//! CLI integration tests

use std::process::Command;

fn cbox(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "cbox-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = cbox(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("classification service"),
        "Should describe the tool"
    );
    for command in ["info", "models", "reset", "teach", "predict", "run"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = cbox(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("cbox"), "Should show binary name");
}

/// Test teach command help
#[test]
fn test_teach_help() {
    let output = cbox(&["teach", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Teach help should succeed");
    assert!(stdout.contains("--model"), "Should show model option");
    assert!(stdout.contains("--skip-failed"), "Should show skip-failed option");
    assert!(stdout.contains("<EXAMPLES>"), "Should show examples argument");
}

/// Test predict command help
#[test]
fn test_predict_help() {
    let output = cbox(&["predict", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(stdout.contains("--feature"), "Should show feature option");
    assert!(stdout.contains("--limit"), "Should show limit option");
}

/// Test run command defaults
#[test]
fn test_run_help() {
    let output = cbox(&["run", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Run help should succeed");
    assert!(stdout.contains("sentiment1"), "Should show default model id");
    assert!(stdout.contains("examples.json"), "Should show default examples path");
}

/// Test models create help
#[test]
fn test_models_create_help() {
    let output = cbox(&["models", "create", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Models create help should succeed");
    assert!(stdout.contains("--name"), "Should show name option");
    assert!(stdout.contains("--class"), "Should show class option");
}

/// Test api-url option
#[test]
fn test_api_url_option() {
    let output = cbox(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("CBOX_API_URL"), "Should show env var");
    assert!(stdout.contains("--metrics-file"), "Should show metrics-file option");
}

/// Test malformed feature is rejected before any request
#[test]
fn test_invalid_feature() {
    let output = cbox(&["predict", "sentiment1", "--feature", "user.age=56"]);

    assert!(!output.status.success(), "Malformed feature should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("key:type=value") || stderr.contains("error"),
        "Should explain the expected feature form"
    );
}

/// Test missing required argument error handling
#[test]
fn test_missing_argument() {
    let output = cbox(&["teach"]);

    assert!(!output.status.success(), "Missing argument should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}

/// Test teaching from a missing file fails without contacting the service
#[test]
fn test_teach_missing_file() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.json");
    let output = cbox(&[
        "--api-url",
        "http://127.0.0.1:9",
        "teach",
        "--model",
        "sentiment1",
        missing.to_str().unwrap(),
    ]);

    assert!(!output.status.success(), "Missing examples file should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unavailable"), "Should report the source as unavailable");
}
