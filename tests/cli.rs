use assert_cmd::Command;
use predicates::prelude::*;

const FLASK: &str = "tests/fixtures/apps/flask";
const FLASK_POSTGRES: &str = "tests/fixtures/apps/flask-postgres";

fn autodeploy() -> Command {
    let mut cmd = Command::cargo_bin("autodeploy").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn support_lists_languages_and_frameworks() {
    autodeploy()
        .arg("support")
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported Languages"))
        .stdout(predicate::str::contains("Flask"))
        .stdout(predicate::str::contains("requirements.txt"));
}

#[test]
fn analyze_emits_json() {
    let output = autodeploy()
        .args(["analyze", FLASK, "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["app_type"], "flask");
    assert_eq!(value["language"], "python");
    assert_eq!(value["port"], 5000);
    assert_eq!(value["requires_database"], false);
}

#[test]
fn plan_prints_strategy_and_reasoning() {
    autodeploy()
        .args(["plan", FLASK_POSTGRES, "--description", "Deploy on AWS with SSL"])
        .assert()
        .success()
        .stdout(predicate::str::contains("container"))
        .stdout(predicate::str::contains("[strategy] rule 3"))
        .stdout(predicate::str::contains("postgresql"));
}

#[test]
fn plan_json_includes_decision() {
    let output = autodeploy()
        .args([
            "plan",
            FLASK_POSTGRES,
            "-d",
            "Deploy this service somewhere cheap",
            "--provider",
            "azure",
            "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["decision"]["provider"], "azure");
    assert_eq!(value["decision"]["deployment_strategy"], "container");
    assert_eq!(value["decision"]["networking"]["subnet_plan"], "public+private");
    assert!(value["decision"]["database"].is_object());
}

#[test]
fn incompatible_request_exits_with_error() {
    autodeploy()
        .args([
            "plan",
            FLASK,
            "-d",
            "Deploy as a serverless function please",
            "--deployment-type",
            "serverless",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("incompatible"));
}

#[test]
fn short_description_is_rejected() {
    autodeploy()
        .args(["plan", FLASK, "-d", "aws"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("too short"));
}

#[test]
fn missing_repository_fails() {
    autodeploy()
        .args(["analyze", "tests/fixtures/apps/does-not-exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot access repository"));
}

#[test]
fn explicit_config_must_parse() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("broken.toml");
    std::fs::write(&config, "[analysis\nmax_files = ").unwrap();

    autodeploy()
        .args(["--config", config.to_str().unwrap(), "analyze", FLASK])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}
