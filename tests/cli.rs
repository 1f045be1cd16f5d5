use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("mini-suite").unwrap();
    cmd.env("LANG", "en_US.UTF-8")
        .env_remove("LC_ALL")
        .env_remove("LC_MESSAGES")
        .env_remove("RUST_LOG");
    cmd
}

const SCENARIO: &str = r#"[
  {"name": "TC-01: Status code is 200", "actual": 200, "expected": 200, "type": "strictEqual"},
  {"name": "TC-02: Content type", "actual": "application/json", "expected": "application/json", "type": "strictEqual"},
  {"name": "TC-03: Body present", "actual": {"id": 1}, "expected": null, "type": "truthy"},
  {"name": "TC-04: Response time", "actual": 250, "expected": 200, "type": "lessThan"},
  {"name": "TC-05: Id matches", "actual": "123", "expected": 123, "type": "looseEqual"}
]"#;

#[test]
fn failing_suite_exits_with_one() {
    cmd()
        .args(["--no-color", "--json", SCENARIO])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[PASS] TC-01: Status code is 200 (200 === 200)"))
        .stdout(predicate::str::contains("[FAIL] TC-04: Response time (250 < 200)"))
        .stdout(predicate::str::contains("Pass rate: 80.00%"))
        .stdout(predicate::str::contains("Overall: FAILED"))
        .stdout(predicate::str::contains("Consecutive passes from start: 3"))
        .stdout(predicate::str::contains("First failure at index 3"));
}

#[test]
fn passing_suite_exits_with_zero() {
    cmd()
        .args([
            "--no-color",
            "--json",
            r#"[{"name": "ok", "actual": 1, "expected": 1, "type": "strictEqual"}]"#,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("First failure: none"));
}

#[test]
fn empty_suite_passes() {
    cmd()
        .args(["--no-color", "-o", "final", "--json", "[]"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total: 0"))
        .stdout(predicate::str::contains("Pass rate: 0.00%"));
}

#[test]
fn non_array_input_exits_with_two() {
    cmd()
        .args(["--no-color", "--json", r#"{"name": "x"}"#])
        .assert()
        .code(2);
}

#[test]
fn json_output_from_file() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("suite.json");
    fs::write(&file, SCENARIO).unwrap();
    let out = cmd()
        .args(["-o", "json"])
        .arg(&file)
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["name"], "suite.json");
    assert_eq!(v["passed"], 4);
    assert_eq!(v["first_failure_index"], 3);
}

#[test]
fn json_output_for_several_suites_is_one_array() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.json"), SCENARIO).unwrap();
    fs::write(
        dir.path().join("b.yaml"),
        "- {name: ok, actual: 1, expected: 1, type: strictEqual}\n",
    )
    .unwrap();
    let out = cmd()
        .args(["-o", "json", "--json", "[]"])
        .arg(dir.path())
        .assert()
        .code(1)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let reports = v.as_array().unwrap();
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0]["total"], 0);
    assert_eq!(reports[1]["name"], "a.json");
    assert_eq!(reports[2]["name"], "b.yaml");
    assert_eq!(reports[2]["overall_status"], "PASSED");
}

#[test]
fn silent_mode_prints_nothing() {
    cmd()
        .args(["-q", "--json", SCENARIO])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}

#[test]
fn no_input_is_a_usage_error() {
    cmd().assert().code(2);
}
