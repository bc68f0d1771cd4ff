use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VALID: &str = "x : ℕ ≜ 3\ny ≔ x\n";
const CONFLICT: &str = "x : ℕ ≜ 1\nx : 𝔹 ≜ ⊤\n";

#[test]
fn test_cli_check_valid_document() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("valid.aisp");
    fs::write(&file, VALID).unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("GOLD"))
        .stdout(predicate::str::contains("1 of 1 document(s) passed"));
}

#[test]
fn test_cli_check_type_conflict_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("conflict.aisp");
    fs::write(&file, CONFLICT).unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("type error at byte 14"))
        .stderr(predicate::str::contains("conflicts with an established binding"));
}

#[test]
fn test_cli_check_parse_error_fails() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("broken.aisp");
    fs::write(&file, "x ≜ (1\n").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("parse error"))
        .stdout(predicate::str::contains("0 of 1 document(s) passed"));
}

#[test]
fn test_cli_check_directory_json() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.aisp"), VALID).unwrap();
    fs::write(temp_dir.path().join("b.aisp"), CONFLICT).unwrap();
    fs::write(temp_dir.path().join("notes.txt"), "not a document").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check")
        .arg(temp_dir.path())
        .arg("--format")
        .arg("json");

    let output = cmd.assert().failure().get_output().stdout.clone();
    let outcomes: serde_json::Value = serde_json::from_slice(&output).unwrap();
    let outcomes = outcomes.as_array().unwrap();

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0]["passed"], true);
    assert_eq!(outcomes[0]["report"]["tier"]["name"], "GOLD");
    assert_eq!(outcomes[1]["passed"], false);
    assert_eq!(outcomes[1]["error"]["kind"], "type");
    assert_eq!(outcomes[1]["error"]["offset"], 14);
}

#[test]
fn test_cli_check_ambiguity_ceiling() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("loose.aisp");
    // One NULL binding out of two
    fs::write(&file, "x ≜\ny ≜ 1\n").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file).arg("--max-ambiguity").arg("0.1");
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("ambiguity error"));

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file).arg("--max-ambiguity").arg("0.9");
    cmd.assert().success();
}

#[test]
fn test_cli_check_config_limits() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("valid.aisp");
    fs::write(&file, VALID).unwrap();
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{"limits": {"max_document_bytes": 8}}"#).unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file).arg("--config").arg(&config);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("overflow error at byte 8"));
}

#[test]
fn test_cli_check_missing_path() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(temp_dir.path().join("missing.aisp"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_check_releases_each_document() {
    let temp_dir = TempDir::new().unwrap();
    for name in ["a.aisp", "b.aisp", "c.aisp"] {
        fs::write(temp_dir.path().join(name), VALID).unwrap();
    }
    let config = temp_dir.path().join("config.json");
    fs::write(&config, r#"{"slots": 1}"#).unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check")
        .arg(temp_dir.path())
        .arg("--config")
        .arg(&config);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("3 of 3 document(s) passed"));
}

#[test]
fn test_cli_check_conflicting_declarations_fail() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("declarations.aisp");
    fs::write(&file, "⟦Σ⟧{ x : ℕ }\n⟦Γ⟧{ x : 𝔹 }\nx ≔ ⊤\n").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("check").arg(&file);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("type error at byte 30"))
        .stderr(predicate::str::contains("first declared as"));
}
