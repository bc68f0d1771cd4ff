use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_tokens() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("doc.aisp");
    fs::write(&file, "∀x:ℕ → x ≥ 0").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("tokens").arg(&file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("quantifier"))
        .stdout(predicate::str::contains("domain"))
        .stdout(predicate::str::contains("8 token(s)"));
}

#[test]
fn test_cli_tokens_unrecognized_character() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("doc.aisp");
    fs::write(&file, "x ≜ 1 ☃").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("tokens").arg(&file);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unrecognized character"));
}
