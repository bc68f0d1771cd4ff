use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_cli_inspect_document() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("doc.aisp");
    fs::write(
        &file,
        "𝔸5.1.demo@2026-01-25\n⟦Σ:Types⟧{\n  n : ℕ ≜ 3\n  m ≔ n\n}\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("inspect").arg(&file);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Document: demo (version 5.1, 2026-01-25)"))
        .stdout(predicate::str::contains("Types"))
        .stdout(predicate::str::contains("bindings (2)"))
        .stdout(predicate::str::contains("ZERO"));
}

#[test]
fn test_cli_inspect_invalid_document() {
    let temp_dir = TempDir::new().unwrap();
    let file = temp_dir.path().join("doc.aisp");
    fs::write(&file, "x : ℕ ≜ 1\nx : 𝔹 ≜ ⊤\n").unwrap();

    let mut cmd = Command::cargo_bin("aisp").unwrap();
    cmd.arg("inspect").arg(&file);

    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("CRASH"))
        .stdout(predicate::str::contains("Status: invalid"));
}
