//! CLI contract tests for the `hkslc` binary: exit code and the
//! diagnostic-line format printed on failure (§6.1, §6.2).

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn hkslc() -> Command {
    Command::new(PathBuf::from(env!("CARGO_BIN_EXE_hkslc")))
}

fn write_source(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).expect("failed to write scratch source file");
    path
}

#[test]
fn a_well_formed_program_compiles_with_exit_code_zero() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = write_source(&dir, "ok.hksl", "fn main() { let a: float = 1.0 + 2.0; }");

    hkslc().arg(&path).assert().success();
}

#[test]
fn a_missing_file_fails_with_a_nonzero_exit_code() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = dir.path().join("does_not_exist.hksl");

    hkslc().arg(&path).assert().failure();
}

#[test]
fn a_semantic_error_fails_and_prints_a_span_prefixed_diagnostic() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = write_source(&dir, "bad.hksl", "fn main() { a = 1.0; }");

    hkslc()
        .arg(&path)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Span { line: 1, col:"));
}

#[test]
fn a_syntax_error_fails_without_running_the_semantic_passes() {
    let dir = TempDir::new().expect("failed to create temp directory");
    let path = write_source(&dir, "syntax.hksl", "fn main() { 1.0 = 2.0; }");

    hkslc().arg(&path).assert().failure();
}

#[test]
fn running_with_no_arguments_fails_with_a_usage_message() {
    hkslc()
        .assert()
        .failure()
        .stderr(predicate::str::contains("usage"));
}
