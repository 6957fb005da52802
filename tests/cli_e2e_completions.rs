//! End-to-end tests for the `bulk-repo completions` command.

mod common;
use common::prelude::*;

#[test]
fn test_completions_help_lists_shells() {
    let mut cmd = cargo_bin_cmd!("bulk-repo");
    cmd.arg("completions")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Generate shell completion scripts",
        ))
        .stdout(predicate::str::contains("bash"))
        .stdout(predicate::str::contains("zsh"))
        .stdout(predicate::str::contains("powershell"));
}

#[test]
fn test_completions_bash() {
    let mut cmd = cargo_bin_cmd!("bulk-repo");
    cmd.arg("completions")
        .arg("bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("_bulk-repo()"))
        .stdout(predicate::str::contains("clone"))
        .stdout(predicate::str::contains("push"))
        .stdout(predicate::str::contains("--no-precheck"));
}

#[test]
fn test_completions_zsh() {
    let mut cmd = cargo_bin_cmd!("bulk-repo");
    cmd.arg("completions")
        .arg("zsh")
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef bulk-repo"));
}

#[test]
fn test_completions_unknown_shell_is_usage_error() {
    let mut cmd = cargo_bin_cmd!("bulk-repo");
    cmd.arg("completions")
        .arg("tcsh")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}
