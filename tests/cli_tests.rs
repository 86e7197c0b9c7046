//! Smoke tests for the CLI surface.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_subcommands() {
    let mut cmd = Command::cargo_bin("rfqflow").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("demo"));
}

#[test]
fn status_prints_the_seeded_collection() {
    let mut cmd = Command::cargo_bin("rfqflow").unwrap();
    cmd.arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("RFQ-2025-001"))
        .stdout(predicate::str::contains("DRAFT"))
        .stdout(predicate::str::contains("send"));
}

#[test]
fn demo_walks_the_full_lifecycle() {
    let mut cmd = Command::cargo_bin("rfqflow").unwrap();
    cmd.arg("demo")
        .assert()
        .success()
        .stdout(predicate::str::contains("purchase order created"))
        .stdout(predicate::str::contains("second creation attempt rejected"));
}
