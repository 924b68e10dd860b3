use assert_cmd::prelude::*;
use predicates::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn summary_only_lists_the_whole_park() {
    let mut cmd = Command::cargo_bin("dusk-park").expect("binary exists");
    cmd.arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Clear color=(0.20, 0.20, 0.30)"))
        .stdout(contains("Camera pos=(0.00, 1.00, 5.00) target=(0.00, 1.00, 4.00)"))
        .stdout(contains("Lights sun=on lamp=on"))
        .stdout(contains("Drew 11 primitives:"))
        .stdout(contains(" - ground "))
        .stdout(contains(" - bench.seat "))
        .stdout(contains(" - post.globe "))
        .stdout(contains(" - tree.canopy "))
        .stdout(contains("Presented"));
}

#[test]
fn unknown_arguments_are_ignored() {
    let mut cmd = Command::cargo_bin("dusk-park").expect("binary exists");
    cmd.args(["--summary-only", "-display", ":0"]);
    cmd.assert()
        .success()
        .stdout(contains("Drew 11 primitives:"))
        .stderr(contains("Unknown argument").not());
}
