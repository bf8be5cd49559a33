// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Client-side specs: exit codes, quiet mode, unreachable daemon.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn unreachable_daemon_is_a_transport_error() {
    let sandbox = Sandbox::without_daemon();
    sandbox
        .warden()
        .args(["list"])
        .assert()
        .code(2)
        .stderr(predicates::str::contains("is it running?"));
}

#[test]
#[serial]
fn quiet_suppresses_error_output_but_keeps_the_code() {
    let sandbox = Sandbox::new();
    sandbox.warden().args(["-q", "stop", "ghost"]).assert().code(1).stdout("").stderr("");
}

#[test]
#[serial]
fn quiet_suppresses_normal_output_too() {
    let sandbox = Sandbox::new();
    sandbox.warden().args(["-q", "list"]).assert().success().stdout("");
}

#[test]
#[serial]
fn unknown_action_reports_the_daemon_error() {
    let sandbox = Sandbox::new();
    sandbox
        .warden()
        .args(["frobnicate"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("unknown action 'frobnicate'"));
}

#[test]
#[serial]
fn daemon_errors_carry_the_failed_prefix() {
    let sandbox = Sandbox::new();
    sandbox
        .warden()
        .args(["stop", "ghost"])
        .assert()
        .code(1)
        .stderr(predicates::str::starts_with("failed: "));
}

#[test]
#[serial]
fn transport_errors_carry_the_program_name() {
    let sandbox = Sandbox::without_daemon();
    sandbox
        .warden()
        .args(["list"])
        .assert()
        .code(2)
        .stderr(predicates::str::starts_with("warden: "));
}
