// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command-surface specs: the queue as seen through the client.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn start_queues_a_running_job() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "web", "/bin/sleep", "60"]);

    let list = sandbox.list();
    assert!(list.contains("web running retries=0 exit=-"), "got: {list}");
}

#[test]
#[serial]
fn duplicate_id_is_rejected_while_active() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "web", "/bin/sleep", "60"]);

    sandbox
        .warden()
        .args(["start", "web", "/bin/sleep", "60"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("already queued"));
}

#[test]
#[serial]
fn stop_drops_the_job_and_its_process() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "web", "/bin/sleep", "60"]);
    sandbox.passes(&["stop", "web"]);

    assert_eq!(sandbox.list(), "no jobs\n");
}

#[test]
#[serial]
fn stop_of_an_unknown_job_fails() {
    let sandbox = Sandbox::new();
    sandbox
        .warden()
        .args(["stop", "ghost"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("no such job 'ghost'"));
}

#[test]
#[serial]
fn remove_requires_a_finished_job() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "web", "/bin/sleep", "60"]);

    sandbox
        .warden()
        .args(["remove", "web"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("is running; stop it first"));
}

#[test]
#[serial]
fn remove_clears_a_stopped_job() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "once", "/bin/true"]);

    let finished = wait_for(SPEC_WAIT_MAX_MS, || sandbox.list().contains("once stopped"));
    assert!(finished, "one-shot should finish, got: {}", sandbox.list());

    sandbox.passes(&["remove", "once"]);
    assert_eq!(sandbox.list(), "no jobs\n");
}

#[test]
#[serial]
fn status_relays_the_last_exit_code() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "nope", "/bin/false"]);

    let failed_once = wait_for(SPEC_WAIT_MAX_MS, || sandbox.list().contains("exit=1"));
    assert!(failed_once, "job should have failed once, got: {}", sandbox.list());

    // The client's own exit code carries the job's status, silently
    let assert = sandbox.warden().args(["status", "nope"]).assert().code(1);
    assert.stdout("").stderr("");
}

#[test]
#[serial]
fn status_of_a_job_that_has_not_exited_names_its_state() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "web", "/bin/sleep", "60"]);

    let out = sandbox.passes(&["status", "web"]);
    assert_eq!(out, "running\n");
}

#[test]
#[serial]
fn help_lists_the_actions() {
    let sandbox = Sandbox::new();
    let help = sandbox.passes(&["help"]);
    for action in ["start", "every", "stop", "remove", "list", "status"] {
        assert!(help.contains(action), "help is missing {action}: {help}");
    }
    // A bare invocation gets the same text
    let bare = sandbox.passes(&[]);
    assert_eq!(bare, help);
}
