// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling specs: one-shot completion, retry on failure, recurring runs.

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn one_shot_success_ends_stopped_with_exit_zero() {
    let sandbox = Sandbox::new();
    let marker = sandbox.state_dir().join("ran");
    sandbox.passes(&[
        "start",
        "once",
        "/bin/sh",
        "-c",
        &format!("touch {}", marker.display()),
    ]);

    let done = wait_for(SPEC_WAIT_MAX_MS, || {
        sandbox.list().contains("once stopped retries=0 exit=0")
    });
    assert!(done, "got: {}", sandbox.list());
    assert!(marker.exists(), "the job never actually ran");
}

#[test]
#[serial]
fn failing_job_retries_with_backoff() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["start", "flaky", "/bin/false"]);

    // First failure is recorded and a retry is scheduled
    let retried = wait_for(SPEC_WAIT_MAX_MS, || {
        sandbox.list().contains("flaky pending retries=1 exit=1")
    });
    assert!(retried, "got: {}", sandbox.list());

    // The backoff holds the job for ~1s; the second run follows
    let retried_again = wait_for(SPEC_WAIT_MAX_MS, || sandbox.list().contains("retries=2"));
    assert!(retried_again, "got: {}", sandbox.list());
}

#[test]
#[serial]
fn missing_executable_counts_as_exit_127() {
    let sandbox = Sandbox::new();

    // The immediate launch fails, so the start itself reports the error
    sandbox
        .warden()
        .args(["start", "ghost", "/no/such/binary"])
        .assert()
        .code(1)
        .stderr(predicates::str::contains("cannot start 'ghost'"));
    assert_eq!(sandbox.list(), "no jobs\n");
}

#[test]
#[serial]
fn recurring_job_runs_again_after_its_interval() {
    let sandbox = Sandbox::new();
    let counter = sandbox.state_dir().join("beats");
    sandbox.passes(&[
        "every",
        "beat",
        "1",
        "/bin/sh",
        "-c",
        &format!("echo x >> {}", counter.display()),
    ]);

    let beat_twice = wait_for(SPEC_WAIT_MAX_MS, || {
        std::fs::read_to_string(&counter).map(|s| s.lines().count() >= 2).unwrap_or(false)
    });
    assert!(beat_twice, "recurring job should have run at least twice");

    // Between runs the job sleeps rather than stopping
    let list = sandbox.list();
    assert!(
        list.contains("beat sleeping") || list.contains("beat running"),
        "got: {list}"
    );
}

#[test]
#[serial]
fn recurring_job_failure_still_retries() {
    let sandbox = Sandbox::new();
    sandbox.passes(&["every", "beat", "60", "/bin/false"]);

    let retried = wait_for(SPEC_WAIT_MAX_MS, || {
        sandbox.list().contains("beat pending retries=1 exit=1")
    });
    assert!(retried, "got: {}", sandbox.list());
}
