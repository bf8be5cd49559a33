// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle specs: startup handshake, single-instance lock,
//! graceful shutdown, crash recovery.

use std::process::{Command, Stdio};

use serial_test::serial;

use crate::prelude::*;

#[test]
#[serial]
fn startup_creates_socket_and_pid_file() {
    let sandbox = Sandbox::new();
    assert!(sandbox.socket_path().exists());
    let pid = std::fs::read_to_string(sandbox.pid_path()).unwrap();
    assert!(pid.trim().parse::<u32>().is_ok(), "pid file holds {pid:?}");
}

#[test]
#[serial]
fn second_daemon_refuses_to_start() {
    let sandbox = Sandbox::new();

    let output = Command::new(assert_cmd::cargo::cargo_bin("wardend"))
        .env("WARDEN_STATE_DIR", sandbox.state_dir())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .output()
        .unwrap();
    assert!(!output.status.success(), "second daemon must fail the lock");

    // The first daemon still answers
    assert_eq!(sandbox.list(), "no jobs\n");
}

#[test]
#[serial]
fn graceful_shutdown_removes_runtime_files() {
    let mut sandbox = Sandbox::new();
    sandbox.passes(&["start", "slow", "/bin/sleep", "60"]);

    sandbox.stop_daemon();
    assert!(!sandbox.socket_path().exists());
    assert!(!sandbox.pid_path().exists());
    // The queue backup survives shutdown
    assert!(sandbox.backup_path().exists());
}

#[test]
#[serial]
fn queue_survives_a_daemon_crash() {
    let mut sandbox = Sandbox::new();
    sandbox.passes(&["start", "slow", "/bin/sleep", "60"]);
    assert!(sandbox.list().contains("slow running"));

    sandbox.kill_daemon();
    sandbox.start_daemon();

    // The job was persisted when it started; after the crash it is
    // restored and relaunched.
    let relaunched = wait_for(SPEC_WAIT_MAX_MS, || sandbox.list().contains("slow running"));
    assert!(relaunched, "restored job should run again, got: {}", sandbox.list());
}

#[test]
#[serial]
fn restart_after_graceful_shutdown_keeps_jobs() {
    let mut sandbox = Sandbox::new();
    sandbox.passes(&["start", "slow", "/bin/sleep", "60"]);

    sandbox.stop_daemon();
    sandbox.start_daemon();

    let listed = wait_for(SPEC_WAIT_MAX_MS, || sandbox.list().contains("slow"));
    assert!(listed, "job should survive a restart, got: {}", sandbox.list());
}
