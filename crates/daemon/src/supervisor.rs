// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Child-process supervision: launching jobs and collecting exits.
//!
//! Each job runs in its own process group so that a single group-wide
//! TERM reaches the job and any descendants it spawned. Exits are
//! collected by a non-blocking `waitpid` drain driven from the daemon
//! loop's SIGCHLD wakeup, never from signal context.

use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use nix::sys::signal::{killpg, Signal};
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use thiserror::Error;
use tracing::debug;
use warden_core::Job;

use crate::queue::Queue;

#[derive(Debug, Error)]
pub enum SpawnError {
    #[error("job has an empty argv")]
    EmptyArgv,

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// How a child left the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    Code(i32),
    Signaled(i32),
}

impl ExitKind {
    pub fn success(&self) -> bool {
        matches!(self, ExitKind::Code(0))
    }

    /// Shell-convention status: the code itself, or 128 + signal.
    pub fn status_code(&self) -> i32 {
        match self {
            ExitKind::Code(code) => *code,
            ExitKind::Signaled(sig) => 128 + sig,
        }
    }
}

/// Seam between the scheduler/dispatcher and real OS processes.
pub trait Launcher {
    /// Start the job's argv; returns the child pid. Failure to create
    /// the process is reported synchronously and the job stays put.
    fn launch(&self, job: &Job) -> Result<i32, SpawnError>;

    /// Best-effort TERM of the job's process group; never blocks.
    fn terminate(&self, pid: i32);
}

/// The real thing: fork/exec with a fresh process group, null stdio.
#[derive(Debug, Default, Clone)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(&self, job: &Job) -> Result<i32, SpawnError> {
        let (program, args) = job.argv.split_first().ok_or(SpawnError::EmptyArgv)?;
        let child = Command::new(program)
            .args(args)
            .process_group(0)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        // The Child handle is dropped without waiting: exits are reaped
        // centrally via waitpid(-1) in drain_exited.
        Ok(child.id() as i32)
    }

    fn terminate(&self, pid: i32) {
        if let Err(e) = killpg(Pid::from_raw(pid), Signal::SIGTERM) {
            debug!(pid, error = %e, "killpg failed (group already gone?)");
        }
    }
}

/// Collect every child that has exited, non-blocking, until none
/// remain. Called once per SIGCHLD wakeup; one wakeup may stand for
/// several exits.
pub fn drain_exited() -> Vec<(i32, ExitKind)> {
    let mut exits = Vec::new();
    loop {
        match waitpid(None::<Pid>, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::Exited(pid, code)) => exits.push((pid.as_raw(), ExitKind::Code(code))),
            Ok(WaitStatus::Signaled(pid, sig, _)) => {
                exits.push((pid.as_raw(), ExitKind::Signaled(sig as i32)));
            }
            Ok(WaitStatus::StillAlive) => break,
            // Stopped/continued children are not exits; keep draining
            Ok(_) => continue,
            // ECHILD: nothing left to reap
            Err(_) => break,
        }
    }
    exits
}

/// Shutdown cleanup: TERM every running job's process group. Does not
/// wait for them to die — best effort, not a graceful drain.
pub fn terminate_all(queue: &Queue, launcher: &impl Launcher) {
    for job in queue.jobs() {
        if let Some(pid) = job.pid {
            launcher.terminate(pid);
        }
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
