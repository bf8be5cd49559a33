// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job record and state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a supervised job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    /// Queued; launched once `next_run_ms` has elapsed
    Pending,
    /// A child process is executing this job
    Running,
    /// Succeeded and waiting for its next recurring run
    Sleeping,
    /// Finished successfully (terminal for one-shot jobs)
    Stopped,
    /// Exhausted its retry budget (terminal; resubmit to run again)
    Failed,
}

impl JobState {
    /// Terminal states are never rescheduled automatically.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Stopped | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            JobState::Pending => "pending",
            JobState::Running => "running",
            JobState::Sleeping => "sleeping",
            JobState::Stopped => "stopped",
            JobState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A unit of supervised work: an executable plus arguments, run as a
/// child process in its own process group.
///
/// Invariant: `pid` is `Some` if and only if `state` is [`JobState::Running`].
/// All transitions go through the methods below, which maintain it. The
/// pid is transient and never serialized — a restored `Running` job has
/// no live child and is demoted by the queue on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: String,
    /// Executable path followed by its arguments; immutable once started
    pub argv: Vec<String>,
    pub state: JobState,
    #[serde(skip)]
    pub pid: Option<i32>,
    /// Absolute deadline (epoch ms) for the next launch; 0 = due now
    pub next_run_ms: u64,
    /// Recurring period; `None` for one-shot jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_ms: Option<u64>,
    #[serde(default)]
    pub retry_count: u32,
    /// Delay applied before the most recent retry (for operator display)
    #[serde(default)]
    pub backoff_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_exit_status: Option<i32>,
}

impl Job {
    /// Create a one-shot job, due immediately.
    pub fn new(id: impl Into<String>, argv: Vec<String>) -> Self {
        Self {
            id: id.into(),
            argv,
            state: JobState::Pending,
            pid: None,
            next_run_ms: 0,
            interval_ms: None,
            retry_count: 0,
            backoff_ms: 0,
            last_exit_status: None,
        }
    }

    /// Create a recurring job, due immediately and then every `interval_ms`.
    pub fn recurring(id: impl Into<String>, argv: Vec<String>, interval_ms: u64) -> Self {
        let mut job = Self::new(id, argv);
        job.interval_ms = Some(interval_ms);
        job
    }

    /// True when the job should be launched at `now_ms`.
    pub fn is_due(&self, now_ms: u64) -> bool {
        matches!(self.state, JobState::Pending | JobState::Sleeping) && self.next_run_ms <= now_ms
    }

    /// Transition Pending/Sleeping → Running with the child's pid.
    pub fn mark_running(&mut self, pid: i32) {
        self.state = JobState::Running;
        self.pid = Some(pid);
    }

    /// Record the child's exit and clear the pid (Running → undecided).
    ///
    /// The caller decides the next state via [`Job::reschedule`],
    /// [`Job::retry_at`], [`Job::mark_stopped`] or [`Job::mark_failed`].
    pub fn record_exit(&mut self, status: i32) {
        self.pid = None;
        self.last_exit_status = Some(status);
    }

    /// Successful run of a recurring job: sleep until the next period.
    pub fn reschedule(&mut self, now_ms: u64, interval_ms: u64) {
        self.state = JobState::Sleeping;
        self.next_run_ms = now_ms + interval_ms;
        self.retry_count = 0;
        self.backoff_ms = 0;
    }

    /// Failed run with retry budget left: back off until `deadline_ms`.
    pub fn retry_at(&mut self, deadline_ms: u64, backoff_ms: u64) {
        self.state = JobState::Pending;
        self.next_run_ms = deadline_ms;
        self.retry_count += 1;
        self.backoff_ms = backoff_ms;
    }

    /// Terminal success.
    pub fn mark_stopped(&mut self) {
        self.state = JobState::Stopped;
        self.pid = None;
    }

    /// Terminal failure; never rescheduled automatically.
    pub fn mark_failed(&mut self) {
        self.state = JobState::Failed;
        self.pid = None;
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
