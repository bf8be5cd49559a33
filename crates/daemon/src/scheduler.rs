// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduling policy: when jobs launch and what happens after they exit.

use tracing::{info, warn};
use warden_core::{Clock, Job, RetryPolicy, SystemClock};

use crate::queue::Queue;
use crate::supervisor::{ExitKind, Launcher, SpawnError};

/// Exit status recorded when the child could not be created at all
/// (missing executable, permission error) — the shell's "command not
/// runnable" convention.
const SPAWN_FAILURE_STATUS: i32 = 127;

pub struct Scheduler<C: Clock = SystemClock> {
    policy: RetryPolicy,
    clock: C,
}

impl<C: Clock> Scheduler<C> {
    pub fn new(policy: RetryPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.epoch_ms()
    }

    /// Launch every due job, ordered by deadline then insertion order.
    /// Returns true when any job changed state (caller persists).
    ///
    /// A launch failure at tick time counts as a failed run: the job
    /// follows the ordinary retry/backoff path instead of silently
    /// vanishing from the schedule.
    pub fn tick(&self, queue: &mut Queue, launcher: &impl Launcher) -> bool {
        let now = self.clock.epoch_ms();
        let mut mutated = false;
        for id in queue.due_ids(now) {
            let Some(job) = queue.get_mut(&id) else { continue };
            match self.launch(job, launcher) {
                Ok(()) => {}
                Err(e) => {
                    warn!(id = %id, error = %e, "relaunch failed, applying retry policy");
                    job.record_exit(SPAWN_FAILURE_STATUS);
                    self.next_state_after_failure(job);
                }
            }
            mutated = true;
        }
        mutated
    }

    /// Start one job now. On success the job is Running with its pid
    /// recorded; on failure it is left untouched for the caller.
    pub fn launch(&self, job: &mut Job, launcher: &impl Launcher) -> Result<(), SpawnError> {
        let pid = launcher.launch(job)?;
        job.mark_running(pid);
        info!(id = %job.id, pid, "job started");
        Ok(())
    }

    /// Decide the job's next state after its child exited.
    pub fn on_exit(&self, job: &mut Job, kind: ExitKind) {
        job.record_exit(kind.status_code());
        if kind.success() {
            match job.interval_ms {
                Some(interval) => {
                    let now = self.clock.epoch_ms();
                    job.reschedule(now, interval);
                    info!(id = %job.id, next_run_ms = job.next_run_ms, "job succeeded, sleeping");
                }
                None => {
                    job.mark_stopped();
                    info!(id = %job.id, "job succeeded");
                }
            }
        } else {
            info!(id = %job.id, status = kind.status_code(), "job failed");
            self.next_state_after_failure(job);
        }
    }

    fn next_state_after_failure(&self, job: &mut Job) {
        let attempt = job.retry_count + 1;
        if self.policy.allows(attempt) {
            let delay = self.policy.delay_for(attempt);
            job.retry_at(self.clock.epoch_ms() + delay, delay);
            info!(id = %job.id, retry = attempt, backoff_ms = delay, "job will retry");
        } else {
            job.mark_failed();
            warn!(id = %job.id, retries = job.retry_count, "retry budget exhausted, job failed");
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
