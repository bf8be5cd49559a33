// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory job queue with file-backed persistence.
//!
//! The queue is owned by the daemon loop's single task; every mutation
//! happens while handling a command or reaping a child, so it needs no
//! lock. The backup file is JSON lines — one self-describing job record
//! per line — replaced atomically on every persisted mutation so a
//! crash mid-write never corrupts it.

use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};
use warden_core::{Job, JobState};

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("job '{0}' already queued")]
    Duplicate(String),
}

/// Id-keyed job collection with stable insertion order.
#[derive(Debug, Default)]
pub struct Queue {
    jobs: IndexMap<String, Job>,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Add a job. A duplicate id is rejected while the existing job is
    /// active; a terminal job with the same id is replaced.
    pub fn insert(&mut self, job: Job) -> Result<(), QueueError> {
        if let Some(existing) = self.jobs.get(&job.id) {
            if !existing.is_terminal() {
                return Err(QueueError::Duplicate(job.id.clone()));
            }
        }
        self.jobs.insert(job.id.clone(), job);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Job> {
        self.jobs.get_mut(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Job> {
        self.jobs.shift_remove(id)
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    /// The job owning a live child pid, if any.
    pub fn job_for_pid(&mut self, pid: i32) -> Option<&mut Job> {
        self.jobs.values_mut().find(|job| job.pid == Some(pid))
    }

    /// Ids of jobs due at `now_ms`, ordered by ascending deadline and
    /// then insertion order — the scheduler's deterministic tie-break.
    pub fn due_ids(&self, now_ms: u64) -> Vec<String> {
        let mut due: Vec<(u64, usize, &String)> = self
            .jobs
            .iter()
            .enumerate()
            .filter(|(_, (_, job))| job.is_due(now_ms))
            .map(|(index, (id, job))| (job.next_run_ms, index, id))
            .collect();
        due.sort();
        due.into_iter().map(|(_, _, id)| id.clone()).collect()
    }

    /// Earliest deadline among schedulable jobs.
    pub fn next_deadline(&self) -> Option<u64> {
        self.jobs
            .values()
            .filter(|job| matches!(job.state, JobState::Pending | JobState::Sleeping))
            .map(|job| job.next_run_ms)
            .min()
    }

    /// Serialize every job, one JSON record per line, into a sibling
    /// temp file and atomically rename it over `path`.
    pub fn persist(&self, path: &Path) -> std::io::Result<()> {
        let tmp = path.with_extension("tmp");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = std::fs::File::create(&tmp)?;
        for job in self.jobs.values() {
            let line = serde_json::to_string(job).map_err(std::io::Error::other)?;
            writeln!(file, "{line}")?;
        }
        file.sync_all()?;
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Rebuild the queue from a backup file.
    ///
    /// A missing or unreadable file yields an empty queue; corrupt
    /// lines are skipped individually. Jobs persisted as Running lost
    /// their child with the previous daemon and are demoted to Pending,
    /// due immediately.
    pub fn restore(path: &Path) -> Self {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no backup file, starting empty");
                return Self::new();
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "backup unreadable, starting empty");
                return Self::new();
            }
        };

        let mut queue = Self::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    warn!(lineno, error = %e, "backup truncated, keeping jobs read so far");
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Job>(&line) {
                Ok(mut job) => {
                    if job.state == JobState::Running {
                        job.state = JobState::Pending;
                        job.next_run_ms = 0;
                        job.pid = None;
                    }
                    let id = job.id.clone();
                    if queue.jobs.insert(id.clone(), job).is_some() {
                        warn!(id = %id, "duplicate id in backup, keeping the later record");
                    }
                }
                Err(e) => warn!(lineno, error = %e, "skipping corrupt backup record"),
            }
        }
        queue
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
