// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test doubles for the daemon crate.

use std::cell::{Cell, RefCell};
use std::collections::HashSet;

use warden_core::Job;

use crate::supervisor::{Launcher, SpawnError};

/// Launcher that hands out fake pids instead of spawning processes.
pub struct FakeLauncher {
    next_pid: Cell<i32>,
    /// Program paths that refuse to spawn (simulates a missing executable)
    failing: RefCell<HashSet<String>>,
    /// Job ids in launch order
    pub launched: RefCell<Vec<String>>,
    /// Pids handed to terminate()
    pub terminated: RefCell<Vec<i32>>,
}

impl FakeLauncher {
    pub fn new() -> Self {
        Self {
            next_pid: Cell::new(1_000),
            failing: RefCell::new(HashSet::new()),
            launched: RefCell::new(Vec::new()),
            terminated: RefCell::new(Vec::new()),
        }
    }

    /// Make any job whose program equals `path` fail to spawn.
    pub fn fail_program(&self, path: &str) {
        self.failing.borrow_mut().insert(path.to_string());
    }
}

impl Launcher for FakeLauncher {
    fn launch(&self, job: &Job) -> Result<i32, SpawnError> {
        let program = job.argv.first().ok_or(SpawnError::EmptyArgv)?;
        if self.failing.borrow().contains(program) {
            return Err(SpawnError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No such file or directory",
            )));
        }
        self.launched.borrow_mut().push(job.id.clone());
        let pid = self.next_pid.get();
        self.next_pid.set(pid + 1);
        Ok(pid)
    }

    fn terminate(&self, pid: i32) {
        self.terminated.borrow_mut().push(pid);
    }
}
