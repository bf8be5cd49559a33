// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon startup and initialization logic.

use std::io::Write;

use fs2::FileExt;
use tokio::net::UnixListener;
use tracing::info;
use warden_core::{RetryPolicy, SystemClock};

use crate::listener::Daemon;
use crate::queue::Queue;
use crate::scheduler::Scheduler;
use crate::signals::Signals;
use crate::supervisor::ProcessLauncher;

use super::{Config, LifecycleError};

/// Start the daemon: lock, restore the queue, bind the socket.
///
/// The queue is fully restored *before* the socket is bound, so no
/// command can ever observe a partially-restored queue.
pub fn startup(config: &Config) -> Result<Daemon, LifecycleError> {
    match startup_inner(config) {
        Ok(daemon) => Ok(daemon),
        Err(e) => {
            // Don't clean up if we failed to acquire the lock —
            // those files belong to the already-running daemon.
            if !matches!(e, LifecycleError::LockFailed(_)) {
                cleanup_on_failure(config);
            }
            Err(e)
        }
    }
}

fn startup_inner(config: &Config) -> Result<Daemon, LifecycleError> {
    // 1. Create the state directory (needed for socket, lock, backup)
    std::fs::create_dir_all(&config.state_dir)?;

    // 2. Acquire the lock file FIRST - prevents races.
    // Use OpenOptions to avoid truncating the file before we hold the
    // lock, which would wipe the running daemon's PID.
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)?;
    lock_file.try_lock_exclusive().map_err(LifecycleError::LockFailed)?;

    // Write PID to lock file (truncate now that we hold the lock)
    let mut lock_file = lock_file;
    lock_file.set_len(0)?;
    writeln!(lock_file, "{}", std::process::id())?;
    let lock_file = lock_file; // Drop mutability

    // 3. Restore the queue from the backup file (missing/corrupt is an
    // empty queue, never fatal)
    let queue = Queue::restore(&config.backup_path);
    info!(jobs = queue.len(), "restored queue");

    // 4. Install signal streams before any child can be spawned
    let signals = Signals::install()?;

    // 5. Remove a stale socket and bind (LAST - only after everything
    // else is in place)
    let listener = bind_socket(config)?;

    info!("Daemon started");

    Ok(Daemon::new(
        config.clone(),
        queue,
        Scheduler::new(RetryPolicy::default(), SystemClock),
        ProcessLauncher,
        listener,
        signals,
        lock_file,
    ))
}

/// Remove any stale socket file at the configured path and bind anew.
/// Also used by the daemon loop to reopen the socket after a
/// persistent accept failure.
pub(crate) fn bind_socket(config: &Config) -> Result<UnixListener, LifecycleError> {
    if config.socket_path.exists() {
        std::fs::remove_file(&config.socket_path)?;
    }
    UnixListener::bind(&config.socket_path)
        .map_err(|e| LifecycleError::BindFailed(config.socket_path.clone(), e))
}

/// Clean up resources on startup failure
fn cleanup_on_failure(config: &Config) {
    if config.socket_path.exists() {
        let _ = std::fs::remove_file(&config.socket_path);
    }
    if config.lock_path.exists() {
        let _ = std::fs::remove_file(&config.lock_path);
    }
}

/// Release filesystem artifacts on shutdown (socket and PID file).
/// The exclusive lock itself is released when the daemon's lock file
/// handle drops.
pub(crate) fn remove_runtime_files(config: &Config) {
    if config.socket_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.socket_path) {
            tracing::warn!("Failed to remove socket file: {}", e);
        }
    }
    if config.lock_path.exists() {
        if let Err(e) = std::fs::remove_file(&config.lock_path) {
            tracing::warn!("Failed to remove PID file: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "startup_tests.rs"]
mod tests;
