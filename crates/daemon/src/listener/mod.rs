// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The daemon loop: one task owning the queue, the listening socket,
//! and the signal streams.
//!
//! Requests are serialized — a connection is accepted, decoded,
//! dispatched, answered, and closed before the next accept — so the
//! queue never needs a lock. Child exits and shutdown requests arrive
//! as signal-stream wakeups checked on every loop iteration, with
//! termination taking priority over ordinary exit processing.

use std::fs::File;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{UnixListener, UnixStream};
use tracing::{debug, error, info, warn};
use warden_core::Clock;
use warden_wire::{Decoder, ProtocolError};

use crate::dispatch;
use crate::lifecycle::{self, Config, LifecycleError};
use crate::queue::Queue;
use crate::scheduler::Scheduler;
use crate::signals::{SignalEvent, Signals};
use crate::supervisor::{self, Launcher, ProcessLauncher};

/// Give up on the listening socket after this many consecutive
/// accept-and-rebind failures.
const MAX_SOCKET_REOPENS: u32 = 3;

/// Idle sleep when no job has a deadline.
const IDLE_TICK: Duration = Duration::from_secs(60);

/// What woke the daemon loop up.
enum Wakeup {
    Terminate,
    ChildExited,
    Connection(UnixStream),
    AcceptError(std::io::Error),
    Deadline,
}

pub struct Daemon {
    config: Config,
    queue: Queue,
    scheduler: Scheduler,
    launcher: ProcessLauncher,
    listener: UnixListener,
    signals: Signals,
    // NOTE(lifetime): held to maintain the exclusive PID lock; released on drop
    #[allow(dead_code)]
    lock_file: File,
}

impl Daemon {
    pub fn new(
        config: Config,
        queue: Queue,
        scheduler: Scheduler,
        launcher: ProcessLauncher,
        listener: UnixListener,
        signals: Signals,
        lock_file: File,
    ) -> Self {
        Self { config, queue, scheduler, launcher, listener, signals, lock_file }
    }

    /// Run until a termination request or an unrecoverable listen
    /// failure. A single bad command or bad child never ends the loop,
    /// and every exit goes through [`Daemon::shutdown`] — children get
    /// their TERM and the runtime files are removed no matter why the
    /// loop ended.
    pub async fn run(mut self) -> Result<(), LifecycleError> {
        let result = self.serve().await;
        self.shutdown();
        result
    }

    async fn serve(&mut self) -> Result<(), LifecycleError> {
        let mut reopens: u32 = 0;
        loop {
            let idle = self.until_next_due();
            let wakeup = tokio::select! {
                biased;
                event = self.signals.next() => match event {
                    SignalEvent::Terminate => Wakeup::Terminate,
                    SignalEvent::ChildExited => Wakeup::ChildExited,
                },
                result = self.listener.accept() => match result {
                    Ok((stream, _)) => Wakeup::Connection(stream),
                    Err(e) => Wakeup::AcceptError(e),
                },
                _ = tokio::time::sleep(idle) => Wakeup::Deadline,
            };

            match wakeup {
                Wakeup::Terminate => {
                    info!("termination requested, shutting down");
                    return Ok(());
                }
                Wakeup::ChildExited => self.reap_exited(),
                Wakeup::Connection(stream) => {
                    reopens = 0;
                    self.handle_connection(stream).await;
                }
                Wakeup::AcceptError(e) => {
                    reopens += 1;
                    if reopens > MAX_SOCKET_REOPENS {
                        error!(error = %e, "listen socket kept failing, giving up");
                        return Err(LifecycleError::ListenFailed(reopens - 1));
                    }
                    warn!(error = %e, attempt = reopens, "accept failed, reopening socket");
                    // A failed rebind burns a reopen attempt too; the
                    // stale listener stays in place and errors again.
                    match lifecycle::bind_socket(&self.config) {
                        Ok(listener) => self.listener = listener,
                        Err(rebind) => warn!(error = %rebind, "rebind failed"),
                    }
                }
                Wakeup::Deadline => {
                    if self.scheduler.tick(&mut self.queue, &self.launcher) {
                        self.persist();
                    }
                }
            }
        }
    }

    /// Time until the earliest pending/sleeping deadline.
    fn until_next_due(&self) -> Duration {
        match self.queue.next_deadline() {
            Some(deadline_ms) => {
                Duration::from_millis(deadline_ms.saturating_sub(self.scheduler.now_ms()))
            }
            None => IDLE_TICK,
        }
    }

    /// Drain every exited child and let the scheduler decide each
    /// owning job's next state.
    fn reap_exited(&mut self) {
        let mut mutated = false;
        for (pid, kind) in supervisor::drain_exited() {
            match self.queue.job_for_pid(pid) {
                Some(job) => {
                    self.scheduler.on_exit(job, kind);
                    mutated = true;
                }
                // Stopped-and-removed before it exited, or not ours
                None => debug!(pid, "exit for pid with no owning job"),
            }
        }
        if mutated {
            self.persist();
        }
    }

    /// Serve one connection to completion: read a frame, dispatch it,
    /// write the response, close. Protocol errors close the connection
    /// without a response.
    async fn handle_connection(&mut self, mut stream: UnixStream) {
        let mutated = serve_stream(
            &mut stream,
            &mut self.queue,
            &self.scheduler,
            &self.launcher,
        )
        .await;
        if mutated {
            self.persist();
        }
    }

    /// Best-effort persistence: a failed write is logged and the
    /// in-memory mutation stands.
    fn persist(&self) {
        if let Err(e) = self.queue.persist(&self.config.backup_path) {
            warn!(path = %self.config.backup_path.display(), error = %e, "queue persist failed");
        }
    }

    fn shutdown(&mut self) {
        supervisor::terminate_all(&self.queue, &self.launcher);
        self.persist();
        lifecycle::remove_runtime_files(&self.config);
        info!("Daemon shutdown complete");
    }
}

/// Decode one request from `stream`, dispatch it, and answer.
/// Returns true when the queue was mutated.
pub(crate) async fn serve_stream<S, C, L>(
    stream: &mut S,
    queue: &mut Queue,
    scheduler: &Scheduler<C>,
    launcher: &L,
) -> bool
where
    S: AsyncRead + AsyncWrite + Unpin,
    C: Clock,
    L: Launcher,
{
    let timeout = crate::env::ipc_timeout();
    let mut decoder = Decoder::new();
    if let Err(e) = warden_wire::read_frame(stream, &mut decoder, timeout).await {
        log_protocol_error(e);
        return false;
    }
    let Some(frame) = decoder.frame() else {
        return false;
    };
    debug!(action = frame.action, id = frame.id, "received request");

    let outcome = dispatch::dispatch(&frame, queue, scheduler, launcher);
    if let Err(e) = warden_wire::write_response(stream, &outcome.response, timeout).await {
        warn!(error = %e, "failed to write response");
    }
    outcome.mutated
}

fn log_protocol_error(e: ProtocolError) {
    match e {
        ProtocolError::ConnectionClosed => debug!("client disconnected mid-frame"),
        ProtocolError::Timeout => warn!("connection timed out"),
        other => warn!(error = %other, "protocol error, closing connection"),
    }
}

#[cfg(test)]
#[path = "../listener_tests.rs"]
mod tests;
