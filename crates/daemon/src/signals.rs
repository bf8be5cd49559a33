// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Signal delivery into the single-threaded daemon loop.
//!
//! The handlers installed by tokio only flag the signal; nothing
//! happens in signal context. The daemon loop awaits [`Signals::next`]
//! once per iteration — reaping after SIGCHLD, shutdown after SIGTERM
//! or SIGINT — and its `biased` ordering ensures a termination request
//! wins over ordinary child processing when both are pending.

use tokio::signal::unix::{signal, Signal, SignalKind};

/// What a signal wakeup means to the daemon loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    /// SIGTERM or SIGINT: shut down
    Terminate,
    /// SIGCHLD: at least one child exited since the last drain
    ChildExited,
}

pub struct Signals {
    child: Signal,
    term: Signal,
    int: Signal,
}

impl Signals {
    pub fn install() -> std::io::Result<Self> {
        Ok(Self {
            child: signal(SignalKind::child())?,
            term: signal(SignalKind::terminate())?,
            int: signal(SignalKind::interrupt())?,
        })
    }

    /// Resolves on the next signal of interest. One `ChildExited`
    /// wakeup may stand for several exits; the caller drains them all.
    pub async fn next(&mut self) -> SignalEvent {
        let child = &mut self.child;
        tokio::select! {
            biased;
            _ = self.term.recv() => SignalEvent::Terminate,
            _ = self.int.recv() => SignalEvent::Terminate,
            _ = child_exited(child) => SignalEvent::ChildExited,
        }
    }
}

async fn child_exited(child: &mut Signal) {
    if child.recv().await.is_none() {
        // Stream closed: never resolve rather than spin the loop
        std::future::pending::<()>().await;
    }
}
