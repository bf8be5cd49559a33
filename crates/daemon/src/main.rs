// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `wardend` — the warden daemon.
//!
//! Runs in the foreground; an operator (or the client) backgrounds it.
//! Prints `READY` on stdout once the queue is restored and the control
//! socket is listening.

use std::io::Write;
use std::process::ExitCode;

use tracing::error;
use tracing_subscriber::EnvFilter;

use warden_daemon::lifecycle::{self, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let daemon = match lifecycle::startup(&config) {
        Ok(daemon) => daemon,
        Err(e) => {
            error!("startup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    // Handshake for whoever started us: the socket is live
    println!("READY");
    let _ = std::io::stdout().flush();

    match daemon.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("daemon loop failed: {e}");
            ExitCode::FAILURE
        }
    }
}
