// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `warden` — thin client for the warden daemon.
//!
//! Every invocation is one round trip: encode the command line as a
//! request frame, send it over the control socket, interpret the single
//! response buffer, exit. All job knowledge lives in the daemon.

use std::process::ExitCode;

use clap::Parser;
use warden_wire::Response;

mod client;
mod env;
mod exit_error;

use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "warden", version, about = "Control the warden job daemon")]
struct Cli {
    /// Suppress daemon output; only the exit code reports the outcome
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,

    /// Action to perform (start, every, stop, remove, list, status, help)
    action: Option<String>,

    /// Job id, for actions that take one
    id: Option<String>,

    /// Remaining arguments: the interval for `every`, then the job's argv
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if let Some(message) = e.message() {
                eprintln!("{message}");
            }
            ExitCode::from(e.code())
        }
    }
}

async fn run(cli: &Cli) -> Result<(), ExitError> {
    let socket = env::socket_path().map_err(|e| ExitError::new(2, format!("warden: {e}")))?;
    let action = cli.action.as_deref().unwrap_or("help");
    let id = cli.id.as_deref().unwrap_or("");

    let response = client::send(&socket, action, id, &cli.args)
        .await
        .map_err(|e| ExitError::new(2, format!("warden: {e}")))?;

    match response {
        Response::Ok => Ok(()),
        Response::Text(body) => {
            if !cli.quiet {
                print!("{body}");
            }
            Ok(())
        }
        // Daemon errors wear the `failed:` prefix; `warden:` is for
        // the client's own transport failures.
        Response::Error(message) => Err(if cli.quiet {
            ExitError::silent(1)
        } else {
            ExitError::new(1, format!("failed: {message}"))
        }),
        Response::ExitCode(code) => {
            if code == 0 {
                Ok(())
            } else {
                Err(ExitError::silent(code))
            }
        }
    }
}

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
