// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatcher: maps a parsed frame onto queue and scheduler
//! operations, producing one response.
//!
//! All handlers run synchronously on the connection that sent the
//! request and never block on a child process — launching is
//! fire-and-forget, observation happens later via reaping.

use std::fmt::Write as _;

use warden_core::{Clock, Job};
use warden_wire::{Frame, Response};

use crate::queue::Queue;
use crate::scheduler::Scheduler;
use crate::supervisor::Launcher;

const HELP: &str = "\
usage: warden [-q] <action> [id] [args...]

actions:
  start <id> <argv...>        run a one-shot job
  every <id> <secs> <argv...> run a job now and every <secs> seconds
  stop <id>                   terminate a job and drop it from the queue
  remove <id>                 drop a finished (stopped/failed) job
  list                        show all jobs
  status <id>                 exit with the job's last exit status
  help                        this text
";

/// Result of dispatching one command.
pub struct Dispatch {
    pub response: Response,
    /// True when the queue changed and must be persisted.
    pub mutated: bool,
}

impl Dispatch {
    fn reply(response: Response) -> Self {
        Self { response, mutated: false }
    }

    fn mutation(response: Response) -> Self {
        Self { response, mutated: true }
    }
}

pub fn dispatch<C: Clock>(
    frame: &Frame<'_>,
    queue: &mut Queue,
    scheduler: &Scheduler<C>,
    launcher: &impl Launcher,
) -> Dispatch {
    match frame.action {
        "help" => Dispatch::reply(Response::text(HELP)),
        "list" => Dispatch::reply(list(queue)),
        "start" => start(frame, queue, scheduler, launcher, None),
        "every" => every(frame, queue, scheduler, launcher),
        "stop" => stop(frame, queue, launcher),
        "remove" => remove(frame, queue),
        "status" => Dispatch::reply(status(frame, queue)),
        other => Dispatch::reply(Response::error(format!("unknown action '{other}'"))),
    }
}

fn start<C: Clock>(
    frame: &Frame<'_>,
    queue: &mut Queue,
    scheduler: &Scheduler<C>,
    launcher: &impl Launcher,
    interval_ms: Option<u64>,
) -> Dispatch {
    if frame.id.is_empty() {
        return Dispatch::reply(Response::error(format!("{} requires a job id", frame.action)));
    }
    let argv: Vec<String> = frame.args.iter().map(|s| s.to_string()).collect();
    if argv.is_empty() {
        return Dispatch::reply(Response::error(format!("{} requires an executable", frame.action)));
    }
    if queue.get(frame.id).is_some_and(|existing| !existing.is_terminal()) {
        return Dispatch::reply(Response::error(format!("job '{}' already queued", frame.id)));
    }

    let mut job = match interval_ms {
        Some(interval) => Job::recurring(frame.id, argv, interval),
        None => Job::new(frame.id, argv),
    };
    job.next_run_ms = scheduler.now_ms();

    // Launch before queuing so an exec failure is reported to this
    // command and nothing is left behind.
    if let Err(e) = scheduler.launch(&mut job, launcher) {
        return Dispatch::reply(Response::error(format!("cannot start '{}': {e}", frame.id)));
    }
    match queue.insert(job) {
        Ok(()) => Dispatch::mutation(Response::Ok),
        Err(e) => Dispatch::reply(Response::error(e.to_string())),
    }
}

fn every<C: Clock>(
    frame: &Frame<'_>,
    queue: &mut Queue,
    scheduler: &Scheduler<C>,
    launcher: &impl Launcher,
) -> Dispatch {
    let Some((secs, argv)) = frame.args.split_first() else {
        return Dispatch::reply(Response::error("every requires an interval and an executable"));
    };
    let interval_ms = secs
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .and_then(|secs| secs.checked_mul(1_000));
    let Some(interval_ms) = interval_ms else {
        return Dispatch::reply(Response::error(format!(
            "invalid interval '{secs}': expected seconds > 0"
        )));
    };
    let inner = Frame { action: frame.action, id: frame.id, args: argv.to_vec() };
    start(&inner, queue, scheduler, launcher, Some(interval_ms))
}

fn stop(frame: &Frame<'_>, queue: &mut Queue, launcher: &impl Launcher) -> Dispatch {
    let Some(job) = queue.get(frame.id) else {
        return Dispatch::reply(Response::error(format!("no such job '{}'", frame.id)));
    };
    if let Some(pid) = job.pid {
        launcher.terminate(pid);
    }
    // The job is gone from the queue; its eventual exit is reaped and
    // discarded as unowned.
    queue.remove(frame.id);
    Dispatch::mutation(Response::Ok)
}

fn remove(frame: &Frame<'_>, queue: &mut Queue) -> Dispatch {
    match queue.get(frame.id) {
        None => Dispatch::reply(Response::error(format!("no such job '{}'", frame.id))),
        Some(job) if !job.is_terminal() => Dispatch::reply(Response::error(format!(
            "job '{}' is {}; stop it first",
            frame.id, job.state
        ))),
        Some(_) => {
            queue.remove(frame.id);
            Dispatch::mutation(Response::Ok)
        }
    }
}

fn list(queue: &Queue) -> Response {
    if queue.is_empty() {
        return Response::text("no jobs\n");
    }
    let mut out = String::new();
    for job in queue.jobs() {
        let exit = job
            .last_exit_status
            .map_or_else(|| "-".to_string(), |code| code.to_string());
        let _ = writeln!(out, "{} {} retries={} exit={}", job.id, job.state, job.retry_count, exit);
    }
    Response::Text(out)
}

fn status(frame: &Frame<'_>, queue: &Queue) -> Response {
    match queue.get(frame.id) {
        None => Response::error(format!("no such job '{}'", frame.id)),
        Some(job) => match job.last_exit_status {
            Some(code) => Response::ExitCode(code),
            None => Response::Text(format!("{}\n", job.state)),
        },
    }
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
