// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Warden daemon library.
//!
//! The daemon keeps a persistent queue of jobs, runs them as child
//! processes in their own process groups, retries failures with
//! exponential backoff, and answers control requests over a Unix
//! socket. All queue logic runs on a single task; see `listener`.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod dispatch;
pub mod env;
pub mod lifecycle;
pub mod listener;
pub mod queue;
pub mod scheduler;
pub mod signals;
pub mod supervisor;

#[cfg(test)]
pub(crate) mod test_support;
