// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Core types for warden: the job record, retry policy, and clock.
//!
//! Everything the daemon persists or schedules against lives here, so
//! that the wire and daemon crates agree on one data model.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod clock;
mod job;
mod retry;

pub use clock::{Clock, FakeClock, SystemClock};
pub use job::{Job, JobState};
pub use retry::RetryPolicy;
