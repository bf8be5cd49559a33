// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy: exponential backoff with a hard retry bound.

/// How failed jobs are retried.
///
/// The delay doubles with each consecutive failure and is capped at
/// `max_delay_ms`, so successive retry deadlines are monotonically
/// non-decreasing. Once `max_retries` is exceeded the job is failed
/// permanently and an operator must resubmit it.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self { max_retries: 5, base_delay_ms: 1_000, max_delay_ms: 60_000 }
    }
}

impl RetryPolicy {
    /// Backoff delay before retry number `retry_count` (1-based).
    pub fn delay_for(&self, retry_count: u32) -> u64 {
        let shift = retry_count.saturating_sub(1).min(32);
        self.base_delay_ms
            .saturating_mul(1u64 << shift)
            .min(self.max_delay_ms)
    }

    /// True when another retry is allowed after `retry_count` failures.
    pub fn allows(&self, retry_count: u32) -> bool {
        retry_count <= self.max_retries
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
