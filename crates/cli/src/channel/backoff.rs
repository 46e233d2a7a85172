// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded exponential backoff for reconnect scheduling.

use std::time::Duration;

/// Reconnect delay policy: `base * 2^(attempt - 1)` for at most `max_attempts`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub max_attempts: u32,
}

impl Backoff {
    pub fn new(base: Duration, max_attempts: u32) -> Self {
        Backoff { base, max_attempts }
    }

    /// Delay before the `attempt`-th reconnect (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        self.base.saturating_mul(1u32 << exponent)
    }

    /// Whether another attempt may be scheduled after `attempts_made`.
    pub fn allows(&self, attempts_made: u32) -> bool {
        attempts_made < self.max_attempts
    }
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
