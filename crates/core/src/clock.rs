// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wall clock access and mutation id generation.
//!
//! Mutation ids are `{kind}_{wall_ms}_{suffix}` where the suffix is nine
//! random base36 characters. The time prefix keeps ids roughly sortable;
//! the suffix makes collisions within the same millisecond negligible.

use rand::Rng;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::MutationKind;

const ID_SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Trait for getting the current wall clock time.
///
/// This allows injecting a mock clock for testing.
pub trait ClockSource: Send + Sync {
    /// Returns the current time in milliseconds since Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System clock implementation using `std::time::SystemTime`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl ClockSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
    }
}

impl<C: ClockSource> ClockSource for &C {
    fn now_ms(&self) -> u64 {
        (*self).now_ms()
    }
}

impl<C: ClockSource + ?Sized> ClockSource for std::sync::Arc<C> {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Generates a globally unique mutation id for the given kind and time.
pub fn mutation_id(kind: MutationKind, wall_ms: u64) -> String {
    mutation_id_with_rng(kind, wall_ms, &mut rand::thread_rng())
}

/// Same as [`mutation_id`] but with an explicit random source.
pub fn mutation_id_with_rng<R: Rng + ?Sized>(kind: MutationKind, wall_ms: u64, rng: &mut R) -> String {
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("{}_{}_{}", kind.as_str(), wall_ms, suffix)
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
