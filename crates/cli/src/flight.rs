// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Single-flight execution for async operations.
//!
//! A [`Flight`] runs at most one instance of an operation at a time. Callers
//! that arrive while it is running join the same execution and observe the
//! same outcome. The operation is spawned on the runtime, so it runs to
//! completion even if every caller stops waiting.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};
use tokio::task::JoinError;

/// Cloneable handle to the outcome of one execution.
pub type SharedOutcome<T, E> = Shared<BoxFuture<'static, Result<T, E>>>;

struct Slot<T, E> {
    next_id: u64,
    current: Option<(u64, SharedOutcome<T, E>)>,
}

/// Guard that lets at most one execution of an operation be in flight.
pub struct Flight<T, E> {
    slot: Arc<Mutex<Slot<T, E>>>,
}

impl<T, E> Default for Flight<T, E> {
    fn default() -> Self {
        Flight { slot: Arc::new(Mutex::new(Slot { next_id: 0, current: None })) }
    }
}

impl<T, E> Flight<T, E>
where
    T: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + From<JoinError> + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the running execution, or spawn `start()` if none is running.
    ///
    /// The boolean is true when this call started a new execution.
    pub fn join_or_spawn<F, Fut>(&self, start: F) -> (SharedOutcome<T, E>, bool)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some((_, outcome)) = &slot.current {
            return (outcome.clone(), false);
        }

        let id = slot.next_id;
        slot.next_id = slot.next_id.wrapping_add(1);

        let fut = start();
        let owner = Arc::clone(&self.slot);
        let handle = tokio::spawn(async move {
            let result = fut.await;
            // Vacate the slot before the outcome is observed so the next
            // caller starts fresh instead of joining a finished execution.
            let mut slot = owner.lock().unwrap_or_else(PoisonError::into_inner);
            if matches!(slot.current, Some((current, _)) if current == id) {
                slot.current = None;
            }
            result
        });

        let outcome: SharedOutcome<T, E> =
            async move { handle.await.map_err(E::from).and_then(|r| r) }.boxed().shared();
        slot.current = Some((id, outcome.clone()));
        (outcome, true)
    }

    /// True while an execution is running.
    pub fn is_active(&self) -> bool {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).current.is_some()
    }

    /// Forget the running execution so the next call starts a new one.
    ///
    /// The forgotten execution keeps running; its callers still get its outcome.
    pub fn reset(&self) {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).current = None;
    }
}

#[cfg(test)]
#[path = "flight_tests.rs"]
mod tests;
