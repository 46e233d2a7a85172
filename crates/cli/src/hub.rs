// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event fan-out hub.
//!
//! Decouples producers (sync engine, realtime channel) from consumers. A
//! publish delivers synchronously to every handler subscribed to the tag at
//! the moment of the call, in subscription order. A handler that returns an
//! error or panics is logged and skipped; the rest still run.

use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use serde_json::Value;
use tracing::warn;

/// Error type handlers may return.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result of a single handler invocation.
pub type HandlerResult = Result<(), BoxError>;

type Handler = Arc<dyn Fn(&Value) -> HandlerResult + Send + Sync>;

#[derive(Default)]
struct HubState {
    next_id: u64,
    handlers: BTreeMap<String, Vec<(u64, Handler)>>,
}

/// Outcome of one publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// In-process publish/subscribe hub keyed by event tag.
///
/// Cloning yields another handle to the same hub.
#[derive(Clone, Default)]
pub struct EventHub {
    state: Arc<Mutex<HubState>>,
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHub").field("subscribers", &self.total_subscribers()).finish()
    }
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fallible handler for `tag`.
    pub fn subscribe<F>(&self, tag: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Value) -> HandlerResult + Send + Sync + 'static,
    {
        let tag = tag.into();
        let mut state = self.lock();
        let id = state.next_id;
        state.next_id = state.next_id.wrapping_add(1);
        state.handlers.entry(tag.clone()).or_default().push((id, Arc::new(handler)));
        Subscription { state: Arc::downgrade(&self.state), tag, id }
    }

    /// Register a handler that cannot fail.
    pub fn on<F>(&self, tag: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.subscribe(tag, move |data| {
            handler(data);
            Ok(())
        })
    }

    /// Deliver `data` to every handler currently subscribed to `tag`.
    pub fn publish(&self, tag: &str, data: &Value) -> Delivery {
        // Snapshot so handlers may subscribe, unsubscribe or publish re-entrantly.
        let handlers: Vec<Handler> = match self.lock().handlers.get(tag) {
            Some(entries) => entries.iter().map(|(_, h)| Arc::clone(h)).collect(),
            None => return Delivery::default(),
        };

        let mut delivery = Delivery::default();
        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(data))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(e)) => {
                    delivery.failed += 1;
                    warn!(tag, error = %e, "event handler failed");
                }
                Err(panic) => {
                    delivery.failed += 1;
                    warn!(tag, panic = panic_message(&*panic), "event handler panicked");
                }
            }
        }
        delivery
    }

    /// Number of handlers subscribed to `tag`.
    pub fn subscriber_count(&self, tag: &str) -> usize {
        self.lock().handlers.get(tag).map_or(0, Vec::len)
    }

    pub fn total_subscribers(&self) -> usize {
        self.lock().handlers.values().map(Vec::len).sum()
    }

    /// Tags with at least one subscriber.
    pub fn tags(&self) -> Vec<String> {
        self.lock().handlers.keys().cloned().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HubState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Handle returned by [`EventHub::subscribe`].
///
/// Dropping it does not unsubscribe.
#[derive(Debug, Clone)]
pub struct Subscription {
    state: Weak<Mutex<HubState>>,
    tag: String,
    id: u64,
}

impl Subscription {
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// True while this handler is still subscribed.
    pub fn is_active(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let state = state.lock().unwrap_or_else(PoisonError::into_inner);
        state
            .handlers
            .get(&self.tag)
            .is_some_and(|entries| entries.iter().any(|(id, _)| *id == self.id))
    }

    /// Remove exactly this handler. Returns false if it was already gone.
    pub fn unsubscribe(&self) -> bool {
        let Some(state) = self.state.upgrade() else {
            return false;
        };
        let mut state = state.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(entries) = state.handlers.get_mut(&self.tag) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|(id, _)| *id != self.id);
        let removed = entries.len() < before;
        if entries.is_empty() {
            state.handlers.remove(&self.tag);
        }
        removed
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
