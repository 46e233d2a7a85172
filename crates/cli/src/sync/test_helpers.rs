// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for sync module tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use ft_core::{MutationKind, ResourceClass};
use serde_json::{json, Value};

use super::api::{Api, ApiError, ApiFuture};

/// One recorded submission.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub kind: MutationKind,
    pub payload: Value,
    pub token: String,
}

/// Scripted [`Api`] that records what it was asked to do.
#[derive(Default)]
pub struct MockApi {
    offline: AtomicBool,
    rejected: Mutex<Vec<Value>>,
    delay: Mutex<Option<Duration>>,
    lists: Mutex<HashMap<ResourceClass, Vec<Value>>>,
    submissions: Mutex<Vec<Submission>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Every call fails with a transport error while set.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Submissions with exactly this payload are rejected by the "server".
    pub fn reject(&self, payload: Value) {
        self.rejected.lock().unwrap().push(payload);
    }

    /// Every submission takes this long.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn set_list(&self, resource: ResourceClass, records: Vec<Value>) {
        self.lists.lock().unwrap().insert(resource, records);
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.submissions.lock().unwrap().clone()
    }
}

impl Api for MockApi {
    fn submit(&self, kind: MutationKind, payload: Value, token: String) -> ApiFuture<'_, Value> {
        Box::pin(async move {
            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.offline.load(Ordering::SeqCst) {
                return Err(ApiError::Transport("network unreachable".into()));
            }
            if self.rejected.lock().unwrap().contains(&payload) {
                return Err(ApiError::Rejected { status: 400, message: "Validation failed".into() });
            }
            self.submissions.lock().unwrap().push(Submission {
                kind,
                payload: payload.clone(),
                token,
            });
            Ok(json!({ "_id": format!("srv-{}", self.submissions.lock().unwrap().len()), "echo": payload }))
        })
    }

    fn list(&self, resource: ResourceClass, _token: String) -> ApiFuture<'_, Vec<Value>> {
        Box::pin(async move {
            if self.offline.load(Ordering::SeqCst) {
                return Err(ApiError::Transport("network unreachable".into()));
            }
            Ok(self.lists.lock().unwrap().get(&resource).cloned().unwrap_or_default())
        })
    }
}
