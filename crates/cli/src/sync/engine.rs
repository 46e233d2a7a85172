// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Sync engine: drains pending mutations against the remote API.
//!
//! A drain walks every mutation kind, oldest entry first, and submits each
//! entry with its stored token and payload. An accepted entry is removed from
//! the store before the next one is attempted, so a crash mid-drain never
//! resubmits work the server already took. A failed submission is counted and
//! left queued for the next drain; only a store failure aborts the drain.

use std::sync::Arc;

use ft_core::MutationKind;
use serde::Serialize;
use serde_json::json;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::api::Api;
use super::queue::OfflineStore;
use crate::flight::Flight;
use crate::hub::EventHub;

/// Hub tag published after every drain.
pub const SYNC_COMPLETE_EVENT: &str = "sync_complete";

/// Outcome counts of one drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub succeeded: usize,
    pub failed: usize,
}

/// Error type for drain operations.
///
/// Cloneable so every caller joined to a drain sees the same outcome.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DrainError {
    /// The offline store failed; the drain stopped where it was.
    #[error("offline store failed during drain: {0}")]
    Storage(Arc<ft_core::Error>),

    /// The drain task was cancelled or panicked.
    #[error("drain aborted: {0}")]
    Aborted(String),
}

impl DrainError {
    fn storage(e: ft_core::Error) -> Self {
        DrainError::Storage(Arc::new(e))
    }
}

impl From<JoinError> for DrainError {
    fn from(e: JoinError) -> Self {
        DrainError::Aborted(e.to_string())
    }
}

struct Inner {
    store: Arc<OfflineStore>,
    api: Arc<dyn Api>,
    hub: EventHub,
    flight: Flight<DrainReport, DrainError>,
}

/// Drains the offline queue on demand.
///
/// Cloning yields another handle to the same engine. Concurrent calls to
/// [`SyncEngine::drain`] share one execution.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    pub fn new(store: Arc<OfflineStore>, api: Arc<dyn Api>, hub: EventHub) -> Self {
        SyncEngine { inner: Arc::new(Inner { store, api, hub, flight: Flight::new() }) }
    }

    /// Submit every pending mutation once.
    ///
    /// Entries enqueued while the drain is running may be left for the next one.
    pub async fn drain(&self) -> Result<DrainReport, DrainError> {
        let inner = Arc::clone(&self.inner);
        let (outcome, started) = self.inner.flight.join_or_spawn(move || run_drain(inner));
        if !started {
            debug!("joining drain already in progress");
        }
        outcome.await
    }

    /// True while a drain is running.
    pub fn is_draining(&self) -> bool {
        self.inner.flight.is_active()
    }

    pub fn store(&self) -> &Arc<OfflineStore> {
        &self.inner.store
    }

    pub fn hub(&self) -> &EventHub {
        &self.inner.hub
    }
}

async fn run_drain(inner: Arc<Inner>) -> Result<DrainReport, DrainError> {
    let mut report = DrainReport::default();

    for kind in MutationKind::ALL {
        let pending = inner.store.list_pending(kind).await.map_err(DrainError::storage)?;
        for mutation in pending {
            let submitted = inner
                .api
                .submit(kind, mutation.payload.clone(), mutation.auth_token.clone())
                .await;
            match submitted {
                Ok(_) => {
                    inner.store.remove_pending(&mutation.id).await.map_err(DrainError::storage)?;
                    report.succeeded += 1;
                    debug!(id = %mutation.id, %kind, "pending mutation submitted");
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(id = %mutation.id, %kind, error = %e, "pending mutation not submitted, keeping it queued");
                }
            }
        }
    }

    if report.succeeded + report.failed > 0 {
        info!(succeeded = report.succeeded, failed = report.failed, "drain finished");
    }
    inner
        .hub
        .publish(SYNC_COMPLETE_EVENT, &json!({ "succeeded": report.succeeded, "failed": report.failed }));
    Ok(report)
}
