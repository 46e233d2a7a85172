// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline-aware submission and read-through, plus drain triggers.
//!
//! [`OfflineSync`] ties the offline store, the API client and the sync engine
//! together. Writes go to the API first and fall back to the queue only when
//! the server is unreachable. Reads refresh the cached read model on success
//! and serve it when the server is unreachable.

use std::sync::Arc;

use ft_core::protocol::CONNECTION_EVENT;
use ft_core::{MutationKind, ResourceClass};
use serde::Serialize;
use serde_json::{json, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::channel::ChannelClient;
use crate::hub::{EventHub, Subscription};
use crate::sync::{Api, ApiError, DrainError, DrainReport, OfflineStore, SyncEngine};

/// Hub tag published when a submission is queued for later.
pub const MUTATION_QUEUED_EVENT: &str = "mutation_queued";

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The server accepted it.
    Submitted { data: Value },
    /// The server was unreachable; the mutation waits in the queue.
    Queued { id: String },
}

/// Records returned by [`OfflineSync::fetch`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchOutcome {
    pub records: Vec<Value>,
    /// True when served from the cached read model.
    pub offline: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("offline store failed: {0}")]
    Storage(#[from] ft_core::Error),

    /// Reachable server refused the request. Nothing was queued.
    #[error("{0}")]
    Api(ApiError),

    #[error(transparent)]
    Drain(#[from] DrainError),
}

/// Submission, read-through and drain orchestration.
#[derive(Clone)]
pub struct OfflineSync {
    store: Arc<OfflineStore>,
    api: Arc<dyn Api>,
    hub: EventHub,
    engine: SyncEngine,
}

impl OfflineSync {
    pub fn new(store: Arc<OfflineStore>, api: Arc<dyn Api>, hub: EventHub) -> Self {
        let engine = SyncEngine::new(Arc::clone(&store), Arc::clone(&api), hub.clone());
        OfflineSync { store, api, hub, engine }
    }

    pub fn store(&self) -> &Arc<OfflineStore> {
        &self.store
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// Submit now, or queue when the server is unreachable.
    pub async fn submit(
        &self,
        kind: MutationKind,
        payload: Value,
        token: &str,
    ) -> Result<SubmitOutcome, SyncError> {
        match self.api.submit(kind, payload.clone(), token.to_string()).await {
            Ok(data) => Ok(SubmitOutcome::Submitted { data }),
            Err(e) if e.is_transport() => {
                let id = self.store.enqueue_mutation(kind, &payload, token).await?;
                info!(%id, %kind, error = %e, "server unreachable, mutation queued");
                self.hub.publish(MUTATION_QUEUED_EVENT, &json!({ "id": id, "kind": kind.as_str() }));
                Ok(SubmitOutcome::Queued { id })
            }
            Err(e) => Err(SyncError::Api(e)),
        }
    }

    /// Fetch a resource list, refreshing the cache, or serve the cache offline.
    pub async fn fetch(&self, resource: ResourceClass, token: &str) -> Result<FetchOutcome, SyncError> {
        match self.api.list(resource, token.to_string()).await {
            Ok(records) => {
                self.store.replace_cache(resource, &records).await?;
                debug!(%resource, count = records.len(), "read model refreshed");
                Ok(FetchOutcome { records, offline: false })
            }
            Err(e) if e.is_transport() => {
                let records = self.store.read_cache(resource).await?;
                info!(%resource, count = records.len(), error = %e, "server unreachable, serving cache");
                Ok(FetchOutcome { records, offline: true })
            }
            Err(e) => Err(SyncError::Api(e)),
        }
    }

    /// Drain the queue now.
    pub async fn drain(&self) -> Result<DrainReport, SyncError> {
        Ok(self.engine.drain().await?)
    }

    /// Drain on every offline to online transition of `online`.
    ///
    /// The task ends when the sender is dropped.
    pub fn watch_connectivity(&self, mut online: watch::Receiver<bool>) -> JoinHandle<()> {
        let engine = self.engine.clone();
        tokio::spawn(async move {
            let mut was_online = *online.borrow_and_update();
            while online.changed().await.is_ok() {
                let now_online = *online.borrow_and_update();
                if now_online && !was_online {
                    info!("connectivity restored, draining offline queue");
                    log_drain(engine.drain().await);
                }
                was_online = now_online;
            }
            debug!("connectivity watch ended");
        })
    }

    /// Drain every time `channel` reports it connected.
    pub fn attach_channel(&self, channel: &ChannelClient) -> Subscription {
        let engine = self.engine.clone();
        channel.hub().on(CONNECTION_EVENT, move |event| {
            if event.get("status").and_then(Value::as_str) != Some("connected") {
                return;
            }
            let Ok(runtime) = tokio::runtime::Handle::try_current() else {
                warn!("no async runtime, skipping drain after reconnect");
                return;
            };
            let engine = engine.clone();
            runtime.spawn(async move { log_drain(engine.drain().await) });
        })
    }
}

fn log_drain(result: Result<DrainReport, DrainError>) {
    match result {
        Ok(report) => debug!(succeeded = report.succeeded, failed = report.failed, "triggered drain done"),
        Err(e) => warn!(error = %e, "triggered drain failed"),
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
