// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Async handle to the durable offline store.
//!
//! The SQLite store is opened lazily on first use. Initialization is
//! single-flight: callers that arrive while the store is opening wait for
//! that same open instead of racing to create the schema twice. A failed
//! open is not cached, so the next call tries again.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ft_core::{
    ClockSource, MutationKind, Partition, PartitionStats, PendingMutation, ResourceClass, Store,
    StoredResponse,
};
use serde_json::Value;
use tokio::sync::{Mutex, OnceCell};
use tracing::debug;

/// Result type for store operations.
pub type StoreResult<T> = ft_core::Result<T>;

enum Location {
    File(PathBuf),
    Memory,
}

/// Lazily-opened, shareable handle to the offline [`Store`].
pub struct OfflineStore {
    location: Location,
    clock: Option<Arc<dyn ClockSource>>,
    cell: OnceCell<Mutex<Store>>,
    #[cfg(test)]
    opens: std::sync::atomic::AtomicUsize,
}

impl OfflineStore {
    /// Store backed by a SQLite file at `path`.
    pub fn at_path(path: &Path) -> Self {
        Self::with_location(Location::File(path.to_path_buf()))
    }

    /// Store that lives only as long as this handle (for tests and dry runs).
    pub fn in_memory() -> Self {
        Self::with_location(Location::Memory)
    }

    fn with_location(location: Location) -> Self {
        OfflineStore {
            location,
            clock: None,
            cell: OnceCell::new(),
            #[cfg(test)]
            opens: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Use `clock` for mutation ids and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Path of the backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match &self.location {
            Location::File(path) => Some(path),
            Location::Memory => None,
        }
    }

    /// True once the store has been opened successfully.
    pub fn is_open(&self) -> bool {
        self.cell.initialized()
    }

    async fn handle(&self) -> StoreResult<&Mutex<Store>> {
        self.cell
            .get_or_try_init(|| async {
                #[cfg(test)]
                self.opens.fetch_add(1, std::sync::atomic::Ordering::SeqCst);

                let store = match &self.location {
                    Location::File(path) => {
                        debug!(path = %path.display(), "opening offline store");
                        Store::open(path)?
                    }
                    Location::Memory => Store::open_in_memory()?,
                };
                let store = match &self.clock {
                    Some(clock) => store.with_clock(Arc::clone(clock)),
                    None => store,
                };
                Ok::<_, ft_core::Error>(Mutex::new(store))
            })
            .await
    }

    /// Run `f` against the opened store.
    ///
    /// Each call is one self-contained store operation.
    pub async fn with<R>(&self, f: impl FnOnce(&Store) -> StoreResult<R>) -> StoreResult<R> {
        let store = self.handle().await?.lock().await;
        f(&store)
    }

    pub async fn enqueue_mutation(
        &self,
        kind: MutationKind,
        payload: &Value,
        auth_token: &str,
    ) -> StoreResult<String> {
        self.with(|s| s.enqueue_mutation(kind, payload, auth_token)).await
    }

    pub async fn list_pending(&self, kind: MutationKind) -> StoreResult<Vec<PendingMutation>> {
        self.with(|s| s.list_pending(kind)).await
    }

    pub async fn remove_pending(&self, id: &str) -> StoreResult<bool> {
        self.with(|s| s.remove_pending(id)).await
    }

    pub async fn pending_count(&self, kind: MutationKind) -> StoreResult<usize> {
        self.with(|s| s.pending_count(kind)).await
    }

    pub async fn has_pending_work(&self) -> StoreResult<bool> {
        self.with(Store::has_pending_work).await
    }

    pub async fn replace_cache(&self, resource: ResourceClass, records: &[Value]) -> StoreResult<()> {
        self.with(|s| s.replace_cache(resource, records)).await
    }

    pub async fn read_cache(&self, resource: ResourceClass) -> StoreResult<Vec<Value>> {
        self.with(|s| s.read_cache(resource)).await
    }

    pub async fn get_preference(&self, key: &str) -> StoreResult<Option<Value>> {
        self.with(|s| s.get_preference(key)).await
    }

    pub async fn set_preference(&self, key: &str, value: &Value) -> StoreResult<()> {
        self.with(|s| s.set_preference(key, value)).await
    }

    pub async fn put_response(
        &self,
        cache_name: &str,
        url: &str,
        response: &StoredResponse,
    ) -> StoreResult<()> {
        self.with(|s| s.put_response(cache_name, url, response)).await
    }

    pub async fn put_responses(
        &self,
        cache_name: &str,
        responses: &[(String, StoredResponse)],
    ) -> StoreResult<()> {
        self.with(|s| s.put_responses(cache_name, responses)).await
    }

    pub async fn get_response(&self, cache_name: &str, url: &str) -> StoreResult<Option<StoredResponse>> {
        self.with(|s| s.get_response(cache_name, url)).await
    }

    pub async fn cache_names(&self) -> StoreResult<Vec<String>> {
        self.with(Store::cache_names).await
    }

    pub async fn delete_cache(&self, cache_name: &str) -> StoreResult<usize> {
        self.with(|s| s.delete_cache(cache_name)).await
    }

    pub async fn clear_partition(&self, partition: Partition) -> StoreResult<usize> {
        self.with(|s| s.clear_partition(partition)).await
    }

    pub async fn clear_all(&self) -> StoreResult<()> {
        self.with(Store::clear_all).await
    }

    pub async fn stats(&self) -> StoreResult<Vec<(Partition, PartitionStats)>> {
        self.with(Store::stats).await
    }

    #[cfg(test)]
    pub(crate) fn open_count(&self) -> usize {
        self.opens.load(std::sync::atomic::Ordering::SeqCst)
    }
}
