// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The interception layer and its install/activate lifecycle.
//!
//! Until the layer is [`Lifecycle::Active`] it controls nothing and every
//! request goes straight to the network. Once active, each GET is routed by
//! [`classify`] to a caching strategy. Cache reads and writes during request
//! handling are best effort: a storage failure is logged and treated as a
//! miss so the request still resolves.

use std::sync::{Arc, Mutex, PoisonError};

use ft_core::{ClockSource, SystemClock};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use super::cache::CacheNames;
use super::fallback::offline_fallback;
use super::fetcher::Fetcher;
use super::policy::{classify, Strategy};
use super::request::{cache_key, Request, Response};
use super::{InterceptConfig, InterceptError};
use crate::sync::OfflineStore;

/// Control message forcing a waiting layer to activate.
pub const SKIP_WAITING: &str = "SKIP_WAITING";
/// Control message asking for the current cache generation.
pub const GET_VERSION: &str = "GET_VERSION";

/// Lifecycle of one cache generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Lifecycle {
    /// Static manifest not yet cached.
    Installing,
    /// Installed, waiting to take control.
    Waiting,
    /// Handling requests.
    Active,
}

struct LayerState {
    lifecycle: Lifecycle,
    skip_waiting: bool,
}

/// Request interception layer.
pub struct InterceptLayer {
    config: InterceptConfig,
    names: CacheNames,
    store: Arc<OfflineStore>,
    fetcher: Arc<dyn Fetcher>,
    clock: Arc<dyn ClockSource>,
    state: Mutex<LayerState>,
}

impl InterceptLayer {
    pub fn new(config: InterceptConfig, store: Arc<OfflineStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        let names = CacheNames::new(&config.name_prefix, &config.generation);
        InterceptLayer {
            config,
            names,
            store,
            fetcher,
            clock: Arc::new(SystemClock),
            state: Mutex::new(LayerState { lifecycle: Lifecycle::Installing, skip_waiting: false }),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lock().lifecycle
    }

    pub fn cache_names(&self) -> &CacheNames {
        &self.names
    }

    pub fn config(&self) -> &InterceptConfig {
        &self.config
    }

    /// Fetch and cache every manifest asset, all or nothing.
    ///
    /// On success the layer waits for activation, or activates at once if
    /// [`InterceptLayer::skip_waiting`] was requested earlier.
    pub async fn install(&self) -> Result<usize, InterceptError> {
        self.set_lifecycle(Lifecycle::Installing);
        info!(cache = %self.names.static_cache, "installing static assets");

        let mut fetched = Vec::with_capacity(self.config.static_assets.len());
        for asset in &self.config.static_assets {
            let url = self
                .config
                .origin
                .join(asset)
                .map_err(|e| InterceptError::Install(format!("{asset}: {e}")))?;
            let request = Request::get(url);
            let response = self
                .fetcher
                .fetch(&request)
                .await
                .map_err(|e| InterceptError::Install(format!("{}: {e}", request.url)))?;
            if !response.is_success() {
                return Err(InterceptError::Install(format!(
                    "{} returned status {}",
                    request.url, response.status
                )));
            }
            fetched.push((request.cache_key(), response.to_stored(self.clock.now_ms())));
        }

        self.store.put_responses(&self.names.static_cache, &fetched).await?;
        info!(count = fetched.len(), "static assets cached");

        let activate_now = {
            let mut state = self.lock();
            state.lifecycle = Lifecycle::Waiting;
            state.skip_waiting
        };
        if activate_now {
            self.activate().await?;
        }
        Ok(fetched.len())
    }

    /// Drop caches from other generations and take control.
    ///
    /// Returns the names of the deleted caches.
    pub async fn activate(&self) -> Result<Vec<String>, InterceptError> {
        let mut deleted = Vec::new();
        for name in self.store.cache_names().await? {
            if self.names.is_current(&name) {
                continue;
            }
            let removed = self.store.delete_cache(&name).await?;
            info!(cache = %name, entries = removed, "deleted stale cache");
            deleted.push(name);
        }
        self.set_lifecycle(Lifecycle::Active);
        info!(version = self.names.version(), "interception layer active");
        Ok(deleted)
    }

    /// Activate as soon as installation finishes, or now if already waiting.
    pub async fn skip_waiting(&self) -> Result<(), InterceptError> {
        let waiting = {
            let mut state = self.lock();
            state.skip_waiting = true;
            state.lifecycle == Lifecycle::Waiting
        };
        if waiting {
            self.activate().await?;
        }
        Ok(())
    }

    /// Become active without reinstalling when this generation's static
    /// cache already exists from an earlier run. Returns the lifecycle.
    pub async fn resume(&self) -> Result<Lifecycle, InterceptError> {
        let names = self.store.cache_names().await?;
        if names.iter().any(|name| *name == self.names.static_cache) {
            self.activate().await?;
        }
        Ok(self.lifecycle())
    }

    /// Answer a control-channel message.
    ///
    /// `GET_VERSION` yields `{version}`; `SKIP_WAITING` yields nothing.
    pub async fn handle_control(&self, message: &Value) -> Result<Option<Value>, InterceptError> {
        match message.get("type").and_then(Value::as_str) {
            Some(SKIP_WAITING) => {
                self.skip_waiting().await?;
                Ok(None)
            }
            Some(GET_VERSION) => Ok(Some(json!({ "version": self.names.version() }))),
            other => {
                warn!(kind = ?other, "ignoring unknown control message");
                Ok(None)
            }
        }
    }

    /// Resolve `request` according to its strategy.
    ///
    /// Errors only when the network failed and nothing can stand in: a
    /// bypassed or passthrough request, an uncached static asset, or a
    /// navigation with no cached shell.
    pub async fn handle(&self, request: &Request) -> Result<Response, InterceptError> {
        if self.lifecycle() != Lifecycle::Active {
            return self.network(request).await;
        }
        match classify(request, &self.config.api_prefix) {
            Strategy::Bypass | Strategy::Passthrough => self.network(request).await,
            Strategy::NetworkFirstApi => Ok(self.network_first_api(request).await),
            Strategy::CacheFirst => self.cache_first(request).await,
            Strategy::NetworkFirstNavigation => self.network_first_navigation(request).await,
        }
    }

    async fn network(&self, request: &Request) -> Result<Response, InterceptError> {
        Ok(self.fetcher.fetch(request).await?)
    }

    async fn network_first_api(&self, request: &Request) -> Response {
        let key = request.cache_key();
        match self.fetcher.fetch(request).await {
            Ok(response) => {
                if response.is_success() {
                    self.remember(&self.names.api_cache, &key, &response).await;
                }
                response
            }
            Err(e) => {
                debug!(url = %key, error = %e, "network failed, trying api cache");
                match self.lookup(&self.names.api_cache, &key).await {
                    Some(cached) => cached,
                    None => {
                        info!(url = %key, "serving offline fallback");
                        offline_fallback(&request.url)
                    }
                }
            }
        }
    }

    async fn cache_first(&self, request: &Request) -> Result<Response, InterceptError> {
        let key = request.cache_key();
        if let Some(cached) = self.lookup(&self.names.static_cache, &key).await {
            return Ok(cached);
        }
        let response = self.fetcher.fetch(request).await.map_err(|e| {
            warn!(url = %key, error = %e, "static asset unavailable");
            InterceptError::from(e)
        })?;
        if response.is_success() {
            self.remember(&self.names.static_cache, &key, &response).await;
        }
        Ok(response)
    }

    async fn network_first_navigation(&self, request: &Request) -> Result<Response, InterceptError> {
        match self.fetcher.fetch(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                let shell = self
                    .config
                    .origin
                    .join(&self.config.shell_path)
                    .map(|url| cache_key(&url))
                    .map_err(|_| InterceptError::Network(e.to_string()))?;
                debug!(url = %request.url, shell = %shell, "navigation offline, serving shell");
                self.lookup(&self.names.static_cache, &shell)
                    .await
                    .ok_or_else(|| InterceptError::Network(e.to_string()))
            }
        }
    }

    async fn lookup(&self, cache: &str, key: &str) -> Option<Response> {
        match self.store.get_response(cache, key).await {
            Ok(found) => found.map(Response::from_stored),
            Err(e) => {
                warn!(cache, url = key, error = %e, "response cache read failed");
                None
            }
        }
    }

    async fn remember(&self, cache: &str, key: &str, response: &Response) {
        let stored = response.to_stored(self.clock.now_ms());
        if let Err(e) = self.store.put_response(cache, key, &stored).await {
            warn!(cache, url = key, error = %e, "response cache write failed");
        }
    }

    fn set_lifecycle(&self, lifecycle: Lifecycle) {
        self.lock().lifecycle = lifecycle;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LayerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[path = "layer_tests.rs"]
mod tests;
