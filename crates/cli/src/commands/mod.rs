// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command implementations for the `ft` binary.
//!
//! Each command takes a [`Context`] and writes its output to `out`, so tests
//! can run it against an in-memory store and a mock API.

use std::io::Write;
use std::sync::Arc;

use ft_core::{MutationKind, ResourceClass};
use serde_json::Value;

use crate::cli::{CacheCommand, Command, PrefCommand};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::hub::EventHub;
use crate::service::OfflineSync;
use crate::sync::{Api, HttpApi, OfflineStore};

pub mod cache;
pub mod intercept;
pub mod listen;
pub mod pref;
pub mod queue;
pub mod status;

/// Everything a command needs: configuration, credentials and the shared store.
pub struct Context {
    config: Config,
    token: Option<String>,
    store: Arc<OfflineStore>,
    hub: EventHub,
    api: Option<Arc<dyn Api>>,
}

impl Context {
    /// Context backed by the store file the config points at.
    pub fn new(config: Config, token: Option<String>) -> Result<Self> {
        let store = OfflineStore::at_path(&config.store_path()?);
        Ok(Self::with_store(config, token, Arc::new(store)))
    }

    pub fn with_store(config: Config, token: Option<String>, store: Arc<OfflineStore>) -> Self {
        Context { config, token, store, hub: EventHub::new(), api: None }
    }

    /// Use `api` instead of an HTTP client built from the config.
    pub fn with_api(mut self, api: Arc<dyn Api>) -> Self {
        self.api = Some(api);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &Arc<OfflineStore> {
        &self.store
    }

    pub fn hub(&self) -> &EventHub {
        &self.hub
    }

    /// The auth token, or [`Error::MissingToken`].
    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().filter(|t| !t.is_empty()).ok_or(Error::MissingToken)
    }

    pub fn api(&self) -> Result<Arc<dyn Api>> {
        if let Some(api) = &self.api {
            return Ok(Arc::clone(api));
        }
        let api = HttpApi::new(&self.config.api.base_url, self.config.api.request_timeout())?;
        Ok(Arc::new(api))
    }

    pub fn service(&self) -> Result<OfflineSync> {
        Ok(OfflineSync::new(Arc::clone(&self.store), self.api()?, self.hub.clone()))
    }
}

/// Runs one parsed command.
pub async fn dispatch(command: Command, ctx: &Context, out: &mut impl Write) -> Result<()> {
    match command {
        Command::Status { format } => status::run(ctx, format, out).await,
        Command::Enqueue { kind, payload } => queue::enqueue(ctx, &kind, &payload, out).await,
        Command::Submit { kind, payload, format } => {
            queue::submit(ctx, &kind, &payload, format, out).await
        }
        Command::Pending { kind, format } => queue::pending(ctx, kind.as_deref(), format, out).await,
        Command::Drain { format } => queue::drain(ctx, format, out).await,
        Command::Cache(CacheCommand::Show { resource, format }) => {
            cache::show(ctx, &resource, format, out).await
        }
        Command::Cache(CacheCommand::Refresh { resource, format }) => {
            cache::refresh(ctx, &resource, format, out).await
        }
        Command::Pref(PrefCommand::Get { key }) => pref::get(ctx, &key, out).await,
        Command::Pref(PrefCommand::Set { key, value }) => pref::set(ctx, &key, &value, out).await,
        Command::Clear { partition } => cache::clear(ctx, partition.as_deref(), out).await,
        Command::Listen { count } => listen::run(ctx, count, out).await,
        Command::Install => intercept::install(ctx, out).await,
        Command::Fetch { url, navigate, include } => {
            intercept::fetch(ctx, &url, navigate, include, out).await
        }
    }
}

pub(crate) fn parse_kind(kind: &str) -> Result<MutationKind> {
    Ok(kind.parse()?)
}

pub(crate) fn parse_resource(resource: &str) -> Result<ResourceClass> {
    Ok(resource.parse()?)
}

pub(crate) fn parse_payload(payload: &str) -> Result<Value> {
    serde_json::from_str(payload).map_err(|e| Error::InvalidPayload(e.to_string()))
}

#[cfg(test)]
pub(crate) mod test_helpers;
