// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ftrs - offline-first sync core for the fittrack app.
//!
//! This crate provides the async subsystem behind the `ft` CLI: it queues
//! mutations that could not reach the server, drains them once connectivity
//! returns, keeps a realtime channel open and fans its events out to
//! in-process subscribers, and answers requests from a generation-tagged
//! response cache when the network is gone.
//!
//! # Main Components
//!
//! - [`sync::OfflineStore`] - lazily-opened handle to the SQLite store in `ft-core`
//! - [`sync::SyncEngine`] - single-flight drain of pending mutations
//! - [`channel::ChannelClient`] - realtime channel with heartbeat and bounded backoff
//! - [`hub::EventHub`] - synchronous publish/subscribe with handler isolation
//! - [`intercept::InterceptLayer`] - per-resource-class caching strategies and offline fallbacks
//! - [`service::OfflineSync`] - submit-or-queue, read-through cache and drain triggers
//!
//! ```rust,ignore
//! use ftrs::{hub::EventHub, service::OfflineSync, sync::{HttpApi, OfflineStore}};
//!
//! let store = Arc::new(OfflineStore::at_path(Path::new("offline.db")));
//! let api = Arc::new(HttpApi::new("http://localhost:5000/api/v1", Duration::from_secs(15))?);
//! let sync = OfflineSync::new(store, api, EventHub::new());
//! sync.submit(MutationKind::Workout, json!({"name": "Leg Day"}), &token).await?;
//! ```

mod cli;
mod commands;

pub mod channel;
pub mod config;
pub mod error;
pub mod flight;
pub mod hub;
pub mod intercept;
pub mod service;
pub mod sync;

pub use cli::{CacheCommand, Cli, Command, OutputFormat, PrefCommand};
pub use config::Config;
pub use error::{Error, Result};

use commands::Context;

/// Runs `cli` to completion on a fresh tokio runtime.
pub fn run(cli: Cli) -> Result<()> {
    let config = Config::load(&config::config_path(cli.config.as_deref())?)?;
    let ctx = Context::new(config, cli.token)?;
    let runtime = tokio::runtime::Runtime::new()?;
    let mut stdout = std::io::stdout();
    runtime.block_on(commands::dispatch(cli.command, &ctx, &mut stdout))
}
