// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline queue and drain subsystem.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  SyncEngine  │────►│  Api (trait)│────►│  REST API   │
//! │   (drain)    │     │   HttpApi   │     │             │
//! └──────────────┘     └─────────────┘     └─────────────┘
//!        │   │
//!        │   └──────► EventHub ("sync_complete")
//!        ▼
//! ┌──────────────┐
//! │ OfflineStore │  (SQLite, opened once on first use)
//! └──────────────┘
//! ```

mod api;
mod engine;
mod queue;

pub use api::{Api, ApiError, ApiFuture, ApiResult, HttpApi};
pub use engine::{DrainError, DrainReport, SyncEngine, SYNC_COMPLETE_EVENT};
pub use queue::{OfflineStore, StoreResult};

#[cfg(test)]
pub(crate) mod test_helpers;
