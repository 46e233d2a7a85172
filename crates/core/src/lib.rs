// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ft-core: Shared library for the fittrack offline sync core
//!
//! This crate provides the data model, realtime wire protocol, API envelope
//! and the SQLite-backed durable store used by the `ft` CLI and its async
//! sync subsystem.

pub mod clock;
pub mod envelope;
pub mod error;
pub mod model;
pub mod protocol;
pub mod store;

pub use clock::{mutation_id, ClockSource, SystemClock};
pub use envelope::ApiEnvelope;
pub use error::{Error, Result};
pub use model::{
    record_key, MutationKind, Partition, PartitionStats, PendingMutation, ResourceClass,
    StoredResponse,
};
pub use protocol::{ClientFrame, ClientMessage, ServerMessage};
pub use store::Store;
