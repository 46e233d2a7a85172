// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ft-core operations.

use thiserror::Error;

/// All possible errors that can occur in ft-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid mutation kind: '{0}'\n  hint: valid kinds are: workout, measurement")]
    InvalidKind(String),

    #[error("invalid resource class: '{0}'\n  hint: valid resources are: workouts, measurements")]
    InvalidResource(String),

    #[error("invalid partition: '{0}'\n  hint: valid partitions are: pending, cache, preferences, responses")]
    InvalidPartition(String),

    #[error("record at position {position} in {resource} has no '_id' or 'id' field")]
    MissingRecordId { resource: String, position: usize },

    #[error("{0}")]
    InvalidInput(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// True when the persistent medium itself failed (unavailable, locked, full).
    ///
    /// Callers use this to tell a storage failure apart from bad input.
    pub fn is_storage_failure(&self) -> bool {
        matches!(self, Error::Database(_) | Error::Io(_))
    }
}

/// A specialized Result type for ft-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
