// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

use crate::channel::ChannelError;
use crate::intercept::InterceptError;
use crate::service::SyncError;
use crate::sync::{ApiError, DrainError};

/// All errors the `ft` commands can report.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("no auth token\n  hint: pass --token or set FITTRACK_TOKEN")]
    MissingToken,

    #[error("invalid JSON payload: {0}")]
    InvalidPayload(String),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error(transparent)]
    Store(#[from] ft_core::Error),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Drain(#[from] DrainError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error(transparent)]
    Channel(#[from] ChannelError),

    #[error(transparent)]
    Intercept(#[from] InterceptError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
