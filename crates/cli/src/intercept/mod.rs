// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request interception layer: the network-boundary cache.
//!
//! | Request | Strategy | Network down |
//! |---|---|---|
//! | not GET | bypass | error |
//! | GET under the API prefix | network first, cache 2xx | cached, else synthesized envelope |
//! | static asset | cache first | error |
//! | navigation | network first | cached application shell, else error |

mod cache;
mod fallback;
mod fetcher;
mod layer;
mod policy;
mod request;

use url::Url;

pub use cache::CacheNames;
pub use fallback::{offline_fallback, OFFLINE_ERROR, OFFLINE_LIST_MESSAGE};
pub use fetcher::{FetchError, FetchFuture, Fetcher, HttpFetcher};
pub use layer::{InterceptLayer, Lifecycle, GET_VERSION, SKIP_WAITING};
pub use policy::{classify, is_static_asset, Strategy};
pub use request::{Request, RequestMode, Response, ResponseSource};

/// Settings for one cache generation.
#[derive(Debug, Clone, PartialEq)]
pub struct InterceptConfig {
    /// Origin that relative manifest paths resolve against.
    pub origin: Url,
    pub name_prefix: String,
    pub generation: String,
    /// Path prefix of API requests.
    pub api_prefix: String,
    /// Path of the application shell served to offline navigations.
    pub shell_path: String,
    /// Assets cached at install, relative to `origin` or absolute.
    pub static_assets: Vec<String>,
}

/// Error type for interception operations.
#[derive(Debug, thiserror::Error)]
pub enum InterceptError {
    /// The network failed and nothing could stand in.
    #[error("network unavailable: {0}")]
    Network(String),

    #[error("response cache failed: {0}")]
    Storage(#[from] ft_core::Error),

    /// A manifest asset could not be fetched; nothing was cached.
    #[error("install failed: {0}")]
    Install(String),
}

impl From<FetchError> for InterceptError {
    fn from(e: FetchError) -> Self {
        InterceptError::Network(e.0)
    }
}

#[cfg(test)]
pub(crate) mod test_helpers;
