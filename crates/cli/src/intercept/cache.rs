// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Generation-tagged cache names.

/// The two response caches owned by one cache generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheNames {
    /// Static assets and the application shell.
    pub static_cache: String,
    /// Successful API GET responses.
    pub api_cache: String,
}

impl CacheNames {
    pub fn new(prefix: &str, generation: &str) -> Self {
        CacheNames {
            static_cache: format!("{prefix}-pro-{generation}"),
            api_cache: format!("{prefix}-api-{generation}"),
        }
    }

    /// True for either current cache.
    pub fn is_current(&self, name: &str) -> bool {
        name == self.static_cache || name == self.api_cache
    }

    /// Version reported to the control channel.
    pub fn version(&self) -> &str {
        &self.static_cache
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
