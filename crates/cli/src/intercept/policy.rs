// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Per-request strategy selection.

use reqwest::Method;
use url::Url;

use super::request::{Request, RequestMode};

/// Strategy applied to one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Not GET: sent straight to the network, never cached.
    Bypass,
    /// API GET: network first, successful responses cached.
    NetworkFirstApi,
    /// Static asset: cache first.
    CacheFirst,
    /// Document load: network first, application shell offline.
    NetworkFirstNavigation,
    /// Anything else: left alone.
    Passthrough,
}

const STATIC_EXTENSIONS: &[&str] = &[".js", ".css", ".png", ".jpg", ".svg", ".woff", ".woff2"];
const FONT_HOSTS: &[&str] = &["fonts.googleapis.com", "fonts.gstatic.com"];

/// Pick the strategy for `request`. Checks run in a fixed order, first match wins.
pub fn classify(request: &Request, api_prefix: &str) -> Strategy {
    if request.method != Method::GET {
        Strategy::Bypass
    } else if request.url.path().starts_with(api_prefix) {
        Strategy::NetworkFirstApi
    } else if is_static_asset(&request.url) {
        Strategy::CacheFirst
    } else if request.mode == RequestMode::Navigate {
        Strategy::NetworkFirstNavigation
    } else {
        Strategy::Passthrough
    }
}

pub fn is_static_asset(url: &Url) -> bool {
    let path = url.path();
    path.starts_with("/static/")
        || STATIC_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || url.host_str().is_some_and(|host| FONT_HOSTS.contains(&host))
}

#[cfg(test)]
#[path = "policy_tests.rs"]
mod tests;
