// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Scripted fetcher for interception tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use url::Url;

use super::fetcher::{FetchError, FetchFuture, Fetcher};
use super::request::{Request, Response};
use super::InterceptConfig;

/// Fetcher answering from a route table. Unknown URLs fail like a dead network.
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, Response>>,
    offline: Mutex<bool>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockFetcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer GETs and other methods on `url` with `response`.
    pub fn route(&self, url: &str, response: Response) {
        self.routes.lock().unwrap().insert(url.to_string(), response);
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock().unwrap() = offline;
    }

    /// `(method, url)` of every fetch, in order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Fetcher for MockFetcher {
    fn fetch<'a>(&'a self, request: &'a Request) -> FetchFuture<'a> {
        let url = request.url.to_string();
        self.calls.lock().unwrap().push((request.method.to_string(), url.clone()));
        let offline = *self.offline.lock().unwrap();
        let routed = self.routes.lock().unwrap().get(&url).cloned();
        Box::pin(async move {
            if offline {
                return Err(FetchError("offline".into()));
            }
            routed.ok_or_else(|| FetchError(format!("no route to {url}")))
        })
    }
}

/// Config with a small manifest rooted at `http://app.test`.
pub fn test_config() -> InterceptConfig {
    InterceptConfig {
        origin: Url::parse("http://app.test").unwrap(),
        name_prefix: "fittrack".into(),
        generation: "v2".into(),
        api_prefix: "/api/".into(),
        shell_path: "/".into(),
        static_assets: vec!["/".into(), "/static/js/bundle.js".into(), "/manifest.json".into()],
    }
}
