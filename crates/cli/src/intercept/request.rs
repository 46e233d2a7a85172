// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Request and response values seen by the interception layer.

use ft_core::StoredResponse;
use reqwest::Method;
use serde_json::Value;
use url::Url;

/// How the request was initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestMode {
    /// Top-level document load.
    Navigate,
    #[default]
    Subresource,
}

/// An outbound request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub mode: RequestMode,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Request {
    pub fn new(method: Method, url: Url) -> Self {
        Request { method, url, mode: RequestMode::Subresource, headers: Vec::new(), body: Vec::new() }
    }

    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn navigate(url: Url) -> Self {
        Request { mode: RequestMode::Navigate, ..Self::get(url) }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Key under which responses to this request are cached.
    pub fn cache_key(&self) -> String {
        cache_key(&self.url)
    }
}

pub(crate) fn cache_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

/// Where a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Network,
    Cache,
    /// Synthesized because the network failed and nothing was cached.
    Fallback,
}

/// A response handed back to the application.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub source: ResponseSource,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Response { status, headers: Vec::new(), body: body.into(), source: ResponseSource::Network }
    }

    /// JSON response with a content type header.
    pub fn json(status: u16, value: &Value) -> Self {
        Response {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: value.to_string().into_bytes(),
            source: ResponseSource::Network,
        }
    }

    /// 2xx status.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter().find(|(n, _)| n.eq_ignore_ascii_case(name)).map(|(_, v)| v.as_str())
    }

    pub fn body_json(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub(crate) fn with_source(mut self, source: ResponseSource) -> Self {
        self.source = source;
        self
    }

    pub(crate) fn to_stored(&self, stored_at: u64) -> StoredResponse {
        StoredResponse {
            status: self.status,
            headers: self.headers.clone(),
            body: self.body.clone(),
            stored_at,
        }
    }

    pub(crate) fn from_stored(stored: StoredResponse) -> Self {
        Response {
            status: stored.status,
            headers: stored.headers,
            body: stored.body,
            source: ResponseSource::Cache,
        }
    }
}
