// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Network seam for the interception layer.
//!
//! A fetch fails only when no response arrived. Any HTTP status, including
//! 4xx and 5xx, is a response.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use super::request::{Request, Response};

/// Error returned when the network could not produce a response.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("network request failed: {0}")]
pub struct FetchError(pub String);

/// Boxed future returned by [`Fetcher::fetch`].
pub type FetchFuture<'a> = Pin<Box<dyn Future<Output = Result<Response, FetchError>> + Send + 'a>>;

/// Something that can perform a request over the network.
pub trait Fetcher: Send + Sync {
    fn fetch<'a>(&'a self, request: &'a Request) -> FetchFuture<'a>;
}

/// [`Fetcher`] backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError(e.to_string()))?;
        Ok(HttpFetcher { client })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch<'a>(&'a self, request: &'a Request) -> FetchFuture<'a> {
        Box::pin(async move {
            let mut builder = self.client.request(request.method.clone(), request.url.clone());
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if !request.body.is_empty() {
                builder = builder.body(request.body.clone());
            }

            let response = builder.send().await.map_err(|e| FetchError(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| {
                    value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string()))
                })
                .collect();
            let body = response.bytes().await.map_err(|e| FetchError(e.to_string()))?;

            Ok(Response { headers, ..Response::new(status, body.to_vec()) })
        })
    }
}
