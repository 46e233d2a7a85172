// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Remote API used to submit mutations and fetch read models.
//!
//! Provides a trait-based seam so the sync engine can run against:
//! - The real HTTP API ([`HttpApi`], built on reqwest)
//! - Scripted mocks in tests

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use ft_core::{ApiEnvelope, MutationKind, ResourceClass};
use reqwest::header::AUTHORIZATION;
use reqwest::Url;
use serde_json::Value;

/// Error type for API operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The server could not be reached (offline, DNS, refused, timed out).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success response.
    #[error("rejected by server ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The response body was not the expected envelope.
    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid API URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// True when the failure means "could not reach the server".
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// Boxed future returned by [`Api`] methods.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = ApiResult<T>> + Send + 'a>>;

/// Remote API abstraction.
pub trait Api: Send + Sync {
    /// Submit one mutation. Any 2xx counts as accepted; resolves to the
    /// envelope's `data`, or the raw body when the server sent no envelope.
    fn submit(&self, kind: MutationKind, payload: Value, token: String) -> ApiFuture<'_, Value>;

    /// Fetch the full record list of a resource class.
    fn list(&self, resource: ResourceClass, token: String) -> ApiFuture<'_, Vec<Value>>;
}

/// HTTP implementation of [`Api`].
pub struct HttpApi {
    client: reqwest::Client,
    /// Always ends in `/` so relative joins append.
    base_url: Url,
}

impl HttpApi {
    /// Create a client for the API rooted at `base_url`.
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let mut url = Url::parse(base_url).map_err(|_| ApiError::InvalidUrl(base_url.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpApi { client, base_url: url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segment: &str) -> ApiResult<Url> {
        self.base_url.join(segment).map_err(|_| ApiError::InvalidUrl(segment.to_string()))
    }

    /// Send a request and check the status.
    ///
    /// Any 2xx is accepted unless the body is an envelope that says
    /// `success: false`.
    async fn send(&self, request: reqwest::RequestBuilder) -> ApiResult<Accepted> {
        let response = request.send().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
        let envelope: Option<ApiEnvelope> = serde_json::from_str(&body).ok();

        if !status.is_success() {
            let message = match &envelope {
                Some(env) => env.error_message().to_string(),
                None => status.canonical_reason().unwrap_or("request failed").to_string(),
            };
            return Err(ApiError::Rejected { status: status.as_u16(), message });
        }

        match envelope {
            Some(env) if !env.success => Err(ApiError::Rejected {
                status: status.as_u16(),
                message: env.error_message().to_string(),
            }),
            envelope => Ok(Accepted { envelope, body }),
        }
    }
}

/// A 2xx response.
struct Accepted {
    envelope: Option<ApiEnvelope>,
    body: String,
}

impl Accepted {
    /// The envelope's `data`, else the raw JSON body, else `null`.
    fn into_data(self) -> Value {
        match self.envelope {
            Some(env) => env.data,
            None => serde_json::from_str(&self.body).unwrap_or(Value::Null),
        }
    }
}

impl Api for HttpApi {
    fn submit(&self, kind: MutationKind, payload: Value, token: String) -> ApiFuture<'_, Value> {
        Box::pin(async move {
            let url = self.endpoint(kind.endpoint())?;
            let request = self
                .client
                .post(url)
                .header(AUTHORIZATION, format!("Bearer {token}"))
                .json(&payload);
            Ok(self.send(request).await?.into_data())
        })
    }

    fn list(&self, resource: ResourceClass, token: String) -> ApiFuture<'_, Vec<Value>> {
        Box::pin(async move {
            let url = self.endpoint(resource.endpoint())?;
            let request = self.client.get(url).header(AUTHORIZATION, format!("Bearer {token}"));
            let accepted = self.send(request).await?;
            let Some(envelope) = accepted.envelope else {
                return Err(ApiError::Decode(format!("expected a response envelope, got: {}", accepted.body)));
            };
            match envelope.data {
                Value::Array(records) => Ok(records),
                other => Err(ApiError::Decode(format!("expected a list of {resource}, got: {other}"))),
            }
        })
    }
}
