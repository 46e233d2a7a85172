// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;
use std::sync::Arc;

use url::Url;

use crate::error::{Error, Result};
use crate::intercept::{HttpFetcher, InterceptError, InterceptLayer, Request, ResponseSource};

use super::Context;

fn layer(ctx: &Context) -> Result<InterceptLayer> {
    let config = ctx.config().cache.to_intercept_config()?;
    let fetcher = HttpFetcher::new(ctx.config().api.request_timeout()).map_err(InterceptError::from)?;
    Ok(InterceptLayer::new(config, Arc::clone(ctx.store()), Arc::new(fetcher)))
}

pub async fn install(ctx: &Context, out: &mut impl Write) -> Result<()> {
    install_impl(&layer(ctx)?, out).await
}

/// Internal implementation that accepts the layer for testing.
pub(crate) async fn install_impl(layer: &InterceptLayer, out: &mut impl Write) -> Result<()> {
    let cached = layer.install().await?;
    layer.skip_waiting().await?;
    writeln!(out, "Cached {} assets, active cache {}", cached, layer.cache_names().version())?;
    Ok(())
}

pub async fn fetch(
    ctx: &Context,
    url: &str,
    navigate: bool,
    include: bool,
    out: &mut impl Write,
) -> Result<()> {
    let token = ctx.token().ok();
    fetch_impl(&layer(ctx)?, url, token, navigate, include, out).await
}

/// Internal implementation that accepts the layer for testing.
pub(crate) async fn fetch_impl(
    layer: &InterceptLayer,
    url: &str,
    token: Option<&str>,
    navigate: bool,
    include: bool,
    out: &mut impl Write,
) -> Result<()> {
    layer.resume().await?;

    let url = resolve(&layer.config().origin, url)?;
    let mut request = if navigate { Request::navigate(url) } else { Request::get(url) };
    if let Some(token) = token {
        request = request.with_header("Authorization", format!("Bearer {}", token));
    }

    let response = layer.handle(&request).await?;
    if include {
        let source = match response.source {
            ResponseSource::Network => "network",
            ResponseSource::Cache => "cache",
            ResponseSource::Fallback => "offline fallback",
        };
        writeln!(out, "HTTP {} ({})", response.status, source)?;
    }
    out.write_all(&response.body)?;
    if !response.body.ends_with(b"\n") {
        writeln!(out)?;
    }
    Ok(())
}

/// Absolute URLs pass through; anything else is joined onto `origin`.
fn resolve(origin: &Url, url: &str) -> Result<Url> {
    Url::parse(url)
        .or_else(|_| origin.join(url))
        .map_err(|_| Error::InvalidUrl(url.to_string()))
}

#[cfg(test)]
#[path = "intercept_tests.rs"]
mod tests;
