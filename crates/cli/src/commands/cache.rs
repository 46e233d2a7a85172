// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use ft_core::Partition;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::error::Result;

use super::{parse_resource, Context};

/// Print the cached read model of a resource.
pub async fn show(ctx: &Context, resource: &str, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let resource = parse_resource(resource)?;
    let records = ctx.store().read_cache(resource).await?;
    print_records(&records, format, out)
}

/// Fetch from the server, replacing the cache; serves the cache when unreachable.
pub async fn refresh(
    ctx: &Context,
    resource: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let resource = parse_resource(resource)?;
    let token = ctx.token()?;
    let fetched = ctx.service()?.fetch(resource, token).await?;

    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&fetched)?)?,
        OutputFormat::Text => {
            if fetched.offline {
                writeln!(out, "Offline: {} cached {}", fetched.records.len(), resource)?;
            } else {
                writeln!(out, "Fetched {} {}", fetched.records.len(), resource)?;
            }
            print_records(&fetched.records, format, out)?;
        }
    }
    Ok(())
}

/// Clear one partition, or every partition when `partition` is `None`.
pub async fn clear(ctx: &Context, partition: Option<&str>, out: &mut impl Write) -> Result<()> {
    match partition {
        Some(name) => {
            let partition: Partition = name.parse()?;
            let removed = ctx.store().clear_partition(partition).await?;
            writeln!(out, "Cleared {} entries from {}", removed, partition)?;
        }
        None => {
            ctx.store().clear_all().await?;
            writeln!(out, "Cleared all partitions")?;
        }
    }
    Ok(())
}

fn print_records(records: &[Value], format: OutputFormat, out: &mut impl Write) -> Result<()> {
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(records)?)?,
        OutputFormat::Text => {
            for record in records {
                writeln!(out, "{}", record)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;
