// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use ft_core::MutationKind;
use serde_json::{json, Map, Value};

use crate::cli::OutputFormat;
use crate::error::Result;

use super::Context;

pub async fn run(ctx: &Context, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let store = ctx.store();
    let location = store
        .path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "in-memory".to_string());

    let mut pending = Vec::new();
    for kind in MutationKind::ALL {
        pending.push((kind, store.pending_count(kind).await?));
    }
    let partitions = store.stats().await?;

    if let OutputFormat::Json = format {
        let pending: Map<String, Value> =
            pending.iter().map(|(kind, count)| (kind.to_string(), json!(count))).collect();
        let partitions: Map<String, Value> = partitions
            .iter()
            .map(|(partition, stats)| (partition.to_string(), json!(stats)))
            .collect();
        let report = json!({ "store": location, "pending": pending, "partitions": partitions });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "store: {}", location)?;
    writeln!(out, "pending:")?;
    for (kind, count) in &pending {
        writeln!(out, "  {:<12} {}", kind.as_str(), count)?;
    }
    writeln!(out, "partitions:")?;
    for (partition, stats) in &partitions {
        writeln!(out, "  {:<12} {:>5} entries {:>9} bytes", partition.as_str(), stats.count, stats.bytes)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
