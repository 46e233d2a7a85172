// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use ft_core::{MutationKind, PendingMutation};

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::service::SubmitOutcome;

use super::{parse_kind, parse_payload, Context};

/// Queue a mutation without contacting the server; prints its id.
pub async fn enqueue(ctx: &Context, kind: &str, payload: &str, out: &mut impl Write) -> Result<()> {
    let kind = parse_kind(kind)?;
    let payload = parse_payload(payload)?;
    let token = ctx.token()?;

    let id = ctx.store().enqueue_mutation(kind, &payload, token).await?;
    writeln!(out, "{}", id)?;
    Ok(())
}

pub async fn submit(
    ctx: &Context,
    kind: &str,
    payload: &str,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let kind = parse_kind(kind)?;
    let payload = parse_payload(payload)?;
    let token = ctx.token()?;

    let outcome = ctx.service()?.submit(kind, payload, token).await?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&outcome)?)?,
        OutputFormat::Text => match &outcome {
            SubmitOutcome::Submitted { data } => writeln!(out, "Submitted {}: {}", kind, data)?,
            SubmitOutcome::Queued { id } => {
                writeln!(out, "Server unreachable, queued {} as {}", kind, id)?
            }
        },
    }
    Ok(())
}

pub async fn pending(
    ctx: &Context,
    kind: Option<&str>,
    format: OutputFormat,
    out: &mut impl Write,
) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![parse_kind(kind)?],
        None => MutationKind::ALL.to_vec(),
    };
    let mut entries: Vec<PendingMutation> = Vec::new();
    for kind in kinds {
        entries.extend(ctx.store().list_pending(kind).await?);
    }

    match format {
        OutputFormat::Json => {
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        }
        OutputFormat::Text if entries.is_empty() => writeln!(out, "No pending mutations")?,
        OutputFormat::Text => {
            for entry in &entries {
                writeln!(out, "{}", format_pending(entry))?;
            }
        }
    }
    Ok(())
}

pub async fn drain(ctx: &Context, format: OutputFormat, out: &mut impl Write) -> Result<()> {
    let report = ctx.service()?.drain().await?;
    match format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
        OutputFormat::Text => {
            writeln!(out, "Drained: {} succeeded, {} failed", report.succeeded, report.failed)?
        }
    }
    Ok(())
}

pub(crate) fn format_pending(entry: &PendingMutation) -> String {
    let when = entry
        .enqueued_at_utc()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| entry.enqueued_at.to_string());
    format!("{}  {:<11}  {}  {}", entry.id, entry.kind, when, entry.payload)
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
