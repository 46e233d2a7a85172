// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::future::Future;
use std::io::Write;

use ft_core::protocol::{CONNECTION_EVENT, ERROR_EVENT};
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tracing::info;

use crate::channel::ChannelClient;
use crate::error::Result;
use crate::service::MUTATION_QUEUED_EVENT;
use crate::sync::SYNC_COMPLETE_EVENT;

use super::Context;

/// Hub tags printed by `ft listen`.
const LISTEN_TAGS: [&str; 9] = [
    "workout_update",
    "measurement_update",
    "user_stats_update",
    "notification",
    "live_workout",
    CONNECTION_EVENT,
    ERROR_EVENT,
    SYNC_COMPLETE_EVENT,
    MUTATION_QUEUED_EVENT,
];

/// Connect the realtime channel and print events until Ctrl-C or `count` events.
pub async fn run(ctx: &Context, count: Option<usize>, out: &mut impl Write) -> Result<()> {
    let channel = ChannelClient::websocket(ctx.config().channel.to_channel_config(), ctx.hub().clone());
    let shutdown = async {
        // An error here means no signal handler; keep listening until `count`.
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    run_impl(ctx, &channel, count, out, shutdown).await
}

/// Internal implementation that accepts the channel and shutdown signal for testing.
pub(crate) async fn run_impl(
    ctx: &Context,
    channel: &ChannelClient,
    count: Option<usize>,
    out: &mut impl Write,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let token = ctx.token()?.to_string();
    let service = ctx.service()?;

    let (tx, mut events) = mpsc::unbounded_channel::<Value>();
    let mut subscriptions: Vec<_> = LISTEN_TAGS
        .iter()
        .map(|&tag| {
            let tx = tx.clone();
            ctx.hub().on(tag, move |data| {
                let _ = tx.send(json!({ "event": tag, "data": data }));
            })
        })
        .collect();
    drop(tx);
    subscriptions.push(service.attach_channel(channel));

    let outcome = match channel.connect(&token).await {
        Ok(()) => {
            info!(url = %channel.config().url, "listening for realtime events");
            print_events(&mut events, count, out, shutdown).await
        }
        Err(e) => Err(e.into()),
    };

    channel.disconnect();
    for subscription in subscriptions {
        subscription.unsubscribe();
    }
    outcome
}

async fn print_events(
    events: &mut mpsc::UnboundedReceiver<Value>,
    count: Option<usize>,
    out: &mut impl Write,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);
    let mut seen = 0usize;
    while count.map_or(true, |limit| seen < limit) {
        tokio::select! {
            _ = &mut shutdown => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                writeln!(out, "{}", event)?;
                out.flush()?;
                seen += 1;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "listen_tests.rs"]
mod tests;
