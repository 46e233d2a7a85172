// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::io::Write;

use serde_json::Value;

use crate::error::Result;

use super::Context;

pub async fn get(ctx: &Context, key: &str, out: &mut impl Write) -> Result<()> {
    match ctx.store().get_preference(key).await? {
        Some(value) => writeln!(out, "{}", value)?,
        None => writeln!(out, "{} is not set", key)?,
    }
    Ok(())
}

/// Store `value` as JSON if it parses, otherwise as a plain string.
pub async fn set(ctx: &Context, key: &str, value: &str, out: &mut impl Write) -> Result<()> {
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    ctx.store().set_preference(key, &value).await?;
    writeln!(out, "{} = {}", key, value)?;
    Ok(())
}

#[cfg(test)]
#[path = "pref_tests.rs"]
mod tests;
