// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed durable store for offline sync state.
//!
//! The [`Store`] keeps four independently clearable partitions: mutations
//! awaiting submission, last-known-good read models, user preferences and
//! stored HTTP responses. Every operation is self-contained; multi-row writes
//! run inside their own transaction.

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use crate::clock::{mutation_id, ClockSource, SystemClock};
use crate::error::{Error, Result};
use crate::model::{
    record_key, MutationKind, Partition, PartitionStats, PendingMutation, ResourceClass,
    StoredResponse,
};

/// Version written to `PRAGMA user_version` once the schema is applied.
pub const SCHEMA_VERSION: i64 = 1;

/// SQL schema for the offline store.
pub const SCHEMA: &str = r#"
-- Mutations awaiting submission, drained oldest first per kind
CREATE TABLE IF NOT EXISTS pending_mutations (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    payload TEXT NOT NULL,
    auth_token TEXT NOT NULL,
    enqueued_at INTEGER NOT NULL
);

-- Last-known-good read models, replaced wholesale per resource
CREATE TABLE IF NOT EXISTS cached_records (
    resource TEXT NOT NULL,
    record_id TEXT NOT NULL,
    position INTEGER NOT NULL,
    body TEXT NOT NULL,
    cached_at INTEGER NOT NULL,
    PRIMARY KEY (resource, record_id)
);

-- User preferences as JSON values
CREATE TABLE IF NOT EXISTS preferences (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at INTEGER NOT NULL
);

-- HTTP responses keyed by named cache and URL
CREATE TABLE IF NOT EXISTS response_cache (
    cache_name TEXT NOT NULL,
    url TEXT NOT NULL,
    status INTEGER NOT NULL,
    headers TEXT NOT NULL,
    body BLOB NOT NULL,
    stored_at INTEGER NOT NULL,
    PRIMARY KEY (cache_name, url)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_pending_kind ON pending_mutations(kind, enqueued_at, seq);
CREATE INDEX IF NOT EXISTS idx_cached_position ON cached_records(resource, position);
"#;

/// Parse a string value from the database, returning a rusqlite error on parse failure.
fn parse_db<T: std::str::FromStr>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    value.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{value}' in column '{column}'"
            ))),
        )
    })
}

/// Parse a JSON column from the database.
fn parse_json<T: serde::de::DeserializeOwned>(
    value: &str,
    column: &str,
) -> std::result::Result<T, rusqlite::Error> {
    serde_json::from_str(value).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(Error::CorruptedData(format!("invalid JSON in column '{column}': {e}"))),
        )
    })
}

fn to_ms(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn from_ms(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Apply the schema and record its version.
///
/// Safe to run on every open: the schema is idempotent and the version is
/// only ever raised. A database written by a newer schema is refused.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if version > SCHEMA_VERSION {
        return Err(Error::CorruptedData(format!(
            "store schema version {version} is newer than supported version {SCHEMA_VERSION}"
        )));
    }

    conn.execute_batch(SCHEMA)?;
    if version < SCHEMA_VERSION {
        conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
    }
    Ok(())
}

/// SQLite connection with offline store operations.
pub struct Store {
    conn: Connection,
    clock: Arc<dyn ClockSource>,
}

impl Store {
    /// Open a store at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // WAL lets a second process read while a drain is writing
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        run_migrations(&conn)?;
        Ok(Store { conn, clock: Arc::new(SystemClock) })
    }

    /// Open an in-memory store (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Store { conn, clock: Arc::new(SystemClock) })
    }

    /// Replace the clock used for ids and timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn ClockSource>) -> Self {
        self.clock = clock;
        self
    }

    // -- Pending mutations --------------------------------------------------

    /// Persist a new pending mutation and return its generated id.
    pub fn enqueue_mutation(
        &self,
        kind: MutationKind,
        payload: &Value,
        auth_token: &str,
    ) -> Result<String> {
        let now = self.clock.now_ms();
        let id = mutation_id(kind, now);
        self.conn.execute(
            "INSERT INTO pending_mutations (id, kind, payload, auth_token, enqueued_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![id, kind.as_str(), serde_json::to_string(payload)?, auth_token, from_ms(now)],
        )?;
        Ok(id)
    }

    /// Pending mutations of one kind, oldest first.
    pub fn list_pending(&self, kind: MutationKind) -> Result<Vec<PendingMutation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, kind, payload, auth_token, enqueued_at
             FROM pending_mutations WHERE kind = ?1
             ORDER BY enqueued_at, seq",
        )?;

        let mutations = stmt
            .query_map(params![kind.as_str()], |row| {
                let kind_str: String = row.get(1)?;
                let payload_str: String = row.get(2)?;
                Ok(PendingMutation {
                    id: row.get(0)?,
                    kind: parse_db(&kind_str, "kind")?,
                    payload: parse_json(&payload_str, "payload")?,
                    auth_token: row.get(3)?,
                    enqueued_at: to_ms(row.get(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(mutations)
    }

    /// Delete a pending mutation. Returns whether a row was removed.
    ///
    /// Removing an unknown id is a no-op.
    pub fn remove_pending(&self, id: &str) -> Result<bool> {
        let affected =
            self.conn.execute("DELETE FROM pending_mutations WHERE id = ?1", params![id])?;
        Ok(affected > 0)
    }

    pub fn pending_count(&self, kind: MutationKind) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM pending_mutations WHERE kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    /// True iff any kind has at least one pending mutation.
    pub fn has_pending_work(&self) -> Result<bool> {
        let exists: bool = self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM pending_mutations)",
            [],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    // -- Cached read models -------------------------------------------------

    /// Replace the cached records of a resource class with `records`.
    ///
    /// Clear and insert happen in one transaction: if any record lacks an id
    /// or repeats one, the previous cache is left as it was.
    pub fn replace_cache(&self, resource: ResourceClass, records: &[Value]) -> Result<()> {
        let mut keyed = Vec::with_capacity(records.len());
        let mut seen = HashSet::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            let key = record_key(record).ok_or_else(|| Error::MissingRecordId {
                resource: resource.to_string(),
                position,
            })?;
            if !seen.insert(key.clone()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate record id '{key}' in {resource}"
                )));
            }
            keyed.push((key, serde_json::to_string(record)?));
        }

        let now = from_ms(self.clock.now_ms());
        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM cached_records WHERE resource = ?1", params![resource.as_str()])?;
        {
            let mut insert = tx.prepare(
                "INSERT INTO cached_records (resource, record_id, position, body, cached_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (position, (key, body)) in keyed.iter().enumerate() {
                insert.execute(params![resource.as_str(), key, position as i64, body, now])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Cached records of a resource class, in the order of the last replace.
    pub fn read_cache(&self, resource: ResourceClass) -> Result<Vec<Value>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM cached_records WHERE resource = ?1 ORDER BY position",
        )?;
        let records = stmt
            .query_map(params![resource.as_str()], |row| {
                let body: String = row.get(0)?;
                parse_json(&body, "body")
            })?
            .collect::<std::result::Result<Vec<Value>, _>>()?;
        Ok(records)
    }

    // -- Preferences --------------------------------------------------------

    pub fn get_preference(&self, key: &str) -> Result<Option<Value>> {
        let value: Option<String> = self
            .conn
            .query_row("SELECT value FROM preferences WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()?;
        value.map(|v| serde_json::from_str(&v).map_err(Error::from)).transpose()
    }

    pub fn set_preference(&self, key: &str, value: &Value) -> Result<()> {
        self.conn.execute(
            "INSERT INTO preferences (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, serde_json::to_string(value)?, from_ms(self.clock.now_ms())],
        )?;
        Ok(())
    }

    // -- Response caches ----------------------------------------------------

    /// Store (or overwrite) a response under a named cache.
    pub fn put_response(&self, cache_name: &str, url: &str, response: &StoredResponse) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO response_cache (cache_name, url, status, headers, body, stored_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                cache_name,
                url,
                response.status,
                serde_json::to_string(&response.headers)?,
                response.body,
                from_ms(response.stored_at),
            ],
        )?;
        Ok(())
    }

    /// Store several responses under a named cache, all or nothing.
    pub fn put_responses(&self, cache_name: &str, responses: &[(String, StoredResponse)]) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (url, response) in responses {
            tx.execute(
                "INSERT OR REPLACE INTO response_cache (cache_name, url, status, headers, body, stored_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    cache_name,
                    url,
                    response.status,
                    serde_json::to_string(&response.headers)?,
                    response.body,
                    from_ms(response.stored_at),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    pub fn get_response(&self, cache_name: &str, url: &str) -> Result<Option<StoredResponse>> {
        let response = self
            .conn
            .query_row(
                "SELECT status, headers, body, stored_at FROM response_cache
                 WHERE cache_name = ?1 AND url = ?2",
                params![cache_name, url],
                |row| {
                    let headers: String = row.get(1)?;
                    Ok(StoredResponse {
                        status: row.get(0)?,
                        headers: parse_json(&headers, "headers")?,
                        body: row.get(2)?,
                        stored_at: to_ms(row.get(3)?),
                    })
                },
            )
            .optional()?;
        Ok(response)
    }

    /// Names of every response cache that holds at least one entry.
    pub fn cache_names(&self) -> Result<Vec<String>> {
        let mut stmt =
            self.conn.prepare("SELECT DISTINCT cache_name FROM response_cache ORDER BY cache_name")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Drop a named response cache. Returns the number of entries removed.
    pub fn delete_cache(&self, cache_name: &str) -> Result<usize> {
        let affected = self
            .conn
            .execute("DELETE FROM response_cache WHERE cache_name = ?1", params![cache_name])?;
        Ok(affected)
    }

    // -- Maintenance --------------------------------------------------------

    /// Empty one partition.
    pub fn clear_partition(&self, partition: Partition) -> Result<usize> {
        let affected = self.conn.execute(&format!("DELETE FROM {}", partition.table()), [])?;
        Ok(affected)
    }

    /// Empty every partition in one transaction.
    pub fn clear_all(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for partition in Partition::ALL {
            tx.execute(&format!("DELETE FROM {}", partition.table()), [])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Entry count and stored size for every partition.
    pub fn stats(&self) -> Result<Vec<(Partition, PartitionStats)>> {
        let mut stats = Vec::with_capacity(Partition::ALL.len());
        for partition in Partition::ALL {
            let column = match partition {
                Partition::Pending => "payload",
                Partition::Cache | Partition::Responses => "body",
                Partition::Preferences => "value",
            };
            let (count, bytes): (i64, i64) = self.conn.query_row(
                &format!(
                    "SELECT COUNT(*), COALESCE(SUM(LENGTH({column})), 0) FROM {}",
                    partition.table()
                ),
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )?;
            stats.push((
                partition,
                PartitionStats {
                    count: usize::try_from(count).unwrap_or(0),
                    bytes: usize::try_from(bytes).unwrap_or(0),
                },
            ));
        }
        Ok(stats)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
