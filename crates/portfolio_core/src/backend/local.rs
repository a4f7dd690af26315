//! Local durable slot backend.
//!
//! # Responsibility
//! - Keep the whole portfolio document as JSON text under one string key.
//!
//! # Invariants
//! - One slot holds one complete document; there is no version metadata.
//! - Merge writes are resolved locally against the stored document, so the
//!   slot always holds a complete object.
//! - Local slots have no external writers; subscriptions are inert.

use crate::backend::{
    expect_object, BackendKind, BackendResult, BackendSubscription, ChangeListener,
    DocumentBackend, DocumentWrite, WriteMode,
};
use crate::db::{open_db, open_db_in_memory};
use crate::merge::merge_top_level;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Slot key used by the portfolio site.
pub const DEFAULT_SLOT_KEY: &str = "portfolioData";

/// SQLite-backed single-slot document storage.
pub struct SqliteSlotBackend {
    conn: Mutex<Connection>,
    slot_key: String,
}

impl SqliteSlotBackend {
    /// Opens (or creates) the slot database at `path`.
    pub fn open(path: impl AsRef<Path>, slot_key: impl Into<String>) -> BackendResult<Self> {
        Ok(Self::with_connection(open_db(path)?, slot_key))
    }

    pub fn open_in_memory(slot_key: impl Into<String>) -> BackendResult<Self> {
        Ok(Self::with_connection(open_db_in_memory()?, slot_key))
    }

    fn with_connection(conn: Connection, slot_key: impl Into<String>) -> Self {
        Self {
            conn: Mutex::new(conn),
            slot_key: slot_key.into(),
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Returns the raw slot text, bypassing JSON decoding.
    pub fn read_raw(&self) -> BackendResult<Option<String>> {
        let conn = self.connection();
        let raw = conn
            .query_row(
                "SELECT value FROM slots WHERE key = ?1;",
                [self.slot_key.as_str()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(raw)
    }

    /// Overwrites the slot with raw text, bypassing JSON encoding.
    pub fn write_raw(&self, raw: &str) -> BackendResult<()> {
        let conn = self.connection();
        store_slot(&conn, &self.slot_key, raw)
    }

    fn connection(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentBackend for SqliteSlotBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Local
    }

    fn read(&self) -> BackendResult<Option<Value>> {
        match self.read_raw()? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn write(&self, write: DocumentWrite) -> BackendResult<()> {
        let fields = match write.mode {
            WriteMode::Replace => write.fields,
            WriteMode::Merge => {
                let mut stored = match self.read()? {
                    Some(value) => expect_object(value)?,
                    None => Map::new(),
                };
                merge_top_level(&mut stored, write.fields);
                stored
            }
        };

        let raw = serde_json::to_string(&Value::Object(fields))?;
        let conn = self.connection();
        store_slot(&conn, &self.slot_key, &raw)?;
        debug!(
            "event=slot_write module=backend status=ok slot={} bytes={}",
            self.slot_key,
            raw.len()
        );
        Ok(())
    }

    fn subscribe(&self, _listener: ChangeListener) -> BackendResult<BackendSubscription> {
        Ok(BackendSubscription::inert())
    }
}

fn store_slot(conn: &Connection, key: &str, raw: &str) -> BackendResult<()> {
    conn.execute(
        "INSERT INTO slots (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![key, raw],
    )?;
    Ok(())
}
