//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! The ledger and the engine call store methods; they never execute SQL directly.
//!
//! Two concerns live here: a JSON key-value table (the durable browser-style
//! storage for the user record and flags) and the append-only event journal.
//! Keys are written independently; there is no transaction spanning two keys.

mod journal;
mod user_data;

pub use user_data::{CLAIMED_BONUS_KEY, LOGIN_PROMPT_KEY, USER_DATA_KEY};

use crate::error::CasinoResult;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

pub struct CasinoStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl CasinoStore {
    pub fn open(path: &str) -> CasinoResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (shared-memory and :memory: ignore it).
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> CasinoResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases, this returns a new in-memory database (isolated).
    pub fn reopen(&self) -> CasinoResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> CasinoResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Key-value ──────────────────────────────────────────────

    /// Read a JSON value. A missing key yields `default`; so does a stored
    /// value whose shape no longer matches `T` (logged, left in place until
    /// the next write overwrites it).
    pub fn get_value<T: DeserializeOwned>(&self, key: &str, default: T) -> CasinoResult<T> {
        let raw: Option<String> = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;

        let Some(raw) = raw else {
            return Ok(default);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(value),
            Err(e) => {
                log::warn!("stored value for '{key}' has an unexpected shape ({e}); using default");
                Ok(default)
            }
        }
    }

    pub fn set_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> CasinoResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    /// Raw JSON text for a key, bypassing deserialization (tooling and tests).
    pub fn raw_value(&self, key: &str) -> CasinoResult<Option<String>> {
        let raw = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", params![key], |row| row.get(0))
            .optional()?;
        Ok(raw)
    }

    /// Write raw text under a key without validating it.
    pub fn set_raw_value(&self, key: &str, raw: &str) -> CasinoResult<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, raw, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }
}
