//! Store methods for the play session and its event journal.

use super::CasinoStore;
use crate::{error::CasinoResult, event::EventLogEntry};
use rusqlite::params;

impl CasinoStore {
    // ── Play session ───────────────────────────────────────────

    pub fn insert_play_session(&self, session_id: &str, seed: u64, version: &str) -> CasinoResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO play_session (session_id, seed, version, started_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![session_id, seed as i64, version, chrono::Utc::now().timestamp_millis()],
        )?;
        Ok(())
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> CasinoResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (session_id, at_ms, round_id, source, event_type, payload, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.session_id,
                entry.at as i64,
                entry.round_id,
                entry.source,
                entry.event_type,
                entry.payload,
                chrono::Utc::now().timestamp_millis(),
            ],
        )?;
        Ok(())
    }

    pub fn events_for_session(&self, session_id: &str) -> CasinoResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, session_id, at_ms, round_id, source, event_type, payload
             FROM event_log WHERE session_id = ?1
             ORDER BY id ASC",
        )?;
        let entries = stmt
            .query_map(params![session_id], |row| {
                Ok(EventLogEntry {
                    id: Some(row.get(0)?),
                    session_id: row.get(1)?,
                    at: row.get::<_, i64>(2)? as u64,
                    round_id: row.get(3)?,
                    source: row.get(4)?,
                    event_type: row.get(5)?,
                    payload: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Number of journal rows of one type (for tests and summaries).
    pub fn event_count(&self, session_id: &str, event_type: &str) -> CasinoResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE session_id = ?1 AND event_type = ?2",
            params![session_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
