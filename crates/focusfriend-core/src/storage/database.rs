//! SQLite-based settings store and local calendar.
//!
//! Provides persistent storage for:
//! - The settings key-value store (workday and break-window hours)
//! - Calendar entries: external commitments and blocks created by planning

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::calendar::{Calendar, CalendarEntry, EntryId, ORIGIN_TAG_KEY};
use crate::error::{CalendarError, DatabaseError, Result};
use crate::scheduler::BlockKind;
use crate::settings::SettingsSource;
use crate::timeline::TimeInterval;

/// Attendance status of a stored calendar entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    Accepted,
    Declined,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Accepted => "accepted",
            EventStatus::Declined => "declined",
        }
    }

    fn parse(value: &str) -> Self {
        match value {
            "declined" => EventStatus::Declined,
            _ => EventStatus::Accepted,
        }
    }
}

/// A stored calendar entry, including declined ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: EntryId,
    pub title: String,
    pub interval: TimeInterval,
    pub status: EventStatus,
    /// Value stored under the origin tag key, if any.
    pub origin_tag: Option<String>,
}

impl EventRecord {
    fn into_entry(self) -> CalendarEntry {
        CalendarEntry {
            id: self.id,
            title: self.title,
            interval: self.interval,
            origin_tag: self.origin_tag,
        }
    }
}

/// SQLite database for settings and calendar entries.
pub struct Database {
    conn: Connection,
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<EventRecord> {
    let start = parse_timestamp(2, &row.get::<_, String>(2)?)?;
    let end = parse_timestamp(3, &row.get::<_, String>(3)?)?;
    let interval = TimeInterval::new(start, end).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    let tag_key: Option<String> = row.get(5)?;
    let tag_value: Option<String> = row.get(6)?;

    Ok(EventRecord {
        id: EntryId(row.get(0)?),
        title: row.get(1)?,
        interval,
        status: EventStatus::parse(&row.get::<_, String>(4)?),
        origin_tag: tag_key
            .filter(|key| key == ORIGIN_TAG_KEY)
            .and(tag_value),
    })
}

const EVENT_COLUMNS: &str = "id, title, start_at, end_at, status, tag_key, tag_value";

impl Database {
    /// Get a reference to the underlying SQLite connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Open the database at `~/.config/focusfriend/focusfriend.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("focusfriend.db");
        Self::open_at(&path)
    }

    /// Open (or create) the database at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS settings (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS events (
                id        TEXT PRIMARY KEY,
                title     TEXT NOT NULL DEFAULT '',
                start_at  TEXT NOT NULL,
                end_at    TEXT NOT NULL,
                status    TEXT NOT NULL DEFAULT 'accepted',
                tag_key   TEXT,
                tag_value TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_events_start_at ON events(start_at);
            CREATE INDEX IF NOT EXISTS idx_events_tag ON events(tag_key, tag_value);",
        )?;
        Ok(())
    }

    /// Get a value from the settings store.
    pub fn setting_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Set a value in the settings store.
    pub fn setting_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a value from the settings store. Returns whether it existed.
    pub fn setting_unset(&self, key: &str) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM settings WHERE key = ?1", params![key])?;
        Ok(changed > 0)
    }

    /// All stored settings, sorted by key.
    pub fn settings_list(&self) -> Result<Vec<(String, String)>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key, value FROM settings ORDER BY key")?;
        let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Record an external commitment.
    pub fn add_event(&self, title: &str, interval: &TimeInterval) -> Result<EntryId> {
        Ok(self.insert_event(title, interval, EventStatus::Accepted, None)?)
    }

    fn insert_event(
        &self,
        title: &str,
        interval: &TimeInterval,
        status: EventStatus,
        kind: Option<BlockKind>,
    ) -> Result<EntryId, rusqlite::Error> {
        let id = EntryId::new();
        self.conn.execute(
            "INSERT INTO events (id, title, start_at, end_at, status, tag_key, tag_value)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id.as_str(),
                title,
                timestamp(interval.start()),
                timestamp(interval.end()),
                status.as_str(),
                kind.map(|_| ORIGIN_TAG_KEY),
                kind.map(|k| k.tag()),
            ],
        )?;
        Ok(id)
    }

    /// Change the attendance status of an entry. Returns whether it existed.
    pub fn set_event_status(&self, id: &EntryId, status: EventStatus) -> Result<bool> {
        let changed = self.conn.execute(
            "UPDATE events SET status = ?2 WHERE id = ?1",
            params![id.as_str(), status.as_str()],
        )?;
        Ok(changed > 0)
    }

    /// Delete an entry. Returns whether it existed.
    pub fn remove_event(&self, id: &EntryId) -> Result<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM events WHERE id = ?1", params![id.as_str()])?;
        Ok(changed > 0)
    }

    /// Entries overlapping `window` (all entries when `None`), declined
    /// ones included, sorted by start.
    pub fn list_events(&self, window: Option<&TimeInterval>) -> Result<Vec<EventRecord>> {
        let events = match window {
            Some(window) => self.query_events(window, false)?,
            None => {
                let mut stmt = self.conn.prepare(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events ORDER BY start_at, end_at"
                ))?;
                let rows = stmt.query_map([], event_from_row)?;
                rows.collect::<rusqlite::Result<Vec<_>>>()?
            }
        };
        Ok(events)
    }

    fn query_events(
        &self,
        window: &TimeInterval,
        accepted_only: bool,
    ) -> Result<Vec<EventRecord>, rusqlite::Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {EVENT_COLUMNS} FROM events
             WHERE start_at < ?1 AND end_at > ?2 AND (?3 = 0 OR status != 'declined')
             ORDER BY start_at, end_at"
        ))?;
        let rows = stmt.query_map(
            params![
                timestamp(window.end()),
                timestamp(window.start()),
                accepted_only
            ],
            event_from_row,
        )?;
        rows.collect()
    }
}

impl SettingsSource for Database {
    fn setting(&self, key: &str) -> Result<Option<String>> {
        self.setting_get(key)
    }
}

impl Calendar for Database {
    fn fetch_commitments(&self, window: &TimeInterval) -> Result<Vec<CalendarEntry>, CalendarError> {
        let events = self
            .query_events(window, true)
            .map_err(|e| CalendarError::Storage(e.to_string()))?;
        Ok(events.into_iter().map(EventRecord::into_entry).collect())
    }

    fn create_event(
        &mut self,
        label: &str,
        interval: &TimeInterval,
        kind: BlockKind,
    ) -> Result<EntryId, CalendarError> {
        self.insert_event(label, interval, EventStatus::Accepted, Some(kind))
            .map_err(|e| CalendarError::Storage(e.to_string()))
    }

    fn delete_event(&mut self, id: &EntryId) -> Result<(), CalendarError> {
        match self.remove_event(id) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CalendarError::EntryNotFound(id.to_string())),
            Err(e) => Err(CalendarError::Storage(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn iv(h1: u32, h2: u32) -> TimeInterval {
        TimeInterval::new(
            Utc.with_ymd_and_hms(2024, 3, 4, h1, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 4, h2, 0, 0).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn settings_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.setting_get("workday_start_hour").unwrap().is_none());
        db.setting_set("workday_start_hour", "9").unwrap();
        assert_eq!(db.setting("workday_start_hour").unwrap().as_deref(), Some("9"));
        assert_eq!(db.settings_list().unwrap().len(), 1);
        assert!(db.setting_unset("workday_start_hour").unwrap());
        assert!(!db.setting_unset("workday_start_hour").unwrap());
    }

    #[test]
    fn fetch_excludes_declined_and_non_overlapping() {
        let db = Database::open_memory().unwrap();
        db.add_event("Standup", &iv(9, 10)).unwrap();
        let declined = db.add_event("Optional", &iv(11, 12)).unwrap();
        db.set_event_status(&declined, EventStatus::Declined).unwrap();
        db.add_event("Early", &iv(6, 8)).unwrap();

        let fetched = db.fetch_commitments(&iv(8, 18)).unwrap();
        let titles: Vec<_> = fetched.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Standup"]);

        // Declined entries still show up in listings.
        assert_eq!(db.list_events(Some(&iv(8, 18))).unwrap().len(), 2);
        assert_eq!(db.list_events(None).unwrap().len(), 3);
    }

    #[test]
    fn created_events_carry_origin_tag() {
        let mut db = Database::open_memory().unwrap();
        let id = db
            .create_event("⏰ Lunch ⏰ (via Focusfriend)", &iv(15, 16), BlockKind::Break)
            .unwrap();

        let fetched = db.fetch_commitments(&iv(0, 23)).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0].id, id);
        assert_eq!(fetched[0].origin_tag.as_deref(), Some("lunch"));
        assert!(fetched[0].is_created());

        db.delete_event(&id).unwrap();
        assert!(matches!(
            db.delete_event(&id),
            Err(CalendarError::EntryNotFound(_))
        ));
    }

    #[test]
    fn foreign_tag_keys_are_not_ours() {
        let db = Database::open_memory().unwrap();
        db.conn()
            .execute(
                "INSERT INTO events (id, title, start_at, end_at, tag_key, tag_value)
                 VALUES ('x', 'Other tool', '2024-03-04T09:00:00Z', '2024-03-04T10:00:00Z', 'othertool', 'focus')",
                [],
            )
            .unwrap();
        let fetched = db.fetch_commitments(&iv(0, 23)).unwrap();
        assert!(!fetched[0].is_created());
    }

    #[test]
    fn reopening_a_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focusfriend.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.add_event("Standup", &iv(9, 10)).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.list_events(None).unwrap().len(), 1);
    }
}
