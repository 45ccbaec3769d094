//! In-memory calendar, used by tests and dry runs.

use super::{Calendar, CalendarEntry, EntryId, ORIGIN_TAG_KEY};
use crate::error::CalendarError;
use crate::scheduler::BlockKind;
use crate::timeline::TimeInterval;

#[derive(Debug, Clone)]
struct StoredEntry {
    entry: CalendarEntry,
    declined: bool,
}

/// A calendar held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCalendar {
    entries: Vec<StoredEntry>,
}

impl MemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an external commitment.
    pub fn add_commitment(&mut self, title: &str, interval: TimeInterval) -> EntryId {
        self.insert(title, interval, None, false)
    }

    /// Add a commitment the user declined; never returned by fetches.
    pub fn add_declined(&mut self, title: &str, interval: TimeInterval) -> EntryId {
        self.insert(title, interval, None, true)
    }

    /// All stored entries, including declined ones, in insertion order.
    pub fn entries(&self) -> Vec<&CalendarEntry> {
        self.entries.iter().map(|stored| &stored.entry).collect()
    }

    /// Entries created by this system, sorted by start.
    pub fn created_entries(&self) -> Vec<&CalendarEntry> {
        let mut created: Vec<_> = self
            .entries
            .iter()
            .map(|stored| &stored.entry)
            .filter(|entry| entry.is_created())
            .collect();
        created.sort_by_key(|entry| (entry.interval.start(), entry.interval.end()));
        created
    }

    fn insert(
        &mut self,
        title: &str,
        interval: TimeInterval,
        origin_tag: Option<String>,
        declined: bool,
    ) -> EntryId {
        let id = EntryId::new();
        self.entries.push(StoredEntry {
            entry: CalendarEntry {
                id: id.clone(),
                title: title.to_string(),
                interval,
                origin_tag,
            },
            declined,
        });
        id
    }
}

impl Calendar for MemoryCalendar {
    fn fetch_commitments(&self, window: &TimeInterval) -> Result<Vec<CalendarEntry>, CalendarError> {
        Ok(self
            .entries
            .iter()
            .filter(|stored| !stored.declined)
            .filter(|stored| stored.entry.interval.overlaps(window))
            .map(|stored| stored.entry.clone())
            .collect())
    }

    fn create_event(
        &mut self,
        label: &str,
        interval: &TimeInterval,
        kind: BlockKind,
    ) -> Result<EntryId, CalendarError> {
        tracing::trace!("memory calendar: {}={} on {}", ORIGIN_TAG_KEY, kind.tag(), label);
        Ok(self.insert(label, *interval, Some(kind.tag().to_string()), false))
    }

    fn delete_event(&mut self, id: &EntryId) -> Result<(), CalendarError> {
        let before = self.entries.len();
        self.entries.retain(|stored| &stored.entry.id != id);
        if self.entries.len() == before {
            return Err(CalendarError::EntryNotFound(id.to_string()));
        }
        Ok(())
    }
}
