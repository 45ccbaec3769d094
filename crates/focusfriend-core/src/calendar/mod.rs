//! Calendar collaborator contract.
//!
//! The planner reads commitments from a calendar and materializes blocks
//! back into it. Entries this system creates carry a tag under
//! [`ORIGIN_TAG_KEY`] whose value is the block kind's tag, so later runs can
//! find and replace them.

mod memory;

pub use memory::MemoryCalendar;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CalendarError;
use crate::scheduler::BlockKind;
use crate::timeline::{BusyInterval, Origin, TimeInterval};

/// Tag key marking entries created by this system.
///
/// Changing this breaks rescheduling: entries created under the old key
/// would no longer be recognised and removed before replanning.
pub const ORIGIN_TAG_KEY: &str = "focusfriend";

/// Opaque handle of a calendar entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A non-declined calendar entry as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub id: EntryId,
    pub title: String,
    pub interval: TimeInterval,
    /// Value stored under [`ORIGIN_TAG_KEY`], if any.
    pub origin_tag: Option<String>,
}

impl CalendarEntry {
    /// Whether this entry was created by this system.
    pub fn is_created(&self) -> bool {
        self.origin_tag.as_deref().is_some_and(|tag| !tag.is_empty())
    }

    pub fn origin(&self) -> Origin {
        if self.is_created() {
            Origin::Created(self.origin_tag.as_deref().and_then(BlockKind::from_tag))
        } else {
            Origin::External
        }
    }

    pub fn to_busy(&self) -> BusyInterval {
        BusyInterval {
            interval: self.interval,
            origin: self.origin(),
        }
    }
}

/// The calendar the planner reads from and writes to.
///
/// Failures are returned to the caller as-is; retrying is the caller's
/// decision.
pub trait Calendar {
    /// Non-declined entries overlapping `window`.
    fn fetch_commitments(&self, window: &TimeInterval) -> Result<Vec<CalendarEntry>, CalendarError>;

    /// Create an entry tagged as a block of `kind`.
    fn create_event(
        &mut self,
        label: &str,
        interval: &TimeInterval,
        kind: BlockKind,
    ) -> Result<EntryId, CalendarError>;

    /// Delete the entry with handle `id`.
    fn delete_event(&mut self, id: &EntryId) -> Result<(), CalendarError>;
}
