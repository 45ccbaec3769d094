use serde::{Deserialize, Serialize};

use crate::timeline::TimeInterval;

/// Kind of protected block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// The midday break
    Break,
    /// Deep-focus time
    Focus,
}

impl BlockKind {
    /// Tag value stored under the origin marker on created calendar entries.
    ///
    /// Changing these strings breaks rescheduling of entries created by
    /// earlier versions: they would no longer be found and removed.
    pub fn tag(&self) -> &'static str {
        match self {
            BlockKind::Break => "lunch",
            BlockKind::Focus => "focus",
        }
    }

    /// Parse a stored tag value.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "lunch" => Some(BlockKind::Break),
            "focus" => Some(BlockKind::Focus),
            _ => None,
        }
    }

    /// Human-readable name.
    pub fn display_name(&self) -> &'static str {
        match self {
            BlockKind::Break => "Lunch",
            BlockKind::Focus => "Focus Time",
        }
    }

    /// Title given to calendar entries of this kind.
    pub fn label(&self) -> String {
        format!("⏰ {} ⏰ (via Focusfriend)", self.display_name())
    }
}

impl std::fmt::Display for BlockKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A planned block, ready to be materialized on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub interval: TimeInterval,
    pub kind: BlockKind,
    pub label: String,
}

impl Block {
    /// Create a block with the default label for its kind.
    pub fn new(kind: BlockKind, interval: TimeInterval) -> Self {
        Self {
            interval,
            kind,
            label: kind.label(),
        }
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.interval.duration_minutes()
    }
}
