//! Interval value types shared by gap finding and planning.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::scheduler::BlockKind;

/// A closed span of time `[start, end]` with `start <= end`.
///
/// Zero-length intervals are allowed as placeholders. Gap finding never
/// emits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr")]
pub struct TimeInterval {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

#[derive(Deserialize)]
struct IntervalRepr {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TryFrom<IntervalRepr> for TimeInterval {
    type Error = ValidationError;

    fn try_from(raw: IntervalRepr) -> Result<Self, Self::Error> {
        Self::new(raw.start, raw.end)
    }
}

impl TimeInterval {
    /// Create an interval, rejecting `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError::InvalidTimeRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A zero-length interval at `at`.
    pub fn instant(at: DateTime<Utc>) -> Self {
        Self { start: at, end: at }
    }

    /// Interval of `duration` starting at `start`. Negative durations
    /// collapse to a zero-length interval.
    pub fn starting_at(start: DateTime<Utc>, duration: Duration) -> Self {
        Self {
            start,
            end: start + duration.max(Duration::zero()),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Get duration in minutes
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when the two intervals share a span of positive length.
    /// Intervals that only touch at an endpoint do not overlap.
    pub fn overlaps(&self, other: &TimeInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True when `other` lies entirely within `self`.
    pub fn contains(&self, other: &TimeInterval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// The part of `self` inside `bound`, if they overlap.
    pub fn clip_to(&self, bound: &TimeInterval) -> Option<TimeInterval> {
        if !self.overlaps(bound) {
            return None;
        }
        Some(Self {
            start: self.start.max(bound.start),
            end: self.end.min(bound.end),
        })
    }

    /// Cut the interval down to at most `max` long, keeping its start.
    pub fn truncate(&self, max: Duration) -> TimeInterval {
        if self.duration() > max {
            Self::starting_at(self.start, max)
        } else {
            *self
        }
    }
}

/// Where a busy interval came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// A commitment the planner does not own.
    External,
    /// A block this system created on an earlier run. The kind is `None`
    /// when the stored tag value is not one this version recognises.
    Created(Option<BlockKind>),
}

/// A commitment occupying time, tagged with its origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub interval: TimeInterval,
    pub origin: Origin,
}

impl BusyInterval {
    pub fn external(interval: TimeInterval) -> Self {
        Self {
            interval,
            origin: Origin::External,
        }
    }

    pub fn created(interval: TimeInterval, kind: BlockKind) -> Self {
        Self {
            interval,
            origin: Origin::Created(Some(kind)),
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self.origin, Origin::Created(_))
    }
}
