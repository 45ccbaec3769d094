//! Break and focus block planning.
//!
//! This module allocates protected blocks into free time:
//! - Picks the single best break slot inside the break window
//! - Claims every free stretch of the workday long enough for focus work
//! - Plans one day at a time, break first, then focus around it
//! - Plans the current and remaining days of the week

mod allocator;
mod block;
mod day;
mod week;

pub use allocator::{all_qualifying_slots, best_single_slot};
pub use block::{Block, BlockKind};
pub use day::{DayBounds, DayOutcome, DayPlanner};
pub use week::{week_dates, DayPlan, WeekPlan, WeekPlanner};

use chrono::Duration;
use chrono_tz::Tz;

use crate::error::ValidationError;

/// Shortest break block worth scheduling (minutes)
pub const DEFAULT_BREAK_MIN_MINUTES: u32 = 20;
/// Longest break block to schedule (minutes)
pub const DEFAULT_BREAK_MAX_MINUTES: u32 = 60;
/// Shortest free stretch claimed as focus time (minutes)
pub const DEFAULT_FOCUS_MIN_MINUTES: u32 = 120;

/// Planner configuration
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerConfig {
    /// Minimum break duration
    pub break_min: Duration,
    /// Maximum break duration; longer gaps are truncated
    pub break_max: Duration,
    /// Minimum focus block duration
    pub focus_min: Duration,
    /// Reference time zone that settings hours are expressed in
    pub timezone: Tz,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            break_min: Duration::minutes(DEFAULT_BREAK_MIN_MINUTES.into()),
            break_max: Duration::minutes(DEFAULT_BREAK_MAX_MINUTES.into()),
            focus_min: Duration::minutes(DEFAULT_FOCUS_MIN_MINUTES.into()),
            timezone: chrono_tz::America::New_York,
        }
    }
}

impl PlannerConfig {
    /// Check that the duration constraints are usable.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.break_min < Duration::zero() || self.focus_min < Duration::zero() {
            return Err(ValidationError::InvalidValue {
                field: "durations".to_string(),
                message: "minimum durations must not be negative".to_string(),
            });
        }
        if self.break_max <= Duration::zero() {
            return Err(ValidationError::InvalidValue {
                field: "break_max".to_string(),
                message: "must be positive".to_string(),
            });
        }
        if self.break_min > self.break_max {
            return Err(ValidationError::InvalidValue {
                field: "break_min".to_string(),
                message: format!(
                    "{} min exceeds break_max {} min",
                    self.break_min.num_minutes(),
                    self.break_max.num_minutes()
                ),
            });
        }
        Ok(())
    }
}
