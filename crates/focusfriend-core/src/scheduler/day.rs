//! Planning for a single calendar day.

use chrono::{DateTime, NaiveDate, Utc};

use super::allocator::{all_qualifying_slots, best_single_slot};
use super::block::{Block, BlockKind};
use super::PlannerConfig;
use crate::error::{BoundKind, PlanError};
use crate::settings::Settings;
use crate::timeline::{local_hour, BusyInterval, TimeInterval};

/// The two bounds of a day as raw instants.
///
/// Kept unchecked so an inverted bound can be reported rather than lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBounds {
    pub workday: (DateTime<Utc>, DateTime<Utc>),
    pub break_window: (DateTime<Utc>, DateTime<Utc>),
}

impl DayBounds {
    /// Checked workday interval.
    pub fn workday(&self) -> Result<TimeInterval, PlanError> {
        checked(BoundKind::Workday, self.workday)
    }

    /// Checked break-window interval.
    pub fn break_window(&self) -> Result<TimeInterval, PlanError> {
        checked(BoundKind::BreakWindow, self.break_window)
    }
}

fn checked(
    bound: BoundKind,
    (start, end): (DateTime<Utc>, DateTime<Utc>),
) -> Result<TimeInterval, PlanError> {
    TimeInterval::new(start, end).map_err(|_| PlanError::InvalidBound { bound, start, end })
}

/// Blocks planned for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayOutcome {
    /// Break block first, then focus blocks ascending.
    pub blocks: Vec<Block>,
    /// The inverted bound that limited planning, if any.
    pub error: Option<PlanError>,
}

impl DayOutcome {
    /// True when the workday itself was invalid and nothing was planned.
    pub fn is_skipped(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|err| err.bound() == BoundKind::Workday)
    }
}

/// Plans the break and focus blocks of one day.
#[derive(Debug, Clone, Default)]
pub struct DayPlanner {
    config: PlannerConfig,
}

impl DayPlanner {
    /// Create a planner with custom config
    pub fn with_config(config: PlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Derive the workday and break-window bounds of `date` from settings
    /// hours in the reference zone.
    pub fn bounds(&self, settings: &Settings, date: NaiveDate) -> DayBounds {
        let tz = &self.config.timezone;
        DayBounds {
            workday: (
                local_hour(tz, date, settings.workday_start_hour),
                local_hour(tz, date, settings.workday_end_hour),
            ),
            break_window: (
                local_hour(tz, date, settings.lunchtime_start_hour),
                local_hour(tz, date, settings.lunchtime_end_hour),
            ),
        }
    }

    /// Plan `date` around `busy`.
    ///
    /// Intervals created by earlier runs are ignored, so repeated planning
    /// over the same external commitments yields the same blocks. The
    /// result holds the break block (if any) first, then focus blocks in
    /// ascending start order.
    ///
    /// An inverted workday yields no blocks. An inverted break window only
    /// drops the break; focus time is still planned over the workday. Either
    /// case is reported in [`DayOutcome::error`].
    pub fn plan_day(
        &self,
        settings: &Settings,
        date: NaiveDate,
        busy: &[BusyInterval],
    ) -> DayOutcome {
        let bounds = self.bounds(settings, date);
        let workday = match bounds.workday() {
            Ok(workday) => workday,
            Err(err) => {
                return DayOutcome {
                    blocks: Vec::new(),
                    error: Some(err),
                }
            }
        };

        let mut occupied: Vec<TimeInterval> = busy
            .iter()
            .filter(|b| !b.is_created())
            .map(|b| b.interval)
            .collect();

        let mut blocks = Vec::new();
        let mut error = None;

        match bounds.break_window() {
            Ok(break_window) => {
                if let Some(break_block) = best_single_slot(
                    &break_window,
                    &occupied,
                    self.config.break_min,
                    self.config.break_max,
                    BlockKind::Break,
                ) {
                    // Focus time must be planned around the break
                    occupied.push(break_block.interval);
                    blocks.push(break_block);
                } else {
                    tracing::debug!("no break slot on {}", date);
                }
            }
            Err(err) => error = Some(err),
        }

        blocks.extend(all_qualifying_slots(
            &workday,
            &occupied,
            self.config.focus_min,
            BlockKind::Focus,
        ));

        tracing::info!(
            "planned {} block(s) on {} from {} busy interval(s)",
            blocks.len(),
            date,
            occupied.len()
        );
        DayOutcome { blocks, error }
    }
}
