//! Planning for the current and remaining days of the week.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::block::Block;
use super::day::DayPlanner;
use crate::calendar::{Calendar, CalendarEntry, EntryId};
use crate::error::{BoundKind, PlanError, Result};
use crate::settings::Settings;
use crate::timeline::{local_day, BusyInterval, TimeInterval};

/// Day that is never planned
pub const REST_DAY: Weekday = Weekday::Sun;
/// Last day of the planning week
pub const WEEK_END: Weekday = Weekday::Sat;

/// Dates to plan starting at `today`: every date through the end of the
/// week, skipping the rest day. Days earlier in the week are never included.
pub fn week_dates(today: NaiveDate) -> Vec<NaiveDate> {
    let remaining = if today.weekday() == REST_DAY {
        // The rest day opens a new week
        6
    } else {
        i64::from(WEEK_END.num_days_from_sunday()) - i64::from(today.weekday().num_days_from_sunday())
    };

    (0..=remaining)
        .map(|offset| today + Duration::days(offset))
        .filter(|date| date.weekday() != REST_DAY)
        .collect()
}

/// Planning outcome for one date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    /// Break block first, then focus blocks ascending.
    pub blocks: Vec<Block>,
    /// Previously-created entries on this date, to be replaced.
    pub stale: Vec<EntryId>,
    /// Set when a bound was inverted. An inverted workday leaves `blocks`
    /// empty; an inverted break window only drops the break.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<PlanError>,
}

impl DayPlan {
    pub fn is_valid(&self) -> bool {
        self.error.is_none()
    }

    /// True when the workday was invalid and the day must be left as is.
    pub fn is_skipped(&self) -> bool {
        self.error
            .as_ref()
            .is_some_and(|err| err.bound() == BoundKind::Workday)
    }
}

/// Planning outcome for a week, keyed by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeekPlan {
    pub days: BTreeMap<NaiveDate, DayPlan>,
}

impl WeekPlan {
    pub fn day(&self, date: NaiveDate) -> Option<&DayPlan> {
        self.days.get(&date)
    }

    /// Date to planned blocks; failed days map to an empty list.
    pub fn blocks_by_date(&self) -> BTreeMap<NaiveDate, Vec<Block>> {
        self.days
            .iter()
            .map(|(date, plan)| (*date, plan.blocks.clone()))
            .collect()
    }

    /// Days that could not be planned, with the reason.
    pub fn failures(&self) -> Vec<(NaiveDate, &PlanError)> {
        self.days
            .iter()
            .filter_map(|(date, plan)| plan.error.as_ref().map(|err| (*date, err)))
            .collect()
    }

    pub fn block_count(&self) -> usize {
        self.days.values().map(|plan| plan.blocks.len()).sum()
    }
}

/// Plans each remaining day of the week against a calendar.
#[derive(Debug, Clone, Default)]
pub struct WeekPlanner {
    day_planner: DayPlanner,
}

impl WeekPlanner {
    pub fn new(day_planner: DayPlanner) -> Self {
        Self { day_planner }
    }

    pub fn day_planner(&self) -> &DayPlanner {
        &self.day_planner
    }

    /// Plan a single date from the calendar's entries for that local day.
    ///
    /// # Errors
    /// Returns an error only when the calendar cannot be read. An invalid
    /// bound is recorded in the returned [`DayPlan`].
    pub fn plan_date<C: Calendar + ?Sized>(
        &self,
        settings: &Settings,
        date: NaiveDate,
        calendar: &C,
    ) -> Result<DayPlan> {
        let (day_start, day_end) = local_day(&self.day_planner.config().timezone, date);
        let window = TimeInterval::new(day_start, day_end)?;
        let entries = calendar.fetch_commitments(&window)?;
        Ok(self.plan_entries(settings, date, &entries))
    }

    /// Plan `today` and the remaining days of its week.
    ///
    /// Each previously-created entry is listed as stale on at most one
    /// planned day, the first one it overlaps.
    ///
    /// # Errors
    /// Calendar read failures abort the whole pass.
    pub fn plan_week<C: Calendar + ?Sized>(
        &self,
        settings: &Settings,
        today: NaiveDate,
        calendar: &C,
    ) -> Result<WeekPlan> {
        let mut plan = WeekPlan::default();
        let mut claimed: BTreeSet<EntryId> = BTreeSet::new();
        for date in week_dates(today) {
            let mut day = self.plan_date(settings, date, calendar)?;
            if !day.is_skipped() {
                // Entries spanning local midnight show up on both days.
                day.stale.retain(|id| claimed.insert(id.clone()));
            }
            plan.days.insert(date, day);
        }
        Ok(plan)
    }

    fn plan_entries(&self, settings: &Settings, date: NaiveDate, entries: &[CalendarEntry]) -> DayPlan {
        let busy: Vec<BusyInterval> = entries.iter().map(CalendarEntry::to_busy).collect();
        let stale: Vec<EntryId> = entries
            .iter()
            .filter(|entry| entry.is_created())
            .map(|entry| entry.id.clone())
            .collect();

        let outcome = self.day_planner.plan_day(settings, date, &busy);
        if let Some(err) = &outcome.error {
            tracing::warn!("{}: {}", date, err);
        }
        DayPlan {
            date,
            blocks: outcome.blocks,
            stale,
            error: outcome.error,
        }
    }
}
