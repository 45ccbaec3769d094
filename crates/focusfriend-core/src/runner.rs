//! Scheduling pass: plan the week and materialize it into the calendar.
//!
//! Previously-created entries are deleted before the new blocks are
//! created, so running the pass twice over an unchanged calendar leaves
//! the same set of entries behind.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::error::{CalendarError, Result};
use crate::scheduler::{DayPlanner, WeekPlan, WeekPlanner};
use crate::settings::Settings;
use crate::storage::Config;
use crate::timeline::local_date;

/// Counts of calendar changes made by [`apply_week_plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplySummary {
    pub deleted: usize,
    pub created: usize,
    /// Days left untouched because their workday was invalid.
    pub skipped_days: usize,
}

/// Outcome of [`run_scheduling_pass`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PassReport {
    pub plan: WeekPlan,
    pub summary: ApplySummary,
    pub dry_run: bool,
}

/// Replace each planned day's previously-created entries with its blocks.
///
/// Days with an invalid workday keep their existing entries. Stale entries
/// that are already gone are not counted. With `dry_run` the changes are
/// only logged and the summary counts what would change.
///
/// # Errors
/// Stops at the first calendar failure; changes made before it remain.
pub fn apply_week_plan<C: Calendar + ?Sized>(
    plan: &WeekPlan,
    calendar: &mut C,
    dry_run: bool,
) -> Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for (date, day) in &plan.days {
        if day.is_skipped() {
            if let Some(err) = &day.error {
                tracing::warn!("leaving {} unchanged: {}", date, err);
            }
            summary.skipped_days += 1;
            continue;
        }

        for id in &day.stale {
            if dry_run {
                tracing::info!("[dry run] would delete {} on {}", id, date);
            } else {
                match calendar.delete_event(id) {
                    Ok(()) => tracing::debug!("deleted {} on {}", id, date),
                    Err(CalendarError::EntryNotFound(_)) => {
                        tracing::debug!("{} on {} was already removed", id, date);
                        continue;
                    }
                    Err(err) => return Err(err.into()),
                }
            }
            summary.deleted += 1;
        }

        for block in &day.blocks {
            if dry_run {
                tracing::info!(
                    "[dry run] would schedule {} {} - {}",
                    block.label,
                    block.interval.start(),
                    block.interval.end()
                );
            } else {
                let id = calendar.create_event(&block.label, &block.interval, block.kind)?;
                tracing::info!(
                    "scheduled {} {} - {} ({})",
                    block.label,
                    block.interval.start(),
                    block.interval.end(),
                    id
                );
            }
            summary.created += 1;
        }
    }

    Ok(summary)
}

/// Plan the week containing `now` and apply it to `calendar`.
///
/// `now` is converted to a date in the configured reference zone. The
/// calendar is only written when `config.calendar.dry_run` is off.
///
/// # Errors
/// Returns an error if the configuration is invalid or the calendar
/// cannot be read or written.
pub fn run_scheduling_pass<C: Calendar + ?Sized>(
    now: DateTime<Utc>,
    config: &Config,
    settings: &Settings,
    calendar: &mut C,
) -> Result<PassReport> {
    let planner_config = config.planner_config()?;
    let today = local_date(&planner_config.timezone, now);
    let dry_run = config.calendar.dry_run;

    tracing::info!(
        "planning week of {} in {} (dry run: {})",
        today,
        planner_config.timezone,
        dry_run
    );

    let planner = WeekPlanner::new(DayPlanner::with_config(planner_config));
    let plan = planner.plan_week(settings, today, &*calendar)?;
    let summary = apply_week_plan(&plan, calendar, dry_run)?;

    tracing::info!(
        "pass complete: {} deleted, {} created, {} days skipped",
        summary.deleted,
        summary.created,
        summary.skipped_days
    );

    Ok(PassReport {
        plan,
        summary,
        dry_run,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::MemoryCalendar;
    use crate::scheduler::BlockKind;
    use crate::timeline::TimeInterval;
    use chrono::TimeZone;

    fn utc_config() -> Config {
        let mut config = Config::default();
        config.planning.timezone = "UTC".to_string();
        config
    }

    // Thursday 2024-03-07
    fn thursday_morning() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 7, 8, 0, 0).unwrap()
    }

    fn span(created: &[&crate::calendar::CalendarEntry]) -> Vec<(DateTime<Utc>, DateTime<Utc>, String)> {
        created
            .iter()
            .map(|e| (e.interval.start(), e.interval.end(), e.title.clone()))
            .collect()
    }

    #[test]
    fn pass_creates_tagged_blocks_for_each_day() {
        let mut calendar = MemoryCalendar::new();
        let report = run_scheduling_pass(
            thursday_morning(),
            &utc_config(),
            &Settings::default(),
            &mut calendar,
        )
        .unwrap();

        // Thu, Fri, Sat with a break and two focus blocks each.
        assert_eq!(report.summary.created, 9);
        assert_eq!(report.summary.deleted, 0);
        assert_eq!(calendar.created_entries().len(), 9);

        let thursday: Vec<_> = calendar
            .created_entries()
            .into_iter()
            .filter(|e| e.interval.start().date_naive() == thursday_morning().date_naive())
            .collect();
        assert_eq!(thursday[0].origin_tag.as_deref(), Some(BlockKind::Focus.tag()));
        assert_eq!(thursday[1].title, BlockKind::Break.label());
    }

    #[test]
    fn second_pass_is_idempotent() {
        let mut calendar = MemoryCalendar::new();
        let standup = TimeInterval::new(
            Utc.with_ymd_and_hms(2024, 3, 7, 13, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 7, 13, 30, 0).unwrap(),
        )
        .unwrap();
        calendar.add_commitment("Standup", standup);

        let config = utc_config();
        run_scheduling_pass(thursday_morning(), &config, &Settings::default(), &mut calendar).unwrap();
        let first = span(&calendar.created_entries());

        let report =
            run_scheduling_pass(thursday_morning(), &config, &Settings::default(), &mut calendar)
                .unwrap();
        let second = span(&calendar.created_entries());

        assert_eq!(first, second);
        assert_eq!(report.summary.deleted, first.len());
        assert_eq!(calendar.entries().len(), first.len() + 1);
    }

    #[test]
    fn dry_run_leaves_calendar_untouched() {
        let mut calendar = MemoryCalendar::new();
        let mut config = utc_config();
        config.calendar.dry_run = true;

        let report =
            run_scheduling_pass(thursday_morning(), &config, &Settings::default(), &mut calendar)
                .unwrap();
        assert!(report.dry_run);
        assert_eq!(report.summary.created, 9);
        assert!(calendar.entries().is_empty());
    }

    #[test]
    fn failed_days_keep_their_entries() {
        let mut calendar = MemoryCalendar::new();
        let config = utc_config();
        run_scheduling_pass(thursday_morning(), &config, &Settings::default(), &mut calendar).unwrap();

        let inverted = Settings::new(20, 12, 15, 17).unwrap();
        let report =
            run_scheduling_pass(thursday_morning(), &config, &inverted, &mut calendar).unwrap();

        assert_eq!(report.summary.skipped_days, 3);
        assert_eq!(report.summary.deleted, 0);
        assert_eq!(calendar.created_entries().len(), 9);
    }

    #[test]
    fn inverted_break_window_replaces_old_lunch_with_focus() {
        let mut calendar = MemoryCalendar::new();
        let config = utc_config();
        run_scheduling_pass(thursday_morning(), &config, &Settings::default(), &mut calendar).unwrap();

        let no_lunch = Settings::new(12, 20, 17, 15).unwrap();
        let report =
            run_scheduling_pass(thursday_morning(), &config, &no_lunch, &mut calendar).unwrap();

        assert_eq!(report.summary.skipped_days, 0);
        assert_eq!(report.summary.deleted, 9);
        assert_eq!(report.summary.created, 3);
        assert!(calendar
            .created_entries()
            .iter()
            .all(|e| e.origin_tag.as_deref() == Some(BlockKind::Focus.tag())));
    }

    #[test]
    fn created_entry_across_local_midnight_is_replaced_once() {
        // 22:00-01:00 in New York, Wednesday night into Thursday.
        let mut calendar = MemoryCalendar::new();
        let overnight = TimeInterval::new(
            Utc.with_ymd_and_hms(2024, 3, 7, 3, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 7, 6, 0, 0).unwrap(),
        )
        .unwrap();
        calendar
            .create_event("old focus", &overnight, BlockKind::Focus)
            .unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 6, 15, 0, 0).unwrap();
        let report =
            run_scheduling_pass(now, &Config::default(), &Settings::default(), &mut calendar)
                .unwrap();

        assert_eq!(report.summary.deleted, 1);
        // Wednesday through Saturday, three blocks each.
        assert_eq!(report.summary.created, 12);
        assert_eq!(calendar.created_entries().len(), 12);
    }

    #[test]
    fn stale_entry_already_gone_is_not_an_error() {
        let mut calendar = MemoryCalendar::new();
        let old = TimeInterval::new(
            Utc.with_ymd_and_hms(2024, 3, 7, 15, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 7, 16, 0, 0).unwrap(),
        )
        .unwrap();
        let id = calendar.create_event("old lunch", &old, BlockKind::Break).unwrap();

        let planner_config = utc_config().planner_config().unwrap();
        let planner = WeekPlanner::new(DayPlanner::with_config(planner_config));
        let plan = planner
            .plan_week(&Settings::default(), thursday_morning().date_naive(), &calendar)
            .unwrap();
        calendar.delete_event(&id).unwrap();

        let summary = apply_week_plan(&plan, &mut calendar, false).unwrap();
        assert_eq!(summary.deleted, 0);
        assert_eq!(summary.created, 9);
    }

    #[test]
    fn invalid_config_aborts() {
        let mut calendar = MemoryCalendar::new();
        let mut config = utc_config();
        config.planning.timezone = "Nowhere/Land".to_string();
        assert!(run_scheduling_pass(thursday_morning(), &config, &Settings::default(), &mut calendar)
            .is_err());
    }
}
