//! Integration tests for day and week planning.
//!
//! Tests run the planners end to end against the SQLite-backed calendar
//! and the in-memory one, in both UTC and a DST-observing zone.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use focusfriend_core::{
    BlockKind, BoundKind, BusyInterval, Calendar, Database, DayPlanner, MemoryCalendar, PlanError,
    PlannerConfig, Settings, TimeInterval, WeekPlanner,
};

fn at(d: u32, h: u32, m: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, d, h, m, 0).unwrap()
}

fn iv(d: u32, (h1, m1): (u32, u32), (h2, m2): (u32, u32)) -> TimeInterval {
    TimeInterval::new(at(d, h1, m1), at(d, h2, m2)).unwrap()
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn planner_in(timezone: Tz) -> DayPlanner {
    DayPlanner::with_config(PlannerConfig {
        timezone,
        ..PlannerConfig::default()
    })
}

#[test]
fn test_replanning_own_output_is_stable() {
    let planner = planner_in(Tz::UTC);
    let settings = Settings::default();
    let external = vec![
        BusyInterval::external(iv(6, (12, 30), (13, 0))),
        BusyInterval::external(iv(6, (15, 0), (15, 40))),
    ];

    let first = planner.plan_day(&settings, date(6), &external).blocks;

    let mut fed_back = external.clone();
    fed_back.extend(
        first
            .iter()
            .map(|block| BusyInterval::created(block.interval, block.kind)),
    );
    let second = planner.plan_day(&settings, date(6), &fed_back).blocks;

    assert_eq!(first, second);
    assert_eq!(first[0].kind, BlockKind::Break);
    assert_eq!(first[0].interval, iv(6, (15, 40), (16, 40)));
}

#[test]
fn test_break_is_planned_before_focus() {
    let planner = planner_in(Tz::UTC);
    let blocks = planner.plan_day(&Settings::default(), date(6), &[]).blocks;

    let spans: Vec<_> = blocks.iter().map(|b| (b.kind, b.interval)).collect();
    assert_eq!(
        spans,
        vec![
            (BlockKind::Break, iv(6, (15, 0), (16, 0))),
            (BlockKind::Focus, iv(6, (12, 0), (15, 0))),
            (BlockKind::Focus, iv(6, (16, 0), (20, 0))),
        ]
    );
}

#[test]
fn test_inverted_break_window_keeps_focus() {
    let planner = planner_in(Tz::UTC);
    let settings = Settings::new(12, 20, 17, 15).unwrap();
    let outcome = planner.plan_day(&settings, date(6), &[]);

    let spans: Vec<_> = outcome.blocks.iter().map(|b| (b.kind, b.interval)).collect();
    assert_eq!(spans, vec![(BlockKind::Focus, iv(6, (12, 0), (20, 0)))]);
    assert!(!outcome.is_skipped());
    assert!(matches!(
        outcome.error,
        Some(PlanError::InvalidBound {
            bound: BoundKind::BreakWindow,
            ..
        })
    ));
}

#[test]
fn test_week_plan_against_database_calendar() {
    let mut db = Database::open_memory().unwrap();
    db.add_event("All-hands", &iv(7, (12, 0), (20, 0))).unwrap();
    let old = db
        .create_event("old lunch", &iv(8, (15, 0), (16, 0)), BlockKind::Break)
        .unwrap();

    let settings = Settings::from_source(&db, &Tz::UTC).unwrap();
    let planner = WeekPlanner::new(planner_in(Tz::UTC));
    let plan = planner.plan_week(&settings, date(6), &db).unwrap();

    // Wednesday through Saturday.
    assert_eq!(plan.days.len(), 4);
    assert!(plan.day(date(7)).unwrap().blocks.is_empty());

    let friday = plan.day(date(8)).unwrap();
    assert_eq!(friday.stale, vec![old]);
    assert_eq!(friday.blocks.len(), 3);
}

#[test]
fn test_week_plan_uses_reference_zone() {
    // 2024-03-06 is EST (UTC-5): local noon is 17:00 UTC.
    let calendar = MemoryCalendar::new();
    let planner = WeekPlanner::new(planner_in(chrono_tz::America::New_York));
    let day = planner
        .plan_date(&Settings::default(), date(6), &calendar)
        .unwrap();

    assert_eq!(day.blocks[0].interval, iv(6, (20, 0), (21, 0)));
    assert_eq!(day.blocks[1].interval.start(), at(6, 17, 0));
}

#[test]
fn test_planning_on_dst_start() {
    // 2024-03-10 springs forward in New York; afternoon hours are EDT (UTC-4).
    let calendar = MemoryCalendar::new();
    let planner = WeekPlanner::new(planner_in(chrono_tz::America::New_York));
    let day = planner
        .plan_date(&Settings::default(), date(10), &calendar)
        .unwrap();

    assert_eq!(day.blocks[0].interval, iv(10, (19, 0), (20, 0)));
    let last = day.blocks.last().unwrap();
    assert_eq!(
        last.interval.end(),
        Utc.with_ymd_and_hms(2024, 3, 11, 0, 0, 0).unwrap()
    );
}

#[test]
fn test_commitments_outside_workday_leave_it_free() {
    let mut calendar = MemoryCalendar::new();
    // Late on the 5th, spilling into the early 6th.
    calendar.add_commitment(
        "Overnight",
        TimeInterval::new(at(5, 22, 0), at(6, 2, 0)).unwrap(),
    );
    let planner = WeekPlanner::new(planner_in(Tz::UTC));
    let day = planner
        .plan_date(&Settings::default(), date(6), &calendar)
        .unwrap();
    assert_eq!(day.blocks.len(), 3);
}
