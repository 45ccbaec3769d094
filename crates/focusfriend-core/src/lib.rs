//! # Focusfriend Core Library
//!
//! This library provides the planning logic behind Focusfriend: it finds the
//! free time in a workday around existing calendar commitments and reserves
//! one lunch break and as many long focus blocks as fit. All operations are
//! available via the standalone `focusfriend` CLI binary.
//!
//! ## Architecture
//!
//! - **Timeline**: Interval types, local-time conversion and gap detection
//! - **Scheduler**: Slot allocation, day planning and week planning
//! - **Calendar**: The calendar contract plus an in-memory implementation
//! - **Storage**: SQLite-based settings store and local calendar, TOML-based
//!   configuration
//! - **Runner**: The scheduling pass that materializes a week plan
//!
//! ## Key Components
//!
//! - [`GapFinder`]: Free intervals within a bound
//! - [`DayPlanner`]: Break and focus blocks for one date
//! - [`WeekPlanner`]: Day plans for the rest of the week
//! - [`Calendar`]: Trait for calendars the planner reads and writes
//! - [`run_scheduling_pass`]: Plan and apply in one step

pub mod calendar;
pub mod error;
pub mod runner;
pub mod scheduler;
pub mod settings;
pub mod storage;
pub mod timeline;

pub use calendar::{Calendar, CalendarEntry, EntryId, MemoryCalendar, ORIGIN_TAG_KEY};
pub use error::{
    BoundKind, CalendarError, ConfigError, CoreError, DatabaseError, PlanError, ValidationError,
};
pub use runner::{apply_week_plan, run_scheduling_pass, ApplySummary, PassReport};
pub use scheduler::{
    all_qualifying_slots, best_single_slot, Block, BlockKind, DayOutcome, DayPlan, DayPlanner,
    PlannerConfig, WeekPlan, WeekPlanner,
};
pub use settings::{Settings, SettingsSource};
pub use storage::{Config, Database, EventRecord, EventStatus};
pub use timeline::{find_gaps, BusyInterval, GapFinder, Origin, TimeGap, TimeInterval};
