//! Time intervals and free-gap detection.
//!
//! This module provides:
//! - Interval value types (`TimeInterval`, `BusyInterval`)
//! - Gap detection between busy intervals within a bound
//! - Conversion of wall-clock hours in the reference zone to instants

mod gap;
mod interval;
mod local;

pub use gap::{find_gaps, merge_busy, GapFinder, TimeGap};
pub use interval::{BusyInterval, Origin, TimeInterval};
pub use local::{local_date, local_datetime, local_day, local_hour, local_midnight};
