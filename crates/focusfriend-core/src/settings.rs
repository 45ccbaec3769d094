//! User-configured workday and break-window hours.
//!
//! Settings are read once per planning run from a string-keyed store and
//! are immutable afterwards. Missing or blank values fall back to the
//! defaults below; malformed values fall back too, with a warning.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

pub const WORKDAY_START_HOUR_KEY: &str = "workday_start_hour";
pub const WORKDAY_END_HOUR_KEY: &str = "workday_end_hour";
pub const LUNCHTIME_START_HOUR_KEY: &str = "lunchtime_start_hour";
pub const LUNCHTIME_END_HOUR_KEY: &str = "lunchtime_end_hour";

/// All recognised settings keys.
pub const SETTINGS_KEYS: [&str; 4] = [
    WORKDAY_START_HOUR_KEY,
    WORKDAY_END_HOUR_KEY,
    LUNCHTIME_START_HOUR_KEY,
    LUNCHTIME_END_HOUR_KEY,
];

pub const DEFAULT_WORKDAY_START_HOUR: u8 = 12;
pub const DEFAULT_WORKDAY_END_HOUR: u8 = 20;
pub const DEFAULT_LUNCHTIME_START_HOUR: u8 = 15;
pub const DEFAULT_LUNCHTIME_END_HOUR: u8 = 17;

/// A string-keyed settings store.
pub trait SettingsSource {
    /// Raw value stored under `key`, if any.
    fn setting(&self, key: &str) -> Result<Option<String>>;
}

impl SettingsSource for HashMap<String, String> {
    fn setting(&self, key: &str) -> Result<Option<String>> {
        Ok(self.get(key).cloned())
    }
}

/// Hour-of-day values in the reference time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub workday_start_hour: u8,
    pub workday_end_hour: u8,
    pub lunchtime_start_hour: u8,
    pub lunchtime_end_hour: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            workday_start_hour: DEFAULT_WORKDAY_START_HOUR,
            workday_end_hour: DEFAULT_WORKDAY_END_HOUR,
            lunchtime_start_hour: DEFAULT_LUNCHTIME_START_HOUR,
            lunchtime_end_hour: DEFAULT_LUNCHTIME_END_HOUR,
        }
    }
}

impl Settings {
    /// Build settings from explicit hours, each in `0..=23`.
    ///
    /// End hours earlier than start hours are accepted here; the day
    /// planner reports them as invalid bounds.
    pub fn new(
        workday_start_hour: u8,
        workday_end_hour: u8,
        lunchtime_start_hour: u8,
        lunchtime_end_hour: u8,
    ) -> Result<Self, ValidationError> {
        let settings = Self {
            workday_start_hour,
            workday_end_hour,
            lunchtime_start_hour,
            lunchtime_end_hour,
        };
        for (key, hour) in settings.entries() {
            if hour > 23 {
                return Err(ValidationError::InvalidValue {
                    field: key.to_string(),
                    message: format!("hour {hour} is outside 0-23"),
                });
            }
        }
        Ok(settings)
    }

    /// Resolve settings from a store, applying defaults.
    ///
    /// Timestamps carrying an offset are read in `timezone`.
    ///
    /// # Errors
    /// Only fails when the store itself cannot be read.
    pub fn from_source<S: SettingsSource + ?Sized>(source: &S, timezone: &Tz) -> Result<Self> {
        let hour = |key, default| resolve(source, key, default, timezone);
        Ok(Self {
            workday_start_hour: hour(WORKDAY_START_HOUR_KEY, DEFAULT_WORKDAY_START_HOUR)?,
            workday_end_hour: hour(WORKDAY_END_HOUR_KEY, DEFAULT_WORKDAY_END_HOUR)?,
            lunchtime_start_hour: hour(LUNCHTIME_START_HOUR_KEY, DEFAULT_LUNCHTIME_START_HOUR)?,
            lunchtime_end_hour: hour(LUNCHTIME_END_HOUR_KEY, DEFAULT_LUNCHTIME_END_HOUR)?,
        })
    }

    /// Key/hour pairs in store order.
    pub fn entries(&self) -> [(&'static str, u8); 4] {
        [
            (WORKDAY_START_HOUR_KEY, self.workday_start_hour),
            (WORKDAY_END_HOUR_KEY, self.workday_end_hour),
            (LUNCHTIME_START_HOUR_KEY, self.lunchtime_start_hour),
            (LUNCHTIME_END_HOUR_KEY, self.lunchtime_end_hour),
        ]
    }
}

fn resolve<S: SettingsSource + ?Sized>(
    source: &S,
    key: &str,
    default: u8,
    timezone: &Tz,
) -> Result<u8> {
    let Some(raw) = source.setting(key)? else {
        return Ok(default);
    };
    if raw.trim().is_empty() {
        return Ok(default);
    }
    match parse_hour(&raw, timezone) {
        Some(hour) => Ok(hour),
        None => {
            tracing::warn!(
                "setting {} has unusable value {:?}; using default {}",
                key,
                raw,
                default
            );
            Ok(default)
        }
    }
}

/// Extract an hour of day from a stored value.
///
/// Accepts a bare hour (`"9"`), a time of day (`"09:30"`, `"09:30:00"`), a
/// local timestamp (`"2024-01-01 09:30"`) or an RFC 3339 timestamp. Only
/// the hour is kept. Values without an offset are already wall-clock hours
/// in the reference zone; RFC 3339 values are converted into `timezone`
/// first. Hours outside `0..=23` are rejected.
pub fn parse_hour(raw: &str, timezone: &Tz) -> Option<u8> {
    let value = raw.trim();

    let hour = if let Ok(hour) = value.parse::<u32>() {
        hour
    } else if let Ok(time) = NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
    {
        time.hour()
    } else if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        dt.with_timezone(timezone).hour()
    } else if let Ok(dt) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M"))
    {
        dt.hour()
    } else {
        return None;
    };

    u8::try_from(hour).ok().filter(|h| *h <= 23)
}
