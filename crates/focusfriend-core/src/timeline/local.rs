//! Wall-clock to instant conversion in the reference time zone.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// The instant at `hour:00` local time on `date` in `tz`.
///
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
/// Local times that do not exist (DST spring-forward) resolve to the
/// post-transition instant.
pub fn local_hour(tz: &Tz, date: NaiveDate, hour: u8) -> DateTime<Utc> {
    let time = NaiveTime::from_hms_opt(u32::from(hour), 0, 0).unwrap_or(NaiveTime::MIN);
    local_datetime(tz, NaiveDateTime::new(date, time))
}

/// The instant of local midnight starting `date` in `tz`.
pub fn local_midnight(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    local_datetime(tz, NaiveDateTime::new(date, NaiveTime::MIN))
}

/// The local calendar day `[00:00, next 00:00)` of `date` as instants.
pub fn local_day(tz: &Tz, date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let next = date.succ_opt().unwrap_or(date);
    (local_midnight(tz, date), local_midnight(tz, next))
}

/// The local calendar date of `instant` in `tz`.
pub fn local_date(tz: &Tz, instant: DateTime<Utc>) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

/// The instant of the local wall-clock time `naive` in `tz`, resolved the
/// same way as [`local_hour`].
pub fn local_datetime(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mapped = tz.from_local_datetime(&naive);
    if let Some(dt) = mapped.earliest() {
        return dt.with_timezone(&Utc);
    }

    // Spring-forward gaps never exceed an hour or two; step forward to the
    // first existing local minute.
    for minutes in 1..=180 {
        if let Some(dt) = tz
            .from_local_datetime(&(naive + Duration::minutes(minutes)))
            .earliest()
        {
            tracing::warn!(
                "local time {} does not exist in {}; using {}",
                naive,
                tz,
                dt
            );
            return dt.with_timezone(&Utc);
        }
    }

    tracing::warn!(
        "could not resolve local time {} in {}; interpreting as UTC",
        naive,
        tz
    );
    Utc.from_utc_datetime(&naive)
}
