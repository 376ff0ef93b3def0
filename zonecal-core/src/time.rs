//! Date/time parsing, formatting and timezone conversion.
//!
//! Events carry civil (zone-less) date-times; the owning calendar's zone gives them
//! meaning. Conversions between zones hold the absolute instant fixed.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
};
use chrono_tz::Tz;

use crate::error::{CalError, CalResult};

pub const DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Start of the canonical all-day window.
pub fn all_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).unwrap()
}

/// End of the canonical all-day window.
pub fn all_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 0, 0).unwrap()
}

/// Last minute of a day, used for "until" bounds and multi-day splits.
pub fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap()
}

/// Parse `YYYY-MM-DDTHH:MM`.
pub fn parse_date_time(value: &str) -> CalResult<NaiveDateTime> {
    let value = value.trim();
    let invalid = || {
        CalError::InvalidValue(format!(
            "Invalid date-time '{}'. Expected YYYY-MM-DDTHH:MM",
            value
        ))
    };

    if value.len() != 16 {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).map_err(|_| invalid())
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(value: &str) -> CalResult<NaiveDate> {
    let value = value.trim();
    let invalid =
        || CalError::InvalidValue(format!("Invalid date '{}'. Expected YYYY-MM-DD", value));

    if value.len() != 10 {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| invalid())
}

/// Parse an IANA zone id such as `America/New_York`.
pub fn parse_timezone(value: &str) -> CalResult<Tz> {
    value
        .trim()
        .parse::<Tz>()
        .map_err(|_| CalError::InvalidTimezone(format!("Unknown time zone '{}'", value.trim())))
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Anchor a civil date-time in `zone`.
///
/// Ambiguous local times (clocks going back) take the earlier offset. Local times that
/// fall into a gap (clocks going forward) keep the offset in force before the gap, which
/// moves them later by the gap length.
pub fn to_instant(local: NaiveDateTime, zone: Tz) -> DateTime<Tz> {
    match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => {
            let before = zone
                .offset_from_utc_datetime(&(local - Duration::days(1)))
                .fix();
            let utc = local - Duration::seconds(i64::from(before.local_minus_utc()));
            zone.from_utc_datetime(&utc)
        }
    }
}

/// Re-read a civil date-time from `from` as civil time in `to`, keeping the instant.
pub fn convert_local(local: NaiveDateTime, from: Tz, to: Tz) -> NaiveDateTime {
    to_instant(local, from).with_timezone(&to).naive_local()
}
