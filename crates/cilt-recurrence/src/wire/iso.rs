//! ISO-8601 date and time strings used by the wire record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{DecodeError, DecodeResult};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATETIME_MINUTES_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Formats the start of a schedule: `YYYY-MM-DD` without a time of day,
/// `YYYY-MM-DDTHH:MM:SS[.fff]` with one.
#[must_use]
pub fn format_schedule_time(date: NaiveDate, time: Option<NaiveTime>) -> String {
    match time {
        None => format_date(date),
        Some(time) => date.and_time(time).format(DATETIME_FORMAT).to_string(),
    }
}

/// Parses a `scheduleTimeISO` value.
///
/// Accepts a bare date, a local date-time (seconds optional), or an RFC 3339
/// timestamp with offset; for the latter the wall-clock date and time are kept
/// and the offset is dropped.
///
/// ## Errors
/// Returns `MalformedDate` if none of the accepted forms match.
pub fn parse_schedule_time(value: &str) -> DecodeResult<(NaiveDate, Option<NaiveTime>)> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok((date, None));
    }
    parse_datetime(trimmed)
        .map(|dt| (dt.date(), Some(dt.time())))
        .ok_or_else(|| DecodeError::malformed_date("scheduleTimeISO", value))
}

/// Parses an `endDateISO` value; a date-time is truncated to its date.
///
/// ## Errors
/// Returns `MalformedDate` if the value is neither a date nor a date-time.
pub fn parse_end_date(value: &str) -> DecodeResult<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(trimmed).map(|dt| dt.date()))
        .ok_or_else(|| DecodeError::malformed_date("endDateISO", value))
}

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(value, DATETIME_MINUTES_FORMAT))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|dt| dt.naive_local())
        })
}
