//! Calendar arithmetic for occurrence expansion.
//!
//! Every function returns `None` instead of overflowing past chrono's date range.

use chrono::{Datelike, Days, NaiveDate};

use crate::model::{Ordinal, Weekday};

/// Last day of the given month.
pub(crate) fn last_day_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    (28..=31)
        .rev()
        .find_map(|day| NaiveDate::from_ymd_opt(year, month, day))
}

/// `day` of the month, moved back to the month's last day when the month is shorter.
pub(crate) fn clamped_day(year: i32, month: u32, day: u8) -> Option<NaiveDate> {
    let last = last_day_of_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, u32::from(day).min(last.day()))
}

/// The `ordinal` occurrence of `weekday` in the given month.
///
/// Months always hold at least four of each weekday, so every ordinal resolves.
pub(crate) fn nth_weekday(
    year: i32,
    month: u32,
    ordinal: Ordinal,
    weekday: Weekday,
) -> Option<NaiveDate> {
    let target = u32::from(weekday.days_from_monday());
    match ordinal.week_index() {
        Some(week) => {
            let first = NaiveDate::from_ymd_opt(year, month, 1)?;
            let ahead = (target + 7 - first.weekday().num_days_from_monday()) % 7;
            first.checked_add_days(Days::new(u64::from(ahead + 7 * week)))
        }
        None => {
            let last = last_day_of_month(year, month)?;
            let back = (last.weekday().num_days_from_monday() + 7 - target) % 7;
            last.checked_sub_days(Days::new(u64::from(back)))
        }
    }
}

/// Monday of the week containing `date`.
pub(crate) fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(NaiveDate::MIN)
}

/// Months since year 0, used for month differences.
pub(crate) fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Year and month `months` after the month of `date`.
pub(crate) fn add_months(date: NaiveDate, months: u64) -> Option<(i32, u32)> {
    let total = month_index(date).checked_add(i64::try_from(months).ok()?)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}
