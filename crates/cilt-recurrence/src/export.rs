//! RFC 5545 RRULE export, for handing schedules to calendar clients.
//!
//! Day-of-month selectors past the 28th are written as
//! `BYMONTHDAY=28,...,N;BYSETPOS=-1` so short months keep the clamping
//! behaviour instead of being skipped.

use chrono::NaiveDate;

use crate::model::{MonthlySelector, Ordinal, Recurrence, RecurrenceRule, Weekday, YearlySelector};

impl RecurrenceRule {
    /// ## Summary
    /// Returns the RRULE value (without the `RRULE:` prefix) describing this rule.
    ///
    /// `UNTIL` is a DATE for date-only rules and a floating DATE-TIME at the end
    /// of the end date otherwise, matching the value type of [`Self::dtstart_value`].
    #[must_use]
    pub fn to_rrule(&self) -> String {
        let mut parts = vec![format!("FREQ={}", self.unit().as_rrule_freq())];

        if self.interval() != 1 {
            parts.push(format!("INTERVAL={}", self.interval()));
        }

        if let Some(end) = self.end_date() {
            let until = if self.start_time().is_some() {
                format!("{}T235959", ical_date(end))
            } else {
                ical_date(end)
            };
            parts.push(format!("UNTIL={until}"));
        }

        match self.recurrence() {
            Recurrence::Daily => {}
            Recurrence::Weekly(days) => {
                parts.push(format!("BYDAY={days}"));
                parts.push("WKST=MO".to_string());
            }
            Recurrence::Monthly(MonthlySelector::DayOfMonth { day }) => {
                parts.extend(clamped_month_day(day));
            }
            Recurrence::Monthly(MonthlySelector::NthWeekday { ordinal, weekday }) => {
                parts.push(format!("BYDAY={}", by_day(ordinal, weekday)));
            }
            Recurrence::Yearly(YearlySelector::MonthAndDay { month, day }) => {
                parts.push(format!("BYMONTH={month}"));
                parts.extend(clamped_month_day(day));
            }
            Recurrence::Yearly(YearlySelector::NthWeekdayOfMonth {
                ordinal,
                weekday,
                month,
            }) => {
                parts.push(format!("BYMONTH={month}"));
                parts.push(format!("BYDAY={}", by_day(ordinal, weekday)));
            }
        }

        parts.join(";")
    }

    /// Returns the DTSTART value: `YYYYMMDD`, or floating `YYYYMMDDTHHMMSS` with a start time.
    #[must_use]
    pub fn dtstart_value(&self) -> String {
        match self.start_time() {
            Some(time) => format!("{}T{}", ical_date(self.start_date()), time.format("%H%M%S")),
            None => ical_date(self.start_date()),
        }
    }
}

fn ical_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn by_day(ordinal: Ordinal, weekday: Weekday) -> String {
    format!("{ordinal}{weekday}")
}

fn clamped_month_day(day: u8) -> Vec<String> {
    if day <= 28 {
        vec![format!("BYMONTHDAY={day}")]
    } else {
        let days: Vec<_> = (28..=day).map(|d| d.to_string()).collect();
        vec![
            format!("BYMONTHDAY={}", days.join(",")),
            "BYSETPOS=-1".to_string(),
        ]
    }
}
