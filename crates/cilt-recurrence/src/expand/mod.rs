//! Occurrence expansion.
//!
//! A rule is expanded period by period: day, week, month or year `k * interval`
//! after the period containing the start date. Each period yields its
//! candidate dates in ascending order, and periods never overlap, so the
//! output is strictly ascending without sorting.

mod calendar;

use std::fmt;
use std::iter::FusedIterator;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};

use crate::model::{MonthlySelector, Recurrence, RecurrenceRule, YearlySelector};
use calendar::{add_months, clamped_day, month_index, nth_weekday, week_start};

/// One concrete occurrence of a rule.
///
/// Rules without a start time produce date-only occurrences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
}

impl Occurrence {
    /// The occurrence as a date-time; date-only occurrences sit at midnight.
    #[must_use]
    pub fn at(&self) -> NaiveDateTime {
        self.date.and_time(self.time.unwrap_or_default())
    }
}

impl fmt::Display for Occurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(time) => write!(f, "{} {}", self.date, time),
            None => write!(f, "{}", self.date),
        }
    }
}

/// Lazy, ascending occurrences of a rule within a date window.
///
/// Cloning the iterator, or calling [`occurrences`] again with the same
/// arguments, replays the same sequence.
#[derive(Debug, Clone)]
pub struct Occurrences<'a> {
    rule: &'a RecurrenceRule,
    lower: NaiveDate,
    upper: NaiveDate,
    remaining: usize,
    period: u64,
    pending: std::vec::IntoIter<NaiveDate>,
    exhausted: bool,
}

/// ## Summary
/// Expands `rule` into its occurrences within `[from, to]`, at most `limit` of them.
///
/// Every occurrence also lies within `[start_date, end_date]` of the rule.
/// An empty window (`from > to`) or a zero `limit` yields nothing.
///
/// ## Side Effects
/// None; the iterator borrows the rule and allocates only per-period buffers.
#[must_use]
pub fn occurrences(
    rule: &RecurrenceRule,
    from: NaiveDate,
    to: NaiveDate,
    limit: usize,
) -> Occurrences<'_> {
    let lower = from.max(rule.start_date());
    let upper = rule.end_date().map_or(to, |end| end.min(to));

    Occurrences {
        rule,
        lower,
        upper,
        remaining: limit,
        period: first_period(rule, lower),
        pending: Vec::new().into_iter(),
        exhausted: lower > upper,
    }
}

/// ## Summary
/// Returns the first occurrence on or after `from`, if the rule has one.
#[must_use]
pub fn next_occurrence(rule: &RecurrenceRule, from: NaiveDate) -> Option<Occurrence> {
    occurrences(rule, from, NaiveDate::MAX, 1).next()
}

impl RecurrenceRule {
    /// Method form of [`occurrences`].
    #[must_use]
    pub fn occurrences(&self, from: NaiveDate, to: NaiveDate, limit: usize) -> Occurrences<'_> {
        occurrences(self, from, to, limit)
    }

    /// Method form of [`next_occurrence`].
    #[must_use]
    pub fn next_occurrence(&self, from: NaiveDate) -> Option<Occurrence> {
        next_occurrence(self, from)
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.remaining == 0 {
                return None;
            }

            if let Some(date) = self.pending.next() {
                if date < self.lower {
                    continue;
                }
                if date > self.upper {
                    self.exhausted = true;
                    self.pending = Vec::new().into_iter();
                    return None;
                }
                self.remaining -= 1;
                return Some(Occurrence {
                    date,
                    time: self.rule.start_time(),
                });
            }

            if self.exhausted {
                return None;
            }

            match period_dates(self.rule, self.period) {
                Some((period_start, dates)) if period_start <= self.upper => {
                    self.pending = dates.into_iter();
                    self.period += 1;
                }
                // Past the window, or past the end of chrono's calendar.
                _ => self.exhausted = true,
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted && self.pending.len() == 0 {
            (0, Some(0))
        } else {
            (0, Some(self.remaining))
        }
    }
}

impl FusedIterator for Occurrences<'_> {}

/// First period index whose dates can reach `lower`.
fn first_period(rule: &RecurrenceRule, lower: NaiveDate) -> u64 {
    let start = rule.start_date();
    if lower <= start {
        return 0;
    }
    let interval = u64::from(rule.interval());
    let non_negative = |n: i64| u64::try_from(n).unwrap_or(0);

    match rule.recurrence() {
        Recurrence::Daily => non_negative((lower - start).num_days()).div_ceil(interval),
        Recurrence::Weekly(_) => {
            let weeks = (week_start(lower) - week_start(start)).num_days() / 7;
            non_negative(weeks) / interval
        }
        Recurrence::Monthly(_) => non_negative(month_index(lower) - month_index(start)) / interval,
        Recurrence::Yearly(_) => {
            non_negative(i64::from(lower.year()) - i64::from(start.year())) / interval
        }
    }
}

/// First day of period `k` and the period's candidate dates, ascending.
///
/// Candidates may precede the rule's start date; the iterator filters them.
fn period_dates(rule: &RecurrenceRule, k: u64) -> Option<(NaiveDate, Vec<NaiveDate>)> {
    let start = rule.start_date();
    let step = k.checked_mul(u64::from(rule.interval()))?;

    match rule.recurrence() {
        Recurrence::Daily => {
            let date = start.checked_add_days(Days::new(step))?;
            Some((date, vec![date]))
        }
        Recurrence::Weekly(days) => {
            let monday = week_start(start).checked_add_days(Days::new(step.checked_mul(7)?))?;
            let dates = days
                .iter()
                .map(|day| monday.checked_add_days(Days::new(u64::from(day.days_from_monday()))))
                .collect::<Option<Vec<_>>>()?;
            Some((monday, dates))
        }
        Recurrence::Monthly(selector) => {
            let (year, month) = add_months(start, step)?;
            let date = match selector {
                MonthlySelector::DayOfMonth { day } => clamped_day(year, month, day)?,
                MonthlySelector::NthWeekday { ordinal, weekday } => {
                    nth_weekday(year, month, ordinal, weekday)?
                }
            };
            Some((NaiveDate::from_ymd_opt(year, month, 1)?, vec![date]))
        }
        Recurrence::Yearly(selector) => {
            let year = start.year().checked_add(i32::try_from(step).ok()?)?;
            let (month, date) = match selector {
                YearlySelector::MonthAndDay { month, day } => {
                    let month = u32::from(month);
                    (month, clamped_day(year, month, day)?)
                }
                YearlySelector::NthWeekdayOfMonth {
                    ordinal,
                    weekday,
                    month,
                } => {
                    let month = u32::from(month);
                    (month, nth_weekday(year, month, ordinal, weekday)?)
                }
            };
            Some((NaiveDate::from_ymd_opt(year, month, 1)?, vec![date]))
        }
    }
}
