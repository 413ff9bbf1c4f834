//! Recurrence rules, their editable drafts, and draft validation.

use chrono::{NaiveDate, NaiveTime};

use super::{FrequencyUnit, Ordinal, Weekday, WeekdaySet};
use crate::error::{ValidationError, ValidationErrorKind, ValidationResult};

/// Day selection for a monthly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthlySelector {
    /// A fixed day of the month (1..=31), clamped to the month's last day.
    DayOfMonth { day: u8 },
    /// The Nth (or last) given weekday of the month.
    NthWeekday { ordinal: Ordinal, weekday: Weekday },
}

/// Day selection for a yearly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum YearlySelector {
    /// A fixed month (1..=12) and day (1..=31), clamped to the month's last day.
    MonthAndDay { month: u8, day: u8 },
    /// The Nth (or last) given weekday of a fixed month.
    NthWeekdayOfMonth {
        ordinal: Ordinal,
        weekday: Weekday,
        month: u8,
    },
}

/// Frequency unit together with the selector that unit requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Recurrence {
    Daily,
    Weekly(WeekdaySet),
    Monthly(MonthlySelector),
    Yearly(YearlySelector),
}

impl Recurrence {
    #[must_use]
    pub const fn unit(self) -> FrequencyUnit {
        match self {
            Self::Daily => FrequencyUnit::Daily,
            Self::Weekly(_) => FrequencyUnit::Weekly,
            Self::Monthly(_) => FrequencyUnit::Monthly,
            Self::Yearly(_) => FrequencyUnit::Yearly,
        }
    }
}

/// A validated, immutable recurrence rule.
///
/// Only [`validate`] and [`crate::decode`] produce values of this type, so every
/// instance satisfies the rule invariants. Editing goes through
/// [`RecurrenceRule::to_draft`] and a fresh validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecurrenceRule {
    recurrence: Recurrence,
    interval: u32,
    start_date: NaiveDate,
    start_time: Option<NaiveTime>,
    end_date: Option<NaiveDate>,
    status: Option<String>,
}

impl RecurrenceRule {
    #[must_use]
    pub const fn recurrence(&self) -> Recurrence {
        self.recurrence
    }

    #[must_use]
    pub const fn unit(&self) -> FrequencyUnit {
        self.recurrence.unit()
    }

    /// Every N units; at least 1.
    #[must_use]
    pub const fn interval(&self) -> u32 {
        self.interval
    }

    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    #[must_use]
    pub const fn start_time(&self) -> Option<NaiveTime> {
        self.start_time
    }

    /// Inclusive last date; `None` means unbounded.
    #[must_use]
    pub const fn end_date(&self) -> Option<NaiveDate> {
        self.end_date
    }

    /// Caller-owned lifecycle tag, never interpreted here.
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Returns the same rule with a different lifecycle tag.
    #[must_use]
    pub fn with_status(mut self, status: Option<String>) -> Self {
        self.status = status;
        self
    }

    /// Returns an editable draft describing this rule.
    #[must_use]
    pub fn to_draft(&self) -> RuleDraft {
        let mut draft = RuleDraft {
            frequency: Some(self.unit()),
            interval: Some(self.interval),
            start_date: Some(self.start_date),
            start_time: self.start_time,
            end_date: self.end_date,
            status: self.status.clone(),
            ..RuleDraft::default()
        };
        match self.recurrence {
            Recurrence::Daily => {}
            Recurrence::Weekly(days) => draft.weekly_days = Some(days),
            Recurrence::Monthly(selector) => draft.monthly = Some(selector),
            Recurrence::Yearly(selector) => draft.yearly = Some(selector),
        }
        draft
    }
}

/// Form-shaped rule input.
///
/// Every field is optional and the selectors are independent, the way an edit
/// form holds them. [`validate`] turns a draft into a [`RecurrenceRule`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleDraft {
    pub frequency: Option<FrequencyUnit>,
    /// Defaults to 1 when absent.
    pub interval: Option<u32>,
    pub start_date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_date: Option<NaiveDate>,
    /// `Some(empty)` is kept distinct from `None` so an emptied weekday picker is reported.
    pub weekly_days: Option<WeekdaySet>,
    pub monthly: Option<MonthlySelector>,
    pub yearly: Option<YearlySelector>,
    pub status: Option<String>,
}

impl RuleDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a daily draft.
    #[must_use]
    pub fn daily(start_date: NaiveDate) -> Self {
        Self {
            frequency: Some(FrequencyUnit::Daily),
            start_date: Some(start_date),
            ..Self::default()
        }
    }

    /// Creates a weekly draft on the given days.
    #[must_use]
    pub fn weekly(start_date: NaiveDate, days: impl Into<WeekdaySet>) -> Self {
        Self {
            frequency: Some(FrequencyUnit::Weekly),
            start_date: Some(start_date),
            weekly_days: Some(days.into()),
            ..Self::default()
        }
    }

    /// Creates a monthly draft.
    #[must_use]
    pub fn monthly(start_date: NaiveDate, selector: MonthlySelector) -> Self {
        Self {
            frequency: Some(FrequencyUnit::Monthly),
            start_date: Some(start_date),
            monthly: Some(selector),
            ..Self::default()
        }
    }

    /// Creates a yearly draft.
    #[must_use]
    pub fn yearly(start_date: NaiveDate, selector: YearlySelector) -> Self {
        Self {
            frequency: Some(FrequencyUnit::Yearly),
            start_date: Some(start_date),
            yearly: Some(selector),
            ..Self::default()
        }
    }

    /// Sets the frequency unit.
    #[must_use]
    pub fn with_frequency(mut self, frequency: FrequencyUnit) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Sets the interval.
    #[must_use]
    pub fn with_interval(mut self, interval: u32) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Sets the time of day paired with every occurrence.
    #[must_use]
    pub fn with_start_time(mut self, time: NaiveTime) -> Self {
        self.start_time = Some(time);
        self
    }

    /// Sets the inclusive end date.
    #[must_use]
    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    /// Sets the weekday selection.
    #[must_use]
    pub fn with_weekly_days(mut self, days: impl Into<WeekdaySet>) -> Self {
        self.weekly_days = Some(days.into());
        self
    }

    /// Sets the monthly selector.
    #[must_use]
    pub fn with_monthly(mut self, selector: MonthlySelector) -> Self {
        self.monthly = Some(selector);
        self
    }

    /// Sets the yearly selector.
    #[must_use]
    pub fn with_yearly(mut self, selector: YearlySelector) -> Self {
        self.yearly = Some(selector);
        self
    }

    /// Sets the lifecycle tag.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Validates this draft; see [`validate`].
    ///
    /// ## Errors
    /// Returns the first violated invariant.
    pub fn validate(&self) -> ValidationResult<RecurrenceRule> {
        validate(self)
    }
}

/// ## Summary
/// Checks a draft against every rule invariant and builds the rule.
///
/// Checks run in a fixed order: required fields, interval, selector presence
/// and match, selector ranges, then end date against start date.
///
/// ## Errors
/// Returns a `ValidationError` whose kind names the first violated invariant.
///
/// ## Side Effects
/// None.
pub fn validate(draft: &RuleDraft) -> ValidationResult<RecurrenceRule> {
    let unit = draft
        .frequency
        .ok_or_else(|| ValidationError::missing_field("frequencyUnit"))?;
    let start_date = draft
        .start_date
        .ok_or_else(|| ValidationError::missing_field("startDate"))?;

    let interval = draft.interval.unwrap_or(1);
    if interval == 0 {
        return Err(ValidationError::new(
            ValidationErrorKind::IntervalOutOfRange,
            format!("interval must be at least 1, got {interval}"),
        ));
    }

    let recurrence = select_recurrence(unit, draft)?;
    check_ranges(recurrence)?;

    if let Some(end_date) = draft.end_date
        && end_date < start_date
    {
        return Err(ValidationError::new(
            ValidationErrorKind::EndBeforeStart,
            format!("end date {end_date} precedes start date {start_date}"),
        ));
    }

    Ok(RecurrenceRule {
        recurrence,
        interval,
        start_date,
        start_time: draft.start_time,
        end_date: draft.end_date,
        status: draft.status.clone(),
    })
}

fn select_recurrence(unit: FrequencyUnit, draft: &RuleDraft) -> ValidationResult<Recurrence> {
    let foreign = |selector: &str| ValidationError::selector_mismatch(unit, selector);

    match unit {
        FrequencyUnit::Daily => {
            if draft.weekly_days.is_some() {
                return Err(foreign("weekly days"));
            }
            if draft.monthly.is_some() {
                return Err(foreign("a monthly selector"));
            }
            if draft.yearly.is_some() {
                return Err(foreign("a yearly selector"));
            }
            Ok(Recurrence::Daily)
        }
        FrequencyUnit::Weekly => {
            if draft.monthly.is_some() {
                return Err(foreign("a monthly selector"));
            }
            if draft.yearly.is_some() {
                return Err(foreign("a yearly selector"));
            }
            let days = draft.weekly_days.ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::MissingSelector,
                    "weekly rule needs weekday selection",
                )
            })?;
            if days.is_empty() {
                return Err(ValidationError::new(
                    ValidationErrorKind::EmptyWeekdaySet,
                    "weekly rule needs at least one weekday",
                ));
            }
            Ok(Recurrence::Weekly(days))
        }
        FrequencyUnit::Monthly => {
            if draft.weekly_days.is_some() {
                return Err(foreign("weekly days"));
            }
            if draft.yearly.is_some() {
                return Err(foreign("a yearly selector"));
            }
            draft.monthly.map(Recurrence::Monthly).ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::MissingSelector,
                    "monthly rule needs a day-of-month or nth-weekday selector",
                )
            })
        }
        FrequencyUnit::Yearly => {
            if draft.weekly_days.is_some() {
                return Err(foreign("weekly days"));
            }
            if draft.monthly.is_some() {
                return Err(foreign("a monthly selector"));
            }
            draft.yearly.map(Recurrence::Yearly).ok_or_else(|| {
                ValidationError::new(
                    ValidationErrorKind::MissingSelector,
                    "yearly rule needs a month-and-day or nth-weekday selector",
                )
            })
        }
    }
}

fn check_ranges(recurrence: Recurrence) -> ValidationResult<()> {
    match recurrence {
        Recurrence::Daily
        | Recurrence::Weekly(_)
        | Recurrence::Monthly(MonthlySelector::NthWeekday { .. }) => Ok(()),
        Recurrence::Monthly(MonthlySelector::DayOfMonth { day }) => check_day(day),
        Recurrence::Yearly(YearlySelector::MonthAndDay { month, day }) => {
            check_month(month)?;
            check_day(day)
        }
        Recurrence::Yearly(YearlySelector::NthWeekdayOfMonth { month, .. }) => check_month(month),
    }
}

fn check_day(day: u8) -> ValidationResult<()> {
    if (1..=31).contains(&day) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::DayOutOfRange,
            format!("day must be within 1..=31, got {day}"),
        ))
    }
}

fn check_month(month: u8) -> ValidationResult<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(ValidationError::new(
            ValidationErrorKind::MonthOutOfRange,
            format!("month must be within 1..=12, got {month}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    fn kind_of(draft: &RuleDraft) -> ValidationErrorKind {
        validate(draft).expect_err("draft should be rejected").kind
    }

    #[test]
    fn daily_defaults_interval_to_one() {
        let rule = validate(&RuleDraft::daily(date(2025, 1, 1))).expect("valid");
        assert_eq!(rule.interval(), 1);
        assert_eq!(rule.recurrence(), Recurrence::Daily);
        assert_eq!(rule.end_date(), None);
    }

    #[test]
    fn weekly_with_empty_set_is_rejected() {
        let draft = RuleDraft::weekly(date(2025, 1, 6), WeekdaySet::empty());
        assert_eq!(kind_of(&draft), ValidationErrorKind::EmptyWeekdaySet);
    }

    #[test]
    fn weekly_without_days_is_missing_selector() {
        let draft = RuleDraft::daily(date(2025, 1, 6)).with_frequency(FrequencyUnit::Weekly);
        assert_eq!(kind_of(&draft), ValidationErrorKind::MissingSelector);
    }

    #[test]
    fn monthly_with_weekly_days_is_mismatch() {
        let draft = RuleDraft::weekly(date(2025, 1, 6), [Weekday::Monday])
            .with_frequency(FrequencyUnit::Monthly);
        assert_eq!(kind_of(&draft), ValidationErrorKind::SelectorMismatch);
    }

    #[test]
    fn daily_with_yearly_selector_is_mismatch() {
        let draft = RuleDraft::daily(date(2025, 1, 6))
            .with_yearly(YearlySelector::MonthAndDay { month: 1, day: 1 });
        assert_eq!(kind_of(&draft), ValidationErrorKind::SelectorMismatch);
    }

    #[test]
    fn monthly_without_selector_is_missing() {
        let draft = RuleDraft::daily(date(2025, 1, 6)).with_frequency(FrequencyUnit::Monthly);
        assert_eq!(kind_of(&draft), ValidationErrorKind::MissingSelector);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let draft = RuleDraft::daily(date(2025, 1, 1)).with_interval(0);
        assert_eq!(kind_of(&draft), ValidationErrorKind::IntervalOutOfRange);
    }

    #[test]
    fn day_and_month_ranges() {
        let start = date(2025, 1, 1);
        assert_eq!(
            kind_of(&RuleDraft::monthly(start, MonthlySelector::DayOfMonth { day: 0 })),
            ValidationErrorKind::DayOutOfRange
        );
        assert_eq!(
            kind_of(&RuleDraft::monthly(start, MonthlySelector::DayOfMonth { day: 32 })),
            ValidationErrorKind::DayOutOfRange
        );
        assert_eq!(
            kind_of(&RuleDraft::yearly(
                start,
                YearlySelector::MonthAndDay { month: 13, day: 1 }
            )),
            ValidationErrorKind::MonthOutOfRange
        );
        assert_eq!(
            kind_of(&RuleDraft::yearly(
                start,
                YearlySelector::NthWeekdayOfMonth {
                    ordinal: Ordinal::First,
                    weekday: Weekday::Monday,
                    month: 0,
                }
            )),
            ValidationErrorKind::MonthOutOfRange
        );
        // Feb 31 is accepted and clamped at expansion time.
        assert!(
            validate(&RuleDraft::yearly(
                start,
                YearlySelector::MonthAndDay { month: 2, day: 31 }
            ))
            .is_ok()
        );
    }

    #[test]
    fn end_before_start_is_rejected() {
        let draft = RuleDraft::daily(date(2025, 3, 1)).with_end_date(date(2025, 2, 28));
        assert_eq!(kind_of(&draft), ValidationErrorKind::EndBeforeStart);

        let same_day = RuleDraft::daily(date(2025, 3, 1)).with_end_date(date(2025, 3, 1));
        assert!(validate(&same_day).is_ok());
    }

    #[test]
    fn missing_required_fields() {
        assert_eq!(kind_of(&RuleDraft::new()), ValidationErrorKind::MissingField);

        let no_start = RuleDraft {
            frequency: Some(FrequencyUnit::Daily),
            ..RuleDraft::default()
        };
        assert_eq!(kind_of(&no_start), ValidationErrorKind::MissingField);
    }

    #[test]
    fn draft_round_trips_through_rule() {
        let draft = RuleDraft::monthly(
            date(2025, 5, 1),
            MonthlySelector::NthWeekday {
                ordinal: Ordinal::Last,
                weekday: Weekday::Friday,
            },
        )
        .with_interval(2)
        .with_start_time(NaiveTime::from_hms_opt(6, 30, 0).expect("valid time"))
        .with_end_date(date(2026, 5, 1))
        .with_status("active");

        let rule = validate(&draft).expect("valid");
        assert_eq!(rule.to_draft(), draft);
        assert_eq!(rule.status(), Some("active"));
    }
}
