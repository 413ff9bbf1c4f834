//! The flat, persistence-ready encoding exchanged with the remote schedule store.
//!
//! The record mirrors the store's JSON shape: one `0|1` flag per weekday, a
//! short `frequencyCode` from [`FREQUENCY_CODES`](crate::FREQUENCY_CODES),
//! numeric day/month selectors and ISO-8601 date strings.

mod iso;

use cilt_core::types::{CiltId, ScheduleId, SequenceId, SiteId};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, DecodeResult, ValidationError, ValidationErrorKind};
use crate::model::{
    FrequencyUnit, MonthlySelector, Ordinal, Recurrence, RecurrenceRule, RuleDraft, Weekday,
    WeekdaySet, YearlySelector,
};

pub use iso::{format_date, format_schedule_time, parse_end_date, parse_schedule_time};

/// Site, CILT and sequence a schedule belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleScope {
    pub site_id: SiteId,
    pub cilt_id: CiltId,
    pub sequence_id: SequenceId,
}

impl ScheduleScope {
    #[must_use]
    pub const fn new(site_id: SiteId, cilt_id: CiltId, sequence_id: SequenceId) -> Self {
        Self {
            site_id,
            cilt_id,
            sequence_id,
        }
    }
}

/// Persisted schedule record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRecord {
    /// Assigned by the store; absent before creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ScheduleId>,
    #[serde(flatten)]
    pub scope: ScheduleScope,
    pub frequency_code: String,
    pub interval_value: i64,
    /// Start date, or start date and time of day.
    #[serde(rename = "scheduleTimeISO", default)]
    pub schedule_time_iso: Option<String>,
    #[serde(rename = "endDateISO", default)]
    pub end_date_iso: Option<String>,
    #[serde(default)]
    pub mon: u8,
    #[serde(default)]
    pub tue: u8,
    #[serde(default)]
    pub wed: u8,
    #[serde(default)]
    pub thu: u8,
    #[serde(default)]
    pub fri: u8,
    #[serde(default)]
    pub sat: u8,
    #[serde(default)]
    pub sun: u8,
    #[serde(default)]
    pub day_of_month: Option<i64>,
    #[serde(default)]
    pub month_of_year: Option<i64>,
    /// Nth-weekday position: 1..=4, or -1 for the last one.
    #[serde(default)]
    pub week_of_month: Option<i64>,
    /// ISO weekday number (1 = Monday) of an nth-weekday selector.
    #[serde(default)]
    pub day_of_week: Option<i64>,
    #[serde(default)]
    pub status: Option<String>,
}

impl WireRecord {
    /// Returns the record stamped with a store identity.
    #[must_use]
    pub fn with_id(mut self, id: ScheduleId) -> Self {
        self.id = Some(id);
        self
    }

    fn flags(&self) -> [(Weekday, u8); 7] {
        [
            (Weekday::Monday, self.mon),
            (Weekday::Tuesday, self.tue),
            (Weekday::Wednesday, self.wed),
            (Weekday::Thursday, self.thu),
            (Weekday::Friday, self.fri),
            (Weekday::Saturday, self.sat),
            (Weekday::Sunday, self.sun),
        ]
    }

    fn set_flags(&mut self, days: WeekdaySet) {
        let flag = |day| u8::from(days.contains(day));
        self.mon = flag(Weekday::Monday);
        self.tue = flag(Weekday::Tuesday);
        self.wed = flag(Weekday::Wednesday);
        self.thu = flag(Weekday::Thursday);
        self.fri = flag(Weekday::Friday);
        self.sat = flag(Weekday::Saturday);
        self.sun = flag(Weekday::Sunday);
    }
}

/// ## Summary
/// Encodes a rule into the store's record shape, owned by `scope`.
///
/// Total for every rule: all fields the frequency unit uses are populated and
/// all others are left empty. The record carries no `id`.
#[must_use]
pub fn encode(rule: &RecurrenceRule, scope: &ScheduleScope) -> WireRecord {
    let mut record = WireRecord {
        id: None,
        scope: *scope,
        frequency_code: rule.unit().as_code().to_string(),
        interval_value: i64::from(rule.interval()),
        schedule_time_iso: Some(format_schedule_time(rule.start_date(), rule.start_time())),
        end_date_iso: rule.end_date().map(format_date),
        mon: 0,
        tue: 0,
        wed: 0,
        thu: 0,
        fri: 0,
        sat: 0,
        sun: 0,
        day_of_month: None,
        month_of_year: None,
        week_of_month: None,
        day_of_week: None,
        status: rule.status().map(str::to_string),
    };

    match rule.recurrence() {
        Recurrence::Daily => {}
        Recurrence::Weekly(days) => record.set_flags(days),
        Recurrence::Monthly(MonthlySelector::DayOfMonth { day }) => {
            record.day_of_month = Some(i64::from(day));
        }
        Recurrence::Monthly(MonthlySelector::NthWeekday { ordinal, weekday }) => {
            record.week_of_month = Some(i64::from(ordinal.as_number()));
            record.day_of_week = Some(i64::from(weekday.iso_number()));
        }
        Recurrence::Yearly(YearlySelector::MonthAndDay { month, day }) => {
            record.month_of_year = Some(i64::from(month));
            record.day_of_month = Some(i64::from(day));
        }
        Recurrence::Yearly(YearlySelector::NthWeekdayOfMonth {
            ordinal,
            weekday,
            month,
        }) => {
            record.month_of_year = Some(i64::from(month));
            record.week_of_month = Some(i64::from(ordinal.as_number()));
            record.day_of_week = Some(i64::from(weekday.iso_number()));
        }
    }

    record
}

/// ## Summary
/// Decodes a store record back into a rule; the inverse of [`encode`].
///
/// ## Errors
/// - `UnknownScheduleType` if `frequencyCode` is not in the code table
/// - `MalformedDate` if a date string does not parse
/// - `InconsistentFlags` if weekday flags or selector fields are present that
///   the schedule type does not use, or a flag is neither 0 nor 1
/// - `MissingField` if `scheduleTimeISO` or half of a selector is absent
/// - `InvalidRule` if the decoded fields fail rule validation
pub fn decode(record: &WireRecord) -> DecodeResult<RecurrenceRule> {
    decode_record(record).inspect_err(|error| {
        tracing::trace!(
            schedule_id = ?record.id,
            frequency_code = %record.frequency_code,
            error = %error,
            "Rejected wire record"
        );
    })
}

fn decode_record(record: &WireRecord) -> DecodeResult<RecurrenceRule> {
    let unit = FrequencyUnit::from_code(&record.frequency_code)
        .ok_or_else(|| DecodeError::unknown_schedule_type(&record.frequency_code))?;

    let schedule_time = record
        .schedule_time_iso
        .as_deref()
        .ok_or_else(|| DecodeError::missing_field("scheduleTimeISO"))?;
    let (start_date, start_time) = parse_schedule_time(schedule_time)?;
    let end_date = record.end_date_iso.as_deref().map(parse_end_date).transpose()?;

    let interval = u32::try_from(record.interval_value).ok().ok_or_else(|| {
        ValidationError::new(
            ValidationErrorKind::IntervalOutOfRange,
            format!("interval must be at least 1, got {}", record.interval_value),
        )
    })?;

    let days = weekday_flags(record)?;
    if unit != FrequencyUnit::Weekly && !days.is_empty() {
        return Err(DecodeError::inconsistent(format!(
            "weekday flags set on a {unit} schedule"
        )));
    }

    let mut draft = RuleDraft {
        frequency: Some(unit),
        interval: Some(interval),
        start_date: Some(start_date),
        start_time,
        end_date,
        status: record.status.clone(),
        ..RuleDraft::default()
    };

    match unit {
        FrequencyUnit::Daily => {
            reject_present(unit, "dayOfMonth", record.day_of_month)?;
            reject_present(unit, "monthOfYear", record.month_of_year)?;
            reject_present(unit, "weekOfMonth", record.week_of_month)?;
            reject_present(unit, "dayOfWeek", record.day_of_week)?;
        }
        FrequencyUnit::Weekly => {
            reject_present(unit, "dayOfMonth", record.day_of_month)?;
            reject_present(unit, "monthOfYear", record.month_of_year)?;
            reject_present(unit, "weekOfMonth", record.week_of_month)?;
            reject_present(unit, "dayOfWeek", record.day_of_week)?;
            draft.weekly_days = Some(days);
        }
        FrequencyUnit::Monthly => {
            reject_present(unit, "monthOfYear", record.month_of_year)?;
            draft.monthly = match day_selector(record)? {
                None => None,
                Some(DaySelector::Day(day)) => Some(MonthlySelector::DayOfMonth { day }),
                Some(DaySelector::Nth(ordinal, weekday)) => {
                    Some(MonthlySelector::NthWeekday { ordinal, weekday })
                }
            };
        }
        FrequencyUnit::Yearly => {
            draft.yearly = match (record.month_of_year, day_selector(record)?) {
                (None, None) => None,
                (Some(_), None) => return Err(DecodeError::missing_field("dayOfMonth")),
                (None, Some(_)) => return Err(DecodeError::missing_field("monthOfYear")),
                (Some(month), Some(DaySelector::Day(day))) => Some(YearlySelector::MonthAndDay {
                    month: month_field(month)?,
                    day,
                }),
                (Some(month), Some(DaySelector::Nth(ordinal, weekday))) => {
                    Some(YearlySelector::NthWeekdayOfMonth {
                        ordinal,
                        weekday,
                        month: month_field(month)?,
                    })
                }
            };
        }
    }

    draft.validate().map_err(DecodeError::from)
}

enum DaySelector {
    Day(u8),
    Nth(Ordinal, Weekday),
}

fn day_selector(record: &WireRecord) -> DecodeResult<Option<DaySelector>> {
    match (record.day_of_month, record.week_of_month, record.day_of_week) {
        (None, None, None) => Ok(None),
        (Some(day), None, None) => Ok(Some(DaySelector::Day(day_field(day)?))),
        (Some(_), _, _) => Err(DecodeError::inconsistent(
            "dayOfMonth cannot be combined with weekOfMonth/dayOfWeek",
        )),
        (None, Some(week), Some(weekday)) => {
            let ordinal = Ordinal::from_number(week).ok_or_else(|| {
                DecodeError::inconsistent(format!(
                    "weekOfMonth must be 1..=4 or -1, got {week}"
                ))
            })?;
            let weekday = Weekday::from_iso_number(weekday).ok_or_else(|| {
                DecodeError::inconsistent(format!("dayOfWeek must be 1..=7, got {weekday}"))
            })?;
            Ok(Some(DaySelector::Nth(ordinal, weekday)))
        }
        (None, Some(_), None) => Err(DecodeError::missing_field("dayOfWeek")),
        (None, None, Some(_)) => Err(DecodeError::missing_field("weekOfMonth")),
    }
}

fn weekday_flags(record: &WireRecord) -> DecodeResult<WeekdaySet> {
    let mut days = WeekdaySet::empty();
    for (day, flag) in record.flags() {
        match flag {
            0 => {}
            1 => days.insert(day),
            other => {
                return Err(DecodeError::inconsistent(format!(
                    "weekday flag for {day} must be 0 or 1, got {other}"
                )));
            }
        }
    }
    Ok(days)
}

fn reject_present(unit: FrequencyUnit, field: &str, value: Option<i64>) -> DecodeResult<()> {
    match value {
        None => Ok(()),
        Some(_) => Err(DecodeError::inconsistent(format!(
            "{field} is not used by a {unit} schedule"
        ))),
    }
}

// Out-of-u8 values become the validation error their in-range siblings would raise.
fn day_field(value: i64) -> DecodeResult<u8> {
    u8::try_from(value).ok().ok_or_else(|| {
        DecodeError::from(ValidationError::new(
            ValidationErrorKind::DayOutOfRange,
            format!("day must be within 1..=31, got {value}"),
        ))
    })
}

fn month_field(value: i64) -> DecodeResult<u8> {
    u8::try_from(value).ok().ok_or_else(|| {
        DecodeError::from(ValidationError::new(
            ValidationErrorKind::MonthOutOfRange,
            format!("month must be within 1..=12, got {value}"),
        ))
    })
}

#[cfg(test)]
mod tests;
