//! Cross-checks occurrence expansion against the `rrule` crate, using the
//! RRULE text each rule exports.

use chrono::NaiveDate;
use cilt_recurrence::{
    MonthlySelector, Ordinal, RecurrenceRule, RuleDraft, Weekday, YearlySelector, occurrences,
};
use rrule::RRuleSet;

const SAMPLE: u16 = 60;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn rrule_dates(rule: &RecurrenceRule) -> Vec<NaiveDate> {
    let text = format!(
        "DTSTART:{}T000000Z\nRRULE:{}",
        rule.start_date().format("%Y%m%d"),
        rule.to_rrule()
    );
    let set: RRuleSet = text
        .parse()
        .unwrap_or_else(|e| panic!("rrule should accept {text:?}: {e}"));
    set.all(SAMPLE)
        .dates
        .into_iter()
        .map(|dt| dt.date_naive())
        .collect()
}

fn engine_dates(rule: &RecurrenceRule) -> Vec<NaiveDate> {
    occurrences(rule, rule.start_date(), NaiveDate::MAX, usize::from(SAMPLE))
        .map(|o| o.date)
        .collect()
}

/// Start dates are chosen to be occurrences themselves, so both sides begin
/// at the same instant regardless of how DTSTART is treated.
fn cases() -> Vec<RuleDraft> {
    vec![
        RuleDraft::daily(date(2025, 1, 1)).with_interval(5),
        RuleDraft::weekly(
            date(2025, 1, 6),
            [Weekday::Monday, Weekday::Wednesday, Weekday::Friday],
        ),
        RuleDraft::weekly(date(2025, 1, 7), [Weekday::Tuesday, Weekday::Saturday]).with_interval(3),
        RuleDraft::monthly(date(2025, 1, 31), MonthlySelector::DayOfMonth { day: 31 }),
        RuleDraft::monthly(date(2025, 1, 30), MonthlySelector::DayOfMonth { day: 30 })
            .with_interval(2),
        RuleDraft::monthly(
            date(2025, 1, 31),
            MonthlySelector::NthWeekday {
                ordinal: Ordinal::Last,
                weekday: Weekday::Friday,
            },
        ),
        RuleDraft::monthly(
            date(2025, 2, 3),
            MonthlySelector::NthWeekday {
                ordinal: Ordinal::First,
                weekday: Weekday::Monday,
            },
        ),
        RuleDraft::yearly(
            date(2024, 2, 29),
            YearlySelector::MonthAndDay { month: 2, day: 29 },
        ),
        RuleDraft::yearly(
            date(2025, 11, 11),
            YearlySelector::NthWeekdayOfMonth {
                ordinal: Ordinal::Second,
                weekday: Weekday::Tuesday,
                month: 11,
            },
        ),
    ]
}

#[test_log::test]
fn expansion_matches_rrule_crate() {
    for draft in cases() {
        let rule = draft.validate().expect("valid draft");
        let ours = engine_dates(&rule);
        let theirs = rrule_dates(&rule);
        assert_eq!(ours.len(), usize::from(SAMPLE), "rule {}", rule.to_rrule());
        assert_eq!(ours, theirs, "rule {}", rule.to_rrule());
    }
}
