//! Encoding and decoding tests for the wire record.

use chrono::{NaiveDate, NaiveTime};
use cilt_core::types::{CiltId, ScheduleId, SequenceId, SiteId};

use super::*;
use crate::error::DecodeErrorKind;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
}

fn scope() -> ScheduleScope {
    ScheduleScope::new(SiteId(1), CiltId(20), SequenceId(300))
}

fn valid(draft: &RuleDraft) -> RecurrenceRule {
    draft.validate().expect("draft should be valid")
}

fn sample_rules() -> Vec<RecurrenceRule> {
    let start = date(2025, 1, 6);
    vec![
        valid(&RuleDraft::daily(start)),
        valid(
            &RuleDraft::daily(start)
                .with_interval(3)
                .with_start_time(NaiveTime::from_hms_opt(6, 0, 0).expect("time"))
                .with_end_date(date(2025, 10, 28))
                .with_status("active"),
        ),
        valid(&RuleDraft::weekly(
            start,
            [Weekday::Monday, Weekday::Wednesday, Weekday::Friday],
        )),
        valid(&RuleDraft::weekly(start, [Weekday::Sunday]).with_interval(2)),
        valid(&RuleDraft::monthly(start, MonthlySelector::DayOfMonth { day: 31 })),
        valid(&RuleDraft::monthly(
            start,
            MonthlySelector::NthWeekday {
                ordinal: Ordinal::Last,
                weekday: Weekday::Friday,
            },
        )),
        valid(&RuleDraft::yearly(
            start,
            YearlySelector::MonthAndDay { month: 2, day: 29 },
        )),
        valid(
            &RuleDraft::yearly(
                start,
                YearlySelector::NthWeekdayOfMonth {
                    ordinal: Ordinal::Second,
                    weekday: Weekday::Tuesday,
                    month: 11,
                },
            )
            .with_status("paused"),
        ),
    ]
}

#[test]
fn decode_inverts_encode() {
    for rule in sample_rules() {
        let record = encode(&rule, &scope());
        assert_eq!(decode(&record).expect("decodes"), rule, "record {record:?}");
    }
}

#[test]
fn decode_inverts_encode_through_json() {
    for rule in sample_rules() {
        let json = serde_json::to_string(&encode(&rule, &scope()).with_id(ScheduleId(9)))
            .expect("serialize");
        let record: WireRecord = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(record.id, Some(ScheduleId(9)));
        assert_eq!(record.scope, scope());
        assert_eq!(decode(&record).expect("decodes"), rule);
    }
}

#[test]
fn weekly_record_shape() {
    let rule = valid(
        &RuleDraft::weekly(date(2025, 1, 6), [Weekday::Monday, Weekday::Friday])
            .with_start_time(NaiveTime::from_hms_opt(8, 30, 0).expect("time")),
    );
    let value = serde_json::to_value(encode(&rule, &scope())).expect("serialize");

    assert_eq!(value["frequencyCode"], "wee");
    assert_eq!(value["intervalValue"], 1);
    assert_eq!(value["scheduleTimeISO"], "2025-01-06T08:30:00");
    assert_eq!(value["siteId"], 1);
    assert_eq!(value["ciltId"], 20);
    assert_eq!(value["sequenceId"], 300);
    assert_eq!(value["mon"], 1);
    assert_eq!(value["tue"], 0);
    assert_eq!(value["fri"], 1);
    assert!(value["dayOfMonth"].is_null());
    assert!(value.get("id").is_none());
}

#[test]
fn monthly_nth_weekday_shape() {
    let rule = valid(&RuleDraft::monthly(
        date(2025, 5, 1),
        MonthlySelector::NthWeekday {
            ordinal: Ordinal::Last,
            weekday: Weekday::Friday,
        },
    ));
    let record = encode(&rule, &scope());
    assert_eq!(record.frequency_code, "mon");
    assert_eq!(record.week_of_month, Some(-1));
    assert_eq!(record.day_of_week, Some(5));
    assert_eq!(record.day_of_month, None);
    assert_eq!(record.month_of_year, None);
}

fn base_record(code: &str) -> WireRecord {
    encode(&valid(&RuleDraft::daily(date(2025, 1, 6))), &scope()).with_code(code)
}

impl WireRecord {
    fn with_code(mut self, code: &str) -> Self {
        self.frequency_code = code.to_string();
        self
    }
}

fn decode_kind(record: &WireRecord) -> DecodeErrorKind {
    decode(record).expect_err("record should be rejected").kind
}

#[test]
fn unknown_schedule_type() {
    assert_eq!(
        decode_kind(&base_record("xyz")),
        DecodeErrorKind::UnknownScheduleType
    );
    assert_eq!(
        decode_kind(&base_record("man")),
        DecodeErrorKind::UnknownScheduleType
    );
}

#[test]
fn malformed_dates() {
    let mut record = base_record("dai");
    record.schedule_time_iso = Some("2025-02-30".to_string());
    assert_eq!(decode_kind(&record), DecodeErrorKind::MalformedDate);

    let mut record = base_record("dai");
    record.end_date_iso = Some("soon".to_string());
    assert_eq!(decode_kind(&record), DecodeErrorKind::MalformedDate);
}

#[test]
fn missing_schedule_time() {
    let mut record = base_record("dai");
    record.schedule_time_iso = None;
    assert_eq!(decode_kind(&record), DecodeErrorKind::MissingField);
}

#[test]
fn weekday_flags_on_non_weekly_types_are_inconsistent() {
    for code in ["dai", "mon", "yea"] {
        let mut record = base_record(code);
        record.day_of_month = (code != "dai").then_some(1);
        record.month_of_year = (code == "yea").then_some(1);
        record.wed = 1;
        assert_eq!(
            decode_kind(&record),
            DecodeErrorKind::InconsistentFlags,
            "code {code}"
        );
    }
}

#[test]
fn flags_outside_zero_one_are_inconsistent() {
    let mut record = base_record("wee");
    record.mon = 2;
    assert_eq!(decode_kind(&record), DecodeErrorKind::InconsistentFlags);
}

#[test]
fn selector_fields_on_foreign_types_are_inconsistent() {
    let mut record = base_record("dai");
    record.day_of_month = Some(3);
    assert_eq!(decode_kind(&record), DecodeErrorKind::InconsistentFlags);

    let mut record = base_record("wee");
    record.tue = 1;
    record.week_of_month = Some(1);
    assert_eq!(decode_kind(&record), DecodeErrorKind::InconsistentFlags);

    let mut record = base_record("mon");
    record.day_of_month = Some(3);
    record.month_of_year = Some(4);
    assert_eq!(decode_kind(&record), DecodeErrorKind::InconsistentFlags);

    let mut record = base_record("mon");
    record.day_of_month = Some(3);
    record.week_of_month = Some(2);
    record.day_of_week = Some(2);
    assert_eq!(decode_kind(&record), DecodeErrorKind::InconsistentFlags);
}

#[test]
fn half_an_nth_selector_is_missing_field() {
    let mut record = base_record("mon");
    record.week_of_month = Some(2);
    assert_eq!(decode_kind(&record), DecodeErrorKind::MissingField);

    let mut record = base_record("yea");
    record.day_of_month = Some(14);
    assert_eq!(decode_kind(&record), DecodeErrorKind::MissingField);
}

#[test]
fn invalid_rules_surface_their_validation_kind() {
    let cases: Vec<(WireRecord, ValidationErrorKind)> = vec![
        (base_record("wee"), ValidationErrorKind::EmptyWeekdaySet),
        (base_record("mon"), ValidationErrorKind::MissingSelector),
        (
            WireRecord {
                interval_value: 0,
                ..base_record("dai")
            },
            ValidationErrorKind::IntervalOutOfRange,
        ),
        (
            WireRecord {
                interval_value: -4,
                ..base_record("dai")
            },
            ValidationErrorKind::IntervalOutOfRange,
        ),
        (
            WireRecord {
                day_of_month: Some(40),
                ..base_record("mon")
            },
            ValidationErrorKind::DayOutOfRange,
        ),
        (
            WireRecord {
                day_of_month: Some(-3),
                ..base_record("mon")
            },
            ValidationErrorKind::DayOutOfRange,
        ),
        (
            WireRecord {
                day_of_month: Some(1),
                month_of_year: Some(13),
                ..base_record("yea")
            },
            ValidationErrorKind::MonthOutOfRange,
        ),
        (
            WireRecord {
                end_date_iso: Some("2024-12-31".to_string()),
                ..base_record("dai")
            },
            ValidationErrorKind::EndBeforeStart,
        ),
    ];

    for (record, expected) in cases {
        let err = decode(&record).expect_err("record should be rejected");
        assert_eq!(err.kind, DecodeErrorKind::InvalidRule, "record {record:?}");
        assert_eq!(
            err.validation().map(|v| v.kind),
            Some(expected),
            "record {record:?}"
        );
    }
}

#[test]
fn decodes_store_json_with_missing_optional_fields() {
    let record: WireRecord = serde_json::from_str(
        r#"{
            "id": 17,
            "siteId": 1,
            "ciltId": 2,
            "sequenceId": 3,
            "frequencyCode": "MON",
            "intervalValue": 2,
            "scheduleTimeISO": "2025-01-31T07:00:00.000Z",
            "dayOfMonth": 31
        }"#,
    )
    .expect("deserialize");

    let rule = decode(&record).expect("decodes");
    assert_eq!(rule.unit(), FrequencyUnit::Monthly);
    assert_eq!(rule.interval(), 2);
    assert_eq!(rule.start_date(), date(2025, 1, 31));
    assert_eq!(rule.start_time(), NaiveTime::from_hms_opt(7, 0, 0));
    assert_eq!(
        rule.recurrence(),
        Recurrence::Monthly(MonthlySelector::DayOfMonth { day: 31 })
    );
}
