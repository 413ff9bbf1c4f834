use chrono::NaiveDate;
use cilt_core::types::{CiltId, ScheduleId, SequenceId, SiteId};
use cilt_recurrence::{RuleDraft, ScheduleScope, Weekday, WeekdaySet, WireRecord, decode, encode};
use cilt_store::{MemoryScheduleStore, RemoteError, ScheduleStore};

fn scope(cilt: i64, sequence: i64) -> ScheduleScope {
    ScheduleScope::new(SiteId(1), CiltId(cilt), SequenceId(sequence))
}

fn weekly_record(cilt: i64, sequence: i64) -> WireRecord {
    let rule = RuleDraft::weekly(
        NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
        WeekdaySet::from([Weekday::Monday, Weekday::Friday]),
    )
    .validate()
    .expect("valid rule");
    encode(&rule, &scope(cilt, sequence))
}

#[test_log::test(tokio::test)]
async fn create_assigns_sequential_ids() {
    let store = MemoryScheduleStore::new();

    let first = store.create(weekly_record(1, 10)).await.expect("create");
    let second = store.create(weekly_record(1, 11)).await.expect("create");

    assert_eq!(first, ScheduleId(1));
    assert_eq!(second, ScheduleId(2));
    assert_eq!(store.len().await, 2);

    let stored = store.get(first).await.expect("stored record");
    assert_eq!(stored.id, Some(first));
    assert_eq!(decode(&stored), decode(&weekly_record(1, 10)));
}

#[test_log::test(tokio::test)]
async fn lists_filter_by_owner() {
    let store = MemoryScheduleStore::new();
    store.create(weekly_record(1, 10)).await.expect("create");
    store.create(weekly_record(1, 11)).await.expect("create");
    store.create(weekly_record(2, 20)).await.expect("create");

    let by_sequence = store
        .list_by_sequence_id(SequenceId(11))
        .await
        .expect("list");
    assert_eq!(by_sequence.len(), 1);
    assert_eq!(by_sequence[0].id, Some(ScheduleId(2)));

    let by_cilt = store.list_by_cilt_id(CiltId(1)).await.expect("list");
    let ids: Vec<_> = by_cilt.iter().filter_map(|r| r.id).collect();
    assert_eq!(ids, vec![ScheduleId(1), ScheduleId(2)]);

    assert!(
        store
            .list_by_sequence_id(SequenceId(99))
            .await
            .expect("list")
            .is_empty()
    );
}

#[test_log::test(tokio::test)]
async fn update_replaces_record_and_keeps_id() {
    let store = MemoryScheduleStore::new();
    let id = store.create(weekly_record(1, 10)).await.expect("create");

    let mut replacement = weekly_record(1, 10);
    replacement.interval_value = 3;
    store.update(id, replacement).await.expect("update");

    let stored = store.get(id).await.expect("stored record");
    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.interval_value, 3);
}

#[test_log::test(tokio::test)]
async fn missing_ids_are_not_found() {
    let store = MemoryScheduleStore::new();

    let err = store
        .update(ScheduleId(7), weekly_record(1, 10))
        .await
        .expect_err("nothing to update");
    assert!(matches!(err, RemoteError::NotFound(ScheduleId(7))));

    let err = store.delete(ScheduleId(7)).await.expect_err("nothing to delete");
    assert!(matches!(err, RemoteError::NotFound(ScheduleId(7))));
}

#[test_log::test(tokio::test)]
async fn delete_removes_record() {
    let store = MemoryScheduleStore::new();
    let id = store.create(weekly_record(1, 10)).await.expect("create");

    store.delete(id).await.expect("delete");

    assert!(store.is_empty().await);
    assert!(store.get(id).await.is_none());
}
