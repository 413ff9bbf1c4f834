//! The remote schedule store interface.

use std::future::Future;

use cilt_core::types::{CiltId, ScheduleId, SequenceId};
use cilt_recurrence::WireRecord;

use crate::error::RemoteResult;

/// Persistence for schedule records.
///
/// The store owns schedule identities. Implementations never retry; callers
/// apply their own policy around [`RemoteError`](crate::RemoteError).
pub trait ScheduleStore: Send + Sync {
    /// Persists a new record and returns the identity assigned to it.
    fn create(&self, record: WireRecord) -> impl Future<Output = RemoteResult<ScheduleId>> + Send;

    /// Replaces the record stored under `id`.
    fn update(
        &self,
        id: ScheduleId,
        record: WireRecord,
    ) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Removes the record stored under `id`.
    fn delete(&self, id: ScheduleId) -> impl Future<Output = RemoteResult<()>> + Send;

    /// Records of one sequence, in store order.
    fn list_by_sequence_id(
        &self,
        id: SequenceId,
    ) -> impl Future<Output = RemoteResult<Vec<WireRecord>>> + Send;

    /// Records of every sequence of one CILT.
    fn list_by_cilt_id(
        &self,
        id: CiltId,
    ) -> impl Future<Output = RemoteResult<Vec<WireRecord>>> + Send;
}
