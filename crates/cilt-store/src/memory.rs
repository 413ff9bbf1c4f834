//! In-memory schedule store for tests and offline runs.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

use cilt_core::types::{CiltId, ScheduleId, SequenceId};
use cilt_recurrence::WireRecord;
use tokio::sync::RwLock;

use crate::error::{RemoteError, RemoteResult};
use crate::store::ScheduleStore;

/// Schedule store backed by a map, assigning sequential identities from 1.
#[derive(Debug)]
pub struct MemoryScheduleStore {
    records: RwLock<BTreeMap<ScheduleId, WireRecord>>,
    next_id: AtomicI64,
}

impl Default for MemoryScheduleStore {
    fn default() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

impl MemoryScheduleStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Returns the stored record, if any.
    pub async fn get(&self, id: ScheduleId) -> Option<WireRecord> {
        self.records.read().await.get(&id).cloned()
    }

    fn allocate_id(&self) -> ScheduleId {
        ScheduleId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }
}

impl ScheduleStore for MemoryScheduleStore {
    async fn create(&self, record: WireRecord) -> RemoteResult<ScheduleId> {
        let id = self.allocate_id();
        self.records.write().await.insert(id, record.with_id(id));
        tracing::debug!(schedule_id = %id, "Stored schedule record");
        Ok(id)
    }

    async fn update(&self, id: ScheduleId, record: WireRecord) -> RemoteResult<()> {
        let mut records = self.records.write().await;
        let slot = records.get_mut(&id).ok_or(RemoteError::NotFound(id))?;
        *slot = record.with_id(id);
        Ok(())
    }

    async fn delete(&self, id: ScheduleId) -> RemoteResult<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(RemoteError::NotFound(id))
    }

    async fn list_by_sequence_id(&self, id: SequenceId) -> RemoteResult<Vec<WireRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.scope.sequence_id == id)
            .cloned()
            .collect())
    }

    async fn list_by_cilt_id(&self, id: CiltId) -> RemoteResult<Vec<WireRecord>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .filter(|record| record.scope.cilt_id == id)
            .cloned()
            .collect())
    }
}
