//! Schedule service with a local cache of decoded schedules.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use cilt_core::config::ScheduleConfig;
use cilt_core::types::{CiltId, ScheduleId, SequenceId};
use cilt_recurrence::{Occurrence, RuleDraft, ScheduleScope, WireRecord, encode};
use cilt_store::{RemoteError, ScheduleStore};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::schedule::{AgendaEntry, Schedule};

/// Validates, persists and expands schedules.
///
/// The cache is refreshed explicitly after every store call; it is never
/// updated by a getter.
pub struct ScheduleService<S> {
    store: S,
    config: ScheduleConfig,
    cache: RwLock<HashMap<ScheduleId, Schedule>>,
    in_flight: Mutex<HashMap<ScheduleId, Arc<Mutex<()>>>>,
}

impl<S: ScheduleStore> ScheduleService<S> {
    #[must_use]
    pub fn new(store: S, config: ScheduleConfig) -> Self {
        Self {
            store,
            config,
            cache: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Lock serializing store requests for one schedule identity.
    async fn identity_lock(&self, id: ScheduleId) -> Arc<Mutex<()>> {
        Arc::clone(self.in_flight.lock().await.entry(id).or_default())
    }

    /// Drops the identity's map entry once no other mutation holds or waits on
    /// `lock`; `forget` drops it regardless.
    async fn release_identity(&self, id: ScheduleId, lock: &Arc<Mutex<()>>, forget: bool) {
        let mut in_flight = self.in_flight.lock().await;
        let ours = in_flight
            .get(&id)
            .is_some_and(|current| Arc::ptr_eq(current, lock));
        // One reference in the map, one in `lock`.
        if ours && (forget || Arc::strong_count(lock) == 2) {
            in_flight.remove(&id);
        }
    }

    /// Number of schedule identities with a mutation in progress.
    pub async fn identities_in_flight(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    /// ## Summary
    /// Validates `draft` and persists it as a new schedule owned by `scope`.
    ///
    /// ## Errors
    /// Returns a validation error for an invalid draft (nothing is sent to the
    /// store), or the store's error.
    ///
    /// ## Side Effects
    /// Inserts the new schedule into the cache.
    #[instrument(skip(self, draft), fields(sequence_id = %scope.sequence_id))]
    pub async fn create(&self, scope: ScheduleScope, draft: &RuleDraft) -> ServiceResult<Schedule> {
        let rule = draft.validate()?;
        let id = self.store.create(encode(&rule, &scope)).await?;
        let schedule = Schedule { id, scope, rule };
        self.cache.write().await.insert(id, schedule.clone());
        info!(schedule_id = %id, "Schedule created");
        Ok(schedule)
    }

    /// ## Summary
    /// Replaces the rule of a loaded schedule, keeping its owners.
    ///
    /// ## Errors
    /// Returns [`ServiceError::UnknownSchedule`] if the schedule has not been
    /// loaded through a listing or created here, a validation error for an
    /// invalid draft, or the store's error.
    ///
    /// ## Side Effects
    /// Replaces the cache entry on success.
    #[instrument(skip(self, draft))]
    pub async fn update(&self, id: ScheduleId, draft: &RuleDraft) -> ServiceResult<Schedule> {
        let lock = self.identity_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.update_locked(id, draft).await
        };
        self.release_identity(id, &lock, false).await;
        result
    }

    async fn update_locked(&self, id: ScheduleId, draft: &RuleDraft) -> ServiceResult<Schedule> {
        let scope = self
            .cache
            .read()
            .await
            .get(&id)
            .map(|schedule| schedule.scope)
            .ok_or(ServiceError::UnknownSchedule(id))?;
        let rule = draft.validate()?;
        let schedule = Schedule { id, scope, rule };
        self.store.update(id, schedule.to_record()).await?;
        self.cache.write().await.insert(id, schedule.clone());
        info!("Schedule updated");
        Ok(schedule)
    }

    /// ## Summary
    /// Deletes a schedule from the store.
    ///
    /// ## Errors
    /// Returns the store's error; a schedule the store no longer knows is
    /// reported as not found.
    ///
    /// ## Side Effects
    /// Evicts the cache entry, also when the store reports it missing.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ScheduleId) -> ServiceResult<()> {
        let lock = self.identity_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.store.delete(id).await
        };
        if matches!(result, Ok(()) | Err(RemoteError::NotFound(_))) {
            self.cache.write().await.remove(&id);
        }
        self.release_identity(id, &lock, result.is_ok()).await;
        result?;
        info!("Schedule deleted");
        Ok(())
    }

    /// ## Summary
    /// Fetches and decodes every schedule of one sequence.
    ///
    /// ## Errors
    /// Returns the store's error, or [`ServiceError::InvalidRecord`] naming the
    /// first record that does not decode.
    ///
    /// ## Side Effects
    /// Replaces the cached schedules of the sequence, except those with an
    /// update or delete in progress: the listing may predate that mutation.
    #[instrument(skip(self))]
    pub async fn list_for_sequence(&self, sequence_id: SequenceId) -> ServiceResult<Vec<Schedule>> {
        let records = self.store.list_by_sequence_id(sequence_id).await?;
        let schedules = decode_all(&records)?;
        self.refresh_cache(&schedules, |schedule| {
            schedule.scope.sequence_id == sequence_id
        })
        .await;
        debug!(count = schedules.len(), "Sequence schedules loaded");
        Ok(schedules)
    }

    /// ## Summary
    /// Fetches and decodes every schedule of one CILT.
    ///
    /// ## Errors
    /// Same as [`Self::list_for_sequence`].
    ///
    /// ## Side Effects
    /// Replaces the cached schedules of the CILT, with the same exception as
    /// [`Self::list_for_sequence`].
    #[instrument(skip(self))]
    pub async fn list_for_cilt(&self, cilt_id: CiltId) -> ServiceResult<Vec<Schedule>> {
        let records = self.store.list_by_cilt_id(cilt_id).await?;
        let schedules = decode_all(&records)?;
        self.refresh_cache(&schedules, |schedule| schedule.scope.cilt_id == cilt_id)
            .await;
        debug!(count = schedules.len(), "CILT schedules loaded");
        Ok(schedules)
    }

    /// Replaces the cached schedules selected by `listed` with `schedules`,
    /// leaving identities with a mutation in progress untouched.
    async fn refresh_cache(&self, schedules: &[Schedule], listed: impl Fn(&Schedule) -> bool) {
        let busy = self.in_flight.lock().await;
        let mut cache = self.cache.write().await;
        cache.retain(|id, schedule| !listed(schedule) || busy.contains_key(id));
        for schedule in schedules {
            if busy.contains_key(&schedule.id) {
                debug!(schedule_id = %schedule.id, "Mutation in progress, keeping cached schedule");
                continue;
            }
            cache.insert(schedule.id, schedule.clone());
        }
    }

    /// Cached schedule, without contacting the store.
    pub async fn cached(&self, id: ScheduleId) -> Option<Schedule> {
        self.cache.read().await.get(&id).cloned()
    }

    /// ## Summary
    /// Merges the occurrences of every schedule of a sequence within
    /// `[from, to]` into one ascending list.
    ///
    /// At most `limit` entries are returned, and never more than the
    /// configured maximum. Ties on the same date and time are ordered by
    /// schedule id.
    ///
    /// ## Errors
    /// Same as [`Self::list_for_sequence`].
    #[instrument(skip(self))]
    pub async fn agenda(
        &self,
        sequence_id: SequenceId,
        from: NaiveDate,
        to: NaiveDate,
        limit: usize,
    ) -> ServiceResult<Vec<AgendaEntry>> {
        let limit = limit.min(self.config.max_occurrences);
        let schedules = self.list_for_sequence(sequence_id).await?;
        Ok(merge_agenda(&schedules, from, to, limit))
    }

    /// ## Summary
    /// Earliest occurrence on or after `after` across the schedules of a sequence.
    ///
    /// ## Errors
    /// Same as [`Self::list_for_sequence`].
    #[instrument(skip(self))]
    pub async fn next_execution(
        &self,
        sequence_id: SequenceId,
        after: NaiveDate,
    ) -> ServiceResult<Option<AgendaEntry>> {
        let schedules = self.list_for_sequence(sequence_id).await?;
        let next = schedules
            .iter()
            .filter_map(|schedule| {
                schedule
                    .rule
                    .next_occurrence(after)
                    .map(|occurrence| AgendaEntry {
                        occurrence,
                        schedule_id: schedule.id,
                    })
            })
            .min();
        if next.is_none() {
            warn!("Sequence has no upcoming executions");
        }
        Ok(next)
    }
}

fn decode_all(records: &[WireRecord]) -> ServiceResult<Vec<Schedule>> {
    records.iter().map(Schedule::from_record).collect()
}

/// Each schedule contributes at most `limit` entries, so the first `limit`
/// entries of the merged list are exact.
fn merge_agenda(
    schedules: &[Schedule],
    from: NaiveDate,
    to: NaiveDate,
    limit: usize,
) -> Vec<AgendaEntry> {
    let mut entries: Vec<AgendaEntry> = schedules
        .iter()
        .flat_map(|schedule| {
            schedule
                .rule
                .occurrences(from, to, limit)
                .map(move |occurrence: Occurrence| AgendaEntry {
                    occurrence,
                    schedule_id: schedule.id,
                })
        })
        .collect();
    entries.sort_unstable();
    entries.truncate(limit);
    entries
}
