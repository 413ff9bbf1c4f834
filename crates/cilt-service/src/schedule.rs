//! Decoded schedules and agenda entries.

use std::fmt;

use cilt_core::error::CoreError;
use cilt_core::types::ScheduleId;
use cilt_recurrence::{Occurrence, RecurrenceRule, ScheduleScope, WireRecord, decode, encode};

use crate::error::{ServiceError, ServiceResult};

/// A persisted schedule: identity, owners and the rule itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub id: ScheduleId,
    pub scope: ScheduleScope,
    pub rule: RecurrenceRule,
}

impl Schedule {
    /// ## Summary
    /// Decodes a record returned by the store.
    ///
    /// ## Errors
    /// Fails if the record carries no identity or does not describe a valid rule.
    pub fn from_record(record: &WireRecord) -> ServiceResult<Self> {
        let id = record.id.ok_or(CoreError::InvariantViolation(
            "store returned a schedule record without an id",
        ))?;
        let rule = decode(record).map_err(|source| ServiceError::InvalidRecord { id, source })?;
        Ok(Self {
            id,
            scope: record.scope,
            rule,
        })
    }

    /// Encodes the schedule back into a store record.
    #[must_use]
    pub fn to_record(&self) -> WireRecord {
        encode(&self.rule, &self.scope).with_id(self.id)
    }
}

/// One line of a merged agenda.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AgendaEntry {
    pub occurrence: Occurrence,
    pub schedule_id: ScheduleId,
}

impl fmt::Display for AgendaEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (schedule {})", self.occurrence, self.schedule_id)
    }
}
