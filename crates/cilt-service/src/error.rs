use cilt_core::types::ScheduleId;
use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] cilt_recurrence::ValidationError),

    #[error("Stored schedule {id} is invalid: {source}")]
    InvalidRecord {
        id: ScheduleId,
        #[source]
        source: cilt_recurrence::DecodeError,
    },

    #[error(transparent)]
    Remote(#[from] cilt_store::RemoteError),

    #[error(transparent)]
    Core(#[from] cilt_core::error::CoreError),

    #[error("Schedule {0} is not loaded")]
    UnknownSchedule(ScheduleId),
}

impl ServiceError {
    /// True when the remote store reported the schedule as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Remote(cilt_store::RemoteError::NotFound(_)) | Self::UnknownSchedule(_)
        )
    }
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
