use cilt_core::types::ScheduleId;
use thiserror::Error;

/// Remote schedule store errors
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Schedule not found: {0}")]
    NotFound(ScheduleId),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type RemoteResult<T> = std::result::Result<T, RemoteError>;
