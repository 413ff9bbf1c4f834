//! HTTP client for the remote schedule API.

use std::time::Duration;

use cilt_core::config::RemoteConfig;
use cilt_core::constants::{
    SCHEDULE_BY_CILT_ROUTE_PREFIX, SCHEDULE_BY_SEQUENCE_ROUTE_PREFIX, SCHEDULE_ROUTE_PREFIX,
};
use cilt_core::types::{CiltId, ScheduleId, SequenceId};
use cilt_recurrence::WireRecord;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::{RemoteError, RemoteResult};
use crate::store::ScheduleStore;

/// Schedule store backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpScheduleStore {
    http: reqwest::Client,
    config: RemoteConfig,
}

#[derive(Deserialize)]
struct CreatedRecord {
    id: ScheduleId,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

impl HttpScheduleStore {
    /// ## Summary
    /// Creates a client for the configured base URL.
    ///
    /// ## Errors
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &RemoteConfig) -> RemoteResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    fn collection_url(&self) -> String {
        self.config.endpoint(SCHEDULE_ROUTE_PREFIX)
    }

    fn record_url(&self, id: ScheduleId) -> String {
        self.config
            .endpoint(&format!("{SCHEDULE_ROUTE_PREFIX}/{id}"))
    }

    fn by_sequence_url(&self, id: SequenceId) -> String {
        self.config
            .endpoint(&format!("{SCHEDULE_BY_SEQUENCE_ROUTE_PREFIX}/{id}"))
    }

    fn by_cilt_url(&self, id: CiltId) -> String {
        self.config
            .endpoint(&format!("{SCHEDULE_BY_CILT_ROUTE_PREFIX}/{id}"))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let builder = self.http.request(method, url);
        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Turns non-success responses into errors; `target` names the record a 404 refers to.
    async fn check(response: Response, target: Option<ScheduleId>) -> RemoteResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = body_or_empty(response.text().await);
        Err(api_error(status, &body, target))
    }
}

/// An unreadable error body becomes an empty message.
fn body_or_empty<E: std::fmt::Display>(body: Result<String, E>) -> String {
    body.unwrap_or_else(|error| {
        debug!(%error, "Failed to read error response body");
        String::new()
    })
}

fn api_error(status: StatusCode, body: &str, target: Option<ScheduleId>) -> RemoteError {
    if status == StatusCode::NOT_FOUND
        && let Some(id) = target
    {
        return RemoteError::NotFound(id);
    }
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| body.trim().to_string());
    RemoteError::Api {
        status: status.as_u16(),
        message,
    }
}

impl ScheduleStore for HttpScheduleStore {
    #[instrument(skip(self, record), fields(sequence_id = %record.scope.sequence_id))]
    async fn create(&self, record: WireRecord) -> RemoteResult<ScheduleId> {
        let response = self
            .request(Method::POST, &self.collection_url())
            .json(&record)
            .send()
            .await?;
        let created: CreatedRecord = Self::check(response, None).await?.json().await?;
        debug!(schedule_id = %created.id, "Schedule created");
        Ok(created.id)
    }

    #[instrument(skip(self, record))]
    async fn update(&self, id: ScheduleId, record: WireRecord) -> RemoteResult<()> {
        let response = self
            .request(Method::PUT, &self.record_url(id))
            .json(&record)
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        debug!("Schedule updated");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: ScheduleId) -> RemoteResult<()> {
        let response = self
            .request(Method::DELETE, &self.record_url(id))
            .send()
            .await?;
        Self::check(response, Some(id)).await?;
        debug!("Schedule deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_by_sequence_id(&self, id: SequenceId) -> RemoteResult<Vec<WireRecord>> {
        let response = self
            .request(Method::GET, &self.by_sequence_url(id))
            .send()
            .await?;
        let records: Vec<WireRecord> = Self::check(response, None).await?.json().await?;
        debug!(count = records.len(), "Fetched sequence schedules");
        Ok(records)
    }

    #[instrument(skip(self))]
    async fn list_by_cilt_id(&self, id: CiltId) -> RemoteResult<Vec<WireRecord>> {
        let response = self
            .request(Method::GET, &self.by_cilt_url(id))
            .send()
            .await?;
        let records: Vec<WireRecord> = Self::check(response, None).await?.json().await?;
        debug!(count = records.len(), "Fetched CILT schedules");
        Ok(records)
    }
}
