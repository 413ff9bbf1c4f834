use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::Deserialize;

use crate::constants::{DEFAULT_HORIZON_DAYS, DEFAULT_MAX_OCCURRENCES};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub remote: RemoteConfig,
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub agenda: AgendaConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct RemoteConfig {
    pub base_url: String,
    pub api_token: Option<String>,
    pub timeout_secs: u64,
}

impl RemoteConfig {
    /// ## Summary
    /// Joins a route path onto the configured base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Keeps the token out of the "Configuration loaded" log line.
impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub max_occurrences: usize,
    pub horizon_days: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AgendaConfig {
    #[serde(default)]
    pub sequence_ids: Vec<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and an optional `config.toml`.
    /// Environment variables (`CILT__REMOTE__BASE_URL`, ...) take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env
            .add_source(
                config::Environment::with_prefix("CILT")
                    .prefix_separator("__")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("agenda.sequence_ids"),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds settings from an inline TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document does not parse or the result is invalid.
    pub fn from_toml(document: &str) -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.validate()?;
        Ok(settings)
    }

    fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("remote.base_url", "http://localhost:3000/api")?
            .set_default("remote.timeout_secs", 30)?
            .set_default(
                "schedule.max_occurrences",
                i64::try_from(DEFAULT_MAX_OCCURRENCES)?,
            )?
            .set_default("schedule.horizon_days", i64::from(DEFAULT_HORIZON_DAYS))?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Checks values that deserialize fine but cannot be used.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` naming the offending key.
    pub fn validate(&self) -> CoreResult<()> {
        if self.remote.base_url.trim().is_empty() {
            return Err(CoreError::InvalidConfiguration(
                "remote.base_url must not be empty".to_string(),
            ));
        }
        if self.schedule.max_occurrences == 0 {
            return Err(CoreError::InvalidConfiguration(
                "schedule.max_occurrences must be at least 1".to_string(),
            ));
        }
        if self.schedule.horizon_days == 0 {
            return Err(CoreError::InvalidConfiguration(
                "schedule.horizon_days must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
