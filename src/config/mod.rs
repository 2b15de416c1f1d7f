//! Client configuration.
//!
//! Everything the client needs is carried by an explicit [`FoundryConfig`];
//! [`FoundryConfig::from_env`] is a convenience for scripts and the CLI.

pub mod connection;

pub use connection::ConnectionString;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{CredentialProvider, StaticCredential};
use crate::error::FoundryError;
use crate::util::poll::PollPolicy;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_VERSION: &str = "2024-12-01-preview";

/// Connection, model and polling settings for a session.
#[derive(Clone)]
pub struct FoundryConfig {
    pub connection_string: String,
    pub credential: Arc<dyn CredentialProvider>,
    pub model_id: String,
    /// Name of the Bing/search connection used for web grounding.
    pub search_connection_name: Option<String>,
    pub api_version: String,
    pub poll: PollPolicy,
}

impl fmt::Debug for FoundryConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FoundryConfig")
            .field("connection_string", &self.connection_string)
            .field("credential", &"..")
            .field("model_id", &self.model_id)
            .field("search_connection_name", &self.search_connection_name)
            .field("api_version", &self.api_version)
            .field("poll", &self.poll)
            .finish()
    }
}

impl FoundryConfig {
    /// Create a config with default model, API version and polling budget.
    pub fn new(
        connection_string: impl Into<String>,
        credential: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            connection_string: connection_string.into(),
            credential,
            model_id: DEFAULT_MODEL.to_string(),
            search_connection_name: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            poll: PollPolicy::default(),
        }
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn with_search_connection(mut self, name: impl Into<String>) -> Self {
        self.search_connection_name = Some(name.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_poll(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    /// Load from environment variables (and `.env` if present).
    ///
    /// Required: `PROJECT_CONNECTION_STRING`, `PROJECT_ACCESS_TOKEN`.
    /// Optional: `MODEL_DEPLOYMENT_NAME`, `BING_CONNECTION_NAME`,
    /// `AGENTS_API_VERSION`, `AGENTS_POLL_INTERVAL_MS`, `AGENTS_POLL_MAX_ATTEMPTS`.
    pub fn from_env() -> Result<Self, FoundryError> {
        let _ = dotenvy::dotenv(); // load .env if present, ignore error
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (used by `from_env` and tests).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, FoundryError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| FoundryError::Configuration(format!("Missing {key}")))
        };

        let connection_string = required("PROJECT_CONNECTION_STRING")?;
        let token = required("PROJECT_ACCESS_TOKEN")?;

        let mut config = Self::new(connection_string, Arc::new(StaticCredential::new(token)));

        if let Some(model) = lookup("MODEL_DEPLOYMENT_NAME") {
            config.model_id = model;
        }
        config.search_connection_name = lookup("BING_CONNECTION_NAME");
        if let Some(version) = lookup("AGENTS_API_VERSION") {
            config.api_version = version;
        }
        if let Some(ms) = lookup("AGENTS_POLL_INTERVAL_MS") {
            let ms: u64 = ms.parse().map_err(|_| {
                FoundryError::Configuration(format!("AGENTS_POLL_INTERVAL_MS is not a number: {ms}"))
            })?;
            config.poll.interval = Duration::from_millis(ms);
        }
        if let Some(attempts) = lookup("AGENTS_POLL_MAX_ATTEMPTS") {
            config.poll.max_attempts = attempts.parse().map_err(|_| {
                FoundryError::Configuration(format!(
                    "AGENTS_POLL_MAX_ATTEMPTS is not a number: {attempts}"
                ))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that the config can produce a working client.
    pub fn validate(&self) -> Result<(), FoundryError> {
        self.connection()?;
        if self.model_id.trim().is_empty() {
            return Err(FoundryError::Configuration("model_id is empty".into()));
        }
        self.poll.validate()
    }

    /// Parsed connection string.
    pub fn connection(&self) -> Result<ConnectionString, FoundryError> {
        ConnectionString::parse(&self.connection_string)
    }

    /// Resolve the search connection name, failing if it was not configured.
    pub fn require_search_connection(&self) -> Result<&str, FoundryError> {
        self.search_connection_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| FoundryError::Configuration("Missing BING_CONNECTION_NAME".into()))
    }
}
