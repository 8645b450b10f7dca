//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod generation;
mod logging;
mod output;
mod providers;
mod server;
mod storage;

pub use generation::FileGenerationConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};
pub use providers::{FileImageProviderConfig, FileProvidersConfig, FileTextProviderConfig};
pub use server::FileServerConfig;
pub use storage::{FileStorageConfig, StorageBackend};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} cannot be 0")]
    ZeroDuration(&'static str),

    #[error("{0} model name cannot be empty")]
    EmptyModelName(&'static str),

    #[error("history_limit cannot be 0")]
    ZeroHistoryLimit,

    #[error("storage.backend = \"sqlite\" requires storage.database_url")]
    MissingDatabaseUrl,

    #[error("invalid server.bind address: {0}")]
    InvalidBindAddress(String),
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Text and image generation endpoints
    pub providers: FileProvidersConfig,
    /// Deadlines and polling
    pub generation: FileGenerationConfig,
    /// Content request persistence
    pub storage: FileStorageConfig,
    /// HTTP API
    pub server: FileServerConfig,
    /// Log files
    pub logging: FileLoggingConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let generation = &self.generation;
        if generation.text_timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroDuration("generation.text_timeout_seconds"));
        }
        if generation.image_timeout_seconds == 0 {
            return Err(ConfigValidationError::ZeroDuration("generation.image_timeout_seconds"));
        }
        if generation.poll_interval_ms == 0 {
            return Err(ConfigValidationError::ZeroDuration("generation.poll_interval_ms"));
        }
        if let Some(0) = generation.poll_deadline_seconds {
            return Err(ConfigValidationError::ZeroDuration("generation.poll_deadline_seconds"));
        }
        if generation.history_limit == 0 {
            return Err(ConfigValidationError::ZeroHistoryLimit);
        }

        if self.providers.text.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("providers.text"));
        }
        if self.providers.image.model.trim().is_empty() {
            return Err(ConfigValidationError::EmptyModelName("providers.image"));
        }

        if self.storage.backend == StorageBackend::Sqlite
            && self
                .storage
                .database_url
                .as_deref()
                .is_none_or(|url| url.trim().is_empty())
        {
            return Err(ConfigValidationError::MissingDatabaseUrl);
        }

        if self.server.bind.parse::<std::net::SocketAddr>().is_err() {
            return Err(ConfigValidationError::InvalidBindAddress(
                self.server.bind.clone(),
            ));
        }

        Ok(())
    }
}
