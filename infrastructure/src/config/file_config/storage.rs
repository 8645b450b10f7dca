//! Storage configuration from TOML (`[storage]` section)

use serde::{Deserialize, Serialize};

/// Where content requests are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local map; records are lost on exit
    #[default]
    Memory,
    /// SQLite database at `database_url`
    Sqlite,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub backend: StorageBackend,
    /// e.g. "sqlite://octophyx.db?mode=rwc"
    pub database_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_deserialize() {
        let config: FileStorageConfig =
            toml::from_str("backend = \"sqlite\"\ndatabase_url = \"sqlite::memory:\"").unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));
    }
}
