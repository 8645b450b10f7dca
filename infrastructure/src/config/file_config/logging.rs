//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// Daily-rotated diagnostic log file (used by `serve`)
    pub file: Option<PathBuf>,
    /// JSONL transcript of generation events
    pub generation_log: Option<PathBuf>,
}
