//! Generation configuration from TOML (`[generation]` section)

use octophyx_application::GenerationParams;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGenerationConfig {
    /// Deadline for each text generation call
    pub text_timeout_seconds: u64,
    /// Deadline for the diagram call
    pub image_timeout_seconds: u64,
    /// Delay between polls
    pub poll_interval_ms: u64,
    /// Stop polling after this many seconds (unset = until terminal)
    pub poll_deadline_seconds: Option<u64>,
    /// Max records in a history listing
    pub history_limit: usize,
}

impl Default for FileGenerationConfig {
    fn default() -> Self {
        Self {
            text_timeout_seconds: 120,
            image_timeout_seconds: 120,
            poll_interval_ms: 2000,
            poll_deadline_seconds: None,
            history_limit: 50,
        }
    }
}

impl FileGenerationConfig {
    /// Convert to application-layer parameters
    pub fn to_params(&self) -> GenerationParams {
        GenerationParams::default()
            .with_text_timeout(Duration::from_secs(self.text_timeout_seconds))
            .with_image_timeout(Duration::from_secs(self.image_timeout_seconds))
            .with_poll_interval(Duration::from_millis(self.poll_interval_ms))
            .with_poll_deadline(self.poll_deadline_seconds.map(Duration::from_secs))
            .with_history_limit(self.history_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_application_defaults() {
        assert_eq!(FileGenerationConfig::default().to_params(), GenerationParams::default());
    }

    #[test]
    fn test_to_params() {
        let config = FileGenerationConfig {
            text_timeout_seconds: 30,
            image_timeout_seconds: 45,
            poll_interval_ms: 500,
            poll_deadline_seconds: Some(600),
            history_limit: 10,
        };
        let params = config.to_params();
        assert_eq!(params.text_timeout, Duration::from_secs(30));
        assert_eq!(params.image_timeout, Duration::from_secs(45));
        assert_eq!(params.poll_interval, Duration::from_millis(500));
        assert_eq!(params.poll_deadline, Some(Duration::from_secs(600)));
        assert_eq!(params.history_limit, 10);
    }
}
