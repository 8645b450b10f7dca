//! Generation parameters: deadlines and polling control.
//!
//! [`GenerationParams`] groups the static parameters used by
//! [`GenerateContentUseCase`](crate::use_cases::generate_content::GenerateContentUseCase),
//! [`PollContentUseCase`](crate::use_cases::poll_content::PollContentUseCase) and
//! [`ContentQueryUseCase`](crate::use_cases::get_content::ContentQueryUseCase).
//! These are application-layer concerns, not domain policy.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Deadline for each text generation call (explanation, animation code).
    pub text_timeout: Duration,
    /// Deadline for the diagram generation call.
    pub image_timeout: Duration,
    /// Delay between two polls of a non-terminal record.
    pub poll_interval: Duration,
    /// Give up polling after this long. `None` polls until terminal.
    pub poll_deadline: Option<Duration>,
    /// Maximum number of records returned by a history query.
    pub history_limit: usize,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            text_timeout: Duration::from_secs(120),
            image_timeout: Duration::from_secs(120),
            poll_interval: Duration::from_millis(2000),
            poll_deadline: None,
            history_limit: 50,
        }
    }
}

impl GenerationParams {
    // ==================== Builder Methods ====================

    pub fn with_text_timeout(mut self, timeout: Duration) -> Self {
        self.text_timeout = timeout;
        self
    }

    pub fn with_image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_poll_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.poll_deadline = deadline;
        self
    }

    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }
}
