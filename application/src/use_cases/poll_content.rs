//! Poll Content use case.
//!
//! Re-reads a content request until it reaches a terminal status.
//!
//! - Reads are sequential: the next read starts only after the previous one
//!   resolved and the poll interval elapsed.
//! - A record that does not exist (yet) counts as `Pending`.
//! - Observations are monotonic. A read whose status ranks below one already
//!   observed is stale and ignored, so observers never see a backward move.

use crate::config::GenerationParams;
use crate::ports::progress::PollObserver;
use octophyx_domain::{ContentId, ContentRepository, ContentRequest, ContentStatus, RepositoryError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Errors that can occur while polling.
#[derive(Error, Debug)]
pub enum PollError {
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("Content request {id} still {last_status} when the poll deadline passed")]
    DeadlineExceeded {
        id: ContentId,
        last_status: ContentStatus,
    },

    #[error("Polling cancelled")]
    Cancelled,
}

impl PollError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PollError::Cancelled)
    }
}

/// Use case for waiting on a content request.
#[derive(Clone)]
pub struct PollContentUseCase {
    repository: Arc<dyn ContentRepository>,
    interval: Duration,
    deadline: Option<Duration>,
}

impl PollContentUseCase {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        let params = GenerationParams::default();
        Self {
            repository,
            interval: params.poll_interval,
            deadline: params.poll_deadline,
        }
    }

    pub fn with_params(mut self, params: &GenerationParams) -> Self {
        self.interval = params.poll_interval;
        self.deadline = params.poll_deadline;
        self
    }

    /// Poll until `Completed` or `Failed` and return the terminal record.
    pub async fn poll(
        &self,
        id: ContentId,
        observer: &dyn PollObserver,
        cancel: CancellationToken,
    ) -> Result<ContentRequest, PollError> {
        let deadline = self.deadline.map(|d| Instant::now() + d);
        let mut observed: Option<ContentStatus> = None;

        loop {
            if cancel.is_cancelled() {
                return Err(PollError::Cancelled);
            }

            let record = self.repository.get(id).await?;
            let status = match &record {
                Some(record) => record.status,
                None => {
                    debug!(content_id = %id, "Content request not visible yet, treating as pending");
                    ContentStatus::Pending
                }
            };

            match observed {
                Some(previous) if status.rank() < previous.rank() => {
                    debug!(
                        content_id = %id,
                        previous = %previous,
                        stale = %status,
                        "Ignoring stale status"
                    );
                }
                Some(previous) => {
                    if previous != status {
                        observer.on_transition(previous, status);
                        observed = Some(status);
                    }
                    observer.on_observe(status);
                }
                None => {
                    observed = Some(status);
                    observer.on_observe(status);
                }
            }

            if let Some(record) = record.filter(|r| r.is_terminal()) {
                return Ok(record);
            }

            let wait = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        return Err(PollError::DeadlineExceeded {
                            id,
                            last_status: observed.unwrap_or_default(),
                        });
                    }
                    self.interval.min(deadline - now)
                }
                None => self.interval,
            };

            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(PollError::Cancelled),
                _ = tokio::time::sleep(wait) => {}
            }
        }
    }
}
