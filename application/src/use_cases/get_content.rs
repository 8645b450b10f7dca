//! Content query use case.
//!
//! Read path for content requests: a single record by id, or an owner's
//! history. An unknown id is an absent result, not an error.

use crate::config::GenerationParams;
use octophyx_domain::{ContentId, ContentRepository, ContentRequest, OwnerId, RepositoryError};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while querying content.
#[derive(Error, Debug)]
pub enum QueryContentError {
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),
}

/// Use case for reading content requests.
#[derive(Clone)]
pub struct ContentQueryUseCase {
    repository: Arc<dyn ContentRepository>,
    history_limit: usize,
}

impl ContentQueryUseCase {
    pub fn new(repository: Arc<dyn ContentRepository>) -> Self {
        Self {
            repository,
            history_limit: GenerationParams::default().history_limit,
        }
    }

    pub fn with_params(mut self, params: &GenerationParams) -> Self {
        self.history_limit = params.history_limit;
        self
    }

    pub async fn get(&self, id: ContentId) -> Result<Option<ContentRequest>, QueryContentError> {
        let record = self.repository.get(id).await?;
        if record.is_none() {
            debug!(content_id = %id, "Content request not found");
        }
        Ok(record)
    }

    /// The owner's requests, newest first.
    pub async fn history(&self, owner: OwnerId) -> Result<Vec<ContentRequest>, QueryContentError> {
        Ok(self
            .repository
            .list_by_owner(owner, self.history_limit)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::use_cases::test_support::InMemoryRepository;
    use octophyx_domain::{NewContentRequest, Topic};

    async fn seed(repository: &InMemoryRepository, topic: &str, owner: i64) -> ContentRequest {
        repository
            .insert(NewContentRequest::new(
                Topic::try_new(topic).unwrap(),
                Some(OwnerId::new(owner)),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_existing_and_missing() {
        let repository = Arc::new(InMemoryRepository::new());
        let created = seed(&repository, "Circular Motion", 1).await;
        let use_case = ContentQueryUseCase::new(repository);

        let found = use_case.get(created.id).await.unwrap();
        assert_eq!(found, Some(created));
        assert!(use_case.get(ContentId::new(999)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let repository = Arc::new(InMemoryRepository::new());
        let first = seed(&repository, "Wave Interference", 1).await;
        let second = seed(&repository, "Standing Waves", 1).await;
        let third = seed(&repository, "Doppler Effect", 1).await;
        seed(&repository, "Heat Transfer", 2).await;

        let use_case = ContentQueryUseCase::new(repository.clone());
        let ids: Vec<_> = use_case
            .history(OwnerId::new(1))
            .await
            .unwrap()
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);

        let limited = ContentQueryUseCase::new(repository)
            .with_params(&GenerationParams::default().with_history_limit(2));
        assert_eq!(limited.history(OwnerId::new(1)).await.unwrap().len(), 2);
    }
}
