//! Content request repository trait

use super::entities::{ContentId, ContentRequest, NewContentRequest, OwnerId};
use crate::problem::entities::ProblemId;
use async_trait::async_trait;
use thiserror::Error;

/// Errors raised by repository implementations
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Corrupt record {id}: {reason}")]
    CorruptRecord { id: i64, reason: String },

    #[error("Content request {0} not found")]
    NotFound(ContentId),

    #[error("Problem {0} not found")]
    ProblemNotFound(ProblemId),
}

/// Persistence for [`ContentRequest`] records
///
/// A domain-level abstraction; the in-memory and SQL implementations live in
/// the infrastructure layer and are injected into the use cases.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Persist a new `Pending` record and return it with its assigned id
    async fn insert(&self, request: NewContentRequest) -> Result<ContentRequest, RepositoryError>;

    /// Fetch a record; an unknown id is `Ok(None)`
    async fn get(&self, id: ContentId) -> Result<Option<ContentRequest>, RepositoryError>;

    /// Overwrite an existing record
    async fn update(&self, request: &ContentRequest) -> Result<(), RepositoryError>;

    /// Records owned by `owner`, newest first, at most `limit`
    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ContentRequest>, RepositoryError>;
}
