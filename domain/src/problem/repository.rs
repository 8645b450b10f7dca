//! Problem repository trait

use super::entities::{NewProblem, ProblemId, ProblemSolution};
use crate::content::entities::OwnerId;
use crate::content::repository::RepositoryError;
use async_trait::async_trait;

/// Persistence for [`ProblemSolution`] records
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    /// Persist a new `Pending` problem and return it with its assigned id
    async fn insert(&self, problem: NewProblem) -> Result<ProblemSolution, RepositoryError>;

    /// Fetch a problem; an unknown id is `Ok(None)`
    async fn get(&self, id: ProblemId) -> Result<Option<ProblemSolution>, RepositoryError>;

    /// Overwrite an existing problem
    async fn update(&self, problem: &ProblemSolution) -> Result<(), RepositoryError>;

    /// Problems owned by `owner`, newest first, at most `limit`
    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ProblemSolution>, RepositoryError>;
}
