//! Problem read and follow-up use cases.
//!
//! - [`ProblemQueryUseCase`] — one problem, an owner's history, bookmarking
//! - [`ProblemHintsUseCase`] — hints that guide towards a solution without
//!   giving it away
//!
//! An unknown id is an absent result, not an error.

use crate::config::GenerationParams;
use crate::ports::llm_gateway::{GatewayError, TextGenerator, TextPrompt};
use crate::use_cases::generation_run::with_deadline;
use chrono::Utc;
use octophyx_domain::{
    GenerationPromptTemplate, OwnerId, ProblemId, ProblemRepository, ProblemSolution,
    RepositoryError, parse_hints,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while reading or updating problems.
#[derive(Error, Debug)]
pub enum QueryProblemError {
    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("Hint generation failed: {0}")]
    Hints(#[source] GatewayError),
}

/// Use case for reading problems and toggling their bookmark.
#[derive(Clone)]
pub struct ProblemQueryUseCase {
    repository: Arc<dyn ProblemRepository>,
    history_limit: usize,
}

impl ProblemQueryUseCase {
    pub fn new(repository: Arc<dyn ProblemRepository>) -> Self {
        Self {
            repository,
            history_limit: GenerationParams::default().history_limit,
        }
    }

    pub fn with_params(mut self, params: &GenerationParams) -> Self {
        self.history_limit = params.history_limit;
        self
    }

    pub async fn get(&self, id: ProblemId) -> Result<Option<ProblemSolution>, QueryProblemError> {
        let problem = self.repository.get(id).await?;
        if problem.is_none() {
            debug!(problem_id = %id, "Problem not found");
        }
        Ok(problem)
    }

    /// The owner's problems, newest first.
    pub async fn history(&self, owner: OwnerId) -> Result<Vec<ProblemSolution>, QueryProblemError> {
        Ok(self
            .repository
            .list_by_owner(owner, self.history_limit)
            .await?)
    }

    /// Flip the bookmark and persist it. Returns the updated problem.
    pub async fn toggle_bookmark(
        &self,
        id: ProblemId,
    ) -> Result<Option<ProblemSolution>, QueryProblemError> {
        let Some(mut problem) = self.repository.get(id).await? else {
            return Ok(None);
        };
        let bookmarked = problem.toggle_bookmark(Utc::now());
        self.repository.update(&problem).await?;
        info!(problem_id = %id, bookmarked, "Bookmark toggled");
        Ok(Some(problem))
    }
}

/// Use case for asking hints on a stored problem.
#[derive(Clone)]
pub struct ProblemHintsUseCase {
    repository: Arc<dyn ProblemRepository>,
    text: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl ProblemHintsUseCase {
    pub fn new(repository: Arc<dyn ProblemRepository>, text: Arc<dyn TextGenerator>) -> Self {
        Self {
            repository,
            text,
            timeout: GenerationParams::default().text_timeout,
        }
    }

    pub fn with_params(mut self, params: &GenerationParams) -> Self {
        self.timeout = params.text_timeout;
        self
    }

    /// Up to four hints; a fixed set when the generator returns nothing usable.
    pub async fn hints(&self, id: ProblemId) -> Result<Option<Vec<String>>, QueryProblemError> {
        let Some(problem) = self.repository.get(id).await? else {
            return Ok(None);
        };

        let prompt = TextPrompt::new(
            GenerationPromptTemplate::hints_system(),
            GenerationPromptTemplate::hints_prompt(problem.problem_text.as_str()),
        );
        let reply = with_deadline(self.timeout, self.text.generate_text(&prompt))
            .await
            .map_err(QueryProblemError::Hints)?;
        Ok(Some(parse_hints(&reply)))
    }
}
