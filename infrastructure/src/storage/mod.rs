//! Repository adapters
//!
//! - [`InMemoryContentRepository`], [`InMemoryProblemRepository`] — default,
//!   process-local
//! - [`SqliteContentRepository`], [`SqliteProblemRepository`] — persistent,
//!   behind the `sqlite` feature

mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use memory::{InMemoryContentRepository, InMemoryProblemRepository};
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteContentRepository, SqliteProblemRepository};

use crate::config::{FileStorageConfig, StorageBackend};
use octophyx_domain::{ContentRepository, ProblemRepository, RepositoryError};
use std::sync::Arc;
use thiserror::Error;

/// Errors raised while opening the configured storage backend
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage.database_url is required for the {0} backend")]
    MissingDatabaseUrl(&'static str),

    #[error("the {0} backend is not compiled in (enable the `{0}` feature)")]
    BackendUnavailable(&'static str),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// The repositories of one storage backend
#[derive(Clone)]
pub struct Storage {
    pub content: Arc<dyn ContentRepository>,
    pub problems: Arc<dyn ProblemRepository>,
}

/// Open the backend selected by `[storage]`.
pub async fn open_storage(config: &FileStorageConfig) -> Result<Storage, StorageError> {
    match config.backend {
        StorageBackend::Memory => Ok(Storage {
            content: Arc::new(InMemoryContentRepository::new()),
            problems: Arc::new(InMemoryProblemRepository::new()),
        }),
        StorageBackend::Sqlite => open_sqlite(config.database_url.as_deref()).await,
    }
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(url: Option<&str>) -> Result<Storage, StorageError> {
    let url = url.ok_or(StorageError::MissingDatabaseUrl("sqlite"))?;
    let content = SqliteContentRepository::connect(url).await?;
    let problems = content.problems();
    Ok(Storage {
        content: Arc::new(content),
        problems: Arc::new(problems),
    })
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(_url: Option<&str>) -> Result<Storage, StorageError> {
    Err(StorageError::BackendUnavailable("sqlite"))
}
