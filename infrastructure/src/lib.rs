//! Infrastructure layer for octophyx
//!
//! This crate contains adapters that implement the ports defined
//! in the application and domain layers, including configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileGenerationConfig, FileOutputConfig,
    FileOutputFormat, FileStorageConfig, StorageBackend,
};
pub use logging::JsonlGenerationLogger;
pub use providers::{OpenAiImageGenerator, OpenAiTextGenerator};
#[cfg(feature = "sqlite")]
pub use storage::{SqliteContentRepository, SqliteProblemRepository};
pub use storage::{
    InMemoryContentRepository, InMemoryProblemRepository, Storage, StorageError, open_storage,
};
