//! Configuration file loading for octophyx
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `OCTOPHYX_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./octophyx.toml` or `./.octophyx.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/octophyx/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileGenerationConfig, FileImageProviderConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat, FileProvidersConfig, FileServerConfig,
    FileStorageConfig, FileTextProviderConfig, StorageBackend,
};
pub use loader::ConfigLoader;
