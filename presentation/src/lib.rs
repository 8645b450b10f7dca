//! Presentation layer for octophyx
//!
//! This crate contains CLI definitions, output formatters,
//! progress reporters, and the HTTP API.

pub mod cli;
pub mod output;
pub mod progress;
pub mod server;

// Re-export commonly used types
pub use cli::commands::{Cli, Command, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use output::markdown::TerminalRenderer;
pub use progress::reporter::{ProgressReporter, SimpleProgress};
pub use server::{ApiState, create_router, serve};
