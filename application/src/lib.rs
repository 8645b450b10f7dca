//! Application layer for octophyx
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::GenerationParams;
pub use ports::{
    generation_logger::{GenerationEvent, GenerationLogger, NoGenerationLogger},
    llm_gateway::{GatewayError, GeneratedImage, ImageGenerator, TextGenerator, TextPrompt},
    progress::{NoPollObserver, PollObserver},
};
pub use use_cases::generate_content::{
    GenerateContentError, GenerateContentInput, GenerateContentUseCase, GenerationStep,
    SubmittedContent,
};
pub use use_cases::generation_run::{GenerationHandle, GenerationTracker};
pub use use_cases::get_content::{ContentQueryUseCase, QueryContentError};
pub use use_cases::poll_content::{PollContentUseCase, PollError};
pub use use_cases::problem_query::{ProblemHintsUseCase, ProblemQueryUseCase, QueryProblemError};
pub use use_cases::solve_problem::{SolveProblemInput, SolveProblemUseCase, SubmittedProblem};
