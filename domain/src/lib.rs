//! Domain layer for octophyx
//!
//! This crate contains the core business logic, entities, and value objects.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! ## Content requests
//!
//! A [`ContentRequest`] tracks one topic submission through
//! `pending → generating → completed | failed`. Generation itself happens
//! elsewhere; this crate only owns the record and its legal transitions.
//!
//! ## Problems
//!
//! A [`ProblemSolution`] is a submitted physics problem and its worked
//! solution. It follows the same lifecycle as a content request and can be
//! bookmarked at any point.
//!
//! ## Markdown rendering
//!
//! Generated explanations are markdown with LaTeX math. [`markdown::render`]
//! turns them into [`DisplayBlock`]s that any front end can draw.

pub mod catalog;
pub mod config;
pub mod content;
pub mod core;
pub mod markdown;
pub mod problem;
pub mod prompt;

// Re-export commonly used types
pub use catalog::{PhysicsTopic, TopicCatalog, TopicCategory};
pub use config::OutputFormat;
pub use content::{
    entities::{
        ContentId, ContentRequest, ContentStatus, GeneratedContent, NewContentRequest, OwnerId,
    },
    repository::{ContentRepository, RepositoryError},
};
pub use core::{error::DomainError, topic::Topic};
pub use markdown::{
    DisplayBlock, InlineSpan, MalformedMathExpression, render, render_inline, typeset,
};
pub use problem::{
    entities::{NewProblem, ProblemId, ProblemSolution, ProblemText, SolvedProblem, solution_steps},
    hints::parse_hints,
    repository::ProblemRepository,
};
pub use prompt::GenerationPromptTemplate;
