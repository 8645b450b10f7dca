//! Physics problems submitted for a worked solution.
//!
//! - [`entities::ProblemSolution`] — the problem, its solution and its status
//! - [`entities::ProblemText`] — validated problem statement
//! - [`hints::parse_hints`] — hint list extraction with a fixed fallback
//! - [`repository::ProblemRepository`] — trait for problem persistence
//!
//! Solutions move through the same lifecycle as content requests, see
//! [`crate::ContentStatus`].

pub mod entities;
pub mod hints;
pub mod repository;
