//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`] — a validated topic submitted for generation
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod topic;
