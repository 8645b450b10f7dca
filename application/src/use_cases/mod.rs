//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod generate_content;
pub mod generation_run;
pub mod get_content;
pub mod poll_content;
pub mod problem_query;
pub mod solve_problem;

#[cfg(test)]
pub(crate) mod test_support;
