//! Application-level configuration.
//!
//! - [`GenerationParams`] — per-call deadlines, poll interval and history size

pub mod generation_params;

pub use generation_params::GenerationParams;
