//! Prompt domain
//!
//! Prompts sent to the text and image generators at each generation step.

mod template;

pub use template::GenerationPromptTemplate;
