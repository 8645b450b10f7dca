//! Generation provider adapters
//!
//! Implementations of the [`TextGenerator`](octophyx_application::TextGenerator)
//! and [`ImageGenerator`](octophyx_application::ImageGenerator) ports.

pub mod openai;

pub use openai::{OpenAiImageGenerator, OpenAiTextGenerator};
