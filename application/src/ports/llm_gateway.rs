//! Generation gateway ports
//!
//! Defines the interfaces for calling the text (LLM) and image generation
//! providers. Implementations (adapters) live in the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// A chat-style prompt: one system message and one user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextPrompt {
    pub system: String,
    pub user: String,
}

impl TextPrompt {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
        }
    }
}

/// Result of an image generation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub url: String,
}

/// Text generation provider (LLM)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send the prompt and return the model's reply text
    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, GatewayError>;
}

/// Image generation provider
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate an image for `prompt` and return where it can be fetched
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GatewayError>;
}
