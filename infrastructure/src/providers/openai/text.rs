//! Text generation over `chat/completions`

use super::OpenAiClient;
use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::FileTextProviderConfig;
use async_trait::async_trait;
use octophyx_application::ports::llm_gateway::{GatewayError, TextGenerator, TextPrompt};
use tracing::{debug, warn};

pub struct OpenAiTextGenerator {
    client: OpenAiClient,
    model: String,
    max_tokens: u32,
}

impl OpenAiTextGenerator {
    pub fn new(config: &FileTextProviderConfig) -> Result<Self, GatewayError> {
        let api_key = config.resolve_api_key();
        if api_key.is_none() {
            warn!(
                "No API key for text provider (set {} or providers.text.api_key)",
                config.api_key_env
            );
        }
        Ok(Self {
            client: OpenAiClient::new(&config.base_url, api_key)?,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl TextGenerator for OpenAiTextGenerator {
    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, GatewayError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: &prompt.user,
                },
            ],
            max_tokens: self.max_tokens,
        };

        let response: ChatCompletionResponse =
            self.client.post_json("chat/completions", &request).await?;
        let text = response.into_text()?;
        debug!(model = %self.model, chars = text.len(), "Text generated");
        Ok(text)
    }
}
