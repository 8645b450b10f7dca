//! Image generation over `images/generations`

use super::OpenAiClient;
use super::types::{ImageGenerationRequest, ImageGenerationResponse};
use crate::config::FileImageProviderConfig;
use async_trait::async_trait;
use octophyx_application::ports::llm_gateway::{GatewayError, GeneratedImage, ImageGenerator};
use tracing::debug;

pub struct OpenAiImageGenerator {
    client: OpenAiClient,
    model: String,
    size: String,
}

impl OpenAiImageGenerator {
    pub fn new(config: &FileImageProviderConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            client: OpenAiClient::new(&config.base_url, config.resolve_api_key())?,
            model: config.model.clone(),
            size: config.size.clone(),
        })
    }
}

#[async_trait]
impl ImageGenerator for OpenAiImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GatewayError> {
        let request = ImageGenerationRequest {
            model: &self.model,
            prompt,
            n: 1,
            size: &self.size,
        };

        let response: ImageGenerationResponse =
            self.client.post_json("images/generations", &request).await?;
        let url = response.into_url()?;
        debug!(model = %self.model, "Image generated");
        Ok(GeneratedImage { url })
    }
}
