//! OpenAI-compatible HTTP providers
//!
//! [`OpenAiTextGenerator`] calls `POST {base_url}/chat/completions`,
//! [`OpenAiImageGenerator`] calls `POST {base_url}/images/generations`.
//! Any service speaking the same wire format (Azure OpenAI, local
//! gateways, Ollama) works by changing `base_url`.

mod image;
mod text;
pub mod types;

pub use image::OpenAiImageGenerator;
pub use text::OpenAiTextGenerator;

use octophyx_application::ports::llm_gateway::GatewayError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared HTTP plumbing for both generators
#[derive(Clone)]
pub(crate) struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub(crate) fn new(base_url: &str, api_key: Option<String>) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("octophyx/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GatewayError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, GatewayError>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let url = self.endpoint(path);
        debug!(url = %url, "POST");

        let mut request = self.http.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(types::transport_error)?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(types::status_error(status, &text));
        }

        response.json::<Resp>().await.map_err(types::transport_error)
    }
}
