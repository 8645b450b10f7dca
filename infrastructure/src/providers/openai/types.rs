//! Wire types for OpenAI-compatible endpoints
//!
//! Only the fields octophyx reads or writes are modelled; unknown response
//! fields are ignored.

use octophyx_application::ports::llm_gateway::GatewayError;
use serde::{Deserialize, Serialize};

// ─── chat/completions ────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice. An empty reply is an invalid response.
    pub fn into_text(self) -> Result<String, GatewayError> {
        let content = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("no choices in response".to_string()))?
            .message
            .content
            .unwrap_or_default();

        if content.trim().is_empty() {
            return Err(GatewayError::InvalidResponse(
                "empty message content".to_string(),
            ));
        }
        Ok(content)
    }
}

// ─── images/generations ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ImageGenerationRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub n: u32,
    pub size: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ImageGenerationResponse {
    #[serde(default)]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
pub struct ImageData {
    pub url: Option<String>,
    pub b64_json: Option<String>,
}

impl ImageGenerationResponse {
    /// URL of the first image. Inline base64 payloads become a `data:` URL.
    pub fn into_url(self) -> Result<String, GatewayError> {
        let image = self
            .data
            .into_iter()
            .next()
            .ok_or_else(|| GatewayError::InvalidResponse("no images in response".to_string()))?;

        match (image.url, image.b64_json) {
            (Some(url), _) if !url.trim().is_empty() => Ok(url),
            (_, Some(b64)) if !b64.is_empty() => Ok(format!("data:image/png;base64,{}", b64)),
            _ => Err(GatewayError::InvalidResponse(
                "image has neither url nor b64_json".to_string(),
            )),
        }
    }
}

// ─── errors ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub message: String,
}

/// Build the gateway error for a non-success HTTP status.
pub fn status_error(status: reqwest::StatusCode, body: &str) -> GatewayError {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect());
    match status.as_u16() {
        408 | 504 => GatewayError::Timeout,
        401 | 403 => GatewayError::NotConfigured(format!("HTTP {}: {}", status.as_u16(), message)),
        code => GatewayError::RequestFailed(format!("HTTP {}: {}", code, message)),
    }
}

/// Map a transport-level failure.
pub fn transport_error(error: reqwest::Error) -> GatewayError {
    if error.is_timeout() {
        GatewayError::Timeout
    } else if error.is_connect() {
        GatewayError::ConnectionError(error.to_string())
    } else if error.is_decode() {
        GatewayError::InvalidResponse(error.to_string())
    } else {
        GatewayError::RequestFailed(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatCompletionRequest {
            model: "gpt-4o-mini",
            messages: vec![
                ChatMessage { role: "system", content: "You are a physics expert." },
                ChatMessage { role: "user", content: "Explain inertia." },
            ],
            max_tokens: 512,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["content"], "Explain inertia.");
        assert_eq!(json["max_tokens"], 512);
    }

    #[test]
    fn test_chat_response_text() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r##"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"# Inertia"}}]}"##,
        )
        .unwrap();
        assert_eq!(response.into_text().unwrap(), "# Inertia");
    }

    #[test]
    fn test_chat_response_empty_is_invalid() {
        let no_choices: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(no_choices.into_text(), Err(GatewayError::InvalidResponse(_))));

        let null_content: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert!(null_content.into_text().is_err());
    }

    #[test]
    fn test_image_response_url_and_b64() {
        let with_url: ImageGenerationResponse =
            serde_json::from_str(r#"{"created":1,"data":[{"url":"https://img/1.png"}]}"#).unwrap();
        assert_eq!(with_url.into_url().unwrap(), "https://img/1.png");

        let with_b64: ImageGenerationResponse =
            serde_json::from_str(r#"{"data":[{"b64_json":"iVBORw0"}]}"#).unwrap();
        assert_eq!(with_b64.into_url().unwrap(), "data:image/png;base64,iVBORw0");

        let empty: ImageGenerationResponse = serde_json::from_str(r#"{"data":[]}"#).unwrap();
        assert!(empty.into_url().is_err());
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#;
        assert_eq!(
            status_error(StatusCode::TOO_MANY_REQUESTS, body),
            GatewayError::RequestFailed("HTTP 429: Rate limit reached".to_string())
        );
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, "nope"),
            GatewayError::NotConfigured(_)
        ));
        assert_eq!(status_error(StatusCode::GATEWAY_TIMEOUT, ""), GatewayError::Timeout);
    }
}
