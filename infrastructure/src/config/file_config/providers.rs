//! Provider configuration from TOML (`[providers]` section)

use serde::{Deserialize, Serialize};

/// Text generation provider (`[providers.text]`), any OpenAI-compatible
/// chat completions endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileTextProviderConfig {
    /// Base URL including the API version path.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Environment variable name for the API key (default: "OPENAI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended — use env var instead).
    pub api_key: Option<String>,
    /// Max tokens per response.
    pub max_tokens: u32,
}

impl Default for FileTextProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            max_tokens: 4096,
        }
    }
}

impl FileTextProviderConfig {
    /// The configured key, falling back to the named environment variable.
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// Image generation provider (`[providers.image]`), OpenAI-compatible
/// `images/generations` endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileImageProviderConfig {
    pub base_url: String,
    pub model: String,
    /// Requested image size, e.g. "1024x1024".
    pub size: String,
    pub api_key_env: String,
    pub api_key: Option<String>,
}

impl Default for FileImageProviderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "dall-e-3".to_string(),
            size: "1024x1024".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
        }
    }
}

impl FileImageProviderConfig {
    pub fn resolve_api_key(&self) -> Option<String> {
        resolve_api_key(self.api_key.as_deref(), &self.api_key_env)
    }
}

/// `[providers]` section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProvidersConfig {
    pub text: FileTextProviderConfig,
    pub image: FileImageProviderConfig,
}

fn resolve_api_key(direct: Option<&str>, env_name: &str) -> Option<String> {
    direct
        .filter(|key| !key.trim().is_empty())
        .map(str::to_string)
        .or_else(|| std::env::var(env_name).ok())
        .filter(|key| !key.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults() {
        let config = FileProvidersConfig::default();
        assert_eq!(config.text.base_url, "https://api.openai.com/v1");
        assert_eq!(config.text.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.image.size, "1024x1024");
        assert!(config.image.api_key.is_none());
    }

    #[test]
    fn test_direct_key_wins_over_env() {
        let config = FileTextProviderConfig {
            api_key: Some("sk-direct".to_string()),
            api_key_env: "OCTOPHYX_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert_eq!(config.resolve_api_key(), Some("sk-direct".to_string()));
    }

    #[test]
    fn test_missing_key_resolves_to_none() {
        let config = FileImageProviderConfig {
            api_key: Some("  ".to_string()),
            api_key_env: "OCTOPHYX_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..Default::default()
        };
        assert!(config.resolve_api_key().is_none());
    }
}
