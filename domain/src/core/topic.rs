//! Topic value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// Longest topic accepted, in characters.
pub const MAX_TOPIC_CHARS: usize = 255;

/// A physics topic or problem submitted for generation (Value Object)
///
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Topic {
    content: String,
}

impl Topic {
    /// Validate and create a topic
    pub fn try_new(content: impl Into<String>) -> Result<Self, DomainError> {
        let content = content.into();
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Err(DomainError::InvalidTopic("topic cannot be empty".to_string()));
        }
        if trimmed.chars().count() > MAX_TOPIC_CHARS {
            return Err(DomainError::InvalidTopic(format!(
                "topic exceeds {} characters",
                MAX_TOPIC_CHARS
            )));
        }
        Ok(Self {
            content: trimmed.to_string(),
        })
    }

    /// Get the topic text
    pub fn as_str(&self) -> &str {
        &self.content
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.content)
    }
}

impl TryFrom<String> for Topic {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Topic::try_new(s)
    }
}

impl TryFrom<&str> for Topic {
    type Error = DomainError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Topic::try_new(s)
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_is_trimmed() {
        let t = Topic::try_new("  Newton's Laws \n").unwrap();
        assert_eq!(t.as_str(), "Newton's Laws");
    }

    #[test]
    fn test_empty_topic_rejected() {
        assert!(Topic::try_new("").is_err());
        assert!(Topic::try_new("   ").is_err());
    }

    #[test]
    fn test_length_limit_counts_characters() {
        assert!(Topic::try_new("ö".repeat(MAX_TOPIC_CHARS)).is_ok());
        assert!(Topic::try_new("a".repeat(MAX_TOPIC_CHARS + 1)).is_err());
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Topic = serde_json::from_str("\"Doppler Effect\"").unwrap();
        assert_eq!(ok.as_str(), "Doppler Effect");
        assert!(serde_json::from_str::<Topic>("\"  \"").is_err());
    }
}
