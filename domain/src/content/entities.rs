//! Content request entity and its generation state machine.
//!
//! ```text
//! Pending ──► Generating ──► Completed
//!                  │
//!                  └───────► Failed
//! ```
//!
//! `Completed` and `Failed` are terminal. A retry is a new request.

use crate::core::error::DomainError;
use crate::core::topic::Topic;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persisted content request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentId(i64);

impl ContentId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ContentId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Identifier of the user who submitted a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(i64);

impl OwnerId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for OwnerId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

/// Generation status of a content request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    /// Record exists but generation has not started
    #[default]
    Pending,
    /// External generation calls are in flight
    Generating,
    /// All steps attempted; fields hold whatever succeeded
    Completed,
    /// A required step failed
    Failed,
}

impl ContentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentStatus::Pending => "pending",
            ContentStatus::Generating => "generating",
            ContentStatus::Completed => "completed",
            ContentStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ContentStatus::Completed | ContentStatus::Failed)
    }

    /// Position along the lifecycle. Observers must never see this decrease.
    pub fn rank(&self) -> u8 {
        match self {
            ContentStatus::Pending => 0,
            ContentStatus::Generating => 1,
            ContentStatus::Completed | ContentStatus::Failed => 2,
        }
    }

    pub fn can_transition_to(&self, next: ContentStatus) -> bool {
        matches!(
            (self, next),
            (ContentStatus::Pending, ContentStatus::Generating)
                | (ContentStatus::Generating, ContentStatus::Completed)
                | (ContentStatus::Generating, ContentStatus::Failed)
        )
    }

    /// Move to `next` if the lifecycle allows it.
    pub fn advance(&mut self, next: ContentStatus) -> Result<(), DomainError> {
        if !self.can_transition_to(next) {
            return Err(DomainError::InvalidTransition {
                from: self.to_string(),
                to: next.to_string(),
            });
        }
        *self = next;
        Ok(())
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(ContentStatus::Pending),
            "generating" => Ok(ContentStatus::Generating),
            "completed" => Ok(ContentStatus::Completed),
            "failed" => Ok(ContentStatus::Failed),
            _ => Err(DomainError::InvalidStatus(s.to_string())),
        }
    }
}

/// Data needed to create a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContentRequest {
    pub topic: Topic,
    pub owner: Option<OwnerId>,
}

impl NewContentRequest {
    pub fn new(topic: Topic, owner: Option<OwnerId>) -> Self {
        Self { topic, owner }
    }
}

/// Output of a finished generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedContent {
    pub explanation: String,
    pub animation_code: String,
    /// `None` when the diagram step failed or returned nothing
    pub diagram_url: Option<String>,
}

/// The persisted record tracking one topic submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRequest {
    pub id: ContentId,
    pub topic: Topic,
    pub owner: Option<OwnerId>,
    pub status: ContentStatus,
    pub explanation: Option<String>,
    pub animation_code: Option<String>,
    pub diagram_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContentRequest {
    /// A fresh `Pending` record.
    pub fn new(id: ContentId, request: NewContentRequest, now: DateTime<Utc>) -> Self {
        Self {
            id,
            topic: request.topic,
            owner: request.owner,
            status: ContentStatus::Pending,
            explanation: None,
            animation_code: None,
            diagram_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// `Pending → Generating`
    pub fn start_generation(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(ContentStatus::Generating, now)
    }

    /// `Generating → Completed`, storing the generated fields.
    pub fn complete(
        &mut self,
        content: GeneratedContent,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.transition(ContentStatus::Completed, now)?;
        self.explanation = Some(content.explanation);
        self.animation_code = Some(content.animation_code);
        self.diagram_url = content.diagram_url.filter(|url| !url.trim().is_empty());
        Ok(())
    }

    /// `Generating → Failed`
    pub fn fail(&mut self, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.transition(ContentStatus::Failed, now)
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    fn transition(&mut self, next: ContentStatus, now: DateTime<Utc>) -> Result<(), DomainError> {
        self.status.advance(next)?;
        self.updated_at = now;
        Ok(())
    }
}
