//! Generate Content use case.
//!
//! Submits a topic and drives the background generation run:
//!
//! 1. Validate the topic and insert a `Pending` record
//! 2. Move it to `Generating` and persist, before any external call
//! 3. Spawn the generation task and return a [`GenerationHandle`]
//!
//! The task runs explanation → animation code → diagram strictly in order.
//! Each call is bounded by a deadline. A failed explanation or animation
//! step fails the whole request; a failed diagram only leaves the diagram
//! URL empty.

use crate::config::GenerationParams;
use crate::ports::generation_logger::{GenerationLogger, NoGenerationLogger};
use crate::ports::llm_gateway::{GatewayError, ImageGenerator, TextGenerator, TextPrompt};
use crate::use_cases::generation_run::{GenerationHandle, RunRef, StepRunner};
use chrono::Utc;
use octophyx_domain::{
    ContentRepository, ContentRequest, ContentStatus, DomainError, GeneratedContent,
    GenerationPromptTemplate, NewContentRequest, OwnerId, RepositoryError, Topic,
};
use serde_json::json;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// One external call of a generation run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationStep {
    Explanation,
    AnimationCode,
    Solution,
    Diagram,
}

impl GenerationStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            GenerationStep::Explanation => "explanation",
            GenerationStep::AnimationCode => "animation_code",
            GenerationStep::Solution => "solution",
            GenerationStep::Diagram => "diagram",
        }
    }

    /// Whether a failure of this step fails the request
    pub fn is_required(&self) -> bool {
        !matches!(self, GenerationStep::Diagram)
    }
}

impl fmt::Display for GenerationStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Errors that can occur while submitting or generating content.
#[derive(Error, Debug)]
pub enum GenerateContentError {
    #[error("Invalid topic: {0}")]
    InvalidTopic(DomainError),

    #[error("Invalid problem: {0}")]
    InvalidProblem(DomainError),

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("State error: {0}")]
    Domain(#[from] DomainError),

    #[error("Generation step '{step}' failed: {source}")]
    GenerationStepFailed {
        step: GenerationStep,
        #[source]
        source: GatewayError,
    },

    #[error("Generation cancelled")]
    Cancelled,

    #[error("Generation task aborted: {0}")]
    TaskAborted(String),
}

impl GenerateContentError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerateContentError::Cancelled)
    }

    /// Rejected input; nothing was created
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GenerateContentError::InvalidTopic(_) | GenerateContentError::InvalidProblem(_)
        )
    }

    /// The step that failed, if this is a step failure
    pub fn failed_step(&self) -> Option<GenerationStep> {
        match self {
            GenerateContentError::GenerationStepFailed { step, .. } => Some(*step),
            _ => None,
        }
    }
}

/// Input for the [`GenerateContentUseCase`].
#[derive(Debug, Clone)]
pub struct GenerateContentInput {
    /// Free-text topic; validated on submit.
    pub topic: String,
    pub owner: Option<OwnerId>,
}

impl GenerateContentInput {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            owner: None,
        }
    }

    pub fn with_owner(mut self, owner: Option<OwnerId>) -> Self {
        self.owner = owner;
        self
    }
}

/// Result of [`GenerateContentUseCase::submit`].
pub struct SubmittedContent {
    /// The record as persisted at submission, already `Generating`
    pub request: ContentRequest,
    pub handle: GenerationHandle,
}

/// Use case for submitting a topic and generating its content.
#[derive(Clone)]
pub struct GenerateContentUseCase {
    repository: Arc<dyn ContentRepository>,
    steps: StepRunner,
}

impl GenerateContentUseCase {
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        text: Arc<dyn TextGenerator>,
        image: Arc<dyn ImageGenerator>,
    ) -> Self {
        Self {
            repository,
            steps: StepRunner {
                text,
                image,
                logger: Arc::new(NoGenerationLogger),
                params: GenerationParams::default(),
            },
        }
    }

    pub fn with_generation_logger(mut self, logger: Arc<dyn GenerationLogger>) -> Self {
        self.steps.logger = logger;
        self
    }

    pub fn with_params(mut self, params: GenerationParams) -> Self {
        self.steps.params = params;
        self
    }

    /// Create the record and start generating.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn submit(
        &self,
        input: GenerateContentInput,
    ) -> Result<SubmittedContent, GenerateContentError> {
        let topic = Topic::try_new(input.topic).map_err(GenerateContentError::InvalidTopic)?;

        let mut request = self
            .repository
            .insert(NewContentRequest::new(topic, input.owner))
            .await?;
        request.start_generation(Utc::now())?;
        self.repository.update(&request).await?;

        info!(content_id = %request.id, topic = %request.topic, "Content request submitted");
        self.steps.log(
            RunRef::content(request.id),
            "submitted",
            json!({
                "topic": request.topic.as_str(),
                "owner": request.owner.map(|o| o.value()),
            }),
        );

        let worker = GenerationWorker {
            repository: self.repository.clone(),
            steps: self.steps.clone(),
        };
        let record = request.clone();
        let handle = GenerationHandle::spawn(request.id, move |cancel| worker.run(record, cancel));

        Ok(SubmittedContent { request, handle })
    }
}

/// Owns everything the background task needs.
struct GenerationWorker {
    repository: Arc<dyn ContentRepository>,
    steps: StepRunner,
}

impl GenerationWorker {
    async fn run(
        self,
        mut request: ContentRequest,
        cancel: CancellationToken,
    ) -> Result<ContentStatus, GenerateContentError> {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GenerateContentError::Cancelled),
            result = self.generate(&request) => result,
        };

        match outcome {
            Ok(content) => {
                request.complete(content, Utc::now())?;
                self.repository.update(&request).await?;
                info!(
                    content_id = %request.id,
                    has_diagram = request.diagram_url.is_some(),
                    "Content generation completed"
                );
                self.log_finished(&request, None);
                Ok(ContentStatus::Completed)
            }
            Err(error) => {
                warn!(content_id = %request.id, error = %error, "Content generation failed");
                request.fail(Utc::now())?;
                self.repository.update(&request).await?;
                self.log_finished(&request, Some(&error));
                Err(error)
            }
        }
    }

    async fn generate(
        &self,
        request: &ContentRequest,
    ) -> Result<GeneratedContent, GenerateContentError> {
        let run = RunRef::content(request.id);
        let topic = request.topic.as_str();

        let explanation = self
            .steps
            .text_step(
                run,
                GenerationStep::Explanation,
                TextPrompt::new(
                    GenerationPromptTemplate::explanation_system(),
                    GenerationPromptTemplate::explanation_prompt(topic),
                ),
            )
            .await?;

        let animation_code = self
            .steps
            .text_step(
                run,
                GenerationStep::AnimationCode,
                TextPrompt::new(
                    GenerationPromptTemplate::animation_system(),
                    GenerationPromptTemplate::animation_prompt(topic),
                ),
            )
            .await?;

        let diagram_url = self
            .steps
            .diagram_step(run, &GenerationPromptTemplate::diagram_prompt(topic))
            .await;

        Ok(GeneratedContent {
            explanation,
            animation_code,
            diagram_url,
        })
    }

    fn log_finished(&self, request: &ContentRequest, error: Option<&GenerateContentError>) {
        self.steps.log(
            RunRef::content(request.id),
            "finished",
            json!({
                "status": request.status.as_str(),
                "has_diagram": request.diagram_url.is_some(),
                "error": error.map(|e| e.to_string()),
            }),
        );
    }
}
