//! Test doubles shared by the use case tests.

use crate::ports::generation_logger::{GenerationEvent, GenerationLogger};
use crate::ports::llm_gateway::{
    GatewayError, GeneratedImage, ImageGenerator, TextGenerator, TextPrompt,
};
use crate::ports::progress::PollObserver;
use async_trait::async_trait;
use chrono::Utc;
use octophyx_domain::{
    ContentId, ContentRepository, ContentRequest, ContentStatus, NewContentRequest, NewProblem,
    OwnerId, ProblemId, ProblemRepository, ProblemSolution, RepositoryError,
};
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

// ==================== Repository ====================

/// Stores both content requests and problems.
pub(crate) struct InMemoryRepository {
    records: Mutex<HashMap<ContentId, ContentRequest>>,
    problems: Mutex<HashMap<ProblemId, ProblemSolution>>,
    next_id: AtomicI64,
    /// Every status written through `update`, in order
    pub(crate) updates: Mutex<Vec<ContentStatus>>,
}

impl InMemoryRepository {
    pub(crate) fn new() -> Self {
        Self {
            records: Mutex::new(HashMap::new()),
            problems: Mutex::new(HashMap::new()),
            next_id: AtomicI64::new(1),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn stored(&self, id: ContentId) -> ContentRequest {
        self.records.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub(crate) fn stored_problem(&self, id: ProblemId) -> ProblemSolution {
        self.problems.lock().unwrap().get(&id).cloned().unwrap()
    }

    pub(crate) fn problem_count(&self) -> usize {
        self.problems.lock().unwrap().len()
    }

    pub(crate) fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl ContentRepository for InMemoryRepository {
    async fn insert(&self, request: NewContentRequest) -> Result<ContentRequest, RepositoryError> {
        let id = ContentId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = ContentRequest::new(id, request, Utc::now());
        self.records.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ContentId) -> Result<Option<ContentRequest>, RepositoryError> {
        Ok(self.records.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, request: &ContentRequest) -> Result<(), RepositoryError> {
        let mut records = self.records.lock().unwrap();
        let slot = records
            .get_mut(&request.id)
            .ok_or(RepositoryError::NotFound(request.id))?;
        *slot = request.clone();
        self.updates.lock().unwrap().push(request.status);
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ContentRequest>, RepositoryError> {
        let records = self.records.lock().unwrap();
        let mut owned: Vec<_> = records
            .values()
            .filter(|r| r.owner == Some(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.id.cmp(&a.id));
        owned.truncate(limit);
        Ok(owned)
    }
}

#[async_trait]
impl ProblemRepository for InMemoryRepository {
    async fn insert(&self, problem: NewProblem) -> Result<ProblemSolution, RepositoryError> {
        let id = ProblemId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let record = ProblemSolution::new(id, problem, Utc::now());
        self.problems.lock().unwrap().insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: ProblemId) -> Result<Option<ProblemSolution>, RepositoryError> {
        Ok(self.problems.lock().unwrap().get(&id).cloned())
    }

    async fn update(&self, problem: &ProblemSolution) -> Result<(), RepositoryError> {
        let mut problems = self.problems.lock().unwrap();
        let slot = problems
            .get_mut(&problem.id)
            .ok_or(RepositoryError::ProblemNotFound(problem.id))?;
        *slot = problem.clone();
        self.updates.lock().unwrap().push(problem.status);
        Ok(())
    }

    async fn list_by_owner(
        &self,
        owner: OwnerId,
        limit: usize,
    ) -> Result<Vec<ProblemSolution>, RepositoryError> {
        let problems = self.problems.lock().unwrap();
        let mut owned: Vec<_> = problems
            .values()
            .filter(|p| p.owner == Some(owner))
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.id.cmp(&a.id));
        owned.truncate(limit);
        Ok(owned)
    }
}

// ==================== Generators ====================

pub(crate) struct ScriptedTextGenerator {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    pub(crate) prompts: Mutex<Vec<TextPrompt>>,
    delay: Option<Duration>,
}

impl ScriptedTextGenerator {
    pub(crate) fn new(replies: Vec<Result<String, GatewayError>>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::from(replies)),
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub(crate) fn ok(explanation: &str, code: &str) -> Self {
        Self::new(vec![Ok(explanation.to_string()), Ok(code.to_string())])
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl TextGenerator for ScriptedTextGenerator {
    async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Other("No more responses".to_string())))
    }
}

pub(crate) struct ScriptedImageGenerator {
    reply: Result<GeneratedImage, GatewayError>,
    pub(crate) prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl ScriptedImageGenerator {
    pub(crate) fn ok(url: &str) -> Self {
        Self::new(Ok(GeneratedImage {
            url: url.to_string(),
        }))
    }

    pub(crate) fn failing(error: GatewayError) -> Self {
        Self::new(Err(error))
    }

    fn new(reply: Result<GeneratedImage, GatewayError>) -> Self {
        Self {
            reply,
            prompts: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ImageGenerator for ScriptedImageGenerator {
    async fn generate_image(&self, prompt: &str) -> Result<GeneratedImage, GatewayError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone()
    }
}

// ==================== Observers ====================

#[derive(Default)]
pub(crate) struct RecordingLogger {
    pub(crate) events: Mutex<Vec<(&'static str, serde_json::Value)>>,
}

impl RecordingLogger {
    pub(crate) fn types(&self) -> Vec<&'static str> {
        self.events.lock().unwrap().iter().map(|(t, _)| *t).collect()
    }
}

impl GenerationLogger for RecordingLogger {
    fn log(&self, event: GenerationEvent) {
        self.events
            .lock()
            .unwrap()
            .push((event.event_type, event.payload));
    }
}

#[derive(Default)]
pub(crate) struct RecordingObserver {
    pub(crate) observed: Mutex<Vec<ContentStatus>>,
    pub(crate) transitions: Mutex<Vec<(ContentStatus, ContentStatus)>>,
}

impl PollObserver for RecordingObserver {
    fn on_observe(&self, status: ContentStatus) {
        self.observed.lock().unwrap().push(status);
    }

    fn on_transition(&self, from: ContentStatus, to: ContentStatus) {
        self.transitions.lock().unwrap().push((from, to));
    }
}
