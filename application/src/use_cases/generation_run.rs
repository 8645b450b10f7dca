//! Background generation runs shared by the content and problem use cases.
//!
//! - [`GenerationHandle`] — wait on or cancel one spawned run
//! - [`GenerationTracker`] — holds the runs a long-lived process started, so
//!   they can be cancelled and awaited on shutdown
//! - `StepRunner` — one external call per step, bounded by a deadline and
//!   reported to the generation log

use crate::config::GenerationParams;
use crate::ports::generation_logger::{GenerationEvent, GenerationLogger};
use crate::ports::llm_gateway::{
    GatewayError, GeneratedImage, ImageGenerator, TextGenerator, TextPrompt,
};
use crate::use_cases::generate_content::{GenerateContentError, GenerationStep};
use octophyx_domain::{ContentId, ContentStatus, ProblemId};
use serde_json::{Value, json};
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

type RunTask = JoinHandle<Result<ContentStatus, GenerateContentError>>;

/// Handle on a running generation task.
///
/// Dropping the handle detaches the task. A detached task only finishes if
/// the runtime outlives it; hand the handle to a [`GenerationTracker`] or
/// [`wait`](Self::wait) on it before the process exits.
pub struct GenerationHandle<I = ContentId> {
    id: I,
    task: RunTask,
    cancel: CancellationToken,
}

impl<I: Copy> GenerationHandle<I> {
    /// Spawn `run` with a fresh cancellation token.
    pub(crate) fn spawn<F>(id: I, run: impl FnOnce(CancellationToken) -> F) -> Self
    where
        F: Future<Output = Result<ContentStatus, GenerateContentError>> + Send + 'static,
    {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(cancel.clone()));
        Self { id, task, cancel }
    }

    pub fn id(&self) -> I {
        self.id
    }

    /// Request cancellation. The record ends up `Failed`.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the run to finish.
    ///
    /// Returns `Ok(Completed)` on success. A failed run returns the error that
    /// moved the record to `Failed`.
    pub async fn wait(self) -> Result<ContentStatus, GenerateContentError> {
        self.task
            .await
            .map_err(|e| GenerateContentError::TaskAborted(e.to_string()))?
    }

    /// Like [`wait`](Self::wait), but cancels the run once `interrupt` fires.
    pub async fn wait_or_cancel_on(
        self,
        interrupt: CancellationToken,
    ) -> Result<ContentStatus, GenerateContentError> {
        let cancel = self.cancel.clone();
        let watcher = tokio::spawn(async move {
            interrupt.cancelled().await;
            cancel.cancel();
        });
        let result = self.wait().await;
        watcher.abort();
        result
    }
}

struct TrackedRun {
    label: String,
    task: RunTask,
    cancel: CancellationToken,
}

/// Runs started by a long-lived process, such as the HTTP API.
#[derive(Default)]
pub struct GenerationTracker {
    runs: Mutex<Vec<TrackedRun>>,
}

impl GenerationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<TrackedRun>> {
        self.runs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Keep `handle` until it finishes or [`shutdown`](Self::shutdown) runs.
    pub fn track<I: fmt::Display>(&self, handle: GenerationHandle<I>) {
        let mut runs = self.lock();
        runs.retain(|run| !run.task.is_finished());
        runs.push(TrackedRun {
            label: handle.id.to_string(),
            task: handle.task,
            cancel: handle.cancel,
        });
    }

    /// Runs that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.lock().iter().filter(|run| !run.task.is_finished()).count()
    }

    /// Cancel every unfinished run and wait until each has written its
    /// terminal status. Returns how many runs were cancelled.
    pub async fn shutdown(&self) -> usize {
        let runs = std::mem::take(&mut *self.lock());

        let mut cancelled = 0;
        for run in runs.iter().filter(|run| !run.task.is_finished()) {
            run.cancel.cancel();
            cancelled += 1;
        }

        for TrackedRun { label, task, .. } in runs {
            match task.await {
                Ok(Ok(_)) | Ok(Err(GenerateContentError::Cancelled)) => {}
                Ok(Err(error)) => debug!(run = %label, error = %error, "Run ended with an error"),
                Err(error) => warn!(run = %label, error = %error, "Generation task aborted"),
            }
        }

        if cancelled > 0 {
            info!(cancelled, "Cancelled in-flight generation runs");
        }
        cancelled
    }
}

/// Names the record a run works on, in logs and generation events.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RunRef {
    key: &'static str,
    id: i64,
}

impl RunRef {
    pub(crate) fn content(id: ContentId) -> Self {
        Self {
            key: "content_id",
            id: id.value(),
        }
    }

    pub(crate) fn problem(id: ProblemId) -> Self {
        Self {
            key: "problem_id",
            id: id.value(),
        }
    }

    /// Event with this run's id added to `payload`
    pub(crate) fn event(&self, event_type: &'static str, mut payload: Value) -> GenerationEvent {
        if let Value::Object(fields) = &mut payload {
            fields.insert(self.key.to_string(), json!(self.id));
        }
        GenerationEvent::new(event_type, payload)
    }
}

impl fmt::Display for RunRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.id)
    }
}

/// Performs the external calls of a run.
#[derive(Clone)]
pub(crate) struct StepRunner {
    pub(crate) text: Arc<dyn TextGenerator>,
    pub(crate) image: Arc<dyn ImageGenerator>,
    pub(crate) logger: Arc<dyn GenerationLogger>,
    pub(crate) params: GenerationParams,
}

impl StepRunner {
    /// A text call; failure is reported as a failure of `step`.
    pub(crate) async fn text_step(
        &self,
        run: RunRef,
        step: GenerationStep,
        prompt: TextPrompt,
    ) -> Result<String, GenerateContentError> {
        self.log_step_started(run, step);
        match with_deadline(self.params.text_timeout, self.text.generate_text(&prompt)).await {
            Ok(text) => {
                self.log_step_completed(run, step, json!({ "chars": text.chars().count() }));
                Ok(text)
            }
            Err(source) => {
                self.log_step_failed(run, step, &source);
                Err(GenerateContentError::GenerationStepFailed { step, source })
            }
        }
    }

    /// The diagram call. Its failure never fails the run, so the error is
    /// logged here and dropped.
    pub(crate) async fn diagram_step(&self, run: RunRef, prompt: &str) -> Option<String> {
        let step = GenerationStep::Diagram;
        self.log_step_started(run, step);
        let result: Result<GeneratedImage, GatewayError> =
            with_deadline(self.params.image_timeout, self.image.generate_image(prompt)).await;
        match result {
            Ok(image) => {
                self.log_step_completed(run, step, json!({ "url": image.url }));
                Some(image.url)
            }
            Err(error) => {
                self.log_step_failed(run, step, &error);
                warn!(
                    run = %run,
                    step = %step,
                    error = %error,
                    "Diagram generation failed; continuing without diagram"
                );
                None
            }
        }
    }

    pub(crate) fn log(&self, run: RunRef, event_type: &'static str, payload: Value) {
        self.logger.log(run.event(event_type, payload));
    }

    fn log_step_started(&self, run: RunRef, step: GenerationStep) {
        debug!(run = %run, step = %step, "Generation step started");
        self.log(run, "step_started", json!({ "step": step.as_str() }));
    }

    fn log_step_completed(&self, run: RunRef, step: GenerationStep, detail: Value) {
        debug!(run = %run, step = %step, "Generation step completed");
        self.log(
            run,
            "step_completed",
            json!({ "step": step.as_str(), "detail": detail }),
        );
    }

    fn log_step_failed(&self, run: RunRef, step: GenerationStep, error: &GatewayError) {
        self.log(
            run,
            "step_failed",
            json!({
                "step": step.as_str(),
                "required": step.is_required(),
                "error": error.to_string(),
            }),
        );
    }
}

/// Bound a gateway call; expiry becomes [`GatewayError::Timeout`].
pub(crate) async fn with_deadline<T, F>(limit: Duration, call: F) -> Result<T, GatewayError>
where
    F: Future<Output = Result<T, GatewayError>>,
{
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => Err(GatewayError::Timeout),
    }
}
