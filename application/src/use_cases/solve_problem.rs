//! Solve Problem use case.
//!
//! Submits a physics problem and drives its solution run on the same
//! lifecycle as content generation:
//!
//! 1. Validate the problem text and insert a `Pending` problem
//! 2. Move it to `Generating` and persist, before any external call
//! 3. Spawn the solution task and return a [`GenerationHandle`]
//!
//! The task asks for a step-by-step solution, then for a diagram. Only the
//! solution is required.

use crate::config::GenerationParams;
use crate::ports::generation_logger::{GenerationLogger, NoGenerationLogger};
use crate::ports::llm_gateway::{ImageGenerator, TextGenerator, TextPrompt};
use crate::use_cases::generate_content::{GenerateContentError, GenerationStep};
use crate::use_cases::generation_run::{GenerationHandle, RunRef, StepRunner};
use chrono::Utc;
use octophyx_domain::{
    ContentStatus, GenerationPromptTemplate, NewProblem, OwnerId, ProblemId, ProblemRepository,
    ProblemSolution, ProblemText, SolvedProblem, TopicCategory,
};
use serde_json::json;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Characters of the problem quoted in the diagram prompt
const DIAGRAM_EXCERPT_CHARS: usize = 100;

/// Input for the [`SolveProblemUseCase`].
#[derive(Debug, Clone)]
pub struct SolveProblemInput {
    /// Problem statement; validated on submit.
    pub text: String,
    pub category: Option<TopicCategory>,
    pub owner: Option<OwnerId>,
}

impl SolveProblemInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            category: None,
            owner: None,
        }
    }

    pub fn with_category(mut self, category: Option<TopicCategory>) -> Self {
        self.category = category;
        self
    }

    pub fn with_owner(mut self, owner: Option<OwnerId>) -> Self {
        self.owner = owner;
        self
    }
}

/// Result of [`SolveProblemUseCase::submit`].
pub struct SubmittedProblem {
    /// The problem as persisted at submission, already `Generating`
    pub problem: ProblemSolution,
    pub handle: GenerationHandle<ProblemId>,
}

/// Use case for submitting a problem and generating its solution.
#[derive(Clone)]
pub struct SolveProblemUseCase {
    repository: Arc<dyn ProblemRepository>,
    steps: StepRunner,
}

impl SolveProblemUseCase {
    pub fn new(
        repository: Arc<dyn ProblemRepository>,
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

    /// Create the problem and start solving it.
    ///
    /// Must be called from within a tokio runtime.
    pub async fn submit(
        &self,
        input: SolveProblemInput,
    ) -> Result<SubmittedProblem, GenerateContentError> {
        let text = ProblemText::try_new(input.text).map_err(GenerateContentError::InvalidProblem)?;

        let mut problem = self
            .repository
            .insert(NewProblem::new(text, input.owner).with_category(input.category))
            .await?;
        problem.start_generation(Utc::now())?;
        self.repository.update(&problem).await?;

        info!(problem_id = %problem.id, "Problem submitted");
        self.steps.log(
            RunRef::problem(problem.id),
            "submitted",
            json!({
                "category": problem.category.map(|c| c.as_str()),
                "owner": problem.owner.map(|o| o.value()),
            }),
        );

        let worker = SolutionWorker {
            repository: self.repository.clone(),
            steps: self.steps.clone(),
        };
        let record = problem.clone();
        let handle = GenerationHandle::spawn(problem.id, move |cancel| worker.run(record, cancel));

        Ok(SubmittedProblem { problem, handle })
    }
}

struct SolutionWorker {
    repository: Arc<dyn ProblemRepository>,
    steps: StepRunner,
}

impl SolutionWorker {
    async fn run(
        self,
        mut problem: ProblemSolution,
        cancel: CancellationToken,
    ) -> Result<ContentStatus, GenerateContentError> {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(GenerateContentError::Cancelled),
            result = self.solve(&problem) => result,
        };

        match outcome {
            Ok(solved) => {
                problem.complete(solved, Utc::now())?;
                self.repository.update(&problem).await?;
                info!(
                    problem_id = %problem.id,
                    steps = problem.steps.len(),
                    "Problem solved"
                );
                self.log_finished(&problem, None);
                Ok(ContentStatus::Completed)
            }
            Err(error) => {
                warn!(problem_id = %problem.id, error = %error, "Problem solving failed");
                problem.fail(Utc::now())?;
                self.repository.update(&problem).await?;
                self.log_finished(&problem, Some(&error));
                Err(error)
            }
        }
    }

    async fn solve(&self, problem: &ProblemSolution) -> Result<SolvedProblem, GenerateContentError> {
        let run = RunRef::problem(problem.id);

        let solution = self
            .steps
            .text_step(
                run,
                GenerationStep::Solution,
                TextPrompt::new(
                    GenerationPromptTemplate::solution_system(),
                    GenerationPromptTemplate::solution_prompt(problem.problem_text.as_str()),
                ),
            )
            .await?;

        let prompt = GenerationPromptTemplate::problem_diagram_prompt(
            problem.problem_text.excerpt(DIAGRAM_EXCERPT_CHARS),
        );
        let diagram_url = self.steps.diagram_step(run, &prompt).await;

        Ok(SolvedProblem {
            solution,
            diagram_url,
        })
    }

    fn log_finished(&self, problem: &ProblemSolution, error: Option<&GenerateContentError>) {
        self.steps.log(
            RunRef::problem(problem.id),
            "finished",
            json!({
                "status": problem.status.as_str(),
                "steps": problem.steps.len(),
                "has_diagram": problem.diagram_url.is_some(),
                "error": error.map(|e| e.to_string()),
            }),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::llm_gateway::GatewayError;
    use crate::use_cases::test_support::{
        InMemoryRepository, RecordingLogger, ScriptedImageGenerator, ScriptedTextGenerator,
    };
    use std::time::Duration;

    const INCLINE: &str = "A 2 kg block slides from rest down a frictionless 30° incline \
that is 5 m long. How fast is it moving at the bottom, and how long does the slide take?";

    struct Fixture {
        repository: Arc<InMemoryRepository>,
        text: Arc<ScriptedTextGenerator>,
        image: Arc<ScriptedImageGenerator>,
    }

    impl Fixture {
        fn new(text: ScriptedTextGenerator, image: ScriptedImageGenerator) -> Self {
            Self {
                repository: Arc::new(InMemoryRepository::new()),
                text: Arc::new(text),
                image: Arc::new(image),
            }
        }

        fn use_case(&self) -> SolveProblemUseCase {
            SolveProblemUseCase::new(self.repository.clone(), self.text.clone(), self.image.clone())
        }
    }

    fn solved(solution: &str) -> Fixture {
        Fixture::new(
            ScriptedTextGenerator::new(vec![Ok(solution.to_string())]),
            ScriptedImageGenerator::ok("https://images.example/incline.png"),
        )
    }

    #[tokio::test]
    async fn test_submit_returns_generating_problem() {
        let fixture = solved("a = g sin θ");
        let submitted = fixture
            .use_case()
            .submit(
                SolveProblemInput::new(INCLINE)
                    .with_category(Some(TopicCategory::Mechanics))
                    .with_owner(Some(OwnerId::new(5))),
            )
            .await
            .unwrap();

        assert_eq!(submitted.problem.status, ContentStatus::Generating);
        assert_eq!(submitted.handle.id(), submitted.problem.id);
        assert_eq!(submitted.problem.category, Some(TopicCategory::Mechanics));
        assert!(!submitted.problem.bookmarked);
        assert!(fixture.text.prompts.lock().unwrap().is_empty());

        submitted.handle.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_solution_completes_with_steps_and_diagram() {
        let fixture = solved("Step 1: resolve gravity along the slope.\n\nStep 2: a = g sin 30° = 4.9 m/s².\n\nStep 3: v = √(2as) ≈ 7 m/s.");
        let submitted = fixture.use_case().submit(SolveProblemInput::new(INCLINE)).await.unwrap();
        let id = submitted.problem.id;

        assert_eq!(submitted.handle.wait().await.unwrap(), ContentStatus::Completed);

        let stored = fixture.repository.stored_problem(id);
        assert_eq!(stored.status, ContentStatus::Completed);
        assert_eq!(stored.steps.len(), 3);
        assert!(stored.steps[2].starts_with("Step 3"));
        assert_eq!(
            stored.diagram_url.as_deref(),
            Some("https://images.example/incline.png")
        );

        let prompts = fixture.text.prompts.lock().unwrap();
        assert_eq!(prompts[0].user, GenerationPromptTemplate::solution_prompt(INCLINE));
        let image_prompts = fixture.image.prompts.lock().unwrap();
        assert_eq!(
            image_prompts[0],
            GenerationPromptTemplate::problem_diagram_prompt(&INCLINE.chars().take(100).collect::<String>())
        );
    }

    #[tokio::test]
    async fn test_solution_failure_fails_problem() {
        let fixture = Fixture::new(
            ScriptedTextGenerator::new(vec![Err(GatewayError::RequestFailed("HTTP 429".to_string()))]),
            ScriptedImageGenerator::ok("https://images.example/x.png"),
        );
        let submitted = fixture.use_case().submit(SolveProblemInput::new(INCLINE)).await.unwrap();
        let id = submitted.problem.id;

        let error = submitted.handle.wait().await.unwrap_err();
        assert_eq!(error.failed_step(), Some(GenerationStep::Solution));

        let stored = fixture.repository.stored_problem(id);
        assert_eq!(stored.status, ContentStatus::Failed);
        assert!(stored.solution.is_none());
        assert!(fixture.image.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_diagram_failure_still_solves() {
        let fixture = Fixture::new(
            ScriptedTextGenerator::new(vec![Ok("v = 7 m/s".to_string())]),
            ScriptedImageGenerator::failing(GatewayError::Timeout),
        );
        let logger = Arc::new(RecordingLogger::default());
        let submitted = fixture
            .use_case()
            .with_generation_logger(logger.clone())
            .submit(SolveProblemInput::new(INCLINE))
            .await
            .unwrap();
        let id = submitted.problem.id;

        assert_eq!(submitted.handle.wait().await.unwrap(), ContentStatus::Completed);
        assert!(fixture.repository.stored_problem(id).diagram_url.is_none());

        let events = logger.events.lock().unwrap();
        let (kind, finished) = events.last().unwrap();
        assert_eq!(*kind, "finished");
        assert_eq!(finished["problem_id"], id.value());
        assert_eq!(finished["steps"], 1);
    }

    #[tokio::test]
    async fn test_cancel_fails_problem() {
        let fixture = Fixture::new(
            ScriptedTextGenerator::new(vec![Ok("late".to_string())])
                .with_delay(Duration::from_secs(30)),
            ScriptedImageGenerator::ok("https://images.example/x.png"),
        );
        let submitted = fixture.use_case().submit(SolveProblemInput::new(INCLINE)).await.unwrap();
        let id = submitted.problem.id;

        submitted.handle.cancel();
        assert!(submitted.handle.wait().await.unwrap_err().is_cancelled());
        assert_eq!(fixture.repository.stored_problem(id).status, ContentStatus::Failed);
    }

    #[tokio::test]
    async fn test_short_problem_creates_nothing() {
        let fixture = solved("unused");
        let result = fixture.use_case().submit(SolveProblemInput::new("v = d/t")).await;

        assert!(matches!(result, Err(GenerateContentError::InvalidProblem(_))));
        assert_eq!(fixture.repository.problem_count(), 0);
    }
}
