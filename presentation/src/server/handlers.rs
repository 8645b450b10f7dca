//! Request handlers for the HTTP API

use super::ApiState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use octophyx_application::{
    GenerateContentError, GenerateContentInput, QueryContentError, QueryProblemError,
    SolveProblemInput,
};
use octophyx_domain::{
    ContentId, ContentRequest, ContentStatus, DisplayBlock, DomainError, OwnerId, PhysicsTopic,
    ProblemId, ProblemSolution, TopicCategory,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{info, warn};

/// Error body returned by every handler: `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// The text or image provider failed
    BadGateway(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            ApiError::BadGateway(message) => (StatusCode::BAD_GATEWAY, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<GenerateContentError> for ApiError {
    fn from(error: GenerateContentError) -> Self {
        if error.is_invalid_input() {
            return ApiError::BadRequest(error.to_string());
        }
        warn!(error = %error, "Submission failed");
        ApiError::Internal(error.to_string())
    }
}

impl From<QueryContentError> for ApiError {
    fn from(error: QueryContentError) -> Self {
        warn!(error = %error, "Content query failed");
        ApiError::Internal(error.to_string())
    }
}

impl From<QueryProblemError> for ApiError {
    fn from(error: QueryProblemError) -> Self {
        warn!(error = %error, "Problem query failed");
        match error {
            QueryProblemError::Hints(_) => ApiError::BadGateway(error.to_string()),
            QueryProblemError::Storage(_) => ApiError::Internal(error.to_string()),
        }
    }
}

fn parse_category(category: Option<String>) -> Result<Option<TopicCategory>, ApiError> {
    category
        .map(|c| c.parse())
        .transpose()
        .map_err(|e: DomainError| ApiError::BadRequest(e.to_string()))
}

fn problem_not_found(id: ProblemId) -> ApiError {
    ApiError::NotFound(format!("Problem {} not found", id))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContentBody {
    pub topic: String,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedContent {
    pub content_id: ContentId,
    pub status: ContentStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProblemBody {
    pub problem_text: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub user_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProblem {
    pub problem_id: ProblemId,
    pub status: ContentStatus,
}

#[derive(Debug, Serialize)]
pub struct ProblemHints {
    pub hints: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TopicsQuery {
    pub q: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenderBody {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct RenderedContent {
    pub blocks: Vec<DisplayBlock>,
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Submit a topic. Generation continues after the response is sent.
pub async fn create_content(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<CreateContentBody>,
) -> Result<(StatusCode, Json<CreatedContent>), ApiError> {
    let input = GenerateContentInput::new(body.topic).with_owner(body.user_id.map(OwnerId::new));
    let submitted = state.generate.submit(input).await?;

    info!(content_id = %submitted.request.id, "Accepted content request");
    let created = CreatedContent {
        content_id: submitted.request.id,
        status: submitted.request.status,
    };
    state.tracker.track(submitted.handle);
    Ok((StatusCode::ACCEPTED, Json(created)))
}

pub async fn get_content(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<ContentRequest>, ApiError> {
    let id = ContentId::new(id);
    state
        .query
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Content request {} not found", id)))
}

pub async fn owner_history(
    State(state): State<Arc<ApiState>>,
    Path(owner): Path<i64>,
) -> Result<Json<Vec<ContentRequest>>, ApiError> {
    Ok(Json(state.query.history(OwnerId::new(owner)).await?))
}

/// Submit a problem. Solving continues after the response is sent.
pub async fn create_problem(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<CreateProblemBody>,
) -> Result<(StatusCode, Json<CreatedProblem>), ApiError> {
    let input = SolveProblemInput::new(body.problem_text)
        .with_category(parse_category(body.category)?)
        .with_owner(body.user_id.map(OwnerId::new));
    let submitted = state.solve.submit(input).await?;

    info!(problem_id = %submitted.problem.id, "Accepted problem");
    let created = CreatedProblem {
        problem_id: submitted.problem.id,
        status: submitted.problem.status,
    };
    state.tracker.track(submitted.handle);
    Ok((StatusCode::ACCEPTED, Json(created)))
}

pub async fn get_problem(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProblemSolution>, ApiError> {
    let id = ProblemId::new(id);
    state
        .problems
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| problem_not_found(id))
}

pub async fn owner_problems(
    State(state): State<Arc<ApiState>>,
    Path(owner): Path<i64>,
) -> Result<Json<Vec<ProblemSolution>>, ApiError> {
    Ok(Json(state.problems.history(OwnerId::new(owner)).await?))
}

pub async fn toggle_bookmark(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProblemSolution>, ApiError> {
    let id = ProblemId::new(id);
    state
        .problems
        .toggle_bookmark(id)
        .await?
        .map(Json)
        .ok_or_else(|| problem_not_found(id))
}

pub async fn problem_hints(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<ProblemHints>, ApiError> {
    let id = ProblemId::new(id);
    state
        .hints
        .hints(id)
        .await?
        .map(|hints| Json(ProblemHints { hints }))
        .ok_or_else(|| problem_not_found(id))
}

/// `?q=` searches, `?category=` filters, neither lists everything.
pub async fn list_topics(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<TopicsQuery>,
) -> Result<Json<Vec<PhysicsTopic>>, ApiError> {
    let topics: Vec<PhysicsTopic> = match (query.q, query.category) {
        (Some(q), _) => state.catalog.search(&q).into_iter().cloned().collect(),
        (None, Some(category)) => {
            let category: TopicCategory = category
                .parse()
                .map_err(|e: DomainError| ApiError::BadRequest(e.to_string()))?;
            state
                .catalog
                .by_category(category)
                .into_iter()
                .cloned()
                .collect()
        }
        (None, None) => state.catalog.all().to_vec(),
    };
    Ok(Json(topics))
}

pub async fn render_markdown(Json(body): Json<RenderBody>) -> Json<RenderedContent> {
    Json(RenderedContent {
        blocks: octophyx_domain::render(&body.content),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::create_router;
    use async_trait::async_trait;
    use octophyx_application::{
        ContentQueryUseCase, GatewayError, GenerateContentUseCase, GeneratedImage,
        ImageGenerator, ProblemHintsUseCase, ProblemQueryUseCase, SolveProblemUseCase,
        TextGenerator, TextPrompt,
    };
    use octophyx_infrastructure::{InMemoryContentRepository, InMemoryProblemRepository};
    use std::time::Duration;

    const PENDULUM: &str = "A 2 m pendulum swings with small amplitude. Find its period.";

    /// Replies with the user prompt after `delay`
    struct EchoText {
        delay: Duration,
    }

    #[async_trait]
    impl TextGenerator for EchoText {
        async fn generate_text(&self, prompt: &TextPrompt) -> Result<String, GatewayError> {
            tokio::time::sleep(self.delay).await;
            Ok(prompt.user.clone())
        }
    }

    struct NoImage;

    #[async_trait]
    impl ImageGenerator for NoImage {
        async fn generate_image(&self, _prompt: &str) -> Result<GeneratedImage, GatewayError> {
            Err(GatewayError::NotConfigured("no image provider".to_string()))
        }
    }

    fn state_with_delay(delay: Duration) -> Arc<ApiState> {
        let content = Arc::new(InMemoryContentRepository::new());
        let problems = Arc::new(InMemoryProblemRepository::new());
        let text = Arc::new(EchoText { delay });
        let image = Arc::new(NoImage);
        Arc::new(ApiState::new(
            GenerateContentUseCase::new(content.clone(), text.clone(), image.clone()),
            ContentQueryUseCase::new(content),
            SolveProblemUseCase::new(problems.clone(), text.clone(), image),
            ProblemQueryUseCase::new(problems.clone()),
            ProblemHintsUseCase::new(problems, text),
        ))
    }

    fn state() -> Arc<ApiState> {
        state_with_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn test_router_builds() {
        let _router = create_router(state());
    }

    #[tokio::test]
    async fn test_create_then_get_content() {
        let state = state();
        let (status, Json(created)) = create_content(
            State(state.clone()),
            Json(CreateContentBody {
                topic: "Hooke's Law".to_string(),
                user_id: Some(4),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(created.status, ContentStatus::Generating);

        let Json(record) = get_content(State(state.clone()), Path(created.content_id.value()))
            .await
            .unwrap();
        assert_eq!(record.topic.as_str(), "Hooke's Law");

        let Json(history) = owner_history(State(state.clone()), Path(4)).await.unwrap();
        assert_eq!(history.len(), 1);
        state.tracker.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_fails_in_flight_requests() {
        let state = state_with_delay(Duration::from_secs(30));
        let (_, Json(content)) = create_content(
            State(state.clone()),
            Json(CreateContentBody {
                topic: "Hooke's Law".to_string(),
                user_id: None,
            }),
        )
        .await
        .unwrap();
        let (_, Json(problem)) = create_problem(
            State(state.clone()),
            Json(CreateProblemBody {
                problem_text: PENDULUM.to_string(),
                category: None,
                user_id: None,
            }),
        )
        .await
        .unwrap();
        assert_eq!(state.tracker.in_flight(), 2);

        assert_eq!(state.tracker.shutdown().await, 2);

        let Json(record) = get_content(State(state.clone()), Path(content.content_id.value()))
            .await
            .unwrap();
        assert_eq!(record.status, ContentStatus::Failed);
        let Json(solution) = get_problem(State(state), Path(problem.problem_id.value()))
            .await
            .unwrap();
        assert_eq!(solution.status, ContentStatus::Failed);
    }

    #[tokio::test]
    async fn test_blank_topic_is_bad_request() {
        let error = create_content(
            State(state()),
            Json(CreateContentBody {
                topic: "   ".to_string(),
                user_id: None,
            }),
        )
        .await
        .unwrap_err();

        assert!(matches!(error, ApiError::BadRequest(_)));
        assert_eq!(error.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_content_is_not_found() {
        let error = get_content(State(state()), Path(404)).await.unwrap_err();
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_problem_lifecycle_over_handlers() {
        let state = state();
        let (status, Json(created)) = create_problem(
            State(state.clone()),
            Json(CreateProblemBody {
                problem_text: PENDULUM.to_string(),
                category: Some("mechanics".to_string()),
                user_id: Some(6),
            }),
        )
        .await
        .unwrap();
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(created.status, ContentStatus::Generating);
        let id = created.problem_id.value();

        state.tracker.shutdown().await;

        let Json(bookmarked) = toggle_bookmark(State(state.clone()), Path(id)).await.unwrap();
        assert!(bookmarked.bookmarked);

        let Json(history) = owner_problems(State(state.clone()), Path(6)).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].category, Some(TopicCategory::Mechanics));

        // The echo generator answers with the prompt itself
        let Json(hints) = problem_hints(State(state), Path(id)).await.unwrap();
        assert_eq!(
            hints.hints,
            vec!["Provide hints for solving this physics problem:", PENDULUM]
        );
    }

    #[tokio::test]
    async fn test_problem_validation_and_missing_ids() {
        let short = create_problem(
            State(state()),
            Json(CreateProblemBody {
                problem_text: "F = ma".to_string(),
                category: None,
                user_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(short, ApiError::BadRequest(_)));

        let bad_category = create_problem(
            State(state()),
            Json(CreateProblemBody {
                problem_text: PENDULUM.to_string(),
                category: Some("alchemy".to_string()),
                user_id: None,
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(bad_category, ApiError::BadRequest(_)));

        for error in [
            get_problem(State(state()), Path(9)).await.unwrap_err(),
            toggle_bookmark(State(state()), Path(9)).await.unwrap_err(),
            problem_hints(State(state()), Path(9)).await.unwrap_err(),
        ] {
            assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
        }
    }

    #[tokio::test]
    async fn test_topics_search_and_filter() {
        let Json(found) = list_topics(
            State(state()),
            Query(TopicsQuery {
                q: Some("refraction".to_string()),
                category: None,
            }),
        )
        .await
        .unwrap();
        assert!(found.iter().any(|t| t.name == "Snell's Law"));

        let Json(optics) = list_topics(
            State(state()),
            Query(TopicsQuery {
                q: None,
                category: Some("optics".to_string()),
            }),
        )
        .await
        .unwrap();
        assert_eq!(optics.len(), 3);

        let error = list_topics(
            State(state()),
            Query(TopicsQuery {
                q: None,
                category: Some("alchemy".to_string()),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(error, ApiError::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_render_returns_blocks() {
        let Json(rendered) = render_markdown(Json(RenderBody {
            content: "# Title\n\n$$E = mc^2$$".to_string(),
        }))
        .await;
        assert_eq!(rendered.blocks.len(), 2);
        assert_eq!(rendered.blocks[1].kind(), "block_math");
    }

    #[test]
    fn test_created_json_shapes() {
        let body = serde_json::to_value(CreatedContent {
            content_id: ContentId::new(12),
            status: ContentStatus::Generating,
        })
        .unwrap();
        assert_eq!(body, json!({ "contentId": 12, "status": "generating" }));

        let body = serde_json::to_value(CreatedProblem {
            problem_id: ProblemId::new(3),
            status: ContentStatus::Generating,
        })
        .unwrap();
        assert_eq!(body, json!({ "problemId": 3, "status": "generating" }));
    }

    #[test]
    fn test_hint_failure_is_bad_gateway() {
        let error = ApiError::from(QueryProblemError::Hints(GatewayError::Timeout));
        assert_eq!(error.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
