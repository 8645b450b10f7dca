//! HTTP API
//!
//! JSON endpoints over the same use cases the CLI drives:
//!
//! | Method | Path | |
//! |--------|------|-|
//! | `POST` | `/api/content` | submit a topic, `202` with the new id |
//! | `GET` | `/api/content/:id` | one record, `404` when unknown |
//! | `GET` | `/api/users/:owner/content` | owner history, newest first |
//! | `GET` | `/api/topics` | catalog, `?q=` search or `?category=` filter |
//! | `POST` | `/api/problems` | submit a problem, `202` with the new id |
//! | `GET` | `/api/problems/:id` | problem and solution, `404` when unknown |
//! | `GET` | `/api/users/:owner/problems` | owner's problems, newest first |
//! | `POST` | `/api/problems/:id/bookmark` | toggle the bookmark |
//! | `GET` | `/api/problems/:id/hints` | up to four hints |
//! | `POST` | `/api/render` | markdown to display blocks |
//!
//! Runs started by a request outlive it. [`serve`] cancels the unfinished
//! ones after the listener stops, so no record is left `generating`.

pub mod handlers;

use axum::{
    Router,
    routing::{get, post},
};
use octophyx_application::{
    ContentQueryUseCase, GenerateContentUseCase, GenerationTracker, ProblemHintsUseCase,
    ProblemQueryUseCase, SolveProblemUseCase,
};
use octophyx_domain::TopicCatalog;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared state for the request handlers
pub struct ApiState {
    pub generate: GenerateContentUseCase,
    pub query: ContentQueryUseCase,
    pub solve: SolveProblemUseCase,
    pub problems: ProblemQueryUseCase,
    pub hints: ProblemHintsUseCase,
    pub catalog: TopicCatalog,
    /// Generation runs started by requests
    pub tracker: GenerationTracker,
}

impl ApiState {
    pub fn new(
        generate: GenerateContentUseCase,
        query: ContentQueryUseCase,
        solve: SolveProblemUseCase,
        problems: ProblemQueryUseCase,
        hints: ProblemHintsUseCase,
    ) -> Self {
        Self {
            generate,
            query,
            solve,
            problems,
            hints,
            catalog: TopicCatalog::builtin(),
            tracker: GenerationTracker::new(),
        }
    }
}

pub fn create_router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/content", post(handlers::create_content))
        .route("/api/content/:id", get(handlers::get_content))
        .route("/api/users/:owner/content", get(handlers::owner_history))
        .route("/api/problems", post(handlers::create_problem))
        .route("/api/problems/:id", get(handlers::get_problem))
        .route("/api/problems/:id/bookmark", post(handlers::toggle_bookmark))
        .route("/api/problems/:id/hints", get(handlers::problem_hints))
        .route("/api/users/:owner/problems", get(handlers::owner_problems))
        .route("/api/topics", get(handlers::list_topics))
        .route("/api/render", post(handlers::render_markdown))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the API on `listener` until `shutdown` is cancelled, then cancel
/// and await the generation runs still in flight.
pub async fn serve(
    listener: TcpListener,
    state: Arc<ApiState>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "HTTP API listening");
    }
    let result = axum::serve(listener, create_router(state.clone()))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await;

    let cancelled = state.tracker.shutdown().await;
    info!(cancelled, "Generation runs drained");
    result
}
