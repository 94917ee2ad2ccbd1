use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::ServerState;

pub mod prompts;
pub mod todo;

/// JSON framing on top of the worst-case escaped width per character (`\u0001`).
const BODY_OVERHEAD: usize = 64 * 1024;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}

/// Request body cap derived from the content limit.
pub fn body_limit(max_content_chars: usize) -> usize {
    max_content_chars.saturating_mul(6).saturating_add(BODY_OVERHEAD)
}

/// Build the full application router
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let limit = body_limit(state.todo.settings().max_content_chars);

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics));

    let todo_routes = Router::new()
        .route(
            "/todo",
            get(todo::read_todo).put(todo::write_todo).delete(todo::clear_todo),
        )
        .route("/sessions", get(todo::list_sessions))
        .route("/instructions", get(prompts::instructions))
        .route("/prompts", get(prompts::list_prompts))
        .route("/prompts/:name", get(prompts::get_prompt))
        .layer(DefaultBodyLimit::max(limit));

    public
        .merge(todo_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
