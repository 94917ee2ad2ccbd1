use axum::{
    extract::{Query, State},
    Json,
};
use common::types::StatusMessage;
use serde::Deserialize;

use crate::errors::JsonApiError;
use crate::state::ServerState;

#[derive(Debug, Default, Deserialize)]
pub struct SessionQuery {
    #[serde(default)]
    pub session: Option<String>,
}

/// Body of `PUT /todo`; `content` is required, `session` optional.
#[derive(Debug, Deserialize)]
pub struct WriteRequest {
    #[serde(default)]
    pub session: Option<String>,
    pub content: String,
}

/// Current list as plain text
pub async fn read_todo(State(state): State<ServerState>, Query(q): Query<SessionQuery>) -> String {
    state.todo.read(q.session.as_deref()).await
}

/// Replace the whole list
pub async fn write_todo(
    State(state): State<ServerState>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<StatusMessage>, JsonApiError> {
    let status = state.todo.write(req.session.as_deref(), req.content).await?;
    Ok(Json(StatusMessage { status }))
}

/// Empty the list
pub async fn clear_todo(
    State(state): State<ServerState>,
    Query(q): Query<SessionQuery>,
) -> Result<Json<StatusMessage>, JsonApiError> {
    let status = state.todo.clear(q.session.as_deref()).await?;
    Ok(Json(StatusMessage { status }))
}

pub async fn list_sessions(State(state): State<ServerState>) -> Json<Vec<String>> {
    Json(state.todo.sessions().await)
}
