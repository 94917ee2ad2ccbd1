use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use service::todo::prompts::{self, Prompt, SERVER_INSTRUCTIONS, TODO_TASK_PROMPT};

use crate::errors::JsonApiError;
use crate::routes::todo::SessionQuery;
use crate::state::ServerState;

pub async fn instructions() -> &'static str {
    SERVER_INSTRUCTIONS
}

pub async fn list_prompts() -> Json<Vec<Prompt>> {
    Json(prompts::prompts())
}

/// Render a prompt by name with the current list of the given session
pub async fn get_prompt(
    State(state): State<ServerState>,
    Path(name): Path<String>,
    Query(q): Query<SessionQuery>,
) -> Result<String, JsonApiError> {
    if name != TODO_TASK_PROMPT {
        return Err(JsonApiError::new(
            StatusCode::NOT_FOUND,
            "Not Found",
            Some(format!("unknown prompt {name}")),
        ));
    }
    Ok(state.todo.task_prompt(q.session.as_deref()).await)
}
