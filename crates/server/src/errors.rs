use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;

/// JSON error body: `{"error": ..., "detail": ..., "code": ...}`.
#[derive(Debug)]
pub struct JsonApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub detail: Option<String>,
    pub code: Option<u16>,
    /// Set for write-path failures where memory changed but disk did not.
    pub persisted: Option<bool>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, error: &'static str, detail: Option<String>) -> Self {
        Self { status, error, detail, code: None, persisted: None }
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = Some(e.code());
        let mut api = match &e {
            ServiceError::Validation(msg) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, "Validation Error", Some(msg.clone()))
            }
            ServiceError::Persist { .. } => {
                let mut api = JsonApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Persist Error",
                    Some(format!("{e}; the new content is held in memory")),
                );
                api.persisted = Some(false);
                api
            }
            ServiceError::Decode { .. } | ServiceError::Load { .. } => JsonApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                Some(e.to_string()),
            ),
        };
        api.code = code;
        api
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        let mut body = serde_json::json!({ "error": self.error });
        if let Some(detail) = self.detail {
            body["detail"] = detail.into();
        }
        if let Some(code) = self.code {
            body["code"] = code.into();
        }
        if let Some(persisted) = self.persisted {
            body["persisted"] = persisted.into();
        }
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("storage initialization failed: {0}")]
    Storage(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
