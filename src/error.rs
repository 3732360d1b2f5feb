use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::validation::ValidationErrors;

/// Failures a handler reports to the client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// 422 with `{"errors": {field: [messages]}}`.
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),
    /// 404 with `{"message": ..}`.
    #[error("{0}")]
    NotFound(&'static str),
    /// 500. The cause is logged, never sent.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "errors": errors })),
            )
                .into_response(),
            ApiError::NotFound(message) => {
                (StatusCode::NOT_FOUND, Json(json!({ "message": message }))).into_response()
            }
            ApiError::Internal(e) => {
                error!(error = ?e, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": "Server Error" })),
                )
                    .into_response()
            }
        }
    }
}
