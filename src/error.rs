use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Message returned to clients for any internal failure
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request";

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream returned a malformed payload: {0}")]
    UpstreamMalformed(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// True for failures caused by an upstream collaborator rather than the caller
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            AppError::UpstreamUnavailable(_) | AppError::UpstreamMalformed(_) | AppError::Http(_)
        )
    }

    /// Attaches the error detail to the 500 body, for non-production deployments
    pub fn with_details(self, expose: bool) -> ErrorResponse {
        ErrorResponse {
            error: self,
            expose_details: expose,
        }
    }
}

/// An [`AppError`] paired with the decision whether to echo its detail
#[derive(Debug)]
pub struct ErrorResponse {
    error: AppError,
    expose_details: bool,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        error.with_details(false)
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let (status, body) = match self.error {
            AppError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            other => {
                tracing::error!(error = %other, upstream = other.is_upstream(), "Request failed");

                let body = if self.expose_details {
                    json!({ "error": GENERIC_ERROR_MESSAGE, "details": other.to_string() })
                } else {
                    json!({ "error": GENERIC_ERROR_MESSAGE })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, body)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        ErrorResponse::from(self).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
