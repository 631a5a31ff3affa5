use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde::Serialize;
use thiserror::Error;

pub const NOT_INITIALIZED_MESSAGE: &str = "OpenAI client not initialized. Check API key or server logs.";
pub const TEXT_TOO_SHORT_MESSAGE: &str = "النص المقدم قصير جدًا أو فارغ.";
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse the response from the AI.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Every failure the extraction endpoint can report. Each variant maps to a
/// fixed status and message; only `Upstream` and `Parse` expose their detail
/// to the caller.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("completion client is not initialized")]
    NotInitialized,
    #[error("text is missing or too short")]
    Validation,
    #[error("completion request failed: {0}")]
    Upstream(String),
    #[error("model reply could not be parsed: {0}")]
    Parse(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> ErrorBody {
        let (error, details) = match self {
            AppError::NotInitialized => (NOT_INITIALIZED_MESSAGE, None),
            AppError::Validation => (TEXT_TOO_SHORT_MESSAGE, None),
            AppError::Upstream(detail) => (INTERNAL_ERROR_MESSAGE, Some(detail.clone())),
            AppError::Parse(detail) => (PARSE_FAILURE_MESSAGE, Some(detail.clone())),
            AppError::Unexpected(_) => (INTERNAL_ERROR_MESSAGE, None),
        };
        ErrorBody {
            error: error.to_string(),
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
