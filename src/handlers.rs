use crate::error::AppError;
use crate::models::{parse_questions, question_shape_issues, validate_request, QuizRequest};
use crate::state::{AppState, CompletionError};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::Value;
use tracing::{error, info, warn};

pub const SYSTEM_PROMPT: &str = r#"Extract only MCQs explicitly present in the given text (no invention). Each question must have: question text, four options (or exactly ["True","False"] for boolean items), and an answer whose text matches one option verbatim. Output exactly `{"questions": [ {question, options, answer}, ... ]}`; empty list if none found; no extra text or markdown."#;

pub async fn home() -> &'static str {
    "Backend for PDF Quiz Generator is running!"
}

pub async fn generate_questions(
    State(state): State<AppState>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> Result<Json<Vec<Value>>, AppError> {
    let Some(client) = state.completion_client() else {
        return Err(AppError::NotInitialized);
    };

    let Json(request) = payload.map_err(|rejection| {
        error!("an unexpected error occurred while reading the request: {}", rejection.body_text());
        AppError::Unexpected(rejection.body_text())
    })?;

    let text = validate_request(&request).map_err(|issue| {
        warn!("rejected request: {} {}", issue.field, issue.issue);
        AppError::Validation
    })?;

    let content = client
        .complete_json(SYSTEM_PROMPT, text)
        .await
        .map_err(|err| match err {
            CompletionError::Upstream(detail) => {
                error!("completion request failed: {}", detail);
                AppError::Upstream(detail)
            }
            empty @ CompletionError::EmptyReply => {
                error!("an unexpected error occurred: {}", empty);
                AppError::Unexpected(empty.to_string())
            }
        })?;

    let questions = parse_questions(&content).map_err(|err| {
        error!("json parsing error: {}", err);
        error!("received response from API: {}", content);
        AppError::Parse(err.to_string())
    })?;

    for issue in question_shape_issues(&questions) {
        warn!("model returned a malformed question at {}: {}", issue.field, issue.issue);
    }
    info!("extracted {} questions", questions.len());

    Ok(Json(questions))
}
