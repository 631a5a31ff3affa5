use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Minimum number of characters left after trimming before a text is worth
/// sending to the model.
pub const MIN_TEXT_CHARS: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct QuizRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuizQuestion {
    pub fn is_true_false(&self) -> bool {
        self.options.len() == 2 && self.options[0] == "True" && self.options[1] == "False"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub field: String,
    pub issue: String,
}

/// Returns the raw, untrimmed text when it is long enough to extract from.
pub fn validate_request(request: &QuizRequest) -> Result<&str, ValidationIssue> {
    match request.text.as_deref() {
        Some(text) if text.trim().chars().count() >= MIN_TEXT_CHARS => Ok(text),
        Some(_) => Err(ValidationIssue {
            field: "text".into(),
            issue: format!("must contain at least {MIN_TEXT_CHARS} characters"),
        }),
        None => Err(ValidationIssue {
            field: "text".into(),
            issue: "is required".into(),
        }),
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("The 'questions' key is missing or is not a list in the AI response.")]
    MissingQuestions,
}

/// Pulls the `questions` list out of the model's JSON reply. Items are
/// returned as the model wrote them.
pub fn parse_questions(content: &str) -> Result<Vec<Value>, ParseError> {
    let mut reply: Value = serde_json::from_str(content)?;
    match reply.get_mut("questions").map(Value::take) {
        Some(Value::Array(items)) => Ok(items),
        _ => Err(ParseError::MissingQuestions),
    }
}

/// Checks each item against the question shape the prompt asks for. The
/// result is informational; callers still return the items untouched.
pub fn question_shape_issues(items: &[Value]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    for (i, item) in items.iter().enumerate() {
        let question: QuizQuestion = match QuizQuestion::deserialize(item) {
            Ok(q) => q,
            Err(e) => {
                issues.push(ValidationIssue {
                    field: format!("questions[{i}]"),
                    issue: format!("does not match question shape: {e}"),
                });
                continue;
            }
        };
        if question.question.trim().is_empty() {
            issues.push(ValidationIssue {
                field: format!("questions[{i}].question"),
                issue: "must not be empty".into(),
            });
        }
        if question.options.len() != 4 && !question.is_true_false() {
            issues.push(ValidationIssue {
                field: format!("questions[{i}].options"),
                issue: "must hold four options or exactly [\"True\", \"False\"]".into(),
            });
        }
        if !question.options.iter().any(|o| *o == question.answer) {
            issues.push(ValidationIssue {
                field: format!("questions[{i}].answer"),
                issue: "must match one of the options".into(),
            });
        }
    }
    issues
}
