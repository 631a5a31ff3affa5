use futures::future::BoxFuture;
use std::sync::Arc;
use thiserror::Error;

/// Why the completion client could not be built at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} is not set")]
    MissingApiKey(&'static str),
    #[error("{0} is not a usable API key: {1}")]
    InvalidApiKey(&'static str, String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompletionError {
    #[error("{0}")]
    Upstream(String),
    #[error("completion reply contained no message content")]
    EmptyReply,
}

/// A chat model that answers with a single JSON object.
pub trait CompletionClient: Send + Sync {
    fn complete_json(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> BoxFuture<'static, Result<String, CompletionError>>;
}

#[derive(Clone)]
pub struct AppState {
    pub completion: Result<Arc<dyn CompletionClient>, ConfigError>,
}

impl AppState {
    pub fn new(completion: Result<Arc<dyn CompletionClient>, ConfigError>) -> Self {
        Self { completion }
    }

    pub fn completion_client(&self) -> Option<Arc<dyn CompletionClient>> {
        self.completion.as_ref().ok().map(Arc::clone)
    }
}
