use crate::state::{CompletionClient, CompletionError, ConfigError};
use async_openai::{config::OpenAIConfig, Client};
use backoff::ExponentialBackoffBuilder;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const MODEL: &str = "gpt-4.1-mini";
pub const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub response_format: ResponseFormat,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResponseFormat {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

impl ChatCompletionRequest {
    pub fn json_object(system_prompt: &str, user_text: &str) -> Self {
        Self {
            model: MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_text.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat { kind: "json_object" },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatCompletionReply {
    #[serde(default)]
    pub choices: Vec<ReplyChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ReplyChoice {
    pub message: ReplyMessage,
}

#[derive(Debug, Deserialize)]
pub struct ReplyMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionReply {
    pub fn into_content(self) -> Option<String> {
        self.choices.into_iter().next()?.message.content
    }
}

#[derive(Clone)]
pub struct OpenAiCompletionClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiCompletionClient {
    pub fn from_api_key(api_key: Option<&str>) -> Result<Self, ConfigError> {
        let key = api_key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingApiKey(API_KEY_ENV))?;
        // The key travels in an Authorization header.
        if !key.chars().all(|c| c.is_ascii_graphic()) {
            return Err(ConfigError::InvalidApiKey(
                API_KEY_ENV,
                "contains characters not allowed in an HTTP header".into(),
            ));
        }
        Ok(Self::from_config(OpenAIConfig::new().with_api_key(key)))
    }

    /// Failed calls are returned as-is; a zero elapsed-time budget stops the
    /// backoff before any retry.
    pub fn from_config(config: OpenAIConfig) -> Self {
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        Self {
            client: Client::with_config(config).with_backoff(no_retry),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let key = std::env::var(API_KEY_ENV).ok();
        Self::from_api_key(key.as_deref())
    }
}

impl CompletionClient for OpenAiCompletionClient {
    fn complete_json(
        &self,
        system_prompt: &str,
        user_text: &str,
    ) -> BoxFuture<'static, Result<String, CompletionError>> {
        let client = self.client.clone();
        let request = ChatCompletionRequest::json_object(system_prompt, user_text);

        Box::pin(async move {
            let reply: ChatCompletionReply = client
                .chat()
                .create_byot(request)
                .await
                .map_err(|e| CompletionError::Upstream(e.to_string()))?;
            reply.into_content().ok_or(CompletionError::EmptyReply)
        })
    }
}

/// Builds the process-wide completion client from `OPENAI_API_KEY`.
pub fn init_completion_client() -> Result<Arc<dyn CompletionClient>, ConfigError> {
    let client = OpenAiCompletionClient::from_env()?;
    Ok(Arc::new(client))
}
