//! OpenAI chat-completions client for city suggestions.
//!
//! See: <https://platform.openai.com/docs/api-reference/chat>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::prompt::city_prompt;
use super::{Message, SuggestionProvider};
use crate::{CitySuggestError, Result};

/// Default base URL for the OpenAI API
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Model settings for [`OpenAiClient`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpenAiConfig {
    /// Chat model (default: gpt-3.5-turbo).
    #[serde(default = "default_model")]
    pub model: String,
    /// API base URL, up to and including the version segment.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// Sampling temperature; provider default when unset.
    #[serde(default)]
    pub temperature: Option<f32>,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            temperature: None,
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Client for OpenAI chat completions.
#[derive(Clone)]
pub struct OpenAiClient {
    api_key: String,
    config: OpenAiConfig,
    http: Client,
}

impl OpenAiClient {
    /// Create a client with default model settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(api_key, OpenAiConfig::default())
    }

    /// Create a client with explicit settings (custom base URL for wiremock).
    pub fn with_config(api_key: impl Into<String>, config: OpenAiConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| CitySuggestError::Configuration(format!("HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            config,
            http,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send a chat completion and return the first choice's content.
    pub async fn complete(&self, messages: &[Message]) -> Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&ChatRequest {
                model: &self.config.model,
                messages,
                temperature: self.config.temperature,
            })
            .send()
            .await?;

        self.handle_response_errors(&response)?;

        let body: ChatResponse = response.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(CitySuggestError::EmptyResponse)
    }

    /// Check response status and map to appropriate error.
    fn handle_response_errors(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 => Err(CitySuggestError::AuthenticationFailed),
            404 => Err(CitySuggestError::ModelNotFound(self.config.model.clone())),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(CitySuggestError::RateLimited { retry_after })
            }
            code => Err(CitySuggestError::Api {
                status: code,
                message: format!("OpenAI API error: {}", status),
            }),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl SuggestionProvider for OpenAiClient {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(skip(self), fields(provider = "openai", model = %self.config.model))]
    async fn suggest(&self, query: &str, count: usize) -> Result<String> {
        self.complete(&city_prompt(query, count)).await
    }
}
