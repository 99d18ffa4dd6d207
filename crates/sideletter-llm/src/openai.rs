//! OpenAI Provider Implementation
//!
//! Answer synthesis through an OpenAI-compatible chat completions API.
//!
//! # Features
//!
//! - Async HTTP communication with `/chat/completions`
//! - Configurable base URL, model, temperature and output cap
//! - Timeout handling (a timed-out call is reported as unavailable)
//!
//! # Examples
//!
//! ```no_run
//! use sideletter_llm::{OpenAiGenerator, DEFAULT_BASE_URL};
//! use std::time::Duration;
//!
//! let generator = OpenAiGenerator::from_env(DEFAULT_BASE_URL, Duration::from_secs(120))
//!     .expect("client builds")
//!     .with_model("gpt-4o");
//! ```

use crate::prompt::{build_messages, ChatMessage};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sideletter_domain::{AnswerGenerator, BackendError};
use std::time::Duration;
use tracing::debug;

/// Default OpenAI API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default chat model
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default output cap in tokens
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default timeout for generation requests (120 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

const BACKEND: &str = "generation";

/// OpenAI chat completions generator
pub struct OpenAiGenerator {
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

/// Request body for the chat completions API
#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

/// Response from the chat completions API
#[derive(Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl OpenAiGenerator {
    /// Create a new generator with default model settings
    ///
    /// # Parameters
    ///
    /// - `base_url`: API root (e.g., "https://api.openai.com/v1")
    /// - `api_key`: bearer token; `None` or empty leaves the adapter unconfigured
    /// - `timeout`: per-request timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                BackendError::unavailable(BACKEND, format!("Failed to build client: {}", e))
            })?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            client,
        })
    }

    /// Create a generator whose key is read from `OPENAI_API_KEY`
    pub fn from_env(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        Self::new(base_url, std::env::var(API_KEY_ENV).ok(), timeout)
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the output cap
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Model this generator requests
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl AnswerGenerator for OpenAiGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        context_block: &str,
        question: &str,
    ) -> Result<String, BackendError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| BackendError::MissingCredentials(API_KEY_ENV.to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatCompletionRequest {
            model: &self.model,
            messages: build_messages(system_prompt, context_block, question),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| BackendError::unavailable(BACKEND, format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(BackendError::unavailable(
                BACKEND,
                format!("HTTP {}: {}", status, error_text),
            ));
        }

        let completion = response.json::<ChatCompletionResponse>().await.map_err(|e| {
            BackendError::unavailable(BACKEND, format!("Failed to parse response: {}", e))
        })?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| BackendError::EmptyContent(BACKEND.to_string()))?;

        debug!("Generated {} chars with {}", answer.chars().count(), self.model);
        Ok(answer)
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}
