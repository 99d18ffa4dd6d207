//! Side Letter LLM Provider Layer
//!
//! Implementations of the `AnswerGenerator` trait from `sideletter-domain`.
//!
//! # Architecture
//!
//! The generator owns the conversation framing: a system turn carrying the
//! process-wide instruction and a single user turn embedding the assembled
//! context and the question (see [`prompt`]).
//!
//! # Providers
//!
//! - `MockGenerator`: Deterministic mock for testing
//! - `OpenAiGenerator`: OpenAI-compatible chat completions integration
//!
//! # Examples
//!
//! ```
//! use sideletter_llm::MockGenerator;
//! use sideletter_domain::AnswerGenerator;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let generator = MockGenerator::new("Hello from LLM!");
//! let answer = generator.generate("system", "context", "question").await.unwrap();
//! assert_eq!(answer, "Hello from LLM!");
//! # }
//! ```

#![warn(missing_docs)]

pub mod openai;
pub mod prompt;

use async_trait::async_trait;
use parking_lot::Mutex;
use sideletter_domain::{AnswerGenerator, BackendError};
use std::collections::HashMap;
use std::sync::Arc;

pub use openai::{
    OpenAiGenerator, API_KEY_ENV, DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL,
    DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
pub use prompt::{build_messages, load_system_prompt, ChatMessage, FALLBACK_SYSTEM_PROMPT};

/// A generation call observed by [`MockGenerator`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedGeneration {
    /// System instruction
    pub system_prompt: String,
    /// Assembled context block
    pub context_block: String,
    /// Question text
    pub question: String,
}

/// Mock generator for deterministic testing
///
/// Returns pre-configured answers without making any network calls.
///
/// # Examples
///
/// ```
/// use sideletter_llm::MockGenerator;
/// use sideletter_domain::AnswerGenerator;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut generator = MockGenerator::default();
/// generator.add_response("question1", "answer1");
/// assert_eq!(generator.generate("sys", "ctx", "question1").await.unwrap(), "answer1");
/// assert_eq!(generator.generate("sys", "ctx", "other").await.unwrap(), "Default mock answer");
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MockGenerator {
    default_response: String,
    responses: Arc<Mutex<HashMap<String, Result<String, BackendError>>>>,
    calls: Arc<Mutex<Vec<RecordedGeneration>>>,
}

impl MockGenerator {
    /// Create a new MockGenerator with a fixed answer for all questions
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            responses: Arc::new(Mutex::new(HashMap::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a specific answer for a given question
    pub fn add_response(&mut self, question: impl Into<String>, response: impl Into<String>) {
        self.responses
            .lock()
            .insert(question.into(), Ok(response.into()));
    }

    /// Configure to return an error for a specific question
    pub fn add_error(&mut self, question: impl Into<String>, error: BackendError) {
        self.responses.lock().insert(question.into(), Err(error));
    }

    /// Get the number of times generate was called
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every call received so far, oldest first
    pub fn calls(&self) -> Vec<RecordedGeneration> {
        self.calls.lock().clone()
    }
}

impl Default for MockGenerator {
    fn default() -> Self {
        Self::new("Default mock answer")
    }
}

#[async_trait]
impl AnswerGenerator for MockGenerator {
    async fn generate(
        &self,
        system_prompt: &str,
        context_block: &str,
        question: &str,
    ) -> Result<String, BackendError> {
        self.calls.lock().push(RecordedGeneration {
            system_prompt: system_prompt.to_string(),
            context_block: context_block.to_string(),
            question: question.to_string(),
        });

        match self.responses.lock().get(question) {
            Some(response) => response.clone(),
            None => Ok(self.default_response.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_generator_default() {
        let generator = MockGenerator::new("Test answer");
        let result = generator.generate("sys", "ctx", "any question").await;
        assert_eq!(result, Ok("Test answer".to_string()));
    }

    #[tokio::test]
    async fn test_mock_generator_specific_responses() {
        let mut generator = MockGenerator::default();
        generator.add_response("hello", "world");
        generator.add_response("foo", "bar");

        assert_eq!(generator.generate("s", "c", "hello").await.unwrap(), "world");
        assert_eq!(generator.generate("s", "c", "foo").await.unwrap(), "bar");
        assert_eq!(
            generator.generate("s", "c", "unknown").await.unwrap(),
            "Default mock answer"
        );
    }

    #[tokio::test]
    async fn test_mock_generator_records_calls() {
        let generator = MockGenerator::new("a");
        assert_eq!(generator.call_count(), 0);

        generator.generate("sys", "ctx", "q").await.unwrap();

        assert_eq!(generator.call_count(), 1);
        assert_eq!(
            generator.calls()[0],
            RecordedGeneration {
                system_prompt: "sys".to_string(),
                context_block: "ctx".to_string(),
                question: "q".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_mock_generator_error() {
        let mut generator = MockGenerator::default();
        generator.add_error("bad question", BackendError::EmptyContent("generation".to_string()));

        let result = generator.generate("s", "c", "bad question").await;
        assert!(matches!(result, Err(BackendError::EmptyContent(_))));
    }

    #[tokio::test]
    async fn test_mock_generator_clone() {
        let generator1 = MockGenerator::new("test");
        let generator2 = generator1.clone();

        generator1.generate("s", "c", "q").await.unwrap();

        // Both share the same call history due to Arc
        assert_eq!(generator1.call_count(), 1);
        assert_eq!(generator2.call_count(), 1);
    }
}
