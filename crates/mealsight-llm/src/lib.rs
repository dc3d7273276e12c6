//! Mealsight Capability Layer
//!
//! Pluggable providers for the external model capabilities the pipeline
//! consumes: vision/text chat completion and speech transcription.
//!
//! # Architecture
//!
//! This crate defines the [`ChatProvider`] and [`Transcriber`] traits and
//! ships two implementations of each:
//!
//! - `MockChatProvider` / `MockTranscriber`: deterministic mocks for testing
//! - `OpenRouterProvider`: OpenRouter-compatible HTTP API integration
//!
//! It also owns the shared [`json_repair`] routine used by every component
//! that parses structured data out of free-form model output.
//!
//! # Examples
//!
//! ```
//! use mealsight_llm::{ChatProvider, ChatRequest, MockChatProvider};
//!
//! # async fn example() {
//! let provider = MockChatProvider::new(r#"{"components": []}"#);
//! let reply = provider.complete(ChatRequest::text("system", "user")).await.unwrap();
//! assert_eq!(reply, r#"{"components": []}"#);
//! # }
//! ```

#![warn(missing_docs)]

pub mod json_repair;
pub mod openrouter;

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use openrouter::OpenRouterProvider;

/// Errors that can occur during capability calls
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Invalid response from the model
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// The optional credential for this capability is not configured.
    /// Callers treat this as a degraded input, not a failure.
    #[error("Capability not configured: {0}")]
    Unconfigured(String),

    /// Generic error
    #[error("Capability error: {0}")]
    Other(String),
}

/// One chat-completion request, optionally carrying a single image
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System instruction
    pub system: String,
    /// User instruction
    pub user: String,
    /// JPEG image bytes attached to the user turn, if any
    pub image_jpeg: Option<Vec<u8>>,
    /// Sampling temperature (near-zero for verification tasks)
    pub temperature: f32,
    /// Output length budget in tokens
    pub max_tokens: u32,
}

impl ChatRequest {
    /// Text-only request with near-deterministic sampling defaults
    pub fn text(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            image_jpeg: None,
            temperature: 0.1,
            max_tokens: 2000,
        }
    }

    /// Attach a JPEG image to the request
    pub fn with_image(mut self, image_jpeg: Vec<u8>) -> Self {
        self.image_jpeg = Some(image_jpeg);
        self
    }

    /// Override the output token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Trait for chat-completion capabilities (vision and text)
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Submit a request and return the model's free-form text reply
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError>;
}

/// Trait for speech transcription capabilities
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio buffer. An empty string means "nothing said"
    /// and is a valid result, not an error.
    async fn transcribe(&self, audio: &[u8], language_hint: &str) -> Result<String, LlmError>;
}

enum ScriptedReply {
    Reply(String),
    Error(String),
}

/// Mock chat provider for deterministic testing
///
/// Returns pre-configured responses in order without making any network
/// calls; falls back to a default response when the script runs out.
///
/// # Examples
///
/// ```
/// use mealsight_llm::{ChatProvider, ChatRequest, MockChatProvider};
///
/// # async fn example() {
/// let provider = MockChatProvider::new("default");
/// provider.push_response("first");
/// assert_eq!(provider.complete(ChatRequest::text("s", "u")).await.unwrap(), "first");
/// assert_eq!(provider.complete(ChatRequest::text("s", "u")).await.unwrap(), "default");
/// assert_eq!(provider.call_count(), 2);
/// # }
/// ```
#[derive(Clone)]
pub struct MockChatProvider {
    default_response: String,
    script: Arc<Mutex<VecDeque<ScriptedReply>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockChatProvider {
    /// Create a mock with a fixed response for all unscripted calls
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a specific response for the next call
    pub fn push_response(&self, response: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Reply(response.into()));
    }

    /// Queue an error for the next call
    pub fn push_error(&self, message: impl Into<String>) {
        self.script
            .lock()
            .unwrap()
            .push_back(ScriptedReply::Error(message.into()));
    }

    /// Get the number of times `complete` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockChatProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, _request: ChatRequest) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        match self.script.lock().unwrap().pop_front() {
            Some(ScriptedReply::Reply(response)) => Ok(response),
            Some(ScriptedReply::Error(message)) => Err(LlmError::Other(message)),
            None => Ok(self.default_response.clone()),
        }
    }
}

/// Mock transcriber for deterministic testing
#[derive(Clone)]
pub struct MockTranscriber {
    result: Arc<Mutex<Result<String, String>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockTranscriber {
    /// Create a mock returning a fixed transcript
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            result: Arc::new(Mutex::new(Ok(transcript.into()))),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock behaving like a deployment with no transcription
    /// credential
    pub fn unconfigured() -> Self {
        Self {
            result: Arc::new(Mutex::new(Err(String::new()))),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Get the number of times `transcribe` was called
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &[u8], _language_hint: &str) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;
        match &*self.result.lock().unwrap() {
            Ok(text) => Ok(text.clone()),
            Err(_) => Err(LlmError::Unconfigured("transcription".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_chat_default() {
        let provider = MockChatProvider::new("Test response");
        let result = provider.complete(ChatRequest::text("s", "u")).await;
        assert_eq!(result.unwrap(), "Test response");
    }

    #[tokio::test]
    async fn test_mock_chat_script_order() {
        let provider = MockChatProvider::default();
        provider.push_response("one");
        provider.push_response("two");

        assert_eq!(
            provider.complete(ChatRequest::text("s", "u")).await.unwrap(),
            "one"
        );
        assert_eq!(
            provider.complete(ChatRequest::text("s", "u")).await.unwrap(),
            "two"
        );
        assert_eq!(
            provider.complete(ChatRequest::text("s", "u")).await.unwrap(),
            "Default mock response"
        );
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_chat_error() {
        let provider = MockChatProvider::default();
        provider.push_error("boom");
        let result = provider.complete(ChatRequest::text("s", "u")).await;
        assert!(matches!(result, Err(LlmError::Other(_))));
    }

    #[tokio::test]
    async fn test_mock_chat_clone_shares_state() {
        let provider1 = MockChatProvider::new("test");
        let provider2 = provider1.clone();

        provider1.complete(ChatRequest::text("s", "u")).await.unwrap();

        assert_eq!(provider1.call_count(), 1);
        assert_eq!(provider2.call_count(), 1);
    }

    #[tokio::test]
    async fn test_mock_transcriber() {
        let transcriber = MockTranscriber::new("mashed potato 500 grams");
        let result = transcriber.transcribe(b"audio", "en").await.unwrap();
        assert_eq!(result, "mashed potato 500 grams");
        assert_eq!(transcriber.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unconfigured_transcriber() {
        let transcriber = MockTranscriber::unconfigured();
        let result = transcriber.transcribe(b"audio", "en").await;
        assert!(matches!(result, Err(LlmError::Unconfigured(_))));
    }

    #[test]
    fn test_chat_request_builder() {
        let request = ChatRequest::text("system", "user")
            .with_image(vec![1, 2, 3])
            .with_max_tokens(1500);
        assert_eq!(request.max_tokens, 1500);
        assert!(request.image_jpeg.is_some());
        assert!((request.temperature - 0.1).abs() < f32::EPSILON);
    }
}
