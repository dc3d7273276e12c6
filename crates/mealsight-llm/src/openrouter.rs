//! OpenRouter Provider Implementation
//!
//! Provides integration with an OpenRouter-compatible chat-completions API
//! for vision/text analysis, and a Whisper-shaped transcription endpoint
//! for speech.
//!
//! # Features
//!
//! - Async HTTP communication
//! - Configurable endpoint, model, and API key
//! - Retry logic with exponential backoff for transient failures
//! - Timeout handling
//!
//! # Examples
//!
//! ```no_run
//! use mealsight_llm::OpenRouterProvider;
//!
//! let provider = OpenRouterProvider::new(
//!     "https://openrouter.ai/api/v1",
//!     "sk-or-...",
//!     "google/gemini-2.0-flash-exp:free",
//! );
//! ```

use crate::{ChatProvider, ChatRequest, LlmError, Transcriber};
use async_trait::async_trait;
use base64::Engine;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Default OpenRouter API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://openrouter.ai/api/v1";

/// Default timeout for capability requests (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retry attempts
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default transcription model
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-large-v3";

/// OpenRouter-compatible API provider
#[derive(Clone)]
pub struct OpenRouterProvider {
    endpoint: String,
    api_key: String,
    model: String,
    transcription_model: String,
    client: reqwest::Client,
    max_retries: u32,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    text: String,
}

impl OpenRouterProvider {
    /// Create a new provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: API base URL (e.g., "https://openrouter.ai/api/v1")
    /// - `api_key`: bearer token; an empty key marks the capability as
    ///   unconfigured
    /// - `model`: chat model identifier
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
            transcription_model: DEFAULT_TRANSCRIPTION_MODEL.to_string(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Create a provider against the default endpoint
    pub fn default_endpoint(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::new(DEFAULT_ENDPOINT, api_key, model)
    }

    /// Set the maximum number of retry attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Override the transcription model
    pub fn with_transcription_model(mut self, model: impl Into<String>) -> Self {
        self.transcription_model = model.into();
        self
    }

    fn ensure_configured(&self) -> Result<(), LlmError> {
        if self.api_key.is_empty() {
            return Err(LlmError::Unconfigured("api key not set".to_string()));
        }
        Ok(())
    }

    fn user_content(request: &ChatRequest) -> serde_json::Value {
        match &request.image_jpeg {
            Some(image) => {
                let encoded = base64::engine::general_purpose::STANDARD.encode(image);
                json!([
                    {"type": "text", "text": request.user},
                    {"type": "image_url", "image_url": {
                        "url": format!("data:image/jpeg;base64,{}", encoded)
                    }}
                ])
            }
            None => json!(request.user),
        }
    }
}

#[async_trait]
impl ChatProvider for OpenRouterProvider {
    async fn complete(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.ensure_configured()?;

        let url = format!("{}/chat/completions", self.endpoint);
        let payload = json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": request.system},
                {"role": "user", "content": Self::user_content(&request)}
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let mut attempts = 0;
        let mut last_error = None;

        while attempts < self.max_retries {
            match self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&payload)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: ChatCompletionResponse =
                            response.json().await.map_err(|e| {
                                LlmError::InvalidResponse(format!(
                                    "Failed to parse response: {}",
                                    e
                                ))
                            })?;
                        return body
                            .choices
                            .into_iter()
                            .next()
                            .map(|choice| choice.message.content)
                            .ok_or_else(|| {
                                LlmError::InvalidResponse("No choices in response".to_string())
                            });
                    } else if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.model.clone()));
                    } else {
                        let error_text = response.text().await.unwrap_or_default();
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(e.to_string()));
                }
            }

            attempts += 1;
            if attempts < self.max_retries {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }
}

#[async_trait]
impl Transcriber for OpenRouterProvider {
    async fn transcribe(&self, audio: &[u8], language_hint: &str) -> Result<String, LlmError> {
        self.ensure_configured()?;

        let url = format!("{}/audio/transcriptions", self.endpoint);
        let part = reqwest::multipart::Part::bytes(audio.to_vec())
            .file_name("audio.mp3")
            .mime_str("audio/mpeg")
            .map_err(|e| LlmError::Other(e.to_string()))?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("model", self.transcription_model.clone())
            .text("language", language_hint.to_string())
            .text("response_format", "json");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| LlmError::Communication(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(body.text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = OpenRouterProvider::new("https://example.test/v1", "key", "model-x");
        assert_eq!(provider.endpoint, "https://example.test/v1");
        assert_eq!(provider.model, "model-x");
        assert_eq!(provider.max_retries, DEFAULT_MAX_RETRIES);
    }

    #[test]
    fn test_default_endpoint() {
        let provider = OpenRouterProvider::default_endpoint("key", "model-x");
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_with_max_retries() {
        let provider =
            OpenRouterProvider::new("https://example.test/v1", "key", "m").with_max_retries(5);
        assert_eq!(provider.max_retries, 5);
    }

    #[tokio::test]
    async fn test_empty_api_key_is_unconfigured() {
        let provider = OpenRouterProvider::new("https://example.test/v1", "", "m");
        let result = provider
            .complete(ChatRequest::text("system", "user"))
            .await;
        assert!(matches!(result, Err(LlmError::Unconfigured(_))));

        let result = provider.transcribe(b"audio", "en").await;
        assert!(matches!(result, Err(LlmError::Unconfigured(_))));
    }

    #[test]
    fn test_user_content_with_image_is_multipart_array() {
        let request = ChatRequest::text("s", "look").with_image(vec![0xFF, 0xD8]);
        let content = OpenRouterProvider::user_content(&request);
        assert!(content.is_array());
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["type"], "image_url");
    }

    #[test]
    fn test_user_content_text_only_is_string() {
        let request = ChatRequest::text("s", "hello");
        let content = OpenRouterProvider::user_content(&request);
        assert_eq!(content, serde_json::json!("hello"));
    }
}
