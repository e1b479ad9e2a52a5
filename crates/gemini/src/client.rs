//! HTTP client for Gemini `generateContent`.
//!
//! One request per prompt. No retries and no client-level timeout; callers
//! that need a deadline wrap the call themselves.

use async_trait::async_trait;
use mockview_core::generator::{GenerateError, TextGenerator};

use crate::api::{GenerateContentRequest, GenerateContentResponse, GenerationConfig};
use crate::config::GeminiConfig;

/// Header carrying the API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GeminiClient {
    config: GeminiConfig,
    client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: self.config.top_k,
            max_output_tokens: self.config.max_output_tokens,
            response_mime_type: "text/plain",
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateContentRequest::user_prompt(prompt, self.generation_config());

        let response = self
            .client
            .post(self.config.endpoint())
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerateError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!(status = status.as_u16(), model = %self.config.model, "Gemini request rejected");
            return Err(GenerateError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| GenerateError::Transport(format!("invalid response body: {e}")))?;

        if let Some(reason) = parsed.candidates.first().and_then(|c| c.finish_reason.as_deref()) {
            tracing::debug!(finish_reason = reason, model = %self.config.model, "Gemini reply received");
        }

        parsed.text().ok_or(GenerateError::EmptyResponse)
    }
}
