//! AI text-generation collaborator contract.

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The request never produced an HTTP response (network, DNS, TLS).
    #[error("Generation request failed: {0}")]
    Transport(String),

    /// The service answered with a non-2xx status.
    #[error("Generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered but carried no text.
    #[error("Generation service returned no text")]
    EmptyResponse,
}

/// Free-text prompt in, free-text reply out. No structure is promised.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError>;
}
