//! Text generation port.

use async_trait::async_trait;

/// Produces haiku text for a topic.
#[async_trait]
pub trait HaikuGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Generation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Generation request failed: {0}")]
    Request(String),

    /// Upstream answered with a non-success status. `message` is the
    /// upstream's own error message when one could be extracted.
    #[error("Generation API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Generation API returned no choices")]
    EmptyResponse,

    #[error("Failed to decode generation response: {0}")]
    Decode(String),
}
