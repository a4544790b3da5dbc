//! Model provider abstraction.
//!
//! Handlers talk to a `TextProvider` trait object so the Gemini backend can be
//! swapped for the in-process mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Content filtered")]
    ContentFiltered,

    #[error("Response contained no text")]
    EmptyResponse,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// One unit of a multi-part generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentPart {
    Text(String),

    /// Media embedded in the request body.
    InlineMedia {
        mime_type: String,
        /// Base64 (standard alphabet, padded) of the raw bytes.
        data: String,
    },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text(text.into())
    }

    pub fn mime_type(&self) -> Option<&str> {
        match self {
            ContentPart::Text(_) => None,
            ContentPart::InlineMedia { mime_type, .. } => Some(mime_type),
        }
    }
}

/// Trait for text generation providers (e.g., Gemini).
#[async_trait]
pub trait TextProvider: Send + Sync {
    /// Identifier of the model this provider is bound to.
    fn model(&self) -> &str;

    /// Send the ordered parts as a single request and return the generated text.
    async fn generate(&self, parts: Vec<ContentPart>) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
