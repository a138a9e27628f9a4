//! Generation backend integration
//!
//! Features:
//! - `GenerationBackend` trait for pluggable text generation
//! - Gemini `generateContent` backend over HTTP
//! - Deterministic persona system-prompt builder
//! - Retry/backoff policy shared with the resolver

pub mod backend;
pub mod prompt;

pub use backend::{BackoffPolicy, GeminiBackend, GeminiConfig, GenerationBackend};
pub use prompt::{PromptBuilder, HISTORY_WINDOW, QUESTION_INSTRUCTION};

use thiserror::Error;

/// Generation provider errors.
///
/// The resolver never lets one of these reach the student; every variant
/// degrades to a fixed reply string there.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("rate limited: {0}")]
    RateLimited(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("timeout")]
    Timeout,

    #[error("API error: {0}")]
    Api(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("content blocked: {0}")]
    ContentBlocked(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Transient failures worth retrying with backoff. Content blocks and
    /// client-side errors are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderError::RateLimited(_) | ProviderError::Network(_) | ProviderError::Timeout
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}
