//! Generation backend implementations
//!
//! The interview core consumes one external capability: turn a system
//! prompt plus a student utterance into patient text. The concrete backend
//! here talks to the Gemini `generateContent` REST endpoint; tests swap in
//! scripted implementations of the same trait.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::ProviderError;

/// Retry policy for transient generation failures.
///
/// Five attempts with a doubling delay from a 2-second base is the
/// canonical contract; the loop itself lives in the resolver so that one
/// backend invocation equals one attempt.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    /// Delay before the first retry; doubles after each failed attempt
    pub base_delay: Duration,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_secs(2),
        }
    }
}

/// Gemini backend configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// API key
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Generation backend trait
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate patient text for one utterance under a system instruction.
    async fn generate(&self, system_prompt: &str, utterance: &str)
        -> Result<String, ProviderError>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Gemini `generateContent` backend
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(config.timeout).build().map_err(|e| {
            ProviderError::Configuration(format!("failed to create HTTP client: {e}"))
        })?;

        Ok(Self { client, config })
    }

    fn api_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.endpoint, self.config.model
        )
    }

    async fn execute_request(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let mut builder = self.client.post(self.api_url()).json(request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.header("x-goog-api-key", key);
        }

        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited(body));
            }
            if status.is_server_error() {
                return Err(ProviderError::Network(format!("server error {status}: {body}")));
            }
            return Err(ProviderError::Api(format!("{status}: {body}")));
        }

        response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn generate(
        &self,
        system_prompt: &str,
        utterance: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_prompt.to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: utterance.to_string(),
                }],
            }],
        };

        let response = self.execute_request(&request).await?;

        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_ref())
        {
            tracing::warn!(%reason, "generation blocked by content safety");
            return Err(ProviderError::ContentBlocked(reason.clone()));
        }

        // An empty body is not an error here: the resolver substitutes its
        // neutral filler for empty text.
        Ok(response.text())
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    system_instruction: Content,
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Concatenate the text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "role": "model",
                    "parts": [{"text": "I feel "}, {"text": "hopeless."}]
                }
            }]
        }"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), "I feel hopeless.");
    }

    #[test]
    fn test_response_block_reason_parsing() {
        let json = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let response: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.prompt_feedback.unwrap().block_reason.as_deref(),
            Some("SAFETY")
        );
    }

    #[test]
    fn test_empty_response_yields_empty_text() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.text(), "");
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: "You are a patient.".to_string(),
                }],
            },
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: "How are you?".to_string(),
                }],
            }],
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("systemInstruction").is_some());
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_retryable_classification() {
        assert!(ProviderError::RateLimited("quota".into()).is_retryable());
        assert!(ProviderError::Network("reset".into()).is_retryable());
        assert!(ProviderError::Timeout.is_retryable());
        assert!(!ProviderError::ContentBlocked("SAFETY".into()).is_retryable());
        assert!(!ProviderError::Api("400".into()).is_retryable());
    }

    #[test]
    fn test_default_backoff_policy_contract() {
        let policy = BackoffPolicy::default();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.base_delay, Duration::from_secs(2));
    }
}
