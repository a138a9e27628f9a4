//! Response resolution
//!
//! Table first, generation second: an utterance is answered from the
//! standardized response table when a prompt matches well enough, and only
//! otherwise handed to the generation backend under the persona system
//! prompt. Provider failures never escape; they degrade to fixed reply
//! strings so the interview always continues.

use interview_sim_core::ResponseSource;
use interview_sim_llm::{
    BackoffPolicy, GenerationBackend, PromptBuilder, ProviderError, QUESTION_INSTRUCTION,
};
use interview_sim_text::{qa, sanitize};

use crate::session::Session;

/// Substituted when generation output is empty after sanitization, or when
/// the provider blocks the content.
pub const NEUTRAL_FILLER: &str = "I'm not sure how to answer that.";

/// Returned when the generation backend stays unreachable through every
/// retry attempt.
pub const DEGRADED_SERVICE_REPLY: &str = "I'm having trouble responding right now.";

/// Fallback for the approved-question path when generation fails or comes
/// back empty. Always ends with `?` like any approved question must.
pub const DEFAULT_PATIENT_QUESTION: &str = "How long will I be here?";

/// A resolved patient reply with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub text: String,
    pub source: ResponseSource,
}

/// Resolves one utterance into one patient reply.
///
/// Holds no session state; the transcript is read for prompt context but
/// never written. Appending turns is the caller's job.
pub struct ResponseResolver<B> {
    backend: B,
    policy: BackoffPolicy,
}

impl<B: GenerationBackend> ResponseResolver<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            policy: BackoffPolicy::default(),
        }
    }

    /// Override the retry policy (tests shrink the delays).
    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Resolve a student utterance against the session's persona and stage.
    pub async fn resolve(&self, utterance: &str, session: &Session) -> Resolved {
        if let Some(hit) = qa::lookup(utterance, session.persona_id(), session.stage()) {
            tracing::debug!(score = hit.score, "answering from standardized table");
            return Resolved {
                text: hit.reply,
                source: ResponseSource::Table,
            };
        }

        let system_prompt = PromptBuilder::new(session.persona(), session.stage())
            .with_history(session.transcript())
            .build();

        let text = self.generate_with_retry(&system_prompt, utterance).await;
        Resolved {
            text,
            source: ResponseSource::Generated,
        }
    }

    /// Generate the patient's one approved question.
    ///
    /// Single generation call; on failure or empty output the fixed default
    /// question stands in. The result always ends with `?`.
    pub async fn generate_question(&self, session: &Session) -> String {
        let system_prompt = PromptBuilder::new(session.persona(), session.stage())
            .with_history(session.transcript())
            .with_permission_granted()
            .build();

        match self.backend.generate(&system_prompt, QUESTION_INSTRUCTION).await {
            Ok(raw) => {
                let question = sanitize(&raw);
                if question.is_empty() {
                    return DEFAULT_PATIENT_QUESTION.to_string();
                }
                ensure_question_mark(question)
            }
            Err(err) => {
                tracing::warn!(error = %err, "question generation failed");
                DEFAULT_PATIENT_QUESTION.to_string()
            }
        }
    }

    /// Call the backend with bounded exponential backoff.
    ///
    /// One backend invocation per attempt; up to `policy.max_attempts`
    /// total, sleeping `base_delay * 2^n` between attempts. Content blocks
    /// and empty output become the neutral filler, exhausted retries the
    /// degraded-service reply.
    async fn generate_with_retry(&self, system_prompt: &str, utterance: &str) -> String {
        let mut backoff = self.policy.base_delay;

        for attempt in 0..self.policy.max_attempts {
            if attempt > 0 {
                tracing::warn!(
                    attempt,
                    max_attempts = self.policy.max_attempts,
                    "generation failed, retrying in {:?}",
                    backoff
                );
                tokio::time::sleep(backoff).await;
                backoff *= 2;
            }

            match self.backend.generate(system_prompt, utterance).await {
                Ok(raw) => {
                    let cleaned = sanitize(&raw);
                    if cleaned.is_empty() {
                        return NEUTRAL_FILLER.to_string();
                    }
                    return cleaned;
                }
                Err(ProviderError::ContentBlocked(_)) => {
                    // Treated like an empty response; no provider detail
                    // reaches the transcript.
                    return NEUTRAL_FILLER.to_string();
                }
                Err(err) if err.is_retryable() => {
                    tracing::debug!(error = %err, "retryable generation failure");
                }
                Err(err) => {
                    tracing::error!(error = %err, "non-retryable generation failure");
                    break;
                }
            }
        }

        DEGRADED_SERVICE_REPLY.to_string()
    }
}

fn ensure_question_mark(mut text: String) -> String {
    if !text.ends_with('?') {
        let trimmed = text.trim_end_matches(['.', ' ']).to_string();
        text = trimmed;
        text.push('?');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use interview_sim_core::{PersonaId, Stage};

    struct ScriptedBackend {
        replies: parking_lot::Mutex<Vec<Result<String, ProviderError>>>,
        calls: AtomicU32,
    }

    impl ScriptedBackend {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: parking_lot::Mutex::new(replies),
                calls: AtomicU32::new(0),
            }
        }

        fn always_rate_limited() -> Self {
            Self {
                replies: parking_lot::Mutex::new(Vec::new()),
                calls: AtomicU32::new(0),
            }
        }

        fn call_count(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl GenerationBackend for &ScriptedBackend {
        async fn generate(
            &self,
            _system_prompt: &str,
            _utterance: &str,
        ) -> Result<String, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut replies = self.replies.lock();
            if replies.is_empty() {
                Err(ProviderError::RateLimited("quota exhausted".to_string()))
            } else {
                replies.remove(0)
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    fn fast_policy() -> BackoffPolicy {
        BackoffPolicy {
            max_attempts: 5,
            base_delay: Duration::ZERO,
        }
    }

    fn session() -> Session {
        Session::new("student1", PersonaId::Mdd, Stage::Acute)
    }

    #[tokio::test]
    async fn test_table_hit_returns_canned_reply_verbatim() {
        let backend = ScriptedBackend::new(vec![Ok("should not be called".to_string())]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("How're you feeling today?", &session()).await;
        assert_eq!(resolved.source, ResponseSource::Table);
        assert_eq!(
            resolved.text,
            "I feel like I am in a dark hole with no way out. Life is hopeless."
        );
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_miss_falls_through_to_generation() {
        let backend = ScriptedBackend::new(vec![Ok("[pauses] I had soup, I think.".to_string())]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("What time is dinner?", &session()).await;
        assert_eq!(resolved.source, ResponseSource::Generated);
        assert_eq!(resolved.text, "I had soup, I think.");
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_generation_becomes_neutral_filler() {
        let backend = ScriptedBackend::new(vec![Ok("[sighs]".to_string())]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("What time is dinner?", &session()).await;
        assert_eq!(resolved.text, NEUTRAL_FILLER);
        assert_eq!(resolved.source, ResponseSource::Generated);
    }

    #[tokio::test]
    async fn test_content_block_becomes_neutral_filler_without_retry() {
        let backend = ScriptedBackend::new(vec![Err(ProviderError::ContentBlocked(
            "SAFETY".to_string(),
        ))]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("What time is dinner?", &session()).await;
        assert_eq!(resolved.text, NEUTRAL_FILLER);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_retry_exhaustion_makes_exactly_five_attempts() {
        let backend = ScriptedBackend::always_rate_limited();
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("What time is dinner?", &session()).await;
        assert_eq!(resolved.text, DEGRADED_SERVICE_REPLY);
        assert_eq!(resolved.source, ResponseSource::Generated);
        assert_eq!(backend.call_count(), 5);
    }

    #[tokio::test]
    async fn test_recovery_on_third_attempt() {
        let backend = ScriptedBackend::new(vec![
            Err(ProviderError::Network("connection reset".to_string())),
            Err(ProviderError::RateLimited("slow down".to_string())),
            Ok("I don't remember.".to_string()),
        ]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("What time is dinner?", &session()).await;
        assert_eq!(resolved.text, "I don't remember.");
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_non_retryable_failure_degrades_immediately() {
        let backend = ScriptedBackend::new(vec![Err(ProviderError::Api("bad request".to_string()))]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let resolved = resolver.resolve("What time is dinner?", &session()).await;
        assert_eq!(resolved.text, DEGRADED_SERVICE_REPLY);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_generated_question_gets_question_mark() {
        let backend = ScriptedBackend::new(vec![Ok("Will I ever feel better.".to_string())]);
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let question = resolver.generate_question(&session()).await;
        assert_eq!(question, "Will I ever feel better?");
    }

    #[tokio::test]
    async fn test_question_falls_back_on_failure() {
        let backend = ScriptedBackend::always_rate_limited();
        let resolver = ResponseResolver::new(&backend).with_policy(fast_policy());

        let question = resolver.generate_question(&session()).await;
        assert_eq!(question, DEFAULT_PATIENT_QUESTION);
        // The question path does not retry
        assert_eq!(backend.call_count(), 1);
    }
}
