//! Interview orchestration
//!
//! `InterviewAgent` is the surface the presentation layer talks to. It owns
//! transcript appends (student turn before resolution, patient turn after),
//! runs permission and crisis detection on the right side of each turn, and
//! enforces that utterances are only accepted while the session is idle.

use interview_sim_core::{ResponseSource, Turn};
use interview_sim_llm::GenerationBackend;
use interview_sim_text::{detect_crisis, is_permission_request};

use crate::resolver::ResponseResolver;
use crate::session::{Session, SessionState};
use crate::AgentError;

/// Fixed acknowledgement appended when the student declines the patient's
/// permission request.
pub const DECLINE_ACKNOWLEDGEMENT: &str = "Okay, I understand.";

/// Result of submitting one student utterance.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The appended patient turn
    pub turn: Turn,
    /// The student utterance contained crisis language (advisory; the turn
    /// was resolved normally)
    pub crisis_detected: bool,
    /// The patient reply asked permission to pose a question; the session
    /// is now awaiting approve/decline
    pub permission_requested: bool,
}

/// Drives interview sessions against one generation backend.
pub struct InterviewAgent<B> {
    resolver: ResponseResolver<B>,
}

impl<B: GenerationBackend> InterviewAgent<B> {
    pub fn new(backend: B) -> Self {
        Self {
            resolver: ResponseResolver::new(backend),
        }
    }

    /// Build from a preconfigured resolver (custom retry policy).
    pub fn with_resolver(resolver: ResponseResolver<B>) -> Self {
        Self { resolver }
    }

    /// Handle one student utterance.
    ///
    /// Appends the student turn, resolves the patient reply, appends it,
    /// and flips the session to `AwaitingApproval` when the reply is a
    /// permission request. Rejected while a permission decision is pending.
    pub async fn submit(
        &self,
        session: &mut Session,
        utterance: &str,
    ) -> Result<SubmitOutcome, AgentError> {
        if session.is_awaiting_approval() {
            return Err(AgentError::AwaitingApproval);
        }

        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Err(AgentError::EmptyUtterance);
        }

        let crisis_detected = detect_crisis(utterance);
        if crisis_detected {
            tracing::warn!(session_id = %session.id(), "crisis language detected in utterance");
        }

        session.push_turn(Turn::student(utterance));

        let resolved = self.resolver.resolve(utterance, session).await;
        let turn = Turn::patient(resolved.text, resolved.source);
        let permission_requested = is_permission_request(&turn.text);

        session.push_turn(turn.clone());

        if permission_requested {
            tracing::debug!(session_id = %session.id(), "patient requested permission to ask");
            session.set_state(SessionState::AwaitingApproval);
        }

        Ok(SubmitOutcome {
            turn,
            crisis_detected,
            permission_requested,
        })
    }

    /// Approve the pending permission request: the patient asks exactly one
    /// question, and the session returns to idle.
    pub async fn approve(&self, session: &mut Session) -> Result<Turn, AgentError> {
        if !session.is_awaiting_approval() {
            return Err(AgentError::NoPendingPermission);
        }

        let question = self.resolver.generate_question(session).await;
        let turn = Turn::patient(question, ResponseSource::Generated);
        session.push_turn(turn.clone());
        session.set_state(SessionState::Idle);
        Ok(turn)
    }

    /// Decline the pending permission request: a fixed acknowledgement is
    /// appended without any generation call, and the session returns to
    /// idle.
    pub fn decline(&self, session: &mut Session) -> Result<Turn, AgentError> {
        if !session.is_awaiting_approval() {
            return Err(AgentError::NoPendingPermission);
        }

        let turn = Turn::patient(DECLINE_ACKNOWLEDGEMENT, ResponseSource::Generated);
        session.push_turn(turn.clone());
        session.set_state(SessionState::Idle);
        Ok(turn)
    }
}
