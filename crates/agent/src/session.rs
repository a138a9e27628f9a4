//! Interview session state

use uuid::Uuid;

use interview_sim_core::{Persona, PersonaId, Stage, Transcript, Turn};

/// Flow-control state of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Accepting student utterances
    #[default]
    Idle,
    /// A patient permission request is pending; only approve/decline are
    /// valid until it is resolved
    AwaitingApproval,
}

/// One student's interview with one patient at one stage.
///
/// Created when the student picks a persona and stage; the persona and
/// stage never change afterwards. The transcript is the only mutable state
/// carried between resolver invocations, and this struct is its sole
/// owner - there is no cross-session sharing.
#[derive(Debug)]
pub struct Session {
    id: String,
    username: String,
    persona: PersonaId,
    stage: Stage,
    transcript: Transcript,
    state: SessionState,
}

impl Session {
    /// Start a session for a student.
    pub fn new(username: impl Into<String>, persona: PersonaId, stage: Stage) -> Self {
        let id = Uuid::new_v4().simple().to_string()[..8].to_string();
        Self {
            id,
            username: username.into(),
            persona,
            stage,
            transcript: Transcript::new(),
            state: SessionState::default(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn persona_id(&self) -> PersonaId {
        self.persona
    }

    pub fn persona(&self) -> &'static Persona {
        Persona::get(self.persona)
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_awaiting_approval(&self) -> bool {
        self.state == SessionState::AwaitingApproval
    }

    /// End the interview. Abandons any pending permission request.
    pub fn end(&mut self) {
        self.state = SessionState::Idle;
    }

    pub(crate) fn push_turn(&mut self, turn: Turn) {
        self.transcript.push(turn);
    }

    pub(crate) fn set_state(&mut self, state: SessionState) {
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_idle_and_empty() {
        let session = Session::new("student1", PersonaId::Mdd, Stage::Acute);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.transcript().is_empty());
        assert_eq!(session.id().len(), 8);
        assert_eq!(session.persona().name, "Ali Seker");
    }

    #[test]
    fn test_end_abandons_pending_permission() {
        let mut session = Session::new("student1", PersonaId::Schizophrenia, Stage::Reassessment);
        session.set_state(SessionState::AwaitingApproval);
        session.end();
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = Session::new("s", PersonaId::Mdd, Stage::Acute);
        let b = Session::new("s", PersonaId::Mdd, Stage::Acute);
        assert_ne!(a.id(), b.id());
    }
}
