//! Interview session agent
//!
//! Features:
//! - Session state with an append-only transcript
//! - Table-first response resolution with generative fallback
//! - Bounded retry/backoff around the generation backend
//! - The ask-permission protocol (approve / decline)
//!
//! The presentation layer drives one session through three entry points:
//! [`InterviewAgent::submit`] while the session is idle, and
//! [`InterviewAgent::approve`] / [`InterviewAgent::decline`] while a
//! permission request is pending.

pub mod engine;
pub mod resolver;
pub mod session;

pub use engine::{InterviewAgent, SubmitOutcome, DECLINE_ACKNOWLEDGEMENT};
pub use resolver::{
    Resolved, ResponseResolver, DEFAULT_PATIENT_QUESTION, DEGRADED_SERVICE_REPLY, NEUTRAL_FILLER,
};
pub use session::{Session, SessionState};

use thiserror::Error;

/// Agent errors
///
/// These cover flow-control misuse only; generation failures never surface
/// here, they degrade to fixed reply strings inside the resolver.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AgentError {
    #[error("session is awaiting a permission decision")]
    AwaitingApproval,

    #[error("no permission request is pending")]
    NoPendingPermission,

    #[error("utterance is empty")]
    EmptyUtterance,
}
