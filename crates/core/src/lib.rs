//! Core domain types for the interview simulator
//!
//! This crate provides the foundational types used across all other crates:
//! - Interview stages and conversation turns
//! - Patient persona records and the two compiled-in patients
//! - Response provenance tagging

pub mod conversation;
pub mod persona;

pub use conversation::{ResponseSource, Speaker, Stage, Transcript, Turn};
pub use persona::{Persona, PersonaId};
