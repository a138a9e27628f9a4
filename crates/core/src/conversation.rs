//! Conversation types including stages, turns and the session transcript

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Interview stage of a patient's clinical course.
///
/// Selected once when a session starts and immutable for its lifetime.
/// Each stage maps to a distinct clinical-state narrative and a distinct
/// slice of the standardized response table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Acute admission phase
    #[default]
    Acute,
    /// Later reassessment phase
    Reassessment,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Acute => "acute",
            Stage::Reassessment => "reassessment",
        }
    }

    /// Get stage display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Stage::Acute => "Acute",
            Stage::Reassessment => "Reassessment",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speaker {
    /// The nursing student conducting the interview
    Student,
    /// The simulated patient
    Patient,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Student => "Student",
            Speaker::Patient => "Patient",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Provenance of a patient turn: standardized table or generative fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Answered verbatim from the standardized response table
    Table,
    /// Produced by the generation backend (or one of its fixed fallbacks)
    Generated,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Table => "table",
            ResponseSource::Generated => "generated",
        }
    }
}

impl std::fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single turn in the interview.
///
/// Student turns never carry a source; patient turns always do. The
/// constructors below are the only intended way to build a turn, which is
/// what upholds that invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Who spoke
    pub speaker: Speaker,
    /// What was said
    pub text: String,
    /// When the turn was appended
    pub timestamp: DateTime<Utc>,
    /// Provenance, present on patient turns only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ResponseSource>,
}

impl Turn {
    /// Create a student turn
    pub fn student(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Student,
            text: text.into(),
            timestamp: Utc::now(),
            source: None,
        }
    }

    /// Create a patient turn with its provenance
    pub fn patient(text: impl Into<String>, source: ResponseSource) -> Self {
        Self {
            speaker: Speaker::Patient,
            text: text.into(),
            timestamp: Utc::now(),
            source: Some(source),
        }
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// Append-only ordered sequence of turns for one session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript(Vec<Turn>);

impl Transcript {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Append a turn. Turns are never reordered or removed.
    pub fn push(&mut self, turn: Turn) {
        self.0.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&Turn> {
        self.0.last()
    }

    /// The most recent `n` turns, oldest first.
    pub fn recent(&self, n: usize) -> &[Turn] {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }

    /// Count patient turns attributed to a given source.
    pub fn count_by_source(&self, source: ResponseSource) -> usize {
        self.0.iter().filter(|t| t.source == Some(source)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_constructors_enforce_source_invariant() {
        let student = Turn::student("How are you feeling today?");
        assert_eq!(student.speaker, Speaker::Student);
        assert!(student.source.is_none());

        let patient = Turn::patient("I feel hopeless.", ResponseSource::Table);
        assert_eq!(patient.speaker, Speaker::Patient);
        assert_eq!(patient.source, Some(ResponseSource::Table));
    }

    #[test]
    fn test_transcript_recent_window() {
        let mut transcript = Transcript::new();
        for i in 0..10 {
            transcript.push(Turn::student(format!("question {i}")));
        }
        let recent = transcript.recent(6);
        assert_eq!(recent.len(), 6);
        assert_eq!(recent[0].text, "question 4");
        assert_eq!(recent[5].text, "question 9");

        // Window larger than transcript returns everything
        assert_eq!(transcript.recent(100).len(), 10);
    }

    #[test]
    fn test_transcript_source_accounting() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::student("hello"));
        transcript.push(Turn::patient("reply one", ResponseSource::Table));
        transcript.push(Turn::patient("reply two", ResponseSource::Generated));
        transcript.push(Turn::patient("reply three", ResponseSource::Table));

        assert_eq!(transcript.count_by_source(ResponseSource::Table), 2);
        assert_eq!(transcript.count_by_source(ResponseSource::Generated), 1);
    }

    #[test]
    fn test_timestamps_monotonic() {
        let mut transcript = Transcript::new();
        transcript.push(Turn::student("first"));
        transcript.push(Turn::patient("second", ResponseSource::Generated));
        let turns = transcript.turns();
        assert!(turns[0].timestamp <= turns[1].timestamp);
    }
}
