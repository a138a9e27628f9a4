//! Crisis-keyword detection
//!
//! Advisory substring scan over the student's utterance. A hit flags the
//! turn for the presentation layer's safety banner; it never changes how
//! the turn is resolved.

const CRISIS_KEYWORDS: &[&str] = &[
    "kill myself",
    "end my life",
    "suicide",
    "want to die",
    "no reason to live",
    "better off dead",
    "overdose",
    "cut myself",
    "hurt myself",
    "self-harm",
    "jump off",
];

/// Check an utterance for crisis language.
pub fn detect_crisis(text: &str) -> bool {
    let lowered = text.to_lowercase();
    CRISIS_KEYWORDS.iter().any(|k| lowered.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_crisis_phrases() {
        assert!(detect_crisis("Do you ever want to die?"));
        assert!(detect_crisis("Have you thought about SUICIDE?"));
        assert!(detect_crisis("sometimes I just want to hurt myself"));
    }

    #[test]
    fn test_ignores_neutral_text() {
        assert!(!detect_crisis("How are you feeling today?"));
        assert!(!detect_crisis(""));
    }
}
