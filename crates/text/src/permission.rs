//! Permission-request phrase detection
//!
//! A small fixed pattern set, matched case-insensitively against a patient
//! turn. Deliberately narrow: paraphrases like "mind if I ask..." will not
//! trigger it, which is an accepted false-negative risk rather than
//! something to paper over with fuzzier matching.

use once_cell::sync::Lazy;
use regex::Regex;

static PERMISSION_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\bcan i ask (?:you )?a question\b",
        r"\bcan i ask something\b",
        r"\bmay i ask (?:you )?a question\b",
        r"\bcan i ask\b",
        r"\bmay i ask\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("permission pattern must compile"))
    .collect()
});

/// Does this patient line ask for permission to pose a question?
pub fn is_permission_request(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let lowered = text.to_lowercase();
    PERMISSION_PATTERNS.iter().any(|p| p.is_match(&lowered))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_common_phrasings() {
        assert!(is_permission_request("Can I ask you a question?"));
        assert!(is_permission_request("can i ask a question"));
        assert!(is_permission_request("Can I ask something?"));
        assert!(is_permission_request("May I ask you a question?"));
        assert!(is_permission_request("I was wondering... may I ask?"));
        assert!(is_permission_request("Can I ask you something?"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_permission_request("CAN I ASK A QUESTION?"));
    }

    #[test]
    fn test_ignores_unrelated_text() {
        assert!(!is_permission_request("I feel like my life is worthless."));
        assert!(!is_permission_request(""));
        // Known false negative by design: paraphrased requests
        assert!(!is_permission_request("Would it be alright if I asked you something?"));
    }

    #[test]
    fn test_requires_word_boundaries() {
        assert!(!is_permission_request("the tuscan task force"));
    }
}
