//! Generation-output sanitization
//!
//! Models occasionally decorate replies with stage directions in square
//! brackets or "(internal thought: ...)" asides. Neither belongs in a
//! patient's spoken line, so both are stripped before the text reaches the
//! transcript. Running the stripper over already-clean text is a no-op.

use once_cell::sync::Lazy;
use regex::Regex;

static BRACKET_META: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());
static INTERNAL_THOUGHT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\(.*?internal thought.*?\)").unwrap());

/// Strip meta-annotations from raw generation output and trim the result.
///
/// The returned string may be empty; substituting a filler for empty output
/// is the resolver's job, not this function's.
pub fn sanitize(raw: &str) -> String {
    let without_brackets = BRACKET_META.replace_all(raw, "");
    let without_thoughts = INTERNAL_THOUGHT.replace_all(&without_brackets, "");
    without_thoughts.trim().to_string()
}
