//! Text processing for the interview simulator
//!
//! Features:
//! - Sequence-similarity scoring for utterance matching
//! - Standardized response table with fuzzy lookup
//! - Generation-output sanitization
//! - Permission-request and crisis-keyword detection

pub mod crisis;
pub mod permission;
pub mod qa;
pub mod sanitize;
pub mod similarity;

pub use crisis::detect_crisis;
pub use permission::is_permission_request;
pub use qa::{lookup, lookup_in, standardized_table, QaEntry, TableMatch, MATCH_THRESHOLD};
pub use sanitize::sanitize;
pub use similarity::similarity;
