//! Session artifacts
//!
//! Features:
//! - Per-session CSV turn logging with end-of-session evaluation rows
//! - User registration profiles (JSON) with completed-session summaries
//! - Word (docx) session reports

pub mod profile;
pub mod report;
pub mod session_log;

pub use profile::{ProfileStore, SessionSummary, UserProfile};
pub use report::{confidence_level, write_session_report, ReportMeta};
pub use session_log::{read_log, LogRecord, SessionLogger};

use thiserror::Error;

/// Persistence errors
#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("DOCX generation failed: {0}")]
    Docx(String),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
