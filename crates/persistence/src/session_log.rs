//! Per-session CSV turn log
//!
//! One file per session under the log directory, appended turn-by-turn so a
//! crash loses at most the in-flight turn. Evaluation rows (VAS score and
//! reflection notes) are appended to the same file when the session is
//! archived.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use interview_sim_core::{Speaker, Stage, Turn};

use crate::Result;

/// One CSV row. Turn rows use `role = Student|Patient`; evaluation rows use
/// `role = VAS-CSC|NOTES` with the payload in `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRecord {
    pub session_id: String,
    pub username: String,
    pub persona: String,
    pub stage: String,
    pub timestamp: String,
    pub role: String,
    pub text: String,
    pub source: String,
}

impl LogRecord {
    pub fn is_turn(&self) -> bool {
        self.role == Speaker::Student.as_str() || self.role == Speaker::Patient.as_str()
    }
}

/// Appends turns of one session to its CSV file.
pub struct SessionLogger {
    path: PathBuf,
    session_id: String,
    username: String,
    persona: String,
    stage: Stage,
}

impl SessionLogger {
    /// Create the log file (and directory) for a session, writing the
    /// header row.
    pub fn create(
        log_dir: &Path,
        session_id: &str,
        username: &str,
        persona_name: &str,
        stage: Stage,
    ) -> Result<Self> {
        fs::create_dir_all(log_dir)?;
        let path = log_dir.join(format!("session_{session_id}.csv"));

        let file = File::create(&path)?;
        let mut writer = csv::Writer::from_writer(file);
        writer.write_record([
            "session_id",
            "username",
            "persona",
            "stage",
            "timestamp",
            "role",
            "text",
            "source",
        ])?;
        writer.flush()?;

        tracing::debug!(path = %path.display(), "session log created");
        Ok(Self {
            path,
            session_id: session_id.to_string(),
            username: username.to_string(),
            persona: persona_name.to_string(),
            stage,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one turn.
    pub fn log_turn(&self, turn: &Turn) -> Result<()> {
        self.append(LogRecord {
            session_id: self.session_id.clone(),
            username: self.username.clone(),
            persona: self.persona.clone(),
            stage: self.stage.display_name().to_string(),
            timestamp: turn.timestamp.to_rfc3339(),
            role: turn.speaker.as_str().to_string(),
            text: turn.text.clone(),
            source: turn.source.map(|s| s.as_str().to_string()).unwrap_or_default(),
        })
    }

    /// Append the end-of-session evaluation rows.
    pub fn archive(&self, vas_score: f64, notes: &str) -> Result<()> {
        let timestamp = chrono::Utc::now().to_rfc3339();
        self.append(LogRecord {
            session_id: self.session_id.clone(),
            username: self.username.clone(),
            persona: "EVAL".to_string(),
            stage: String::new(),
            timestamp: timestamp.clone(),
            role: "VAS-CSC".to_string(),
            text: vas_score.to_string(),
            source: String::new(),
        })?;
        self.append(LogRecord {
            session_id: self.session_id.clone(),
            username: self.username.clone(),
            persona: "EVAL".to_string(),
            stage: String::new(),
            timestamp,
            role: "NOTES".to_string(),
            text: notes.to_string(),
            source: String::new(),
        })
    }

    fn append(&self, record: LogRecord) -> Result<()> {
        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read a session log back, in row order.
pub fn read_log(path: &Path) -> Result<Vec<LogRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_sim_core::ResponseSource;
    use tempfile::tempdir;

    #[test]
    fn test_log_roundtrip() {
        let dir = tempdir().unwrap();
        let logger =
            SessionLogger::create(dir.path(), "abc12345", "student1", "Ali Seker", Stage::Acute)
                .unwrap();

        logger.log_turn(&Turn::student("How are you feeling?")).unwrap();
        logger
            .log_turn(&Turn::patient("Hopeless, mostly.", ResponseSource::Generated))
            .unwrap();

        let records = read_log(logger.path()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].role, "Student");
        assert_eq!(records[0].source, "");
        assert_eq!(records[1].role, "Patient");
        assert_eq!(records[1].source, "generated");
        assert_eq!(records[1].text, "Hopeless, mostly.");
        assert!(records.iter().all(|r| r.is_turn()));
    }

    #[test]
    fn test_text_with_commas_and_quotes_survives() {
        let dir = tempdir().unwrap();
        let logger =
            SessionLogger::create(dir.path(), "abc12345", "student1", "Ali Seker", Stage::Acute)
                .unwrap();

        let tricky = "I said, \"leave me alone\", and then nothing.";
        logger
            .log_turn(&Turn::patient(tricky, ResponseSource::Table))
            .unwrap();

        let records = read_log(logger.path()).unwrap();
        assert_eq!(records[0].text, tricky);
    }

    #[test]
    fn test_archive_rows_follow_turns() {
        let dir = tempdir().unwrap();
        let logger =
            SessionLogger::create(dir.path(), "abc12345", "student1", "Ferdi Demir", Stage::Reassessment)
                .unwrap();

        logger.log_turn(&Turn::student("hello")).unwrap();
        logger.archive(7.5, "Went well overall.").unwrap();

        let records = read_log(logger.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].role, "VAS-CSC");
        assert_eq!(records[1].text, "7.5");
        assert_eq!(records[2].role, "NOTES");
        assert!(!records[1].is_turn());
    }
}
