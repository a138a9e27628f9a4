//! User registration profiles
//!
//! One pretty-printed JSON file per student under the users directory.
//! A summary of each archived session is appended to the profile so the
//! menu can show past work.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Result;

/// A registered student.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub registration_date: DateTime<Utc>,
    #[serde(default)]
    pub sessions: Vec<SessionSummary>,
}

/// Summary of one completed session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub date: DateTime<Utc>,
    pub persona: String,
    pub stage: String,
    pub vas_score: f64,
    pub exchanges: usize,
    pub standardized_responses: usize,
    pub generated_responses: usize,
}

/// JSON-file-backed profile store.
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn profile_path(&self, username: &str) -> PathBuf {
        self.dir.join(format!("{username}.json"))
    }

    /// Register a new student. The username is derived from the nickname,
    /// lowercased with spaces collapsed to underscores.
    pub fn register(
        &self,
        first_name: &str,
        last_name: &str,
        nickname: &str,
        email: Option<&str>,
    ) -> Result<UserProfile> {
        let username = nickname.trim().to_lowercase().replace(' ', "_");
        let profile = UserProfile {
            username,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            nickname: nickname.to_string(),
            email: email.map(|e| e.to_string()),
            registration_date: Utc::now(),
            sessions: Vec::new(),
        };
        self.save(&profile)?;
        tracing::info!(username = %profile.username, "student registered");
        Ok(profile)
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(self.profile_path(&profile.username), json)?;
        Ok(())
    }

    pub fn load(&self, username: &str) -> Result<Option<UserProfile>> {
        let path = self.profile_path(username);
        if !path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(path)?;
        Ok(Some(serde_json::from_str(&json)?))
    }

    /// Append a completed-session summary to an existing profile.
    pub fn append_session(&self, username: &str, summary: SessionSummary) -> Result<()> {
        if let Some(mut profile) = self.load(username)? {
            profile.sessions.push(summary);
            self.save(&profile)?;
        }
        Ok(())
    }
}
