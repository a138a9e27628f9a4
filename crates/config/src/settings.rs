//! Main settings module

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Generation backend configuration
    #[serde(default)]
    pub llm: LlmSettings,

    /// Session artifact storage
    #[serde(default)]
    pub storage: StorageSettings,
}

impl Settings {
    /// Validate value ranges. Called by [`load_settings`]; call directly
    /// when building settings in code.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.llm.max_attempts == 0 {
            return Err(ConfigError::Invalid("llm.max_attempts must be at least 1".into()));
        }
        if self.llm.timeout_seconds == 0 {
            return Err(ConfigError::Invalid("llm.timeout_seconds must be positive".into()));
        }
        if self.llm.model.trim().is_empty() {
            return Err(ConfigError::Invalid("llm.model must not be empty".into()));
        }
        Ok(())
    }
}

/// Generation backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// Model name/ID
    pub model: String,
    /// API endpoint
    pub endpoint: String,
    /// API key; usually supplied via INTERVIEW_SIM_LLM__API_KEY
    pub api_key: Option<String>,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Retry attempts for transient generation failures (including the first)
    pub max_attempts: u32,
    /// Base retry delay in seconds; doubles between attempts
    pub base_backoff_seconds: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
            timeout_seconds: 30,
            max_attempts: 5,
            base_backoff_seconds: 2,
        }
    }
}

/// Where session artifacts are written
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageSettings {
    /// Per-session CSV logs
    pub log_dir: PathBuf,
    /// User registration profiles
    pub users_dir: PathBuf,
    /// Word session reports
    pub reports_dir: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            users_dir: PathBuf::from("users"),
            reports_dir: PathBuf::from("logs"),
        }
    }
}

/// Load settings from an optional TOML file plus the environment.
///
/// Environment variables use the `INTERVIEW_SIM_` prefix with `__` as the
/// section separator, e.g. `INTERVIEW_SIM_LLM__API_KEY`.
pub fn load_settings(path: Option<&Path>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    match path {
        Some(path) => {
            builder = builder.add_source(File::from(path));
        }
        None => {
            builder = builder.add_source(File::with_name("interview-sim").required(false));
        }
    }

    builder = builder.add_source(Environment::with_prefix("INTERVIEW_SIM").separator("__"));

    let settings: Settings = builder.build()?.try_deserialize()?;
    settings.validate()?;

    tracing::debug!(model = %settings.llm.model, "settings loaded");
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.llm.max_attempts, 5);
        assert_eq!(settings.llm.base_backoff_seconds, 2);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut settings = Settings::default();
        settings.llm.max_attempts = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_empty_model_rejected() {
        let mut settings = Settings::default();
        settings.llm.model = "  ".to_string();
        assert!(settings.validate().is_err());
    }
}
