//! Configuration management for the interview simulator
//!
//! Supports loading configuration from:
//! - TOML files
//! - Environment variables (`INTERVIEW_SIM_` prefix)

pub mod settings;

pub use settings::{load_settings, LlmSettings, Settings, StorageSettings};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
