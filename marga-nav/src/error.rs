//! Error types for MargaNav

use marga_plan::io::IoError;
use marga_plan::{ConfigLoadError, CycleError, PlanError};
use thiserror::Error;

/// MargaNav error type
#[derive(Error, Debug)]
pub enum NavError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Scene error: {0}")]
    Scene(String),

    #[error("Cycle failed: {0}")]
    Cycle(#[from] CycleError),

    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("Output error: {0}")]
    Output(String),
}

impl From<toml::de::Error> for NavError {
    fn from(e: toml::de::Error) -> Self {
        NavError::Config(e.to_string())
    }
}

impl From<serde_yaml::Error> for NavError {
    fn from(e: serde_yaml::Error) -> Self {
        NavError::Scene(e.to_string())
    }
}

impl From<ConfigLoadError> for NavError {
    fn from(e: ConfigLoadError) -> Self {
        NavError::Config(e.to_string())
    }
}

impl From<IoError> for NavError {
    fn from(e: IoError) -> Self {
        NavError::Output(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, NavError>;
