//! Configuration loading errors.

/// Config load error
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLoadError {
    /// File could not be read
    Io(String),
    /// YAML did not match the schema
    Parse(String),
}

impl std::fmt::Display for ConfigLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigLoadError::Io(msg) => write!(f, "config read failed: {}", msg),
            ConfigLoadError::Parse(msg) => write!(f, "config parse failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigLoadError {}
