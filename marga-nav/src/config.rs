//! Configuration loading for MargaNav

use crate::error::{NavError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Default, Deserialize)]
pub struct NavConfig {
    #[serde(default)]
    pub connection: ConnectionConfig,
    #[serde(default)]
    pub planner: PlannerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Link to the robot
#[derive(Clone, Debug, Deserialize)]
pub struct ConnectionConfig {
    /// Robot address (default: 127.0.0.1)
    #[serde(default = "default_address")]
    pub address: String,

    /// TCP port number (default: 2000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connection timeout in milliseconds (default: 5000)
    #[serde(default = "default_timeout")]
    pub timeout_ms: u64,

    /// Pause after each command so the robot can finish it (default: 2000)
    #[serde(default = "default_pause")]
    pub pause_ms: u64,
}

/// Planner settings
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PlannerConfig {
    /// YAML planner config; falls back to `configs/planner.yaml` or defaults
    #[serde(default)]
    pub config_path: Option<PathBuf>,
}

/// Diagnostics output
#[derive(Clone, Debug, Default, Deserialize)]
pub struct OutputConfig {
    /// SVG overlay of the refined plan
    #[serde(default)]
    pub svg_path: Option<PathBuf>,

    /// Directory for field PGMs and the captured maze
    #[serde(default)]
    pub debug_dir: Option<PathBuf>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            port: default_port(),
            timeout_ms: default_timeout(),
            pause_ms: default_pause(),
        }
    }
}

// Default value functions
fn default_address() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    2000
}
fn default_timeout() -> u64 {
    5000
}
fn default_pause() -> u64 {
    2000
}

impl NavConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NavError::Config(format!("Failed to read config file: {}", e)))?;
        let config: NavConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the full address string for connection
    pub fn address(&self) -> String {
        format!("{}:{}", self.connection.address, self.connection.port)
    }
}

impl ConnectionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}
