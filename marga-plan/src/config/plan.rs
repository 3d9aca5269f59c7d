//! Main PlanConfig and conversion methods.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::motion::MotionProfile;

use super::error::ConfigLoadError;
use super::grid::GridSection;
use super::motion::MotionSection;
use super::refine::RefineSection;
use super::robot::RobotSection;

/// Default config location, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "configs/planner.yaml";

/// Full planner configuration loaded from YAML
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanConfig {
    /// Grid scale
    #[serde(default)]
    pub grid: GridSection,

    /// Robot geometry
    #[serde(default)]
    pub robot: RobotSection,

    /// Kinematic profile
    #[serde(default)]
    pub motion: MotionSection,

    /// Refinement budget
    #[serde(default)]
    pub refine: RefineSection,
}

impl PlanConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> std::result::Result<Self, ConfigLoadError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigLoadError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_yaml(&contents)
    }

    /// Load from [`DEFAULT_CONFIG_PATH`] if present, else built-in defaults
    pub fn load_default() -> std::result::Result<Self, ConfigLoadError> {
        let path = Path::new(DEFAULT_CONFIG_PATH);
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse from YAML string
    pub fn from_yaml(yaml: &str) -> std::result::Result<Self, ConfigLoadError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> std::result::Result<String, ConfigLoadError> {
        serde_yaml::to_string(self).map_err(|e| ConfigLoadError::Parse(e.to_string()))
    }

    /// Convert to MotionProfile
    pub fn motion_profile(&self) -> MotionProfile {
        self.motion.to_profile()
    }

    /// Physical units per cell
    pub fn cell_size(&self) -> f32 {
        self.grid.cell_size
    }

    /// Buffer radius in grid units
    pub fn robot_radius(&self) -> f32 {
        self.robot.radius
    }

    /// Reject values the planner cannot run with.
    pub fn validate(&self) -> Result<()> {
        let cell_size = self.grid.cell_size;
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(PlanError::precondition(format!(
                "grid.cell_size must be positive, got {}",
                cell_size
            )));
        }
        let radius = self.robot.radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(PlanError::precondition(format!(
                "robot.radius must be non-negative, got {}",
                radius
            )));
        }
        self.motion_profile().validate()
    }
}
