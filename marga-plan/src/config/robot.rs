//! Robot geometry section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Robot geometry settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RobotSection {
    /// Wall buffer radius in grid units. Cells with clearance at or below
    /// this value are treated as occupied.
    #[serde(default = "defaults::robot_radius")]
    pub radius: f32,
}

impl Default for RobotSection {
    fn default() -> Self {
        Self {
            radius: defaults::robot_radius(),
        }
    }
}
