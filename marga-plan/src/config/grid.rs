//! Grid configuration section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Grid configuration section
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    /// Physical units per grid cell
    #[serde(default = "defaults::cell_size")]
    pub cell_size: f32,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            cell_size: defaults::cell_size(),
        }
    }
}
