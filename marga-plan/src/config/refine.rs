//! Refinement section.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Sequence refinement settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefineSection {
    /// Maximum number of halvings before giving up
    #[serde(default = "defaults::max_depth")]
    pub max_depth: u32,
}

impl Default for RefineSection {
    fn default() -> Self {
        Self {
            max_depth: defaults::max_depth(),
        }
    }
}
