//! Motion profile section.

use serde::{Deserialize, Serialize};

use crate::motion::{MotionProfile, PrimitiveClass};

use super::defaults;

/// Kinematic parameters and their worst-case errors.
///
/// Rotate rates are magnitudes in degrees per second; the sign comes from
/// the turn. Advance rate is the heading drift while driving straight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionSection {
    /// Turn in place
    #[serde(default = "defaults::rotate_class")]
    pub rotate: PrimitiveClass,

    /// Straight run
    #[serde(default = "defaults::advance_class")]
    pub advance: PrimitiveClass,
}

impl Default for MotionSection {
    fn default() -> Self {
        Self {
            rotate: defaults::rotate_class(),
            advance: defaults::advance_class(),
        }
    }
}

impl MotionSection {
    /// Convert to MotionProfile
    pub fn to_profile(&self) -> MotionProfile {
        MotionProfile {
            rotate: self.rotate,
            advance: self.advance,
        }
    }
}
