//! Default value functions for serde deserialization.

use crate::motion::{MotionProfile, PrimitiveClass};

pub fn cell_size() -> f32 {
    1.0
}

pub fn robot_radius() -> f32 {
    1.0
}

pub fn rotate_class() -> PrimitiveClass {
    MotionProfile::default().rotate
}

pub fn advance_class() -> PrimitiveClass {
    MotionProfile::default().advance
}

pub fn max_depth() -> u32 {
    4
}
