//! Motion primitives and worst-case reachable regions.
//!
//! A plan is executed as alternating Rotate and Advance primitives. Each
//! primitive carries uncertain kinematic parameters; the
//! [`MotionEvaluator`] bounds every pose the robot can end in by evaluating a
//! [`KinematicModel`] at extreme parameter combinations.
//!
//! ## Example
//!
//! ```rust
//! use marga_plan::motion::{MotionEvaluator, MotionPrimitive, Parameter, PoseEstimate, PrimitiveClass};
//! use marga_plan::Pose2D;
//!
//! let class = PrimitiveClass {
//!     speed: Parameter::new(10.0, 1.0),
//!     rate: Parameter::exact(0.0),
//! };
//! let advance = MotionPrimitive::advance(10.0, &class);
//! let evaluator = MotionEvaluator::new();
//! let start = PoseEstimate::exact(Pose2D::new(0.0, 0.0, 0.0));
//! let region = evaluator.primitive_region(&advance, &start).unwrap();
//! assert!((region.min_x - 9.0).abs() < 1e-4);
//! assert!((region.max_x - 11.0).abs() < 1e-4);
//! ```

mod bounds;
mod evaluator;
mod model;
mod primitive;

pub use bounds::{BoundingRegion, MotionInputs, PoseEstimate};
pub use evaluator::MotionEvaluator;
pub use model::{ArcModel, KinematicModel, KinematicState};
pub use primitive::{
    ActionSequence, DriveCommand, MotionPrimitive, MotionProfile, Parameter, PrimitiveClass,
    PrimitiveKind,
};
