//! Reachable-set boxes and the uncertain inputs that produce them.

use crate::core::Pose2D;
use crate::error::Result;

use super::model::KinematicState;
use super::primitive::{MotionPrimitive, Parameter};

/// Axis-aligned box over x, y and an unwrapped heading interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingRegion {
    /// Smallest reachable x
    pub min_x: f32,
    /// Largest reachable x
    pub max_x: f32,
    /// Smallest reachable y
    pub min_y: f32,
    /// Largest reachable y
    pub max_y: f32,
    /// Smallest reachable heading (degrees, unwrapped)
    pub min_heading: f32,
    /// Largest reachable heading (degrees, unwrapped)
    pub max_heading: f32,
}

impl BoundingRegion {
    /// Degenerate region holding one pose
    pub fn point(pose: Pose2D) -> Self {
        Self {
            min_x: pose.x,
            max_x: pose.x,
            min_y: pose.y,
            max_y: pose.y,
            min_heading: pose.heading,
            max_heading: pose.heading,
        }
    }

    /// Grow to include `pose`
    pub fn include(&mut self, pose: Pose2D) {
        self.min_x = self.min_x.min(pose.x);
        self.max_x = self.max_x.max(pose.x);
        self.min_y = self.min_y.min(pose.y);
        self.max_y = self.max_y.max(pose.y);
        self.min_heading = self.min_heading.min(pose.heading);
        self.max_heading = self.max_heading.max(pose.heading);
    }

    /// Center of the box
    pub fn centroid(&self) -> Pose2D {
        Pose2D::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
            (self.min_heading + self.max_heading) / 2.0,
        )
    }

    /// Half widths along x, y and heading
    pub fn half_extents(&self) -> (f32, f32, f32) {
        (
            (self.max_x - self.min_x) / 2.0,
            (self.max_y - self.min_y) / 2.0,
            (self.max_heading - self.min_heading) / 2.0,
        )
    }

    /// x extent
    #[inline]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// y extent
    #[inline]
    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }

    /// True when x, y and heading are all single values
    pub fn is_point(&self) -> bool {
        self.min_x == self.max_x && self.min_y == self.max_y && self.min_heading == self.max_heading
    }
}

/// Uncertain start pose of a primitive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoseEstimate {
    /// x with half-width error
    pub x: Parameter,
    /// y with half-width error
    pub y: Parameter,
    /// Heading in degrees with half-width error
    pub heading: Parameter,
}

impl PoseEstimate {
    /// Known pose without error
    pub fn exact(pose: Pose2D) -> Self {
        Self {
            x: Parameter::exact(pose.x),
            y: Parameter::exact(pose.y),
            heading: Parameter::exact(pose.heading),
        }
    }

    /// Centroid ± half extent of a region
    pub fn from_region(region: &BoundingRegion) -> Self {
        let center = region.centroid();
        let (hx, hy, hh) = region.half_extents();
        Self {
            x: Parameter::new(center.x, hx),
            y: Parameter::new(center.y, hy),
            heading: Parameter::new(center.heading, hh),
        }
    }
}

/// Everything one model evaluation consumes, with uncertainties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionInputs {
    /// Start x
    pub x: Parameter,
    /// Start y
    pub y: Parameter,
    /// Start heading (degrees)
    pub heading: Parameter,
    /// Linear speed (physical units per second)
    pub speed: Parameter,
    /// Signed angular rate (degrees per second)
    pub rate: Parameter,
    /// Seconds, derived from the nominal speed or rate
    pub dt: f32,
}

impl MotionInputs {
    /// Inputs for executing `primitive` from `start`.
    pub fn for_primitive(primitive: &MotionPrimitive, start: &PoseEstimate) -> Result<Self> {
        let dt = primitive.duration()?;
        Ok(Self {
            x: start.x,
            y: start.y,
            heading: start.heading,
            speed: primitive.speed,
            rate: primitive.signed_rate(),
            dt,
        })
    }

    /// Uncertain parameters in evaluation order: x, y, heading, speed, rate
    pub fn parameters(&self) -> [Parameter; 5] {
        [self.x, self.y, self.heading, self.speed, self.rate]
    }

    /// State with every parameter at its nominal value
    pub fn nominal_state(&self) -> KinematicState {
        self.state_from([
            self.x.nominal,
            self.y.nominal,
            self.heading.nominal,
            self.speed.nominal,
            self.rate.nominal,
        ])
    }

    /// State from concrete values in [`Self::parameters`] order
    pub fn state_from(&self, values: [f32; 5]) -> KinematicState {
        KinematicState {
            x: values[0],
            y: values[1],
            heading: values[2],
            speed: values[3],
            rate: values[4],
            dt: self.dt,
        }
    }
}
