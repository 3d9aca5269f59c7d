//! Rotate/Advance primitives and the sequences built from routes.

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::path::Route;

/// Uncertain scalar: `nominal ± error` with `error >= 0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Expected value
    pub nominal: f32,
    /// Worst-case deviation either side
    #[serde(default)]
    pub error: f32,
}

impl Parameter {
    /// Create a new parameter
    #[inline]
    pub const fn new(nominal: f32, error: f32) -> Self {
        Self { nominal, error }
    }

    /// Parameter without error
    #[inline]
    pub const fn exact(nominal: f32) -> Self {
        Self::new(nominal, 0.0)
    }

    /// nominal - error
    #[inline]
    pub fn lower(&self) -> f32 {
        self.nominal - self.error
    }

    /// nominal + error
    #[inline]
    pub fn upper(&self) -> f32 {
        self.nominal + self.error
    }

    /// True when the error is nonzero
    #[inline]
    pub fn is_uncertain(&self) -> bool {
        self.error != 0.0
    }

    /// Require finite values and a non-negative error.
    pub fn validate(&self, name: &str) -> Result<()> {
        if !self.nominal.is_finite() || !self.error.is_finite() || self.error < 0.0 {
            return Err(PlanError::precondition(format!(
                "{} must be finite with non-negative error, got {} ± {}",
                name, self.nominal, self.error
            )));
        }
        Ok(())
    }
}

/// Kinematic parameters shared by every primitive of one kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveClass {
    /// Linear speed (physical units per second)
    pub speed: Parameter,
    /// Angular rate (degrees per second)
    pub rate: Parameter,
}

/// Kinematic parameters for both primitive kinds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Parameters for turns in place
    pub rotate: PrimitiveClass,
    /// Parameters for straight runs
    pub advance: PrimitiveClass,
}

impl Default for MotionProfile {
    fn default() -> Self {
        Self {
            rotate: PrimitiveClass {
                speed: Parameter::exact(0.0),
                rate: Parameter::new(90.0, 4.5),
            },
            advance: PrimitiveClass {
                speed: Parameter::new(10.0, 0.5),
                rate: Parameter::new(0.0, 0.5),
            },
        }
    }
}

impl MotionProfile {
    /// Reject profiles that cannot drive a primitive.
    pub fn validate(&self) -> Result<()> {
        self.rotate.speed.validate("rotate speed")?;
        self.rotate.rate.validate("rotate rate")?;
        self.advance.speed.validate("advance speed")?;
        self.advance.rate.validate("advance rate")?;
        if self.rotate.rate.nominal <= 0.0 {
            return Err(PlanError::precondition(format!(
                "rotate rate must be positive, got {}",
                self.rotate.rate.nominal
            )));
        }
        if self.advance.speed.nominal <= 0.0 {
            return Err(PlanError::precondition(format!(
                "advance speed must be positive, got {}",
                self.advance.speed.nominal
            )));
        }
        Ok(())
    }
}

/// What a primitive does.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PrimitiveKind {
    /// Turn in place by a signed angle (degrees, positive toward +y)
    Rotate {
        /// Signed turn
        degrees: f32,
    },
    /// Drive straight ahead (physical units)
    Advance {
        /// Run length
        distance: f32,
    },
}

/// One executable step with its kinematic parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPrimitive {
    /// Rotate or Advance with its magnitude
    pub kind: PrimitiveKind,
    /// Linear speed (physical units per second)
    pub speed: Parameter,
    /// Angular rate magnitude (degrees per second)
    pub rate: Parameter,
}

impl MotionPrimitive {
    /// Rotate by `degrees` using the class parameters
    pub fn rotate(degrees: f32, class: &PrimitiveClass) -> Self {
        Self {
            kind: PrimitiveKind::Rotate { degrees },
            speed: class.speed,
            rate: class.rate,
        }
    }

    /// Advance by `distance` using the class parameters
    pub fn advance(distance: f32, class: &PrimitiveClass) -> Self {
        Self {
            kind: PrimitiveKind::Advance { distance },
            speed: class.speed,
            rate: class.rate,
        }
    }

    /// Signed angle or distance
    #[inline]
    pub fn magnitude(&self) -> f32 {
        match self.kind {
            PrimitiveKind::Rotate { degrees } => degrees,
            PrimitiveKind::Advance { distance } => distance,
        }
    }

    /// Same primitive at half the angle or distance
    pub fn halved(&self) -> Self {
        let kind = match self.kind {
            PrimitiveKind::Rotate { degrees } => PrimitiveKind::Rotate {
                degrees: degrees / 2.0,
            },
            PrimitiveKind::Advance { distance } => PrimitiveKind::Advance {
                distance: distance / 2.0,
            },
        };
        Self { kind, ..*self }
    }

    /// True for Rotate
    #[inline]
    pub fn is_rotate(&self) -> bool {
        matches!(self.kind, PrimitiveKind::Rotate { .. })
    }

    /// Check the parameters can drive this primitive.
    pub fn validate(&self) -> Result<()> {
        self.speed.validate("speed")?;
        self.rate.validate("rate")?;
        match self.kind {
            PrimitiveKind::Rotate { degrees } => {
                if !degrees.is_finite() {
                    return Err(PlanError::precondition(format!(
                        "rotate angle must be finite, got {}",
                        degrees
                    )));
                }
                if degrees != 0.0 && self.rate.nominal <= 0.0 {
                    return Err(PlanError::precondition(format!(
                        "rotate by {}° needs a positive rate, got {}",
                        degrees, self.rate.nominal
                    )));
                }
            }
            PrimitiveKind::Advance { distance } => {
                if !distance.is_finite() || distance < 0.0 {
                    return Err(PlanError::precondition(format!(
                        "advance distance must be finite and non-negative, got {}",
                        distance
                    )));
                }
                if self.speed.nominal <= 0.0 {
                    return Err(PlanError::precondition(format!(
                        "advance needs a positive speed, got {}",
                        self.speed.nominal
                    )));
                }
            }
        }
        Ok(())
    }

    /// Execution time at nominal speed or rate
    pub fn duration(&self) -> Result<f32> {
        self.validate()?;
        Ok(match self.kind {
            PrimitiveKind::Rotate { degrees } if degrees == 0.0 => 0.0,
            PrimitiveKind::Rotate { degrees } => degrees.abs() / self.rate.nominal,
            PrimitiveKind::Advance { distance } => distance / self.speed.nominal,
        })
    }

    /// Angular rate signed by the turn direction.
    ///
    /// Advance keeps the configured drift rate as is.
    pub fn signed_rate(&self) -> Parameter {
        match self.kind {
            PrimitiveKind::Rotate { degrees } if degrees < 0.0 => {
                Parameter::new(-self.rate.nominal, self.rate.error)
            }
            _ => self.rate,
        }
    }
}

/// Turn/distance pair sent to the robot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DriveCommand {
    /// Turn before driving (degrees)
    pub turn_degrees: f32,
    /// Distance after the turn (physical units)
    pub distance: f32,
}

/// Ordered primitives, normally alternating Rotate and Advance.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionSequence {
    primitives: Vec<MotionPrimitive>,
}

impl ActionSequence {
    /// Sequence from primitives
    pub fn new(primitives: Vec<MotionPrimitive>) -> Self {
        Self { primitives }
    }

    /// Rotate + Advance per route leg, runs scaled by `cell_size`.
    pub fn from_route(route: &Route, cell_size: f32, profile: &MotionProfile) -> Self {
        let primitives = route
            .legs()
            .iter()
            .flat_map(|leg| {
                [
                    MotionPrimitive::rotate(leg.turn_degrees, &profile.rotate),
                    MotionPrimitive::advance(leg.cells as f32 * cell_size, &profile.advance),
                ]
            })
            .collect();
        Self { primitives }
    }

    /// Primitives in order
    #[inline]
    pub fn primitives(&self) -> &[MotionPrimitive] {
        &self.primitives
    }

    /// Primitive at `index`
    #[inline]
    pub fn get(&self, index: usize) -> Option<&MotionPrimitive> {
        self.primitives.get(index)
    }

    /// Number of primitives
    #[inline]
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// True when there is nothing to execute
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// Copy with primitive `index` halved, everything else kept
    pub fn with_halved(&self, index: usize) -> Self {
        let mut primitives = self.primitives.clone();
        if let Some(p) = primitives.get_mut(index) {
            *p = p.halved();
        }
        Self { primitives }
    }

    /// First `len` primitives
    pub fn truncated(&self, len: usize) -> Self {
        Self {
            primitives: self.primitives[..len.min(self.primitives.len())].to_vec(),
        }
    }

    /// Primitives `[0, index)` followed by primitive `index` at half magnitude
    pub fn bisected_at(&self, index: usize) -> Self {
        let mut primitives = self.primitives[..index.min(self.primitives.len())].to_vec();
        if let Some(p) = self.primitives.get(index) {
            primitives.push(p.halved());
        }
        Self { primitives }
    }

    /// Pair each Rotate with the Advance after it.
    ///
    /// A Rotate without a following Advance yields distance 0; an Advance
    /// without a preceding Rotate yields turn 0.
    pub fn commands(&self) -> Vec<DriveCommand> {
        let mut commands = Vec::with_capacity(self.primitives.len().div_ceil(2));
        let mut pending_turn: Option<f32> = None;

        for primitive in &self.primitives {
            match primitive.kind {
                PrimitiveKind::Rotate { degrees } => {
                    if let Some(turn) = pending_turn.replace(degrees) {
                        commands.push(DriveCommand {
                            turn_degrees: turn,
                            distance: 0.0,
                        });
                    }
                }
                PrimitiveKind::Advance { distance } => commands.push(DriveCommand {
                    turn_degrees: pending_turn.take().unwrap_or(0.0),
                    distance,
                }),
            }
        }
        if let Some(turn) = pending_turn {
            commands.push(DriveCommand {
                turn_degrees: turn,
                distance: 0.0,
            });
        }
        commands
    }
}
