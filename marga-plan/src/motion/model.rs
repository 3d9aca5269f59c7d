//! Pose update models.

use crate::core::Pose2D;

/// Start pose, controls and duration of one model evaluation.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KinematicState {
    /// Start x
    pub x: f32,
    /// Start y
    pub y: f32,
    /// Degrees
    pub heading: f32,
    /// Linear speed (physical units per second)
    pub speed: f32,
    /// Angular rate (degrees per second, positive toward +y)
    pub rate: f32,
    /// Seconds
    pub dt: f32,
}

/// Closed-form pose update `f(x, y, heading, speed, rate, dt)`.
///
/// Implemented by [`ArcModel`] and by any `Fn(&KinematicState) -> Pose2D`,
/// so tests and alternative robots can swap the dynamics.
pub trait KinematicModel {
    /// Pose after driving `state.dt` seconds with constant controls
    fn step(&self, state: &KinematicState) -> Pose2D;
}

impl<F> KinematicModel for F
where
    F: Fn(&KinematicState) -> Pose2D,
{
    #[inline]
    fn step(&self, state: &KinematicState) -> Pose2D {
        self(state)
    }
}

/// Constant speed and rate: the robot sweeps a circular arc.
///
/// Falls back to a straight line when the turn over `dt` is negligible.
/// The output heading is left unwrapped.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArcModel;

/// Below this turn (radians) the arc is treated as a straight segment.
const STRAIGHT_EPSILON: f32 = 1e-6;

impl KinematicModel for ArcModel {
    fn step(&self, s: &KinematicState) -> Pose2D {
        let theta = s.heading.to_radians();
        let omega = s.rate.to_radians();
        let turn = omega * s.dt;
        let (sin_t, cos_t) = theta.sin_cos();

        let (x, y) = if turn.abs() < STRAIGHT_EPSILON {
            let d = s.speed * s.dt;
            (s.x + d * cos_t, s.y + d * sin_t)
        } else {
            // Displacement in the start frame, then rotated by theta
            let along = s.speed * turn.sin() / omega;
            let across = s.speed * (1.0 - turn.cos()) / omega;
            (
                s.x + along * cos_t - across * sin_t,
                s.y + along * sin_t + across * cos_t,
            )
        };

        Pose2D::new(x, y, s.heading + s.rate * s.dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_straight_line() {
        let pose = ArcModel.step(&KinematicState {
            x: 1.0,
            y: 2.0,
            heading: 90.0,
            speed: 10.0,
            rate: 0.0,
            dt: 0.5,
        });
        assert_relative_eq!(pose.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.y, 7.0, epsilon = 1e-5);
        assert_relative_eq!(pose.heading, 90.0);
    }

    #[test]
    fn test_pure_rotation_stays_put() {
        let pose = ArcModel.step(&KinematicState {
            x: 3.0,
            y: 4.0,
            heading: 10.0,
            speed: 0.0,
            rate: -90.0,
            dt: 1.0,
        });
        assert_relative_eq!(pose.x, 3.0);
        assert_relative_eq!(pose.y, 4.0);
        assert_relative_eq!(pose.heading, -80.0);
    }

    #[test]
    fn test_quarter_circle() {
        // Radius v/w = 1, quarter turn toward +y ends at (1, 1)
        let pose = ArcModel.step(&KinematicState {
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            speed: std::f32::consts::FRAC_PI_2,
            rate: 90.0,
            dt: 1.0,
        });
        assert_relative_eq!(pose.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(pose.heading, 90.0);
    }

    #[test]
    fn test_closure_model() {
        let teleport = |s: &KinematicState| Pose2D::new(s.x + 1.0, s.y, s.heading);
        let pose = teleport.step(&KinematicState::default());
        assert_relative_eq!(pose.x, 1.0);
    }
}
