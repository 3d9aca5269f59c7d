//! Continuous robot pose and angle helpers (degrees throughout).

use super::coord::GridCoord;

/// Robot pose in physical units, heading in degrees.
///
/// `heading` is not wrapped here: chained motion needs a continuous angle so
/// heading intervals stay ordered. Use [`normalize_degrees`] for display.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose2D {
    /// X position (along columns)
    pub x: f32,
    /// Y position (down the rows)
    pub y: f32,
    /// Heading in degrees, 0 faces +x
    pub heading: f32,
}

impl Pose2D {
    /// Create a new pose
    #[inline]
    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }

    /// Pose at the center of a grid cell
    pub fn at_cell_center(cell: GridCoord, cell_size: f32, heading: f32) -> Self {
        Self::new(
            (cell.x as f32 + 0.5) * cell_size,
            (cell.y as f32 + 0.5) * cell_size,
            heading,
        )
    }

    /// Cell that contains this pose
    pub fn cell(&self, cell_size: f32) -> GridCoord {
        GridCoord::new(
            (self.x / cell_size).floor() as i32,
            (self.y / cell_size).floor() as i32,
        )
    }
}

/// Canonicalize an angle in degrees to (-180, 180].
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = (angle + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Unit vector for a heading in degrees
#[inline]
pub fn heading_vector(heading: f32) -> (f32, f32) {
    let rad = heading.to_radians();
    (rad.cos(), rad.sin())
}

/// Signed angle in degrees that rotates `from` onto `to`.
///
/// Positive angles turn from +x toward +y. The result is in (-180, 180].
pub fn signed_angle(from: (f32, f32), to: (f32, f32)) -> f32 {
    let cross = from.0 * to.1 - from.1 * to.0;
    let dot = from.0 * to.0 + from.1 * to.1;
    normalize_degrees(cross.atan2(dot).to_degrees())
}
