//! Occupancy grids and the navigation fields built from them.
//!
//! Every field is a dense row-major `Vec` indexed as `y * width + x`,
//! rebuilt once per planning cycle and read-only afterwards.
//!
//! ## Pipeline
//!
//! ```text
//! OccupancyGrid ─► clearance ─► buffer ─► distances ─► direction_field
//! ```
//!
//! [`NavigationFields::build`] runs the four stages in order.

mod fields;
mod occupancy;

pub use fields::{
    ClearanceField, DirectionField, DistanceField, NavigationFields, UNREACHED, buffer, clearance,
    direction_field, distances,
};
pub use occupancy::{BufferedGrid, OccupancyGrid};

use crate::core::GridCoord;

/// Row-major index of `coord`, `None` when outside `width × height`.
#[inline]
pub(crate) fn cell_index(width: usize, height: usize, coord: GridCoord) -> Option<usize> {
    if coord.x < 0 || coord.y < 0 {
        return None;
    }
    let (x, y) = (coord.x as usize, coord.y as usize);
    if x >= width || y >= height {
        return None;
    }
    Some(y * width + x)
}

/// Coordinate of a row-major index
#[inline]
pub(crate) fn index_coord(width: usize, idx: usize) -> GridCoord {
    GridCoord::new((idx % width) as i32, (idx / width) as i32)
}
