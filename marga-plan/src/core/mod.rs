//! Core types shared by every planning stage.
//!
//! ## Coordinate System
//!
//! Grids are stored row-major and addressed in image order:
//! - **x**: column index, growing to the right
//! - **y**: row index, growing downward
//! - **Heading**: degrees in (-180, 180]. 0° faces +x, +90° faces +y
//!
//! A cell `(col, row)` covers the physical square
//! `[col * cell_size, (col + 1) * cell_size) × [row * cell_size, (row + 1) * cell_size)`.

mod coord;
mod pose;

pub use coord::{Direction, GridCoord};
pub use pose::{Pose2D, heading_vector, normalize_degrees, signed_angle};
