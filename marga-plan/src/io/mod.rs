//! Debug serialization and visualization.
//!
//! - **Maze text**: `#` wall, `.` free, one row per line
//! - **PGM export**: direction and clearance fields as grayscale images
//! - **SVG overlay**: buffered grid with the refiner's regions drawn on top
//!
//! ## Example
//!
//! ```rust,ignore
//! use marga_plan::io::{read_maze, export_direction_pgm, SvgOverlay, SvgConfig};
//! use std::path::Path;
//!
//! let grid = read_maze(Path::new("demos/mazes/corridor.txt"))?;
//! let fields = NavigationFields::build(&grid, destination, 1.0)?;
//! export_direction_pgm(&fields.directions, Path::new("directions.pgm"))?;
//!
//! let mut overlay = SvgOverlay::new(SvgConfig::default());
//! planner.plan(&snapshot, &mut overlay)?;
//! overlay.save(&fields.buffered, 1.0, Path::new("plan.svg"))?;
//! ```

pub mod maze;
pub mod pgm;
pub mod svg;

use thiserror::Error;

use crate::error::PlanError;

pub use maze::{format_maze, parse_maze, read_maze, write_maze};
pub use pgm::{
    direction_from_intensity, direction_intensity, export_clearance_pgm, export_direction_pgm,
    write_clearance_pgm, write_direction_pgm,
};
pub use svg::{SvgColorScheme, SvgConfig, SvgOverlay};

/// Debug I/O error
#[derive(Error, Debug)]
pub enum IoError {
    /// File access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Maze text could not be parsed
    #[error("Maze line {line}: {message}")]
    Format {
        /// 1-based line number
        line: usize,
        /// What was wrong with it
        message: String,
    },

    /// Parsed rows did not form a valid grid
    #[error("Maze grid rejected: {0}")]
    Grid(#[from] PlanError),
}
