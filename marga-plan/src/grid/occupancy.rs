//! Boolean wall grids.

use crate::core::GridCoord;
use crate::error::{PlanError, Result};

use super::cell_index;

/// Wall occupancy as captured from the scene, `true` = wall.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Wrap a row-major cell vector.
    pub fn new(width: usize, height: usize, cells: Vec<bool>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(PlanError::precondition(format!(
                "grid must be non-empty, got {}x{}",
                width, height
            )));
        }
        if cells.len() != width * height {
            return Err(PlanError::precondition(format!(
                "grid {}x{} needs {} cells, got {}",
                width,
                height,
                width * height,
                cells.len()
            )));
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Grid with no walls
    pub fn open(width: usize, height: usize) -> Result<Self> {
        Self::new(width, height, vec![false; width * height])
    }

    /// Build from rows of booleans. Ragged rows are rejected.
    pub fn from_rows<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(PlanError::precondition(format!(
                    "row {} has {} cells, expected {}",
                    y,
                    row.len(),
                    width
                )));
            }
            cells.extend_from_slice(row);
        }
        Self::new(width, height, cells)
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Wall test. Cells outside the grid are walls.
    #[inline]
    pub fn is_wall(&self, coord: GridCoord) -> bool {
        cell_index(self.width, self.height, coord).is_none_or(|idx| self.cells[idx])
    }

    /// Set or clear a wall. Out-of-bounds writes are ignored and return false.
    pub fn set_wall(&mut self, coord: GridCoord, wall: bool) -> bool {
        match cell_index(self.width, self.height, coord) {
            Some(idx) => {
                self.cells[idx] = wall;
                true
            }
            None => false,
        }
    }

    /// Row-major cells
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Iterate over rows
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> {
        self.cells.chunks(self.width)
    }

    /// Number of wall cells
    pub fn wall_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }
}

/// Occupancy inflated by the robot radius.
///
/// A cell is occupied when it is a wall or its clearance is at most the
/// radius. Planning and collision checks only ever read this grid.
#[derive(Clone, Debug, PartialEq)]
pub struct BufferedGrid {
    width: usize,
    height: usize,
    radius: f32,
    occupied: Vec<bool>,
}

impl BufferedGrid {
    pub(crate) fn from_parts(
        width: usize,
        height: usize,
        radius: f32,
        occupied: Vec<bool>,
    ) -> Self {
        Self {
            width,
            height,
            radius,
            occupied,
        }
    }

    /// Grid width in cells
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// (width, height)
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Buffer radius in grid units
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Check if coordinates are within grid bounds
    #[inline]
    pub fn is_valid_coord(&self, coord: GridCoord) -> bool {
        cell_index(self.width, self.height, coord).is_some()
    }

    /// Occupancy test. Cells outside the grid are occupied.
    #[inline]
    pub fn is_occupied(&self, coord: GridCoord) -> bool {
        cell_index(self.width, self.height, coord).is_none_or(|idx| self.occupied[idx])
    }

    /// Row-major occupancy
    #[inline]
    pub fn cells(&self) -> &[bool] {
        &self.occupied
    }

    /// Number of free cells
    pub fn free_count(&self) -> usize {
        self.occupied.iter().filter(|&&c| !c).count()
    }
}
