//! Clearance, distance and direction fields.
//!
//! All three are 4-connected breadth-first sweeps over the grid:
//!
//! 1. **Clearance**: brushfire outward from every wall, so each cell holds
//!    its step distance to the nearest wall. The area outside the grid counts
//!    as wall, which keeps every value finite even on a wall-free grid.
//! 2. **Distance**: wavefront outward from the destination through free
//!    cells of the buffered grid.
//! 3. **Direction**: each reachable cell points at the neighbor that is
//!    closest to the destination, preferring the neighbor farther from walls
//!    on ties.

use std::collections::VecDeque;

use tracing::debug;

use crate::core::{Direction, GridCoord};
use crate::error::{PlanError, Result};

use super::occupancy::{BufferedGrid, OccupancyGrid};
use super::{cell_index, index_coord};

/// Distance value of a cell the wavefront never reached.
pub const UNREACHED: u32 = u32::MAX;

/// Step distance from each cell to the nearest wall (0 on walls).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClearanceField {
    width: usize,
    height: usize,
    values: Vec<u32>,
}

impl ClearanceField {
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

    /// Clearance at a cell, `None` outside the grid
    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<u32> {
        cell_index(self.width, self.height, coord).map(|idx| self.values[idx])
    }

    /// Row-major values
    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Largest clearance in the grid
    pub fn max(&self) -> u32 {
        self.values.iter().copied().max().unwrap_or(0)
    }
}

/// BFS step distance from each cell to the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DistanceField {
    width: usize,
    height: usize,
    destination: GridCoord,
    values: Vec<u32>,
}

impl DistanceField {
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

    /// Wavefront source
    #[inline]
    pub fn destination(&self) -> GridCoord {
        self.destination
    }

    /// Raw value at a cell ([`UNREACHED`] included), `None` outside the grid
    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<u32> {
        cell_index(self.width, self.height, coord).map(|idx| self.values[idx])
    }

    /// Distance at a cell, `None` when outside the grid or unreached
    #[inline]
    pub fn distance(&self, coord: GridCoord) -> Option<u32> {
        self.get(coord).filter(|&d| d != UNREACHED)
    }

    /// Row-major values
    #[inline]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Number of cells with a finite distance
    pub fn reachable_count(&self) -> usize {
        self.values.iter().filter(|&&d| d != UNREACHED).count()
    }
}

/// Next move from each cell toward the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectionField {
    width: usize,
    height: usize,
    destination: GridCoord,
    values: Vec<Direction>,
}

impl DirectionField {
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

    /// Destination the field leads to
    #[inline]
    pub fn destination(&self) -> GridCoord {
        self.destination
    }

    /// Direction at a cell, `None` outside the grid
    #[inline]
    pub fn get(&self, coord: GridCoord) -> Option<Direction> {
        cell_index(self.width, self.height, coord).map(|idx| self.values[idx])
    }

    /// Row-major values
    #[inline]
    pub fn values(&self) -> &[Direction] {
        &self.values
    }
}

/// Compute the clearance field of a wall grid.
pub fn clearance(grid: &OccupancyGrid) -> ClearanceField {
    let (width, height) = grid.dimensions();
    let mut values = vec![UNREACHED; width * height];
    let mut queue = VecDeque::with_capacity(width * height);

    // Ring 0: the walls themselves
    for (idx, &wall) in grid.cells().iter().enumerate() {
        if wall {
            values[idx] = 0;
            queue.push_back(index_coord(width, idx));
        }
    }

    // Ring 1 seeds from the virtual wall around the grid
    for (idx, value) in values.iter_mut().enumerate() {
        let coord = index_coord(width, idx);
        let on_edge = coord.x == 0
            || coord.y == 0
            || coord.x as usize == width - 1
            || coord.y as usize == height - 1;
        if on_edge && *value == UNREACHED {
            *value = 1;
            queue.push_back(coord);
        }
    }

    brushfire(&mut values, width, height, &mut queue, |_| true);

    ClearanceField {
        width,
        height,
        values,
    }
}

/// Inflate walls by `radius` grid units.
pub fn buffer(
    grid: &OccupancyGrid,
    clearance: &ClearanceField,
    radius: f32,
) -> Result<BufferedGrid> {
    if grid.dimensions() != (clearance.width, clearance.height) {
        return Err(PlanError::precondition(format!(
            "clearance field is {}x{}, grid is {}x{}",
            clearance.width,
            clearance.height,
            grid.width(),
            grid.height()
        )));
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(PlanError::precondition(format!(
            "buffer radius must be finite and non-negative, got {}",
            radius
        )));
    }

    let occupied = grid
        .cells()
        .iter()
        .zip(&clearance.values)
        .map(|(&wall, &c)| wall || c as f32 <= radius)
        .collect();

    Ok(BufferedGrid::from_parts(
        grid.width(),
        grid.height(),
        radius,
        occupied,
    ))
}

/// Wavefront distances from `destination` over free buffered cells.
///
/// Fails with [`PlanError::InvalidDestination`] before any search when the
/// destination is outside the grid or occupied.
pub fn distances(buffered: &BufferedGrid, destination: GridCoord) -> Result<DistanceField> {
    let (width, height) = buffered.dimensions();
    let Some(dest_idx) = cell_index(width, height, destination) else {
        return Err(PlanError::InvalidDestination {
            x: destination.x,
            y: destination.y,
        });
    };
    if buffered.cells()[dest_idx] {
        return Err(PlanError::InvalidDestination {
            x: destination.x,
            y: destination.y,
        });
    }

    let mut values = vec![UNREACHED; width * height];
    values[dest_idx] = 0;
    let mut queue = VecDeque::from([destination]);
    let occupied = buffered.cells();
    brushfire(&mut values, width, height, &mut queue, |idx| !occupied[idx]);

    let field = DistanceField {
        width,
        height,
        destination,
        values,
    };
    debug!(
        "Distance field: {} of {} cells reach {}",
        field.reachable_count(),
        width * height,
        destination
    );
    Ok(field)
}

/// Pick the next move for every reachable cell.
///
/// Minimizes `(distance, -clearance)` over in-bounds neighbors, scanned in
/// [`Direction::MOVES`] order. The destination and unreached cells get
/// [`Direction::Nowhere`].
pub fn direction_field(
    buffered: &BufferedGrid,
    distances: &DistanceField,
    clearance: &ClearanceField,
) -> Result<DirectionField> {
    let dims = buffered.dimensions();
    if (distances.width, distances.height) != dims || (clearance.width, clearance.height) != dims {
        return Err(PlanError::precondition(format!(
            "field dimensions differ: buffered {}x{}, distances {}x{}, clearance {}x{}",
            dims.0,
            dims.1,
            distances.width,
            distances.height,
            clearance.width,
            clearance.height
        )));
    }

    let (width, height) = dims;
    let mut values = vec![Direction::Nowhere; width * height];

    for (idx, value) in values.iter_mut().enumerate() {
        let d = distances.values[idx];
        if d == 0 || d == UNREACHED || buffered.cells()[idx] {
            continue;
        }
        let coord = index_coord(width, idx);

        let mut best: Option<(u32, i64, Direction)> = None;
        for dir in Direction::MOVES {
            let Some(n_idx) = cell_index(width, height, coord.step(dir)) else {
                continue;
            };
            let key = (distances.values[n_idx], -(clearance.values[n_idx] as i64));
            if best.is_none_or(|(bd, bc, _)| key < (bd, bc)) {
                best = Some((key.0, key.1, dir));
            }
        }

        if let Some((_, _, dir)) = best {
            *value = dir;
        }
    }

    Ok(DirectionField {
        width,
        height,
        destination: distances.destination,
        values,
    })
}

/// Breadth-first expansion with unit steps. `passable` filters which cells
/// may receive a value.
fn brushfire(
    values: &mut [u32],
    width: usize,
    height: usize,
    queue: &mut VecDeque<GridCoord>,
    passable: impl Fn(usize) -> bool,
) {
    while let Some(coord) = queue.pop_front() {
        let Some(idx) = cell_index(width, height, coord) else {
            continue;
        };
        let next = values[idx] + 1;

        for dir in Direction::MOVES {
            let neighbor = coord.step(dir);
            let Some(n_idx) = cell_index(width, height, neighbor) else {
                continue;
            };
            if next < values[n_idx] && passable(n_idx) {
                values[n_idx] = next;
                queue.push_back(neighbor);
            }
        }
    }
}

/// All four fields for one planning cycle.
#[derive(Clone, Debug)]
pub struct NavigationFields {
    /// Distance to the nearest wall
    pub clearance: ClearanceField,
    /// Walls inflated by the robot radius
    pub buffered: BufferedGrid,
    /// Wavefront distance to the destination
    pub distances: DistanceField,
    /// Next move toward the destination
    pub directions: DirectionField,
}

impl NavigationFields {
    /// Run clearance, buffer, distances and direction in order.
    pub fn build(grid: &OccupancyGrid, destination: GridCoord, radius: f32) -> Result<Self> {
        let clearance = clearance(grid);
        let buffered = buffer(grid, &clearance, radius)?;
        let distances = distances(&buffered, destination)?;
        let directions = direction_field(&buffered, &distances, &clearance)?;

        debug!(
            "Fields built: {}x{} grid, {} free after buffer r={:.2}, max clearance {}",
            grid.width(),
            grid.height(),
            buffered.free_count(),
            radius,
            clearance.max()
        );

        Ok(Self {
            clearance,
            buffered,
            distances,
            directions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bordered(width: usize, height: usize) -> OccupancyGrid {
        let mut grid = OccupancyGrid::open(width, height).unwrap();
        for x in 0..width as i32 {
            grid.set_wall(GridCoord::new(x, 0), true);
            grid.set_wall(GridCoord::new(x, height as i32 - 1), true);
        }
        for y in 0..height as i32 {
            grid.set_wall(GridCoord::new(0, y), true);
            grid.set_wall(GridCoord::new(width as i32 - 1, y), true);
        }
        grid
    }

    #[test]
    fn test_clearance_zero_on_walls() {
        let grid = bordered(6, 6);
        let field = clearance(&grid);
        assert_eq!(field.get(GridCoord::new(0, 0)), Some(0));
        assert_eq!(field.get(GridCoord::new(1, 1)), Some(1));
        assert_eq!(field.get(GridCoord::new(2, 2)), Some(2));
        assert_eq!(field.get(GridCoord::new(6, 0)), None);
    }

    #[test]
    fn test_clearance_open_grid_uses_outer_wall() {
        let grid = OccupancyGrid::open(5, 5).unwrap();
        let field = clearance(&grid);
        assert_eq!(field.get(GridCoord::new(0, 0)), Some(1));
        assert_eq!(field.get(GridCoord::new(0, 2)), Some(1));
        assert_eq!(field.get(GridCoord::new(1, 2)), Some(2));
        assert_eq!(field.get(GridCoord::new(2, 2)), Some(3));
    }

    #[test]
    fn test_buffer_threshold_inclusive() {
        let grid = bordered(7, 7);
        let c = clearance(&grid);
        let buffered = buffer(&grid, &c, 1.0).unwrap();
        assert!(buffered.is_occupied(GridCoord::new(1, 1)));
        assert!(!buffered.is_occupied(GridCoord::new(2, 2)));

        let none = buffer(&grid, &c, 0.0).unwrap();
        assert!(!none.is_occupied(GridCoord::new(1, 1)));
        assert!(none.is_occupied(GridCoord::new(0, 3)));
    }

    #[test]
    fn test_buffer_rejects_bad_inputs() {
        let grid = bordered(5, 5);
        let other = clearance(&bordered(4, 5));
        assert!(matches!(
            buffer(&grid, &other, 0.0),
            Err(PlanError::PreconditionViolation(_))
        ));
        let c = clearance(&grid);
        assert!(buffer(&grid, &c, -1.0).is_err());
        assert!(buffer(&grid, &c, f32::NAN).is_err());
    }

    #[test]
    fn test_distances_invalid_destination() {
        let grid = bordered(5, 5);
        let c = clearance(&grid);
        let buffered = buffer(&grid, &c, 0.0).unwrap();

        let err = distances(&buffered, GridCoord::new(0, 0)).unwrap_err();
        assert_eq!(err, PlanError::InvalidDestination { x: 0, y: 0 });

        let err = distances(&buffered, GridCoord::new(9, 2)).unwrap_err();
        assert_eq!(err, PlanError::InvalidDestination { x: 9, y: 2 });
    }

    #[test]
    fn test_distances_wall_cells_unreached() {
        let grid = bordered(5, 5);
        let c = clearance(&grid);
        let buffered = buffer(&grid, &c, 0.0).unwrap();
        let field = distances(&buffered, GridCoord::new(2, 2)).unwrap();

        assert_eq!(field.get(GridCoord::new(2, 2)), Some(0));
        assert_eq!(field.get(GridCoord::new(1, 1)), Some(2));
        assert_eq!(field.get(GridCoord::new(0, 0)), Some(UNREACHED));
        assert_eq!(field.distance(GridCoord::new(0, 0)), None);
        assert_eq!(field.reachable_count(), 9);
    }

    #[test]
    fn test_direction_prefers_clearance_on_ties() {
        // From (1,0) toward (3,2) Down and Right are both shortest;
        // (1,1) has clearance 2, (2,0) on the edge only 1.
        let grid = OccupancyGrid::open(5, 5).unwrap();
        let fields = NavigationFields::build(&grid, GridCoord::new(3, 2), 0.0).unwrap();
        assert_eq!(
            fields.directions.get(GridCoord::new(1, 0)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_direction_full_tie_uses_scan_order() {
        // From (1,1) to (3,3) Down and Right tie on both distance and clearance
        let grid = OccupancyGrid::open(5, 5).unwrap();
        let fields = NavigationFields::build(&grid, GridCoord::new(3, 3), 0.0).unwrap();
        assert_eq!(
            fields.directions.get(GridCoord::new(1, 1)),
            Some(Direction::Down)
        );
    }

    #[test]
    fn test_direction_field_dimension_mismatch() {
        let small = OccupancyGrid::open(4, 4).unwrap();
        let large = OccupancyGrid::open(5, 5).unwrap();
        let f_small = NavigationFields::build(&small, GridCoord::new(1, 1), 0.0).unwrap();
        let f_large = NavigationFields::build(&large, GridCoord::new(1, 1), 0.0).unwrap();
        let err = direction_field(&f_large.buffered, &f_small.distances, &f_large.clearance);
        assert!(matches!(err, Err(PlanError::PreconditionViolation(_))));
    }

    #[test]
    fn test_destination_and_unreached_are_nowhere() {
        let grid = OccupancyGrid::from_rows(&[
            [false, false, true, false],
            [false, false, true, false],
        ])
        .unwrap();
        let fields = NavigationFields::build(&grid, GridCoord::new(0, 0), 0.0).unwrap();
        assert_eq!(fields.directions.get(GridCoord::new(0, 0)), Some(Direction::Nowhere));
        assert_eq!(fields.directions.get(GridCoord::new(3, 1)), Some(Direction::Nowhere));
        assert_eq!(fields.directions.get(GridCoord::new(1, 0)), Some(Direction::Left));
        assert_eq!(fields.directions.destination(), GridCoord::new(0, 0));
    }
}
