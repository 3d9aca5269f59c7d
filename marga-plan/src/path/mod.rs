//! Route extraction from a direction field.
//!
//! Follows the field from the robot cell to the destination and run-length
//! encodes the walk into legs. Each leg carries the turn needed before it,
//! measured against the previous leg or, for the first leg, against the
//! robot's continuous heading.

use crate::core::{Direction, GridCoord, heading_vector, signed_angle};
use crate::error::{PlanError, Result};
use crate::grid::DirectionField;

/// One turn-then-run segment of a route.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Leg {
    /// Signed turn before the run, degrees in (-180, 180]
    pub turn_degrees: f32,
    /// Grid move repeated along the run
    pub direction: Direction,
    /// Run length in cells
    pub cells: u32,
}

/// Turn-encoded route in grid units.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Route {
    legs: Vec<Leg>,
}

impl Route {
    /// Route from legs
    pub fn new(legs: Vec<Leg>) -> Self {
        Self { legs }
    }

    /// Ordered legs
    #[inline]
    pub fn legs(&self) -> &[Leg] {
        &self.legs
    }

    /// Number of legs
    #[inline]
    pub fn len(&self) -> usize {
        self.legs.len()
    }

    /// True when the robot is already at the destination
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.legs.is_empty()
    }

    /// Total run length in cells
    pub fn total_cells(&self) -> u32 {
        self.legs.iter().map(|leg| leg.cells).sum()
    }
}

/// Walk `directions` from `start` and encode the route.
///
/// An empty route means `start` is the destination. `Unreachable` is
/// returned when `start` has no move. A field that leaves the grid, dead-ends
/// away from the destination or loops is a precondition violation.
pub fn extract_path(
    start: GridCoord,
    directions: &DirectionField,
    start_heading: f32,
) -> Result<Route> {
    let first = directions.get(start).ok_or_else(|| {
        PlanError::precondition(format!(
            "start {} outside {}x{} direction field",
            start,
            directions.width(),
            directions.height()
        ))
    })?;

    let destination = directions.destination();
    if first == Direction::Nowhere {
        return if start == destination {
            Ok(Route::default())
        } else {
            Err(PlanError::Unreachable {
                x: start.x,
                y: start.y,
            })
        };
    }

    let max_steps = directions.width() * directions.height();
    let mut legs: Vec<Leg> = Vec::new();
    let mut previous = heading_vector(start_heading);
    let mut current = start;
    let mut steps = 0usize;

    while current != destination {
        let dir = match directions.get(current) {
            Some(dir) if dir.is_move() => dir,
            Some(_) => {
                return Err(PlanError::precondition(format!(
                    "direction field dead-ends at {} before reaching {}",
                    current, destination
                )));
            }
            None => {
                return Err(PlanError::precondition(format!(
                    "direction field leaves the grid at {}",
                    current
                )));
            }
        };

        steps += 1;
        if steps > max_steps {
            return Err(PlanError::precondition(format!(
                "direction field loops: no arrival after {} steps",
                max_steps
            )));
        }

        match legs.last_mut() {
            Some(leg) if leg.direction == dir => leg.cells += 1,
            _ => {
                // is_move() guarantees a vector
                let vector = dir.vector().unwrap_or(previous);
                legs.push(Leg {
                    turn_degrees: signed_angle(previous, vector),
                    direction: dir,
                    cells: 1,
                });
                previous = vector;
            }
        }

        current = current.step(dir);
    }

    Ok(Route::new(legs))
}
