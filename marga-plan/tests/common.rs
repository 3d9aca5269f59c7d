//! Test utilities for MargaPlan.
//!
//! Maze fixtures and seeded random grids shared by the integration tests.

#![allow(dead_code)]

use marga_plan::io::parse_maze;
use marga_plan::{GridCoord, OccupancyGrid, PlanConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Grid with no walls.
pub fn open_grid(width: usize, height: usize) -> OccupancyGrid {
    OccupancyGrid::open(width, height).unwrap()
}

/// Grid whose outermost ring is wall.
pub fn bordered_grid(width: usize, height: usize) -> OccupancyGrid {
    let mut grid = open_grid(width, height);
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

/// Single free row between two wall rows, blocked at x = 8.
pub fn blocked_corridor() -> OccupancyGrid {
    parse_maze(
        "; row 1 is free up to the block at x = 8
##########
........#.
##########
",
    )
    .unwrap()
}

/// Wide S-shaped maze with two-cell walls between lanes.
pub fn s_maze() -> OccupancyGrid {
    parse_maze(
        "####################
#..................#
#..................#
#..................#
##############.....#
##############.....#
#..................#
#..................#
#..................#
#.....##############
#.....##############
#..................#
#..................#
#..................#
####################
",
    )
    .unwrap()
}

/// Random walls with the given density, reproducible per seed.
pub fn random_grid(seed: u64, width: usize, height: usize, density: f64) -> OccupancyGrid {
    let mut rng = StdRng::seed_from_u64(seed);
    let cells = (0..width * height).map(|_| rng.gen_bool(density)).collect();
    OccupancyGrid::new(width, height, cells).unwrap()
}

/// Pick a random non-wall cell, if any.
pub fn random_free_cell(rng: &mut StdRng, grid: &OccupancyGrid) -> Option<GridCoord> {
    let free: Vec<GridCoord> = (0..grid.height() as i32)
        .flat_map(|y| (0..grid.width() as i32).map(move |x| GridCoord::new(x, y)))
        .filter(|&c| !grid.is_wall(c))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.gen_range(0..free.len())])
    }
}

/// Default config with the given radius and depth budget.
pub fn config(radius: f32, max_depth: u32) -> PlanConfig {
    let mut config = PlanConfig::default();
    config.robot.radius = radius;
    config.refine.max_depth = max_depth;
    config
}
