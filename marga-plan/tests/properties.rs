//! Randomized invariant checks over seeded mazes.

mod common;

use marga_plan::motion::{MotionInputs, PoseEstimate};
use marga_plan::{
    Direction, GridCoord, MotionEvaluator, MotionPrimitive, NavigationFields, NullSink,
    OccupancyGrid, Parameter, PlanError, PlanOutcome, Planner, Pose2D, PrimitiveClass,
    SequenceRefiner, Snapshot, UNREACHED, extract_path,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: u64 = 24;

fn all_cells(grid: &OccupancyGrid) -> impl Iterator<Item = GridCoord> + '_ {
    (0..grid.height() as i32)
        .flat_map(move |y| (0..grid.width() as i32).map(move |x| GridCoord::new(x, y)))
}

/// Fields for a random maze, skipping seeds whose destination lands in the buffer.
fn random_fields(seed: u64, radius: f32) -> Option<(OccupancyGrid, NavigationFields)> {
    let grid = common::random_grid(seed, 18, 13, 0.25);
    let mut rng = StdRng::seed_from_u64(seed ^ 0x5eed);
    let destination = common::random_free_cell(&mut rng, &grid)?;
    match NavigationFields::build(&grid, destination, radius) {
        Ok(fields) => Some((grid, fields)),
        Err(PlanError::InvalidDestination { .. }) => None,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_following_directions_reaches_destination_in_d_steps() {
    for seed in 0..SEEDS {
        let Some((grid, fields)) = random_fields(seed, 0.0) else {
            continue;
        };
        let destination = fields.directions.destination();

        for cell in all_cells(&grid) {
            let Some(d) = fields.distances.distance(cell) else {
                assert_eq!(fields.directions.get(cell), Some(Direction::Nowhere));
                continue;
            };

            let mut current = cell;
            for step in 0..d {
                let dir = fields.directions.get(current).unwrap();
                assert!(dir.is_move(), "seed {seed}: stalled at {current}");
                let next = current.step(dir);
                assert_eq!(
                    fields.distances.get(next),
                    Some(d - step - 1),
                    "seed {seed}: distance must drop by one"
                );
                current = next;
            }
            assert_eq!(current, destination);
        }
    }
}

#[test]
fn test_clearance_shape() {
    for seed in 0..SEEDS {
        let grid = common::random_grid(seed, 16, 11, 0.2);
        let clearance = marga_plan::grid::clearance(&grid);

        for cell in all_cells(&grid) {
            let c = clearance.get(cell).unwrap();
            if grid.is_wall(cell) {
                assert_eq!(c, 0);
                continue;
            }
            assert!(c >= 1);

            let neighbors: Vec<Option<u32>> = Direction::MOVES
                .iter()
                .map(|&dir| clearance.get(cell.step(dir)))
                .collect();
            for n in neighbors.iter().flatten() {
                assert!(n.abs_diff(c) <= 1, "seed {seed}: jump at {cell}");
            }
            // Some neighbor (or the outside) is one step closer to a wall
            let has_closer = neighbors.iter().any(|n| n.is_none_or(|n| n + 1 == c));
            assert!(has_closer, "seed {seed}: {cell} has no closer neighbor");
        }
    }
}

#[test]
fn test_buffer_matches_clearance() {
    for (seed, radius) in (0..SEEDS).zip([0.0f32, 0.5, 1.0, 1.5, 2.0].into_iter().cycle()) {
        let grid = common::random_grid(seed, 14, 14, 0.15);
        let clearance = marga_plan::grid::clearance(&grid);
        let buffered = marga_plan::grid::buffer(&grid, &clearance, radius).unwrap();

        for cell in all_cells(&grid) {
            let expected = grid.is_wall(cell) || clearance.get(cell).unwrap() as f32 <= radius;
            assert_eq!(buffered.is_occupied(cell), expected);
        }
    }
}

#[test]
fn test_route_length_equals_distance() {
    for seed in 0..SEEDS {
        let Some((grid, fields)) = random_fields(seed, 0.5) else {
            continue;
        };
        let mut rng = StdRng::seed_from_u64(seed);

        for cell in all_cells(&grid) {
            let heading = rng.gen_range(-540.0f32..540.0);
            match fields.distances.get(cell).unwrap() {
                UNREACHED => {
                    if !fields.buffered.is_occupied(cell) {
                        let err = extract_path(cell, &fields.directions, heading).unwrap_err();
                        assert_eq!(
                            err,
                            PlanError::Unreachable {
                                x: cell.x,
                                y: cell.y,
                            }
                        );
                    }
                }
                d => {
                    let route = extract_path(cell, &fields.directions, heading).unwrap();
                    assert_eq!(route.total_cells(), d);
                    for leg in route.legs() {
                        assert!(leg.turn_degrees > -180.0 && leg.turn_degrees <= 180.0);
                        assert!(leg.cells > 0);
                    }
                    // consecutive legs never repeat a direction
                    for pair in route.legs().windows(2) {
                        assert_ne!(pair[0].direction, pair[1].direction);
                    }
                }
            }
        }
    }
}

fn random_parameter(rng: &mut StdRng, lo: f32, hi: f32, max_error: f32) -> Parameter {
    Parameter::new(rng.gen_range(lo..hi), rng.gen_range(0.0..max_error))
}

#[test]
fn test_zero_error_region_is_nominal_point() {
    let evaluator = MotionEvaluator::new();
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..200 {
        let inputs = MotionInputs {
            x: Parameter::exact(rng.gen_range(-10.0..10.0)),
            y: Parameter::exact(rng.gen_range(-10.0..10.0)),
            heading: Parameter::exact(rng.gen_range(-180.0..180.0)),
            speed: Parameter::exact(rng.gen_range(0.0..20.0)),
            rate: Parameter::exact(rng.gen_range(-120.0..120.0)),
            dt: rng.gen_range(0.0..3.0),
        };
        let region = evaluator.bounding_region(&inputs);
        assert!(region.is_point());
        assert_eq!(region.centroid(), evaluator.evaluate(&inputs));
    }
}

#[test]
fn test_region_never_tighter_than_start() {
    let evaluator = MotionEvaluator::new();
    let mut rng = StdRng::seed_from_u64(11);
    for _ in 0..200 {
        let class = PrimitiveClass {
            speed: random_parameter(&mut rng, 1.0, 20.0, 2.0),
            rate: random_parameter(&mut rng, 30.0, 120.0, 10.0),
        };
        let primitive = if rng.gen_bool(0.5) {
            MotionPrimitive::rotate(rng.gen_range(-180.0..180.0), &class)
        } else {
            MotionPrimitive::advance(rng.gen_range(0.0..10.0), &class)
        };
        let start = PoseEstimate {
            x: random_parameter(&mut rng, -5.0, 5.0, 1.0),
            y: random_parameter(&mut rng, -5.0, 5.0, 1.0),
            heading: random_parameter(&mut rng, -90.0, 90.0, 5.0),
        };

        let region = evaluator.primitive_region(&primitive, &start).unwrap();
        let (hx, hy, hh) = region.half_extents();
        assert!(hx >= start.x.error - 1e-4);
        assert!(hy >= start.y.error - 1e-4);
        assert!(hh >= start.heading.error - 1e-4);

        // The nominal outcome is always inside the box
        let nominal = evaluator.evaluate(&MotionInputs::for_primitive(&primitive, &start).unwrap());
        assert!(nominal.x >= region.min_x && nominal.x <= region.max_x);
        assert!(nominal.y >= region.min_y && nominal.y <= region.max_y);
    }
}

#[test]
fn test_approved_plans_are_collision_free() {
    let mut planned = 0;
    for seed in 0..SEEDS {
        let grid = common::random_grid(seed, 20, 15, 0.12);
        let mut rng = StdRng::seed_from_u64(seed + 100);
        let (Some(robot), Some(destination)) = (
            common::random_free_cell(&mut rng, &grid),
            common::random_free_cell(&mut rng, &grid),
        ) else {
            continue;
        };

        let planner = Planner::new(common::config(0.0, 3)).unwrap();
        let snapshot = Snapshot {
            grid,
            destination,
            robot_cell: robot,
            heading_degrees: rng.gen_range(-180.0..180.0),
        };

        let plan = match planner.plan(&snapshot, &mut NullSink) {
            Ok(PlanOutcome::Planned(plan)) => plan,
            Ok(PlanOutcome::AlreadyAtDestination) => continue,
            Err(PlanError::Unreachable { .. }) | Err(PlanError::RefinementDepthExceeded { .. }) => {
                continue;
            }
            Err(e) => panic!("seed {seed}: unexpected error {e}"),
        };
        planned += 1;

        let fields = planner.fields(&snapshot).unwrap();
        let refiner = SequenceRefiner::new(planner.evaluator(), &fields.buffered, 1.0, 3).unwrap();
        assert_eq!(plan.refinement.regions.len(), plan.refinement.actions.len());
        for region in &plan.refinement.regions {
            assert!(refiner.region_is_safe(region), "seed {seed}: unsafe region");
        }
        assert!(plan.refinement.actions.len() <= 2 * plan.route.len());

        // Any halving is reported, so a cut plan never looks finished
        let refinement = &plan.refinement;
        assert_eq!(refinement.requested, 2 * plan.route.len());
        if refinement.depth > 0 {
            assert!(refinement.needs_replan(), "seed {seed}: halved plan marked complete");
        }
        if refinement.is_complete() {
            assert_eq!(refinement.actions.len(), refinement.requested);
        }

        let start = Pose2D::at_cell_center(robot, 1.0, snapshot.heading_degrees);
        assert_eq!(start.cell(1.0), robot);
    }
    assert!(planned > 0);
}
