//! # MargaPlan
//!
//! Uncertainty-aware motion planning for a robot confined to a grid maze.
//!
//! ## Overview
//!
//! One planning call turns a scene snapshot into drive commands that are
//! provably clear of walls under worst-case kinematic error:
//!
//! - **Field Builder** ([`grid`]): wall clearance, robot-radius buffer,
//!   destination wavefront and a clearance-aware direction field
//! - **Path Extractor** ([`path`]): follows the direction field into
//!   turn-and-run legs relative to the robot's actual heading
//! - **Motion Evaluator** ([`motion`]): bounds every pose a primitive can
//!   reach given uncertain speed, rate and start pose
//! - **Sequence Refiner** ([`refine`]): chains those bounds along the plan
//!   and halves unsafe primitives under a depth budget
//!
//! ## Quick Start
//!
//! ```rust
//! use marga_plan::{GridCoord, NullSink, OccupancyGrid, PlanConfig, PlanOutcome, Planner, Snapshot};
//!
//! let grid = OccupancyGrid::open(8, 8).unwrap();
//! let mut config = PlanConfig::default();
//! config.robot.radius = 0.0;
//!
//! let planner = Planner::new(config).unwrap();
//! let snapshot = Snapshot {
//!     grid,
//!     destination: GridCoord::new(5, 2),
//!     robot_cell: GridCoord::new(2, 2),
//!     heading_degrees: 0.0,
//! };
//!
//! match planner.plan(&snapshot, &mut NullSink).unwrap() {
//!     PlanOutcome::Planned(plan) => assert!(!plan.commands().is_empty()),
//!     PlanOutcome::AlreadyAtDestination => unreachable!(),
//! }
//! ```
//!
//! ## Coordinate System
//!
//! Image convention: x along columns, y down the rows, heading in degrees
//! with 0° facing +x and +90° facing +y. See [`core`].

#![warn(missing_docs)]

// Core types
pub mod core;

// Planner configuration
pub mod config;

// Error types
pub mod error;

// Occupancy grids and navigation fields
pub mod grid;

// Route extraction
pub mod path;

// Primitives and reachable-set bounds
pub mod motion;

// Safety refinement
pub mod refine;

// Collaborator interfaces for one planning cycle
pub mod cycle;

// Debug serialization
pub mod io;

// Re-export commonly used types
pub use crate::core::{Direction, GridCoord, Pose2D, normalize_degrees, signed_angle};

pub use config::{ConfigLoadError, PlanConfig};

pub use error::{PlanError, Result};

pub use grid::{
    BufferedGrid, ClearanceField, DirectionField, DistanceField, NavigationFields, OccupancyGrid,
    UNREACHED,
};

pub use path::{Leg, Route, extract_path};

pub use motion::{
    ActionSequence, ArcModel, BoundingRegion, DriveCommand, KinematicModel, KinematicState,
    MotionEvaluator, MotionPrimitive, MotionProfile, Parameter, PrimitiveClass, PrimitiveKind,
};

pub use refine::{
    NullSink, RecordingSink, RefineOutcome, Refinement, RegionSink, RegionTag, SequenceRefiner,
};

pub use cycle::{CycleError, CycleReport, SceneSource, Transport, run_cycle};

use tracing::{debug, info};

/// Everything the vision side reports for one cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    /// Wall occupancy
    pub grid: OccupancyGrid,
    /// Target cell
    pub destination: GridCoord,
    /// Cell holding the robot
    pub robot_cell: GridCoord,
    /// Robot heading in degrees (image frame)
    pub heading_degrees: f32,
}

/// Planned route and its approved primitives
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    /// Grid route from the robot cell
    pub route: Route,
    /// Safety-refined primitives
    pub refinement: Refinement,
}

impl Plan {
    /// Turn/distance pairs for the transport
    pub fn commands(&self) -> Vec<DriveCommand> {
        self.refinement.commands()
    }
}

/// Result of one successful planning call
#[derive(Clone, Debug, PartialEq)]
pub enum PlanOutcome {
    /// The robot already occupies the destination cell
    AlreadyAtDestination,
    /// A refined plan toward the destination
    Planned(Plan),
}

/// Runs the full pipeline for a snapshot.
pub struct Planner<M = ArcModel> {
    config: PlanConfig,
    evaluator: MotionEvaluator<M>,
}

impl Planner<ArcModel> {
    /// Create a planner over the arc model
    pub fn new(config: PlanConfig) -> Result<Self> {
        Self::with_model(config, ArcModel)
    }
}

impl<M: KinematicModel> Planner<M> {
    /// Create a planner over a custom kinematic model
    pub fn with_model(config: PlanConfig, model: M) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            evaluator: MotionEvaluator::with_model(model),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    /// Motion evaluator in use
    pub fn evaluator(&self) -> &MotionEvaluator<M> {
        &self.evaluator
    }

    /// Build fields for a snapshot without planning
    pub fn fields(&self, snapshot: &Snapshot) -> Result<NavigationFields> {
        NavigationFields::build(
            &snapshot.grid,
            snapshot.destination,
            self.config.robot_radius(),
        )
    }

    /// Plan from the snapshot's robot cell to its destination.
    ///
    /// Every region the refiner evaluates is passed to `sink`.
    pub fn plan(&self, snapshot: &Snapshot, sink: &mut dyn RegionSink) -> Result<PlanOutcome> {
        let fields = self.fields(snapshot)?;
        let route = extract_path(
            snapshot.robot_cell,
            &fields.directions,
            snapshot.heading_degrees,
        )?;

        if route.is_empty() {
            info!("Robot already at destination {}", snapshot.destination);
            return Ok(PlanOutcome::AlreadyAtDestination);
        }
        debug!(
            "Route from {} to {}: {} legs, {} cells",
            snapshot.robot_cell,
            snapshot.destination,
            route.len(),
            route.total_cells()
        );

        let cell_size = self.config.cell_size();
        let actions = ActionSequence::from_route(&route, cell_size, &self.config.motion_profile());
        let start =
            Pose2D::at_cell_center(snapshot.robot_cell, cell_size, snapshot.heading_degrees);

        let refiner = SequenceRefiner::new(
            &self.evaluator,
            &fields.buffered,
            cell_size,
            self.config.refine.max_depth,
        )?;
        let refinement = refiner.refine(start, actions, sink)?;

        info!(
            "Plan ready: {} primitives after {} attempts ({:?})",
            refinement.actions.len(),
            refinement.attempts,
            refinement.outcome
        );
        Ok(PlanOutcome::Planned(Plan { route, refinement }))
    }
}
