//! Safety refinement of primitive sequences.
//!
//! The refiner chains reachable regions along a sequence and checks each
//! one against the buffered grid. At the first unsafe primitive it either
//! halves that primitive (dropping everything after it) and tries again, or,
//! once the depth budget is spent, keeps only the safe prefix.
//!
//! ```text
//! first unsafe │ depth < max_depth        │ depth == max_depth
//! ─────────────┼──────────────────────────┼────────────────────────────
//! none         │ Complete, or Shortened   │ Complete, or Shortened
//!              │ if anything was halved   │ if anything was halved
//! 0            │ halve primitive 0        │ RefinementDepthExceeded
//! i > 0        │ keep [0, i) + half of i  │ Truncated to [0, i)
//! ```
//!
//! Each attempt works on an immutable `(sequence, depth)` snapshot.

mod sink;

pub use sink::{NullSink, RecordingSink, RegionSink, RegionTag};

use tracing::{debug, warn};

use crate::core::{GridCoord, Pose2D};
use crate::error::{PlanError, Result};
use crate::grid::BufferedGrid;
use crate::motion::{
    ActionSequence, ArcModel, BoundingRegion, DriveCommand, KinematicModel, MotionEvaluator,
    PoseEstimate,
};

/// How the approved sequence relates to the requested one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefineOutcome {
    /// The requested sequence is safe as given
    Complete,
    /// Safe after halving; the robot stops short of the destination
    Shortened,
    /// Depth budget ran out; only the safe prefix was kept
    Truncated,
}

/// Approved sequence and how it was reached.
#[derive(Clone, Debug, PartialEq)]
pub struct Refinement {
    /// Approved primitives
    pub actions: ActionSequence,
    /// Region of each approved primitive
    pub regions: Vec<BoundingRegion>,
    /// Number of primitives originally requested
    pub requested: usize,
    /// Halvings applied
    pub depth: u32,
    /// Sweeps run, including the accepted one
    pub attempts: u32,
    /// How the approved sequence relates to the requested one
    pub outcome: RefineOutcome,
}

impl Refinement {
    /// True when nothing had to be cut
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.outcome == RefineOutcome::Complete
    }

    /// True when the robot will stop short and another cycle is needed
    #[inline]
    pub fn needs_replan(&self) -> bool {
        !self.is_complete()
    }

    /// Drive commands for the approved sequence
    pub fn commands(&self) -> Vec<DriveCommand> {
        self.actions.commands()
    }
}

/// Regions of one attempt, up to and including the first unsafe primitive.
struct Sweep {
    regions: Vec<BoundingRegion>,
    first_unsafe: Option<usize>,
}

/// Checks primitive sequences against a buffered grid.
pub struct SequenceRefiner<'a, M = ArcModel> {
    evaluator: &'a MotionEvaluator<M>,
    grid: &'a BufferedGrid,
    cell_size: f32,
    max_depth: u32,
}

impl<'a, M: KinematicModel> SequenceRefiner<'a, M> {
    /// Create a refiner. `cell_size` maps physical units to grid cells.
    pub fn new(
        evaluator: &'a MotionEvaluator<M>,
        grid: &'a BufferedGrid,
        cell_size: f32,
        max_depth: u32,
    ) -> Result<Self> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(PlanError::precondition(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        Ok(Self {
            evaluator,
            grid,
            cell_size,
            max_depth,
        })
    }

    /// Depth budget
    #[inline]
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Refine `actions` executed from `start` until safe or out of budget.
    ///
    /// Every evaluated region goes to `sink` as a Trial; the approved regions
    /// are then re-emitted as Final.
    pub fn refine(
        &self,
        start: Pose2D,
        actions: ActionSequence,
        sink: &mut dyn RegionSink,
    ) -> Result<Refinement> {
        let requested = actions.len();
        let mut sequence = actions;
        let mut depth = 0u32;
        let mut attempts = 0u32;

        loop {
            attempts += 1;
            let mut sweep = self.sweep(start, &sequence, attempts, sink)?;

            let Some(index) = sweep.first_unsafe else {
                debug!(
                    "Sequence of {} primitives safe after {} attempts (depth {})",
                    sequence.len(),
                    attempts,
                    depth
                );
                let outcome = if depth == 0 {
                    RefineOutcome::Complete
                } else {
                    RefineOutcome::Shortened
                };
                return Ok(Self::finish(
                    sequence,
                    sweep.regions,
                    requested,
                    depth,
                    attempts,
                    outcome,
                    sink,
                ));
            };

            if depth >= self.max_depth {
                if index == 0 {
                    return Err(PlanError::RefinementDepthExceeded { attempts, depth });
                }
                warn!(
                    "Depth budget {} spent, keeping {} of {} primitives",
                    self.max_depth,
                    index,
                    sequence.len()
                );
                sweep.regions.truncate(index);
                return Ok(Self::finish(
                    sequence.truncated(index),
                    sweep.regions,
                    requested,
                    depth,
                    attempts,
                    RefineOutcome::Truncated,
                    sink,
                ));
            }

            debug!("Attempt {}: primitive {} unsafe, halving at depth {}", attempts, index, depth);
            sequence = if index == 0 {
                sequence.with_halved(0)
            } else {
                sequence.bisected_at(index)
            };
            depth += 1;
        }
    }

    /// True when every cell under the region's x/y box is free and inside
    /// the grid.
    pub fn region_is_safe(&self, region: &BoundingRegion) -> bool {
        let bounds = [region.min_x, region.max_x, region.min_y, region.max_y];
        if bounds.iter().any(|v| !v.is_finite()) {
            return false;
        }

        let low = Pose2D::new(region.min_x, region.min_y, 0.0).cell(self.cell_size);
        let high = Pose2D::new(region.max_x, region.max_y, 0.0).cell(self.cell_size);
        if !self.grid.is_valid_coord(low) || !self.grid.is_valid_coord(high) {
            return false;
        }

        (low.y..=high.y)
            .all(|y| (low.x..=high.x).all(|x| !self.grid.is_occupied(GridCoord::new(x, y))))
    }

    fn sweep(
        &self,
        start: Pose2D,
        sequence: &ActionSequence,
        attempt: u32,
        sink: &mut dyn RegionSink,
    ) -> Result<Sweep> {
        let mut regions = Vec::with_capacity(sequence.len());
        let mut estimate = PoseEstimate::exact(start);

        for (index, primitive) in sequence.primitives().iter().enumerate() {
            let region = self.evaluator.primitive_region(primitive, &estimate)?;
            sink.record(RegionTag::Trial { attempt, index }, &region);
            regions.push(region);

            if !self.region_is_safe(&region) {
                return Ok(Sweep {
                    regions,
                    first_unsafe: Some(index),
                });
            }
            estimate = PoseEstimate::from_region(&region);
        }

        Ok(Sweep {
            regions,
            first_unsafe: None,
        })
    }

    fn finish(
        actions: ActionSequence,
        regions: Vec<BoundingRegion>,
        requested: usize,
        depth: u32,
        attempts: u32,
        outcome: RefineOutcome,
        sink: &mut dyn RegionSink,
    ) -> Refinement {
        for (index, region) in regions.iter().enumerate() {
            sink.record(RegionTag::Final { index }, region);
        }
        Refinement {
            actions,
            regions,
            requested,
            depth,
            attempts,
            outcome,
        }
    }
}
