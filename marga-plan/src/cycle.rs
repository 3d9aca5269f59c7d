//! One capture → plan → send cycle.
//!
//! The scene source and the transport are collaborators behind traits so
//! the host can plug in a camera, a file, a socket or a test double. A cycle
//! is synchronous and never retried here; the caller decides whether to run
//! another.

use thiserror::Error;
use tracing::info;

use crate::error::PlanError;
use crate::motion::{DriveCommand, KinematicModel};
use crate::refine::RegionSink;
use crate::{PlanOutcome, Planner, Snapshot};

/// Cycle failure
#[derive(Error, Debug)]
pub enum CycleError {
    /// The planner rejected the snapshot
    #[error("Planning failed: {0}")]
    Plan(#[from] PlanError),

    /// The scene source could not produce a snapshot
    #[error("Scene capture failed: {0}")]
    Scene(String),

    /// Commands could not be delivered
    #[error("Transport failed: {0}")]
    Transport(String),
}

/// Supplies the grid, destination and robot pose for a cycle.
pub trait SceneSource {
    /// Take a fresh snapshot
    fn capture(&mut self) -> Result<Snapshot, CycleError>;
}

/// Delivers approved commands to the robot, in order.
pub trait Transport {
    /// Send commands in order; stops at the first failure
    fn send(&mut self, commands: &[DriveCommand]) -> Result<(), CycleError>;
}

/// What one cycle saw and did
#[derive(Clone, Debug)]
pub struct CycleReport {
    /// Snapshot the plan was built from
    pub snapshot: Snapshot,
    /// Planner result
    pub outcome: PlanOutcome,
    /// Commands handed to the transport
    pub commands: Vec<DriveCommand>,
}

/// Capture a snapshot, plan, and send the approved commands.
///
/// Nothing is sent when the robot is already at the destination.
pub fn run_cycle<M: KinematicModel>(
    source: &mut dyn SceneSource,
    planner: &Planner<M>,
    transport: &mut dyn Transport,
    sink: &mut dyn RegionSink,
) -> Result<CycleReport, CycleError> {
    let snapshot = source.capture()?;
    let outcome = planner.plan(&snapshot, sink)?;

    let commands = match &outcome {
        PlanOutcome::AlreadyAtDestination => Vec::new(),
        PlanOutcome::Planned(plan) => plan.commands(),
    };

    if !commands.is_empty() {
        transport.send(&commands)?;
        info!("Sent {} drive commands", commands.len());
    }

    Ok(CycleReport {
        snapshot,
        outcome,
        commands,
    })
}
