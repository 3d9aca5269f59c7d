//! Error types for MargaPlan

use thiserror::Error;

/// Planning error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    /// Destination is outside the grid or blocked after buffering.
    #[error("Invalid destination ({x}, {y}): outside the grid or inside the wall buffer")]
    InvalidDestination {
        /// Column
        x: i32,
        /// Row
        y: i32,
    },

    /// The robot cell has no route to the destination.
    #[error("Cell ({x}, {y}) cannot reach the destination")]
    Unreachable {
        /// Column of the stranded cell
        x: i32,
        /// Row of the stranded cell
        y: i32,
    },

    /// The first primitive stayed unsafe after the last allowed halving.
    #[error("Refinement exhausted after {attempts} attempts at depth {depth}")]
    RefinementDepthExceeded {
        /// Sweeps run before giving up
        attempts: u32,
        /// Halvings applied
        depth: u32,
    },

    /// Malformed input: mismatched fields, bad primitive parameters, cyclic route.
    #[error("Precondition violated: {0}")]
    PreconditionViolation(String),
}

impl PlanError {
    pub(crate) fn precondition(msg: impl Into<String>) -> Self {
        PlanError::PreconditionViolation(msg.into())
    }
}

/// Result alias for planning operations
pub type Result<T> = std::result::Result<T, PlanError>;
