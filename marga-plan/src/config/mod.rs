//! Planner configuration loaded from YAML.
//!
//! Every section and field has a default, so a partial file (or none at
//! all) is valid.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use marga_plan::config::PlanConfig;
//!
//! // Load from default path (configs/planner.yaml)
//! let config = PlanConfig::load_default()?;
//!
//! // Or use built-in defaults (no file needed)
//! let config = PlanConfig::default();
//!
//! let profile = config.motion_profile();
//! ```
//!
//! ## Configuration Sections
//!
//! | Section | Description |
//! |---------|-------------|
//! | [`GridSection`] | Physical size of one grid cell |
//! | [`RobotSection`] | Wall buffer radius |
//! | [`MotionSection`] | Rotate/Advance speeds, rates and errors |
//! | [`RefineSection`] | Bisection depth budget |
//!
//! ## Example YAML
//!
//! ```yaml
//! grid:
//!   cell_size: 1.0          # physical units per cell
//! robot:
//!   radius: 1.0             # grid units
//! motion:
//!   rotate:
//!     speed: { nominal: 0.0, error: 0.0 }
//!     rate: { nominal: 90.0, error: 4.5 }   # deg/s
//!   advance:
//!     speed: { nominal: 10.0, error: 0.5 }  # units/s
//!     rate: { nominal: 0.0, error: 0.5 }    # heading drift, deg/s
//! refine:
//!   max_depth: 4
//! ```

mod defaults;
mod error;
mod grid;
mod motion;
mod plan;
mod refine;
mod robot;

// Re-export main types
pub use error::ConfigLoadError;
pub use plan::{DEFAULT_CONFIG_PATH, PlanConfig};

// Re-export section types
pub use grid::GridSection;
pub use motion::MotionSection;
pub use refine::RefineSection;
pub use robot::RobotSection;
