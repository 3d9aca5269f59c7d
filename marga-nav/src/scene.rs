//! Scene snapshots read from YAML files.
//!
//! Stands in for the camera pipeline: the file names the maze (inline or as a
//! path relative to the scene file), the destination, the robot cell and the
//! robot heading.
//!
//! ```yaml
//! maze_path: corridor.txt
//! destination: [8, 1]
//! robot: [1, 1]
//! heading: 15.0
//! ```

use crate::error::{NavError, Result};
use marga_plan::io::{parse_maze, read_maze};
use marga_plan::{CycleError, GridCoord, SceneSource, Snapshot};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SceneFile {
    #[serde(default)]
    maze: Option<String>,
    #[serde(default)]
    maze_path: Option<PathBuf>,
    destination: [i32; 2],
    robot: [i32; 2],
    #[serde(default)]
    heading: f32,
}

/// Scene source backed by a YAML file, re-read on every capture
pub struct FileScene {
    path: PathBuf,
}

impl FileScene {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the scene file into a snapshot
    pub fn load(&self) -> Result<Snapshot> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            NavError::Scene(format!("Failed to read {}: {}", self.path.display(), e))
        })?;
        let file: SceneFile = serde_yaml::from_str(&content)?;

        let grid = match (&file.maze, &file.maze_path) {
            (Some(text), None) => parse_maze(text),
            (None, Some(maze_path)) => {
                let base = self.path.parent().unwrap_or_else(|| Path::new("."));
                read_maze(&base.join(maze_path))
            }
            (Some(_), Some(_)) => {
                return Err(NavError::Scene("scene sets both maze and maze_path".to_string()));
            }
            (None, None) => {
                return Err(NavError::Scene("scene needs either maze or maze_path".to_string()));
            }
        }
        .map_err(|e| NavError::Scene(e.to_string()))?;

        debug!(
            "Scene {}: {}x{} grid, {} walls",
            self.path.display(),
            grid.width(),
            grid.height(),
            grid.wall_count()
        );

        Ok(Snapshot {
            grid,
            destination: GridCoord::new(file.destination[0], file.destination[1]),
            robot_cell: GridCoord::new(file.robot[0], file.robot[1]),
            heading_degrees: file.heading,
        })
    }
}

impl SceneSource for FileScene {
    fn capture(&mut self) -> std::result::Result<Snapshot, CycleError> {
        self.load().map_err(|e| CycleError::Scene(e.to_string()))
    }
}
