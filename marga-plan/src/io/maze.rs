//! Text maze format.
//!
//! One grid row per line: `#` is a wall, `.` is free. Blank lines and lines
//! starting with `;` are skipped, so files can carry comments.
//!
//! ```text
//! ; 5x3 corridor
//! #####
//! #...#
//! #####
//! ```

use std::io::Write;
use std::path::Path;

use crate::grid::OccupancyGrid;

use super::IoError;

const WALL: char = '#';
const FREE: char = '.';
const COMMENT: char = ';';

/// Parse maze text into an occupancy grid.
pub fn parse_maze(text: &str) -> Result<OccupancyGrid, IoError> {
    let mut rows: Vec<Vec<bool>> = Vec::new();

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim_end();
        if line.trim().is_empty() || line.trim_start().starts_with(COMMENT) {
            continue;
        }

        let row = line
            .chars()
            .map(|c| match c {
                WALL => Ok(true),
                FREE => Ok(false),
                other => Err(IoError::Format {
                    line: line_no + 1,
                    message: format!("unexpected character {:?}", other),
                }),
            })
            .collect::<Result<Vec<bool>, IoError>>()?;

        if let Some(first) = rows.first()
            && first.len() != row.len()
        {
            return Err(IoError::Format {
                line: line_no + 1,
                message: format!("row has {} cells, expected {}", row.len(), first.len()),
            });
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(IoError::Format {
            line: 0,
            message: "maze has no rows".to_string(),
        });
    }

    Ok(OccupancyGrid::from_rows(&rows)?)
}

/// Read a maze file
pub fn read_maze(path: &Path) -> Result<OccupancyGrid, IoError> {
    let text = std::fs::read_to_string(path)?;
    parse_maze(&text)
}

/// Render a grid as maze text, one line per row
pub fn format_maze(grid: &OccupancyGrid) -> String {
    let mut text = String::with_capacity((grid.width() + 1) * grid.height());
    for row in grid.rows() {
        text.extend(row.iter().map(|&wall| if wall { WALL } else { FREE }));
        text.push('\n');
    }
    text
}

/// Write a grid as a maze file
pub fn write_maze(grid: &OccupancyGrid, path: &Path) -> Result<(), IoError> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(format_maze(grid).as_bytes())?;
    Ok(())
}
