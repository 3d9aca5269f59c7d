//! Binary PGM (P5) export of navigation fields.
//!
//! Directions use the fixed intensities Nowhere 0, Left 63, Up 126,
//! Right 189, Down 252. This mapping exists only here; planning never sees
//! pixel values.

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::core::Direction;
use crate::grid::{ClearanceField, DirectionField};

use super::IoError;

/// Gray level of a direction
pub fn direction_intensity(direction: Direction) -> u8 {
    match direction {
        Direction::Nowhere => 0,
        Direction::Left => 63,
        Direction::Up => 126,
        Direction::Right => 189,
        Direction::Down => 252,
    }
}

/// Direction encoded by a gray level, `None` for any other value
pub fn direction_from_intensity(value: u8) -> Option<Direction> {
    match value {
        0 => Some(Direction::Nowhere),
        63 => Some(Direction::Left),
        126 => Some(Direction::Up),
        189 => Some(Direction::Right),
        252 => Some(Direction::Down),
        _ => None,
    }
}

fn write_p5<W: Write>(
    writer: &mut W,
    width: usize,
    height: usize,
    pixels: &[u8],
) -> std::io::Result<()> {
    write!(writer, "P5\n{} {}\n255\n", width, height)?;
    writer.write_all(pixels)
}

/// Write a direction field as P5
pub fn write_direction_pgm<W: Write>(
    writer: &mut W,
    field: &DirectionField,
) -> std::io::Result<()> {
    let pixels: Vec<u8> = field
        .values()
        .iter()
        .map(|&d| direction_intensity(d))
        .collect();
    write_p5(writer, field.width(), field.height(), &pixels)
}

/// Write a clearance field as P5, each value multiplied by `gain` and
/// clamped to 255
pub fn write_clearance_pgm<W: Write>(
    writer: &mut W,
    field: &ClearanceField,
    gain: f32,
) -> std::io::Result<()> {
    let pixels: Vec<u8> = field
        .values()
        .iter()
        .map(|&c| (c as f32 * gain).clamp(0.0, 255.0) as u8)
        .collect();
    write_p5(writer, field.width(), field.height(), &pixels)
}

/// Save a direction field to a PGM file
pub fn export_direction_pgm(field: &DirectionField, path: &Path) -> Result<(), IoError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    write_direction_pgm(&mut writer, field)?;
    writer.flush()?;
    Ok(())
}

/// Save a clearance field to a PGM file
pub fn export_clearance_pgm(field: &ClearanceField, gain: f32, path: &Path) -> Result<(), IoError> {
    let mut writer = BufWriter::new(std::fs::File::create(path)?);
    write_clearance_pgm(&mut writer, field, gain)?;
    writer.flush()?;
    Ok(())
}
