//! Integer grid coordinates and the four grid moves.

use serde::{Deserialize, Serialize};

/// Integer cell index, `x` is the column and `y` the row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCoord {
    /// Column
    pub x: i32,
    /// Row
    pub y: i32,
}

impl GridCoord {
    /// Create a new grid coordinate
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor reached by one move. `Nowhere` returns the cell itself.
    #[inline]
    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        Self::new(self.x + dx, self.y + dy)
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Next move toward the destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Destination, blocked or unreached cell
    #[default]
    Nowhere,
    /// x - 1
    Left,
    /// y - 1
    Up,
    /// x + 1
    Right,
    /// y + 1
    Down,
}

impl Direction {
    /// Neighbor scan order. Full ties in the direction field resolve to the
    /// earliest entry.
    pub const MOVES: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Cell offset `(dx, dy)` of one move
    #[inline]
    pub fn offset(self) -> (i32, i32) {
        match self {
            Direction::Nowhere => (0, 0),
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    /// Unit vector of the move, `None` for `Nowhere`
    #[inline]
    pub fn vector(self) -> Option<(f32, f32)> {
        match self {
            Direction::Nowhere => None,
            other => {
                let (dx, dy) = other.offset();
                Some((dx as f32, dy as f32))
            }
        }
    }

    /// True for the four real moves
    #[inline]
    pub fn is_move(self) -> bool {
        self != Direction::Nowhere
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_follows_image_axes() {
        let c = GridCoord::new(3, 3);
        assert_eq!(c.step(Direction::Left), GridCoord::new(2, 3));
        assert_eq!(c.step(Direction::Up), GridCoord::new(3, 2));
        assert_eq!(c.step(Direction::Right), GridCoord::new(4, 3));
        assert_eq!(c.step(Direction::Down), GridCoord::new(3, 4));
        assert_eq!(c.step(Direction::Nowhere), c);
    }

    #[test]
    fn test_vectors_match_offsets() {
        for dir in Direction::MOVES {
            let (vx, vy) = dir.vector().unwrap();
            let (dx, dy) = dir.offset();
            assert_eq!((vx, vy), (dx as f32, dy as f32));
        }
        assert!(Direction::Nowhere.vector().is_none());
    }
}
