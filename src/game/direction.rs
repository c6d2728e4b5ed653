use serde::{Deserialize, Serialize};

/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    /// Returns the (d_row, d_col) applied to the head for one tick
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Parses a logical direction name.
    ///
    /// Accepts the bare names in any case (`"UP"`, `"left"`) and the DOM-style
    /// key names (`"ArrowUp"`). Anything else yields `None` and is meant to be
    /// dropped by the caller.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        let bare = name
            .strip_prefix("Arrow")
            .or_else(|| name.strip_prefix("arrow"))
            .unwrap_or(name);

        Self::ALL
            .into_iter()
            .find(|direction| direction.as_str().eq_ignore_ascii_case(bare))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}
