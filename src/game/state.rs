use serde::{Deserialize, Serialize};
use std::fmt;

use super::direction::Direction;

/// A cell on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Move position by delta
    pub fn moved_by(&self, d_row: i32, d_col: i32) -> Self {
        Self {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (d_row, d_col) = direction.delta();
        self.moved_by(d_row, d_col)
    }

    /// Check if both coordinates lie in `[0, board_size)`
    pub fn is_within(&self, board_size: usize) -> bool {
        let size = board_size as i64;
        (0..size).contains(&(self.row as i64)) && (0..size).contains(&(self.col as i64))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// The snake's body, oldest segment first and head last
///
/// Never empty. Moving produces a new `Snake`; an existing one is never
/// modified by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    segments: Vec<Position>,
}

impl Snake {
    /// Create a single-segment snake
    pub fn new(start: Position) -> Self {
        Self {
            segments: vec![start],
        }
    }

    /// Build a snake from segments ordered tail to head; `None` if empty
    pub fn from_segments(segments: Vec<Position>) -> Option<Self> {
        if segments.is_empty() {
            None
        } else {
            Some(Self { segments })
        }
    }

    /// Get the head position (most recently added segment)
    pub fn head(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    /// Get the tail position (oldest segment)
    pub fn tail(&self) -> Position {
        self.segments[0]
    }

    /// All segments, tail first
    pub fn segments(&self) -> &[Position] {
        &self.segments
    }

    /// Check if any segment, tail included, occupies `pos`
    pub fn contains(&self, pos: Position) -> bool {
        self.segments.contains(&pos)
    }

    /// Return the snake after its head moves to `new_head`
    ///
    /// The tail is dropped unless `grow` is set.
    pub fn advanced(&self, new_head: Position, grow: bool) -> Self {
        let skip = usize::from(!grow);
        let mut segments = Vec::with_capacity(self.segments.len() + 1 - skip);
        segments.extend_from_slice(&self.segments[skip..]);
        segments.push(new_head);

        Self { segments }
    }

    /// Get the length of the snake
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; present for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Phase of a game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Running,
    GameOver,
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake hit a wall
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
///
/// This is what a renderer reads after every committed tick.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// Direction travelled on the last committed tick
    pub direction: Direction,
    /// Direction the next tick will travel in
    pub pending_direction: Direction,
    pub food: Position,
    pub board_size: usize,
    pub score: u32,
    pub steps: u32,
    pub phase: Phase,
}

impl GameState {
    /// Create a running game state
    pub fn new(snake: Snake, direction: Direction, food: Position, board_size: usize) -> Self {
        Self {
            snake,
            direction,
            pending_direction: direction,
            food,
            board_size,
            score: 0,
            steps: 0,
            phase: Phase::Running,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == Phase::GameOver
    }

    /// Check if a position is within the board
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.is_within(self.board_size)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.contains(pos)
    }

    /// Request a new direction for the next tick
    ///
    /// Reversals of the last travelled direction and requests made after game
    /// over are ignored. The receiver is left untouched; the returned state
    /// replaces it.
    pub fn with_direction(&self, requested: Direction) -> Self {
        let mut next = self.clone();
        if !self.is_game_over() && !self.direction.is_opposite(requested) {
            next.pending_direction = requested;
        }
        next
    }

    /// Like [`with_direction`](Self::with_direction), for string-keyed input
    ///
    /// Names that are not one of the four directions are ignored.
    pub fn with_direction_named(&self, name: &str) -> Self {
        match Direction::from_name(name) {
            Some(direction) => self.with_direction(direction),
            None => self.clone(),
        }
    }
}
