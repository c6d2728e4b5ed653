use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, time::Duration};

use super::direction::Direction;
use super::state::Position;

/// Largest board accepted by [`GameConfig::validate`]; keeps coordinates well inside `i32`.
pub const MAX_BOARD_SIZE: usize = 1024;

/// Configuration for the game
///
/// Every field has a default, so a config file only needs the keys it wants
/// to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square board
    pub board_size: usize,
    /// Cell of the single segment a new game starts with
    pub start: Position,
    /// Direction of travel at the start of a new game
    pub initial_direction: Direction,
    /// Food cell at the start of a new game; `None` places it randomly
    pub initial_food: Option<Position>,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_size: 20,
            start: Position::new(5, 5),
            initial_direction: Direction::Right,
            initial_food: Some(Position::new(10, 10)),
            tick_interval_ms: 200,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    ///
    /// The start cell is kept; the fixed initial food is only kept when it
    /// still fits on the board, otherwise food is placed randomly.
    pub fn new(board_size: usize) -> Self {
        let defaults = Self::default();
        let initial_food = defaults
            .initial_food
            .filter(|food| food.is_within(board_size));

        Self {
            board_size,
            initial_food,
            ..defaults
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self::new(10)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;

        config
            .validate()
            .map_err(anyhow::Error::msg)
            .with_context(|| format!("Invalid config in {:?}", path))?;

        Ok(config)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` naming the first
    /// invalid one otherwise.
    pub fn validate(&self) -> Result<(), String> {
        if self.board_size < 2 {
            return Err(format!(
                "board_size must be at least 2, got {}",
                self.board_size
            ));
        }

        if self.board_size > MAX_BOARD_SIZE {
            return Err(format!(
                "board_size must be at most {}, got {}",
                MAX_BOARD_SIZE, self.board_size
            ));
        }

        if !self.start.is_within(self.board_size) {
            return Err(format!(
                "start {} is outside a {}x{} board",
                self.start, self.board_size, self.board_size
            ));
        }

        if let Some(food) = self.initial_food {
            if !food.is_within(self.board_size) {
                return Err(format!(
                    "initial_food {} is outside a {}x{} board",
                    food, self.board_size, self.board_size
                ));
            }

            if food == self.start {
                return Err(format!("initial_food {} overlaps the start cell", food));
            }
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }

        Ok(())
    }
}
