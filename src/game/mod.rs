//! Core game logic module for Snake
//!
//! This module contains the whole rules engine without any I/O or rendering
//! dependencies. States are values: `tick` and `with_direction` return a new
//! `GameState` and the caller keeps the single authoritative copy.

pub mod config;
pub mod direction;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, TickEvent, TickResult};
pub use state::{CollisionType, GameState, Phase, Position, Snake};
