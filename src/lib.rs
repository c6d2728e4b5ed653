//! Grid Snake - a tick-driven snake game engine
//!
//! This library provides:
//! - Core game logic (game module), free of any I/O
//! - A cancellable periodic tick source (tick module)
//! - Terminal input mapping and rendering (input, render modules)
//! - The interactive terminal host (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
pub mod tick;
