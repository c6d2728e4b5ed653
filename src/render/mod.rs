pub mod renderer;

pub use renderer::{BoardView, Cell, Renderer};
