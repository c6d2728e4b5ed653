pub mod source;

pub use source::TickSource;
