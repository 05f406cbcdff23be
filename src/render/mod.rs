//! Terminal presentation: frame flattening and the crossterm backend.

pub mod presenter;

pub use presenter::{frame_lines, Presenter, Span};
