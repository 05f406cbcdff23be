//! Event types: keys, mouse, paste, resize, and crossterm conversion.

pub mod input;

pub use input::{
    Event, EventKind, Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent,
    ResizeEvent,
};
