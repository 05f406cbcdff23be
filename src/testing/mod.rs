//! Headless testing framework: Pilot, snapshot helpers.
//!
//! Use the [`Pilot`] to programmatically drive an
//! [`Instance`](crate::runtime::Instance) without a real terminal. Use
//! [`frame_to_string`] and [`render_to_string`] to capture frames as plain
//! text for snapshot-style assertions.

pub mod pilot;
pub mod snapshot;

pub use pilot::Pilot;
pub use snapshot::{frame_to_string, render_to_string};
