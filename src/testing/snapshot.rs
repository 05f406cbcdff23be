//! Snapshot rendering helpers.
//!
//! Functions for converting a frame tree into plain-text strings suitable
//! for snapshot testing and assertions.

use crate::component::{RendererNode, Widget};
use crate::hooks::Hooks;
use crate::render::frame_lines;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Convert a frame tree to plain text.
///
/// Each flattened line becomes one line of output, right-trimmed of spaces.
/// Lines are separated by `'\n'`; the final line has no trailing newline.
/// Styling (bold/dim) is dropped — snapshots assert on content and layout.
pub fn frame_to_string(frame: &RendererNode) -> String {
    frame_lines(frame)
        .iter()
        .map(|line| {
            line.iter()
                .map(|span| span.text.as_str())
                .collect::<String>()
                .trim_end()
                .to_owned()
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build a widget once against a fresh detached hook context and render the
/// result to plain text.
///
/// Useful for snapshotting a widget's first frame without a runtime. Widgets
/// that need timers or event subscriptions should go through
/// [`Pilot`](crate::testing::Pilot) instead.
pub fn render_to_string(widget: &dyn Widget) -> String {
    let mut hooks = Hooks::detached();
    frame_to_string(&widget.build(&mut hooks).render())
}

// ===========================================================================
// Tests
// ===========================================================================
