//! Pilot: programmatic interaction with a headless instance.
//!
//! The `Pilot` wraps an [`Instance`](crate::runtime::Instance) in headless
//! mode and provides methods to simulate user input (key presses, mouse
//! clicks, paste, resize), advance the virtual clock, and capture rendered
//! frames as plain text for snapshot testing.

use crate::component::{RendererNode, Widget};
use crate::event::{Key, KeyEvent, Modifiers, MouseAction, MouseBtn, MouseEvent};
use crate::runtime::Instance;

use super::snapshot::frame_to_string;

// ---------------------------------------------------------------------------
// Pilot
// ---------------------------------------------------------------------------

/// A headless runtime driver for testing.
///
/// The Pilot mounts a widget on an [`Instance`] without a terminal, then
/// provides a high-level API for simulating user interaction and inspecting
/// rendered output. Time is virtual: nothing happens between calls to
/// [`advance`](Self::advance).
///
/// # Examples
///
/// ```ignore
/// use weft_tui::testing::Pilot;
/// use weft_tui::event::Key;
///
/// let mut pilot = Pilot::new(80, 24);
/// pilot.mount(my_widget);
/// pilot.press_key(Key::Char('a'));
/// assert!(pilot.frame_text().contains("a"));
/// ```
pub struct Pilot {
    instance: Instance,
}

impl Pilot {
    /// Create a pilot around an unmounted headless instance of the given
    /// terminal size.
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            instance: Instance::headless(width, height),
        }
    }

    /// Mount the root widget and run the first render pass.
    pub fn mount(&mut self, widget: impl Widget + 'static) {
        self.instance.mount(widget);
    }

    /// Unmount, running all effect cleanups.
    pub fn unmount(&mut self) {
        self.instance.unmount();
    }

    // ── Input simulation ─────────────────────────────────────────────

    /// Simulate a key press with no modifiers.
    pub fn press_key(&mut self, key: Key) {
        self.instance.send_key(KeyEvent::new(key, Modifiers::NONE));
    }

    /// Simulate a key press with the given modifiers.
    pub fn press_key_with(&mut self, key: Key, modifiers: Modifiers) {
        self.instance.send_key(KeyEvent::new(key, modifiers));
    }

    /// Simulate typing each character of `text` as individual key presses.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.press_key(Key::Char(ch));
        }
    }

    /// Simulate a left-button mouse click at (x, y).
    pub fn click(&mut self, x: u16, y: u16) {
        self.instance.send_mouse(MouseEvent {
            kind: MouseAction::Down(MouseBtn::Left),
            x,
            y,
            modifiers: Modifiers::NONE,
        });
    }

    /// Simulate a bracketed paste.
    pub fn paste(&mut self, text: &str) {
        self.instance.send_paste(text);
    }

    /// Simulate a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16) {
        self.instance.resize(width, height);
    }

    // ── Time and processing ──────────────────────────────────────────

    /// Advance the virtual clock, firing due timers.
    pub fn advance(&mut self, elapsed_ms: u64) {
        self.instance.advance(elapsed_ms);
    }

    /// Drain any pending render requests (e.g. after calling a setter held
    /// outside the widget).
    pub fn process(&mut self) {
        self.instance.flush_renders();
    }

    // ── Inspection ───────────────────────────────────────────────────

    /// Completed render passes since mount.
    pub fn render_count(&self) -> usize {
        self.instance.render_count()
    }

    /// The most recent frame tree.
    pub fn last_frame(&self) -> Option<RendererNode> {
        self.instance.last_frame()
    }

    /// The most recent frame as plain text. Empty string before the first
    /// render.
    pub fn frame_text(&self) -> String {
        self.instance
            .last_frame()
            .map(|frame| frame_to_string(&frame))
            .unwrap_or_default()
    }

    /// The underlying instance, for assertions the high-level API does not
    /// cover.
    pub fn instance(&self) -> &Instance {
        &self.instance
    }
}

// ===========================================================================
// Tests
// ===========================================================================
