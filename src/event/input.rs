//! Event types wrapping crossterm for decoupling.
//!
//! Defines [`Event`], [`KeyEvent`], [`MouseEvent`], [`ResizeEvent`] and
//! supporting types. Crossterm events are converted at the runtime boundary
//! so the rest of the toolkit never depends on crossterm directly. Resize
//! events carry the previous terminal size, which only the runtime knows —
//! hence the explicit `from_crossterm(.., last_size)` constructor instead of
//! a plain `From` impl on the top-level event.

use std::ops::{BitAnd, BitOr};

// ---------------------------------------------------------------------------
// Key
// ---------------------------------------------------------------------------

/// Keyboard key, decoupled from crossterm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    F(u8),
}

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Modifier key bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(pub u8);

impl Modifiers {
    pub const NONE: Modifiers = Modifiers(0);
    pub const SHIFT: Modifiers = Modifiers(1);
    pub const CTRL: Modifiers = Modifiers(2);
    pub const ALT: Modifiers = Modifiers(4);

    /// Check whether `self` contains all the bits in `other`.
    pub fn contains(self, other: Modifiers) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check whether no modifier bits are set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;
    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 | rhs.0)
    }
}

impl BitAnd for Modifiers {
    type Output = Modifiers;
    fn bitand(self, rhs: Self) -> Self::Output {
        Modifiers(self.0 & rhs.0)
    }
}

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A keyboard event with key and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: Key,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(code: Key, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }
}

// ---------------------------------------------------------------------------
// MouseBtn / MouseAction / MouseEvent
// ---------------------------------------------------------------------------

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Mouse action kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseAction {
    Down(MouseBtn),
    Up(MouseBtn),
    Drag(MouseBtn),
    Moved,
    ScrollUp,
    ScrollDown,
}

/// A mouse event with action, position, and modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MouseEvent {
    pub kind: MouseAction,
    pub x: u16,
    pub y: u16,
    pub modifiers: Modifiers,
}

// ---------------------------------------------------------------------------
// ResizeEvent
// ---------------------------------------------------------------------------

/// A terminal resize, with the size it replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeEvent {
    pub width: u16,
    pub height: u16,
    pub old_width: u16,
    pub old_height: u16,
}

// ---------------------------------------------------------------------------
// Event / EventKind
// ---------------------------------------------------------------------------

/// Top-level runtime event, matching the dispatcher's four channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Input(KeyEvent),
    Mouse(MouseEvent),
    Paste(String),
    Resize(ResizeEvent),
}

/// The channel an [`Event`] is delivered on. Subscriptions are per-kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Input,
    Mouse,
    Paste,
    Resize,
}

impl Event {
    /// The channel this event belongs to.
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Input(_) => EventKind::Input,
            Event::Mouse(_) => EventKind::Mouse,
            Event::Paste(_) => EventKind::Paste,
            Event::Resize(_) => EventKind::Resize,
        }
    }

    /// Convert a crossterm event, filling in resize deltas from `last_size`.
    ///
    /// Returns `None` for crossterm events with no counterpart here (focus
    /// gained/lost).
    pub fn from_crossterm(ct: crossterm::event::Event, last_size: (u16, u16)) -> Option<Event> {
        match ct {
            crossterm::event::Event::Key(ke) => Some(Event::Input(KeyEvent::from(ke))),
            crossterm::event::Event::Mouse(me) => Some(Event::Mouse(MouseEvent::from(me))),
            crossterm::event::Event::Paste(text) => Some(Event::Paste(text)),
            crossterm::event::Event::Resize(width, height) => Some(Event::Resize(ResizeEvent {
                width,
                height,
                old_width: last_size.0,
                old_height: last_size.1,
            })),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// From<crossterm> conversions
// ---------------------------------------------------------------------------

/// Convert crossterm key modifiers to our `Modifiers`.
fn convert_modifiers(m: crossterm::event::KeyModifiers) -> Modifiers {
    let mut out = Modifiers::NONE;
    if m.contains(crossterm::event::KeyModifiers::SHIFT) {
        out = out | Modifiers::SHIFT;
    }
    if m.contains(crossterm::event::KeyModifiers::CONTROL) {
        out = out | Modifiers::CTRL;
    }
    if m.contains(crossterm::event::KeyModifiers::ALT) {
        out = out | Modifiers::ALT;
    }
    out
}

impl From<crossterm::event::KeyEvent> for KeyEvent {
    fn from(ct: crossterm::event::KeyEvent) -> Self {
        let code = match ct.code {
            crossterm::event::KeyCode::Char(c) => Key::Char(c),
            crossterm::event::KeyCode::Enter => Key::Enter,
            crossterm::event::KeyCode::Esc => Key::Escape,
            crossterm::event::KeyCode::Tab => Key::Tab,
            crossterm::event::KeyCode::BackTab => Key::BackTab,
            crossterm::event::KeyCode::Backspace => Key::Backspace,
            crossterm::event::KeyCode::Delete => Key::Delete,
            crossterm::event::KeyCode::Left => Key::Left,
            crossterm::event::KeyCode::Right => Key::Right,
            crossterm::event::KeyCode::Up => Key::Up,
            crossterm::event::KeyCode::Down => Key::Down,
            crossterm::event::KeyCode::Home => Key::Home,
            crossterm::event::KeyCode::End => Key::End,
            crossterm::event::KeyCode::PageUp => Key::PageUp,
            crossterm::event::KeyCode::PageDown => Key::PageDown,
            crossterm::event::KeyCode::F(n) => Key::F(n),
            // Map unsupported key codes to Escape as a fallback.
            _ => Key::Escape,
        };
        let modifiers = convert_modifiers(ct.modifiers);
        KeyEvent { code, modifiers }
    }
}

/// Convert a crossterm mouse button to our `MouseBtn`.
fn convert_mouse_button(b: crossterm::event::MouseButton) -> MouseBtn {
    match b {
        crossterm::event::MouseButton::Left => MouseBtn::Left,
        crossterm::event::MouseButton::Right => MouseBtn::Right,
        crossterm::event::MouseButton::Middle => MouseBtn::Middle,
    }
}

impl From<crossterm::event::MouseEvent> for MouseEvent {
    fn from(me: crossterm::event::MouseEvent) -> Self {
        let kind = match me.kind {
            crossterm::event::MouseEventKind::Down(b) => MouseAction::Down(convert_mouse_button(b)),
            crossterm::event::MouseEventKind::Up(b) => MouseAction::Up(convert_mouse_button(b)),
            crossterm::event::MouseEventKind::Drag(b) => MouseAction::Drag(convert_mouse_button(b)),
            crossterm::event::MouseEventKind::Moved => MouseAction::Moved,
            crossterm::event::MouseEventKind::ScrollUp => MouseAction::ScrollUp,
            crossterm::event::MouseEventKind::ScrollDown => MouseAction::ScrollDown,
            // Map any other scroll variants to ScrollDown.
            _ => MouseAction::ScrollDown,
        };
        MouseEvent {
            kind,
            x: me.column,
            y: me.row,
            modifiers: convert_modifiers(me.modifiers),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // ── Modifiers ────────────────────────────────────────────────────

    #[test]
    fn modifiers_none_is_empty() {
        assert!(Modifiers::NONE.is_empty());
    }

    #[test]
    fn modifiers_single_flag() {
        assert!(Modifiers::CTRL.contains(Modifiers::CTRL));
        assert!(!Modifiers::CTRL.contains(Modifiers::SHIFT));
        assert!(!Modifiers::CTRL.is_empty());
    }

    #[test]
    fn modifiers_combined() {
        let mods = Modifiers::CTRL | Modifiers::ALT;
        assert!(mods.contains(Modifiers::CTRL));
        assert!(mods.contains(Modifiers::ALT));
        assert!(!mods.contains(Modifiers::SHIFT));
    }

    #[test]
    fn modifiers_bitand() {
        let mods = Modifiers::CTRL | Modifiers::SHIFT;
        assert_eq!(mods & Modifiers::CTRL, Modifiers::CTRL);
    }

    // ── Event::kind ──────────────────────────────────────────────────

    #[test]
    fn event_kinds() {
        let key = Event::Input(KeyEvent::new(Key::Enter, Modifiers::NONE));
        assert_eq!(key.kind(), EventKind::Input);
        assert_eq!(Event::Paste("x".into()).kind(), EventKind::Paste);
        let resize = Event::Resize(ResizeEvent {
            width: 80,
            height: 24,
            old_width: 80,
            old_height: 25,
        });
        assert_eq!(resize.kind(), EventKind::Resize);
    }

    // ── From<crossterm::event::KeyEvent> ─────────────────────────────

    #[test]
    fn from_crossterm_key_char() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('x'),
            crossterm::event::KeyModifiers::NONE,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke.code, Key::Char('x'));
        assert!(ke.modifiers.is_empty());
    }

    #[test]
    fn from_crossterm_key_with_ctrl() {
        let ct = crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('c'),
            crossterm::event::KeyModifiers::CONTROL,
        );
        let ke = KeyEvent::from(ct);
        assert_eq!(ke.code, Key::Char('c'));
        assert!(ke.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn from_crossterm_key_navigation() {
        for (ct_code, expected) in [
            (crossterm::event::KeyCode::Left, Key::Left),
            (crossterm::event::KeyCode::Right, Key::Right),
            (crossterm::event::KeyCode::Up, Key::Up),
            (crossterm::event::KeyCode::Down, Key::Down),
            (crossterm::event::KeyCode::Home, Key::Home),
            (crossterm::event::KeyCode::End, Key::End),
            (crossterm::event::KeyCode::PageUp, Key::PageUp),
            (crossterm::event::KeyCode::PageDown, Key::PageDown),
            (crossterm::event::KeyCode::Delete, Key::Delete),
            (crossterm::event::KeyCode::Backspace, Key::Backspace),
            (crossterm::event::KeyCode::Esc, Key::Escape),
            (crossterm::event::KeyCode::F(5), Key::F(5)),
        ] {
            let ct = crossterm::event::KeyEvent::new(ct_code, crossterm::event::KeyModifiers::NONE);
            assert_eq!(KeyEvent::from(ct).code, expected);
        }
    }

    // ── Event::from_crossterm ────────────────────────────────────────

    #[test]
    fn from_crossterm_event_key() {
        let ct = crossterm::event::Event::Key(crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char('q'),
            crossterm::event::KeyModifiers::NONE,
        ));
        match Event::from_crossterm(ct, (80, 24)) {
            Some(Event::Input(ke)) => assert_eq!(ke.code, Key::Char('q')),
            other => panic!("expected Input event, got {:?}", other),
        }
    }

    #[test]
    fn from_crossterm_resize_carries_old_size() {
        let ct = crossterm::event::Event::Resize(120, 40);
        match Event::from_crossterm(ct, (80, 24)) {
            Some(Event::Resize(r)) => {
                assert_eq!((r.width, r.height), (120, 40));
                assert_eq!((r.old_width, r.old_height), (80, 24));
            }
            other => panic!("expected Resize event, got {:?}", other),
        }
    }

    #[test]
    fn from_crossterm_paste() {
        let ct = crossterm::event::Event::Paste("hello".to_string());
        assert_eq!(
            Event::from_crossterm(ct, (80, 24)),
            Some(Event::Paste("hello".to_string()))
        );
    }

    #[test]
    fn from_crossterm_focus_is_dropped() {
        assert_eq!(
            Event::from_crossterm(crossterm::event::Event::FocusGained, (80, 24)),
            None
        );
        assert_eq!(
            Event::from_crossterm(crossterm::event::Event::FocusLost, (80, 24)),
            None
        );
    }

    // ── Mouse conversions ────────────────────────────────────────────

    #[test]
    fn mouse_event_from_crossterm() {
        let me = MouseEvent::from(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Down(crossterm::event::MouseButton::Left),
            column: 10,
            row: 5,
            modifiers: crossterm::event::KeyModifiers::NONE,
        });
        assert_eq!(me.kind, MouseAction::Down(MouseBtn::Left));
        assert_eq!((me.x, me.y), (10, 5));
        assert!(me.modifiers.is_empty());
    }

    #[test]
    fn mouse_drag_with_modifiers() {
        let me = MouseEvent::from(crossterm::event::MouseEvent {
            kind: crossterm::event::MouseEventKind::Drag(crossterm::event::MouseButton::Right),
            column: 3,
            row: 7,
            modifiers: crossterm::event::KeyModifiers::CONTROL,
        });
        assert_eq!(me.kind, MouseAction::Drag(MouseBtn::Right));
        assert!(me.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn mouse_scroll_variants() {
        for (ct_kind, expected) in [
            (crossterm::event::MouseEventKind::ScrollUp, MouseAction::ScrollUp),
            (crossterm::event::MouseEventKind::ScrollDown, MouseAction::ScrollDown),
            (crossterm::event::MouseEventKind::Moved, MouseAction::Moved),
        ] {
            let me = MouseEvent::from(crossterm::event::MouseEvent {
                kind: ct_kind,
                column: 0,
                row: 0,
                modifiers: crossterm::event::KeyModifiers::NONE,
            });
            assert_eq!(me.kind, expected);
        }
    }
}
