//! Event dispatch: per-kind handler registration and delivery.
//!
//! [`EventDispatcher`] hands out slotmap-keyed [`HandlerId`]s on `on` and
//! delivers events to a snapshot of the matching handlers, so a handler may
//! subscribe or unsubscribe re-entrantly while an emit is in flight.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

use crate::event::{Event, EventKind};

new_key_type! {
    /// Key for a registered event handler.
    pub struct HandlerId;
}

/// A registered callback.
type Handler = Rc<dyn Fn(&Event)>;

struct HandlerEntry {
    kind: EventKind,
    callback: Handler,
}

// ---------------------------------------------------------------------------
// EventDispatcher
// ---------------------------------------------------------------------------

/// Per-kind event subscription table with snapshot delivery.
///
/// Interior-mutable: all methods take `&self` so handlers running inside
/// `emit` can call back into the dispatcher. Handlers removed mid-emit still
/// receive the event currently in flight (the snapshot was taken first);
/// handlers added mid-emit only see later events.
pub struct EventDispatcher {
    handlers: RefCell<SlotMap<HandlerId, HandlerEntry>>,
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl EventDispatcher {
    /// Create an empty dispatcher.
    pub fn new() -> Self {
        Self {
            handlers: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Register a handler for one event kind.
    pub fn on(&self, kind: EventKind, callback: impl Fn(&Event) + 'static) -> HandlerId {
        self.handlers.borrow_mut().insert(HandlerEntry {
            kind,
            callback: Rc::new(callback),
        })
    }

    /// Remove a handler. Returns whether it was still registered —
    /// removing twice is a clean miss, not an error.
    pub fn off(&self, id: HandlerId) -> bool {
        self.handlers.borrow_mut().remove(id).is_some()
    }

    /// Deliver an event to every handler registered for its kind.
    pub fn emit(&self, event: &Event) {
        let kind = event.kind();
        // Snapshot first: user callbacks may mutate the table.
        let snapshot: Vec<Handler> = self
            .handlers
            .borrow()
            .values()
            .filter(|entry| entry.kind == kind)
            .map(|entry| Rc::clone(&entry.callback))
            .collect();
        for handler in snapshot {
            handler(event);
        }
    }

    /// Number of registered handlers across all kinds.
    pub fn len(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Whether no handlers are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.borrow().is_empty()
    }

    /// Number of handlers registered for `kind`.
    pub fn count_for(&self, kind: EventKind) -> usize {
        self.handlers
            .borrow()
            .values()
            .filter(|entry| entry.kind == kind)
            .count()
    }

    /// Drop every handler.
    pub fn clear(&self) {
        self.handlers.borrow_mut().clear();
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Key, KeyEvent, Modifiers};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn key_event(c: char) -> Event {
        Event::Input(KeyEvent::new(Key::Char(c), Modifiers::NONE))
    }

    // ── Registration ─────────────────────────────────────────────────

    #[test]
    fn new_dispatcher_is_empty() {
        let dispatcher = EventDispatcher::new();
        assert!(dispatcher.is_empty());
        assert_eq!(dispatcher.len(), 0);
    }

    #[test]
    fn on_registers_per_kind() {
        let dispatcher = EventDispatcher::new();
        dispatcher.on(EventKind::Input, |_| {});
        dispatcher.on(EventKind::Input, |_| {});
        dispatcher.on(EventKind::Paste, |_| {});
        assert_eq!(dispatcher.len(), 3);
        assert_eq!(dispatcher.count_for(EventKind::Input), 2);
        assert_eq!(dispatcher.count_for(EventKind::Paste), 1);
        assert_eq!(dispatcher.count_for(EventKind::Mouse), 0);
    }

    #[test]
    fn off_removes_exactly_one() {
        let dispatcher = EventDispatcher::new();
        let a = dispatcher.on(EventKind::Input, |_| {});
        let _b = dispatcher.on(EventKind::Input, |_| {});
        assert!(dispatcher.off(a));
        assert_eq!(dispatcher.len(), 1);
        // Removing again is a no-op.
        assert!(!dispatcher.off(a));
    }

    // ── Delivery ─────────────────────────────────────────────────────

    #[test]
    fn emit_reaches_matching_kind_only() {
        let dispatcher = EventDispatcher::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        {
            let seen = Rc::clone(&seen);
            dispatcher.on(EventKind::Input, move |_| seen.borrow_mut().push("input"));
        }
        {
            let seen = Rc::clone(&seen);
            dispatcher.on(EventKind::Paste, move |_| seen.borrow_mut().push("paste"));
        }
        dispatcher.emit(&key_event('a'));
        assert_eq!(*seen.borrow(), vec!["input"]);
        dispatcher.emit(&Event::Paste("x".into()));
        assert_eq!(*seen.borrow(), vec!["input", "paste"]);
    }

    #[test]
    fn emit_after_off_is_silent() {
        let dispatcher = EventDispatcher::new();
        let count = Rc::new(RefCell::new(0));
        let id = {
            let count = Rc::clone(&count);
            dispatcher.on(EventKind::Input, move |_| *count.borrow_mut() += 1)
        };
        dispatcher.emit(&key_event('a'));
        dispatcher.off(id);
        dispatcher.emit(&key_event('b'));
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn handler_sees_event_payload() {
        let dispatcher = EventDispatcher::new();
        let got = Rc::new(RefCell::new(None));
        {
            let got = Rc::clone(&got);
            dispatcher.on(EventKind::Input, move |ev| {
                if let Event::Input(ke) = ev {
                    *got.borrow_mut() = Some(ke.code);
                }
            });
        }
        dispatcher.emit(&key_event('z'));
        assert_eq!(*got.borrow(), Some(Key::Char('z')));
    }

    // ── Re-entrancy ──────────────────────────────────────────────────

    #[test]
    fn handler_may_unsubscribe_itself_mid_emit() {
        let dispatcher = Rc::new(EventDispatcher::new());
        let count = Rc::new(RefCell::new(0));
        let id_cell: Rc<RefCell<Option<HandlerId>>> = Rc::new(RefCell::new(None));
        let id = {
            let dispatcher = Rc::clone(&dispatcher);
            let count = Rc::clone(&count);
            let id_cell = Rc::clone(&id_cell);
            dispatcher.clone().on(EventKind::Input, move |_| {
                *count.borrow_mut() += 1;
                if let Some(id) = *id_cell.borrow() {
                    dispatcher.off(id);
                }
            })
        };
        *id_cell.borrow_mut() = Some(id);
        dispatcher.emit(&key_event('a'));
        dispatcher.emit(&key_event('b'));
        // Fired once, then removed itself.
        assert_eq!(*count.borrow(), 1);
        assert!(dispatcher.is_empty());
    }

    #[test]
    fn clear_drops_all_handlers() {
        let dispatcher = EventDispatcher::new();
        dispatcher.on(EventKind::Input, |_| {});
        dispatcher.on(EventKind::Resize, |_| {});
        dispatcher.clear();
        assert!(dispatcher.is_empty());
    }
}
