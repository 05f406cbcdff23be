//! Repeating timers on a deterministic virtual clock.
//!
//! [`TimerTable`] stores slotmap-keyed repeating timers and fires them from
//! `advance(elapsed_ms)`. The live event loop feeds real elapsed time; tests
//! feed explicit steps, which makes timer behavior fully deterministic. A
//! timer removed by an earlier callback in the same advance does not fire.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key for a registered timer.
    pub struct TimerId;
}

type TimerCallback = Rc<RefCell<Box<dyn FnMut()>>>;

struct TimerEntry {
    /// Repeat interval in milliseconds, at least 1.
    interval: u64,
    /// Milliseconds until the next fire.
    remaining: u64,
    callback: TimerCallback,
}

// ---------------------------------------------------------------------------
// TimerTable
// ---------------------------------------------------------------------------

/// Interior-mutable table of repeating timers.
pub struct TimerTable {
    timers: RefCell<SlotMap<TimerId, TimerEntry>>,
}

impl Default for TimerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            timers: RefCell::new(SlotMap::with_key()),
        }
    }

    /// Register a repeating timer. A zero interval is clamped to 1ms so a
    /// single `advance` cannot fire one timer unboundedly.
    pub fn add(&self, interval_ms: u64, callback: impl FnMut() + 'static) -> TimerId {
        let interval = interval_ms.max(1);
        self.timers.borrow_mut().insert(TimerEntry {
            interval,
            remaining: interval,
            callback: Rc::new(RefCell::new(Box::new(callback))),
        })
    }

    /// Remove a timer. Removing twice (or after unmount already cleared the
    /// table) is a clean miss, not an error.
    pub fn remove(&self, id: TimerId) -> bool {
        self.timers.borrow_mut().remove(id).is_some()
    }

    /// Whether `id` is still registered.
    pub fn contains(&self, id: TimerId) -> bool {
        self.timers.borrow().contains_key(id)
    }

    /// Number of registered timers.
    pub fn len(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Whether no timers are registered.
    pub fn is_empty(&self) -> bool {
        self.timers.borrow().is_empty()
    }

    /// Drop every timer without firing it.
    pub fn clear(&self) {
        self.timers.borrow_mut().clear();
    }

    /// Advance the virtual clock by `elapsed_ms`, firing every due timer.
    ///
    /// A timer whose interval passed more than once fires once per elapsed
    /// interval. Callbacks run outside the table borrow, so they may add and
    /// remove timers freely; a fire scheduled for a timer that an earlier
    /// callback removed is skipped.
    pub fn advance(&self, elapsed_ms: u64) {
        if elapsed_ms == 0 {
            return;
        }
        let due: Vec<(TimerId, u64, TimerCallback)> = {
            let mut timers = self.timers.borrow_mut();
            timers
                .iter_mut()
                .filter_map(|(id, entry)| {
                    if elapsed_ms >= entry.remaining {
                        let overshoot = elapsed_ms - entry.remaining;
                        let fires = 1 + overshoot / entry.interval;
                        entry.remaining = entry.interval - (overshoot % entry.interval);
                        Some((id, fires, Rc::clone(&entry.callback)))
                    } else {
                        entry.remaining -= elapsed_ms;
                        None
                    }
                })
                .collect()
        };
        for (id, fires, callback) in due {
            for _ in 0..fires {
                if !self.contains(id) {
                    break;
                }
                (callback.borrow_mut())();
            }
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
