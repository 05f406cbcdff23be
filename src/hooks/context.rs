//! HookContext: per-instance slot storage for state, effects, and memos.
//!
//! Hooks are addressed by call order, not by name: the *n*-th `state()` call
//! of a render pass always lands in slot *n*. Three cursors (state, effect,
//! memo) advance during a pass and are reset together by `reset_for_render`.
//! Setters close over their slot directly, so they stay valid after the pass
//! ends — that is what allows event handlers and timers to update state.

use std::any::Any;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use super::deps::{deps_equal, Dep};

const STATE_TYPE_MISMATCH: &str =
    "state slot type mismatch: hooks were called in a different order than a \
     previous render (rules-of-hooks violation)";
const MEMO_TYPE_MISMATCH: &str =
    "memo slot type mismatch: hooks were called in a different order than a \
     previous render (rules-of-hooks violation)";

// ---------------------------------------------------------------------------
// Slot storage
// ---------------------------------------------------------------------------

/// One state slot. Shared between the context and every setter handle
/// created for it.
type StateSlot = Rc<RefCell<Box<dyn Any>>>;

/// One effect slot: the deps of the last run plus its pending cleanup.
/// `deps: None` means the effect has never run.
struct EffectSlot {
    deps: Option<Vec<Dep>>,
    cleanup: Option<Box<dyn FnOnce()>>,
}

/// One memo slot: the deps of the last computation and the cached value.
struct MemoSlot {
    deps: Vec<Dep>,
    value: Box<dyn Any>,
}

struct ContextInner {
    states: RefCell<Vec<StateSlot>>,
    state_cursor: Cell<usize>,
    effects: RefCell<Vec<EffectSlot>>,
    effect_cursor: Cell<usize>,
    memos: RefCell<Vec<MemoSlot>>,
    memo_cursor: Cell<usize>,
    /// Invoked after any setter writes, to ask the runtime for a re-render.
    rerender: RefCell<Option<Rc<dyn Fn()>>>,
    /// Slot counts observed at the end of the previous pass, for drift
    /// detection.
    expected: Cell<Option<(usize, usize, usize)>>,
    renders: Cell<usize>,
}

impl ContextInner {
    fn request_rerender(&self) {
        // Clone the callback out so the borrow is released before user code
        // runs (the callback may call back into this context).
        let cb = self.rerender.borrow().clone();
        if let Some(cb) = cb {
            cb();
        }
    }
}

// ---------------------------------------------------------------------------
// HookContext
// ---------------------------------------------------------------------------

/// Per-instance hook storage. Cheap to clone — clones share the same slots.
///
/// Created once at mount, cleared at unmount. One writer: the context is
/// single-threaded and only re-entered through nested same-thread calls.
pub struct HookContext {
    inner: Rc<ContextInner>,
}

impl Clone for HookContext {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for HookContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookContext")
            .field("states", &self.inner.states.borrow().len())
            .field("effects", &self.inner.effects.borrow().len())
            .field("memos", &self.inner.memos.borrow().len())
            .field("renders", &self.inner.renders.get())
            .finish()
    }
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}

impl HookContext {
    /// Create an empty context.
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ContextInner {
                states: RefCell::new(Vec::new()),
                state_cursor: Cell::new(0),
                effects: RefCell::new(Vec::new()),
                effect_cursor: Cell::new(0),
                memos: RefCell::new(Vec::new()),
                memo_cursor: Cell::new(0),
                rerender: RefCell::new(None),
                expected: Cell::new(None),
                renders: Cell::new(0),
            }),
        }
    }

    /// Whether two handles refer to the same underlying context.
    pub fn ptr_eq(&self, other: &HookContext) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Wire the callback invoked whenever a setter writes a slot.
    pub fn set_rerender(&self, callback: impl Fn() + 'static) {
        *self.inner.rerender.borrow_mut() = Some(Rc::new(callback));
    }

    /// Detach the re-render callback (done at unmount so late setter calls
    /// become no-ops instead of poking a dead instance).
    pub fn clear_rerender(&self) {
        *self.inner.rerender.borrow_mut() = None;
    }

    // ── State ────────────────────────────────────────────────────────

    /// Claim the next state slot.
    ///
    /// `init` runs only the first time this slot is seen. Returns the value
    /// currently stored in the slot and a setter that stays valid for the
    /// whole life of the context.
    pub fn state<T: Clone + 'static>(
        &self,
        init: impl FnOnce() -> T,
    ) -> (T, StateSetter<T>) {
        let index = self.inner.state_cursor.get();
        self.inner.state_cursor.set(index + 1);

        let slot = {
            let mut states = self.inner.states.borrow_mut();
            if index >= states.len() {
                states.push(Rc::new(RefCell::new(Box::new(init()) as Box<dyn Any>)));
            }
            Rc::clone(&states[index])
        };

        let value = slot
            .borrow()
            .downcast_ref::<T>()
            .expect(STATE_TYPE_MISMATCH)
            .clone();

        let setter = StateSetter {
            slot,
            ctx: Rc::clone(&self.inner),
            _marker: PhantomData,
        };
        (value, setter)
    }

    /// Claim the next state slot as a mutable box that never schedules a
    /// re-render. Direct mutation through the returned handle is invisible
    /// to the renderer until something else triggers a pass.
    pub fn ref_cell<T: 'static>(&self, init: impl FnOnce() -> T) -> RefHandle<T> {
        let (cell, _setter) = self.state(|| Rc::new(RefCell::new(init())));
        RefHandle { inner: cell }
    }

    // ── Effects ──────────────────────────────────────────────────────

    /// Claim the next effect slot and run `effect` if `deps` changed since
    /// the previous pass (first call always counts as changed).
    pub fn on_render(&self, effect: impl FnOnce(), deps: &[Dep]) {
        self.effect_slot(deps, || {
            effect();
            None
        });
    }

    /// Like [`on_render`](Self::on_render), but the effect returns a cleanup
    /// closure. The previous cleanup runs strictly before the new body.
    pub fn on_render_cleanup<F, C>(&self, effect: F, deps: &[Dep])
    where
        F: FnOnce() -> C,
        C: FnOnce() + 'static,
    {
        self.effect_slot(deps, || {
            let cleanup = effect();
            Some(Box::new(cleanup) as Box<dyn FnOnce()>)
        });
    }

    fn effect_slot(
        &self,
        deps: &[Dep],
        run: impl FnOnce() -> Option<Box<dyn FnOnce()>>,
    ) {
        let index = self.inner.effect_cursor.get();
        self.inner.effect_cursor.set(index + 1);

        let changed = {
            let mut effects = self.inner.effects.borrow_mut();
            if index >= effects.len() {
                effects.push(EffectSlot {
                    deps: None,
                    cleanup: None,
                });
            }
            match &effects[index].deps {
                None => true,
                Some(previous) => !deps_equal(previous, deps),
            }
        };
        if !changed {
            return;
        }

        // Old cleanup first, outside the borrow: both the cleanup and the
        // new body are user code and may touch this context.
        let old_cleanup = self.inner.effects.borrow_mut()[index].cleanup.take();
        if let Some(cleanup) = old_cleanup {
            cleanup();
        }

        let new_cleanup = run();

        let mut effects = self.inner.effects.borrow_mut();
        effects[index].deps = Some(deps.to_vec());
        effects[index].cleanup = new_cleanup;
    }

    // ── Memos ────────────────────────────────────────────────────────

    /// Claim the next memo slot; recompute `factory` only when `deps`
    /// changed, otherwise return the cached value.
    pub fn memo<T: Clone + 'static>(
        &self,
        factory: impl FnOnce() -> T,
        deps: &[Dep],
    ) -> T {
        let index = self.inner.memo_cursor.get();
        self.inner.memo_cursor.set(index + 1);

        let cached = {
            let memos = self.inner.memos.borrow();
            memos.get(index).and_then(|slot| {
                if deps_equal(&slot.deps, deps) {
                    Some(
                        slot.value
                            .downcast_ref::<T>()
                            .expect(MEMO_TYPE_MISMATCH)
                            .clone(),
                    )
                } else {
                    None
                }
            })
        };
        if let Some(value) = cached {
            return value;
        }

        // User code runs with no borrow held.
        let value = factory();

        let mut memos = self.inner.memos.borrow_mut();
        let slot = MemoSlot {
            deps: deps.to_vec(),
            value: Box::new(value.clone()),
        };
        if index >= memos.len() {
            memos.push(slot);
        } else {
            memos[index] = slot;
        }
        value
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Zero all three cursors. Called exactly once at the start of every
    /// render pass, before any hook call of that pass.
    pub fn reset_for_render(&self) {
        self.inner.state_cursor.set(0);
        self.inner.effect_cursor.set(0);
        self.inner.memo_cursor.set(0);
    }

    /// Validate slot counts against the previous pass and record them.
    ///
    /// Calling a different number of hooks than the previous render is a
    /// rules-of-hooks violation — the slot-index model cannot tell which
    /// slot belongs to which call site any more, so fail loudly.
    ///
    /// # Panics
    ///
    /// Panics when the cursor positions differ from the previous pass.
    pub fn finish_render(&self) {
        let counts = (
            self.inner.state_cursor.get(),
            self.inner.effect_cursor.get(),
            self.inner.memo_cursor.get(),
        );
        if let Some(expected) = self.inner.expected.get() {
            if expected != counts {
                panic!(
                    "hook count mismatch on render {}: previous pass used \
                     {} state / {} effect / {} memo slots, this pass used \
                     {} / {} / {}.\n\
                     Hooks must be called in the exact same order every \
                     render — check for hooks inside conditionals, loops, \
                     or early returns.",
                    self.inner.renders.get(),
                    expected.0,
                    expected.1,
                    expected.2,
                    counts.0,
                    counts.1,
                    counts.2,
                );
            }
        }
        self.inner.expected.set(Some(counts));
        self.inner.renders.set(self.inner.renders.get() + 1);
    }

    /// Number of completed render passes.
    pub fn render_count(&self) -> usize {
        self.inner.renders.get()
    }

    /// Run every stored effect cleanup in slot order and clear effect
    /// storage. Idempotent.
    ///
    /// A panicking cleanup does not stop the remaining cleanups; the first
    /// panic is re-raised only after all of them ran, so one bad widget
    /// cannot poison unrelated teardown.
    pub fn cleanup(&self) {
        let slots = std::mem::take(&mut *self.inner.effects.borrow_mut());
        let mut first_panic: Option<Box<dyn Any + Send>> = None;
        let mut failed = 0usize;
        for slot in slots {
            if let Some(cleanup) = slot.cleanup {
                if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(cleanup)) {
                    failed += 1;
                    if first_panic.is_none() {
                        first_panic = Some(payload);
                    }
                }
            }
        }
        if failed > 0 {
            tracing::error!(failed, "effect cleanup panicked during teardown");
        }
        if let Some(payload) = first_panic {
            panic::resume_unwind(payload);
        }
    }

    /// Full teardown: [`cleanup`](Self::cleanup) plus wipe state and memo
    /// storage and reset all cursors. Used at unmount.
    pub fn clear(&self) {
        self.cleanup();
        self.inner.states.borrow_mut().clear();
        self.inner.memos.borrow_mut().clear();
        self.inner.state_cursor.set(0);
        self.inner.effect_cursor.set(0);
        self.inner.memo_cursor.set(0);
        self.inner.expected.set(None);
    }

    /// Number of occupied state slots.
    pub fn state_slot_count(&self) -> usize {
        self.inner.states.borrow().len()
    }

    /// Number of occupied effect slots.
    pub fn effect_slot_count(&self) -> usize {
        self.inner.effects.borrow().len()
    }
}

// ---------------------------------------------------------------------------
// StateSetter
// ---------------------------------------------------------------------------

/// Writable handle to one state slot.
///
/// Closes over the slot itself, not a cursor position, so it keeps working
/// after the render pass that created it — event handlers and timers hold
/// these. Every write fires the context's re-render callback.
pub struct StateSetter<T> {
    slot: StateSlot,
    ctx: Rc<ContextInner>,
    _marker: PhantomData<fn(T) -> T>,
}

impl<T> Clone for StateSetter<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
            ctx: Rc::clone(&self.ctx),
            _marker: PhantomData,
        }
    }
}

impl<T: 'static> StateSetter<T> {
    /// Replace the slot value.
    pub fn set(&self, value: T) {
        *self.slot.borrow_mut() = Box::new(value);
        self.ctx.request_rerender();
    }

    /// Replace the slot value with a function of the current value.
    ///
    /// This is the form that never loses an update: the current value is read
    /// under the same borrow that writes the new one, so two synchronous
    /// `update` calls compose instead of clobbering each other.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        {
            let mut slot = self.slot.borrow_mut();
            let current = slot.downcast_ref::<T>().expect(STATE_TYPE_MISMATCH);
            let next = f(current);
            *slot = Box::new(next);
        }
        self.ctx.request_rerender();
    }

    /// Read the slot's current value (not the render-time snapshot).
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.slot
            .borrow()
            .downcast_ref::<T>()
            .expect(STATE_TYPE_MISMATCH)
            .clone()
    }
}

// ---------------------------------------------------------------------------
// RefHandle
// ---------------------------------------------------------------------------

/// Handle to a mutable cell created by `ref_cell` / `use_ref`.
///
/// Mutation deliberately bypasses re-render scheduling.
pub struct RefHandle<T> {
    inner: Rc<RefCell<T>>,
}

impl<T> Clone for RefHandle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> RefHandle<T> {
    /// Borrow the current value.
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.inner.borrow()
    }

    /// Mutably borrow the current value.
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.inner.borrow_mut()
    }

    /// Replace the value. Does not schedule a re-render.
    pub fn set(&self, value: T) {
        *self.inner.borrow_mut() = value;
    }
}

impl<T: Clone> RefHandle<T> {
    /// Clone out the current value.
    pub fn get(&self) -> T {
        self.inner.borrow().clone()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deps;
    use std::cell::RefCell;
    use std::rc::Rc;

    // ── State slots ──────────────────────────────────────────────────

    #[test]
    fn state_returns_initial_on_first_render() {
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (value, _set) = ctx.state(|| 0);
        assert_eq!(value, 0);
    }

    #[test]
    fn state_survives_across_resets() {
        // Spec scenario A: state(0) -> setter(5) -> reset -> state(0) == 5.
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (value, set) = ctx.state(|| 0);
        assert_eq!(value, 0);
        set.set(5);

        ctx.reset_for_render();
        let (value, _set) = ctx.state(|| 0);
        assert_eq!(value, 5);
    }

    #[test]
    fn init_runs_only_once() {
        let runs = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        for _ in 0..3 {
            ctx.reset_for_render();
            let runs = Rc::clone(&runs);
            let (_v, _s) = ctx.state(move || {
                *runs.borrow_mut() += 1;
                7
            });
        }
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn slot_stability_two_slots() {
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (_a, set_a) = ctx.state(|| 1);
        let (_b, set_b) = ctx.state(|| 2);
        set_a.set(10);
        set_b.set(20);

        ctx.reset_for_render();
        let (a, _) = ctx.state(|| 1);
        let (b, _) = ctx.state(|| 2);
        assert_eq!(a, 10);
        assert_eq!(b, 20);
    }

    #[test]
    fn setter_valid_after_render_pass() {
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (_v, set) = ctx.state(|| 0);
        // Simulates an event handler firing long after the pass completed.
        set.set(42);
        ctx.reset_for_render();
        let (v, _) = ctx.state(|| 0);
        assert_eq!(v, 42);
    }

    #[test]
    fn functional_update_composes() {
        // Two synchronous updates before the next render yield +2.
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (_v, set) = ctx.state(|| 0);
        set.update(|v| v + 1);
        set.update(|v| v + 1);
        ctx.reset_for_render();
        let (v, _) = ctx.state(|| 0);
        assert_eq!(v, 2);
    }

    #[test]
    fn captured_value_set_loses_updates() {
        // The documented hazard: plain `set(captured + 1)` twice only adds 1.
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (captured, set) = ctx.state(|| 0);
        set.set(captured + 1);
        set.set(captured + 1);
        ctx.reset_for_render();
        let (v, _) = ctx.state(|| 0);
        assert_eq!(v, 1);
    }

    #[test]
    fn render_pass_reads_are_snapshots() {
        // A setter fired mid-pass is not visible to the tuple already
        // returned; the next pass observes it.
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (before, set) = ctx.state(|| 0);
        set.set(9);
        assert_eq!(before, 0);
        assert_eq!(set.get(), 9);
    }

    #[test]
    fn setter_fires_rerender_callback() {
        let fired = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        {
            let fired = Rc::clone(&fired);
            ctx.set_rerender(move || *fired.borrow_mut() += 1);
        }
        ctx.reset_for_render();
        let (_v, set) = ctx.state(|| 0);
        set.set(1);
        set.update(|v| v + 1);
        assert_eq!(*fired.borrow(), 2);
    }

    #[test]
    fn clear_rerender_detaches_callback() {
        let fired = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        {
            let fired = Rc::clone(&fired);
            ctx.set_rerender(move || *fired.borrow_mut() += 1);
        }
        ctx.reset_for_render();
        let (_v, set) = ctx.state(|| 0);
        ctx.clear_rerender();
        set.set(1);
        assert_eq!(*fired.borrow(), 0);
    }

    // ── Ref cells ────────────────────────────────────────────────────

    #[test]
    fn ref_cell_persists_without_rerender() {
        let fired = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        {
            let fired = Rc::clone(&fired);
            ctx.set_rerender(move || *fired.borrow_mut() += 1);
        }
        ctx.reset_for_render();
        let handle = ctx.ref_cell(|| 0);
        handle.set(42);
        *handle.borrow_mut() += 1;

        ctx.reset_for_render();
        let handle = ctx.ref_cell(|| 0);
        assert_eq!(handle.get(), 43);
        assert_eq!(*fired.borrow(), 0);
    }

    // ── Effects ──────────────────────────────────────────────────────

    #[test]
    fn effect_runs_on_first_render() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let log_c = Rc::clone(&log);
        ctx.on_render(move || log_c.borrow_mut().push("run"), &deps![1]);
        assert_eq!(*log.borrow(), vec!["run"]);
    }

    #[test]
    fn effect_log_across_dep_changes() {
        // Spec scenario B: deps [1], [1], [2] -> run / nothing / cleanup+run.
        let log: Rc<RefCell<Vec<&str>>> = Rc::new(RefCell::new(Vec::new()));
        let ctx = HookContext::new();

        let render = |dep: i64| {
            ctx.reset_for_render();
            let log_c = Rc::clone(&log);
            ctx.on_render_cleanup(
                move || {
                    log_c.borrow_mut().push("run");
                    let log_c2 = Rc::clone(&log_c);
                    move || log_c2.borrow_mut().push("cleanup")
                },
                &deps![dep],
            );
        };

        render(1);
        assert_eq!(*log.borrow(), vec!["run"]);
        render(1);
        assert_eq!(*log.borrow(), vec!["run"]);
        render(2);
        assert_eq!(*log.borrow(), vec!["run", "cleanup", "run"]);
    }

    #[test]
    fn effects_run_in_slot_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let a = Rc::clone(&log);
        ctx.on_render(move || a.borrow_mut().push(1), &deps![]);
        let b = Rc::clone(&log);
        ctx.on_render(move || b.borrow_mut().push(2), &deps![]);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn empty_deps_runs_once() {
        let runs = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        for _ in 0..3 {
            ctx.reset_for_render();
            let runs = Rc::clone(&runs);
            ctx.on_render(move || *runs.borrow_mut() += 1, &deps![]);
        }
        assert_eq!(*runs.borrow(), 1);
    }

    #[test]
    fn cleanup_runs_exactly_once_per_rerun() {
        let cleanups = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        for dep in [1i64, 2, 3] {
            ctx.reset_for_render();
            let cleanups = Rc::clone(&cleanups);
            ctx.on_render_cleanup(
                move || move || *cleanups.borrow_mut() += 1,
                &deps![dep],
            );
        }
        // Three runs, two of which were re-runs with a prior cleanup.
        assert_eq!(*cleanups.borrow(), 2);
        ctx.cleanup();
        assert_eq!(*cleanups.borrow(), 3);
        // Idempotent: a second teardown does nothing.
        ctx.cleanup();
        assert_eq!(*cleanups.borrow(), 3);
    }

    #[test]
    fn cleanup_runs_in_slot_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = HookContext::new();
        ctx.reset_for_render();
        for tag in [1, 2, 3] {
            let log_c = Rc::clone(&log);
            ctx.on_render_cleanup(
                move || move || log_c.borrow_mut().push(tag),
                &deps![],
            );
        }
        ctx.cleanup();
        assert_eq!(*log.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn panicking_cleanup_does_not_skip_the_rest() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let ctx = HookContext::new();
        ctx.reset_for_render();
        {
            let log_c = Rc::clone(&log);
            ctx.on_render_cleanup(
                move || move || log_c.borrow_mut().push("first"),
                &deps![],
            );
        }
        ctx.on_render_cleanup(
            || || panic!("bad widget"),
            &deps![],
        );
        {
            let log_c = Rc::clone(&log);
            ctx.on_render_cleanup(
                move || move || log_c.borrow_mut().push("last"),
                &deps![],
            );
        }
        let result = std::panic::catch_unwind(AssertUnwindSafe(|| ctx.cleanup()));
        assert!(result.is_err());
        assert_eq!(*log.borrow(), vec!["first", "last"]);
    }

    // ── Memos ────────────────────────────────────────────────────────

    #[test]
    fn memo_caches_until_deps_change() {
        let computed = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();

        let render = |dep: i64, result: i64| -> i64 {
            ctx.reset_for_render();
            let computed = Rc::clone(&computed);
            ctx.memo(
                move || {
                    *computed.borrow_mut() += 1;
                    result
                },
                &deps![dep],
            )
        };

        assert_eq!(render(1, 100), 100);
        // Same deps: cached value wins even though the factory would now
        // produce something else — proves caching, not recomputation.
        assert_eq!(render(1, 999), 100);
        assert_eq!(*computed.borrow(), 1);
        assert_eq!(render(2, 999), 999);
        assert_eq!(*computed.borrow(), 2);
    }

    #[test]
    fn memo_recomputes_same_count_as_effect_reruns() {
        // Memo law: identical deps sequences produce identical run counts.
        let memo_runs = Rc::new(RefCell::new(0));
        let effect_runs = Rc::new(RefCell::new(0));
        let ctx = HookContext::new();
        for dep in [1i64, 1, 2, 2, 3] {
            ctx.reset_for_render();
            let m = Rc::clone(&memo_runs);
            let _: i64 = ctx.memo(
                move || {
                    *m.borrow_mut() += 1;
                    0
                },
                &deps![dep],
            );
            let e = Rc::clone(&effect_runs);
            ctx.on_render(move || *e.borrow_mut() += 1, &deps![dep]);
        }
        assert_eq!(*memo_runs.borrow(), *effect_runs.borrow());
        assert_eq!(*memo_runs.borrow(), 3);
    }

    // ── clear / drift detection ──────────────────────────────────────

    #[test]
    fn clear_wipes_state_storage() {
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (_v, set) = ctx.state(|| 1);
        set.set(5);
        ctx.clear();

        ctx.reset_for_render();
        let (v, _) = ctx.state(|| 1);
        assert_eq!(v, 1);
    }

    #[test]
    fn finish_render_accepts_stable_counts() {
        let ctx = HookContext::new();
        for _ in 0..3 {
            ctx.reset_for_render();
            let (_v, _s) = ctx.state(|| 0);
            ctx.on_render(|| {}, &deps![]);
            ctx.finish_render();
        }
        assert_eq!(ctx.render_count(), 3);
    }

    #[test]
    #[should_panic(expected = "hook count mismatch")]
    fn finish_render_detects_slot_drift() {
        let ctx = HookContext::new();
        ctx.reset_for_render();
        let (_a, _) = ctx.state(|| 0);
        let (_b, _) = ctx.state(|| 0);
        ctx.finish_render();

        ctx.reset_for_render();
        let (_a, _) = ctx.state(|| 0);
        ctx.finish_render();
    }
}
