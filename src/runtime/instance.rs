//! Instance: one mounted UI with its hook context, timers, and dispatcher.
//!
//! The lifecycle is `Unmounted -> Idle <-> Rendering -> Unmounted`. Events
//! and timers are delivered in `Idle`; their handlers call state setters,
//! which only mark a render as requested. `flush_renders` then drains the
//! flag in a loop, so a setter fired during a build is coalesced into an
//! immediately-following pass rather than recursing — with a hard cap that
//! turns a self-sustaining update cycle into a loud failure instead of a
//! hang.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::component::{RendererNode, Widget};
use crate::error::HookError;
use crate::event::{Event, EventKind, KeyEvent, MouseEvent, ResizeEvent};
use crate::hooks::{ContextId, HookContext, HookRegistry, Hooks};

use super::dispatcher::{EventDispatcher, HandlerId};
use super::timer::{TimerId, TimerTable};

/// Consecutive coalesced passes allowed before declaring a render loop.
pub const MAX_RENDER_PASSES: usize = 64;

/// Lifecycle phase of an instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Unmounted,
    Idle,
    Rendering,
}

// ---------------------------------------------------------------------------
// Instance
// ---------------------------------------------------------------------------

struct InstanceInner {
    registry: HookRegistry,
    context: RefCell<Option<HookContext>>,
    context_id: Cell<Option<ContextId>>,
    root: RefCell<Option<Box<dyn Widget>>>,
    dispatcher: EventDispatcher,
    timers: TimerTable,
    phase: Cell<Phase>,
    render_requested: Cell<bool>,
    render_count: Cell<usize>,
    last_frame: RefCell<Option<RendererNode>>,
    presenter: RefCell<Option<Rc<dyn Fn(&RendererNode)>>>,
    size: Cell<(u16, u16)>,
    reduced_motion: Cell<bool>,
    quit: Cell<bool>,
}

/// Handle to one UI instance. Cheap to clone — clones share the instance.
pub struct Instance {
    inner: Rc<InstanceInner>,
}

impl Clone for Instance {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Instance {
    /// Create an unmounted instance using the given registry.
    pub fn new(registry: HookRegistry) -> Self {
        Self {
            inner: Rc::new(InstanceInner {
                registry,
                context: RefCell::new(None),
                context_id: Cell::new(None),
                root: RefCell::new(None),
                dispatcher: EventDispatcher::new(),
                timers: TimerTable::new(),
                phase: Cell::new(Phase::Unmounted),
                render_requested: Cell::new(false),
                render_count: Cell::new(0),
                last_frame: RefCell::new(None),
                presenter: RefCell::new(None),
                size: Cell::new((80, 24)),
                reduced_motion: Cell::new(false),
                quit: Cell::new(false),
            }),
        }
    }

    /// Create an unmounted instance with its own registry and a fixed
    /// terminal size. The headless constructor used by tests and the Pilot.
    pub fn headless(width: u16, height: u16) -> Self {
        let instance = Self::new(HookRegistry::new());
        instance.inner.size.set((width, height));
        instance
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Mount a root widget and perform the first render pass.
    ///
    /// # Panics
    ///
    /// Panics if the registry's context table is at its hard cap.
    pub fn mount(&self, widget: impl Widget + 'static) {
        if self.inner.phase.get() != Phase::Unmounted {
            tracing::warn!("mount called on an instance that is already mounted");
            return;
        }
        let id = self.inner.registry.allocate_id();
        let ctx = match self.inner.registry.create_context(id) {
            Ok(ctx) => ctx,
            Err(err) => panic!("{err}"),
        };

        // The context must not keep the instance alive: setters hold the
        // context, the context holds this callback.
        let weak: Weak<InstanceInner> = Rc::downgrade(&self.inner);
        ctx.set_rerender(move || {
            if let Some(inner) = weak.upgrade() {
                inner.render_requested.set(true);
            }
        });

        *self.inner.context.borrow_mut() = Some(ctx);
        self.inner.context_id.set(Some(id));
        *self.inner.root.borrow_mut() = Some(Box::new(widget));
        self.inner.phase.set(Phase::Idle);
        self.inner.render_requested.set(true);
        self.flush_renders();
    }

    /// Tear the instance down: run effect cleanups, drop timers and
    /// subscriptions, and release the hook context. Terminal — the instance
    /// cannot be remounted. Idempotent.
    pub fn unmount(&self) {
        match self.inner.phase.get() {
            Phase::Unmounted => return,
            Phase::Rendering => {
                tracing::warn!("unmount called during a render pass; ignored");
                return;
            }
            Phase::Idle => {}
        }
        self.inner.phase.set(Phase::Unmounted);
        self.inner.render_requested.set(false);

        let ctx = self.inner.context.borrow_mut().take();
        if let Some(ctx) = ctx {
            // Late setter calls become no-ops rather than poking a dead
            // instance.
            ctx.clear_rerender();
            ctx.clear();
        }
        if let Some(id) = self.inner.context_id.take() {
            self.inner.registry.remove_context(id);
        }
        self.inner.timers.clear();
        self.inner.dispatcher.clear();
        *self.inner.root.borrow_mut() = None;
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        self.inner.phase.get()
    }

    /// Whether the instance has a mounted root.
    pub fn is_mounted(&self) -> bool {
        self.inner.phase.get() != Phase::Unmounted
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Ask for a re-render. Drained by [`flush_renders`](Self::flush_renders).
    pub fn schedule_render(&self) {
        self.inner.render_requested.set(true);
    }

    /// Run one render pass now.
    ///
    /// A request arriving while the pass is running (a setter called
    /// synchronously inside `build`) is queued for the next pass, never run
    /// recursively.
    pub fn render(&self) {
        match self.inner.phase.get() {
            Phase::Unmounted => {
                tracing::warn!("render requested on an unmounted instance");
                return;
            }
            Phase::Rendering => {
                self.inner.render_requested.set(true);
                return;
            }
            Phase::Idle => {}
        }
        let ctx = match self.inner.context.borrow().clone() {
            Some(ctx) => ctx,
            None => return,
        };

        self.inner.phase.set(Phase::Rendering);
        let phase_guard = PhaseGuard {
            inner: Rc::clone(&self.inner),
        };

        let mut hooks = Hooks::bound(self.clone(), ctx.clone());
        let node = self.inner.registry.run_with_context(&ctx, || {
            let root = self.inner.root.borrow();
            let widget = root
                .as_ref()
                .expect("mounted instance has a root widget");
            widget.build(&mut hooks).render()
        });

        let presenter = self.inner.presenter.borrow().clone();
        if let Some(present) = presenter {
            present(&node);
        }
        *self.inner.last_frame.borrow_mut() = Some(node);
        self.inner.render_count.set(self.inner.render_count.get() + 1);
        drop(phase_guard);
    }

    /// Drain pending render requests, one pass per request.
    ///
    /// # Panics
    ///
    /// Panics with [`HookError::RenderLoop`] if the requests never settle
    /// within [`MAX_RENDER_PASSES`] passes.
    pub fn flush_renders(&self) {
        let mut passes = 0usize;
        while self.inner.render_requested.replace(false) {
            passes += 1;
            if passes > MAX_RENDER_PASSES {
                panic!("{}", HookError::RenderLoop { passes });
            }
            self.render();
        }
        if passes > 1 {
            tracing::trace!(passes, "coalesced render requests");
        }
    }

    /// Completed render passes since mount.
    pub fn render_count(&self) -> usize {
        self.inner.render_count.get()
    }

    /// The node tree produced by the most recent pass.
    pub fn last_frame(&self) -> Option<RendererNode> {
        self.inner.last_frame.borrow().clone()
    }

    /// Install the presenter invoked with each freshly built frame.
    pub fn set_presenter(&self, presenter: impl Fn(&RendererNode) + 'static) {
        *self.inner.presenter.borrow_mut() = Some(Rc::new(presenter));
    }

    // ── Events ───────────────────────────────────────────────────────

    /// Deliver an event to subscribers, then drain any renders it caused.
    ///
    /// Delivery after unmount is a no-op, not an error.
    pub fn dispatch(&self, event: Event) {
        if !self.is_mounted() {
            tracing::trace!("event dropped: instance is unmounted");
            return;
        }
        if let Event::Resize(resize) = &event {
            self.inner.size.set((resize.width, resize.height));
        }
        self.inner.dispatcher.emit(&event);
        self.flush_renders();
    }

    /// Deliver a key event.
    pub fn send_key(&self, key: KeyEvent) {
        self.dispatch(Event::Input(key));
    }

    /// Deliver a mouse event.
    pub fn send_mouse(&self, mouse: MouseEvent) {
        self.dispatch(Event::Mouse(mouse));
    }

    /// Deliver a paste event.
    pub fn send_paste(&self, text: impl Into<String>) {
        self.dispatch(Event::Paste(text.into()));
    }

    /// Deliver a resize, deriving the old size from the current one.
    pub fn resize(&self, width: u16, height: u16) {
        let (old_width, old_height) = self.inner.size.get();
        self.dispatch(Event::Resize(ResizeEvent {
            width,
            height,
            old_width,
            old_height,
        }));
    }

    /// Subscribe a raw handler to one event kind.
    pub fn subscribe(&self, kind: EventKind, handler: impl Fn(&Event) + 'static) -> HandlerId {
        self.inner.dispatcher.on(kind, handler)
    }

    /// Remove a raw handler. Removing one that is already gone is a no-op.
    pub fn unsubscribe(&self, id: HandlerId) -> bool {
        self.inner.dispatcher.off(id)
    }

    /// Number of live event subscriptions.
    pub fn subscription_count(&self) -> usize {
        self.inner.dispatcher.len()
    }

    // ── Timers ───────────────────────────────────────────────────────

    /// Register a repeating timer.
    pub fn add_timer(&self, interval_ms: u64, callback: impl FnMut() + 'static) -> TimerId {
        self.inner.timers.add(interval_ms, callback)
    }

    /// Remove a timer. Removing one that is already gone is a no-op.
    pub fn remove_timer(&self, id: TimerId) -> bool {
        self.inner.timers.remove(id)
    }

    /// Number of live timers.
    pub fn timer_count(&self) -> usize {
        self.inner.timers.len()
    }

    /// Advance the timer clock, then drain any renders the callbacks caused.
    pub fn advance(&self, elapsed_ms: u64) {
        if !self.is_mounted() {
            return;
        }
        self.inner.timers.advance(elapsed_ms);
        self.flush_renders();
    }

    // ── Environment ──────────────────────────────────────────────────

    /// Current terminal size as known to the instance.
    pub fn size(&self) -> (u16, u16) {
        self.inner.size.get()
    }

    /// Seed the terminal size without dispatching a resize event. Used at
    /// bootstrap, before any subscriber exists.
    pub fn set_size_hint(&self, width: u16, height: u16) {
        self.inner.size.set((width, height));
    }

    /// Whether the user asked for reduced motion. Stands in for the OS
    /// accessibility collaborator; default off.
    pub fn prefers_reduced_motion(&self) -> bool {
        self.inner.reduced_motion.get()
    }

    /// Override the reduced-motion preference.
    pub fn set_reduced_motion(&self, value: bool) {
        self.inner.reduced_motion.set(value);
    }

    /// The registry this instance registers its context with.
    pub fn registry(&self) -> HookRegistry {
        self.inner.registry.clone()
    }

    /// Ask the event loop to exit.
    pub fn request_quit(&self) {
        self.inner.quit.set(true);
    }

    /// Whether the event loop should exit.
    pub fn should_quit(&self) -> bool {
        self.inner.quit.get()
    }
}

/// Restores `Idle` when a render pass exits, including by panic, so a failed
/// build does not wedge the instance in `Rendering`.
struct PhaseGuard {
    inner: Rc<InstanceInner>,
}

impl Drop for PhaseGuard {
    fn drop(&mut self) {
        if self.inner.phase.get() == Phase::Rendering {
            self.inner.phase.set(Phase::Idle);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================
