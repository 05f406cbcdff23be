//! Hooks: the API surface widgets program against.
//!
//! A `Hooks` value is a thin binding of context + registry + instance. The
//! three primitives (`use_state`, `use_effect*`, `use_memo`) delegate to the
//! slots in [`HookContext`]; everything else in this module is composed from
//! them. Runtime-bridging hooks (`use_interval`, `use_input`, ...) also need
//! an [`Instance`] for timers and the event dispatcher.
//!
//! Contract violations (no current context, no instance) panic with the
//! corresponding [`HookError`] message rather than returning `Result` — a
//! widget cannot meaningfully recover from calling a hook in the wrong place.

use std::rc::Rc;

use crate::error::HookError;
use crate::event::{Event, EventKind, KeyEvent, MouseEvent, ResizeEvent};
use crate::runtime::Instance;

use super::context::{HookContext, RefHandle, StateSetter};
use super::deps::Dep;
use super::registry::HookRegistry;

/// Timer granularity for animation ticks, in milliseconds.
const ANIMATION_FRAME_MS: u64 = 16;

// ---------------------------------------------------------------------------
// Callback / Dispatch
// ---------------------------------------------------------------------------

/// A shareable closure with identity.
///
/// Produced by [`Hooks::use_callback`]: while its deps are unchanged the same
/// allocation is returned every render, so [`Callback::dep`] is a stable
/// dependency-array key. That is what lets subscription hooks avoid
/// resubscribing on every pass.
pub struct Callback<A = (), R = ()> {
    f: Rc<dyn Fn(A) -> R>,
}

impl<A, R> Clone for Callback<A, R> {
    fn clone(&self) -> Self {
        Self { f: Rc::clone(&self.f) }
    }
}

impl<A, R> Callback<A, R> {
    /// Wrap a closure. Each call allocates a fresh identity; go through
    /// [`Hooks::use_callback`] to get a stable one.
    pub fn new(f: impl Fn(A) -> R + 'static) -> Self {
        Self { f: Rc::new(f) }
    }

    /// Invoke with an argument.
    pub fn call(&self, arg: A) -> R {
        (self.f)(arg)
    }

    /// Identity key for dependency arrays.
    pub fn dep(&self) -> Dep {
        Dep::identity(&self.f)
    }
}

impl<R> Callback<(), R> {
    /// Invoke an argument-less callback.
    pub fn invoke(&self) -> R {
        (self.f)(())
    }
}

/// Action sender returned by [`Hooks::use_reducer`].
///
/// Every dispatch folds the action into the current state through the
/// reducer using the functional-update form, so dispatches from different
/// handlers in the same tick compose instead of clobbering each other.
pub struct Dispatch<A> {
    send: Rc<dyn Fn(A)>,
}

impl<A> Clone for Dispatch<A> {
    fn clone(&self) -> Self {
        Self { send: Rc::clone(&self.send) }
    }
}

impl<A> Dispatch<A> {
    /// Feed one action through the reducer.
    pub fn dispatch(&self, action: A) {
        (self.send)(action)
    }
}

// ---------------------------------------------------------------------------
// Derived-hook handles
// ---------------------------------------------------------------------------

/// Handle returned by [`Hooks::use_counter`].
pub struct Counter {
    count: i64,
    initial: i64,
    setter: StateSetter<i64>,
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self {
            count: self.count,
            initial: self.initial,
            setter: self.setter.clone(),
        }
    }
}

impl Counter {
    /// The count as of the render that produced this handle.
    pub fn count(&self) -> i64 {
        self.count
    }

    pub fn increment(&self) {
        self.setter.update(|c| c + 1);
    }

    pub fn decrement(&self) {
        self.setter.update(|c| c - 1);
    }

    /// Back to the initial value.
    pub fn reset(&self) {
        self.setter.set(self.initial);
    }

    pub fn set(&self, value: i64) {
        self.setter.set(value);
    }
}

/// Handle returned by [`Hooks::use_list`].
///
/// All mutating operations use the functional-update form, so two handlers
/// appending in the same tick both land.
pub struct ListState<T> {
    items: Vec<T>,
    setter: StateSetter<Vec<T>>,
}

impl<T: Clone> Clone for ListState<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
            setter: self.setter.clone(),
        }
    }
}

impl<T: Clone + 'static> ListState<T> {
    /// The items as of the render that produced this handle.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append an item.
    pub fn add(&self, item: T) {
        self.setter.update(|items| {
            let mut next = items.clone();
            next.push(item.clone());
            next
        });
    }

    /// Remove by index. Out-of-range indices are ignored.
    pub fn remove(&self, index: usize) {
        self.setter.update(|items| {
            let mut next = items.clone();
            if index < next.len() {
                next.remove(index);
            }
            next
        });
    }

    /// Replace the item at `index`. Out-of-range indices are ignored.
    pub fn update(&self, index: usize, item: T) {
        self.setter.update(|items| {
            let mut next = items.clone();
            if let Some(slot) = next.get_mut(index) {
                *slot = item.clone();
            }
            next
        });
    }

    pub fn clear(&self) {
        self.setter.set(Vec::new());
    }

    pub fn set(&self, items: Vec<T>) {
        self.setter.set(items);
    }
}

/// Easing curves for [`Hooks::use_animation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    #[default]
    Linear,
    QuadInOut,
}

impl Easing {
    /// Map linear progress `t` in `[0, 1]` onto the curve.
    pub fn eval(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Handle returned by [`Hooks::use_animation`].
pub struct Animation {
    value: f64,
    animating: bool,
    from: f64,
    to: f64,
    duration_ms: u64,
    easing: Easing,
    reduced: bool,
    set_value: StateSetter<f64>,
    set_animating: StateSetter<bool>,
    elapsed: RefHandle<u64>,
}

impl Clone for Animation {
    fn clone(&self) -> Self {
        Self {
            value: self.value,
            animating: self.animating,
            from: self.from,
            to: self.to,
            duration_ms: self.duration_ms,
            easing: self.easing,
            reduced: self.reduced,
            set_value: self.set_value.clone(),
            set_animating: self.set_animating.clone(),
            elapsed: self.elapsed.clone(),
        }
    }
}

impl Animation {
    /// The animated value as of the render that produced this handle.
    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn is_animating(&self) -> bool {
        self.animating
    }

    /// Begin the tween. When reduced motion is requested (and respected),
    /// jumps straight to the end value instead of animating.
    pub fn start(&self) {
        if self.reduced {
            self.set_value.set(self.to);
            self.set_animating.set(false);
            return;
        }
        self.elapsed.set(0);
        self.set_value.set(self.from);
        self.set_animating.set(true);
    }

    /// Step the tween by `dt_ms`. Clamps at the end value and stops.
    pub fn advance(&self, dt_ms: u64) {
        if !self.set_animating.get() {
            return;
        }
        let elapsed = self.elapsed.get() + dt_ms;
        self.elapsed.set(elapsed);
        if elapsed >= self.duration_ms {
            self.set_value.set(self.to);
            self.set_animating.set(false);
        } else {
            let t = elapsed as f64 / self.duration_ms as f64;
            self.set_value
                .set(self.from + (self.to - self.from) * self.easing.eval(t));
        }
    }
}

// ---------------------------------------------------------------------------
// Hooks
// ---------------------------------------------------------------------------

/// The facade widgets receive in `build`.
pub struct Hooks {
    context: Option<HookContext>,
    registry: Option<HookRegistry>,
    instance: Option<Instance>,
}

impl Hooks {
    /// Bind to an explicit context. Used by harnesses that drive
    /// [`HookRegistry::run_with_context`] themselves.
    pub fn with_context(context: HookContext) -> Self {
        Self {
            context: Some(context),
            registry: None,
            instance: None,
        }
    }

    /// Bind to a registry; the context is resolved per hook call from
    /// whatever is current at that moment.
    pub fn with_registry(registry: HookRegistry) -> Self {
        Self {
            context: None,
            registry: Some(registry),
            instance: None,
        }
    }

    /// Bind to a mounted instance and its context. What the runtime hands a
    /// root widget during a render pass.
    pub fn bound(instance: Instance, context: HookContext) -> Self {
        Self {
            registry: Some(instance.registry()),
            context: Some(context),
            instance: Some(instance),
        }
    }

    /// A free-standing facade over a fresh context, ready for one build.
    /// For unit-testing components without a runtime.
    pub fn detached() -> Self {
        let context = HookContext::new();
        context.reset_for_render();
        Self::with_context(context)
    }

    fn resolve(&self, hook: &'static str) -> HookContext {
        if let Some(ctx) = &self.context {
            return ctx.clone();
        }
        if let Some(registry) = &self.registry {
            match registry.current_or(hook) {
                Ok(ctx) => return ctx,
                Err(err) => panic!("{err}"),
            }
        }
        panic!("{}", HookError::NoActiveContext { hook });
    }

    fn require_instance(&self, hook: &'static str) -> Instance {
        match &self.instance {
            Some(instance) => instance.clone(),
            None => panic!("{}", HookError::NoInstance { hook }),
        }
    }

    /// The instance this facade is bound to, if any.
    pub fn instance(&self) -> Option<Instance> {
        self.instance.clone()
    }

    // ── Primitives ───────────────────────────────────────────────────

    /// Claim the next state slot: `init` runs on first render only, and the
    /// setter stays valid after the pass (hold it in event handlers).
    pub fn use_state<T: Clone + 'static>(
        &mut self,
        init: impl FnOnce() -> T,
    ) -> (T, StateSetter<T>) {
        self.resolve("use_state").state(init)
    }

    /// A mutable cell that survives renders without scheduling them.
    pub fn use_ref<T: 'static>(&mut self, init: impl FnOnce() -> T) -> RefHandle<T> {
        self.resolve("use_ref").ref_cell(init)
    }

    /// Run `effect` when `deps` changed since the previous render.
    pub fn use_effect(&mut self, effect: impl FnOnce(), deps: Vec<Dep>) {
        self.resolve("use_effect").on_render(effect, &deps);
    }

    /// Like [`use_effect`](Self::use_effect), but the effect returns a
    /// cleanup that runs before the next re-run and at unmount.
    pub fn use_effect_cleanup<F, C>(&mut self, effect: F, deps: Vec<Dep>)
    where
        F: FnOnce() -> C,
        C: FnOnce() + 'static,
    {
        self.resolve("use_effect").on_render_cleanup(effect, &deps);
    }

    /// Cache `factory`'s result until `deps` change.
    pub fn use_memo<T: Clone + 'static>(
        &mut self,
        factory: impl FnOnce() -> T,
        deps: Vec<Dep>,
    ) -> T {
        self.resolve("use_memo").memo(factory, &deps)
    }

    /// A closure with identity stable across renders while `deps` are
    /// unchanged.
    pub fn use_callback<A: 'static, R: 'static>(
        &mut self,
        f: impl Fn(A) -> R + 'static,
        deps: Vec<Dep>,
    ) -> Callback<A, R> {
        self.use_memo(move || Callback::new(f), deps)
    }

    // ── Derived hooks ────────────────────────────────────────────────

    /// Reducer-style state: every dispatched action is folded into the
    /// current state, never into a render-time snapshot.
    pub fn use_reducer<S, A>(
        &mut self,
        reducer: impl Fn(&S, A) -> S + 'static,
        initial: impl FnOnce() -> S,
    ) -> (S, Dispatch<A>)
    where
        S: Clone + 'static,
        A: 'static,
    {
        let (state, setter) = self.use_state(initial);
        let send = Rc::new(move |action: A| {
            setter.update(|current| reducer(current, action));
        });
        (state, Dispatch { send })
    }

    /// Boolean state with a flip callback.
    pub fn use_toggle(
        &mut self,
        initial: bool,
    ) -> (bool, Callback<()>, StateSetter<bool>) {
        let (value, setter) = self.use_state(|| initial);
        let flip = setter.clone();
        let toggle = Callback::new(move |()| flip.update(|v| !v));
        (value, toggle, setter)
    }

    /// Integer counter with increment/decrement/reset.
    pub fn use_counter(&mut self, initial: i64) -> Counter {
        let (count, setter) = self.use_state(|| initial);
        Counter {
            count,
            initial,
            setter,
        }
    }

    /// A list whose mutations compose across handlers in the same tick.
    pub fn use_list<T: Clone + 'static>(
        &mut self,
        initial: impl FnOnce() -> Vec<T>,
    ) -> ListState<T> {
        let (items, setter) = self.use_state(initial);
        ListState { items, setter }
    }

    /// The value this call site received on the previous render, `None` on
    /// the first.
    pub fn use_previous<T: Clone + 'static>(&mut self, value: T) -> Option<T> {
        let cell = self.use_ref(|| None::<T>);
        let previous = cell.get();
        cell.set(Some(value));
        previous
    }

    /// Run `callback` every `ms` milliseconds while `active`.
    ///
    /// The timer is registered in an effect with deps `[ms, active]`; the
    /// callback reaches the timer through a ref updated every render, so the
    /// latest closure runs even though the timer was registered once.
    pub fn use_interval(&mut self, callback: Callback<()>, ms: u64, active: bool) {
        let instance = self.require_instance("use_interval");
        let latest = self.use_ref({
            let callback = callback.clone();
            move || callback
        });
        latest.set(callback);

        self.use_effect_cleanup(
            move || {
                let timer = if active {
                    let latest = latest.clone();
                    Some(instance.add_timer(ms, move || latest.get().invoke()))
                } else {
                    None
                };
                let instance = instance.clone();
                move || {
                    if let Some(id) = timer {
                        instance.remove_timer(id);
                    }
                }
            },
            crate::deps![ms, active],
        );
    }

    /// A value tween from `from` to `to` over `duration_ms`.
    ///
    /// While animating, an instance timer steps the tween every frame.
    /// `respect_reduced_motion` makes [`Animation::start`] jump straight to
    /// the end value when the instance reports a reduced-motion preference.
    pub fn use_animation(
        &mut self,
        from: f64,
        to: f64,
        duration_ms: u64,
        easing: Easing,
        respect_reduced_motion: bool,
    ) -> Animation {
        let (value, set_value) = self.use_state(|| from);
        let (animating, set_animating) = self.use_state(|| false);
        let elapsed = self.use_ref(|| 0u64);
        let reduced = respect_reduced_motion
            && self
                .instance
                .as_ref()
                .map(Instance::prefers_reduced_motion)
                .unwrap_or(false);

        let handle = Animation {
            value,
            animating,
            from,
            to,
            duration_ms: duration_ms.max(1),
            easing,
            reduced,
            set_value,
            set_animating,
            elapsed,
        };

        // Drive the tween from an instance timer while animating. The slot is
        // claimed unconditionally so the hook count stays stable whether or
        // not a runtime is attached.
        let runtime = self.instance.clone();
        let ticker = handle.clone();
        self.use_effect_cleanup(
            move || {
                let timer = match runtime {
                    Some(instance) if animating => {
                        let id = instance.add_timer(ANIMATION_FRAME_MS, move || {
                            ticker.advance(ANIMATION_FRAME_MS);
                        });
                        Some((instance, id))
                    }
                    _ => None,
                };
                move || {
                    if let Some((instance, id)) = timer {
                        instance.remove_timer(id);
                    }
                }
            },
            crate::deps![animating],
        );

        handle
    }

    // ── Event subscriptions ──────────────────────────────────────────

    /// Subscribe `handler` to key events while `active`.
    ///
    /// One subscription per call site: the effect's deps are the handler's
    /// identity plus `active`, so a [`use_callback`](Self::use_callback)
    /// handler with stable deps never resubscribes.
    pub fn use_input(&mut self, handler: Callback<KeyEvent>, active: bool) {
        let dep = handler.dep();
        self.use_subscription("use_input", EventKind::Input, active, dep, move |event| {
            if let Event::Input(key) = event {
                handler.call(*key);
            }
        });
    }

    /// Subscribe `handler` to mouse events while `active`.
    pub fn use_mouse(&mut self, handler: Callback<MouseEvent>, active: bool) {
        let dep = handler.dep();
        self.use_subscription("use_mouse", EventKind::Mouse, active, dep, move |event| {
            if let Event::Mouse(mouse) = event {
                handler.call(*mouse);
            }
        });
    }

    /// Subscribe `handler` to paste events while `active`.
    pub fn use_paste(&mut self, handler: Callback<String>, active: bool) {
        let dep = handler.dep();
        self.use_subscription("use_paste", EventKind::Paste, active, dep, move |event| {
            if let Event::Paste(text) = event {
                handler.call(text.clone());
            }
        });
    }

    /// Subscribe `handler` to resize events while `active`.
    pub fn use_resize(&mut self, handler: Callback<ResizeEvent>, active: bool) {
        let dep = handler.dep();
        self.use_subscription("use_resize", EventKind::Resize, active, dep, move |event| {
            if let Event::Resize(resize) = event {
                handler.call(*resize);
            }
        });
    }

    fn use_subscription(
        &mut self,
        hook: &'static str,
        kind: EventKind,
        active: bool,
        handler_dep: Dep,
        deliver: impl Fn(&Event) + 'static,
    ) {
        let instance = self.require_instance(hook);
        self.use_effect_cleanup(
            move || {
                let subscription = if active {
                    Some(instance.subscribe(kind, deliver))
                } else {
                    None
                };
                let instance = instance.clone();
                move || {
                    if let Some(id) = subscription {
                        instance.unsubscribe(id);
                    }
                }
            },
            vec![handler_dep, Dep::Bool(active)],
        );
    }
}

// ===========================================================================
// Tests
// ===========================================================================
