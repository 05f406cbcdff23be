//! Error taxonomy for hook-contract violations.
//!
//! Everything in here is a programmer error, not a runtime fault: a hook was
//! called in the wrong place, contexts leaked, or a render pass never settled.
//! Hook primitives surface these by panicking with the error's `Display` text
//! (fail fast, with a message that names the offending hook); registry table
//! APIs return them as `Result` so test harnesses can assert on them.

// ---------------------------------------------------------------------------
// HookError
// ---------------------------------------------------------------------------

/// Errors raised by the hook core.
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    /// A hook primitive ran while no [`HookContext`](crate::hooks::HookContext)
    /// was current. The most common integration bug: calling hooks from event
    /// handlers, timer callbacks, or after unmount.
    #[error(
        "`{hook}` called outside of a render pass: no hook context is current.\n\
         Hooks may only be called while a component is building.\n\
         Make sure you are not calling hooks in:\n\
         - event handlers\n\
         - timer callbacks\n\
         - code that runs after unmount"
    )]
    NoActiveContext { hook: &'static str },

    /// The registry's context table hit its hard cap. Indicates instances
    /// that were never unmounted.
    #[error(
        "hook context table is full: {count} contexts tracked, hard cap is {cap}.\n\
         This usually means instances were mounted but never unmounted."
    )]
    ContextLeak { count: usize, cap: usize },

    /// A runtime-bridging hook (`use_interval`, `use_input`, ...) ran on a
    /// [`Hooks`](crate::hooks::Hooks) value that has no instance attached.
    #[error(
        "`{hook}` needs a runtime instance for timers/events, but this Hooks \
         value was built without one"
    )]
    NoInstance { hook: &'static str },

    /// Consecutive render passes never settled: a state setter fires
    /// unconditionally during build, re-requesting a render every pass.
    #[error(
        "render did not settle after {passes} consecutive passes.\n\
         A state setter is being called unconditionally during build."
    )]
    RenderLoop { passes: usize },
}

// ===========================================================================
// Tests
// ===========================================================================
