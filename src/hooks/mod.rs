//! Hook core: slot storage, the current-context registry, and the facade.
//!
//! Widgets only see [`Hooks`]; [`HookContext`] and [`HookRegistry`] are the
//! machinery the runtime (and test harnesses) wire together around a render
//! pass.

pub mod context;
pub mod deps;
pub mod facade;
pub mod registry;

pub use context::{HookContext, RefHandle, StateSetter};
pub use deps::{deps_equal, Dep};
pub use facade::{Animation, Callback, Counter, Dispatch, Easing, Hooks, ListState};
pub use registry::{ContextId, HookRegistry, HARD_CONTEXT_LIMIT, SOFT_CONTEXT_LIMIT};
