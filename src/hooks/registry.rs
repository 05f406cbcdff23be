//! HookRegistry: tracks which HookContext is current during a render.
//!
//! The registry is an explicitly constructed value owned by the application
//! bootstrap and injected wherever it is needed — there is no process-wide
//! singleton. The "current" pointer is a save/restore stack so nested renders
//! (a test harness rendering inside another render) are safe, and restoration
//! happens in a drop guard so a panicking pass cannot corrupt the outer pass.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::context::HookContext;
use crate::error::HookError;

/// Context count at which the registry starts warning about leaks.
pub const SOFT_CONTEXT_LIMIT: usize = 64;
/// Context count at which `create_context` refuses to grow the table.
pub const HARD_CONTEXT_LIMIT: usize = 256;

// ---------------------------------------------------------------------------
// ContextId
// ---------------------------------------------------------------------------

/// Opaque identifier for a registry-tracked context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub u64);

// ---------------------------------------------------------------------------
// HookRegistry
// ---------------------------------------------------------------------------

struct RegistryInner {
    /// Save/restore stack; the top entry is the current context.
    stack: RefCell<Vec<HookContext>>,
    /// Table of tracked contexts for hosts managing many instances.
    table: RefCell<HashMap<ContextId, HookContext>>,
    next_id: Cell<u64>,
    soft_limit: usize,
    hard_limit: usize,
}

/// Registry of hook contexts. Cheap to clone — clones share state.
pub struct HookRegistry {
    inner: Rc<RegistryInner>,
}

impl Clone for HookRegistry {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl Default for HookRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl HookRegistry {
    /// Create a registry with the default leak limits.
    pub fn new() -> Self {
        Self::with_limits(SOFT_CONTEXT_LIMIT, HARD_CONTEXT_LIMIT)
    }

    /// Create a registry with custom soft/hard context-count limits.
    pub fn with_limits(soft_limit: usize, hard_limit: usize) -> Self {
        Self {
            inner: Rc::new(RegistryInner {
                stack: RefCell::new(Vec::new()),
                table: RefCell::new(HashMap::new()),
                next_id: Cell::new(0),
                soft_limit,
                hard_limit,
            }),
        }
    }

    // ── Current context ──────────────────────────────────────────────

    /// The context currently marked active, if any.
    pub fn current_context(&self) -> Option<HookContext> {
        self.inner.stack.borrow().last().cloned()
    }

    /// Whether a render pass is active on this registry.
    pub fn has_current_context(&self) -> bool {
        !self.inner.stack.borrow().is_empty()
    }

    /// The current context, or a [`HookError::NoActiveContext`] naming the
    /// hook that asked.
    pub fn current_or(&self, hook: &'static str) -> Result<HookContext, HookError> {
        self.current_context()
            .ok_or(HookError::NoActiveContext { hook })
    }

    /// Run `f` with `ctx` as the current context.
    ///
    /// Pushes `ctx`, resets its cursors, runs `f`, and restores the previous
    /// current context on the way out — including when `f` panics. Slot-count
    /// validation (`finish_render`) only happens when `f` returns normally.
    pub fn run_with_context<R>(&self, ctx: &HookContext, f: impl FnOnce() -> R) -> R {
        self.inner.stack.borrow_mut().push(ctx.clone());
        let guard = StackGuard {
            inner: Rc::clone(&self.inner),
        };
        ctx.reset_for_render();
        let result = f();
        ctx.finish_render();
        drop(guard);
        result
    }

    // ── Context table ────────────────────────────────────────────────

    /// Allocate a fresh id for a context this registry will track.
    pub fn allocate_id(&self) -> ContextId {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        ContextId(id)
    }

    /// Create and track a context under `id`.
    ///
    /// Re-using an id replaces the old context after clearing it. Crossing
    /// the soft limit logs a warning; crossing the hard limit returns
    /// [`HookError::ContextLeak`] — both indicate instances that were never
    /// unmounted.
    pub fn create_context(&self, id: ContextId) -> Result<HookContext, HookError> {
        {
            let mut table = self.inner.table.borrow_mut();
            if let Some(old) = table.remove(&id) {
                drop(table);
                old.clear();
            }
        }
        let count = self.inner.table.borrow().len();
        if count >= self.inner.hard_limit {
            return Err(HookError::ContextLeak {
                count: count + 1,
                cap: self.inner.hard_limit,
            });
        }
        if count >= self.inner.soft_limit {
            tracing::warn!(
                count = count + 1,
                soft_limit = self.inner.soft_limit,
                "hook context table is growing; are instances being unmounted?"
            );
        }
        let ctx = HookContext::new();
        self.inner.table.borrow_mut().insert(id, ctx.clone());
        Ok(ctx)
    }

    /// Look up a tracked context.
    pub fn context(&self, id: ContextId) -> Option<HookContext> {
        self.inner.table.borrow().get(&id).cloned()
    }

    /// Stop tracking `id`, clearing the context first. Returns whether the
    /// id was tracked.
    pub fn remove_context(&self, id: ContextId) -> bool {
        let removed = self.inner.table.borrow_mut().remove(&id);
        match removed {
            Some(ctx) => {
                ctx.clear();
                true
            }
            None => false,
        }
    }

    /// Number of tracked contexts.
    pub fn tracked_count(&self) -> usize {
        self.inner.table.borrow().len()
    }

    /// Clear every tracked context and drop the table. For test teardown.
    pub fn clear(&self) {
        let contexts: Vec<HookContext> =
            self.inner.table.borrow_mut().drain().map(|(_, c)| c).collect();
        for ctx in contexts {
            ctx.clear();
        }
        self.inner.stack.borrow_mut().clear();
    }
}

/// Pops one stack entry on drop, restoring the previously-current context
/// even when the render pass unwinds.
struct StackGuard {
    inner: Rc<RegistryInner>,
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        self.inner.stack.borrow_mut().pop();
    }
}

// ===========================================================================
// Tests
// ===========================================================================
