//! # weft-tui
//!
//! A hooks-driven reactive core for terminal UIs.
//!
//! weft-tui brings React-style hooks — call-order slot addressing, dependency
//! arrays, effects with cleanup — to Rust terminal applications. Widgets are
//! plain functions (or values) that rebuild their component tree every render
//! pass; state lives in per-instance hook slots and survives across passes.
//!
//! ## Core Systems
//!
//! - **[`hooks`]** — HookContext slot storage, the current-context registry,
//!   and the `Hooks` facade with derived hooks (reducer, counter, interval,
//!   animation, input subscriptions)
//! - **[`component`]** — Component/Widget traits and the renderer node tree
//! - **[`event`]** — Key, mouse, paste, and resize events with crossterm
//!   conversion
//! - **[`runtime`]** — Instance lifecycle, event dispatcher, virtual-clock
//!   timer table, and the terminal event loop
//! - **[`render`]** — Frame flattening and the crossterm presenter
//! - **[`testing`]** — Headless Pilot driver and snapshot helpers
//!
//! ## A counter in one closure
//!
//! ```ignore
//! use weft_tui::component::{Component, Text};
//! use weft_tui::event::{Key, KeyEvent};
//! use weft_tui::hooks::Hooks;
//! use weft_tui::deps;
//!
//! weft_tui::runtime::run(|hooks: &mut Hooks| -> Box<dyn Component> {
//!     let (count, set) = hooks.use_state(|| 0);
//!     let on_key = hooks.use_callback(
//!         move |key: KeyEvent| {
//!             if key.code == Key::Char('+') {
//!                 set.update(|c| c + 1);
//!             }
//!         },
//!         deps![],
//!     );
//!     hooks.use_input(on_key, true);
//!     Box::new(Text::new(format!("count: {count}")))
//! })?;
//! # Ok::<(), std::io::Error>(())
//! ```

// Foundation
pub mod error;

// Hook core
pub mod hooks;

// Component tree
pub mod component;

// Events
pub mod event;

// Runtime
pub mod runtime;

// Rendering
pub mod render;

// Test harness
pub mod testing;
