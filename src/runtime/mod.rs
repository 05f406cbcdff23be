//! Runtime: instance lifecycle, event dispatch, timers, and the terminal
//! event loop.

pub mod dispatcher;
pub mod instance;
pub mod timer;

pub use dispatcher::{EventDispatcher, HandlerId};
pub use instance::{Instance, Phase, MAX_RENDER_PASSES};
pub use timer::{TimerId, TimerTable};

use std::io;
use std::time::{Duration, Instant};

use crate::component::Widget;
use crate::event::Event;
use crate::hooks::HookRegistry;
use crate::render::Presenter;

/// Poll interval for the terminal event loop. Doubles as the timer tick.
const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Mount `widget` on a real terminal and block until it requests quit.
///
/// Enters the alternate screen with raw mode, polls crossterm for input, and
/// feeds elapsed wall-clock time into the instance's timer table between
/// events. The terminal is restored before returning, including on error.
pub fn run(widget: impl Widget + 'static) -> io::Result<()> {
    let mut presenter = Presenter::new()?;
    presenter.enter_alt_screen()?;
    presenter.hide_cursor()?;

    let result = run_inner(widget);

    presenter.show_cursor()?;
    presenter.leave_alt_screen()?;
    result
}

fn run_inner(widget: impl Widget + 'static) -> io::Result<()> {
    let instance = Instance::new(HookRegistry::new());
    let (width, height) = Presenter::terminal_size()?;
    instance.set_size_hint(width, height);

    instance.set_presenter({
        let presenter = std::cell::RefCell::new(Presenter::new()?);
        move |frame| {
            if let Err(err) = presenter.borrow_mut().draw(frame) {
                tracing::error!(%err, "failed to draw frame");
            }
        }
    });

    instance.mount(widget);

    let mut last_tick = Instant::now();
    while !instance.should_quit() {
        if crossterm::event::poll(POLL_INTERVAL)? {
            let raw = crossterm::event::read()?;
            if let Some(event) = Event::from_crossterm(raw, instance.size()) {
                instance.dispatch(event);
            }
        }
        let elapsed = last_tick.elapsed();
        last_tick = Instant::now();
        instance.advance(elapsed.as_millis() as u64);
    }

    instance.unmount();
    Ok(())
}
