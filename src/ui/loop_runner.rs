//! Main event loop for the TUI.
//!
//! Multiplexes terminal input, background fetch results, and a periodic tick.

use crate::app::{App, AppEvent};
use anyhow::{Context, Result};
use crossterm::{
    event::Event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout, Write};
use std::time::Duration;
use tokio::sync::mpsc;

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

use super::events::handle_app_event;
use super::helpers::spawn_fetch;
use super::input::handle_input;
use super::render::render;

/// Number of frames in the loading spinner animation.
pub(super) const SPINNER_FRAMES: usize = 10;

/// Result of handling a key press event.
pub enum Action {
    /// Keep running.
    Continue,
    /// Exit the application and restore the terminal.
    Quit,
}

/// Runs the TUI application event loop.
///
/// `initial` is the startup fetch; it is spawned once the loop owns the
/// channel so its result is never missed.
///
/// Uses `tokio::select!` over:
/// - **Signals**: SIGTERM / SIGINT end the loop (Unix only)
/// - **Terminal input**: crossterm's async event stream
/// - **Background tasks**: fetch results through the `AppEvent` channel
/// - **Periodic tick**: 250ms timer for the spinner and status expiry
///
/// The terminal is restored on every exit path: by `TerminalGuard` on
/// return (including early `?` returns) and by a panic hook that runs before
/// the default hook prints.
pub async fn run(
    app: &mut App,
    initial: Option<crate::feed::FetchRequest>,
    event_tx: mpsc::Sender<AppEvent>,
    mut event_rx: mpsc::Receiver<AppEvent>,
) -> Result<()> {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let mut guard = TerminalGuard::enter().context("Failed to initialize terminal")?;
    let mut event_stream = crossterm::event::EventStream::new();
    let mut tick_interval = tokio::time::interval(Duration::from_millis(250));

    #[cfg(unix)]
    let mut sigterm = signal(SignalKind::terminate())?;
    #[cfg(unix)]
    let mut sigint = signal(SignalKind::interrupt())?;

    if let Some(request) = initial {
        spawn_fetch(app, request, &event_tx);
    }

    loop {
        if app.needs_redraw {
            guard.terminal.draw(|f| render(f, app))?;
            app.needs_redraw = false;
        }

        if app.clear_expired_status() {
            app.needs_redraw = true;
        }

        // Drain finished fetches before blocking on input
        while let Ok(event) = event_rx.try_recv() {
            app.needs_redraw = true;
            handle_app_event(app, event);
        }

        #[cfg(unix)]
        let sigterm_fut = sigterm.recv();
        #[cfg(not(unix))]
        let sigterm_fut = std::future::pending::<Option<()>>();

        #[cfg(unix)]
        let sigint_fut = sigint.recv();
        #[cfg(not(unix))]
        let sigint_fut = std::future::pending::<Option<()>>();

        tokio::select! {
            biased;

            _ = sigterm_fut => {
                tracing::info!("Received SIGTERM, shutting down gracefully");
                break;
            }

            _ = sigint_fut => {
                tracing::info!("Received SIGINT, shutting down gracefully");
                break;
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) => {
                        app.needs_redraw = true;
                        match handle_input(app, key.code, key.modifiers, &event_tx) {
                            Ok(Action::Quit) => break,
                            Ok(Action::Continue) => {}
                            Err(e) => app.set_error_status(format!("Error: {e}")),
                        }
                    }
                    Some(Ok(Event::Resize(_, _))) => app.needs_redraw = true,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => tracing::warn!(error = %e, "Terminal event error"),
                    None => {
                        tracing::info!("Terminal event stream closed");
                        break;
                    }
                }
            }

            Some(event) = event_rx.recv() => {
                app.needs_redraw = true;
                handle_app_event(app, event);
            }

            _ = tick_interval.tick() => {
                handle_tick(app);
            }
        }
    }

    drop(guard);
    Ok(())
}

/// Advance the spinner while a fetch is in flight.
fn handle_tick(app: &mut App) {
    if app.feed.is_loading() {
        app.spinner_frame = (app.spinner_frame + 1) % SPINNER_FRAMES;
        app.needs_redraw = true;
    }
}

/// Raw mode plus the alternate screen, undone when dropped.
struct TerminalGuard<W: Write> {
    terminal: Terminal<CrosstermBackend<W>>,
}

impl TerminalGuard<Stdout> {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        let entered = execute!(io::stdout(), EnterAlternateScreen)
            .and_then(|()| Terminal::new(CrosstermBackend::new(io::stdout())));
        match entered {
            Ok(terminal) => Ok(Self { terminal }),
            Err(e) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                Err(e.into())
            }
        }
    }
}

impl<W: Write> Drop for TerminalGuard<W> {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "Failed to disable raw mode");
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            tracing::warn!(error = %e, "Failed to leave alternate screen");
        }
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::loaded_app;
    use ratatui::{layout::Rect, TerminalOptions, Viewport};

    #[tokio::test]
    async fn test_tick_spins_only_while_loading() {
        let mut app = loaded_app(2);
        app.needs_redraw = false;
        handle_tick(&mut app);
        assert_eq!(app.spinner_frame, 0);
        assert!(!app.needs_redraw);

        let _request = app.feed.refresh();
        for _ in 0..SPINNER_FRAMES + 1 {
            handle_tick(&mut app);
        }
        assert_eq!(app.spinner_frame, 1);
        assert!(app.needs_redraw);
    }

    fn draw_fails<W: Write>(_guard: &mut TerminalGuard<W>) -> Result<()> {
        anyhow::bail!("draw failed")
    }

    #[test]
    fn test_guard_restores_terminal_on_error_return() {
        let mut out = Vec::new();
        {
            let backend = CrosstermBackend::new(&mut out);
            let terminal = Terminal::with_options(
                backend,
                TerminalOptions {
                    viewport: Viewport::Fixed(Rect::new(0, 0, 20, 5)),
                },
            )
            .unwrap();
            let mut guard = TerminalGuard { terminal };
            assert!(draw_fails(&mut guard).is_err());
        }
        let written = String::from_utf8_lossy(&out);
        // LeaveAlternateScreen, then show cursor
        assert!(written.contains("\x1b[?1049l"), "{written:?}");
        assert!(written.contains("\x1b[?25h"), "{written:?}");
    }
}
