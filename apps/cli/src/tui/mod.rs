//! Ratatui-based terminal UI for the HiLi account client.
//!
//! One screen per account route (landing, login, register, find-id,
//! password reset, profile), switched by the same paths the web app uses.

mod actions;
mod app;
mod event;
mod pages;
pub mod theme;
mod ui;

pub use app::App;
pub use theme::ThemeMode;

use crate::commands::Context;
use anyhow::Result;
use crossterm::{
    cursor::Show,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::time::{Duration, Instant};
use std::{io, panic};

/// Restore terminal to normal state.
/// This is called both on normal exit and on panic.
/// Ignores errors to be safe when terminal is already restored or partially setup.
fn restore_terminal() {
    // Try each restoration step independently - don't let one failure prevent others
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture, Show);
}

/// Install a panic hook that restores the terminal before displaying the
/// panic message, so panic output doesn't corrupt the display.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        original_hook(panic_info);
    }));
}

/// Run the TUI application with the specified theme mode.
pub async fn run(theme_mode: ThemeMode, ctx: Context) -> Result<()> {
    // Install panic hook BEFORE terminal setup to ensure cleanup on panic
    install_panic_hook();

    // Run the TUI and capture result (don't propagate errors yet)
    let result = run_with_terminal(theme_mode, ctx).await;

    // ALWAYS restore terminal, even if setup or run failed partway through.
    restore_terminal();

    result
}

/// Inner function that sets up the terminal and runs the app.
/// Separated so that `run()` can guarantee cleanup via restore_terminal().
async fn run_with_terminal(theme_mode: ThemeMode, ctx: Context) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(theme_mode, ctx);
    run_app(&mut terminal, &mut app).await
}

/// Main application loop.
async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        // Advance spinner animation while anything is in flight
        if app.animating() {
            app.advance_spinner();
        }

        // Apply any background session results (stale ones are dropped)
        while let Ok((generation, event)) = app.event_rx.try_recv() {
            app.handle_session_event(generation, event);
        }

        // One-second tick drives the email re-send cooldown
        if last_tick.elapsed() >= Duration::from_secs(1) {
            app.on_tick();
            last_tick = Instant::now();
        }

        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events
        if event::handle_events(app).await? {
            break;
        }
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
