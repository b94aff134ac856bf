//! Terminal setup and teardown
//!
//! This module handles initializing and restoring the terminal state,
//! including setting up the panic hook to restore the terminal on crash.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::panic;
use std::path::PathBuf;

use tracing::debug;

use crate::config::settings::Settings;
use crate::error::KardexError;

use super::app::{ActiveDialog, App};
use super::event::{Event, EventHandler};
use super::handler::handle_event;

/// Type alias for our terminal
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode
pub fn init_terminal() -> Result<Tui> {
    // Set up panic hook to restore terminal on panic
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;

    Ok(terminal)
}

/// Restore the terminal to its original state
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    Ok(())
}

/// Run the TUI application
///
/// Without a file the open dialog is shown first.
pub fn run_tui(settings: &Settings, file: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(settings);
    match file {
        Some(path) => app.open_file(&path),
        None => app.open_dialog(ActiveDialog::OpenFile),
    }

    let mut terminal = init_terminal()?;
    let result = event_loop(&mut terminal, &mut app);

    // Restore even if the loop failed
    restore_terminal()?;
    debug!("tui closed");

    result
}

fn event_loop(terminal: &mut Tui, app: &mut App) -> Result<()> {
    let events = EventHandler::default();

    while !app.should_quit {
        terminal.draw(|frame| {
            super::views::render(frame, app);
        })?;

        let event = events
            .next()
            .map_err(|e| KardexError::Tui(format!("Failed to read terminal input: {}", e)))?;
        match event {
            Event::Key(key) => handle_event(app, key),
            // Terminal will redraw on the next iteration
            Event::Resize(_, _) | Event::Tick => {}
        }
    }

    Ok(())
}
