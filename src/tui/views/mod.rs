//! TUI Views module
//!
//! Contains the filter panel, the report table, the totals panel and the
//! status bar.

pub mod filters;
pub mod status_bar;
pub mod table;
pub mod totals;

use ratatui::Frame;

use super::app::{ActiveDialog, App};
use super::dialogs;
use super::layout::AppLayout;

/// Render the entire application
pub fn render(frame: &mut Frame, app: &mut App) {
    let layout = AppLayout::new(frame.area());

    filters::render(frame, app, layout.filters);
    table::render(frame, app, layout.table);
    totals::render(frame, app, layout.totals);
    status_bar::render(frame, app, layout.status_bar);

    if app.has_dialog() {
        render_dialog(frame, app);
    }
}

/// Render active dialog
fn render_dialog(frame: &mut Frame, app: &mut App) {
    match app.active_dialog {
        ActiveDialog::Help => dialogs::help::render(frame),
        ActiveDialog::OpenFile => dialogs::open_file::render(frame, app),
        ActiveDialog::None => {}
    }
}
