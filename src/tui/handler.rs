//! Event handler for the TUI
//!
//! Routes keyboard events to the appropriate handlers based on the
//! current application state.

use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{ActiveDialog, App, FocusedPanel};

/// Rows moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

/// Handle a key press
pub fn handle_event(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit();
        return;
    }

    if app.has_dialog() {
        handle_dialog_key(app, key);
        return;
    }

    // Date fields take their characters before global shortcuts
    if app.focused_panel == FocusedPanel::Filters
        && app.form.focused.is_text()
        && handle_date_key(app, key)
    {
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => {
            app.quit();
            return;
        }
        KeyCode::Char('?') => {
            app.open_dialog(ActiveDialog::Help);
            return;
        }
        KeyCode::Char('o') => {
            app.open_dialog(ActiveDialog::OpenFile);
            return;
        }
        KeyCode::Char('r') => {
            app.reset_filters();
            return;
        }
        KeyCode::Char('c') => {
            app.toggle_columns();
            return;
        }
        KeyCode::Tab | KeyCode::BackTab => {
            leave_field(app);
            app.toggle_panel_focus();
            return;
        }
        _ => {}
    }

    match app.focused_panel {
        FocusedPanel::Filters => handle_filter_key(app, key),
        FocusedPanel::Table => handle_table_key(app, key),
    }
}

/// Handle keys in the filter panel
fn handle_filter_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => {
            leave_field(app);
            app.form.focused = app.form.focused.next();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            leave_field(app);
            app.form.focused = app.form.focused.prev();
        }
        KeyCode::Char('l') | KeyCode::Right | KeyCode::Char(' ') => {
            if app.form.cycle(&app.options, true) {
                app.refresh();
            }
        }
        KeyCode::Char('h') | KeyCode::Left => {
            if app.form.cycle(&app.options, false) {
                app.refresh();
            }
        }
        _ => {}
    }
}

/// Handle editing keys of a date field; returns whether the key was used
fn handle_date_key(app: &mut App, key: KeyEvent) -> bool {
    if key.code == KeyCode::Enter {
        app.refresh();
        return true;
    }

    let Some(input) = app.form.focused_input_mut() else {
        return false;
    };

    match key.code {
        KeyCode::Char(c) if c.is_ascii_digit() || c == '/' => input.insert(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.move_left(),
        KeyCode::Right => input.move_right(),
        KeyCode::Home => input.move_start(),
        KeyCode::End => input.move_end(),
        KeyCode::Esc => {
            input.clear();
            app.refresh();
        }
        _ => return false,
    }
    true
}

/// Apply a typed date when focus leaves its field
fn leave_field(app: &mut App) {
    if app.focused_panel == FocusedPanel::Filters && app.form.focused.is_text() {
        app.refresh();
    }
}

/// Handle keys when the report table is focused
fn handle_table_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('j') | KeyCode::Down => app.move_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.move_up(1),
        KeyCode::PageDown => app.move_down(PAGE_SIZE),
        KeyCode::PageUp => app.move_up(PAGE_SIZE),
        KeyCode::Char('g') | KeyCode::Home => app.selected_row = 0,
        KeyCode::Char('G') | KeyCode::End => app.move_down(usize::MAX / 2),
        _ => {}
    }
}

/// Handle keys when a dialog is active
fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match app.active_dialog {
        ActiveDialog::Help => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                app.close_dialog();
            }
        }
        ActiveDialog::OpenFile => handle_open_file_key(app, key),
        ActiveDialog::None => {}
    }
}

fn handle_open_file_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_dialog(),
        KeyCode::Enter => {
            let path = app.path_input.value().trim().to_string();
            if path.is_empty() {
                app.set_status("Enter the path of a Kardex CSV file");
                return;
            }
            app.close_dialog();
            app.open_file(Path::new(&path));
        }
        KeyCode::Char(c) => app.path_input.insert(c),
        KeyCode::Backspace => app.path_input.backspace(),
        KeyCode::Delete => app.path_input.delete(),
        KeyCode::Left => app.path_input.move_left(),
        KeyCode::Right => app.path_input.move_right(),
        KeyCode::Home => app.path_input.move_start(),
        KeyCode::End => app.path_input.move_end(),
        _ => {}
    }
}
