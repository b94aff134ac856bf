//! Dialog modules for the TUI
//!
//! Contains the modal dialogs drawn over the report

pub mod help;
pub mod open_file;
