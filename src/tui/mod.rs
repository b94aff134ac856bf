//! Terminal User Interface module
//!
//! An interactive Kardex viewer built on ratatui: a filter panel, the
//! colored report table, and a totals panel with an inflow/outflow chart.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
