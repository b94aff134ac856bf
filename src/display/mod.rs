//! Display formatting for terminal output
//!
//! Provides utilities for formatting report values for terminal display,
//! including fixed-decimal numbers, colors, and text bar charts.

pub mod report;

pub use report::{format_bar, format_fixed};
