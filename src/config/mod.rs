//! Configuration module for the Kardex viewer
//!
//! This module provides configuration management including:
//! - XDG-compliant path resolution
//! - User settings (delimiter, column names, number formatting)

pub mod paths;
pub mod settings;

pub use paths::KardexPaths;
pub use settings::{ColumnNames, Settings};
