//! Kardex - terminal viewer for inventory movement reports
//!
//! Loads a semicolon-delimited Kardex export (one row per stock movement),
//! filters it by store, product, operator, location, period and
//! stock-impact flags, colors each row by movement type and totals inflows
//! against outflows.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Movement record and display category
//! - `loader`: CSV parsing and the content-keyed dataset cache
//! - `reports`: Filter engine, totals and the Kardex report
//! - `display`: Terminal formatting helpers
//! - `logging`: Diagnostic logging to stderr
//! - `cli`: Command handlers
//! - `tui`: Interactive terminal interface
//!
//! # Example
//!
//! ```rust,ignore
//! use kardex::loader::DatasetCache;
//! use kardex::reports::{FilterSelection, KardexReport};
//!
//! let mut cache = DatasetCache::default();
//! let dataset = cache.load_path("kardex.csv".as_ref())?;
//! let report = KardexReport::generate(&dataset, FilterSelection::new(1, 5001))?;
//! println!("{}", report.totals.balance);
//! ```

pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod loader;
pub mod logging;
pub mod models;
pub mod reports;
pub mod tui;

pub use error::KardexError;
