//! Reports module for the Kardex viewer
//!
//! Provides the filter engine, the inflow/outflow aggregation and the
//! Kardex report that combines them.

pub mod filter;
pub mod kardex;
pub mod totals;

pub use filter::{
    apply_filters, parse_filter_date, Choice, FilterOptions, FilterSelection, FilteredView,
    TriState,
};
pub use kardex::{KardexReport, RenderOptions};
pub use totals::{CategoryCounts, Totals};
