//! Inflow/outflow totals of a filtered view

use super::filter::FilteredView;
use crate::models::{DisplayCategory, Movement};

/// Aggregate quantities of a report
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    /// Sum of quantities of entry rows
    pub total_inflows: f64,
    /// Sum of quantities of exit rows
    pub total_outflows: f64,
    /// Inflows minus outflows
    pub balance: f64,
}

impl Totals {
    /// Sum a set of movements; missing quantities count as zero
    pub fn from_movements<'a>(movements: impl IntoIterator<Item = &'a Movement>) -> Self {
        let mut total_inflows = 0.0;
        let mut total_outflows = 0.0;

        for m in movements {
            if m.is_entry() {
                total_inflows += m.quantity_or_zero();
            } else if m.is_exit() {
                total_outflows += m.quantity_or_zero();
            }
        }

        Self {
            total_inflows,
            total_outflows,
            balance: total_inflows - total_outflows,
        }
    }

    /// Totals of a filtered view
    pub fn from_view(view: &FilteredView) -> Self {
        Self::from_movements(view.iter())
    }
}

/// Row counts per display category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub inflow: usize,
    pub outflow: usize,
    pub fiscal_warning: usize,
    pub neutral: usize,
}

impl CategoryCounts {
    /// Count the categories of a filtered view
    pub fn from_view(view: &FilteredView) -> Self {
        let mut counts = Self::default();
        for m in view.iter() {
            match DisplayCategory::classify(m) {
                DisplayCategory::Inflow => counts.inflow += 1,
                DisplayCategory::Outflow => counts.outflow += 1,
                DisplayCategory::FiscalStockWarning => counts.fiscal_warning += 1,
                DisplayCategory::Neutral => counts.neutral += 1,
            }
        }
        counts
    }
}
