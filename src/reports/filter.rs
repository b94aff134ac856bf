//! Kardex filter engine
//!
//! A [`FilterSelection`] is an immutable description of every filter control.
//! Applying it to a dataset yields a [`FilteredView`] of the rows that pass
//! all active filters; the dataset itself is never touched.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{KardexError, KardexResult};
use crate::loader::Dataset;
use crate::models::{Movement, StockFlag};

/// Date format for user-entered filter dates
pub const FILTER_DATE_FORMAT: &str = "%d/%m/%Y";

/// A selection that can be left open with "All"
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Choice<T> {
    /// No constraint
    #[default]
    All,
    /// Exactly this value
    Only(T),
}

impl<T: PartialEq> Choice<T> {
    /// Whether a value passes this choice
    pub fn accepts(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Choice<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Only(v),
            None => Self::All,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "All"),
            Self::Only(v) => write!(f, "{}", v),
        }
    }
}

/// Stock-impact filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriState {
    /// Do not filter on this flag
    #[default]
    Indifferent,
    /// Keep rows flagged `S`
    Yes,
    /// Keep rows flagged `N`
    No,
}

impl TriState {
    /// Whether a row's flag passes this filter
    pub fn accepts(&self, flag: Option<StockFlag>) -> bool {
        match self {
            Self::Indifferent => true,
            Self::Yes => flag == Some(StockFlag::Yes),
            Self::No => flag == Some(StockFlag::No),
        }
    }

    /// Next value in the Indifferent → Yes → No cycle
    pub fn next(&self) -> Self {
        match self {
            Self::Indifferent => Self::Yes,
            Self::Yes => Self::No,
            Self::No => Self::Indifferent,
        }
    }

    /// Previous value in the cycle
    pub fn prev(&self) -> Self {
        match self {
            Self::Indifferent => Self::No,
            Self::Yes => Self::Indifferent,
            Self::No => Self::Yes,
        }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indifferent => write!(f, "Indifferent"),
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
        }
    }
}

impl FromStr for TriState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indifferent" | "any" | "i" => Ok(Self::Indifferent),
            "yes" | "y" | "s" => Ok(Self::Yes),
            "no" | "n" => Ok(Self::No),
            other => Err(format!(
                "invalid value '{}': expected yes, no or indifferent",
                other
            )),
        }
    }
}

/// Every filter control of the report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSelection {
    /// Store to report on (always active)
    pub company_code: i64,
    /// Operator code
    pub operator_code: Choice<i64>,
    /// Product to report on (always active)
    pub product_id: i64,
    /// Storage location
    pub location: Choice<String>,
    /// Start of the date range (inclusive)
    pub start_date: Option<NaiveDate>,
    /// End of the date range (inclusive)
    pub end_date: Option<NaiveDate>,
    /// Managerial stock flag
    pub managerial_stock: TriState,
    /// Fiscal stock flag
    pub fiscal_stock: TriState,
}

impl FilterSelection {
    /// Selection for one store and product with every other filter neutral
    pub fn new(company_code: i64, product_id: i64) -> Self {
        Self {
            company_code,
            operator_code: Choice::All,
            product_id,
            location: Choice::All,
            start_date: None,
            end_date: None,
            managerial_stock: TriState::Indifferent,
            fiscal_stock: TriState::Indifferent,
        }
    }

    /// Default selection for a dataset: its first store and first product
    pub fn for_options(options: &FilterOptions) -> Option<Self> {
        let company = options.companies.first()?;
        let product = options.products.first()?;
        Some(Self::new(*company, *product))
    }

    /// The active date range, if both bounds are set
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }

    /// Reject selections that cannot be applied
    pub fn validate(&self) -> KardexResult<()> {
        if let Some((start, end)) = self.date_range() {
            if start > end {
                return Err(KardexError::Validation(format!(
                    "Start date {} is after end date {}",
                    start.format(FILTER_DATE_FORMAT),
                    end.format(FILTER_DATE_FORMAT)
                )));
            }
        }
        Ok(())
    }

    /// Check if a movement passes every active filter
    pub fn matches(&self, movement: &Movement) -> bool {
        if movement.company_code != Some(self.company_code) {
            return false;
        }

        if let Choice::Only(code) = self.operator_code {
            if movement.operator_code != Some(code) {
                return false;
            }
        }

        if movement.product_id != Some(self.product_id) {
            return false;
        }

        if !self.location.accepts(&movement.location) {
            return false;
        }

        if let Some((start, end)) = self.date_range() {
            match movement.entry_day() {
                Some(day) if day >= start && day <= end => {}
                _ => return false,
            }
        }

        self.managerial_stock.accepts(movement.affects_managerial_stock)
            && self.fiscal_stock.accepts(movement.affects_fiscal_stock)
    }
}

/// Rows of a dataset that passed a filter selection
#[derive(Debug, Clone)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    rows: Vec<usize>,
}

impl FilteredView {
    /// The dataset this view is over
    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    /// Number of matching rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Matching movements in source order
    pub fn iter(&self) -> impl Iterator<Item = &Movement> + '_ {
        let movements = self.dataset.movements();
        self.rows.iter().map(move |&idx| &movements[idx])
    }

    /// Matching movement at a view position
    pub fn get(&self, position: usize) -> Option<&Movement> {
        self.rows
            .get(position)
            .and_then(|&idx| self.dataset.movements().get(idx))
    }

    /// Source line numbers of the matching rows
    pub fn lines(&self) -> Vec<usize> {
        self.iter().map(|m| m.line).collect()
    }
}

/// Apply a selection to a dataset
///
/// The selection is validated before any row is examined.
pub fn apply_filters(
    dataset: &Arc<Dataset>,
    selection: &FilterSelection,
) -> KardexResult<FilteredView> {
    selection.validate()?;

    let rows: Vec<usize> = dataset
        .movements()
        .iter()
        .enumerate()
        .filter(|(_, m)| selection.matches(m))
        .map(|(idx, _)| idx)
        .collect();

    debug!(
        matched = rows.len(),
        total = dataset.len(),
        company = selection.company_code,
        product = selection.product_id,
        "applied kardex filters"
    );

    Ok(FilteredView {
        dataset: Arc::clone(dataset),
        rows,
    })
}

/// Values offered by the selection controls
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    /// Distinct store codes, ascending
    pub companies: Vec<i64>,
    /// Distinct product ids, ascending
    pub products: Vec<i64>,
    /// Distinct operator codes, ascending
    pub operators: Vec<i64>,
    /// Distinct locations, ascending
    pub locations: Vec<String>,
}

impl FilterOptions {
    /// Collect the selectable values of a dataset, ignoring missing cells
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut companies = BTreeSet::new();
        let mut products = BTreeSet::new();
        let mut operators = BTreeSet::new();
        let mut locations = BTreeSet::new();

        for m in dataset.movements() {
            companies.extend(m.company_code);
            products.extend(m.product_id);
            operators.extend(m.operator_code);
            if !m.location.is_empty() {
                locations.insert(m.location.clone());
            }
        }

        Self {
            companies: companies.into_iter().collect(),
            products: products.into_iter().collect(),
            operators: operators.into_iter().collect(),
            locations: locations.into_iter().collect(),
        }
    }
}

/// Parse a user-entered `dd/mm/yyyy` date; blank input means "not set"
pub fn parse_filter_date(text: &str) -> KardexResult<Option<NaiveDate>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(text, FILTER_DATE_FORMAT)
        .map(Some)
        .map_err(|_| KardexError::InvalidDate(text.to_string()))
}
