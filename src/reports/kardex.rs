//! Kardex Report
//!
//! Ties the pipeline together: filter a dataset, classify the matching rows
//! and total their quantities.

use std::sync::Arc;

use super::filter::{apply_filters, FilterSelection, FilteredView, FILTER_DATE_FORMAT};
use super::totals::{CategoryCounts, Totals};
use crate::display::report::{
    balance_ansi, colorize, double_separator, format_bar, format_code, format_fixed,
    format_optional, separator, truncate,
};
use crate::error::KardexResult;
use crate::loader::Dataset;
use crate::models::{DisplayCategory, Movement, StockFlag};

/// Width of the chart bars in characters
const BAR_WIDTH: usize = 40;

/// Options for rendering a report as text
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    /// Emit ANSI colors
    pub color: bool,
    /// Show every source column instead of the typed summary columns
    pub all_columns: bool,
    /// Decimal places for quantities and totals
    pub decimal_places: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: true,
            all_columns: false,
            decimal_places: 3,
        }
    }
}

/// A filtered, classified and totalled Kardex report
#[derive(Debug, Clone)]
pub struct KardexReport {
    /// Filters that produced this report
    pub selection: FilterSelection,
    /// Matching rows
    pub view: FilteredView,
    /// Aggregate quantities
    pub totals: Totals,
    /// Row counts per display category
    pub counts: CategoryCounts,
}

impl KardexReport {
    /// Generate a report for a selection
    pub fn generate(dataset: &Arc<Dataset>, selection: FilterSelection) -> KardexResult<Self> {
        let view = apply_filters(dataset, &selection)?;
        let totals = Totals::from_view(&view);
        let counts = CategoryCounts::from_view(&view);

        Ok(Self {
            selection,
            view,
            totals,
            counts,
        })
    }

    /// Matching rows with their display category
    pub fn rows(&self) -> impl Iterator<Item = (&Movement, DisplayCategory)> + '_ {
        self.view.iter().map(|m| (m, DisplayCategory::classify(m)))
    }

    /// One-line description of the active filters
    pub fn filter_summary(&self) -> String {
        let s = &self.selection;
        let period = match s.date_range() {
            Some((start, end)) => format!(
                "{} - {}",
                start.format(FILTER_DATE_FORMAT),
                end.format(FILTER_DATE_FORMAT)
            ),
            None => "All".to_string(),
        };
        format!(
            "Operator: {} | Location: {} | Period: {} | Managerial: {} | Fiscal: {}",
            s.operator_code, s.location, period, s.managerial_stock, s.fiscal_stock
        )
    }

    /// Format the report for terminal display
    pub fn format_terminal(&self, options: &RenderOptions) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Kardex Report: store {} / product {}\n",
            self.selection.company_code, self.selection.product_id
        ));
        output.push_str(&self.filter_summary());
        output.push('\n');
        output.push_str(&double_separator(80));
        output.push('\n');

        if self.view.is_empty() {
            output.push_str("No movements match the selected filters.\n");
        } else if options.all_columns {
            self.push_raw_table(&mut output, options);
        } else {
            self.push_summary_table(&mut output, options);
        }

        output.push_str(&format!(
            "\n{} row(s): {} inflow, {} outflow, {} fiscal stock warning, {} neutral\n\n",
            self.view.len(),
            self.counts.inflow,
            self.counts.outflow,
            self.counts.fiscal_warning,
            self.counts.neutral
        ));

        self.push_totals(&mut output, options);
        output.push('\n');
        self.push_chart(&mut output, options);

        output
    }

    fn push_summary_table(&self, output: &mut String, options: &RenderOptions) {
        let places = options.decimal_places;
        let header = format!(
            "{:>6}  {:<10}  {:>8}  {:>8}  {:>8}  {:<5}  {:>12}  {:>12}  {:<10}  {:<3}  {:<3}",
            "Line", "Date", "Store", "Operator", "Product", "Type", "Quantity", "Value",
            "Location", "Mgr", "Fis"
        );
        output.push_str(&header);
        output.push('\n');
        output.push_str(&separator(header.chars().count()));
        output.push('\n');

        for (m, category) in self.rows() {
            let date = m
                .entry_date
                .map(|d| d.format(FILTER_DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string());
            let line = format!(
                "{:>6}  {:<10}  {:>8}  {:>8}  {:>8}  {:<5}  {:>12}  {:>12}  {:<10}  {:<3}  {:<3}",
                m.line,
                date,
                format_code(m.company_code),
                format_code(m.operator_code),
                format_code(m.product_id),
                truncate(&m.movement_type.to_string(), 5),
                format_optional(m.quantity, places),
                format_optional(m.value, 2),
                truncate(&m.location, 10),
                StockFlag::label(m.affects_managerial_stock),
                StockFlag::label(m.affects_fiscal_stock),
            );
            output.push_str(&colorize(&line, category.ansi_prefix(), options.color));
            output.push('\n');
        }
    }

    fn push_raw_table(&self, output: &mut String, options: &RenderOptions) {
        let headers = self.view.dataset().headers();
        output.push_str(&headers.join(" | "));
        output.push('\n');
        output.push_str(&separator(80));
        output.push('\n');

        for (m, category) in self.rows() {
            let line = m.raw.join(" | ");
            output.push_str(&colorize(&line, category.ansi_prefix(), options.color));
            output.push('\n');
        }
    }

    fn push_totals(&self, output: &mut String, options: &RenderOptions) {
        let places = options.decimal_places;
        let balance = format_fixed(self.totals.balance, places);

        output.push_str("Totals\n");
        output.push_str(&format!(
            "  Total Inflows:  {}\n",
            format_fixed(self.totals.total_inflows, places)
        ));
        output.push_str(&format!(
            "  Total Outflows: {}\n",
            format_fixed(self.totals.total_outflows, places)
        ));
        output.push_str(&format!(
            "  Balance:        {}\n",
            colorize(&balance, balance_ansi(self.totals.balance), options.color)
        ));
    }

    fn push_chart(&self, output: &mut String, options: &RenderOptions) {
        let places = options.decimal_places;
        let inflows = self.totals.total_inflows;
        let outflows = self.totals.total_outflows;
        let max = inflows.max(outflows);

        output.push_str("Inflows vs Outflows\n");
        let bars = [
            ("Inflows", inflows, DisplayCategory::Inflow),
            ("Outflows", outflows, DisplayCategory::Outflow),
        ];
        for (label, value, category) in bars {
            let bar = format_bar(value, max, BAR_WIDTH);
            output.push_str(&format!(
                "  {:<9} {} {}\n",
                label,
                colorize(&bar, category.ansi_prefix(), options.color),
                format_fixed(value, places)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::{load_dataset, LoaderOptions};
    use crate::reports::filter::TriState;
    use chrono::NaiveDate;

    const HEADER: &str = "NROEMPRESA;CODGERALOPER;SEQPRODUTO;DTAENTRADASAIDA;QTDLANCTO;VALORVLRNF;LOCAL;TIPLANCTO;GERALTERACAOESTQ;GERALTERACAOESTQFISC";

    fn dataset(rows: &[&str]) -> Arc<Dataset> {
        let data = format!("{}\n{}", HEADER, rows.join("\n"));
        Arc::new(load_dataset(data.as_bytes(), &LoaderOptions::default()).unwrap())
    }

    fn plain() -> RenderOptions {
        RenderOptions {
            color: false,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_generate_totals() {
        let ds = dataset(&[
            "1;1;1;01/01/2024;10;0;A;E;S;S",
            "1;1;1;02/01/2024;4;0;A;S;S;S",
            "1;1;1;03/01/2024;1;0;A;S;S;S",
        ]);
        let report = KardexReport::generate(&ds, FilterSelection::new(1, 1)).unwrap();

        assert_eq!(report.totals.total_inflows, 10.0);
        assert_eq!(report.totals.total_outflows, 5.0);
        assert_eq!(report.totals.balance, 5.0);
        assert_eq!(report.counts.inflow, 1);
        assert_eq!(report.counts.outflow, 2);
    }

    #[test]
    fn test_empty_view_reports_zeroes() {
        let ds = dataset(&["1;1;1;01/01/2024;10;0;A;E;S;S"]);
        let report = KardexReport::generate(&ds, FilterSelection::new(9, 9)).unwrap();

        assert!(report.view.is_empty());
        assert_eq!(report.totals, Totals::default());

        let text = report.format_terminal(&plain());
        assert!(text.contains("No movements match"));
        assert!(text.contains("Balance:        0.000"));
    }

    #[test]
    fn test_invalid_range_produces_no_report() {
        let ds = dataset(&["1;1;1;01/01/2024;10;0;A;E;S;S"]);
        let mut selection = FilterSelection::new(1, 1);
        selection.start_date = NaiveDate::from_ymd_opt(2024, 2, 1);
        selection.end_date = NaiveDate::from_ymd_opt(2024, 1, 1);

        assert!(KardexReport::generate(&ds, selection).is_err());
    }

    #[test]
    fn test_rows_are_classified() {
        let ds = dataset(&[
            "1;1;1;01/01/2024;1;0;A;E;S;N",
            "1;1;1;01/01/2024;1;0;A;X;S;N",
            "1;1;1;01/01/2024;1;0;A;X;S;S",
        ]);
        let report = KardexReport::generate(&ds, FilterSelection::new(1, 1)).unwrap();
        let categories: Vec<DisplayCategory> = report.rows().map(|(_, c)| c).collect();

        assert_eq!(
            categories,
            vec![
                DisplayCategory::Inflow,
                DisplayCategory::FiscalStockWarning,
                DisplayCategory::Neutral
            ]
        );
    }

    #[test]
    fn test_format_terminal_plain() {
        let ds = dataset(&[
            "1;7;1;01/01/2024;12,5;0;A;E;S;S",
            "1;7;1;02/01/2024;2,5;0;A;S;S;S",
        ]);
        let mut selection = FilterSelection::new(1, 1);
        selection.fiscal_stock = TriState::Yes;
        let report = KardexReport::generate(&ds, selection).unwrap();
        let text = report.format_terminal(&plain());

        assert!(text.contains("store 1 / product 1"));
        assert!(text.contains("Fiscal: Yes"));
        assert!(text.contains("Total Inflows:  12.500"));
        assert!(text.contains("Total Outflows: 2.500"));
        assert!(text.contains("Balance:        10.000"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_format_terminal_colors_rows_and_balance() {
        let ds = dataset(&[
            "1;7;1;01/01/2024;1;0;A;E;S;S",
            "1;7;1;02/01/2024;3;0;A;S;S;S",
        ]);
        let report = KardexReport::generate(&ds, FilterSelection::new(1, 1)).unwrap();
        let text = report.format_terminal(&RenderOptions::default());

        assert!(text.contains(DisplayCategory::Inflow.ansi_prefix()));
        assert!(text.contains(DisplayCategory::Outflow.ansi_prefix()));
        assert!(text.contains("\x1b[31m-2.000"));
    }

    #[test]
    fn test_all_columns_shows_raw_cells() {
        let ds = dataset(&["1;7;1;01/01/2024;1;0;DEP-9;E;S;S"]);
        let report = KardexReport::generate(&ds, FilterSelection::new(1, 1)).unwrap();
        let options = RenderOptions {
            all_columns: true,
            ..plain()
        };
        let text = report.format_terminal(&options);

        assert!(text.contains("GERALTERACAOESTQFISC"));
        assert!(text.contains("DEP-9"));
    }
}
