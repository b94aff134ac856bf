//! Application state for the TUI
//!
//! The App struct holds all state needed for rendering and handling events.
//! Every filter change rebuilds the report from the immutable dataset; a
//! change that fails leaves the last good report on screen.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Settings;
use crate::error::{KardexError, KardexResult};
use crate::loader::{Dataset, DatasetCache, LoaderOptions};
use crate::reports::{
    parse_filter_date, Choice, FilterOptions, FilterSelection, KardexReport, TriState,
};

use super::widgets::TextInput;

/// Filter controls in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Company,
    Operator,
    Product,
    Location,
    StartDate,
    EndDate,
    Managerial,
    Fiscal,
}

impl FilterField {
    /// All fields in display order
    pub const ALL: [FilterField; 8] = [
        Self::Company,
        Self::Operator,
        Self::Product,
        Self::Location,
        Self::StartDate,
        Self::EndDate,
        Self::Managerial,
        Self::Fiscal,
    ];

    fn position(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    /// Next field, wrapping around
    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    /// Previous field, wrapping around
    pub fn prev(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Label shown in the filter panel
    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Store",
            Self::Operator => "Operator",
            Self::Product => "Product",
            Self::Location => "Location",
            Self::StartDate => "Start date",
            Self::EndDate => "End date",
            Self::Managerial => "Managerial stock",
            Self::Fiscal => "Fiscal stock",
        }
    }

    /// Whether the field is typed into rather than cycled
    pub fn is_text(self) -> bool {
        matches!(self, Self::StartDate | Self::EndDate)
    }
}

/// Which panel currently has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusedPanel {
    #[default]
    Filters,
    Table,
}

/// Currently active dialog (if any)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    OpenFile,
    Help,
}

/// Severity of a status line message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Message shown in the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
}

/// State of the filter panel
#[derive(Debug, Clone)]
pub struct FilterForm {
    /// Field with keyboard focus
    pub focused: FilterField,
    /// Index into the store options
    pub company_index: usize,
    /// Index into the product options
    pub product_index: usize,
    /// 0 is "All", otherwise index + 1 into the operator options
    pub operator_index: usize,
    /// 0 is "All", otherwise index + 1 into the location options
    pub location_index: usize,
    /// Period start (dd/mm/yyyy)
    pub start_input: TextInput,
    /// Period end (dd/mm/yyyy)
    pub end_input: TextInput,
    /// Managerial stock flag
    pub managerial: TriState,
    /// Fiscal stock flag
    pub fiscal: TriState,
}

impl Default for FilterForm {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterForm {
    /// A form with the first store and product selected and nothing else
    pub fn new() -> Self {
        Self {
            focused: FilterField::default(),
            company_index: 0,
            product_index: 0,
            operator_index: 0,
            location_index: 0,
            start_input: TextInput::new().placeholder("dd/mm/yyyy"),
            end_input: TextInput::new().placeholder("dd/mm/yyyy"),
            managerial: TriState::Indifferent,
            fiscal: TriState::Indifferent,
        }
    }

    /// Cycle the value of the focused select field
    ///
    /// Returns whether anything changed.
    pub fn cycle(&mut self, options: &FilterOptions, forward: bool) -> bool {
        match self.focused {
            FilterField::Company => {
                let before = self.company_index;
                self.company_index = cycle_index(before, options.companies.len(), forward);
                before != self.company_index
            }
            FilterField::Product => {
                let before = self.product_index;
                self.product_index = cycle_index(before, options.products.len(), forward);
                before != self.product_index
            }
            FilterField::Operator => {
                let before = self.operator_index;
                self.operator_index = cycle_index(before, options.operators.len() + 1, forward);
                before != self.operator_index
            }
            FilterField::Location => {
                let before = self.location_index;
                self.location_index = cycle_index(before, options.locations.len() + 1, forward);
                before != self.location_index
            }
            FilterField::Managerial => {
                self.managerial = if forward {
                    self.managerial.next()
                } else {
                    self.managerial.prev()
                };
                true
            }
            FilterField::Fiscal => {
                self.fiscal = if forward {
                    self.fiscal.next()
                } else {
                    self.fiscal.prev()
                };
                true
            }
            FilterField::StartDate | FilterField::EndDate => false,
        }
    }

    /// The text input of the focused field, if it is a date field
    pub fn focused_input_mut(&mut self) -> Option<&mut TextInput> {
        match self.focused {
            FilterField::StartDate => Some(&mut self.start_input),
            FilterField::EndDate => Some(&mut self.end_input),
            _ => None,
        }
    }

    /// Current value of a field as displayed in the panel
    pub fn value_label(&self, field: FilterField, options: &FilterOptions) -> String {
        let or_dash = |v: Option<String>| v.unwrap_or_else(|| "-".to_string());
        match field {
            FilterField::Company => {
                or_dash(options.companies.get(self.company_index).map(|c| c.to_string()))
            }
            FilterField::Product => {
                or_dash(options.products.get(self.product_index).map(|p| p.to_string()))
            }
            FilterField::Operator => self.operator(options).to_string(),
            FilterField::Location => self.location(options).to_string(),
            FilterField::StartDate => self.start_input.value().to_string(),
            FilterField::EndDate => self.end_input.value().to_string(),
            FilterField::Managerial => self.managerial.to_string(),
            FilterField::Fiscal => self.fiscal.to_string(),
        }
    }

    fn operator(&self, options: &FilterOptions) -> Choice<i64> {
        match self.operator_index {
            0 => Choice::All,
            i => Choice::from(options.operators.get(i - 1).copied()),
        }
    }

    fn location(&self, options: &FilterOptions) -> Choice<String> {
        match self.location_index {
            0 => Choice::All,
            i => Choice::from(options.locations.get(i - 1).cloned()),
        }
    }

    /// Build the filter selection from the form
    pub fn selection(&self, options: &FilterOptions) -> KardexResult<FilterSelection> {
        let company_code = *options
            .companies
            .get(self.company_index)
            .ok_or_else(|| KardexError::Validation("The file has no store codes".into()))?;
        let product_id = *options
            .products
            .get(self.product_index)
            .ok_or_else(|| KardexError::Validation("The file has no product ids".into()))?;

        let selection = FilterSelection {
            company_code,
            operator_code: self.operator(options),
            product_id,
            location: self.location(options),
            start_date: parse_filter_date(self.start_input.value())?,
            end_date: parse_filter_date(self.end_input.value())?,
            managerial_stock: self.managerial,
            fiscal_stock: self.fiscal,
        };
        selection.validate()?;
        Ok(selection)
    }
}

fn cycle_index(index: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        0
    } else if forward {
        (index + 1) % len
    } else {
        (index + len - 1) % len
    }
}

/// Main application state
pub struct App<'a> {
    /// Application settings
    pub settings: &'a Settings,

    /// Parsed datasets keyed by file content
    pub cache: DatasetCache,

    /// Path of the loaded file
    pub source: Option<PathBuf>,

    /// Loaded dataset
    pub dataset: Option<Arc<Dataset>>,

    /// Values offered by the select fields
    pub options: FilterOptions,

    /// Filter panel state
    pub form: FilterForm,

    /// Last successfully generated report
    pub report: Option<KardexReport>,

    /// Which panel is focused
    pub focused_panel: FocusedPanel,

    /// Currently active dialog
    pub active_dialog: ActiveDialog,

    /// Path typed in the open-file dialog
    pub path_input: TextInput,

    /// Selected row in the report table
    pub selected_row: usize,

    /// Show every source column instead of the typed summary
    pub show_all_columns: bool,

    /// Status message to display
    pub status: Option<StatusMessage>,

    /// Whether the app should quit
    pub should_quit: bool,
}

impl<'a> App<'a> {
    /// Create a new App instance
    pub fn new(settings: &'a Settings) -> Self {
        Self {
            settings,
            cache: DatasetCache::new(LoaderOptions::from(settings)),
            source: None,
            dataset: None,
            options: FilterOptions::default(),
            form: FilterForm::new(),
            report: None,
            focused_panel: FocusedPanel::default(),
            active_dialog: ActiveDialog::default(),
            path_input: TextInput::new().label("Path").placeholder("kardex.csv"),
            selected_row: 0,
            show_all_columns: false,
            status: None,
            should_quit: false,
        }
    }

    /// Request to quit the application
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Set an informational status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: message.into(),
            kind: StatusKind::Info,
        });
    }

    /// Report an error in the status bar
    pub fn set_error(&mut self, error: &KardexError) {
        self.status = Some(StatusMessage {
            text: error.to_string(),
            kind: StatusKind::Error,
        });
    }

    /// Clear the status message
    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Load a file, reusing the cached dataset when the content is unchanged
    ///
    /// On failure the previously loaded dataset and report stay in place.
    pub fn open_file(&mut self, path: &Path) {
        let dataset = match self.cache.load_path(path) {
            Ok(dataset) => dataset,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open kardex file");
                self.set_error(&e);
                return;
            }
        };

        self.source = Some(path.to_path_buf());

        let unchanged = self
            .dataset
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &dataset));
        if unchanged {
            self.set_status("File content unchanged; using cached data");
            return;
        }

        info!(path = %path.display(), rows = dataset.len(), "opened kardex file");
        self.options = FilterOptions::from_dataset(&dataset);
        self.dataset = Some(dataset);
        self.form = FilterForm::new();
        self.report = None;
        self.selected_row = 0;

        if self.refresh() {
            let (rows, recovered) = self
                .dataset
                .as_ref()
                .map(|d| (d.len(), d.stats().recovered_cells()))
                .unwrap_or_default();
            let mut message = format!("Loaded {} row(s) from {}", rows, path.display());
            if recovered > 0 {
                message.push_str(&format!(" ({} unreadable cell(s) left blank)", recovered));
            }
            self.set_status(message);
        }
    }

    /// Rebuild the report from the current filters
    ///
    /// Returns false (and shows the error) if the filters cannot be applied;
    /// the previous report is kept in that case.
    pub fn refresh(&mut self) -> bool {
        let Some(dataset) = self.dataset.as_ref().map(Arc::clone) else {
            return false;
        };

        let result = self
            .form
            .selection(&self.options)
            .and_then(|selection| KardexReport::generate(&dataset, selection));

        match result {
            Ok(report) => {
                self.selected_row = self.selected_row.min(report.view.len().saturating_sub(1));
                self.report = Some(report);
                if matches!(self.status, Some(StatusMessage { kind: StatusKind::Error, .. })) {
                    self.clear_status();
                }
                true
            }
            Err(e) => {
                if !e.is_input_error() {
                    warn!(error = %e, "report refresh failed");
                }
                self.set_error(&e);
                false
            }
        }
    }

    /// Put every filter back to its default
    pub fn reset_filters(&mut self) {
        let focused = self.form.focused;
        self.form = FilterForm::new();
        self.form.focused = focused;
        if self.refresh() {
            self.set_status("Filters reset");
        }
    }

    /// Switch the table between the typed summary and every source column
    pub fn toggle_columns(&mut self) {
        self.show_all_columns = !self.show_all_columns;
    }

    /// Number of rows in the current report
    pub fn row_count(&self) -> usize {
        self.report.as_ref().map(|r| r.view.len()).unwrap_or(0)
    }

    /// Toggle focus between the filter panel and the table
    pub fn toggle_panel_focus(&mut self) {
        self.focused_panel = match self.focused_panel {
            FocusedPanel::Filters => FocusedPanel::Table,
            FocusedPanel::Table => FocusedPanel::Filters,
        };
    }

    /// Move the table selection up
    pub fn move_up(&mut self, step: usize) {
        self.selected_row = self.selected_row.saturating_sub(step);
    }

    /// Move the table selection down
    pub fn move_down(&mut self, step: usize) {
        let max = self.row_count().saturating_sub(1);
        self.selected_row = (self.selected_row + step).min(max);
    }

    /// Open a dialog
    pub fn open_dialog(&mut self, dialog: ActiveDialog) {
        if dialog == ActiveDialog::OpenFile {
            let current = self
                .source
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            self.path_input.set_value(current);
            self.path_input.focused = true;
        }
        self.active_dialog = dialog;
    }

    /// Close the current dialog
    pub fn close_dialog(&mut self) {
        self.active_dialog = ActiveDialog::None;
        self.path_input.focused = false;
    }

    /// Check if a dialog is active
    pub fn has_dialog(&self) -> bool {
        self.active_dialog != ActiveDialog::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const DATA: &str = "NROEMPRESA;CODGERALOPER;SEQPRODUTO;DTAENTRADASAIDA;QTDLANCTO;VALORVLRNF;LOCAL;TIPLANCTO;GERALTERACAOESTQ;GERALTERACAOESTQFISC
1;10;100;01/01/2024;10;1;A;E;S;S
1;10;100;02/01/2024;4;1;A;S;S;S
1;20;100;03/01/2024;1;1;B;S;S;N
2;10;300;03/01/2024;1;1;B;E;S;S";

    fn write(dir: &TempDir, name: &str, data: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_open_file_builds_default_report() {
        let settings = Settings::default();
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&settings);

        app.open_file(&write(&dir, "k.csv", DATA));

        let report = app.report.as_ref().unwrap();
        assert_eq!(report.selection, FilterSelection::new(1, 100));
        assert_eq!(report.view.len(), 3);
        assert_eq!(report.totals.balance, 5.0);
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Info);
    }

    #[test]
    fn test_reopening_same_content_uses_cache() {
        let settings = Settings::default();
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&settings);

        app.open_file(&write(&dir, "a.csv", DATA));
        app.form.fiscal = TriState::Yes;
        assert!(app.refresh());
        app.open_file(&write(&dir, "b.csv", DATA));

        assert_eq!(app.cache.parse_count(), 1);
        // filters survive because the data did not change
        assert_eq!(app.form.fiscal, TriState::Yes);
    }

    #[test]
    fn test_failed_open_keeps_previous_report() {
        let settings = Settings::default();
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&settings);

        app.open_file(&write(&dir, "k.csv", DATA));
        app.open_file(&write(&dir, "bad.csv", "A;B\n1;2"));

        assert!(app.report.is_some());
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
        assert!(app.source.as_ref().unwrap().ends_with("k.csv"));
    }

    #[test]
    fn test_invalid_filters_keep_previous_view() {
        let settings = Settings::default();
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&settings);
        app.open_file(&write(&dir, "k.csv", DATA));
        let before = app.report.as_ref().unwrap().view.lines();

        app.form.start_input.set_value("31/01/2024");
        app.form.end_input.set_value("01/01/2024");
        assert!(!app.refresh());
        assert_eq!(app.report.as_ref().unwrap().view.lines(), before);

        app.form.end_input.set_value("not a date");
        assert!(!app.refresh());
        assert_eq!(app.report.as_ref().unwrap().view.lines(), before);
        assert!(app.status.as_ref().unwrap().text.contains("not a date"));
    }

    #[test]
    fn test_cycle_select_fields() {
        let settings = Settings::default();
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&settings);
        app.open_file(&write(&dir, "k.csv", DATA));

        app.form.focused = FilterField::Operator;
        assert!(app.form.cycle(&app.options, true));
        assert_eq!(app.form.value_label(FilterField::Operator, &app.options), "10");
        assert!(app.refresh());
        assert_eq!(app.row_count(), 2);

        app.form.cycle(&app.options, false);
        assert_eq!(app.form.value_label(FilterField::Operator, &app.options), "All");

        app.form.focused = FilterField::Company;
        app.form.cycle(&app.options, true);
        assert!(app.refresh());
        // store 2 has no product 100
        assert_eq!(app.row_count(), 0);
        assert_eq!(app.report.as_ref().unwrap().totals.balance, 0.0);
    }

    #[test]
    fn test_field_order_wraps() {
        assert_eq!(FilterField::Fiscal.next(), FilterField::Company);
        assert_eq!(FilterField::Company.prev(), FilterField::Fiscal);
        assert!(FilterField::StartDate.is_text());
        assert!(!FilterField::Location.is_text());
    }

    #[test]
    fn test_table_navigation_is_bounded() {
        let settings = Settings::default();
        let dir = TempDir::new().unwrap();
        let mut app = App::new(&settings);
        app.open_file(&write(&dir, "k.csv", DATA));

        app.move_down(10);
        assert_eq!(app.selected_row, 2);
        app.move_up(10);
        assert_eq!(app.selected_row, 0);
    }
}
