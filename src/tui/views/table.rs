//! Report table view
//!
//! Shows the filtered movements, each row colored by its display category

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::display::report::{format_code, format_optional, truncate};
use crate::models::StockFlag;
use crate::reports::filter::FILTER_DATE_FORMAT;
use crate::reports::KardexReport;
use crate::tui::app::{App, FocusedPanel};

/// Render the report table
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::Table;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let Some(report) = app.report.as_ref() else {
        let message = if app.dataset.is_some() {
            "No report for the current filters."
        } else {
            "No file loaded. Press 'o' to open a Kardex CSV file."
        };
        let block = Block::default()
            .title(" Kardex ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));
        let text = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    };

    let title = format!(
        " Kardex: store {} / product {} ({} rows) ",
        report.selection.company_code,
        report.selection.product_id,
        report.view.len()
    );
    let block = Block::default()
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    if report.view.is_empty() {
        let text = Paragraph::new("No movements match the selected filters.")
            .block(block)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(text, area);
        return;
    }

    let table = if app.show_all_columns {
        raw_table(report)
    } else {
        summary_table(report, app.settings.decimal_places)
    };
    let table = table
        .block(block)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    if is_focused {
        state.select(Some(app.selected_row));
    }

    frame.render_stateful_widget(table, area, &mut state);
}

fn header_row<'a>(titles: impl IntoIterator<Item = String>) -> Row<'a> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    Row::new(titles.into_iter().map(|title| Cell::from(title).style(bold)))
        .style(Style::default().fg(Color::Yellow))
        .height(1)
}

/// Every source column, cells as they appear in the file
fn raw_table(report: &KardexReport) -> Table<'_> {
    let headers = report.view.dataset().headers();
    let widths: Vec<Constraint> = headers
        .iter()
        .map(|h| Constraint::Min(h.chars().count().clamp(4, 20) as u16))
        .collect();

    let rows: Vec<Row> = report
        .rows()
        .map(|(m, category)| {
            // Short rows are padded so every column gets a cell
            let cells = (0..headers.len())
                .map(|i| Cell::from(m.raw.get(i).map(String::as_str).unwrap_or("")));
            Row::new(cells).style(category.style())
        })
        .collect();

    Table::new(rows, widths).header(header_row(headers.iter().cloned()))
}

/// Typed columns with formatted numbers
fn summary_table(report: &KardexReport, places: usize) -> Table<'_> {
    let widths = [
        Constraint::Length(6),  // Line
        Constraint::Length(10), // Date
        Constraint::Length(6),  // Store
        Constraint::Length(8),  // Operator
        Constraint::Length(8),  // Product
        Constraint::Length(5),  // Type
        Constraint::Length(12), // Quantity
        Constraint::Length(12), // Value
        Constraint::Min(8),     // Location
        Constraint::Length(3),  // Managerial
        Constraint::Length(3),  // Fiscal
    ];

    let header = header_row(
        [
            "Line", "Date", "Store", "Operator", "Product", "Type", "Quantity", "Value",
            "Location", "Mgr", "Fis",
        ]
        .map(String::from),
    );

    let rows: Vec<Row> = report
        .rows()
        .map(|(m, category)| {
            let date = m
                .entry_date
                .map(|d| d.format(FILTER_DATE_FORMAT).to_string())
                .unwrap_or_else(|| "-".to_string());

            Row::new(vec![
                Cell::from(m.line.to_string()),
                Cell::from(date),
                Cell::from(format_code(m.company_code)),
                Cell::from(format_code(m.operator_code)),
                Cell::from(format_code(m.product_id)),
                Cell::from(truncate(&m.movement_type.to_string(), 5)),
                Cell::from(format!("{:>12}", format_optional(m.quantity, places))),
                Cell::from(format!("{:>12}", format_optional(m.value, 2))),
                Cell::from(truncate(&m.location, 20)),
                Cell::from(StockFlag::label(m.affects_managerial_stock)),
                Cell::from(StockFlag::label(m.affects_fiscal_stock)),
            ])
            .style(category.style())
        })
        .collect();

    Table::new(rows, widths).header(header)
}
