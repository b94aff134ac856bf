//! Help dialog
//!
//! Lists the keyboard shortcuts

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::models::DisplayCategory;
use crate::tui::layout::centered_rect;

/// Render the help dialog
pub fn render(frame: &mut Frame) {
    let area = centered_rect(60, 80, frame.area());

    // Clear the background
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Help ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(help_lines())
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        section("Global Keys"),
        key_line("q / Ctrl+c", "Quit application"),
        key_line("?", "Show/hide help"),
        key_line("o", "Open a Kardex CSV file"),
        key_line("r", "Reset filters"),
        key_line("c", "Show all source columns / summary"),
        key_line("Tab", "Switch between filters and table"),
        Line::from(""),
        section("Filters"),
        key_line("j/k", "Move between filters"),
        key_line("h/l", "Change the selected value"),
        key_line("0-9 /", "Type a date (dd/mm/yyyy)"),
        key_line("Enter", "Apply the typed date"),
        key_line("Esc", "Clear the date"),
        Line::from(""),
        section("Table"),
        key_line("j/k", "Move selection up/down"),
        key_line("PgUp/PgDn", "Move by a page"),
        key_line("g/G", "Go to top/bottom"),
        Line::from(""),
        section("Row Colors"),
    ];

    for category in [
        DisplayCategory::Inflow,
        DisplayCategory::Outflow,
        DisplayCategory::FiscalStockWarning,
    ] {
        lines.push(Line::from(vec![
            Span::raw(format!("{:>12}", "")),
            Span::raw("  "),
            Span::styled(format!(" {} ", category), category.style()),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "Press Esc to close",
        Style::default().fg(Color::DarkGray),
    )]));

    lines
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .add_modifier(Modifier::BOLD)
            .fg(Color::Yellow),
    )])
}

/// Create a formatted key line
fn key_line(key: &str, description: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{:>12}", key), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(description.to_string(), Style::default().fg(Color::White)),
    ])
}
