//! Totals panel
//!
//! Total inflows, total outflows and the balance, next to a two-bar chart
//! comparing inflows with outflows.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};

use crate::display::report::format_fixed;
use crate::models::DisplayCategory;
use crate::reports::Totals;
use crate::tui::app::App;
use crate::tui::layout::totals_split;

/// Bar heights are quantities scaled to integers at this precision
const BAR_SCALE: f64 = 1000.0;

/// Render the totals panel
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let (figures_area, chart_area) = totals_split(area);
    let places = app.settings.decimal_places;
    let totals = app.report.as_ref().map(|r| r.totals).unwrap_or_default();

    render_figures(frame, app, &totals, places, figures_area);
    render_chart(frame, &totals, places, chart_area);
}

fn render_figures(frame: &mut Frame, app: &App, totals: &Totals, places: usize, area: Rect) {
    let block = Block::default()
        .title(" Totals ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let balance_color = if totals.balance < 0.0 {
        Color::Red
    } else {
        Color::Blue
    };

    let mut lines = vec![
        figure_line(
            "Total Inflows",
            format_fixed(totals.total_inflows, places),
            Style::default(),
        ),
        figure_line(
            "Total Outflows",
            format_fixed(totals.total_outflows, places),
            Style::default(),
        ),
        figure_line(
            "Balance",
            format_fixed(totals.balance, places),
            Style::default()
                .fg(balance_color)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
    ];

    if let Some(report) = &app.report {
        let counts = report.counts;
        lines.push(Line::from(vec![
            Span::styled(format!(" {} in ", counts.inflow), DisplayCategory::Inflow.style()),
            Span::raw(" "),
            Span::styled(format!(" {} out ", counts.outflow), DisplayCategory::Outflow.style()),
            Span::raw(" "),
            Span::styled(
                format!(" {} fiscal ", counts.fiscal_warning),
                DisplayCategory::FiscalStockWarning.style(),
            ),
        ]));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn figure_line(label: &str, value: String, style: Style) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!(" {:<15}", label), Style::default().fg(Color::White)),
        Span::styled(format!("{:>13}", value), style),
    ])
}

fn render_chart(frame: &mut Frame, totals: &Totals, places: usize, area: Rect) {
    let block = Block::default()
        .title(" Inflows vs Outflows ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let bars = [
        chart_bar("Inflows", totals.total_inflows, places, Color::Blue),
        chart_bar("Outflows", totals.total_outflows, places, Color::Yellow),
    ];

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(14)
        .bar_gap(4)
        .value_style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(Color::White));

    frame.render_widget(chart, area);
}

fn chart_bar(label: &'static str, value: f64, places: usize, color: Color) -> Bar<'static> {
    Bar::default()
        .label(Line::from(label))
        .value(scaled(value))
        .text_value(format_fixed(value, places))
        .style(Style::default().fg(color))
}

/// Scale a quantity to a bar height; negative quantities draw no bar
fn scaled(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * BAR_SCALE).round() as u64
    } else {
        0
    }
}
