//! Status bar view
//!
//! Shows the loaded file, the last status message and key hints

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::tui::app::{App, StatusKind};

/// Render the status bar
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let mut spans = vec![];

    let source = app
        .source
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "no file".to_string());
    spans.push(Span::styled(
        format!(" {} ", source),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));

    if let Some(dataset) = &app.dataset {
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(
            format!("{} rows ", dataset.len()),
            Style::default().fg(Color::White),
        ));
    }

    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => Color::Yellow,
            StatusKind::Error => Color::Red,
        };
        spans.push(Span::raw("│ "));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    // Key hints (right-aligned)
    let hints = " q:Quit  ?:Help  o:Open  r:Reset  c:Columns  Tab:Switch ";

    let left_len: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    let padding_len = (area.width as usize)
        .saturating_sub(left_len)
        .saturating_sub(hints.len());
    spans.push(Span::raw(" ".repeat(padding_len.max(1))));
    spans.push(Span::styled(hints, Style::default().fg(Color::White)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
