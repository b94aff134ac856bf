//! Filter panel view
//!
//! One line per filter; select fields show their current value between
//! arrows, date fields are editable inputs.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::{App, FilterField, FocusedPanel};

/// Width reserved for the field labels
const LABEL_WIDTH: usize = 17;

/// Render the filter panel
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let is_focused = app.focused_panel == FocusedPanel::Filters;
    let border_color = if is_focused { Color::Cyan } else { Color::DarkGray };

    let block = Block::default()
        .title(" Filters ")
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    app.form.start_input.focused = is_focused && app.form.focused == FilterField::StartDate;
    app.form.end_input.focused = is_focused && app.form.focused == FilterField::EndDate;

    for (i, field) in FilterField::ALL.iter().copied().enumerate() {
        let y = inner.y + (i as u16) * 2;
        if y >= inner.y + inner.height {
            break;
        }
        let row = Rect::new(inner.x, y, inner.width, 1);
        let selected = is_focused && app.form.focused == field;

        let marker = if selected { "▶ " } else { "  " };
        let label_style = if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let label = Line::from(vec![
            Span::styled(marker, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{:<width$}", field.label(), width = LABEL_WIDTH - 2), label_style),
        ]);
        frame.render_widget(Paragraph::new(label), row);

        let value_area = Rect::new(
            row.x + LABEL_WIDTH as u16,
            row.y,
            row.width.saturating_sub(LABEL_WIDTH as u16),
            1,
        );

        match field {
            FilterField::StartDate => frame.render_widget(&app.form.start_input, value_area),
            FilterField::EndDate => frame.render_widget(&app.form.end_input, value_area),
            _ => {
                let value = app.form.value_label(field, &app.options);
                let text = if selected {
                    format!("◀ {} ▶", value)
                } else {
                    format!("  {}", value)
                };
                frame.render_widget(
                    Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
                    value_area,
                );
            }
        }
    }
}
