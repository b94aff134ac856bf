//! Open file dialog

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::tui::app::App;
use crate::tui::layout::centered_rect_fixed;

/// Render the open file dialog
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = centered_rect_fixed(70, 6, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Open Kardex File ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return;
    }

    let input_area = Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1);
    frame.render_widget(&app.path_input, input_area);

    if inner.height >= 4 {
        let hints = Paragraph::new("Enter: open  Esc: cancel")
            .style(Style::default().fg(Color::DarkGray));
        let hints_area = Rect::new(inner.x + 1, inner.y + 3, inner.width.saturating_sub(2), 1);
        frame.render_widget(hints, hints_area);
    }
}
