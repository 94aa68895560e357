//! Status bar UI component.

use crate::app::App;
use crate::ui::ThemeColors;
use crate::view::TopMode;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Paragraph,
    Frame,
};

/// Draw the status bar.
pub(super) fn draw_status(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let busy = if app.fetch.is_busy() { " ⟳ " } else { "" };
    let mode = format!(
        " {} · {} ",
        app.view.top.name(),
        match app.view.top {
            TopMode::Table => app.view.table.name(),
            TopMode::Search => app.view.mode.name(),
        }
    );

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Length(mode.chars().count() as u16)])
        .split(area);

    let style = Style::default().fg(colors.status_fg).bg(colors.status_bg);
    f.render_widget(
        Paragraph::new(format!("{}{}", busy, app.status)).style(style),
        chunks[0],
    );
    f.render_widget(Paragraph::new(mode).style(style), chunks[1]);
}
