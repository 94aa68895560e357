//! User interface rendering.

mod formatters;
mod keymap_bar;
mod modal;
mod plot;
mod search;
mod status_bar;
mod table;
mod theme;

use crate::app::App;
use crate::view::Screen;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

pub use formatters::{
    format_axis_label, format_cell, format_hours, format_opt, format_reach, format_stat_value,
    truncate,
};
pub use theme::ThemeColors;

/// Draw the UI.
pub fn draw(f: &mut Frame<'_>, app: &mut App) {
    let colors = ThemeColors::from_theme(&app.theme);

    // Main layout with status bar and key map bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1), Constraint::Length(1)])
        .split(f.area());

    match app.view.screen() {
        Screen::Summary => table::draw_summary(f, app, chunks[0], &colors),
        Screen::ScatterGraph => table::draw_scatter(f, app, chunks[0], &colors),
        Screen::Search(_) => search::draw_search(f, app, chunks[0], &colors),
    }

    status_bar::draw_status(f, app, chunks[1], &colors);
    keymap_bar::draw_keymap(f, app, chunks[2], &colors);

    modal::draw_modals(f, app, &colors);
}
