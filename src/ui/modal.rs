//! Overlay rendering.

use super::plot::draw_payload;
use super::search::{aegl_value_lines, exposure_lines};
use super::ThemeColors;
use crate::app::App;
use crate::modal::ModalKind;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, GraphType, Paragraph, Wrap},
    Frame,
};

/// Draw every open overlay, bottom to top.
pub(super) fn draw_modals(f: &mut Frame<'_>, app: &mut App, colors: &ThemeColors) {
    let order = app.modals.open_order().to_vec();
    for kind in order {
        let area = match kind {
            ModalKind::AeglValues | ModalKind::ExposureTimes => {
                let lines = if kind == ModalKind::AeglValues {
                    aegl_value_lines(app, colors)
                } else {
                    exposure_lines(app, colors)
                };
                let scroll = if kind == ModalKind::AeglValues {
                    app.modals.aegl_values.scroll
                } else {
                    app.modals.exposure_times.scroll
                };
                draw_text_modal(f, kind.title(), lines, scroll, colors)
            },
            ModalKind::Figure => draw_figure(f, app, colors),
            ModalKind::Alert => draw_alert(f, app, colors),
        };
        app.modals.set_area(kind, area);
    }
}

fn modal_block<'a>(title: String, colors: &ThemeColors) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.heading))
        .style(Style::default().bg(colors.overlay_bg))
}

fn draw_text_modal(
    f: &mut Frame<'_>,
    title: &str,
    lines: Vec<Line<'_>>,
    scroll: u16,
    colors: &ThemeColors,
) -> Rect {
    let area = centered_rect(70, 60, f.area());
    f.render_widget(Clear, area);

    let paragraph = Paragraph::new(lines)
        .block(modal_block(format!(" {} ", title), colors))
        .style(Style::default().fg(colors.text))
        .scroll((scroll, 0));

    f.render_widget(paragraph, area);
    area
}

fn draw_figure(f: &mut Frame<'_>, app: &App, colors: &ThemeColors) -> Rect {
    let area = centered_rect(90, 85, f.area());
    f.render_widget(Clear, area);

    let viewer = app.modals.figure.content();
    let position = viewer
        .map(|v| format!("{}/{}", v.index + 1, v.entries.len()))
        .unwrap_or_default();
    let block = modal_block(format!(" Figures {} ", position), colors);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(inner);

    match viewer.and_then(|v| v.current()) {
        Some(entry) => draw_payload(
            f,
            chunks[0],
            &entry.payload,
            &entry.label,
            GraphType::Line,
            colors,
        ),
        None => {
            let para = Paragraph::new("No figure selected")
                .style(Style::default().fg(colors.muted))
                .alignment(Alignment::Center);
            f.render_widget(para, chunks[0]);
        },
    }

    let help = Paragraph::new("←/→ or h/l: cycle | Esc: close")
        .style(Style::default().fg(colors.label))
        .alignment(Alignment::Center);
    f.render_widget(help, chunks[1]);

    area
}

fn draw_alert(f: &mut Frame<'_>, app: &App, colors: &ThemeColors) -> Rect {
    let area = centered_rect(50, 25, f.area());
    f.render_widget(Clear, area);

    let message = app.modals.alert.content().cloned().unwrap_or_default();
    let lines = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(colors.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter or Esc to dismiss",
            Style::default().fg(colors.muted),
        )),
    ];

    let block = Block::default()
        .title(" Alert ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.error))
        .style(Style::default().bg(colors.overlay_bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
    area
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
