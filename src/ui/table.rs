//! Table screen: combined summary and scatter graph.

use super::formatters::{format_cell, truncate};
use super::plot::draw_payload;
use super::ThemeColors;
use crate::api::SummaryRow;
use crate::app::App;
use crate::fetch::FetchState;
use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, GraphType, Paragraph, Row, Table},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const MIN_COL_WIDTH: usize = 6;
const MAX_COL_WIDTH: usize = 24;

/// Draw the combined summary table.
pub(super) fn draw_summary(f: &mut Frame<'_>, app: &mut App, area: Rect, colors: &ThemeColors) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg));

    let rows: &[SummaryRow] = match &app.fetch.summary {
        FetchState::Ready(rows) => rows,
        FetchState::Loading | FetchState::Idle => {
            let block = block.title(" Combined Summary ");
            draw_placeholder(f, area, block, "Loading summary...", colors);
            return;
        },
        FetchState::Failed(message) => {
            let block = block.title(" Combined Summary ");
            draw_placeholder(f, area, block, message, colors);
            return;
        },
    };

    if rows.is_empty() {
        let block = block.title(" Combined Summary ");
        draw_placeholder(f, area, block, "No compounds in summary", colors);
        return;
    }

    let inner = block.inner(area);
    // Header row plus its bottom margin.
    let viewport = (inner.height as usize).saturating_sub(2);
    app.summary.cursor = app.summary.cursor.min(rows.len() - 1);
    app.summary.adjust_scroll(viewport);

    let table_state = &app.summary;
    let pinned = "Compound".to_string();
    let visible_columns: Vec<&String> = std::iter::once(&pinned)
        .chain(table_state.data_columns().iter().skip(table_state.col_offset))
        .collect();

    let widths: Vec<usize> = visible_columns
        .iter()
        .map(|column| column_width(column, rows))
        .collect();

    let header = Row::new(
        visible_columns
            .iter()
            .zip(&widths)
            .map(|(c, w)| Cell::from(truncate(c, *w))),
    )
    .style(
        Style::default()
            .fg(colors.heading)
            .add_modifier(Modifier::BOLD),
    )
    .bottom_margin(1);

    let body = rows
        .iter()
        .enumerate()
        .skip(table_state.row_offset)
        .take(viewport)
        .map(|(idx, row)| {
            let cells = visible_columns.iter().zip(&widths).map(|(column, w)| {
                let text = if column.as_str() == "Compound" {
                    row.compound.clone()
                } else {
                    format_cell(row.get(column))
                };
                Cell::from(truncate(&text, *w))
            });

            let style = if idx == table_state.cursor {
                Style::default()
                    .fg(colors.cursor_fg)
                    .bg(colors.cursor_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            Row::new(cells).style(style)
        });

    let constraints: Vec<Constraint> = widths
        .iter()
        .map(|w| Constraint::Length(*w as u16))
        .collect();

    let title = format!(
        " Combined Summary ({}/{}) · columns {}-{} of {} ",
        table_state.cursor + 1,
        rows.len(),
        table_state.col_offset + 1,
        (table_state.col_offset + visible_columns.len()).saturating_sub(1),
        table_state.data_columns().len(),
    );

    let table = Table::new(body, constraints)
        .header(header)
        .column_spacing(2)
        .block(block.title(title));

    f.render_widget(table, area);
}

fn column_width(column: &str, rows: &[SummaryRow]) -> usize {
    let widest = rows
        .iter()
        .map(|row| {
            if column == "Compound" {
                row.compound.width()
            } else {
                format_cell(row.get(column)).width()
            }
        })
        .max()
        .unwrap_or(0);
    widest.max(column.width()).clamp(MIN_COL_WIDTH, MAX_COL_WIDTH)
}

/// Draw the kr scatter graph.
pub(super) fn draw_scatter(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    match &app.fetch.scatter {
        FetchState::Ready(graph) => draw_payload(
            f,
            area,
            graph,
            "Predicted kr by class",
            GraphType::Scatter,
            colors,
        ),
        FetchState::Failed(message) => {
            let block = Block::default()
                .title(" Scatter Graph ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border));
            draw_placeholder(f, area, block, message, colors);
        },
        _ => {
            let block = Block::default()
                .title(" Scatter Graph ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border));
            draw_placeholder(f, area, block, "Loading scatter graph...", colors);
        },
    }
}

fn draw_placeholder(
    f: &mut Frame<'_>,
    area: Rect,
    block: Block<'_>,
    message: &str,
    colors: &ThemeColors,
) {
    let para = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(colors.muted),
    )))
    .block(block);
    f.render_widget(para, area);
}
