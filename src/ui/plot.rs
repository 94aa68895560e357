//! Terminal rendering of serialized chart payloads.

use super::formatters::format_axis_label;
use super::ThemeColors;
use crate::chart::ChartPayload;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Wrap},
    Frame,
};

/// Parse and draw one payload. A malformed payload only affects its own area.
pub(super) fn draw_payload(
    f: &mut Frame<'_>,
    area: Rect,
    raw: &str,
    label: &str,
    graph_type: GraphType,
    colors: &ThemeColors,
) {
    match ChartPayload::parse(raw) {
        Ok(chart) => draw_chart(f, area, &chart, label, graph_type, colors),
        Err(e) => draw_chart_error(f, area, label, &e.to_string(), colors),
    }
}

/// Draw a parsed chart.
pub(super) fn draw_chart(
    f: &mut Frame<'_>,
    area: Rect,
    chart: &ChartPayload,
    label: &str,
    graph_type: GraphType,
    colors: &ThemeColors,
) {
    let title = chart.title().unwrap_or_else(|| label.to_string());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .title(format!(" {} ", title))
        .title_style(Style::default().fg(colors.heading));

    let notes = chart.annotations();
    if !chart.has_points() {
        let mut lines = vec![Line::from(Span::styled(
            "No data to display",
            Style::default().fg(colors.muted),
        ))];
        lines.extend(
            notes
                .iter()
                .map(|n| Line::from(Span::styled(n.clone(), Style::default().fg(colors.warning)))),
        );
        let para = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        f.render_widget(para, area);
        return;
    }

    let log_y = chart.y_is_log();
    let scaled = chart.plot_scaled();
    let ([x_min, x_max], [y_min, y_max]) = scaled
        .bounds()
        .map(|(x, y)| (widen(x), widen(y)))
        .unwrap_or(([0.0, 1.0], [0.0, 1.0]));

    let datasets: Vec<Dataset<'_>> = scaled
        .traces
        .iter()
        .enumerate()
        .map(|(i, trace)| {
            Dataset::default()
                .name(trace.name.clone())
                .marker(Marker::Braille)
                .graph_type(graph_type)
                .style(Style::default().fg(colors.series(i)))
                .data(&trace.points)
        })
        .collect();

    let categories = chart
        .traces
        .iter()
        .find(|t| !t.categories.is_empty())
        .map(|t| t.categories.as_slice());
    let x_labels: Vec<String> = match categories {
        Some(cats) if cats.len() <= 8 => cats.to_vec(),
        _ => vec![
            format_axis_label(x_min),
            format_axis_label((x_min + x_max) / 2.0),
            format_axis_label(x_max),
        ],
    };

    let y_label = |v: f64| {
        if log_y {
            format_axis_label(10f64.powf(v))
        } else {
            format_axis_label(v)
        }
    };
    let y_labels = vec![y_label(y_min), y_label((y_min + y_max) / 2.0), y_label(y_max)];

    let x_axis = Axis::default()
        .title(chart.x_title().unwrap_or_default())
        .style(Style::default().fg(colors.text))
        .bounds([x_min, x_max])
        .labels(x_labels);

    let y_title = chart.y_title().unwrap_or_default();
    let y_axis = Axis::default()
        .title(if log_y { format!("{} (log)", y_title) } else { y_title })
        .style(Style::default().fg(colors.text))
        .bounds([y_min, y_max])
        .labels(y_labels);

    let block = match notes.first() {
        Some(note) => block.title_bottom(Line::from(Span::styled(
            format!(" {} ", note),
            Style::default().fg(colors.warning),
        ))),
        None => block,
    };

    let widget = Chart::new(datasets).block(block).x_axis(x_axis).y_axis(y_axis);
    f.render_widget(widget, area);
}

/// Inline error shown in place of a chart that could not be parsed.
pub(super) fn draw_chart_error(
    f: &mut Frame<'_>,
    area: Rect,
    label: &str,
    error: &str,
    colors: &ThemeColors,
) {
    let lines = vec![
        Line::from(Span::styled(
            "Chart unavailable",
            Style::default().fg(colors.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(error.to_string(), Style::default().fg(colors.text))),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .title(format!(" {} ", label)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn widen([lo, hi]: [f64; 2]) -> [f64; 2] {
    if (hi - lo).abs() < 1e-12 {
        [lo - 0.5, hi + 0.5]
    } else {
        [lo, hi]
    }
}
