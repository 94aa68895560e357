//! Search screen: compound input, suggestions and analysis results.

use super::formatters::{format_hours, format_opt, format_reach, format_stat_value};
use super::ThemeColors;
use crate::api::{AnalysisResult, Compound, KrPrediction, Reactivity};
use crate::app::App;
use crate::fetch::FetchState;
use crate::grid::TierDuration;
use crate::view::FigureLayout;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Draw the search screen.
pub(super) fn draw_search(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    draw_input(f, app, chunks[0], colors);

    match &app.fetch.analysis {
        FetchState::Ready(result) => draw_result(f, app, result, chunks[1], colors),
        FetchState::Loading => {
            let name = app
                .fetch
                .in_flight_query()
                .map(|q| q.name.as_str())
                .unwrap_or_default();
            draw_message(f, chunks[1], &format!("Analyzing {}...", name), colors);
        },
        FetchState::Failed(message) => draw_message(f, chunks[1], message, colors),
        FetchState::Idle => draw_welcome(f, chunks[1], colors),
    }

    // Dropdown goes last so it covers the results.
    if app.editing && !app.suggestions.is_empty() {
        draw_suggestions(f, app, chunks[0], area, colors);
    }
}

fn draw_input(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let text = if app.query.is_empty() && !app.editing {
        Line::from(Span::styled(
            "Press / or i to search for a compound",
            Style::default().fg(colors.muted),
        ))
    } else if app.editing {
        Line::from(vec![
            Span::styled(app.query.clone(), Style::default().fg(colors.text)),
            Span::styled("█", Style::default().fg(colors.cursor_bg)),
        ])
    } else {
        Line::from(Span::styled(app.query.clone(), Style::default().fg(colors.text)))
    };

    let border = if app.editing { colors.heading } else { colors.border };
    let title = format!(" Compound · {} ", app.view.mode.name());

    let paragraph = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg)),
    );

    f.render_widget(paragraph, area);
}

fn draw_suggestions(
    f: &mut Frame<'_>,
    app: &App,
    input: Rect,
    screen: Rect,
    colors: &ThemeColors,
) {
    let items = app.suggestions.items();
    let height = (items.len() as u16 + 2).min(screen.bottom().saturating_sub(input.bottom()));
    if height < 3 {
        return;
    }
    let width = input.width.saturating_sub(2).min(60);
    let area = Rect::new(input.x + 1, input.bottom(), width, height);

    let selected = app.suggestions.selected_index();
    let list_items: Vec<ListItem<'_>> = items
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let style = if Some(idx) == selected {
                Style::default()
                    .fg(colors.cursor_fg)
                    .bg(colors.cursor_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            ListItem::new(Line::from(name.as_str())).style(style)
        })
        .collect();

    f.render_widget(Clear, area);
    let list = List::new(list_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.overlay_bg)),
    );
    f.render_widget(list, area);
}

fn draw_result(
    f: &mut Frame<'_>,
    app: &App,
    result: &AnalysisResult,
    area: Rect,
    colors: &ThemeColors,
) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let mut lines = compound_lines(&result.compound, colors);
    if let Some(reactivity) = &result.reactivity {
        lines.push(Line::from(""));
        lines.extend(reactivity_lines(reactivity, colors));
    }
    if let Some(kr) = &result.kr_prediction {
        lines.push(Line::from(""));
        lines.extend(kr_lines(kr, colors));
    }

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", result.compound.display_name()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .style(Style::default().bg(colors.bg)),
        )
        .style(Style::default().fg(colors.text))
        .wrap(Wrap { trim: true })
        .scroll((app.result_scroll, 0));

    f.render_widget(paragraph, columns[0]);

    draw_aegl_results(f, app, result, columns[1], colors);
}

fn heading<'a>(text: &'a str, colors: &ThemeColors) -> Line<'a> {
    Line::from(Span::styled(
        text,
        Style::default().fg(colors.heading).add_modifier(Modifier::BOLD),
    ))
}

fn field<'a>(label: &'a str, value: String, colors: &ThemeColors) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<16}", label), Style::default().fg(colors.label)),
        Span::styled(value, Style::default().fg(colors.value)),
    ])
}

fn text_or_dash(value: Option<&str>) -> String {
    value.unwrap_or("—").to_string()
}

fn compound_lines<'a>(compound: &Compound, colors: &ThemeColors) -> Vec<Line<'a>> {
    vec![
        heading("Compound", colors),
        field("CAS", text_or_dash(compound.cas.as_deref()), colors),
        field("Class", text_or_dash(compound.class.as_deref()), colors),
        field("MW (g/mol)", format_opt(compound.molecular_weight), colors),
        field("logP", format_opt(compound.log_p), colors),
        field("SMILES", text_or_dash(compound.smiles.as_deref()), colors),
    ]
}

fn reactivity_lines<'a>(reactivity: &Reactivity, colors: &ThemeColors) -> Vec<Line<'a>> {
    let groups = if reactivity.reactive_groups.is_empty() {
        "none".to_string()
    } else {
        reactivity.reactive_groups.join(", ")
    };
    vec![
        heading("Reactivity", colors),
        field("Groups", groups, colors),
        field("Leaving group", text_or_dash(reactivity.leaving_group.as_deref()), colors),
        field("Steric", text_or_dash(reactivity.steric.as_deref()), colors),
        field("Score", format_opt(reactivity.reactive_score), colors),
        field("Class", text_or_dash(reactivity.chemical_class.as_deref()), colors),
        field("Oxime", text_or_dash(reactivity.oxime_reactivity.as_deref()), colors),
    ]
}

fn kr_lines<'a>(kr: &KrPrediction, colors: &ThemeColors) -> Vec<Line<'a>> {
    vec![
        heading("Rate constant", colors),
        field("Predicted kr", format_opt(kr.predicted_kr), colors),
        field("Confidence", text_or_dash(kr.confidence.as_deref()), colors),
    ]
}

fn draw_aegl_results(
    f: &mut Frame<'_>,
    app: &App,
    result: &AnalysisResult,
    area: Rect,
    colors: &ThemeColors,
) {
    let layout = FigureLayout::from(app.view.mode);
    let title = match layout {
        FigureLayout::RowPairs => " AEGL Results ",
        FigureLayout::GroupedGrid => " AEGL Figure Grid ",
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border))
        .style(Style::default().bg(colors.bg));

    if let Some(analysis) = &result.aegl_analysis {
        if !analysis.available {
            let reason = analysis
                .reason
                .clone()
                .unwrap_or_else(|| "No AEGL data for this compound".to_string());
            let para = Paragraph::new(Line::from(Span::styled(
                reason,
                Style::default().fg(colors.warning),
            )))
            .block(block)
            .wrap(Wrap { trim: true });
            f.render_widget(para, area);
            return;
        }
    }

    let targets = app.figure_targets();
    if targets.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            "No AEGL figures in this result",
            Style::default().fg(colors.muted),
        )))
        .block(block);
        f.render_widget(para, area);
        return;
    }

    let rows = app.aegl_rows();
    let items: Vec<ListItem<'_>> = targets
        .iter()
        .enumerate()
        .map(|(idx, target)| {
            let tier = TierDuration::from_prefix(&target.label).tier;
            let mut spans = vec![Span::styled(
                format!("{:<12}", target.label),
                Style::default().fg(colors.tier(Some(tier))),
            )];

            if layout == FigureLayout::RowPairs {
                if let Some(row) = rows.get(idx) {
                    spans.push(Span::raw(format!(
                        " AEGL {:>10}  Qallow {:>10}  t_reach {:>10}",
                        format_opt(row.aegl),
                        format_opt(row.qallow),
                        format_reach(row.t_reach.as_ref()),
                    )));
                }
            }
            spans.push(Span::styled(
                format!("  [{} charts]", target.figure_count),
                Style::default().fg(colors.muted),
            ));

            let style = if idx == app.figure_cursor {
                Style::default()
                    .fg(colors.cursor_fg)
                    .bg(colors.cursor_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text)
            };
            ListItem::new(Line::from(spans)).style(style)
        })
        .collect();

    // Offset follows the cursor so the selected entry stays on screen
    let mut state = ListState::default().with_selected(Some(app.figure_cursor));
    f.render_stateful_widget(List::new(items).block(block), area, &mut state);
}

fn draw_message(f: &mut Frame<'_>, area: Rect, message: &str, colors: &ThemeColors) {
    let paragraph = Paragraph::new(Line::from(Span::styled(
        message.to_string(),
        Style::default().fg(colors.text),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border))
            .style(Style::default().bg(colors.bg)),
    )
    .wrap(Wrap { trim: true });

    f.render_widget(paragraph, area);
}

fn draw_welcome(f: &mut Frame<'_>, area: Rect, colors: &ThemeColors) {
    let lines = vec![
        Line::from(Span::styled(
            "Exposure Dashboard",
            Style::default()
                .fg(colors.heading)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Search a compound to see its reactivity, rate constant and AEGL analysis."),
        Line::from(""),
        Line::from("Keyboard shortcuts:"),
        Line::from("  / or i      - Edit search"),
        Line::from("  Tab         - Next suggestion"),
        Line::from("  Enter       - Analyze"),
        Line::from("  m           - Toggle gaseous/aqueous"),
        Line::from("  v           - Table view"),
        Line::from("  a / e       - AEGL values / exposure times"),
        Line::from("  q           - Quit"),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(colors.border))
                .style(Style::default().bg(colors.bg)),
        )
        .style(Style::default().fg(colors.text));

    f.render_widget(paragraph, area);
}

/// Lines for the exposure-times overlay.
pub(super) fn exposure_lines<'a>(app: &App, colors: &ThemeColors) -> Vec<Line<'a>> {
    let rows = app.aegl_rows();
    if rows.is_empty() {
        return vec![Line::from("No exposure data for this result")];
    }

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{:<12} {:>12} {:>12} {:>16}",
            "Tier", "Exposure", "Lag", "Time to dose"
        ),
        Style::default().fg(colors.heading).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(rows.iter().map(|row| {
        Line::from(vec![
            Span::styled(
                format!("{:<12}", row.prefix()),
                Style::default().fg(colors.tier(row.aegl_level)),
            ),
            Span::styled(
                format!(
                    " {:>12} {:>12} {:>16}",
                    format_hours(row.exposure_time_hours),
                    format_hours(row.tlag),
                    format_reach(row.t_reach.as_ref()),
                ),
                Style::default().fg(colors.value),
            ),
        ])
    }));
    lines
}

/// Lines for the AEGL-values overlay.
pub(super) fn aegl_value_lines<'a>(app: &App, colors: &ThemeColors) -> Vec<Line<'a>> {
    let rows = app.aegl_rows();
    if rows.is_empty() {
        return vec![Line::from("No AEGL values for this result")];
    }

    let mut lines = vec![Line::from(Span::styled(
        format!(
            "{:<12} {:>14} {:>14} {:>16}",
            "Tier", "AEGL (mg/m³)", "Qallow (mg)", "Flux (mg/h)"
        ),
        Style::default().fg(colors.heading).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(rows.iter().map(|row| {
        Line::from(vec![
            Span::styled(
                format!("{:<12}", row.prefix()),
                Style::default().fg(colors.tier(row.aegl_level)),
            ),
            Span::styled(
                format!(
                    " {:>14} {:>14} {:>16}",
                    format_opt(row.aegl),
                    format_opt(row.qallow),
                    row.steady_state_flux
                        .map(format_stat_value)
                        .unwrap_or_else(|| "—".to_string()),
                ),
                Style::default().fg(colors.value),
            ),
        ])
    }));
    lines
}
