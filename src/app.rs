//! Application state and logic.

use std::sync::Arc;

use crate::api::{AeglRow, AnalysisApi, AnalysisMode, AnalysisResult, CompoundQuery};
use crate::clipboard;
use crate::fetch::{FetchCoordinator, FetchState, RequestKind};
use crate::grid::GroupedFigures;
use crate::modal::{ClickOutcome, FigureEntry, FigureViewer, ModalKind, ModalLayer};
use crate::suggest::SuggestionList;
use crate::summary::SummaryTable;
use crate::view::{FigureLayout, Screen, TableView, TopMode, ViewState};

/// Application theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    /// Gruvbox dark theme.
    GruvboxDark,
    /// Gruvbox light theme.
    GruvboxLight,
}

impl Theme {
    /// Get the next theme in the cycle.
    pub fn next(self) -> Self {
        match self {
            Theme::GruvboxDark => Theme::GruvboxLight,
            Theme::GruvboxLight => Theme::GruvboxDark,
        }
    }

    /// Get the theme name.
    pub fn name(self) -> &'static str {
        match self {
            Theme::GruvboxDark => "Gruvbox Dark",
            Theme::GruvboxLight => "Gruvbox Light",
        }
    }
}

/// A drill-down entry in the results list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureTarget {
    /// Tier/duration label.
    pub label: String,
    /// Number of charts available.
    pub figure_count: usize,
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Request coordination and loaded data.
    pub fetch: FetchCoordinator,
    /// Current screen and modes.
    pub view: ViewState,
    /// Overlays.
    pub modals: ModalLayer,
    /// Search input.
    pub query: String,
    /// Whether keystrokes go to the search input.
    pub editing: bool,
    /// Suggestions for the search input.
    pub suggestions: SuggestionList,
    /// Figure grid of the current result, grouped by tier/duration.
    pub grouped: Option<GroupedFigures>,
    /// Selected entry in the results list.
    pub figure_cursor: usize,
    /// Scroll offset of the result panels.
    pub result_scroll: u16,
    /// Summary table state.
    pub summary: SummaryTable,
    /// Status message.
    pub status: String,
    /// Current theme.
    pub theme: Theme,
}

impl App {
    /// Create a new application instance and start loading the name list.
    pub fn new(api: Arc<dyn AnalysisApi>, mode: AnalysisMode) -> Self {
        let mut app = Self {
            fetch: FetchCoordinator::new(api),
            view: ViewState::new(mode),
            modals: ModalLayer::new(),
            query: String::new(),
            editing: true,
            suggestions: SuggestionList::new(),
            grouped: None,
            figure_cursor: 0,
            result_scroll: 0,
            summary: SummaryTable::new(),
            status: "Ready".to_string(),
            theme: Theme::GruvboxDark,
        };
        app.fetch.load_names();
        app
    }

    /// The current analysis result, if loaded.
    pub fn result(&self) -> Option<&AnalysisResult> {
        self.fetch.analysis.ready()
    }

    /// Apply finished requests to the view.
    pub fn tick(&mut self) {
        for kind in self.fetch.poll() {
            self.on_applied(kind);
        }
    }

    /// React to a request whose result was just applied.
    pub fn on_applied(&mut self, kind: RequestKind) {
        match kind {
            RequestKind::Names => {
                if let FetchState::Failed(ref message) = self.fetch.names {
                    self.status = message.clone();
                }
                self.refresh_suggestions();
            },
            RequestKind::Analyze => {
                self.figure_cursor = 0;
                self.result_scroll = 0;
                self.grouped = self
                    .result()
                    .and_then(|r| r.aegl_graph_grid.as_ref())
                    .map(GroupedFigures::from_json);

                if let Some(grouped) = &self.grouped {
                    if !grouped.ignored().is_empty() {
                        tracing::info!(
                            ignored = grouped.ignored().len(),
                            "AEGL grid contained unrecognized keys"
                        );
                    }
                }

                self.status = match &self.fetch.analysis {
                    FetchState::Ready(result) => {
                        format!("Loaded {}", result.compound.display_name())
                    },
                    FetchState::Failed(_) => "Analysis failed".to_string(),
                    _ => "Analysis unavailable (server unreachable)".to_string(),
                };

                while let Some(message) = self.fetch.take_alert() {
                    self.modals.alert(message);
                }
            },
            RequestKind::Summary => {
                match &self.fetch.summary {
                    FetchState::Ready(rows) => {
                        self.summary.load(rows);
                        self.status = format!("{} compounds", rows.len());
                    },
                    FetchState::Failed(message) => self.status = message.clone(),
                    _ => {},
                }
            },
            RequestKind::Scatter => {
                if let FetchState::Failed(ref message) = self.fetch.scatter {
                    self.status = message.clone();
                }
            },
        }
    }

    // ── Search input ──────────────────────────────────────────────────────

    /// Start editing the search input.
    pub fn start_editing(&mut self) {
        self.editing = true;
        self.refresh_suggestions();
    }

    /// Stop editing and hide suggestions.
    pub fn stop_editing(&mut self) {
        self.editing = false;
        self.suggestions.clear();
    }

    /// Type a character into the search input.
    pub fn input(&mut self, c: char) {
        self.query.push(c);
        self.refresh_suggestions();
    }

    /// Delete the last character of the search input.
    pub fn backspace(&mut self) {
        self.query.pop();
        self.refresh_suggestions();
    }

    fn refresh_suggestions(&mut self) {
        match self.fetch.names.ready() {
            Some(names) if self.editing => self.suggestions.refresh(&self.query, names),
            _ => self.suggestions.clear(),
        }
    }

    /// Enter in the search input: analyze the highlighted suggestion, or the
    /// typed text when nothing is highlighted.
    ///
    /// A picked suggestion is submitted and the input cleared.
    pub fn submit_search(&mut self) {
        match self.suggestions.pick() {
            Some(name) => {
                self.query = name;
                self.analyze_current();
                self.query.clear();
            },
            None => self.analyze_current(),
        }
    }

    /// Analyze whatever is in the search input.
    pub fn analyze_current(&mut self) {
        let query = CompoundQuery::new(&self.query, self.view.mode);
        if query.name.is_empty() {
            self.status = "Type a compound name first".to_string();
            return;
        }

        let name = query.name.clone();
        match self.fetch.analyze(query) {
            Some(_) => {
                self.grouped = None;
                self.figure_cursor = 0;
                self.modals.close_result_views();
                self.editing = false;
                self.suggestions.clear();
                self.status = format!("Analyzing {} ({})...", name, self.view.mode.name());
            },
            None => {
                self.status = format!("Analysis of {} already in progress", name);
            },
        }
    }

    // ── Modes ─────────────────────────────────────────────────────────────

    /// Switch between the table and search screens.
    pub fn toggle_top(&mut self) {
        self.view.toggle_top();
        self.status = format!("View: {}", self.view.top.name());
        self.ensure_screen_data();
    }

    /// Switch between summary and graph in the table screen.
    pub fn toggle_table_view(&mut self) {
        if self.view.toggle_table_view() {
            self.status = format!("Table: {}", self.view.table.name());
            self.ensure_screen_data();
        }
    }

    /// Switch analysis mode; clears the query and the current result.
    pub fn toggle_mode(&mut self) {
        if !self.view.toggle_mode() {
            return;
        }
        self.query.clear();
        self.suggestions.clear();
        self.fetch.clear_analysis();
        self.grouped = None;
        self.figure_cursor = 0;
        self.modals.close_result_views();
        self.status = format!("Mode: {}", self.view.mode.name());
    }

    fn ensure_screen_data(&mut self) {
        match self.view.screen() {
            Screen::Summary if matches!(self.fetch.summary, FetchState::Idle) => {
                self.fetch.load_summary();
                self.status = "Loading summary...".to_string();
            },
            Screen::ScatterGraph if matches!(self.fetch.scatter, FetchState::Idle) => {
                self.fetch.load_scatter();
                self.status = "Loading scatter graph...".to_string();
            },
            _ => {},
        }
    }

    /// Reload the data behind the current table view.
    pub fn reload_table(&mut self) {
        if self.view.top != TopMode::Table {
            return;
        }
        let issued = match self.view.table {
            TableView::Summary => self.fetch.load_summary(),
            TableView::Graph => self.fetch.load_scatter(),
        };
        if issued.is_some() {
            self.status = format!("Reloading {}...", self.view.table.name().to_lowercase());
        }
    }

    // ── Results ───────────────────────────────────────────────────────────

    /// AEGL rows of the current result.
    pub fn aegl_rows(&self) -> &[AeglRow] {
        self.result()
            .and_then(|r| r.aegl_analysis.as_ref())
            .map(|a| a.results.as_slice())
            .unwrap_or(&[])
    }

    /// Entries of the results list, per the active figure layout.
    pub fn figure_targets(&self) -> Vec<FigureTarget> {
        match FigureLayout::from(self.view.mode) {
            FigureLayout::GroupedGrid => self
                .grouped
                .as_ref()
                .map(|g| {
                    g.iter()
                        .map(|(prefix, set)| FigureTarget {
                            label: prefix.to_string(),
                            figure_count: set.len(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            FigureLayout::RowPairs => self
                .aegl_rows()
                .iter()
                .map(|row| FigureTarget {
                    label: row.prefix(),
                    figure_count: row.absorption_graph.iter().count()
                        + row.flux_graph.iter().count(),
                })
                .collect(),
        }
    }

    /// Move the selection of the current screen down.
    pub fn cursor_down(&mut self, amount: usize) {
        match self.view.screen() {
            Screen::Summary => {
                let rows = self.fetch.summary.ready().map_or(0, Vec::len);
                self.summary.cursor_down(amount, rows);
            },
            Screen::Search(_) => self.move_figure_cursor(amount as isize),
            Screen::ScatterGraph => {},
        }
    }

    /// Move the selection of the current screen up.
    pub fn cursor_up(&mut self, amount: usize) {
        match self.view.screen() {
            Screen::Summary => self.summary.cursor_up(amount),
            Screen::Search(_) => self.move_figure_cursor(-(amount as isize)),
            Screen::ScatterGraph => {},
        }
    }

    /// Move the results cursor.
    pub fn move_figure_cursor(&mut self, delta: isize) {
        let len = self.figure_targets().len();
        if len == 0 {
            self.figure_cursor = 0;
            return;
        }
        let next = self.figure_cursor as isize + delta;
        self.figure_cursor = next.clamp(0, len as isize - 1) as usize;
    }

    fn viewer_for_cursor(&self) -> Option<FigureViewer> {
        match FigureLayout::from(self.view.mode) {
            FigureLayout::GroupedGrid => {
                let grouped = self.grouped.as_ref()?;
                let prefix = grouped.prefixes().get(self.figure_cursor)?;
                let set = grouped.get(prefix)?;
                Some(FigureViewer::from_figure_set(prefix, set))
            },
            FigureLayout::RowPairs => {
                let row = self.aegl_rows().get(self.figure_cursor)?;
                let prefix = row.prefix();
                let entries = [
                    ("Absorption", row.absorption_graph.as_ref()),
                    ("Flux", row.flux_graph.as_ref()),
                ]
                .into_iter()
                .filter_map(|(title, payload)| {
                    payload.map(|p| FigureEntry {
                        label: format!("{} · {}", prefix, title),
                        payload: p.clone(),
                    })
                })
                .collect();
                Some(FigureViewer::new(entries))
            },
        }
    }

    /// Open the figure viewer for the selected results entry.
    pub fn open_figures(&mut self) {
        match self.viewer_for_cursor() {
            Some(viewer) if !viewer.entries.is_empty() => {
                self.modals.figure.set_content(viewer);
                self.modals.open(ModalKind::Figure);
            },
            _ => self.status = "No figures for this entry".to_string(),
        }
    }

    /// Toggle one of the tabular overlays.
    pub fn toggle_modal(&mut self, kind: ModalKind) {
        if self.result().is_none() {
            self.status = "Analyze a compound first".to_string();
            return;
        }
        self.modals.toggle(kind);
    }

    /// Escape: close the active overlay.
    pub fn escape(&mut self) {
        if let Some(kind) = self.modals.close_active() {
            self.status = format!("{} closed", kind.title());
        }
    }

    /// Mouse click anywhere on screen.
    pub fn click(&mut self, column: u16, row: u16) {
        if let ClickOutcome::Closed(kind) = self.modals.handle_click(column, row) {
            self.status = format!("{} closed", kind.title());
        }
    }

    /// Copy a plain-text report of the current result.
    pub fn copy_report(&mut self) {
        let Some(result) = self.result() else {
            self.status = "Nothing to copy".to_string();
            return;
        };
        let name = result.compound.display_name().to_string();
        self.status = match clipboard::copy_analysis_report(result, self.grouped.as_ref()) {
            Ok(()) => format!("Copied {}!", name),
            Err(e) => format!("Copy failed: {}", e),
        };
    }

    /// Cycle to the next theme.
    pub fn cycle_theme(&mut self) {
        self.theme = self.theme.next();
        self.status = format!("Theme: {}", self.theme.name());
    }

    /// Scroll result panels down.
    pub fn scroll_results_down(&mut self) {
        self.result_scroll = self.result_scroll.saturating_add(3);
    }

    /// Scroll result panels up.
    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(3);
    }
}
