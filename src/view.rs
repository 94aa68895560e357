//! View-mode state machine.
//!
//! Transitions are user-triggered toggles only.

use crate::api::AnalysisMode;

/// Top-level screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopMode {
    /// Bulk summary across all compounds.
    Table,
    /// Single-compound search and analysis.
    #[default]
    Search,
}

impl TopMode {
    /// Get the other screen.
    pub fn toggle(self) -> Self {
        match self {
            TopMode::Table => TopMode::Search,
            TopMode::Search => TopMode::Table,
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            TopMode::Table => "Table",
            TopMode::Search => "Search",
        }
    }
}

/// Sub-view of the table screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableView {
    /// Tabular summary rows.
    #[default]
    Summary,
    /// Scatter chart of predicted kr by class.
    Graph,
}

impl TableView {
    /// Get the other sub-view.
    pub fn toggle(self) -> Self {
        match self {
            TableView::Summary => TableView::Graph,
            TableView::Graph => TableView::Summary,
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            TableView::Summary => "Summary",
            TableView::Graph => "Graph",
        }
    }
}

/// How AEGL figures are laid out for a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureLayout {
    /// Absorption/flux pair per result row.
    RowPairs,
    /// Grid of figure sets grouped by tier/duration prefix.
    GroupedGrid,
}

impl From<AnalysisMode> for FigureLayout {
    fn from(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Gaseous => FigureLayout::RowPairs,
            AnalysisMode::Aqueous => FigureLayout::GroupedGrid,
        }
    }
}

/// Which renderer is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Summary table.
    Summary,
    /// Scatter chart.
    ScatterGraph,
    /// Search with results laid out per the analysis mode.
    Search(FigureLayout),
}

/// Combined view state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    /// Current top-level screen.
    pub top: TopMode,
    /// Remembered table sub-view.
    pub table: TableView,
    /// Analysis mode selected in the search screen.
    pub mode: AnalysisMode,
}

impl ViewState {
    /// Create a view state starting in search with the given mode.
    pub fn new(mode: AnalysisMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Switch between table and search.
    pub fn toggle_top(&mut self) {
        self.top = self.top.toggle();
    }

    /// Switch between summary and graph. Only meaningful in the table screen.
    pub fn toggle_table_view(&mut self) -> bool {
        if self.top != TopMode::Table {
            return false;
        }
        self.table = self.table.toggle();
        true
    }

    /// Switch analysis mode. Only meaningful in the search screen.
    pub fn toggle_mode(&mut self) -> bool {
        if self.top != TopMode::Search {
            return false;
        }
        self.mode = self.mode.toggle();
        true
    }

    /// The renderer to use.
    pub fn screen(&self) -> Screen {
        match (self.top, self.table) {
            (TopMode::Table, TableView::Summary) => Screen::Summary,
            (TopMode::Table, TableView::Graph) => Screen::ScatterGraph,
            (TopMode::Search, _) => Screen::Search(self.mode.into()),
        }
    }
}
