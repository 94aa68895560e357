//! Summary table view state.

use crate::api::SummaryRow;

/// Scroll and selection state for the combined summary table.
#[derive(Debug, Default)]
pub struct SummaryTable {
    columns: Vec<String>,
    /// Selected row.
    pub cursor: usize,
    /// First visible row.
    pub row_offset: usize,
    /// First visible data column (the compound column is always shown).
    pub col_offset: usize,
}

impl SummaryTable {
    /// Create an empty table state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild columns for freshly loaded rows and reset scrolling.
    pub fn load(&mut self, rows: &[SummaryRow]) {
        self.columns = SummaryRow::columns(rows);
        self.cursor = 0;
        self.row_offset = 0;
        self.col_offset = 0;
    }

    /// All columns in display order, starting with `Compound`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Columns after the pinned compound column.
    pub fn data_columns(&self) -> &[String] {
        self.columns.get(1..).unwrap_or(&[])
    }

    /// Move the cursor up.
    pub fn cursor_up(&mut self, amount: usize) {
        self.cursor = self.cursor.saturating_sub(amount);
    }

    /// Move the cursor down, bounded by the row count.
    pub fn cursor_down(&mut self, amount: usize, row_count: usize) {
        if row_count == 0 {
            return;
        }
        self.cursor = (self.cursor + amount).min(row_count - 1);
    }

    /// Scroll columns left.
    pub fn scroll_left(&mut self) {
        self.col_offset = self.col_offset.saturating_sub(1);
    }

    /// Scroll columns right, keeping at least one data column visible.
    pub fn scroll_right(&mut self) {
        if self.col_offset + 1 < self.data_columns().len() {
            self.col_offset += 1;
        }
    }

    /// Adjust the row offset to keep the cursor visible.
    pub fn adjust_scroll(&mut self, viewport_height: usize) {
        if viewport_height == 0 {
            return;
        }

        if self.cursor < self.row_offset {
            self.row_offset = self.cursor;
        }

        if self.cursor >= self.row_offset + viewport_height {
            self.row_offset = self.cursor.saturating_sub(viewport_height - 1);
        }
    }
}
