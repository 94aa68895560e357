//! Clipboard integration.

use crate::api::AnalysisResult;
use crate::error::Result;
use crate::grid::GroupedFigures;
use crate::report::analysis_report;
use arboard::Clipboard;

/// Copy text to clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text)?;
    Ok(())
}

/// Copy a plain-text report of an analysis result to the clipboard.
pub fn copy_analysis_report(result: &AnalysisResult, grouped: Option<&GroupedFigures>) -> Result<()> {
    let text = analysis_report(result, grouped);
    tracing::debug!(bytes = text.len(), "copying analysis report");
    copy_to_clipboard(&text)
}
