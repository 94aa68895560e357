//! Modal overlays.
//!
//! Each overlay is independent: opening one never closes another. The most
//! recently opened overlay that is still open is the *active* one; Esc and
//! clicks on the backdrop close it, clicks inside its body do nothing.
//! An alert is the exception: it ignores the mouse and closes only on a key.

use ratatui::layout::{Position, Rect};

use crate::grid::FigureName;

/// Identifies an overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModalKind {
    /// AEGL threshold values per tier/duration.
    AeglValues,
    /// Exposure windows, lag and time-to-dose per tier/duration.
    ExposureTimes,
    /// Chart viewer.
    Figure,
    /// Blocking error message.
    Alert,
}

impl ModalKind {
    /// Get display name.
    pub fn title(self) -> &'static str {
        match self {
            ModalKind::AeglValues => "AEGL Values",
            ModalKind::ExposureTimes => "Exposure Times",
            ModalKind::Figure => "Figure",
            ModalKind::Alert => "Alert",
        }
    }
}

/// One controlled overlay: an open flag plus the content it projects.
#[derive(Debug, Clone, Default)]
pub struct Modal<T> {
    open: bool,
    content: Option<T>,
    /// Vertical scroll offset of the body.
    pub scroll: u16,
    area: Option<Rect>,
}

impl<T> Modal<T> {
    /// Create a closed overlay.
    pub fn new() -> Self {
        Self {
            open: false,
            content: None,
            scroll: 0,
            area: None,
        }
    }

    /// Whether the overlay is visible.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Projected content.
    pub fn content(&self) -> Option<&T> {
        self.content.as_ref()
    }

    /// Mutable projected content.
    pub fn content_mut(&mut self) -> Option<&mut T> {
        self.content.as_mut()
    }

    /// Replace the projected content.
    pub fn set_content(&mut self, content: T) {
        self.content = Some(content);
        self.scroll = 0;
    }

    /// Drop the projected content.
    pub fn clear_content(&mut self) {
        self.content = None;
    }

    /// Screen area the body was last drawn in.
    pub fn area(&self) -> Option<Rect> {
        self.area
    }

    /// Record where the body was drawn, for backdrop hit-testing.
    pub fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    /// Scroll the body.
    pub fn scroll_by(&mut self, delta: i32) {
        self.scroll = (self.scroll as i32 + delta).clamp(0, u16::MAX as i32) as u16;
    }

    fn show(&mut self) {
        self.open = true;
    }

    fn hide(&mut self) {
        self.open = false;
        self.scroll = 0;
        self.area = None;
    }
}

/// One chart in the figure viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FigureEntry {
    /// Label shown in the title, e.g. `AEGL1_8hr · Vapor Flux`.
    pub label: String,
    /// Serialized chart payload.
    pub payload: String,
}

/// Charts the figure viewer can cycle through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FigureViewer {
    /// Entries in display order.
    pub entries: Vec<FigureEntry>,
    /// Entry currently shown.
    pub index: usize,
}

impl FigureViewer {
    /// Build a viewer from labelled payloads.
    pub fn new(entries: Vec<FigureEntry>) -> Self {
        Self { entries, index: 0 }
    }

    /// Build a viewer for one tier/duration figure set.
    pub fn from_figure_set(prefix: &str, set: &crate::grid::AeglFigureSet) -> Self {
        let entries = FigureName::ALL
            .into_iter()
            .filter_map(|figure| {
                set.get(figure).map(|payload| FigureEntry {
                    label: format!("{} · {}", prefix, figure.title()),
                    payload: payload.to_string(),
                })
            })
            .collect();
        Self::new(entries)
    }

    /// Entry currently shown.
    pub fn current(&self) -> Option<&FigureEntry> {
        self.entries.get(self.index)
    }

    /// Show the next entry, wrapping.
    pub fn next(&mut self) {
        if !self.entries.is_empty() {
            self.index = (self.index + 1) % self.entries.len();
        }
    }

    /// Show the previous entry, wrapping.
    pub fn prev(&mut self) {
        if !self.entries.is_empty() {
            self.index = (self.index + self.entries.len() - 1) % self.entries.len();
        }
    }
}

/// Outcome of a mouse click while overlays are open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// No overlay was open.
    NoModal,
    /// The click landed inside the active overlay's body.
    Inside(ModalKind),
    /// The click landed on the backdrop and closed the active overlay.
    Closed(ModalKind),
}

/// All overlays and their stacking order.
#[derive(Debug, Default)]
pub struct ModalLayer {
    /// AEGL values overlay.
    pub aegl_values: Modal<()>,
    /// Exposure times overlay.
    pub exposure_times: Modal<()>,
    /// Chart viewer overlay.
    pub figure: Modal<FigureViewer>,
    /// Blocking alert.
    pub alert: Modal<String>,
    stack: Vec<ModalKind>,
}

impl ModalLayer {
    /// Create a layer with everything closed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an overlay is open.
    pub fn is_open(&self, kind: ModalKind) -> bool {
        match kind {
            ModalKind::AeglValues => self.aegl_values.is_open(),
            ModalKind::ExposureTimes => self.exposure_times.is_open(),
            ModalKind::Figure => self.figure.is_open(),
            ModalKind::Alert => self.alert.is_open(),
        }
    }

    /// Whether any overlay is open.
    pub fn any_open(&self) -> bool {
        !self.stack.is_empty()
    }

    /// Open overlays from bottom to top.
    pub fn open_order(&self) -> &[ModalKind] {
        &self.stack
    }

    /// The top-most open overlay.
    pub fn active(&self) -> Option<ModalKind> {
        self.stack.last().copied()
    }

    /// Open an overlay (or raise it if already open).
    pub fn open(&mut self, kind: ModalKind) {
        self.stack.retain(|k| *k != kind);
        self.stack.push(kind);
        match kind {
            ModalKind::AeglValues => self.aegl_values.show(),
            ModalKind::ExposureTimes => self.exposure_times.show(),
            ModalKind::Figure => self.figure.show(),
            ModalKind::Alert => self.alert.show(),
        }
    }

    /// Close an overlay. Projected content is kept except for alerts.
    pub fn close(&mut self, kind: ModalKind) {
        self.stack.retain(|k| *k != kind);
        match kind {
            ModalKind::AeglValues => self.aegl_values.hide(),
            ModalKind::ExposureTimes => self.exposure_times.hide(),
            ModalKind::Figure => self.figure.hide(),
            ModalKind::Alert => {
                self.alert.hide();
                self.alert.clear_content();
            },
        }
    }

    /// Open when closed, close when open.
    pub fn toggle(&mut self, kind: ModalKind) {
        if self.is_open(kind) {
            self.close(kind);
        } else {
            self.open(kind);
        }
    }

    /// Show a blocking alert on top of everything.
    pub fn alert(&mut self, message: impl Into<String>) {
        self.alert.set_content(message.into());
        self.open(ModalKind::Alert);
    }

    /// Close the active overlay (Esc).
    pub fn close_active(&mut self) -> Option<ModalKind> {
        let kind = self.active()?;
        self.close(kind);
        Some(kind)
    }

    /// Route a click at a screen position.
    pub fn handle_click(&mut self, column: u16, row: u16) -> ClickOutcome {
        let Some(kind) = self.active() else {
            return ClickOutcome::NoModal;
        };
        // Only Enter or Esc dismiss an alert
        if kind == ModalKind::Alert {
            return ClickOutcome::Inside(kind);
        }

        let inside = self
            .area_of(kind)
            .is_some_and(|area| area.contains(Position::new(column, row)));

        if inside {
            ClickOutcome::Inside(kind)
        } else {
            self.close(kind);
            ClickOutcome::Closed(kind)
        }
    }

    /// Record where an overlay was drawn.
    pub fn set_area(&mut self, kind: ModalKind, area: Rect) {
        match kind {
            ModalKind::AeglValues => self.aegl_values.set_area(area),
            ModalKind::ExposureTimes => self.exposure_times.set_area(area),
            ModalKind::Figure => self.figure.set_area(area),
            ModalKind::Alert => self.alert.set_area(area),
        }
    }

    fn area_of(&self, kind: ModalKind) -> Option<Rect> {
        match kind {
            ModalKind::AeglValues => self.aegl_values.area(),
            ModalKind::ExposureTimes => self.exposure_times.area(),
            ModalKind::Figure => self.figure.area(),
            ModalKind::Alert => self.alert.area(),
        }
    }

    /// Scroll the active overlay's body. Alerts do not scroll.
    pub fn scroll_active(&mut self, delta: i32) {
        match self.active() {
            Some(ModalKind::AeglValues) => self.aegl_values.scroll_by(delta),
            Some(ModalKind::ExposureTimes) => self.exposure_times.scroll_by(delta),
            Some(ModalKind::Figure) => self.figure.scroll_by(delta),
            Some(ModalKind::Alert) | None => {},
        }
    }

    /// Close every overlay that projects analysis data.
    pub fn close_result_views(&mut self) {
        for kind in [ModalKind::AeglValues, ModalKind::ExposureTimes, ModalKind::Figure] {
            self.close(kind);
        }
        self.figure.clear_content();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlays_are_independent() {
        let mut modals = ModalLayer::new();
        modals.open(ModalKind::AeglValues);
        modals.open(ModalKind::ExposureTimes);
        assert!(modals.is_open(ModalKind::AeglValues));
        assert!(modals.is_open(ModalKind::ExposureTimes));

        modals.toggle(ModalKind::AeglValues);
        assert!(!modals.is_open(ModalKind::AeglValues));
        assert!(modals.is_open(ModalKind::ExposureTimes));

        modals.toggle(ModalKind::AeglValues);
        modals.toggle(ModalKind::ExposureTimes);
        assert!(modals.is_open(ModalKind::AeglValues));
        assert!(!modals.is_open(ModalKind::ExposureTimes));
    }

    #[test]
    fn escape_closes_most_recent_first() {
        let mut modals = ModalLayer::new();
        modals.open(ModalKind::ExposureTimes);
        modals.open(ModalKind::AeglValues);
        assert_eq!(modals.close_active(), Some(ModalKind::AeglValues));
        assert_eq!(modals.active(), Some(ModalKind::ExposureTimes));
        assert_eq!(modals.close_active(), Some(ModalKind::ExposureTimes));
        assert_eq!(modals.close_active(), None);
    }

    #[test]
    fn backdrop_click_closes_but_inner_click_does_not() {
        let mut modals = ModalLayer::new();
        modals.open(ModalKind::AeglValues);
        modals.set_area(ModalKind::AeglValues, Rect::new(10, 5, 20, 10));

        assert_eq!(
            modals.handle_click(15, 8),
            ClickOutcome::Inside(ModalKind::AeglValues)
        );
        assert!(modals.is_open(ModalKind::AeglValues));

        assert_eq!(
            modals.handle_click(2, 2),
            ClickOutcome::Closed(ModalKind::AeglValues)
        );
        assert!(!modals.is_open(ModalKind::AeglValues));
        assert_eq!(modals.handle_click(2, 2), ClickOutcome::NoModal);
    }

    #[test]
    fn alert_ignores_backdrop_clicks_and_wheel() {
        let mut modals = ModalLayer::new();
        modals.open(ModalKind::AeglValues);
        modals.alert("not found");
        modals.set_area(ModalKind::Alert, Rect::new(20, 10, 40, 6));

        assert_eq!(modals.handle_click(0, 0), ClickOutcome::Inside(ModalKind::Alert));
        assert_eq!(modals.active(), Some(ModalKind::Alert));
        assert!(modals.is_open(ModalKind::AeglValues));

        modals.scroll_active(3);
        assert_eq!(modals.alert.scroll, 0);

        modals.close_active();
        assert_eq!(
            modals.handle_click(0, 0),
            ClickOutcome::Closed(ModalKind::AeglValues)
        );
    }

    #[test]
    fn reopening_keeps_projected_content() {
        let mut modals = ModalLayer::new();
        modals.figure.set_content(FigureViewer::new(vec![
            FigureEntry { label: "a".into(), payload: "{}".into() },
            FigureEntry { label: "b".into(), payload: "{}".into() },
        ]));
        modals.open(ModalKind::Figure);
        if let Some(viewer) = modals.figure.content_mut() {
            viewer.next();
        }
        modals.close(ModalKind::Figure);
        modals.open(ModalKind::Figure);

        let viewer = modals.figure.content().unwrap();
        assert_eq!(viewer.current().map(|e| e.label.as_str()), Some("b"));
    }

    #[test]
    fn alert_sits_on_top_and_discards_message_on_close() {
        let mut modals = ModalLayer::new();
        modals.open(ModalKind::AeglValues);
        modals.alert("not found");
        assert_eq!(modals.active(), Some(ModalKind::Alert));
        assert_eq!(modals.alert.content().map(String::as_str), Some("not found"));

        modals.close_active();
        assert!(modals.alert.content().is_none());
        assert!(modals.is_open(ModalKind::AeglValues));
    }

    #[test]
    fn viewer_cycles_in_both_directions() {
        let mut viewer = FigureViewer::new(vec![
            FigureEntry { label: "a".into(), payload: String::new() },
            FigureEntry { label: "b".into(), payload: String::new() },
            FigureEntry { label: "c".into(), payload: String::new() },
        ]);
        viewer.prev();
        assert_eq!(viewer.index, 2);
        viewer.next();
        assert_eq!(viewer.index, 0);
    }
}
