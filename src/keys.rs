//! Keyboard and mouse routing.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::app::App;
use crate::modal::ModalKind;
use crate::view::TopMode;

const HELP: &str =
    "Help: /=search, m=mode, Enter=figures, a=AEGL, e=exposure, v=table, y=copy, q=quit";

impl App {
    /// Route one key press. Returns `true` to quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if let (KeyModifiers::CONTROL, KeyCode::Char('c')) = (key.modifiers, key.code) {
            return true;
        }

        // Alert blocks everything else until dismissed
        if self.modals.active() == Some(ModalKind::Alert) {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.escape();
            }
            return false;
        }

        if let Some(active) = self.modals.active() {
            self.handle_overlay_key(active, key);
            return false;
        }

        if self.editing {
            self.handle_input_key(key);
            return false;
        }

        match (key.modifiers, key.code) {
            // Quit
            (KeyModifiers::NONE, KeyCode::Char('q')) => return true,

            // Screens and modes
            (KeyModifiers::NONE, KeyCode::Char('v')) => self.toggle_top(),
            (KeyModifiers::NONE, KeyCode::Char('g')) => self.toggle_table_view(),
            (KeyModifiers::NONE, KeyCode::Char('m')) => self.toggle_mode(),
            (KeyModifiers::NONE, KeyCode::Char('r')) => self.reload_table(),
            (KeyModifiers::NONE, KeyCode::Char('/')) | (KeyModifiers::NONE, KeyCode::Char('i')) => {
                if self.view.top == TopMode::Search {
                    self.start_editing();
                }
            },

            // Navigation
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                self.cursor_up(1)
            },
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                self.cursor_down(1)
            },
            (KeyModifiers::CONTROL, KeyCode::Char('f')) => self.cursor_down(15),
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => self.cursor_up(15),
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h')) => {
                self.summary.scroll_left()
            },
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l')) => {
                self.summary.scroll_right()
            },

            // Results
            (KeyModifiers::NONE, KeyCode::Enter) => self.open_figures(),
            (KeyModifiers::NONE, KeyCode::Char('a')) => self.toggle_modal(ModalKind::AeglValues),
            (KeyModifiers::NONE, KeyCode::Char('e')) => {
                self.toggle_modal(ModalKind::ExposureTimes)
            },
            (KeyModifiers::CONTROL, KeyCode::Char('d')) | (KeyModifiers::SHIFT, KeyCode::Char('J')) => {
                self.scroll_results_down()
            },
            (KeyModifiers::CONTROL, KeyCode::Char('u')) | (KeyModifiers::SHIFT, KeyCode::Char('K')) => {
                self.scroll_results_up()
            },

            // Features
            (KeyModifiers::NONE, KeyCode::Char('y')) => self.copy_report(),
            (KeyModifiers::SHIFT, KeyCode::Char('T')) => self.cycle_theme(),
            (KeyModifiers::SHIFT, KeyCode::Char('?')) => self.status = HELP.to_string(),

            _ => {},
        }
        false
    }

    fn handle_overlay_key(&mut self, active: ModalKind, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Esc) | (KeyModifiers::NONE, KeyCode::Char('q')) => {
                self.escape();
            },
            (KeyModifiers::NONE, KeyCode::Left) | (KeyModifiers::NONE, KeyCode::Char('h'))
                if active == ModalKind::Figure =>
            {
                if let Some(viewer) = self.modals.figure.content_mut() {
                    viewer.prev();
                }
            },
            (KeyModifiers::NONE, KeyCode::Right) | (KeyModifiers::NONE, KeyCode::Char('l'))
                if active == ModalKind::Figure =>
            {
                if let Some(viewer) = self.modals.figure.content_mut() {
                    viewer.next();
                }
            },
            (KeyModifiers::NONE, KeyCode::Up) | (KeyModifiers::NONE, KeyCode::Char('k')) => {
                self.modals.scroll_active(-1);
            },
            (KeyModifiers::NONE, KeyCode::Down) | (KeyModifiers::NONE, KeyCode::Char('j')) => {
                self.modals.scroll_active(1);
            },
            (KeyModifiers::NONE, KeyCode::Char('a')) => self.toggle_modal(ModalKind::AeglValues),
            (KeyModifiers::NONE, KeyCode::Char('e')) => {
                self.toggle_modal(ModalKind::ExposureTimes)
            },
            _ => {},
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Enter) => self.submit_search(),
            (_, KeyCode::Esc) => self.stop_editing(),
            (_, KeyCode::Tab) | (_, KeyCode::Down) => self.suggestions.select_next(),
            (_, KeyCode::BackTab) | (_, KeyCode::Up) => self.suggestions.select_prev(),
            (_, KeyCode::Backspace) => self.backspace(),
            (KeyModifiers::NONE, KeyCode::Char(c)) | (KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input(c)
            },
            _ => {},
        }
    }

    /// Route one mouse event.
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.click(mouse.column, mouse.row),
            MouseEventKind::ScrollDown => self.modals.scroll_active(1),
            MouseEventKind::ScrollUp => self.modals.scroll_active(-1),
            _ => {},
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{AnalysisApi, AnalysisMode, AnalysisResult, CompoundQuery, SummaryRow};
    use crate::Result;
    use ratatui::layout::Rect;
    use std::sync::Arc;

    #[derive(Debug)]
    struct NoApi;

    impl AnalysisApi for NoApi {
        fn compound_names(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn analyze(&self, _query: &CompoundQuery) -> Result<AnalysisResult> {
            Err(crate::DashError::api(500, "unused"))
        }

        fn combined_summary(&self) -> Result<Vec<SummaryRow>> {
            Ok(Vec::new())
        }

        fn scatter_graph(&self) -> Result<String> {
            Ok(String::new())
        }
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn idle_app() -> App {
        let mut app = App::new(Arc::new(NoApi), AnalysisMode::Gaseous);
        app.stop_editing();
        app
    }

    #[test]
    fn alert_swallows_everything_but_enter_and_esc() {
        let mut app = idle_app();
        app.modals.alert("not found");

        for c in ['a', 'e', 'q', 'm'] {
            let code = KeyCode::Char(c);
            assert!(!app.handle_key(press(code)));
            assert_eq!(app.modals.active(), Some(ModalKind::Alert));
        }
        assert_eq!(app.view.mode, AnalysisMode::Gaseous);

        assert!(!app.handle_key(press(KeyCode::Enter)));
        assert!(!app.modals.any_open());
        assert!(app.handle_key(press(KeyCode::Char('q'))));
    }

    #[test]
    fn mouse_cannot_dismiss_alert() {
        let mut app = idle_app();
        app.modals.alert("not found");
        app.modals.set_area(ModalKind::Alert, Rect::new(20, 10, 40, 6));

        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.modals.active(), Some(ModalKind::Alert));

        assert!(!app.handle_key(press(KeyCode::Esc)));
        assert!(!app.modals.any_open());
    }

    #[test]
    fn typing_goes_to_search_input_while_editing() {
        let mut app = idle_app();
        app.handle_key(press(KeyCode::Char('/')));
        assert!(app.editing);

        assert!(!app.handle_key(press(KeyCode::Char('q'))));
        assert_eq!(app.query, "q");

        app.handle_key(press(KeyCode::Esc));
        assert!(!app.editing);
    }
}
