//! Keymap help bar UI component.

use crate::app::App;
use crate::modal::ModalKind;
use crate::ui::ThemeColors;
use crate::view::TopMode;
use ratatui::{layout::Rect, style::Style, widgets::Paragraph, Frame};

/// Draw the keymap help bar.
pub(super) fn draw_keymap(f: &mut Frame<'_>, app: &App, area: Rect, colors: &ThemeColors) {
    let keymap_text = match app.modals.active() {
        Some(ModalKind::Alert) => "Enter/Esc:dismiss",
        Some(ModalKind::Figure) => "←→/hl:cycle | Esc:close | click outside:close",
        Some(_) => "jk/↑↓:scroll | a/e:toggle | Esc:close | click outside:close",
        None if app.editing => "Enter:analyze | Tab/↓↑:suggestions | Esc:done | Type to search",
        None => match app.view.top {
            TopMode::Table => "q:quit | v:search | g:summary/graph | jk:rows | hl:columns | r:reload | T:theme",
            TopMode::Search => {
                "q:quit | /:search | m:mode | jk:select | Enter:figures | a:AEGL | e:exposure | y:copy | v:table | T:theme"
            },
        },
    };

    let paragraph =
        Paragraph::new(keymap_text).style(Style::default().fg(colors.text).bg(colors.bg));

    f.render_widget(paragraph, area);
}
