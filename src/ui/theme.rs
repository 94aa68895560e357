//! Color themes for the UI.

use crate::app::Theme;
use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Background color.
    pub bg: Color,
    /// Overlay background color.
    pub overlay_bg: Color,
    /// Primary text color.
    pub text: Color,
    /// Heading text color.
    pub heading: Color,
    /// Label text color.
    pub label: Color,
    /// Value text color.
    pub value: Color,
    /// Border color.
    pub border: Color,
    /// Cursor foreground color.
    pub cursor_fg: Color,
    /// Cursor background color.
    pub cursor_bg: Color,
    /// Status bar foreground color.
    pub status_fg: Color,
    /// Status bar background color.
    pub status_bg: Color,
    /// Muted text (placeholders, hints).
    pub muted: Color,
    /// Warning color.
    pub warning: Color,
    /// Error color.
    pub error: Color,
    /// Per-tier accents for AEGL-1, AEGL-2 and AEGL-3.
    pub tiers: [Color; 3],
    /// Chart series colors, cycled by trace index.
    pub series: [Color; 6],
}

impl ThemeColors {
    /// Create color palette from theme.
    pub fn from_theme(theme: &Theme) -> Self {
        match theme {
            Theme::GruvboxDark => Self {
                bg: Color::Rgb(40, 40, 40),
                overlay_bg: Color::Rgb(50, 48, 47),
                text: Color::Rgb(235, 219, 178),
                heading: Color::Rgb(251, 184, 108),
                label: Color::Rgb(184, 187, 38),
                value: Color::Rgb(142, 192, 124),
                border: Color::Rgb(102, 92, 84),
                cursor_fg: Color::Rgb(40, 40, 40),
                cursor_bg: Color::Rgb(251, 184, 108),
                status_fg: Color::Rgb(235, 219, 178),
                status_bg: Color::Rgb(60, 56, 54),
                muted: Color::Rgb(146, 131, 116),
                warning: Color::Rgb(250, 189, 47),
                error: Color::Rgb(251, 73, 52),
                tiers: [
                    Color::Rgb(250, 189, 47),
                    Color::Rgb(254, 128, 25),
                    Color::Rgb(251, 73, 52),
                ],
                series: [
                    Color::Rgb(131, 165, 152),
                    Color::Rgb(254, 128, 25),
                    Color::Rgb(184, 187, 38),
                    Color::Rgb(211, 134, 155),
                    Color::Rgb(142, 192, 124),
                    Color::Rgb(250, 189, 47),
                ],
            },
            Theme::GruvboxLight => Self {
                bg: Color::Rgb(251, 245, 234),
                overlay_bg: Color::Rgb(242, 229, 188),
                text: Color::Rgb(60, 56, 54),
                heading: Color::Rgb(175, 58, 3),
                label: Color::Rgb(121, 116, 14),
                value: Color::Rgb(102, 123, 3),
                border: Color::Rgb(213, 196, 161),
                cursor_fg: Color::Rgb(251, 245, 234),
                cursor_bg: Color::Rgb(175, 58, 3),
                status_fg: Color::Rgb(60, 56, 54),
                status_bg: Color::Rgb(235, 219, 178),
                muted: Color::Rgb(124, 111, 100),
                warning: Color::Rgb(181, 118, 20),
                error: Color::Rgb(157, 0, 6),
                tiers: [
                    Color::Rgb(181, 118, 20),
                    Color::Rgb(175, 58, 3),
                    Color::Rgb(157, 0, 6),
                ],
                series: [
                    Color::Rgb(7, 102, 120),
                    Color::Rgb(175, 58, 3),
                    Color::Rgb(121, 116, 14),
                    Color::Rgb(143, 63, 113),
                    Color::Rgb(66, 123, 88),
                    Color::Rgb(181, 118, 20),
                ],
            },
        }
    }

    /// Accent for an AEGL tier (1-based). Unknown tiers use the label color.
    pub fn tier(&self, level: Option<u8>) -> Color {
        match level {
            Some(l @ 1..=3) => self.tiers[usize::from(l - 1)],
            _ => self.label,
        }
    }

    /// Color for the n-th chart series.
    pub fn series(&self, index: usize) -> Color {
        self.series[index % self.series.len()]
    }
}
