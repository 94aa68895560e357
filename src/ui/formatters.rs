//! Shared formatting utilities for UI components.

use serde_json::Value;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::api::ReachTime;

/// Format a measured quantity with smart precision.
pub fn format_stat_value(val: f64) -> String {
    if !val.is_finite() {
        return if val.is_nan() {
            "NaN".to_string()
        } else if val.is_sign_positive() {
            "+Inf".to_string()
        } else {
            "-Inf".to_string()
        };
    }
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e6).contains(&abs_val) {
        format!("{:.3e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.2}", val)
    } else if abs_val >= 1.0 {
        format!("{:.4}", val)
    } else {
        format!("{:.5}", val)
    }
}

/// Format an optional quantity, with a dash for missing values.
pub fn format_opt(val: Option<f64>) -> String {
    val.map(format_stat_value).unwrap_or_else(|| "—".to_string())
}

/// Format a duration in hours.
pub fn format_hours(hours: Option<f64>) -> String {
    match hours {
        Some(h) if h.is_finite() && h < 1.0 => format!("{:.1} min", h * 60.0),
        Some(h) => format!("{} h", format_stat_value(h)),
        None => "—".to_string(),
    }
}

/// Format a time-to-dose value.
pub fn format_reach(reach: Option<&ReachTime>) -> String {
    match reach {
        Some(ReachTime::Hours(h)) => format_hours(Some(*h)),
        Some(ReachTime::Failed(reason)) => reason.clone(),
        None => "—".to_string(),
    }
}

/// Render a raw JSON cell for a table.
pub fn format_cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.as_f64().map(format_stat_value).unwrap_or_default(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|v| format_cell(Some(v)))
            .collect::<Vec<_>>()
            .join(", "),
        Some(other) => other.to_string(),
    }
}

/// Truncate to a display width, marking the cut with an ellipsis.
pub fn truncate(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Format axis label with smart precision.
pub fn format_axis_label(val: f64) -> String {
    if !val.is_finite() {
        return "?".to_string();
    }
    let abs_val = val.abs();
    if abs_val == 0.0 {
        "0".to_string()
    } else if !(1e-2..1e5).contains(&abs_val) {
        format!("{:.1e}", val)
    } else if abs_val >= 100.0 {
        format!("{:.0}", val)
    } else if abs_val >= 1.0 {
        format!("{:.1}", val)
    } else {
        format!("{:.2}", val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_durations_are_shown_in_minutes() {
        assert_eq!(format_hours(Some(0.5)), "30.0 min");
        assert_eq!(format_hours(Some(8.0)), "8.0000 h");
        assert_eq!(format_hours(None), "—");
    }

    #[test]
    fn failed_reach_time_shows_reason() {
        let failed = ReachTime::Failed("FindRootFailed".into());
        assert_eq!(format_reach(Some(&failed)), "FindRootFailed");
    }

    #[test]
    fn cells_render_lists_and_blanks() {
        assert_eq!(format_cell(Some(&json!(["P-F", "ester"]))), "P-F, ester");
        assert_eq!(format_cell(Some(&Value::Null)), "");
        assert_eq!(format_cell(None), "");
        assert_eq!(format_cell(Some(&json!(140.1))), "140.10");
    }

    #[test]
    fn truncation_respects_display_width() {
        assert_eq!(truncate("Sarin", 10), "Sarin");
        assert_eq!(truncate("Cyclosarin", 6), "Cyclo…");
        assert_eq!(truncate("abc", 0), "");
    }
}
