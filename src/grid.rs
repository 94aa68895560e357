//! AEGL figure grid grouping.
//!
//! The aqueous model returns a flat map whose keys follow the grammar
//!
//! ```text
//! key    := prefix "_" figure
//! prefix := "AEGL" tier "_" duration      (anything else sorts last)
//! tier   := digit
//! figure := "vaporAbsorption" | "liquidAbsorption" | "vaporFlux" | "liquidFlux"
//! ```
//!
//! Keys are split at their last underscore. Keys that do not fit are kept as
//! [`IgnoredKey`] entries so callers can report them.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::{DashError, Result};

/// Duration labels in display order (longest exposure first).
pub const DURATION_ORDER: [&str; 5] = ["8hr", "4hr", "60min", "30min", "10min"];

/// Tier assigned to prefixes without a recognizable tier.
pub const UNKNOWN_TIER: u8 = 9;

/// Rank assigned to durations outside [`DURATION_ORDER`].
pub const UNKNOWN_DURATION_RANK: u8 = 99;

/// The four charts produced per tier/duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FigureName {
    /// Absorbed dose from vapour contact.
    VaporAbsorption,
    /// Absorbed dose from liquid contact.
    LiquidAbsorption,
    /// Dermal flux from vapour contact.
    VaporFlux,
    /// Dermal flux from liquid contact.
    LiquidFlux,
}

impl FigureName {
    /// All figures in display order.
    pub const ALL: [FigureName; 4] = [
        FigureName::VaporAbsorption,
        FigureName::LiquidAbsorption,
        FigureName::VaporFlux,
        FigureName::LiquidFlux,
    ];

    /// Key suffix used by the server.
    pub fn key(self) -> &'static str {
        match self {
            FigureName::VaporAbsorption => "vaporAbsorption",
            FigureName::LiquidAbsorption => "liquidAbsorption",
            FigureName::VaporFlux => "vaporFlux",
            FigureName::LiquidFlux => "liquidFlux",
        }
    }

    /// Human readable title.
    pub fn title(self) -> &'static str {
        match self {
            FigureName::VaporAbsorption => "Vapor Absorption",
            FigureName::LiquidAbsorption => "Liquid Absorption",
            FigureName::VaporFlux => "Vapor Flux",
            FigureName::LiquidFlux => "Liquid Flux",
        }
    }

    /// Parse a key suffix. Matching is exact.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Charts accumulated for one prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AeglFigureSet {
    figures: [Option<String>; 4],
}

impl AeglFigureSet {
    fn slot(figure: FigureName) -> usize {
        match figure {
            FigureName::VaporAbsorption => 0,
            FigureName::LiquidAbsorption => 1,
            FigureName::VaporFlux => 2,
            FigureName::LiquidFlux => 3,
        }
    }

    /// Payload for a figure, if present.
    pub fn get(&self, figure: FigureName) -> Option<&str> {
        self.figures[Self::slot(figure)].as_deref()
    }

    /// Store a payload, replacing any previous one.
    pub fn insert(&mut self, figure: FigureName, payload: String) {
        self.figures[Self::slot(figure)] = Some(payload);
    }

    /// Present figures in display order.
    pub fn present(&self) -> Vec<FigureName> {
        FigureName::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_some())
            .collect()
    }

    /// Number of present figures.
    pub fn len(&self) -> usize {
        self.figures.iter().filter(|f| f.is_some()).count()
    }

    /// Whether no figure is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Why a key was left out of the grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The key contains no underscore.
    NoSeparator,
    /// Nothing precedes the last underscore.
    EmptyPrefix,
    /// The suffix is not one of the four known figures.
    UnknownFigure(String),
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::NoSeparator => write!(f, "no '_' separator"),
            IgnoreReason::EmptyPrefix => write!(f, "empty tier/duration prefix"),
            IgnoreReason::UnknownFigure(name) => write!(f, "unknown figure '{}'", name),
        }
    }
}

/// Result of parsing one composite key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyOutcome<'a> {
    /// A recognized figure key.
    Figure {
        /// Tier/duration prefix, e.g. `AEGL2_8hr`.
        prefix: &'a str,
        /// Which chart the payload is.
        figure: FigureName,
    },
    /// A key that does not fit the grammar.
    Ignored(IgnoreReason),
}

/// Parse a composite key such as `AEGL2_8hr_vaporFlux`.
pub fn parse_key(key: &str) -> KeyOutcome<'_> {
    let Some((prefix, suffix)) = key.rsplit_once('_') else {
        return KeyOutcome::Ignored(IgnoreReason::NoSeparator);
    };

    let Some(figure) = FigureName::from_key(suffix) else {
        return KeyOutcome::Ignored(IgnoreReason::UnknownFigure(suffix.to_string()));
    };

    if prefix.is_empty() {
        return KeyOutcome::Ignored(IgnoreReason::EmptyPrefix);
    }

    KeyOutcome::Figure { prefix, figure }
}

/// Tier and duration rank of a prefix, used for ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TierDuration {
    /// AEGL tier, or [`UNKNOWN_TIER`].
    pub tier: u8,
    /// Position in [`DURATION_ORDER`], or [`UNKNOWN_DURATION_RANK`].
    pub duration_rank: u8,
}

impl TierDuration {
    /// Extract tier and duration from `AEGL<digit>_<duration>`.
    pub fn from_prefix(prefix: &str) -> Self {
        let unknown = Self {
            tier: UNKNOWN_TIER,
            duration_rank: UNKNOWN_DURATION_RANK,
        };

        let Some(rest) = prefix.strip_prefix("AEGL") else {
            return unknown;
        };
        let mut chars = rest.chars();
        let (Some(digit), Some('_')) = (chars.next(), chars.next()) else {
            return unknown;
        };
        let Some(tier) = digit.to_digit(10) else {
            return unknown;
        };
        let duration = chars.as_str();
        if duration.is_empty() {
            return unknown;
        }

        let duration_rank = DURATION_ORDER
            .iter()
            .position(|d| *d == duration)
            .map(|p| p as u8)
            .unwrap_or(UNKNOWN_DURATION_RANK);

        Self {
            tier: tier as u8,
            duration_rank,
        }
    }
}

/// Compare two prefixes by tier, then duration rank, then text.
pub fn compare_prefixes(a: &str, b: &str) -> Ordering {
    TierDuration::from_prefix(a)
        .cmp(&TierDuration::from_prefix(b))
        .then_with(|| a.cmp(b))
}

/// Sort prefixes into display order.
pub fn sort_prefixes<S: AsRef<str>>(prefixes: &mut [S]) {
    prefixes.sort_by(|a, b| compare_prefixes(a.as_ref(), b.as_ref()));
}

/// A key that was not grouped, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IgnoredKey {
    /// The original key.
    pub key: String,
    /// Why it was ignored.
    pub reason: IgnoreReason,
}

/// Figures grouped by prefix, in display order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedFigures {
    groups: HashMap<String, AeglFigureSet>,
    order: Vec<String>,
    ignored: Vec<IgnoredKey>,
}

impl GroupedFigures {
    /// Group flat `(key, payload)` entries.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut grouped = Self::default();

        for (key, payload) in entries {
            let key = key.as_ref();
            match parse_key(key) {
                KeyOutcome::Figure { prefix, figure } => {
                    grouped
                        .groups
                        .entry(prefix.to_string())
                        .or_default()
                        .insert(figure, payload.into());
                },
                KeyOutcome::Ignored(reason) => {
                    tracing::debug!(key, %reason, "ignoring AEGL grid key");
                    grouped.ignored.push(IgnoredKey {
                        key: key.to_string(),
                        reason,
                    });
                },
            }
        }

        grouped.order = grouped.groups.keys().cloned().collect();
        sort_prefixes(&mut grouped.order);
        grouped
    }

    /// Group a JSON grid as returned by the server.
    ///
    /// String values are taken verbatim; other values are re-serialized.
    pub fn from_json(grid: &Map<String, Value>) -> Self {
        Self::from_entries(grid.iter().map(|(key, value)| {
            let payload = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (key.as_str(), payload)
        }))
    }

    /// Group the grid found in a saved document.
    ///
    /// Accepts a full `/analyze` response (grid under `aeglGraphGrid`) or a
    /// bare grid object.
    pub fn from_document(document: &Value) -> Result<Self> {
        let object = document
            .as_object()
            .ok_or_else(|| DashError::malformed("expected a JSON object"))?;

        match object.get("aeglGraphGrid") {
            Some(Value::Object(grid)) => Ok(Self::from_json(grid)),
            Some(Value::Null) => Ok(Self::default()),
            Some(_) => Err(DashError::malformed("'aeglGraphGrid' is not an object")),
            None if object.contains_key("compound") => Ok(Self::default()),
            None => Ok(Self::from_json(object)),
        }
    }

    /// Prefixes in display order.
    pub fn prefixes(&self) -> &[String] {
        &self.order
    }

    /// Figure set for a prefix.
    pub fn get(&self, prefix: &str) -> Option<&AeglFigureSet> {
        self.groups.get(prefix)
    }

    /// Groups in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AeglFigureSet)> + '_ {
        self.order
            .iter()
            .filter_map(|p| self.groups.get(p).map(|set| (p.as_str(), set)))
    }

    /// Keys that did not fit the grammar, in input order.
    pub fn ignored(&self) -> &[IgnoredKey] {
        &self.ignored
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether no group was formed.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Back to flat `(key, payload)` entries, in display order.
    pub fn flatten(&self) -> Vec<(String, String)> {
        self.iter()
            .flat_map(|(prefix, set)| {
                set.present().into_iter().filter_map(move |figure| {
                    set.get(figure)
                        .map(|payload| (format!("{}_{}", prefix, figure.key()), payload.to_string()))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sorts_by_tier_then_duration() {
        let mut prefixes = vec!["AEGL1_30min", "AEGL2_8hr", "AEGL1_8hr"];
        sort_prefixes(&mut prefixes);
        assert_eq!(prefixes, vec!["AEGL1_8hr", "AEGL1_30min", "AEGL2_8hr"]);
    }

    #[test]
    fn unmatched_prefixes_sort_last() {
        let mut prefixes = vec!["custom", "AEGL3_10min", "AEGL1_2hr", "AEGL1_4hr"];
        sort_prefixes(&mut prefixes);
        assert_eq!(prefixes, vec!["AEGL1_4hr", "AEGL1_2hr", "AEGL3_10min", "custom"]);
    }

    #[test]
    fn tier_duration_extraction() {
        assert_eq!(
            TierDuration::from_prefix("AEGL2_60min"),
            TierDuration { tier: 2, duration_rank: 2 }
        );
        assert_eq!(
            TierDuration::from_prefix("AEGLx_8hr"),
            TierDuration { tier: UNKNOWN_TIER, duration_rank: UNKNOWN_DURATION_RANK }
        );
        assert_eq!(
            TierDuration::from_prefix("AEGL3_"),
            TierDuration { tier: UNKNOWN_TIER, duration_rank: UNKNOWN_DURATION_RANK }
        );
    }

    #[test]
    fn parse_key_outcomes() {
        assert_eq!(
            parse_key("AEGL2_8hr_vaporFlux"),
            KeyOutcome::Figure { prefix: "AEGL2_8hr", figure: FigureName::VaporFlux }
        );
        assert_eq!(
            parse_key("noUnderscoreKey"),
            KeyOutcome::Ignored(IgnoreReason::NoSeparator)
        );
        assert_eq!(
            parse_key("random_key"),
            KeyOutcome::Ignored(IgnoreReason::UnknownFigure("key".into()))
        );
        assert_eq!(
            parse_key("_liquidFlux"),
            KeyOutcome::Ignored(IgnoreReason::EmptyPrefix)
        );
    }

    #[test]
    fn groups_and_excludes_bad_keys() {
        let grid = json!({
            "AEGL2_8hr_vaporFlux": "{\"data\": []}",
            "AEGL1_30min_liquidAbsorption": "{}",
            "random_key": "x",
            "AEGL1_8hr_vaporAbsorption": "{}",
            "noUnderscoreKey": "y",
            "AEGL1_8hr_liquidFlux": "{}"
        });
        let grouped = GroupedFigures::from_json(grid.as_object().unwrap());

        assert_eq!(grouped.prefixes(), ["AEGL1_8hr", "AEGL1_30min", "AEGL2_8hr"]);
        assert_eq!(
            grouped.get("AEGL1_8hr").unwrap().present(),
            vec![FigureName::VaporAbsorption, FigureName::LiquidFlux]
        );
        let ignored: Vec<&str> = grouped.ignored().iter().map(|i| i.key.as_str()).collect();
        assert_eq!(ignored, vec!["random_key", "noUnderscoreKey"]);
        assert!(grouped.get("random").is_none());
    }

    #[test]
    fn regrouping_flattened_output_is_stable() {
        let entries = vec![
            ("AEGL3_4hr_vaporFlux", "a"),
            ("AEGL1_10min_liquidFlux", "b"),
            ("AEGL1_10min_vaporAbsorption", "c"),
            ("junk", "d"),
        ];
        let first = GroupedFigures::from_entries(entries);
        let second = GroupedFigures::from_entries(first.flatten());

        assert_eq!(first.prefixes(), second.prefixes());
        assert_eq!(first.flatten(), second.flatten());
        assert!(second.ignored().is_empty());
    }

    #[test]
    fn non_string_payloads_are_reserialized() {
        let grid = json!({"AEGL1_8hr_vaporFlux": {"data": [], "layout": {}}});
        let grouped = GroupedFigures::from_json(grid.as_object().unwrap());
        let payload = grouped.get("AEGL1_8hr").unwrap().get(FigureName::VaporFlux).unwrap();
        assert!(payload.contains("\"layout\""));
    }

    #[test]
    fn document_accepts_response_or_bare_grid() {
        let response = json!({
            "compound": {"Name": "VX"},
            "aeglGraphGrid": {"AEGL3_10min_liquidFlux": "{}", "AEGL1_8hr_vaporFlux": "{}"}
        });
        let grouped = GroupedFigures::from_document(&response).unwrap();
        assert_eq!(grouped.prefixes(), ["AEGL1_8hr", "AEGL3_10min"]);

        let bare = json!({"AEGL2_4hr_vaporAbsorption": "{}"});
        let grouped = GroupedFigures::from_document(&bare).unwrap();
        assert_eq!(grouped.prefixes(), ["AEGL2_4hr"]);

        let gaseous = json!({"compound": {"Name": "Sarin"}, "aeglAnalysis": {"available": false}});
        assert!(GroupedFigures::from_document(&gaseous).unwrap().is_empty());

        assert!(GroupedFigures::from_document(&json!([1, 2])).is_err());
    }
}
