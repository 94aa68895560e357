//! Records exchanged with the analysis server.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Open extension map holding keys not modelled explicitly.
pub type Extra = Map<String, Value>;

/// Which exposure model the server should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisMode {
    /// Vapour exposure; AEGL results come back as per-row figure pairs.
    #[default]
    Gaseous,
    /// Liquid exposure; figures come back as a keyed grid.
    Aqueous,
}

impl AnalysisMode {
    /// Get the other mode.
    pub fn toggle(self) -> Self {
        match self {
            AnalysisMode::Gaseous => AnalysisMode::Aqueous,
            AnalysisMode::Aqueous => AnalysisMode::Gaseous,
        }
    }

    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            AnalysisMode::Gaseous => "Gaseous",
            AnalysisMode::Aqueous => "Aqueous",
        }
    }
}

impl std::str::FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gaseous" | "gas" | "vapor" | "vapour" => Ok(AnalysisMode::Gaseous),
            "aqueous" | "liquid" => Ok(AnalysisMode::Aqueous),
            other => Err(format!("unknown analysis mode '{}'", other)),
        }
    }
}

/// Body of a `POST /analyze` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompoundQuery {
    /// Compound name or identifier.
    pub name: String,
    /// Requested analysis mode.
    pub mode: AnalysisMode,
}

impl CompoundQuery {
    /// Create a query, trimming surrounding whitespace from the name.
    pub fn new(name: impl AsRef<str>, mode: AnalysisMode) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            mode,
        }
    }
}

/// Core compound record.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Compound {
    /// Display name.
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    /// CAS registry number.
    #[serde(rename = "CAS", default)]
    pub cas: Option<String>,
    /// Molecular weight (g/mol).
    #[serde(rename = "MW", default, deserialize_with = "lenient_f64")]
    pub molecular_weight: Option<f64>,
    /// Chemical class.
    #[serde(rename = "class", default)]
    pub class: Option<String>,
    /// SMILES string.
    #[serde(rename = "SMILES", default)]
    pub smiles: Option<String>,
    /// Octanol/water partition coefficient.
    #[serde(rename = "logP", default, deserialize_with = "lenient_f64")]
    pub log_p: Option<f64>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl Compound {
    /// Name to show, falling back to the CAS number.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.cas.as_deref())
            .unwrap_or("Unknown compound")
    }
}

/// Reactivity metadata.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reactivity {
    /// Functional groups detected.
    #[serde(default)]
    pub reactive_groups: Vec<String>,
    /// Leaving group classification.
    #[serde(default)]
    pub leaving_group: Option<String>,
    /// Steric hindrance bucket.
    #[serde(default)]
    pub steric: Option<String>,
    /// Base reactivity score.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub reactive_score: Option<f64>,
    /// Chemical class used for scoring.
    #[serde(default)]
    pub chemical_class: Option<String>,
    /// Expected reactivity with oxime antidotes.
    #[serde(default)]
    pub oxime_reactivity: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Predicted kinetic rate constant.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct KrPrediction {
    /// Compound the prediction refers to.
    #[serde(default)]
    pub compound: Option<String>,
    /// Predicted rate constant.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub predicted_kr: Option<f64>,
    /// Confidence label.
    #[serde(default)]
    pub confidence: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Time needed to reach the allowable dose.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ReachTime {
    /// Hours until the allowable dose is absorbed.
    Hours(f64),
    /// The server could not solve for the time (e.g. `"FindRootFailed"`).
    Failed(String),
}

/// One AEGL tier/duration result (gaseous shape).
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AeglRow {
    /// AEGL tier (1-3).
    #[serde(default)]
    pub aegl_level: Option<u8>,
    /// Duration label (`8hr`, `30min`, ...).
    #[serde(default)]
    pub time_str: Option<String>,
    /// AEGL threshold (mg/m³).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub aegl: Option<f64>,
    /// Exposure window in hours.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub exposure_time_hours: Option<f64>,
    /// Allowable absorbed dose (mg).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub qallow: Option<f64>,
    /// Lag time (hours).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub tlag: Option<f64>,
    /// Time to reach the allowable dose.
    #[serde(default)]
    pub t_reach: Option<ReachTime>,
    /// Steady-state flux (mg/h).
    #[serde(default, deserialize_with = "lenient_f64")]
    pub steady_state_flux: Option<f64>,
    /// Serialized absorption chart.
    #[serde(default)]
    pub absorption_graph: Option<String>,
    /// Serialized flux chart.
    #[serde(default)]
    pub flux_graph: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Extra,
}

impl AeglRow {
    /// Composite `AEGL<tier>_<duration>` label.
    pub fn prefix(&self) -> String {
        format!(
            "AEGL{}_{}",
            self.aegl_level.map(|l| l.to_string()).unwrap_or_else(|| "?".to_string()),
            self.time_str.as_deref().unwrap_or("?")
        )
    }
}

/// AEGL availability and per-tier results.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct AeglAnalysis {
    /// Whether the compound has AEGL data.
    #[serde(default)]
    pub available: bool,
    /// Results when available.
    #[serde(default)]
    pub results: Vec<AeglRow>,
    /// Explanation when unavailable.
    #[serde(default)]
    pub reason: Option<String>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Aggregate record returned by `POST /analyze`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// The compound itself. Required for a well-formed response.
    pub compound: Compound,
    /// Reactivity metadata.
    #[serde(default)]
    pub reactivity: Option<Reactivity>,
    /// Rate constant prediction.
    #[serde(default)]
    pub kr_prediction: Option<KrPrediction>,
    /// AEGL threshold analysis.
    #[serde(default)]
    pub aegl_analysis: Option<AeglAnalysis>,
    /// Flat `AEGL<tier>_<duration>_<figure>` → chart payload map (aqueous shape).
    #[serde(default)]
    pub aegl_graph_grid: Option<Extra>,
    /// Remaining fields.
    #[serde(flatten)]
    pub extra: Extra,
}

/// Response of `GET /scattergraph`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ScatterGraph {
    /// Serialized chart payload.
    pub graph: String,
}

/// Columns that lead the summary table, in order, when present.
pub const SUMMARY_PRIORITY_COLUMNS: [&str; 11] = [
    "Compound",
    "cas",
    "Class",
    "MW",
    "LogP",
    "Predicted_kr",
    "ReactiveGroups",
    "LeavingGroup",
    "Steric",
    "BaseScore",
    "LogKow",
];

/// One compound's flattened record from `GET /combined-summary`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SummaryRow {
    /// Compound name.
    #[serde(rename = "Compound", default)]
    pub compound: String,
    /// Every other column, in server order.
    #[serde(flatten)]
    pub extra: Extra,
}

impl SummaryRow {
    /// Raw value for a column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.extra.get(column)
    }

    /// Derive the column list from a set of rows.
    ///
    /// Columns are the observed keys in first-seen order, rearranged so the
    /// priority columns lead and AEGL columns trail.
    pub fn columns(rows: &[SummaryRow]) -> Vec<String> {
        let mut observed: Vec<String> = Vec::new();
        for row in rows {
            for key in row.extra.keys() {
                if !observed.iter().any(|c| c == key) {
                    observed.push(key.clone());
                }
            }
        }

        let mut columns = vec!["Compound".to_string()];
        for priority in SUMMARY_PRIORITY_COLUMNS.iter().skip(1) {
            if observed.iter().any(|c| c == priority) {
                columns.push((*priority).to_string());
            }
        }
        let is_leading = |c: &String| SUMMARY_PRIORITY_COLUMNS.contains(&c.as_str());
        columns.extend(
            observed
                .iter()
                .filter(|c| !is_leading(c) && !is_aegl_column(c))
                .cloned(),
        );
        columns.extend(
            observed
                .iter()
                .filter(|c| !is_leading(c) && is_aegl_column(c))
                .cloned(),
        );
        columns
    }
}

fn is_aegl_column(column: &str) -> bool {
    let lower = column.to_lowercase();
    lower.contains("aegl (")
        || lower.contains("aegl ")
        || lower.contains("lag time (hr)")
        || lower.contains("time to dose (hr)")
        || lower.contains("time to dose (days)")
}

/// Accept numbers, numeric strings and null; anything else becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compound_keeps_unknown_fields() {
        let compound: Compound = serde_json::from_value(json!({
            "Name": "Sarin",
            "CAS": "107-44-8",
            "MW": "140.09",
            "class": "Nerve agent",
            "henryConstant": 5.4e-7
        }))
        .unwrap();

        assert_eq!(compound.display_name(), "Sarin");
        assert_eq!(compound.molecular_weight, Some(140.09));
        assert_eq!(compound.class.as_deref(), Some("Nerve agent"));
        assert!(compound.extra.contains_key("henryConstant"));
        assert!(!compound.extra.contains_key("Name"));
    }

    #[test]
    fn reach_time_accepts_failure_marker() {
        let row: AeglRow = serde_json::from_value(json!({
            "aeglLevel": 2,
            "timeStr": "30min",
            "aegl": 0.087,
            "tReach": "FindRootFailed"
        }))
        .unwrap();

        assert_eq!(row.t_reach, Some(ReachTime::Failed("FindRootFailed".into())));
        assert_eq!(row.prefix(), "AEGL2_30min");
    }

    #[test]
    fn analysis_result_tolerates_missing_sections() {
        let result: AnalysisResult = serde_json::from_value(json!({
            "compound": {"Name": "Phosgene"}
        }))
        .unwrap();

        assert!(result.reactivity.is_none());
        assert!(result.kr_prediction.is_none());
        assert!(result.aegl_graph_grid.is_none());
    }

    #[test]
    fn summary_columns_follow_priority_then_aegl_last() {
        let rows: Vec<SummaryRow> = serde_json::from_value(json!([
            {
                "Compound": "Sarin",
                "AEGL1 (8hr) - aegl (mg/m³)": 0.0017,
                "Steric": "Low",
                "notes": "x",
                "cas": "107-44-8"
            },
            {
                "Compound": "Soman",
                "Predicted_kr": 0.05,
                "extra": 1
            }
        ]))
        .unwrap();

        assert_eq!(
            SummaryRow::columns(&rows),
            vec![
                "Compound",
                "cas",
                "Predicted_kr",
                "Steric",
                "notes",
                "extra",
                "AEGL1 (8hr) - aegl (mg/m³)"
            ]
        );
    }

    #[test]
    fn only_threshold_and_timing_columns_trail() {
        let rows: Vec<SummaryRow> = serde_json::from_value(json!([{
            "Compound": "VX",
            "AEGL 2 (30min)": 0.0042,
            "Lag time (hr)": 0.5,
            "aeglAvailable": true,
            "MW": 267.37
        }]))
        .unwrap();

        assert_eq!(
            SummaryRow::columns(&rows),
            vec!["Compound", "MW", "aeglAvailable", "AEGL 2 (30min)", "Lag time (hr)"]
        );
    }

    #[test]
    fn mode_parses_and_serializes_lowercase() {
        assert_eq!("Aqueous".parse::<AnalysisMode>(), Ok(AnalysisMode::Aqueous));
        let body = serde_json::to_value(CompoundQuery::new("  VX ", AnalysisMode::Gaseous)).unwrap();
        assert_eq!(body, json!({"name": "VX", "mode": "gaseous"}));
    }
}
