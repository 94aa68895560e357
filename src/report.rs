//! Plain-text rendering of an analysis result.

use std::fmt::Write;

use crate::api::{AnalysisResult, ReachTime};
use crate::grid::GroupedFigures;

/// Build the report copied to the clipboard.
pub fn analysis_report(result: &AnalysisResult, grouped: Option<&GroupedFigures>) -> String {
    let mut text = String::new();
    let compound = &result.compound;

    // Writing into a String cannot fail.
    let _ = writeln!(text, "Compound: {}", compound.display_name());
    text.push_str(&"=".repeat(60));
    text.push('\n');

    let fields = [
        ("CAS", compound.cas.clone()),
        ("Class", compound.class.clone()),
        ("MW", compound.molecular_weight.map(|v| v.to_string())),
        ("logP", compound.log_p.map(|v| v.to_string())),
        ("SMILES", compound.smiles.clone()),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            let _ = writeln!(text, "{}: {}", label, value);
        }
    }

    if let Some(reactivity) = &result.reactivity {
        text.push_str("\nReactivity:\n");
        if !reactivity.reactive_groups.is_empty() {
            let _ = writeln!(text, "  Groups: {}", reactivity.reactive_groups.join(", "));
        }
        if let Some(ref leaving) = reactivity.leaving_group {
            let _ = writeln!(text, "  Leaving group: {}", leaving);
        }
        if let Some(ref steric) = reactivity.steric {
            let _ = writeln!(text, "  Steric: {}", steric);
        }
        if let Some(score) = reactivity.reactive_score {
            let _ = writeln!(text, "  Score: {}", score);
        }
    }

    if let Some(kr) = result.kr_prediction.as_ref().and_then(|k| k.predicted_kr) {
        let _ = writeln!(text, "\nPredicted kr: {}", kr);
    }

    match &result.aegl_analysis {
        Some(analysis) if analysis.available => {
            text.push_str("\nAEGL results:\n");
            for row in &analysis.results {
                let _ = write!(text, "  {}", row.prefix());
                if let Some(aegl) = row.aegl {
                    let _ = write!(text, "  AEGL={} mg/m3", aegl);
                }
                if let Some(qallow) = row.qallow {
                    let _ = write!(text, "  Qallow={} mg", qallow);
                }
                match &row.t_reach {
                    Some(ReachTime::Hours(h)) => {
                        let _ = write!(text, "  tReach={} h", h);
                    },
                    Some(ReachTime::Failed(reason)) => {
                        let _ = write!(text, "  tReach={}", reason);
                    },
                    None => {},
                }
                text.push('\n');
            }
        },
        Some(analysis) => {
            let _ = writeln!(
                text,
                "\nAEGL: unavailable ({})",
                analysis.reason.as_deref().unwrap_or("no reason given")
            );
        },
        None => {},
    }

    if let Some(grouped) = grouped.filter(|g| !g.is_empty()) {
        text.push_str("\nFigures:\n");
        for (prefix, set) in grouped.iter() {
            let names: Vec<&str> = set.present().into_iter().map(|f| f.title()).collect();
            let _ = writeln!(text, "  {}: {}", prefix, names.join(", "));
        }
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn result() -> AnalysisResult {
        serde_json::from_value(json!({
            "compound": {"Name": "Sarin", "CAS": "107-44-8", "MW": 140.09},
            "krPrediction": {"predicted_kr": 0.05},
            "aeglAnalysis": {
                "available": true,
                "results": [
                    {"aeglLevel": 1, "timeStr": "10min", "aegl": 0.0069, "tReach": "FindRootFailed"}
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn report_lists_compound_and_tiers() {
        let text = analysis_report(&result(), None);
        assert!(text.starts_with("Compound: Sarin\n"));
        assert!(text.contains("CAS: 107-44-8"));
        assert!(text.contains("Predicted kr: 0.05"));
        assert!(text.contains("AEGL1_10min  AEGL=0.0069 mg/m3  tReach=FindRootFailed"));
        assert!(!text.contains("Reactivity"));
    }

    #[test]
    fn report_includes_grouped_figures() {
        let grid = json!({
            "AEGL2_8hr_vaporFlux": "{}",
            "AEGL2_8hr_liquidFlux": "{}"
        });
        let grouped = GroupedFigures::from_json(grid.as_object().unwrap());
        let text = analysis_report(&result(), Some(&grouped));
        assert!(text.contains("Figures:\n  AEGL2_8hr: "));
    }
}
