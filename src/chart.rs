//! Serialized chart payloads.
//!
//! The server ships charts as JSON strings holding a `data` array of traces
//! and a `layout` object. Only what a terminal chart needs is extracted:
//! trace names, numeric points, axis titles and the chart title.

use serde_json::Value;

use crate::error::{DashError, Result};

/// A single plottable series.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    /// Legend name.
    pub name: String,
    /// Finite `(x, y)` points.
    pub points: Vec<(f64, f64)>,
    /// Category labels when `x` was categorical; indexed by x position.
    pub categories: Vec<String>,
}

/// A parsed chart payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    /// Traces in payload order.
    pub traces: Vec<Trace>,
    /// Raw layout object.
    pub layout: Value,
}

impl ChartPayload {
    /// Parse a serialized payload.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| DashError::InvalidChart(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Build from an already-decoded payload.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| DashError::InvalidChart("payload is not an object".to_string()))?;

        let data = match object.get("data") {
            Some(Value::Array(traces)) => traces.as_slice(),
            Some(_) => {
                return Err(DashError::InvalidChart("'data' is not an array".to_string()));
            },
            None => &[],
        };

        let traces = data
            .iter()
            .enumerate()
            .map(|(i, trace)| parse_trace(i, trace))
            .collect();

        Ok(Self {
            traces,
            layout: object.get("layout").cloned().unwrap_or(Value::Null),
        })
    }

    /// Chart title from the layout, if any.
    pub fn title(&self) -> Option<String> {
        text_of(self.layout.get("title")?)
    }

    /// X axis title.
    pub fn x_title(&self) -> Option<String> {
        text_of(self.layout.get("xaxis")?.get("title")?)
    }

    /// Y axis title.
    pub fn y_title(&self) -> Option<String> {
        text_of(self.layout.get("yaxis")?.get("title")?)
    }

    /// Whether the y axis is logarithmic.
    pub fn y_is_log(&self) -> bool {
        self.layout
            .get("yaxis")
            .and_then(|a| a.get("type"))
            .and_then(Value::as_str)
            == Some("log")
    }

    /// Annotation texts (used by the server to report failed computations).
    pub fn annotations(&self) -> Vec<String> {
        self.layout
            .get("annotations")
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(|a| a.get("text").and_then(text_of)).collect())
            .unwrap_or_default()
    }

    /// Whether any trace has something to plot.
    pub fn has_points(&self) -> bool {
        self.traces.iter().any(|t| !t.points.is_empty())
    }

    /// Copy with y mapped to `log10` when the y axis is logarithmic.
    /// Non-positive points cannot be placed on a log axis and are dropped.
    pub fn plot_scaled(&self) -> Self {
        if !self.y_is_log() {
            return self.clone();
        }
        let traces = self
            .traces
            .iter()
            .map(|t| Trace {
                name: t.name.clone(),
                points: t
                    .points
                    .iter()
                    .filter(|&&(_, y)| y > 0.0)
                    .map(|&(x, y)| (x, y.log10()))
                    .collect(),
                categories: t.categories.clone(),
            })
            .collect();
        Self {
            traces,
            layout: self.layout.clone(),
        }
    }

    /// Bounds over all points as `([x_min, x_max], [y_min, y_max])`.
    pub fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let mut points = self.traces.iter().flat_map(|t| t.points.iter());
        let first = points.next()?;
        let init = ([first.0, first.0], [first.1, first.1]);
        Some(points.fold(init, |([x0, x1], [y0, y1]), &(x, y)| {
            ([x0.min(x), x1.max(x)], [y0.min(y), y1.max(y)])
        }))
    }
}

fn parse_trace(index: usize, trace: &Value) -> Trace {
    let name = trace
        .get("name")
        .and_then(text_of)
        .unwrap_or_else(|| format!("trace {}", index + 1));

    let ys = values_of(trace.get("y"));
    let xs = values_of(trace.get("x"));

    let categorical = xs.iter().any(|v| v.is_string());
    let mut categories: Vec<String> = Vec::new();
    let x_positions: Vec<Option<f64>> = if xs.is_empty() {
        (0..ys.len()).map(|i| Some(i as f64)).collect()
    } else if categorical {
        xs.iter()
            .map(|v| {
                let label = text_of(v).unwrap_or_default();
                let pos = match categories.iter().position(|c| *c == label) {
                    Some(p) => p,
                    None => {
                        categories.push(label);
                        categories.len() - 1
                    },
                };
                Some(pos as f64)
            })
            .collect()
    } else {
        xs.iter().map(number_of).collect()
    };

    let points = x_positions
        .into_iter()
        .zip(ys.iter().map(number_of))
        .filter_map(|(x, y)| match (x, y) {
            (Some(x), Some(y)) if x.is_finite() && y.is_finite() => Some((x, y)),
            _ => None,
        })
        .collect();

    Trace {
        name,
        points,
        categories,
    }
}

fn values_of(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(items)) => items.clone(),
        // Binary-encoded arrays (`{"dtype": ..., "bdata": ...}`) are not decoded.
        _ => Vec::new(),
    }
}

fn number_of(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("text").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLUX: &str = r#"{
        "data": [
            {"name": "Exact", "x": [0, 1, 2, 3], "y": [0.0, 0.5, 0.9, null]},
            {"name": "Steady state", "x": [0, 1, 2, 3], "y": [0, 0.4, 0.8, 1.2]}
        ],
        "layout": {
            "title": {"text": "Sarin - AEGL1 (8hr): Flux"},
            "xaxis": {"title": {"text": "Time (h)"}},
            "yaxis": {"title": "Flux (mg/h)", "type": "log"}
        }
    }"#;

    #[test]
    fn extracts_traces_and_layout() {
        let chart = ChartPayload::parse(FLUX).unwrap();
        assert_eq!(chart.traces.len(), 2);
        assert_eq!(chart.traces[0].name, "Exact");
        assert_eq!(chart.traces[0].points, vec![(0.0, 0.0), (1.0, 0.5), (2.0, 0.9)]);
        assert_eq!(chart.title().as_deref(), Some("Sarin - AEGL1 (8hr): Flux"));
        assert_eq!(chart.x_title().as_deref(), Some("Time (h)"));
        assert_eq!(chart.y_title().as_deref(), Some("Flux (mg/h)"));
        assert!(chart.y_is_log());
        assert_eq!(chart.bounds(), Some(([0.0, 3.0], [0.0, 1.2])));
    }

    #[test]
    fn log_axis_scaling_drops_non_positive_points() {
        let scaled = ChartPayload::parse(FLUX).unwrap().plot_scaled();
        assert_eq!(scaled.traces[0].points.len(), 2);
        assert_eq!(scaled.traces[1].points[0], (1.0, 0.4f64.log10()));
        let ([x0, x1], [y0, y1]) = scaled.bounds().unwrap();
        assert_eq!([x0, x1], [1.0, 3.0]);
        assert_eq!(y0, 0.4f64.log10());
        assert_eq!(y1, 1.2f64.log10());
    }

    #[test]
    fn categorical_x_maps_to_positions() {
        let chart = ChartPayload::parse(
            r#"{"data": [{"x": ["Nerve agent", "Other", "Nerve agent"], "y": [0.5, 0.001, 0.2]}]}"#,
        )
        .unwrap();
        let trace = &chart.traces[0];
        assert_eq!(trace.name, "trace 1");
        assert_eq!(trace.categories, vec!["Nerve agent", "Other"]);
        assert_eq!(trace.points, vec![(0.0, 0.5), (1.0, 0.001), (0.0, 0.2)]);
    }

    #[test]
    fn annotation_only_chart_has_no_points() {
        let chart = ChartPayload::parse(
            r#"{"data": [], "layout": {"annotations": [{"text": "tReach calculation failed"}]}}"#,
        )
        .unwrap();
        assert!(!chart.has_points());
        assert_eq!(chart.annotations(), vec!["tReach calculation failed"]);
        assert_eq!(chart.bounds(), None);
    }

    #[test]
    fn bad_payload_does_not_affect_siblings() {
        let results: Vec<_> = [FLUX, "{not json", r#"{"data": 5}"#, "{}"]
            .into_iter()
            .map(ChartPayload::parse)
            .collect();
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DashError::InvalidChart(_))));
        assert!(matches!(results[2], Err(DashError::InvalidChart(_))));
        assert!(results[3].as_ref().unwrap().traces.is_empty());
    }
}
