//! HTTP client for the analysis server.

use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::models::{AnalysisResult, CompoundQuery, ScatterGraph, SummaryRow};
use crate::config::{ApiConfig, Endpoint};
use crate::error::{DashError, Result};

/// Operations the dashboard needs from the analysis server.
///
/// Implemented over HTTP by [`HttpClient`]; tests substitute in-memory doubles.
pub trait AnalysisApi: Send + Sync {
    /// Ordered list of known compound names.
    fn compound_names(&self) -> Result<Vec<String>>;

    /// Run the full analysis for one compound.
    fn analyze(&self, query: &CompoundQuery) -> Result<AnalysisResult>;

    /// Per-compound rows of the bulk summary table.
    fn combined_summary(&self) -> Result<Vec<SummaryRow>>;

    /// Serialized scatter chart of predicted kr by class.
    fn scatter_graph(&self) -> Result<String>;
}

/// Blocking reqwest implementation of [`AnalysisApi`].
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ApiConfig,
    http: Client,
}

impl HttpClient {
    /// Build a client for the given configuration.
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("exposure-dash/", env!("CARGO_PKG_VERSION")))
            .timeout(config.timeout)
            .build()
            .map_err(|e| DashError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { config, http })
    }

    fn get_json<T: DeserializeOwned>(&self, endpoint: Endpoint) -> Result<T> {
        let url = self.config.url_for(endpoint);
        debug!(%url, "GET");
        let response = self.http.get(&url).send()?.error_for_status()?;
        let body = response.text()?;
        serde_json::from_str(&body).map_err(|e| DashError::malformed(e.to_string()))
    }
}

impl AnalysisApi for HttpClient {
    #[instrument(skip(self))]
    fn compound_names(&self) -> Result<Vec<String>> {
        self.get_json(Endpoint::CompoundNames)
    }

    #[instrument(skip(self), fields(name = %query.name, mode = ?query.mode))]
    fn analyze(&self, query: &CompoundQuery) -> Result<AnalysisResult> {
        let url = self.config.url_for(Endpoint::Analyze);
        let response = self.http.post(&url).json(query).send()?;
        let status = response.status().as_u16();
        let body = response.text()?;
        debug!(status, bytes = body.len(), "analyze response");
        interpret_analyze_response(status, &body)
    }

    #[instrument(skip(self))]
    fn combined_summary(&self) -> Result<Vec<SummaryRow>> {
        self.get_json(Endpoint::CombinedSummary)
    }

    #[instrument(skip(self))]
    fn scatter_graph(&self) -> Result<String> {
        let graph: ScatterGraph = self.get_json(Endpoint::ScatterGraph)?;
        Ok(graph.graph)
    }
}

/// Classify a raw `/analyze` response.
///
/// Precedence: an `error` field wins over the status code, a non-2xx status
/// wins over body shape, and a success body without `compound` is malformed.
pub fn interpret_analyze_response(status: u16, body: &str) -> Result<AnalysisResult> {
    let success = (200..300).contains(&status);

    let value: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) if success => return Err(DashError::malformed(e.to_string())),
        Err(_) => return Err(DashError::HttpStatus { status }),
    };

    if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
        let message = match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        warn!(status, %message, "analysis server reported an error");
        return Err(DashError::api(status, message));
    }

    if !success {
        return Err(DashError::HttpStatus { status });
    }

    match value.get("compound") {
        Some(c) if c.is_object() => {},
        _ => return Err(DashError::malformed("response has no compound")),
    }

    serde_json::from_value(value).map_err(|e| DashError::malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_error_surfaces_literal_message() {
        let err = interpret_analyze_response(404, r#"{"error": "not found"}"#).unwrap_err();
        assert!(matches!(err, DashError::Api { status: 404, .. }));
        assert_eq!(err.alert_message(), "not found");
    }

    #[test]
    fn error_field_on_success_status_is_still_an_error() {
        let err =
            interpret_analyze_response(200, r#"{"error": "Compound 'x' not found."}"#).unwrap_err();
        assert_eq!(err.alert_message(), "Compound 'x' not found.");
    }

    #[test]
    fn non_json_failure_reports_status() {
        let err = interpret_analyze_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, DashError::HttpStatus { status: 502 }));
    }

    #[test]
    fn missing_compound_is_malformed() {
        let err = interpret_analyze_response(200, r#"{"reactivity": {}}"#).unwrap_err();
        assert!(matches!(err, DashError::MalformedBody(_)));

        let err = interpret_analyze_response(200, r#"{"compound": null}"#).unwrap_err();
        assert!(matches!(err, DashError::MalformedBody(_)));
    }

    #[test]
    fn success_without_reactivity_parses() {
        let result =
            interpret_analyze_response(200, r#"{"compound": {"Name": "Chlorine"}}"#).unwrap();
        assert_eq!(result.compound.display_name(), "Chlorine");
        assert!(result.reactivity.is_none());
    }
}
