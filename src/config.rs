//! API client configuration.
//!
//! The base URL is a constructed dependency so that request code never
//! carries a hardcoded origin.

use std::time::Duration;

use reqwest::Url;

use crate::error::{DashError, Result};

/// Default API origin used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000/api";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Logical endpoints exposed by the analysis server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `GET /compoundNames`
    CompoundNames,
    /// `POST /analyze`
    Analyze,
    /// `GET /combined-summary`
    CombinedSummary,
    /// `GET /scattergraph`
    ScatterGraph,
}

impl Endpoint {
    /// Path relative to the base URL.
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::CompoundNames => "compoundNames",
            Endpoint::Analyze => "analyze",
            Endpoint::CombinedSummary => "combined-summary",
            Endpoint::ScatterGraph => "scattergraph",
        }
    }
}

/// Configuration for talking to the analysis server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ApiConfig {
    /// Build a configuration from a base URL string.
    pub fn new(base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        let parsed = Url::parse(trimmed)
            .map_err(|e| DashError::Config(format!("Invalid base URL '{}': {}", trimmed, e)))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DashError::Config(format!(
                "Invalid base URL '{}': scheme must be http or https",
                trimmed
            )));
        }

        Ok(Self {
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Override the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL for an endpoint.
    pub fn url_for(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.path())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
