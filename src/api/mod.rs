//! Analysis server API: typed records and the client seam.
//!
//! Server records are schema-light: each type names the fields the
//! dashboard renders and keeps every other key in an ordered `extra` map.

mod client;
mod models;

pub use client::{interpret_analyze_response, AnalysisApi, HttpClient};
pub use models::{
    AeglAnalysis, AeglRow, AnalysisMode, AnalysisResult, Compound, CompoundQuery, Extra,
    KrPrediction, Reactivity, ReachTime, ScatterGraph, SummaryRow, SUMMARY_PRIORITY_COLUMNS,
};
