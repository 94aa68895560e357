//! Exposure Dash - a terminal dashboard for chemical exposure analysis.
//!
//! Exposure Dash talks to an AEGL analysis API and presents the results in
//! an interactive terminal interface: compound search with suggestions,
//! per-compound reactivity and rate-constant panels, AEGL threshold tables,
//! dermal absorption and flux charts, and a combined summary across all
//! compounds.
//!
//! # Features
//!
//! - Background requests with latest-wins ordering
//! - Gaseous and aqueous analysis modes
//! - Tier/duration grouping of figure grids
//! - Independent overlays for AEGL values, exposure times and charts
//! - Gruvbox color themes
//! - Clipboard export
//!
//! # Example
//!
//! ```ignore
//! use exposure_dash::api::{AnalysisApi, AnalysisMode, CompoundQuery, HttpClient};
//! use exposure_dash::config::ApiConfig;
//!
//! let client = HttpClient::new(ApiConfig::new("http://localhost:5000/api")?)?;
//! let result = client.analyze(&CompoundQuery::new("Sarin", AnalysisMode::Gaseous))?;
//! println!("Loaded {}", result.compound.display_name());
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]
#![deny(unsafe_code)]

pub mod api;
pub mod app;
pub mod chart;
pub mod clipboard;
pub mod config;
pub mod error;
pub mod fetch;
pub mod grid;
pub mod keys;
pub mod modal;
pub mod report;
pub mod suggest;
pub mod summary;
pub mod ui;
pub mod view;

pub use error::{DashError, Result};
