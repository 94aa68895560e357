//! Background request coordination.
//!
//! Every request runs on its own worker thread and reports back over a
//! channel that the UI loop drains between frames. Each request carries a
//! sequence number; a response is applied only when it belongs to the most
//! recent request of its kind, so a slow earlier response can never
//! overwrite a newer one.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, warn};

use crate::api::{AnalysisApi, AnalysisResult, CompoundQuery, SummaryRow};
use crate::error::{DashError, Result};

/// Monotonically increasing request identifier.
pub type RequestSeq = u64;

/// The independent request streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Compound name list.
    Names,
    /// Single-compound analysis.
    Analyze,
    /// Combined summary table.
    Summary,
    /// Scatter chart of predicted kr.
    Scatter,
}

impl RequestKind {
    /// Get display name.
    pub fn name(self) -> &'static str {
        match self {
            RequestKind::Names => "compound names",
            RequestKind::Analyze => "analysis",
            RequestKind::Summary => "summary",
            RequestKind::Scatter => "scatter graph",
        }
    }
}

/// Successful response bodies.
#[derive(Debug)]
pub enum FetchPayload {
    /// `GET /compoundNames`
    Names(Vec<String>),
    /// `POST /analyze`
    Analysis(Box<AnalysisResult>),
    /// `GET /combined-summary`
    Summary(Vec<SummaryRow>),
    /// `GET /scattergraph`
    Scatter(String),
}

/// A completed request as delivered to the UI thread.
#[derive(Debug)]
pub struct FetchEvent {
    /// Which stream the request belongs to.
    pub kind: RequestKind,
    /// Sequence number assigned at issue time.
    pub seq: RequestSeq,
    /// Response or failure.
    pub outcome: Result<FetchPayload>,
}

/// Lifecycle of one request stream.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    /// Nothing requested or nothing to show.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// The latest request succeeded.
    Ready(T),
    /// The latest request failed with a displayable message.
    Failed(String),
}

impl<T> FetchState<T> {
    /// Whether a request is in flight.
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    /// The loaded value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            FetchState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Issues requests and applies their results in issue order.
pub struct FetchCoordinator {
    api: Arc<dyn AnalysisApi>,
    tx: Sender<FetchEvent>,
    rx: Receiver<FetchEvent>,
    next_seq: RequestSeq,
    latest: HashMap<RequestKind, RequestSeq>,
    in_flight_query: Option<CompoundQuery>,
    alerts: Vec<String>,
    /// Cached compound names, loaded once.
    pub names: FetchState<Vec<String>>,
    /// Current analysis result.
    pub analysis: FetchState<AnalysisResult>,
    /// Combined summary rows.
    pub summary: FetchState<Vec<SummaryRow>>,
    /// Serialized scatter chart.
    pub scatter: FetchState<String>,
}

impl fmt::Debug for FetchCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchCoordinator")
            .field("next_seq", &self.next_seq)
            .field("latest", &self.latest)
            .field("in_flight_query", &self.in_flight_query)
            .field("pending_alerts", &self.alerts.len())
            .finish_non_exhaustive()
    }
}

impl FetchCoordinator {
    /// Create a coordinator over an API implementation.
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        let (tx, rx) = crossbeam_channel::unbounded();
        Self {
            api,
            tx,
            rx,
            next_seq: 1,
            latest: HashMap::new(),
            in_flight_query: None,
            alerts: Vec::new(),
            names: FetchState::Idle,
            analysis: FetchState::Idle,
            summary: FetchState::Idle,
            scatter: FetchState::Idle,
        }
    }

    /// Whether an analysis request is in flight.
    pub fn is_busy(&self) -> bool {
        self.analysis.is_loading()
    }

    /// The query currently being analyzed.
    pub fn in_flight_query(&self) -> Option<&CompoundQuery> {
        self.in_flight_query.as_ref()
    }

    /// Latest sequence number issued for a kind.
    pub fn latest_seq(&self, kind: RequestKind) -> Option<RequestSeq> {
        self.latest.get(&kind).copied()
    }

    /// Fetch the compound name list, once.
    pub fn load_names(&mut self) -> Option<RequestSeq> {
        if matches!(self.names, FetchState::Loading | FetchState::Ready(_)) {
            return None;
        }
        self.names = FetchState::Loading;
        Some(self.issue(RequestKind::Names, |api| {
            api.compound_names().map(FetchPayload::Names)
        }))
    }

    /// Start analyzing a compound.
    ///
    /// Returns `None` for an empty name or when the same query is already in
    /// flight. Any previous result is cleared immediately.
    pub fn analyze(&mut self, query: CompoundQuery) -> Option<RequestSeq> {
        if query.name.is_empty() {
            return None;
        }
        if self.is_busy() && self.in_flight_query.as_ref() == Some(&query) {
            debug!(name = %query.name, "duplicate analysis submission ignored");
            return None;
        }

        info!(name = %query.name, mode = ?query.mode, "analyzing compound");
        self.analysis = FetchState::Loading;
        self.in_flight_query = Some(query.clone());
        Some(self.issue(RequestKind::Analyze, move |api| {
            api.analyze(&query)
                .map(|result| FetchPayload::Analysis(Box::new(result)))
        }))
    }

    /// Discard the current analysis result.
    pub fn clear_analysis(&mut self) {
        self.analysis = FetchState::Idle;
        self.in_flight_query = None;
        // Anything still in flight is now stale.
        self.latest.remove(&RequestKind::Analyze);
    }

    /// Fetch the combined summary table.
    pub fn load_summary(&mut self) -> Option<RequestSeq> {
        if self.summary.is_loading() {
            return None;
        }
        self.summary = FetchState::Loading;
        Some(self.issue(RequestKind::Summary, |api| {
            api.combined_summary().map(FetchPayload::Summary)
        }))
    }

    /// Fetch the scatter chart.
    pub fn load_scatter(&mut self) -> Option<RequestSeq> {
        if self.scatter.is_loading() {
            return None;
        }
        self.scatter = FetchState::Loading;
        Some(self.issue(RequestKind::Scatter, |api| {
            api.scatter_graph().map(FetchPayload::Scatter)
        }))
    }

    fn issue<F>(&mut self, kind: RequestKind, job: F) -> RequestSeq
    where
        F: FnOnce(&dyn AnalysisApi) -> Result<FetchPayload> + Send + 'static,
    {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest.insert(kind, seq);

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let spawned = thread::Builder::new()
            .name(format!("fetch-{}-{}", kind.name().replace(' ', "-"), seq))
            .spawn(move || {
                let outcome = job(api.as_ref());
                // The receiver only disappears when the app is shutting down.
                let _ = tx.send(FetchEvent { kind, seq, outcome });
            });

        if let Err(e) = spawned {
            warn!(kind = kind.name(), "failed to spawn request thread: {}", e);
            let _ = self.tx.send(FetchEvent {
                kind,
                seq,
                outcome: Err(DashError::Transport(e.to_string())),
            });
        }

        debug!(kind = kind.name(), seq, "request issued");
        seq
    }

    /// Apply all completed requests without blocking.
    ///
    /// Returns the kinds whose state changed.
    pub fn poll(&mut self) -> Vec<RequestKind> {
        let events: Vec<FetchEvent> = self.rx.try_iter().collect();
        events
            .into_iter()
            .filter_map(|event| {
                let kind = event.kind;
                self.apply(event).then_some(kind)
            })
            .collect()
    }

    /// Block until at least one request completes or the timeout passes, then
    /// apply everything available.
    pub fn wait(&mut self, timeout: Duration) -> Vec<RequestKind> {
        let mut applied = Vec::new();
        match self.rx.recv_timeout(timeout) {
            Ok(event) => {
                let kind = event.kind;
                if self.apply(event) {
                    applied.push(kind);
                }
            },
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                return applied;
            },
        }
        applied.extend(self.poll());
        applied
    }

    /// Apply one completed request.
    ///
    /// Responses that are not the latest of their kind are dropped. Returns
    /// whether any state changed.
    pub fn apply(&mut self, event: FetchEvent) -> bool {
        let FetchEvent { kind, seq, outcome } = event;

        if self.latest.get(&kind) != Some(&seq) {
            debug!(kind = kind.name(), seq, latest = ?self.latest.get(&kind), "dropping stale response");
            return false;
        }

        match (kind, outcome) {
            (RequestKind::Names, Ok(FetchPayload::Names(names))) => {
                info!(count = names.len(), "compound names loaded");
                self.names = FetchState::Ready(names);
            },
            (RequestKind::Analyze, Ok(FetchPayload::Analysis(result))) => {
                info!(compound = result.compound.display_name(), "analysis loaded");
                self.analysis = FetchState::Ready(*result);
                self.in_flight_query = None;
            },
            (RequestKind::Summary, Ok(FetchPayload::Summary(rows))) => {
                info!(rows = rows.len(), "summary loaded");
                self.summary = FetchState::Ready(rows);
            },
            (RequestKind::Scatter, Ok(FetchPayload::Scatter(graph))) => {
                self.scatter = FetchState::Ready(graph);
            },
            (RequestKind::Analyze, Err(e)) => {
                self.in_flight_query = None;
                if e.is_transport() {
                    warn!("analysis request failed: {}", e);
                    self.analysis = FetchState::Idle;
                } else {
                    warn!("analysis rejected: {}", e);
                    let message = e.alert_message();
                    self.analysis = FetchState::Failed(message.clone());
                    self.alerts.push(message);
                }
            },
            (kind, Err(e)) => {
                warn!(kind = kind.name(), "request failed: {}", e);
                let message = format!("Failed to load {}: {}", kind.name(), e);
                match kind {
                    RequestKind::Names => self.names = FetchState::Failed(message),
                    RequestKind::Summary => self.summary = FetchState::Failed(message),
                    RequestKind::Scatter => self.scatter = FetchState::Failed(message),
                    RequestKind::Analyze => {},
                }
            },
            (kind, Ok(payload)) => {
                warn!(kind = kind.name(), ?payload, "payload does not match request kind");
                return false;
            },
        }

        true
    }

    /// Take the oldest pending user-facing alert.
    pub fn take_alert(&mut self) -> Option<String> {
        if self.alerts.is_empty() {
            None
        } else {
            Some(self.alerts.remove(0))
        }
    }
}
