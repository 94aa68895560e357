use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use exposure_dash::api::{
    AnalysisApi, AnalysisMode, AnalysisResult, CompoundQuery, SummaryRow,
};
use exposure_dash::app::App;
use exposure_dash::fetch::{FetchCoordinator, FetchState, RequestKind};
use exposure_dash::modal::ModalKind;
use exposure_dash::{DashError, Result};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use serde_json::json;

/// In-memory server. Analyses of `"Slow"` block until the gate opens.
struct FakeApi {
    gate: Receiver<()>,
}

impl FakeApi {
    fn new() -> (Self, Sender<()>) {
        let (tx, rx) = crossbeam_channel::unbounded();
        (Self { gate: rx }, tx)
    }
}

impl AnalysisApi for FakeApi {
    fn compound_names(&self) -> Result<Vec<String>> {
        Ok(vec!["Sarin".into(), "Soman".into(), "Tabun".into(), "VX".into()])
    }

    fn analyze(&self, query: &CompoundQuery) -> Result<AnalysisResult> {
        match query.name.as_str() {
            "Slow" => {
                let _ = self.gate.recv_timeout(Duration::from_secs(5));
            },
            "Missing" => return Err(DashError::api(404, "not found")),
            "Offline" => return Err(DashError::Transport("connection refused".into())),
            _ => {},
        }

        let body = match query.mode {
            AnalysisMode::Gaseous => json!({
                "compound": {"Name": query.name, "CAS": "107-44-8", "MW": 140.09},
                "krPrediction": {"predicted_kr": 0.05},
                "aeglAnalysis": {
                    "available": true,
                    "results": [
                        {"aeglLevel": 1, "timeStr": "10min", "aegl": 0.0069,
                         "absorptionGraph": "{\"data\": []}", "fluxGraph": "{\"data\": []}"},
                        {"aeglLevel": 2, "timeStr": "8hr", "aegl": 0.00085,
                         "absorptionGraph": "{\"data\": []}"}
                    ]
                }
            }),
            AnalysisMode::Aqueous if query.name == "Wide" => {
                let mut grid = serde_json::Map::new();
                for tier in 1..=3 {
                    for duration in ["10min", "30min", "60min", "4hr", "8hr"] {
                        grid.insert(format!("AEGL{}_{}_vaporFlux", tier, duration), json!("{}"));
                    }
                }
                json!({"compound": {"Name": query.name}, "aeglGraphGrid": grid})
            },
            AnalysisMode::Aqueous => json!({
                "compound": {"Name": query.name},
                "aeglGraphGrid": {
                    "AEGL2_30min_vaporFlux": "{}",
                    "AEGL1_8hr_vaporAbsorption": "{}",
                    "AEGL1_8hr_liquidAbsorption": "{}",
                    "AEGL1_10min_liquidFlux": "{}",
                    "random_key": "{}",
                    "AEGL1_8hr_vaporFlux": "{}",
                    "AEGL1_8hr_liquidFlux": "{}"
                }
            }),
        };
        Ok(serde_json::from_value(body)?)
    }

    fn combined_summary(&self) -> Result<Vec<SummaryRow>> {
        Ok(serde_json::from_value(json!([
            {"Compound": "Sarin", "AEGL1_10min": 0.0069, "MW": 140.09, "cas": "107-44-8"},
            {"Compound": "VX", "MW": 267.37, "Predicted_kr": 0.001}
        ]))?)
    }

    fn scatter_graph(&self) -> Result<String> {
        Ok(json!({"data": [{"name": "OP", "x": ["OP", "OP"], "y": [0.1, 0.2]}]}).to_string())
    }
}

fn app(mode: AnalysisMode) -> (App, Sender<()>) {
    let (api, gate) = FakeApi::new();
    let mut app = App::new(Arc::new(api), mode);
    settle(&mut app);
    (app, gate)
}

/// Apply events until nothing is in flight.
fn settle(app: &mut App) {
    for _ in 0..100 {
        for kind in app.fetch.wait(Duration::from_millis(50)) {
            app.on_applied(kind);
        }
        let loading = app.fetch.is_busy()
            || app.fetch.names.is_loading()
            || app.fetch.summary.is_loading()
            || app.fetch.scatter.is_loading();
        if !loading {
            return;
        }
    }
    panic!("requests did not settle");
}

fn search(app: &mut App, name: &str) {
    app.query = name.to_string();
    app.analyze_current();
    settle(app);
}

fn screen_text(app: &mut App) -> String {
    sized_screen_text(app, 140, 40)
}

fn sized_screen_text(app: &mut App, width: u16, height: u16) -> String {
    let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
    terminal.draw(|f| exposure_dash::ui::draw(f, app)).unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn slow_earlier_response_never_overwrites_newer_one() {
    let (api, gate) = FakeApi::new();
    let mut fetch = FetchCoordinator::new(Arc::new(api));

    fetch
        .analyze(CompoundQuery::new("Slow", AnalysisMode::Gaseous))
        .unwrap();
    fetch
        .analyze(CompoundQuery::new("Soman", AnalysisMode::Gaseous))
        .unwrap();

    let applied = fetch.wait(Duration::from_secs(5));
    assert_eq!(applied, vec![RequestKind::Analyze]);
    assert_eq!(fetch.analysis.ready().unwrap().compound.display_name(), "Soman");

    gate.send(()).unwrap();
    // The slow response arrives now and is dropped.
    let applied = fetch.wait(Duration::from_secs(5));
    assert!(applied.is_empty());
    assert_eq!(fetch.analysis.ready().unwrap().compound.display_name(), "Soman");
}

#[test]
fn duplicate_search_is_ignored_while_in_flight() {
    let (mut app, gate) = app(AnalysisMode::Gaseous);
    app.query = "Slow".into();
    app.analyze_current();
    let seq = app.fetch.latest_seq(RequestKind::Analyze);

    app.analyze_current();
    assert_eq!(app.fetch.latest_seq(RequestKind::Analyze), seq);
    assert!(app.status.contains("already in progress"));

    gate.send(()).unwrap();
    settle(&mut app);
    assert_eq!(app.result().unwrap().compound.display_name(), "Slow");
}

#[test]
fn server_error_shows_alert_and_no_result() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    search(&mut app, "Sarin");
    assert!(app.result().is_some());

    search(&mut app, "Missing");
    assert!(app.result().is_none());
    assert_eq!(app.modals.active(), Some(ModalKind::Alert));
    assert_eq!(app.modals.alert.content().map(String::as_str), Some("not found"));

    app.escape();
    assert!(!app.modals.any_open());
}

#[test]
fn unreachable_server_clears_result_without_alert() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    search(&mut app, "Offline");
    assert_eq!(app.fetch.analysis, FetchState::Idle);
    assert!(!app.modals.any_open());
}

#[test]
fn result_without_reactivity_omits_panel() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    search(&mut app, "Sarin");

    let result = app.result().unwrap();
    assert!(result.reactivity.is_none());

    let text = screen_text(&mut app);
    assert!(text.contains("107-44-8"));
    assert!(text.contains("Rate constant"));
    assert!(!text.contains("Reactivity"));
}

#[test]
fn gaseous_rows_drive_figure_pairs() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    search(&mut app, "Sarin");

    let targets = app.figure_targets();
    let labels: Vec<&str> = targets.iter().map(|t| t.label.as_str()).collect();
    assert_eq!(labels, ["AEGL1_10min", "AEGL2_8hr"]);
    assert_eq!(targets[0].figure_count, 2);
    assert_eq!(targets[1].figure_count, 1);

    app.move_figure_cursor(1);
    app.open_figures();
    let viewer = app.modals.figure.content().unwrap();
    assert_eq!(viewer.entries.len(), 1);
    assert_eq!(viewer.entries[0].label, "AEGL2_8hr · Absorption");
}

#[test]
fn aqueous_grid_is_grouped_and_ordered() {
    let (mut app, _gate) = app(AnalysisMode::Aqueous);
    search(&mut app, "VX");

    let grouped = app.grouped.as_ref().unwrap();
    assert_eq!(grouped.prefixes(), ["AEGL1_8hr", "AEGL1_10min", "AEGL2_30min"]);
    assert_eq!(grouped.ignored().len(), 1);
    assert_eq!(grouped.ignored()[0].key, "random_key");

    app.open_figures();
    assert!(app.modals.is_open(ModalKind::Figure));
    assert_eq!(app.modals.figure.content().unwrap().entries.len(), 4);
}

#[test]
fn results_list_scrolls_to_selected_entry() {
    let (mut app, _gate) = app(AnalysisMode::Aqueous);
    search(&mut app, "Wide");
    let targets = app.figure_targets();
    assert_eq!(targets.len(), 15);
    assert_eq!(targets[0].label, "AEGL1_8hr");
    assert_eq!(targets[14].label, "AEGL3_10min");

    let text = sized_screen_text(&mut app, 120, 16);
    assert!(text.contains("AEGL1_8hr"));
    assert!(!text.contains("AEGL3_10min"));

    app.move_figure_cursor(14);
    assert_eq!(app.figure_cursor, 14);
    let text = sized_screen_text(&mut app, 120, 16);
    assert!(text.contains("AEGL3_10min"));
    assert!(!text.contains("AEGL1_8hr "));
}

#[test]
fn new_search_closes_result_overlays() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    search(&mut app, "Sarin");
    app.toggle_modal(ModalKind::AeglValues);
    app.toggle_modal(ModalKind::ExposureTimes);
    assert!(app.modals.is_open(ModalKind::AeglValues));
    assert!(app.modals.is_open(ModalKind::ExposureTimes));

    app.query = "Soman".into();
    app.analyze_current();
    assert!(!app.modals.any_open());
    settle(&mut app);
}

#[test]
fn mode_toggle_clears_query_and_result() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    search(&mut app, "Sarin");

    app.toggle_mode();
    assert_eq!(app.view.mode, AnalysisMode::Aqueous);
    assert!(app.query.is_empty());
    assert!(app.result().is_none());
    assert!(app.grouped.is_none());
}

#[test]
fn suggestions_follow_typed_prefix() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    app.start_editing();
    app.input('s');
    assert_eq!(app.suggestions.items(), ["Sarin", "Soman"]);

    app.suggestions.select_next();
    app.suggestions.select_next();
    app.submit_search();
    assert_eq!(app.fetch.in_flight_query().map(|q| q.name.as_str()), Some("Soman"));
    assert!(app.query.is_empty());
    assert!(app.suggestions.is_empty());
    settle(&mut app);
    assert_eq!(app.result().unwrap().compound.display_name(), "Soman");
}

#[test]
fn table_view_loads_summary_lazily() {
    let (mut app, _gate) = app(AnalysisMode::Gaseous);
    assert_eq!(app.fetch.summary, FetchState::Idle);

    app.toggle_top();
    settle(&mut app);
    assert_eq!(app.summary.columns(), ["Compound", "cas", "MW", "Predicted_kr", "AEGL1_10min"]);
    let text = screen_text(&mut app);
    assert!(text.contains("Combined Summary"));

    app.toggle_table_view();
    settle(&mut app);
    assert!(app.fetch.scatter.ready().is_some());
}
