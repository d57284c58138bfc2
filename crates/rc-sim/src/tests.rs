//! Integration tests for rc-sim.

use std::sync::{Arc, Mutex};

use rc_core::{EdgeKey, NodeId, Point};
use rc_network::{EdgeAttrs, GridLength, GridSpec, RoadGraph, RoadGraphBuilder};
use rc_traffic::{ClosureOutcome, TrafficMap};

use crate::{Session, SessionBuilder, SessionObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn grid3_template() -> GridSpec {
    GridSpec {
        cols: 3,
        rows: 3,
        length: GridLength::Uniform(1.0),
        ..GridSpec::default()
    }
}

fn grid3_session() -> Session {
    let mut s = SessionBuilder::new().grid(grid3_template()).seed(5).build().unwrap();
    s.load_grid(rc_network::DEFAULT_CENTER).unwrap();
    s
}

/// Two-way path 0 ─ 1 ─ 2 ─ 3.
fn path_network() -> RoadGraph {
    let mut b = RoadGraphBuilder::new();
    let n: Vec<NodeId> = (0..4).map(|i| b.add_node(Point::new(i as f64, 0.0))).collect();
    for w in n.windows(2) {
        b.add_road(w[0], w[1], EdgeAttrs::with_length(100.0));
    }
    b.build()
}

fn k(a: u32, b: u32) -> EdgeKey {
    EdgeKey::first(NodeId(a), NodeId(b))
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<String>>>);

impl SessionObserver for Recorder {
    fn on_load(&mut self, graph: &RoadGraph, _traffic: &TrafficMap) {
        self.0.lock().unwrap().push(format!("load {}", graph.node_count()));
    }
    fn on_closure(&mut self, outcome: &ClosureOutcome) {
        self.0.lock().unwrap().push(format!("close {}", outcome.closed));
    }
    fn on_reset(&mut self, _traffic: &TrafficMap) {
        self.0.lock().unwrap().push("reset".into());
    }
}

// ── SessionBuilder ────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;
    use crate::{SessionConfig, SessionError};

    #[test]
    fn builds_with_defaults() {
        let s = SessionBuilder::new().build().unwrap();
        assert!(!s.is_loaded());
        assert_eq!(s.config().traffic.seed, 42);
    }

    #[test]
    fn seed_overrides_config() {
        let s = SessionBuilder::new().seed(9).build().unwrap();
        assert_eq!(s.config().traffic.seed, 9);
    }

    #[test]
    fn invalid_traffic_config_rejected() {
        let mut config = SessionConfig::default();
        config.traffic.base_volume = (300, 100);
        let err = SessionBuilder::new().config(config).build().unwrap_err();
        assert!(matches!(err, SessionError::Core(_)), "got {err:?}");
    }

    #[test]
    fn empty_grid_rejected() {
        let grid = GridSpec { cols: 0, ..GridSpec::default() };
        let err = SessionBuilder::new().grid(grid).build().unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }
}

// ── Session transitions ───────────────────────────────────────────────────────

#[cfg(test)]
mod session_tests {
    use super::*;
    use crate::{ClosureKind, SessionError};

    #[test]
    fn operations_before_load_fail() {
        let mut s = SessionBuilder::new().build().unwrap();
        assert!(matches!(s.reset(), Err(SessionError::NoTopologyLoaded)));
        assert!(matches!(s.close_road(k(0, 1)), Err(SessionError::NoTopologyLoaded)));
        assert!(matches!(s.features(), Err(SessionError::NoTopologyLoaded)));
        assert!(matches!(s.traffic(), Err(SessionError::NoTopologyLoaded)));
        assert_eq!(SessionError::NoTopologyLoaded.to_string(), "No network loaded");
    }

    #[test]
    fn load_default_grid() {
        let mut s = SessionBuilder::new().build().unwrap();
        s.load_grid(rc_network::DEFAULT_CENTER).unwrap();
        let net = s.original().unwrap();
        assert_eq!(net.node_count(), 100);
        assert_eq!(net.edge_count(), 360);
        assert_eq!(s.traffic().unwrap().len(), 360);
        assert_eq!(s.modified().unwrap(), net);
        assert_eq!(s.center(), Some(rc_network::DEFAULT_CENTER));
        // 360 edge lines + 100 node points.
        assert_eq!(s.features().unwrap().features.len(), 460);
    }

    #[test]
    fn load_rejects_empty_graph() {
        let mut s = SessionBuilder::new().build().unwrap();
        assert!(matches!(s.load(RoadGraph::empty()), Err(SessionError::Config(_))));
        assert!(!s.is_loaded());
    }

    #[test]
    fn same_seed_same_baseline() {
        let a = grid3_session();
        let b = grid3_session();
        assert_eq!(a.traffic().unwrap(), b.traffic().unwrap());
    }

    #[test]
    fn grid_centre_closure() {
        let mut s = grid3_session();
        let spec = grid3_template();
        let closed = EdgeKey::first(spec.node_at(1, 1), spec.node_at(2, 1));
        let before = s.traffic().unwrap().clone();

        let summary = s.close_road(closed).unwrap();
        assert_eq!(summary.outcome, ClosureKind::Rerouted);
        assert_eq!(summary.closed_volume, before.get(closed));
        assert_eq!(summary.path.len(), 3);

        let after = s.traffic().unwrap();
        assert!(!after.contains(closed));
        for &key in &summary.path {
            assert_eq!(after.get(key), before.get(key) + summary.closed_volume);
        }
        assert!(!s.modified().unwrap().contains_edge(closed));
        assert!(s.original().unwrap().contains_edge(closed));
    }

    #[test]
    fn pendant_closure_drops() {
        let mut s = SessionBuilder::new().build().unwrap();
        s.load(path_network()).unwrap();
        let total = s.traffic().unwrap().total();
        let summary = s.close_road(k(2, 3)).unwrap();
        assert_eq!(summary.outcome, ClosureKind::Dropped);
        assert!(summary.path.is_empty());
        assert_eq!(s.traffic().unwrap().total(), total - summary.closed_volume as u64);
        assert_eq!(s.center(), None);
    }

    #[test]
    fn closures_start_from_the_original_graph() {
        let mut s = grid3_session();
        s.close_road(k(0, 1)).unwrap();
        s.close_road(k(4, 5)).unwrap();
        let modified = s.modified().unwrap();
        assert!(modified.contains_edge(k(0, 1)), "first closure must be reopened");
        assert!(!modified.contains_edge(k(4, 5)));
        assert_eq!(modified.edge_count(), s.original().unwrap().edge_count() - 1);
    }

    #[test]
    fn absent_edge_changes_nothing() {
        let mut s = grid3_session();
        let before = s.traffic().unwrap().clone();
        // 0 and 8 are opposite corners: both exist, no edge joins them.
        let summary = s.close_road(k(0, 8)).unwrap();
        assert!(!summary.edge_removed);
        assert_eq!(summary.outcome, ClosureKind::NothingToMove);
        assert_eq!(s.traffic().unwrap(), &before);
        assert_eq!(s.modified().unwrap(), s.original().unwrap());
    }

    #[test]
    fn invalid_reference_leaves_state_unchanged() {
        let mut s = grid3_session();
        s.close_road(k(0, 1)).unwrap();
        let traffic = s.traffic().unwrap().clone();
        let modified = s.modified().unwrap().clone();

        let err = s.close_road(k(0, 99)).unwrap_err();
        assert!(matches!(err, SessionError::InvalidEdgeReference { node: NodeId(99), .. }));
        assert_eq!(s.traffic().unwrap(), &traffic);
        assert_eq!(s.modified().unwrap(), &modified);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut s = grid3_session();
        s.close_road(k(4, 5)).unwrap();
        s.close_road(k(1, 4)).unwrap();
        s.reset().unwrap();
        s.reset().unwrap();
        assert_eq!(s.modified().unwrap(), s.original().unwrap());
        let traffic = s.traffic().unwrap();
        assert_eq!(traffic.len(), s.original().unwrap().edge_count());
        for (key, v) in traffic.iter() {
            assert!((10..=1000).contains(&v), "{key} has {v} after reset");
        }
    }

    #[test]
    fn snap_resolves_grid_nodes() {
        let s = grid3_session();
        let net = s.original().unwrap();
        let [x, y] = net.display_xy(NodeId(4));
        assert_eq!(s.snap(Point::new(x + 0.0001, y)).unwrap(), Some(NodeId(4)));
    }

    #[test]
    fn observer_sees_every_transition() {
        let log = Recorder::default();
        let mut s = SessionBuilder::new().grid(grid3_template()).observer(log.clone()).build().unwrap();
        s.load_grid(rc_network::DEFAULT_CENTER).unwrap();
        s.close_road(k(4, 5)).unwrap();
        let _ = s.close_road(k(4, 50));
        s.reset().unwrap();
        let events = log.0.lock().unwrap().clone();
        assert_eq!(events, vec!["load 9", "close (4 -> 5, key 0)", "reset"]);
    }
}

// ── SessionConfig ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use std::io::Write;

    use rc_core::AssignmentModel;

    use crate::{SessionConfig, SessionError};

    #[test]
    fn partial_json_keeps_defaults() {
        let c = SessionConfig::from_json(r#"{ "traffic": { "seed": 7, "model": "simple" } }"#).unwrap();
        assert_eq!(c.traffic.seed, 7);
        assert_eq!(c.traffic.model, AssignmentModel::Simple);
        assert_eq!(c.traffic.volume_ceiling, 1000);
        assert_eq!(c.style.node_limit, 1000);
    }

    #[test]
    fn zero_divisor_rejected() {
        let err = SessionConfig::from_json(r#"{ "style": { "width_divisor": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(SessionConfig::from_json("{ nope"), Err(SessionError::Json(_))));
    }

    #[test]
    fn load_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{ "style": {{ "node_limit": 5 }} }}"#).unwrap();
        let c = SessionConfig::load(f.path()).unwrap();
        assert_eq!(c.style.node_limit, 5);
        assert_eq!(c.traffic.seed, 42);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SessionConfig::load(std::path::Path::new("/nonexistent/rc.json")).unwrap_err();
        assert!(matches!(err, SessionError::Io(_)));
    }
}

// ── Request/response boundary ─────────────────────────────────────────────────

#[cfg(test)]
mod api_tests {
    use serde_json::Value;

    use super::*;
    use crate::api::{self, CloseRequest, LoadRequest};

    fn parse(text: &str) -> Value {
        serde_json::from_str(text).unwrap()
    }

    #[test]
    fn load_defaults_to_jakarta() {
        let mut s = SessionBuilder::new().build().unwrap();
        let resp = api::load_network(&mut s, &LoadRequest::default());
        assert!(resp.success);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["center"][0], -6.2088);
        assert_eq!(json["center"][1], 106.8456);
        assert_eq!(json["network"]["type"], "FeatureCollection");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn line_features_are_lon_lat() {
        let mut s = SessionBuilder::new().build().unwrap();
        let req = LoadRequest { latitude: Some(51.5), longitude: Some(-0.12) };
        let json = serde_json::to_value(api::load_network(&mut s, &req)).unwrap();
        let first = &json["network"]["features"][0];
        assert_eq!(first["geometry"]["type"], "LineString");
        for pt in first["geometry"]["coordinates"].as_array().unwrap() {
            let x = pt[0].as_f64().unwrap();
            let y = pt[1].as_f64().unwrap();
            assert!((x + 0.12).abs() < 0.01, "x = {x} is not a longitude");
            assert!((y - 51.5).abs() < 0.01, "y = {y} is not a latitude");
        }
    }

    #[test]
    fn out_of_range_centre_fails_cleanly() {
        let mut s = SessionBuilder::new().build().unwrap();
        let req = LoadRequest { latitude: Some(123.0), longitude: None };
        let resp = api::load_network(&mut s, &req);
        assert!(!resp.success);
        assert!(resp.payload.is_none());
        assert!(resp.error.unwrap().contains("latitude"));
        assert!(!s.is_loaded());
    }

    #[test]
    fn close_before_load_is_a_failure_result() {
        let mut s = SessionBuilder::new().build().unwrap();
        let req = CloseRequest { node_from: 0, node_to: 1, key: 0 };
        let json = serde_json::to_value(api::close_road(&mut s, &req)).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "No network loaded" }));
    }

    #[test]
    fn close_reports_summary_and_network() {
        let mut s = grid3_session();
        let req = CloseRequest { node_from: 4, node_to: 7, key: 0 };
        let json = serde_json::to_value(api::close_road(&mut s, &req)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["closure"]["outcome"], "rerouted");
        assert_eq!(json["closure"]["closed"]["from"], 4);
        assert_eq!(json["closure"]["path"].as_array().unwrap().len(), 3);
        // 24 directed edges minus the closed one, plus 9 nodes.
        assert_eq!(json["network"]["features"].as_array().unwrap().len(), 23 + 9);
    }

    #[test]
    fn reset_round_trip() {
        let mut s = grid3_session();
        api::close_road(&mut s, &CloseRequest { node_from: 4, node_to: 7, key: 0 });
        let resp = api::reset_network(&mut s);
        assert!(resp.success);
        assert_eq!(resp.payload.unwrap().network.edge_features().count(), 24);
    }

    #[test]
    fn json_close_key_defaults_to_zero() {
        let mut s = grid3_session();
        let out = parse(&api::handle_json(&mut s, "close_road", r#"{"node_from": 4, "node_to": 5}"#));
        assert_eq!(out["success"], true);
        assert_eq!(out["closure"]["closed"]["key"], 0);
    }

    #[test]
    fn json_empty_load_body_uses_defaults() {
        let mut s = SessionBuilder::new().grid(grid3_template()).build().unwrap();
        let out = parse(&api::handle_json(&mut s, "load_network", ""));
        assert_eq!(out["success"], true);
        assert_eq!(out["center"][0], -6.2088);
    }

    #[test]
    fn json_bad_input_never_panics() {
        let mut s = grid3_session();
        for (endpoint, body) in [
            ("close_road", "{}"),
            ("close_road", r#"{"node_from": "x", "node_to": 1}"#),
            ("close_road", "not json"),
            ("close_road", r#"{"node_from": 4, "node_to": 4000}"#),
            ("explode", "{}"),
        ] {
            let out = parse(&api::handle_json(&mut s, endpoint, body));
            assert_eq!(out["success"], false, "{endpoint} {body}");
            assert!(out["error"].is_string());
        }
        // Still usable afterwards.
        let out = parse(&api::handle_json(&mut s, "reset_network", ""));
        assert_eq!(out["success"], true);
    }
}

// ── SharedSession ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod shared_tests {
    use std::thread;

    use super::*;
    use crate::api::{CloseRequest, LoadRequest};
    use crate::SharedSession;

    #[test]
    fn concurrent_requests_serialise() {
        let shared = SharedSession::new(SessionBuilder::new().grid(grid3_template()).build().unwrap());
        assert!(shared.load_network(&LoadRequest::default()).success);

        let handles: Vec<_> = (0..8u32)
            .map(|i| {
                let s = shared.clone();
                thread::spawn(move || {
                    let from = i % 9;
                    let to = if from % 3 == 2 { from - 1 } else { from + 1 };
                    s.close_road(&CloseRequest { node_from: from, node_to: to, key: 0 }).success
                })
            })
            .collect();
        for h in handles {
            assert!(h.join().unwrap());
        }

        let session = shared.lock();
        assert_eq!(
            session.modified().unwrap().edge_count(),
            session.original().unwrap().edge_count() - 1
        );
    }

    #[test]
    fn recovers_from_poisoned_lock() {
        let shared = SharedSession::new(grid3_session());
        let s2 = shared.clone();
        let _ = thread::spawn(move || {
            let _guard = s2.lock();
            panic!("holder panicked");
        })
        .join();
        assert!(shared.reset_network().success);
    }
}
