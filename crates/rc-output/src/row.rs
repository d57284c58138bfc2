//! Plain data row types written by output backends.

use rc_traffic::{ClosureOutcome, Reroute, TrafficMap};

/// Volume on one directed edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrafficRow {
    pub u:       u32,
    pub v:       u32,
    pub key:     u32,
    pub traffic: u32,
}

impl TrafficRow {
    /// One row per entry of `traffic`, in key order.
    pub fn from_map(traffic: &TrafficMap) -> Vec<TrafficRow> {
        traffic
            .iter()
            .map(|(k, traffic)| TrafficRow { u: k.from.0, v: k.to.0, key: k.key, traffic })
            .collect()
    }
}

/// Summary of one applied closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosureRow {
    pub u:             u32,
    pub v:             u32,
    pub key:           u32,
    pub edge_removed:  bool,
    pub closed_volume: u32,
    /// `"rerouted"`, `"dropped"` or `"none"`.
    pub outcome:       &'static str,
    /// Number of detour edges; 0 unless rerouted.
    pub path_edges:    usize,
}

impl From<&ClosureOutcome> for ClosureRow {
    fn from(out: &ClosureOutcome) -> Self {
        let (outcome, path_edges) = match &out.reroute {
            Reroute::Rerouted { path } => ("rerouted", path.len()),
            Reroute::Dropped => ("dropped", 0),
            Reroute::NothingToMove => ("none", 0),
        };
        ClosureRow {
            u: out.closed.from.0,
            v: out.closed.to.0,
            key: out.closed.key,
            edge_removed: out.edge_removed,
            closed_volume: out.closed_volume,
            outcome,
            path_edges,
        }
    }
}
