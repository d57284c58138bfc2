//! Topology selection for the demo: a synthetic grid or a JSON file.

use std::path::Path;

use anyhow::{Context, Result};
use rc_core::{EdgeKey, NodeId};
use rc_network::{load_topology, GridSpec, RoadGraph};

/// Grid template for the session; the centre is filled in at load time.
pub fn grid_template(cols: usize, rows: usize, arterial_every: Option<usize>) -> GridSpec {
    GridSpec { cols, rows, arterial_every, ..GridSpec::default() }
}

/// Read a topology file, attaching the path to any error.
pub fn read_topology(path: &Path) -> Result<RoadGraph> {
    load_topology(path).with_context(|| format!("loading topology {}", path.display()))
}

/// Edge closed when the command line names none: from the node nearest the
/// grid centre to its eastern neighbour, or the first edge of a file topology.
pub fn default_closure(graph: &RoadGraph, grid: Option<&GridSpec>) -> Option<EdgeKey> {
    if let Some(spec) = grid {
        if spec.cols >= 2 {
            let col = (spec.cols / 2).min(spec.cols - 2);
            let row = spec.rows / 2;
            return Some(EdgeKey::first(spec.node_at(col, row), spec.node_at(col + 1, row)));
        }
    }
    graph.edges().next().map(|e| graph.edge_key(e))
}

/// Resolve `--from/--to` into a closure key.
pub fn requested_closure(from: Option<u32>, to: Option<u32>, key: u32) -> Option<EdgeKey> {
    match (from, to) {
        (Some(u), Some(v)) => Some(EdgeKey::new(NodeId(u), NodeId(v), key)),
        _ => None,
    }
}
