//! JSON topology loader.
//!
//! # Format
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": 0, "x": 700512.3, "y": 9313412.8, "lon": 106.8456, "lat": -6.2088 },
//!     { "id": 1, "x": 700623.1, "y": 9313412.8 }
//!   ],
//!   "edges": [
//!     { "u": 0, "v": 1, "length": 110.8, "highway": "primary", "name": "Jl. Sudirman",
//!       "geometry": [[106.8456, -6.2088], [106.8466, -6.2088]] },
//!     { "u": 1, "v": 0 }
//!   ]
//! }
//! ```
//!
//! Node ids are dense: the n-th record must have `id == n` (or omit `id`).
//! `lon`/`lat` are optional but must appear together; when present they are
//! kept as the node's geographic coordinate while `x`/`y` stay the working
//! (possibly projected) coordinate.  Edge `key` defaults to the next free
//! discriminator for its ordered pair.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use rc_core::{EdgeKey, GeoPoint, NodeId, Point};

use crate::network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
use crate::{NetworkError, NetworkResult};

// ── Records ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TopologyFile {
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NodeRecord {
    #[serde(default)]
    pub id:  Option<u32>,
    pub x:   f64,
    pub y:   f64,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EdgeRecord {
    pub u: u32,
    pub v: u32,
    #[serde(default)]
    pub key: Option<u32>,
    #[serde(default)]
    pub length: Option<f64>,
    #[serde(default)]
    pub highway: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geometry: Option<Vec<[f64; 2]>>,
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Read and validate a topology JSON file.
pub fn load_topology(path: &Path) -> NetworkResult<RoadGraph> {
    let text = std::fs::read_to_string(path)?;
    let graph = parse_topology(&text)?;
    tracing::info!(
        path = %path.display(),
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "loaded topology"
    );
    Ok(graph)
}

/// Parse and validate a topology JSON document.
pub fn parse_topology(json: &str) -> NetworkResult<RoadGraph> {
    let file: TopologyFile = serde_json::from_str(json)?;
    file.into_graph()
}

impl TopologyFile {
    /// Validate the records and build the graph.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidTopology`] for non-dense node ids, half-given or
    /// out-of-range geographic coordinates, non-finite coordinates,
    /// non-positive lengths, duplicate edge keys, or a pair whose keys are
    /// exhausted; [`NetworkError::NodeNotFound`] for edges that
    /// reference a missing node.
    pub fn into_graph(self) -> NetworkResult<RoadGraph> {
        let mut b = RoadGraphBuilder::with_capacity(self.nodes.len(), self.edges.len());

        for (i, n) in self.nodes.iter().enumerate() {
            if let Some(id) = n.id {
                if id as usize != i {
                    return Err(NetworkError::InvalidTopology(format!(
                        "node record {i} has id {id}; ids must be dense and in order"
                    )));
                }
            }
            if !(n.x.is_finite() && n.y.is_finite()) {
                return Err(NetworkError::InvalidTopology(format!("node {i} has non-finite coordinates")));
            }
            let pos = Point::new(n.x, n.y);
            match (n.lon, n.lat) {
                (Some(lon), Some(lat)) => {
                    if !(lat.is_finite() && (-90.0..=90.0).contains(&lat)) {
                        return Err(NetworkError::InvalidTopology(format!(
                            "node {i} has latitude {lat} out of range"
                        )));
                    }
                    if !(lon.is_finite() && (-180.0..=180.0).contains(&lon)) {
                        return Err(NetworkError::InvalidTopology(format!(
                            "node {i} has longitude {lon} out of range"
                        )));
                    }
                    b.add_projected_node(pos, GeoPoint::new(lat, lon));
                }
                (None, None) => {
                    b.add_node(pos);
                }
                _ => {
                    return Err(NetworkError::InvalidTopology(format!(
                        "node {i} has only one of lon/lat"
                    )));
                }
            }
        }

        let node_count = self.nodes.len();
        let mut seen: HashSet<EdgeKey> = HashSet::with_capacity(self.edges.len());
        let mut auto_keyed = Vec::new();

        for e in self.edges {
            for n in [e.u, e.v] {
                if n as usize >= node_count {
                    return Err(NetworkError::NodeNotFound(NodeId(n)));
                }
            }
            if let Some(len) = e.length {
                if !(len.is_finite() && len > 0.0) {
                    return Err(NetworkError::InvalidTopology(format!(
                        "edge {} -> {} has non-positive length {len}",
                        e.u, e.v
                    )));
                }
            }
            let attrs = EdgeAttrs {
                length:   e.length,
                highway:  e.highway,
                name:     e.name,
                geometry: e
                    .geometry
                    .map(|pts| pts.into_iter().map(|[x, y]| Point::new(x, y)).collect()),
            };
            let (from, to) = (NodeId(e.u), NodeId(e.v));
            match e.key {
                Some(k) => {
                    let key = EdgeKey::new(from, to, k);
                    if !seen.insert(key) {
                        return Err(NetworkError::InvalidTopology(format!("duplicate edge {key}")));
                    }
                    b.add_keyed_edge(key, attrs);
                }
                None => auto_keyed.push((from, to, attrs)),
            }
        }

        // Explicit keys first so auto-assigned ones never collide with them.
        for (from, to, attrs) in auto_keyed {
            let key = b.add_directed_edge(from, to, attrs);
            if !seen.insert(key) {
                return Err(NetworkError::InvalidTopology(format!(
                    "no free key left for edge {} -> {}",
                    from.0, to.0
                )));
            }
        }

        Ok(b.build())
    }
}
