//! GeoJSON feature collection view of a road graph and its traffic.
//!
//! One `LineString` feature per directed edge, in `EdgeId` order, followed
//! by one `Point` feature per node unless the graph is larger than
//! [`FeatureStyle::node_limit`].  Every coordinate is `[x, y]` =
//! `[lon, lat]`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rc_core::NodeId;
use rc_network::RoadGraph;
use rc_traffic::TrafficMap;
use serde::{Deserialize, Serialize};

use crate::OutputResult;

/// Highway label used for edges without a classification.
pub const DEFAULT_HIGHWAY: &str = "road";

// ── Style ─────────────────────────────────────────────────────────────────────

/// Rendering knobs for [`to_features`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureStyle {
    /// Width of an edge with no traffic.
    pub base_width:    f64,
    /// `width = base_width + traffic / width_divisor`.
    pub width_divisor: f64,
    /// Node points are omitted when the graph has more nodes than this.
    pub node_limit:    usize,
}

impl Default for FeatureStyle {
    fn default() -> Self {
        Self { base_width: 1.0, width_divisor: 200.0, node_limit: 1000 }
    }
}

impl FeatureStyle {
    #[inline]
    pub fn width(&self, traffic: u32) -> f64 {
        self.base_width + traffic as f64 / self.width_divisor
    }
}

// ── Document types ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "FeatureCollection")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Feature")]
pub struct Feature {
    pub geometry:   Geometry,
    pub properties: Properties,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    LineString { coordinates: Vec<[f64; 2]> },
    Point { coordinates: [f64; 2] },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Properties {
    Edge(EdgeProperties),
    Node(NodeProperties),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeProperties {
    pub u:       u32,
    pub v:       u32,
    pub key:     u32,
    pub name:    String,
    pub highway: String,
    pub traffic: u32,
    pub width:   f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeProperties {
    pub id: u32,
    /// Always `"node"`.
    #[serde(rename = "type")]
    pub kind: String,
}

impl FeatureCollection {
    pub fn edge_features(&self) -> impl Iterator<Item = (&Geometry, &EdgeProperties)> {
        self.features.iter().filter_map(|f| match &f.properties {
            Properties::Edge(p) => Some((&f.geometry, p)),
            Properties::Node(_) => None,
        })
    }

    pub fn node_count(&self) -> usize {
        self.features
            .iter()
            .filter(|f| matches!(f.properties, Properties::Node(_)))
            .count()
    }
}

// ── Serialisation ─────────────────────────────────────────────────────────────

/// Project `graph` plus `traffic` into a feature collection.
///
/// Edges missing from `traffic` are drawn with volume 0.
pub fn to_features(graph: &RoadGraph, traffic: &TrafficMap, style: &FeatureStyle) -> FeatureCollection {
    let mut features = Vec::with_capacity(graph.edge_count() + graph.node_count());

    for e in graph.edges() {
        let key = graph.edge_key(e);
        let attrs = &graph.edge_attrs[e.index()];

        let coordinates = match &attrs.geometry {
            Some(line) if line.len() >= 2 => line.iter().map(|p| p.to_xy()).collect(),
            _ => vec![graph.display_xy(key.from), graph.display_xy(key.to)],
        };

        let volume = traffic.get(key);
        features.push(Feature {
            geometry: Geometry::LineString { coordinates },
            properties: Properties::Edge(EdgeProperties {
                u: key.from.0,
                v: key.to.0,
                key: key.key,
                name: attrs
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("Road {}-{}", key.from.0, key.to.0)),
                highway: attrs.highway.clone().unwrap_or_else(|| DEFAULT_HIGHWAY.to_owned()),
                traffic: volume,
                width: style.width(volume),
            }),
        });
    }

    if graph.node_count() <= style.node_limit {
        for i in 0..graph.node_count() {
            let id = NodeId(i as u32);
            features.push(Feature {
                geometry: Geometry::Point { coordinates: graph.display_xy(id) },
                properties: Properties::Node(NodeProperties { id: id.0, kind: "node".to_owned() }),
            });
        }
    } else {
        tracing::debug!(nodes = graph.node_count(), limit = style.node_limit, "node features elided");
    }

    FeatureCollection { features }
}

/// Write `collection` as pretty-printed JSON to `path`.
pub fn write_geojson(path: &Path, collection: &FeatureCollection) -> OutputResult<()> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, collection)?;
    out.flush()?;
    tracing::debug!(path = %path.display(), features = collection.features.len(), "geojson written");
    Ok(())
}
