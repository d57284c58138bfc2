//! Synthetic traffic volume generation.
//!
//! # Weighted model
//!
//! ```text
//! volume = round(base × class × length × centrality × jitter)  clamped to [floor, ceiling]
//!
//!   base        ~ U{base_volume}                     (default 50..=200)
//!   class       = RoadClass::traffic_factor          (3.0 / 2.0 / 1.0 / 0.5)
//!   length      = clamp(200 / max(len, 50), 0.5, 2)  (1.0 when len is absent)
//!   centrality  = 1 + 2 × betweenness / max          (2.0 on uniform fallback)
//!   jitter      ~ U[jitter]                          (default 0.8..=1.2)
//! ```
//!
//! The model is a plausible-looking generator for visualisation, not a
//! calibrated demand model.
//!
//! # Simple model
//!
//! One uniform draw from `simple_volume` per edge (default 10..=1000).
//!
//! Edges are visited in `EdgeId` order, so a seeded [`SimRng`] reproduces the
//! same map for the same graph.

use rc_core::{AssignmentModel, RoadClass, SimRng, TrafficConfig};
use rc_network::{PathWeight, RoadGraph};

use crate::centrality::{edge_betweenness, EdgeCentrality};
use crate::TrafficMap;

/// Generate a baseline traffic map for every edge of `graph`.
pub fn assign(graph: &RoadGraph, config: &TrafficConfig, rng: &mut SimRng) -> TrafficMap {
    match config.model {
        AssignmentModel::Simple => assign_simple(graph, config, rng),
        AssignmentModel::Weighted => {
            let centrality = edge_betweenness(
                graph,
                PathWeight::for_graph(graph),
                config.centrality_sample,
                config.centrality_max_nodes,
                rng,
            );
            if let EdgeCentrality::Uniform { reason } = &centrality {
                tracing::warn!(%reason, "centrality degraded to uniform fallback");
            }
            assign_weighted(graph, config, &centrality, rng)
        }
    }
}

/// Weighted model with a precomputed centrality.
pub fn assign_weighted(
    graph: &RoadGraph,
    config: &TrafficConfig,
    centrality: &EdgeCentrality,
    rng: &mut SimRng,
) -> TrafficMap {
    let (base_lo, base_hi) = config.base_volume;
    let (jit_lo, jit_hi) = config.jitter;

    let traffic: TrafficMap = graph
        .edges()
        .map(|e| {
            let attrs = &graph.edge_attrs[e.index()];
            let base = rng.gen_range(base_lo..=base_hi) as f64;
            let jitter = rng.gen_range(jit_lo..=jit_hi);
            let raw = base
                * classification_factor(attrs.highway.as_deref())
                * length_factor(attrs.length)
                * centrality.factor(e)
                * jitter;
            (graph.edge_key(e), clamp_volume(raw, config))
        })
        .collect();

    tracing::debug!(edges = traffic.len(), total = traffic.total(), "weighted assignment");
    traffic
}

/// Simple model: one uniform draw per edge.
pub fn assign_simple(graph: &RoadGraph, config: &TrafficConfig, rng: &mut SimRng) -> TrafficMap {
    let (lo, hi) = config.simple_volume;
    graph
        .edges()
        .map(|e| {
            let v = rng.gen_range(lo..=hi) as f64;
            (graph.edge_key(e), clamp_volume(v, config))
        })
        .collect()
}

/// Multiplier for a raw `highway` classification.
#[inline]
pub fn classification_factor(highway: Option<&str>) -> f64 {
    RoadClass::from_highway(highway).traffic_factor()
}

/// Multiplier favouring short (dense-area) edges.
#[inline]
pub fn length_factor(length: Option<f64>) -> f64 {
    match length {
        Some(len) => (200.0 / len.max(50.0)).clamp(0.5, 2.0),
        None => 1.0,
    }
}

#[inline]
fn clamp_volume(raw: f64, config: &TrafficConfig) -> u32 {
    let floor = config.volume_floor as f64;
    let ceiling = config.volume_ceiling as f64;
    if raw.is_nan() {
        return config.volume_floor;
    }
    raw.round().clamp(floor, ceiling) as u32
}
