//! Sampled edge betweenness centrality (Brandes).
//!
//! # Algorithm
//!
//! For each sampled source `s`, a Dijkstra pass records the number of
//! shortest paths `sigma[v]` and the shortest-path predecessor edges of every
//! settled node.  Dependencies are then accumulated in reverse settling order:
//!
//! ```text
//! for edge e = (v → w) in preds[w]:
//!     c        = sigma[v] / sigma[w] * (1 + delta[w])
//!     score[e] += c
//!     delta[v] += c
//! ```
//!
//! Only the ratio `score / max(score)` is used downstream, so raw sums are
//! never rescaled for the sample fraction.
//!
//! # Fallback
//!
//! The result is an explicit two-variant [`EdgeCentrality`].  Degenerate or
//! oversized graphs produce [`EdgeCentrality::Uniform`] with the reason
//! attached; callers never see an error.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rc_core::{EdgeId, NodeId, SimRng};
use rc_network::{Cost, PathWeight, RoadGraph};

/// Normalised centrality given to every edge when computation degrades.
pub const UNIFORM_CENTRALITY: f64 = 0.5;

/// Why centrality fell back to [`UNIFORM_CENTRALITY`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DegradedReason {
    /// Fewer than two nodes: no pair to route between.
    TooFewNodes,
    NoEdges,
    TooManyNodes { nodes: usize, limit: usize },
    /// A negative or non-finite edge weight makes Dijkstra unsound.
    InvalidWeight,
    /// No sampled shortest path traversed any edge.
    AllZero,
}

impl std::fmt::Display for DegradedReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DegradedReason::TooFewNodes => f.write_str("fewer than two nodes"),
            DegradedReason::NoEdges => f.write_str("graph has no edges"),
            DegradedReason::TooManyNodes { nodes, limit } => {
                write!(f, "{nodes} nodes exceeds limit of {limit}")
            }
            DegradedReason::InvalidWeight => f.write_str("negative or non-finite edge weight"),
            DegradedReason::AllZero => f.write_str("every edge scored zero"),
        }
    }
}

/// Per-edge centrality, or the uniform fallback.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeCentrality {
    Computed {
        /// Raw betweenness indexed by `EdgeId` of the graph it was computed on.
        values:  Vec<f64>,
        /// Largest entry of `values`; always > 0.
        max:     f64,
        /// Number of source nodes actually used.
        sources: usize,
    },
    Uniform { reason: DegradedReason },
}

impl EdgeCentrality {
    /// Centrality of `edge` scaled into `[0, 1]`.
    #[inline]
    pub fn normalized(&self, edge: EdgeId) -> f64 {
        match self {
            EdgeCentrality::Computed { values, max, .. } => {
                values.get(edge.index()).map_or(0.0, |v| v / max)
            }
            EdgeCentrality::Uniform { .. } => UNIFORM_CENTRALITY,
        }
    }

    /// Traffic multiplier: `1 + 2 * normalized`, so in `[1, 3]`.
    #[inline]
    pub fn factor(&self, edge: EdgeId) -> f64 {
        1.0 + 2.0 * self.normalized(edge)
    }

    pub fn is_uniform(&self) -> bool {
        matches!(self, EdgeCentrality::Uniform { .. })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

/// Edge betweenness over at most `sample` randomly chosen source nodes.
///
/// Graphs with more than `max_nodes` nodes skip the computation entirely.
pub fn edge_betweenness(
    graph: &RoadGraph,
    weight: PathWeight,
    sample: usize,
    max_nodes: usize,
    rng: &mut SimRng,
) -> EdgeCentrality {
    let n = graph.node_count();
    if n < 2 {
        return EdgeCentrality::Uniform { reason: DegradedReason::TooFewNodes };
    }
    if graph.edge_count() == 0 {
        return EdgeCentrality::Uniform { reason: DegradedReason::NoEdges };
    }
    if n > max_nodes {
        return EdgeCentrality::Uniform {
            reason: DegradedReason::TooManyNodes { nodes: n, limit: max_nodes },
        };
    }
    if graph.edges().any(|e| {
        let w = weight.cost(graph, e);
        !w.is_finite() || w < 0.0
    }) {
        return EdgeCentrality::Uniform { reason: DegradedReason::InvalidWeight };
    }

    let sources: Vec<NodeId> = rng
        .sample_indices(n, sample.max(1))
        .into_iter()
        .map(|i| NodeId(i as u32))
        .collect();

    let values = accumulate(graph, weight, &sources);

    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if !(max.is_finite() && max > 0.0) {
        return EdgeCentrality::Uniform { reason: DegradedReason::AllZero };
    }

    tracing::debug!(sources = sources.len(), max, "edge betweenness computed");
    EdgeCentrality::Computed { values, max, sources: sources.len() }
}

// ── Accumulation ──────────────────────────────────────────────────────────────

#[cfg(not(feature = "parallel"))]
fn accumulate(graph: &RoadGraph, weight: PathWeight, sources: &[NodeId]) -> Vec<f64> {
    let mut ws = Workspace::new(graph.node_count());
    let mut scores = vec![0.0; graph.edge_count()];
    for &s in sources {
        ws.single_source(graph, weight, s, &mut scores);
    }
    scores
}

/// Sources per Rayon task.  Fixed so the summation order does not depend on
/// the thread count or on work stealing.
#[cfg(feature = "parallel")]
const SOURCES_PER_TASK: usize = 8;

#[cfg(feature = "parallel")]
fn accumulate(graph: &RoadGraph, weight: PathWeight, sources: &[NodeId]) -> Vec<f64> {
    use rayon::prelude::*;

    let m = graph.edge_count();
    let partials: Vec<Vec<f64>> = sources
        .par_chunks(SOURCES_PER_TASK)
        .map(|chunk| {
            let mut ws = Workspace::new(graph.node_count());
            let mut scores = vec![0.0; m];
            for &s in chunk {
                ws.single_source(graph, weight, s, &mut scores);
            }
            scores
        })
        .collect();

    // Chunk order, not completion order.
    let mut scores = vec![0.0; m];
    for part in partials {
        scores.iter_mut().zip(part).for_each(|(x, y)| *x += y);
    }
    scores
}

/// Scratch buffers reused across sources.
struct Workspace {
    dist:    Vec<f64>,
    sigma:   Vec<f64>,
    delta:   Vec<f64>,
    settled: Vec<bool>,
    preds:   Vec<Vec<EdgeId>>,
    order:   Vec<NodeId>,
    heap:    BinaryHeap<Reverse<(Cost, NodeId)>>,
}

impl Workspace {
    fn new(n: usize) -> Self {
        Self {
            dist:    vec![f64::INFINITY; n],
            sigma:   vec![0.0; n],
            delta:   vec![0.0; n],
            settled: vec![false; n],
            preds:   vec![Vec::new(); n],
            order:   Vec::with_capacity(n),
            heap:    BinaryHeap::new(),
        }
    }

    fn reset(&mut self) {
        self.dist.fill(f64::INFINITY);
        self.sigma.fill(0.0);
        self.delta.fill(0.0);
        self.settled.fill(false);
        self.preds.iter_mut().for_each(Vec::clear);
        self.order.clear();
        self.heap.clear();
    }

    fn single_source(&mut self, graph: &RoadGraph, weight: PathWeight, s: NodeId, scores: &mut [f64]) {
        self.reset();
        self.dist[s.index()] = 0.0;
        self.sigma[s.index()] = 1.0;
        self.heap.push(Reverse((Cost(0.0), s)));

        // ── Forward: shortest-path DAG from s ─────────────────────────────
        while let Some(Reverse((Cost(d), v))) = self.heap.pop() {
            if self.settled[v.index()] || d > self.dist[v.index()] {
                continue;
            }
            self.settled[v.index()] = true;
            self.order.push(v);

            for e in graph.out_edges(v) {
                let w = graph.edge_to[e.index()];
                if self.settled[w.index()] {
                    continue;
                }
                let nd = d + weight.cost(graph, e);
                let cur = self.dist[w.index()];
                let tol = 1e-9 * nd.abs().max(1.0);
                if nd < cur - tol {
                    self.dist[w.index()] = nd;
                    self.sigma[w.index()] = self.sigma[v.index()];
                    self.preds[w.index()].clear();
                    self.preds[w.index()].push(e);
                    self.heap.push(Reverse((Cost(nd), w)));
                } else if (nd - cur).abs() <= tol {
                    self.sigma[w.index()] += self.sigma[v.index()];
                    self.preds[w.index()].push(e);
                }
            }
        }

        // ── Backward: dependency accumulation ─────────────────────────────
        while let Some(w) = self.order.pop() {
            let coeff = (1.0 + self.delta[w.index()]) / self.sigma[w.index()];
            for &e in &self.preds[w.index()] {
                let v = graph.edge_from[e.index()];
                let c = self.sigma[v.index()] * coeff;
                scores[e.index()] += c;
                self.delta[v.index()] += c;
            }
        }
    }
}
