//! Routing trait and default Dijkstra implementation.
//!
//! # Path weights
//!
//! When every edge of a graph carries a length, paths minimise total length.
//! If any edge lacks one, every edge costs one hop.  See
//! [`PathWeight::for_graph`].
//!
//! # No route is not an error
//!
//! A disconnected pair is a routine outcome here (closing the only road into
//! a cul-de-sac), so [`Router::route`] returns `Option<Route>`.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use rc_core::{EdgeId, EdgeKey, NodeId};

use crate::network::RoadGraph;

// ── PathWeight ────────────────────────────────────────────────────────────────

/// How an edge's traversal cost is measured.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum PathWeight {
    /// Edge length attribute.
    Length,
    /// Every edge costs 1.
    Hops,
}

impl PathWeight {
    /// `Length` if every edge has a length, otherwise `Hops`.
    pub fn for_graph(graph: &RoadGraph) -> Self {
        if graph.edge_count() > 0 && graph.all_edges_have_length() {
            PathWeight::Length
        } else {
            PathWeight::Hops
        }
    }

    /// Cost of traversing `edge`.
    #[inline]
    pub fn cost(self, graph: &RoadGraph, edge: EdgeId) -> f64 {
        match self {
            PathWeight::Length => graph.edge_attrs[edge.index()].length.unwrap_or(1.0),
            PathWeight::Hops => 1.0,
        }
    }
}

// ── Cost ──────────────────────────────────────────────────────────────────────

/// Totally ordered `f64` path cost for use as a priority-queue key.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered list of `EdgeId`s and the total
/// cost under the weight used.
#[derive(Debug, Clone)]
pub struct Route {
    /// Edges to traverse in order, from source to destination.
    pub edges: Vec<EdgeId>,
    pub total_cost: f64,
}

impl Route {
    /// `true` if the source and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    /// Resolve the route's edges to stable keys in `graph`.
    pub fn keys(&self, graph: &RoadGraph) -> Vec<EdgeKey> {
        self.edges.iter().map(|&e| graph.edge_key(e)).collect()
    }

    /// Nodes visited, source first.  Empty for a trivial route.
    pub fn nodes(&self, graph: &RoadGraph) -> Vec<NodeId> {
        let Some(&first) = self.edges.first() else {
            return Vec::new();
        };
        let mut nodes = vec![graph.edge_from[first.index()]];
        nodes.extend(self.edges.iter().map(|&e| graph.edge_to[e.index()]));
        nodes
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine used by the closure controller.
///
/// Implementations must be `Send + Sync` so a session can sit behind a
/// shared lock.
pub trait Router: Send + Sync {
    /// Shortest route from `from` to `to`, or `None` if `to` is unreachable
    /// (or either node is not in `graph`).  `from == to` yields an empty
    /// route rather than `None`.
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> Option<Route>;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the CSR road graph, weighted by
/// [`PathWeight::for_graph`].
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &RoadGraph, from: NodeId, to: NodeId) -> Option<Route> {
        dijkstra(graph, from, to, PathWeight::for_graph(graph))
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(graph: &RoadGraph, from: NodeId, to: NodeId, weight: PathWeight) -> Option<Route> {
    if !graph.contains_node(from) || !graph.contains_node(to) {
        return None;
    }
    if from == to {
        return Some(Route { edges: vec![], total_cost: 0.0 });
    }

    let n = graph.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Min-heap: (cost, node). Secondary key NodeId ensures deterministic
    // tie-breaking.
    let mut heap: BinaryHeap<Reverse<(Cost, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((Cost(0.0), from)));

    while let Some(Reverse((Cost(cost), node))) = heap.pop() {
        if node == to {
            return Some(reconstruct(graph, &prev_edge, from, to, cost));
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for edge in graph.out_edges(node) {
            let neighbor = graph.edge_to[edge.index()];
            let new_cost = cost + weight.cost(graph, edge);

            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev_edge[neighbor.index()] = edge;
                heap.push(Reverse((Cost(new_cost), neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    graph: &RoadGraph,
    prev_edge: &[EdgeId],
    from: NodeId,
    to: NodeId,
    total_cost: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        edges.push(e);
        cur = graph.edge_from[e.index()];
    }
    edges.reverse();
    Route { edges, total_cost }
}
