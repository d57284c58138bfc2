//! Road closure and traffic redistribution.
//!
//! Closing edge `(u, v, k)`:
//!
//! 1. Copy the original graph without that edge (no-op if it is absent).
//! 2. Take the edge's volume out of the traffic map (0 if it had none).
//! 3. If the volume is positive, route `u → v` on the copy and add the full
//!    volume to every edge of the detour.  Sums are not clamped.
//! 4. If no detour exists the volume is dropped.
//!
//! The inputs are never mutated; the caller swaps in the outcome as a whole.

use rc_core::EdgeKey;
use rc_network::{RoadGraph, Router};

use crate::{TrafficError, TrafficMap, TrafficResult};

/// What happened to the closed edge's volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reroute {
    /// The volume was added to every edge of `path`.
    Rerouted { path: Vec<EdgeKey> },
    /// No alternative route; the volume left the network.
    Dropped,
    /// The closed edge carried no traffic.
    NothingToMove,
}

/// Result of a closure: the post-closure graph and traffic plus a summary.
#[derive(Clone, Debug)]
pub struct ClosureOutcome {
    pub graph:         RoadGraph,
    pub traffic:       TrafficMap,
    pub closed:        EdgeKey,
    /// Whether the edge existed in the original graph.
    pub edge_removed:  bool,
    pub closed_volume: u32,
    pub reroute:       Reroute,
}

/// Close `closed` on a copy of `original` and redistribute its traffic.
///
/// # Errors
///
/// [`TrafficError::UnknownNode`] if either endpoint is not a node of
/// `original`.  A missing *edge* between existing nodes is not an error.
pub fn close_and_redistribute<R: Router + ?Sized>(
    original: &RoadGraph,
    traffic: &TrafficMap,
    closed: EdgeKey,
    router: &R,
) -> TrafficResult<ClosureOutcome> {
    for node in [closed.from, closed.to] {
        if !original.contains_node(node) {
            return Err(TrafficError::UnknownNode(node));
        }
    }

    let edge_removed = original.contains_edge(closed);
    let graph = original.without_edge(closed);

    let mut new_traffic = traffic.clone();
    let closed_volume = new_traffic.remove(closed).unwrap_or(0);

    let reroute = if closed_volume == 0 {
        Reroute::NothingToMove
    } else {
        match router.route(&graph, closed.from, closed.to) {
            Some(route) if !route.is_trivial() => {
                tracing::debug!(closed = %closed, via = ?route.nodes(&graph), volume = closed_volume, "rerouting closed volume");
                let path = route.keys(&graph);
                redistribute(&mut new_traffic, &path, closed_volume);
                Reroute::Rerouted { path }
            }
            _ => Reroute::Dropped,
        }
    };

    Ok(ClosureOutcome {
        graph,
        traffic: new_traffic,
        closed,
        edge_removed,
        closed_volume,
        reroute,
    })
}

/// Add `volume` to each edge of `path`.
pub fn redistribute(traffic: &mut TrafficMap, path: &[EdgeKey], volume: u32) {
    for &key in path {
        traffic.add(key, volume);
    }
}
