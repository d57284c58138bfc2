//! The `Session` struct: owned network and traffic state.

use rc_core::{EdgeKey, GeoPoint, NodeId, Point, SimRng};
use rc_network::{build_grid, GridSpec, RoadGraph, Router};
use rc_output::{to_features, FeatureCollection};
use rc_traffic::{assign, close_and_redistribute, ClosureOutcome, Reroute, TrafficError, TrafficMap};
use serde::{Deserialize, Serialize};

use crate::{SessionConfig, SessionError, SessionObserver, SessionResult};

// ── Loaded state ──────────────────────────────────────────────────────────────

/// Everything that exists once a topology is loaded.  Replaced as a whole by
/// load, reset and closure; never partially mutated.
#[derive(Clone, Debug)]
struct Loaded {
    original: RoadGraph,
    modified: RoadGraph,
    traffic:  TrafficMap,
    center:   Option<GeoPoint>,
}

/// How a closure's volume was handled.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClosureKind {
    Rerouted,
    Dropped,
    NothingToMove,
}

/// Serialisable summary of an applied closure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosureSummary {
    pub closed:        EdgeKey,
    /// Whether the edge existed in the original graph.
    pub edge_removed:  bool,
    pub closed_volume: u32,
    pub outcome:       ClosureKind,
    /// Detour edges, in travel order.  Empty unless rerouted.
    pub path:          Vec<EdgeKey>,
}

impl From<&ClosureOutcome> for ClosureSummary {
    fn from(out: &ClosureOutcome) -> Self {
        let (outcome, path) = match &out.reroute {
            Reroute::Rerouted { path } => (ClosureKind::Rerouted, path.clone()),
            Reroute::Dropped => (ClosureKind::Dropped, Vec::new()),
            Reroute::NothingToMove => (ClosureKind::NothingToMove, Vec::new()),
        };
        Self {
            closed: out.closed,
            edge_removed: out.edge_removed,
            closed_volume: out.closed_volume,
            outcome,
            path,
        }
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One user's view of the simulator.
///
/// Holds the original graph, the modified graph (the original minus the most
/// recent closure) and the current traffic map.  Every operation either
/// replaces that state wholesale or fails and leaves it untouched.
///
/// Closures always start from a fresh copy of the *original* graph, so closing
/// a second road reopens the first.  The traffic map, however, carries over:
/// each closure redistributes on top of the current volumes.
///
/// Create via [`SessionBuilder`][crate::SessionBuilder].
pub struct Session {
    config:   SessionConfig,
    rng:      SimRng,
    router:   Box<dyn Router>,
    observer: Box<dyn SessionObserver>,
    grid:     GridSpec,
    state:    Option<Loaded>,
}

impl Session {
    pub(crate) fn from_parts(
        config: SessionConfig,
        router: Box<dyn Router>,
        observer: Box<dyn SessionObserver>,
        grid: GridSpec,
    ) -> Self {
        Self {
            rng: SimRng::new(config.traffic.seed),
            config,
            router,
            observer,
            grid,
            state: None,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Replace the topology with `graph` and assign baseline traffic.
    pub fn load(&mut self, graph: RoadGraph) -> SessionResult<()> {
        self.install(graph, None)
    }

    /// Load a synthetic grid centred on `center`, shaped like the session's
    /// grid template.
    pub fn load_grid(&mut self, center: GeoPoint) -> SessionResult<()> {
        let spec = GridSpec { center, ..self.grid.clone() };
        let graph = build_grid(&spec);
        self.install(graph, Some(center))
    }

    fn install(&mut self, graph: RoadGraph, center: Option<GeoPoint>) -> SessionResult<()> {
        if graph.is_empty() {
            return Err(SessionError::Config("cannot load a network with no nodes".into()));
        }
        let traffic = assign(&graph, &self.config.traffic, &mut self.rng);
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            total = traffic.total(),
            "network loaded"
        );
        self.observer.on_load(&graph, &traffic);
        self.state = Some(Loaded {
            modified: graph.clone(),
            original: graph,
            traffic,
            center,
        });
        Ok(())
    }

    /// Restore the modified graph to the original and draw a fresh baseline.
    ///
    /// The RNG stream continues, so the new baseline is statistically
    /// equivalent to, not identical with, the one drawn at load time.
    pub fn reset(&mut self) -> SessionResult<()> {
        let state = self.state.as_mut().ok_or(SessionError::NoTopologyLoaded)?;
        let traffic = assign(&state.original, &self.config.traffic, &mut self.rng);
        state.modified = state.original.clone();
        state.traffic = traffic;
        tracing::info!(total = state.traffic.total(), "network reset");
        self.observer.on_reset(&state.traffic);
        Ok(())
    }

    /// Close `edge` and redistribute its traffic.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NoTopologyLoaded`] before any load.
    /// - [`SessionError::InvalidEdgeReference`] if an endpoint is not a node.
    ///
    /// Closing an edge that does not exist between two valid nodes succeeds
    /// and changes nothing but the modified graph reverting to the original.
    pub fn close_road(&mut self, edge: EdgeKey) -> SessionResult<ClosureSummary> {
        let state = self.state.as_mut().ok_or(SessionError::NoTopologyLoaded)?;
        let outcome = close_and_redistribute(&state.original, &state.traffic, edge, self.router.as_ref())
            .map_err(|e| match e {
                TrafficError::UnknownNode(node) => SessionError::InvalidEdgeReference { edge, node },
            })?;

        let summary = ClosureSummary::from(&outcome);
        tracing::info!(
            edge = %edge,
            removed = summary.edge_removed,
            volume = summary.closed_volume,
            outcome = ?summary.outcome,
            detour_edges = summary.path.len(),
            "road closed"
        );
        if summary.outcome == ClosureKind::Dropped {
            tracing::debug!(edge = %edge, "no alternative route; closed volume dropped");
        }
        self.observer.on_closure(&outcome);

        state.modified = outcome.graph;
        state.traffic = outcome.traffic;
        Ok(summary)
    }

    // ── Views ─────────────────────────────────────────────────────────────

    /// Feature collection of the modified graph with current traffic.
    pub fn features(&self) -> SessionResult<FeatureCollection> {
        let state = self.loaded()?;
        Ok(to_features(&state.modified, &state.traffic, &self.config.style))
    }

    pub fn is_loaded(&self) -> bool {
        self.state.is_some()
    }

    pub fn original(&self) -> SessionResult<&RoadGraph> {
        Ok(&self.loaded()?.original)
    }

    pub fn modified(&self) -> SessionResult<&RoadGraph> {
        Ok(&self.loaded()?.modified)
    }

    pub fn traffic(&self) -> SessionResult<&TrafficMap> {
        Ok(&self.loaded()?.traffic)
    }

    /// Centre of the loaded grid; `None` for file-loaded topologies.
    pub fn center(&self) -> Option<GeoPoint> {
        self.state.as_ref().and_then(|s| s.center)
    }

    /// Node of the original graph nearest to a working coordinate.
    pub fn snap(&self, pos: Point) -> SessionResult<Option<NodeId>> {
        Ok(self.loaded()?.original.snap_to_node(pos))
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    fn loaded(&self) -> SessionResult<&Loaded> {
        self.state.as_ref().ok_or(SessionError::NoTopologyLoaded)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("loaded", &self.state.is_some())
            .finish_non_exhaustive()
    }
}
