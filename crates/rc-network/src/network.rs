//! Directed road graph and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_from[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edge arrays (`edge_from`, `edge_to`, `edge_key`, `edge_attrs`) are sorted
//! by `(from, to, key)` and indexed by `EdgeId`, so iteration order is
//! deterministic and a node's outgoing edges are a contiguous scan.
//!
//! # Copy-then-modify
//!
//! A `RoadGraph` is never mutated in place by callers.  A closure produces a
//! brand-new graph through [`RoadGraph::without_edge`], leaving the original
//! untouched; there is no public edge-removal API.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps working-space `(x, y)` to the nearest
//! `NodeId`.  Used to resolve a clicked map position to an intersection.

use std::collections::HashMap;

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use rc_core::{EdgeId, EdgeKey, GeoPoint, NodeId, Point};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── Edge attributes ───────────────────────────────────────────────────────────

/// Optional per-edge attributes carried through from the topology source.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EdgeAttrs {
    /// Positive length in network units (metres for geographic networks).
    pub length: Option<f64>,
    /// Raw road classification, e.g. `"primary"` or `"service"`.
    pub highway: Option<String>,
    /// Street name, if the source had one.
    pub name: Option<String>,
    /// Explicit polyline in output coordinates `(lon, lat)`.  When absent the
    /// straight segment between the endpoints is drawn.
    pub geometry: Option<Vec<Point>>,
}

impl EdgeAttrs {
    pub fn with_length(length: f64) -> Self {
        Self { length: Some(length), ..Self::default() }
    }

    pub fn highway(mut self, highway: impl Into<String>) -> Self {
        self.highway = Some(highway.into());
        self
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for node snapping.
///
/// All data fields are `pub` for direct indexed access on hot paths.  Do not
/// construct directly; use [`RoadGraphBuilder`].
#[derive(Clone)]
pub struct RoadGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Working coordinate of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    /// Preserved geographic coordinate, when the working coordinates are a
    /// projection.  `None` means `node_pos` is already `(lon, lat)`.
    pub node_geo: Vec<Option<GeoPoint>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    pub edge_from:  Vec<NodeId>,
    pub edge_to:    Vec<NodeId>,
    /// Parallel-edge discriminator.
    pub edge_key:   Vec<u32>,
    pub edge_attrs: Vec<EdgeAttrs>,

    // ── Spatial index ─────────────────────────────────────────────────────
    spatial_idx: RTree<NodeEntry>,
}

impl RoadGraph {
    /// Construct an empty graph with no nodes or edges.
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_count()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Iterator over every `EdgeId` in sorted `(from, to, key)` order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        (0..self.edge_count()).map(|i| EdgeId(i as u32))
    }

    /// The stable key of an edge.
    #[inline]
    pub fn edge_key(&self, edge: EdgeId) -> EdgeKey {
        EdgeKey::new(
            self.edge_from[edge.index()],
            self.edge_to[edge.index()],
            self.edge_key[edge.index()],
        )
    }

    /// Look up an edge by key.  Returns `None` for unknown nodes too.
    pub fn find_edge(&self, key: EdgeKey) -> Option<EdgeId> {
        if !self.contains_node(key.from) {
            return None;
        }
        self.out_edges(key.from).find(|&e| {
            self.edge_to[e.index()] == key.to && self.edge_key[e.index()] == key.key
        })
    }

    pub fn contains_edge(&self, key: EdgeKey) -> bool {
        self.find_edge(key).is_some()
    }

    /// `true` if every edge carries a length attribute.
    pub fn all_edges_have_length(&self) -> bool {
        self.edge_attrs.iter().all(|a| a.length.is_some())
    }

    // ── Coordinates ───────────────────────────────────────────────────────

    /// Output coordinate `[x, y]` of a node: the preserved geographic point
    /// as `[lon, lat]` when present, otherwise the working coordinate.
    #[inline]
    pub fn display_xy(&self, node: NodeId) -> [f64; 2] {
        match self.node_geo[node.index()] {
            Some(geo) => geo.to_xy(),
            None => self.node_pos[node.index()].to_xy(),
        }
    }

    // ── Copy-then-modify ──────────────────────────────────────────────────

    /// A full copy of this graph with the edge `key` removed.
    ///
    /// If the edge does not exist the copy is identical to `self`.
    pub fn without_edge(&self, key: EdgeKey) -> RoadGraph {
        let mut copy = self.clone();
        if let Some(edge) = self.find_edge(key) {
            copy.remove_edge_at(edge);
        }
        copy
    }

    fn remove_edge_at(&mut self, edge: EdgeId) {
        let i = edge.index();
        let from = self.edge_from.remove(i);
        self.edge_to.remove(i);
        self.edge_key.remove(i);
        self.edge_attrs.remove(i);
        for start in &mut self.node_out_start[from.index() + 1..] {
            *start -= 1;
        }
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the nearest node to `pos` (working space).
    ///
    /// Returns `None` only if the network has no nodes.
    pub fn snap_to_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&pos.to_xy())
            .map(|e| e.id)
    }
}

impl std::fmt::Debug for RoadGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoadGraph")
            .field("nodes", &self.node_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}

/// Structural equality: same nodes and the same keyed edges with the same
/// attributes.  The spatial index is derived data and not compared.
impl PartialEq for RoadGraph {
    fn eq(&self, other: &Self) -> bool {
        self.node_pos == other.node_pos
            && self.node_geo == other.node_geo
            && self.node_out_start == other.node_out_start
            && self.edge_from == other.edge_from
            && self.edge_to == other.edge_to
            && self.edge_key == other.edge_key
            && self.edge_attrs == other.edge_attrs
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// The builder accepts nodes and directed edges in any order.  `build()`
/// sorts edges by `(from, to, key)`, constructs the CSR arrays, and bulk-loads
/// the R-tree.
///
/// # Example
///
/// ```
/// use rc_core::GeoPoint;
/// use rc_network::{EdgeAttrs, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_geo_node(GeoPoint::new(-6.2088, 106.8456));
/// let c = b.add_geo_node(GeoPoint::new(-6.2078, 106.8456));
/// b.add_road(a, c, EdgeAttrs::with_length(111.0));
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // both directions
/// ```
pub struct RoadGraphBuilder {
    nodes:     Vec<Point>,
    geo:       Vec<Option<GeoPoint>>,
    raw_edges: Vec<RawEdge>,
    /// Next free discriminator per ordered pair.
    next_key:  HashMap<(NodeId, NodeId), u32>,
}

struct RawEdge {
    from:  NodeId,
    to:    NodeId,
    key:   u32,
    attrs: EdgeAttrs,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:     Vec::new(),
            geo:       Vec::new(),
            raw_edges: Vec::new(),
            next_key:  HashMap::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            geo:       Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            next_key:  HashMap::with_capacity(edges),
        }
    }

    /// Add a node with working coordinates only and return its `NodeId`
    /// (sequential from 0).
    pub fn add_node(&mut self, pos: Point) -> NodeId {
        self.push_node(pos, None)
    }

    /// Add a node whose working coordinates are its geographic coordinates.
    pub fn add_geo_node(&mut self, geo: GeoPoint) -> NodeId {
        self.push_node(geo.as_point(), None)
    }

    /// Add a node with projected working coordinates and its preserved
    /// geographic position.
    pub fn add_projected_node(&mut self, pos: Point, geo: GeoPoint) -> NodeId {
        self.push_node(pos, Some(geo))
    }

    fn push_node(&mut self, pos: Point, geo: Option<GeoPoint>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.geo.push(geo);
        id
    }

    /// Add a **directed** edge from `from` to `to` with the next free
    /// discriminator for that ordered pair, and return its key.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, attrs: EdgeAttrs) -> EdgeKey {
        let key = EdgeKey::new(from, to, self.next_key.get(&(from, to)).copied().unwrap_or(0));
        self.add_keyed_edge(key, attrs);
        key
    }

    /// Add a directed edge with an explicit key.  The caller guarantees the
    /// key is unique for its ordered pair.
    ///
    /// The next-free counter saturates at `u32::MAX`, so after an explicit
    /// `u32::MAX` key the pair's auto-assigned keys repeat; callers taking
    /// keys from untrusted input must check for that collision.
    pub fn add_keyed_edge(&mut self, key: EdgeKey, attrs: EdgeAttrs) {
        let next = self.next_key.entry((key.from, key.to)).or_insert(0);
        *next = (*next).max(key.key.saturating_add(1));
        self.raw_edges.push(RawEdge { from: key.from, to: key.to, key: key.key, attrs });
    }

    /// Convenience: add edges in **both directions** for a two-way road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, attrs: EdgeAttrs) {
        self.add_directed_edge(a, b, attrs.clone());
        self.add_directed_edge(b, a, attrs);
    }

    /// Working position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Point {
        self.nodes[id.index()]
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| (e.from.0, e.to.0, e.key));

        let edge_from: Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:   Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_key:  Vec<u32>    = raw.iter().map(|e| e.key).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let edge_attrs: Vec<EdgeAttrs> = raw.into_iter().map(|e| e.attrs).collect();

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, pos)| NodeEntry { point: pos.to_xy(), id: NodeId(i as u32) })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        RoadGraph {
            node_pos: self.nodes,
            node_geo: self.geo,
            node_out_start,
            edge_from,
            edge_to,
            edge_key,
            edge_attrs,
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
