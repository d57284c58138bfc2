//! Synthetic street-grid topology.
//!
//! Used when no map data is supplied: a `cols × rows` lattice centred on a
//! geographic point, one intersection per lattice cell and a two-way road
//! between every pair of orthogonal neighbours.
//!
//! ```text
//!  row 2:  2 ── 5 ── 8
//!          │    │    │
//!  row 1:  1 ── 4 ── 7        id = col * rows + row
//!          │    │    │
//!  row 0:  0 ── 3 ── 6
//!        col 0  col 1  col 2
//! ```

use rc_core::{GeoPoint, NodeId};

use crate::network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};

/// Default map centre (Jakarta, Indonesia).
pub const DEFAULT_CENTER: GeoPoint = GeoPoint { lat: -6.2088, lon: 106.8456 };

/// How grid edges get their `length` attribute.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GridLength {
    /// Great-circle distance between the endpoints, in metres.
    Haversine,
    /// The same length on every edge.
    Uniform(f64),
    /// No length attribute at all.
    Absent,
}

/// Parameters of a synthetic grid.
#[derive(Clone, Debug, PartialEq)]
pub struct GridSpec {
    pub cols: usize,
    pub rows: usize,
    pub center: GeoPoint,
    /// Spacing between neighbouring intersections, in degrees.
    pub spacing_deg: f64,
    pub length: GridLength,
    /// When set, every n-th row and column is tagged `primary` and the rest
    /// `residential`.  When unset edges carry no classification.
    pub arterial_every: Option<usize>,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            cols:           10,
            rows:           10,
            center:         DEFAULT_CENTER,
            spacing_deg:    0.001,
            length:         GridLength::Haversine,
            arterial_every: None,
        }
    }
}

impl GridSpec {
    /// A grid of the default shape around `center`.
    pub fn around(center: GeoPoint) -> Self {
        Self { center, ..Self::default() }
    }

    /// `NodeId` of the intersection at `(col, row)`.
    #[inline]
    pub fn node_at(&self, col: usize, row: usize) -> NodeId {
        NodeId((col * self.rows + row) as u32)
    }

    fn highway_for_line(&self, line: usize) -> Option<&'static str> {
        match self.arterial_every {
            Some(n) if n > 0 && line % n == 0 => Some("primary"),
            Some(_) => Some("residential"),
            None => None,
        }
    }

    fn attrs(&self, a: GeoPoint, b: GeoPoint, line: usize) -> EdgeAttrs {
        let length = match self.length {
            GridLength::Haversine  => Some(a.distance_m(b)),
            GridLength::Uniform(l) => Some(l),
            GridLength::Absent     => None,
        };
        EdgeAttrs {
            length,
            highway: self.highway_for_line(line).map(str::to_owned),
            ..EdgeAttrs::default()
        }
    }
}

/// Build the grid described by `spec`.
pub fn build_grid(spec: &GridSpec) -> RoadGraph {
    let mut b = RoadGraphBuilder::with_capacity(
        spec.cols * spec.rows,
        4 * spec.cols * spec.rows,
    );

    let half_c = (spec.cols / 2) as f64;
    let half_r = (spec.rows / 2) as f64;
    let mut geo = Vec::with_capacity(spec.cols * spec.rows);
    for col in 0..spec.cols {
        for row in 0..spec.rows {
            let p = GeoPoint::new(
                spec.center.lat + (row as f64 - half_r) * spec.spacing_deg,
                spec.center.lon + (col as f64 - half_c) * spec.spacing_deg,
            );
            let id = b.add_geo_node(p);
            debug_assert_eq!(id, spec.node_at(col, row));
            geo.push(p);
        }
    }

    // East-west streets: neighbours along a row.
    for col in 0..spec.cols.saturating_sub(1) {
        for row in 0..spec.rows {
            let a = spec.node_at(col, row);
            let c = spec.node_at(col + 1, row);
            b.add_road(a, c, spec.attrs(geo[a.index()], geo[c.index()], row));
        }
    }

    // North-south avenues: neighbours along a column.
    for col in 0..spec.cols {
        for row in 0..spec.rows.saturating_sub(1) {
            let a = spec.node_at(col, row);
            let c = spec.node_at(col, row + 1);
            b.add_road(a, c, spec.attrs(geo[a.index()], geo[c.index()], col));
        }
    }

    b.build()
}
