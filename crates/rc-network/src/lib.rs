//! `rc-network`: road graph, spatial snapping, routing and topology input.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                    |
//! |--------------|-------------------------------------------------------------|
//! | [`network`]  | `RoadGraph` (CSR + R-tree), `RoadGraphBuilder`, `EdgeAttrs` |
//! | [`router`]   | `Router` trait, `Route`, `DijkstraRouter`, `PathWeight`     |
//! | [`grid`]     | Synthetic street grid (`GridSpec`, `build_grid`)            |
//! | [`topology`] | JSON topology loader                                        |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                          |

pub mod error;
pub mod grid;
pub mod network;
pub mod router;
pub mod topology;


pub use error::{NetworkError, NetworkResult};
pub use grid::{build_grid, GridLength, GridSpec, DEFAULT_CENTER};
pub use network::{EdgeAttrs, RoadGraph, RoadGraphBuilder};
pub use router::{Cost, DijkstraRouter, PathWeight, Route, Router};
pub use topology::{load_topology, parse_topology, TopologyFile};
