//! `rc-traffic`: synthetic traffic volumes and road-closure redistribution.
//!
//! # Pipeline
//!
//! ```text
//! RoadGraph ──assign()──▶ TrafficMap ──close_and_redistribute(key)──▶ (RoadGraph', TrafficMap')
//!               │
//!               └── edge_betweenness() ─▶ EdgeCentrality::{Computed, Uniform}
//! ```
//!
//! | Module         | Contents                                              |
//! |----------------|-------------------------------------------------------|
//! | [`map`]        | `TrafficMap` (edge key → volume)                      |
//! | [`centrality`] | Sampled Brandes edge betweenness, uniform fallback    |
//! | [`assign`]     | Weighted and simple volume generators                 |
//! | [`closure`]    | `close_and_redistribute`, `ClosureOutcome`, `Reroute` |
//! | [`error`]      | `TrafficError`, `TrafficResult<T>`                    |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Accumulates centrality sources on Rayon's thread pool.  |

pub mod assign;
pub mod centrality;
pub mod closure;
pub mod error;
pub mod map;


pub use assign::{assign, assign_simple, assign_weighted, classification_factor, length_factor};
pub use centrality::{edge_betweenness, DegradedReason, EdgeCentrality, UNIFORM_CENTRALITY};
pub use closure::{close_and_redistribute, ClosureOutcome, Reroute};
pub use error::{TrafficError, TrafficResult};
pub use map::TrafficMap;
