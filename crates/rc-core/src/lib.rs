//! `rc-core`: foundational types for the road closure simulator.
//!
//! This crate is a dependency of every other `rc-*` crate.  It has no `rc-*`
//! dependencies and minimal external ones (only `rand` and `thiserror`, plus
//! optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                   |
//! |-------------|------------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `EdgeId`, `EdgeKey`                              |
//! | [`geo`]     | `Point` (working coords), `GeoPoint`, haversine distance   |
//! | [`class`]   | `RoadClass` tiers parsed from `highway` strings            |
//! | [`rng`]     | `SimRng` (seeded, single-owner)                            |
//! | [`config`]  | `TrafficConfig`, `AssignmentModel`                         |
//! | [`error`]   | `CoreError`, `CoreResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod class;
pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use class::RoadClass;
pub use config::{AssignmentModel, TrafficConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{GeoPoint, Point};
pub use ids::{EdgeId, EdgeKey, NodeId};
pub use rng::SimRng;
