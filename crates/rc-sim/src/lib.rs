//! `rc-sim`: session orchestration for the road closure simulator.
//!
//! # Session lifecycle
//!
//! ```text
//! load(graph) / load_grid(center)
//!   ① original = graph, modified = copy of original
//!   ② traffic  = assign(original)               (baseline)
//!
//! close_road(u, v, k)                            (repeatable)
//!   ③ modified = original without (u, v, k)      (fresh copy every time)
//!   ④ traffic  = current traffic, closed volume moved onto the detour
//!
//! reset()
//!   ⑤ modified = copy of original, traffic = fresh baseline
//! ```
//!
//! Each step replaces state wholesale or fails leaving it untouched.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Computes edge betweenness on Rayon's thread pool.      |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use rc_network::DEFAULT_CENTER;
//! use rc_sim::{SessionBuilder, api};
//!
//! let mut session = SessionBuilder::new().seed(7).build()?;
//! session.load_grid(DEFAULT_CENTER)?;
//! let summary = session.close_road(EdgeKey::first(NodeId(44), NodeId(45)))?;
//! let geojson = session.features()?;
//! ```

pub mod api;
pub mod builder;
pub mod config;
pub mod error;
pub mod observer;
pub mod session;
pub mod shared;

#[cfg(test)]
mod tests;

pub use builder::SessionBuilder;
pub use config::SessionConfig;
pub use error::{SessionError, SessionResult};
pub use observer::{NoopObserver, SessionObserver};
pub use session::{ClosureKind, ClosureSummary, Session};
pub use shared::SharedSession;
