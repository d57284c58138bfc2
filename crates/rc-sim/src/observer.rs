//! Session observer trait for progress reporting and data collection.

use rc_network::RoadGraph;
use rc_traffic::{ClosureOutcome, TrafficMap};

/// Callbacks invoked by [`Session`][crate::Session] after each successful
/// state transition.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: closure logger
///
/// ```rust,ignore
/// struct ClosureLog(Vec<u32>);
///
/// impl SessionObserver for ClosureLog {
///     fn on_closure(&mut self, outcome: &ClosureOutcome) {
///         self.0.push(outcome.closed_volume);
///     }
/// }
/// ```
pub trait SessionObserver: Send {
    /// Called after a topology is loaded and its baseline traffic assigned.
    fn on_load(&mut self, _graph: &RoadGraph, _traffic: &TrafficMap) {}

    /// Called after a closure has been applied.
    fn on_closure(&mut self, _outcome: &ClosureOutcome) {}

    /// Called after the session is reset to a fresh baseline.
    fn on_reset(&mut self, _traffic: &TrafficMap) {}
}

/// A [`SessionObserver`] that does nothing.
pub struct NoopObserver;

impl SessionObserver for NoopObserver {}
