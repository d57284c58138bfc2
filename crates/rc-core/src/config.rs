//! Traffic generation configuration.
//!
//! Typically embedded in the session config, which the application loads from
//! a JSON file, and handed to the assignment engine by reference.

use crate::{CoreError, CoreResult};

/// Which volume generator to run.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum AssignmentModel {
    /// Base volume × classification × length × centrality × jitter.
    #[default]
    Weighted,
    /// A single uniform draw per edge, no further factors.
    Simple,
}

/// Knobs for the traffic assignment engine.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrafficConfig {
    /// Master RNG seed.  The same seed always produces identical volumes.
    pub seed: u64,

    pub model: AssignmentModel,

    /// Inclusive range of the base draw for [`AssignmentModel::Weighted`].
    pub base_volume: (u32, u32),

    /// Inclusive range of the single draw for [`AssignmentModel::Simple`].
    pub simple_volume: (u32, u32),

    /// Freshly generated volumes are clamped to `[volume_floor, volume_ceiling]`.
    pub volume_floor:   u32,
    pub volume_ceiling: u32,

    /// Inclusive range of the per-edge jitter multiplier.
    pub jitter: (f64, f64),

    /// Maximum number of source nodes sampled for betweenness centrality.
    pub centrality_sample: usize,

    /// Graphs with more nodes than this skip centrality and use the uniform
    /// fallback.
    pub centrality_max_nodes: usize,
}

impl Default for TrafficConfig {
    fn default() -> Self {
        Self {
            seed:                 42,
            model:                AssignmentModel::Weighted,
            base_volume:          (50, 200),
            simple_volume:        (10, 1000),
            volume_floor:         10,
            volume_ceiling:       1000,
            jitter:               (0.8, 1.2),
            centrality_sample:    100,
            centrality_max_nodes: 50_000,
        }
    }
}

impl TrafficConfig {
    /// Reject ranges that would make the generator panic or produce
    /// meaningless volumes.
    pub fn validate(&self) -> CoreResult<()> {
        let (lo, hi) = self.base_volume;
        if lo > hi {
            return Err(CoreError::Config(format!("base_volume range {lo}..={hi} is empty")));
        }
        let (lo, hi) = self.simple_volume;
        if lo > hi {
            return Err(CoreError::Config(format!("simple_volume range {lo}..={hi} is empty")));
        }
        if self.volume_floor > self.volume_ceiling {
            return Err(CoreError::Config(format!(
                "volume_floor {} exceeds volume_ceiling {}",
                self.volume_floor, self.volume_ceiling
            )));
        }
        let (lo, hi) = self.jitter;
        if !(lo.is_finite() && hi.is_finite()) || lo <= 0.0 || lo > hi {
            return Err(CoreError::Config(format!("jitter range {lo}..={hi} is invalid")));
        }
        if self.centrality_sample == 0 {
            return Err(CoreError::Config("centrality_sample must be at least 1".into()));
        }
        Ok(())
    }
}
