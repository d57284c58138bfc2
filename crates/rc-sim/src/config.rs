//! Session configuration, loadable from a JSON file.
//!
//! Every field is optional in the file; missing ones take their defaults:
//!
//! ```json
//! {
//!   "traffic": { "seed": 7, "model": "simple" },
//!   "style":   { "node_limit": 250 }
//! }
//! ```

use std::path::Path;

use rc_core::TrafficConfig;
use rc_output::FeatureStyle;
use serde::{Deserialize, Serialize};

use crate::{SessionError, SessionResult};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub traffic: TrafficConfig,
    pub style:   FeatureStyle,
}

impl SessionConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> SessionResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), seed = config.traffic.seed, "session config loaded");
        Ok(config)
    }

    pub fn from_json(text: &str) -> SessionResult<Self> {
        let config: SessionConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> SessionResult<()> {
        self.traffic.validate()?;
        if !(self.style.width_divisor.is_finite() && self.style.width_divisor > 0.0) {
            return Err(SessionError::Config(format!(
                "style.width_divisor must be positive, got {}",
                self.style.width_divisor
            )));
        }
        if !self.style.base_width.is_finite() {
            return Err(SessionError::Config("style.base_width must be finite".into()));
        }
        Ok(())
    }
}
