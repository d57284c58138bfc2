//! Fluent builder for constructing a [`Session`].

use rc_network::{DijkstraRouter, GridSpec, Router};

use crate::{NoopObserver, Session, SessionConfig, SessionObserver, SessionResult};

/// Fluent builder for [`Session`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                         |
/// |-------------------|---------------------------------|
/// | `.config(c)`      | `SessionConfig::default()`      |
/// | `.seed(s)`        | `config.traffic.seed`           |
/// | `.router(r)`      | `DijkstraRouter`                |
/// | `.observer(o)`    | `NoopObserver`                  |
/// | `.grid(spec)`     | `GridSpec::default()` (10 × 10) |
///
/// # Example
///
/// ```rust,ignore
/// let mut session = SessionBuilder::new()
///     .config(SessionConfig::load(path)?)
///     .seed(7)
///     .build()?;
/// session.load_grid(DEFAULT_CENTER)?;
/// ```
pub struct SessionBuilder {
    config:   SessionConfig,
    router:   Box<dyn Router>,
    observer: Box<dyn SessionObserver>,
    grid:     GridSpec,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            config:   SessionConfig::default(),
            router:   Box::new(DijkstraRouter),
            observer: Box::new(NoopObserver),
            grid:     GridSpec::default(),
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the traffic seed from the config.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.traffic.seed = seed;
        self
    }

    /// Routing algorithm used for closure detours.
    pub fn router<R: Router + 'static>(mut self, router: R) -> Self {
        self.router = Box::new(router);
        self
    }

    pub fn observer<O: SessionObserver + 'static>(mut self, observer: O) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Shape of grids created by [`Session::load_grid`].  The centre is
    /// replaced on every load.
    pub fn grid(mut self, grid: GridSpec) -> Self {
        self.grid = grid;
        self
    }

    /// Validate the configuration and return an empty session.
    pub fn build(self) -> SessionResult<Session> {
        self.config.validate()?;
        if self.grid.cols == 0 || self.grid.rows == 0 {
            return Err(crate::SessionError::Config(format!(
                "grid must be at least 1 × 1, got {} × {}",
                self.grid.cols, self.grid.rows
            )));
        }
        Ok(Session::from_parts(self.config, self.router, self.observer, self.grid))
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
