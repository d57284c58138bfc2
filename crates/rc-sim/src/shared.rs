//! Mutex-guarded session for collaborators that serve concurrent requests.
//!
//! Every call holds the lock for the whole operation, so load, reset, closure
//! and serialisation never interleave.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::{self, CloseRequest, ClosePayload, LoadPayload, LoadRequest, NetworkPayload, Response};
use crate::Session;

/// Cheaply cloneable handle to one [`Session`].
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self { inner: Arc::new(Mutex::new(session)) }
    }

    /// Lock the session.
    ///
    /// If a previous holder panicked mid-operation the lock is recovered
    /// anyway: every transition replaces state only after it has fully
    /// succeeded, so the session is still consistent.
    pub fn lock(&self) -> MutexGuard<'_, Session> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("Recovering from poisoned session mutex");
                poisoned.into_inner()
            }
        }
    }

    pub fn load_network(&self, req: &LoadRequest) -> Response<LoadPayload> {
        api::load_network(&mut self.lock(), req)
    }

    pub fn close_road(&self, req: &CloseRequest) -> Response<ClosePayload> {
        api::close_road(&mut self.lock(), req)
    }

    pub fn reset_network(&self) -> Response<NetworkPayload> {
        api::reset_network(&mut self.lock())
    }

    pub fn handle_json(&self, endpoint: &str, body: &str) -> String {
        api::handle_json(&mut self.lock(), endpoint, body)
    }
}

impl std::fmt::Debug for SharedSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedSession").finish_non_exhaustive()
    }
}
