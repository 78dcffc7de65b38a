//! Shared application state.

use std::sync::{Arc, Mutex};

use storyloom_core::provider::ContentProvider;
use storyloom_core::rng::DeterministicRng;
use storyloom_core::storage::KeyValueStore;
use storyloom_session::handle::SessionHandle;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single play session.
    pub session: SessionHandle,
    /// Text and image generation.
    pub provider: Arc<dyn ContentProvider>,
    /// Save slot storage.
    pub store: Arc<dyn KeyValueStore>,
    /// Placeholder-illustration seeds.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
}

impl AppState {
    /// Create new application state around a fresh idle session.
    #[must_use]
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        store: Arc<dyn KeyValueStore>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    ) -> Self {
        Self {
            session: SessionHandle::new(),
            provider,
            store,
            rng,
        }
    }
}
