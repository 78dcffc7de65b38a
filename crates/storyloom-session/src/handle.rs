//! Shared handle to the running session.

use std::sync::{Arc, Mutex};

use storyloom_core::error::DomainError;

use crate::domain::state::SessionState;

/// Cloneable handle to the single session.
///
/// The lock is held only for the duration of the closure passed to
/// [`SessionHandle::with`], which is synchronous, so it is never held across
/// an await.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    inner: Arc<Mutex<SessionState>>,
}

impl SessionHandle {
    /// Creates a handle to a fresh idle session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle around an existing state.
    #[must_use]
    pub fn from_state(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    /// Runs `f` against the locked state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the mutex is poisoned.
    pub fn with<R>(&self, f: impl FnOnce(&mut SessionState) -> R) -> Result<R, DomainError> {
        let mut state = self
            .inner
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("session mutex poisoned: {e}")))?;
        Ok(f(&mut state))
    }

    /// Returns a copy of the current state.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the mutex is poisoned.
    pub fn snapshot(&self) -> Result<SessionState, DomainError> {
        self.with(|state| state.clone())
    }
}
