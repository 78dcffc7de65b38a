//! Query handlers for the session.
//!
//! Queries take a short lock, copy what they need into a view DTO and
//! release it, so they answer while a turn is in flight.

use serde::Serialize;
use storyloom_character::domain::character::Character;
use storyloom_core::error::DomainError;
use storyloom_narrative::domain::history::HistoryEntry;
use storyloom_narrative::domain::scene::Scene;

use crate::domain::state::{SessionState, SessionStatus};
use crate::handle::SessionHandle;

/// Read-only view of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionView {
    /// Current status.
    pub status: SessionStatus,
    /// The story premise; empty before the first start.
    pub original_story: String,
    /// The scene on screen, if any.
    pub current_scene: Option<Scene>,
    /// The attached character, if any.
    pub character: Option<Character>,
    /// Number of history entries.
    pub history_length: usize,
    /// Whether the current scene accepts an action right now.
    pub accepts_actions: bool,
}

impl From<&SessionState> for SessionView {
    fn from(state: &SessionState) -> Self {
        Self {
            status: state.status(),
            original_story: state.original_story().to_owned(),
            current_scene: state.current_scene().cloned(),
            character: state.character().cloned(),
            history_length: state.history().len(),
            accepts_actions: state.status() == SessionStatus::Playing
                && state.current_scene().is_some_and(Scene::accepts_actions),
        }
    }
}

/// Returns a view of the session.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the session lock is poisoned.
pub fn get_session(session: &SessionHandle) -> Result<SessionView, DomainError> {
    session.with(|state| SessionView::from(&*state))
}

/// Returns every history entry, oldest first.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the session lock is poisoned.
pub fn get_history(session: &SessionHandle) -> Result<Vec<HistoryEntry>, DomainError> {
    session.with(|state| state.history().entries().to_vec())
}
