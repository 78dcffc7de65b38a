//! Save and load through a key-value store.
//!
//! The session is written as one JSON record under [`SAVE_KEY`]. There is a
//! single slot; saving overwrites it.

use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::storage::KeyValueStore;
use tracing::{info, warn};

use crate::domain::commands::{DiscardSavedSession, LoadSession, SaveSession};
use crate::domain::saved::SavedSession;
use crate::domain::state::SessionState;
use crate::handle::SessionHandle;

/// Key of the save slot.
pub const SAVE_KEY: &str = "storyloom.saved_session";

/// Handles `SaveSession`.
///
/// # Errors
///
/// - `DomainError::TurnInFlight` while a turn runs.
/// - `DomainError::Validation` when there is no scene to save.
/// - `DomainError::Storage` if the store rejects the write.
pub async fn handle_save_session(
    command: &SaveSession,
    session: &SessionHandle,
    store: &dyn KeyValueStore,
) -> Result<(), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "saving session"
    );
    let saved = session.with(|state| state.to_saved())??;
    let json = serde_json::to_string(&saved)
        .map_err(|e| DomainError::Infrastructure(format!("session serialization failed: {e}")))?;
    store.set(SAVE_KEY, &json).await?;
    info!(
        correlation_id = %command.correlation_id,
        history_entries = saved.history.len(),
        bytes = json.len(),
        "session saved"
    );
    Ok(())
}

/// Handles `LoadSession`: replaces the session with the saved one and
/// resumes in `Playing`.
///
/// A record that cannot be deserialized is removed from the store.
///
/// # Errors
///
/// - `DomainError::NotFound` when the slot is empty.
/// - `DomainError::CorruptData` when the record is unreadable.
/// - `DomainError::TurnInFlight` while a turn runs.
/// - `DomainError::Storage` if the store cannot be read.
///
/// The session is unchanged on every error.
pub async fn handle_load_session(
    command: &LoadSession,
    session: &SessionHandle,
    store: &dyn KeyValueStore,
) -> Result<SessionState, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "loading session"
    );
    if session.with(|state| state.status().is_in_flight())? {
        return Err(DomainError::TurnInFlight);
    }
    let Some(json) = store.get(SAVE_KEY).await? else {
        return Err(DomainError::NotFound);
    };
    let saved: SavedSession = match serde_json::from_str(&json) {
        Ok(saved) => saved,
        Err(e) => {
            warn!(correlation_id = %command.correlation_id, error = %e, "discarding corrupt save");
            if let Err(remove_err) = store.remove(SAVE_KEY).await {
                warn!(error = %remove_err, "failed to remove corrupt save");
            }
            return Err(DomainError::CorruptData(e.to_string()));
        }
    };
    session.with(|state| state.restore(saved).map(|()| state.clone()))?
}

/// Returns `true` if the save slot holds a record. The record is not
/// validated.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store cannot be read.
pub async fn has_saved_session(store: &dyn KeyValueStore) -> Result<bool, DomainError> {
    Ok(store.get(SAVE_KEY).await?.is_some())
}

/// Handles `DiscardSavedSession`. Discarding an empty slot succeeds.
///
/// # Errors
///
/// Returns `DomainError::Storage` if the store rejects the removal.
pub async fn handle_discard_saved_session(
    command: &DiscardSavedSession,
    store: &dyn KeyValueStore,
) -> Result<(), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "discarding saved session"
    );
    store.remove(SAVE_KEY).await
}
