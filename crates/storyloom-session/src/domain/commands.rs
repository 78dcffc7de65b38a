//! Commands for the session.

use storyloom_core::impl_command;
use uuid::Uuid;

/// Command to start a new story.
#[derive(Debug, Clone)]
pub struct StartSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Story premise. Blank asks the provider to invent one.
    pub story_seed: String,
}

impl_command!(StartSession, "session.start");

/// Command to submit a player action against the current scene.
#[derive(Debug, Clone)]
pub struct SubmitAction {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Free text or one of the offered choices.
    pub action: String,
}

impl_command!(SubmitAction, "session.submit_action");

/// Command to abandon the current story and return to idle.
#[derive(Debug, Clone)]
pub struct ResetSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(ResetSession, "session.reset");

/// Command to open character creation.
#[derive(Debug, Clone)]
pub struct BeginCharacterCreation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(BeginCharacterCreation, "session.begin_character_creation");

/// Command to leave character creation without attaching a character.
#[derive(Debug, Clone)]
pub struct CancelCharacterCreation {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(CancelCharacterCreation, "session.cancel_character_creation");

/// Command to write the current session to the store.
#[derive(Debug, Clone)]
pub struct SaveSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(SaveSession, "session.save");

/// Command to replace the current session with the saved one.
#[derive(Debug, Clone)]
pub struct LoadSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(LoadSession, "session.load");

/// Command to delete the saved session.
#[derive(Debug, Clone)]
pub struct DiscardSavedSession {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(DiscardSavedSession, "session.discard_saved");
