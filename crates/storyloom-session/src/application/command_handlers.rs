//! Command handlers for the session.
//!
//! Each handler runs the synchronous `begin_*` step under the session lock,
//! performs the provider work with the lock released, then applies the
//! outcome with a second short lock.

use std::future::Future;
use std::sync::Mutex;

use storyloom_character::application::command_handlers::{
    handle_author_character, handle_create_character_from_image, handle_generate_character,
    handle_generate_character_name,
};
use storyloom_character::domain::character::Character;
use storyloom_character::domain::commands::{
    AuthorCharacter, CreateCharacterFromImage, GenerateCharacter, GenerateCharacterName,
};
use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::provider::ContentProvider;
use storyloom_core::rng::DeterministicRng;
use storyloom_narrative::application::orchestrator::{
    TurnContext, generate_story_seed, produce_scene,
};
use storyloom_narrative::application::prompt::OPENING_ACTION;
use storyloom_narrative::domain::history::HistoryLog;
use storyloom_narrative::domain::scene::Scene;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::commands::{
    BeginCharacterCreation, CancelCharacterCreation, ResetSession, StartSession, SubmitAction,
};
use crate::domain::state::{SessionState, StartOutcome, StartTicket, TurnTicket};
use crate::handle::SessionHandle;

/// Rolls an in-flight transition back when the handler future is dropped
/// between `begin_*` and the outcome being applied.
struct InFlightGuard<'a> {
    session: &'a SessionHandle,
    rollback: fn(&mut SessionState, &DomainError),
    armed: bool,
}

impl<'a> InFlightGuard<'a> {
    fn new(session: &'a SessionHandle, rollback: fn(&mut SessionState, &DomainError)) -> Self {
        Self {
            session,
            rollback,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("turn abandoned before completion, rolling back");
        let cancelled = DomainError::Infrastructure("turn cancelled".into());
        if let Err(e) = self
            .session
            .with(|state| (self.rollback)(state, &cancelled))
        {
            warn!(error = %e, "failed to roll back abandoned turn");
        }
    }
}

async fn run_start(
    correlation_id: Uuid,
    ticket: StartTicket,
    provider: &dyn ContentProvider,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<StartOutcome, DomainError> {
    let original_story = match ticket.seed {
        Some(seed) => seed,
        None => generate_story_seed(provider).await?,
    };
    let character = match ticket.character {
        Some(character) => character,
        None => handle_generate_character(&GenerateCharacter { correlation_id }, provider).await?,
    };
    let history = HistoryLog::new();
    let context = TurnContext {
        original_story: &original_story,
        history: &history,
        action: OPENING_ACTION,
        character: Some(&character),
    };
    let scene = produce_scene(&context, provider, rng).await?;
    Ok(StartOutcome {
        original_story,
        character,
        scene,
    })
}

/// Handles `StartSession`: generates a premise and a character if they are
/// missing, then the opening scene.
///
/// # Errors
///
/// Returns `DomainError::TurnInFlight` or `DomainError::InvalidTransition`
/// if the session cannot start, or the provider error that failed the start
/// (the session is then back in `Idle` with its previous fields).
pub async fn handle_start_session(
    command: &StartSession,
    session: &SessionHandle,
    provider: &dyn ContentProvider,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Scene, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "starting story"
    );
    let ticket = session.with(|state| state.begin_start(&command.story_seed))??;
    let guard = InFlightGuard::new(session, SessionState::fail_start);

    let result = run_start(command.correlation_id, ticket, provider, rng).await;
    guard.disarm();
    match result {
        Ok(outcome) => {
            let scene = outcome.scene.clone();
            session.with(|state| state.complete_start(outcome))??;
            info!(correlation_id = %command.correlation_id, scene_id = %scene.id, "story started");
            Ok(scene)
        }
        Err(e) => {
            warn!(correlation_id = %command.correlation_id, error = %e, "story start failed");
            session.with(|state| state.fail_start(&e))?;
            Err(e)
        }
    }
}

async fn run_turn(
    ticket: &TurnTicket,
    provider: &dyn ContentProvider,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Scene, DomainError> {
    let context = TurnContext {
        original_story: &ticket.original_story,
        history: &ticket.history,
        action: &ticket.action,
        character: ticket.character.as_ref(),
    };
    produce_scene(&context, provider, rng).await
}

/// Handles `SubmitAction`: produces the next scene from the action.
///
/// # Errors
///
/// Returns the guard error if the action is refused (`TurnInFlight`,
/// `InvalidTransition`, `SceneEnded`, `Validation`), or the provider error
/// that failed the turn. A failed turn leaves history and scene untouched.
pub async fn handle_submit_action(
    command: &SubmitAction,
    session: &SessionHandle,
    provider: &dyn ContentProvider,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Scene, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "submitting action"
    );
    let ticket = session.with(|state| state.begin_turn(&command.action))??;
    let guard = InFlightGuard::new(session, SessionState::fail_turn);

    let result = run_turn(&ticket, provider, rng).await;
    guard.disarm();
    match result {
        Ok(scene) => {
            session.with(|state| state.complete_turn(ticket.action, scene.clone()))??;
            info!(
                correlation_id = %command.correlation_id,
                scene_id = %scene.id,
                is_ending = scene.is_ending,
                "turn completed"
            );
            Ok(scene)
        }
        Err(e) => {
            warn!(correlation_id = %command.correlation_id, error = %e, "turn failed");
            session.with(|state| state.fail_turn(&e))?;
            Err(e)
        }
    }
}

/// Handles `ResetSession`.
///
/// # Errors
///
/// Returns `DomainError::TurnInFlight` while a turn runs.
pub fn handle_reset_session(
    command: &ResetSession,
    session: &SessionHandle,
) -> Result<(), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "resetting session"
    );
    session.with(SessionState::reset)?
}

/// Handles `BeginCharacterCreation`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` unless idle.
pub fn handle_begin_character_creation(
    command: &BeginCharacterCreation,
    session: &SessionHandle,
) -> Result<(), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "opening character creation"
    );
    session.with(SessionState::begin_character_creation)?
}

/// Handles `CancelCharacterCreation`.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` outside character creation.
pub fn handle_cancel_character_creation(
    command: &CancelCharacterCreation,
    session: &SessionHandle,
) -> Result<(), DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "cancelling character creation"
    );
    session.with(SessionState::cancel_character_creation)?
}

/// Runs a character-building step while character creation is open.
async fn character_step<T>(
    session: &SessionHandle,
    intent: &'static str,
    step: impl Future<Output = Result<T, DomainError>>,
) -> Result<T, DomainError> {
    session.with(|state| state.ensure_character_creation(intent))??;
    let result = step.await;
    if let Err(e) = &result {
        warn!(intent, error = %e, "character step failed");
        session.with(|state| state.fail_character_step(e))?;
    }
    result
}

/// Generates a character draft for the creation form.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` outside character creation, or
/// the provider error. A quota error also closes character creation.
pub async fn handle_draft_generated_character(
    command: &GenerateCharacter,
    session: &SessionHandle,
    provider: &dyn ContentProvider,
) -> Result<Character, DomainError> {
    character_step(
        session,
        "generate a character",
        handle_generate_character(command, provider),
    )
    .await
}

/// Derives a character draft from an uploaded image.
///
/// # Errors
///
/// Same as [`handle_draft_generated_character`], plus
/// `DomainError::Validation` for an image that is not a data URL.
pub async fn handle_draft_character_from_image(
    command: &CreateCharacterFromImage,
    session: &SessionHandle,
    provider: &dyn ContentProvider,
) -> Result<Character, DomainError> {
    character_step(
        session,
        "create a character from an image",
        handle_create_character_from_image(command, provider),
    )
    .await
}

/// Suggests a name for the creation form.
///
/// # Errors
///
/// Same as [`handle_draft_generated_character`].
pub async fn handle_suggest_character_name(
    command: &GenerateCharacterName,
    session: &SessionHandle,
    provider: &dyn ContentProvider,
) -> Result<String, DomainError> {
    character_step(
        session,
        "suggest a name",
        handle_generate_character_name(command, provider),
    )
    .await
}

/// Handles `AuthorCharacter` as the confirm step of character creation:
/// normalizes the attributes and attaches the character.
///
/// # Errors
///
/// Returns `DomainError::InvalidTransition` outside character creation, or
/// `DomainError::Validation` for a blank name.
pub fn handle_confirm_character(
    command: &AuthorCharacter,
    session: &SessionHandle,
) -> Result<Character, DomainError> {
    session.with(|state| state.ensure_character_creation("confirm a character"))??;
    let character = handle_author_character(command)?;
    session.with(|state| state.confirm_character(character.clone()))??;
    Ok(character)
}
