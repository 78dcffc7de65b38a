//! The session state machine.
//!
//! Every transition is synchronous. Transitions that need the provider are
//! split in two: a `begin_*` step that checks the guard, moves to the
//! in-flight status and hands back a ticket with everything the provider
//! work needs, and a `complete_*`/`fail_*` step that applies the outcome.
//! The async work runs between the two with no lock held.

use std::fmt;

use serde::{Deserialize, Serialize};
use storyloom_character::domain::character::Character;
use storyloom_core::error::DomainError;
use storyloom_narrative::domain::history::{HistoryEntry, HistoryLog};
use storyloom_narrative::domain::scene::Scene;

use super::saved::SavedSession;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Waiting for a story seed or character creation.
    #[default]
    Idle,
    /// The player is authoring a character.
    CharacterCreation,
    /// The opening scene is being generated.
    Starting,
    /// A scene is on screen and actions are accepted.
    Playing,
    /// The next scene is being generated.
    LoadingNext,
}

impl SessionStatus {
    /// Snake-case name used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::CharacterCreation => "character_creation",
            Self::Starting => "starting",
            Self::Playing => "playing",
            Self::LoadingNext => "loading_next",
        }
    }

    /// Returns `true` while a provider turn is running.
    #[must_use]
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::Starting | Self::LoadingNext)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs captured when a story starts.
#[derive(Debug, Clone)]
pub struct StartTicket {
    /// Trimmed story seed, `None` when blank.
    pub seed: Option<String>,
    /// The character already attached, if any.
    pub character: Option<Character>,
}

/// Everything a successful start produced.
#[derive(Debug, Clone)]
pub struct StartOutcome {
    /// The premise actually used.
    pub original_story: String,
    /// The character actually used.
    pub character: Character,
    /// The opening scene.
    pub scene: Scene,
}

/// Snapshot of the session taken when a turn begins.
#[derive(Debug, Clone)]
pub struct TurnTicket {
    /// The story premise.
    pub original_story: String,
    /// History as it was before this turn.
    pub history: HistoryLog,
    /// The player action as submitted.
    pub action: String,
    /// The player character, if any.
    pub character: Option<Character>,
}

/// The single running session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(crate) original_story: String,
    pub(crate) history: HistoryLog,
    pub(crate) current_scene: Option<Scene>,
    pub(crate) character: Option<Character>,
    pub(crate) status: SessionStatus,
}

impl SessionState {
    /// Creates an idle session with nothing in it.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The story premise. Empty before the first start.
    #[must_use]
    pub fn original_story(&self) -> &str {
        &self.original_story
    }

    /// The history log.
    #[must_use]
    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    /// The scene on screen, if any.
    #[must_use]
    pub fn current_scene(&self) -> Option<&Scene> {
        self.current_scene.as_ref()
    }

    /// The attached character, if any.
    #[must_use]
    pub fn character(&self) -> Option<&Character> {
        self.character.as_ref()
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.status
    }

    fn invalid(&self, intent: &'static str) -> DomainError {
        DomainError::InvalidTransition {
            intent,
            status: self.status.as_str(),
        }
    }

    fn ensure_not_in_flight(&self) -> Result<(), DomainError> {
        if self.status.is_in_flight() {
            return Err(DomainError::TurnInFlight);
        }
        Ok(())
    }

    /// `Idle → CharacterCreation`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` from any other status.
    pub fn begin_character_creation(&mut self) -> Result<(), DomainError> {
        if self.status != SessionStatus::Idle {
            return Err(self.invalid("begin character creation"));
        }
        self.status = SessionStatus::CharacterCreation;
        Ok(())
    }

    /// Checks that a character-building intent may run.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` outside character creation.
    pub fn ensure_character_creation(&self, intent: &'static str) -> Result<(), DomainError> {
        if self.status != SessionStatus::CharacterCreation {
            return Err(self.invalid(intent));
        }
        Ok(())
    }

    /// Applies a failed character-building step. A quota failure leaves
    /// character creation for `Idle`; anything else keeps the form open.
    pub fn fail_character_step(&mut self, error: &DomainError) {
        if error.is_quota() && self.status == SessionStatus::CharacterCreation {
            self.status = SessionStatus::Idle;
        }
    }

    /// `CharacterCreation → Idle`, attaching `character`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` outside character creation.
    pub fn confirm_character(&mut self, character: Character) -> Result<(), DomainError> {
        self.ensure_character_creation("confirm a character")?;
        self.character = Some(character);
        self.status = SessionStatus::Idle;
        Ok(())
    }

    /// `CharacterCreation → Idle` with no change.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` outside character creation.
    pub fn cancel_character_creation(&mut self) -> Result<(), DomainError> {
        self.ensure_character_creation("cancel character creation")?;
        self.status = SessionStatus::Idle;
        Ok(())
    }

    /// `Idle → Starting`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TurnInFlight` while a turn runs, or
    /// `DomainError::InvalidTransition` from any status but `Idle`.
    pub fn begin_start(&mut self, story_seed: &str) -> Result<StartTicket, DomainError> {
        self.ensure_not_in_flight()?;
        if self.status != SessionStatus::Idle {
            return Err(self.invalid("start a story"));
        }
        self.status = SessionStatus::Starting;
        let seed = story_seed.trim();
        Ok(StartTicket {
            seed: (!seed.is_empty()).then(|| seed.to_owned()),
            character: self.character.clone(),
        })
    }

    /// `Starting → Playing`. Replaces every field with the new story.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless starting.
    pub fn complete_start(&mut self, outcome: StartOutcome) -> Result<(), DomainError> {
        if self.status != SessionStatus::Starting {
            return Err(self.invalid("complete a start"));
        }
        self.original_story = outcome.original_story;
        self.history = HistoryLog::opened_with(outcome.scene.description.clone());
        self.current_scene = Some(outcome.scene);
        self.character = Some(outcome.character);
        self.status = SessionStatus::Playing;
        Ok(())
    }

    /// `Starting → Idle`. Every other field keeps its previous value.
    pub fn fail_start(&mut self, _error: &DomainError) {
        if self.status == SessionStatus::Starting {
            self.status = SessionStatus::Idle;
        }
    }

    /// `Playing → LoadingNext`.
    ///
    /// # Errors
    ///
    /// - `DomainError::TurnInFlight` while a turn runs.
    /// - `DomainError::InvalidTransition` outside `Playing` or with no scene.
    /// - `DomainError::SceneEnded` if the current scene is an ending.
    /// - `DomainError::Validation` if the action is blank.
    pub fn begin_turn(&mut self, action: &str) -> Result<TurnTicket, DomainError> {
        self.ensure_not_in_flight()?;
        if self.status != SessionStatus::Playing {
            return Err(self.invalid("submit an action"));
        }
        let Some(scene) = &self.current_scene else {
            return Err(self.invalid("submit an action"));
        };
        if !scene.accepts_actions() {
            return Err(DomainError::SceneEnded);
        }
        if action.trim().is_empty() {
            return Err(DomainError::Validation("action must not be empty".into()));
        }
        self.status = SessionStatus::LoadingNext;
        Ok(TurnTicket {
            original_story: self.original_story.clone(),
            history: self.history.clone(),
            action: action.to_owned(),
            character: self.character.clone(),
        })
    }

    /// `LoadingNext → Playing`. Appends the action and the new narration, in
    /// that order, then replaces the current scene.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTransition` unless a turn is loading.
    pub fn complete_turn(&mut self, action: String, scene: Scene) -> Result<(), DomainError> {
        if self.status != SessionStatus::LoadingNext {
            return Err(self.invalid("complete a turn"));
        }
        self.history.append(HistoryEntry::user(action));
        self.history
            .append(HistoryEntry::narrator(scene.description.clone()));
        self.current_scene = Some(scene);
        self.status = SessionStatus::Playing;
        Ok(())
    }

    /// `LoadingNext → Playing`, or `Idle` on a quota failure. History and
    /// scene are untouched.
    pub fn fail_turn(&mut self, error: &DomainError) {
        if self.status != SessionStatus::LoadingNext {
            return;
        }
        self.status = if error.is_quota() {
            SessionStatus::Idle
        } else {
            SessionStatus::Playing
        };
    }

    /// Discards the story and character and returns to `Idle`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TurnInFlight` while a turn runs.
    pub fn reset(&mut self) -> Result<(), DomainError> {
        self.ensure_not_in_flight()?;
        *self = Self::new();
        Ok(())
    }

    /// Captures the durable subset for saving.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TurnInFlight` while a turn runs, or
    /// `DomainError::Validation` when there is no scene to save.
    pub fn to_saved(&self) -> Result<SavedSession, DomainError> {
        self.ensure_not_in_flight()?;
        let Some(scene) = &self.current_scene else {
            return Err(DomainError::Validation("there is no adventure to save".into()));
        };
        Ok(SavedSession {
            original_story: self.original_story.clone(),
            history: self.history.clone(),
            current_scene: scene.clone(),
            character: self.character.clone(),
        })
    }

    /// Replaces the whole session with a saved one, resuming in `Playing`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::TurnInFlight` while a turn runs.
    pub fn restore(&mut self, saved: SavedSession) -> Result<(), DomainError> {
        self.ensure_not_in_flight()?;
        self.original_story = saved.original_story;
        self.history = saved.history;
        self.current_scene = Some(saved.current_scene);
        self.character = saved.character;
        self.status = SessionStatus::Playing;
        Ok(())
    }
}
