//! Durable subset of a session.

use serde::{Deserialize, Serialize};
use storyloom_character::domain::character::Character;
use storyloom_narrative::domain::history::HistoryLog;
use storyloom_narrative::domain::scene::Scene;

/// The record written to the save slot. Status is not persisted; a loaded
/// session always resumes in `Playing`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedSession {
    /// The story premise.
    pub original_story: String,
    /// Every history entry, oldest first.
    pub history: HistoryLog,
    /// The scene the player was looking at.
    pub current_scene: Scene,
    /// The player character, if any.
    #[serde(default)]
    pub character: Option<Character>,
}
