//! Scenes.

use serde::{Deserialize, Serialize};
use storyloom_core::image::ImageRef;
use uuid::Uuid;

/// One generated scene. Created once per turn and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Fresh per scene; not a persistence key.
    pub id: Uuid,
    /// Narration shown to the player.
    pub description: String,
    /// Prompt the illustration was generated from.
    pub image_prompt: String,
    /// Illustration, real or placeholder.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageRef>,
    /// Suggested actions, in display order.
    pub choices: Vec<String>,
    /// Whether the story ends here.
    pub is_ending: bool,
}

impl Scene {
    /// Returns `true` if the player may act on this scene.
    #[must_use]
    pub fn accepts_actions(&self) -> bool {
        !self.is_ending
    }
}
