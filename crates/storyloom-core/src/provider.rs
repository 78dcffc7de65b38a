//! Content-provider capability.
//!
//! The provider is a black box that generates text and images. This module
//! defines the request/response contract, the error variant every adapter
//! reports through, and the schema validation applied to raw structured
//! output before any of it reaches the domain.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::image::InlineImage;

/// Adapter-level failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Network failure, timeout, or a non-quota HTTP error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Rate-limit, billing or authorization rejection.
    #[error("quota error: {0}")]
    Quota(String),

    /// The response was not valid JSON or did not match the schema.
    #[error("schema error: {0}")]
    Schema(String),
}

/// Who spoke a turn in the replayed conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// The player (and the framing blocks sent on the player's behalf).
    User,
    /// The provider speaking as narrator.
    Model,
}

/// One turn of the conversation sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Speaker.
    pub role: TurnRole,
    /// Turn text.
    pub text: String,
}

impl ConversationTurn {
    /// A player turn.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// A narrator turn.
    #[must_use]
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Structured scene-generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneRequest {
    /// Framing instruction for the narrator.
    pub system_instruction: String,
    /// Ordered conversation; the last entry is the new player action.
    pub turns: Vec<ConversationTurn>,
}

/// Validated structured output of a scene call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDraft {
    /// Scene narration.
    pub description: String,
    /// Prompt for the illustration call.
    pub image_prompt: String,
    /// Suggested next actions.
    pub choices: Vec<String>,
    /// Whether this scene concludes the story.
    pub is_ending: bool,
}

impl SceneDraft {
    /// Parses and validates raw provider output.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Schema` if the text is not JSON, a required
    /// field is missing or mistyped, or the description is blank.
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        let draft: Self = serde_json::from_str(strip_code_fence(raw))
            .map_err(|e| ProviderError::Schema(e.to_string()))?;
        if draft.description.trim().is_empty() {
            return Err(ProviderError::Schema("description must not be empty".into()));
        }
        Ok(draft)
    }

    /// JSON schema the structured call is constrained to.
    #[must_use]
    pub fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "description": { "type": "STRING" },
                "imagePrompt": { "type": "STRING" },
                "choices": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" },
                    "minItems": 3,
                    "maxItems": 4
                },
                "isEnding": { "type": "BOOLEAN" }
            },
            "required": ["description", "imagePrompt", "choices", "isEnding"]
        })
    }
}

/// Illustration aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AspectRatio {
    /// 16:9, used for scene illustrations.
    Landscape,
    /// 1:1, used for portraits.
    Square,
}

impl AspectRatio {
    /// The ratio as the provider expects it.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Square => "1:1",
        }
    }
}

/// Input for a character-profile call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileInput {
    /// Derive the character from an uploaded image.
    Image(InlineImage),
    /// Invent a character from nothing.
    Blank,
}

/// Validated structured output of a character-profile call. Attribute
/// values are raw and must still be normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    /// Character name.
    pub name: String,
    /// Physical description.
    pub appearance_description: String,
    /// Raw strength.
    pub strength: i64,
    /// Raw dexterity.
    pub dexterity: i64,
    /// Raw intelligence.
    pub intelligence: i64,
    /// Raw charisma.
    pub charisma: i64,
}

impl CharacterProfile {
    /// Parses and validates raw provider output.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Schema` if the text is not JSON or a required
    /// field is missing or mistyped.
    pub fn from_json(raw: &str) -> Result<Self, ProviderError> {
        serde_json::from_str(strip_code_fence(raw)).map_err(|e| ProviderError::Schema(e.to_string()))
    }

    /// JSON schema the profile call is constrained to.
    #[must_use]
    pub fn response_schema() -> serde_json::Value {
        serde_json::json!({
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "appearanceDescription": { "type": "STRING" },
                "strength": { "type": "INTEGER" },
                "dexterity": { "type": "INTEGER" },
                "intelligence": { "type": "INTEGER" },
                "charisma": { "type": "INTEGER" }
            },
            "required": [
                "name", "appearanceDescription",
                "strength", "dexterity", "intelligence", "charisma"
            ]
        })
    }
}

/// Some models wrap JSON output in a Markdown fence even in JSON mode.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Remote text/image generation capability.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Generates the next scene from the replayed conversation.
    async fn generate_scene(&self, request: &SceneRequest) -> Result<SceneDraft, ProviderError>;

    /// Generates an illustration. Returns `Ok(None)` when the response is
    /// well-formed but carries no inline image.
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>, ProviderError>;

    /// Generates a character profile, optionally from an image.
    async fn generate_character_profile(
        &self,
        input: &ProfileInput,
    ) -> Result<CharacterProfile, ProviderError>;

    /// Generates free text no longer than `max_length` characters.
    async fn generate_short_text(
        &self,
        prompt: &str,
        max_length: usize,
    ) -> Result<String, ProviderError>;
}
