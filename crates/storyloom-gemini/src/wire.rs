//! `generateContent` request and response bodies.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use storyloom_core::image::InlineImage;
use storyloom_core::provider::{ConversationTurn, ProviderError, TurnRole};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user"),
            parts,
        }
    }

    pub fn system(text: &str) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }

    pub fn from_turn(turn: &ConversationTurn) -> Self {
        let role = match turn.role {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        };
        Self {
            role: Some(role),
            parts: vec![Part::text(&turn.text)],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub(crate) enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineDataPayload,
    },
}

impl Part {
    pub fn text(text: &str) -> Self {
        Self::Text {
            text: text.to_owned(),
        }
    }

    pub fn image(image: &InlineImage) -> Self {
        Self::InlineData {
            inline_data: InlineDataPayload {
                mime_type: image.mime_type.clone(),
                data: BASE64_STANDARD.encode(&image.bytes),
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineDataPayload {
    pub mime_type: String,
    pub data: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_modalities: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_config: Option<ImageConfig>,
}

impl GenerationConfig {
    /// JSON mode constrained to `schema`.
    pub fn json(schema: serde_json::Value) -> Self {
        Self {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            ..Self::default()
        }
    }

    /// Image output at the given aspect ratio.
    pub fn image(aspect_ratio: &'static str) -> Self {
        Self {
            response_modalities: Some(vec!["IMAGE"]),
            image_config: Some(ImageConfig { aspect_ratio }),
            ..Self::default()
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImageConfig {
    pub aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PartResponse {
    text: Option<String>,
    inline_data: Option<InlineDataPayload>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn parts(&self) -> Result<&[PartResponse], ProviderError> {
        let Some(candidate) = self.candidates.first() else {
            let reason = self
                .prompt_feedback
                .as_ref()
                .and_then(|feedback| feedback.block_reason.as_deref())
                .unwrap_or("no candidates");
            return Err(ProviderError::Schema(format!(
                "response carried no candidate: {reason}"
            )));
        };
        Ok(candidate
            .content
            .as_ref()
            .map_or(&[][..], |content| content.parts.as_slice()))
    }

    /// Concatenated text of the first candidate, skipping thought parts.
    /// Empty when the candidate has no text.
    pub fn text(&self) -> Result<String, ProviderError> {
        Ok(self
            .parts()?
            .iter()
            .filter(|part| !part.thought)
            .filter_map(|part| part.text.as_deref())
            .collect())
    }

    /// First inline image of the first candidate, decoded.
    pub fn inline_image(&self) -> Result<Option<InlineImage>, ProviderError> {
        let Some(payload) = self
            .parts()?
            .iter()
            .find_map(|part| part.inline_data.as_ref())
        else {
            return Ok(None);
        };
        let bytes = BASE64_STANDARD
            .decode(&payload.data)
            .map_err(|e| ProviderError::Schema(format!("inline image is not base64: {e}")))?;
        Ok(Some(InlineImage {
            mime_type: payload.mime_type.clone(),
            bytes,
        }))
    }
}
