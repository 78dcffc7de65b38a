//! The Gemini-backed `ContentProvider`.

use async_trait::async_trait;
use reqwest::Client;
use storyloom_core::image::InlineImage;
use storyloom_core::provider::{
    AspectRatio, CharacterProfile, ContentProvider, ProfileInput, ProviderError, SceneDraft,
    SceneRequest,
};
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::http_error::{map_http_error, parse_retry_after};
use crate::wire::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, Part};

const API_KEY_HEADER: &str = "x-goog-api-key";

const BLANK_PROFILE_PROMPT: &str = "Invent an original adventurer for an interactive story. \
Give a name, a vivid two-sentence appearance description, and rate strength, dexterity, \
intelligence and charisma from 1 to 5 so that the four ratings add up to exactly 10.";

const IMAGE_PROFILE_PROMPT: &str = "Treat the person or creature in this image as the hero \
of an interactive story. Give them a fitting name, describe their appearance in two \
sentences, and rate strength, dexterity, intelligence and charisma from 1 to 5 so that \
the four ratings add up to exactly 10, judging from what the image suggests.";

/// Content provider backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
}

impl GeminiProvider {
    /// Builds a provider with an HTTP client using the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError::Transport` if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    async fn generate(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ProviderError> {
        let url = format!("{}/{model}:generateContent", self.config.base_url);
        debug!(model, "calling generateContent");

        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                let kind = if err.is_timeout() { "timed out" } else { "failed" };
                ProviderError::Transport(format!("Gemini request {kind}: {}", err.without_url()))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "failed to read Gemini error body".to_owned());
            let error = map_http_error(status, &body_text, retry_after);
            warn!(model, error = %error, "generateContent rejected");
            return Err(error);
        }

        response
            .json()
            .await
            .map_err(|err| ProviderError::Schema(format!("unreadable Gemini response: {err}")))
    }

    fn structured(
        contents: Vec<Content>,
        system_instruction: Option<Content>,
        schema: serde_json::Value,
    ) -> GenerateContentRequest {
        GenerateContentRequest {
            contents,
            system_instruction,
            generation_config: Some(GenerationConfig::json(schema)),
        }
    }
}

#[async_trait]
impl ContentProvider for GeminiProvider {
    async fn generate_scene(&self, request: &SceneRequest) -> Result<SceneDraft, ProviderError> {
        let body = Self::structured(
            request.turns.iter().map(Content::from_turn).collect(),
            Some(Content::system(&request.system_instruction)),
            SceneDraft::response_schema(),
        );
        let response = self.generate(&self.config.text_model, &body).await?;
        SceneDraft::from_json(&response.text()?)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
    ) -> Result<Option<InlineImage>, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            system_instruction: None,
            generation_config: Some(GenerationConfig::image(aspect_ratio.as_str())),
        };
        let response = self.generate(&self.config.image_model, &body).await?;
        response.inline_image()
    }

    async fn generate_character_profile(
        &self,
        input: &ProfileInput,
    ) -> Result<CharacterProfile, ProviderError> {
        let parts = match input {
            ProfileInput::Image(image) => vec![Part::image(image), Part::text(IMAGE_PROFILE_PROMPT)],
            ProfileInput::Blank => vec![Part::text(BLANK_PROFILE_PROMPT)],
        };
        let body = Self::structured(
            vec![Content::user(parts)],
            None,
            CharacterProfile::response_schema(),
        );
        let response = self.generate(&self.config.text_model, &body).await?;
        CharacterProfile::from_json(&response.text()?)
    }

    async fn generate_short_text(
        &self,
        prompt: &str,
        max_length: usize,
    ) -> Result<String, ProviderError> {
        let body = GenerateContentRequest {
            contents: vec![Content::user(vec![Part::text(prompt)])],
            system_instruction: None,
            generation_config: None,
        };
        let response = self.generate(&self.config.text_model, &body).await?;
        Ok(response.text()?.trim().chars().take(max_length).collect())
    }
}
