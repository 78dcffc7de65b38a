//! Command handlers for character building.
//!
//! Each handler is a short pipeline of fallible steps: ask the provider for
//! a profile, fill in a name if the provider left it blank, then push the
//! raw attributes through the stat budget.

use storyloom_core::command::Command;
use storyloom_core::error::DomainError;
use storyloom_core::image::ImageRef;
use storyloom_core::provider::{CharacterProfile, ContentProvider, ProfileInput};
use tracing::{info, warn};

use crate::domain::character::Character;
use crate::domain::commands::{
    AuthorCharacter, CreateCharacterFromImage, GenerateCharacter, GenerateCharacterName,
};
use crate::domain::stats::{Attributes, StatBudget};

/// Longest name the provider may suggest.
pub const NAME_MAX_LENGTH: usize = 30;

/// Name used when the provider answers with nothing usable.
pub const FALLBACK_NAME: &str = "Nameless Wanderer";

const NAME_PROMPT: &str = "Invent a single evocative name for a fantasy adventurer. \
Reply with the name only, no punctuation or explanation.";

/// Runs raw attributes through the standard budget, logging when the
/// target cannot be met.
fn normalize_attributes(raw: [i64; 4]) -> Attributes {
    let normalized = StatBudget::STANDARD.normalize(raw);
    if !normalized.is_exact() {
        warn!(
            raw = ?raw,
            unresolved = normalized.unresolved,
            "stat budget unreachable, keeping best-effort attributes"
        );
    }
    normalized.attributes
}

/// Trims whitespace and wrapping quotes, and caps the length.
fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '*' || c.is_whitespace())
        .chars()
        .take(NAME_MAX_LENGTH)
        .collect::<String>()
        .trim_end()
        .to_owned()
}

async fn suggest_name(provider: &dyn ContentProvider) -> Result<String, DomainError> {
    let raw = provider
        .generate_short_text(NAME_PROMPT, NAME_MAX_LENGTH)
        .await?;
    let name = clean_name(&raw);
    if name.is_empty() {
        warn!("provider returned an empty name, using fallback");
        return Ok(FALLBACK_NAME.to_owned());
    }
    Ok(name)
}

async fn character_from_profile(
    profile: CharacterProfile,
    portrait: Option<ImageRef>,
    provider: &dyn ContentProvider,
) -> Result<Character, DomainError> {
    let name = match clean_name(&profile.name) {
        name if name.is_empty() => suggest_name(provider).await?,
        name => name,
    };
    let attributes = normalize_attributes([
        profile.strength,
        profile.dexterity,
        profile.intelligence,
        profile.charisma,
    ]);
    Character::new(&name, &profile.appearance_description, attributes, portrait)
}

/// Handles `GenerateCharacter`: asks the provider to invent a character.
///
/// # Errors
///
/// Returns `DomainError::Provider`/`ProviderQuota` if a provider call fails.
pub async fn handle_generate_character(
    command: &GenerateCharacter,
    provider: &dyn ContentProvider,
) -> Result<Character, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "generating character"
    );
    let profile = provider
        .generate_character_profile(&ProfileInput::Blank)
        .await?;
    character_from_profile(profile, None, provider).await
}

/// Handles `CreateCharacterFromImage`: derives a character from the image
/// and keeps the image as its portrait.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the image is not an inline `data:`
/// URL, or a provider error if a provider call fails.
pub async fn handle_create_character_from_image(
    command: &CreateCharacterFromImage,
    provider: &dyn ContentProvider,
) -> Result<Character, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "creating character from image"
    );
    let inline = command.image.to_inline().ok_or_else(|| {
        DomainError::Validation("character image must be a base64 data URL".into())
    })?;
    let profile = provider
        .generate_character_profile(&ProfileInput::Image(inline))
        .await?;
    character_from_profile(profile, Some(command.image.clone()), provider).await
}

/// Handles `GenerateCharacterName`: suggests a name, falling back to
/// [`FALLBACK_NAME`] on empty output.
///
/// # Errors
///
/// Returns a provider error if the call fails.
pub async fn handle_generate_character_name(
    command: &GenerateCharacterName,
    provider: &dyn ContentProvider,
) -> Result<String, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "suggesting character name"
    );
    suggest_name(provider).await
}

/// Handles `AuthorCharacter`: builds a hand-authored character with its
/// attributes normalized to the budget.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is blank.
pub fn handle_author_character(command: &AuthorCharacter) -> Result<Character, DomainError> {
    info!(
        correlation_id = %command.correlation_id(),
        command = command.command_type(),
        "authoring character"
    );
    let attributes = normalize_attributes(command.attributes);
    Character::new(
        &command.name,
        &command.appearance_description,
        attributes,
        command.portrait.clone(),
    )
}

#[cfg(test)]
mod tests {
    use storyloom_core::error::DomainError;
    use storyloom_core::image::{ImageRef, InlineImage};
    use storyloom_core::provider::{ProfileInput, ProviderError};
    use storyloom_test_support::{FailingProvider, ProviderCall, ScriptedProvider, profile};
    use uuid::Uuid;

    use super::*;
    use crate::domain::stats::Attributes;

    fn upload() -> ImageRef {
        ImageRef::from_inline(&InlineImage {
            mime_type: "image/jpeg".to_owned(),
            bytes: vec![0xff, 0xd8, 0xff],
        })
    }

    #[tokio::test]
    async fn test_generate_character_normalizes_provider_attributes() {
        // Arrange
        let provider = ScriptedProvider::new().with_profile(Ok(profile("Ysolde", [9, -2, 3, 0])));
        let command = GenerateCharacter {
            correlation_id: Uuid::new_v4(),
        };

        // Act
        let character = handle_generate_character(&command, &provider).await.unwrap();

        // Assert: clamps to [5, 1, 3, 1] (sum 10).
        assert_eq!(character.name, "Ysolde");
        assert_eq!(character.attributes, Attributes::from_array([5, 1, 3, 1]));
        assert!(character.portrait.is_none());
        assert_eq!(provider.calls(), vec![ProviderCall::Profile(ProfileInput::Blank)]);
    }

    #[tokio::test]
    async fn test_create_from_image_keeps_image_as_portrait() {
        // Arrange
        let image = upload();
        let provider = ScriptedProvider::new().with_profile(Ok(profile("Corvin", [1, 1, 1, 1])));
        let command = CreateCharacterFromImage {
            correlation_id: Uuid::new_v4(),
            image: image.clone(),
        };

        // Act
        let character = handle_create_character_from_image(&command, &provider)
            .await
            .unwrap();

        // Assert
        assert_eq!(character.portrait, Some(image.clone()));
        assert_eq!(character.attributes.sum(), 10);
        match &provider.calls()[0] {
            ProviderCall::Profile(ProfileInput::Image(inline)) => {
                assert_eq!(inline.mime_type, "image/jpeg");
                assert_eq!(inline.bytes, vec![0xff, 0xd8, 0xff]);
            }
            other => panic!("expected image profile call, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_from_image_rejects_remote_reference() {
        let provider = ScriptedProvider::new();
        let command = CreateCharacterFromImage {
            correlation_id: Uuid::new_v4(),
            image: ImageRef::new("https://example.com/me.png"),
        };

        let result = handle_create_character_from_image(&command, &provider).await;

        assert!(matches!(result, Err(DomainError::Validation(_))));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_blank_profile_name_falls_back_to_name_generation() {
        // Arrange
        let provider = ScriptedProvider::new()
            .with_profile(Ok(profile("  ", [2, 2, 3, 3])))
            .with_short_text(Ok("\"Thessaly Vane\"\n".to_owned()));
        let command = GenerateCharacter {
            correlation_id: Uuid::new_v4(),
        };

        // Act
        let character = handle_generate_character(&command, &provider).await.unwrap();

        // Assert
        assert_eq!(character.name, "Thessaly Vane");
        assert!(matches!(
            provider.calls()[1],
            ProviderCall::ShortText(_, NAME_MAX_LENGTH)
        ));
    }

    #[tokio::test]
    async fn test_generate_name_uses_fallback_on_empty_output() {
        let provider = ScriptedProvider::new().with_short_text(Ok("  \"\" ".to_owned()));
        let command = GenerateCharacterName {
            correlation_id: Uuid::new_v4(),
        };

        let name = handle_generate_character_name(&command, &provider).await.unwrap();

        assert_eq!(name, FALLBACK_NAME);
    }

    #[tokio::test]
    async fn test_generate_name_caps_length() {
        let provider = ScriptedProvider::new().with_short_text(Ok("A".repeat(80)));
        let command = GenerateCharacterName {
            correlation_id: Uuid::new_v4(),
        };

        let name = handle_generate_character_name(&command, &provider).await.unwrap();

        assert_eq!(name.chars().count(), NAME_MAX_LENGTH);
    }

    #[tokio::test]
    async fn test_generate_character_propagates_quota_error() {
        let provider = FailingProvider(ProviderError::Quota("billing disabled".into()));
        let command = GenerateCharacter {
            correlation_id: Uuid::new_v4(),
        };

        let result = handle_generate_character(&command, &provider).await;

        match result {
            Err(DomainError::ProviderQuota(msg)) => assert_eq!(msg, "billing disabled"),
            other => panic!("expected ProviderQuota, got {other:?}"),
        }
    }

    #[test]
    fn test_author_character_normalizes_requested_attributes() {
        let command = AuthorCharacter {
            correlation_id: Uuid::new_v4(),
            name: "Mira".to_owned(),
            appearance_description: "one-eyed cartographer".to_owned(),
            attributes: [5, 5, 5, 5],
            portrait: None,
        };

        let character = handle_author_character(&command).unwrap();

        assert_eq!(character.attributes, Attributes::from_array([2, 2, 3, 3]));
    }

    #[test]
    fn test_author_character_rejects_blank_name() {
        let command = AuthorCharacter {
            correlation_id: Uuid::new_v4(),
            name: " ".to_owned(),
            appearance_description: String::new(),
            attributes: [3, 3, 2, 2],
            portrait: None,
        };

        match handle_author_character(&command) {
            Err(DomainError::Validation(msg)) => {
                assert_eq!(msg, "character name must not be empty");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }
}
