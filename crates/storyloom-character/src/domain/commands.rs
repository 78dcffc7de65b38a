//! Commands for character building.

use storyloom_core::image::ImageRef;
use storyloom_core::impl_command;
use uuid::Uuid;

/// Command to invent a character from nothing.
#[derive(Debug, Clone)]
pub struct GenerateCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(GenerateCharacter, "character.generate");

/// Command to derive a character from an uploaded image.
#[derive(Debug, Clone)]
pub struct CreateCharacterFromImage {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The uploaded image as a `data:` URL. Kept as the portrait.
    pub image: ImageRef,
}

impl_command!(CreateCharacterFromImage, "character.create_from_image");

/// Command to suggest a random character name.
#[derive(Debug, Clone)]
pub struct GenerateCharacterName {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl_command!(GenerateCharacterName, "character.generate_name");

/// Command to author a character by hand.
#[derive(Debug, Clone)]
pub struct AuthorCharacter {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The character's name.
    pub name: String,
    /// The character's appearance.
    pub appearance_description: String,
    /// Requested `[strength, dexterity, intelligence, charisma]`; normalized.
    pub attributes: [i64; 4],
    /// Optional portrait.
    pub portrait: Option<ImageRef>,
}

impl_command!(AuthorCharacter, "character.author");
