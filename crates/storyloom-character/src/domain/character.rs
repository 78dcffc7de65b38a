//! The player character.

use serde::{Deserialize, Serialize};
use storyloom_core::error::DomainError;
use storyloom_core::image::ImageRef;

use super::stats::{Attributes, StatBudget};

/// A player character. Attributes always satisfy [`StatBudget::STANDARD`].
///
/// Deserialization goes through [`Character::new`], so a stored record that
/// breaks the budget or has a blank name is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "CharacterRecord")]
pub struct Character {
    /// Display name.
    pub name: String,
    /// Physical description fed to the narrator.
    pub appearance_description: String,
    /// Stat-budgeted attributes.
    #[serde(flatten)]
    pub attributes: Attributes,
    /// Portrait, when the character was built from an image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portrait: Option<ImageRef>,
}

/// Unvalidated wire shape of a [`Character`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CharacterRecord {
    name: String,
    appearance_description: String,
    #[serde(flatten)]
    attributes: Attributes,
    #[serde(default)]
    portrait: Option<ImageRef>,
}

impl TryFrom<CharacterRecord> for Character {
    type Error = DomainError;

    fn try_from(record: CharacterRecord) -> Result<Self, Self::Error> {
        Self::new(
            &record.name,
            &record.appearance_description,
            record.attributes,
            record.portrait,
        )
    }
}

impl Character {
    /// Creates a character, trimming text fields.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the name is blank or the
    /// attributes break the standard stat budget.
    pub fn new(
        name: &str,
        appearance_description: &str,
        attributes: Attributes,
        portrait: Option<ImageRef>,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::Validation(
                "character name must not be empty".into(),
            ));
        }
        if !StatBudget::STANDARD.accepts(attributes) {
            return Err(DomainError::Validation(format!(
                "attributes {:?} break the stat budget",
                attributes.to_array()
            )));
        }
        Ok(Self {
            name: name.to_owned(),
            appearance_description: appearance_description.trim().to_owned(),
            attributes,
            portrait,
        })
    }
}
