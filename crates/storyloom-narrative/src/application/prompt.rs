//! Prompt assembly for scene generation.
//!
//! A scene request replays the whole story so far: a framing turn carrying
//! the character sheet and the origin story, every history entry in order,
//! and finally the player's new action.

use std::fmt::Write as _;

use storyloom_character::domain::character::Character;
use storyloom_core::provider::{ConversationTurn, SceneRequest};

use crate::domain::history::{HistoryLog, Role};

/// Action sent as the first player turn of a new story.
pub const OPENING_ACTION: &str = "The adventure begins. Set the opening scene.";

/// Framing instruction sent with every scene request.
pub const NARRATOR_INSTRUCTION: &str = "You are the narrator of an interactive text adventure. \
Continue the story in the second person, reacting to the player's latest action. \
Keep each scene to one or two vivid paragraphs. \
Offer three or four distinct, concrete choices for what the player might do next. \
Write an imagePrompt that describes the scene visually for an illustrator, without any text or lettering. \
Set isEnding to true only when the story reaches a clear conclusion, and then offer no choices.";

/// Renders the character sheet block.
#[must_use]
pub fn character_block(character: &Character) -> String {
    let attrs = character.attributes;
    let mut block = String::from("PLAYER CHARACTER\n");
    let _ = writeln!(block, "Name: {}", character.name);
    if !character.appearance_description.is_empty() {
        let _ = writeln!(block, "Appearance: {}", character.appearance_description);
    }
    let _ = writeln!(
        block,
        "Strength {}/5, Dexterity {}/5, Intelligence {}/5, Charisma {}/5",
        attrs.strength, attrs.dexterity, attrs.intelligence, attrs.charisma
    );
    block.push_str("Let these attributes shape which actions succeed, struggle or fail.");
    block
}

/// Builds the scene request for one turn.
#[must_use]
pub fn build_scene_request(
    original_story: &str,
    history: &HistoryLog,
    action: &str,
    character: Option<&Character>,
) -> SceneRequest {
    let mut framing = String::new();
    if let Some(character) = character {
        framing.push_str(&character_block(character));
        framing.push_str("\n\n");
    }
    framing.push_str("ORIGIN STORY\n");
    framing.push_str(original_story.trim());

    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(ConversationTurn::user(framing));
    turns.extend(history.entries().iter().map(|entry| match entry.role {
        Role::User => ConversationTurn::user(entry.text.clone()),
        Role::Narrator => ConversationTurn::model(entry.text.clone()),
    }));
    turns.push(ConversationTurn::user(action.trim()));

    SceneRequest {
        system_instruction: NARRATOR_INSTRUCTION.to_owned(),
        turns,
    }
}

#[cfg(test)]
mod tests {
    use storyloom_character::domain::stats::Attributes;
    use storyloom_core::provider::TurnRole;

    use super::*;
    use crate::domain::history::HistoryEntry;

    fn hero() -> Character {
        Character::new("Mira", "one-eyed cartographer", Attributes::from_array([2, 3, 4, 1]), None)
            .unwrap()
    }

    #[test]
    fn test_request_replays_history_between_framing_and_action() {
        // Arrange
        let mut history = HistoryLog::opened_with("You wake on a beach.");
        history.append(HistoryEntry::user("Look around"));
        history.append(HistoryEntry::narrator("Gulls circle a wreck."));

        // Act
        let request = build_scene_request("Shipwrecked.", &history, "Swim to the wreck", None);

        // Assert
        let roles: Vec<TurnRole> = request.turns.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TurnRole::User,
                TurnRole::Model,
                TurnRole::User,
                TurnRole::Model,
                TurnRole::User
            ]
        );
        assert_eq!(request.turns[0].text, "ORIGIN STORY\nShipwrecked.");
        assert_eq!(request.turns[1].text, "You wake on a beach.");
        assert_eq!(request.turns[4].text, "Swim to the wreck");
        assert_eq!(request.system_instruction, NARRATOR_INSTRUCTION);
    }

    #[test]
    fn test_character_block_is_prepended_once() {
        let history = HistoryLog::opened_with("You wake on a beach.");

        let request = build_scene_request("Shipwrecked.", &history, "Wait", Some(&hero()));

        let framing = &request.turns[0].text;
        assert!(framing.starts_with("PLAYER CHARACTER\nName: Mira\n"));
        assert!(framing.contains("Strength 2/5, Dexterity 3/5, Intelligence 4/5, Charisma 1/5"));
        assert!(framing.ends_with("ORIGIN STORY\nShipwrecked."));
        let mentions = request
            .turns
            .iter()
            .filter(|t| t.text.contains("PLAYER CHARACTER"))
            .count();
        assert_eq!(mentions, 1);
    }

    #[test]
    fn test_opening_request_has_framing_and_cue_only() {
        let request = build_scene_request("A heist.", &HistoryLog::new(), OPENING_ACTION, None);

        assert_eq!(request.turns.len(), 2);
        assert_eq!(request.turns[1].text, OPENING_ACTION);
    }

    #[test]
    fn test_character_block_skips_blank_appearance() {
        let character =
            Character::new("Mira", "", Attributes::from_array([3, 3, 2, 2]), None).unwrap();

        let block = character_block(&character);

        assert!(!block.contains("Appearance"));
    }
}
