//! Turn orchestration.
//!
//! One turn is two provider calls in strict order: a structured text call
//! that writes the scene, then an illustration call driven by the prompt the
//! first call returned. Only the text call can fail the turn. A failed or
//! empty illustration is replaced by a placeholder keyed by a random seed.

use std::sync::{Mutex, PoisonError};

use storyloom_character::domain::character::Character;
use storyloom_core::error::DomainError;
use storyloom_core::image::ImageRef;
use storyloom_core::provider::{AspectRatio, ContentProvider};
use storyloom_core::rng::DeterministicRng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::prompt::build_scene_request;
use crate::domain::history::HistoryLog;
use crate::domain::scene::Scene;

/// Style applied to every illustration prompt.
pub const IMAGE_STYLE_PREFIX: &str =
    "Cinematic fantasy illustration, painterly digital art, dramatic lighting, no text: ";

/// Aspect ratio of scene illustrations.
pub const SCENE_ASPECT_RATIO: AspectRatio = AspectRatio::Landscape;

/// Upper bound for placeholder seeds.
pub const PLACEHOLDER_SEED_MAX: u32 = 1_000_000;

/// Longest premise requested when the player gives no story seed.
pub const STORY_SEED_MAX_LENGTH: usize = 600;

/// Premise used when the provider answers with an empty one.
pub const FALLBACK_STORY: &str = "You are a traveler who has just arrived at the gates of a \
walled city at dusk, carrying a sealed letter you were paid not to open.";

const STORY_SEED_PROMPT: &str = "Write the premise of an original interactive adventure story \
in two or three sentences, addressed to the player in the second person. \
Pick any genre. Reply with the premise only.";

/// Everything one turn needs from the session.
#[derive(Debug, Clone, Copy)]
pub struct TurnContext<'a> {
    /// The story premise.
    pub original_story: &'a str,
    /// Every entry so far.
    pub history: &'a HistoryLog,
    /// The player's new action.
    pub action: &'a str,
    /// The player character, if one exists.
    pub character: Option<&'a Character>,
}

/// Produces the next scene.
///
/// The RNG mutex is locked only to draw a placeholder seed, never across an
/// await.
///
/// # Errors
///
/// Returns the provider's error if the scene text call fails. Illustration
/// failures never propagate.
pub async fn produce_scene(
    context: &TurnContext<'_>,
    provider: &dyn ContentProvider,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> Result<Scene, DomainError> {
    let request = build_scene_request(
        context.original_story,
        context.history,
        context.action,
        context.character,
    );
    debug!(turns = request.turns.len(), "requesting scene text");

    let draft = provider.generate_scene(&request).await?;
    let image = illustrate(&draft.image_prompt, provider, rng).await;

    let scene = Scene {
        id: Uuid::new_v4(),
        description: draft.description,
        image_prompt: draft.image_prompt,
        image: Some(image),
        choices: draft.choices,
        is_ending: draft.is_ending,
    };
    info!(
        scene_id = %scene.id,
        choices = scene.choices.len(),
        is_ending = scene.is_ending,
        "scene produced"
    );
    Ok(scene)
}

/// Generates an illustration, falling back to a placeholder on any failure.
pub async fn illustrate(
    image_prompt: &str,
    provider: &dyn ContentProvider,
    rng: &Mutex<dyn DeterministicRng + Send>,
) -> ImageRef {
    let prompt = format!("{IMAGE_STYLE_PREFIX}{image_prompt}");
    match provider.generate_image(&prompt, SCENE_ASPECT_RATIO).await {
        Ok(Some(image)) => return ImageRef::from_inline(&image),
        Ok(None) => warn!("illustration response carried no image, using placeholder"),
        Err(e) => warn!(error = %e, "illustration failed, using placeholder"),
    }
    let seed = rng
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .next_u32_range(1, PLACEHOLDER_SEED_MAX);
    ImageRef::placeholder(seed)
}

/// Asks the provider for a story premise.
///
/// # Errors
///
/// Returns the provider's error if the call fails.
pub async fn generate_story_seed(provider: &dyn ContentProvider) -> Result<String, DomainError> {
    let premise = provider
        .generate_short_text(STORY_SEED_PROMPT, STORY_SEED_MAX_LENGTH)
        .await?;
    let premise = premise.trim();
    if premise.is_empty() {
        warn!("provider returned an empty premise, using fallback");
        return Ok(FALLBACK_STORY.to_owned());
    }
    Ok(premise.to_owned())
}
