//! Routes for character creation.

use axum::extract::State;
use axum::{Json, Router, routing::post};
use serde::{Deserialize, Serialize};
use storyloom_character::domain::character::Character;
use storyloom_character::domain::commands as character_commands;
use storyloom_core::image::ImageRef;
use storyloom_session::application::command_handlers;
use storyloom_session::application::query_handlers::{self, SessionView};
use storyloom_session::domain::commands;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /from-image.
#[derive(Debug, Deserialize)]
pub struct FromImageRequest {
    /// The uploaded image as a `data:` URL.
    pub image: ImageRef,
}

/// Request body for POST /confirm.
#[derive(Debug, Deserialize)]
pub struct ConfirmCharacterRequest {
    /// The character's name.
    pub name: String,
    /// The character's appearance.
    #[serde(default)]
    pub appearance_description: String,
    /// Requested strength; normalized with the others.
    pub strength: i64,
    /// Requested dexterity.
    pub dexterity: i64,
    /// Requested intelligence.
    pub intelligence: i64,
    /// Requested charisma.
    pub charisma: i64,
    /// Optional portrait.
    #[serde(default)]
    pub portrait: Option<ImageRef>,
}

/// Response body for POST /name.
#[derive(Debug, Serialize)]
pub struct NameResponse {
    /// The suggested name.
    pub name: String,
}

/// POST /begin
#[instrument(skip(state))]
async fn begin_creation(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let command = commands::BeginCharacterCreation {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling begin_character_creation command");

    command_handlers::handle_begin_character_creation(&command, &state.session)?;

    Ok(Json(query_handlers::get_session(&state.session)?))
}

/// POST /cancel
#[instrument(skip(state))]
async fn cancel_creation(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let command = commands::CancelCharacterCreation {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling cancel_character_creation command");

    command_handlers::handle_cancel_character_creation(&command, &state.session)?;

    Ok(Json(query_handlers::get_session(&state.session)?))
}

/// POST /generate
#[instrument(skip(state))]
async fn generate_character(State(state): State<AppState>) -> Result<Json<Character>, ApiError> {
    let command = character_commands::GenerateCharacter {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling generate_character command");

    let character =
        command_handlers::handle_draft_generated_character(&command, &state.session, &*state.provider)
            .await?;

    Ok(Json(character))
}

/// POST /from-image
#[instrument(skip(state, request))]
async fn character_from_image(
    State(state): State<AppState>,
    Json(request): Json<FromImageRequest>,
) -> Result<Json<Character>, ApiError> {
    let command = character_commands::CreateCharacterFromImage {
        correlation_id: Uuid::new_v4(),
        image: request.image,
    };

    info!(correlation_id = %command.correlation_id, "handling create_character_from_image command");

    let character = command_handlers::handle_draft_character_from_image(
        &command,
        &state.session,
        &*state.provider,
    )
    .await?;

    Ok(Json(character))
}

/// POST /name
#[instrument(skip(state))]
async fn suggest_name(State(state): State<AppState>) -> Result<Json<NameResponse>, ApiError> {
    let command = character_commands::GenerateCharacterName {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling generate_character_name command");

    let name =
        command_handlers::handle_suggest_character_name(&command, &state.session, &*state.provider)
            .await?;

    Ok(Json(NameResponse { name }))
}

/// POST /confirm
#[instrument(skip(state, request), fields(name = %request.name))]
async fn confirm_character(
    State(state): State<AppState>,
    Json(request): Json<ConfirmCharacterRequest>,
) -> Result<Json<Character>, ApiError> {
    let command = character_commands::AuthorCharacter {
        correlation_id: Uuid::new_v4(),
        name: request.name,
        appearance_description: request.appearance_description,
        attributes: [
            request.strength,
            request.dexterity,
            request.intelligence,
            request.charisma,
        ],
        portrait: request.portrait,
    };

    info!(correlation_id = %command.correlation_id, "handling author_character command");

    let character = command_handlers::handle_confirm_character(&command, &state.session)?;

    Ok(Json(character))
}

/// Returns the router for the character context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/begin", post(begin_creation))
        .route("/cancel", post(cancel_creation))
        .route("/generate", post(generate_character))
        .route("/from-image", post(character_from_image))
        .route("/name", post(suggest_name))
        .route("/confirm", post(confirm_character))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use storyloom_core::rng::DeterministicRng;
    use storyloom_store::memory_store::MemoryStore;
    use storyloom_test_support::{MockRng, ScriptedProvider};
    use tower::ServiceExt;

    fn test_app_state() -> AppState {
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(
            Arc::new(ScriptedProvider::new()),
            Arc::new(MemoryStore::new()),
            rng,
        )
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_confirm_outside_creation_returns_409() {
        // Arrange
        let app = router().with_state(test_app_state());
        let body = serde_json::json!({
            "name": "Ash",
            "strength": 3, "dexterity": 3, "intelligence": 2, "charisma": 2
        });

        // Act
        let response = app.oneshot(post("/confirm", &body)).await.unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_begin_moves_session_into_character_creation() {
        let app = router().with_state(test_app_state());

        let response = app.oneshot(post("/begin", &Value::Null)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(json["status"], "character_creation");
    }

    #[tokio::test]
    async fn test_from_image_rejects_missing_image_field() {
        let app = router().with_state(test_app_state());

        let response = app
            .oneshot(post("/from-image", &serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
