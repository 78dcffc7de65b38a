//! Routes for the play session: starting, acting, resetting, save slot.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use storyloom_narrative::domain::history::HistoryEntry;
use storyloom_narrative::domain::scene::Scene;
use storyloom_session::application::query_handlers::{self, SessionView};
use storyloom_session::application::{command_handlers, persistence};
use storyloom_session::domain::commands;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for POST /start.
#[derive(Debug, Default, Deserialize)]
pub struct StartSessionRequest {
    /// Story premise. Omitted or blank lets the provider invent one.
    #[serde(default)]
    pub story_seed: String,
}

/// Request body for POST /action.
#[derive(Debug, Deserialize)]
pub struct SubmitActionRequest {
    /// Free text or one of the offered choices.
    pub action: String,
}

/// Response body for GET /saved.
#[derive(Debug, Serialize)]
pub struct SavedSlotResponse {
    /// Whether the save slot holds a record.
    pub has_saved: bool,
}

/// GET /
async fn show_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    Ok(Json(query_handlers::get_session(&state.session)?))
}

/// GET /history
async fn show_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistoryEntry>>, ApiError> {
    Ok(Json(query_handlers::get_history(&state.session)?))
}

/// POST /start
#[instrument(skip(state, request))]
async fn start_session(
    State(state): State<AppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<Json<Scene>, ApiError> {
    let command = commands::StartSession {
        correlation_id: Uuid::new_v4(),
        story_seed: request.story_seed,
    };

    info!(correlation_id = %command.correlation_id, "handling start_session command");

    let scene = command_handlers::handle_start_session(
        &command,
        &state.session,
        &*state.provider,
        &*state.rng,
    )
    .await?;

    Ok(Json(scene))
}

/// POST /action
#[instrument(skip(state, request))]
async fn submit_action(
    State(state): State<AppState>,
    Json(request): Json<SubmitActionRequest>,
) -> Result<Json<Scene>, ApiError> {
    let command = commands::SubmitAction {
        correlation_id: Uuid::new_v4(),
        action: request.action,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_action command");

    let scene = command_handlers::handle_submit_action(
        &command,
        &state.session,
        &*state.provider,
        &*state.rng,
    )
    .await?;

    Ok(Json(scene))
}

/// POST /reset
#[instrument(skip(state))]
async fn reset_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let command = commands::ResetSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling reset_session command");

    command_handlers::handle_reset_session(&command, &state.session)?;

    Ok(Json(query_handlers::get_session(&state.session)?))
}

/// POST /save
#[instrument(skip(state))]
async fn save_session(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let command = commands::SaveSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling save_session command");

    persistence::handle_save_session(&command, &state.session, &*state.store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /load
#[instrument(skip(state))]
async fn load_session(State(state): State<AppState>) -> Result<Json<SessionView>, ApiError> {
    let command = commands::LoadSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling load_session command");

    let loaded =
        persistence::handle_load_session(&command, &state.session, &*state.store).await?;

    Ok(Json(SessionView::from(&loaded)))
}

/// GET /saved
async fn show_saved_slot(
    State(state): State<AppState>,
) -> Result<Json<SavedSlotResponse>, ApiError> {
    let has_saved = persistence::has_saved_session(&*state.store).await?;
    Ok(Json(SavedSlotResponse { has_saved }))
}

/// DELETE /saved
#[instrument(skip(state))]
async fn discard_saved_slot(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    let command = commands::DiscardSavedSession {
        correlation_id: Uuid::new_v4(),
    };

    info!(correlation_id = %command.correlation_id, "handling discard_saved_session command");

    persistence::handle_discard_saved_session(&command, &*state.store).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Returns the router for the session context.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(show_session))
        .route("/history", get(show_history))
        .route("/start", post(start_session))
        .route("/action", post(submit_action))
        .route("/reset", post(reset_session))
        .route("/save", post(save_session))
        .route("/load", post(load_session))
        .route("/saved", get(show_saved_slot).delete(discard_saved_slot))
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use storyloom_core::provider::{ContentProvider, ProviderError};
    use storyloom_core::rng::DeterministicRng;
    use storyloom_store::memory_store::MemoryStore;
    use storyloom_test_support::{FailingProvider, MockRng, ScriptedProvider, scene_draft};
    use tower::ServiceExt;

    fn app_state_with(provider: Arc<dyn ContentProvider>) -> AppState {
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> = Arc::new(Mutex::new(MockRng));
        AppState::new(provider, Arc::new(MemoryStore::new()), rng)
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).unwrap()))
            .unwrap()
    }

    async fn json_of(response: axum::response::Response) -> Value {
        let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body_bytes).unwrap()
    }

    #[tokio::test]
    async fn test_start_returns_opening_scene() {
        // Arrange
        let provider = ScriptedProvider::new()
            .with_profile(Ok(storyloom_test_support::profile("Wren", [3, 3, 2, 2])))
            .with_scene(Ok(scene_draft("The gates creak open.")));
        let app = router().with_state(app_state_with(Arc::new(provider)));

        // Act
        let response = app
            .oneshot(post("/start", &serde_json::json!({ "story_seed": "A walled city." })))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["description"], "The gates creak open.");
        assert_eq!(json["choices"].as_array().unwrap().len(), 3);
        assert_eq!(json["isEnding"], false);
    }

    #[tokio::test]
    async fn test_action_before_start_returns_409() {
        let app = router().with_state(app_state_with(Arc::new(ScriptedProvider::new())));

        let response = app
            .oneshot(post("/action", &serde_json::json!({ "action": "Look around" })))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_of(response).await["error"], "invalid_transition");
    }

    #[tokio::test]
    async fn test_action_without_body_field_returns_422() {
        let app = router().with_state(app_state_with(Arc::new(ScriptedProvider::new())));

        let response = app.oneshot(post("/action", &serde_json::json!({}))).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_start_with_exhausted_quota_returns_402() {
        // Arrange
        let provider = FailingProvider(ProviderError::Quota("HTTP 429".into()));
        let app = router().with_state(app_state_with(Arc::new(provider)));

        // Act
        let response = app
            .oneshot(post("/start", &serde_json::json!({ "story_seed": "A storm." })))
            .await
            .unwrap();

        // Assert
        assert_eq!(response.status(), StatusCode::PAYMENT_REQUIRED);
        assert_eq!(json_of(response).await["error"], "provider_quota");
    }

    #[tokio::test]
    async fn test_save_without_scene_returns_400() {
        let app = router().with_state(app_state_with(Arc::new(ScriptedProvider::new())));

        let response = app.oneshot(post("/save", &Value::Null)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_load_with_empty_slot_returns_404() {
        let app = router().with_state(app_state_with(Arc::new(ScriptedProvider::new())));

        let response = app.oneshot(post("/load", &Value::Null)).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_of(response).await["error"], "not_found");
    }
}
