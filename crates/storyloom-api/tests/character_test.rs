//! Integration tests for the character creation routes.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use storyloom_core::provider::ProviderError;
use storyloom_test_support::{ProviderCall, ScriptedProvider, profile, scene_draft};

fn attribute_sum(character: &serde_json::Value) -> i64 {
    ["strength", "dexterity", "intelligence", "charisma"]
        .iter()
        .map(|key| character[*key].as_i64().unwrap())
        .sum()
}

#[tokio::test]
async fn test_confirmed_character_is_normalized_and_used_at_start() {
    // Arrange
    let provider = Arc::new(
        ScriptedProvider::new().with_scene(Ok(scene_draft("Snow falls on the pass."))),
    );
    let app = common::build_test_app(provider.clone());
    let (status, _) =
        common::post_json(app.clone(), "/api/v1/character/begin", &serde_json::Value::Null).await;
    assert_eq!(status, StatusCode::OK);

    // Act
    let (status, character) = common::post_json(
        app.clone(),
        "/api/v1/character/confirm",
        &serde_json::json!({
            "name": "  Brynna  ",
            "appearance_description": "A tall mountaineer with a scarred chin.",
            "strength": 9, "dexterity": 7, "intelligence": 5, "charisma": 1
        }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(character["name"], "Brynna");
    assert_eq!(attribute_sum(&character), 10);
    assert_eq!(character["strength"], 3);
    assert_eq!(character["charisma"], 1);

    let (_, view) = common::get_json(app.clone(), "/api/v1/session").await;
    assert_eq!(view["status"], "idle");
    assert_eq!(view["character"]["name"], "Brynna");

    let (status, _) = common::post_json(
        app,
        "/api/v1/session/start",
        &serde_json::json!({ "story_seed": "A mountain pass." }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        !provider
            .calls()
            .iter()
            .any(|call| matches!(call, ProviderCall::Profile(_)))
    );
}

#[tokio::test]
async fn test_generate_returns_draft_without_attaching_it() {
    // Arrange
    let provider = ScriptedProvider::new().with_profile(Ok(profile("Kestrel", [5, 5, 5, 5])));
    let app = common::build_test_app(Arc::new(provider));
    common::post_json(app.clone(), "/api/v1/character/begin", &serde_json::Value::Null).await;

    // Act
    let (status, character) =
        common::post_json(app.clone(), "/api/v1/character/generate", &serde_json::Value::Null)
            .await;
    let (_, view) = common::get_json(app, "/api/v1/session").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(character["name"], "Kestrel");
    assert_eq!(attribute_sum(&character), 10);
    assert_eq!(view["status"], "character_creation");
    assert!(view["character"].is_null());
}

#[tokio::test]
async fn test_suggest_name_returns_trimmed_name() {
    let provider = ScriptedProvider::new().with_short_text(Ok("  \"Sable Marrow\"\n".to_owned()));
    let app = common::build_test_app(Arc::new(provider));
    common::post_json(app.clone(), "/api/v1/character/begin", &serde_json::Value::Null).await;

    let (status, json) =
        common::post_json(app, "/api/v1/character/name", &serde_json::Value::Null).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Sable Marrow");
}

#[tokio::test]
async fn test_quota_during_generate_closes_character_creation() {
    // Arrange
    let provider =
        ScriptedProvider::new().with_profile(Err(ProviderError::Quota("HTTP 402".into())));
    let app = common::build_test_app(Arc::new(provider));
    common::post_json(app.clone(), "/api/v1/character/begin", &serde_json::Value::Null).await;

    // Act
    let (status, json) =
        common::post_json(app.clone(), "/api/v1/character/generate", &serde_json::Value::Null)
            .await;
    let (_, view) = common::get_json(app, "/api/v1/session").await;

    // Assert
    assert_eq!(status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(json["error"], "provider_quota");
    assert_eq!(view["status"], "idle");
}

#[tokio::test]
async fn test_from_image_rejects_non_data_url() {
    let app = common::build_test_app(Arc::new(ScriptedProvider::new()));
    common::post_json(app.clone(), "/api/v1/character/begin", &serde_json::Value::Null).await;

    let (status, json) = common::post_json(
        app,
        "/api/v1/character/from-image",
        &serde_json::json!({ "image": "https://example.com/me.png" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation_error");
}

#[tokio::test]
async fn test_from_image_keeps_upload_as_portrait() {
    // Arrange
    let provider = ScriptedProvider::new().with_profile(Ok(profile("Corvin", [2, 3, 2, 7])));
    let app = common::build_test_app(Arc::new(provider));
    common::post_json(app.clone(), "/api/v1/character/begin", &serde_json::Value::Null).await;
    let upload = "data:image/png;base64,iVBORw==";

    // Act
    let (status, character) = common::post_json(
        app,
        "/api/v1/character/from-image",
        &serde_json::json!({ "image": upload }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(character["name"], "Corvin");
    assert_eq!(character["portrait"], upload);
    assert_eq!(attribute_sum(&character), 10);
}

#[tokio::test]
async fn test_cancel_outside_creation_returns_409() {
    let app = common::build_test_app(Arc::new(ScriptedProvider::new()));

    let (status, json) =
        common::post_json(app, "/api/v1/character/cancel", &serde_json::Value::Null).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_transition");
}
