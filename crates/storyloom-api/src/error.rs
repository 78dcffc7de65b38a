//! Storyloom API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use storyloom_core::error::DomainError;
use storyloom_core::provider::ProviderError;
use thiserror::Error;
use tracing::warn;

use crate::config::ConfigError;

/// Startup errors for the API server.
#[derive(Debug, Error)]
pub enum AppError {
    /// A required environment variable is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The content provider could not be constructed.
    #[error("provider setup error: {0}")]
    Provider(#[from] ProviderError),

    /// Network binding or I/O error.
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}

/// JSON body returned for error responses.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub error: &'static str,
    /// Player-facing error message.
    pub message: String,
}

/// HTTP-layer wrapper around `DomainError` that implements `IntoResponse`.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = match &self.0 {
            DomainError::ProviderQuota(_) => (StatusCode::PAYMENT_REQUIRED, "provider_quota"),
            DomainError::Provider(_) => (StatusCode::BAD_GATEWAY, "provider_error"),
            DomainError::Storage(_) => (StatusCode::INSUFFICIENT_STORAGE, "storage_error"),
            DomainError::CorruptData(_) => (StatusCode::INTERNAL_SERVER_ERROR, "corrupt_data"),
            DomainError::NotFound => (StatusCode::NOT_FOUND, "not_found"),
            DomainError::TurnInFlight => (StatusCode::CONFLICT, "turn_in_flight"),
            DomainError::InvalidTransition { .. } => (StatusCode::CONFLICT, "invalid_transition"),
            DomainError::SceneEnded => (StatusCode::CONFLICT, "scene_ended"),
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "validation_error"),
            DomainError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "infrastructure_error")
            }
        };

        if status.is_server_error() {
            warn!(error = %self.0, code = error_code, "request failed");
        }

        let body = ErrorBody {
            error: error_code,
            message: self.0.user_message(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use http_body_util::BodyExt;

    fn status_of(err: DomainError) -> StatusCode {
        let response = ApiError(err).into_response();
        response.status()
    }

    #[test]
    fn test_provider_quota_maps_to_402() {
        assert_eq!(
            status_of(DomainError::ProviderQuota("429".into())),
            StatusCode::PAYMENT_REQUIRED
        );
    }

    #[test]
    fn test_provider_error_maps_to_502() {
        assert_eq!(
            status_of(DomainError::Provider("connection reset".into())),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_storage_maps_to_507() {
        assert_eq!(
            status_of(DomainError::Storage("quota".into())),
            StatusCode::INSUFFICIENT_STORAGE
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(status_of(DomainError::NotFound), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_refused_intents_map_to_409() {
        for err in [
            DomainError::TurnInFlight,
            DomainError::SceneEnded,
            DomainError::InvalidTransition {
                intent: "start",
                status: "playing",
            },
        ] {
            assert_eq!(status_of(err), StatusCode::CONFLICT);
        }
    }

    #[test]
    fn test_validation_maps_to_400() {
        assert_eq!(
            status_of(DomainError::Validation("bad input".into())),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_corrupt_data_and_infrastructure_map_to_500() {
        assert_eq!(
            status_of(DomainError::CorruptData("eof".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(DomainError::Infrastructure("lock poisoned".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_carries_code_and_player_message() {
        // Arrange
        let err = DomainError::ProviderQuota("HTTP 429 RESOURCE_EXHAUSTED".into());
        let expected_message = err.user_message();

        // Act
        let response = ApiError(err).into_response();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        // Assert
        assert_eq!(json["error"], "provider_quota");
        assert_eq!(json["message"], expected_message);
        assert!(!json["message"].as_str().unwrap().contains("RESOURCE_EXHAUSTED"));
    }
}
