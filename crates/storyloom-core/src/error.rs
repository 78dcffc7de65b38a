//! Domain error types.

use thiserror::Error;

use crate::provider::ProviderError;

/// Top-level domain error type.
///
/// Every remote and storage failure is caught at the orchestration boundary
/// and translated into one of these variants; none of them are fatal to the
/// process.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provider rejected the request for rate or billing reasons.
    /// Requires out-of-band remediation rather than a retry.
    #[error("provider quota exceeded: {0}")]
    ProviderQuota(String),

    /// Any other provider failure (network, malformed output, validation).
    #[error("provider error: {0}")]
    Provider(String),

    /// The key-value store rejected a write.
    #[error("storage error: {0}")]
    Storage(String),

    /// The saved session could not be deserialized.
    #[error("corrupt saved session: {0}")]
    CorruptData(String),

    /// There is no saved session.
    #[error("no saved session found")]
    NotFound,

    /// A turn is already in flight.
    #[error("a turn is already in progress")]
    TurnInFlight,

    /// The intent is not allowed from the current status.
    #[error("cannot {intent} while {status}")]
    InvalidTransition {
        /// The refused intent.
        intent: &'static str,
        /// The status the session was in.
        status: &'static str,
    },

    /// The current scene is an ending; no further actions are accepted.
    #[error("the story has ended")]
    SceneEnded,

    /// A validation error in domain logic.
    #[error("validation error: {0}")]
    Validation(String),

    /// An infrastructure error (poisoned lock, misconfiguration).
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

impl DomainError {
    /// Returns the message shown to the player.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::ProviderQuota(_) => {
                "The storyteller's quota is exhausted. Check your API key or billing, then start again."
                    .to_owned()
            }
            Self::Provider(_) => "The storyteller stumbled. Please try again.".to_owned(),
            Self::Storage(_) => "The adventure could not be saved.".to_owned(),
            Self::CorruptData(_) => {
                "The saved adventure was unreadable and has been discarded.".to_owned()
            }
            Self::NotFound => "There is no saved adventure to load.".to_owned(),
            Self::TurnInFlight => "Hold on, the story is still being written.".to_owned(),
            Self::SceneEnded => "This story has ended. Start a new one.".to_owned(),
            Self::InvalidTransition { .. } | Self::Validation(_) | Self::Infrastructure(_) => {
                self.to_string()
            }
        }
    }

    /// Returns `true` for the quota/authorization class of provider failures.
    #[must_use]
    pub fn is_quota(&self) -> bool {
        matches!(self, Self::ProviderQuota(_))
    }
}

impl From<ProviderError> for DomainError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Quota(msg) => Self::ProviderQuota(msg),
            ProviderError::Transport(msg) => Self::Provider(msg),
            ProviderError::Schema(msg) => Self::Provider(format!("invalid response: {msg}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_provider_error_maps_to_provider_quota() {
        let err = DomainError::from(ProviderError::Quota("429".into()));
        assert!(err.is_quota());
    }

    #[test]
    fn test_schema_provider_error_maps_to_retryable_provider_error() {
        let err = DomainError::from(ProviderError::Schema("missing field `choices`".into()));
        match err {
            DomainError::Provider(msg) => assert!(msg.contains("choices")),
            other => panic!("expected Provider, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_transition_message_names_intent_and_status() {
        let err = DomainError::InvalidTransition {
            intent: "submit an action",
            status: "idle",
        };
        assert_eq!(err.user_message(), "cannot submit an action while idle");
    }
}
