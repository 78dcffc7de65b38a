//! Command abstractions.
//!
//! Every user intent that reaches the session (start a story, submit an
//! action, author a character, save, load) is expressed as a command struct
//! carrying a correlation ID, so a single intent can be followed through the
//! orchestrator and the provider calls it triggers.

use uuid::Uuid;

/// Trait that all intent commands implement.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// The type name for this command (for logging/routing).
    fn command_type(&self) -> &'static str;

    /// Correlation ID to trace this command through the system.
    fn correlation_id(&self) -> Uuid;
}

/// Implements [`Command`] for a struct with a `correlation_id: Uuid` field.
///
/// ```ignore
/// impl_command!(StartSession, "session.start");
/// ```
#[macro_export]
macro_rules! impl_command {
    ($ty:ty, $name:literal) => {
        impl $crate::command::Command for $ty {
            fn command_type(&self) -> &'static str {
                $name
            }

            fn correlation_id(&self) -> ::uuid::Uuid {
                self.correlation_id
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping {
        correlation_id: Uuid,
    }

    crate::impl_command!(Ping, "test.ping");

    #[test]
    fn test_impl_command_exposes_type_and_correlation_id() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let ping = Ping { correlation_id };

        // Act / Assert
        assert_eq!(ping.command_type(), "test.ping");
        assert_eq!(ping.correlation_id(), correlation_id);
    }
}
