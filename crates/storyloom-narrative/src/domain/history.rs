//! Append-only story history.
//!
//! The history is the canonical conversational context: the full ordered
//! sequence is replayed to the provider on every turn. Entries are never
//! removed or reordered; the only way to lose one is to replace the whole
//! log, which happens when a saved session is loaded.

use serde::{Deserialize, Serialize};

/// Who produced a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The player's action.
    User,
    /// A scene description.
    Narrator,
}

/// One entry in the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Who produced the entry.
    pub role: Role,
    /// The entry text.
    pub text: String,
}

impl HistoryEntry {
    /// A player action.
    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    /// A scene description.
    #[must_use]
    pub fn narrator(text: impl Into<String>) -> Self {
        Self {
            role: Role::Narrator,
            text: text.into(),
        }
    }
}

/// Ordered, append-only log of history entries.
///
/// Alternation of roles is a convention kept by callers; `append` accepts
/// anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: Vec<HistoryEntry>,
}

impl HistoryLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log seeded with the opening narration.
    #[must_use]
    pub fn opened_with(opening: impl Into<String>) -> Self {
        let mut log = Self::new();
        log.append(HistoryEntry::narrator(opening));
        log
    }

    /// Appends an entry. Always succeeds.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    /// Read-only view of every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the log has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_preserves_order() {
        // Arrange
        let mut log = HistoryLog::opened_with("The gate creaks open.");

        // Act
        log.append(HistoryEntry::user("Step inside"));
        log.append(HistoryEntry::narrator("Dust swirls in the hall."));

        // Assert
        let texts: Vec<&str> = log.entries().iter().map(|e| e.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["The gate creaks open.", "Step inside", "Dust swirls in the hall."]
        );
        assert_eq!(log.entries()[0].role, Role::Narrator);
        assert_eq!(log.entries()[1].role, Role::User);
    }

    #[test]
    fn test_append_does_not_enforce_alternation() {
        let mut log = HistoryLog::new();

        log.append(HistoryEntry::user("one"));
        log.append(HistoryEntry::user("two"));

        assert_eq!(log.len(), 2);
    }

    #[test]
    fn test_serializes_as_plain_array_with_lowercase_roles() {
        let log = HistoryLog::opened_with("Once upon a time.");

        let json = serde_json::to_value(&log).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{ "role": "narrator", "text": "Once upon a time." }])
        );
    }

    #[test]
    fn test_new_log_is_empty() {
        let log = HistoryLog::new();
        assert!(log.is_empty());
        assert_eq!(log.len(), 0);
    }
}
