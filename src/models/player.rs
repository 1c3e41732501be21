//! Player identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Type alias for player IDs.
pub type PlayerId = Uuid;

/// Characters that split bulk input fields or the names in a team string.
const RESERVED_CHARS: &[char] = &['&', ',', '\t', '|', '\n', '\r'];

/// A persisted player. Identity is the exact name string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Create a new Player with a fresh ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }
}

/// Whether `name` can be stored without colliding with team or bulk delimiters.
pub fn is_valid_player_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains(RESERVED_CHARS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_creation() {
        let a = Player::new("Alice");
        let b = Player::new("Alice");
        assert_eq!(a.name, "Alice");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_valid_names() {
        assert!(is_valid_player_name("Alice"));
        assert!(is_valid_player_name("Mary-Jane O'Neil"));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!is_valid_player_name(""));
        assert!(!is_valid_player_name("   "));
        assert!(!is_valid_player_name("Ann & Bob"));
        assert!(!is_valid_player_name("Ann&Bob"));
        assert!(!is_valid_player_name("Smith, J"));
        assert!(!is_valid_player_name("a|b"));
        assert!(!is_valid_player_name("a\tb"));
    }
}
