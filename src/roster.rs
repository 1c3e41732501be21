//! League setup from a pasted roster.
//!
//! A roster is a comma-separated list of players and teams:
//!
//! ```text
//! Nick & Tim, Paul & Steve, Dan, Udi
//! ```

use thiserror::Error;
use tracing::info;

use crate::models::Player;
use crate::storage::{LeagueStore, StorageError};

/// Smallest roster that can field two teams.
pub const MIN_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Please enter at least one player or team")]
    Empty,

    #[error("Invalid team format: {0:?}")]
    InvalidTeam(String),

    #[error("You need at least 4 unique players to form two teams")]
    TooFewPlayers(usize),
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Parse a roster into unique player names, sorted ascending.
///
/// Entries containing `&` are teams and must name exactly two players.
pub fn parse_roster(text: &str) -> Result<Vec<String>, RosterError> {
    let entries: Vec<&str> = text
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .collect();

    if entries.is_empty() {
        return Err(RosterError::Empty);
    }

    let mut names: Vec<String> = Vec::new();
    for entry in entries {
        if entry.contains('&') {
            let members: Vec<&str> = entry
                .split('&')
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .collect();
            if members.len() != 2 {
                return Err(RosterError::InvalidTeam(entry.to_string()));
            }
            names.extend(members.into_iter().map(String::from));
        } else {
            names.push(entry.to_string());
        }
    }

    names.sort();
    names.dedup();

    if names.len() < MIN_PLAYERS {
        return Err(RosterError::TooFewPlayers(names.len()));
    }

    Ok(names)
}

/// Parse the roster and make sure every player exists in the store.
pub async fn setup_league(store: &dyn LeagueStore, text: &str) -> Result<Vec<Player>, SetupError> {
    let names = parse_roster(text)?;

    let mut players = Vec::with_capacity(names.len());
    for name in &names {
        players.push(store.get_or_create_player(name).await?);
    }

    info!("League set up with {} players", players.len());
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryStore;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_players_and_teams() {
        let names = parse_roster("Nick & Tim, Paul&Steve, Dan , Udi,,").unwrap();
        assert_eq!(names, vec!["Dan", "Nick", "Paul", "Steve", "Tim", "Udi"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        let names = parse_roster("Ann & Bob, Ann & Cat, Bob, Dan").unwrap();
        assert_eq!(names, vec!["Ann", "Bob", "Cat", "Dan"]);
    }

    #[test]
    fn test_empty_roster() {
        assert_eq!(parse_roster(" , ,"), Err(RosterError::Empty));
        assert_eq!(parse_roster(""), Err(RosterError::Empty));
    }

    #[test]
    fn test_invalid_team_format() {
        assert_eq!(
            parse_roster("Ann & Bob & Cat, Dan"),
            Err(RosterError::InvalidTeam("Ann & Bob & Cat".to_string()))
        );
        assert_eq!(
            parse_roster("Ann &, Bob, Cat, Dan"),
            Err(RosterError::InvalidTeam("Ann &".to_string()))
        );
    }

    #[test]
    fn test_too_few_players() {
        assert_eq!(
            parse_roster("Ann & Bob, Ann"),
            Err(RosterError::TooFewPlayers(2))
        );
    }

    #[tokio::test]
    async fn test_setup_league_creates_players_once() {
        let store = InMemoryStore::new();
        store.get_or_create_player("Ann").await.unwrap();

        let players = setup_league(&store, "Ann & Bob, Cat & Dan").await.unwrap();

        assert_eq!(players.len(), 4);
        assert_eq!(store.list_players().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_setup_league_rejects_bad_roster() {
        let store = InMemoryStore::new();
        let err = setup_league(&store, "Ann, Bob").await.unwrap_err();

        assert!(matches!(err, SetupError::Roster(RosterError::TooFewPlayers(2))));
        assert!(store.list_players().await.unwrap().is_empty());
    }
}
