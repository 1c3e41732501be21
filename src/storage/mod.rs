//! Player and match persistence.
//!
//! The core only talks to storage through [`LeagueStore`]. Two
//! implementations are provided:
//! - [`JsonlStore`]: JSON Lines files in the data directory
//! - [`InMemoryStore`]: process-local, for tests and dry runs

mod jsonl;
mod memory;

pub use jsonl::*;
pub use memory::*;

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::canonical::canonical_team;
use crate::models::{MatchRecord, MatchSubmission, Player, PlayerId, StoredMatch};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid player name: {0:?}")]
    InvalidPlayerName(String),

    #[error("Match {match_id} references unknown player {player_id}")]
    UnknownPlayer {
        match_id: uuid::Uuid,
        player_id: PlayerId,
    },
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Player.filename())
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(EntityType::Match.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Durable storage of players and matches.
#[async_trait]
pub trait LeagueStore: Send + Sync {
    /// All players, sorted by name.
    async fn list_players(&self) -> Result<Vec<Player>, StorageError>;

    /// Look a player up by exact name, creating it if absent.
    ///
    /// Concurrent calls for the same name must yield a single player.
    async fn get_or_create_player(&self, name: &str) -> Result<Player, StorageError>;

    /// Resolve the four players and store the match by player id.
    async fn create_match(&self, submission: &MatchSubmission)
        -> Result<StoredMatch, StorageError>;

    /// Stored matches joined with player names, newest first.
    async fn list_matches_with_player_names(&self) -> Result<Vec<MatchRecord>, StorageError>;
}

/// Order stored matches by date, then creation, both newest first.
///
/// Rows with identical keys end up in reverse storage order.
pub(crate) fn sort_newest_first(matches: &mut [StoredMatch]) {
    matches.reverse();
    matches.sort_by(|a, b| {
        b.match_date
            .cmp(&a.match_date)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
}

/// Join stored matches with player names into canonical records.
pub(crate) fn join_player_names(
    matches: &[StoredMatch],
    players: &[Player],
) -> Result<Vec<MatchRecord>, StorageError> {
    let names: HashMap<PlayerId, &str> = players.iter().map(|p| (p.id, p.name.as_str())).collect();

    matches
        .iter()
        .map(|m| {
            let name = |player_id: PlayerId| {
                names
                    .get(&player_id)
                    .copied()
                    .ok_or(StorageError::UnknownPlayer {
                        match_id: m.id,
                        player_id,
                    })
            };

            Ok(MatchRecord {
                game_number: m.game_number,
                date: m.match_date,
                team_a: canonical_team(name(m.team_a_player1_id)?, name(m.team_a_player2_id)?),
                team_b: canonical_team(name(m.team_b_player1_id)?, name(m.team_b_player2_id)?),
                score_a: m.team_a_score,
                score_b: m.team_b_score,
            })
        })
        .collect()
}
