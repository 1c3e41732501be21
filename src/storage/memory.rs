//! In-process store with no persistence.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{join_player_names, sort_newest_first, LeagueStore, StorageError};
use crate::models::{is_valid_player_name, MatchRecord, MatchSubmission, Player, StoredMatch};

#[derive(Debug, Default)]
struct Tables {
    players: Vec<Player>,
    matches: Vec<StoredMatch>,
}

impl Tables {
    fn resolve_player(&mut self, name: &str) -> Result<Player, StorageError> {
        let name = name.trim();
        if !is_valid_player_name(name) {
            return Err(StorageError::InvalidPlayerName(name.to_string()));
        }

        if let Some(existing) = self.players.iter().find(|p| p.name == name) {
            return Ok(existing.clone());
        }

        let player = Player::new(name);
        self.players.push(player.clone());
        Ok(player)
    }
}

/// [`LeagueStore`] held entirely in memory.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LeagueStore for InMemoryStore {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        let mut players = self.tables.lock().await.players.clone();
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    async fn get_or_create_player(&self, name: &str) -> Result<Player, StorageError> {
        self.tables.lock().await.resolve_player(name)
    }

    async fn create_match(
        &self,
        submission: &MatchSubmission,
    ) -> Result<StoredMatch, StorageError> {
        let mut tables = self.tables.lock().await;

        let [a1, a2, b1, b2] = submission.players();
        let stored = StoredMatch {
            id: Uuid::new_v4(),
            game_number: submission.game_number,
            match_date: submission.match_date,
            team_a_player1_id: tables.resolve_player(a1)?.id,
            team_a_player2_id: tables.resolve_player(a2)?.id,
            team_b_player1_id: tables.resolve_player(b1)?.id,
            team_b_player2_id: tables.resolve_player(b2)?.id,
            team_a_score: submission.team_a_score,
            team_b_score: submission.team_b_score,
            created_at: Utc::now(),
        };

        tables.matches.push(stored.clone());
        Ok(stored)
    }

    async fn list_matches_with_player_names(&self) -> Result<Vec<MatchRecord>, StorageError> {
        let tables = self.tables.lock().await;
        let mut matches = tables.matches.clone();
        sort_newest_first(&mut matches);
        join_player_names(&matches, &tables.players)
    }
}
