//! JSONL (JSON Lines) storage.
//!
//! Players and matches live in two append-only files under the data
//! directory, one JSON object per line.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{
    join_player_names, sort_newest_first, LeagueStore, StorageConfig, StorageError,
};
use crate::models::{is_valid_player_name, MatchRecord, MatchSubmission, Player, StoredMatch};

/// Entity types for JSONL storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityType {
    Player,
    Match,
}

impl EntityType {
    /// Get the filename for this entity type.
    pub fn filename(&self) -> &'static str {
        match self {
            EntityType::Player => "players.jsonl",
            EntityType::Match => "matches.jsonl",
        }
    }
}

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append a single entity to the file.
    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entity to {:?}", self.path);
        Ok(())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all entities from the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// File-backed [`LeagueStore`].
///
/// A single mutex serializes every read-modify-append cycle, so a name is
/// never inserted twice even under concurrent submissions.
pub struct JsonlStore {
    config: StorageConfig,
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    fn players(&self) -> JsonlReader<Player> {
        JsonlReader::new(self.config.players_path())
    }

    fn matches(&self) -> JsonlReader<StoredMatch> {
        JsonlReader::new(self.config.matches_path())
    }

    /// Lookup-or-insert against an already loaded player list.
    ///
    /// Caller must hold `self.lock`. New players are appended to the file
    /// and pushed onto `known`.
    fn resolve_player(&self, known: &mut Vec<Player>, name: &str) -> Result<Player, StorageError> {
        let name = name.trim();
        if !is_valid_player_name(name) {
            return Err(StorageError::InvalidPlayerName(name.to_string()));
        }

        if let Some(existing) = known.iter().find(|p| p.name == name) {
            return Ok(existing.clone());
        }

        let player = Player::new(name);
        JsonlWriter::new(self.config.players_path()).append(&player)?;
        info!(player = %player.name, id = %player.id, "Created player");
        known.push(player.clone());
        Ok(player)
    }
}

#[async_trait]
impl LeagueStore for JsonlStore {
    async fn list_players(&self) -> Result<Vec<Player>, StorageError> {
        let _guard = self.lock.lock().await;
        let mut players = self.players().read_all()?;
        players.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(players)
    }

    async fn get_or_create_player(&self, name: &str) -> Result<Player, StorageError> {
        let _guard = self.lock.lock().await;
        let mut known = self.players().read_all()?;
        self.resolve_player(&mut known, name)
    }

    async fn create_match(
        &self,
        submission: &MatchSubmission,
    ) -> Result<StoredMatch, StorageError> {
        let _guard = self.lock.lock().await;
        let mut known = self.players().read_all()?;

        let [a1, a2, b1, b2] = submission.players();
        let stored = StoredMatch {
            id: Uuid::new_v4(),
            game_number: submission.game_number,
            match_date: submission.match_date,
            team_a_player1_id: self.resolve_player(&mut known, a1)?.id,
            team_a_player2_id: self.resolve_player(&mut known, a2)?.id,
            team_b_player1_id: self.resolve_player(&mut known, b1)?.id,
            team_b_player2_id: self.resolve_player(&mut known, b2)?.id,
            team_a_score: submission.team_a_score,
            team_b_score: submission.team_b_score,
            created_at: Utc::now(),
        };

        JsonlWriter::new(self.config.matches_path()).append(&stored)?;
        debug!(id = %stored.id, date = %stored.match_date, "Stored match");
        Ok(stored)
    }

    async fn list_matches_with_player_names(&self) -> Result<Vec<MatchRecord>, StorageError> {
        let _guard = self.lock.lock().await;
        let players = self.players().read_all()?;
        let mut matches = self.matches().read_all()?;
        sort_newest_first(&mut matches);
        join_player_names(&matches, &players)
    }
}
