//! Match models: results as entered, as stored, and as aggregated.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::{is_valid_player_name, PlayerId};
use crate::canonical::canonical_team;

/// Type alias for stored match IDs.
pub type MatchId = Uuid;

/// One played match with canonical team strings.
///
/// This is the input of the aggregation engine. Team strings are the two
/// player names joined by `" & "` in ascending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Court/game identifier, scoped per day
    pub game_number: u32,

    /// Day the match was played
    pub date: NaiveDate,

    /// Canonical team A
    pub team_a: String,

    /// Canonical team B
    pub team_b: String,

    pub score_a: u32,
    pub score_b: u32,
}

impl MatchRecord {
    pub fn new(
        game_number: u32,
        date: NaiveDate,
        team_a: impl Into<String>,
        team_b: impl Into<String>,
        score_a: u32,
        score_b: u32,
    ) -> Self {
        Self {
            game_number,
            date,
            team_a: team_a.into(),
            team_b: team_b.into(),
            score_a,
            score_b,
        }
    }

    /// Whether team A won. Ties are invalid input and count as a B win.
    pub fn team_a_won(&self) -> bool {
        self.score_a > self.score_b
    }
}

/// Validation failures for a single-entry match.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("All fields are required")]
    MissingField,

    #[error("Each player can only be selected once")]
    DuplicatePlayer,

    #[error("A match cannot end in a tie")]
    Tie,

    #[error("A team cannot play against itself")]
    SameTeam,

    #[error("Invalid player name: {0:?}")]
    InvalidPlayerName(String),
}

/// A match as submitted, before canonicalization.
///
/// Produced by the bulk parser or the single-entry form and consumed by
/// [`crate::storage::LeagueStore::create_match`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSubmission {
    pub team_a_player1: String,
    pub team_a_player2: String,
    pub team_b_player1: String,
    pub team_b_player2: String,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub game_number: u32,
    pub match_date: NaiveDate,
}

impl MatchSubmission {
    /// The four player names in positional order.
    pub fn players(&self) -> [&str; 4] {
        [
            &self.team_a_player1,
            &self.team_a_player2,
            &self.team_b_player1,
            &self.team_b_player2,
        ]
    }

    /// Canonical team A string.
    pub fn team_a(&self) -> String {
        canonical_team(&self.team_a_player1, &self.team_a_player2)
    }

    /// Canonical team B string.
    pub fn team_b(&self) -> String {
        canonical_team(&self.team_b_player1, &self.team_b_player2)
    }

    /// Check the single-entry invariants before anything is persisted.
    pub fn validate(&self) -> Result<(), MatchError> {
        let players = self.players();

        if players.iter().any(|p| p.trim().is_empty()) {
            return Err(MatchError::MissingField);
        }

        // Compare names as they will be stored
        let trimmed = players.map(str::trim);
        for (i, name) in trimmed.iter().enumerate() {
            if trimmed[i + 1..].contains(name) {
                return Err(MatchError::DuplicatePlayer);
            }
        }

        if self.team_a_score == self.team_b_score {
            return Err(MatchError::Tie);
        }

        if self.team_a() == self.team_b() {
            return Err(MatchError::SameTeam);
        }

        if let Some(bad) = players.iter().find(|p| !is_valid_player_name(p)) {
            return Err(MatchError::InvalidPlayerName(bad.to_string()));
        }

        Ok(())
    }

    /// Assemble the canonical record for aggregation.
    pub fn to_record(&self) -> MatchRecord {
        MatchRecord {
            game_number: self.game_number,
            date: self.match_date,
            team_a: self.team_a(),
            team_b: self.team_b(),
            score_a: self.team_a_score,
            score_b: self.team_b_score,
        }
    }
}

/// A persisted match row. Players are referenced by id, not by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredMatch {
    pub id: MatchId,
    pub game_number: u32,
    pub match_date: NaiveDate,
    pub team_a_player1_id: PlayerId,
    pub team_a_player2_id: PlayerId,
    pub team_b_player1_id: PlayerId,
    pub team_b_player2_id: PlayerId,
    pub team_a_score: u32,
    pub team_b_score: u32,
    pub created_at: DateTime<Utc>,
}
