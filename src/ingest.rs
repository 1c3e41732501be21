//! Bulk match ingestion.
//!
//! Parses pasted tabular text into validated match submissions. One match
//! per line, fields split on tab, comma or pipe:
//!
//! ```text
//! Nick, Tim, Paul, Steve, 11, 9, 1, 2024-01-15
//! ```
//!
//! Parsing is all-or-nothing: the first bad line aborts the batch. Committing
//! a parsed batch is a separate step and is *not* atomic, see [`commit_batch`].

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::{is_valid_player_name, MatchError, MatchSubmission, StoredMatch};
use crate::storage::{LeagueStore, StorageError};

/// Minimum number of columns on a line; the date column is optional.
const MIN_COLUMNS: usize = 7;

/// Why a single line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error(
        "Expected at least 7 columns (Team A Player 1, Team A Player 2, Team B Player 1, \
         Team B Player 2, Team A Score, Team B Score, Game #). Got {0}"
    )]
    TooFewColumns(usize),

    #[error("Invalid scores ({0}, {1})")]
    InvalidScores(String, String),

    #[error("Invalid game number ({0})")]
    InvalidGameNumber(String),

    #[error("Scores cannot be equal (no ties allowed)")]
    Tie,

    #[error("Scores must be positive")]
    NegativeScore,

    #[error("All four players must be unique")]
    DuplicatePlayers,

    #[error("Invalid date ({0}), expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Game number must be positive")]
    GameNumberNotPositive,

    #[error("Invalid player name ({0})")]
    InvalidPlayerName(String),
}

/// Bulk parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("No data provided")]
    Empty,

    /// `line` is 1-based and counts only non-blank lines.
    #[error("Line {line}: {reason}")]
    Line { line: usize, reason: LineError },
}

impl ParseError {
    /// Line number of the offending line, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Empty => None,
            ParseError::Line { line, .. } => Some(*line),
        }
    }
}

/// Parse bulk text, defaulting missing dates to today's UTC date.
pub fn parse_bulk_text(input: &str) -> Result<Vec<MatchSubmission>, ParseError> {
    parse_bulk_text_on(input, Utc::now().date_naive())
}

/// Parse bulk text, defaulting missing dates to `today`.
pub fn parse_bulk_text_on(
    input: &str,
    today: NaiveDate,
) -> Result<Vec<MatchSubmission>, ParseError> {
    let lines: Vec<&str> = input
        .trim()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    if lines.is_empty() {
        return Err(ParseError::Empty);
    }

    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            parse_line(line, today).map_err(|reason| ParseError::Line {
                line: i + 1,
                reason,
            })
        })
        .collect()
}

/// Split a line on any of tab, comma or pipe, dropping empty fields.
fn tokenize(line: &str) -> Vec<&str> {
    line.split(['\t', ',', '|'])
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}

fn parse_line(line: &str, today: NaiveDate) -> Result<MatchSubmission, LineError> {
    let tokens = tokenize(line);
    if tokens.len() < MIN_COLUMNS {
        return Err(LineError::TooFewColumns(tokens.len()));
    }

    let (players, score_a, score_b, game) =
        ([tokens[0], tokens[1], tokens[2], tokens[3]], tokens[4], tokens[5], tokens[6]);

    let (Ok(team_a_score), Ok(team_b_score)) = (score_a.parse::<i64>(), score_b.parse::<i64>())
    else {
        return Err(LineError::InvalidScores(
            score_a.to_string(),
            score_b.to_string(),
        ));
    };

    let game_number = game
        .parse::<i64>()
        .map_err(|_| LineError::InvalidGameNumber(game.to_string()))?;

    if team_a_score == team_b_score {
        return Err(LineError::Tie);
    }

    if team_a_score < 0 || team_b_score < 0 {
        return Err(LineError::NegativeScore);
    }

    for (i, name) in players.iter().enumerate() {
        if players[i + 1..].contains(name) {
            return Err(LineError::DuplicatePlayers);
        }
    }

    let match_date = match tokens.get(MIN_COLUMNS) {
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| LineError::InvalidDate(raw.to_string()))?,
        None => today,
    };

    let game_number = u32::try_from(game_number)
        .ok()
        .filter(|g| *g > 0)
        .ok_or(LineError::GameNumberNotPositive)?;

    if let Some(bad) = players.iter().find(|p| !is_valid_player_name(p)) {
        return Err(LineError::InvalidPlayerName(bad.to_string()));
    }

    let to_score = |score: i64| {
        u32::try_from(score)
            .map_err(|_| LineError::InvalidScores(score_a.to_string(), score_b.to_string()))
    };

    Ok(MatchSubmission {
        team_a_player1: players[0].to_string(),
        team_a_player2: players[1].to_string(),
        team_b_player1: players[2].to_string(),
        team_b_player2: players[3].to_string(),
        team_a_score: to_score(team_a_score)?,
        team_b_score: to_score(team_b_score)?,
        game_number,
        match_date,
    })
}

/// One row of a bulk preview table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreviewRow {
    pub team_a: String,
    pub team_b: String,
    pub score: String,
    pub game_number: u32,
    pub match_date: NaiveDate,
}

impl From<&MatchSubmission> for PreviewRow {
    fn from(m: &MatchSubmission) -> Self {
        Self {
            team_a: format!("{} & {}", m.team_a_player1, m.team_a_player2),
            team_b: format!("{} & {}", m.team_b_player1, m.team_b_player2),
            score: format!("{} - {}", m.team_a_score, m.team_b_score),
            game_number: m.game_number,
            match_date: m.match_date,
        }
    }
}

/// Parsed batch ready for review. Nothing has been written.
#[derive(Debug, Clone, Serialize)]
pub struct BulkPreview {
    pub matches: Vec<MatchSubmission>,
    pub rows: Vec<PreviewRow>,
}

impl BulkPreview {
    /// "Upload 3 Matches" style summary.
    pub fn summary(&self) -> String {
        let n = self.matches.len();
        format!("{} match{}", n, if n == 1 { "" } else { "es" })
    }
}

/// Parse bulk text for display without committing anything.
pub fn preview_bulk(input: &str) -> Result<BulkPreview, ParseError> {
    let matches = parse_bulk_text(input)?;
    let rows = matches.iter().map(PreviewRow::from).collect();
    Ok(BulkPreview { matches, rows })
}

/// A bulk commit stopped partway through.
///
/// Matches before `failed_at` are stored and stay stored.
#[derive(Debug, Error)]
#[error("Bulk upload failed at match {} after {committed} committed: {source}", .failed_at + 1)]
pub struct BatchCommitError {
    /// Matches written before the failure
    pub committed: usize,

    /// 0-based index of the match that failed
    pub failed_at: usize,

    #[source]
    pub source: StorageError,
}

/// Write a parsed batch one match at a time, stopping at the first failure.
pub async fn commit_batch(
    store: &dyn LeagueStore,
    matches: &[MatchSubmission],
) -> Result<Vec<StoredMatch>, BatchCommitError> {
    let mut stored = Vec::with_capacity(matches.len());

    for (i, submission) in matches.iter().enumerate() {
        match store.create_match(submission).await {
            Ok(row) => stored.push(row),
            Err(source) => {
                warn!(
                    "Bulk upload stopped at match {}/{}: {}",
                    i + 1,
                    matches.len(),
                    source
                );
                return Err(BatchCommitError {
                    committed: stored.len(),
                    failed_at: i,
                    source,
                });
            }
        }
    }

    info!("Committed {} matches", stored.len());
    Ok(stored)
}

/// Single-entry add failure.
#[derive(Debug, Error)]
pub enum AddMatchError {
    #[error(transparent)]
    Invalid(#[from] MatchError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Validate one hand-entered match and store it.
pub async fn add_match(
    store: &dyn LeagueStore,
    submission: &MatchSubmission,
) -> Result<StoredMatch, AddMatchError> {
    submission.validate()?;
    let stored = store.create_match(submission).await?;
    info!(
        "Added match {} vs {} on {}",
        submission.team_a(),
        submission.team_b(),
        submission.match_date
    );
    Ok(stored)
}
