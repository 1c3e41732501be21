//! Derived statistics models.
//!
//! Neither type is stored. Both are rebuilt from the full match list every
//! time the list changes.

use serde::{Deserialize, Serialize};

/// Aggregate record for one canonical team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStats {
    /// Canonical team string
    pub name: String,

    pub played: u32,
    pub wins: u32,
    pub losses: u32,
    pub points_for: u64,
    pub points_against: u64,

    /// `points_for - points_against`
    pub points_difference: i64,
}

impl TeamStats {
    /// Create an empty accumulator for a team.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            played: 0,
            wins: 0,
            losses: 0,
            points_for: 0,
            points_against: 0,
            points_difference: 0,
        }
    }

    /// Record one result from this team's side.
    pub fn record(&mut self, own_score: u32, opponent_score: u32, won: bool) {
        self.played += 1;
        self.points_for += u64::from(own_score);
        self.points_against += u64::from(opponent_score);
        self.points_difference += i64::from(own_score) - i64::from(opponent_score);
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

/// Aggregate record for one player across every team they appeared in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub name: String,
    pub played: u32,
    pub wins: u32,
    pub losses: u32,

    /// Whole-number percentage, 0 when no games were played
    pub win_rate: u32,

    pub points_for: u64,
    pub points_against: u64,
}

impl PlayerStats {
    /// Create an empty accumulator for a player.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            played: 0,
            wins: 0,
            losses: 0,
            win_rate: 0,
            points_for: 0,
            points_against: 0,
        }
    }

    /// Record one result from this player's team's side.
    pub fn record(&mut self, own_score: u32, opponent_score: u32, won: bool) {
        self.played += 1;
        self.points_for += u64::from(own_score);
        self.points_against += u64::from(opponent_score);
        if won {
            self.wins += 1;
        } else {
            self.losses += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_stats_record() {
        let mut stats = TeamStats::new("Dan & Udi");
        stats.record(15, 13, true);
        stats.record(9, 11, false);

        assert_eq!(stats.played, 2);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.losses, 1);
        assert_eq!(stats.points_for, 24);
        assert_eq!(stats.points_against, 24);
        assert_eq!(stats.points_difference, 0);
    }

    #[test]
    fn test_max_scores_do_not_overflow() {
        let mut team = TeamStats::new("A & B");
        let mut player = PlayerStats::new("A");
        for _ in 0..3 {
            team.record(u32::MAX, 0, true);
            player.record(0, u32::MAX, false);
        }

        assert_eq!(team.points_for, 3 * u64::from(u32::MAX));
        assert_eq!(team.points_difference, 3 * i64::from(u32::MAX));
        assert_eq!(player.points_against, 3 * u64::from(u32::MAX));
    }

    #[test]
    fn test_player_stats_starts_empty() {
        let stats = PlayerStats::new("Dan");
        assert_eq!(stats.played, 0);
        assert_eq!(stats.win_rate, 0);
    }

    #[test]
    fn test_team_stats_serialization() {
        let mut stats = TeamStats::new("Nick & Tim");
        stats.record(13, 15, false);
        assert_eq!(stats.points_difference, -2);

        let json = serde_json::to_string(&stats).unwrap();
        let back: TeamStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
