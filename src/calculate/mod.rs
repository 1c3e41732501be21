//! Aggregation engine.
//!
//! Turns a list of canonical match records into:
//! - Ranked team standings (wins, then point difference, then points for)
//! - Per-player statistics across every partner a player had
//! - Exact per-player match history
//!
//! Everything here is a pure function of its input. Results are rebuilt in
//! full on every call and never patched incrementally.

pub mod history;

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::canonical::{prepare_matches, split_team};
use crate::models::{MatchRecord, PlayerStats, TeamStats};

pub use history::{group_by_week, search_matches, WeekGroup};

/// Calculate win rate as a whole-number percentage, rounding half up.
pub fn calculate_win_rate(wins: u32, played: u32) -> u32 {
    if played == 0 {
        return 0;
    }
    let (wins, played) = (u64::from(wins), u64::from(played));
    ((200 * wins + played) / (2 * played)) as u32
}

/// Standings order: wins, then point difference, then points for, all descending.
fn standings_order(a: &TeamStats, b: &TeamStats) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.points_difference.cmp(&a.points_difference))
        .then_with(|| b.points_for.cmp(&a.points_for))
}

/// Position of the team's accumulator, created on first sight.
fn team_slot<'a>(
    index: &mut HashMap<&'a str, usize>,
    teams: &mut Vec<TeamStats>,
    name: &'a str,
) -> usize {
    *index.entry(name).or_insert_with(|| {
        teams.push(TeamStats::new(name));
        teams.len() - 1
    })
}

/// Compute the ranked league table.
///
/// Teams that tie on every key keep the order in which they first appear in
/// `matches`.
pub fn compute_standings(matches: &[MatchRecord]) -> Vec<TeamStats> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut teams: Vec<TeamStats> = Vec::new();

    for m in matches {
        let a = team_slot(&mut index, &mut teams, &m.team_a);
        let b = team_slot(&mut index, &mut teams, &m.team_b);
        let a_won = m.team_a_won();

        teams[a].record(m.score_a, m.score_b, a_won);
        teams[b].record(m.score_b, m.score_a, !a_won);
    }

    teams.sort_by(standings_order);
    teams
}

/// Compute statistics for every individual player, keyed by name.
pub fn compute_player_stats(matches: &[MatchRecord]) -> BTreeMap<String, PlayerStats> {
    let mut players: BTreeMap<String, PlayerStats> = BTreeMap::new();

    for m in matches {
        let a_won = m.team_a_won();
        let sides = [
            (&m.team_a, m.score_a, m.score_b, a_won),
            (&m.team_b, m.score_b, m.score_a, !a_won),
        ];

        for (team, own, opponent, won) in sides {
            for name in split_team(team) {
                players
                    .entry(name.to_string())
                    .or_insert_with(|| PlayerStats::new(name))
                    .record(own, opponent, won);
            }
        }
    }

    for stats in players.values_mut() {
        stats.win_rate = calculate_win_rate(stats.wins, stats.played);
    }

    players
}

/// Whether `player` is one of the names in `team`. Exact comparison only.
pub fn team_has_player(team: &str, player: &str) -> bool {
    split_team(team).contains(&player.trim())
}

/// Every match the player took part in, in input order.
pub fn player_match_history(player: &str, matches: &[MatchRecord]) -> Vec<MatchRecord> {
    matches
        .iter()
        .filter(|m| team_has_player(&m.team_a, player) || team_has_player(&m.team_b, player))
        .cloned()
        .collect()
}

/// Everything the dashboard shows, built from one match list.
#[derive(Debug, Clone, Serialize)]
pub struct LeagueSummary {
    /// Canonical matches, newest first
    pub matches: Vec<MatchRecord>,
    pub standings: Vec<TeamStats>,
    pub player_stats: BTreeMap<String, PlayerStats>,
}

impl LeagueSummary {
    /// Canonicalize, order and aggregate a raw match list.
    pub fn from_matches(records: &[MatchRecord]) -> Self {
        let matches = prepare_matches(records);
        let standings = compute_standings(&matches);
        let player_stats = compute_player_stats(&matches);

        Self {
            matches,
            standings,
            player_stats,
        }
    }

    /// Stats and history for one player, if they have played.
    pub fn player_profile(&self, player: &str) -> Option<(&PlayerStats, Vec<MatchRecord>)> {
        let stats = self.player_stats.get(player)?;
        Some((stats, player_match_history(player, &self.matches)))
    }
}
