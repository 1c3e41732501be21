//! Match list helpers: free-text search and weekly grouping.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::MatchRecord;

/// Matches from one week, starting on Sunday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekGroup {
    pub week_start: NaiveDate,
    pub label: String,
    pub matches: Vec<MatchRecord>,
}

/// Case-insensitive substring search over both team strings.
///
/// This is a loose UI filter; use [`super::player_match_history`] for exact
/// per-player lookups.
pub fn search_matches(matches: &[MatchRecord], term: &str) -> Vec<MatchRecord> {
    let needle = term.to_lowercase();
    matches
        .iter()
        .filter(|m| {
            m.team_a.to_lowercase().contains(&needle) || m.team_b.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday();
    date - Duration::days(i64::from(offset))
}

/// Label shown above a week's matches, e.g. "Week of January 14".
pub fn week_label(week_start: NaiveDate) -> String {
    format!("Week of {}", week_start.format("%B %-d"))
}

/// Group matches by week, keeping weeks in order of first appearance.
pub fn group_by_week(matches: &[MatchRecord]) -> Vec<WeekGroup> {
    let mut groups: Vec<WeekGroup> = Vec::new();

    for m in matches {
        let start = week_start(m.date);
        match groups.iter_mut().find(|g| g.week_start == start) {
            Some(group) => group.matches.push(m.clone()),
            None => groups.push(WeekGroup {
                week_start: start,
                label: week_label(start),
                matches: vec![m.clone()],
            }),
        }
    }

    groups
}
