//! Team canonicalization.
//!
//! A doubles team is identified by its two player names joined in ascending
//! (case-sensitive, lexicographic) order, so "Tim & Nick" and "Nick & Tim"
//! aggregate under the same key.

use crate::models::MatchRecord;

/// Separator between the two names of a team string.
pub const TEAM_DELIMITER: &str = " & ";

/// Join two player names into the canonical team string.
pub fn canonical_team(player1: &str, player2: &str) -> String {
    let (p1, p2) = (player1.trim(), player2.trim());
    if p1 <= p2 {
        format!("{p1}{TEAM_DELIMITER}{p2}")
    } else {
        format!("{p2}{TEAM_DELIMITER}{p1}")
    }
}

/// Split a team string into its trimmed player names.
pub fn split_team(team: &str) -> Vec<&str> {
    team.split(TEAM_DELIMITER).map(str::trim).collect()
}

/// Re-order an existing team string into canonical form. Idempotent.
pub fn canonicalize_team(team: &str) -> String {
    let mut names = split_team(team);
    names.sort_unstable();
    names.join(TEAM_DELIMITER)
}

/// Canonicalize both teams of a match.
pub fn canonicalize_match(record: &MatchRecord) -> MatchRecord {
    MatchRecord {
        team_a: canonicalize_team(&record.team_a),
        team_b: canonicalize_team(&record.team_b),
        ..record.clone()
    }
}

/// Canonicalize every record and order newest first.
///
/// The sort is stable, so matches on the same day keep their input order.
pub fn prepare_matches(records: &[MatchRecord]) -> Vec<MatchRecord> {
    let mut prepared: Vec<MatchRecord> = records.iter().map(canonicalize_match).collect();
    prepared.sort_by(|a, b| b.date.cmp(&a.date));
    prepared
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_canonical_team_order_insensitive() {
        assert_eq!(canonical_team("Tim", "Nick"), "Nick & Tim");
        assert_eq!(canonical_team("Nick", "Tim"), "Nick & Tim");
    }

    #[test]
    fn test_canonical_team_case_sensitive() {
        // Uppercase sorts before lowercase
        assert_eq!(canonical_team("alice", "Bob"), "Bob & alice");
    }

    #[test]
    fn test_canonicalize_team_idempotent() {
        let once = canonicalize_team("Udi & Dan");
        assert_eq!(once, "Dan & Udi");
        assert_eq!(canonicalize_team(&once), once);
    }

    #[test]
    fn test_split_team_trims() {
        assert_eq!(split_team("Ann & Bob"), vec!["Ann", "Bob"]);
        assert_eq!(split_team(" Ann  &  Bob "), vec!["Ann", "Bob"]);
    }

    #[test]
    fn test_canonicalize_match() {
        let record = MatchRecord::new(3, date(1), "Nick & Tim", "Udi & Dan", 13, 15);
        let canonical = canonicalize_match(&record);

        assert_eq!(canonical.team_a, "Nick & Tim");
        assert_eq!(canonical.team_b, "Dan & Udi");
        assert_eq!(canonical.score_b, 15);
        assert_eq!(canonical.game_number, 3);
    }

    #[test]
    fn test_prepare_matches_newest_first_stable() {
        let records = vec![
            MatchRecord::new(1, date(1), "A & B", "C & D", 11, 9),
            MatchRecord::new(1, date(8), "B & A", "D & C", 11, 5),
            MatchRecord::new(2, date(8), "A & C", "B & D", 3, 11),
        ];

        let prepared = prepare_matches(&records);

        assert_eq!(prepared[0].date, date(8));
        assert_eq!(prepared[0].team_a, "A & B");
        assert_eq!(prepared[1].game_number, 2);
        assert_eq!(prepared[2].date, date(1));
    }
}
