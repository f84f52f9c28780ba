//! Win/loss accumulator shared by every aggregation.

use serde::{Deserialize, Serialize};

use crate::config::StatsConfig;
use crate::data::{MatchOutcome, MatchRecord, MatchSide};

/// Ratio of `won` to `played`, or `None` when nothing was played.
pub fn win_rate(won: u32, played: u32) -> Option<f64> {
    if played == 0 {
        None
    } else {
        Some(f64::from(won) / f64::from(played))
    }
}

/// Running totals of games and matches for one grouping key.
///
/// Drawn games count as played but never as won. A drawn match (equal game
/// wins) likewise counts toward `matches_played` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinRecord {
    pub games_won: u32,
    pub games_played: u32,
    pub matches_won: u32,
    pub matches_played: u32,
}

impl WinRecord {
    /// Fold one side of a match into the totals. Totals saturate at `u32::MAX`.
    pub fn add_side(&mut self, side: &MatchSide<'_>) {
        self.games_won = self.games_won.saturating_add(side.games_won);
        self.games_played = self.games_played.saturating_add(side.games_played());
        self.matches_played = self.matches_played.saturating_add(1);
        if side.outcome() == MatchOutcome::Win {
            self.matches_won = self.matches_won.saturating_add(1);
        }
    }

    pub fn game_win_rate(&self) -> Option<f64> {
        win_rate(self.games_won, self.games_played)
    }

    pub fn match_win_rate(&self) -> Option<f64> {
        win_rate(self.matches_won, self.matches_played)
    }
}

/// Both sides of a match if it was actually contested.
///
/// Matches with a missing player, a player facing themselves, or a bye are
/// not contested and yield `None`.
pub fn contested_sides<'a>(record: &'a MatchRecord, config: &StatsConfig) -> Option<[MatchSide<'a>; 2]> {
    let sides = record.sides()?;
    let (player, opponent) = (sides[0].player, sides[0].opponent);
    if player == opponent || config.is_bye(player) || config.is_bye(opponent) {
        return None;
    }
    Some(sides)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(p1: &str, p2: &str, w1: u32, w2: u32, draws: u32) -> MatchRecord {
        MatchRecord {
            season_id: Some("S1".to_string()),
            draft_id: Some("d1".to_string()),
            match_id: None,
            round: None,
            player1: Some(p1.to_string()),
            player2: Some(p2.to_string()),
            player1_wins: w1,
            player2_wins: w2,
            draws,
        }
    }

    #[test]
    fn test_win_rate_zero_denominator() {
        assert_eq!(win_rate(0, 0), None);
        assert_eq!(win_rate(1, 4), Some(0.25));
    }

    #[test]
    fn test_add_side_counts_draws_as_played() {
        let m = record("Alice", "Bob", 1, 1, 1);
        let [alice, bob] = m.sides().unwrap();
        let mut a = WinRecord::default();
        let mut b = WinRecord::default();
        a.add_side(&alice);
        b.add_side(&bob);

        assert_eq!(a.games_won, 1);
        assert_eq!(a.games_played, 3);
        assert_eq!(a.matches_won, 0);
        assert_eq!(a.matches_played, 1);
        assert_eq!(b.matches_won, 0);
        assert_eq!(a.match_win_rate(), Some(0.0));
    }

    #[test]
    fn test_empty_record_has_no_rates() {
        let r = WinRecord::default();
        assert_eq!(r.game_win_rate(), None);
        assert_eq!(r.match_win_rate(), None);
    }

    #[test]
    fn test_totals_saturate_instead_of_overflowing() {
        let big = record("Alice", "Bob", u32::MAX - 1, u32::MAX - 1, 5);
        let sides = big.sides().unwrap();
        assert_eq!(sides[0].games_played(), u32::MAX);

        let mut totals = WinRecord::default();
        totals.add_side(&sides[0]);
        totals.add_side(&sides[0]);
        assert_eq!(totals.games_won, u32::MAX);
        assert_eq!(totals.games_played, u32::MAX);
        assert_eq!(totals.matches_played, 2);
    }

    #[test]
    fn test_contested_sides() {
        let config = StatsConfig::default();
        assert!(contested_sides(&record("Alice", "Bob", 2, 0, 0), &config).is_some());
        assert!(contested_sides(&record("Alice", "BYE", 2, 0, 0), &config).is_none());
        assert!(contested_sides(&record("Alice", "Alice", 2, 0, 0), &config).is_none());

        let mut missing = record("Alice", "Bob", 2, 0, 0);
        missing.player1 = None;
        assert!(contested_sides(&missing, &config).is_none());
    }
}
