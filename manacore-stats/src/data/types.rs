//! Core record types for league statistics.
//!
//! These mirror the processed CSV tables one row at a time. Keys are kept
//! as trimmed strings; a key that was empty or null in the source is `None`
//! so the aggregations can skip it instead of failing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Result of a match from one player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOutcome {
    Win,
    Loss,
    Draw,
}

impl MatchOutcome {
    /// Majority of games decides the match; equal game wins is a draw.
    pub fn from_games(won: u32, lost: u32) -> Self {
        match won.cmp(&lost) {
            std::cmp::Ordering::Greater => Self::Win,
            std::cmp::Ordering::Less => Self::Loss,
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }
}

/// A single match between two players (one row of `matches.csv`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub season_id: Option<String>,
    pub draft_id: Option<String>,
    pub match_id: Option<String>,
    pub round: Option<String>,
    pub player1: Option<String>,
    pub player2: Option<String>,
    pub player1_wins: u32,
    pub player2_wins: u32,
    pub draws: u32,
}

impl MatchRecord {
    /// Total games in the match, drawn games included.
    pub fn games_played(&self) -> u32 {
        self.player1_wins
            .saturating_add(self.player2_wins)
            .saturating_add(self.draws)
    }

    /// Both perspectives of the match, player1 first.
    ///
    /// Returns `None` when either player key is missing.
    pub fn sides(&self) -> Option<[MatchSide<'_>; 2]> {
        let p1 = self.player1.as_deref()?;
        let p2 = self.player2.as_deref()?;
        Some([
            MatchSide {
                player: p1,
                opponent: p2,
                games_won: self.player1_wins,
                games_lost: self.player2_wins,
                draws: self.draws,
            },
            MatchSide {
                player: p2,
                opponent: p1,
                games_won: self.player2_wins,
                games_lost: self.player1_wins,
                draws: self.draws,
            },
        ])
    }
}

/// One player's view of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSide<'a> {
    pub player: &'a str,
    pub opponent: &'a str,
    pub games_won: u32,
    pub games_lost: u32,
    pub draws: u32,
}

impl MatchSide<'_> {
    pub fn games_played(&self) -> u32 {
        self.games_won
            .saturating_add(self.games_lost)
            .saturating_add(self.draws)
    }

    pub fn outcome(&self) -> MatchOutcome {
        MatchOutcome::from_games(self.games_won, self.games_lost)
    }
}

/// A card in a player's drafted deck (one row of `drafted_decks.csv`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftedCard {
    pub season_id: Option<String>,
    pub draft_id: Option<String>,
    pub player: Option<String>,
    pub archetype: Option<String>,
    pub decktype: Option<String>,
    pub scryfall_id: Option<String>,
}

/// The deck a player registered for one draft event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRecord {
    pub season_id: Option<String>,
    pub draft_id: String,
    pub player: String,
    pub archetype: Option<String>,
    pub decktype: Option<String>,
}

/// Which deck classification to group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeckClass {
    Archetype,
    Decktype,
}

impl DeckClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Archetype => "archetype",
            Self::Decktype => "decktype",
        }
    }
}

impl DeckRecord {
    pub fn classification(&self, class: DeckClass) -> Option<&str> {
        match class {
            DeckClass::Archetype => self.archetype.as_deref(),
            DeckClass::Decktype => self.decktype.as_deref(),
        }
    }
}

/// A draft event with the time it was held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftEvent {
    pub season_id: String,
    pub draft_id: String,
    pub timestamp: NaiveDateTime,
}

/// Kind of cube list change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeType {
    Adds,
    Removes,
}

impl ChangeType {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "adds" | "add" => Some(Self::Adds),
            "removes" | "remove" => Some(Self::Removes),
            _ => None,
        }
    }
}

/// One entry of the cube history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CubeChange {
    pub season_id: String,
    pub timestamp: NaiveDateTime,
    /// `None` when the source row carried an unrecognised change type.
    pub change_type: Option<ChangeType>,
    pub scryfall_id: String,
}

/// A card that made a mainboard at a draft (one row of `mainboard.csv`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MainboardCard {
    pub season_id: String,
    pub draft_id: String,
    pub scryfall_id: String,
    pub player: Option<String>,
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
    fn test_outcome_from_games() {
        assert_eq!(MatchOutcome::from_games(2, 1), MatchOutcome::Win);
        assert_eq!(MatchOutcome::from_games(0, 2), MatchOutcome::Loss);
        assert_eq!(MatchOutcome::from_games(1, 1), MatchOutcome::Draw);
        assert_eq!(MatchOutcome::from_games(0, 0), MatchOutcome::Draw);
    }

    #[test]
    fn test_sides_are_mirrored() {
        let m = record("Alice", "Bob", 2, 1, 1);
        let [a, b] = m.sides().unwrap();
        assert_eq!(a.player, "Alice");
        assert_eq!(a.opponent, "Bob");
        assert_eq!(a.outcome(), MatchOutcome::Win);
        assert_eq!(b.player, "Bob");
        assert_eq!(b.outcome(), MatchOutcome::Loss);
        assert_eq!(a.games_played(), 4);
        assert_eq!(b.games_played(), m.games_played());
    }

    #[test]
    fn test_sides_missing_player() {
        let mut m = record("Alice", "Bob", 2, 0, 0);
        m.player2 = None;
        assert!(m.sides().is_none());
    }

    #[test]
    fn test_change_type_parsing() {
        assert_eq!(ChangeType::from_str("adds"), Some(ChangeType::Adds));
        assert_eq!(ChangeType::from_str(" Removes "), Some(ChangeType::Removes));
        assert_eq!(ChangeType::from_str("swap"), None);
    }
}
