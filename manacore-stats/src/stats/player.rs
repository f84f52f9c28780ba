//! Player-level win rates.
//!
//! Four views over the same match table:
//! - games per (player, archetype) and per (player, deck type)
//! - overall games and matches per player
//! - games and matches per ordered (player, opponent) pair

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{contested_sides, WinRecord};
use crate::config::StatsConfig;
use crate::data::{DeckClass, DeckIndex, MatchRecord};

/// Game record of a player with one deck classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDeckStats {
    pub player: String,
    /// Archetype or deck type name, depending on `class`.
    pub deck: String,
    pub class: DeckClass,
    pub games_won: u32,
    pub games_played: u32,
    pub game_win_rate: Option<f64>,
}

/// Overall game and match record of a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: String,
    pub games_won: u32,
    pub games_played: u32,
    pub game_win_rate: Option<f64>,
    pub matches_won: u32,
    pub matches_played: u32,
    pub match_win_rate: Option<f64>,
}

/// A player's record against one specific opponent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadToHeadStats {
    pub player: String,
    pub opponent: String,
    pub games_won: u32,
    pub games_played: u32,
    pub game_win_rate: Option<f64>,
    pub matches_won: u32,
    pub matches_played: u32,
    pub match_win_rate: Option<f64>,
}

/// Game win rate per (player, classification).
///
/// Each side of a contested match is joined to the deck that player
/// registered for the match's draft. Sides without a deck or without a
/// value for `class` are left out.
pub fn player_class_game_winrate(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    class: DeckClass,
    config: &StatsConfig,
) -> Vec<PlayerDeckStats> {
    let mut groups: BTreeMap<(String, String), WinRecord> = BTreeMap::new();

    for record in matches {
        let Some(sides) = contested_sides(record, config) else {
            continue;
        };
        let Some(draft_id) = record.draft_id.as_deref() else {
            continue;
        };
        for side in &sides {
            let Some(deck) = decks.classification(draft_id, side.player, class) else {
                continue;
            };
            groups
                .entry((side.player.to_string(), deck.to_string()))
                .or_default()
                .add_side(side);
        }
    }

    groups
        .into_iter()
        .map(|((player, deck), totals)| PlayerDeckStats {
            player,
            deck,
            class,
            games_won: totals.games_won,
            games_played: totals.games_played,
            game_win_rate: totals.game_win_rate(),
        })
        .collect()
}

/// Game win rate per (player, archetype).
pub fn player_archetype_game_winrate(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    config: &StatsConfig,
) -> Vec<PlayerDeckStats> {
    player_class_game_winrate(matches, decks, DeckClass::Archetype, config)
}

/// Game win rate per (player, deck type).
pub fn player_decktype_game_winrate(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    config: &StatsConfig,
) -> Vec<PlayerDeckStats> {
    player_class_game_winrate(matches, decks, DeckClass::Decktype, config)
}

/// Overall game and match record per player.
pub fn player_game_and_match_stats(matches: &[MatchRecord], config: &StatsConfig) -> Vec<PlayerStats> {
    let mut groups: BTreeMap<String, WinRecord> = BTreeMap::new();

    for record in matches {
        let Some(sides) = contested_sides(record, config) else {
            continue;
        };
        for side in &sides {
            groups
                .entry(side.player.to_string())
                .or_default()
                .add_side(side);
        }
    }

    groups
        .into_iter()
        .map(|(player, totals)| PlayerStats {
            player,
            games_won: totals.games_won,
            games_played: totals.games_played,
            game_win_rate: totals.game_win_rate(),
            matches_won: totals.matches_won,
            matches_played: totals.matches_played,
            match_win_rate: totals.match_win_rate(),
        })
        .collect()
}

/// Record per ordered (player, opponent) pair.
///
/// Every contested match produces a row for both orderings, so games played
/// is symmetric across a pair while games won is not.
pub fn vs_player_stats(matches: &[MatchRecord], config: &StatsConfig) -> Vec<HeadToHeadStats> {
    let mut groups: BTreeMap<(String, String), WinRecord> = BTreeMap::new();

    for record in matches {
        let Some(sides) = contested_sides(record, config) else {
            continue;
        };
        for side in &sides {
            groups
                .entry((side.player.to_string(), side.opponent.to_string()))
                .or_default()
                .add_side(side);
        }
    }

    groups
        .into_iter()
        .map(|((player, opponent), totals)| HeadToHeadStats {
            player,
            opponent,
            games_won: totals.games_won,
            games_played: totals.games_played,
            game_win_rate: totals.game_win_rate(),
            matches_won: totals.matches_won,
            matches_played: totals.matches_played,
            match_win_rate: totals.match_win_rate(),
        })
        .collect()
}
