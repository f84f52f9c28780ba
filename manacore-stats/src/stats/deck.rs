//! Archetype and deck type win rates per season.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::record::{contested_sides, WinRecord};
use crate::config::StatsConfig;
use crate::data::{DeckClass, DeckIndex, MatchRecord};

/// Game and match record of one archetype (or deck type) in a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckSeasonStats {
    pub season_id: String,
    pub deck: String,
    pub class: DeckClass,
    pub games_won: u32,
    pub games_played: u32,
    pub game_win_rate: Option<f64>,
    pub matches_won: u32,
    pub matches_played: u32,
    pub match_win_rate: Option<f64>,
}

/// Record per (season, classification), counted from each deck's side.
///
/// A mirror match contributes both sides, so it adds one win and two
/// matches played to that classification.
pub fn class_season_stats(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    class: DeckClass,
    config: &StatsConfig,
) -> Vec<DeckSeasonStats> {
    let mut groups: BTreeMap<(String, String), WinRecord> = BTreeMap::new();

    for record in matches {
        let Some(sides) = contested_sides(record, config) else {
            continue;
        };
        let Some(draft_id) = record.draft_id.as_deref() else {
            continue;
        };
        for side in &sides {
            let Some(deck) = decks.get(draft_id, side.player) else {
                continue;
            };
            let Some(value) = deck.classification(class) else {
                continue;
            };
            let Some(season) = record.season_id.as_deref().or(deck.season_id.as_deref()) else {
                continue;
            };
            groups
                .entry((season.to_string(), value.to_string()))
                .or_default()
                .add_side(side);
        }
    }

    groups
        .into_iter()
        .map(|((season_id, deck), totals)| DeckSeasonStats {
            season_id,
            deck,
            class,
            games_won: totals.games_won,
            games_played: totals.games_played,
            game_win_rate: totals.game_win_rate(),
            matches_won: totals.matches_won,
            matches_played: totals.matches_played,
            match_win_rate: totals.match_win_rate(),
        })
        .collect()
}

pub fn archetype_season_stats(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    config: &StatsConfig,
) -> Vec<DeckSeasonStats> {
    class_season_stats(matches, decks, DeckClass::Archetype, config)
}

pub fn decktype_season_stats(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    config: &StatsConfig,
) -> Vec<DeckSeasonStats> {
    class_season_stats(matches, decks, DeckClass::Decktype, config)
}
