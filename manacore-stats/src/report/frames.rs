//! Conversion of statistic rows into polars DataFrames.
//!
//! Column names follow the CSV files the league site reads. Null rates
//! stay null in the frame and are written as empty cells.

use polars::prelude::*;

use crate::data::DeckClass;
use crate::stats::{
    CardMainboardRate, CardWinrate, DeckSeasonStats, HeadToHeadStats, MostPickedCard,
    PlayerCardWinrate, PlayerDeckStats, PlayerStats,
};

pub fn player_deck_frame(rows: &[PlayerDeckStats], class: DeckClass) -> PolarsResult<DataFrame> {
    df!(
        "player" => rows.iter().map(|r| r.player.clone()).collect::<Vec<_>>(),
        class.as_str() => rows.iter().map(|r| r.deck.clone()).collect::<Vec<_>>(),
        "games_won" => rows.iter().map(|r| r.games_won).collect::<Vec<_>>(),
        "games_played" => rows.iter().map(|r| r.games_played).collect::<Vec<_>>(),
        "game_win_rate" => rows.iter().map(|r| r.game_win_rate).collect::<Vec<_>>(),
    )
}

pub fn player_frame(rows: &[PlayerStats]) -> PolarsResult<DataFrame> {
    df!(
        "player" => rows.iter().map(|r| r.player.clone()).collect::<Vec<_>>(),
        "games_won" => rows.iter().map(|r| r.games_won).collect::<Vec<_>>(),
        "games_played" => rows.iter().map(|r| r.games_played).collect::<Vec<_>>(),
        "game_win_rate" => rows.iter().map(|r| r.game_win_rate).collect::<Vec<_>>(),
        "matches_won" => rows.iter().map(|r| r.matches_won).collect::<Vec<_>>(),
        "matches_played" => rows.iter().map(|r| r.matches_played).collect::<Vec<_>>(),
        "match_win_rate" => rows.iter().map(|r| r.match_win_rate).collect::<Vec<_>>(),
    )
}

pub fn head_to_head_frame(rows: &[HeadToHeadStats]) -> PolarsResult<DataFrame> {
    df!(
        "player" => rows.iter().map(|r| r.player.clone()).collect::<Vec<_>>(),
        "opponent" => rows.iter().map(|r| r.opponent.clone()).collect::<Vec<_>>(),
        "games_won" => rows.iter().map(|r| r.games_won).collect::<Vec<_>>(),
        "games_played" => rows.iter().map(|r| r.games_played).collect::<Vec<_>>(),
        "game_win_rate" => rows.iter().map(|r| r.game_win_rate).collect::<Vec<_>>(),
        "matches_won" => rows.iter().map(|r| r.matches_won).collect::<Vec<_>>(),
        "matches_played" => rows.iter().map(|r| r.matches_played).collect::<Vec<_>>(),
        "match_win_rate" => rows.iter().map(|r| r.match_win_rate).collect::<Vec<_>>(),
    )
}

pub fn deck_season_frame(rows: &[DeckSeasonStats], class: DeckClass) -> PolarsResult<DataFrame> {
    df!(
        "season_id" => rows.iter().map(|r| r.season_id.clone()).collect::<Vec<_>>(),
        class.as_str() => rows.iter().map(|r| r.deck.clone()).collect::<Vec<_>>(),
        "games_won" => rows.iter().map(|r| r.games_won).collect::<Vec<_>>(),
        "games_played" => rows.iter().map(|r| r.games_played).collect::<Vec<_>>(),
        "game_win_rate" => rows.iter().map(|r| r.game_win_rate).collect::<Vec<_>>(),
        "matches_won" => rows.iter().map(|r| r.matches_won).collect::<Vec<_>>(),
        "matches_played" => rows.iter().map(|r| r.matches_played).collect::<Vec<_>>(),
        "match_win_rate" => rows.iter().map(|r| r.match_win_rate).collect::<Vec<_>>(),
    )
}

pub fn card_mainboard_frame(rows: &[CardMainboardRate]) -> PolarsResult<DataFrame> {
    df!(
        "season_id" => rows.iter().map(|r| r.season_id.clone()).collect::<Vec<_>>(),
        "scryfallId" => rows.iter().map(|r| r.scryfall_id.clone()).collect::<Vec<_>>(),
        "drafts_with_card" => rows.iter().map(|r| r.drafts_with_card).collect::<Vec<_>>(),
        "total_drafts_in_season" => rows.iter().map(|r| r.total_drafts_in_season).collect::<Vec<_>>(),
        "mainboard_rate" => rows.iter().map(|r| r.mainboard_rate).collect::<Vec<_>>(),
    )
}

pub fn card_winrate_frame(rows: &[CardWinrate]) -> PolarsResult<DataFrame> {
    df!(
        "season_id" => rows.iter().map(|r| r.season_id.clone()).collect::<Vec<_>>(),
        "scryfallId" => rows.iter().map(|r| r.scryfall_id.clone()).collect::<Vec<_>>(),
        "games_won" => rows.iter().map(|r| r.games_won).collect::<Vec<_>>(),
        "games_played" => rows.iter().map(|r| r.games_played).collect::<Vec<_>>(),
        "game_win_rate" => rows.iter().map(|r| r.game_win_rate).collect::<Vec<_>>(),
        "matches_won" => rows.iter().map(|r| r.matches_won).collect::<Vec<_>>(),
        "matches_played" => rows.iter().map(|r| r.matches_played).collect::<Vec<_>>(),
        "match_win_rate" => rows.iter().map(|r| r.match_win_rate).collect::<Vec<_>>(),
    )
}

pub fn player_card_frame(rows: &[PlayerCardWinrate]) -> PolarsResult<DataFrame> {
    df!(
        "player" => rows.iter().map(|r| r.player.clone()).collect::<Vec<_>>(),
        "scryfallId" => rows.iter().map(|r| r.scryfall_id.clone()).collect::<Vec<_>>(),
        "season_id" => rows.iter().map(|r| r.season_id.clone()).collect::<Vec<_>>(),
        "num_drafts_with_card" => rows.iter().map(|r| r.num_drafts_with_card).collect::<Vec<_>>(),
        "games_won" => rows.iter().map(|r| r.games_won).collect::<Vec<_>>(),
        "games_played" => rows.iter().map(|r| r.games_played).collect::<Vec<_>>(),
        "game_win_rate" => rows.iter().map(|r| r.game_win_rate).collect::<Vec<_>>(),
        "matches_won" => rows.iter().map(|r| r.matches_won).collect::<Vec<_>>(),
        "matches_played" => rows.iter().map(|r| r.matches_played).collect::<Vec<_>>(),
        "match_win_rate" => rows.iter().map(|r| r.match_win_rate).collect::<Vec<_>>(),
    )
}

pub fn most_picked_frame(rows: &[MostPickedCard]) -> PolarsResult<DataFrame> {
    df!(
        "player" => rows.iter().map(|r| r.player.clone()).collect::<Vec<_>>(),
        "scryfallId" => rows.iter().map(|r| r.scryfall_id.clone()).collect::<Vec<_>>(),
        "pick_count" => rows.iter().map(|r| r.pick_count).collect::<Vec<_>>(),
    )
}
