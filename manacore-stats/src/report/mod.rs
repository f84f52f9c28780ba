//! Report driver.
//!
//! Runs every aggregation over the loaded league tables, then previews the
//! results on stdout or writes them out as CSV files.

pub mod frames;

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::availability::{build_availability_map, AvailabilityMap};
use crate::config::StatsConfig;
use crate::data::{DeckClass, DeckIndex, LeagueTables};
use crate::stats::{
    archetype_season_stats, card_mainboard_rate, card_winrates, decktype_season_stats,
    most_picked_card_by_player, player_archetype_game_winrate, player_card_winrates,
    player_decktype_game_winrate, player_game_and_match_stats, vs_player_stats,
    CardMainboardRate, CardWinrate, DeckSeasonStats, HeadToHeadStats, MostPickedCard,
    PlayerCardWinrate, PlayerDeckStats, PlayerStats,
};

pub const PLAYER_ARCHETYPE_FILE: &str = "player_archetype_winrates.csv";
pub const PLAYER_DECKTYPE_FILE: &str = "player_decktype_winrates.csv";
pub const PLAYER_OVERALL_FILE: &str = "player_game_and_match_winrate.csv";
pub const VS_PLAYER_FILE: &str = "vs_player_game_and_match_winrate.csv";
pub const ARCHETYPE_SEASON_FILE: &str = "archetype_season_stats.csv";
pub const DECKTYPE_SEASON_FILE: &str = "decktype_season_stats.csv";
pub const CARD_MAINBOARD_FILE: &str = "card_mainboard_rate_per_season.csv";
pub const CARD_WINRATE_FILE: &str = "card_winrates_per_season.csv";
pub const PLAYER_CARD_FILE: &str = "combined_winrates_per_season.csv";
pub const MOST_PICKED_FILE: &str = "most_picked_card_by_player.csv";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Every statistic table produced from one set of league tables.
#[derive(Debug, Clone)]
pub struct Report {
    pub player_archetype: Vec<PlayerDeckStats>,
    pub player_decktype: Vec<PlayerDeckStats>,
    pub player_overall: Vec<PlayerStats>,
    pub vs_player: Vec<HeadToHeadStats>,
    pub archetype_season: Vec<DeckSeasonStats>,
    pub decktype_season: Vec<DeckSeasonStats>,
    pub card_mainboard: Vec<CardMainboardRate>,
    pub card_winrates: Vec<CardWinrate>,
    pub player_card_winrates: Vec<PlayerCardWinrate>,
    pub most_picked: Vec<MostPickedCard>,
    pub availability: AvailabilityMap,
    pub standings: Option<DataFrame>,
}

impl Report {
    pub fn build(tables: &LeagueTables, config: &StatsConfig) -> Self {
        let decks = DeckIndex::from_cards(&tables.drafted_cards);
        let availability =
            build_availability_map(&tables.drafts, &tables.cube_history, &tables.mainboard);
        let matches = &tables.matches;

        let report = Self {
            player_archetype: player_archetype_game_winrate(matches, &decks, config),
            player_decktype: player_decktype_game_winrate(matches, &decks, config),
            player_overall: player_game_and_match_stats(matches, config),
            vs_player: vs_player_stats(matches, config),
            archetype_season: archetype_season_stats(matches, &decks, config),
            decktype_season: decktype_season_stats(matches, &decks, config),
            card_mainboard: card_mainboard_rate(&tables.drafted_cards, &tables.drafts, &availability),
            card_winrates: card_winrates(matches, &decks, &availability, config),
            player_card_winrates: player_card_winrates(matches, &decks, config),
            most_picked: most_picked_card_by_player(&tables.drafted_cards),
            availability,
            standings: tables.standings.clone(),
        };

        info!(
            "Built report: {} players, {} decks, {} head-to-head pairs, {} card rows",
            report.player_overall.len(),
            decks.len(),
            report.vs_player.len(),
            report.card_winrates.len()
        );
        report
    }

    /// Output file name and frame for every statistic table, in report order.
    pub fn frames(&self) -> Result<Vec<(&'static str, DataFrame)>, ReportError> {
        Ok(vec![
            (
                PLAYER_ARCHETYPE_FILE,
                frames::player_deck_frame(&self.player_archetype, DeckClass::Archetype)?,
            ),
            (
                PLAYER_DECKTYPE_FILE,
                frames::player_deck_frame(&self.player_decktype, DeckClass::Decktype)?,
            ),
            (PLAYER_OVERALL_FILE, frames::player_frame(&self.player_overall)?),
            (VS_PLAYER_FILE, frames::head_to_head_frame(&self.vs_player)?),
            (
                ARCHETYPE_SEASON_FILE,
                frames::deck_season_frame(&self.archetype_season, DeckClass::Archetype)?,
            ),
            (
                DECKTYPE_SEASON_FILE,
                frames::deck_season_frame(&self.decktype_season, DeckClass::Decktype)?,
            ),
            (CARD_MAINBOARD_FILE, frames::card_mainboard_frame(&self.card_mainboard)?),
            (CARD_WINRATE_FILE, frames::card_winrate_frame(&self.card_winrates)?),
            (PLAYER_CARD_FILE, frames::player_card_frame(&self.player_card_winrates)?),
            (MOST_PICKED_FILE, frames::most_picked_frame(&self.most_picked)?),
        ])
    }

    /// First `rows` rows of each table, titled by output file name.
    pub fn preview(&self, rows: usize) -> Result<String, ReportError> {
        let mut out = String::new();
        for (name, df) in self.frames()? {
            out.push_str(&format!("{} ({} rows)\n{}\n\n", name, df.height(), df.head(Some(rows))));
        }
        if let Some(standings) = &self.standings {
            out.push_str(&format!(
                "standings ({} rows)\n{}\n",
                standings.height(),
                standings.head(Some(rows))
            ));
        }
        Ok(out)
    }

    /// Write every table to `dir`, creating it if needed. Returns the paths written.
    pub fn write_csv(&self, dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, ReportError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::new();
        for (name, mut df) in self.frames()? {
            let path = dir.join(name);
            let mut file = File::create(&path)?;
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut df)?;
            info!("Wrote {} rows to {}", df.height(), path.display());
            written.push(path);
        }
        Ok(written)
    }

    pub fn summary(&self) -> String {
        format!(
            "League Report\n\
             =============\n\
             \n\
             Players: {}\n\
             Head-to-head pairs: {}\n\
             Player/archetype rows: {}\n\
             Player/deck type rows: {}\n\
             Archetype season rows: {}\n\
             Deck type season rows: {}\n\
             \n\
             Seasons: {}\n\
             Drafts mapped: {}\n\
             Card mainboard rows: {}\n\
             Card win rate rows: {}\n\
             Player/card rows: {}",
            self.player_overall.len(),
            self.vs_player.len(),
            self.player_archetype.len(),
            self.player_decktype.len(),
            self.archetype_season.len(),
            self.decktype_season.len(),
            self.availability.seasons().count(),
            self.availability.draft_count(),
            self.card_mainboard.len(),
            self.card_winrates.len(),
            self.player_card_winrates.len(),
        )
    }
}
