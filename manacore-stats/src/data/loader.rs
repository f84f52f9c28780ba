//! Data loader for the processed league tables.
//!
//! Reads the CSV files written by the ingestion step into typed records:
//! - `matches.csv`: one row per match with per-player game wins
//! - `drafted_decks.csv`: one row per card in a player's deck
//! - `drafts.csv`: draft events with their timestamp
//! - `cube_history.csv`: cube list adds/removes over time
//! - `mainboard.csv`: cards that made a mainboard (optional)
//! - `standings.csv`: passed through untouched (optional)
//!
//! A missing file or missing required column fails the load. Individual
//! empty keys are kept as `None` and dealt with by the aggregations.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::types::{
    ChangeType, CubeChange, DraftEvent, DraftedCard, MainboardCard, MatchRecord,
};
use crate::config::StatsConfig;

pub const MATCHES_FILE: &str = "matches.csv";
pub const DRAFTED_DECKS_FILE: &str = "drafted_decks.csv";
pub const DRAFTS_FILE: &str = "drafts.csv";
pub const CUBE_HISTORY_FILE: &str = "cube_history.csv";
pub const MAINBOARD_FILE: &str = "mainboard.csv";
pub const STANDINGS_FILE: &str = "standings.csv";

/// Upper bound on any single game count in `matches.csv`.
pub const MAX_GAMES_PER_MATCH: u32 = 100;

/// Required columns of `matches.csv`.
pub const MATCH_COLUMNS: &[&str] = &[
    "season_id",
    "draft_id",
    "player1",
    "player2",
    "player1Wins",
    "player2Wins",
];

/// Required columns of `drafted_decks.csv` (classification columns are configurable).
pub const DRAFTED_DECK_COLUMNS: &[&str] = &["season_id", "draft_id", "player", "scryfallId"];

pub const DRAFT_COLUMNS: &[&str] = &["season_id", "draft_id", "timestamp"];

pub const CUBE_HISTORY_COLUMNS: &[&str] = &["season_id", "timestamp", "change_type", "scryfallId"];

pub const MAINBOARD_COLUMNS: &[&str] = &["season_id", "draft_id", "scryfallId"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Missing columns in {file}: {columns:?}")]
    MissingColumns { file: String, columns: Vec<String> },

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// All tables needed for a statistics run.
#[derive(Debug, Clone, Default)]
pub struct LeagueTables {
    pub matches: Vec<MatchRecord>,
    pub drafted_cards: Vec<DraftedCard>,
    pub drafts: Vec<DraftEvent>,
    pub cube_history: Vec<CubeChange>,
    pub mainboard: Vec<MainboardCard>,
    pub standings: Option<DataFrame>,
}

/// CSV loader for the processed data directory.
pub struct DataLoader {
    data_dir: PathBuf,
    archetype_column: String,
    decktype_column: String,
}

impl DataLoader {
    /// Create a loader pointing at the processed data directory.
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            data_dir: data_dir.as_ref().to_path_buf(),
            archetype_column: "archetype".to_string(),
            decktype_column: "decktype".to_string(),
        }
    }

    pub fn from_config(config: &StatsConfig) -> Self {
        Self::new(&config.data_dir)
            .with_class_columns(&config.archetype_column, &config.decktype_column)
    }

    /// Override the deck classification column names.
    pub fn with_class_columns(mut self, archetype: &str, decktype: &str) -> Self {
        self.archetype_column = archetype.to_string();
        self.decktype_column = decktype.to_string();
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn table_path(&self, file: &str) -> PathBuf {
        self.data_dir.join(file)
    }

    /// Check whether a table file exists.
    pub fn has_table(&self, file: &str) -> bool {
        self.table_path(file).exists()
    }

    /// Scan a table as a LazyFrame.
    pub fn load_lazy(&self, file: &str) -> Result<LazyFrame, LoaderError> {
        let path = self.table_path(file);
        if !path.exists() {
            return Err(LoaderError::FileNotFound(path.display().to_string()));
        }
        let lf = LazyCsvReader::new(&path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10_000))
            .finish()?;
        Ok(lf)
    }

    /// Load a table and check that `required` columns are present.
    pub fn load_dataframe(&self, file: &str, required: &[&str]) -> Result<DataFrame, LoaderError> {
        let df = self.load_lazy(file)?.collect()?;
        let missing = missing_columns(&df, required);
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns {
                file: file.to_string(),
                columns: missing,
            });
        }
        debug!("Loaded {} ({} rows)", file, df.height());
        Ok(df)
    }

    pub fn load_matches(&self) -> Result<Vec<MatchRecord>, LoaderError> {
        let df = self.load_dataframe(MATCHES_FILE, MATCH_COLUMNS)?;
        dataframe_to_matches(&df)
    }

    pub fn load_drafted_cards(&self) -> Result<Vec<DraftedCard>, LoaderError> {
        let df = self.load_dataframe(DRAFTED_DECKS_FILE, DRAFTED_DECK_COLUMNS)?;
        let names = column_names(&df);
        for class_column in [&self.archetype_column, &self.decktype_column] {
            if !names.contains(class_column.as_str()) {
                warn!(
                    "{} has no '{}' column; deck classification will be empty",
                    DRAFTED_DECKS_FILE, class_column
                );
            }
        }
        dataframe_to_drafted_cards(&df, &self.archetype_column, &self.decktype_column)
    }

    pub fn load_drafts(&self) -> Result<Vec<DraftEvent>, LoaderError> {
        let df = self.load_dataframe(DRAFTS_FILE, DRAFT_COLUMNS)?;
        dataframe_to_drafts(&df)
    }

    pub fn load_cube_history(&self) -> Result<Vec<CubeChange>, LoaderError> {
        let df = self.load_dataframe(CUBE_HISTORY_FILE, CUBE_HISTORY_COLUMNS)?;
        dataframe_to_cube_history(&df)
    }

    pub fn load_mainboard(&self) -> Result<Vec<MainboardCard>, LoaderError> {
        let df = self.load_dataframe(MAINBOARD_FILE, MAINBOARD_COLUMNS)?;
        dataframe_to_mainboard(&df)
    }

    /// Standings are produced elsewhere; they are only carried for preview.
    pub fn load_standings(&self) -> Result<DataFrame, LoaderError> {
        self.load_dataframe(STANDINGS_FILE, &[])
    }

    /// Load every table. Mainboard and standings are optional.
    pub fn load_all(&self) -> Result<LeagueTables, LoaderError> {
        info!("Loading league tables from {}", self.data_dir.display());

        let matches = self.load_matches()?;
        let drafted_cards = self.load_drafted_cards()?;
        let drafts = self.load_drafts()?;
        let cube_history = self.load_cube_history()?;

        let mainboard = match self.load_mainboard() {
            Ok(rows) => rows,
            Err(LoaderError::FileNotFound(path)) => {
                warn!("{} not found; availability uses cube history only", path);
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let standings = match self.load_standings() {
            Ok(df) => Some(df),
            Err(LoaderError::FileNotFound(path)) => {
                warn!("{} not found; skipping standings", path);
                None
            }
            Err(e) => return Err(e),
        };

        info!(
            "Loaded {} matches, {} drafted cards, {} drafts, {} cube changes, {} mainboard cards",
            matches.len(),
            drafted_cards.len(),
            drafts.len(),
            cube_history.len(),
            mainboard.len()
        );

        Ok(LeagueTables {
            matches,
            drafted_cards,
            drafts,
            cube_history,
            mainboard,
            standings,
        })
    }
}

fn column_names(df: &DataFrame) -> HashSet<String> {
    df.get_column_names()
        .into_iter()
        .map(|s| s.to_string())
        .collect()
}

/// Required columns absent from `df`, in the order given.
pub fn missing_columns(df: &DataFrame, required: &[&str]) -> Vec<String> {
    let names = column_names(df);
    required
        .iter()
        .filter(|c| !names.contains(**c))
        .map(|c| c.to_string())
        .collect()
}

/// Read a column as trimmed text keys. Empty strings and nulls become `None`.
fn key_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    let casted = df.column(name)?.cast(&DataType::String)?;
    let values = casted
        .str()?
        .into_iter()
        .map(|v| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        })
        .collect();
    Ok(values)
}

/// Like `key_column`, but an absent column reads as all `None`.
fn optional_key_column(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>, LoaderError> {
    if df.column(name).is_ok() {
        key_column(df, name)
    } else {
        Ok(vec![None; df.height()])
    }
}

/// Read a per-match game count. Nulls read as 0; negative counts and counts
/// above `MAX_GAMES_PER_MATCH` are rejected.
fn count_column(df: &DataFrame, name: &str, file: &str) -> Result<Vec<u32>, LoaderError> {
    if df.column(name).is_err() {
        return Ok(vec![0; df.height()]);
    }
    let casted = df.column(name)?.cast(&DataType::Int64)?;
    casted
        .i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            let count = v.unwrap_or(0);
            if !(0..=i64::from(MAX_GAMES_PER_MATCH)).contains(&count) {
                return Err(LoaderError::InvalidData(format!(
                    "{}: '{}' is {} at row {} (expected 0..={})",
                    file,
                    name,
                    count,
                    row + 1,
                    MAX_GAMES_PER_MATCH
                )));
            }
            Ok(count as u32)
        })
        .collect()
}

fn required_key(value: Option<String>, file: &str, column: &str, row: usize) -> Result<String, LoaderError> {
    value.ok_or_else(|| {
        LoaderError::InvalidData(format!("{}: empty '{}' at row {}", file, column, row + 1))
    })
}

/// Parse the timestamp formats found in the processed tables.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(ts);
        }
    }
    for fmt in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn timestamp_column(df: &DataFrame, file: &str) -> Result<Vec<NaiveDateTime>, LoaderError> {
    key_column(df, "timestamp")?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            let raw = required_key(value, file, "timestamp", row)?;
            parse_timestamp(&raw).ok_or_else(|| {
                LoaderError::InvalidData(format!(
                    "{}: unparseable timestamp '{}' at row {}",
                    file,
                    raw,
                    row + 1
                ))
            })
        })
        .collect()
}

/// Convert a `matches.csv` frame to match records.
pub fn dataframe_to_matches(df: &DataFrame) -> Result<Vec<MatchRecord>, LoaderError> {
    let season = key_column(df, "season_id")?;
    let draft = key_column(df, "draft_id")?;
    let match_id = optional_key_column(df, "match_id")?;
    let round = optional_key_column(df, "round")?;
    let player1 = key_column(df, "player1")?;
    let player2 = key_column(df, "player2")?;
    let p1_wins = count_column(df, "player1Wins", MATCHES_FILE)?;
    let p2_wins = count_column(df, "player2Wins", MATCHES_FILE)?;
    let draws = count_column(df, "draws", MATCHES_FILE)?;

    let mut records = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        records.push(MatchRecord {
            season_id: season[idx].clone(),
            draft_id: draft[idx].clone(),
            match_id: match_id[idx].clone(),
            round: round[idx].clone(),
            player1: player1[idx].clone(),
            player2: player2[idx].clone(),
            player1_wins: p1_wins[idx],
            player2_wins: p2_wins[idx],
            draws: draws[idx],
        });
    }
    Ok(records)
}

/// Convert a `drafted_decks.csv` frame to drafted card rows.
pub fn dataframe_to_drafted_cards(
    df: &DataFrame,
    archetype_column: &str,
    decktype_column: &str,
) -> Result<Vec<DraftedCard>, LoaderError> {
    let season = key_column(df, "season_id")?;
    let draft = key_column(df, "draft_id")?;
    let player = key_column(df, "player")?;
    let card = key_column(df, "scryfallId")?;
    let archetype = optional_key_column(df, archetype_column)?;
    let decktype = optional_key_column(df, decktype_column)?;

    let mut rows = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        rows.push(DraftedCard {
            season_id: season[idx].clone(),
            draft_id: draft[idx].clone(),
            player: player[idx].clone(),
            archetype: archetype[idx].clone(),
            decktype: decktype[idx].clone(),
            scryfall_id: card[idx].clone(),
        });
    }
    Ok(rows)
}

/// Convert a `drafts.csv` frame to draft events.
pub fn dataframe_to_drafts(df: &DataFrame) -> Result<Vec<DraftEvent>, LoaderError> {
    let season = key_column(df, "season_id")?;
    let draft = key_column(df, "draft_id")?;
    let timestamps = timestamp_column(df, DRAFTS_FILE)?;

    let mut drafts = Vec::with_capacity(df.height());
    for (idx, timestamp) in timestamps.into_iter().enumerate() {
        drafts.push(DraftEvent {
            season_id: required_key(season[idx].clone(), DRAFTS_FILE, "season_id", idx)?,
            draft_id: required_key(draft[idx].clone(), DRAFTS_FILE, "draft_id", idx)?,
            timestamp,
        });
    }
    Ok(drafts)
}

/// Convert a `cube_history.csv` frame to cube changes.
pub fn dataframe_to_cube_history(df: &DataFrame) -> Result<Vec<CubeChange>, LoaderError> {
    let season = key_column(df, "season_id")?;
    let change_type = key_column(df, "change_type")?;
    let card = key_column(df, "scryfallId")?;
    let timestamps = timestamp_column(df, CUBE_HISTORY_FILE)?;

    let mut changes = Vec::with_capacity(df.height());
    for (idx, timestamp) in timestamps.into_iter().enumerate() {
        let kind = change_type[idx].as_deref().and_then(ChangeType::from_str);
        if kind.is_none() {
            debug!(
                "{}: unrecognised change_type {:?} at row {}",
                CUBE_HISTORY_FILE,
                change_type[idx],
                idx + 1
            );
        }
        changes.push(CubeChange {
            season_id: required_key(season[idx].clone(), CUBE_HISTORY_FILE, "season_id", idx)?,
            timestamp,
            change_type: kind,
            scryfall_id: required_key(card[idx].clone(), CUBE_HISTORY_FILE, "scryfallId", idx)?,
        });
    }
    Ok(changes)
}

/// Convert a `mainboard.csv` frame to mainboard rows. Rows with an empty key are dropped.
pub fn dataframe_to_mainboard(df: &DataFrame) -> Result<Vec<MainboardCard>, LoaderError> {
    let season = key_column(df, "season_id")?;
    let draft = key_column(df, "draft_id")?;
    let card = key_column(df, "scryfallId")?;
    let player = optional_key_column(df, "player")?;

    let rows = season
        .into_iter()
        .zip(draft)
        .zip(card)
        .zip(player)
        .filter_map(|(((season_id, draft_id), scryfall_id), player)| {
            Some(MainboardCard {
                season_id: season_id?,
                draft_id: draft_id?,
                scryfall_id: scryfall_id?,
                player,
            })
        })
        .collect();
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).unwrap();
    }

    fn league_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            MATCHES_FILE,
            "season_id,draft_id,match_id,player1,player2,player1Wins,player2Wins,draws,round\n\
             Season-1,20240922,m1,Alice,Bob,2,1,0,1\n\
             Season-1,20240922,m2,Carol,BYE,2,0,,2\n\
             Season-1,20240922,m3,Alice,,1,1,1,3\n",
        );
        write(
            &dir,
            DRAFTED_DECKS_FILE,
            "season_id,draft_id,player,archetype,decktype,scryfallId\n\
             Season-1,20240922,Alice,Aggro,Red,card-a\n\
             Season-1,20240922,Alice,Aggro,Red,card-b\n\
             Season-1,20240922,Bob,Control,Blue-White,card-c\n",
        );
        write(
            &dir,
            DRAFTS_FILE,
            "season_id,draft_id,timestamp\n\
             Season-1,20240922,2024-09-22\n",
        );
        write(
            &dir,
            CUBE_HISTORY_FILE,
            "change_id,season_id,timestamp,change_type,scryfallId\n\
             1,Season-1,2024-09-01,adds,card-a\n\
             2,Season-1,2024-09-01 12:00:00,swap,card-b\n",
        );
        dir
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = NaiveDate::from_ymd_opt(2021, 5, 17)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2021-05-17"), Some(midnight));
        assert_eq!(parse_timestamp("20210517"), Some(midnight));
        assert_eq!(
            parse_timestamp("2021-05-18 10:00:00"),
            NaiveDate::from_ymd_opt(2021, 5, 18).unwrap().and_hms_opt(10, 0, 0)
        );
        assert_eq!(
            parse_timestamp("2021-05-18T10:00:00"),
            NaiveDate::from_ymd_opt(2021, 5, 18).unwrap().and_hms_opt(10, 0, 0)
        );
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_load_matches() {
        let dir = league_dir();
        let loader = DataLoader::new(dir.path());
        let matches = loader.load_matches().unwrap();

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].draft_id.as_deref(), Some("20240922"));
        assert_eq!(matches[0].player1.as_deref(), Some("Alice"));
        assert_eq!(matches[0].player1_wins, 2);
        assert_eq!(matches[0].player2_wins, 1);
        assert_eq!(matches[0].round.as_deref(), Some("1"));
        // Empty draws cell reads as zero
        assert_eq!(matches[1].draws, 0);
        // Empty player stays empty
        assert_eq!(matches[2].player2, None);
    }

    #[test]
    fn test_load_drafted_cards() {
        let dir = league_dir();
        let loader = DataLoader::new(dir.path());
        let cards = loader.load_drafted_cards().unwrap();

        assert_eq!(cards.len(), 3);
        assert_eq!(cards[2].player.as_deref(), Some("Bob"));
        assert_eq!(cards[2].archetype.as_deref(), Some("Control"));
        assert_eq!(cards[2].decktype.as_deref(), Some("Blue-White"));
    }

    #[test]
    fn test_custom_class_columns() {
        let dir = league_dir();
        let loader = DataLoader::new(dir.path()).with_class_columns("archetype", "decktype_level_2");
        let cards = loader.load_drafted_cards().unwrap();
        assert_eq!(cards[0].archetype.as_deref(), Some("Aggro"));
        assert_eq!(cards[0].decktype, None);
    }

    #[test]
    fn test_load_cube_history_keeps_unknown_change_types() {
        let dir = league_dir();
        let loader = DataLoader::new(dir.path());
        let changes = loader.load_cube_history().unwrap();
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].change_type, Some(ChangeType::Adds));
        assert_eq!(changes[1].change_type, None);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let loader = DataLoader::new(dir.path());
        assert!(matches!(
            loader.load_matches(),
            Err(LoaderError::FileNotFound(_))
        ));
    }

    #[test]
    fn test_missing_columns() {
        let dir = TempDir::new().unwrap();
        write(&dir, MATCHES_FILE, "season_id,draft_id,player1\nS1,1,Alice\n");
        let loader = DataLoader::new(dir.path());
        match loader.load_matches() {
            Err(LoaderError::MissingColumns { file, columns }) => {
                assert_eq!(file, MATCHES_FILE);
                assert_eq!(columns, vec!["player2", "player1Wins", "player2Wins"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_game_counts_fail() {
        let header = "season_id,draft_id,player1,player2,player1Wins,player2Wins,draws\n";
        for row in [
            "S1,d1,Alice,Bob,3000000000,2000000000,0\n",
            "S1,d1,Alice,Bob,2,-1,0\n",
            "S1,d1,Alice,Bob,2,1,101\n",
        ] {
            let dir = TempDir::new().unwrap();
            write(&dir, MATCHES_FILE, &format!("{}{}", header, row));
            let loader = DataLoader::new(dir.path());
            assert!(
                matches!(loader.load_matches(), Err(LoaderError::InvalidData(_))),
                "accepted {}",
                row
            );
        }
    }

    #[test]
    fn test_game_count_at_limit_loads() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            MATCHES_FILE,
            &format!(
                "season_id,draft_id,player1,player2,player1Wins,player2Wins,draws\nS1,d1,Alice,Bob,{},0,0\n",
                MAX_GAMES_PER_MATCH
            ),
        );
        let matches = DataLoader::new(dir.path()).load_matches().unwrap();
        assert_eq!(matches[0].player1_wins, MAX_GAMES_PER_MATCH);
    }

    #[test]
    fn test_bad_timestamp_fails() {
        let dir = TempDir::new().unwrap();
        write(&dir, DRAFTS_FILE, "season_id,draft_id,timestamp\nS1,1,soon\n");
        let loader = DataLoader::new(dir.path());
        assert!(matches!(
            loader.load_drafts(),
            Err(LoaderError::InvalidData(_))
        ));
    }

    #[test]
    fn test_load_all_without_optional_tables() {
        let dir = league_dir();
        let loader = DataLoader::new(dir.path());
        let tables = loader.load_all().unwrap();
        assert_eq!(tables.matches.len(), 3);
        assert_eq!(tables.drafts.len(), 1);
        assert!(tables.mainboard.is_empty());
        assert!(tables.standings.is_none());
    }

    #[test]
    fn test_load_mainboard_drops_empty_keys() {
        let dir = TempDir::new().unwrap();
        write(
            &dir,
            MAINBOARD_FILE,
            "season_id,draft_id,scryfallId\nS1,1,card-a\nS1,1,\n",
        );
        let loader = DataLoader::new(dir.path());
        let rows = loader.load_mainboard().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].scryfall_id, "card-a");
        assert_eq!(rows[0].player, None);
    }
}
