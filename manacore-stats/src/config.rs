//! Run configuration.
//!
//! Every field has a default so a partial TOML file (or none at all) is
//! enough:
//!
//! ```toml
//! data_dir = "data/processed"
//! output_dir = "data/processed"
//! preview_rows = 5
//! bye_player = "BYE"
//! archetype_column = "archetype"
//! decktype_column = "decktype"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    FileNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for a statistics run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Directory holding the processed CSV tables.
    pub data_dir: PathBuf,

    /// Where to write result tables. Nothing is written when unset.
    pub output_dir: Option<PathBuf>,

    /// Rows shown per table in the printed preview.
    pub preview_rows: usize,

    /// Player name used for byes. Matches against it are not contested.
    pub bye_player: String,

    /// Column of `drafted_decks.csv` holding the archetype.
    pub archetype_column: String,

    /// Column of `drafted_decks.csv` holding the deck type.
    pub decktype_column: String,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data/processed"),
            output_dir: None,
            preview_rows: 5,
            bye_player: "BYE".to_string(),
            archetype_column: "archetype".to_string(),
            decktype_column: "decktype".to_string(),
        }
    }
}

impl StatsConfig {
    /// Load a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// True if `player` is the bye marker.
    pub fn is_bye(&self, player: &str) -> bool {
        !self.bye_player.is_empty() && player.eq_ignore_ascii_case(&self.bye_player)
    }
}
