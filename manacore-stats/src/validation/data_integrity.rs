//! Data integrity validation for the processed league tables.
//!
//! Validates:
//! - Schema consistency (required columns in every table)
//! - Loadability (every row parses)
//! - Distinct players (nobody plays themselves)
//! - Deck coverage (every contested match side has a deck)
//! - Deck consistency (one archetype and deck type per player per draft)
//! - Known drafts (every match belongs to a draft in `drafts.csv`)
//! - Cube change types (only adds and removes)

use std::collections::{BTreeMap, BTreeSet, HashSet};

use polars::prelude::*;
use thiserror::Error;
use tracing::info;

use crate::config::StatsConfig;
use crate::data::loader::{
    missing_columns, CUBE_HISTORY_COLUMNS, CUBE_HISTORY_FILE, DRAFTED_DECKS_FILE,
    DRAFTED_DECK_COLUMNS, DRAFTS_FILE, DRAFT_COLUMNS, MATCHES_FILE, MATCH_COLUMNS,
};
use crate::data::{DataLoader, DeckIndex, LeagueTables, LoaderError};
use crate::stats::record::contested_sides;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Loader error: {0}")]
    Loader(#[from] LoaderError),

    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Tables whose schema is checked, with their required columns.
const CHECKED_TABLES: &[(&str, &[&str])] = &[
    (MATCHES_FILE, MATCH_COLUMNS),
    (DRAFTED_DECKS_FILE, DRAFTED_DECK_COLUMNS),
    (DRAFTS_FILE, DRAFT_COLUMNS),
    (CUBE_HISTORY_FILE, CUBE_HISTORY_COLUMNS),
];

/// Examples listed in a failure's details before truncating.
const MAX_EXAMPLES: usize = 5;

/// Result of a single validation check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    pub fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    pub fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete data integrity report for a data directory.
#[derive(Debug)]
pub struct DataIntegrityReport {
    pub data_dir: String,
    pub match_count: usize,
    pub draft_count: usize,
    pub checks: Vec<CheckResult>,
}

impl DataIntegrityReport {
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    pub fn failed_checks(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    pub fn summary(&self) -> String {
        let passed = self.checks.iter().filter(|c| c.passed).count();
        let total = self.checks.len();
        format!(
            "{} ({} matches, {} drafts): {}/{} checks passed",
            self.data_dir, self.match_count, self.draft_count, passed, total
        )
    }
}

/// Validator for the league tables in one data directory.
pub struct DataIntegrityValidator {
    loader: DataLoader,
    config: StatsConfig,
}

impl DataIntegrityValidator {
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            loader: DataLoader::from_config(config),
            config: config.clone(),
        }
    }

    /// Run all validation checks.
    ///
    /// Content checks only run when every table has its required columns.
    pub fn validate(&self) -> ValidationResult<DataIntegrityReport> {
        let mut checks = Vec::new();
        for (file, required) in CHECKED_TABLES {
            checks.push(self.check_schema(file, required)?);
        }

        let data_dir = self.loader.data_dir().display().to_string();
        if checks.iter().any(|c| !c.passed) {
            return Ok(DataIntegrityReport {
                data_dir,
                match_count: 0,
                draft_count: 0,
                checks,
            });
        }

        let tables = match self.loader.load_all() {
            Ok(tables) => tables,
            Err(LoaderError::InvalidData(details)) => {
                checks.push(CheckResult::fail("load", "Tables could not be read", Some(details)));
                return Ok(DataIntegrityReport {
                    data_dir,
                    match_count: 0,
                    draft_count: 0,
                    checks,
                });
            }
            Err(e) => return Err(e.into()),
        };
        checks.push(CheckResult::pass("load", "All tables parsed"));
        checks.extend(check_tables(&tables, &self.config));

        let report = DataIntegrityReport {
            data_dir,
            match_count: tables.matches.len(),
            draft_count: tables.drafts.len(),
            checks,
        };
        info!("{}", report.summary());
        Ok(report)
    }

    /// Check that a table exists and has all required columns.
    fn check_schema(&self, file: &str, required: &[&str]) -> ValidationResult<CheckResult> {
        let name = format!("schema_consistency:{}", file);
        let df = match self.loader.load_dataframe(file, &[]) {
            Ok(df) => df,
            Err(LoaderError::FileNotFound(path)) => {
                return Ok(CheckResult::fail(&name, "Table not found", Some(path)));
            }
            Err(e) => return Err(e.into()),
        };

        let missing = missing_columns(&df, required);
        if missing.is_empty() {
            Ok(CheckResult::pass(
                &name,
                &format!("All {} required columns present", required.len()),
            ))
        } else {
            Ok(CheckResult::fail(
                &name,
                "Schema mismatch",
                Some(format!("Missing: {:?}", missing)),
            ))
        }
    }
}

/// Content checks over already loaded tables.
pub fn check_tables(tables: &LeagueTables, config: &StatsConfig) -> Vec<CheckResult> {
    vec![
        check_distinct_players(tables),
        check_deck_coverage(tables, config),
        check_deck_consistency(tables),
        check_known_drafts(tables),
        check_cube_change_types(tables),
    ]
}

fn examples<I: IntoIterator<Item = String>>(items: I) -> String {
    let items: Vec<String> = items.into_iter().collect();
    let shown = items.iter().take(MAX_EXAMPLES).cloned().collect::<Vec<_>>().join(", ");
    if items.len() > MAX_EXAMPLES {
        format!("{}, ... ({} more)", shown, items.len() - MAX_EXAMPLES)
    } else {
        shown
    }
}

fn check_distinct_players(tables: &LeagueTables) -> CheckResult {
    let self_matches: Vec<String> = tables
        .matches
        .iter()
        .filter(|m| matches!((&m.player1, &m.player2), (Some(a), Some(b)) if a == b))
        .map(|m| {
            format!(
                "{} in draft {}",
                m.player1.as_deref().unwrap_or_default(),
                m.draft_id.as_deref().unwrap_or("?")
            )
        })
        .collect();

    if self_matches.is_empty() {
        CheckResult::pass("distinct_players", "No player is matched against themselves")
    } else {
        CheckResult::fail(
            "distinct_players",
            &format!("{} matches with the same player on both sides", self_matches.len()),
            Some(examples(self_matches)),
        )
    }
}

fn check_deck_coverage(tables: &LeagueTables, config: &StatsConfig) -> CheckResult {
    let decks = DeckIndex::from_cards(&tables.drafted_cards);
    let mut uncovered = BTreeSet::new();
    let mut sides = 0;

    for record in &tables.matches {
        let Some(pair) = contested_sides(record, config) else {
            continue;
        };
        let draft_id = record.draft_id.as_deref().unwrap_or_default();
        for side in &pair {
            sides += 1;
            if decks.get(draft_id, side.player).is_none() {
                uncovered.insert(format!("{} in draft {}", side.player, draft_id));
            }
        }
    }

    if uncovered.is_empty() {
        CheckResult::pass(
            "deck_coverage",
            &format!("All {} contested match sides have a deck", sides),
        )
    } else {
        CheckResult::fail(
            "deck_coverage",
            &format!("{} players have matches but no deck", uncovered.len()),
            Some(examples(uncovered)),
        )
    }
}

fn check_deck_consistency(tables: &LeagueTables) -> CheckResult {
    type Classes<'a> = (BTreeSet<&'a str>, BTreeSet<&'a str>);
    let mut classes: BTreeMap<(&str, &str), Classes> = BTreeMap::new();

    for row in &tables.drafted_cards {
        let (Some(draft), Some(player)) = (row.draft_id.as_deref(), row.player.as_deref()) else {
            continue;
        };
        let entry = classes.entry((draft, player)).or_default();
        if let Some(archetype) = row.archetype.as_deref().filter(|s| !s.is_empty()) {
            entry.0.insert(archetype);
        }
        if let Some(decktype) = row.decktype.as_deref().filter(|s| !s.is_empty()) {
            entry.1.insert(decktype);
        }
    }

    let conflicts: Vec<String> = classes
        .iter()
        .filter(|(_, (archetypes, decktypes))| archetypes.len() > 1 || decktypes.len() > 1)
        .map(|((draft, player), (archetypes, decktypes))| {
            format!(
                "{} in draft {}: {:?} / {:?}",
                player, draft, archetypes, decktypes
            )
        })
        .collect();

    if conflicts.is_empty() {
        CheckResult::pass(
            "deck_consistency",
            &format!("{} decks with a single classification", classes.len()),
        )
    } else {
        CheckResult::fail(
            "deck_consistency",
            &format!("{} decks with conflicting classifications", conflicts.len()),
            Some(examples(conflicts)),
        )
    }
}

fn check_known_drafts(tables: &LeagueTables) -> CheckResult {
    let known: HashSet<&str> = tables.drafts.iter().map(|d| d.draft_id.as_str()).collect();
    let unknown: BTreeSet<String> = tables
        .matches
        .iter()
        .filter(|m| !m.draft_id.as_deref().is_some_and(|id| known.contains(id)))
        .map(|m| m.draft_id.clone().unwrap_or_else(|| "<missing>".to_string()))
        .collect();

    if unknown.is_empty() {
        CheckResult::pass("known_drafts", "Every match belongs to a known draft")
    } else {
        CheckResult::fail(
            "known_drafts",
            &format!("{} draft ids in matches are not in {}", unknown.len(), DRAFTS_FILE),
            Some(examples(unknown)),
        )
    }
}

fn check_cube_change_types(tables: &LeagueTables) -> CheckResult {
    let invalid = tables
        .cube_history
        .iter()
        .filter(|c| c.change_type.is_none())
        .count();

    if invalid == 0 {
        CheckResult::pass(
            "cube_change_types",
            &format!("All {} cube changes are adds or removes", tables.cube_history.len()),
        )
    } else {
        CheckResult::fail(
            "cube_change_types",
            &format!("{} cube changes with an unknown type", invalid),
            None,
        )
    }
}
