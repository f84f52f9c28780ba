//! Validation module for the league tables.
//!
//! Schema and content checks run before statistics are trusted: missing
//! columns, self-matches, uncovered decks, conflicting deck
//! classifications, matches from unknown drafts and malformed cube changes.

pub mod data_integrity;

pub use data_integrity::{
    check_tables, CheckResult, DataIntegrityReport, DataIntegrityValidator, ValidationError,
    ValidationResult,
};
