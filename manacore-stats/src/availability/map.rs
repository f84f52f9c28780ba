//! Card availability per draft event.
//!
//! The cube list changes over a season. Replaying the cube history up to
//! each draft's timestamp gives the set of cards that could have been
//! drafted there. Cards that made a mainboard at a draft are added on top,
//! since a mainboarded card was necessarily in the pool.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::{ChangeType, CubeChange, DraftEvent, MainboardCard};

/// Season -> draft -> available card ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityMap {
    seasons: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
}

impl AvailabilityMap {
    pub fn cards_for(&self, season_id: &str, draft_id: &str) -> Option<&BTreeSet<String>> {
        self.seasons.get(season_id)?.get(draft_id)
    }

    pub fn is_available(&self, season_id: &str, draft_id: &str, card: &str) -> bool {
        self.cards_for(season_id, draft_id)
            .is_some_and(|cards| cards.contains(card))
    }

    /// Drafts of a season with their available cards, in draft id order.
    pub fn season(&self, season_id: &str) -> Option<&BTreeMap<String, BTreeSet<String>>> {
        self.seasons.get(season_id)
    }

    pub fn seasons(&self) -> impl Iterator<Item = &str> {
        self.seasons.keys().map(String::as_str)
    }

    pub fn draft_count(&self) -> usize {
        self.seasons.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
    }
}

/// Build the availability map from draft events, cube history and mainboards.
///
/// Within a season, changes are applied in timestamp order (ties keep file
/// order) and every change at or before a draft's timestamp is in effect for
/// that draft. Removing a card that is not in the cube is a no-op, and
/// changes with an unrecognised type are skipped.
pub fn build_availability_map(
    drafts: &[DraftEvent],
    cube_history: &[CubeChange],
    mainboard: &[MainboardCard],
) -> AvailabilityMap {
    let mut changes_by_season: HashMap<&str, Vec<&CubeChange>> = HashMap::new();
    for change in cube_history {
        changes_by_season
            .entry(change.season_id.as_str())
            .or_default()
            .push(change);
    }
    for changes in changes_by_season.values_mut() {
        changes.sort_by_key(|c| c.timestamp);
    }

    let mut drafts_by_season: BTreeMap<&str, Vec<&DraftEvent>> = BTreeMap::new();
    for draft in drafts {
        drafts_by_season
            .entry(draft.season_id.as_str())
            .or_default()
            .push(draft);
    }

    let mut map = AvailabilityMap::default();

    for (season, mut season_drafts) in drafts_by_season {
        season_drafts.sort_by_key(|d| d.timestamp);
        let changes = changes_by_season.remove(season).unwrap_or_default();

        let mut cube: BTreeSet<String> = BTreeSet::new();
        let mut next_change = 0;
        let season_map = map.seasons.entry(season.to_string()).or_default();

        for draft in season_drafts {
            while let Some(change) = changes.get(next_change) {
                if change.timestamp > draft.timestamp {
                    break;
                }
                match change.change_type {
                    Some(ChangeType::Adds) => {
                        cube.insert(change.scryfall_id.clone());
                    }
                    Some(ChangeType::Removes) => {
                        cube.remove(&change.scryfall_id);
                    }
                    None => {}
                }
                next_change += 1;
            }
            debug!(
                "{} draft {}: {} cards after {} changes",
                season,
                draft.draft_id,
                cube.len(),
                next_change
            );
            season_map
                .entry(draft.draft_id.clone())
                .or_default()
                .extend(cube.iter().cloned());
        }
    }

    for card in mainboard {
        if let Some(cards) = map
            .seasons
            .get_mut(&card.season_id)
            .and_then(|s| s.get_mut(&card.draft_id))
        {
            cards.insert(card.scryfall_id.clone());
        }
    }

    info!(
        "Built availability map: {} seasons, {} drafts",
        map.seasons.len(),
        map.draft_count()
    );
    map
}
