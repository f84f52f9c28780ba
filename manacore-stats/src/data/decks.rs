//! Per-event deck lookup.
//!
//! `drafted_decks.csv` has one row per card. Aggregations need the deck a
//! player registered at a draft, so cards are collapsed to one
//! `DeckRecord` per `(draft_id, player)` plus the set of cards in it.

use std::collections::{BTreeSet, HashMap};

use super::types::{DeckClass, DeckRecord, DraftedCard};

/// Lookup of decks keyed by `(draft_id, player)`.
#[derive(Debug, Clone, Default)]
pub struct DeckIndex {
    decks: HashMap<(String, String), DeckRecord>,
    cards: HashMap<(String, String), BTreeSet<String>>,
}

impl DeckIndex {
    /// Build the index from drafted card rows.
    ///
    /// Rows without a draft id or player are skipped. When a deck's rows
    /// disagree on a classification, the first non-empty value is kept.
    pub fn from_cards(rows: &[DraftedCard]) -> Self {
        let mut index = Self::default();

        for row in rows {
            let (Some(draft_id), Some(player)) = (row.draft_id.as_deref(), row.player.as_deref())
            else {
                continue;
            };
            let key = (draft_id.to_string(), player.to_string());

            let deck = index
                .decks
                .entry(key.clone())
                .or_insert_with(|| DeckRecord {
                    season_id: row.season_id.clone(),
                    draft_id: draft_id.to_string(),
                    player: player.to_string(),
                    archetype: None,
                    decktype: None,
                });
            if deck.season_id.is_none() {
                deck.season_id = row.season_id.clone();
            }
            if deck.archetype.is_none() {
                deck.archetype = row.archetype.clone();
            }
            if deck.decktype.is_none() {
                deck.decktype = row.decktype.clone();
            }

            if let Some(card) = &row.scryfall_id {
                index.cards.entry(key).or_default().insert(card.clone());
            }
        }

        index
    }

    pub fn get(&self, draft_id: &str, player: &str) -> Option<&DeckRecord> {
        self.decks.get(&(draft_id.to_string(), player.to_string()))
    }

    /// The deck's classification, if the deck exists and has one.
    pub fn classification(&self, draft_id: &str, player: &str, class: DeckClass) -> Option<&str> {
        self.get(draft_id, player)
            .and_then(|deck| deck.classification(class))
    }

    /// Cards in a player's deck at a draft.
    pub fn cards(&self, draft_id: &str, player: &str) -> Option<&BTreeSet<String>> {
        self.cards.get(&(draft_id.to_string(), player.to_string()))
    }

    /// Every deck that has cards, with its card set, sorted by draft then player.
    pub fn decks_with_cards(&self) -> Vec<(&DeckRecord, &BTreeSet<String>)> {
        let mut decks: Vec<_> = self
            .decks
            .iter()
            .filter_map(|(key, deck)| self.cards.get(key).map(|cards| (deck, cards)))
            .collect();
        decks.sort_by(|(a, _), (b, _)| (&a.draft_id, &a.player).cmp(&(&b.draft_id, &b.player)));
        decks
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }
}
