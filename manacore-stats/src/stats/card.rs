//! Card-level statistics per season.
//!
//! Season-level card figures only count a card at drafts where it was
//! available, so those functions take the `AvailabilityMap`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::record::{contested_sides, win_rate, WinRecord};
use crate::availability::AvailabilityMap;
use crate::config::StatsConfig;
use crate::data::{DeckIndex, DraftEvent, DraftedCard, MatchRecord};

/// How often a card made a deck in a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardMainboardRate {
    pub season_id: String,
    pub scryfall_id: String,
    pub drafts_with_card: u32,
    pub total_drafts_in_season: u32,
    pub mainboard_rate: Option<f64>,
}

/// Record of the decks that played a card in a season.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardWinrate {
    pub season_id: String,
    pub scryfall_id: String,
    pub games_won: u32,
    pub games_played: u32,
    pub game_win_rate: Option<f64>,
    pub matches_won: u32,
    pub matches_played: u32,
    pub match_win_rate: Option<f64>,
}

/// A player's record at the drafts where their deck held a card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerCardWinrate {
    pub player: String,
    pub scryfall_id: String,
    pub season_id: String,
    pub num_drafts_with_card: u32,
    pub games_won: u32,
    pub games_played: u32,
    pub game_win_rate: Option<f64>,
    pub matches_won: u32,
    pub matches_played: u32,
    pub match_win_rate: Option<f64>,
}

/// A player's most drafted card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MostPickedCard {
    pub player: String,
    pub scryfall_id: String,
    pub pick_count: u32,
}

/// Share of a season's drafts in which each card made some deck.
///
/// The denominator is the number of distinct drafts of the season in the
/// drafts table.
pub fn card_mainboard_rate(
    cards: &[DraftedCard],
    drafts: &[DraftEvent],
    availability: &AvailabilityMap,
) -> Vec<CardMainboardRate> {
    let mut drafts_per_season: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
    for draft in drafts {
        drafts_per_season
            .entry(draft.season_id.as_str())
            .or_default()
            .insert(draft.draft_id.as_str());
    }

    let mut seen: BTreeMap<(&str, &str), BTreeSet<&str>> = BTreeMap::new();
    for row in cards {
        let (Some(season), Some(draft), Some(card)) = (
            row.season_id.as_deref(),
            row.draft_id.as_deref(),
            row.scryfall_id.as_deref(),
        ) else {
            continue;
        };
        if !availability.is_available(season, draft, card) {
            continue;
        }
        seen.entry((season, card)).or_default().insert(draft);
    }

    seen.into_iter()
        .map(|((season, card), drafts_with)| {
            let total = drafts_per_season
                .get(season)
                .map(|d| d.len() as u32)
                .unwrap_or(0);
            let with_card = drafts_with.len() as u32;
            CardMainboardRate {
                season_id: season.to_string(),
                scryfall_id: card.to_string(),
                drafts_with_card: with_card,
                total_drafts_in_season: total,
                mainboard_rate: win_rate(with_card, total),
            }
        })
        .collect()
}

/// Game and match record per (season, card).
///
/// Each side of a contested match counts for every available card in the
/// deck that player registered at the draft.
pub fn card_winrates(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    availability: &AvailabilityMap,
    config: &StatsConfig,
) -> Vec<CardWinrate> {
    let mut groups: BTreeMap<(String, String), WinRecord> = BTreeMap::new();

    for record in matches {
        let Some(sides) = contested_sides(record, config) else {
            continue;
        };
        let (Some(season), Some(draft_id)) = (record.season_id.as_deref(), record.draft_id.as_deref())
        else {
            continue;
        };
        for side in &sides {
            let Some(deck_cards) = decks.cards(draft_id, side.player) else {
                continue;
            };
            for card in deck_cards {
                if !availability.is_available(season, draft_id, card) {
                    continue;
                }
                groups
                    .entry((season.to_string(), card.clone()))
                    .or_default()
                    .add_side(side);
            }
        }
    }

    groups
        .into_iter()
        .map(|((season_id, scryfall_id), totals)| CardWinrate {
            season_id,
            scryfall_id,
            games_won: totals.games_won,
            games_played: totals.games_played,
            game_win_rate: totals.game_win_rate(),
            matches_won: totals.matches_won,
            matches_played: totals.matches_played,
            match_win_rate: totals.match_win_rate(),
        })
        .collect()
}

/// Record per (player, card, season) over the player's contested matches at
/// drafts where their deck held the card.
///
/// `num_drafts_with_card` counts that season's drafts where the player's deck
/// held the card. Combinations without a contested match produce no row.
pub fn player_card_winrates(
    matches: &[MatchRecord],
    decks: &DeckIndex,
    config: &StatsConfig,
) -> Vec<PlayerCardWinrate> {
    let mut drafts_with_card: BTreeMap<(&str, &str, &str), u32> = BTreeMap::new();
    for (deck, cards) in decks.decks_with_cards() {
        let Some(season) = deck.season_id.as_deref() else {
            continue;
        };
        for card in cards {
            *drafts_with_card
                .entry((deck.player.as_str(), card.as_str(), season))
                .or_default() += 1;
        }
    }

    let mut groups: BTreeMap<(&str, &str, &str), WinRecord> = BTreeMap::new();
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
            let Some(season) = record.season_id.as_deref().or(deck.season_id.as_deref()) else {
                continue;
            };
            let Some(deck_cards) = decks.cards(draft_id, side.player) else {
                continue;
            };
            for card in deck_cards {
                groups
                    .entry((side.player, card.as_str(), season))
                    .or_default()
                    .add_side(side);
            }
        }
    }

    groups
        .into_iter()
        .map(|(key, totals)| PlayerCardWinrate {
            player: key.0.to_string(),
            scryfall_id: key.1.to_string(),
            season_id: key.2.to_string(),
            num_drafts_with_card: drafts_with_card.get(&key).copied().unwrap_or(0),
            games_won: totals.games_won,
            games_played: totals.games_played,
            game_win_rate: totals.game_win_rate(),
            matches_won: totals.matches_won,
            matches_played: totals.matches_played,
            match_win_rate: totals.match_win_rate(),
        })
        .collect()
}

/// Each player's most drafted card. Ties go to the smallest card id.
pub fn most_picked_card_by_player(cards: &[DraftedCard]) -> Vec<MostPickedCard> {
    let mut picks: BTreeMap<&str, BTreeMap<&str, u32>> = BTreeMap::new();
    for row in cards {
        let (Some(player), Some(card)) = (row.player.as_deref(), row.scryfall_id.as_deref()) else {
            continue;
        };
        *picks.entry(player).or_default().entry(card).or_default() += 1;
    }

    picks
        .into_iter()
        .filter_map(|(player, counts)| {
            let mut best: Option<(&str, u32)> = None;
            for (card, count) in counts {
                if best.map_or(true, |(_, top)| count > top) {
                    best = Some((card, count));
                }
            }
            best.map(|(card, count)| MostPickedCard {
                player: player.to_string(),
                scryfall_id: card.to_string(),
                pick_count: count,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::build_availability_map;
    use crate::data::loader::parse_timestamp;
    use crate::data::MainboardCard;

    fn card(season: &str, draft: &str, player: &str, id: &str) -> DraftedCard {
        DraftedCard {
            season_id: Some(season.to_string()),
            draft_id: Some(draft.to_string()),
            player: Some(player.to_string()),
            archetype: None,
            decktype: None,
            scryfall_id: Some(id.to_string()),
        }
    }

    fn draft(season: &str, id: &str) -> DraftEvent {
        DraftEvent {
            season_id: season.to_string(),
            draft_id: id.to_string(),
            timestamp: parse_timestamp("2024-01-01").unwrap(),
        }
    }

    fn record(draft: &str, p1: &str, p2: &str, w1: u32, w2: u32) -> MatchRecord {
        MatchRecord {
            season_id: Some("S1".to_string()),
            draft_id: Some(draft.to_string()),
            match_id: None,
            round: None,
            player1: Some(p1.to_string()),
            player2: Some(p2.to_string()),
            player1_wins: w1,
            player2_wins: w2,
            draws: 0,
        }
    }

    /// Availability where every card listed is in the pool at the given drafts.
    fn availability(entries: &[(&str, &str, &[&str])]) -> AvailabilityMap {
        let drafts: Vec<_> = entries.iter().map(|(s, d, _)| draft(s, d)).collect();
        let mainboard: Vec<_> = entries
            .iter()
            .flat_map(|(s, d, cards)| {
                cards.iter().map(move |c| MainboardCard {
                    season_id: s.to_string(),
                    draft_id: d.to_string(),
                    scryfall_id: c.to_string(),
                    player: None,
                })
            })
            .collect();
        build_availability_map(&drafts, &[], &mainboard)
    }

    #[test]
    fn test_mainboard_rate() {
        let cards = vec![
            card("Season-1", "1", "Alice", "cardA"),
            card("Season-1", "2", "Alice", "cardA"),
            card("Season-1", "2", "Bob", "cardA"),
            card("Season-1", "2", "Bob", "cardB"),
            card("Season-1", "3", "Carol", "cardC"),
            card("Season-2", "4", "Alice", "cardA"),
        ];
        let all = ["cardA", "cardB", "cardC"];
        let avail = availability(&[
            ("Season-1", "1", &all),
            ("Season-1", "2", &all),
            ("Season-1", "3", &["cardA", "cardB"]),
            ("Season-2", "4", &["cardA", "cardD"]),
            ("Season-2", "5", &["cardA", "cardD"]),
        ]);
        let drafts: Vec<_> = [("Season-1", "1"), ("Season-1", "2"), ("Season-1", "3"), ("Season-2", "4"), ("Season-2", "5")]
            .iter()
            .map(|(s, d)| draft(s, d))
            .collect();

        let rates = card_mainboard_rate(&cards, &drafts, &avail);
        // cardC at draft 3 was not available
        assert_eq!(rates.len(), 3);

        let a1 = rates
            .iter()
            .find(|r| r.season_id == "Season-1" && r.scryfall_id == "cardA")
            .unwrap();
        assert_eq!(a1.drafts_with_card, 2);
        assert_eq!(a1.total_drafts_in_season, 3);

        let a2 = rates
            .iter()
            .find(|r| r.season_id == "Season-2" && r.scryfall_id == "cardA")
            .unwrap();
        assert_eq!(a2.drafts_with_card, 1);
        assert_eq!(a2.mainboard_rate, Some(0.5));
    }

    #[test]
    fn test_card_winrates() {
        let cards = vec![
            card("S1", "1", "Alice", "card1"),
            card("S1", "1", "Bob", "card2"),
            card("S1", "1", "Charlie", "card3"),
            card("S1", "1", "Charlie", "card1"),
        ];
        let decks = DeckIndex::from_cards(&cards);
        let matches = vec![
            record("1", "Alice", "Bob", 2, 0),
            record("1", "Charlie", "Alice", 1, 2),
        ];
        let avail = availability(&[("S1", "1", &["card1", "card2", "card3"])]);

        let stats = card_winrates(&matches, &decks, &avail, &StatsConfig::default());
        let card1 = stats.iter().find(|s| s.scryfall_id == "card1").unwrap();
        // Alice twice (won both), Charlie once (lost)
        assert_eq!(card1.matches_played, 3);
        assert_eq!(card1.matches_won, 2);
        assert_eq!(card1.games_won, 2 + 2 + 1);
        assert_eq!(card1.games_played, 2 + 3 + 3);

        let card2 = stats.iter().find(|s| s.scryfall_id == "card2").unwrap();
        assert_eq!(card2.match_win_rate, Some(0.0));
    }

    #[test]
    fn test_card_winrates_skip_unavailable_cards() {
        let cards = vec![card("S1", "1", "Alice", "card1")];
        let decks = DeckIndex::from_cards(&cards);
        let matches = vec![record("1", "Alice", "Bob", 2, 0)];
        let avail = availability(&[("S1", "1", &[])]);

        let stats = card_winrates(&matches, &decks, &avail, &StatsConfig::default());
        assert!(stats.is_empty());
    }

    #[test]
    fn test_card_winrates_no_matches() {
        let cards = vec![card("S1", "1", "Alice", "card1")];
        let decks = DeckIndex::from_cards(&cards);
        let avail = availability(&[("S1", "1", &["card1"])]);
        assert!(card_winrates(&[], &decks, &avail, &StatsConfig::default()).is_empty());
    }

    #[test]
    fn test_mainboard_rate_null_without_season_drafts() {
        let cards = vec![card("Season-9", "90", "Alice", "cardA")];
        let avail = availability(&[("Season-9", "90", &["cardA"])]);
        // drafts.csv has no row for Season-9
        let drafts = vec![draft("Season-1", "1")];

        let rates = card_mainboard_rate(&cards, &drafts, &avail);
        assert_eq!(rates.len(), 1);
        assert_eq!(rates[0].drafts_with_card, 1);
        assert_eq!(rates[0].total_drafts_in_season, 0);
        assert_eq!(rates[0].mainboard_rate, None);
    }

    #[test]
    fn test_player_card_winrates_per_season() {
        let cards = vec![
            card("S1", "1", "Alice", "card1"),
            card("S1", "1", "Bob", "card2"),
            card("S1", "2", "Alice", "card1"),
            card("S1", "2", "Bob", "card2"),
            card("S2", "3", "Alice", "card1"),
            card("S2", "3", "Carol", "card3"),
            card("S2", "4", "Alice", "card9"),
        ];
        let decks = DeckIndex::from_cards(&cards);
        let mut in_s2 = record("3", "Alice", "Carol", 2, 1);
        in_s2.season_id = Some("S2".to_string());
        let matches = vec![
            record("1", "Alice", "Bob", 2, 0),
            record("2", "Alice", "Bob", 1, 2),
            record("2", "Alice", "BYE", 2, 0),
            in_s2,
        ];

        let stats = player_card_winrates(&matches, &decks, &StatsConfig::default());
        let find = |player: &str, id: &str, season: &str| {
            stats
                .iter()
                .find(|s| s.player == player && s.scryfall_id == id && s.season_id == season)
                .unwrap()
        };

        let alice_s1 = find("Alice", "card1", "S1");
        assert_eq!(alice_s1.num_drafts_with_card, 2);
        assert_eq!(alice_s1.matches_played, 2);
        assert_eq!(alice_s1.matches_won, 1);
        assert_eq!(alice_s1.games_won, 3);
        assert_eq!(alice_s1.games_played, 5);
        assert_eq!(alice_s1.game_win_rate, Some(0.6));

        let alice_s2 = find("Alice", "card1", "S2");
        assert_eq!(alice_s2.num_drafts_with_card, 1);
        assert_eq!(alice_s2.match_win_rate, Some(1.0));

        let bob = find("Bob", "card2", "S1");
        assert_eq!(bob.matches_won, 1);
        assert_eq!(bob.games_won, 2);

        // card9 never reached a match
        assert!(stats.iter().all(|s| s.scryfall_id != "card9"));
        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].player, "Alice");
    }

    #[test]
    fn test_most_picked_card() {
        let cards = vec![
            card("S4", "20240922", "Guy", "23b9"),
            card("S4", "20240922", "Guy", "a7a8"),
            card("S4", "20240923", "Alice", "a7a8"),
            card("S4", "20240923", "Alice", "a7a8"),
            card("S4", "20240924", "Bob", "a7a8"),
            card("S4", "20240924", "Bob", "23b9"),
            card("S4", "20240925", "Bob", "a7a8"),
        ];
        let most = most_picked_card_by_player(&cards);

        assert_eq!(
            most,
            vec![
                MostPickedCard {
                    player: "Alice".to_string(),
                    scryfall_id: "a7a8".to_string(),
                    pick_count: 2,
                },
                MostPickedCard {
                    player: "Bob".to_string(),
                    scryfall_id: "a7a8".to_string(),
                    pick_count: 2,
                },
                MostPickedCard {
                    player: "Guy".to_string(),
                    scryfall_id: "23b9".to_string(),
                    pick_count: 1,
                },
            ]
        );
    }
}
