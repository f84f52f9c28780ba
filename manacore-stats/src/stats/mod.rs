//! Win-rate statistics.
//!
//! Pure aggregations over loaded tables:
//! - Player game win rate per archetype and per deck type
//! - Player overall game and match win rates
//! - Head-to-head records per ordered pair of players
//! - Archetype and deck type records per season
//! - Card mainboard rates and card win rates per season
//! - Per-player card records and most picked cards
//!
//! Every function takes its inputs by reference and returns fresh rows
//! sorted by grouping key.

pub mod card;
pub mod deck;
pub mod player;
pub mod record;

pub use card::{
    card_mainboard_rate, card_winrates, most_picked_card_by_player, player_card_winrates,
    CardMainboardRate, CardWinrate, MostPickedCard, PlayerCardWinrate,
};
pub use deck::{archetype_season_stats, decktype_season_stats, DeckSeasonStats};
pub use player::{
    player_archetype_game_winrate, player_decktype_game_winrate, player_game_and_match_stats,
    vs_player_stats, HeadToHeadStats, PlayerDeckStats, PlayerStats,
};
pub use record::{win_rate, WinRecord};
