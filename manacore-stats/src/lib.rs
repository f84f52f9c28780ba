pub mod availability;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;
pub mod validation;

// Re-export commonly used types
pub use availability::{build_availability_map, AvailabilityMap};
pub use config::StatsConfig;
pub use data::{DataLoader, DeckIndex, LeagueTables, MatchRecord};
pub use report::Report;
pub use stats::{
    player_archetype_game_winrate, player_decktype_game_winrate, player_game_and_match_stats,
    vs_player_stats,
};
pub use validation::DataIntegrityValidator;
