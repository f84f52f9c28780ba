pub mod decks;
pub mod loader;
pub mod types;

pub use decks::DeckIndex;
pub use loader::{DataLoader, LeagueTables, LoaderError};
pub use types::{
    ChangeType, CubeChange, DeckClass, DeckRecord, DraftEvent, DraftedCard, MainboardCard,
    MatchOutcome, MatchRecord, MatchSide,
};
