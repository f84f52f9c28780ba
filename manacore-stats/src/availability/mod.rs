//! Card availability module.
//!
//! Maps each draft event to the cards that were in the cube when it was
//! held. Card-level statistics only count a card at drafts where it was
//! available.

pub mod map;

pub use map::{build_availability_map, AvailabilityMap};
