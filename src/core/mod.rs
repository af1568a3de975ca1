//! Core engine types: ids, seats, RNG, configuration and classifications.
//!
//! Nothing in here knows about events or combat; the rest of the crate
//! builds on these types.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod constants;

pub use entity::{CardId, EntityId};
pub use player::{PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{MatchConfig, DECK_SIZE};
pub use constants::{CharacterClass, MinionType, Rarity};
