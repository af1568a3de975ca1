//! Cards, decks and targeting.
//!
//! ## Key Types
//!
//! - [`Card`]: one card in a match, its behaviour given by a [`CardKind`]
//! - [`ManaFilter`]: a player-held cost modifier
//! - [`Deck`]: the 30 card ids a player draws from
//! - [`DeckList`]: the cards a player brings to a match
//!
//! Cards are owned by the game and referred to by `CardId`.

pub mod card;
pub mod deck;
pub mod targeting;

pub use card::{
    Card, CardEffect, CardKind, ManaFilter, MinionFactory, TargetFilter, TargetFinder, Targeting,
    WeaponFactory,
};
pub use deck::{Deck, DeckList};
