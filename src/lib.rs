//! # hearth-engine
//!
//! An event-driven rules engine for two-player minion card games: heroes,
//! minions with keywords, spells, secrets, weapons and hero powers.
//!
//! ## Design Principles
//!
//! 1. **Events Over References**: Game objects react to each other through
//!    per-entity event buses. A card effect subscribes to what it cares
//!    about; nothing holds a pointer to anything else.
//!
//! 2. **Arena Ownership**: `Game` owns every hero, minion and card. Everything
//!    else refers to them by `EntityId` or `CardId`.
//!
//! 3. **Deterministic**: One seeded RNG drives every random choice, so a seed
//!    and a pair of agents reproduce a match exactly.
//!
//! ## Modules
//!
//! - `core`: ids, seats, RNG, configuration, classifications
//! - `events`: event payloads and the event bus
//! - `characters`: heroes, minions and shared combat state
//! - `cards`: cards, mana filters, decks and targeting
//! - `powers`: hero powers
//! - `game`: the match, turn loop and every rules operation
//! - `agents`: built-in decision makers

pub mod core;
pub mod error;
pub mod events;
pub mod characters;
pub mod cards;
pub mod powers;
pub mod game;
pub mod agents;

// Re-export commonly used types
pub use crate::core::{
    CardId, CharacterClass, EntityId, GameRng, GameRngState, MatchConfig, MinionType, PlayerId,
    PlayerMap, Rarity, DECK_SIZE,
};

pub use crate::error::{GameError, Result};

pub use crate::events::{
    BoundArg, BusHost, Callback, DamageSource, Event, EventBus, EventKind, HandlerId,
};

pub use crate::characters::{Character, CombatStats, Combatant, Hero, Minion, Weapon};

pub use crate::cards::{Card, CardKind, Deck, DeckList, ManaFilter};

pub use crate::powers::{power_for, Power};

pub use crate::game::{Agent, Emitter, Game, MatchPhase, Player};

pub use crate::agents::{DoNothingAgent, PredictableAgent};
