//! Event payloads.
//!
//! Every reactive entity (the game, each player, each hero and minion) owns
//! an [`EventBus`](super::EventBus). Events are fired on a specific bus; the
//! variant documents which owner fires it.
//!
//! [`EventKind`] is the payload-free mirror of [`Event`] and is what
//! handlers are registered under.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{CardId, EntityId, PlayerId};

/// What dealt a point of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DamageSource {
    /// A hero or minion (attacks, battlecries, hero powers).
    Character(EntityId),
    /// A player directly, outside of any character.
    Player(PlayerId),
    /// A spell card.
    Card(CardId),
    /// Drawing from an empty deck.
    Fatigue,
}

impl DamageSource {
    #[must_use]
    pub fn character(self) -> Option<EntityId> {
        match self {
            DamageSource::Character(id) => Some(id),
            _ => None,
        }
    }
}

/// A game event with its payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    // === Character bus ===
    /// Delayed: flushed with the other damage of the same step.
    Damaged { amount: i32, source: DamageSource },
    /// Fired immediately on damage so secrets can react before anything else.
    SecretDamaged { amount: i32, source: DamageSource },
    /// Fired on the dealer (delayed for minions, immediate for heroes and players).
    DidDamage { amount: i32, target: EntityId },
    PhysicallyDamaged { amount: i32, attacker: EntityId },
    SpellDamaged { amount: i32, card: CardId },
    /// Physical damage dealt by a minion.
    MinionDamaged { amount: i32, attacker: EntityId },
    /// Physical damage dealt by a hero.
    PlayerDamaged { amount: i32, attacker: EntityId },
    Healed { amount: i32 },
    AttackIncreased { amount: i32 },
    AttackDecreased { amount: i32 },
    HealthIncreased { amount: i32 },
    HealthDecreased { amount: i32 },
    ArmourIncreased { amount: i32 },
    Silenced,
    /// Delayed: fired at the flush after the character died.
    Died { by: DamageSource },
    /// Also fired on the player bus of the attacker's owner.
    Attacking { attacker: EntityId },
    AttackMinion { target: EntityId },
    AttackPlayer { target: EntityId },
    Attacked { attacker: EntityId },
    AddedToBoard { minion: EntityId, index: usize },
    FoundPowerTarget { target: EntityId },
    WeaponEquipped { attack: i32, durability: i32 },
    WeaponDestroyed,

    // === Player bus ===
    TurnStarted,
    TurnEnded,
    CardDrawn { card: CardId },
    /// A card drawn into a full hand.
    CardDestroyed { card: CardId },
    CardPutBack { card: CardId },
    FatigueDamage { amount: i32 },
    CardPlayed { card: CardId },
    SpellCast { card: CardId },
    CardUsed { card: CardId },
    SecretRevealed { card: CardId },
    PowerUsed,

    // === Game bus ===
    MinionAdded { minion: EntityId },
    MinionRemoved { minion: EntityId },
    MinionDied { minion: EntityId, by: DamageSource },
    KeptCards { player: PlayerId, kept: Vec<bool> },
    GameOver { loser: PlayerId },
}

/// Registry key for handlers: one per [`Event`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Damaged,
    SecretDamaged,
    DidDamage,
    PhysicallyDamaged,
    SpellDamaged,
    MinionDamaged,
    PlayerDamaged,
    Healed,
    AttackIncreased,
    AttackDecreased,
    HealthIncreased,
    HealthDecreased,
    ArmourIncreased,
    Silenced,
    Died,
    Attacking,
    AttackMinion,
    AttackPlayer,
    Attacked,
    AddedToBoard,
    FoundPowerTarget,
    WeaponEquipped,
    WeaponDestroyed,
    TurnStarted,
    TurnEnded,
    CardDrawn,
    CardDestroyed,
    CardPutBack,
    FatigueDamage,
    CardPlayed,
    SpellCast,
    CardUsed,
    SecretRevealed,
    PowerUsed,
    MinionAdded,
    MinionRemoved,
    MinionDied,
    KeptCards,
    GameOver,
}

impl Event {
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Damaged { .. } => EventKind::Damaged,
            Event::SecretDamaged { .. } => EventKind::SecretDamaged,
            Event::DidDamage { .. } => EventKind::DidDamage,
            Event::PhysicallyDamaged { .. } => EventKind::PhysicallyDamaged,
            Event::SpellDamaged { .. } => EventKind::SpellDamaged,
            Event::MinionDamaged { .. } => EventKind::MinionDamaged,
            Event::PlayerDamaged { .. } => EventKind::PlayerDamaged,
            Event::Healed { .. } => EventKind::Healed,
            Event::AttackIncreased { .. } => EventKind::AttackIncreased,
            Event::AttackDecreased { .. } => EventKind::AttackDecreased,
            Event::HealthIncreased { .. } => EventKind::HealthIncreased,
            Event::HealthDecreased { .. } => EventKind::HealthDecreased,
            Event::ArmourIncreased { .. } => EventKind::ArmourIncreased,
            Event::Silenced => EventKind::Silenced,
            Event::Died { .. } => EventKind::Died,
            Event::Attacking { .. } => EventKind::Attacking,
            Event::AttackMinion { .. } => EventKind::AttackMinion,
            Event::AttackPlayer { .. } => EventKind::AttackPlayer,
            Event::Attacked { .. } => EventKind::Attacked,
            Event::AddedToBoard { .. } => EventKind::AddedToBoard,
            Event::FoundPowerTarget { .. } => EventKind::FoundPowerTarget,
            Event::WeaponEquipped { .. } => EventKind::WeaponEquipped,
            Event::WeaponDestroyed => EventKind::WeaponDestroyed,
            Event::TurnStarted => EventKind::TurnStarted,
            Event::TurnEnded => EventKind::TurnEnded,
            Event::CardDrawn { .. } => EventKind::CardDrawn,
            Event::CardDestroyed { .. } => EventKind::CardDestroyed,
            Event::CardPutBack { .. } => EventKind::CardPutBack,
            Event::FatigueDamage { .. } => EventKind::FatigueDamage,
            Event::CardPlayed { .. } => EventKind::CardPlayed,
            Event::SpellCast { .. } => EventKind::SpellCast,
            Event::CardUsed { .. } => EventKind::CardUsed,
            Event::SecretRevealed { .. } => EventKind::SecretRevealed,
            Event::PowerUsed => EventKind::PowerUsed,
            Event::MinionAdded { .. } => EventKind::MinionAdded,
            Event::MinionRemoved { .. } => EventKind::MinionRemoved,
            Event::MinionDied { .. } => EventKind::MinionDied,
            Event::KeptCards { .. } => EventKind::KeptCards,
            Event::GameOver { .. } => EventKind::GameOver,
        }
    }

    /// Damage amount for the damage family of events.
    #[must_use]
    pub fn amount(&self) -> Option<i32> {
        match *self {
            Event::Damaged { amount, .. }
            | Event::SecretDamaged { amount, .. }
            | Event::DidDamage { amount, .. }
            | Event::PhysicallyDamaged { amount, .. }
            | Event::SpellDamaged { amount, .. }
            | Event::MinionDamaged { amount, .. }
            | Event::PlayerDamaged { amount, .. }
            | Event::Healed { amount }
            | Event::AttackIncreased { amount }
            | Event::AttackDecreased { amount }
            | Event::HealthIncreased { amount }
            | Event::HealthDecreased { amount }
            | Event::ArmourIncreased { amount }
            | Event::FatigueDamage { amount } => Some(amount),
            _ => None,
        }
    }
}

/// State captured when a handler is bound. Passed to the callback after the
/// event payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundArg {
    Entity(EntityId),
    Card(CardId),
    Player(PlayerId),
    Int(i32),
}

impl BoundArg {
    #[must_use]
    pub fn entity(self) -> Option<EntityId> {
        match self {
            BoundArg::Entity(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn card(self) -> Option<CardId> {
        match self {
            BoundArg::Card(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn player(self) -> Option<PlayerId> {
        match self {
            BoundArg::Player(id) => Some(id),
            _ => None,
        }
    }

    #[must_use]
    pub fn int(self) -> Option<i32> {
        match self {
            BoundArg::Int(v) => Some(v),
            _ => None,
        }
    }
}

pub type BoundArgs = SmallVec<[BoundArg; 2]>;
