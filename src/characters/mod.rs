//! Heroes and minions.
//!
//! Both kinds share [`CombatStats`] and the [`Combatant`] capability; the
//! game arena stores them as [`Character`] values keyed by `EntityId`.

pub mod combatant;
pub mod hero;
pub mod minion;

pub use combatant::{Character, CombatStats, Combatant};
pub use hero::{Hero, Weapon};
pub use minion::{Minion, MinionHook};
