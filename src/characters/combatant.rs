//! State and capabilities shared by heroes and minions.
//!
//! The mutating operations (damage, heal, silence, death, attacking) live on
//! `Game`, because every one of them fires events whose handlers may touch
//! any part of the match. This module holds the plain state and the
//! read-only rules derived from it.

use serde::{Deserialize, Serialize};

use super::hero::Hero;
use super::minion::Minion;
use crate::core::{EntityId, PlayerId};
use crate::events::{Event, EventBus};
use crate::game::Game;

/// Health, attack and status flags of a combatant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack_power: i32,
    /// Attack bonus that expires at the end of the owner's turn.
    pub temp_attack: i32,
    pub health: i32,
    pub max_health: i32,
    /// May attack this turn.
    pub active: bool,
    pub dead: bool,
    pub frozen: bool,
    /// Frozen during the current turn; thaws one end-of-turn later.
    pub frozen_this_turn: bool,
    pub stealth: bool,
    pub immune: bool,
    pub wind_fury: bool,
    pub used_wind_fury: bool,
    /// Events scheduled but not yet dispatched, in scheduling order.
    pub delayed: Vec<Event>,
}

impl CombatStats {
    #[must_use]
    pub fn new(attack_power: i32, health: i32) -> Self {
        Self {
            attack_power,
            temp_attack: 0,
            health,
            max_health: health,
            active: false,
            dead: false,
            frozen: false,
            frozen_this_turn: false,
            stealth: false,
            immune: false,
            wind_fury: false,
            used_wind_fury: false,
            delayed: Vec::new(),
        }
    }
}

/// Capability shared by every character that can deal and receive damage.
pub trait Combatant {
    fn id(&self) -> EntityId;

    fn owner(&self) -> PlayerId;

    fn stats(&self) -> &CombatStats;

    fn stats_mut(&mut self) -> &mut CombatStats;

    fn bus_mut(&mut self) -> &mut EventBus<Game>;

    /// Attack value used in combat.
    fn attack_total(&self) -> i32 {
        self.stats().attack_power + self.stats().temp_attack
    }

    fn can_attack(&self) -> bool {
        let stats = self.stats();
        self.attack_total() > 0 && stats.active && !stats.frozen
    }

    fn can_be_attacked(&self) -> bool {
        true
    }

    fn spell_targetable(&self) -> bool {
        true
    }
}

/// A character stored in the game arena.
#[derive(Debug)]
pub enum Character {
    Hero(Hero),
    Minion(Minion),
}

impl Character {
    #[must_use]
    pub fn is_minion(&self) -> bool {
        matches!(self, Character::Minion(_))
    }

    #[must_use]
    pub fn as_hero(&self) -> Option<&Hero> {
        match self {
            Character::Hero(hero) => Some(hero),
            Character::Minion(_) => None,
        }
    }

    pub fn as_hero_mut(&mut self) -> Option<&mut Hero> {
        match self {
            Character::Hero(hero) => Some(hero),
            Character::Minion(_) => None,
        }
    }

    #[must_use]
    pub fn as_minion(&self) -> Option<&Minion> {
        match self {
            Character::Minion(minion) => Some(minion),
            Character::Hero(_) => None,
        }
    }

    pub fn as_minion_mut(&mut self) -> Option<&mut Minion> {
        match self {
            Character::Minion(minion) => Some(minion),
            Character::Hero(_) => None,
        }
    }

    fn inner(&self) -> &dyn Combatant {
        match self {
            Character::Hero(hero) => hero,
            Character::Minion(minion) => minion,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Combatant {
        match self {
            Character::Hero(hero) => hero,
            Character::Minion(minion) => minion,
        }
    }
}

impl Combatant for Character {
    fn id(&self) -> EntityId {
        self.inner().id()
    }

    fn owner(&self) -> PlayerId {
        self.inner().owner()
    }

    fn stats(&self) -> &CombatStats {
        self.inner().stats()
    }

    fn stats_mut(&mut self) -> &mut CombatStats {
        self.inner_mut().stats_mut()
    }

    fn bus_mut(&mut self) -> &mut EventBus<Game> {
        self.inner_mut().bus_mut()
    }

    fn attack_total(&self) -> i32 {
        self.inner().attack_total()
    }

    fn can_attack(&self) -> bool {
        self.inner().can_attack()
    }

    fn can_be_attacked(&self) -> bool {
        self.inner().can_be_attacked()
    }

    fn spell_targetable(&self) -> bool {
        self.inner().spell_targetable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CharacterClass;

    #[test]
    fn test_new_stats() {
        let stats = CombatStats::new(3, 2);
        assert_eq!(stats.max_health, 2);
        assert!(!stats.active);
        assert_eq!(stats.health, stats.max_health);
        assert!(stats.delayed.is_empty());
    }

    #[test]
    fn test_can_attack_rules() {
        let mut minion = Minion::new(2, 2);
        assert!(!minion.can_attack(), "summoning sick");

        minion.stats.active = true;
        assert!(minion.can_attack());

        minion.stats.frozen = true;
        assert!(!minion.can_attack());

        minion.stats.frozen = false;
        minion.stats.attack_power = 0;
        assert!(!minion.can_attack());

        minion.stats.temp_attack = 1;
        assert!(minion.can_attack());
    }

    #[test]
    fn test_character_dispatch() {
        let hero = Character::Hero(Hero::new(EntityId(0), PlayerId::FIRST, CharacterClass::Mage, 30));
        assert!(!hero.is_minion());
        assert!(hero.can_be_attacked());
        assert_eq!(hero.stats().health, 30);
        assert_eq!(hero.owner(), PlayerId::FIRST);

        let mut stealthy = Minion::new(1, 1).stealth();
        stealthy.stats.active = true;
        let minion = Character::Minion(stealthy);
        assert!(minion.is_minion());
        assert!(!minion.can_be_attacked());
        assert!(!minion.spell_targetable());
        assert!(minion.can_attack());
    }

    #[test]
    fn test_stats_serialization() {
        let mut stats = CombatStats::new(1, 5);
        stats.delayed.push(Event::Silenced);
        let json = serde_json::to_string(&stats).unwrap();
        let back: CombatStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, back);
    }
}
