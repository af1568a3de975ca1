//! Heroes and their weapons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::rc::Rc;

use super::combatant::{CombatStats, Combatant};
use crate::core::{CardId, CharacterClass, EntityId, PlayerId};
use crate::events::EventBus;
use crate::game::Game;
use crate::powers::{power_for, Power};

/// A weapon wielded by a hero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub attack: i32,
    /// Attacks left before the weapon breaks.
    pub durability: i32,
    /// Card the weapon was played from, if any.
    pub card: Option<CardId>,
}

impl Weapon {
    #[must_use]
    pub fn new(name: impl Into<String>, attack: i32, durability: i32) -> Self {
        Self {
            name: name.into(),
            attack,
            durability,
            card: None,
        }
    }
}

/// A player's hero.
pub struct Hero {
    pub(crate) id: EntityId,
    pub(crate) owner: PlayerId,
    pub stats: CombatStats,
    pub armour: i32,
    pub weapon: Option<Weapon>,
    pub class: CharacterClass,
    pub(crate) power: Rc<dyn Power>,
    pub(crate) bus: EventBus<Game>,
}

impl Hero {
    /// Create an active hero at full health with its class power.
    #[must_use]
    pub fn new(id: EntityId, owner: PlayerId, class: CharacterClass, health: i32) -> Self {
        let mut stats = CombatStats::new(0, health);
        stats.active = true;
        Self {
            id,
            owner,
            stats,
            armour: 0,
            weapon: None,
            class,
            power: power_for(class),
            bus: EventBus::new(),
        }
    }

    #[must_use]
    pub fn power(&self) -> &Rc<dyn Power> {
        &self.power
    }
}

impl fmt::Debug for Hero {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hero")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("class", &self.class)
            .field("stats", &self.stats)
            .field("armour", &self.armour)
            .field("weapon", &self.weapon)
            .field("power", &self.power.name())
            .finish_non_exhaustive()
    }
}

impl Combatant for Hero {
    fn id(&self) -> EntityId {
        self.id
    }

    fn owner(&self) -> PlayerId {
        self.owner
    }

    fn stats(&self) -> &CombatStats {
        &self.stats
    }

    fn stats_mut(&mut self) -> &mut CombatStats {
        &mut self.stats
    }

    fn bus_mut(&mut self) -> &mut EventBus<Game> {
        &mut self.bus
    }

    fn attack_total(&self) -> i32 {
        let weapon = self.weapon.as_ref().map_or(0, |w| w.attack);
        self.stats.attack_power + self.stats.temp_attack + weapon
    }
}
