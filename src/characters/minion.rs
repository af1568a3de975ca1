//! Minions.
//!
//! A [`Minion`] is built with a small builder and handed to
//! `Game::add_to_board` (usually through a minion card). Once on the board it
//! lives in the game arena under its [`EntityId`].
//!
//! ```
//! use hearth_engine::characters::{Combatant, Minion};
//! use hearth_engine::core::MinionType;
//!
//! let wolf = Minion::new(1, 1)
//!     .with_name("Timber Wolf")
//!     .with_type(MinionType::Beast)
//!     .taunt();
//! assert!(wolf.taunt);
//! assert_eq!(wolf.attack_total(), 1);
//! ```

use smallvec::SmallVec;
use std::fmt;
use std::rc::Rc;

use super::combatant::{CombatStats, Combatant};
use crate::core::{CardId, EntityId, MinionType, PlayerId};
use crate::error::Result;
use crate::events::{EventBus, HandlerId};
use crate::game::Game;

/// Battlecry, deathrattle and adjacency hooks receive the minion they belong to
/// (or, for adjacency, the neighbour being affected).
pub type MinionHook = Rc<dyn Fn(&mut Game, EntityId) -> Result<()>>;

/// An effect a minion applies to the minions directly beside it.
pub(crate) struct AdjacencyAura {
    pub(crate) apply: MinionHook,
    pub(crate) remove: MinionHook,
    /// Neighbours currently carrying the effect.
    pub(crate) affected: SmallVec<[EntityId; 2]>,
}

/// Game-bus and self-bus handlers that keep adjacency auras current.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AdjacencyHandlers {
    pub(crate) added: HandlerId,
    pub(crate) removed: HandlerId,
    pub(crate) silenced: HandlerId,
}

pub struct Minion {
    pub(crate) id: EntityId,
    pub(crate) owner: PlayerId,
    pub name: String,
    pub stats: CombatStats,
    /// Position on the owner's board, kept dense by the game.
    pub index: usize,
    pub minion_type: MinionType,
    pub taunt: bool,
    pub charge: bool,
    pub divine_shield: bool,
    pub spell_power: i32,
    /// Card this minion was played from.
    pub card: Option<CardId>,
    pub(crate) battlecry: Option<MinionHook>,
    pub(crate) deathrattle: Option<MinionHook>,
    pub(crate) adjacency: Vec<AdjacencyAura>,
    pub(crate) adjacency_handlers: Option<AdjacencyHandlers>,
    pub(crate) turn_handler: Option<HandlerId>,
    pub(crate) bus: EventBus<Game>,
}

impl Minion {
    /// A vanilla minion, not yet on any board.
    #[must_use]
    pub fn new(attack: i32, health: i32) -> Self {
        Self {
            id: EntityId(u32::MAX),
            owner: PlayerId::FIRST,
            name: String::new(),
            stats: CombatStats::new(attack, health),
            index: 0,
            minion_type: MinionType::None,
            taunt: false,
            charge: false,
            divine_shield: false,
            spell_power: 0,
            card: None,
            battlecry: None,
            deathrattle: None,
            adjacency: Vec::new(),
            adjacency_handlers: None,
            turn_handler: None,
            bus: EventBus::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    #[must_use]
    pub fn with_type(mut self, minion_type: MinionType) -> Self {
        self.minion_type = minion_type;
        self
    }

    #[must_use]
    pub fn taunt(mut self) -> Self {
        self.taunt = true;
        self
    }

    #[must_use]
    pub fn charge(mut self) -> Self {
        self.charge = true;
        self
    }

    #[must_use]
    pub fn divine_shield(mut self) -> Self {
        self.divine_shield = true;
        self
    }

    #[must_use]
    pub fn wind_fury(mut self) -> Self {
        self.stats.wind_fury = true;
        self
    }

    #[must_use]
    pub fn stealth(mut self) -> Self {
        self.stats.stealth = true;
        self
    }

    #[must_use]
    pub fn with_spell_power(mut self, amount: i32) -> Self {
        self.spell_power = amount;
        self
    }

    /// Run `effect` when the minion is played, after it reaches the board.
    #[must_use]
    pub fn with_battlecry(
        mut self,
        effect: impl Fn(&mut Game, EntityId) -> Result<()> + 'static,
    ) -> Self {
        self.battlecry = Some(Rc::new(effect));
        self
    }

    /// Run `effect` when the minion dies, before it leaves the board.
    #[must_use]
    pub fn with_deathrattle(
        mut self,
        effect: impl Fn(&mut Game, EntityId) -> Result<()> + 'static,
    ) -> Self {
        self.deathrattle = Some(Rc::new(effect));
        self
    }

    #[must_use]
    pub fn has_battlecry(&self) -> bool {
        self.battlecry.is_some()
    }

    #[must_use]
    pub fn has_deathrattle(&self) -> bool {
        self.deathrattle.is_some()
    }

    /// Neighbours currently affected by this minion's adjacency auras.
    #[must_use]
    pub fn adjacent_affected(&self) -> Vec<EntityId> {
        let mut out: Vec<EntityId> = Vec::new();
        for aura in &self.adjacency {
            for id in &aura.affected {
                if !out.contains(id) {
                    out.push(*id);
                }
            }
        }
        out
    }
}

impl fmt::Debug for Minion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Minion")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("name", &self.name)
            .field("index", &self.index)
            .field("stats", &self.stats)
            .field("taunt", &self.taunt)
            .field("charge", &self.charge)
            .field("divine_shield", &self.divine_shield)
            .field("spell_power", &self.spell_power)
            .field("battlecry", &self.battlecry.is_some())
            .field("deathrattle", &self.deathrattle.is_some())
            .finish_non_exhaustive()
    }
}

impl Combatant for Minion {
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

    fn can_be_attacked(&self) -> bool {
        !self.stats.stealth
    }

    fn spell_targetable(&self) -> bool {
        !self.stats.stealth
    }
}
