//! Playable cards.
//!
//! A [`Card`] is one physical card in a match. Its behaviour is a
//! [`CardKind`]: spells run an effect, minion cards create a minion for the
//! board, secrets sit hidden until their trigger fires, and weapon cards
//! arm the hero.
//!
//! ## Example
//!
//! ```
//! use hearth_engine::cards::{targeting, Card};
//! use hearth_engine::core::{CharacterClass, Rarity};
//!
//! let bolt = Card::spell("Frostbolt", 2, |game, _player, card| {
//!     let target = game.card(card).target.expect("targeted spell");
//!     game.spell_damage(target, 3, card)?;
//!     game.freeze(target);
//!     Ok(())
//! })
//! .with_class(CharacterClass::Mage)
//! .with_rarity(Rarity::Common)
//! .with_targeting(targeting::spell_targets, targeting::spell_targetable);
//!
//! assert!(bolt.is_spell());
//! assert!(bolt.is_targetable());
//! ```

use std::fmt;
use std::rc::Rc;

use crate::characters::{Character, Minion, Weapon};
use crate::core::{CardId, CharacterClass, EntityId, PlayerId, Rarity};
use crate::error::Result;
use crate::game::{Game, Player};

/// Predicate over candidate targets.
pub type TargetFilter = fn(&Character) -> bool;

/// Produces the candidate target list for a card, relative to the current
/// player. `None` means the card needs no target this time.
pub type TargetFinder = fn(&Game, TargetFilter) -> Option<Vec<EntityId>>;

/// Effect run when a card is used: game, owning player, the card itself.
pub type CardEffect = Rc<dyn Fn(&mut Game, PlayerId, CardId) -> Result<()>>;

/// Builds a fresh minion for the given owner.
pub type MinionFactory = Rc<dyn Fn(PlayerId) -> Minion>;

/// Builds a fresh weapon for the given owner.
pub type WeaponFactory = Rc<dyn Fn(PlayerId) -> Weapon>;

#[derive(Clone, Copy)]
pub struct Targeting {
    pub finder: TargetFinder,
    pub filter: TargetFilter,
}

impl fmt::Debug for Targeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Targeting")
    }
}

/// What a card does when used.
#[derive(Clone)]
pub enum CardKind {
    Spell {
        effect: CardEffect,
    },
    Minion {
        create: MinionFactory,
    },
    /// Hidden until revealed. `activate` runs at the start of each opposing
    /// turn and `deactivate` at its end, so the secret only listens while
    /// the opponent acts.
    Secret {
        activate: CardEffect,
        deactivate: CardEffect,
    },
    Weapon {
        create: WeaponFactory,
    },
}

impl fmt::Debug for CardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CardKind::Spell { .. } => "Spell",
            CardKind::Minion { .. } => "Minion",
            CardKind::Secret { .. } => "Secret",
            CardKind::Weapon { .. } => "Weapon",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug)]
pub struct Card {
    pub name: String,
    /// Printed mana cost, before filters.
    pub mana: i32,
    pub class: CharacterClass,
    pub rarity: Rarity,
    pub kind: CardKind,
    pub targeting: Option<Targeting>,
    /// Candidates computed by the last usability check.
    pub targets: Option<Vec<EntityId>>,
    /// Target chosen when the card was used.
    pub target: Option<EntityId>,
    /// Set by a reaction to stop the card from taking effect.
    pub cancel: bool,
    /// Player a played secret belongs to.
    pub owner: Option<PlayerId>,
}

impl Card {
    fn with_kind(name: impl Into<String>, mana: i32, kind: CardKind) -> Self {
        Self {
            name: name.into(),
            mana,
            class: CharacterClass::All,
            rarity: Rarity::Free,
            kind,
            targeting: None,
            targets: None,
            target: None,
            cancel: false,
            owner: None,
        }
    }

    #[must_use]
    pub fn spell(
        name: impl Into<String>,
        mana: i32,
        effect: impl Fn(&mut Game, PlayerId, CardId) -> Result<()> + 'static,
    ) -> Self {
        Self::with_kind(name, mana, CardKind::Spell { effect: Rc::new(effect) })
    }

    #[must_use]
    pub fn minion(
        name: impl Into<String>,
        mana: i32,
        create: impl Fn(PlayerId) -> Minion + 'static,
    ) -> Self {
        Self::with_kind(name, mana, CardKind::Minion { create: Rc::new(create) })
    }

    #[must_use]
    pub fn secret(
        name: impl Into<String>,
        mana: i32,
        activate: impl Fn(&mut Game, PlayerId, CardId) -> Result<()> + 'static,
        deactivate: impl Fn(&mut Game, PlayerId, CardId) -> Result<()> + 'static,
    ) -> Self {
        Self::with_kind(
            name,
            mana,
            CardKind::Secret {
                activate: Rc::new(activate),
                deactivate: Rc::new(deactivate),
            },
        )
    }

    #[must_use]
    pub fn weapon(
        name: impl Into<String>,
        mana: i32,
        create: impl Fn(PlayerId) -> Weapon + 'static,
    ) -> Self {
        Self::with_kind(name, mana, CardKind::Weapon { create: Rc::new(create) })
    }

    #[must_use]
    pub fn with_class(mut self, class: CharacterClass) -> Self {
        self.class = class;
        self
    }

    #[must_use]
    pub fn with_rarity(mut self, rarity: Rarity) -> Self {
        self.rarity = rarity;
        self
    }

    #[must_use]
    pub fn with_targeting(mut self, finder: TargetFinder, filter: TargetFilter) -> Self {
        self.targeting = Some(Targeting { finder, filter });
        self
    }

    /// Spells and secrets are spells; minions and weapons are not.
    #[must_use]
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, CardKind::Spell { .. } | CardKind::Secret { .. })
    }

    #[must_use]
    pub fn is_secret(&self) -> bool {
        matches!(self.kind, CardKind::Secret { .. })
    }

    #[must_use]
    pub fn is_targetable(&self) -> bool {
        self.targeting.is_some()
    }

    /// Cost after the player's mana filters.
    ///
    /// Filters apply in order; the first one whose floor is crossed returns
    /// its floor without consulting the rest.
    #[must_use]
    pub fn mana_cost(&self, player: &Player) -> i32 {
        let mut cost = self.mana;
        for filter in &player.mana_filters {
            if (filter.filter)(self) {
                cost -= filter.amount;
                if cost < filter.min {
                    return filter.min;
                }
            }
        }
        cost
    }
}

/// A cost modifier held by a player.
#[derive(Clone)]
pub struct ManaFilter {
    /// Mana subtracted from matching cards (negative raises the cost).
    pub amount: i32,
    /// The cost never drops below this.
    pub min: i32,
    pub filter: Rc<dyn Fn(&Card) -> bool>,
}

impl ManaFilter {
    #[must_use]
    pub fn new(amount: i32, min: i32, filter: impl Fn(&Card) -> bool + 'static) -> Self {
        Self {
            amount,
            min,
            filter: Rc::new(filter),
        }
    }

    /// Applies to every card.
    #[must_use]
    pub fn all(amount: i32, min: i32) -> Self {
        Self::new(amount, min, |_| true)
    }
}

impl fmt::Debug for ManaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManaFilter")
            .field("amount", &self.amount)
            .field("min", &self.min)
            .finish_non_exhaustive()
    }
}
