//! Card and character classification.

use serde::{Deserialize, Serialize};

/// Hero class. `All` marks neutral cards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterClass {
    All,
    Mage,
    Hunter,
    Shaman,
    Warrior,
    Druid,
    Priest,
    Paladin,
    Rogue,
    Warlock,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Free,
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Tribe tag carried by minions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MinionType {
    #[default]
    None,
    Beast,
    Murloc,
    Dragon,
    Totem,
    Mech,
    Pirate,
    Demon,
}
