//! Identifiers for game objects.
//!
//! ## ID Layout
//!
//! - [`EntityId`]: every combatant (heroes and minions) shares one id space,
//!   allocated by the `Game` in creation order. The two heroes are created
//!   first, so they always hold ids 0 and 1.
//! - [`CardId`]: every card instance in the match. Card identity, for
//!   example when a card is put back into its deck, is `CardId` equality.
//!
//! ```
//! use hearth_engine::core::{CardId, EntityId};
//!
//! let hero = EntityId(0);
//! let minion = EntityId(7);
//! assert!(hero.is_hero());
//! assert!(!minion.is_hero());
//! assert_eq!(format!("{}", CardId(3)), "Card(3)");
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a combatant (hero or minion).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Number of ids reserved for heroes.
    pub const HERO_COUNT: u32 = 2;

    /// Check whether this id belongs to one of the two heroes.
    #[must_use]
    pub const fn is_hero(self) -> bool {
        self.0 < Self::HERO_COUNT
    }

    /// First id available for minions.
    #[must_use]
    pub const fn first_minion() -> u32 {
        Self::HERO_COUNT
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Unique identifier for a card instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub u32);

impl CardId {
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Card({})", self.0)
    }
}
