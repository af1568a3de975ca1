//! Match configuration.
//!
//! `MatchConfig::default()` gives the standard rules: 10 card hand limit,
//! 10 mana cap, 3 and 4 card opening hands, 30 health heroes and 2 mana hero
//! powers. Builders override individual values, mostly for tests.

use serde::{Deserialize, Serialize};

/// Number of cards in every deck.
pub const DECK_SIZE: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Seed for the match RNG.
    pub seed: u64,

    /// Cards a hand can hold; further draws are burned.
    pub hand_limit: usize,

    /// Maximum mana crystals.
    pub mana_cap: i32,

    /// Opening hand of the player who moves first.
    pub first_hand: usize,

    /// Opening hand of the player who moves second.
    pub second_hand: usize,

    /// Starting (and maximum) hero health.
    pub hero_health: i32,

    /// Mana cost of a hero power.
    pub power_cost: i32,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            hand_limit: 10,
            mana_cap: 10,
            first_hand: 3,
            second_hand: 4,
            hero_health: 30,
            power_cost: 2,
        }
    }
}

impl MatchConfig {
    /// Standard rules with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.hand_limit = limit;
        self
    }

    #[must_use]
    pub fn with_mana_cap(mut self, cap: i32) -> Self {
        self.mana_cap = cap;
        self
    }

    /// Set both opening hand sizes.
    #[must_use]
    pub fn with_opening_hands(mut self, first: usize, second: usize) -> Self {
        assert!(
            first < DECK_SIZE && second < DECK_SIZE,
            "Opening hands must leave cards to draw"
        );
        self.first_hand = first;
        self.second_hand = second;
        self
    }

    #[must_use]
    pub fn with_hero_health(mut self, health: i32) -> Self {
        assert!(health > 0, "Heroes must start alive");
        self.hero_health = health;
        self
    }

    #[must_use]
    pub fn with_power_cost(mut self, cost: i32) -> Self {
        self.power_cost = cost;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MatchConfig::new(9);
        assert_eq!(config.seed, 9);
        assert_eq!(config.hand_limit, 10);
        assert_eq!(config.mana_cap, 10);
        assert_eq!((config.first_hand, config.second_hand), (3, 4));
        assert_eq!(config.hero_health, 30);
        assert_eq!(config.power_cost, 2);
    }

    #[test]
    fn test_builder() {
        let config = MatchConfig::new(1)
            .with_hand_limit(5)
            .with_mana_cap(3)
            .with_opening_hands(1, 2)
            .with_hero_health(5)
            .with_power_cost(0);

        assert_eq!(config.hand_limit, 5);
        assert_eq!(config.mana_cap, 3);
        assert_eq!((config.first_hand, config.second_hand), (1, 2));
        assert_eq!(config.hero_health, 5);
        assert_eq!(config.power_cost, 0);
    }

    #[test]
    #[should_panic(expected = "Heroes must start alive")]
    fn test_zero_health() {
        let _ = MatchConfig::default().with_hero_health(0);
    }
}
