//! Per-seat state.

use crate::cards::{Deck, ManaFilter};
use crate::core::{CardId, EntityId, PlayerId};
use crate::events::EventBus;

use super::Game;

#[derive(Debug)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hero: EntityId,
    pub mana: i32,
    pub max_mana: i32,
    pub deck: Deck,
    pub hand: Vec<CardId>,
    /// Minions on the board, left to right.
    pub minions: Vec<EntityId>,
    /// Secrets in play, in the order they were played.
    pub secrets: Vec<CardId>,
    pub mana_filters: Vec<ManaFilter>,
    /// Sum of the spell power of this player's minions on the board.
    pub spell_power: i32,
    /// Fatigue damage dealt by the last empty-deck draw.
    pub fatigue: i32,
    pub power_used: bool,
    pub(crate) bus: EventBus<Game>,
}

impl Player {
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, hero: EntityId, deck: Deck) -> Self {
        Self {
            id,
            name: name.into(),
            hero,
            mana: 0,
            max_mana: 0,
            deck,
            hand: Vec::new(),
            minions: Vec::new(),
            secrets: Vec::new(),
            mana_filters: Vec::new(),
            spell_power: 0,
            fatigue: 0,
            power_used: false,
            bus: EventBus::new(),
        }
    }

    /// Spell damage boosted by this player's spell power.
    #[must_use]
    pub fn effective_spell_damage(&self, base: i32) -> i32 {
        base + self.spell_power
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CharacterClass, DECK_SIZE};

    #[test]
    fn test_new_player() {
        let deck = Deck::new((0..DECK_SIZE as u32).map(CardId).collect(), CharacterClass::Priest);
        let mut player = Player::new(PlayerId::SECOND, "two", EntityId(1), deck);
        assert_eq!(player.mana, 0);
        assert!(player.hand.is_empty());
        assert!(!player.power_used);

        player.spell_power = 2;
        assert_eq!(player.effective_spell_damage(3), 5);
    }
}
