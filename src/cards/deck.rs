//! Decks.
//!
//! A deck never reorders or removes its cards. Each of its 30 slots carries
//! a used bit; drawing picks uniformly among the unused slots and putting a
//! card back clears the bit of its slot.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::card::Card;
use crate::core::{CardId, CharacterClass, GameRng, DECK_SIZE};
use crate::error::{GameError, Result};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    cards: Vec<CardId>,
    /// Bit `i` set when slot `i` has been drawn.
    used: u32,
    left: usize,
    class: CharacterClass,
}

impl Deck {
    /// # Panics
    ///
    /// If `cards` does not hold exactly `DECK_SIZE` cards.
    #[must_use]
    pub fn new(cards: Vec<CardId>, class: CharacterClass) -> Self {
        assert_eq!(cards.len(), DECK_SIZE, "A deck holds exactly {DECK_SIZE} cards");
        Self {
            cards,
            used: 0,
            left: DECK_SIZE,
            class,
        }
    }

    #[must_use]
    pub fn can_draw(&self) -> bool {
        self.left > 0
    }

    /// Cards not yet drawn.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.left
    }

    #[must_use]
    pub fn class(&self) -> CharacterClass {
        self.class
    }

    #[must_use]
    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    #[must_use]
    pub fn is_used(&self, slot: usize) -> bool {
        self.used & (1 << slot) != 0
    }

    /// Draw a uniformly random unused card.
    pub fn draw(&mut self, rng: &mut GameRng) -> Result<CardId> {
        if !self.can_draw() {
            return Err(GameError::DeckExhausted);
        }
        let mut skip = rng.gen_inclusive(0, self.left - 1);
        for slot in 0..self.cards.len() {
            if self.is_used(slot) {
                continue;
            }
            if skip == 0 {
                self.used |= 1 << slot;
                self.left -= 1;
                trace!(slot, left = self.left, "drew card");
                return Ok(self.cards[slot]);
            }
            skip -= 1;
        }
        unreachable!("left count out of sync with used slots")
    }

    /// Return a drawn card to its slot.
    pub fn put_back(&mut self, card: CardId) -> Result<()> {
        let Some(slot) = self.cards.iter().position(|&c| c == card) else {
            return Err(GameError::InvalidPutBack(format!("{card} is not part of this deck")));
        };
        if !self.is_used(slot) {
            return Err(GameError::InvalidPutBack(format!("{card} is still in the deck")));
        }
        self.used &= !(1 << slot);
        self.left += 1;
        Ok(())
    }
}

/// The cards a player brings to a match.
#[derive(Clone, Debug)]
pub struct DeckList {
    pub class: CharacterClass,
    pub cards: Vec<Card>,
}

impl DeckList {
    /// # Panics
    ///
    /// If `cards` does not hold exactly `DECK_SIZE` cards.
    #[must_use]
    pub fn new(class: CharacterClass, cards: Vec<Card>) -> Self {
        assert_eq!(cards.len(), DECK_SIZE, "A deck holds exactly {DECK_SIZE} cards");
        Self { class, cards }
    }

    /// `DECK_SIZE` copies produced by `make`.
    #[must_use]
    pub fn repeat(class: CharacterClass, make: impl Fn() -> Card) -> Self {
        Self::new(class, (0..DECK_SIZE).map(|_| make()).collect())
    }
}
