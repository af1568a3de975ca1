//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use hearth_engine::cards::{Card, DeckList};
use hearth_engine::characters::{Combatant, Minion};
use hearth_engine::core::{CardId, CharacterClass, EntityId, MatchConfig, PlayerId};
use hearth_engine::game::{Agent, Game};
use hearth_engine::Result;

/// Agent whose choices are queued by the test. Without a queued choice it
/// keeps every card, takes the first target and plays to the right end.
#[derive(Default)]
pub struct ScriptedAgent {
    pub keep: RefCell<Option<Vec<bool>>>,
    pub targets: RefCell<VecDeque<EntityId>>,
    pub indices: RefCell<VecDeque<usize>>,
    /// Every candidate list offered to `choose_target`.
    pub offered: RefCell<Vec<Vec<EntityId>>>,
}

impl ScriptedAgent {
    pub fn queue_target(&self, target: EntityId) {
        self.targets.borrow_mut().push_back(target);
    }

    pub fn queue_index(&self, index: usize) {
        self.indices.borrow_mut().push_back(index);
    }

    pub fn last_offered(&self) -> Vec<EntityId> {
        self.offered.borrow().last().cloned().unwrap_or_default()
    }
}

impl Agent for ScriptedAgent {
    fn do_card_check(&self, _game: &Game, hand: &[CardId]) -> Vec<bool> {
        self.keep
            .borrow_mut()
            .take()
            .unwrap_or_else(|| vec![true; hand.len()])
    }

    fn do_turn(&self, _game: &mut Game, _player: PlayerId) -> Result<()> {
        Ok(())
    }

    fn choose_target(&self, _game: &Game, targets: &[EntityId]) -> EntityId {
        self.offered.borrow_mut().push(targets.to_vec());
        self.targets.borrow_mut().pop_front().unwrap_or(targets[0])
    }

    fn choose_index(&self, game: &Game, _card: CardId, player: PlayerId) -> usize {
        self.indices
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| game.player(player).minions.len())
    }
}

/// A card nobody can afford.
pub fn filler() -> Card {
    Card::spell("Filler", 99, |_, _, _| Ok(()))
}

pub fn filler_deck(class: CharacterClass) -> DeckList {
    DeckList::repeat(class, filler)
}

/// A game with filler decks, both seats driven by the same scripted agent.
pub fn new_game(seed: u64) -> (Game, Rc<ScriptedAgent>) {
    new_game_with(MatchConfig::new(seed), CharacterClass::Mage, CharacterClass::Mage)
}

pub fn new_game_with(
    config: MatchConfig,
    first: CharacterClass,
    second: CharacterClass,
) -> (Game, Rc<ScriptedAgent>) {
    let agent = Rc::new(ScriptedAgent::default());
    let seats: [Rc<dyn Agent>; 2] = [agent.clone(), agent.clone()];
    let game = Game::new(config, [filler_deck(first), filler_deck(second)], seats).unwrap();
    (game, agent)
}

/// Mulligan done and the first turn started.
pub fn started(seed: u64) -> (Game, Rc<ScriptedAgent>) {
    let (mut game, agent) = new_game(seed);
    game.pre_game().unwrap();
    game.start_turn().unwrap();
    (game, agent)
}

/// Summon a minion that can attack right away.
pub fn summon_ready(game: &mut Game, player: PlayerId, minion: Minion) -> EntityId {
    let id = game.summon(player, minion).unwrap();
    game.character_mut(id).stats_mut().active = true;
    id
}

/// Register `card` and put it in `player`'s hand.
pub fn give_card(game: &mut Game, player: PlayerId, card: Card) -> CardId {
    let id = game.add_card(card);
    game.player_mut(player).hand.push(id);
    id
}

pub fn health(game: &Game, id: EntityId) -> i32 {
    game.character(id).stats().health
}

pub fn hero_id(game: &Game, player: PlayerId) -> EntityId {
    game.player(player).hero
}
