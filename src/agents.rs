//! Built-in agents.
//!
//! Both are deterministic and mostly useful for tests and for driving
//! simulations to completion.

use tracing::trace;

use crate::characters::Combatant;
use crate::core::{CardId, EntityId, PlayerId};
use crate::error::Result;
use crate::game::{Agent, Game};

/// Keeps every card and never acts.
#[derive(Clone, Copy, Debug, Default)]
pub struct DoNothingAgent;

impl Agent for DoNothingAgent {
    fn do_card_check(&self, _game: &Game, hand: &[CardId]) -> Vec<bool> {
        vec![true; hand.len()]
    }

    fn do_turn(&self, _game: &mut Game, _player: PlayerId) -> Result<()> {
        Ok(())
    }

    fn choose_target(&self, _game: &Game, targets: &[EntityId]) -> EntityId {
        targets[0]
    }

    fn choose_index(&self, game: &Game, _card: CardId, player: PlayerId) -> usize {
        game.player(player).minions.len()
    }
}

/// Plays whatever it can afford, in hand order, then attacks with
/// everything able to. Always takes the first target offered.
#[derive(Clone, Copy, Debug, Default)]
pub struct PredictableAgent;

impl PredictableAgent {
    fn next_playable(game: &mut Game, player: PlayerId) -> Option<CardId> {
        let hand = game.player(player).hand.clone();
        hand.into_iter().find(|&card| game.can_use(player, card))
    }
}

impl Agent for PredictableAgent {
    fn do_card_check(&self, _game: &Game, hand: &[CardId]) -> Vec<bool> {
        vec![true; hand.len()]
    }

    fn do_turn(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        while let Some(card) = Self::next_playable(game, player) {
            trace!(%player, %card, "playing");
            game.play_card(card)?;
            if game.game_ended() {
                return Ok(());
            }
        }

        let seat = game.player(player);
        let attackers: Vec<EntityId> = std::iter::once(seat.hero)
            .chain(seat.minions.iter().copied())
            .collect();
        for attacker in attackers {
            loop {
                let character = game.character(attacker);
                if character.stats().dead || !character.can_attack() {
                    break;
                }
                game.attack(attacker)?;
                if game.game_ended() {
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn choose_target(&self, _game: &Game, targets: &[EntityId]) -> EntityId {
        targets[0]
    }

    fn choose_index(&self, game: &Game, _card: CardId, player: PlayerId) -> usize {
        game.player(player).minions.len()
    }
}
