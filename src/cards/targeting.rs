//! Target finders and filters for cards.
//!
//! Finders are relative to the player whose turn it is. Characters are
//! listed friendly side first, hero before minions, minions in board order.

use crate::characters::{Character, Combatant};
use crate::core::{EntityId, PlayerId};
use crate::game::Game;

use super::card::TargetFilter;

/// Not stealthed (or not a minion).
pub fn spell_targetable(character: &Character) -> bool {
    character.spell_targetable()
}

pub fn not_stealthed(character: &Character) -> bool {
    !character.stats().stealth
}

fn collect(
    game: &Game,
    sides: &[PlayerId],
    heroes: bool,
    minions: bool,
    filter: TargetFilter,
) -> Vec<EntityId> {
    let mut out = Vec::new();
    for &side in sides {
        let player = game.player(side);
        if heroes {
            out.push(player.hero);
        }
        if minions {
            out.extend(player.minions.iter().copied());
        }
    }
    out.retain(|&id| {
        let character = game.character(id);
        !character.stats().dead && filter(character)
    });
    out
}

fn both_sides(game: &Game) -> [PlayerId; 2] {
    [game.current_player(), game.other_player()]
}

/// Every character.
pub fn spell_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    Some(collect(game, &both_sides(game), true, true, filter))
}

pub fn enemy_spell_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    Some(collect(game, &[game.other_player()], true, true, filter))
}

pub fn friendly_spell_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    Some(collect(game, &[game.current_player()], true, true, filter))
}

/// Every minion, no heroes.
pub fn minion_spell_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    Some(collect(game, &both_sides(game), false, true, filter))
}

pub fn enemy_minion_spell_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    Some(collect(game, &[game.other_player()], false, true, filter))
}

pub fn friendly_minion_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    Some(collect(game, &[game.current_player()], false, true, filter))
}

/// Every character, or `None` when nothing qualifies so the minion can still
/// be played without a target.
pub fn battlecry_targets(game: &Game, filter: TargetFilter) -> Option<Vec<EntityId>> {
    let targets = collect(game, &both_sides(game), true, true, filter);
    if targets.is_empty() {
        None
    } else {
        Some(targets)
    }
}
