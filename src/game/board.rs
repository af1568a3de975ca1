//! Minions entering and leaving the board, adjacency auras and weapons.

use smallvec::SmallVec;
use std::rc::Rc;
use tracing::debug;

use super::{turn_complete_handler, Emitter, Game};
use crate::characters::minion::{AdjacencyAura, AdjacencyHandlers, MinionHook};
use crate::characters::{Character, Combatant, Minion, Weapon};
use crate::core::{CardId, EntityId, PlayerId};
use crate::error::Result;
use crate::events::{callback, BoundArg, DamageSource, Event, EventKind};

/// The minions directly left and right of `index` on `board`.
#[must_use]
pub fn adjacent_minions(board: &[EntityId], index: usize) -> SmallVec<[EntityId; 2]> {
    let mut out = SmallVec::new();
    if index > 0 {
        if let Some(&left) = board.get(index - 1) {
            out.push(left);
        }
    }
    if let Some(&right) = board.get(index + 1) {
        out.push(right);
    }
    out
}

fn silence_after_death(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    match bound.first().and_then(|arg| arg.entity()) {
        Some(id) => game.silence(id),
        None => Ok(()),
    }
}

fn refresh_adjacency_handler(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    match bound.first().and_then(|arg| arg.entity()) {
        Some(source) => game.refresh_adjacency(source),
        None => Ok(()),
    }
}

fn clear_adjacency_handler(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    match bound.first().and_then(|arg| arg.entity()) {
        Some(source) => game.clear_adjacency(source),
        None => Ok(()),
    }
}

impl Game {
    fn reindex(&mut self, player: PlayerId) {
        let board = self.players[player].minions.clone();
        for (index, id) in board.into_iter().enumerate() {
            self.minion_mut(id).index = index;
        }
    }

    /// Put `minion` on `player`'s board at `index`, run its battlecry and
    /// announce it.
    ///
    /// # Panics
    ///
    /// If `index` is past the end of the board.
    pub fn add_to_board(
        &mut self,
        mut minion: Minion,
        card: Option<CardId>,
        player: PlayerId,
        index: usize,
    ) -> Result<EntityId> {
        let board_len = self.players[player].minions.len();
        assert!(index <= board_len, "board index {index} out of range 0..={board_len}");

        let id = self.alloc_entity();
        minion.id = id;
        minion.owner = player;
        minion.index = index;
        if let Some(card) = card {
            minion.card = Some(card);
            if minion.name.is_empty() {
                minion.name = self.card(card).name.clone();
            }
        }
        let spell_power = minion.spell_power;
        let battlecry = minion.battlecry.clone();
        debug!(%id, %player, index, name = %minion.name, "minion added to board");

        self.characters.insert(id, Character::Minion(minion));
        self.players[player].minions.insert(index, id);
        self.reindex(player);
        self.players[player].spell_power += spell_power;

        if let Some(battlecry) = battlecry {
            battlecry(self, id)?;
        }
        let minion = self.minion_mut(id);
        if minion.charge {
            minion.stats.active = true;
        }

        self.emit(Emitter::Game, Event::MinionAdded { minion: id })?;
        self.emit(Emitter::Character(id), Event::AddedToBoard { minion: id, index })?;
        let handler = self.bind(
            Emitter::Player(player),
            EventKind::TurnEnded,
            callback(turn_complete_handler),
            &[BoundArg::Entity(id)],
        );
        self.minion_mut(id).turn_handler = Some(handler);
        Ok(id)
    }

    /// Put a minion that did not come from a card at the right end of the
    /// board.
    pub fn summon(&mut self, player: PlayerId, minion: Minion) -> Result<EntityId> {
        let index = self.players[player].minions.len();
        self.add_to_board(minion, None, player, index)
    }

    /// Take a minion off the board: spell power, board slot and end of turn
    /// bookkeeping.
    pub fn remove_from_board(&mut self, id: EntityId) -> Result<()> {
        let minion = self.minion_mut(id);
        let owner = minion.owner;
        let spell_power = minion.spell_power;
        let handler = minion.turn_handler.take();

        self.players[owner].spell_power -= spell_power;
        self.remove_minion(id, owner)?;
        if let Some(handler) = handler {
            self.unbind_handler(Emitter::Player(owner), EventKind::TurnEnded, handler);
        }
        Ok(())
    }

    /// Detach a minion from `player`'s board list.
    ///
    /// # Panics
    ///
    /// If the minion is not on that board.
    pub fn remove_minion(&mut self, id: EntityId, player: PlayerId) -> Result<()> {
        let board = &mut self.players[player].minions;
        let position = board
            .iter()
            .position(|&m| m == id)
            .unwrap_or_else(|| panic!("{id} is not on the board of {player}"));
        board.remove(position);
        self.reindex(player);
        debug!(%id, %player, "minion removed from board");
        self.emit(Emitter::Game, Event::MinionRemoved { minion: id })
    }

    pub(crate) fn silence_minion(&mut self, id: EntityId) -> Result<()> {
        self.base_silence(id)?;
        let on_board = self.is_on_board(id);
        let minion = self.minion_mut(id);
        minion.taunt = false;
        minion.stats.stealth = false;
        minion.charge = false;
        minion.divine_shield = false;
        minion.battlecry = None;
        minion.deathrattle = None;
        let spell_power = std::mem::take(&mut minion.spell_power);
        let owner = minion.owner;
        if on_board {
            self.players[owner].spell_power -= spell_power;
        }
        Ok(())
    }

    pub(crate) fn die_minion(&mut self, id: EntityId, by: DamageSource) -> Result<()> {
        let deathrattle = self.minion(id).deathrattle.clone();
        self.bind_once(
            Emitter::Character(id),
            EventKind::Died,
            callback(silence_after_death),
            &[BoundArg::Entity(id)],
        );
        self.base_die(id, by);
        self.emit(Emitter::Game, Event::MinionDied { minion: id, by })?;
        if let Some(deathrattle) = deathrattle {
            deathrattle(self, id)?;
        }
        self.remove_from_board(id)
    }

    /// Give `source` an effect on the minions beside it.
    ///
    /// The effect follows the board: neighbours that arrive get `apply`,
    /// neighbours that move away get `remove`, and everything is removed
    /// when the source leaves the board or is silenced. Dead neighbours are
    /// dropped without `remove`.
    pub fn add_adjacency_effect(
        &mut self,
        source: EntityId,
        apply: impl Fn(&mut Game, EntityId) -> Result<()> + 'static,
        remove: impl Fn(&mut Game, EntityId) -> Result<()> + 'static,
    ) -> Result<()> {
        let minion = self.minion_mut(source);
        minion.adjacency.push(AdjacencyAura {
            apply: Rc::new(apply),
            remove: Rc::new(remove),
            affected: SmallVec::new(),
        });
        if minion.adjacency_handlers.is_none() {
            let bound = [BoundArg::Entity(source)];
            let added = self.bind(
                Emitter::Game,
                EventKind::MinionAdded,
                callback(refresh_adjacency_handler),
                &bound,
            );
            let removed = self.bind(
                Emitter::Game,
                EventKind::MinionRemoved,
                callback(refresh_adjacency_handler),
                &bound,
            );
            let silenced = self.bind(
                Emitter::Character(source),
                EventKind::Silenced,
                callback(clear_adjacency_handler),
                &bound,
            );
            self.minion_mut(source).adjacency_handlers = Some(AdjacencyHandlers {
                added,
                removed,
                silenced,
            });
        }
        self.refresh_adjacency(source)
    }

    /// Bring `source`'s adjacency auras in line with its current neighbours.
    pub fn refresh_adjacency(&mut self, source: EntityId) -> Result<()> {
        let desired: SmallVec<[EntityId; 2]> =
            if self.is_on_board(source) && !self.character(source).stats().dead {
                let minion = self.minion(source);
                adjacent_minions(&self.players[minion.owner].minions, minion.index)
            } else {
                SmallVec::new()
            };

        let mut removals: Vec<(MinionHook, EntityId)> = Vec::new();
        let mut additions: Vec<(MinionHook, EntityId)> = Vec::new();
        for aura in &mut self.minion_mut(source).adjacency {
            for &old in aura.affected.iter().filter(|id| !desired.contains(id)) {
                removals.push((Rc::clone(&aura.remove), old));
            }
            for &new in desired.iter().filter(|id| !aura.affected.contains(id)) {
                additions.push((Rc::clone(&aura.apply), new));
            }
            aura.affected = desired.clone();
        }

        for (remove, id) in removals {
            if !self.character(id).stats().dead {
                remove(self, id)?;
            }
        }
        for (apply, id) in additions {
            apply(self, id)?;
        }
        Ok(())
    }

    /// Undo every adjacency aura of `source` and stop tracking the board.
    pub fn clear_adjacency(&mut self, source: EntityId) -> Result<()> {
        let minion = self.minion_mut(source);
        let auras = std::mem::take(&mut minion.adjacency);
        let handlers = minion.adjacency_handlers.take();

        for aura in auras {
            for id in aura.affected {
                if !self.character(id).stats().dead {
                    (aura.remove)(self, id)?;
                }
            }
        }
        if let Some(handlers) = handlers {
            self.unbind_handler(Emitter::Game, EventKind::MinionAdded, handlers.added);
            self.unbind_handler(Emitter::Game, EventKind::MinionRemoved, handlers.removed);
            self.unbind_handler(
                Emitter::Character(source),
                EventKind::Silenced,
                handlers.silenced,
            );
        }
        Ok(())
    }

    /// Arm `player`'s hero, destroying any weapon it already holds.
    pub fn equip_weapon(&mut self, player: PlayerId, weapon: Weapon) -> Result<()> {
        if self.hero(player).weapon.is_some() {
            self.destroy_weapon(player)?;
        }
        let hero = self.players[player].hero;
        let event = Event::WeaponEquipped {
            attack: weapon.attack,
            durability: weapon.durability,
        };
        debug!(%player, weapon = %weapon.name, "weapon equipped");
        self.hero_mut(player).weapon = Some(weapon);
        self.emit(Emitter::Character(hero), event)
    }

    pub fn destroy_weapon(&mut self, player: PlayerId) -> Result<()> {
        let hero = self.players[player].hero;
        if self.hero_mut(player).weapon.take().is_some() {
            self.emit(Emitter::Character(hero), Event::WeaponDestroyed)?;
        }
        Ok(())
    }

    /// Spend one durability after a hero attack.
    pub(crate) fn wear_weapon(&mut self, player: PlayerId) -> Result<()> {
        let broken = match self.hero_mut(player).weapon.as_mut() {
            Some(weapon) => {
                weapon.durability -= 1;
                weapon.durability <= 0
            }
            None => false,
        };
        if broken {
            self.destroy_weapon(player)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<EntityId> {
        raw.iter().copied().map(EntityId).collect()
    }

    #[test]
    fn test_adjacent_middle() {
        let board = ids(&[2, 3, 4]);
        assert_eq!(adjacent_minions(&board, 1).as_slice(), &ids(&[2, 4])[..]);
    }

    #[test]
    fn test_adjacent_edges() {
        let board = ids(&[2, 3, 4]);
        assert_eq!(adjacent_minions(&board, 0).as_slice(), &ids(&[3])[..]);
        assert_eq!(adjacent_minions(&board, 2).as_slice(), &ids(&[3])[..]);
    }

    #[test]
    fn test_adjacent_alone() {
        let board = ids(&[7]);
        assert!(adjacent_minions(&board, 0).is_empty());
        assert!(adjacent_minions(&[], 0).is_empty());
    }
}
