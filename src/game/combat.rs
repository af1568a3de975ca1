//! Damage, healing, stat changes, silence, death and attacks.
//!
//! Effects that must not be observed half-way (damage, death) are queued
//! on the combatant as delayed events and dispatched at fixed flush points:
//! after each side of an attack exchange and after every card use.

use tracing::{debug, trace};

use super::{Emitter, Game};
use crate::characters::{Character, Combatant};
use crate::core::{CardId, EntityId, PlayerId};
use crate::error::{GameError, Result};
use crate::events::{callback, BoundArg, DamageSource, Event, EventKind};

fn bound_target(bound: &[BoundArg]) -> Option<(EntityId, i32)> {
    let target = bound.first()?.entity()?;
    let amount = bound.get(1)?.int()?;
    Some((target, amount))
}

fn undo_attack(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    if let Some((target, amount)) = bound_target(bound) {
        game.character_mut(target).stats_mut().attack_power -= amount;
    }
    Ok(())
}

fn undo_health(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    if let Some((target, amount)) = bound_target(bound) {
        let stats = game.character_mut(target).stats_mut();
        stats.max_health -= amount;
        stats.health = stats.health.min(stats.max_health);
    }
    Ok(())
}

fn restore_max_health(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    if let Some((target, amount)) = bound_target(bound) {
        game.character_mut(target).stats_mut().max_health += amount;
    }
    Ok(())
}

impl Game {
    /// Queue `event` on `id` until the next flush.
    pub fn delayed_trigger(&mut self, id: EntityId, event: Event) {
        self.character_mut(id).stats_mut().delayed.push(event);
        self.pending_flush.push(id);
    }

    /// Fire every event queued on `id`, in the order they were queued.
    pub fn activate_delayed(&mut self, id: EntityId) -> Result<()> {
        self.pending_flush.retain(|&pending| pending != id);
        let events = std::mem::take(&mut self.character_mut(id).stats_mut().delayed);
        for event in events {
            trace!(%id, kind = ?event.kind(), "delayed event");
            self.emit(Emitter::Character(id), event)?;
        }
        Ok(())
    }

    /// Flush every combatant with queued events, including those queued by
    /// the flush itself.
    pub fn flush_delayed(&mut self) -> Result<()> {
        while !self.pending_flush.is_empty() {
            let pending = std::mem::take(&mut self.pending_flush);
            for id in pending {
                self.activate_delayed(id)?;
            }
        }
        Ok(())
    }

    /// Deal damage. Divine shield and armour are applied here.
    pub fn damage(&mut self, target: EntityId, amount: i32, source: DamageSource) -> Result<()> {
        let remaining = match self.character_mut(target) {
            Character::Minion(minion) if minion.divine_shield => {
                minion.divine_shield = false;
                trace!(%target, "divine shield absorbed damage");
                None
            }
            Character::Minion(_) => Some(amount),
            Character::Hero(hero) => {
                hero.armour -= amount;
                if hero.armour < 0 {
                    let rest = -hero.armour;
                    hero.armour = 0;
                    Some(rest)
                } else {
                    None
                }
            }
        };
        match remaining {
            Some(amount) => self.base_damage(target, amount, source),
            None => Ok(()),
        }
    }

    fn base_damage(&mut self, target: EntityId, amount: i32, source: DamageSource) -> Result<()> {
        if self.character(target).stats().immune {
            return Ok(());
        }
        self.delayed_trigger(target, Event::Damaged { amount, source });
        self.emit(Emitter::Character(target), Event::SecretDamaged { amount, source })?;
        self.character_mut(target).stats_mut().health -= amount;

        let did_damage = Event::DidDamage { amount, target };
        match source {
            DamageSource::Character(dealer) if self.character(dealer).is_minion() => {
                self.delayed_trigger(dealer, did_damage);
            }
            DamageSource::Character(dealer) => self.emit(Emitter::Character(dealer), did_damage)?,
            DamageSource::Player(player) => self.emit(Emitter::Player(player), did_damage)?,
            DamageSource::Card(_) | DamageSource::Fatigue => {}
        }

        if self.character(target).stats().health <= 0 {
            self.die(target, source)?;
        }
        Ok(())
    }

    /// Combat damage from `attacker`.
    pub fn physical_damage(&mut self, target: EntityId, amount: i32, attacker: EntityId) -> Result<()> {
        self.emit(
            Emitter::Character(target),
            Event::PhysicallyDamaged { amount, attacker },
        )?;
        let event = if self.character(attacker).is_minion() {
            Event::MinionDamaged { amount, attacker }
        } else {
            Event::PlayerDamaged { amount, attacker }
        };
        self.emit(Emitter::Character(target), event)?;
        self.damage(target, amount, DamageSource::Character(attacker))
    }

    pub fn spell_damage(&mut self, target: EntityId, amount: i32, card: CardId) -> Result<()> {
        self.emit(Emitter::Character(target), Event::SpellDamaged { amount, card })?;
        self.damage(target, amount, DamageSource::Card(card))
    }

    /// Restore health, never above the maximum.
    pub fn heal(&mut self, target: EntityId, amount: i32) -> Result<()> {
        self.emit(Emitter::Character(target), Event::Healed { amount })?;
        let stats = self.character_mut(target).stats_mut();
        stats.health = (stats.health + amount).min(stats.max_health);
        Ok(())
    }

    /// Permanent attack buff, undone by silence.
    pub fn increase_attack(&mut self, target: EntityId, amount: i32) -> Result<()> {
        self.character_mut(target).stats_mut().attack_power += amount;
        self.bind_once(
            Emitter::Character(target),
            EventKind::Silenced,
            callback(undo_attack),
            &[BoundArg::Entity(target), BoundArg::Int(amount)],
        );
        self.emit(Emitter::Character(target), Event::AttackIncreased { amount })
    }

    /// Attack bonus until the end of the owner's turn.
    pub fn increase_temp_attack(&mut self, target: EntityId, amount: i32) -> Result<()> {
        self.character_mut(target).stats_mut().temp_attack += amount;
        self.emit(Emitter::Character(target), Event::AttackIncreased { amount })
    }

    /// Permanent health buff, undone by silence.
    pub fn increase_health(&mut self, target: EntityId, amount: i32) -> Result<()> {
        let stats = self.character_mut(target).stats_mut();
        stats.max_health += amount;
        stats.health += amount;
        self.bind_once(
            Emitter::Character(target),
            EventKind::Silenced,
            callback(undo_health),
            &[BoundArg::Entity(target), BoundArg::Int(amount)],
        );
        self.emit(Emitter::Character(target), Event::HealthIncreased { amount })
    }

    /// Lower maximum health. Silence restores the maximum but not the lost
    /// health.
    pub fn decrease_health(&mut self, target: EntityId, amount: i32) -> Result<()> {
        let stats = self.character_mut(target).stats_mut();
        stats.max_health -= amount;
        stats.health = stats.health.min(stats.max_health);
        self.bind_once(
            Emitter::Character(target),
            EventKind::Silenced,
            callback(restore_max_health),
            &[BoundArg::Entity(target), BoundArg::Int(amount)],
        );
        self.emit(Emitter::Character(target), Event::HealthDecreased { amount })
    }

    /// # Panics
    ///
    /// If `hero` is not a hero.
    pub fn increase_armour(&mut self, hero: EntityId, amount: i32) -> Result<()> {
        self.emit(Emitter::Character(hero), Event::ArmourIncreased { amount })?;
        self.character_mut(hero)
            .as_hero_mut()
            .unwrap_or_else(|| panic!("{hero} has no armour"))
            .armour += amount;
        Ok(())
    }

    pub fn freeze(&mut self, target: EntityId) {
        let stats = self.character_mut(target).stats_mut();
        stats.frozen = true;
        stats.frozen_this_turn = true;
    }

    /// Remove every ability and buff from the character.
    pub fn silence(&mut self, target: EntityId) -> Result<()> {
        if self.character(target).is_minion() {
            self.silence_minion(target)
        } else {
            self.base_silence(target)
        }
    }

    pub(crate) fn base_silence(&mut self, target: EntityId) -> Result<()> {
        self.emit(Emitter::Character(target), Event::Silenced)?;
        let stats = self.character_mut(target).stats_mut();
        stats.wind_fury = false;
        stats.frozen = false;
        stats.frozen_this_turn = false;
        Ok(())
    }

    /// Kill the character. Does nothing if it is already dead.
    pub fn die(&mut self, target: EntityId, by: DamageSource) -> Result<()> {
        let character = self.character(target);
        if character.stats().dead {
            return Ok(());
        }
        if character.is_minion() {
            self.die_minion(target, by)
        } else {
            self.base_die(target, by);
            Ok(())
        }
    }

    pub(crate) fn base_die(&mut self, target: EntityId, by: DamageSource) {
        debug!(%target, ?by, "character died");
        self.delayed_trigger(target, Event::Died { by });
        self.character_mut(target).stats_mut().dead = true;
    }

    /// Drop temporary attack at the end of the owner's turn.
    pub fn turn_complete(&mut self, id: EntityId) -> Result<()> {
        let temp = self.character(id).stats().temp_attack;
        if temp != 0 {
            self.emit(Emitter::Character(id), Event::AttackDecreased { amount: temp })?;
            self.character_mut(id).stats_mut().temp_attack = 0;
        }
        Ok(())
    }

    /// Legal attack targets for a character owned by `owner`: the opposing
    /// taunt minions if there are any, else every attackable minion and the
    /// hero.
    #[must_use]
    pub fn attack_targets(&self, owner: PlayerId) -> Vec<EntityId> {
        let enemy = self.player(owner.opponent());
        let attackable = enemy
            .minions
            .iter()
            .copied()
            .filter(|&id| self.minion(id).can_be_attacked());

        let taunts: Vec<EntityId> = attackable.clone().filter(|&id| self.minion(id).taunt).collect();
        if !taunts.is_empty() {
            return taunts;
        }
        let mut targets: Vec<EntityId> = attackable.collect();
        targets.push(enemy.hero);
        targets
    }

    /// Attack with `attacker`; the owner's agent picks the target.
    pub fn attack(&mut self, attacker: EntityId) -> Result<()> {
        if self.game_ended() {
            return Err(GameError::GameEnded);
        }
        let character = self.character(attacker);
        let owner = character.owner();
        if owner != self.current {
            return Err(GameError::illegal(format!("{attacker} does not belong to {}", self.current)));
        }
        if !character.can_attack() {
            return Err(GameError::illegal(format!("{attacker} cannot attack")));
        }
        let is_hero = !character.is_minion();
        let targets = self.attack_targets(owner);

        if is_hero {
            self.emit(Emitter::Character(attacker), Event::Attacking { attacker })?;
        }
        self.emit(Emitter::Player(owner), Event::Attacking { attacker })?;
        let target = self.choose_target(owner, &targets)?;
        debug!(%attacker, %target, "attack");

        let target_is_minion = self.character(target).is_minion();
        let declared = if target_is_minion {
            Event::AttackMinion { target }
        } else {
            Event::AttackPlayer { target }
        };
        self.emit(Emitter::Character(attacker), declared)?;
        self.emit(Emitter::Character(target), Event::Attacked { attacker })?;
        if self.character(attacker).stats().dead {
            return Ok(());
        }

        let my_attack = self.character(attacker).attack_total();
        if target_is_minion {
            let their_attack = self.character(target).attack_total();
            self.physical_damage(attacker, their_attack, target)?;
        }
        self.physical_damage(target, my_attack, attacker)?;
        self.activate_delayed(target)?;
        self.activate_delayed(attacker)?;

        let stats = self.character_mut(attacker).stats_mut();
        if stats.wind_fury && !stats.used_wind_fury {
            stats.used_wind_fury = true;
        } else {
            stats.active = false;
        }
        stats.stealth = false;

        if is_hero {
            self.wear_weapon(owner)?;
        }
        Ok(())
    }
}
