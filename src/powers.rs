//! Hero powers.
//!
//! Every class has one basic power. The game handles cost, the once per turn
//! limit and the "power_used" event; a [`Power`] only decides whether it has
//! something to do and does it.

use std::rc::Rc;

use crate::characters::{Combatant, Minion, Weapon};
use crate::core::{CharacterClass, MinionType, PlayerId};
use crate::error::Result;
use crate::events::{callback, BoundArg, DamageSource, Event, EventKind};
use crate::game::{Emitter, Game};

pub trait Power {
    fn name(&self) -> &'static str;

    /// Extra usability rule beyond mana and once per turn.
    fn can_use(&self, _game: &Game, _player: PlayerId) -> bool {
        true
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()>;
}

/// Look up the basic power of a class.
#[must_use]
pub fn power_for(class: CharacterClass) -> Rc<dyn Power> {
    match class {
        CharacterClass::Mage => Rc::new(Fireblast),
        CharacterClass::Priest => Rc::new(LesserHeal),
        CharacterClass::Warrior => Rc::new(ArmorUp),
        CharacterClass::Hunter => Rc::new(SteadyShot),
        CharacterClass::Warlock => Rc::new(LifeTap),
        CharacterClass::Druid => Rc::new(Shapeshift),
        CharacterClass::Paladin => Rc::new(Reinforce),
        CharacterClass::Rogue => Rc::new(DaggerMastery),
        CharacterClass::Shaman => Rc::new(TotemicCall),
        CharacterClass::All => Rc::new(NoPower),
    }
}

/// Classless heroes have nothing to use.
struct NoPower;

impl Power for NoPower {
    fn name(&self) -> &'static str {
        "None"
    }

    fn can_use(&self, _game: &Game, _player: PlayerId) -> bool {
        false
    }

    fn activate(&self, _game: &mut Game, _player: PlayerId) -> Result<()> {
        Ok(())
    }
}

struct Fireblast;

impl Power for Fireblast {
    fn name(&self) -> &'static str {
        "Fireblast"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let target = game.find_power_target(player)?;
        let hero = game.player(player).hero;
        game.damage(target, 1, DamageSource::Character(hero))
    }
}

struct LesserHeal;

impl Power for LesserHeal {
    fn name(&self) -> &'static str {
        "Lesser Heal"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let target = game.find_power_target(player)?;
        game.heal(target, 2)
    }
}

struct ArmorUp;

impl Power for ArmorUp {
    fn name(&self) -> &'static str {
        "Armor Up!"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let hero = game.player(player).hero;
        game.increase_armour(hero, 2)
    }
}

struct SteadyShot;

impl Power for SteadyShot {
    fn name(&self) -> &'static str {
        "Steady Shot"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let hero = game.player(player).hero;
        let enemy = game.player(player.opponent()).hero;
        game.damage(enemy, 2, DamageSource::Character(hero))
    }
}

struct LifeTap;

impl Power for LifeTap {
    fn name(&self) -> &'static str {
        "Life Tap"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let hero = game.player(player).hero;
        game.draw(player)?;
        game.damage(hero, 2, DamageSource::Character(hero))
    }
}

struct Shapeshift;

impl Power for Shapeshift {
    fn name(&self) -> &'static str {
        "Shapeshift"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let hero = game.player(player).hero;
        game.increase_temp_attack(hero, 1)?;
        game.increase_armour(hero, 1)
    }
}

struct Reinforce;

impl Power for Reinforce {
    fn name(&self) -> &'static str {
        "Reinforce"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let recruit = Minion::new(1, 1).with_name("Silver Hand Recruit");
        game.summon(player, recruit).map(|_| ())
    }
}

struct DaggerMastery;

impl Power for DaggerMastery {
    fn name(&self) -> &'static str {
        "Dagger Mastery"
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        game.equip_weapon(player, Weapon::new("Wicked Knife", 1, 2))
    }
}

const TOTEMS: [&str; 4] = [
    "Searing Totem",
    "Stoneclaw Totem",
    "Wrath of Air Totem",
    "Healing Totem",
];

fn totem(name: &str) -> Minion {
    let base = |attack, health| Minion::new(attack, health).with_name(name).with_type(MinionType::Totem);
    match name {
        "Searing Totem" => base(1, 1),
        "Stoneclaw Totem" => base(0, 2).taunt(),
        "Wrath of Air Totem" => base(0, 2).with_spell_power(1),
        _ => base(0, 2),
    }
}

/// Heal every friendly minion by 1 while the totem stands.
fn healing_totem_tick(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    let Some(totem) = bound.first().and_then(|arg| arg.entity()) else {
        return Ok(());
    };
    if !game.is_on_board(totem) {
        return Ok(());
    }
    let owner = game.character(totem).owner();
    for minion in game.player(owner).minions.clone() {
        game.heal(minion, 1)?;
    }
    Ok(())
}

fn missing_totems(game: &Game, player: PlayerId) -> Vec<&'static str> {
    let on_board: Vec<&str> = game
        .player(player)
        .minions
        .iter()
        .map(|&id| game.minion(id).name.as_str())
        .collect();
    TOTEMS
        .iter()
        .copied()
        .filter(|name| !on_board.contains(name))
        .collect()
}

struct TotemicCall;

impl Power for TotemicCall {
    fn name(&self) -> &'static str {
        "Totemic Call"
    }

    fn can_use(&self, game: &Game, player: PlayerId) -> bool {
        !missing_totems(game, player).is_empty()
    }

    fn activate(&self, game: &mut Game, player: PlayerId) -> Result<()> {
        let choices = missing_totems(game, player);
        let Some(&name) = game.rng_mut().choose(&choices) else {
            return Ok(());
        };
        let id = game.summon(player, totem(name))?;
        if name == "Healing Totem" {
            let tick = game.bind(
                Emitter::Player(player),
                EventKind::TurnEnded,
                callback(healing_totem_tick),
                &[BoundArg::Entity(id)],
            );
            // Silence, including the one every dying minion gets, ends the heal.
            game.bind_once(
                Emitter::Character(id),
                EventKind::Silenced,
                callback(move |game: &mut Game, _: &Event, _: &[BoundArg]| {
                    game.unbind_handler(Emitter::Player(player), EventKind::TurnEnded, tick);
                    Ok(())
                }),
                &[],
            );
        }
        Ok(())
    }
}
