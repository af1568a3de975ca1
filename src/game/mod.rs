//! The match: two players, the shared board and the turn loop.
//!
//! `Game` is the arena for everything that lives during a match. Heroes and
//! minions are stored by [`EntityId`], cards by [`CardId`], and every
//! operation that changes them is a method on `Game`:
//!
//! - `turn.rs`: mulligan, the turn loop, drawing, playing cards, hero powers
//! - `combat.rs`: damage, healing, stat changes, silence, death, attacks and
//!   the delayed-event flush
//! - `board.rs`: adding and removing minions, adjacency auras, weapons
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use hearth_engine::agents::PredictableAgent;
//! use hearth_engine::cards::{Card, DeckList};
//! use hearth_engine::characters::Minion;
//! use hearth_engine::core::{CharacterClass, MatchConfig};
//! use hearth_engine::game::{Agent, Game};
//!
//! let deck = || DeckList::repeat(CharacterClass::Mage, || {
//!     Card::minion("Bloodfen Raptor", 2, |_| Minion::new(3, 2))
//! });
//! let seats: [Rc<dyn Agent>; 2] = [Rc::new(PredictableAgent), Rc::new(PredictableAgent)];
//! let mut game = Game::new(MatchConfig::new(7), [deck(), deck()], seats).unwrap();
//!
//! game.start().unwrap();
//! assert!(game.game_ended());
//! ```

mod agent;
mod board;
mod combat;
mod player;
mod turn;

pub use agent::Agent;
pub use board::adjacent_minions;
pub use player::Player;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::debug;

use crate::cards::{Card, Deck, DeckList};
use crate::characters::{Character, Combatant, Hero, Minion};
use crate::core::{CardId, EntityId, GameRng, MatchConfig, PlayerId, PlayerMap};
use crate::error::{GameError, Result};
use crate::events::{
    callback, trigger, BoundArg, BusHost, Callback, Event, EventBus, EventKind, HandlerId,
};

/// Which bus an event is fired on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emitter {
    Game,
    Player(PlayerId),
    Character(EntityId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchPhase {
    AwaitingMulligan,
    TurnCycle { active: PlayerId },
    Ended,
}

pub struct Game {
    config: MatchConfig,
    players: PlayerMap<Player>,
    agents: PlayerMap<Rc<dyn Agent>>,
    characters: FxHashMap<EntityId, Character>,
    cards: Vec<Card>,
    bus: EventBus<Game>,
    rng: GameRng,
    current: PlayerId,
    phase: MatchPhase,
    /// Turns started so far.
    turn: u32,
    /// Combatants with delayed events waiting for the next flush.
    pending_flush: Vec<EntityId>,
    next_entity: u32,
}

impl BusHost for Game {
    type Address = Emitter;

    fn bus_mut(&mut self, address: Emitter) -> Option<&mut EventBus<Game>> {
        match address {
            Emitter::Game => Some(&mut self.bus),
            Emitter::Player(player) => Some(&mut self.players[player].bus),
            Emitter::Character(id) => self.characters.get_mut(&id).map(|c| c.bus_mut()),
        }
    }
}

fn register(cards: &mut Vec<Card>, list: DeckList) -> Deck {
    let start = cards.len() as u32;
    let ids = (start..start + list.cards.len() as u32).map(CardId).collect();
    cards.extend(list.cards);
    Deck::new(ids, list.class)
}

impl Game {
    /// Set up a match.
    ///
    /// The seat order is random: `decks[i]` and `agents[i]` stay together
    /// and land on `PlayerId::FIRST` or `PlayerId::SECOND`. Opening hands
    /// are dealt, so this can fail only if a handler bound in
    /// `Agent::set_game` fails.
    pub fn new(
        config: MatchConfig,
        decks: [DeckList; 2],
        agents: [Rc<dyn Agent>; 2],
    ) -> Result<Self> {
        let mut rng = GameRng::new(config.seed);
        let [mut deck_a, mut deck_b] = decks;
        let [mut agent_a, mut agent_b] = agents;
        if rng.gen_inclusive(0, 1) == 1 {
            std::mem::swap(&mut deck_a, &mut deck_b);
            std::mem::swap(&mut agent_a, &mut agent_b);
        }

        let mut cards = Vec::with_capacity(deck_a.cards.len() + deck_b.cards.len());
        let mut characters = FxHashMap::default();
        let [first, second] = [(PlayerId::FIRST, deck_a), (PlayerId::SECOND, deck_b)].map(
            |(player, list)| {
                let hero_id = EntityId(u32::from(player.0));
                let hero = Hero::new(hero_id, player, list.class, config.hero_health);
                characters.insert(hero_id, Character::Hero(hero));
                let name = if player == PlayerId::FIRST { "one" } else { "two" };
                Player::new(player, name, hero_id, register(&mut cards, list))
            },
        );

        let mut game = Self {
            config,
            players: PlayerMap::from_pair(first, second),
            agents: PlayerMap::from_pair(agent_a, agent_b),
            characters,
            cards,
            bus: EventBus::new(),
            rng,
            current: PlayerId::FIRST,
            phase: MatchPhase::AwaitingMulligan,
            turn: 0,
            pending_flush: Vec::new(),
            next_entity: EntityId::HERO_COUNT,
        };

        for player in PlayerId::both() {
            let hero = game.players[player].hero;
            game.bind(
                Emitter::Player(player),
                EventKind::TurnEnded,
                callback(turn_complete_handler),
                &[BoundArg::Entity(hero)],
            );
            let agent = game.agent(player);
            agent.set_game(&mut game, player);
        }

        for _ in 0..game.config.first_hand {
            game.draw(PlayerId::FIRST)?;
        }
        for _ in 0..game.config.second_hand {
            game.draw(PlayerId::SECOND)?;
        }

        for player in PlayerId::both() {
            let hero = game.players[player].hero;
            game.bind(
                Emitter::Character(hero),
                EventKind::Died,
                callback(hero_died_handler),
                &[BoundArg::Player(player)],
            );
        }
        debug!(seed = game.config.seed, "match created");
        Ok(game)
    }

    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    #[must_use]
    pub fn game_ended(&self) -> bool {
        self.phase == MatchPhase::Ended
    }

    /// Number of turns started, counting both players.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// The player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.current
    }

    #[must_use]
    pub fn other_player(&self) -> PlayerId {
        self.current.opponent()
    }

    #[must_use]
    pub fn player(&self, player: PlayerId) -> &Player {
        &self.players[player]
    }

    pub fn player_mut(&mut self, player: PlayerId) -> &mut Player {
        &mut self.players[player]
    }

    #[must_use]
    pub fn agent(&self, player: PlayerId) -> Rc<dyn Agent> {
        Rc::clone(&self.agents[player])
    }

    /// # Panics
    ///
    /// If `id` was never allocated by this game.
    #[must_use]
    pub fn character(&self, id: EntityId) -> &Character {
        self.characters
            .get(&id)
            .unwrap_or_else(|| panic!("unknown character {id}"))
    }

    pub fn character_mut(&mut self, id: EntityId) -> &mut Character {
        self.characters
            .get_mut(&id)
            .unwrap_or_else(|| panic!("unknown character {id}"))
    }

    /// # Panics
    ///
    /// If `id` is not a minion.
    #[must_use]
    pub fn minion(&self, id: EntityId) -> &Minion {
        self.character(id)
            .as_minion()
            .unwrap_or_else(|| panic!("{id} is not a minion"))
    }

    pub fn minion_mut(&mut self, id: EntityId) -> &mut Minion {
        self.character_mut(id)
            .as_minion_mut()
            .unwrap_or_else(|| panic!("{id} is not a minion"))
    }

    #[must_use]
    pub fn hero(&self, player: PlayerId) -> &Hero {
        let id = self.players[player].hero;
        self.character(id)
            .as_hero()
            .unwrap_or_else(|| panic!("{id} is not a hero"))
    }

    pub fn hero_mut(&mut self, player: PlayerId) -> &mut Hero {
        let id = self.players[player].hero;
        self.character_mut(id)
            .as_hero_mut()
            .unwrap_or_else(|| panic!("{id} is not a hero"))
    }

    /// # Panics
    ///
    /// If `id` is not a card of this game.
    #[must_use]
    pub fn card(&self, id: CardId) -> &Card {
        &self.cards[id.0 as usize]
    }

    pub fn card_mut(&mut self, id: CardId) -> &mut Card {
        &mut self.cards[id.0 as usize]
    }

    /// Register a card created during the match (tokens, copies). It
    /// belongs to no deck; put it in a hand to make it playable.
    pub fn add_card(&mut self, card: Card) -> CardId {
        let id = CardId(self.cards.len() as u32);
        self.cards.push(card);
        id
    }

    pub fn rng_mut(&mut self) -> &mut GameRng {
        &mut self.rng
    }

    /// Is `id` a minion currently on its owner's board?
    #[must_use]
    pub fn is_on_board(&self, id: EntityId) -> bool {
        self.characters
            .get(&id)
            .and_then(Character::as_minion)
            .is_some_and(|m| self.players[m.owner()].minions.contains(&id))
    }

    fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        id
    }

    fn emitter_bus(&mut self, on: Emitter) -> &mut EventBus<Game> {
        self.bus_mut(on)
            .unwrap_or_else(|| panic!("no event bus at {on:?}"))
    }

    /// Register a persistent handler.
    pub fn bind(
        &mut self,
        on: Emitter,
        kind: EventKind,
        callback: Callback<Game>,
        bound: &[BoundArg],
    ) -> HandlerId {
        self.emitter_bus(on).bind(kind, callback, bound)
    }

    /// Register a handler that runs once.
    pub fn bind_once(
        &mut self,
        on: Emitter,
        kind: EventKind,
        callback: Callback<Game>,
        bound: &[BoundArg],
    ) -> HandlerId {
        self.emitter_bus(on).bind_once(kind, callback, bound)
    }

    /// Remove every handler of `kind` registered with this callback.
    pub fn unbind(&mut self, on: Emitter, kind: EventKind, callback: &Callback<Game>) -> usize {
        self.emitter_bus(on).unbind(kind, callback)
    }

    pub fn unbind_handler(&mut self, on: Emitter, kind: EventKind, id: HandlerId) -> bool {
        self.emitter_bus(on).unbind_handler(kind, id)
    }

    /// Fire `event` on the bus at `on`.
    pub fn emit(&mut self, on: Emitter, event: Event) -> Result<()> {
        trigger(self, on, &event)
    }

    /// Ask `player`'s agent to pick one of `targets`.
    pub fn choose_target(&self, player: PlayerId, targets: &[EntityId]) -> Result<EntityId> {
        if targets.is_empty() {
            return Err(GameError::illegal("No legal targets"));
        }
        let choice = self.agent(player).choose_target(self, targets);
        if targets.contains(&choice) {
            Ok(choice)
        } else {
            Err(GameError::illegal(format!("{choice} is not a legal target")))
        }
    }
}

impl std::fmt::Debug for Game {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Game")
            .field("phase", &self.phase)
            .field("current", &self.current)
            .field("players", &self.players)
            .field("characters", &self.characters.len())
            .field("cards", &self.cards.len())
            .finish_non_exhaustive()
    }
}

fn turn_complete_handler(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    match bound.first().and_then(|arg| arg.entity()) {
        Some(id) => game.turn_complete(id),
        None => Ok(()),
    }
}

fn hero_died_handler(game: &mut Game, _: &Event, bound: &[BoundArg]) -> Result<()> {
    match bound.first().and_then(|arg| arg.player()) {
        Some(loser) => game.game_over(loser),
        None => Ok(()),
    }
}
