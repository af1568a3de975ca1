//! Mulligan, the turn loop, drawing, playing cards and hero powers.

use std::rc::Rc;
use tracing::debug;

use super::{Emitter, Game, MatchPhase};
use crate::cards::{targeting, CardEffect, CardKind};
use crate::characters::Combatant;
use crate::core::{CardId, EntityId, PlayerId};
use crate::error::{GameError, Result};
use crate::events::{DamageSource, Event};

impl Game {
    /// Run the whole match: mulligan, then turns until a hero dies.
    pub fn start(&mut self) -> Result<()> {
        self.pre_game()?;
        while !self.game_ended() {
            self.play_single_turn()?;
        }
        Ok(())
    }

    /// Let both players mulligan, first player first.
    pub fn pre_game(&mut self) -> Result<()> {
        if self.phase != MatchPhase::AwaitingMulligan {
            return Err(GameError::illegal("The mulligan has already happened"));
        }
        for player in PlayerId::both() {
            self.mulligan(player)?;
        }
        self.current = PlayerId::FIRST;
        self.phase = MatchPhase::TurnCycle {
            active: PlayerId::FIRST,
        };
        Ok(())
    }

    fn mulligan(&mut self, player: PlayerId) -> Result<()> {
        let hand = self.players[player].hand.clone();
        let keep = self.agent(player).do_card_check(self, &hand);
        if keep.len() != hand.len() {
            return Err(GameError::illegal(format!(
                "Expected {} mulligan choices, got {}",
                hand.len(),
                keep.len()
            )));
        }
        self.emit(
            Emitter::Game,
            Event::KeptCards {
                player,
                kept: keep.clone(),
            },
        )?;

        // Replacements are drawn before the rejected cards go back, so a
        // card is never redrawn straight away.
        let mut rejected = Vec::new();
        for (&card, &kept) in hand.iter().zip(&keep) {
            if !kept {
                self.draw(player)?;
                rejected.push(card);
            }
        }
        for card in rejected {
            self.put_back(player, card)?;
        }
        Ok(())
    }

    /// One full turn: start, the agent's actions, end.
    pub fn play_single_turn(&mut self) -> Result<()> {
        self.start_turn()?;
        if self.game_ended() {
            return Ok(());
        }
        let player = self.current;
        self.agent(player).do_turn(self, player)?;
        if self.game_ended() {
            return Ok(());
        }
        self.end_turn()
    }

    /// Hand the turn to the next player, refill mana and draw.
    pub fn start_turn(&mut self) -> Result<()> {
        match self.phase {
            MatchPhase::Ended => return Err(GameError::GameEnded),
            MatchPhase::AwaitingMulligan => {
                return Err(GameError::illegal("The mulligan has not happened yet"))
            }
            MatchPhase::TurnCycle { .. } => {}
        }
        if self.turn > 0 {
            self.current = self.current.opponent();
        }
        self.turn += 1;
        let player = self.current;
        self.phase = MatchPhase::TurnCycle { active: player };

        let cap = self.config.mana_cap;
        let seat = &mut self.players[player];
        seat.max_mana = (seat.max_mana + 1).min(cap);

        let other = player.opponent();
        for secret in self.players[other].secrets.clone() {
            if let Some((activate, _)) = self.secret_hooks(secret) {
                activate(self, other, secret)?;
            }
        }

        let seat = &mut self.players[player];
        seat.mana = seat.max_mana;
        seat.power_used = false;
        debug!(turn = self.turn, %player, mana = seat.mana, "turn started");

        self.emit(Emitter::Player(player), Event::TurnStarted)?;
        self.draw(player)
    }

    /// Finish the current player's turn.
    pub fn end_turn(&mut self) -> Result<()> {
        match self.phase {
            MatchPhase::Ended => return Err(GameError::GameEnded),
            MatchPhase::AwaitingMulligan => {
                return Err(GameError::illegal("The mulligan has not happened yet"))
            }
            MatchPhase::TurnCycle { .. } => {}
        }
        let player = self.current;
        let other = player.opponent();
        debug!(turn = self.turn, %player, "turn ended");
        self.emit(Emitter::Player(player), Event::TurnEnded)?;

        // The opponent's characters frozen this turn stay frozen through
        // their own next turn.
        for id in self.side(other) {
            self.character_mut(id).stats_mut().frozen_this_turn = false;
        }
        for id in self.side(player) {
            let stats = self.character_mut(id).stats_mut();
            stats.active = true;
            stats.used_wind_fury = false;
            if stats.frozen_this_turn {
                stats.frozen_this_turn = false;
            } else {
                stats.frozen = false;
            }
        }

        for secret in self.players[other].secrets.clone() {
            if let Some((_, deactivate)) = self.secret_hooks(secret) {
                deactivate(self, other, secret)?;
            }
        }
        Ok(())
    }

    /// Hero first, then minions in board order.
    fn side(&self, player: PlayerId) -> Vec<EntityId> {
        let seat = &self.players[player];
        std::iter::once(seat.hero).chain(seat.minions.iter().copied()).collect()
    }

    fn secret_hooks(&self, card: CardId) -> Option<(CardEffect, CardEffect)> {
        match &self.card(card).kind {
            CardKind::Secret {
                activate,
                deactivate,
            } => Some((Rc::clone(activate), Rc::clone(deactivate))),
            _ => None,
        }
    }

    /// Draw a card for `player`. An empty deck deals fatigue instead, one
    /// more each time, and resolves the hero's damage at once.
    pub fn draw(&mut self, player: PlayerId) -> Result<()> {
        if self.players[player].deck.can_draw() {
            let card = self.players[player].deck.draw(&mut self.rng)?;
            self.emit(Emitter::Player(player), Event::CardDrawn { card })?;
            if self.players[player].hand.len() < self.config.hand_limit {
                self.players[player].hand.push(card);
            } else {
                debug!(%player, %card, "hand full, card burned");
                self.emit(Emitter::Player(player), Event::CardDestroyed { card })?;
            }
            return Ok(());
        }

        let seat = &mut self.players[player];
        seat.fatigue += 1;
        let amount = seat.fatigue;
        let hero = seat.hero;
        debug!(%player, amount, "fatigue");
        self.emit(Emitter::Player(player), Event::FatigueDamage { amount })?;
        self.damage(hero, amount, DamageSource::Fatigue)?;
        self.activate_delayed(hero)
    }

    /// Return a card from `player`'s hand to their deck.
    pub fn put_back(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        let position = self.players[player]
            .hand
            .iter()
            .position(|&c| c == card)
            .ok_or_else(|| GameError::InvalidPutBack(format!("{card} is not in the hand of {player}")))?;
        self.players[player].deck.put_back(card)?;
        self.players[player].hand.remove(position);
        self.emit(Emitter::Player(player), Event::CardPutBack { card })
    }

    /// Cost of `card` for `player` after mana filters.
    #[must_use]
    pub fn mana_cost(&self, player: PlayerId, card: CardId) -> i32 {
        self.card(card).mana_cost(&self.players[player])
    }

    /// Can `player` afford `card` and does it have what it needs?
    ///
    /// Recomputes and stores the card's target candidates.
    pub fn can_use(&mut self, player: PlayerId, card: CardId) -> bool {
        let seat = &self.players[player];
        let candidate = self.card(card);
        if seat.mana < candidate.mana_cost(seat) {
            return false;
        }
        if candidate.is_secret()
            && seat
                .secrets
                .iter()
                .any(|&secret| self.card(secret).name == candidate.name)
        {
            return false;
        }
        let Some(targeting) = candidate.targeting else {
            return true;
        };
        let targets = (targeting.finder)(self, targeting.filter);
        let blocked = targets.as_ref().is_some_and(Vec::is_empty);
        self.card_mut(card).targets = targets;
        !blocked
    }

    /// Play `card` from the current player's hand.
    pub fn play_card(&mut self, card: CardId) -> Result<()> {
        if self.game_ended() {
            return Err(GameError::GameEnded);
        }
        let player = self.current;
        if !self.players[player].hand.contains(&card) {
            return Err(GameError::illegal(format!("{card} is not in the hand of {player}")));
        }
        if !self.can_use(player, card) {
            return Err(GameError::illegal("That card cannot be used"));
        }
        debug!(%player, %card, name = %self.card(card).name, "card played");
        self.emit(Emitter::Player(player), Event::CardPlayed { card })?;

        let hand = &mut self.players[player].hand;
        if let Some(position) = hand.iter().position(|&c| c == card) {
            hand.remove(position);
        }
        if !self.can_use(player, card) {
            return Err(GameError::illegal("Tried to play a card that could not be played"));
        }
        let cost = self.mana_cost(player, card);
        self.players[player].mana -= cost;

        if self.card(card).is_spell() {
            self.emit(Emitter::Player(player), Event::SpellCast { card })?;
        }
        if self.card(card).cancel {
            debug!(%card, "card cancelled");
            return Ok(());
        }
        self.use_card(player, card)?;
        self.emit(Emitter::Player(player), Event::CardUsed { card })?;
        self.flush_delayed()
    }

    fn use_card(&mut self, player: PlayerId, card: CardId) -> Result<()> {
        if self.card(card).is_targetable() {
            let target = match self.card(card).targets.clone() {
                Some(targets) => Some(self.choose_target(player, &targets)?),
                None => None,
            };
            self.card_mut(card).target = target;
        }

        match self.card(card).kind.clone() {
            CardKind::Spell { effect } => effect(self, player, card),
            CardKind::Minion { create } => {
                let minion = create(player);
                let index = self.agent(player).choose_index(self, card, player);
                let board_len = self.players[player].minions.len();
                if index > board_len {
                    return Err(GameError::illegal(format!(
                        "Board index {index} is out of range 0..={board_len}"
                    )));
                }
                self.add_to_board(minion, Some(card), player, index).map(|_| ())
            }
            CardKind::Secret { .. } => {
                self.players[player].secrets.push(card);
                self.card_mut(card).owner = Some(player);
                Ok(())
            }
            CardKind::Weapon { create } => {
                let mut weapon = create(player);
                weapon.card = Some(card);
                self.equip_weapon(player, weapon)
            }
        }
    }

    /// Reveal a triggered secret and take it out of play.
    ///
    /// # Panics
    ///
    /// If `card` is not a secret in play.
    pub fn reveal_secret(&mut self, card: CardId) -> Result<()> {
        let owner = self
            .card(card)
            .owner
            .unwrap_or_else(|| panic!("{card} is not a secret in play"));
        debug!(%owner, %card, "secret revealed");
        self.emit(Emitter::Player(owner), Event::SecretRevealed { card })?;
        self.players[owner].secrets.retain(|&s| s != card);
        if let Some((_, deactivate)) = self.secret_hooks(card) {
            deactivate(self, owner, card)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn can_use_power(&self, player: PlayerId) -> bool {
        let seat = &self.players[player];
        !seat.power_used
            && seat.mana >= self.config.power_cost
            && self.hero(player).power().can_use(self, player)
    }

    /// Use the current player's hero power.
    pub fn use_power(&mut self, player: PlayerId) -> Result<()> {
        if self.game_ended() {
            return Err(GameError::GameEnded);
        }
        if player != self.current {
            return Err(GameError::illegal(format!("It is not the turn of {player}")));
        }
        if self.players[player].power_used {
            return Err(GameError::illegal("The hero power was already used this turn"));
        }
        if !self.can_use_power(player) {
            return Err(GameError::illegal("The hero power cannot be used"));
        }
        let power = Rc::clone(self.hero(player).power());
        let seat = &mut self.players[player];
        seat.mana -= self.config.power_cost;
        seat.power_used = true;
        debug!(%player, power = power.name(), "hero power used");

        self.emit(Emitter::Player(player), Event::PowerUsed)?;
        power.activate(self, player)?;
        self.flush_delayed()
    }

    /// Let `player` pick any spell-targetable character for a hero power.
    pub fn find_power_target(&mut self, player: PlayerId) -> Result<EntityId> {
        let targets =
            targeting::spell_targets(self, targeting::spell_targetable).unwrap_or_default();
        let target = self.choose_target(player, &targets)?;
        let hero = self.players[player].hero;
        self.emit(Emitter::Character(hero), Event::FoundPowerTarget { target })?;
        Ok(target)
    }

    /// End the match with `loser` defeated.
    pub fn game_over(&mut self, loser: PlayerId) -> Result<()> {
        if self.game_ended() {
            return Ok(());
        }
        self.phase = MatchPhase::Ended;
        debug!(%loser, "game over");
        self.emit(Emitter::Game, Event::GameOver { loser })
    }
}
