//! The decision-maker behind a seat.

use crate::core::{CardId, EntityId, PlayerId};
use crate::error::Result;

use super::Game;

/// Makes every choice for one player.
///
/// Methods take `&self`: the game holds its agents behind `Rc` and calls
/// back into them while an agent's own `do_turn` is running (for targets
/// and board positions). Agents that keep state use interior mutability.
pub trait Agent {
    /// Called once when the game is built, before any card is dealt.
    fn set_game(&self, _game: &mut Game, _player: PlayerId) {}

    /// Mulligan: one entry per card in `hand`, `true` to keep it.
    fn do_card_check(&self, game: &Game, hand: &[CardId]) -> Vec<bool>;

    /// Take the player's turn. Returning ends the turn.
    fn do_turn(&self, game: &mut Game, player: PlayerId) -> Result<()>;

    /// Pick one of `targets` (never empty).
    fn choose_target(&self, game: &Game, targets: &[EntityId]) -> EntityId;

    /// Board position for a minion about to be played from `card`,
    /// between 0 and the current board size.
    fn choose_index(&self, game: &Game, card: CardId, player: PlayerId) -> usize;
}
