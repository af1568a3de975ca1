//! Error types for the rules engine.
//!
//! Every error is synchronous and surfaced to the caller; the engine never
//! retries. Broken internal invariants (unknown ids, board indices out of
//! range) are programming errors and panic instead.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// The action is not legal in the current state (cannot attack,
    /// unplayable card, bad target choice, ...).
    #[error("Illegal action: {0}")]
    IllegalAction(String),

    #[error("The game has ended")]
    GameEnded,

    /// Drawing from an empty deck. Players convert this into fatigue.
    #[error("No cards left in the deck")]
    DeckExhausted,

    #[error("Invalid put back: {0}")]
    InvalidPutBack(String),
}

impl GameError {
    pub(crate) fn illegal(message: impl Into<String>) -> Self {
        GameError::IllegalAction(message.into())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
