//! Errors raised when building or querying game models.

use std::fmt;

use super::normal_form::Player;

/// Errors that can occur when constructing a game or referencing its strategies.
///
/// Solvers never return these for well-formed input: malformed data is
/// rejected when the model is built, before any solver runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A strategy label is not part of the relevant player's strategy set.
    InvalidStrategy {
        /// Player whose strategy set was searched.
        player: Player,
        /// The label that could not be found.
        label: String,
    },
    /// The game description violates a structural invariant.
    MalformedGame(String),
    /// A type-contingent profile does not match the game's type sets.
    InvalidProfile(String),
}

impl GameError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        GameError::MalformedGame(msg.into())
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidStrategy { player, label } => {
                write!(f, "Strategy '{}' is not available to {}", label, player)
            }
            GameError::MalformedGame(msg) => write!(f, "Malformed game: {}", msg),
            GameError::InvalidProfile(msg) => write!(f, "Invalid profile: {}", msg),
        }
    }
}

impl std::error::Error for GameError {}
