//! Game models.
//!
//! Immutable descriptions of finite two-player normal-form games. All
//! validation happens at construction time; once a value exists, every
//! solver in [`crate::analysis`] treats it as well-formed.

pub mod error;
pub mod normal_form;
pub mod symmetric;

pub use error::GameError;
pub use normal_form::{Label, NormalFormGame, Payoff, PayoffCell, Player, Profile};
pub use symmetric::SymmetricGame;
