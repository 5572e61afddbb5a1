//! Extensive-form games with perfect information.
//!
//! - `model`: validated game trees and their JSON shape
//! - `solver`: backward induction with deterministic tie-breaking

pub mod model;
pub mod solver;

pub use model::{ExtensiveFormGame, GameNode, TerminalPayoff, TreeAction};
pub use solver::{solve_perfect_information, SolveResult, SolveStep};
