//! # Game Theory Core
//!
//! Exact solution concepts for small finite games, backward induction over
//! perfect-information trees, and a randomized generator of classroom
//! exercises.
//!
//! ## Features
//!
//! - **Normal-form analysis**: best responses, strict/weak dominance, pure
//!   Nash equilibria and their strict and trembling-hand refinements
//! - **Evolutionary stability**: symmetric equilibria and pure ESS
//! - **Exact mixed equilibria**: 2×2 indifference and the market-selection
//!   game, in reduced fractions
//! - **Bayesian games**: posteriors and equilibrium conditions as integer
//!   inequalities over the common prior
//! - **Backward induction**: deterministic tie-breaking, every decision node
//!   solved
//! - **Instance synthesis**: generate-then-repair construction of games with
//!   a requested structure, seeded and parallel
//!
//! ## Quick Start
//!
//! ```
//! use game_theory_core::analysis::{pure_nash_equilibria, strictly_dominant_strategy};
//! use game_theory_core::{NormalFormGame, Player, Profile};
//!
//! let pd = NormalFormGame::new(
//!     vec!["Cooperate", "Defect"],
//!     vec!["Cooperate", "Defect"],
//!     vec![vec![(3, 3), (0, 5)], vec![(5, 0), (1, 1)]],
//! )
//! .unwrap();
//!
//! assert_eq!(pure_nash_equilibria(&pd), vec![Profile::new("Defect", "Defect")]);
//! assert_eq!(strictly_dominant_strategy(&pd, Player::One).as_deref(), Some("Defect"));
//! ```
//!
//! ## Modules
//!
//! - [`game`]: normal-form and symmetric game models
//! - [`tree`]: extensive-form trees and the backward-induction solver
//! - [`analysis`]: solution concepts, mixed and Bayesian analyzers
//! - [`synth`]: randomized exercise synthesis
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Instance Synthesizer                       │
//! │  - Base fill              - Forced scenarios + repair           │
//! │  - Seeded StdRng          - Parallel batches (rayon)            │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               │ validates with
//!                               ▼
//!         ┌─────────────────────┼─────────────────────┐
//!         │                     │                     │
//!         ▼                     ▼                     ▼
//!    ┌───────────┐       ┌─────────────┐       ┌───────────┐
//!    │ Dominance │       │  Equilibria │       │  Mixed /  │
//!    │ & best    │       │  (Nash, THP,│       │  Bayesian │
//!    │ response  │       │   ESS)      │       │  (exact)  │
//!    └───────────┘       └─────────────┘       └───────────┘
//!         │                     │                     │
//!         └─────────────────────┼─────────────────────┘
//!                               ▼
//!                    ┌─────────────────────┐      ┌──────────────────┐
//!                    │   Game model        │      │ Extensive-form   │
//!                    │   (normal form)     │      │ tree + backward  │
//!                    └─────────────────────┘      │ induction        │
//!                                                 └──────────────────┘
//! ```

#![warn(missing_docs)]

/// Normal-form game model.
///
/// Immutable payoff grids with label lookup, plus the symmetric-game wrapper.
pub mod game;

/// Perfect-information extensive-form games.
pub mod tree;

/// Solution concepts.
///
/// Stateless functions over the game models; safe to call from any thread.
pub mod analysis;

/// Exercise synthesis.
pub mod synth;

// Re-export commonly used types at crate root for convenience
pub use analysis::{BayesianGame, BayesianProfile, Fraction, JointPrior, MixedSolution};
pub use game::{GameError, Label, NormalFormGame, Payoff, PayoffCell, Player, Profile, SymmetricGame};
pub use synth::{Exercise, ExerciseKind, SynthConfig, Synthesizer};
pub use tree::{solve_perfect_information, ExtensiveFormGame, SolveResult};
