//! Solution concepts for normal-form and Bayesian games.
//!
//! # Modules
//!
//! - `fraction`: exact rational arithmetic used for probabilities
//! - `dominance`: best responses, dominant and dominated strategies
//! - `equilibrium`: pure Nash equilibria, strict and trembling-hand refinements
//! - `evolution`: symmetric equilibria and evolutionary stability
//! - `mixed`: indifference probabilities for 2×2 games and market selection
//! - `bayesian`: type-contingent equilibria under a common prior
//!
//! Every function is pure: it reads a game and returns labels, profiles or
//! fractions. Inputs referencing unknown labels fail with a
//! [`GameError`](crate::game::GameError).

pub mod bayesian;
pub mod dominance;
pub mod equilibrium;
pub mod evolution;
pub mod fraction;
pub mod mixed;

pub use bayesian::{candidate_profiles, BayesianGame, BayesianProfile, JointPrior, PriorInequality};
pub use dominance::{
    best_response_set, dominance_verdict, strictly_dominant_strategy, weakly_dominant_strategy,
    weakly_dominated_strategies, DominanceVerdict,
};
pub use equilibrium::{
    classify_profiles, pure_nash_equilibria, strict_pure_nash_equilibria,
    trembling_hand_perfect_pure_equilibria, NashClass,
};
pub use evolution::{evolutionarily_stable_strategies, symmetric_nash_strategies};
pub use fraction::Fraction;
pub use mixed::{
    col_mix_probability, market_selection_equilibrium, market_selection_game, menu_index,
    mixed_equilibrium_2x2, row_mix_probability, MarketEquilibrium, MixedEquilibrium2x2,
    MixedSolution, MIXED_FRACTION_MENU,
};
