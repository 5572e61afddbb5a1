//! Exercise kinds and generated instances.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::analysis::bayesian::{BayesianGame, BayesianProfile, JointPrior};
use crate::analysis::mixed::{market_selection_equilibrium, menu_index, row_mix_probability};
use crate::analysis::{
    candidate_profiles, dominance_verdict, evolutionarily_stable_strategies, pure_nash_equilibria,
    strict_pure_nash_equilibria, strictly_dominant_strategy, trembling_hand_perfect_pure_equilibria,
    DominanceVerdict,
};
use crate::game::{Label, NormalFormGame, Payoff, Player, Profile, SymmetricGame};

/// The exercise families the synthesizer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseKind {
    /// Best responses in a 3×3 game.
    BestResponse,
    /// Strictly dominant strategies in a 4×3 game.
    StrictDominance,
    /// Weakly or strictly dominant strategies in a 4×3 game.
    WeakDominance,
    /// Pure Nash equilibria of a 4×3 game.
    NashEquilibria,
    /// Strict pure Nash equilibria of a 4×3 game.
    StrictNash,
    /// Mixed equilibrium of a 2×2 game.
    MixedEquilibrium,
    /// Trembling-hand perfect equilibria of a 3×3 game.
    TremblingHand,
    /// Evolutionarily stable strategies of a symmetric 3×3 game.
    EvolutionaryStability,
    /// Fully mixed equilibrium of the market-selection game.
    MarketSelection,
    /// Bayesian game with one informed player.
    BayesianOneSided,
    /// Bayesian game with two informed players.
    BayesianTwoSided,
}

impl ExerciseKind {
    /// Every kind, in exercise order.
    pub const ALL: [ExerciseKind; 11] = [
        ExerciseKind::BestResponse,
        ExerciseKind::StrictDominance,
        ExerciseKind::WeakDominance,
        ExerciseKind::NashEquilibria,
        ExerciseKind::StrictNash,
        ExerciseKind::MixedEquilibrium,
        ExerciseKind::TremblingHand,
        ExerciseKind::EvolutionaryStability,
        ExerciseKind::MarketSelection,
        ExerciseKind::BayesianOneSided,
        ExerciseKind::BayesianTwoSided,
    ];

    /// Command-line name.
    pub fn name(&self) -> &'static str {
        match self {
            ExerciseKind::BestResponse => "best-response",
            ExerciseKind::StrictDominance => "strict-dominance",
            ExerciseKind::WeakDominance => "weak-dominance",
            ExerciseKind::NashEquilibria => "nash-equilibria",
            ExerciseKind::StrictNash => "strict-nash",
            ExerciseKind::MixedEquilibrium => "mixed-equilibrium",
            ExerciseKind::TremblingHand => "trembling-hand",
            ExerciseKind::EvolutionaryStability => "evolutionary-stability",
            ExerciseKind::MarketSelection => "market-selection",
            ExerciseKind::BayesianOneSided => "bayesian-one-sided",
            ExerciseKind::BayesianTwoSided => "bayesian-two-sided",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExerciseKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ExerciseKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ExerciseKind::ALL.iter().map(|k| k.name()).collect();
                format!("unknown exercise kind '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}

/// Strength of a forced dominance relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominanceKind {
    /// Strictly better against every opponent strategy.
    Strict,
    /// Never worse and sometimes strictly better.
    Weak,
}

/// The structure a generator deliberately built into an instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum Scenario {
    /// Dominant strategies forced for one or both players.
    DominantStrategies {
        /// Player 1's forced strategy.
        row: Option<(Label, DominanceKind)>,
        /// Player 2's forced strategy.
        col: Option<(Label, DominanceKind)>,
    },
    /// A single cell made a strict equilibrium.
    StrictEquilibrium {
        /// The forced cell.
        profile: Profile,
    },
    /// A strictly dominant column with two rows tied for player 1 inside it.
    TiedEquilibria {
        /// The two equilibria, in row order.
        profiles: [Profile; 2],
    },
    /// Payoffs arranged so the row mix is exactly `1/n`.
    IndifferenceTarget {
        /// Denominator of the target probability.
        n: i64,
    },
    /// Diagonal entries raised to their column maximum.
    RaisedDiagonal {
        /// Strategies whose diagonal entry was raised.
        strategies: Vec<Label>,
    },
}

/// A generated exercise instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Exercise {
    /// Which strategies of `responder` answer `opponent_strategy` best?
    BestResponse {
        /// The game.
        game: NormalFormGame,
        /// Player whose best responses are asked for.
        responder: Player,
        /// Strategy the opponent is fixed at.
        opponent_strategy: Label,
    },
    /// Does either player have a strictly dominant strategy?
    StrictDominance {
        /// The game.
        game: NormalFormGame,
        /// Forced structure, if any.
        scenario: Option<Scenario>,
    },
    /// Which players have a weakly or strictly dominant strategy?
    WeakDominance {
        /// The game.
        game: NormalFormGame,
        /// Forced structure, if any.
        scenario: Option<Scenario>,
    },
    /// List the pure Nash equilibria.
    NashEquilibria {
        /// The game.
        game: NormalFormGame,
        /// Forced structure, if any.
        scenario: Option<Scenario>,
    },
    /// Classify every cell as strict, weak, or no equilibrium.
    StrictNash {
        /// The game.
        game: NormalFormGame,
        /// Forced structure, if any.
        scenario: Option<Scenario>,
    },
    /// Find player 1's equilibrium mix.
    MixedEquilibrium {
        /// The 2×2 game.
        game: NormalFormGame,
        /// Target probability.
        scenario: Option<Scenario>,
    },
    /// List the trembling-hand perfect pure equilibria.
    TremblingHand {
        /// The game.
        game: NormalFormGame,
    },
    /// List the evolutionarily stable strategies.
    EvolutionaryStability {
        /// The symmetric game.
        game: SymmetricGame,
        /// Forced structure, if any.
        scenario: Option<Scenario>,
    },
    /// Find the fully mixed equilibrium of the market-selection game.
    MarketSelection {
        /// The 3×3 game.
        game: NormalFormGame,
        /// Firm 2's payoff when alone in market `Z`.
        z_value: Payoff,
    },
    /// List the Bayesian equilibria with one informed player.
    BayesianOneSided {
        /// The Bayesian game.
        game: BayesianGame,
    },
    /// Posteriors and candidate checks with two informed players.
    BayesianTwoSided {
        /// The Bayesian game.
        game: BayesianGame,
        /// Joint prior on a common denominator.
        prior: JointPrior,
        /// Candidate profile shown next to the fixed first candidate.
        alternative: BayesianProfile,
    },
}

impl Exercise {
    /// The exercise family.
    pub fn kind(&self) -> ExerciseKind {
        match self {
            Exercise::BestResponse { .. } => ExerciseKind::BestResponse,
            Exercise::StrictDominance { .. } => ExerciseKind::StrictDominance,
            Exercise::WeakDominance { .. } => ExerciseKind::WeakDominance,
            Exercise::NashEquilibria { .. } => ExerciseKind::NashEquilibria,
            Exercise::StrictNash { .. } => ExerciseKind::StrictNash,
            Exercise::MixedEquilibrium { .. } => ExerciseKind::MixedEquilibrium,
            Exercise::TremblingHand { .. } => ExerciseKind::TremblingHand,
            Exercise::EvolutionaryStability { .. } => ExerciseKind::EvolutionaryStability,
            Exercise::MarketSelection { .. } => ExerciseKind::MarketSelection,
            Exercise::BayesianOneSided { .. } => ExerciseKind::BayesianOneSided,
            Exercise::BayesianTwoSided { .. } => ExerciseKind::BayesianTwoSided,
        }
    }

    /// The forced structure, if the generator forced one.
    pub fn scenario(&self) -> Option<&Scenario> {
        match self {
            Exercise::StrictDominance { scenario, .. }
            | Exercise::WeakDominance { scenario, .. }
            | Exercise::NashEquilibria { scenario, .. }
            | Exercise::StrictNash { scenario, .. }
            | Exercise::MixedEquilibrium { scenario, .. }
            | Exercise::EvolutionaryStability { scenario, .. } => scenario.as_ref(),
            _ => None,
        }
    }

    /// The underlying normal-form game, for the non-Bayesian kinds.
    pub fn normal_form(&self) -> Option<&NormalFormGame> {
        match self {
            Exercise::BestResponse { game, .. }
            | Exercise::StrictDominance { game, .. }
            | Exercise::WeakDominance { game, .. }
            | Exercise::NashEquilibria { game, .. }
            | Exercise::StrictNash { game, .. }
            | Exercise::MixedEquilibrium { game, .. }
            | Exercise::TremblingHand { game }
            | Exercise::MarketSelection { game, .. } => Some(game),
            Exercise::EvolutionaryStability { game, .. } => Some(game.game()),
            Exercise::BayesianOneSided { .. } | Exercise::BayesianTwoSided { .. } => None,
        }
    }

    /// Whether the instance has the structure its exercise asks about, e.g.
    /// a dominant strategy for the dominance kinds or a non-empty
    /// equilibrium set for the equilibrium kinds.
    pub fn exhibits_structure(&self) -> bool {
        match self {
            Exercise::BestResponse { .. } => true,
            Exercise::StrictDominance { game, .. } => Player::BOTH
                .iter()
                .any(|&p| strictly_dominant_strategy(game, p).is_some()),
            Exercise::WeakDominance { game, .. } => Player::BOTH
                .iter()
                .any(|&p| dominance_verdict(game, p) != DominanceVerdict::None),
            Exercise::NashEquilibria { game, .. } => !pure_nash_equilibria(game).is_empty(),
            Exercise::StrictNash { game, .. } => !strict_pure_nash_equilibria(game).is_empty(),
            Exercise::MixedEquilibrium { game, .. } => {
                let on_menu = row_mix_probability(game)
                    .ok()
                    .and_then(|s| s.probability())
                    .and_then(menu_index)
                    .is_some();
                on_menu && pure_nash_equilibria(game).is_empty()
            }
            Exercise::TremblingHand { game } => !trembling_hand_perfect_pure_equilibria(game).is_empty(),
            Exercise::EvolutionaryStability { game, .. } => !evolutionarily_stable_strategies(game).is_empty(),
            Exercise::MarketSelection { z_value, .. } => market_selection_equilibrium(*z_value).is_some(),
            Exercise::BayesianOneSided { game } => !game.pure_equilibria().is_empty(),
            Exercise::BayesianTwoSided { game, alternative, .. } => {
                let candidates = candidate_profiles();
                let found = [&candidates[0], alternative]
                    .into_iter()
                    .any(|p| game.is_equilibrium(p).unwrap_or(false));
                found
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_roundtrip() {
        for kind in ExerciseKind::ALL {
            assert_eq!(kind.name().parse::<ExerciseKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
        let err = "auction".parse::<ExerciseKind>().unwrap_err();
        assert!(err.contains("best-response"));
    }

    #[test]
    fn test_scenario_json_shape() {
        let scenario = Scenario::DominantStrategies {
            row: None,
            col: Some(("Y".to_string(), DominanceKind::Weak)),
        };
        let value = serde_json::to_value(&scenario).unwrap();
        assert_eq!(value["scenario"], "dominant_strategies");
        assert_eq!(value["col"][1], "weak");
    }

    #[test]
    fn test_two_sided_structure_checks_both_candidates() {
        // 2*Prob(b,c) < 3*Prob(b,d), so the first candidate fails here
        let prior = JointPrior { den: 10, w: 1, x: 2, y: 3, z: 4 };
        let game = BayesianGame::two_sided_exercise(&prior).unwrap();
        let candidates = candidate_profiles();

        let never = Exercise::BayesianTwoSided {
            game: game.clone(),
            prior,
            alternative: candidates[1].clone(),
        };
        assert!(!never.exhibits_structure());

        let always = Exercise::BayesianTwoSided {
            game,
            prior,
            alternative: candidates[2].clone(),
        };
        assert!(always.exhibits_structure());
        assert_eq!(always.kind(), ExerciseKind::BayesianTwoSided);
        assert!(always.normal_form().is_none());
    }
}
