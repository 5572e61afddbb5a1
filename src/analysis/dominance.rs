//! Best responses and dominance.
//!
//! All functions here read a [`NormalFormGame`] from the point of view of one
//! player: `own` indexes that player's strategies, `opp` the opponent's.

use serde::{Deserialize, Serialize};

use crate::game::{GameError, Label, NormalFormGame, Player};

/// Outcome of asking whether a player has a dominant strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "strategy", rename_all = "lowercase")]
pub enum DominanceVerdict {
    /// No strategy dominates all others.
    None,
    /// The strategy is weakly (but not strictly) dominant.
    Weak(Label),
    /// The strategy is strictly dominant.
    Strict(Label),
}

impl DominanceVerdict {
    /// The dominating label, if any.
    pub fn strategy(&self) -> Option<&str> {
        match self {
            DominanceVerdict::None => None,
            DominanceVerdict::Weak(s) | DominanceVerdict::Strict(s) => Some(s),
        }
    }
}

/// Indices of `player`'s strategies that maximize its payoff against `opp`.
pub(crate) fn best_response_indices(game: &NormalFormGame, player: Player, opp: usize) -> Vec<usize> {
    let n = game.strategies(player).len();
    let best = (0..n)
        .map(|own| game.utility(player, own, opp))
        .max()
        .unwrap_or_default();
    (0..n)
        .filter(|&own| game.utility(player, own, opp) == best)
        .collect()
}

/// Every strategy of `responder` attaining the maximal payoff when the
/// opponent plays `opponent_strategy`.
///
/// Ties produce several labels, in the game's strategy order. Fails with
/// [`GameError::InvalidStrategy`] if the opponent does not have that strategy.
pub fn best_response_set(
    game: &NormalFormGame,
    responder: Player,
    opponent_strategy: &str,
) -> Result<Vec<Label>, GameError> {
    let opp = game.index_of(responder.opponent(), opponent_strategy)?;
    let labels = game.strategies(responder);
    Ok(best_response_indices(game, responder, opp)
        .into_iter()
        .map(|i| labels[i].clone())
        .collect())
}

/// `a` strictly beats `b` against every opponent strategy.
fn strictly_dominates(game: &NormalFormGame, player: Player, a: usize, b: usize) -> bool {
    let opp_count = game.strategies(player.opponent()).len();
    (0..opp_count).all(|opp| game.utility(player, a, opp) > game.utility(player, b, opp))
}

/// `a` is never worse than `b` and strictly better against at least one opponent strategy.
fn weakly_dominates(game: &NormalFormGame, player: Player, a: usize, b: usize) -> bool {
    let opp_count = game.strategies(player.opponent()).len();
    let mut strictly_better = false;
    for opp in 0..opp_count {
        let (ua, ub) = (game.utility(player, a, opp), game.utility(player, b, opp));
        if ua < ub {
            return false;
        }
        if ua > ub {
            strictly_better = true;
        }
    }
    strictly_better
}

fn first_dominant<F>(game: &NormalFormGame, player: Player, dominates: F) -> Option<Label>
where
    F: Fn(&NormalFormGame, Player, usize, usize) -> bool,
{
    let labels = game.strategies(player);
    (0..labels.len())
        .find(|&s| (0..labels.len()).all(|other| other == s || dominates(game, player, s, other)))
        .map(|s| labels[s].clone())
}

/// The strategy of `player` that strictly beats every alternative against
/// every opponent strategy.
///
/// At most one strategy can qualify; the first one in strategy order is
/// returned. A player with a single strategy trivially has it as dominant.
pub fn strictly_dominant_strategy(game: &NormalFormGame, player: Player) -> Option<Label> {
    first_dominant(game, player, strictly_dominates)
}

/// The strategy of `player` that weakly dominates every alternative.
///
/// Note that a strictly dominant strategy also qualifies; use
/// [`dominance_verdict`] for the strict-first classification.
pub fn weakly_dominant_strategy(game: &NormalFormGame, player: Player) -> Option<Label> {
    first_dominant(game, player, weakly_dominates)
}

/// Classify `player`'s dominant strategy, consulting weak dominance only
/// when no strictly dominant strategy exists.
pub fn dominance_verdict(game: &NormalFormGame, player: Player) -> DominanceVerdict {
    if let Some(s) = strictly_dominant_strategy(game, player) {
        return DominanceVerdict::Strict(s);
    }
    match weakly_dominant_strategy(game, player) {
        Some(s) => DominanceVerdict::Weak(s),
        None => DominanceVerdict::None,
    }
}

/// Indices of `player`'s strategies that are weakly dominated by another strategy.
pub(crate) fn weakly_dominated_indices(game: &NormalFormGame, player: Player) -> Vec<usize> {
    let n = game.strategies(player).len();
    (0..n)
        .filter(|&s| (0..n).any(|other| other != s && weakly_dominates(game, player, other, s)))
        .collect()
}

/// Strategies of `player` for which some other strategy is never worse and
/// sometimes strictly better.
pub fn weakly_dominated_strategies(game: &NormalFormGame, player: Player) -> Vec<Label> {
    let labels = game.strategies(player);
    weakly_dominated_indices(game, player)
        .into_iter()
        .map(|i| labels[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_game() -> NormalFormGame {
        // u1: A = 4,2,7 ; B = 5,5,1  |  u2: A = 4,8,7 ; B = 4,9,3
        NormalFormGame::new(
            vec!["A", "B"],
            vec!["X", "Y", "Z"],
            vec![
                vec![(4, 4), (2, 8), (7, 7)],
                vec![(5, 4), (5, 9), (1, 3)],
            ],
        )
        .unwrap()
    }

    fn prisoners_dilemma() -> NormalFormGame {
        NormalFormGame::new(
            vec!["Cooperate", "Defect"],
            vec!["Cooperate", "Defect"],
            vec![vec![(3, 3), (0, 5)], vec![(5, 0), (1, 1)]],
        )
        .unwrap()
    }

    #[test]
    fn test_best_response_against_column() {
        let game = scenario_game();
        assert_eq!(best_response_set(&game, Player::One, "Y").unwrap(), vec!["B"]);
        assert_eq!(best_response_set(&game, Player::One, "Z").unwrap(), vec!["A"]);
        assert_eq!(best_response_set(&game, Player::Two, "B").unwrap(), vec!["Y"]);
    }

    #[test]
    fn test_best_response_ties() {
        let game = NormalFormGame::new(
            vec!["A", "B", "C"],
            vec!["X"],
            vec![vec![(3, 0)], vec![(1, 0)], vec![(3, 0)]],
        )
        .unwrap();
        assert_eq!(best_response_set(&game, Player::One, "X").unwrap(), vec!["A", "C"]);
        assert_eq!(best_response_set(&game, Player::Two, "B").unwrap(), vec!["X"]);
    }

    #[test]
    fn test_best_response_invalid_opponent() {
        let game = scenario_game();
        let err = best_response_set(&game, Player::One, "A").unwrap_err();
        assert!(matches!(err, GameError::InvalidStrategy { player: Player::Two, .. }));
    }

    #[test]
    fn test_prisoners_dilemma_dominance() {
        let game = prisoners_dilemma();
        for player in Player::BOTH {
            assert_eq!(strictly_dominant_strategy(&game, player).as_deref(), Some("Defect"));
            assert_eq!(
                dominance_verdict(&game, player),
                DominanceVerdict::Strict("Defect".to_string())
            );
            assert_eq!(weakly_dominated_strategies(&game, player), vec!["Cooperate"]);
        }
    }

    #[test]
    fn test_weak_but_not_strict() {
        // T ties B against L and wins against R
        let game = NormalFormGame::new(
            vec!["T", "B"],
            vec!["L", "R"],
            vec![vec![(1, 1), (2, 0)], vec![(1, 0), (0, 1)]],
        )
        .unwrap();
        assert_eq!(strictly_dominant_strategy(&game, Player::One), None);
        assert_eq!(weakly_dominant_strategy(&game, Player::One).as_deref(), Some("T"));
        assert_eq!(dominance_verdict(&game, Player::One), DominanceVerdict::Weak("T".into()));
        assert_eq!(dominance_verdict(&game, Player::Two), DominanceVerdict::None);
        assert_eq!(weakly_dominated_strategies(&game, Player::One), vec!["B"]);
        assert!(weakly_dominated_strategies(&game, Player::Two).is_empty());
    }

    #[test]
    fn test_identical_strategies_dominate_nothing() {
        let game = NormalFormGame::new(
            vec!["A", "B"],
            vec!["X", "Y"],
            vec![vec![(2, 0), (3, 0)], vec![(2, 0), (3, 0)]],
        )
        .unwrap();
        assert_eq!(dominance_verdict(&game, Player::One), DominanceVerdict::None);
        assert!(weakly_dominated_strategies(&game, Player::One).is_empty());
    }

    #[test]
    fn test_verdict_json_shape() {
        let json = serde_json::to_string(&DominanceVerdict::Weak("C".into())).unwrap();
        assert_eq!(json, r#"{"kind":"weak","strategy":"C"}"#);
        assert_eq!(serde_json::to_string(&DominanceVerdict::None).unwrap(), r#"{"kind":"none"}"#);
    }
}
