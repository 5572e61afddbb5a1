//! Pure-strategy Nash equilibria and their refinements.
//!
//! The strategy sets involved are tiny (at most four strategies per player),
//! so every routine enumerates the full strategy product. Results are listed
//! in row-major grid order.

use serde::{Deserialize, Serialize};

use crate::game::{NormalFormGame, Player, Profile};

use super::dominance::weakly_dominated_indices;

/// How a single profile relates to the pure Nash conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NashClass {
    /// Some player has a strictly profitable unilateral deviation.
    NotEquilibrium,
    /// A Nash equilibrium where at least one player has a tied alternative.
    Weak,
    /// Each player's action is the unique best response.
    Strict,
}

/// `own` is a best response of `player` to `opp`: no alternative pays strictly more.
fn is_best_response(game: &NormalFormGame, player: Player, own: usize, opp: usize) -> bool {
    let value = game.utility(player, own, opp);
    (0..game.strategies(player).len()).all(|alt| game.utility(player, alt, opp) <= value)
}

/// `own` is the unique maximizer for `player` against `opp`.
fn is_unique_best_response(game: &NormalFormGame, player: Player, own: usize, opp: usize) -> bool {
    let value = game.utility(player, own, opp);
    (0..game.strategies(player).len())
        .all(|alt| alt == own || game.utility(player, alt, opp) < value)
}

/// Classify the profile at grid position `(r, c)`.
pub(crate) fn classify(game: &NormalFormGame, r: usize, c: usize) -> NashClass {
    if !is_best_response(game, Player::One, r, c) || !is_best_response(game, Player::Two, c, r) {
        return NashClass::NotEquilibrium;
    }
    if is_unique_best_response(game, Player::One, r, c) && is_unique_best_response(game, Player::Two, c, r) {
        NashClass::Strict
    } else {
        NashClass::Weak
    }
}

fn grid_positions(game: &NormalFormGame) -> impl Iterator<Item = (usize, usize)> + '_ {
    let cols = game.cols().len();
    (0..game.rows().len()).flat_map(move |r| (0..cols).map(move |c| (r, c)))
}

/// Every profile in which each player's action is a best response to the other's.
pub fn pure_nash_equilibria(game: &NormalFormGame) -> Vec<Profile> {
    grid_positions(game)
        .filter(|&(r, c)| classify(game, r, c) != NashClass::NotEquilibrium)
        .map(|(r, c)| game.profile(r, c))
        .collect()
}

/// The pure Nash equilibria in which both actions are unique best responses.
pub fn strict_pure_nash_equilibria(game: &NormalFormGame) -> Vec<Profile> {
    grid_positions(game)
        .filter(|&(r, c)| classify(game, r, c) == NashClass::Strict)
        .map(|(r, c)| game.profile(r, c))
        .collect()
}

/// Classification of every cell of the grid, row-major.
pub fn classify_profiles(game: &NormalFormGame) -> Vec<(Profile, NashClass)> {
    grid_positions(game)
        .map(|(r, c)| (game.profile(r, c), classify(game, r, c)))
        .collect()
}

/// Pure Nash equilibria whose row and column strategies are both undominated.
///
/// This is the classroom characterization of trembling-hand perfection for
/// small two-player games, not the perturbed-game limit definition; answer
/// keys depend on exactly this rule.
pub fn trembling_hand_perfect_pure_equilibria(game: &NormalFormGame) -> Vec<Profile> {
    let dominated_rows = weakly_dominated_indices(game, Player::One);
    let dominated_cols = weakly_dominated_indices(game, Player::Two);
    grid_positions(game)
        .filter(|&(r, c)| classify(game, r, c) != NashClass::NotEquilibrium)
        .filter(|(r, c)| !dominated_rows.contains(r) && !dominated_cols.contains(c))
        .map(|(r, c)| game.profile(r, c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dominance::weakly_dominated_strategies;

    fn game(rows: Vec<&str>, cols: Vec<&str>, grid: Vec<Vec<(i64, i64)>>) -> NormalFormGame {
        NormalFormGame::new(rows, cols, grid).unwrap()
    }

    #[test]
    fn test_prisoners_dilemma() {
        let pd = game(
            vec!["Cooperate", "Defect"],
            vec!["Cooperate", "Defect"],
            vec![vec![(3, 3), (0, 5)], vec![(5, 0), (1, 1)]],
        );
        assert_eq!(pure_nash_equilibria(&pd), vec![Profile::new("Defect", "Defect")]);
        assert_eq!(strict_pure_nash_equilibria(&pd), vec![Profile::new("Defect", "Defect")]);
    }

    #[test]
    fn test_battle_of_the_sexes() {
        let bos = game(
            vec!["Opera", "Football"],
            vec!["Opera", "Football"],
            vec![vec![(3, 2), (0, 0)], vec![(0, 0), (2, 3)]],
        );
        let expected = vec![Profile::new("Opera", "Opera"), Profile::new("Football", "Football")];
        assert_eq!(pure_nash_equilibria(&bos), expected);
        assert_eq!(strict_pure_nash_equilibria(&bos), expected);
    }

    #[test]
    fn test_matching_pennies_has_none() {
        let mp = game(
            vec!["H", "T"],
            vec!["H", "T"],
            vec![vec![(1, 0), (0, 1)], vec![(0, 1), (1, 0)]],
        );
        assert!(pure_nash_equilibria(&mp).is_empty());
        assert!(trembling_hand_perfect_pure_equilibria(&mp).is_empty());
    }

    #[test]
    fn test_weak_equilibria_and_classes() {
        // column X ties for player 2 in row A
        let g = game(
            vec!["A", "B"],
            vec!["X", "Y"],
            vec![vec![(2, 1), (1, 1)], vec![(0, 0), (0, 2)]],
        );
        assert_eq!(
            pure_nash_equilibria(&g),
            vec![Profile::new("A", "X"), Profile::new("A", "Y")]
        );
        assert!(strict_pure_nash_equilibria(&g).is_empty());

        let classes = classify_profiles(&g);
        assert_eq!(classes.len(), 4);
        assert_eq!(classes[0], (Profile::new("A", "X"), NashClass::Weak));
        assert_eq!(classes[3].1, NashClass::NotEquilibrium);
    }

    #[test]
    fn test_trembling_hand_drops_dominated_equilibrium() {
        // (B,Y) is Nash but B and Y are weakly dominated
        let g = game(
            vec!["A", "B"],
            vec!["X", "Y"],
            vec![vec![(1, 1), (0, 0)], vec![(0, 0), (0, 0)]],
        );
        assert_eq!(
            pure_nash_equilibria(&g),
            vec![Profile::new("A", "X"), Profile::new("B", "Y")]
        );
        assert_eq!(trembling_hand_perfect_pure_equilibria(&g), vec![Profile::new("A", "X")]);
        assert_eq!(weakly_dominated_strategies(&g, Player::One), vec!["B"]);
    }

    #[test]
    fn test_class_serialization() {
        assert_eq!(serde_json::to_string(&NashClass::NotEquilibrium).unwrap(), "\"not_equilibrium\"");
    }
}
