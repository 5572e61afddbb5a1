//! Symmetric equilibria and evolutionarily stable strategies.

use crate::game::{Label, SymmetricGame};

/// `s` is a best response to itself: no strategy earns strictly more against `s`.
fn is_symmetric_nash(game: &SymmetricGame, s: usize) -> bool {
    let u_ss = game.u(s, s);
    (0..game.strategies().len()).all(|alt| game.u(alt, s) <= u_ss)
}

/// Strategies `s` for which `(s, s)` is a Nash equilibrium.
pub fn symmetric_nash_strategies(game: &SymmetricGame) -> Vec<Label> {
    let labels = game.strategies();
    (0..labels.len())
        .filter(|&s| is_symmetric_nash(game, s))
        .map(|s| labels[s].clone())
        .collect()
}

/// Pure evolutionarily stable strategies.
///
/// `s` is stable if it is a best response to itself and every other best
/// response `s'` to `s` is driven out: `u(s', s') < u(s, s')`. Mixed
/// invaders are not considered.
pub fn evolutionarily_stable_strategies(game: &SymmetricGame) -> Vec<Label> {
    let labels = game.strategies();
    let n = labels.len();
    (0..n)
        .filter(|&s| is_symmetric_nash(game, s))
        .filter(|&s| {
            let u_ss = game.u(s, s);
            (0..n)
                .filter(|&alt| alt != s && game.u(alt, s) == u_ss)
                .all(|alt| game.u(alt, alt) < game.u(s, alt))
        })
        .map(|s| labels[s].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(u: Vec<Vec<i64>>) -> SymmetricGame {
        SymmetricGame::from_row_payoffs(vec!["A", "B", "C"], u).unwrap()
    }

    #[test]
    fn test_strict_diagonal_is_stable() {
        let game = sym(vec![vec![5, 0, 0], vec![0, 3, 0], vec![6, 0, 1]]);
        // A beaten by C against A; B and C are strict best replies to themselves
        assert_eq!(symmetric_nash_strategies(&game), vec!["B", "C"]);
        assert_eq!(evolutionarily_stable_strategies(&game), vec!["B", "C"]);
    }

    #[test]
    fn test_tied_invader_must_lose_in_its_own_population() {
        // B ties A against A. u(B,B)=2 < u(A,B)=4, so A survives the invasion.
        let stable = sym(vec![vec![3, 4, 0], vec![3, 2, 0], vec![0, 0, 1]]);
        assert!(evolutionarily_stable_strategies(&stable).contains(&"A".to_string()));

        // u(B,B)=4 >= u(A,B)=4, so A is not stable (B is neutral at best)
        let unstable = sym(vec![vec![3, 4, 0], vec![3, 4, 0], vec![0, 0, 1]]);
        assert!(symmetric_nash_strategies(&unstable).contains(&"A".to_string()));
        assert!(!evolutionarily_stable_strategies(&unstable).contains(&"A".to_string()));
    }

    #[test]
    fn test_ess_subset_of_symmetric_nash() {
        let game = sym(vec![vec![2, 2, 2], vec![2, 2, 2], vec![2, 2, 2]]);
        assert_eq!(symmetric_nash_strategies(&game).len(), 3);
        assert!(evolutionarily_stable_strategies(&game).is_empty());
    }
}
