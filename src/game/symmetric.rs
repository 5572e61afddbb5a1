//! Payoff-symmetric games, the input of the evolutionary analysis.

use serde::{Deserialize, Serialize};

use super::error::GameError;
use super::normal_form::{Label, NormalFormGame, Payoff};

/// A normal-form game in which both players share one strategy list and
/// `u2(r, c) = u1(c, r)`.
///
/// Symmetry is checked once when the value is built, so the evolutionary
/// solvers can treat every instance as well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NormalFormGame", into = "NormalFormGame")]
pub struct SymmetricGame(NormalFormGame);

impl SymmetricGame {
    /// Wrap a game, rejecting it if it is not payoff-symmetric.
    pub fn new(game: NormalFormGame) -> Result<Self, GameError> {
        if !game.is_symmetric() {
            return Err(GameError::malformed(
                "game is not symmetric: labels differ or u2(r,c) != u1(c,r)",
            ));
        }
        Ok(Self(game))
    }

    /// Build from the row player's payoff matrix; the column player's
    /// payoffs are mirrored from it.
    pub fn from_row_payoffs<L: Into<Label>>(
        labels: Vec<L>,
        u: Vec<Vec<Payoff>>,
    ) -> Result<Self, GameError> {
        let labels: Vec<Label> = labels.into_iter().map(Into::into).collect();
        let n = labels.len();
        if u.len() != n || u.iter().any(|row| row.len() != n) {
            return Err(GameError::malformed(format!(
                "symmetric payoff matrix must be {}x{}",
                n, n
            )));
        }
        let grid = (0..n)
            .map(|r| (0..n).map(|c| (u[r][c], u[c][r])).collect())
            .collect();
        let game = NormalFormGame::new(labels.clone(), labels, grid)?;
        Ok(Self(game))
    }

    /// The underlying normal-form game.
    pub fn game(&self) -> &NormalFormGame {
        &self.0
    }

    /// Shared strategy labels.
    pub fn strategies(&self) -> &[Label] {
        self.0.rows()
    }

    /// Payoff of a player using strategy `own` against an opponent using `opp`.
    pub fn u(&self, own: usize, opp: usize) -> Payoff {
        self.0.payoff(own, opp).0
    }

    /// Unwrap into the plain game.
    pub fn into_inner(self) -> NormalFormGame {
        self.0
    }
}

impl TryFrom<NormalFormGame> for SymmetricGame {
    type Error = GameError;

    fn try_from(game: NormalFormGame) -> Result<Self, Self::Error> {
        SymmetricGame::new(game)
    }
}

impl From<SymmetricGame> for NormalFormGame {
    fn from(game: SymmetricGame) -> Self {
        game.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirrors_row_payoffs() {
        let game = SymmetricGame::from_row_payoffs(
            vec!["A", "B"],
            vec![vec![1, 2], vec![3, 4]],
        )
        .unwrap();
        assert_eq!(game.game().payoff(0, 1), (2, 3));
        assert_eq!(game.u(1, 0), 3);
    }

    #[test]
    fn test_rejects_asymmetric_game() {
        let game = NormalFormGame::new(
            vec!["A", "B"],
            vec!["A", "B"],
            vec![vec![(1, 1), (2, 0)], vec![(3, 2), (4, 4)]],
        )
        .unwrap();
        assert!(matches!(SymmetricGame::new(game), Err(GameError::MalformedGame(_))));

        let relabelled = NormalFormGame::new(
            vec!["A", "B"],
            vec!["X", "Y"],
            vec![vec![(1, 1), (2, 3)], vec![(3, 2), (4, 4)]],
        )
        .unwrap();
        assert!(SymmetricGame::new(relabelled).is_err());
    }
}
