//! Mixed equilibria by indifference.
//!
//! For 2×2 games the indifference equation has a closed form; the result is
//! an exact [`Fraction`] or an explicit "no unique solution" value. The
//! market-selection game is the one 3×3 family with a known closed form and
//! is handled separately.

use serde::{Deserialize, Serialize};

use crate::game::{GameError, NormalFormGame, Payoff};

use super::fraction::Fraction;

/// Probabilities offered as answers for the 2×2 exercise, as `(num, den)`.
pub const MIXED_FRACTION_MENU: [(i64, i64); 6] = [(1, 7), (1, 6), (1, 5), (1, 4), (1, 3), (1, 2)];

/// Result of solving a single indifference equation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "p", rename_all = "snake_case")]
pub enum MixedSolution {
    /// The unique probability in reduced form.
    Unique(Fraction),
    /// The opponent's payoffs do not separate the probability (`a + b = 0`).
    NoUniqueSolution,
}

impl MixedSolution {
    /// The probability, when unique.
    pub fn probability(&self) -> Option<Fraction> {
        match self {
            MixedSolution::Unique(p) => Some(*p),
            MixedSolution::NoUniqueSolution => None,
        }
    }
}

/// Both halves of a 2×2 mixed equilibrium.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixedEquilibrium2x2 {
    /// Probability that player 1 plays its first row.
    pub row_mix: MixedSolution,
    /// Probability that player 2 plays its first column.
    pub col_mix: MixedSolution,
}

fn require_2x2(game: &NormalFormGame) -> Result<(), GameError> {
    if game.rows().len() != 2 || game.cols().len() != 2 {
        return Err(GameError::malformed(format!(
            "mixed analysis needs a 2x2 game, got {}x{}",
            game.rows().len(),
            game.cols().len()
        )));
    }
    Ok(())
}

/// Payoff difference `x − y`, widened so extreme payoffs cannot overflow.
fn diff(x: Payoff, y: Payoff) -> i128 {
    x as i128 - y as i128
}

/// Solve `b / (a + b)`, reporting degeneracy when `a + b = 0`.
fn indifference(a: i128, b: i128) -> Result<MixedSolution, GameError> {
    if a + b == 0 {
        return Ok(MixedSolution::NoUniqueSolution);
    }
    Fraction::from_i128(b, a + b)
        .map(MixedSolution::Unique)
        .ok_or_else(|| GameError::malformed(format!("mixing probability {}/{} is out of range", b, a + b)))
}

/// Probability `p` that player 1 plays its first row such that player 2 is
/// indifferent between its two columns.
///
/// With rows `{A, B}` and columns `{X, Y}`, `a = u2(A,X) − u2(A,Y)` and
/// `b = u2(B,Y) − u2(B,X)`; then `p = b / (a + b)`. The value is not
/// clamped to `[0, 1]`: a value outside that range means no fully mixed
/// equilibrium exists. A reduced probability that does not fit in 64 bits
/// is reported as [`GameError::MalformedGame`].
pub fn row_mix_probability(game: &NormalFormGame) -> Result<MixedSolution, GameError> {
    require_2x2(game)?;
    let a = diff(game.payoff(0, 0).1, game.payoff(0, 1).1);
    let b = diff(game.payoff(1, 1).1, game.payoff(1, 0).1);
    indifference(a, b)
}

/// Probability `q` that player 2 plays its first column such that player 1
/// is indifferent between its two rows.
pub fn col_mix_probability(game: &NormalFormGame) -> Result<MixedSolution, GameError> {
    require_2x2(game)?;
    let a = diff(game.payoff(0, 0).0, game.payoff(1, 0).0);
    let b = diff(game.payoff(1, 1).0, game.payoff(0, 1).0);
    indifference(a, b)
}

/// Both indifference probabilities of a 2×2 game.
pub fn mixed_equilibrium_2x2(game: &NormalFormGame) -> Result<MixedEquilibrium2x2, GameError> {
    Ok(MixedEquilibrium2x2 {
        row_mix: row_mix_probability(game)?,
        col_mix: col_mix_probability(game)?,
    })
}

/// Position of `p` in [`MIXED_FRACTION_MENU`], compared exactly.
pub fn menu_index(p: Fraction) -> Option<usize> {
    MIXED_FRACTION_MENU
        .iter()
        .position(|&(n, d)| Fraction::new(n, d) == Some(p))
}

/// Firm 1's market pairs.
pub const MARKET_PAIRS: [&str; 3] = ["XY", "XZ", "YZ"];
/// Firm 2's single markets.
pub const MARKETS: [&str; 3] = ["X", "Y", "Z"];
/// Values of the `Z` parameter used by the exercise.
pub const MARKET_Z_VALUES: [Payoff; 3] = [1, 3, 4];

const FIRM1_SHARED: Payoff = 6;
const FIRM1_ALONE: Payoff = 9;
const FIRM2_SHARED: Payoff = 5;
const FIRM2_ALONE: Payoff = 2;

/// Market-selection game: firm 1 enters two of three markets, firm 2 one.
///
/// Firm 1 earns 6 in a market it shares with firm 2 and 9 otherwise; firm 2
/// earns 5 when sharing, 2 alone in `X` or `Y`, and `z_value` alone in `Z`.
pub fn market_selection_game(z_value: Payoff) -> NormalFormGame {
    let grid = MARKET_PAIRS
        .iter()
        .map(|pair| {
            MARKETS
                .iter()
                .map(|market| {
                    let shared = pair.contains(market);
                    let u1 = if shared { FIRM1_SHARED } else { FIRM1_ALONE };
                    let u2 = match (shared, *market) {
                        (true, _) => FIRM2_SHARED,
                        (false, "Z") => z_value,
                        (false, _) => FIRM2_ALONE,
                    };
                    (u1, u2)
                })
                .collect()
        })
        .collect();
    NormalFormGame::new(MARKET_PAIRS.to_vec(), MARKETS.to_vec(), grid)
        .expect("market selection labels are fixed and distinct")
}

/// Fully mixed equilibrium of the market-selection game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketEquilibrium {
    /// Firm 1's probabilities over `XY, XZ, YZ`.
    pub firm1: [Fraction; 3],
    /// Firm 2's probabilities over `X, Y, Z`.
    pub firm2: [Fraction; 3],
}

/// Solve the market-selection game by indifference.
///
/// Firm 1's payoffs treat the three markets symmetrically, so firm 2 must mix
/// uniformly. Firm 2's indifference between `X` and `Y` forces
/// `p(XZ) = p(YZ) = t`, and indifference between `X` and `Z` gives
/// `t = (s − z) / (3s − l − 2z)` with `s` the shared and `l` the lone payoff
/// in `X`/`Y`. Returns `None` if no fully mixed equilibrium exists or its
/// probabilities do not fit in 64 bits.
pub fn market_selection_equilibrium(z_value: Payoff) -> Option<MarketEquilibrium> {
    let third = Fraction::new(1, 3)?;
    let z = z_value as i128;
    let t = Fraction::from_i128(
        FIRM2_SHARED as i128 - z,
        (3 * FIRM2_SHARED - FIRM2_ALONE) as i128 - 2 * z,
    )?;
    let first = Fraction::ONE - t - t;
    if t <= Fraction::ZERO || first <= Fraction::ZERO {
        return None;
    }
    Some(MarketEquilibrium {
        firm1: [first, t, t],
        firm2: [third, third, third],
    })
}
