//! Bayesian games with a discrete common prior.
//!
//! Each player has a finite set of types; nature draws a type profile from
//! the joint prior and the players then play the normal-form game attached
//! to that profile. One-sided private information is the special case in
//! which player 2 has a single type.
//!
//! Equilibrium checks never divide: for a fixed type-contingent profile,
//! every "no profitable deviation" condition is a linear inequality over the
//! joint prior entries,
//!
//! ```text
//! Σ coefficient(t1, t2) · Prob(t1, t2) ≥ 0
//! ```
//!
//! with integer coefficients (payoff differences). The conditional
//! probability's denominator is positive and cancels, so the inequalities are
//! evaluated on the prior scaled to integers.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::{GameError, Label, NormalFormGame, Payoff, Player};

use super::fraction::Fraction;

/// Type label given to the uninformed player of a one-sided game.
pub const SINGLE_TYPE: &str = "-";

/// A type-contingent pure strategy profile: one action per type of each player.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BayesianProfile {
    /// Player 1's action for each of its types, in type order.
    pub row: Vec<Label>,
    /// Player 2's action for each of its types, in type order.
    pub col: Vec<Label>,
}

impl BayesianProfile {
    /// Create a profile from per-type action labels.
    pub fn new<R: Into<Label>, C: Into<Label>>(row: Vec<R>, col: Vec<C>) -> Self {
        Self {
            row: row.into_iter().map(Into::into).collect(),
            col: col.into_iter().map(Into::into).collect(),
        }
    }

    fn side(labels: &[Label]) -> String {
        if labels.len() == 1 {
            labels[0].clone()
        } else {
            format!("({})", labels.join(","))
        }
    }
}

impl fmt::Display for BayesianProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", Self::side(&self.row), Self::side(&self.col))
    }
}

/// One "no profitable deviation" condition of a candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorInequality {
    /// The deviating player.
    pub player: Player,
    /// The deviating player's type.
    pub own_type: Label,
    /// Action prescribed by the profile.
    pub action: Label,
    /// Alternative action that must not pay strictly more.
    pub alternative: Label,
    /// `coefficients[t1][t2]` multiplies `Prob(t1, t2)`; the condition is
    /// that the weighted sum is non-negative.
    pub coefficients: Vec<Vec<Payoff>>,
}

impl PriorInequality {
    /// Evaluate against prior weights proportional to the joint prior
    /// (any positive common scale).
    ///
    /// Exact whenever the weights are non-negative and their total fits in
    /// an `i64`, as [`BayesianGame::scaled_weights`] guarantees.
    pub fn holds(&self, weights: &[Vec<i64>]) -> bool {
        let total = self
            .coefficients
            .iter()
            .zip(weights)
            .flat_map(|(cs, ws)| cs.iter().zip(ws))
            .map(|(&c, &w)| c as i128 * w as i128)
            .fold(0i128, i128::saturating_add);
        total >= 0
    }

    /// True for every non-negative prior.
    pub fn always_holds(&self) -> bool {
        self.coefficients.iter().flatten().all(|&c| c >= 0)
    }

    /// False for every strictly positive prior.
    pub fn never_holds(&self) -> bool {
        let all = self.coefficients.iter().flatten();
        all.clone().all(|&c| c <= 0) && all.clone().any(|&c| c < 0)
    }
}

/// Serialized shape of a [`BayesianGame`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BayesianGameRepr {
    row_types: Vec<Label>,
    col_types: Vec<Label>,
    prior: Vec<Vec<Fraction>>,
    games: Vec<Vec<NormalFormGame>>,
}

/// A two-player Bayesian game with a discrete common prior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BayesianGameRepr", into = "BayesianGameRepr")]
pub struct BayesianGame {
    row_types: Vec<Label>,
    col_types: Vec<Label>,
    prior: Vec<Vec<Fraction>>,
    /// The prior scaled by the lcm of its denominators.
    weights: Vec<Vec<i64>>,
    games: Vec<Vec<NormalFormGame>>,
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn check_types(types: &[Label], who: Player) -> Result<(), GameError> {
    if types.is_empty() {
        return Err(GameError::malformed(format!("{} has no types", who)));
    }
    let unique: HashSet<&Label> = types.iter().collect();
    if unique.len() != types.len() {
        return Err(GameError::malformed(format!("{} has duplicate type labels", who)));
    }
    Ok(())
}

impl BayesianGame {
    /// Build a game from type labels, a joint prior `prior[t1][t2]` and one
    /// normal-form game per type profile `games[t1][t2]`.
    ///
    /// The prior must be non-negative with a positive total; it does not
    /// need to sum to one. All games must share the same action labels.
    /// Priors whose common denominator or scaled total does not fit in an
    /// `i64` are rejected.
    pub fn new<L: Into<Label>, M: Into<Label>>(
        row_types: Vec<L>,
        col_types: Vec<M>,
        prior: Vec<Vec<Fraction>>,
        games: Vec<Vec<NormalFormGame>>,
    ) -> Result<Self, GameError> {
        let row_types: Vec<Label> = row_types.into_iter().map(Into::into).collect();
        let col_types: Vec<Label> = col_types.into_iter().map(Into::into).collect();
        check_types(&row_types, Player::One)?;
        check_types(&col_types, Player::Two)?;

        let (n1, n2) = (row_types.len(), col_types.len());
        if prior.len() != n1 || prior.iter().any(|line| line.len() != n2) {
            return Err(GameError::malformed("prior does not match the type sets"));
        }
        if games.len() != n1 || games.iter().any(|line| line.len() != n2) {
            return Err(GameError::malformed("one game per type profile is required"));
        }

        if prior.iter().flatten().any(Fraction::is_negative) {
            return Err(GameError::malformed("prior weights must be non-negative"));
        }
        let reference = &games[0][0];
        for game in games.iter().flatten() {
            if game.rows() != reference.rows() || game.cols() != reference.cols() {
                return Err(GameError::malformed(
                    "all type-profile games must share the same action labels",
                ));
            }
        }

        let overflow = || GameError::malformed("prior is too fine-grained to scale to integers");
        let scale = prior.iter().flatten().try_fold(1i64, |acc, f| {
            (acc / gcd(acc, f.denominator())).checked_mul(f.denominator())
        });
        let scale = scale.ok_or_else(overflow)?;
        let weights = prior
            .iter()
            .map(|line| {
                line.iter()
                    .map(|f| f.numerator().checked_mul(scale / f.denominator()))
                    .collect::<Option<Vec<i64>>>()
            })
            .collect::<Option<Vec<Vec<i64>>>>()
            .ok_or_else(overflow)?;
        let total = weights
            .iter()
            .flatten()
            .try_fold(0i64, |acc, &w| acc.checked_add(w))
            .ok_or_else(overflow)?;
        if total == 0 {
            return Err(GameError::malformed("prior weights sum to zero"));
        }

        Ok(Self {
            row_types,
            col_types,
            prior,
            weights,
            games,
        })
    }

    /// Player 1 privately informed, player 2 uninformed.
    ///
    /// `prior[i]` is the probability of type `types[i]`; `games[i]` the game
    /// played when that type is realized.
    pub fn one_sided<L: Into<Label>>(
        types: Vec<L>,
        prior: Vec<Fraction>,
        games: Vec<NormalFormGame>,
    ) -> Result<Self, GameError> {
        BayesianGame::new(
            types,
            vec![SINGLE_TYPE],
            prior.into_iter().map(|p| vec![p]).collect(),
            games.into_iter().map(|g| vec![g]).collect(),
        )
    }

    /// Type labels of `player`.
    pub fn types(&self, player: Player) -> &[Label] {
        match player {
            Player::One => &self.row_types,
            Player::Two => &self.col_types,
        }
    }

    /// Action labels of `player`, shared by every type.
    pub fn actions(&self, player: Player) -> &[Label] {
        self.games[0][0].strategies(player)
    }

    /// Joint prior entry `Prob(t1, t2)` by type index.
    pub fn prior(&self, t1: usize, t2: usize) -> Fraction {
        self.prior[t1][t2]
    }

    /// The prior scaled to integers with a common positive factor.
    pub fn scaled_weights(&self) -> &[Vec<i64>] {
        &self.weights
    }

    /// Game played at type profile `(t1, t2)`.
    pub fn game(&self, t1: usize, t2: usize) -> &NormalFormGame {
        &self.games[t1][t2]
    }

    fn type_index(&self, player: Player, label: &str) -> Result<usize, GameError> {
        self.types(player)
            .iter()
            .position(|t| t == label)
            .ok_or_else(|| GameError::InvalidProfile(format!("{} has no type '{}'", player, label)))
    }

    /// Conditional distribution over the opponent's types given that
    /// `player` has type `own_type`, by Bayes' rule.
    ///
    /// Returns `Ok(None)` when the type has zero prior probability.
    pub fn posterior(&self, player: Player, own_type: &str) -> Result<Option<Vec<Fraction>>, GameError> {
        let own = self.type_index(player, own_type)?;
        let Some((joint, marginal)) = self.joint_weights(player, own) else {
            return Ok(None);
        };
        let beliefs = joint
            .iter()
            .map(|&w| Fraction::new(w, marginal))
            .collect::<Option<Vec<Fraction>>>()
            .ok_or_else(|| GameError::malformed("posterior is out of range"))?;
        Ok(Some(beliefs))
    }

    /// Scaled weights of the type profiles containing `player`'s type `own`,
    /// with their sum. `None` when that sum is zero.
    fn joint_weights(&self, player: Player, own: usize) -> Option<(Vec<i64>, i64)> {
        let joint: Vec<i64> = match player {
            Player::One => self.weights[own].clone(),
            Player::Two => self.weights.iter().map(|line| line[own]).collect(),
        };
        // bounded by the total checked at construction
        let marginal: i64 = joint.iter().sum();
        (marginal != 0).then_some((joint, marginal))
    }

    /// Resolve a profile to action indices, checking its shape.
    fn resolve(&self, profile: &BayesianProfile) -> Result<(Vec<usize>, Vec<usize>), GameError> {
        let side = |player: Player, labels: &[Label]| -> Result<Vec<usize>, GameError> {
            let expected = self.types(player).len();
            if labels.len() != expected {
                return Err(GameError::InvalidProfile(format!(
                    "{} needs {} actions, one per type, got {}",
                    player,
                    expected,
                    labels.len()
                )));
            }
            labels
                .iter()
                .map(|l| self.games[0][0].index_of(player, l))
                .collect()
        };
        Ok((side(Player::One, &profile.row)?, side(Player::Two, &profile.col)?))
    }

    /// Payoff of `player` at type profile `(t1, t2)` when it plays `own`
    /// while the opponent follows its plan in `rows`/`cols`.
    fn deviation_payoff(
        &self,
        player: Player,
        t1: usize,
        t2: usize,
        own: usize,
        rows: &[usize],
        cols: &[usize],
    ) -> Payoff {
        let game = &self.games[t1][t2];
        match player {
            Player::One => game.utility(Player::One, own, cols[t2]),
            Player::Two => game.utility(Player::Two, own, rows[t1]),
        }
    }

    /// Linear conditions on the joint prior under which `profile` is an equilibrium.
    ///
    /// One inequality per player, type and alternative action, in that order.
    /// The conditions depend only on payoffs, so they can be checked against
    /// any prior with [`PriorInequality::holds`].
    pub fn deviation_conditions(&self, profile: &BayesianProfile) -> Result<Vec<PriorInequality>, GameError> {
        let (rows, cols) = self.resolve(profile)?;
        let (n1, n2) = (self.row_types.len(), self.col_types.len());
        let mut conditions = Vec::new();

        for player in Player::BOTH {
            let plan = match player {
                Player::One => &rows,
                Player::Two => &cols,
            };
            for (own_type, &chosen) in plan.iter().enumerate() {
                for alt in 0..self.actions(player).len() {
                    if alt == chosen {
                        continue;
                    }
                    let mut coefficients = vec![vec![0; n2]; n1];
                    for (t1, line) in coefficients.iter_mut().enumerate() {
                        for (t2, coeff) in line.iter_mut().enumerate() {
                            let relevant = match player {
                                Player::One => t1 == own_type,
                                Player::Two => t2 == own_type,
                            };
                            if relevant {
                                *coeff = self
                                    .deviation_payoff(player, t1, t2, chosen, &rows, &cols)
                                    .checked_sub(self.deviation_payoff(player, t1, t2, alt, &rows, &cols))
                                    .ok_or_else(|| GameError::malformed("payoff difference overflows"))?;
                            }
                        }
                    }
                    conditions.push(PriorInequality {
                        player,
                        own_type: self.types(player)[own_type].clone(),
                        action: self.actions(player)[chosen].clone(),
                        alternative: self.actions(player)[alt].clone(),
                        coefficients,
                    });
                }
            }
        }
        Ok(conditions)
    }

    /// True if no type of either player gains by deviating from `profile`.
    pub fn is_equilibrium(&self, profile: &BayesianProfile) -> Result<bool, GameError> {
        Ok(self
            .deviation_conditions(profile)?
            .iter()
            .all(|c| c.holds(&self.weights)))
    }

    /// Expected payoff of `player` of type `own_type` playing `action` while
    /// the opponent follows its part of `profile`, under the posterior.
    ///
    /// Returns `Ok(None)` when the type has zero prior probability, and
    /// [`GameError::MalformedGame`] when the exact value does not fit.
    pub fn expected_payoff(
        &self,
        player: Player,
        own_type: &str,
        action: &str,
        profile: &BayesianProfile,
    ) -> Result<Option<Fraction>, GameError> {
        let own = self.type_index(player, own_type)?;
        let act = self.games[0][0].index_of(player, action)?;
        let (rows, cols) = self.resolve(profile)?;
        let Some((joint, marginal)) = self.joint_weights(player, own) else {
            return Ok(None);
        };
        let weighted: i128 = joint
            .iter()
            .enumerate()
            .map(|(other, &w)| {
                let (t1, t2) = match player {
                    Player::One => (own, other),
                    Player::Two => (other, own),
                };
                w as i128 * self.deviation_payoff(player, t1, t2, act, &rows, &cols) as i128
            })
            .sum();
        Fraction::from_i128(weighted, marginal as i128)
            .map(Some)
            .ok_or_else(|| GameError::malformed("expected payoff is out of range"))
    }

    /// Every type-contingent pure profile that is an equilibrium, ordered by
    /// player 1's plan, then player 2's.
    pub fn pure_equilibria(&self) -> Vec<BayesianProfile> {
        let row_plans = plans(self.actions(Player::One), self.row_types.len());
        let col_plans = plans(self.actions(Player::Two), self.col_types.len());
        let mut found = Vec::new();
        for row in &row_plans {
            for col in &col_plans {
                let profile = BayesianProfile {
                    row: row.clone(),
                    col: col.clone(),
                };
                if let Ok(true) = self.is_equilibrium(&profile) {
                    found.push(profile);
                }
            }
        }
        found
    }
}

/// All assignments of an action to each of `slots` types, first slot most significant.
fn plans(actions: &[Label], slots: usize) -> Vec<Vec<Label>> {
    let mut out: Vec<Vec<Label>> = vec![Vec::new()];
    for _ in 0..slots {
        out = out
            .into_iter()
            .flat_map(|prefix| {
                actions.iter().map(move |a| {
                    let mut next = prefix.clone();
                    next.push(a.clone());
                    next
                })
            })
            .collect();
    }
    out
}

impl TryFrom<BayesianGameRepr> for BayesianGame {
    type Error = GameError;

    fn try_from(repr: BayesianGameRepr) -> Result<Self, Self::Error> {
        BayesianGame::new(repr.row_types, repr.col_types, repr.prior, repr.games)
    }
}

impl From<BayesianGame> for BayesianGameRepr {
    fn from(game: BayesianGame) -> Self {
        BayesianGameRepr {
            row_types: game.row_types,
            col_types: game.col_types,
            prior: game.prior,
            games: game.games,
        }
    }
}

/// Joint prior over `{a, b} × {c, d}` on a common denominator:
/// `Prob(a,c) = w/den`, `Prob(a,d) = x/den`, `Prob(b,c) = y/den`, `Prob(b,d) = z/den`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointPrior {
    /// Common denominator.
    pub den: i64,
    /// Numerator of `Prob(a,c)`.
    pub w: i64,
    /// Numerator of `Prob(a,d)`.
    pub x: i64,
    /// Numerator of `Prob(b,c)`.
    pub y: i64,
    /// Numerator of `Prob(b,d)`.
    pub z: i64,
}

impl JointPrior {
    /// Check that the parts are non-negative and add up to the denominator.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.den <= 0 {
            return Err(GameError::malformed("prior denominator must be positive"));
        }
        if [self.w, self.x, self.y, self.z].iter().any(|&v| v < 0) {
            return Err(GameError::malformed("prior numerators must be non-negative"));
        }
        if self.w + self.x + self.y + self.z != self.den {
            return Err(GameError::malformed("prior numerators must sum to the denominator"));
        }
        Ok(())
    }

    /// The prior as a 2×2 matrix of fractions, rows `a, b`, columns `c, d`.
    pub fn matrix(&self) -> Result<Vec<Vec<Fraction>>, GameError> {
        self.validate()?;
        let f = |n: i64| Fraction::new(n, self.den).ok_or_else(|| GameError::malformed("zero denominator"));
        Ok(vec![vec![f(self.w)?, f(self.x)?], vec![f(self.y)?, f(self.z)?]])
    }

    /// Integer weights `[[w, x], [y, z]]`.
    pub fn weights(&self) -> Vec<Vec<i64>> {
        vec![vec![self.w, self.x], vec![self.y, self.z]]
    }
}

type Matrix2 = [[(Payoff, Payoff); 2]; 2];

// Payoffs of the two-sided teaching game, indexed [player-1 type][player-2 type].
const TWO_SIDED_PAYOFFS: [[Matrix2; 2]; 2] = [
    [
        [[(5, 3), (4, 7)], [(6, 4), (2, 3)]], // (a, c)
        [[(5, 7), (2, 3)], [(8, 5), (2, 2)]], // (a, d)
    ],
    [
        [[(5, 7), (4, 6)], [(5, 3), (8, 5)]], // (b, c)
        [[(7, 2), (8, 1)], [(6, 3), (2, 8)]], // (b, d)
    ],
];

impl BayesianGame {
    /// The fixed two-sided game (types `a, b` and `c, d`, actions `A, B` and
    /// `X, Y`) under the given joint prior.
    pub fn two_sided_exercise(prior: &JointPrior) -> Result<Self, GameError> {
        let games = TWO_SIDED_PAYOFFS
            .iter()
            .map(|line| {
                line.iter()
                    .map(|m| {
                        NormalFormGame::new(
                            vec!["A", "B"],
                            vec!["X", "Y"],
                            m.iter().map(|r| r.to_vec()).collect(),
                        )
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        BayesianGame::new(vec!["a", "b"], vec!["c", "d"], prior.matrix()?, games)
    }
}

/// Candidate profiles asked about in the two-sided exercise. The first is
/// always shown; one of the other three is paired with it.
pub fn candidate_profiles() -> [BayesianProfile; 4] {
    [
        BayesianProfile::new(vec!["A", "B"], vec!["Y", "Y"]),
        BayesianProfile::new(vec!["A", "B"], vec!["X", "Y"]),
        BayesianProfile::new(vec!["B", "A"], vec!["X", "X"]),
        BayesianProfile::new(vec!["B", "B"], vec!["Y", "X"]),
    ]
}
