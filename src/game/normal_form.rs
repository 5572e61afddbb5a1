//! Two-player normal-form (strategic-form) games.
//!
//! A game is stored as a fixed row-major grid of payoff pairs indexed by
//! strategy position. Labels are resolved to indices once, at construction,
//! and the strategy order given by the caller is preserved everywhere so
//! that "first match wins" enumeration stays deterministic.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::GameError;

/// A strategy label such as `"A"` or `"Defect"`.
pub type Label = String;

/// Payoff value. Generated instances use small non-negative integers, but any
/// integer is accepted.
pub type Payoff = i64;

/// One of the two players of a normal-form game.
///
/// Player 1 chooses rows, player 2 chooses columns. Serialized as `1` / `2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Player {
    /// The row player.
    One,
    /// The column player.
    Two,
}

impl Player {
    /// Both players, row player first.
    pub const BOTH: [Player; 2] = [Player::One, Player::Two];

    /// The other player.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// 1 for the row player, 2 for the column player.
    pub fn number(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl From<Player> for u8 {
    fn from(player: Player) -> Self {
        player.number()
    }
}

impl TryFrom<u8> for Player {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Player::One),
            2 => Ok(Player::Two),
            other => Err(format!("player must be 1 or 2, got {}", other)),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// One entry of the serialized payoff table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoffCell {
    /// Row strategy label.
    pub row: Label,
    /// Column strategy label.
    pub col: Label,
    /// Payoff of player 1.
    pub u1: Payoff,
    /// Payoff of player 2.
    pub u2: Payoff,
}

/// A pure strategy profile `(row, col)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Profile {
    /// Strategy of player 1.
    pub row: Label,
    /// Strategy of player 2.
    pub col: Label,
}

impl Profile {
    /// Create a profile from two labels.
    pub fn new(row: impl Into<Label>, col: impl Into<Label>) -> Self {
        Self {
            row: row.into(),
            col: col.into(),
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Wire shape: ordered labels plus a complete list of payoff cells.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct NormalFormRepr {
    rows: Vec<Label>,
    cols: Vec<Label>,
    payoffs: Vec<PayoffCell>,
}

/// An immutable finite two-player game in strategic form.
///
/// # Example
/// ```
/// use game_theory_core::game::NormalFormGame;
///
/// let game = NormalFormGame::new(
///     vec!["Cooperate", "Defect"],
///     vec!["Cooperate", "Defect"],
///     vec![vec![(3, 3), (0, 5)], vec![(5, 0), (1, 1)]],
/// ).unwrap();
/// assert_eq!(game.payoff(1, 0), (5, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NormalFormRepr", into = "NormalFormRepr")]
pub struct NormalFormGame {
    rows: Vec<Label>,
    cols: Vec<Label>,
    /// Row-major payoff pairs, `rows.len() * cols.len()` entries.
    grid: Vec<(Payoff, Payoff)>,
}

impl NormalFormGame {
    /// Build a game from ordered labels and a `rows × cols` grid of payoff pairs.
    ///
    /// Fails with [`GameError::MalformedGame`] if a strategy set is empty,
    /// contains duplicate labels, or the grid does not match the label counts.
    pub fn new<R, C>(
        rows: Vec<R>,
        cols: Vec<C>,
        grid: Vec<Vec<(Payoff, Payoff)>>,
    ) -> Result<Self, GameError>
    where
        R: Into<Label>,
        C: Into<Label>,
    {
        let rows: Vec<Label> = rows.into_iter().map(Into::into).collect();
        let cols: Vec<Label> = cols.into_iter().map(Into::into).collect();
        check_labels(&rows, "row")?;
        check_labels(&cols, "column")?;

        if grid.len() != rows.len() {
            return Err(GameError::malformed(format!(
                "expected {} payoff rows, got {}",
                rows.len(),
                grid.len()
            )));
        }
        let mut flat = Vec::with_capacity(rows.len() * cols.len());
        for (r, line) in grid.into_iter().enumerate() {
            if line.len() != cols.len() {
                return Err(GameError::malformed(format!(
                    "row '{}' has {} payoff entries, expected {}",
                    rows[r],
                    line.len(),
                    cols.len()
                )));
            }
            flat.extend(line);
        }

        Ok(Self { rows, cols, grid: flat })
    }

    /// Build a game from a list of labelled payoff cells.
    ///
    /// Every `(row, col)` pair must appear exactly once; unknown labels,
    /// duplicates and gaps are rejected.
    pub fn from_cells<R, C>(rows: Vec<R>, cols: Vec<C>, cells: Vec<PayoffCell>) -> Result<Self, GameError>
    where
        R: Into<Label>,
        C: Into<Label>,
    {
        let rows: Vec<Label> = rows.into_iter().map(Into::into).collect();
        let cols: Vec<Label> = cols.into_iter().map(Into::into).collect();
        check_labels(&rows, "row")?;
        check_labels(&cols, "column")?;

        let mut slots: Vec<Option<(Payoff, Payoff)>> = vec![None; rows.len() * cols.len()];
        for cell in cells {
            let r = rows
                .iter()
                .position(|l| *l == cell.row)
                .ok_or_else(|| GameError::malformed(format!("unknown row label '{}'", cell.row)))?;
            let c = cols
                .iter()
                .position(|l| *l == cell.col)
                .ok_or_else(|| GameError::malformed(format!("unknown column label '{}'", cell.col)))?;
            let slot = &mut slots[r * cols.len() + c];
            if slot.is_some() {
                return Err(GameError::malformed(format!(
                    "duplicate payoff for ({},{})",
                    cell.row, cell.col
                )));
            }
            *slot = Some((cell.u1, cell.u2));
        }

        let mut grid = Vec::with_capacity(slots.len());
        for (i, slot) in slots.into_iter().enumerate() {
            match slot {
                Some(pair) => grid.push(pair),
                None => {
                    return Err(GameError::malformed(format!(
                        "missing payoff for ({},{})",
                        rows[i / cols.len()],
                        cols[i % cols.len()]
                    )))
                }
            }
        }

        Ok(Self { rows, cols, grid })
    }

    /// Ordered strategy labels of player 1.
    pub fn rows(&self) -> &[Label] {
        &self.rows
    }

    /// Ordered strategy labels of player 2.
    pub fn cols(&self) -> &[Label] {
        &self.cols
    }

    /// Ordered strategy labels of `player`.
    pub fn strategies(&self, player: Player) -> &[Label] {
        match player {
            Player::One => &self.rows,
            Player::Two => &self.cols,
        }
    }

    /// Payoff pair at grid position `(row, col)`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn payoff(&self, row: usize, col: usize) -> (Payoff, Payoff) {
        assert!(row < self.rows.len() && col < self.cols.len(), "payoff index out of range");
        self.grid[row * self.cols.len() + col]
    }

    /// Payoff of `player` when it plays strategy index `own` and the opponent plays `opp`.
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn utility(&self, player: Player, own: usize, opp: usize) -> Payoff {
        match player {
            Player::One => self.payoff(own, opp).0,
            Player::Two => self.payoff(opp, own).1,
        }
    }

    /// Position of `label` in `player`'s strategy list.
    pub fn index_of(&self, player: Player, label: &str) -> Result<usize, GameError> {
        self.strategies(player)
            .iter()
            .position(|l| l == label)
            .ok_or_else(|| GameError::InvalidStrategy {
                player,
                label: label.to_string(),
            })
    }

    /// Payoff pair for a labelled profile.
    pub fn payoff_of(&self, row: &str, col: &str) -> Result<(Payoff, Payoff), GameError> {
        let r = self.index_of(Player::One, row)?;
        let c = self.index_of(Player::Two, col)?;
        Ok(self.payoff(r, c))
    }

    /// Labelled profile at grid position `(row, col)`.
    pub fn profile(&self, row: usize, col: usize) -> Profile {
        Profile::new(self.rows[row].clone(), self.cols[col].clone())
    }

    /// All payoff cells in row-major order.
    pub fn cells(&self) -> Vec<PayoffCell> {
        let mut cells = Vec::with_capacity(self.grid.len());
        for (r, row) in self.rows.iter().enumerate() {
            for (c, col) in self.cols.iter().enumerate() {
                let (u1, u2) = self.payoff(r, c);
                cells.push(PayoffCell {
                    row: row.clone(),
                    col: col.clone(),
                    u1,
                    u2,
                });
            }
        }
        cells
    }

    /// True if both players share the same labels and `u2(r, c) = u1(c, r)`.
    pub fn is_symmetric(&self) -> bool {
        if self.rows != self.cols {
            return false;
        }
        let n = self.rows.len();
        (0..n).all(|r| (0..n).all(|c| self.payoff(r, c).1 == self.payoff(c, r).0))
    }
}

fn check_labels(labels: &[Label], what: &str) -> Result<(), GameError> {
    if labels.is_empty() {
        return Err(GameError::malformed(format!("{} strategy set is empty", what)));
    }
    let mut seen = HashSet::with_capacity(labels.len());
    for label in labels {
        if !seen.insert(label.as_str()) {
            return Err(GameError::malformed(format!("duplicate {} label '{}'", what, label)));
        }
    }
    Ok(())
}

impl TryFrom<NormalFormRepr> for NormalFormGame {
    type Error = GameError;

    fn try_from(repr: NormalFormRepr) -> Result<Self, Self::Error> {
        NormalFormGame::from_cells(repr.rows, repr.cols, repr.payoffs)
    }
}

impl From<NormalFormGame> for NormalFormRepr {
    fn from(game: NormalFormGame) -> Self {
        let payoffs = game.cells();
        NormalFormRepr {
            rows: game.rows,
            cols: game.cols,
            payoffs,
        }
    }
}

impl fmt::Display for NormalFormGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "")?;
        for col in &self.cols {
            write!(f, "{:>8}", col)?;
        }
        writeln!(f)?;
        for (r, row) in self.rows.iter().enumerate() {
            write!(f, "{:>6}", row)?;
            for c in 0..self.cols.len() {
                let (u1, u2) = self.payoff(r, c);
                write!(f, "{:>8}", format!("{},{}", u1, u2))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prisoners_dilemma() -> NormalFormGame {
        NormalFormGame::new(
            vec!["Cooperate", "Defect"],
            vec!["Cooperate", "Defect"],
            vec![vec![(3, 3), (0, 5)], vec![(5, 0), (1, 1)]],
        )
        .unwrap()
    }

    #[test]
    fn test_grid_lookup() {
        let game = prisoners_dilemma();
        assert_eq!(game.payoff(0, 1), (0, 5));
        assert_eq!(game.utility(Player::One, 1, 0), 5);
        assert_eq!(game.utility(Player::Two, 1, 0), 5);
        assert_eq!(game.payoff_of("Defect", "Defect").unwrap(), (1, 1));
        assert!(game.is_symmetric());
    }

    #[test]
    fn test_unknown_label_is_invalid_strategy() {
        let game = prisoners_dilemma();
        let err = game.index_of(Player::Two, "Maybe").unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidStrategy {
                player: Player::Two,
                label: "Maybe".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_incomplete_tables() {
        let short_row = NormalFormGame::new(vec!["A", "B"], vec!["X", "Y"], vec![vec![(1, 1), (2, 2)], vec![(3, 3)]]);
        assert!(matches!(short_row, Err(GameError::MalformedGame(_))));

        let missing = NormalFormGame::from_cells(
            vec!["A"],
            vec!["X", "Y"],
            vec![PayoffCell { row: "A".into(), col: "X".into(), u1: 1, u2: 1 }],
        );
        assert!(matches!(missing, Err(GameError::MalformedGame(_))));

        let duplicate_label = NormalFormGame::new(vec!["A", "A"], vec!["X"], vec![vec![(0, 0)], vec![(0, 0)]]);
        assert!(matches!(duplicate_label, Err(GameError::MalformedGame(_))));

        let empty: Result<NormalFormGame, _> = NormalFormGame::new(Vec::<&str>::new(), vec!["X"], vec![]);
        assert!(empty.is_err());
    }

    #[test]
    fn test_rejects_duplicate_cells() {
        let cell = PayoffCell { row: "A".into(), col: "X".into(), u1: 1, u2: 2 };
        let result = NormalFormGame::from_cells(vec!["A"], vec!["X"], vec![cell.clone(), cell]);
        assert!(matches!(result, Err(GameError::MalformedGame(_))));
    }

    #[test]
    fn test_json_shape_roundtrip() {
        let game = prisoners_dilemma();
        let json = serde_json::to_value(&game).unwrap();
        assert_eq!(json["rows"][1], "Defect");
        assert_eq!(json["payoffs"].as_array().unwrap().len(), 4);
        assert_eq!(json["payoffs"][1]["u2"], 5);

        let parsed: NormalFormGame = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, game);
    }

    #[test]
    fn test_json_rejects_gaps() {
        let json = r#"{"rows":["A","B"],"cols":["X"],"payoffs":[{"row":"A","col":"X","u1":1,"u2":2}]}"#;
        assert!(serde_json::from_str::<NormalFormGame>(json).is_err());
    }

    #[test]
    fn test_player_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Player::Two).unwrap(), "2");
        assert_eq!(serde_json::from_str::<Player>("1").unwrap(), Player::One);
        assert!(serde_json::from_str::<Player>("3").is_err());
    }
}
