//! Randomized exercise generation.
//!
//! # Generate, then repair
//!
//! Every normal-form generator starts from a uniform base fill. With the
//! configured forcing probability it then picks a scenario and writes the
//! target structure into the grid: a high value for the target row or column
//! and strictly (or weakly) lower values elsewhere. A repair pass re-scans
//! the affected cells and fixes any inequality a random draw violated, so a
//! forced structure always holds. When forcing is skipped the base fill is
//! returned as is, which sometimes leaves no structure at all.
//!
//! # Randomness
//!
//! A [`Synthesizer`] owns its generator and takes `&mut self`, so sharing
//! one across threads requires external locking. [`generate_batch`] instead
//! gives every item its own synthesizer, seeded `seed + index` when the
//! configuration carries a seed.

use rand::rngs::StdRng;
use rand::seq::{index, SliceRandom};
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::analysis::bayesian::{candidate_profiles, BayesianGame, JointPrior};
use crate::analysis::fraction::Fraction;
use crate::analysis::mixed::{market_selection_game, MARKET_Z_VALUES};
use crate::game::{Label, NormalFormGame, Payoff, Player, Profile, SymmetricGame};

use super::config::{ConfigError, SynthConfig, SynthStats};
use super::exercise::{DominanceKind, Exercise, ExerciseKind, Scenario};

const ROWS_2: [&str; 2] = ["A", "B"];
const COLS_2: [&str; 2] = ["X", "Y"];
const ROWS_3: [&str; 3] = ["A", "B", "C"];
const COLS_3: [&str; 3] = ["X", "Y", "Z"];
const ROWS_4: [&str; 4] = ["A", "B", "C", "D"];
const ONE_SIDED_TYPES: [&str; 2] = ["t1", "t2"];

/// Weights of the column-only, row-only and both-players dominance scenarios.
const STRICT_DOMINANCE_WEIGHTS: [f64; 3] = [0.55, 0.20, 0.25];
const WEAK_DOMINANCE_WEIGHTS: [f64; 3] = [0.45, 0.15, 0.40];

/// Weight of the single-strict-equilibrium scenario against the tied pair.
const SINGLE_EQUILIBRIUM_WEIGHT: f64 = 0.8;

const MAX_MIXED_DENOMINATOR: i64 = 7;
const TWO_SIDED_DENOMINATORS: std::ops::RangeInclusive<i64> = 8..=16;

#[derive(Clone, Copy)]
enum Target {
    Column,
    Row,
    Both,
}

/// Payoff grid under construction, addressed from one player's point of view.
struct Grid {
    cells: Vec<Vec<(Payoff, Payoff)>>,
}

impl Grid {
    fn get(&self, player: Player, own: usize, opp: usize) -> Payoff {
        match player {
            Player::One => self.cells[own][opp].0,
            Player::Two => self.cells[opp][own].1,
        }
    }

    fn set(&mut self, player: Player, own: usize, opp: usize, value: Payoff) {
        match player {
            Player::One => self.cells[own][opp].0 = value,
            Player::Two => self.cells[opp][own].1 = value,
        }
    }

    fn count(&self, player: Player) -> usize {
        match player {
            Player::One => self.cells.len(),
            Player::Two => self.cells.first().map_or(0, Vec::len),
        }
    }

    fn into_game(self, rows: &[&str], cols: &[&str]) -> NormalFormGame {
        NormalFormGame::new(rows.to_vec(), cols.to_vec(), self.cells)
            .expect("generated grids use fixed distinct labels and full dimensions")
    }
}

/// Seeded generator for exercise instances.
///
/// # Example
/// ```
/// use game_theory_core::synth::{ExerciseKind, SynthConfig, Synthesizer};
///
/// let mut synth = Synthesizer::new(SynthConfig::default().with_seed(1)).unwrap();
/// let exercise = synth.generate(ExerciseKind::NashEquilibria);
/// assert_eq!(exercise.kind(), ExerciseKind::NashEquilibria);
/// ```
pub struct Synthesizer {
    config: SynthConfig,
    rng: StdRng,
    stats: SynthStats,
}

impl Synthesizer {
    /// Create a synthesizer after validating `config`.
    pub fn new(config: SynthConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self {
            config,
            rng,
            stats: SynthStats::new(),
        })
    }

    /// Synthesizer for item `index` of a batch: seeded `seed + index` when
    /// `config` has a seed, from entropy otherwise.
    pub fn for_batch_item(config: &SynthConfig, index: u64) -> Result<Self, ConfigError> {
        let mut item = config.clone();
        item.seed = config.seed.map(|s| s.wrapping_add(index));
        Self::new(item)
    }

    /// The configuration in use.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> &SynthStats {
        &self.stats
    }

    /// Generate one instance of `kind`.
    pub fn generate(&mut self, kind: ExerciseKind) -> Exercise {
        let exercise = match kind {
            ExerciseKind::BestResponse => self.best_response(),
            ExerciseKind::StrictDominance => {
                let (game, scenario) = self.strict_dominance();
                Exercise::StrictDominance { game, scenario }
            }
            ExerciseKind::WeakDominance => {
                let (game, scenario) = self.weak_dominance();
                Exercise::WeakDominance { game, scenario }
            }
            ExerciseKind::NashEquilibria => {
                let (game, scenario) = self.nash();
                Exercise::NashEquilibria { game, scenario }
            }
            ExerciseKind::StrictNash => {
                let (game, scenario) = self.nash();
                Exercise::StrictNash { game, scenario }
            }
            ExerciseKind::MixedEquilibrium => {
                let (game, scenario) = self.mixed();
                Exercise::MixedEquilibrium {
                    game,
                    scenario: Some(scenario),
                }
            }
            ExerciseKind::TremblingHand => Exercise::TremblingHand {
                game: self.base_fill(ROWS_3.len(), COLS_3.len()).into_game(&ROWS_3, &COLS_3),
            },
            ExerciseKind::EvolutionaryStability => {
                let (game, scenario) = self.symmetric();
                Exercise::EvolutionaryStability { game, scenario }
            }
            ExerciseKind::MarketSelection => {
                let z_value = *MARKET_Z_VALUES.choose(&mut self.rng).unwrap_or(&MARKET_Z_VALUES[0]);
                Exercise::MarketSelection {
                    game: market_selection_game(z_value),
                    z_value,
                }
            }
            ExerciseKind::BayesianOneSided => Exercise::BayesianOneSided {
                game: self.one_sided(),
            },
            ExerciseKind::BayesianTwoSided => self.two_sided(),
        };

        self.stats.generated += 1;
        if exercise.scenario().is_some() {
            self.stats.forced += 1;
        }
        log::debug!("generated {} with scenario {:?}", kind, exercise.scenario());
        exercise
    }

    // ------------------------------------------------------------------
    // Draws
    // ------------------------------------------------------------------

    fn payoff(&mut self) -> Payoff {
        self.rng.gen_range(self.config.payoff_min..=self.config.payoff_max)
    }

    fn high(&mut self) -> Payoff {
        self.rng.gen_range(self.config.high_min..=self.config.payoff_max)
    }

    /// Uniform in `[payoff_min, value - 1]`; `value` must exceed `payoff_min`.
    fn below(&mut self, value: Payoff) -> Payoff {
        self.rng.gen_range(self.config.payoff_min..value)
    }

    /// Uniform in `[payoff_min, value]`.
    fn up_to(&mut self, value: Payoff) -> Payoff {
        self.rng.gen_range(self.config.payoff_min..=value)
    }

    fn chance(&mut self, prob: f64) -> bool {
        self.rng.gen::<f64>() < prob
    }

    fn pick(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut draw = self.rng.gen::<f64>() * total;
        for (i, w) in weights.iter().enumerate() {
            if draw < *w {
                return i;
            }
            draw -= w;
        }
        weights.len() - 1
    }

    /// Two payoffs `(top, bottom)` with `bottom < top`.
    fn strict_pair(&mut self) -> (Payoff, Payoff) {
        let top = self.rng.gen_range(self.config.payoff_min + 1..=self.config.payoff_max);
        let bottom = self.below(top);
        (top, bottom)
    }

    fn dominance_kind(&mut self) -> DominanceKind {
        if self.chance(0.5) {
            DominanceKind::Strict
        } else {
            DominanceKind::Weak
        }
    }

    fn base_fill(&mut self, rows: usize, cols: usize) -> Grid {
        let mut cells = Vec::with_capacity(rows);
        for _ in 0..rows {
            let row = (0..cols).map(|_| (self.payoff(), self.payoff())).collect();
            cells.push(row);
        }
        Grid { cells }
    }

    // ------------------------------------------------------------------
    // Construction passes
    // ------------------------------------------------------------------

    /// Make a random strategy of `player` strictly dominant; returns its index.
    fn force_strict(&mut self, grid: &mut Grid, player: Player) -> usize {
        let own_count = grid.count(player);
        let opp_count = grid.count(player.opponent());
        let dom = self.pick(own_count);

        for opp in 0..opp_count {
            let high = self.high();
            grid.set(player, dom, opp, high);
            for other in (0..own_count).filter(|&o| o != dom) {
                let low = self.below(high);
                grid.set(player, other, opp, low);
            }
        }
        self.repair_strict(grid, player, dom, 0..opp_count);
        dom
    }

    /// Lower any payoff in `opps` that ties or beats `dom`.
    fn repair_strict(&mut self, grid: &mut Grid, player: Player, dom: usize, opps: std::ops::Range<usize>) {
        let floor = self.config.payoff_min;
        for opp in opps {
            let value = grid.get(player, dom, opp);
            for other in (0..grid.count(player)).filter(|&o| o != dom) {
                if grid.get(player, other, opp) >= value {
                    grid.set(player, other, opp, (value - 1).max(floor));
                    self.stats.repaired_cells += 1;
                }
            }
        }
    }

    /// Make a random strategy of `player` weakly dominant; returns its index.
    fn force_weak(&mut self, grid: &mut Grid, player: Player) -> usize {
        let own_count = grid.count(player);
        let opp_count = grid.count(player.opponent());
        let dom = self.pick(own_count);

        for opp in 0..opp_count {
            let high = self.high();
            grid.set(player, dom, opp, high);
            for other in (0..own_count).filter(|&o| o != dom) {
                let value = self.up_to(high);
                grid.set(player, other, opp, value);
            }
        }

        // every alternative ties once and loses strictly once
        debug_assert!(opp_count >= 2);
        for other in (0..own_count).filter(|&o| o != dom) {
            let tied = (0..opp_count).find(|&opp| grid.get(player, dom, opp) == grid.get(player, other, opp));
            let tie = match tied {
                Some(opp) => opp,
                None => {
                    let opp = self.pick(opp_count);
                    let value = grid.get(player, dom, opp);
                    grid.set(player, other, opp, value);
                    self.stats.repaired_cells += 1;
                    opp
                }
            };
            let separated = (0..opp_count).any(|opp| grid.get(player, dom, opp) > grid.get(player, other, opp));
            if !separated {
                let opp = (tie + 1 + self.pick(opp_count - 1)) % opp_count;
                let low = self.below(grid.get(player, dom, opp));
                grid.set(player, other, opp, low);
                self.stats.repaired_cells += 1;
            }
        }
        dom
    }

    fn force_dominance(&mut self, grid: &mut Grid, player: Player, kind: DominanceKind) -> Label {
        let index = match kind {
            DominanceKind::Strict => self.force_strict(grid, player),
            DominanceKind::Weak => self.force_weak(grid, player),
        };
        match player {
            Player::One => ROWS_4[index].to_string(),
            Player::Two => COLS_3[index].to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Generators
    // ------------------------------------------------------------------

    fn best_response(&mut self) -> Exercise {
        let game = self.base_fill(ROWS_3.len(), COLS_3.len()).into_game(&ROWS_3, &COLS_3);
        let responder = Player::BOTH[self.pick(2)];
        let options = game.strategies(responder.opponent());
        let opponent_strategy = options[self.pick(options.len())].clone();
        Exercise::BestResponse {
            game,
            responder,
            opponent_strategy,
        }
    }

    fn strict_dominance(&mut self) -> (NormalFormGame, Option<Scenario>) {
        let mut grid = self.base_fill(ROWS_4.len(), COLS_3.len());
        if !self.chance(self.config.dominance_force_prob) {
            return (grid.into_game(&ROWS_4, &COLS_3), None);
        }

        let target = [Target::Column, Target::Row, Target::Both][self.weighted(&STRICT_DOMINANCE_WEIGHTS)];
        let (row_kind, col_kind) = match target {
            Target::Column => (None, Some(DominanceKind::Strict)),
            Target::Row => (Some(DominanceKind::Strict), None),
            Target::Both => (Some(DominanceKind::Strict), Some(DominanceKind::Strict)),
        };
        let scenario = self.force_dominant_strategies(&mut grid, row_kind, col_kind);
        (grid.into_game(&ROWS_4, &COLS_3), Some(scenario))
    }

    fn weak_dominance(&mut self) -> (NormalFormGame, Option<Scenario>) {
        let mut grid = self.base_fill(ROWS_4.len(), COLS_3.len());
        if !self.chance(self.config.weak_dominance_force_prob) {
            return (grid.into_game(&ROWS_4, &COLS_3), None);
        }

        let target = [Target::Column, Target::Row, Target::Both][self.weighted(&WEAK_DOMINANCE_WEIGHTS)];
        let (row_kind, col_kind) = match target {
            Target::Column => (None, Some(self.dominance_kind())),
            Target::Row => (Some(self.dominance_kind()), None),
            Target::Both if self.chance(0.5) => {
                // one strict, one weak
                let row = self.dominance_kind();
                let col = match row {
                    DominanceKind::Strict => DominanceKind::Weak,
                    DominanceKind::Weak => DominanceKind::Strict,
                };
                (Some(row), Some(col))
            }
            Target::Both => {
                let same = self.dominance_kind();
                (Some(same), Some(same))
            }
        };
        let scenario = self.force_dominant_strategies(&mut grid, row_kind, col_kind);
        (grid.into_game(&ROWS_4, &COLS_3), Some(scenario))
    }

    fn force_dominant_strategies(
        &mut self,
        grid: &mut Grid,
        row_kind: Option<DominanceKind>,
        col_kind: Option<DominanceKind>,
    ) -> Scenario {
        let repaired_before = self.stats.repaired_cells;
        // column first; the two players' payoffs never interact
        let col = col_kind.map(|kind| (self.force_dominance(grid, Player::Two, kind), kind));
        let row = row_kind.map(|kind| (self.force_dominance(grid, Player::One, kind), kind));
        log::debug!(
            "forced dominance row={:?} col={:?}, {} cells repaired",
            row,
            col,
            self.stats.repaired_cells - repaired_before
        );
        Scenario::DominantStrategies { row, col }
    }

    fn nash(&mut self) -> (NormalFormGame, Option<Scenario>) {
        let mut grid = self.base_fill(ROWS_4.len(), COLS_3.len());
        if !self.chance(self.config.nash_force_prob) {
            return (grid.into_game(&ROWS_4, &COLS_3), None);
        }

        let scenario = if self.chance(SINGLE_EQUILIBRIUM_WEIGHT) {
            let r = self.pick(ROWS_4.len());
            let c = self.pick(COLS_3.len());

            let u1 = self.high();
            grid.set(Player::One, r, c, u1);
            self.repair_strict(&mut grid, Player::One, r, c..c + 1);

            let u2 = self.high();
            grid.set(Player::Two, c, r, u2);
            self.repair_strict(&mut grid, Player::Two, c, r..r + 1);

            Scenario::StrictEquilibrium {
                profile: Profile::new(ROWS_4[r], COLS_3[c]),
            }
        } else {
            let col = self.force_strict(&mut grid, Player::Two);

            let picked = index::sample(&mut self.rng, ROWS_4.len(), 2).into_vec();
            let (r1, r2) = (picked[0].min(picked[1]), picked[0].max(picked[1]));
            let high = self.high();
            grid.set(Player::One, r1, col, high);
            grid.set(Player::One, r2, col, high);
            for r in (0..ROWS_4.len()).filter(|&r| r != r1 && r != r2) {
                if grid.get(Player::One, r, col) >= high {
                    grid.set(Player::One, r, col, high - 1);
                    self.stats.repaired_cells += 1;
                }
            }

            Scenario::TiedEquilibria {
                profiles: [
                    Profile::new(ROWS_4[r1], COLS_3[col]),
                    Profile::new(ROWS_4[r2], COLS_3[col]),
                ],
            }
        };
        (grid.into_game(&ROWS_4, &COLS_3), Some(scenario))
    }

    /// A 2×2 game without pure equilibria whose row mix is exactly `1/n`.
    ///
    /// Player 2's payoff gaps are `(n-1)·d` in row `A` and `d` in row `B`,
    /// pointing to different columns, so `p = d / (n·d)`.
    fn mixed(&mut self) -> (NormalFormGame, Scenario) {
        let (lo, hi) = (self.config.payoff_min, self.config.payoff_max);
        let span = hi - lo;
        let n = self.rng.gen_range(2..=MAX_MIXED_DENOMINATOR.min(span + 1));
        let d = self.rng.gen_range(1..=(span / (n - 1)).max(1));
        let wide = (n - 1) * d;

        let a_low = self.rng.gen_range(lo..=hi - wide);
        let b_low = self.rng.gen_range(lo..=hi - d);
        let a_favours_x = self.chance(0.5);

        // (u2(A,X), u2(A,Y), u2(B,X), u2(B,Y))
        let (ax2, ay2, bx2, by2) = if a_favours_x {
            (a_low + wide, a_low, b_low, b_low + d)
        } else {
            (a_low, a_low + wide, b_low + d, b_low)
        };

        // player 1 chases the column player 2 avoids
        let (x_top, x_bottom) = self.strict_pair();
        let (y_top, y_bottom) = self.strict_pair();
        let (ax1, bx1, ay1, by1) = if a_favours_x {
            (x_bottom, x_top, y_top, y_bottom)
        } else {
            (x_top, x_bottom, y_bottom, y_top)
        };

        let grid = Grid {
            cells: vec![vec![(ax1, ax2), (ay1, ay2)], vec![(bx1, bx2), (by1, by2)]],
        };
        (grid.into_game(&ROWS_2, &COLS_2), Scenario::IndifferenceTarget { n })
    }

    fn symmetric(&mut self) -> (SymmetricGame, Option<Scenario>) {
        let n = ROWS_3.len();
        let mut u: Vec<Vec<Payoff>> = vec![vec![0; n]; n];
        for value in u.iter_mut().flatten() {
            *value = self.payoff();
        }

        let mut raised = Vec::new();
        for s in 0..n {
            if self.chance(self.config.symmetric_diagonal_prob) {
                let column_max = (0..n).map(|r| u[r][s]).max().unwrap_or(u[s][s]);
                u[s][s] = u[s][s].max(column_max);
                raised.push(ROWS_3[s].to_string());
            }
        }

        let game = SymmetricGame::from_row_payoffs(ROWS_3.to_vec(), u)
            .expect("mirrored payoffs are symmetric by construction");
        let scenario = (!raised.is_empty()).then_some(Scenario::RaisedDiagonal { strategies: raised });
        (game, scenario)
    }

    fn one_sided(&mut self) -> BayesianGame {
        let games = (0..ONE_SIDED_TYPES.len())
            .map(|_| self.base_fill(ROWS_2.len(), COLS_2.len()).into_game(&ROWS_2, &COLS_2))
            .collect();
        let [a, b] = self.config.one_sided_prior;
        let prior = [a, b]
            .iter()
            .map(|&w| Fraction::new(w, a + b).unwrap_or(Fraction::ZERO))
            .collect();
        BayesianGame::one_sided(ONE_SIDED_TYPES.to_vec(), prior, games)
            .expect("validated prior weights and fixed labels")
    }

    fn two_sided(&mut self) -> Exercise {
        let den = self.rng.gen_range(TWO_SIDED_DENOMINATORS);
        let mut cuts: Vec<i64> = index::sample(&mut self.rng, (den - 1) as usize, 3)
            .into_iter()
            .map(|i| i as i64 + 1)
            .collect();
        cuts.sort_unstable();
        let mut parts = [cuts[0], cuts[1] - cuts[0], cuts[2] - cuts[1], den - cuts[2]];
        parts.shuffle(&mut self.rng);
        let prior = JointPrior {
            den,
            w: parts[0],
            x: parts[1],
            y: parts[2],
            z: parts[3],
        };

        let alternative = candidate_profiles()[self.rng.gen_range(1..4)].clone();
        let game = BayesianGame::two_sided_exercise(&prior).expect("generated priors are valid");
        Exercise::BayesianTwoSided {
            game,
            prior,
            alternative,
        }
    }
}

/// Generate `count` instances of `kind` in parallel.
///
/// Each item uses its own [`Synthesizer`] (see
/// [`Synthesizer::for_batch_item`]), so a seeded batch is reproducible
/// regardless of scheduling. `on_item` is called once per finished item,
/// from worker threads.
pub fn generate_batch<F>(
    config: &SynthConfig,
    kind: ExerciseKind,
    count: usize,
    on_item: Option<F>,
) -> Result<(Vec<Exercise>, SynthStats), ConfigError>
where
    F: Fn(usize) + Sync,
{
    config.validate()?;

    let items: Vec<(Exercise, SynthStats)> = (0..count)
        .into_par_iter()
        .map(|i| {
            let mut synth = Synthesizer::for_batch_item(config, i as u64)?;
            let exercise = synth.generate(kind);
            if let Some(callback) = &on_item {
                callback(i);
            }
            Ok::<_, ConfigError>((exercise, synth.stats))
        })
        .collect::<Result<_, _>>()?;

    let mut stats = SynthStats::new();
    let mut exercises = Vec::with_capacity(items.len());
    for (exercise, item_stats) in items {
        stats.merge(&item_stats);
        exercises.push(exercise);
    }
    log::info!(
        "generated {} {} instances ({} forced, {} cells repaired)",
        stats.generated,
        kind,
        stats.forced,
        stats.repaired_cells
    );
    Ok((exercises, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::dominance::{best_response_set, weakly_dominated_strategies};
    use crate::analysis::equilibrium::{
        pure_nash_equilibria, strict_pure_nash_equilibria, trembling_hand_perfect_pure_equilibria,
    };
    use crate::analysis::evolution::{evolutionarily_stable_strategies, symmetric_nash_strategies};
    use crate::analysis::mixed::{menu_index, row_mix_probability};
    use crate::analysis::{
        dominance_verdict, strictly_dominant_strategy, weakly_dominant_strategy, DominanceVerdict,
    };

    const SEEDS: u64 = 200;

    fn synth(seed: u64) -> Synthesizer {
        Synthesizer::new(SynthConfig::default().with_seed(seed)).unwrap()
    }

    fn forced_synth(seed: u64) -> Synthesizer {
        Synthesizer::new(SynthConfig::always_forced().with_seed(seed)).unwrap()
    }

    fn is_mutual_best_response(game: &NormalFormGame, profile: &Profile) -> bool {
        best_response_set(game, Player::One, &profile.col).unwrap().contains(&profile.row)
            && best_response_set(game, Player::Two, &profile.row).unwrap().contains(&profile.col)
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = SynthConfig::default().with_payoff_range(3, 1);
        assert!(Synthesizer::new(config).is_err());
    }

    #[test]
    fn test_seeded_output_is_reproducible() {
        for kind in ExerciseKind::ALL {
            assert_eq!(synth(11).generate(kind), synth(11).generate(kind), "{}", kind);
        }
    }

    #[test]
    fn test_payoffs_stay_in_range() {
        for seed in 0..50 {
            let mut s = synth(seed);
            for kind in ExerciseKind::ALL {
                if kind == ExerciseKind::MarketSelection {
                    continue;
                }
                let exercise = s.generate(kind);
                if let Some(game) = exercise.normal_form() {
                    for cell in game.cells() {
                        assert!((0..=9).contains(&cell.u1) && (0..=9).contains(&cell.u2), "{}", kind);
                    }
                }
            }
        }
    }

    #[test]
    fn test_nash_sets_are_consistent() {
        for seed in 0..SEEDS {
            let exercise = synth(seed).generate(ExerciseKind::NashEquilibria);
            let game = exercise.normal_form().unwrap();
            let nash = pure_nash_equilibria(game);
            for profile in &nash {
                assert!(game.rows().contains(&profile.row) && game.cols().contains(&profile.col));
                assert!(is_mutual_best_response(game, profile));
            }
            for profile in game.cells().iter().map(|c| Profile::new(c.row.as_str(), c.col.as_str())) {
                if !nash.contains(&profile) {
                    assert!(!is_mutual_best_response(game, &profile));
                }
            }
            for strict in strict_pure_nash_equilibria(game) {
                assert!(nash.contains(&strict));
            }
        }
    }

    #[test]
    fn test_forced_nash_scenarios_hold() {
        for seed in 0..SEEDS {
            let exercise = forced_synth(seed).generate(ExerciseKind::StrictNash);
            let game = exercise.normal_form().unwrap();
            match exercise.scenario() {
                Some(Scenario::StrictEquilibrium { profile }) => {
                    assert!(strict_pure_nash_equilibria(game).contains(profile));
                }
                Some(Scenario::TiedEquilibria { profiles }) => {
                    assert_eq!(pure_nash_equilibria(game), profiles.to_vec());
                    assert!(strict_pure_nash_equilibria(game).is_empty());
                }
                other => panic!("unexpected scenario {:?}", other),
            }
        }
    }

    #[test]
    fn test_forced_strict_dominance_holds() {
        for seed in 0..SEEDS {
            let exercise = forced_synth(seed).generate(ExerciseKind::StrictDominance);
            let game = exercise.normal_form().unwrap();
            let Some(Scenario::DominantStrategies { row, col }) = exercise.scenario() else {
                panic!("dominance must be forced");
            };
            assert!(row.is_some() || col.is_some());
            for (player, forced) in [(Player::One, row), (Player::Two, col)] {
                if let Some((label, kind)) = forced {
                    assert_eq!(*kind, DominanceKind::Strict);
                    assert_eq!(strictly_dominant_strategy(game, player).as_ref(), Some(label));
                }
            }
            assert!(exercise.exhibits_structure());
        }
    }

    #[test]
    fn test_forced_weak_dominance_holds() {
        for seed in 0..SEEDS {
            let exercise = forced_synth(seed).generate(ExerciseKind::WeakDominance);
            let game = exercise.normal_form().unwrap();
            let Some(Scenario::DominantStrategies { row, col }) = exercise.scenario() else {
                panic!("dominance must be forced");
            };
            for (player, forced) in [(Player::One, row), (Player::Two, col)] {
                if let Some((label, kind)) = forced {
                    assert_eq!(weakly_dominant_strategy(game, player).as_ref(), Some(label));
                    let expected = match kind {
                        DominanceKind::Strict => DominanceVerdict::Strict(label.clone()),
                        DominanceKind::Weak => DominanceVerdict::Weak(label.clone()),
                    };
                    assert_eq!(dominance_verdict(game, player), expected, "seed {}", seed);
                }
            }
        }
    }

    #[test]
    fn test_strict_dominant_is_unique_best_response() {
        for seed in 0..SEEDS {
            let exercise = synth(seed).generate(ExerciseKind::StrictDominance);
            let game = exercise.normal_form().unwrap();
            for player in Player::BOTH {
                if let Some(dom) = strictly_dominant_strategy(game, player) {
                    for opp in game.strategies(player.opponent()) {
                        assert_eq!(best_response_set(game, player, opp).unwrap(), vec![dom.clone()]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_trembling_hand_subset() {
        for seed in 0..SEEDS {
            let exercise = synth(seed).generate(ExerciseKind::TremblingHand);
            let game = exercise.normal_form().unwrap();
            let nash = pure_nash_equilibria(game);
            let dominated_rows = weakly_dominated_strategies(game, Player::One);
            let dominated_cols = weakly_dominated_strategies(game, Player::Two);
            for profile in trembling_hand_perfect_pure_equilibria(game) {
                assert!(nash.contains(&profile));
                assert!(!dominated_rows.contains(&profile.row));
                assert!(!dominated_cols.contains(&profile.col));
            }
        }
    }

    #[test]
    fn test_mixed_target_probability() {
        for seed in 0..SEEDS {
            let exercise = synth(seed).generate(ExerciseKind::MixedEquilibrium);
            let game = exercise.normal_form().unwrap();
            let Some(Scenario::IndifferenceTarget { n }) = exercise.scenario() else {
                panic!("mixed games always carry a target");
            };
            let p = row_mix_probability(game).unwrap().probability().unwrap();
            assert_eq!(p, Fraction::new(1, *n).unwrap());
            assert!(menu_index(p).is_some());
            assert!(pure_nash_equilibria(game).is_empty());
            assert!(exercise.exhibits_structure());
        }
    }

    #[test]
    fn test_raised_diagonal_is_symmetric_nash() {
        for seed in 0..SEEDS {
            let exercise = synth(seed).generate(ExerciseKind::EvolutionaryStability);
            let Exercise::EvolutionaryStability { game, scenario } = &exercise else {
                panic!("wrong exercise");
            };
            let nash = symmetric_nash_strategies(game);
            for ess in evolutionarily_stable_strategies(game) {
                assert!(nash.contains(&ess));
            }
            if let Some(Scenario::RaisedDiagonal { strategies }) = scenario {
                for s in strategies {
                    assert!(nash.contains(s));
                }
            }
        }
    }

    #[test]
    fn test_two_sided_priors() {
        for seed in 0..SEEDS {
            let Exercise::BayesianTwoSided { prior, alternative, game } = synth(seed).generate(ExerciseKind::BayesianTwoSided)
            else {
                panic!("wrong exercise");
            };
            assert!(TWO_SIDED_DENOMINATORS.contains(&prior.den));
            assert!(prior.validate().is_ok());
            assert!([prior.w, prior.x, prior.y, prior.z].iter().all(|&v| v > 0));
            assert_ne!(alternative, candidate_profiles()[0]);
            assert_eq!(game.types(Player::Two), &["c".to_string(), "d".to_string()]);
        }
    }

    #[test]
    fn test_one_sided_prior_from_config() {
        let exercise = synth(3).generate(ExerciseKind::BayesianOneSided);
        let Exercise::BayesianOneSided { game } = exercise else {
            panic!("wrong exercise");
        };
        assert_eq!(game.prior(0, 0), Fraction::new(1, 4).unwrap());
        assert_eq!(game.prior(1, 0), Fraction::new(3, 4).unwrap());
    }

    #[test]
    fn test_unforced_config_never_forces() {
        let config = SynthConfig::default().with_force_probability(0.0).with_seed(5);
        let mut s = Synthesizer::new(config).unwrap();
        for _ in 0..50 {
            assert!(s.generate(ExerciseKind::StrictDominance).scenario().is_none());
            assert!(s.generate(ExerciseKind::NashEquilibria).scenario().is_none());
        }
        assert_eq!(s.stats().generated, 100);
        assert_eq!(s.stats().forced, 0);
    }

    #[test]
    fn test_stats_count_forced_instances() {
        let mut s = forced_synth(8);
        for _ in 0..10 {
            s.generate(ExerciseKind::WeakDominance);
        }
        s.generate(ExerciseKind::TremblingHand);
        assert_eq!(s.stats().generated, 11);
        assert_eq!(s.stats().forced, 10);
    }

    #[test]
    fn test_batch_is_deterministic() {
        let config = SynthConfig::default().with_seed(99);
        let (first, stats) = generate_batch(&config, ExerciseKind::NashEquilibria, 32, None::<fn(usize)>).unwrap();
        let (second, _) = generate_batch(&config, ExerciseKind::NashEquilibria, 32, None::<fn(usize)>).unwrap();
        assert_eq!(first, second);
        assert_eq!(stats.generated, 32);
        assert_eq!(first[5], Synthesizer::for_batch_item(&config, 5).unwrap().generate(ExerciseKind::NashEquilibria));
    }

    #[test]
    fn test_batch_callback_and_invalid_config() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let done = AtomicUsize::new(0);
        let config = SynthConfig::default().with_seed(1);
        let (items, _) = generate_batch(
            &config,
            ExerciseKind::MarketSelection,
            10,
            Some(|_: usize| {
                done.fetch_add(1, Ordering::Relaxed);
            }),
        )
        .unwrap();
        assert_eq!(items.len(), 10);
        assert_eq!(done.load(Ordering::Relaxed), 10);

        let bad = SynthConfig::default().with_high_min(42);
        assert!(generate_batch(&bad, ExerciseKind::BestResponse, 3, None::<fn(usize)>).is_err());
    }
}
