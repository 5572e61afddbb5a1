//! Configuration and statistics for the instance synthesizer.
//!
//! The defaults reproduce the classroom exercise set: payoffs drawn from
//! `0..=9`, forced "high" values from `5..=9`, and forcing probabilities
//! that leave a few instances without any special structure.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for the [`Synthesizer`](super::Synthesizer).
///
/// # Example
/// ```
/// use game_theory_core::synth::SynthConfig;
///
/// let config = SynthConfig::default().with_seed(7);
/// assert_eq!(config.payoff_max, 9);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthConfig {
    /// Smallest payoff drawn during base fill.
    pub payoff_min: i64,

    /// Largest payoff drawn during base fill.
    pub payoff_max: i64,

    /// Lower bound for the value given to a forced dominant or equilibrium
    /// cell. Must leave room for strictly smaller payoffs.
    pub high_min: i64,

    /// Probability of forcing a strictly dominant strategy.
    pub dominance_force_prob: f64,

    /// Probability of forcing structure in the weak-or-strict dominance exercise.
    pub weak_dominance_force_prob: f64,

    /// Probability of forcing an equilibrium pattern in the Nash exercises.
    pub nash_force_prob: f64,

    /// Per-strategy probability of raising a symmetric game's diagonal entry
    /// to its column maximum.
    pub symmetric_diagonal_prob: f64,

    /// Relative weights of the two types in the one-sided Bayesian game.
    pub one_sided_prior: [i64; 2],

    /// Random seed for reproducibility.
    ///
    /// If `None`, the generator is seeded from system entropy.
    pub seed: Option<u64>,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            payoff_min: 0,
            payoff_max: 9,
            high_min: 5,
            dominance_force_prob: 0.85,
            weak_dominance_force_prob: 0.9,
            nash_force_prob: 0.9,
            symmetric_diagonal_prob: 0.75,
            one_sided_prior: [1, 3],
            seed: None,
        }
    }
}

impl SynthConfig {
    /// Create a new SynthConfig with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// A configuration that always forces the requested structure.
    pub fn always_forced() -> Self {
        Self::default().with_force_probability(1.0)
    }

    /// Builder method: set random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builder method: set every forcing probability at once.
    pub fn with_force_probability(mut self, prob: f64) -> Self {
        let prob = prob.clamp(0.0, 1.0);
        self.dominance_force_prob = prob;
        self.weak_dominance_force_prob = prob;
        self.nash_force_prob = prob;
        self
    }

    /// Builder method: set the base-fill payoff range.
    pub fn with_payoff_range(mut self, min: i64, max: i64) -> Self {
        self.payoff_min = min;
        self.payoff_max = max;
        self
    }

    /// Builder method: set the lower bound for forced high values.
    pub fn with_high_min(mut self, high_min: i64) -> Self {
        self.high_min = high_min;
        self
    }

    /// Builder method: set the symmetric diagonal probability.
    pub fn with_symmetric_diagonal_prob(mut self, prob: f64) -> Self {
        self.symmetric_diagonal_prob = prob.clamp(0.0, 1.0);
        self
    }

    /// Builder method: set the one-sided prior weights.
    pub fn with_one_sided_prior(mut self, first: i64, second: i64) -> Self {
        self.one_sided_prior = [first, second];
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_json_str(&content)
    }

    /// Parse configuration from a JSON string. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration and return any errors.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.payoff_min >= self.payoff_max {
            return Err(ConfigError::InvalidPayoffRange {
                min: self.payoff_min,
                max: self.payoff_max,
            });
        }

        if self.high_min <= self.payoff_min || self.high_min > self.payoff_max {
            return Err(ConfigError::InvalidHighMin(self.high_min));
        }

        let probabilities = [
            ("dominance", self.dominance_force_prob),
            ("weak dominance", self.weak_dominance_force_prob),
            ("nash", self.nash_force_prob),
            ("symmetric diagonal", self.symmetric_diagonal_prob),
        ];
        for (name, p) in probabilities {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::InvalidProbability(name, p));
            }
        }

        let [a, b] = self.one_sided_prior;
        if a < 0 || b < 0 || a + b == 0 {
            return Err(ConfigError::InvalidPrior(a, b));
        }

        Ok(())
    }
}

/// Errors that can occur when loading or validating a [`SynthConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The config file could not be read.
    IoError(String),
    /// The config file is not valid JSON for this type.
    ParseError(String),
    /// `payoff_min` is not below `payoff_max`.
    InvalidPayoffRange {
        /// Configured minimum.
        min: i64,
        /// Configured maximum.
        max: i64,
    },
    /// `high_min` is not inside `(payoff_min, payoff_max]`.
    InvalidHighMin(i64),
    /// A probability is out of range [0, 1].
    InvalidProbability(&'static str, f64),
    /// Prior weights are negative or both zero.
    InvalidPrior(i64, i64),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {}", e),
            Self::ParseError(e) => write!(f, "Parse error: {}", e),
            Self::InvalidPayoffRange { min, max } => {
                write!(f, "Invalid payoff range: min {} must be below max {}", min, max)
            }
            Self::InvalidHighMin(v) => {
                write!(f, "High payoff bound {} must lie above the minimum and within the range", v)
            }
            Self::InvalidProbability(name, p) => {
                write!(f, "{} probability {} is out of range [0, 1]", name, p)
            }
            Self::InvalidPrior(a, b) => write!(f, "Invalid prior weights: {}, {}", a, b),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Counters kept by a [`Synthesizer`](super::Synthesizer).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthStats {
    /// Instances generated.
    pub generated: u64,

    /// Instances where a structure was forced.
    pub forced: u64,

    /// Cells corrected by repair passes.
    pub repaired_cells: u64,
}

impl SynthStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of generated instances that were forced, or 0 before any generation.
    pub fn forced_rate(&self) -> f64 {
        if self.generated == 0 {
            0.0
        } else {
            self.forced as f64 / self.generated as f64
        }
    }

    /// Add another generator's counters.
    pub fn merge(&mut self, other: &SynthStats) {
        self.generated += other.generated;
        self.forced += other.forced;
        self.repaired_cells += other.repaired_cells;
    }
}
