//! Randomized synthesis of exercise instances.
//!
//! # Modules
//!
//! - `config`: generator settings, validation and counters
//! - `exercise`: exercise kinds, forced scenarios and generated instances
//! - `generator`: the seeded [`Synthesizer`] and parallel batches

pub mod config;
pub mod exercise;
pub mod generator;

pub use config::{ConfigError, SynthConfig, SynthStats};
pub use exercise::{DominanceKind, Exercise, ExerciseKind, Scenario};
pub use generator::{generate_batch, Synthesizer};
