//! Procedural generation: seeded randomness, config validation, and the
//! grid generator.
//!
//! # Invariants
//! - Identical `(seed, percentages, size)` always yields a bit-identical grid.
//! - The generator never runs on an unvalidated config.

pub mod config;
pub mod generator;
pub mod rng;

pub use config::{
    ConfigError, RawWorldConfig, TilePercentages, WorldConfig, WorldSize, validate,
};
pub use generator::{ProceduralGenerator, Thresholds, generate_or_default};
pub use rng::SeededRandom;
