//! Random sources for the race model.
//!
//! The race never reaches for an ambient generator; every draw goes through
//! a [`RandomSource`] handed to it, so a seed (or a script) fully determines
//! a race.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

/// Uniform draws in `[0, 1)`.
pub trait RandomSource: Send {
    /// Draw the next value. Must be in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

/// Fast seedable generator used for real races.
#[derive(Debug, Clone)]
pub struct SeededSource {
    rng: SmallRng,
}

impl SeededSource {
    /// Deterministic source for the given seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Seeded when `seed` is given, OS entropy otherwise.
    pub fn from_optional_seed(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::from_seed)
    }
}

impl RandomSource for SeededSource {
    #[inline]
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when it runs out.
///
/// Values are clamped into `[0, 1)`. An empty script always yields `0.0`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
}

impl ScriptedSource {
    /// Cycle through `draws` forever.
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws
                .into_iter()
                .map(|d| d.clamp(0.0, 1.0 - f64::EPSILON))
                .collect(),
        }
    }

    /// Always return `value`.
    pub fn constant(value: f64) -> Self {
        Self::new([value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_unit(&mut self) -> f64 {
        let Some(value) = self.draws.pop_front() else {
            return 0.0;
        };
        self.draws.push_back(value);
        value
    }
}
