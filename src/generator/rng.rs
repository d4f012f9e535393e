//! Random sources for problem generation
//!
//! Every generator takes a `&mut dyn RandomSource`; nothing in `generator` reaches
//! for a global RNG. Seeded play (daily / challenge sets) uses
//! [`SeededRandom`], endless play uses [`AmbientRandom`].

use chrono::{Datelike, NaiveDate};
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;

/// 2^32, maps a `u32` draw into [0, 1)
const U32_SPAN: f64 = 4_294_967_296.0;

/// A stream of uniform floats in [0, 1)
pub trait RandomSource {
    /// Next value in [0, 1)
    fn next_unit(&mut self) -> f64;

    /// Uniform integer in `lo..=hi` (returns `lo` if the range is empty)
    fn int_in(&mut self, lo: i64, hi: i64) -> i64 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo + 1) as f64;
        lo + ((self.next_unit() * span).floor() as i64).min(hi - lo)
    }

    /// Uniform index into a collection of `len` items
    fn index(&mut self, len: usize) -> usize {
        if len <= 1 {
            return 0;
        }
        self.int_in(0, len as i64 - 1) as usize
    }

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }
}

/// Pick one element of a non-empty slice
pub fn pick<'a, T>(rng: &mut dyn RandomSource, items: &'a [T]) -> &'a T {
    &items[rng.index(items.len())]
}

/// Deterministic PCG stream. Equal seeds give identical infinite sequences
/// on every platform.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: Pcg32,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.next_u32() as f64 / U32_SPAN
    }
}

/// Unpredictable source for rolling buffers (thread-local OS-seeded RNG)
pub struct AmbientRandom {
    rng: rand::rngs::ThreadRng,
}

impl AmbientRandom {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for AmbientRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for AmbientRandom {
    fn next_unit(&mut self) -> f64 {
        self.rng.next_u32() as f64 / U32_SPAN
    }
}

/// Replays a fixed list of values, cycling when exhausted.
/// Used for golden-value tests.
#[derive(Debug, Clone)]
pub struct ReplayRandom {
    values: Vec<f64>,
    cursor: usize,
}

impl ReplayRandom {
    pub fn new(values: Vec<f64>) -> Self {
        assert!(!values.is_empty(), "replay source needs at least one value");
        Self { values, cursor: 0 }
    }

    /// Number of values drawn so far
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for ReplayRandom {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        v
    }
}

/// Seed shared by every player whose local calendar reads `date`.
///
/// Built from year/month/day only, so time of day and timezone offset
/// never change it.
pub fn date_seed(date: NaiveDate) -> u64 {
    date.year() as u64 * 10_000 + date.month() as u64 * 100 + date.day() as u64
}

/// Deterministic 32-bit string hash (`h * 31 + c`, wrapping).
///
/// Collisions only mean two links share a problem set.
pub fn string_seed(token: &str) -> u64 {
    let mut h: u32 = 0;
    for c in token.chars() {
        h = h.wrapping_mul(31).wrapping_add(c as u32);
    }
    h as u64
}
