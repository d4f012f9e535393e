//! Deterministic challenge sets
//!
//! Daily and link-shared challenges are rebuilt locally on every device from
//! a seed alone: one [`SeededRandom`] per build, a fixed type pool and a
//! fixed difficulty ramp. Equal seeds give identical sets everywhere.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::kinds::generate;
use super::problem::{Problem, ProblemId, QuestionType};
use super::rng::{RandomSource, SeededRandom, date_seed, pick, string_seed};

/// Problems in every daily / challenge set
pub const CHALLENGE_LENGTH: usize = 10;

/// Difficulty for the `index`-th problem: tier 2 for the first three, then
/// one tier up every three problems.
pub fn ramp_difficulty(index: usize) -> u32 {
    2 + (index / 3) as u32
}

/// Today's shared set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub date: NaiveDate,
    pub seed: u64,
    /// Display label, e.g. "October 17, 2026"
    pub label: String,
    pub problems: Vec<Problem>,
}

/// Build the ordered set for `seed`. The RNG lives only for this call.
pub fn build_set(seed: u64) -> Vec<Problem> {
    let mut rng = SeededRandom::new(seed);
    build_set_with(seed, &mut rng)
}

fn build_set_with(seed: u64, rng: &mut dyn RandomSource) -> Vec<Problem> {
    (0..CHALLENGE_LENGTH)
        .map(|index| {
            let kind = *pick(rng, QuestionType::CHALLENGE_POOL);
            let mut problem = generate(ramp_difficulty(index), kind, false, rng);
            problem.id = ProblemId::Seeded {
                seed,
                index: index as u32,
            };
            problem
        })
        .collect()
}

/// Display label for a calendar day
pub fn daily_label(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// The daily set for `date` (the player's local calendar day)
pub fn build_daily(date: NaiveDate) -> DailyChallenge {
    let seed = date_seed(date);
    let label = daily_label(date);
    log::info!("Building daily challenge {label} (seed {seed})");
    DailyChallenge {
        date,
        seed,
        label,
        problems: build_set(seed),
    }
}

/// The set shared through a challenge link token
pub fn build_from_token(token: &str) -> Vec<Problem> {
    let seed = string_seed(token);
    log::info!("Building challenge set for token {token:?} (seed {seed})");
    build_set(seed)
}
