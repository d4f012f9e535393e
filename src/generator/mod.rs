//! Procedural problem generation
//!
//! Pure functions of (difficulty, type, hard mode, random source):
//! - No wall clock
//! - No global RNG; the caller threads a [`RandomSource`] through
//! - Seeded challenge sets rebuild identically on every device

pub mod challenge;
pub mod distractor;
pub mod kinds;
pub mod problem;
pub mod rng;

pub use challenge::{
    CHALLENGE_LENGTH, DailyChallenge, build_daily, build_from_token, build_set, daily_label,
    ramp_difficulty,
};
pub use distractor::Frac;
pub use kinds::{GeneratorFn, MAX_TIER, generate, generator_for};
pub use problem::{OPTION_COUNT, ParseError, Problem, ProblemId, QuestionType, format_number};
pub use rng::{AmbientRandom, RandomSource, ReplayRandom, SeededRandom, date_seed, string_seed};
