//! Mathswipe - swipe-to-answer arithmetic practice
//!
//! Core modules:
//! - `generator`: Procedural problems, distractors, seeded challenge sets
//! - `session`: Game-loop state machine and its timer driver
//! - `share`: Challenge links and share cards
//! - `settings` / `records`: Persisted preferences and best results
//! - `platform`: Clock and calendar per target

pub mod generator;
pub mod platform;
pub mod records;
pub mod session;
pub mod settings;
pub mod share;

pub use generator::{Problem, QuestionType};
pub use records::SessionRecords;
pub use session::{Direction, GameLoop, GameState, SessionConfig, SessionDriver};
pub use settings::Settings;

/// Game tuning constants
pub mod consts {
    /// Rolling buffer size for endless modes
    pub const BUFFER_CAPACITY: usize = 8;
    /// Problems in a speedrun set
    pub const SPEEDRUN_LENGTH: usize = 20;

    /// Timed-mode limit per problem
    pub const TIME_LIMIT_MS: f64 = 10_000.0;
    /// Answers faster than this earn the speed bonus
    pub const SPEED_BONUS_THRESHOLD_MS: f64 = 1_200.0;

    /// Answers kept for the share card (most recent)
    pub const HISTORY_WINDOW: usize = 20;

    /// Freeze after a correct answer before advancing
    pub const CORRECT_DELAY_MS: f64 = 300.0;
    /// Freeze after a miss before advancing
    pub const WRONG_DELAY_MS: f64 = 700.0;
    /// Shake window for a forgiven first-problem miss
    pub const TUTORIAL_DELAY_MS: f64 = 500.0;
    pub const MILESTONE_DISPLAY_MS: f64 = 1_500.0;
    pub const SPEED_BONUS_DISPLAY_MS: f64 = 800.0;

    /// Scoring
    pub const BASE_POINTS: u64 = 10;
    /// Streak bonus grows by this much every `STREAK_TIER` answers
    pub const STREAK_BONUS_POINTS: u64 = 5;
    pub const STREAK_TIER: u32 = 5;
    pub const SPEED_BONUS_POINTS: u64 = 5;

    /// Companion reacts with "streak" from this many in a row
    pub const STREAK_REACTION: u32 = 10;
    /// Misses in a row before a correct answer counts as a comeback
    pub const COMEBACK_MISSES: u32 = 3;
}
