//! Session game loop
//!
//! `step` is the pure transition function (event in, effects out, explicit
//! time); `driver` owns the timer queue and the outside collaborators.
//! Single-threaded: the `frozen` gate serialises answers.

pub mod adapter;
pub mod driver;
pub mod state;
pub mod step;

pub use adapter::{DifficultyAdapter, FixedLevel, SessionRecorder, StepLevel};
pub use driver::SessionDriver;
pub use state::{
    Companion, Direction, GameState, Milestone, Phase, SessionConfig, SessionMode, SessionSummary,
};
pub use step::{Effect, GameLoop, SessionEvent};
