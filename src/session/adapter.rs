//! Collaborators outside the core
//!
//! The controller reads a difficulty level and reports answers back; how the
//! level is estimated is not its concern. Finished fixed-set sessions are
//! handed to a recorder.

use super::state::SessionSummary;
use crate::consts::SPEED_BONUS_THRESHOLD_MS;
use crate::generator::MAX_TIER;

/// Supplies the difficulty tier and receives answer feedback
pub trait DifficultyAdapter {
    fn level(&self) -> u32;
    fn record_answer(&mut self, time_to_solve_ms: f64, was_correct: bool);
}

impl<T: DifficultyAdapter + ?Sized> DifficultyAdapter for &mut T {
    fn level(&self) -> u32 {
        (**self).level()
    }

    fn record_answer(&mut self, time_to_solve_ms: f64, was_correct: bool) {
        (**self).record_answer(time_to_solve_ms, was_correct)
    }
}

/// Receives the final snapshot of a completed fixed-set session
pub trait SessionRecorder {
    fn record_session(&mut self, summary: &SessionSummary, timestamp: f64);
}

/// Constant level; feedback is dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLevel(pub u32);

impl DifficultyAdapter for FixedLevel {
    fn level(&self) -> u32 {
        self.0
    }

    fn record_answer(&mut self, _time_to_solve_ms: f64, _was_correct: bool) {}
}

/// Small stepping adapter for local play: five fast correct answers in a
/// row move up a tier, two misses in a row move down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepLevel {
    level: u32,
    fast_run: u32,
    miss_run: u32,
}

impl StepLevel {
    pub const PROMOTE_AFTER: u32 = 5;
    pub const DEMOTE_AFTER: u32 = 2;

    pub fn new(level: u32) -> Self {
        Self {
            level: level.clamp(1, MAX_TIER),
            fast_run: 0,
            miss_run: 0,
        }
    }
}

impl Default for StepLevel {
    fn default() -> Self {
        Self::new(1)
    }
}

impl DifficultyAdapter for StepLevel {
    fn level(&self) -> u32 {
        self.level
    }

    fn record_answer(&mut self, time_to_solve_ms: f64, was_correct: bool) {
        if !was_correct {
            self.fast_run = 0;
            self.miss_run += 1;
            if self.miss_run >= Self::DEMOTE_AFTER {
                self.miss_run = 0;
                self.level = (self.level - 1).max(1);
            }
            return;
        }

        self.miss_run = 0;
        // Slow but correct answers hold the level
        if time_to_solve_ms > 2.0 * SPEED_BONUS_THRESHOLD_MS {
            self.fast_run = 0;
            return;
        }
        self.fast_run += 1;
        if self.fast_run >= Self::PROMOTE_AFTER {
            self.fast_run = 0;
            if self.level < MAX_TIER {
                self.level += 1;
                log::debug!("Difficulty up to {}", self.level);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_level() {
        let mut a = FixedLevel(3);
        a.record_answer(100.0, false);
        assert_eq!(a.level(), 3);
    }

    #[test]
    fn test_step_promotes_and_caps() {
        let mut a = StepLevel::new(4);
        for _ in 0..StepLevel::PROMOTE_AFTER {
            a.record_answer(800.0, true);
        }
        assert_eq!(a.level(), 5);
        for _ in 0..StepLevel::PROMOTE_AFTER {
            a.record_answer(800.0, true);
        }
        assert_eq!(a.level(), MAX_TIER);
    }

    #[test]
    fn test_step_slow_answers_hold() {
        let mut a = StepLevel::new(2);
        for _ in 0..20 {
            a.record_answer(5_000.0, true);
        }
        assert_eq!(a.level(), 2);
    }

    #[test]
    fn test_step_demotes_and_floors() {
        let mut a = StepLevel::new(2);
        a.record_answer(1_000.0, false);
        assert_eq!(a.level(), 2);
        a.record_answer(1_000.0, false);
        assert_eq!(a.level(), 1);
        a.record_answer(1_000.0, false);
        a.record_answer(1_000.0, false);
        assert_eq!(a.level(), 1);
    }

    #[test]
    fn test_mut_ref_adapter() {
        fn feed<A: DifficultyAdapter>(mut adapter: A) -> u32 {
            for _ in 0..5 {
                adapter.record_answer(500.0, true);
            }
            adapter.level()
        }

        let mut inner = StepLevel::new(1);
        assert_eq!(feed(&mut inner), 2);
        assert_eq!(inner.level(), 2);
    }
}
