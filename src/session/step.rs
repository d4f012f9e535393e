//! Session transition function
//!
//! `GameLoop::handle` takes one event at an explicit `now` and returns the
//! effects an outer driver must carry out (scheduled follow-up events,
//! difficulty feedback, completion). No timers or clocks live in here.

use std::collections::VecDeque;

use super::state::{
    Companion, Direction, GameState, Milestone, Phase, SessionConfig, SessionMode, SessionSummary,
};
use crate::consts::*;
use crate::generator::{
    AmbientRandom, Problem, ProblemId, RandomSource, build_daily, build_from_token, generate,
};

/// Input to the transition function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Player swiped
    Swipe(Direction),
    /// Animation frame; drives the timed-mode countdown
    Frame,
    /// Delayed unfreeze, optionally moving to the next problem
    Resume { advance: bool },
    /// Hide a milestone marker (ignored if a newer one is showing)
    ClearMilestone(Milestone),
    /// Hide the speed-bonus flag set when `total_correct` had this value
    ClearSpeedBonus(u32),
}

/// Work for the driver
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Deliver `event` after `delay_ms`
    Schedule { delay_ms: f64, event: SessionEvent },
    /// Feedback for the difficulty adapter
    RecordAnswer { time_to_solve_ms: f64, correct: bool },
    /// Wrong-answer flash / shake
    Shake,
    /// Fixed set finished
    Completed(SessionSummary),
}

/// The game-loop controller: problem buffer, session state and phase
pub struct GameLoop {
    config: SessionConfig,
    mode: SessionMode,
    state: GameState,
    buffer: VecDeque<Problem>,
    phase: Phase,
    rng: Box<dyn RandomSource>,
    next_id: u32,
    label: Option<String>,
}

impl GameLoop {
    /// Start a session using the unpredictable ambient source for endless
    /// and speedrun buffers
    pub fn new(config: SessionConfig, level: u32, now: f64) -> Self {
        Self::with_random(config, level, now, Box::new(AmbientRandom::new()))
    }

    /// Start a session with an injected source (seeded sets ignore it)
    pub fn with_random(
        config: SessionConfig,
        level: u32,
        now: f64,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let mode = config.mode();
        let mut game = Self {
            config,
            mode,
            state: GameState::new(),
            buffer: VecDeque::new(),
            phase: Phase::Idle,
            rng,
            next_id: 1,
            label: None,
        };
        game.fill(level, now);
        game
    }

    fn fill(&mut self, level: u32, now: f64) {
        match self.mode.clone() {
            SessionMode::Daily(date) => {
                let daily = build_daily(date);
                self.label = Some(daily.label);
                self.buffer = daily.problems.into();
            }
            SessionMode::Challenge(token) => {
                self.buffer = build_from_token(&token).into();
            }
            SessionMode::Speedrun => {
                for _ in 0..SPEEDRUN_LENGTH {
                    let problem = self.next_problem(level);
                    self.buffer.push_back(problem);
                }
            }
            SessionMode::Rolling => {
                for _ in 0..BUFFER_CAPACITY {
                    let problem = self.next_problem(level);
                    self.buffer.push_back(problem);
                }
            }
        }
        log::info!(
            "Session start: {} ({}), {} problems buffered",
            self.mode,
            self.config.question_type,
            self.buffer.len()
        );
        if let Some(first) = self.buffer.front_mut() {
            first.start_time = Some(now);
            self.phase = Phase::Presenting;
        }
    }

    fn next_problem(&mut self, level: u32) -> Problem {
        let mut problem = generate(
            level,
            self.config.question_type,
            self.config.hard_mode,
            self.rng.as_mut(),
        );
        problem.id = ProblemId::Sequence(self.next_id);
        self.next_id += 1;
        problem
    }

    /// Apply one event. `level` is the adapter's current difficulty, used
    /// for refills.
    pub fn handle(&mut self, event: SessionEvent, now: f64, level: u32) -> Vec<Effect> {
        match event {
            SessionEvent::Swipe(direction) => self.on_swipe(direction, now, level),
            SessionEvent::Frame => self.on_frame(now),
            SessionEvent::Resume { advance } => self.on_resume(advance, now, level),
            SessionEvent::ClearMilestone(milestone) => {
                if self.state.milestone == Some(milestone) {
                    self.state.milestone = None;
                }
                Vec::new()
            }
            SessionEvent::ClearSpeedBonus(at_correct) => {
                if self.state.total_correct == at_correct {
                    self.state.speed_bonus = false;
                }
                Vec::new()
            }
        }
    }

    fn on_swipe(&mut self, direction: Direction, now: f64, level: u32) -> Vec<Effect> {
        if self.state.frozen || self.phase != Phase::Presenting {
            return Vec::new();
        }
        let Some(current) = self.buffer.front() else {
            return Vec::new();
        };
        let time_to_solve = (now - current.start_time.unwrap_or(now)).max(0.0);

        match direction.option_index() {
            None => {
                log::debug!("Skipped {}", current.expression);
                self.state.streak = 0;
                self.advance(now, level)
            }
            Some(index) if current.is_correct(index) => self.answer_correct(time_to_solve),
            Some(_) => self.answer_wrong(time_to_solve, false),
        }
    }

    fn on_frame(&mut self, now: f64) -> Vec<Effect> {
        if !self.config.timed_mode || self.state.frozen || self.phase != Phase::Presenting {
            return Vec::new();
        }
        match self.countdown_progress(now) {
            Some(progress) if progress >= 1.0 => {
                log::debug!("Timed out after {TIME_LIMIT_MS}ms");
                self.answer_wrong(TIME_LIMIT_MS, true)
            }
            _ => Vec::new(),
        }
    }

    fn on_resume(&mut self, advance: bool, now: f64, level: u32) -> Vec<Effect> {
        if self.phase != Phase::Frozen {
            return Vec::new();
        }
        self.state.frozen = false;
        if advance {
            self.advance(now, level)
        } else {
            // Retry gets a fresh countdown
            if let Some(current) = self.buffer.front_mut() {
                current.start_time = Some(now);
            }
            self.phase = Phase::Presenting;
            Vec::new()
        }
    }

    fn freeze(&mut self) {
        self.state.frozen = true;
        self.phase = Phase::Frozen;
    }

    fn answer_correct(&mut self, time_to_solve: f64) -> Vec<Effect> {
        self.freeze();

        let state = &mut self.state;
        let comeback = state.wrong_streak >= COMEBACK_MISSES;
        let fast = time_to_solve < SPEED_BONUS_THRESHOLD_MS;

        state.streak += 1;
        state.best_streak = state.best_streak.max(state.streak);
        state.total_correct += 1;
        state.total_answered += 1;
        state.wrong_streak = 0;
        state.record_history(true);
        state.score += GameState::points_for(state.streak, fast);
        state.companion = if state.streak >= STREAK_REACTION {
            Companion::Streak
        } else if comeback {
            Companion::Comeback
        } else {
            Companion::Success
        };
        log::debug!(
            "Correct in {time_to_solve:.0}ms, streak {} score {}",
            state.streak,
            state.score
        );

        let mut effects = vec![
            Effect::RecordAnswer {
                time_to_solve_ms: time_to_solve,
                correct: true,
            },
            Effect::Schedule {
                delay_ms: CORRECT_DELAY_MS,
                event: SessionEvent::Resume { advance: true },
            },
        ];
        if fast {
            state.speed_bonus = true;
            effects.push(Effect::Schedule {
                delay_ms: SPEED_BONUS_DISPLAY_MS,
                event: SessionEvent::ClearSpeedBonus(state.total_correct),
            });
        }
        if let Some(milestone) = Milestone::for_streak(state.streak) {
            state.milestone = Some(milestone);
            effects.push(Effect::Schedule {
                delay_ms: MILESTONE_DISPLAY_MS,
                event: SessionEvent::ClearMilestone(milestone),
            });
        }
        effects
    }

    /// A miss, either chosen or by timeout. The first chosen miss of a
    /// session is forgiven once; a timeout always counts.
    fn answer_wrong(&mut self, time_to_solve: f64, timed_out: bool) -> Vec<Effect> {
        self.freeze();

        if self.state.total_answered == 0 && !self.state.tutorial_used && !timed_out {
            self.state.tutorial_used = true;
            log::debug!("First-problem miss forgiven");
            return vec![
                Effect::Shake,
                Effect::Schedule {
                    delay_ms: TUTORIAL_DELAY_MS,
                    event: SessionEvent::Resume { advance: false },
                },
            ];
        }

        let state = &mut self.state;
        state.streak = 0;
        state.total_answered += 1;
        state.wrong_streak += 1;
        state.record_history(false);
        state.companion = Companion::Miss;
        log::debug!("Miss, {} in a row", state.wrong_streak);

        vec![
            Effect::Shake,
            Effect::RecordAnswer {
                time_to_solve_ms: time_to_solve,
                correct: false,
            },
            Effect::Schedule {
                delay_ms: WRONG_DELAY_MS,
                event: SessionEvent::Resume { advance: true },
            },
        ]
    }

    fn advance(&mut self, now: f64, level: u32) -> Vec<Effect> {
        self.phase = Phase::Advancing;
        self.buffer.pop_front();

        if !self.mode.is_fixed_set() && self.buffer.len() < BUFFER_CAPACITY {
            let problem = self.next_problem(level);
            self.buffer.push_back(problem);
        }

        if let Some(next) = self.buffer.front_mut() {
            next.start_time = Some(now);
            self.phase = Phase::Presenting;
            return Vec::new();
        }

        if self.state.total_answered == 0 {
            self.phase = Phase::Idle;
            return Vec::new();
        }
        self.phase = Phase::Complete;
        let summary = self.summary();
        log::info!(
            "Session complete: {} - score {}, {}/{} correct",
            summary.mode,
            summary.score,
            summary.total_correct,
            summary.total_answered
        );
        vec![Effect::Completed(summary)]
    }

    /// Countdown fraction for the current problem in timed mode
    pub fn countdown_progress(&self, now: f64) -> Option<f32> {
        if !self.config.timed_mode || self.phase != Phase::Presenting {
            return None;
        }
        let start = self.buffer.front()?.start_time?;
        Some(((now - start) / TIME_LIMIT_MS).clamp(0.0, 1.0) as f32)
    }

    pub fn current(&self) -> Option<&Problem> {
        match self.phase {
            Phase::Complete | Phase::Idle => None,
            _ => self.buffer.front(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mode(&self) -> &SessionMode {
        &self.mode
    }

    /// Daily label, when playing a daily set
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn buffer_len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Complete
    }

    pub fn summary(&self) -> SessionSummary {
        self.state.summary(self.mode.key(self.config.question_type))
    }
}
