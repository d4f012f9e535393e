//! Effect driver
//!
//! Runs [`GameLoop`] against a caller-supplied clock: scheduled events sit
//! in a timer queue until `advance_to` reaches their due time, answer
//! feedback goes to the [`DifficultyAdapter`], and completion is latched.
//! Every pending timer is dropped as a group on teardown or reconfigure.

use super::adapter::DifficultyAdapter;
use super::state::{Direction, SessionConfig, SessionSummary};
use super::step::{Effect, GameLoop, SessionEvent};
use crate::generator::RandomSource;

#[derive(Debug, Clone, Copy)]
struct Timer {
    due: f64,
    /// Insertion order, breaks ties between equal due times
    seq: u64,
    event: SessionEvent,
}

/// Owns a session, its adapter and its pending timers
pub struct SessionDriver<A: DifficultyAdapter> {
    game: GameLoop,
    adapter: A,
    timers: Vec<Timer>,
    next_seq: u64,
    summary: Option<SessionSummary>,
    active: bool,
}

impl<A: DifficultyAdapter> SessionDriver<A> {
    pub fn new(config: SessionConfig, adapter: A, now: f64) -> Self {
        let game = GameLoop::new(config, adapter.level(), now);
        Self::from_game(game, adapter)
    }

    pub fn with_random(
        config: SessionConfig,
        adapter: A,
        now: f64,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let game = GameLoop::with_random(config, adapter.level(), now, rng);
        Self::from_game(game, adapter)
    }

    fn from_game(game: GameLoop, adapter: A) -> Self {
        Self {
            game,
            adapter,
            timers: Vec::new(),
            next_seq: 0,
            summary: None,
            active: true,
        }
    }

    /// Player input at `now`. Due timers run first so a late swipe sees the
    /// state the player saw.
    pub fn swipe(&mut self, direction: Direction, now: f64) -> Vec<Effect> {
        let mut effects = self.advance_to(now);
        effects.extend(self.dispatch(SessionEvent::Swipe(direction), now));
        effects
    }

    /// Run every timer due at or before `now` (each at its own due time),
    /// then deliver one animation frame at `now`.
    pub fn advance_to(&mut self, now: f64) -> Vec<Effect> {
        let mut effects = Vec::new();
        while let Some(timer) = self.pop_due(now) {
            effects.extend(self.dispatch(timer.event, timer.due));
        }
        effects.extend(self.dispatch(SessionEvent::Frame, now));
        effects
    }

    fn pop_due(&mut self, now: f64) -> Option<Timer> {
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= now)
            .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
            .map(|(i, _)| i)?;
        Some(self.timers.remove(index))
    }

    /// Earliest pending timer
    pub fn next_due(&self) -> Option<f64> {
        self.timers.iter().map(|t| t.due).min_by(|a, b| a.total_cmp(b))
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    fn dispatch(&mut self, event: SessionEvent, now: f64) -> Vec<Effect> {
        if !self.active {
            return Vec::new();
        }
        let effects = self.game.handle(event, now, self.adapter.level());
        for effect in &effects {
            match effect {
                Effect::Schedule { delay_ms, event } => {
                    self.timers.push(Timer {
                        due: now + delay_ms,
                        seq: self.next_seq,
                        event: *event,
                    });
                    self.next_seq += 1;
                }
                Effect::RecordAnswer {
                    time_to_solve_ms,
                    correct,
                } => self.adapter.record_answer(*time_to_solve_ms, *correct),
                Effect::Shake => {}
                Effect::Completed(summary) => self.summary = Some(summary.clone()),
            }
        }
        effects
    }

    /// Drop every pending timer; returns how many were dropped
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.timers.len();
        self.timers.clear();
        dropped
    }

    /// Cancel everything and stop reacting to input or time
    pub fn teardown(&mut self) {
        let dropped = self.cancel_all();
        self.active = false;
        log::debug!("Session torn down, {dropped} timers canceled");
    }

    /// Replace the session (mode, type or hard-mode change)
    pub fn reconfigure(&mut self, config: SessionConfig, now: f64) {
        self.cancel_all();
        self.game = GameLoop::new(config, self.adapter.level(), now);
        self.summary = None;
        self.active = true;
    }

    /// Same as [`reconfigure`](Self::reconfigure) with an injected source
    pub fn reconfigure_with_random(
        &mut self,
        config: SessionConfig,
        now: f64,
        rng: Box<dyn RandomSource>,
    ) {
        self.cancel_all();
        self.game = GameLoop::with_random(config, self.adapter.level(), now, rng);
        self.summary = None;
        self.active = true;
    }

    pub fn game(&self) -> &GameLoop {
        &self.game
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True once a fixed set has finished
    pub fn is_complete(&self) -> bool {
        self.summary.is_some()
    }

    /// Final snapshot of a finished fixed set
    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }
}
