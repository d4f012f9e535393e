//! Session state and configuration
//!
//! `GameState` is owned by [`GameLoop`](super::GameLoop) and only changes
//! through its transition function.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::generator::{ParseError, QuestionType};

/// Swipe direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Up,
    Right,
    /// Reserved for skip
    Down,
}

impl Direction {
    /// Option picked by this swipe (`None` = skip)
    pub fn option_index(self) -> Option<usize> {
        match self {
            Direction::Left => Some(0),
            Direction::Up => Some(1),
            Direction::Right => Some(2),
            Direction::Down => None,
        }
    }

    /// Swipe that picks option `index`
    pub fn for_option(index: usize) -> Option<Self> {
        match index {
            0 => Some(Direction::Left),
            1 => Some(Direction::Up),
            2 => Some(Direction::Right),
            _ => None,
        }
    }

    /// Keyboard mapping: arrows spelled out, WASD, or 1/2/3 + `s` for skip
    pub fn from_key(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" | "a" | "1" => Some(Direction::Left),
            "up" | "w" | "2" => Some(Direction::Up),
            "right" | "d" | "3" => Some(Direction::Right),
            "down" | "s" | "skip" => Some(Direction::Down),
            _ => None,
        }
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| ParseError::UnknownDirection(s.to_string()))
    }
}

/// Companion character mood after an answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Companion {
    #[default]
    Idle,
    Success,
    /// Long run of correct answers
    Streak,
    /// Correct after several misses
    Comeback,
    Miss,
}

/// Streak milestone marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    Five,
    Ten,
    Twenty,
    Fifty,
}

impl Milestone {
    pub fn for_streak(streak: u32) -> Option<Self> {
        match streak {
            5 => Some(Milestone::Five),
            10 => Some(Milestone::Ten),
            20 => Some(Milestone::Twenty),
            50 => Some(Milestone::Fifty),
            _ => None,
        }
    }

    pub fn streak(&self) -> u32 {
        match self {
            Milestone::Five => 5,
            Milestone::Ten => 10,
            Milestone::Twenty => 20,
            Milestone::Fifty => 50,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Milestone::Five => "🔥",
            Milestone::Ten => "⚡",
            Milestone::Twenty => "🌟",
            Milestone::Fifty => "👑",
        }
    }
}

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// No problem to show
    Idle,
    /// Current problem awaiting input
    Presenting,
    /// Input ignored while feedback settles
    Frozen,
    /// Buffer shifting to the next problem
    Advancing,
    /// Fixed set finished after at least one answer
    Complete,
}

/// How problems are supplied for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionMode {
    /// Endless buffer, refilled one problem at a time
    Rolling,
    /// Seeded set for a calendar day
    Daily(NaiveDate),
    /// Seeded set from a shared link token
    Challenge(String),
    /// Fixed unseeded set
    Speedrun,
}

impl SessionMode {
    pub fn is_fixed_set(&self) -> bool {
        !matches!(self, SessionMode::Rolling)
    }

    /// Key used by the records table
    pub fn key(&self, question_type: QuestionType) -> String {
        match self {
            SessionMode::Rolling => question_type.as_str().to_string(),
            SessionMode::Daily(_) => "daily".to_string(),
            SessionMode::Challenge(_) => "challenge".to_string(),
            SessionMode::Speedrun => format!("speedrun-{question_type}"),
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionMode::Rolling => f.write_str("endless"),
            SessionMode::Daily(date) => write!(f, "daily {date}"),
            SessionMode::Challenge(token) => write!(f, "challenge {token}"),
            SessionMode::Speedrun => f.write_str("speedrun"),
        }
    }
}

/// Per-session options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub question_type: QuestionType,
    pub hard_mode: bool,
    pub timed_mode: bool,
    /// Play a fixed speedrun set instead of an endless buffer
    pub speedrun: bool,
    /// Token for `challenge` sessions; the caller supplies a valid one
    pub challenge_token: Option<String>,
    /// Player's local calendar day, used by `daily`
    pub date: NaiveDate,
}

impl SessionConfig {
    pub fn new(question_type: QuestionType, date: NaiveDate) -> Self {
        Self {
            question_type,
            hard_mode: false,
            timed_mode: false,
            speedrun: false,
            challenge_token: None,
            date,
        }
    }

    pub fn mode(&self) -> SessionMode {
        match self.question_type {
            QuestionType::Daily => SessionMode::Daily(self.date),
            QuestionType::Challenge => {
                SessionMode::Challenge(self.challenge_token.clone().unwrap_or_default())
            }
            _ if self.speedrun => SessionMode::Speedrun,
            _ => SessionMode::Rolling,
        }
    }
}

/// Final numbers handed to whoever records a finished session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Records key (see [`SessionMode::key`])
    pub mode: String,
    pub score: u64,
    pub total_correct: u32,
    pub total_answered: u32,
    pub best_streak: u32,
    pub history: Vec<bool>,
}

impl SessionSummary {
    pub fn accuracy(&self) -> f64 {
        if self.total_answered == 0 {
            0.0
        } else {
            self.total_correct as f64 / self.total_answered as f64
        }
    }
}

/// Counters and flags for the current session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub score: u64,
    /// Consecutive correct answers since the last miss or skip
    pub streak: u32,
    pub best_streak: u32,
    pub total_correct: u32,
    pub total_answered: u32,
    /// Most recent answers, oldest first, capped at `HISTORY_WINDOW`
    pub answer_history: VecDeque<bool>,
    /// Input gate while feedback settles
    pub frozen: bool,
    /// Consecutive misses
    pub wrong_streak: u32,
    pub companion: Companion,
    /// First-problem retry already spent
    pub tutorial_used: bool,
    /// Transient display flags, cleared by scheduled events
    pub milestone: Option<Milestone>,
    pub speed_bonus: bool,
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the history window, dropping the oldest entry when full
    pub fn record_history(&mut self, correct: bool) {
        self.answer_history.push_back(correct);
        while self.answer_history.len() > HISTORY_WINDOW {
            self.answer_history.pop_front();
        }
    }

    /// Symbol for the milestone marker currently showing
    pub fn milestone_symbol(&self) -> Option<&'static str> {
        self.milestone.map(|m| m.symbol())
    }

    /// Points for a correct answer at the current streak
    pub fn points_for(streak: u32, fast: bool) -> u64 {
        let streak_bonus = (streak / STREAK_TIER) as u64 * STREAK_BONUS_POINTS;
        let speed = if fast { SPEED_BONUS_POINTS } else { 0 };
        BASE_POINTS + streak_bonus + speed
    }

    pub fn summary(&self, mode: String) -> SessionSummary {
        SessionSummary {
            mode,
            score: self.score,
            total_correct: self.total_correct,
            total_answered: self.total_answered,
            best_streak: self.best_streak,
            history: self.answer_history.iter().copied().collect(),
        }
    }
}
