//! Browser bindings
//!
//! `WebSession` is what the page script talks to. It owns a driver, feeds
//! it wall-clock time and hands problems back as JSON.

use wasm_bindgen::prelude::*;

use super::{now_ms, today};
use crate::generator::QuestionType;
use crate::records::SessionRecords;
use crate::session::{Direction, Effect, SessionDriver, SessionRecorder, StepLevel};
use crate::settings::Settings;
use crate::share::{challenge_url, mint_token, share_card, token_from_url};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::error_1(&format!("Logger init failed: {e}").into());
    }
    log::info!("Mathswipe wasm module loaded");
}

/// Challenge token from the page URL, if it carries one
fn url_token() -> Option<String> {
    let search = web_sys::window()?.location().search().ok()?;
    match token_from_url(&search) {
        Ok(token) => Some(token),
        Err(e) => {
            if !search.is_empty() {
                log::debug!("No challenge in page URL: {e}");
            }
            None
        }
    }
}

#[wasm_bindgen]
pub struct WebSession {
    driver: SessionDriver<StepLevel>,
    settings: Settings,
    records: SessionRecords,
    token: Option<String>,
}

#[wasm_bindgen]
impl WebSession {
    /// Session from stored settings; joins the challenge in the URL if any
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebSession {
        let settings = Settings::load();
        let token = url_token();
        let config = settings.session_config(today(), token.clone());
        log::info!("Starting {} session", config.mode());
        WebSession {
            driver: SessionDriver::new(config, StepLevel::default(), now_ms()),
            settings,
            records: SessionRecords::load(),
            token,
        }
    }

    /// Change mode or options; persists the preferences and restarts
    pub fn configure(
        &mut self,
        question_type: &str,
        hard_mode: bool,
        timed_mode: bool,
        speedrun: bool,
    ) -> Result<(), JsError> {
        let question_type: QuestionType = question_type.parse()?;
        if question_type != QuestionType::Challenge {
            self.token = None;
        }
        self.settings = Settings {
            question_type,
            hard_mode,
            timed_mode,
            speedrun,
        };
        self.settings.save();
        self.restart();
        Ok(())
    }

    /// Start a new shared challenge; returns the link to send
    pub fn new_challenge(&mut self, base_url: &str) -> String {
        let token = mint_token(now_ms());
        self.token = Some(token.clone());
        self.restart();
        challenge_url(base_url, &token)
    }

    /// Rebuild the session with the current settings and token
    pub fn restart(&mut self) {
        let config = self.settings.session_config(today(), self.token.clone());
        log::info!("Restarting as {} session", config.mode());
        self.driver.reconfigure(config, now_ms());
    }

    /// Swipe by direction name (`left`, `up`, `right`, `down`). Returns true
    /// when the page should play the wrong-answer shake.
    pub fn swipe(&mut self, direction: &str) -> Result<bool, JsError> {
        let direction: Direction = direction.parse()?;
        let effects = self.driver.swipe(direction, now_ms());
        Ok(self.apply(&effects))
    }

    /// Animation frame: fires due timers and the timed-mode countdown
    pub fn frame(&mut self) -> bool {
        let effects = self.driver.advance_to(now_ms());
        self.apply(&effects)
    }

    fn apply(&mut self, effects: &[Effect]) -> bool {
        let mut shake = false;
        for effect in effects {
            match effect {
                Effect::Shake => shake = true,
                Effect::Completed(summary) => {
                    self.records.record_session(summary, now_ms());
                }
                _ => {}
            }
        }
        shake
    }

    /// Current problem as JSON, or undefined between sets
    pub fn current_problem(&self) -> Option<String> {
        let problem = self.driver.game().current()?;
        serde_json::to_string(problem).ok()
    }

    /// Session counters as JSON
    pub fn state(&self) -> Option<String> {
        serde_json::to_string(self.driver.game().state()).ok()
    }

    /// Timed-mode countdown fraction (0 when untimed)
    pub fn countdown(&self) -> f32 {
        self.driver.game().countdown_progress(now_ms()).unwrap_or(0.0)
    }

    pub fn score(&self) -> f64 {
        self.driver.game().state().score as f64
    }

    /// Milestone symbol to flash, if one is showing
    pub fn milestone(&self) -> Option<String> {
        self.driver
            .game()
            .state()
            .milestone_symbol()
            .map(str::to_string)
    }

    pub fn speed_bonus(&self) -> bool {
        self.driver.game().state().speed_bonus
    }

    pub fn is_frozen(&self) -> bool {
        self.driver.game().state().frozen
    }

    pub fn is_complete(&self) -> bool {
        self.driver.is_complete()
    }

    /// Final summary as JSON once a fixed set has finished
    pub fn summary(&self) -> Option<String> {
        serde_json::to_string(self.driver.summary()?).ok()
    }

    /// Share text for a finished set
    pub fn share_card(&self) -> Option<String> {
        let summary = self.driver.summary()?;
        let title = self
            .driver
            .game()
            .label()
            .map(|l| format!("Daily {l}"))
            .unwrap_or_else(|| self.driver.game().mode().to_string());
        Some(share_card(&title, summary))
    }

    /// Best recorded score for the current mode
    pub fn best_score(&self) -> Option<f64> {
        let key = self.driver.summary().map(|s| s.mode.clone()).unwrap_or_else(|| {
            let game = self.driver.game();
            game.mode().key(game.config().question_type)
        });
        self.records.best(&key).map(|s| s as f64)
    }

    /// Stop timers, e.g. when the page is hidden
    pub fn teardown(&mut self) {
        self.driver.teardown();
    }
}

impl Default for WebSession {
    fn default() -> Self {
        Self::new()
    }
}
