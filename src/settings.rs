//! Player preferences
//!
//! Persisted separately from records in LocalStorage.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::generator::QuestionType;
use crate::session::SessionConfig;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Question type for endless play
    pub question_type: QuestionType,
    /// Wide fixed operand ranges instead of tiered ones
    pub hard_mode: bool,
    /// Per-question countdown
    pub timed_mode: bool,
    /// Play fixed speedrun sets instead of an endless buffer
    #[serde(default)]
    pub speedrun: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            question_type: QuestionType::MixBasic,
            hard_mode: false,
            timed_mode: false,
            speedrun: false,
        }
    }
}

impl Settings {
    /// Session options for `date`, optionally joining a shared challenge.
    /// A token switches the session to challenge mode.
    pub fn session_config(
        &self,
        date: NaiveDate,
        challenge_token: Option<String>,
    ) -> SessionConfig {
        let question_type = if challenge_token.is_some() {
            QuestionType::Challenge
        } else {
            self.question_type
        };
        SessionConfig {
            question_type,
            hard_mode: self.hard_mode,
            timed_mode: self.timed_mode,
            speedrun: self.speedrun,
            challenge_token,
            date,
        }
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mathswipe_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Discarding unreadable settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            question_type: QuestionType::Fraction,
            hard_mode: true,
            timed_mode: true,
            speedrun: false,
        };
        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"fraction\""));
        let back: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_missing_speedrun_defaults() {
        let json = r#"{"question_type":"add","hard_mode":false,"timed_mode":true}"#;
        let settings: Settings = serde_json::from_str(json).unwrap();
        assert!(!settings.speedrun);
        assert!(settings.timed_mode);
    }

    #[test]
    fn test_session_config() {
        let settings = Settings {
            question_type: QuestionType::Decimal,
            timed_mode: true,
            ..Default::default()
        };
        let config = settings.session_config(day(), None);
        assert_eq!(config.question_type, QuestionType::Decimal);
        assert!(config.timed_mode);

        let config = settings.session_config(day(), Some("abc123".into()));
        assert_eq!(config.question_type, QuestionType::Challenge);
        assert_eq!(config.challenge_token.as_deref(), Some("abc123"));
    }
}
