//! Best-result table
//!
//! Persisted to LocalStorage, keeps the top 10 results per mode key
//! (`daily`, `challenge`, `speedrun-multiply`, ...).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::session::{SessionRecorder, SessionSummary};

/// Maximum number of results kept per mode
pub const MAX_RECORDS: usize = 10;

/// A single recorded result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub score: u64,
    pub total_correct: u32,
    pub total_answered: u32,
    pub best_streak: u32,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Results grouped by mode key, each list sorted by score descending
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionRecords {
    pub modes: BTreeMap<String, Vec<RecordEntry>>,
}

impl SessionRecords {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mathswipe_records";

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the table for `mode`
    pub fn qualifies(&self, mode: &str, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        match self.modes.get(mode) {
            Some(entries) if entries.len() >= MAX_RECORDS => {
                entries.last().map(|e| score > e.score).unwrap_or(true)
            }
            _ => true,
        }
    }

    /// Insert a finished session. Returns the rank achieved (1-indexed) or
    /// None if it didn't qualify.
    pub fn add(&mut self, summary: &SessionSummary, timestamp: f64) -> Option<usize> {
        if !self.qualifies(&summary.mode, summary.score) {
            return None;
        }

        let entry = RecordEntry {
            score: summary.score,
            total_correct: summary.total_correct,
            total_answered: summary.total_answered,
            best_streak: summary.best_streak,
            timestamp,
        };

        let entries = self.modes.entry(summary.mode.clone()).or_default();
        let pos = entries.iter().position(|e| entry.score > e.score);
        let rank = match pos {
            Some(i) => {
                entries.insert(i, entry);
                i + 1
            }
            None => {
                entries.push(entry);
                entries.len()
            }
        };
        entries.truncate(MAX_RECORDS);

        Some(rank)
    }

    /// Best score for a mode (if any)
    pub fn best(&self, mode: &str) -> Option<u64> {
        self.modes.get(mode)?.first().map(|e| e.score)
    }

    /// True only when `score` beats an existing best for `mode`; a first
    /// result (or a table that could not be loaded) is not a new best
    pub fn beats_best(&self, mode: &str, score: u64) -> bool {
        self.best(mode).is_some_and(|best| score > best)
    }

    pub fn is_empty(&self) -> bool {
        self.modes.values().all(Vec::is_empty)
    }

    /// Load records from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(records) = serde_json::from_str::<SessionRecords>(&json) {
                    log::info!("Loaded records for {} modes", records.modes.len());
                    return records;
                }
            }
        }

        log::info!("No records found, starting fresh");
        Self::new()
    }

    /// Save records to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Records saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

impl SessionRecorder for SessionRecords {
    fn record_session(&mut self, summary: &SessionSummary, timestamp: f64) {
        if let Some(rank) = self.add(summary, timestamp) {
            log::info!("New {} record, rank {rank}", summary.mode);
            self.save();
        }
    }
}
