//! Per-difficulty best-score registry
//!
//! Display-only bookkeeping: the sim never reads it. Serialized with
//! `serde_json` so a host can persist it wherever it likes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::Difficulty;

/// One best entry per difficulty
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    best: BTreeMap<Difficulty, u64>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true when this is a new best for the
    /// difficulty.
    pub fn record(&mut self, difficulty: Difficulty, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        let best = self.best.entry(difficulty).or_insert(0);
        if score > *best {
            *best = score;
            log::info!("new best on {}: {score}", difficulty.as_str());
            return true;
        }
        false
    }

    pub fn best(&self, difficulty: Difficulty) -> Option<u64> {
        self.best.get(&difficulty).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
