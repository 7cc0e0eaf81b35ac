//! Personal best records
//!
//! Persisted through the key-value store. Records only move on strict
//! improvement.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::persistence::KeyValueStore;

/// Storage keys
pub mod keys {
    pub const BEST_SURVIVAL_SECS: &str = "best_survival_secs";
    pub const BEST_TIME_ATTACK_SCORE: &str = "best_time_attack_score";
}

/// Best survival time and best time attack score
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BestScores {
    /// Longest Solo Survival round (seconds)
    pub survival_secs: f64,
    /// Highest Time Attack score
    pub time_attack_score: u32,
}

impl BestScores {
    /// Load records, defaulting to zero
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let scores = Self {
            survival_secs: store
                .get_f64(keys::BEST_SURVIVAL_SECS)
                .filter(|s| s.is_finite() && *s >= 0.0)
                .unwrap_or(0.0),
            time_attack_score: store
                .get_i64(keys::BEST_TIME_ATTACK_SCORE)
                .and_then(|s| u32::try_from(s).ok())
                .unwrap_or(0),
        };
        log::info!(
            "Loaded records: survival {:.1}s, time attack {}",
            scores.survival_secs,
            scores.time_attack_score
        );
        scores
    }

    /// Record a survival time. Returns true (and persists) only if it beats the best.
    pub fn record_survival(&mut self, secs: f64, store: &mut dyn KeyValueStore) -> bool {
        if secs.is_nan() || secs <= self.survival_secs {
            return false;
        }
        self.survival_secs = secs;
        store.set(keys::BEST_SURVIVAL_SECS, Value::from(secs));
        log::info!("New best survival time: {:.2}s", secs);
        true
    }

    /// Record a time attack score. Returns true (and persists) only if it beats the best.
    pub fn record_time_attack(&mut self, score: u32, store: &mut dyn KeyValueStore) -> bool {
        if score <= self.time_attack_score {
            return false;
        }
        self.time_attack_score = score;
        store.set(keys::BEST_TIME_ATTACK_SCORE, Value::from(score));
        log::info!("New best time attack score: {}", score);
        true
    }
}
