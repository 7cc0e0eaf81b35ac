//! Game settings and preferences
//!
//! Read from the key-value store with documented defaults. Duration
//! preferences are clamped here, before they reach rule derivation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::consts::{
    DEFAULT_ROUND_SECS, DEFAULT_TIME_ATTACK_SECS, ROUND_SECS_RANGE, TIME_ATTACK_SECS_RANGE,
};
use crate::persistence::KeyValueStore;
use crate::sim::rules::{GameMode, ModeRules, derive_rules};

/// UI theme preference (stored only; the core never reads it)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "system" | "auto" => Some(Theme::System),
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }
}

/// Storage keys
pub mod keys {
    pub const THEME: &str = "theme";
    pub const HAPTICS_ENABLED: &str = "haptics_enabled";
    pub const ONE_HIT_KO: &str = "one_hit_ko";
    pub const ROUND_DURATION_SECS: &str = "round_duration_secs";
    pub const TIME_ATTACK_DURATION_SECS: &str = "time_attack_duration_secs";
    pub const VS_BOT: &str = "vs_bot";
}

/// Player preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub theme: Theme,
    /// Haptic/audio feedback on
    pub haptics_enabled: bool,
    /// Global one-hit-KO preference (Sudden Death forces it regardless)
    pub one_hit_ko: bool,
    /// Duel round length, within `ROUND_SECS_RANGE`
    pub round_duration_secs: u32,
    /// Time attack round length, within `TIME_ATTACK_SECS_RANGE`
    pub time_attack_duration_secs: u32,
    /// Right rocket flown by the autopilot in two-rocket modes
    pub vs_bot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::System,
            haptics_enabled: true,
            one_hit_ko: false,
            round_duration_secs: DEFAULT_ROUND_SECS,
            time_attack_duration_secs: DEFAULT_TIME_ATTACK_SECS,
            vs_bot: false,
        }
    }
}

/// Clamp a round duration preference into range
pub fn clamp_round_duration(secs: i64) -> u32 {
    secs.clamp(ROUND_SECS_RANGE.0 as i64, ROUND_SECS_RANGE.1 as i64) as u32
}

/// Clamp a time attack duration preference into range
pub fn clamp_time_attack_duration(secs: i64) -> u32 {
    secs.clamp(
        TIME_ATTACK_SECS_RANGE.0 as i64,
        TIME_ATTACK_SECS_RANGE.1 as i64,
    ) as u32
}

impl Settings {
    /// Load settings, falling back to defaults for anything missing
    pub fn load(store: &dyn KeyValueStore) -> Self {
        let defaults = Self::default();
        Self {
            theme: store
                .get_string(keys::THEME)
                .and_then(|s| Theme::from_str(&s))
                .unwrap_or(defaults.theme),
            haptics_enabled: store
                .get_bool(keys::HAPTICS_ENABLED)
                .unwrap_or(defaults.haptics_enabled),
            one_hit_ko: store
                .get_bool(keys::ONE_HIT_KO)
                .unwrap_or(defaults.one_hit_ko),
            round_duration_secs: store
                .get_i64(keys::ROUND_DURATION_SECS)
                .map(clamp_round_duration)
                .unwrap_or(defaults.round_duration_secs),
            time_attack_duration_secs: store
                .get_i64(keys::TIME_ATTACK_DURATION_SECS)
                .map(clamp_time_attack_duration)
                .unwrap_or(defaults.time_attack_duration_secs),
            vs_bot: store.get_bool(keys::VS_BOT).unwrap_or(defaults.vs_bot),
        }
    }

    /// Write every preference back to the store
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store.set(keys::THEME, Value::from(self.theme.as_str()));
        store.set(keys::HAPTICS_ENABLED, Value::from(self.haptics_enabled));
        store.set(keys::ONE_HIT_KO, Value::from(self.one_hit_ko));
        store.set(
            keys::ROUND_DURATION_SECS,
            Value::from(self.round_duration_secs),
        );
        store.set(
            keys::TIME_ATTACK_DURATION_SECS,
            Value::from(self.time_attack_duration_secs),
        );
        store.set(keys::VS_BOT, Value::from(self.vs_bot));
        log::info!("Settings saved");
    }

    pub fn set_round_duration(&mut self, secs: i64) {
        self.round_duration_secs = clamp_round_duration(secs);
    }

    pub fn set_time_attack_duration(&mut self, secs: i64) {
        self.time_attack_duration_secs = clamp_time_attack_duration(secs);
    }

    /// Rules for a mode under these preferences
    pub fn rules_for(&self, mode: GameMode) -> ModeRules {
        derive_rules(
            mode,
            self.one_hit_ko,
            Some(self.round_duration_secs),
            Some(self.time_attack_duration_secs),
        )
        .with_bot(self.vs_bot)
    }
}
