//! Per-mode rule derivation
//!
//! `derive_rules` is a pure function of the selected mode and the player's
//! preferences. The match controller re-derives rules at every round start,
//! so preference changes made between rounds apply to the next round.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_ROUND_SECS, DEFAULT_TIME_ATTACK_SECS, SUDDEN_DEATH_SECS};
use crate::lerp;

/// Game mode, fixed for the lifetime of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameMode {
    #[default]
    Duel,
    SoloSurvival,
    TimeAttackSolo,
    TimeAttackDuel,
    SuddenDeath,
}

impl GameMode {
    pub const ALL: [GameMode; 5] = [
        GameMode::Duel,
        GameMode::SoloSurvival,
        GameMode::TimeAttackSolo,
        GameMode::TimeAttackDuel,
        GameMode::SuddenDeath,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Duel => "Duel",
            GameMode::SoloSurvival => "Solo Survival",
            GameMode::TimeAttackSolo => "Time Attack",
            GameMode::TimeAttackDuel => "Time Attack Duel",
            GameMode::SuddenDeath => "Sudden Death",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "duel" => Some(GameMode::Duel),
            "solo" | "survival" | "solo-survival" => Some(GameMode::SoloSurvival),
            "time-attack" | "timeattack" | "time-attack-solo" => Some(GameMode::TimeAttackSolo),
            "time-attack-duel" => Some(GameMode::TimeAttackDuel),
            "sudden-death" | "suddendeath" => Some(GameMode::SuddenDeath),
            _ => None,
        }
    }

    /// Modes with a right-side rocket
    pub fn is_two_rocket(&self) -> bool {
        matches!(
            self,
            GameMode::Duel | GameMode::TimeAttackDuel | GameMode::SuddenDeath
        )
    }

    /// Modes that spawn scoring gates
    pub fn is_time_attack(&self) -> bool {
        matches!(self, GameMode::TimeAttackSolo | GameMode::TimeAttackDuel)
    }
}

/// How a round is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinBy {
    SurviveLast,
    ScoreMost,
    TimeLongest,
}

/// Series format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Series {
    SingleRound,
    /// Best of n rounds (n odd)
    BestOf(u8),
}

impl Series {
    /// Round wins needed to take the series (integer majority), if this is a series
    pub fn wins_needed(&self) -> Option<u32> {
        match *self {
            Series::SingleRound => None,
            Series::BestOf(n) => Some(n as u32 / 2 + 1),
        }
    }
}

/// Point values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringRules {
    /// Awarded for flying through a gate
    pub gate_score: i32,
    /// Deducted on elimination (score modes only)
    pub collision_penalty: i32,
    /// Carried for future gate streaks; no streak logic reads it yet
    pub bonus_on_streak: i32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            gate_score: 1,
            collision_penalty: 0,
            bonus_on_streak: 0,
        }
    }
}

/// Obstacle spawn cadence over round progress
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnCurve {
    /// Seconds between spawns at progress 0
    pub start_interval: f32,
    /// Seconds between spawns at progress 1
    pub end_interval: f32,
    /// Maximum live obstacles
    pub max_simultaneous: usize,
}

impl SpawnCurve {
    pub const fn new(start_interval: f32, end_interval: f32, max_simultaneous: usize) -> Self {
        Self {
            start_interval,
            end_interval,
            max_simultaneous,
        }
    }

    /// Spawn interval at the given round progress (clamped to [0, 1])
    pub fn interval(&self, progress: f32) -> f32 {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        lerp(self.start_interval, self.end_interval, t)
    }
}

/// Immutable rules for one round, derived from mode + preferences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeRules {
    pub mode: GameMode,
    pub win_by: WinBy,
    pub series: Series,
    /// Round countdown; `None` means untimed
    pub round_duration_secs: Option<u32>,
    /// Any qualifying contact eliminates immediately
    pub one_hit: bool,
    /// Carried but inert: every qualifying contact eliminates regardless
    pub lives_per_player: u8,
    pub scoring: ScoringRules,
    pub spawn: SpawnCurve,
    pub bot_enabled: bool,
    pub allow_ties: bool,
}

impl ModeRules {
    /// Enable the bot opponent (two-rocket modes only)
    pub fn with_bot(mut self, enabled: bool) -> Self {
        self.bot_enabled = enabled && self.mode.is_two_rocket();
        self
    }
}

/// Derive the rules for a mode.
///
/// Duration overrides must already be clamped by the caller
/// (see [`crate::Settings`]); they are not re-clamped here.
pub fn derive_rules(
    mode: GameMode,
    one_hit_preference: bool,
    round_duration_override: Option<u32>,
    time_attack_duration_override: Option<u32>,
) -> ModeRules {
    let round_secs = round_duration_override.unwrap_or(DEFAULT_ROUND_SECS);
    let time_attack_secs = time_attack_duration_override.unwrap_or(DEFAULT_TIME_ATTACK_SECS);

    let (win_by, series, round_duration_secs, spawn, allow_ties) = match mode {
        GameMode::Duel => (
            WinBy::SurviveLast,
            Series::BestOf(3),
            Some(round_secs),
            SpawnCurve::new(0.9, 0.6, 10),
            true,
        ),
        GameMode::SoloSurvival => (
            WinBy::TimeLongest,
            Series::SingleRound,
            None,
            SpawnCurve::new(1.2, 0.7, 11),
            false,
        ),
        GameMode::TimeAttackSolo => (
            WinBy::ScoreMost,
            Series::SingleRound,
            Some(time_attack_secs),
            SpawnCurve::new(1.0, 1.0, 9),
            false,
        ),
        GameMode::TimeAttackDuel => (
            WinBy::ScoreMost,
            Series::BestOf(3),
            Some(time_attack_secs),
            SpawnCurve::new(1.0, 1.0, 9),
            true,
        ),
        GameMode::SuddenDeath => (
            WinBy::SurviveLast,
            Series::BestOf(5),
            Some(SUDDEN_DEATH_SECS),
            SpawnCurve::new(0.8, 0.8, 10),
            true,
        ),
    };

    // Sudden Death ignores the global preference
    let one_hit = mode == GameMode::SuddenDeath || one_hit_preference;

    ModeRules {
        mode,
        win_by,
        series,
        round_duration_secs,
        one_hit,
        lives_per_player: if one_hit { 1 } else { 3 },
        scoring: ScoringRules::default(),
        spawn,
        bot_enabled: false,
        allow_ties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rules_table() {
        let duel = derive_rules(GameMode::Duel, false, None, None);
        assert_eq!(duel.win_by, WinBy::SurviveLast);
        assert_eq!(duel.series, Series::BestOf(3));
        assert_eq!(duel.round_duration_secs, Some(60));
        assert_eq!(duel.spawn, SpawnCurve::new(0.9, 0.6, 10));

        let solo = derive_rules(GameMode::SoloSurvival, false, Some(90), Some(90));
        assert_eq!(solo.win_by, WinBy::TimeLongest);
        assert_eq!(solo.series, Series::SingleRound);
        assert_eq!(solo.round_duration_secs, None);
        assert_eq!(solo.spawn.max_simultaneous, 11);

        let ta = derive_rules(GameMode::TimeAttackSolo, false, Some(40), Some(120));
        assert_eq!(ta.win_by, WinBy::ScoreMost);
        assert_eq!(ta.round_duration_secs, Some(120));
        assert_eq!(ta.scoring.gate_score, 1);

        let ta_duel = derive_rules(GameMode::TimeAttackDuel, false, None, Some(45));
        assert_eq!(ta_duel.series, Series::BestOf(3));
        assert_eq!(ta_duel.round_duration_secs, Some(45));

        let sd = derive_rules(GameMode::SuddenDeath, false, Some(120), None);
        assert_eq!(sd.series, Series::BestOf(5));
        assert_eq!(sd.round_duration_secs, Some(20));
    }

    #[test]
    fn test_round_override_applies_to_duel_only() {
        let duel = derive_rules(GameMode::Duel, false, Some(90), Some(150));
        assert_eq!(duel.round_duration_secs, Some(90));
        let ta = derive_rules(GameMode::TimeAttackDuel, false, Some(90), None);
        assert_eq!(ta.round_duration_secs, Some(60));
    }

    #[test]
    fn test_sudden_death_always_one_hit() {
        assert!(derive_rules(GameMode::SuddenDeath, false, None, None).one_hit);
        assert!(derive_rules(GameMode::SuddenDeath, true, None, None).one_hit);
    }

    #[test]
    fn test_other_modes_honor_one_hit_preference() {
        for mode in GameMode::ALL {
            if mode == GameMode::SuddenDeath {
                continue;
            }
            assert!(!derive_rules(mode, false, None, None).one_hit);
            assert!(derive_rules(mode, true, None, None).one_hit);
        }
    }

    #[test]
    fn test_wins_needed() {
        assert_eq!(Series::SingleRound.wins_needed(), None);
        assert_eq!(Series::BestOf(3).wins_needed(), Some(2));
        assert_eq!(Series::BestOf(5).wins_needed(), Some(3));
    }

    #[test]
    fn test_spawn_curve_endpoints() {
        let curve = SpawnCurve::new(0.9, 0.6, 10);
        assert_eq!(curve.interval(0.0), 0.9);
        assert_eq!(curve.interval(1.0), 0.6);
        assert_eq!(curve.interval(-3.0), 0.9);
        assert_eq!(curve.interval(7.5), 0.6);
        assert!((curve.interval(0.5) - 0.75).abs() < 1e-6);
        assert_eq!(curve.interval(f32::NAN), 0.9);
    }

    #[test]
    fn test_with_bot_ignored_for_solo_modes() {
        let solo = derive_rules(GameMode::SoloSurvival, false, None, None).with_bot(true);
        assert!(!solo.bot_enabled);
        let duel = derive_rules(GameMode::Duel, false, None, None).with_bot(true);
        assert!(duel.bot_enabled);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(GameMode::from_str("DUEL"), Some(GameMode::Duel));
        assert_eq!(
            GameMode::from_str("sudden-death"),
            Some(GameMode::SuddenDeath)
        );
        assert_eq!(GameMode::from_str("chess"), None);
    }

    fn any_mode() -> impl Strategy<Value = GameMode> {
        (0usize..GameMode::ALL.len()).prop_map(|i| GameMode::ALL[i])
    }

    proptest! {
        #[test]
        fn derive_rules_is_deterministic(
            mode in any_mode(),
            one_hit in any::<bool>(),
            round in proptest::option::of(20u32..=180),
            time_attack in proptest::option::of(30u32..=180),
        ) {
            let a = derive_rules(mode, one_hit, round, time_attack);
            let b = derive_rules(mode, one_hit, round, time_attack);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn spawn_interval_stays_between_endpoints(
            start in 0.1f32..3.0,
            end in 0.1f32..3.0,
            p in -2.0f32..3.0,
        ) {
            let curve = SpawnCurve::new(start, end, 10);
            let v = curve.interval(p);
            let (lo, hi) = if start < end { (start, end) } else { (end, start) };
            prop_assert!(v >= lo - 1e-5 && v <= hi + 1e-5);
        }

        #[test]
        fn spawn_interval_is_monotonic(
            start in 0.1f32..3.0,
            end in 0.1f32..3.0,
            a in 0.0f32..1.0,
            b in 0.0f32..1.0,
        ) {
            let curve = SpawnCurve::new(start, end, 10);
            let (p, q) = if a <= b { (a, b) } else { (b, a) };
            let (vp, vq) = (curve.interval(p), curve.interval(q));
            if end <= start {
                prop_assert!(vq <= vp + 1e-5);
            } else {
                prop_assert!(vq >= vp - 1e-5);
            }
        }
    }
}
