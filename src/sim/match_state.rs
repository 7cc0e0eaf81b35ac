//! Match/round lifecycle state machine
//!
//! `MatchController` is the single owner of `MatchState`. Every operation is
//! guarded by the current phase and is a silent no-op when its precondition
//! does not hold. Each operation returns a `MatchSnapshot`, and the same
//! snapshot is pushed to every subscriber when state changes.

use std::sync::mpsc::{Receiver, SyncSender, TrySendError, sync_channel};

use serde::{Deserialize, Serialize};

use super::clock::{ClockTick, RoundClock};
use super::rules::{GameMode, ModeRules, Series, WinBy};
use crate::consts::ROUND_TICK_SECS;
use crate::cosmetics::{PaintPair, PaintSelector};
use crate::feedback::Feedback;
use crate::highscores::BestScores;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MatchPhase {
    /// No round started yet
    #[default]
    Idle,
    /// Active gameplay: the only phase that accepts physics, input and spawns
    Playing,
    Paused,
    /// Round over, waiting for next round or rematch
    Finished,
}

/// Rocket side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(&self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Who took a round (or the match)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundWinner {
    Left,
    Right,
    Solo,
    Tie,
}

impl From<Side> for RoundWinner {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => RoundWinner::Left,
            Side::Right => RoundWinner::Right,
        }
    }
}

/// Published match state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchState {
    pub mode: GameMode,
    pub rules: ModeRules,
    pub phase: MatchPhase,
    pub round_index: u32,
    pub left_wins: u32,
    pub right_wins: u32,
    /// Seconds since round start, pauses excluded
    pub round_time_elapsed: f64,
    /// Countdown; `None` for untimed rounds
    pub round_time_remaining: Option<f64>,
    /// Countdown progress in [0, 1]; `None` for untimed rounds
    pub round_progress: Option<f64>,
    pub left_score: u32,
    pub right_score: u32,
    pub last_round_winner: Option<RoundWinner>,
    pub best: BestScores,
    pub paints: PaintPair,
}

impl MatchState {
    fn new(rules: ModeRules, best: BestScores) -> Self {
        Self {
            mode: rules.mode,
            rules,
            phase: MatchPhase::Idle,
            round_index: 0,
            left_wins: 0,
            right_wins: 0,
            round_time_elapsed: 0.0,
            round_time_remaining: None,
            round_progress: None,
            left_score: 0,
            right_score: 0,
            last_round_winner: None,
            best,
            paints: PaintPair::default(),
        }
    }

    /// Whether the series has been decided
    pub fn series_complete(&self) -> bool {
        match self.rules.series.wins_needed() {
            None => self.phase == MatchPhase::Finished,
            Some(needed) => self.left_wins >= needed || self.right_wins >= needed,
        }
    }

    /// Match winner, once the series is complete
    pub fn match_winner(&self) -> Option<RoundWinner> {
        if !self.series_complete() {
            return None;
        }
        match self.rules.series {
            Series::SingleRound => self.last_round_winner,
            Series::BestOf(_) => Some(match self.left_wins.cmp(&self.right_wins) {
                std::cmp::Ordering::Greater => RoundWinner::Left,
                std::cmp::Ordering::Less => RoundWinner::Right,
                std::cmp::Ordering::Equal => RoundWinner::Tie,
            }),
        }
    }

    pub fn score(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.left_score,
            Side::Right => self.right_score,
        }
    }
}

/// State handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    #[serde(flatten)]
    pub state: MatchState,
    pub series_complete: bool,
    pub match_winner: Option<RoundWinner>,
}

/// Snapshots a subscriber may fall behind by before new ones are dropped
pub const SUBSCRIBER_BACKLOG: usize = 256;

/// Owner of the match lifecycle
pub struct MatchController {
    state: MatchState,
    /// Created by the first round start
    clock: Option<RoundClock>,
    /// Bumped on every round start so observers can reset per-round state
    round_serial: u64,
    store: Box<dyn KeyValueStore>,
    feedback: Box<dyn Feedback>,
    paints: Box<dyn PaintSelector>,
    subscribers: Vec<SyncSender<MatchSnapshot>>,
}

impl MatchController {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        feedback: Box<dyn Feedback>,
        paints: Box<dyn PaintSelector>,
    ) -> Self {
        let settings = Settings::load(store.as_ref());
        let best = BestScores::load(store.as_ref());
        let rules = settings.rules_for(GameMode::default());
        Self {
            state: MatchState::new(rules, best),
            clock: None,
            round_serial: 0,
            store,
            feedback,
            paints,
            subscribers: Vec::new(),
        }
    }

    pub fn state(&self) -> &MatchState {
        &self.state
    }

    pub fn phase(&self) -> MatchPhase {
        self.state.phase
    }

    pub fn rules(&self) -> &ModeRules {
        &self.state.rules
    }

    pub fn round_serial(&self) -> u64 {
        self.round_serial
    }

    /// Whether the round clock exists and is currently ticking
    pub fn clock_running(&self) -> bool {
        self.clock.as_ref().is_some_and(RoundClock::is_running)
    }

    pub fn has_clock(&self) -> bool {
        self.clock.is_some()
    }

    pub fn feedback_mut(&mut self) -> &mut dyn Feedback {
        self.feedback.as_mut()
    }

    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    pub fn store_mut(&mut self) -> &mut dyn KeyValueStore {
        self.store.as_mut()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        MatchSnapshot {
            state: self.state.clone(),
            series_complete: self.state.series_complete(),
            match_winner: self.state.match_winner(),
        }
    }

    /// Receive a snapshot after every state change.
    ///
    /// At most `SUBSCRIBER_BACKLOG` snapshots queue up; once the receiver is
    /// that far behind, newer snapshots are dropped until it drains. Drop the
    /// receiver to unsubscribe.
    pub fn subscribe(&mut self) -> Receiver<MatchSnapshot> {
        let (tx, rx) = sync_channel(SUBSCRIBER_BACKLOG);
        self.subscribers.push(tx);
        rx
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn publish(&mut self) -> MatchSnapshot {
        let snapshot = self.snapshot();
        self.subscribers.retain(|tx| match tx.try_send(snapshot.clone()) {
            Ok(()) | Err(TrySendError::Full(_)) => true,
            Err(TrySendError::Disconnected(_)) => false,
        });
        snapshot
    }

    /// Start a fresh series in `mode`
    pub fn start_match(&mut self, mode: GameMode) -> MatchSnapshot {
        log::info!("Starting {} match", mode.as_str());
        self.state.mode = mode;
        self.state.left_wins = 0;
        self.state.right_wins = 0;
        self.state.round_index = 0;
        self.state.last_round_winner = None;
        self.state.rules = Settings::load(self.store.as_ref()).rules_for(mode);
        self.state.paints = self.paints.pick(mode);
        self.start_round()
    }

    /// Start (or restart) a round. Legal from any phase.
    pub fn start_round(&mut self) -> MatchSnapshot {
        if let Some(clock) = &mut self.clock {
            clock.stop();
        }

        // Pick up preference changes made between rounds
        let settings = Settings::load(self.store.as_ref());
        self.feedback.set_enabled(settings.haptics_enabled);
        self.state.rules = settings.rules_for(self.state.mode);

        let mut clock = RoundClock::new(ROUND_TICK_SECS, self.state.rules.round_duration_secs);
        self.state.left_score = 0;
        self.state.right_score = 0;
        self.state.round_time_elapsed = clock.elapsed();
        self.state.round_time_remaining = clock.remaining();
        self.state.round_progress = clock.progress();
        self.state.phase = MatchPhase::Playing;
        clock.start();
        self.clock = Some(clock);
        self.round_serial += 1;

        log::info!(
            "Round {} started ({}, {})",
            self.state.round_index + 1,
            self.state.mode.as_str(),
            match self.state.rules.round_duration_secs {
                Some(secs) => format!("{secs}s"),
                None => "untimed".to_string(),
            }
        );
        self.publish()
    }

    pub fn pause_round(&mut self) -> MatchSnapshot {
        if self.state.phase != MatchPhase::Playing {
            return self.snapshot();
        }
        if let Some(clock) = &mut self.clock {
            clock.stop();
        }
        self.state.phase = MatchPhase::Paused;
        log::debug!("Round paused at {:.2}s", self.state.round_time_elapsed);
        self.publish()
    }

    pub fn resume_round(&mut self) -> MatchSnapshot {
        if self.state.phase != MatchPhase::Paused {
            return self.snapshot();
        }
        if let Some(clock) = &mut self.clock {
            clock.start();
        }
        self.state.phase = MatchPhase::Playing;
        log::debug!("Round resumed at {:.2}s", self.state.round_time_elapsed);
        self.publish()
    }

    /// Close the current round. No-op unless Playing or Paused.
    pub fn end_round(&mut self, winner: RoundWinner) -> MatchSnapshot {
        if !matches!(self.state.phase, MatchPhase::Playing | MatchPhase::Paused) {
            return self.snapshot();
        }
        if let Some(clock) = &mut self.clock {
            clock.stop();
        }
        self.sync_clock();

        match self.state.mode {
            GameMode::Duel | GameMode::SuddenDeath | GameMode::TimeAttackDuel => match winner {
                RoundWinner::Left => self.state.left_wins += 1,
                RoundWinner::Right => self.state.right_wins += 1,
                RoundWinner::Solo | RoundWinner::Tie => {}
            },
            GameMode::SoloSurvival => {
                let elapsed = self.state.round_time_elapsed;
                self.record_best(|best, store| best.record_survival(elapsed, store));
            }
            GameMode::TimeAttackSolo => {
                let score = self.state.left_score;
                self.record_best(|best, store| best.record_time_attack(score, store));
            }
        }

        self.state.last_round_winner = Some(winner);
        self.state.phase = MatchPhase::Finished;
        log::info!(
            "Round {} over: {:?} (series {}-{})",
            self.state.round_index + 1,
            winner,
            self.state.left_wins,
            self.state.right_wins
        );
        self.publish()
    }

    fn record_best(
        &mut self,
        record: impl FnOnce(&mut BestScores, &mut dyn KeyValueStore) -> bool,
    ) {
        if record(&mut self.state.best, self.store.as_mut()) {
            self.feedback.success();
        } else {
            self.feedback.warning();
        }
    }

    /// Advance to the next round unless the series is decided. Does nothing
    /// before the first `start_match`.
    pub fn next_round_or_end_series(&mut self) -> MatchSnapshot {
        if self.state.phase == MatchPhase::Idle {
            return self.snapshot();
        }
        if self.state.series_complete() {
            log::info!("Series complete: {:?}", self.state.match_winner());
            return self.snapshot();
        }
        self.state.round_index += 1;
        self.start_round()
    }

    /// Restart the whole series in the current mode
    pub fn rematch(&mut self) -> MatchSnapshot {
        self.start_match(self.state.mode)
    }

    /// Add (or with a negative amount, deduct) points. Only in score modes; never below zero.
    pub fn add_score(&mut self, side: Side, amount: i32) -> MatchSnapshot {
        if self.state.rules.win_by != WinBy::ScoreMost {
            return self.snapshot();
        }
        let score = match side {
            Side::Left => &mut self.state.left_score,
            Side::Right => &mut self.state.right_score,
        };
        *score = (i64::from(*score) + i64::from(amount)).clamp(0, i64::from(u32::MAX)) as u32;
        self.publish()
    }

    /// One round clock period. Call at 20 Hz; ignored unless Playing.
    pub fn tick_clock(&mut self) -> MatchSnapshot {
        if self.state.phase != MatchPhase::Playing {
            return self.snapshot();
        }
        let Some(clock) = &mut self.clock else {
            return self.snapshot();
        };
        let tick = clock.tick();
        self.sync_clock();

        if tick == ClockTick::Expired {
            let winner = match self.state.mode {
                GameMode::Duel | GameMode::SuddenDeath => Some(RoundWinner::Tie),
                GameMode::TimeAttackSolo => Some(RoundWinner::Solo),
                GameMode::TimeAttackDuel => {
                    Some(match self.state.left_score.cmp(&self.state.right_score) {
                        std::cmp::Ordering::Greater => RoundWinner::Left,
                        std::cmp::Ordering::Less => RoundWinner::Right,
                        std::cmp::Ordering::Equal => RoundWinner::Tie,
                    })
                }
                // Untimed: runs until the rocket goes down
                GameMode::SoloSurvival => None,
            };
            if let Some(winner) = winner {
                log::debug!("Round timer expired");
                return self.end_round(winner);
            }
        }
        self.publish()
    }

    /// App moved to background: pause a running round
    pub fn app_did_enter_background(&mut self) -> MatchSnapshot {
        self.pause_round()
    }

    /// App returned to foreground: resume a paused round
    pub fn app_will_enter_foreground(&mut self) -> MatchSnapshot {
        self.resume_round()
    }

    fn sync_clock(&mut self) {
        if let Some(clock) = &self.clock {
            self.state.round_time_elapsed = clock.elapsed();
            self.state.round_time_remaining = clock.remaining();
            self.state.round_progress = clock.progress();
        }
    }
}
