//! Frame driver: match controller, world, input and bots wired together
//!
//! The host forwards its control commands, pointer events and frame
//! callbacks here. Hosts with a separate 20 Hz timer call
//! `tick_round_clock` from it and `frame` per render; hosts with a single
//! frame callback call `pump`, which runs both.

use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

use crate::consts::*;
use crate::cosmetics::PaintSelector;
use crate::feedback::Feedback;
use crate::persistence::KeyValueStore;
use crate::sim::{
    Autopilot, GameMode, InputTranslator, MatchController, MatchPhase, MatchSnapshot, MatchState,
    PointerEvent, Side, World, WorldEvent,
};
use crate::tuning::WorldTuning;

pub struct GameSession {
    matches: MatchController,
    world: World,
    input: InputTranslator,
    screen_width: f32,
    /// Unconsumed frame time for the round clock
    clock_accumulator: f64,
    /// Round serial the world was last reset for
    seen_round: u64,
    /// Sides the host asked to be bot-driven
    autopilot_sides: BTreeSet<Side>,
    bots: Vec<Autopilot>,
}

impl GameSession {
    pub fn new(
        store: Box<dyn KeyValueStore>,
        feedback: Box<dyn Feedback>,
        paints: Box<dyn PaintSelector>,
        seed: u64,
        tuning: WorldTuning,
    ) -> Self {
        let dead_zone = tuning.swipe_dead_zone;
        Self {
            matches: MatchController::new(store, feedback, paints),
            world: World::new(seed, tuning),
            input: InputTranslator::new(ARENA_WIDTH, true, dead_zone),
            screen_width: ARENA_WIDTH,
            clock_accumulator: 0.0,
            seen_round: 0,
            autopilot_sides: BTreeSet::new(),
            bots: Vec::new(),
        }
    }

    pub fn controller(&self) -> &MatchController {
        &self.matches
    }

    /// Direct controller access. The world catches up on the next frame.
    pub fn controller_mut(&mut self) -> &mut MatchController {
        &mut self.matches
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn state(&self) -> &MatchState {
        self.matches.state()
    }

    pub fn snapshot(&self) -> MatchSnapshot {
        self.matches.snapshot()
    }

    pub fn subscribe(&mut self) -> Receiver<MatchSnapshot> {
        self.matches.subscribe()
    }

    /// Width of the touch surface in pixels
    pub fn set_screen_width(&mut self, width: f32) {
        self.screen_width = width;
        self.input
            .configure(width, self.world.mode().is_two_rocket());
    }

    // === Control commands ===

    pub fn start_match(&mut self, mode: GameMode) -> MatchSnapshot {
        let snapshot = self.matches.start_match(mode);
        self.sync_world();
        snapshot
    }

    pub fn pause_round(&mut self) -> MatchSnapshot {
        self.release_thrust();
        self.matches.pause_round()
    }

    pub fn resume_round(&mut self) -> MatchSnapshot {
        self.clock_accumulator = 0.0;
        self.matches.resume_round()
    }

    pub fn next_round_or_end_series(&mut self) -> MatchSnapshot {
        let snapshot = self.matches.next_round_or_end_series();
        self.sync_world();
        snapshot
    }

    pub fn rematch(&mut self) -> MatchSnapshot {
        let snapshot = self.matches.rematch();
        self.sync_world();
        snapshot
    }

    // === Lifecycle ===

    pub fn on_background(&mut self) -> MatchSnapshot {
        self.release_thrust();
        self.matches.app_did_enter_background()
    }

    pub fn on_foreground(&mut self) -> MatchSnapshot {
        self.clock_accumulator = 0.0;
        self.matches.app_will_enter_foreground()
    }

    // === Bots ===

    /// Hand a side to the autopilot (or take it back)
    pub fn set_autopilot(&mut self, side: Side, enabled: bool) {
        if enabled {
            self.autopilot_sides.insert(side);
        } else {
            self.autopilot_sides.remove(&side);
            if let Some(agent) = self.world.agent_mut(side) {
                agent.touch_holding = false;
            }
        }
        self.rebuild_bots();
    }

    pub fn is_bot_driven(&self, side: Side) -> bool {
        self.bots.iter().any(|b| b.side() == side)
    }

    fn rebuild_bots(&mut self) {
        let bot_right = self.matches.rules().bot_enabled;
        self.bots = [Side::Left, Side::Right]
            .into_iter()
            .filter(|side| {
                self.autopilot_sides.contains(side) || (bot_right && *side == Side::Right)
            })
            .filter(|side| self.world.agent(*side).is_some())
            .map(Autopilot::new)
            .collect();
    }

    // === Per-frame ===

    /// Feed one raw pointer event. Touches outside a playing round are dropped.
    pub fn pointer(&mut self, event: PointerEvent) -> Vec<WorldEvent> {
        self.sync_world();
        if self.matches.phase() != MatchPhase::Playing {
            return Vec::new();
        }
        let commands = self.input.translate(event);
        commands
            .into_iter()
            .filter_map(|command| self.world.apply_input(command, &mut self.matches))
            .collect()
    }

    /// One round clock period (20 Hz timer hosts)
    pub fn tick_round_clock(&mut self) -> MatchSnapshot {
        self.matches.tick_clock()
    }

    /// One rendered frame of world simulation
    pub fn frame(&mut self, dt: f32) -> Vec<WorldEvent> {
        self.sync_world();
        let mut events = Vec::new();
        if self.matches.phase() != MatchPhase::Playing {
            return events;
        }
        for bot in &self.bots {
            for command in bot.act(&self.world) {
                events.extend(self.world.apply_input(command, &mut self.matches));
            }
        }
        events.extend(self.world.step(dt, &mut self.matches));
        events
    }

    /// Round clock ticks owed for `dt`, then one world frame
    pub fn pump(&mut self, dt: f32) -> Vec<WorldEvent> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.sync_world();

        if self.matches.phase() == MatchPhase::Playing {
            self.clock_accumulator += f64::from(dt);
            let mut ticks = 0;
            while self.clock_accumulator >= ROUND_TICK_SECS
                && ticks < MAX_CLOCK_TICKS_PER_FRAME
                && self.matches.phase() == MatchPhase::Playing
            {
                self.matches.tick_clock();
                self.clock_accumulator -= ROUND_TICK_SECS;
                ticks += 1;
            }
        } else {
            self.clock_accumulator = 0.0;
        }

        self.frame(dt)
    }

    fn release_thrust(&mut self) {
        self.input.release_all();
        self.world.release_thrust();
    }

    /// Reset the world when the controller has started a new round
    fn sync_world(&mut self) {
        let serial = self.matches.round_serial();
        if serial == self.seen_round {
            return;
        }
        self.seen_round = serial;
        let mode = self.matches.state().mode;
        self.world.reset_round(mode);
        self.input.configure(self.screen_width, mode.is_two_rocket());
        self.clock_accumulator = 0.0;
        self.rebuild_bots();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmetics::PaintPicker;
    use crate::feedback::RecordingFeedback;
    use crate::persistence::MemoryStore;
    use crate::settings::keys;
    use crate::sim::{PointerPhase, RoundWinner};
    use serde_json::json;

    fn session_with(store: MemoryStore) -> (GameSession, RecordingFeedback) {
        let feedback = RecordingFeedback::new();
        let session = GameSession::new(
            Box::new(store),
            Box::new(feedback.clone()),
            Box::new(PaintPicker::new(11)),
            99,
            WorldTuning::default(),
        );
        (session, feedback)
    }

    fn session() -> GameSession {
        session_with(MemoryStore::new()).0
    }

    #[test]
    fn test_start_match_builds_world() {
        let mut session = session();
        assert!(session.world().agents().is_empty());
        session.start_match(GameMode::Duel);
        assert_eq!(session.world().agents().len(), 2);
        session.start_match(GameMode::SoloSurvival);
        assert_eq!(session.world().agents().len(), 1);
    }

    #[test]
    fn test_pump_ticks_round_clock() {
        let mut session = session();
        session.start_match(GameMode::Duel);
        session.pump(0.1);
        assert!((session.state().round_time_elapsed - 0.1).abs() < 1e-9);
        // Frame deltas are capped
        session.pump(5.0);
        assert!((session.state().round_time_elapsed - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_pump_does_nothing_when_idle() {
        let mut session = session();
        assert!(session.pump(1.0 / 60.0).is_empty());
        assert_eq!(session.state().phase, MatchPhase::Idle);
    }

    #[test]
    fn test_clock_frozen_while_paused() {
        let mut session = session();
        session.start_match(GameMode::Duel);
        session.pump(0.05);
        session.pause_round();
        for _ in 0..20 {
            session.pump(0.05);
        }
        assert!((session.state().round_time_elapsed - 0.05).abs() < 1e-9);
        session.resume_round();
        session.pump(0.05);
        assert!((session.state().round_time_elapsed - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_pointer_thrust_reaches_rocket() {
        let mut session = session();
        session.start_match(GameMode::Duel);
        session.pointer(PointerEvent::new(1, PointerPhase::Began, 700.0, 100.0));
        assert!(session.world().agent(Side::Right).unwrap().touch_holding);
        assert!(!session.world().agent(Side::Left).unwrap().touch_holding);
        session.pointer(PointerEvent::new(1, PointerPhase::Ended, 700.0, 100.0));
        assert!(!session.world().agent(Side::Right).unwrap().touch_holding);
    }

    #[test]
    fn test_touches_during_pause_are_dropped() {
        let mut session = session();
        session.start_match(GameMode::Duel);
        session.pause_round();

        // Swipe and a held finger while paused
        session.pointer(PointerEvent::new(1, PointerPhase::Began, 100.0, 100.0));
        session.pointer(PointerEvent::new(1, PointerPhase::Moved, 200.0, 100.0));
        session.pointer(PointerEvent::new(2, PointerPhase::Began, 700.0, 100.0));
        assert_eq!(session.input.active_touches(), 0);

        session.resume_round();
        assert!(!session.world().agent(Side::Right).unwrap().touch_holding);
        // Leftovers from the pause are unknown touches
        assert!(
            session
                .pointer(PointerEvent::new(1, PointerPhase::Ended, 300.0, 100.0))
                .is_empty()
        );

        // A fresh press after resume thrusts and dashes normally
        session.pointer(PointerEvent::new(3, PointerPhase::Began, 100.0, 100.0));
        assert!(session.world().agent(Side::Left).unwrap().touch_holding);
        let events = session.pointer(PointerEvent::new(3, PointerPhase::Moved, 200.0, 100.0));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, WorldEvent::Dashed { side: Side::Left }))
        );
        assert_eq!(session.input.active_touches(), 1);
    }

    #[test]
    fn test_non_finite_frame_leaves_round_intact() {
        let mut session = session();
        session.start_match(GameMode::Duel);
        session.pump(1.0 / 60.0);
        let time = session.world().time();
        let left = session.world().agent(Side::Left).unwrap().pos;

        session.frame(f32::NAN);
        session.frame(f32::INFINITY);
        session.pump(f32::NAN);
        assert_eq!(session.world().time(), time);
        assert_eq!(session.world().agent(Side::Left).unwrap().pos, left);
        assert!(session.world().agents().iter().all(|a| a.alive));
        assert_eq!(session.state().phase, MatchPhase::Playing);
    }

    #[test]
    fn test_background_pauses_and_releases() {
        let mut session = session();
        session.start_match(GameMode::SoloSurvival);
        session.pointer(PointerEvent::new(1, PointerPhase::Began, 10.0, 10.0));
        let snapshot = session.on_background();
        assert_eq!(snapshot.state.phase, MatchPhase::Paused);
        assert!(!session.world().agent(Side::Left).unwrap().touch_holding);
        assert_eq!(session.on_foreground().state.phase, MatchPhase::Playing);
    }

    #[test]
    fn test_next_round_resets_world() {
        let mut session = session();
        session.start_match(GameMode::Duel);
        session.controller_mut().end_round(RoundWinner::Left);
        session.next_round_or_end_series();
        assert_eq!(session.state().round_index, 1);
        assert!(session.world().agents().iter().all(|a| a.alive));
        assert_eq!(session.world().time(), 0.0);
    }

    #[test]
    fn test_vs_bot_drives_right_rocket() {
        let store = MemoryStore::new();
        let mut writer = store.clone();
        writer.set(keys::VS_BOT, json!(true));
        let (mut session, _) = session_with(store);

        session.start_match(GameMode::Duel);
        assert!(session.is_bot_driven(Side::Right));
        assert!(!session.is_bot_driven(Side::Left));

        session.start_match(GameMode::SoloSurvival);
        assert!(!session.is_bot_driven(Side::Right));
    }

    #[test]
    fn test_autopilot_both_sides() {
        let mut session = session();
        session.set_autopilot(Side::Left, true);
        session.set_autopilot(Side::Right, true);
        session.start_match(GameMode::Duel);
        assert!(session.is_bot_driven(Side::Left));
        assert!(session.is_bot_driven(Side::Right));
        session.set_autopilot(Side::Left, false);
        assert!(!session.is_bot_driven(Side::Left));
    }

    #[test]
    fn test_full_duel_round_resolves() {
        let mut session = session();
        session.set_autopilot(Side::Left, true);
        session.set_autopilot(Side::Right, true);
        session.start_match(GameMode::Duel);
        // 60s round plus slack
        for _ in 0..60 * 65 {
            session.pump(1.0 / 60.0);
            if session.state().phase == MatchPhase::Finished {
                break;
            }
        }
        assert_eq!(session.state().phase, MatchPhase::Finished);
        assert!(session.state().last_round_winner.is_some());
    }
}
