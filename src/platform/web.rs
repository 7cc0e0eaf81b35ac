//! Browser bindings (wasm32)
//!
//! `WebGame` is the JS-facing handle. Commands return the match snapshot as
//! JSON; the page renders from `snapshot_json` and `world_json`.

use serde::Serialize;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, GainNode, Navigator, OscillatorNode, OscillatorType};

use super::{SystemClock, entropy_seed};
use crate::GameSession;
use crate::cosmetics::PaintPicker;
use crate::feedback::{Feedback, FeedbackEvent, ImpactLevel, Throttled};
use crate::persistence::LocalStorageStore;
use crate::sim::{Gate, GameMode, Obstacle, PointerEvent, PointerPhase, RocketAgent};
use crate::tuning::WorldTuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Rocket Duel (web) loaded");
}

/// Vibration plus a short synthesized tone per event
pub struct WebFeedback {
    navigator: Option<Navigator>,
    audio: Option<AudioContext>,
}

impl Default for WebFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl WebFeedback {
    pub fn new() -> Self {
        let audio = AudioContext::new().ok();
        if audio.is_none() {
            log::warn!("Failed to create AudioContext - feedback tones disabled");
        }
        Self {
            navigator: web_sys::window().map(|w| w.navigator()),
            audio,
        }
    }

    fn create_osc(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;
        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;
        Some((osc, gain))
    }

    fn tone(&self, freq: f32, secs: f64, osc_type: OscillatorType, vol: f32) {
        let Some(ctx) = &self.audio else { return };
        // Browsers start the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }
        let Some((osc, gain)) = Self::create_osc(ctx, freq, osc_type) else {
            return;
        };
        let t = ctx.current_time();
        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + secs)
            .ok();
        osc.start().ok();
        osc.stop_with_when(t + secs + 0.02).ok();
    }
}

impl Feedback for WebFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        let (vibrate_ms, freq, secs, osc_type) = match event {
            FeedbackEvent::Tap => (8, 520.0, 0.04, OscillatorType::Sine),
            FeedbackEvent::SelectionChanged => (5, 660.0, 0.03, OscillatorType::Sine),
            FeedbackEvent::Impact(ImpactLevel::Light) => {
                (12, 880.0, 0.06, OscillatorType::Triangle)
            }
            FeedbackEvent::Impact(ImpactLevel::Medium) => (25, 180.0, 0.15, OscillatorType::Square),
            FeedbackEvent::Impact(ImpactLevel::Heavy) => (45, 90.0, 0.25, OscillatorType::Sawtooth),
            FeedbackEvent::Success => (30, 990.0, 0.3, OscillatorType::Sine),
            FeedbackEvent::Warning => (20, 330.0, 0.2, OscillatorType::Triangle),
            FeedbackEvent::Error => (60, 120.0, 0.3, OscillatorType::Square),
        };
        if let Some(navigator) = &self.navigator {
            navigator.vibrate_with_duration(vibrate_ms);
        }
        self.tone(freq, secs, osc_type, 0.25);
    }
}

#[derive(Serialize)]
struct WorldView<'a> {
    time: f32,
    agents: &'a [RocketAgent],
    obstacles: &'a [Obstacle],
    gates: &'a [Gate],
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| {
        log::error!("Failed to serialize: {}", e);
        "null".to_string()
    })
}

#[wasm_bindgen]
pub struct WebGame {
    session: GameSession,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(screen_width: f32) -> WebGame {
        let seed = entropy_seed();
        let mut session = GameSession::new(
            Box::new(LocalStorageStore::new()),
            Box::new(Throttled::new(WebFeedback::new(), SystemClock::new())),
            Box::new(PaintPicker::new(seed)),
            seed,
            WorldTuning::default(),
        );
        session.set_screen_width(screen_width);
        WebGame { session }
    }

    pub fn set_screen_width(&mut self, width: f32) {
        self.session.set_screen_width(width);
    }

    /// Start a series; unknown mode names fall back to duel
    pub fn start_match(&mut self, mode: &str) -> String {
        let mode = GameMode::from_str(mode).unwrap_or_default();
        to_json(&self.session.start_match(mode))
    }

    pub fn pause_round(&mut self) -> String {
        to_json(&self.session.pause_round())
    }

    pub fn resume_round(&mut self) -> String {
        to_json(&self.session.resume_round())
    }

    pub fn next_round_or_end_series(&mut self) -> String {
        to_json(&self.session.next_round_or_end_series())
    }

    pub fn rematch(&mut self) -> String {
        to_json(&self.session.rematch())
    }

    /// `phase` is one of "start", "move", "end", "cancel"
    pub fn pointer(&mut self, id: u32, phase: &str, x: f32, y: f32) -> String {
        let phase = match phase {
            "start" => PointerPhase::Began,
            "move" => PointerPhase::Moved,
            "end" => PointerPhase::Ended,
            "cancel" => PointerPhase::Cancelled,
            other => {
                log::warn!("Unknown pointer phase '{}'", other);
                return "[]".to_string();
            }
        };
        to_json(&self.session.pointer(PointerEvent::new(u64::from(id), phase, x, y)))
    }

    /// Advance by one animation frame; returns the frame's world events
    pub fn pump(&mut self, dt: f32) -> String {
        to_json(&self.session.pump(dt))
    }

    pub fn on_background(&mut self) -> String {
        to_json(&self.session.on_background())
    }

    pub fn on_foreground(&mut self) -> String {
        to_json(&self.session.on_foreground())
    }

    pub fn snapshot_json(&self) -> String {
        to_json(&self.session.snapshot())
    }

    pub fn world_json(&self) -> String {
        let world = self.session.world();
        to_json(&WorldView {
            time: world.time(),
            agents: world.agents(),
            obstacles: world.obstacles(),
            gates: world.gates(),
        })
    }
}
