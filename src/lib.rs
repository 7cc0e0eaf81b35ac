//! Rocket Duel - A side-scrolling rocket arena arcade game
//!
//! Core modules:
//! - `sim`: Round/match simulation (rules, round clock, match state, physics world)
//! - `session`: Frame driver wiring match state, world and input together
//! - `settings`: Player preferences backed by the key-value store
//! - `highscores`: Best survival time and time attack score records
//! - `persistence`: Key-value store collaborators
//! - `feedback`: Haptic/audio notification collaborators
//! - `cosmetics`: Per-match rocket paint selection
//! - `platform`: Time source and browser glue
//! - `tuning`: Data-driven game balance

pub mod cosmetics;
pub mod feedback;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::BestScores;
pub use session::GameSession;
pub use settings::{Settings, Theme};
pub use tuning::WorldTuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Round clock period (20 Hz)
    pub const ROUND_TICK_SECS: f64 = 0.05;
    /// Maximum round clock ticks consumed per frame to prevent spiral of death
    pub const MAX_CLOCK_TICKS_PER_FRAME: u32 = 8;
    /// Largest frame delta the world will integrate in one step
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Arena dimensions (world units, y up)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 450.0;

    /// Rocket collision radius
    pub const ROCKET_RADIUS: f32 = 14.0;
    /// Rocket spawn x positions as a fraction of arena width
    pub const LEFT_ROCKET_X: f32 = 0.3;
    pub const RIGHT_ROCKET_X: f32 = 0.7;
    pub const SOLO_ROCKET_X: f32 = 0.5;

    /// Default round lengths (seconds)
    pub const DEFAULT_ROUND_SECS: u32 = 60;
    pub const DEFAULT_TIME_ATTACK_SECS: u32 = 60;
    pub const SUDDEN_DEATH_SECS: u32 = 20;

    /// Accepted preference ranges (seconds)
    pub const ROUND_SECS_RANGE: (u32, u32) = (20, 180);
    pub const TIME_ATTACK_SECS_RANGE: (u32, u32) = (30, 180);
}

/// Center of the arena
#[inline]
pub fn arena_center() -> Vec2 {
    Vec2::new(consts::ARENA_WIDTH / 2.0, consts::ARENA_HEIGHT / 2.0)
}

/// Linear interpolation that returns exactly `a` at t=0 and exactly `b` at t=1
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}
