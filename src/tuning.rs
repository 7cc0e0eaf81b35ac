//! Data-driven game balance
//!
//! Every physics and spawner constant the world uses. Missing fields in a
//! JSON override fall back to the defaults below.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    // === Rocket ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Upward velocity impulse applied every frame thrust is held
    pub thrust_impulse: f32,
    /// Vertical velocity band (units/s)
    pub min_vertical_speed: f32,
    pub max_vertical_speed: f32,
    /// Horizontal velocity decay rate (1/s)
    pub horizontal_drag: f32,
    /// Horizontal velocity impulse of a dash
    pub dash_impulse: f32,
    pub dash_cooldown_secs: f32,
    /// Minimum swipe length (screen pixels) that counts as a dash
    pub swipe_dead_zone: f32,

    // === Obstacles ===
    pub obstacle_base_speed: f32,
    /// Drift speed jitter, applied as ± this value
    pub obstacle_speed_jitter: f32,
    pub asteroid_min_radius: f32,
    pub asteroid_max_radius: f32,
    /// Max asteroid spin (rad/s, either direction)
    pub asteroid_max_spin: f32,
    pub mine_radius: f32,
    /// Every n-th obstacle is a mine
    pub mine_every: u32,
    /// Velocity impulse pushing a rocket away from a mine it touched
    pub mine_knockback: f32,
    /// Live obstacle cap regardless of mode
    pub obstacle_hard_cap: usize,
    /// Round progress after which two obstacles spawn per step
    pub late_round_threshold: f32,
    /// Cull distance outside the arena
    pub view_margin: f32,
    /// Untimed rounds reach full spawn intensity after this long
    pub survival_ramp_secs: f32,

    // === Gates ===
    pub gate_half_width: f32,
    pub gate_half_height: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            gravity: 900.0,
            thrust_impulse: 32.0,
            min_vertical_speed: -420.0,
            max_vertical_speed: 360.0,
            horizontal_drag: 2.5,
            dash_impulse: 420.0,
            dash_cooldown_secs: 0.70,
            swipe_dead_zone: 36.0,

            obstacle_base_speed: 150.0,
            obstacle_speed_jitter: 50.0,
            asteroid_min_radius: 16.0,
            asteroid_max_radius: 38.0,
            asteroid_max_spin: 2.5,
            mine_radius: 15.0,
            mine_every: 5,
            mine_knockback: 260.0,
            obstacle_hard_cap: 12,
            late_round_threshold: 0.65,
            view_margin: 120.0,
            survival_ramp_secs: 90.0,

            gate_half_width: 6.0,
            gate_half_height: 55.0,
        }
    }
}

impl WorldTuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
