//! World entities: rockets, drifting obstacles and scoring gates

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::match_state::Side;
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, ROCKET_RADIUS};
use crate::tuning::WorldTuning;

/// A player-controlled rocket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RocketAgent {
    pub side: Side,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub alive: bool,
    /// Thrust input currently held
    pub touch_holding: bool,
    /// World time of the last accepted dash
    pub last_dash_time: Option<f32>,
}

impl RocketAgent {
    pub fn new(side: Side, pos: Vec2) -> Self {
        Self {
            side,
            pos,
            vel: Vec2::ZERO,
            radius: ROCKET_RADIUS,
            alive: true,
            touch_holding: false,
            last_dash_time: None,
        }
    }

    /// Gravity, held thrust, velocity clamp and integration for one frame
    pub fn integrate(&mut self, dt: f32, tuning: &WorldTuning) {
        if !self.alive {
            return;
        }
        self.vel.y -= tuning.gravity * dt;
        if self.touch_holding {
            self.vel.y += tuning.thrust_impulse;
        }
        self.vel.y = self
            .vel
            .y
            .clamp(tuning.min_vertical_speed, tuning.max_vertical_speed);
        self.vel.x *= (1.0 - tuning.horizontal_drag * dt).max(0.0);
        self.pos += self.vel * dt;
    }

    /// Horizontal dash. Rejected when dead or still cooling down.
    pub fn try_dash(&mut self, direction: f32, now: f32, tuning: &WorldTuning) -> bool {
        if !self.alive || direction == 0.0 {
            return false;
        }
        if self
            .last_dash_time
            .is_some_and(|last| now - last < tuning.dash_cooldown_secs)
        {
            return false;
        }
        self.vel.x += direction.signum() * tuning.dash_impulse;
        self.last_dash_time = Some(now);
        true
    }

    /// Eliminate for the rest of the round
    pub fn kill(&mut self) {
        self.alive = false;
        self.touch_holding = false;
    }
}

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Asteroid,
    /// Knocks the rocket back before eliminating it
    Mine,
}

/// Which arena edge an entity entered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    Left,
    Right,
}

impl Edge {
    /// Drift direction along x
    pub fn direction(&self) -> f32 {
        match self {
            Edge::Left => 1.0,
            Edge::Right => -1.0,
        }
    }
}

/// A drifting hazard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Current rotation (radians), asteroids only
    pub rotation: f32,
    /// Rotation speed (rad/s)
    pub spin: f32,
    pub entered_from: Edge,
}

impl Obstacle {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        if self.kind == ObstacleKind::Asteroid {
            self.rotation = (self.rotation + self.spin * dt).rem_euclid(std::f32::consts::TAU);
        }
    }

    /// Reached the far edge or left the expanded view
    pub fn is_gone(&self, view_margin: f32) -> bool {
        drifted_past(self.pos, self.radius, self.entered_from)
            || outside_view(self.pos, view_margin)
    }
}

/// A scoring gate (Time Attack modes)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Gate {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extents: Vec2,
    pub entered_from: Edge,
}

impl Gate {
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn is_gone(&self, view_margin: f32) -> bool {
        drifted_past(self.pos, self.half_extents.x, self.entered_from)
            || outside_view(self.pos, view_margin)
    }
}

fn drifted_past(pos: Vec2, extent: f32, entered_from: Edge) -> bool {
    match entered_from {
        Edge::Left => pos.x - extent > ARENA_WIDTH,
        Edge::Right => pos.x + extent < 0.0,
    }
}

fn outside_view(pos: Vec2, margin: f32) -> bool {
    pos.x < -margin
        || pos.x > ARENA_WIDTH + margin
        || pos.y < -margin
        || pos.y > ARENA_HEIGHT + margin
}
