//! Computer-controlled rocket
//!
//! Holds a cruising altitude and climbs or drops out of the path of the
//! nearest obstacle drifting toward it. Emits the same commands a player's
//! touches would, so the world treats bots and humans alike.

use super::entities::{Obstacle, RocketAgent};
use super::input::InputCommand;
use super::match_state::Side;
use super::world::World;
use crate::arena_center;
use crate::consts::ARENA_HEIGHT;

/// How far ahead (seconds) the bot extrapolates its own fall
const ALTITUDE_LOOKAHEAD: f32 = 0.25;
/// Obstacles arriving within this many seconds are threats
const THREAT_HORIZON: f32 = 1.2;
/// Extra vertical room kept around a threat
const CLEARANCE: f32 = 24.0;

pub struct Autopilot {
    side: Side,
    cruise_y: f32,
}

impl Autopilot {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            cruise_y: arena_center().y,
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Altitude the rocket should be at right now, `None` when it is down
    pub fn target_altitude(&self, world: &World) -> Option<f32> {
        let agent = world.agent(self.side).filter(|a| a.alive)?;
        let margin = agent.radius * 3.0;
        let target = match nearest_threat(agent, world.obstacles()) {
            Some(threat) => {
                let reach = agent.radius + threat.radius + CLEARANCE;
                let above = threat.pos.y + reach;
                let below = threat.pos.y - reach;
                // Dodge the short way unless it runs into the floor or ceiling
                let prefer_above = agent.pos.y >= threat.pos.y;
                if (prefer_above && above <= ARENA_HEIGHT - margin) || below < margin {
                    above
                } else {
                    below
                }
            }
            None => self.cruise_y,
        };
        Some(target.clamp(margin, ARENA_HEIGHT - margin))
    }

    /// Commands for this frame; empty when the rocket already does the right thing
    pub fn act(&self, world: &World) -> Vec<InputCommand> {
        let Some(agent) = world.agent(self.side) else {
            return Vec::new();
        };
        let want = self
            .target_altitude(world)
            .is_some_and(|target| agent.pos.y + agent.vel.y * ALTITUDE_LOOKAHEAD < target);
        if want == agent.touch_holding {
            return Vec::new();
        }
        vec![InputCommand::Thrust {
            side: self.side,
            holding: want,
        }]
    }
}

/// Closest obstacle on a collision course within the threat horizon
fn nearest_threat<'a>(agent: &RocketAgent, obstacles: &'a [Obstacle]) -> Option<&'a Obstacle> {
    obstacles
        .iter()
        .filter_map(|o| {
            let dx = agent.pos.x - o.pos.x;
            // Moving away or parked
            if o.vel.x == 0.0 || dx.signum() != o.vel.x.signum() {
                return None;
            }
            let arrival = (dx.abs() - agent.radius - o.radius).max(0.0) / o.vel.x.abs();
            let lane = agent.radius + o.radius + CLEARANCE;
            (arrival <= THREAT_HORIZON && (o.pos.y - agent.pos.y).abs() < lane)
                .then_some((arrival, o))
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, o)| o)
}
