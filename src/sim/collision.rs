//! Contact detection between rockets and the rest of the arena
//!
//! Rockets are circles. Obstacles are circles, gates are axis-aligned
//! rectangles and the arena is a rectangle whose edges are lethal.

use glam::Vec2;

use super::entities::{Gate, Obstacle, ObstacleKind, RocketAgent};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Surface normal at contact (pointing toward the rocket)
    pub normal: Vec2,
    /// Penetration depth
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// What a rocket touched this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Contact {
    Obstacle {
        id: u32,
        kind: ObstacleKind,
        /// From the obstacle toward the rocket
        normal: Vec2,
    },
    WorldBoundary {
        /// Pointing back into the arena
        normal: Vec2,
    },
    Gate {
        id: u32,
    },
}

/// Circle vs circle
pub fn circle_circle_collision(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> CollisionResult {
    let delta = a - b;
    let dist = delta.length();
    let reach = a_radius + b_radius;
    if dist >= reach {
        return CollisionResult::miss();
    }
    CollisionResult {
        hit: true,
        // Coincident centers push straight up
        normal: delta.try_normalize().unwrap_or(Vec2::Y),
        penetration: reach - dist,
    }
}

/// Circle touching any edge of the `size` rectangle anchored at the origin
pub fn circle_bounds_collision(pos: Vec2, radius: f32, size: Vec2) -> CollisionResult {
    let edges = [
        (pos.x - radius, Vec2::X),
        (size.x - (pos.x + radius), Vec2::NEG_X),
        (pos.y - radius, Vec2::Y),
        (size.y - (pos.y + radius), Vec2::NEG_Y),
    ];
    edges
        .into_iter()
        .filter(|(gap, _)| *gap <= 0.0)
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(gap, normal)| CollisionResult {
            hit: true,
            normal,
            penetration: -gap,
        })
        .unwrap_or_else(CollisionResult::miss)
}

/// Circle vs axis-aligned rectangle
pub fn circle_rect_overlap(pos: Vec2, radius: f32, center: Vec2, half_extents: Vec2) -> bool {
    let closest = pos.clamp(center - half_extents, center + half_extents);
    pos.distance_squared(closest) < radius * radius
}

/// All contacts for one live rocket, boundary first
pub fn rocket_contacts(
    rocket: &RocketAgent,
    arena: Vec2,
    obstacles: &[Obstacle],
    gates: &[Gate],
) -> Vec<Contact> {
    let mut contacts = Vec::new();
    if !rocket.alive {
        return contacts;
    }

    let wall = circle_bounds_collision(rocket.pos, rocket.radius, arena);
    if wall.hit {
        contacts.push(Contact::WorldBoundary {
            normal: wall.normal,
        });
    }

    for obstacle in obstacles {
        let hit = circle_circle_collision(rocket.pos, rocket.radius, obstacle.pos, obstacle.radius);
        if hit.hit {
            contacts.push(Contact::Obstacle {
                id: obstacle.id,
                kind: obstacle.kind,
                normal: hit.normal,
            });
        }
    }

    for gate in gates {
        if circle_rect_overlap(rocket.pos, rocket.radius, gate.pos, gate.half_extents) {
            contacts.push(Contact::Gate { id: gate.id });
        }
    }

    contacts
}
