//! Pointer/touch events to per-side rocket commands
//!
//! The screen is split into horizontal halves in two-rocket modes; in solo
//! modes every touch steers the single rocket. A press holds thrust until
//! the last touch on that side lifts. A mostly-horizontal drag longer than
//! the dead zone dashes once per touch.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::match_state::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// Raw pointer event in screen pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub id: u64,
    pub phase: PointerPhase,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    pub fn new(id: u64, phase: PointerPhase, x: f32, y: f32) -> Self {
        Self { id, phase, x, y }
    }
}

/// Command consumed by the world
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputCommand {
    Thrust { side: Side, holding: bool },
    /// `direction` is the sign of the horizontal swipe
    Dash { side: Side, direction: f32 },
}

#[derive(Debug, Clone, Copy)]
struct ActiveTouch {
    side: Side,
    start: Vec2,
    dashed: bool,
}

pub struct InputTranslator {
    screen_width: f32,
    two_sided: bool,
    dead_zone: f32,
    touches: BTreeMap<u64, ActiveTouch>,
}

impl InputTranslator {
    pub fn new(screen_width: f32, two_sided: bool, dead_zone: f32) -> Self {
        Self {
            screen_width,
            two_sided,
            dead_zone,
            touches: BTreeMap::new(),
        }
    }

    /// New screen size or mode. Drops tracked touches.
    pub fn configure(&mut self, screen_width: f32, two_sided: bool) {
        self.screen_width = screen_width;
        self.two_sided = two_sided;
        self.touches.clear();
    }

    pub fn set_dead_zone(&mut self, dead_zone: f32) {
        self.dead_zone = dead_zone;
    }

    pub fn active_touches(&self) -> usize {
        self.touches.len()
    }

    /// Side owning a screen x coordinate
    pub fn side_for(&self, x: f32) -> Side {
        if self.two_sided && x >= self.screen_width / 2.0 {
            Side::Right
        } else {
            Side::Left
        }
    }

    fn side_held(&self, side: Side) -> bool {
        self.touches.values().any(|t| t.side == side)
    }

    fn swipe_direction(&self, start: Vec2, end: Vec2) -> Option<f32> {
        let delta = end - start;
        if delta.length() < self.dead_zone || delta.x.abs() <= delta.y.abs() {
            return None;
        }
        Some(delta.x.signum())
    }

    pub fn translate(&mut self, event: PointerEvent) -> Vec<InputCommand> {
        let pos = Vec2::new(event.x, event.y);
        let mut commands = Vec::new();

        match event.phase {
            PointerPhase::Began => {
                let side = self.side_for(event.x);
                self.touches.insert(
                    event.id,
                    ActiveTouch {
                        side,
                        start: pos,
                        dashed: false,
                    },
                );
                commands.push(InputCommand::Thrust { side, holding: true });
            }
            PointerPhase::Moved | PointerPhase::Ended => {
                let Some(touch) = self.touches.get(&event.id).copied() else {
                    return commands;
                };
                if !touch.dashed {
                    if let Some(direction) = self.swipe_direction(touch.start, pos) {
                        commands.push(InputCommand::Dash {
                            side: touch.side,
                            direction,
                        });
                        if let Some(t) = self.touches.get_mut(&event.id) {
                            t.dashed = true;
                        }
                    }
                }
                if event.phase == PointerPhase::Ended {
                    self.lift(event.id, &mut commands);
                }
            }
            PointerPhase::Cancelled => self.lift(event.id, &mut commands),
        }

        commands
    }

    fn lift(&mut self, id: u64, commands: &mut Vec<InputCommand>) {
        let Some(touch) = self.touches.remove(&id) else {
            return;
        };
        if !self.side_held(touch.side) {
            commands.push(InputCommand::Thrust {
                side: touch.side,
                holding: false,
            });
        }
    }

    /// Forget every touch, releasing thrust on each held side
    pub fn release_all(&mut self) -> Vec<InputCommand> {
        let mut sides: Vec<Side> = self.touches.values().map(|t| t.side).collect();
        sides.sort();
        sides.dedup();
        self.touches.clear();
        sides
            .into_iter()
            .map(|side| InputCommand::Thrust {
                side,
                holding: false,
            })
            .collect()
    }
}
