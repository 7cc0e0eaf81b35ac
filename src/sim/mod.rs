//! Gameplay core
//!
//! Rules, round clock, match state machine, world physics and input
//! translation. Nothing in here renders or touches the platform:
//! - Randomness comes from seeded RNGs only
//! - Persistence and feedback are injected trait objects
//! - Entities are iterated in spawn order

pub mod bot;
pub mod clock;
pub mod collision;
pub mod entities;
pub mod input;
pub mod match_state;
pub mod rules;
pub mod world;

pub use bot::Autopilot;
pub use clock::{ClockTick, RoundClock};
pub use collision::{Contact, CollisionResult, rocket_contacts};
pub use entities::{Edge, Gate, Obstacle, ObstacleKind, RocketAgent};
pub use input::{InputCommand, InputTranslator, PointerEvent, PointerPhase};
pub use match_state::{MatchController, MatchPhase, MatchSnapshot, MatchState, RoundWinner, Side};
pub use rules::{GameMode, ModeRules, ScoringRules, Series, SpawnCurve, WinBy, derive_rules};
pub use world::{EliminationCause, World, WorldEvent};
