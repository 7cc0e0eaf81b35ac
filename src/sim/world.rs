//! Simulation world: rocket physics, obstacle/gate spawner, collisions
//!
//! Stepped once per rendered frame. Nothing moves unless the match is
//! Playing. Outcomes (gate scores, eliminations, round end) are reported
//! straight to the match controller, which the world only borrows.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Contact, rocket_contacts};
use super::entities::{Edge, Gate, Obstacle, ObstacleKind, RocketAgent};
use super::input::InputCommand;
use super::match_state::{MatchController, MatchPhase, MatchState, RoundWinner, Side};
use super::rules::{GameMode, ModeRules};
use crate::consts::*;
use crate::feedback::ImpactLevel;
use crate::tuning::WorldTuning;

/// Why a rocket went down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EliminationCause {
    Obstacle(ObstacleKind),
    WorldBoundary,
}

/// Things that happened during a step, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    ObstacleSpawned { id: u32, kind: ObstacleKind },
    GateSpawned { id: u32 },
    GatePassed { side: Side, gate_id: u32 },
    Dashed { side: Side },
    Knockback { side: Side, impulse: Vec2 },
    Eliminated { side: Side, cause: EliminationCause },
    RoundEnded { winner: RoundWinner },
}

pub struct World {
    agents: Vec<RocketAgent>,
    obstacles: Vec<Obstacle>,
    gates: Vec<Gate>,
    mode: GameMode,
    /// Seconds of Playing time this round (dash cooldown clock)
    time: f32,
    since_spawn: f32,
    obstacles_spawned: u32,
    next_id: u32,
    rng: Pcg32,
    tuning: WorldTuning,
}

impl World {
    /// An empty world; call `reset_round` before stepping
    pub fn new(seed: u64, tuning: WorldTuning) -> Self {
        Self {
            agents: Vec::new(),
            obstacles: Vec::new(),
            gates: Vec::new(),
            mode: GameMode::default(),
            time: 0.0,
            since_spawn: 0.0,
            obstacles_spawned: 0,
            next_id: 1,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        }
    }

    /// Fresh rockets, no obstacles
    pub fn reset_round(&mut self, mode: GameMode) {
        self.mode = mode;
        self.obstacles.clear();
        self.gates.clear();
        self.time = 0.0;
        self.since_spawn = 0.0;
        self.obstacles_spawned = 0;

        let y = ARENA_HEIGHT / 2.0;
        self.agents.clear();
        if mode.is_two_rocket() {
            self.agents.push(RocketAgent::new(
                Side::Left,
                Vec2::new(ARENA_WIDTH * LEFT_ROCKET_X, y),
            ));
            self.agents.push(RocketAgent::new(
                Side::Right,
                Vec2::new(ARENA_WIDTH * RIGHT_ROCKET_X, y),
            ));
        } else {
            self.agents.push(RocketAgent::new(
                Side::Left,
                Vec2::new(ARENA_WIDTH * SOLO_ROCKET_X, y),
            ));
        }
        debug_assert!(self.agent(Side::Left).is_some(), "round set up without a left rocket");
        log::debug!("World reset for {} ({} rockets)", mode.as_str(), self.agents.len());
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn agents(&self) -> &[RocketAgent] {
        &self.agents
    }

    pub fn agent(&self, side: Side) -> Option<&RocketAgent> {
        self.agents.iter().find(|a| a.side == side)
    }

    pub fn agent_mut(&mut self, side: Side) -> Option<&mut RocketAgent> {
        self.agents.iter_mut().find(|a| a.side == side)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn tuning(&self) -> &WorldTuning {
        &self.tuning
    }

    /// Apply a translated input command. Ignored unless Playing.
    pub fn apply_input(
        &mut self,
        command: InputCommand,
        matches: &mut MatchController,
    ) -> Option<WorldEvent> {
        if matches.phase() != MatchPhase::Playing {
            return None;
        }
        match command {
            InputCommand::Thrust { side, holding } => {
                if let Some(agent) = self.agent_mut(side).filter(|a| a.alive) {
                    agent.touch_holding = holding;
                }
                None
            }
            InputCommand::Dash { side, direction } => {
                let now = self.time;
                let tuning = &self.tuning;
                let agent = self.agents.iter_mut().find(|a| a.side == side)?;
                if !agent.try_dash(direction, now, tuning) {
                    log::debug!("{:?} dash rejected at {:.2}s", side, now);
                    return None;
                }
                log::debug!("{:?} dashed at {:.2}s", side, now);
                matches.feedback_mut().tap();
                Some(WorldEvent::Dashed { side })
            }
        }
    }

    /// Drop all held thrust (app backgrounded, touches lost)
    pub fn release_thrust(&mut self) {
        for agent in &mut self.agents {
            agent.touch_holding = false;
        }
    }

    /// Advance one rendered frame
    pub fn step(&mut self, dt: f32, matches: &mut MatchController) -> Vec<WorldEvent> {
        let mut events = Vec::new();
        if matches.phase() != MatchPhase::Playing {
            return events;
        }
        if self.agent(Side::Left).is_none() {
            debug_assert!(false, "world stepped without a left rocket");
            return events;
        }
        if !dt.is_finite() {
            log::warn!("Skipping frame with non-finite dt {}", dt);
            return events;
        }

        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let rules = *matches.rules();
        self.time += dt;

        for agent in &mut self.agents {
            agent.integrate(dt, &self.tuning);
        }

        let margin = self.tuning.view_margin;
        for obstacle in &mut self.obstacles {
            obstacle.advance(dt);
        }
        self.obstacles.retain(|o| !o.is_gone(margin));
        for gate in &mut self.gates {
            gate.advance(dt);
        }
        self.gates.retain(|g| !g.is_gone(margin));

        let progress = self.spawn_progress(matches.state());
        self.run_spawner(dt, progress, &rules, &mut events);

        if self.resolve_collisions(&rules, matches, &mut events) {
            if let Some(winner) = self.round_outcome() {
                matches.end_round(winner);
                events.push(WorldEvent::RoundEnded { winner });
            }
        }

        events
    }

    /// Round progress for the spawn curve: countdown progress, or elapsed
    /// time over the survival ramp for untimed rounds
    fn spawn_progress(&self, state: &MatchState) -> f32 {
        match state.round_progress {
            Some(progress) => progress as f32,
            None => (state.round_time_elapsed as f32 / self.tuning.survival_ramp_secs).min(1.0),
        }
    }

    fn run_spawner(
        &mut self,
        dt: f32,
        progress: f32,
        rules: &ModeRules,
        events: &mut Vec<WorldEvent>,
    ) {
        self.since_spawn += dt;
        let interval = rules.spawn.interval(progress);
        if self.since_spawn < interval {
            return;
        }
        let cap = rules.spawn.max_simultaneous.min(self.tuning.obstacle_hard_cap);
        if self.obstacles.len() >= cap {
            return;
        }
        self.since_spawn = 0.0;

        let wanted = if progress > self.tuning.late_round_threshold { 2 } else { 1 };
        let count = wanted.min(cap - self.obstacles.len());
        for _ in 0..count {
            let (id, kind) = self.spawn_obstacle();
            events.push(WorldEvent::ObstacleSpawned { id, kind });
        }
        if rules.mode.is_time_attack() {
            let id = self.spawn_gate();
            events.push(WorldEvent::GateSpawned { id });
        }
    }

    fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn random_edge(&mut self) -> Edge {
        if self.rng.random_bool(0.5) {
            Edge::Left
        } else {
            Edge::Right
        }
    }

    /// Entry x just outside the given edge
    fn entry_x(edge: Edge, extent: f32) -> f32 {
        match edge {
            Edge::Left => -extent,
            Edge::Right => ARENA_WIDTH + extent,
        }
    }

    fn drift_speed(&mut self) -> f32 {
        let jitter = self.tuning.obstacle_speed_jitter.abs();
        (self.tuning.obstacle_base_speed + self.rng.random_range(-jitter..=jitter)).max(1.0)
    }

    fn spawn_obstacle(&mut self) -> (u32, ObstacleKind) {
        let id = self.next_entity_id();
        self.obstacles_spawned += 1;
        let every = self.tuning.mine_every;
        let kind = if every > 0 && self.obstacles_spawned % every == 0 {
            ObstacleKind::Mine
        } else {
            ObstacleKind::Asteroid
        };

        let (radius, spin) = match kind {
            ObstacleKind::Asteroid => {
                let lo = self.tuning.asteroid_min_radius;
                let hi = self.tuning.asteroid_max_radius.max(lo);
                let max_spin = self.tuning.asteroid_max_spin.abs();
                (
                    self.rng.random_range(lo..=hi),
                    self.rng.random_range(-max_spin..=max_spin),
                )
            }
            ObstacleKind::Mine => (self.tuning.mine_radius, 0.0),
        };
        let edge = self.random_edge();
        let speed = self.drift_speed();
        let y = self
            .rng
            .random_range(radius..=(ARENA_HEIGHT - radius).max(radius));
        let rotation = self.rng.random_range(0.0..std::f32::consts::TAU);

        self.obstacles.push(Obstacle {
            id,
            kind,
            pos: Vec2::new(Self::entry_x(edge, radius), y),
            vel: Vec2::new(edge.direction() * speed, 0.0),
            radius,
            rotation,
            spin,
            entered_from: edge,
        });
        log::debug!("Spawned {:?} #{} from {:?}", kind, id, edge);
        (id, kind)
    }

    fn spawn_gate(&mut self) -> u32 {
        let id = self.next_entity_id();
        let half_extents = Vec2::new(self.tuning.gate_half_width, self.tuning.gate_half_height);
        let edge = self.random_edge();
        let speed = self.drift_speed();
        let y = self.rng.random_range(
            half_extents.y..=(ARENA_HEIGHT - half_extents.y).max(half_extents.y),
        );
        self.gates.push(Gate {
            id,
            pos: Vec2::new(Self::entry_x(edge, half_extents.x), y),
            vel: Vec2::new(edge.direction() * speed, 0.0),
            half_extents,
            entered_from: edge,
        });
        id
    }

    /// Apply this frame's contacts. Returns true if any rocket went down.
    fn resolve_collisions(
        &mut self,
        rules: &ModeRules,
        matches: &mut MatchController,
        events: &mut Vec<WorldEvent>,
    ) -> bool {
        let arena = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT);
        let mut eliminated = false;

        for i in 0..self.agents.len() {
            let side = self.agents[i].side;
            let contacts = rocket_contacts(&self.agents[i], arena, &self.obstacles, &self.gates);
            let mut lethal = None;

            for contact in contacts {
                match contact {
                    Contact::Gate { id } => {
                        if !rules.mode.is_time_attack() {
                            continue;
                        }
                        // First rocket through consumes the gate
                        let Some(index) = self.gates.iter().position(|g| g.id == id) else {
                            continue;
                        };
                        self.gates.remove(index);
                        matches.add_score(side, rules.scoring.gate_score);
                        matches.feedback_mut().impact(ImpactLevel::Light);
                        log::debug!("{:?} passed gate #{}", side, id);
                        events.push(WorldEvent::GatePassed { side, gate_id: id });
                    }
                    Contact::Obstacle { kind, normal, .. } => {
                        if kind == ObstacleKind::Mine {
                            let impulse = normal * self.tuning.mine_knockback;
                            self.agents[i].vel += impulse;
                            events.push(WorldEvent::Knockback { side, impulse });
                        }
                        lethal.get_or_insert(EliminationCause::Obstacle(kind));
                    }
                    Contact::WorldBoundary { .. } => {
                        lethal.get_or_insert(EliminationCause::WorldBoundary);
                    }
                }
            }

            let Some(cause) = lethal else { continue };
            // lives_per_player is not consulted: any lethal contact eliminates
            let level = if rules.one_hit {
                ImpactLevel::Heavy
            } else {
                ImpactLevel::Medium
            };
            matches.feedback_mut().impact(level);
            self.agents[i].kill();
            if rules.scoring.collision_penalty != 0 {
                matches.add_score(side, -rules.scoring.collision_penalty);
            }
            log::debug!("{:?} eliminated by {:?} at {:.2}s", side, cause, self.time);
            events.push(WorldEvent::Eliminated { side, cause });
            eliminated = true;
        }

        eliminated
    }

    /// Round result implied by which rockets are still alive
    pub fn round_outcome(&self) -> Option<RoundWinner> {
        let alive = |side| self.agent(side).is_some_and(|a| a.alive);
        if !self.mode.is_two_rocket() {
            return (!alive(Side::Left)).then_some(RoundWinner::Solo);
        }
        match (alive(Side::Left), alive(Side::Right)) {
            (false, false) => Some(RoundWinner::Tie),
            (false, true) => Some(RoundWinner::Right),
            (true, false) => Some(RoundWinner::Left),
            (true, true) => None,
        }
    }

    /// Place an obstacle directly (scripted setups)
    pub fn insert_obstacle(
        &mut self,
        kind: ObstacleKind,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        let entered_from = if vel.x < 0.0 { Edge::Right } else { Edge::Left };
        self.obstacles.push(Obstacle {
            id,
            kind,
            pos,
            vel,
            radius,
            rotation: 0.0,
            spin: 0.0,
            entered_from,
        });
        id
    }

    /// Place a gate directly (scripted setups)
    pub fn insert_gate(&mut self, pos: Vec2, vel: Vec2) -> u32 {
        let id = self.next_entity_id();
        let entered_from = if vel.x < 0.0 { Edge::Right } else { Edge::Left };
        self.gates.push(Gate {
            id,
            pos,
            vel,
            half_extents: Vec2::new(self.tuning.gate_half_width, self.tuning.gate_half_height),
            entered_from,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cosmetics::PaintPicker;
    use crate::feedback::{FeedbackEvent, RecordingFeedback};
    use crate::persistence::MemoryStore;

    const FRAME: f32 = 1.0 / 60.0;

    fn setup(mode: GameMode) -> (World, MatchController, RecordingFeedback) {
        let feedback = RecordingFeedback::new();
        let mut matches = MatchController::new(
            Box::new(MemoryStore::new()),
            Box::new(feedback.clone()),
            Box::new(PaintPicker::new(3)),
        );
        matches.start_match(mode);
        let mut world = World::new(42, WorldTuning::default());
        world.reset_round(mode);
        (world, matches, feedback)
    }

    /// Keep rockets hovering so only scripted contacts matter
    fn hover(world: &mut World) {
        for agent in &mut world.agents {
            agent.vel = Vec2::ZERO;
            agent.pos.y = ARENA_HEIGHT / 2.0;
        }
    }

    #[test]
    fn test_agents_per_mode() {
        for mode in GameMode::ALL {
            let mut world = World::new(1, WorldTuning::default());
            world.reset_round(mode);
            assert!(world.agent(Side::Left).is_some());
            assert_eq!(world.agent(Side::Right).is_some(), mode.is_two_rocket());
        }
    }

    #[test]
    fn test_no_step_unless_playing() {
        let (mut world, mut matches, _) = setup(GameMode::Duel);
        matches.pause_round();
        let before = world.agent(Side::Left).unwrap().pos;
        for _ in 0..120 {
            assert!(world.step(FRAME, &mut matches).is_empty());
        }
        assert_eq!(world.agent(Side::Left).unwrap().pos, before);
        assert!(world.obstacles().is_empty());
        assert_eq!(world.time(), 0.0);
    }

    #[test]
    fn test_input_ignored_unless_playing() {
        let (mut world, mut matches, _) = setup(GameMode::Duel);
        matches.pause_round();
        let dash = InputCommand::Dash { side: Side::Left, direction: 1.0 };
        assert_eq!(world.apply_input(dash, &mut matches), None);
        world.apply_input(InputCommand::Thrust { side: Side::Left, holding: true }, &mut matches);
        assert!(!world.agent(Side::Left).unwrap().touch_holding);
    }

    #[test]
    fn test_non_finite_dt_is_ignored() {
        let (mut world, mut matches, _) = setup(GameMode::Duel);
        world.step(FRAME, &mut matches);
        let left = world.agent(Side::Left).unwrap().pos;
        let right = world.agent(Side::Right).unwrap().pos;
        let time = world.time();

        for dt in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            assert!(world.step(dt, &mut matches).is_empty());
        }
        assert_eq!(world.agent(Side::Left).unwrap().pos, left);
        assert_eq!(world.agent(Side::Right).unwrap().pos, right);
        assert!(world.agents().iter().all(|a| a.alive));
        assert_eq!(world.time(), time);
        assert_eq!(matches.phase(), MatchPhase::Playing);

        // Next good frame carries on normally
        world.step(FRAME, &mut matches);
        assert!((world.time() - (time + FRAME)).abs() < 1e-6);
    }

    #[test]
    fn test_spawner_respects_interval_and_cap() {
        let (mut world, mut matches, _) = setup(GameMode::SoloSurvival);
        // 0.8s is under the 1.2s start interval
        for _ in 0..48 {
            hover(&mut world);
            world.step(FRAME, &mut matches);
        }
        assert!(world.obstacles().is_empty());

        for _ in 0..60 * 120 {
            hover(&mut world);
            world.obstacles.iter_mut().for_each(|o| o.vel = Vec2::ZERO);
            world.obstacles.iter_mut().for_each(|o| o.pos.y = -10.0);
            world.step(FRAME, &mut matches);
            assert!(world.obstacles().len() <= 11);
        }
        assert_eq!(world.obstacles().len(), 11);
    }

    #[test]
    fn test_every_fifth_obstacle_is_a_mine() {
        let (mut world, _, _) = setup(GameMode::Duel);
        let kinds: Vec<_> = (0..10).map(|_| world.spawn_obstacle().1).collect();
        for (i, kind) in kinds.iter().enumerate() {
            let expected = if (i + 1) % 5 == 0 {
                ObstacleKind::Mine
            } else {
                ObstacleKind::Asteroid
            };
            assert_eq!(*kind, expected);
        }
    }

    #[test]
    fn test_spawned_obstacles_enter_from_an_edge() {
        let (mut world, _, _) = setup(GameMode::Duel);
        let tuning = world.tuning().clone();
        for _ in 0..50 {
            world.spawn_obstacle();
        }
        for o in world.obstacles() {
            match o.entered_from {
                Edge::Left => assert!(o.pos.x < 0.0 && o.vel.x > 0.0),
                Edge::Right => assert!(o.pos.x > ARENA_WIDTH && o.vel.x < 0.0),
            }
            let speed = o.vel.x.abs();
            assert!(speed >= tuning.obstacle_base_speed - tuning.obstacle_speed_jitter);
            assert!(speed <= tuning.obstacle_base_speed + tuning.obstacle_speed_jitter);
            assert!(o.pos.y >= o.radius && o.pos.y <= ARENA_HEIGHT - o.radius);
        }
    }

    #[test]
    fn test_late_round_spawns_two() {
        let (mut world, matches, _) = setup(GameMode::Duel);
        let rules = *matches.rules();
        let mut events = Vec::new();
        world.run_spawner(1.0, 0.9, &rules, &mut events);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, WorldEvent::ObstacleSpawned { .. }))
            .count();
        assert_eq!(spawned, 2);

        let mut events = Vec::new();
        world.run_spawner(1.0, 0.5, &rules, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_time_attack_spawns_gate_with_obstacles() {
        let (mut world, matches, _) = setup(GameMode::TimeAttackSolo);
        let rules = *matches.rules();
        let mut events = Vec::new();
        world.run_spawner(1.0, 0.0, &rules, &mut events);
        assert_eq!(world.gates().len(), 1);
        assert!(events.contains(&WorldEvent::GateSpawned { id: world.gates()[0].id }));
    }

    #[test]
    fn test_gate_awards_score_without_elimination() {
        let (mut world, mut matches, feedback) = setup(GameMode::TimeAttackDuel);
        hover(&mut world);
        let pos = world.agent(Side::Right).unwrap().pos;
        world.insert_gate(pos, Vec2::ZERO);
        let events = world.step(FRAME, &mut matches);
        assert!(
            events
                .iter()
                .any(|e| matches!(e, WorldEvent::GatePassed { side: Side::Right, .. }))
        );
        assert_eq!(matches.state().right_score, 1);
        assert!(world.agent(Side::Right).unwrap().alive);
        assert!(world.gates().is_empty());
        assert_eq!(feedback.count(FeedbackEvent::Impact(ImpactLevel::Light)), 1);
    }

    #[test]
    fn test_boundary_eliminates() {
        let (mut world, mut matches, _) = setup(GameMode::SoloSurvival);
        world.agent_mut(Side::Left).unwrap().pos.y = 5.0;
        let events = world.step(FRAME, &mut matches);
        assert!(events.contains(&WorldEvent::Eliminated {
            side: Side::Left,
            cause: EliminationCause::WorldBoundary
        }));
        assert_eq!(matches.phase(), MatchPhase::Finished);
        assert_eq!(matches.state().last_round_winner, Some(RoundWinner::Solo));
    }

    #[test]
    fn test_mine_knocks_back_then_eliminates() {
        let (mut world, mut matches, feedback) = setup(GameMode::Duel);
        hover(&mut world);
        let pos = world.agent(Side::Left).unwrap().pos;
        world.insert_obstacle(ObstacleKind::Mine, pos + Vec2::new(10.0, 0.0), Vec2::ZERO, 15.0);
        let events = world.step(FRAME, &mut matches);

        let left = world.agent(Side::Left).unwrap();
        assert!(!left.alive);
        assert!(left.vel.x < 0.0);
        assert!(events.iter().any(|e| matches!(e, WorldEvent::Knockback { side: Side::Left, .. })));
        assert!(events.contains(&WorldEvent::RoundEnded { winner: RoundWinner::Right }));
        assert_eq!(matches.state().right_wins, 1);
        assert_eq!(feedback.count(FeedbackEvent::Impact(ImpactLevel::Medium)), 1);
    }

    #[test]
    fn test_one_hit_uses_heavy_impact() {
        let (mut world, mut matches, feedback) = setup(GameMode::SuddenDeath);
        hover(&mut world);
        let pos = world.agent(Side::Right).unwrap().pos;
        world.insert_obstacle(ObstacleKind::Asteroid, pos, Vec2::ZERO, 20.0);
        world.step(FRAME, &mut matches);
        assert!(!world.agent(Side::Right).unwrap().alive);
        assert_eq!(matches.state().last_round_winner, Some(RoundWinner::Left));
        assert_eq!(feedback.count(FeedbackEvent::Impact(ImpactLevel::Heavy)), 1);
    }

    #[test]
    fn test_simultaneous_elimination_is_tie() {
        let (mut world, mut matches, _) = setup(GameMode::Duel);
        hover(&mut world);
        for side in [Side::Left, Side::Right] {
            let pos = world.agent(side).unwrap().pos;
            world.insert_obstacle(ObstacleKind::Asteroid, pos, Vec2::ZERO, 20.0);
        }
        world.step(FRAME, &mut matches);
        assert_eq!(matches.state().last_round_winner, Some(RoundWinner::Tie));
        assert_eq!(matches.state().left_wins + matches.state().right_wins, 0);
    }

    #[test]
    fn test_dash_cooldown_in_world() {
        let (mut world, mut matches, feedback) = setup(GameMode::Duel);
        let dash = InputCommand::Dash { side: Side::Left, direction: 1.0 };
        assert_eq!(
            world.apply_input(dash, &mut matches),
            Some(WorldEvent::Dashed { side: Side::Left })
        );
        let mut accepted = 1;
        // 0.6s of frames: every attempt inside the cooldown fails
        for _ in 0..36 {
            hover(&mut world);
            world.step(FRAME, &mut matches);
            if world.apply_input(dash, &mut matches).is_some() {
                accepted += 1;
            }
        }
        assert_eq!(accepted, 1);
        for _ in 0..12 {
            hover(&mut world);
            world.step(FRAME, &mut matches);
        }
        assert!(world.apply_input(dash, &mut matches).is_some());
        assert_eq!(feedback.count(FeedbackEvent::Tap), 2);
    }

    #[test]
    fn test_dead_rocket_ignores_input() {
        let (mut world, mut matches, _) = setup(GameMode::Duel);
        world.agent_mut(Side::Right).unwrap().kill();
        let dash = InputCommand::Dash { side: Side::Right, direction: -1.0 };
        assert_eq!(world.apply_input(dash, &mut matches), None);
        world.apply_input(InputCommand::Thrust { side: Side::Right, holding: true }, &mut matches);
        assert!(!world.agent(Side::Right).unwrap().touch_holding);
    }

    #[test]
    fn test_untimed_progress_uses_elapsed_fallback() {
        let (world, mut matches, _) = setup(GameMode::SoloSurvival);
        assert_eq!(world.spawn_progress(matches.state()), 0.0);
        for _ in 0..900 {
            matches.tick_clock();
        }
        let p = world.spawn_progress(matches.state());
        assert!((p - 0.5).abs() < 1e-4);
    }
}
