//! Rocket Duel headless runner
//!
//! Plays one full series with both rockets on autopilot at a simulated
//! 60 fps and logs every round result plus the stored records. The browser
//! build enters through `platform::web` instead.
//!
//! Usage: `rocket-duel [duel|solo|time-attack|time-attack-duel|sudden-death]`
//! with the store path taken from `ROCKET_DUEL_STORE`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use rocket_duel::GameSession;
    use rocket_duel::cosmetics::PaintPicker;
    use rocket_duel::feedback::{LogFeedback, Throttled};
    use rocket_duel::persistence::{JsonFileStore, KeyValueStore, MemoryStore};
    use rocket_duel::platform::{SystemClock, entropy_seed};
    use rocket_duel::sim::{GameMode, MatchPhase, Side};
    use rocket_duel::tuning::WorldTuning;

    const FRAME_DT: f32 = 1.0 / 60.0;
    /// Give up after 30 simulated minutes (a good bot can survive forever)
    const MAX_FRAMES: u64 = 60 * 60 * 30;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mode = match std::env::args().nth(1) {
        Some(arg) => GameMode::from_str(&arg).unwrap_or_else(|| {
            log::warn!("Unknown mode '{}', playing {}", arg, GameMode::Duel.as_str());
            GameMode::Duel
        }),
        None => GameMode::Duel,
    };

    let path =
        std::env::var("ROCKET_DUEL_STORE").unwrap_or_else(|_| "rocket_duel_store.json".to_string());
    let store: Box<dyn KeyValueStore> = match JsonFileStore::open(&path) {
        Ok(store) => Box::new(store),
        Err(e) => {
            log::warn!("{}; records will not be saved", e);
            Box::new(MemoryStore::new())
        }
    };

    let seed = entropy_seed();
    log::info!("Rocket Duel (headless) starting, seed {:#x}", seed);

    let mut session = GameSession::new(
        store,
        Box::new(Throttled::new(LogFeedback, SystemClock::new())),
        Box::new(PaintPicker::new(seed)),
        seed,
        WorldTuning::default(),
    );
    session.set_autopilot(Side::Left, true);
    session.set_autopilot(Side::Right, true);
    let updates = session.subscribe();

    session.start_match(mode);
    let mut frames = 0u64;
    loop {
        session.pump(FRAME_DT);
        frames += 1;

        for snapshot in updates.try_iter() {
            if snapshot.state.phase == MatchPhase::Finished {
                log::info!(
                    "Round {}: {:?} after {:.2}s (score {}-{})",
                    snapshot.state.round_index + 1,
                    snapshot.state.last_round_winner,
                    snapshot.state.round_time_elapsed,
                    snapshot.state.left_score,
                    snapshot.state.right_score
                );
            }
        }

        if session.state().phase == MatchPhase::Finished {
            if session.snapshot().series_complete {
                break;
            }
            session.next_round_or_end_series();
        }
        if frames >= MAX_FRAMES {
            log::warn!("Stopping after {} frames without a result", frames);
            break;
        }
    }

    let result = session.snapshot();
    log::info!(
        "Series over: {:?} ({}-{} in {} round(s))",
        result.match_winner,
        result.state.left_wins,
        result.state.right_wins,
        result.state.round_index + 1
    );
    log::info!(
        "Records: best survival {:.2}s, best time attack {}",
        result.state.best.survival_secs,
        result.state.best.time_attack_score
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point is `platform::web::start`
}
