//! Doggo Run Headless Simulator
//!
//! Plays a run with a scripted autopilot, logs milestones, then replays the
//! recording and checks that the final state hash matches.

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use doggo_run::{
    GameConfig, Phase, RawInput, Session, TICK_RATE, VERSION,
    game::{
        events::GameEventData,
        level::LevelId,
        player::BEAM_LENGTH,
    },
};

/// Environment variable overriding the tick budget.
const ENV_TICKS: &str = "DOGGO_RUN_SIM_TICKS";

/// Default run length: three minutes of play.
const DEFAULT_TICKS: u32 = 3 * 60 * TICK_RATE;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Doggo Run Simulator v{}", VERSION);

    let config = GameConfig::from_env().context("loading config")?;
    let ticks = match std::env::var(ENV_TICKS) {
        Ok(v) => v.parse::<u32>().with_context(|| format!("{ENV_TICKS}={v}"))?,
        Err(_) => DEFAULT_TICKS,
    };

    info!("Seed: {}", config.seed);
    info!("Tick Rate: {} Hz, budget {} ticks", config.physics.tick_rate, ticks);

    let session = run(&config, ticks);
    let hash = session.state_hash();

    info!("=== Run Results ===");
    info!("Score: {}", session.game().score);
    info!("Lives: {}", session.game().lives);
    info!("Difficulty: {}", session.game().level);
    info!("Frames: {}", session.frame());
    info!("Recorded deltas: {}", session.recording().delta_count());
    info!("Recording Hash: {}", hex::encode(session.recording().compute_hash()));
    info!("Final State Hash: {}", hex::encode(hash));

    // Verify determinism by replaying
    info!("=== Verifying Determinism ===");
    let replayed = Session::replay(&config, session.recording());
    let replay_hash = replayed.state_hash();
    info!("Replay State Hash: {}", hex::encode(replay_hash));

    if hash != replay_hash {
        bail!("determinism failure: replay hash differs");
    }
    if session.recording().compute_hash() != replayed.recording().compute_hash() {
        bail!("determinism failure: replay recorded different inputs");
    }
    info!("DETERMINISM VERIFIED: Hashes match!");
    Ok(())
}

/// Play up to `ticks` frames with the autopilot.
fn run(config: &GameConfig, ticks: u32) -> Session {
    let mut session = Session::new(config.clone());
    let mut last_report = 0;

    for t in 0..ticks {
        match session.phase() {
            Phase::LevelComplete { level: LevelId::One, .. } => {
                if let Err(e) = session.continue_to_next() {
                    warn!("Continue refused: {}", e);
                }
            }
            Phase::LevelComplete { .. } | Phase::GameOver => break,
            Phase::Playing | Phase::Paused => {}
        }

        let raw = autopilot(&session, t);
        for event in session.update(&raw) {
            log_event(&event.data);
        }

        // Report every 10 seconds
        if t - last_report >= 10 * TICK_RATE {
            let level = session.level();
            info!(
                "Tick {}: {} x={:.0} score={} food left={} enemies={}",
                t,
                level.id.name(),
                level.player.position().x,
                session.game().score,
                level.remaining_food(),
                level.living_enemies()
            );
            last_report = t;
        }
    }

    session
}

/// Run right, jump on a rhythm or when something is close ahead, fire the
/// beam when an enemy is in reach.
fn autopilot(session: &Session, t: u32) -> RawInput {
    let level = session.level();
    let player = level.player.position();

    let ahead = |reach: f32| {
        level.enemies.values().any(|e| {
            let dx = e.body.position.x - player.x;
            e.is_alive() && dx > 0.0 && dx < reach && (e.body.position.y - player.y).abs() < 60.0
        })
    };

    let stuck = level.player.body.blocked.right;
    RawInput {
        right: true,
        jump: (t % 50 < 12) || stuck || ahead(90.0),
        attack: t % 2 == 0 && ahead(BEAM_LENGTH),
        ..RawInput::default()
    }
}

fn log_event(data: &GameEventData) {
    match data {
        GameEventData::LevelStarted { level, attempt } => {
            info!("{} started (attempt {})", level.name(), attempt);
        }
        GameEventData::FoodCollected { food_id, is_final: true, .. } => {
            info!("Final food {} eaten", food_id);
        }
        GameEventData::EnemyHit { enemy_id, kind, cause, killed: true, points, .. } => {
            info!("Enemy {} ({:?}) down by {:?}, +{}", enemy_id, kind, cause, points);
        }
        GameEventData::PlayerHurt { enemy_id, health, .. } => {
            info!("Hurt by enemy {}, health {}", enemy_id, health);
        }
        GameEventData::LevelCleared { level, reason } => {
            info!("{} cleared ({:?})", level.name(), reason);
        }
        GameEventData::LifeLost { lives_left } => {
            info!("Life lost, {} left", lives_left);
        }
        GameEventData::GameOver { score } => {
            info!("Game over! Score: {}", score);
        }
        _ => {}
    }
}
