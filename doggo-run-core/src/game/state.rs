//! Game State Definitions
//!
//! [`GameState`] is the run-wide progress the HUD shows (score, hearts,
//! lives, difficulty). [`LevelState`] is the live world for one attempt at
//! one level. Uses BTreeMap for deterministic iteration order.

use std::collections::BTreeMap;
use serde::{Serialize, Deserialize};

use crate::config::GameConfig;
use crate::core::geom::{Rect, Vec2};
use crate::core::rng::DeterministicRng;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::game::enemy::Enemy;
use crate::game::events::{ClearReason, GameEvent};
use crate::game::food::DogFood;
use crate::game::level::{Goal, LevelId, LevelLayout, LevelRules};
use crate::game::physics::WorldBounds;
use crate::game::player::Player;

/// Offset separating the AI random stream from the layout stream.
const AI_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

// =============================================================================
// RUN PROGRESS
// =============================================================================

/// Run-wide progress shared by every level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    /// Accumulated score
    pub score: u32,
    /// Current hearts
    pub health: u32,
    /// Hearts per life
    pub max_health: u32,
    /// Difficulty level, starting at 1
    pub level: u32,
    /// Lives remaining
    pub lives: u32,
    /// Lives at the start of a run
    pub starting_lives: u32,
    /// Simulated play time (ms)
    pub time_ms: f64,
    /// Paused by the player
    pub is_paused: bool,
    /// Sound off
    pub is_muted: bool,
}

impl GameState {
    /// Fresh run state.
    pub fn new(config: &GameConfig) -> Self {
        Self {
            score: 0,
            health: config.max_health,
            max_health: config.max_health,
            level: 1,
            lives: config.starting_lives,
            starting_lives: config.starting_lives,
            time_ms: 0.0,
            is_paused: false,
            is_muted: config.muted,
        }
    }

    /// Back to a fresh run, keeping the mute preference.
    pub fn reset(&mut self) {
        self.score = 0;
        self.health = self.max_health;
        self.level = 1;
        self.lives = self.starting_lives;
        self.time_ms = 0.0;
        self.is_paused = false;
    }

    /// Add points.
    #[inline]
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }
}

// =============================================================================
// LIVE LEVEL
// =============================================================================

/// Complete state of one level attempt.
///
/// Uses BTreeMap for deterministic iteration order.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LevelState {
    /// Which level
    pub id: LevelId,

    /// Level rules
    pub rules: LevelRules,

    /// World limits
    pub bounds: WorldBounds,

    /// Downward acceleration (pixels/s²)
    pub gravity: f32,

    /// Seed the level was built from
    pub seed: u64,

    /// AI random stream
    pub rng: DeterministicRng,

    /// Current tick
    pub tick: u32,

    /// Level time (ms)
    pub elapsed_ms: f32,

    /// The dog
    pub player: Player,

    /// Enemies by id (BTreeMap for deterministic iteration)
    pub enemies: BTreeMap<u32, Enemy>,

    /// Food by id
    pub foods: BTreeMap<u32, DogFood>,

    /// Ground first, then platforms
    pub solids: Vec<Rect>,

    /// Goal flag
    pub goal: Option<Goal>,

    /// Set once when the level is cleared
    pub cleared: Option<ClearReason>,

    /// Events generated this tick (cleared each tick)
    #[serde(skip)]
    pub pending_events: Vec<GameEvent>,
}

impl LevelState {
    /// Build the live world from a layout.
    ///
    /// Enemies are scaled for `difficulty`; the player starts with `health`.
    pub fn new(
        layout: &LevelLayout,
        seed: u64,
        difficulty: u32,
        health: u32,
        max_health: u32,
        gravity: f32,
    ) -> Self {
        let enemies = layout
            .enemies
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let id = i as u32;
                let mut enemy = Enemy::new(id, spawn.kind, Vec2::new(spawn.x, spawn.y), spawn.stationary);
                enemy.apply_difficulty(difficulty);
                (id, enemy)
            })
            .collect();

        let foods = layout
            .foods
            .iter()
            .enumerate()
            .map(|(i, spawn)| {
                let id = i as u32;
                (id, DogFood::new(id, Vec2::new(spawn.x, spawn.y), spawn.scale, spawn.is_final))
            })
            .collect();

        Self {
            id: layout.id,
            rules: layout.rules,
            bounds: WorldBounds { width: layout.world_width, height: layout.world_height },
            gravity,
            seed,
            rng: DeterministicRng::new(seed.wrapping_add(AI_STREAM_SALT)),
            tick: 0,
            elapsed_ms: 0.0,
            player: Player::new(layout.player_start, health, max_health),
            enemies,
            foods,
            solids: layout.solids(),
            goal: layout.goal,
            cleared: None,
            pending_events: Vec::new(),
        }
    }

    /// Food not yet eaten.
    pub fn remaining_food(&self) -> usize {
        self.foods.values().filter(|f| !f.collected).count()
    }

    /// Enemies not yet killed.
    pub fn living_enemies(&self) -> usize {
        self.enemies.values().filter(|e| e.is_alive()).count()
    }

    /// Check if the level has been cleared.
    #[inline]
    pub fn is_cleared(&self) -> bool {
        self.cleared.is_some()
    }

    /// Compute hash of current state for verification.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, self.seed, |hasher| {
            hasher.update_u8(self.id.number());
            self.player.hash_into(hasher);

            for enemy in self.enemies.values() {
                enemy.hash_into(hasher);
            }

            for food in self.foods.values() {
                food.hash_into(hasher);
            }

            hasher.update_bool(self.cleared.is_some());
        })
    }

    /// Take pending events (consumes them).
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Push a game event.
    pub fn push_event(&mut self, event: GameEvent) {
        self.pending_events.push(event);
    }
}

// =============================================================================
// TESTS
// =============================================================================
