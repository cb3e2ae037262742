//! # Doggo Run
//!
//! Deterministic gameplay simulation for Doggo Run, a side-scrolling
//! platformer about a dog eating its way through two levels.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      DOGGO RUN CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── geom.rs     - Vec2 and axis-aligned Rect                │
//! │  ├── rng.rs      - Seeded Xorshift128+ PRNG                  │
//! │  └── hash.rs     - State hashing for replay checks           │
//! │                                                              │
//! │  game/           - Gameplay                                  │
//! │  ├── input.rs    - Edge detection, recording                 │
//! │  ├── touch.rs    - Touch control layout and hit tests        │
//! │  ├── physics.rs  - Arcade bodies and AABB resolution         │
//! │  ├── player.rs   - The dog: run, jump, beam, health          │
//! │  ├── enemy.rs    - Enemy archetypes and AI                   │
//! │  ├── food.rs     - Collectibles                              │
//! │  ├── level.rs    - Level layouts and rules                   │
//! │  ├── state.rs    - Run progress and live level               │
//! │  ├── tick.rs     - One simulation step                       │
//! │  ├── events.rs   - Gameplay events and sound cues            │
//! │  ├── session.rs  - Scene flow, lives, replay                 │
//! │  └── hud.rs      - HUD model                                 │
//! │                                                              │
//! │  config.rs       - GameConfig (JSON + env)                   │
//! │  assets.rs       - Texture manifest, background stripping    │
//! │  error.rs        - Error types                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism
//!
//! Everything under `core/` and `game/` is a pure function of the run seed
//! and the recorded input:
//! - No HashMap (uses BTreeMap for sorted iteration)
//! - No system time; every step advances a fixed `1000 / tick_rate` ms
//! - All randomness from seeded Xorshift128+ streams
//!
//! Coordinates are y-down with the origin at the top-left of the world.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod assets;
pub mod config;
pub mod core;
pub mod error;
pub mod game;

// Re-export commonly used types
pub use config::GameConfig;
pub use core::geom::{Rect, Vec2};
pub use core::rng::DeterministicRng;
pub use error::{ConfigError, LevelError, SessionError};
pub use game::input::{InputFrame, InputRecording, RawInput};
pub use game::session::{Phase, Session, SessionCommand};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Simulation tick rate (Hz)
pub const TICK_RATE: u32 = 60;

/// Logical view width (px)
pub const VIEW_WIDTH: u32 = 1280;

/// Logical view height (px)
pub const VIEW_HEIGHT: u32 = 720;

/// World height shared by both levels (px)
pub const WORLD_HEIGHT: f32 = 720.0;

/// Downward acceleration (px/s²)
pub const GRAVITY: f32 = 1800.0;
