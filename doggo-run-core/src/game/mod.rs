//! Game Logic Module
//!
//! All gameplay simulation code. Deterministic for a given seed and input.
//!
//! ## Module Structure
//!
//! - `input`: Input capture, edge detection, recording
//! - `touch`: On-screen touch controls
//! - `physics`: Arcade bodies and collision resolution
//! - `player`, `enemy`, `food`: Entities
//! - `level`: Level layouts and per-level rules
//! - `state`: Run progress and the live level
//! - `tick`: One simulation step
//! - `events`: Game events and sound cues
//! - `session`: Scene flow, lives and replay
//! - `hud`: HUD model

pub mod input;
pub mod touch;
pub mod physics;
pub mod player;
pub mod enemy;
pub mod food;
pub mod level;
pub mod state;
pub mod tick;
pub mod events;
pub mod session;
pub mod hud;

// Re-export key types
pub use input::{InputController, InputFrame, InputRecording, InputState, RawInput};
pub use level::{LevelId, LevelLayout, LevelRules};
pub use state::{GameState, LevelState};
pub use tick::{tick, TickResult};
pub use events::{GameEvent, GameEventData, SoundCue};
pub use session::{Phase, Session, SessionCommand};
pub use hud::HudModel;
