//! Game Configuration
//!
//! Every field has a default matching the shipped game, so an empty JSON
//! object (or no config file at all) is a valid configuration.
//!
//! Lookup order for [`GameConfig::from_env`]:
//! 1. built-in defaults
//! 2. JSON file named by `DOGGO_RUN_CONFIG`
//! 3. `DOGGO_RUN_SEED`, `DOGGO_RUN_LEVEL`, `DOGGO_RUN_MUTED` overrides

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::game::level::LevelId;

/// Env var naming a JSON config file.
pub const ENV_CONFIG_PATH: &str = "DOGGO_RUN_CONFIG";
/// Env var overriding the run seed.
pub const ENV_SEED: &str = "DOGGO_RUN_SEED";
/// Env var overriding the start level (`1`, `2`, `one`, `two`).
pub const ENV_LEVEL: &str = "DOGGO_RUN_LEVEL";
/// Env var overriding the mute flag (`1`/`true`/`0`/`false`).
pub const ENV_MUTED: &str = "DOGGO_RUN_MUTED";

/// Default run seed.
pub const DEFAULT_SEED: u64 = 0x0D06_6000;

/// Logical view size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// View width in pixels
    pub width: u32,
    /// View height in pixels
    pub height: u32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self { width: crate::VIEW_WIDTH, height: crate::VIEW_HEIGHT }
    }
}

/// Arcade physics settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration (pixels/s²)
    pub gravity: f32,
    /// Simulation steps per second
    pub tick_rate: u32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: crate::GRAVITY,
            tick_rate: crate::TICK_RATE,
        }
    }
}

/// When to show on-screen touch controls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchMode {
    /// Show once a touch is seen
    #[default]
    Auto,
    /// Always show
    Always,
    /// Never show
    Never,
}

/// Replace a built-in level with a JSON layout file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelOverride {
    /// Level to replace
    pub level: LevelId,
    /// Path to the layout JSON
    pub path: PathBuf,
}

/// Top-level game configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Window title
    pub title: String,
    /// Logical view size
    pub view: ViewConfig,
    /// Physics settings
    pub physics: PhysicsConfig,
    /// Run seed for all gameplay randomness
    pub seed: u64,
    /// Level the session starts on
    pub start_level: LevelId,
    /// Lives before game over
    pub starting_lives: u32,
    /// Hearts per life
    pub max_health: u32,
    /// Start muted
    pub muted: bool,
    /// Touch control visibility
    pub touch_controls: TouchMode,
    /// Show the input/physics debug text
    pub debug_overlay: bool,
    /// Directory the client loads textures from
    pub asset_dir: String,
    /// Layout files replacing built-in levels
    pub level_overrides: Vec<LevelOverride>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: "Doggo Run".to_string(),
            view: ViewConfig::default(),
            physics: PhysicsConfig::default(),
            seed: DEFAULT_SEED,
            start_level: LevelId::One,
            starting_lives: 3,
            max_health: 3,
            muted: false,
            touch_controls: TouchMode::Auto,
            debug_overlay: false,
            asset_dir: "assets".to_string(),
            level_overrides: Vec::new(),
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a JSON file and validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Build a config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply seed/level/mute overrides from a key lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = seed
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("{ENV_SEED} is not a u64: {seed}")))?;
            debug!("Seed override: {}", self.seed);
        }

        if let Some(level) = lookup(ENV_LEVEL) {
            self.start_level = match level.trim().to_ascii_lowercase().as_str() {
                "1" | "one" => LevelId::One,
                "2" | "two" => LevelId::Two,
                other => {
                    return Err(ConfigError::Invalid(format!("{ENV_LEVEL} must be 1 or 2, got {other}")))
                }
            };
            debug!("Start level override: {:?}", self.start_level);
        }

        if let Some(muted) = lookup(ENV_MUTED) {
            self.muted = match muted.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                other => {
                    return Err(ConfigError::Invalid(format!("{ENV_MUTED} must be a boolean, got {other}")))
                }
            };
        }

        Ok(())
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physics.tick_rate == 0 {
            return Err(ConfigError::Invalid("tick_rate must be positive".into()));
        }
        if self.physics.gravity.is_nan() || self.physics.gravity <= 0.0 {
            return Err(ConfigError::Invalid("gravity must be positive".into()));
        }
        if self.max_health == 0 {
            return Err(ConfigError::Invalid("max_health must be at least 1".into()));
        }
        if self.starting_lives == 0 {
            return Err(ConfigError::Invalid("starting_lives must be at least 1".into()));
        }
        let ViewConfig { width, height } = self.view;
        if !(320..=2560).contains(&width) || !(180..=1440).contains(&height) {
            return Err(ConfigError::Invalid(format!(
                "view {width}x{height} outside 320x180..2560x1440"
            )));
        }
        Ok(())
    }

    /// Length of one simulation step in milliseconds.
    #[inline]
    pub fn tick_ms(&self) -> f32 {
        1000.0 / self.physics.tick_rate as f32
    }

    /// Layout override for a level, if configured.
    pub fn override_for(&self, level: LevelId) -> Option<&Path> {
        self.level_overrides
            .iter()
            .find(|o| o.level == level)
            .map(|o| o.path.as_path())
    }
}

// =============================================================================
// TESTS
// =============================================================================
