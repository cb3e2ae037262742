//! Level Composition
//!
//! A [`LevelLayout`] is everything needed to build a playable level:
//! world size, solids, spawns, the goal, background decoration and the
//! per-level rules. Level 1 is a hand-authored table; Level 2 is generated
//! from the level seed. Either can be replaced by a JSON layout file.
//!
//! All platform rectangles are top-left based; spawn points, the goal and
//! decorations are centers.

use std::path::Path;
use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::core::geom::{Rect, Vec2};
use crate::core::rng::DeterministicRng;
use crate::error::LevelError;
use crate::game::enemy::EnemyKind;

/// Tint applied to the ground strip.
pub const GROUND_TINT: u32 = 0x4e342e;
/// Tint applied to floating platforms.
pub const PLATFORM_TINT: u32 = 0x6d4c41;
/// Goal flag size.
pub const GOAL_SIZE: Vec2 = Vec2::new(64.0, 96.0);

// =============================================================================
// IDS AND RULES
// =============================================================================

/// Built-in level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelId {
    /// The long hand-authored run
    #[default]
    One,
    /// The procedural gauntlet
    Two,
}

impl LevelId {
    /// Numeric id (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            LevelId::One => 1,
            LevelId::Two => 2,
        }
    }

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            LevelId::One => "Level 1",
            LevelId::Two => "Level 2",
        }
    }

    /// Level that follows a cleared one.
    pub fn next(self) -> Option<LevelId> {
        match self {
            LevelId::One => Some(LevelId::Two),
            LevelId::Two => None,
        }
    }
}

/// Reset applied when the player sinks below the ground.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroundSafety {
    /// Player center y that triggers the reset
    pub threshold_y: f32,
    /// Center y the player is moved back to
    pub reset_y: f32,
}

/// Gameplay rules that differ between levels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelRules {
    /// Landing on an enemy damages it instead of the player
    pub stomp_enabled: bool,
    /// Touching the goal flag clears the level
    pub goal_wins: bool,
    /// Eating every food item clears the level
    pub clear_all_wins: bool,
    /// Points added when the level is cleared
    pub completion_bonus: u32,
    /// Simulation freezes behind the completion overlay
    pub pause_on_complete: bool,
    /// Anti-clipping reset below the ground
    pub ground_safety: Option<GroundSafety>,
}

impl Default for LevelRules {
    fn default() -> Self {
        Self {
            stomp_enabled: true,
            goal_wins: true,
            clear_all_wins: true,
            completion_bonus: 0,
            pause_on_complete: false,
            ground_safety: None,
        }
    }
}

// =============================================================================
// LAYOUT TYPES
// =============================================================================

/// Enemy spawn point (sprite center).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Archetype
    pub kind: EnemyKind,
    /// Spawn as an immovable obstacle
    #[serde(default)]
    pub stationary: bool,
}

/// Food spawn point (center).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodSpawn {
    /// X
    pub x: f32,
    /// Y
    pub y: f32,
    /// Display scale
    #[serde(default = "default_scale")]
    pub scale: f32,
    /// Eating it ends the level
    #[serde(default)]
    pub is_final: bool,
}

fn default_scale() -> f32 {
    1.0
}

fn default_world_height() -> f32 {
    crate::WORLD_HEIGHT
}

/// Goal flag (center).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// Center
    pub position: Vec2,
    /// Flag colour as 0xRRGGBB
    pub color: u32,
}

impl Goal {
    /// Overlap area.
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, GOAL_SIZE)
    }
}

/// A tiled sky layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParallaxLayer {
    /// Texture key
    pub texture: String,
    /// Fraction of camera movement applied
    pub scroll_factor: f32,
}

/// Background scenery drawn as simple shapes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decoration {
    /// Filled ellipse
    Hill {
        /// Ellipse center
        center: Vec2,
        /// Ellipse width and height
        size: Vec2,
        /// Fill colour
        color: u32,
    },
    /// Five-puff cloud
    Cloud {
        /// Cloud center
        center: Vec2,
        /// Size multiplier
        scale: f32,
    },
    /// Red-capped mushroom
    Mushroom {
        /// Cap center
        center: Vec2,
    },
}

/// Parallax background description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Background {
    /// Sky layers, back to front
    pub layers: Vec<ParallaxLayer>,
    /// Scroll factor shared by all decorations
    pub decoration_scroll: f32,
    /// Scenery
    pub decorations: Vec<Decoration>,
}

impl Default for Background {
    fn default() -> Self {
        Self {
            layers: sky_layers(0.1, 0.3),
            decoration_scroll: 0.4,
            decorations: Vec::new(),
        }
    }
}

/// Camera follow settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraSettings {
    /// Follow interpolation per frame
    pub lerp: f32,
    /// Area around the view center the target may move in freely
    pub deadzone: Option<Vec2>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self { lerp: 0.1, deadzone: None }
    }
}

/// Complete description of a level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelLayout {
    /// Which level this is
    pub id: LevelId,
    /// Display name
    pub name: String,
    /// World width in pixels
    pub world_width: f32,
    /// World height in pixels
    #[serde(default = "default_world_height")]
    pub world_height: f32,
    /// Player spawn before the half-height lift
    pub player_start: Vec2,
    /// Ground strip
    pub ground: Rect,
    /// Floating platforms
    #[serde(default)]
    pub platforms: Vec<Rect>,
    /// Enemy spawns
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    /// Food spawns
    #[serde(default)]
    pub foods: Vec<FoodSpawn>,
    /// Goal flag
    #[serde(default)]
    pub goal: Option<Goal>,
    /// Parallax background
    #[serde(default)]
    pub background: Background,
    /// Camera follow
    #[serde(default)]
    pub camera: CameraSettings,
    /// Level rules
    #[serde(default)]
    pub rules: LevelRules,
}

impl LevelLayout {
    /// Build a built-in layout. `seed` drives every random choice.
    pub fn for_level(id: LevelId, seed: u64) -> Self {
        let mut rng = DeterministicRng::new(seed);
        let layout = match id {
            LevelId::One => level_one(&mut rng),
            LevelId::Two => level_two(&mut rng),
        };
        debug!(
            "Built {}: {} platforms, {} enemies, {} food",
            layout.name,
            layout.platforms.len(),
            layout.enemies.len(),
            layout.foods.len()
        );
        layout
    }

    /// Layout for `id` honoring the config's overrides.
    ///
    /// A broken override file is logged and the built-in layout is used.
    pub fn resolve(config: &GameConfig, id: LevelId, seed: u64) -> Self {
        if let Some(path) = config.override_for(id) {
            match Self::load(path) {
                Ok(mut layout) => {
                    layout.id = id;
                    return layout;
                }
                Err(e) => warn!("Ignoring level override {}: {}", path.display(), e),
            }
        }
        Self::for_level(id, seed)
    }

    /// Parse and validate a JSON layout.
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let layout: LevelLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    /// Load and validate a JSON layout file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LevelError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| LevelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::from_json(&json)?;
        info!("Loaded level layout {} from {}", layout.name, path.display());
        Ok(layout)
    }

    /// Reject layouts that cannot be played.
    pub fn validate(&self) -> Result<(), LevelError> {
        let invalid = |msg: String| Err(LevelError::Invalid(msg));

        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return invalid(format!("world size {}x{} must be positive", self.world_width, self.world_height));
        }
        if !(self.ground.w > 0.0 && self.ground.h > 0.0) {
            return invalid("level has no ground".into());
        }

        let inside = |x: f32, y: f32| (0.0..=self.world_width).contains(&x) && (0.0..=self.world_height).contains(&y);
        if !inside(self.player_start.x, self.player_start.y) {
            return invalid(format!("player start {:?} outside the world", self.player_start));
        }
        if let Some(e) = self.enemies.iter().find(|e| !inside(e.x, e.y)) {
            return invalid(format!("enemy at ({}, {}) outside the world", e.x, e.y));
        }
        if let Some(f) = self.foods.iter().find(|f| !inside(f.x, f.y)) {
            return invalid(format!("food at ({}, {}) outside the world", f.x, f.y));
        }
        if let Some(f) = self.foods.iter().find(|f| !(f.scale > 0.0)) {
            return invalid(format!("food at ({}, {}) has scale {}", f.x, f.y, f.scale));
        }

        let finals = self.foods.iter().filter(|f| f.is_final).count();
        if finals > 1 {
            return invalid(format!("{finals} final food items, at most one allowed"));
        }
        if !self.rules.goal_wins && !self.rules.clear_all_wins && finals == 0 {
            return invalid("level can never be cleared".into());
        }

        Ok(())
    }

    /// Every static rectangle bodies collide with, ground first.
    pub fn solids(&self) -> Vec<Rect> {
        let mut solids = Vec::with_capacity(self.platforms.len() + 1);
        solids.push(self.ground);
        solids.extend_from_slice(&self.platforms);
        solids
    }
}

/// Horizontal scroll of a layer drawn with `factor` for a camera at `camera_x`.
#[inline]
pub fn parallax_offset(camera_x: f32, factor: f32) -> f32 {
    camera_x * factor
}

fn sky_layers(back: f32, front: f32) -> Vec<ParallaxLayer> {
    vec![
        ParallaxLayer { texture: "bg-layer1".into(), scroll_factor: back },
        ParallaxLayer { texture: "bg-layer2".into(), scroll_factor: front },
    ]
}

// =============================================================================
// DECORATION PLANS
// =============================================================================

struct HillRow {
    start: u32,
    step: u32,
    size: Vec2,
    color: u32,
}

struct CloudRow {
    start: u32,
    step: u32,
    base_y: f32,
    modulo: u32,
    divisor: f32,
    scale: f32,
}

struct DecorationPlan {
    hills: [HillRow; 2],
    clouds: [CloudRow; 2],
    mushrooms: (u32, u32),
}

const HILL_Y: f32 = 620.0;
const MUSHROOM_Y: f32 = 560.0;
const HILL_GREEN: u32 = 0x4caf50;
const HILL_LIGHT_GREEN: u32 = 0x66bb6a;

fn decorations(plan: &DecorationPlan, world_width: f32) -> Vec<Decoration> {
    let end = world_width as u32;
    let mut out = Vec::new();

    for row in &plan.hills {
        out.extend((row.start..end).step_by(row.step as usize).map(|x| Decoration::Hill {
            center: Vec2::new(x as f32, HILL_Y),
            size: row.size,
            color: row.color,
        }));
    }
    for row in &plan.clouds {
        out.extend((row.start..end).step_by(row.step as usize).map(|x| Decoration::Cloud {
            center: Vec2::new(x as f32, row.base_y + (x % row.modulo) as f32 / row.divisor),
            scale: row.scale,
        }));
    }
    let (start, step) = plan.mushrooms;
    out.extend((start..end).step_by(step as usize).map(|x| Decoration::Mushroom {
        center: Vec2::new(x as f32, MUSHROOM_Y),
    }));

    out
}

// =============================================================================
// LEVEL 1
// =============================================================================

const LEVEL_ONE_WIDTH: f32 = 25_000.0;
const LEVEL_ONE_STATIONARY_CHANCE: f32 = 0.4;
const LEVEL_ONE_FINAL_FOOD_SCALE: f32 = 1.83;

const W: EnemyKind = EnemyKind::Walker;
const J: EnemyKind = EnemyKind::Jumper;
const C: EnemyKind = EnemyKind::Chaser;
const T: EnemyKind = EnemyKind::Tank;

/// Opening stretch, placed by hand.
const LEVEL_ONE_OPENING: [(f32, f32, EnemyKind); 8] = [
    (1000.0, 500.0, W),
    (1500.0, 500.0, W),
    (2000.0, 450.0, J),
    (2500.0, 500.0, W),
    (3000.0, 450.0, J),
    (3500.0, 500.0, C),
    (4000.0, 450.0, W),
    (4500.0, 500.0, J),
];

/// Second stretch: irregular spacing, spawn heights alternate.
const LEVEL_ONE_SECOND: [(f32, EnemyKind); 11] = [
    (5500.0, C),
    (6000.0, T),
    (6300.0, W),
    (6800.0, J),
    (7200.0, C),
    (7600.0, W),
    (8000.0, T),
    (8400.0, J),
    (8800.0, C),
    (9200.0, W),
    (9600.0, T),
];

/// Evenly spaced stretches: (first x, spacing, kinds).
const LEVEL_ONE_DENSE: [(f32, f32, &[EnemyKind]); 3] = [
    (10_500.0, 300.0, &[C, T, J, C, T, W, C, T, J, C, T, W, C, T, J]),
    (
        15_200.0,
        200.0,
        &[T, C, T, J, C, T, W, C, T, J, C, T, W, C, T, J, C, T, W, C, T, J, C, T],
    ),
    (
        20_100.0,
        150.0,
        &[
            T, C, T, J, C, T, W, C, T, J, C, T, W, C, T, J, C, T, W, C, T, J, C, T, W, C, T, J, C, T,
        ],
    ),
];

/// Platform heights for the first stretch, then a repeating cycle.
const LEVEL_ONE_OPENING_HEIGHTS: [f32; 8] = [520.0, 430.0, 380.0, 330.0, 430.0, 480.0, 380.0, 330.0];
const LEVEL_ONE_HEIGHT_CYCLE: [f32; 4] = [480.0, 380.0, 430.0, 330.0];

fn alternating_y(index: usize) -> f32 {
    if index % 2 == 0 { 500.0 } else { 450.0 }
}

fn level_one(rng: &mut DeterministicRng) -> LevelLayout {
    let mut spawns: Vec<(f32, f32, EnemyKind)> = LEVEL_ONE_OPENING.to_vec();
    spawns.extend(
        LEVEL_ONE_SECOND
            .iter()
            .enumerate()
            .map(|(i, &(x, kind))| (x, alternating_y(i), kind)),
    );
    for (start, step, kinds) in LEVEL_ONE_DENSE {
        spawns.extend(
            kinds
                .iter()
                .enumerate()
                .map(|(i, &kind)| (start + step * i as f32, alternating_y(i), kind)),
        );
    }

    let enemies = spawns
        .into_iter()
        .map(|(x, y, kind)| EnemySpawn {
            x,
            y,
            kind,
            stationary: rng.chance(LEVEL_ONE_STATIONARY_CHANCE),
        })
        .collect();

    // Food: two early bowls, alternating rows every 500 px, one near the end
    let mut foods = vec![food(800.0, 450.0), food(1200.0, 400.0)];
    for k in 1..=23u32 {
        foods.push(food((k * 1000 + 800) as f32, 350.0));
        foods.push(food(((k + 1) * 1000 + 200) as f32, 400.0));
    }
    foods.push(food(24_600.0, 450.0));
    foods.sort_by(|a, b| a.x.total_cmp(&b.x));

    let goal = Goal { position: Vec2::new(24_700.0, 500.0), color: 0xffd700 };
    foods.push(FoodSpawn {
        x: goal.position.x - 80.0,
        y: goal.position.y - 120.0,
        scale: LEVEL_ONE_FINAL_FOOD_SCALE,
        is_final: true,
    });

    let platforms = (0..81u32)
        .map(|i| {
            let x = 300.0 + 300.0 * i as f32;
            let y = match LEVEL_ONE_OPENING_HEIGHTS.get(i as usize) {
                Some(&y) => y,
                None => LEVEL_ONE_HEIGHT_CYCLE[(i as usize - LEVEL_ONE_OPENING_HEIGHTS.len()) % 4],
            };
            let w = if i == 1 { 200.0 } else { 220.0 };
            Rect::new(x, y, w, 34.0)
        })
        .collect();

    let plan = DecorationPlan {
        hills: [
            HillRow { start: 200, step: 600, size: Vec2::new(420.0, 180.0), color: HILL_GREEN },
            HillRow { start: 500, step: 700, size: Vec2::new(300.0, 140.0), color: HILL_LIGHT_GREEN },
        ],
        clouds: [
            CloudRow { start: 150, step: 450, base_y: 160.0, modulo: 900, divisor: 10.0, scale: 1.0 },
            CloudRow { start: 350, step: 650, base_y: 110.0, modulo: 600, divisor: 15.0, scale: 0.8 },
        ],
        mushrooms: (250, 800),
    };

    LevelLayout {
        id: LevelId::One,
        name: LevelId::One.name().to_string(),
        world_width: LEVEL_ONE_WIDTH,
        world_height: crate::WORLD_HEIGHT,
        player_start: Vec2::new(100.0, 380.0),
        ground: Rect::new(0.0, 620.0, LEVEL_ONE_WIDTH, 90.0),
        platforms,
        enemies,
        foods,
        goal: Some(goal),
        background: Background {
            layers: sky_layers(0.1, 0.3),
            decoration_scroll: 0.4,
            decorations: decorations(&plan, LEVEL_ONE_WIDTH),
        },
        camera: CameraSettings { lerp: 0.12, deadzone: Some(Vec2::new(120.0, 80.0)) },
        rules: LevelRules::default(),
    }
}

fn food(x: f32, y: f32) -> FoodSpawn {
    FoodSpawn { x, y, scale: 1.0, is_final: false }
}

// =============================================================================
// LEVEL 2
// =============================================================================

const LEVEL_TWO_WIDTH: f32 = 6000.0;
const LEVEL_TWO_FINAL_FOOD_SCALE: f32 = 2.0;

fn level_two(rng: &mut DeterministicRng) -> LevelLayout {
    let end = LEVEL_TWO_WIDTH as u32;
    let mut platforms = Vec::new();
    let mut p = |x: u32, y: f32, w: f32| platforms.push(Rect::new(x as f32, y, w, 34.0));

    // Early: gentle steps
    for i in (600..1500u32).step_by(400) {
        p(i, 500.0, 200.0);
        p(i + 180, 420.0, 180.0);
        if i % 800 == 0 {
            p(i + 250, 340.0, 160.0);
        }
    }

    // Middle: stacked pairs and random narrow ledges
    for i in (1500..3500u32).step_by(350) {
        let base_y = 480.0;
        p(i, base_y - if i % 1000 == 0 { 100.0 } else { 0.0 }, 200.0);
        p(i + 150, base_y - 80.0 - if i % 1500 == 0 { 120.0 } else { 0.0 }, 160.0);
        if i % 700 == 0 {
            p(i + 100, base_y - 160.0, 140.0);
            p(i + 250, base_y - 200.0, 120.0);
        }
        if rng.next_f32() > 0.7 {
            let y = base_y - rng.next_f32() * 150.0;
            p(i + 300, y, 100.0);
        }
    }

    // Final: multi-level climbing
    for i in (3500..end - 600).step_by(300) {
        let base_y = 450.0;
        p(i, base_y - if i % 800 == 0 { 150.0 } else { 50.0 }, 200.0);
        p(i + 120, base_y - 120.0 - if i % 1200 == 0 { 100.0 } else { 0.0 }, 140.0);
        if i % 600 == 0 {
            p(i + 50, base_y - 220.0, 100.0);
            p(i + 200, base_y - 280.0, 100.0);
            p(i + 350, base_y - 180.0, 120.0);
        }
        if i % 900 == 0 {
            p(i + 250, base_y - 320.0, 80.0);
        }
    }

    // Food rows: ground, platform, high
    let mut foods = Vec::new();
    for i in (300..5800u32).step_by(400) {
        foods.push(food(i as f32, 500.0 - if i % 1000 == 0 { 100.0 } else { 0.0 }));
    }
    for i in (800..5600u32).step_by(600) {
        foods.push(food(i as f32, 350.0 - if i % 1500 == 0 { 120.0 } else { 0.0 }));
    }
    for i in (1200..5400u32).step_by(800) {
        foods.push(food(i as f32, 250.0 - rng.next_f32() * 50.0));
    }

    // Enemies: three sections of rising density plus platform enemies
    let mut enemies = Vec::new();
    for i in (900..2000u32).step_by(300) {
        enemies.push(ground_enemy(rng, i, 0.2));
    }
    for i in (2000..4000u32).step_by(250) {
        enemies.push(ground_enemy(rng, i, 0.3));
        if i % 500 == 0 && rng.next_f32() < 0.6 {
            enemies.push(EnemySpawn { x: i as f32, y: 400.0, kind: EnemyKind::Jumper, stationary: false });
        }
    }
    for i in (4000..5800u32).step_by(200) {
        enemies.push(ground_enemy(rng, i, 0.4));
        if i % 400 == 0 {
            let kind = if rng.next_f32() < 0.5 { EnemyKind::Chaser } else { EnemyKind::Tank };
            enemies.push(EnemySpawn { x: (i + 100) as f32, y: 350.0, kind, stationary: false });
        }
    }

    let goal = Goal { position: Vec2::new(LEVEL_TWO_WIDTH - 100.0, 520.0), color: 0x00bcd4 };
    foods.push(FoodSpawn {
        x: LEVEL_TWO_WIDTH - 160.0,
        y: 400.0,
        scale: LEVEL_TWO_FINAL_FOOD_SCALE,
        is_final: true,
    });

    let plan = DecorationPlan {
        hills: [
            HillRow { start: 300, step: 700, size: Vec2::new(480.0, 200.0), color: HILL_GREEN },
            HillRow { start: 600, step: 900, size: Vec2::new(360.0, 160.0), color: HILL_LIGHT_GREEN },
        ],
        clouds: [
            CloudRow { start: 250, step: 500, base_y: 140.0, modulo: 800, divisor: 12.0, scale: 1.0 },
            CloudRow { start: 500, step: 650, base_y: 100.0, modulo: 600, divisor: 18.0, scale: 0.85 },
        ],
        mushrooms: (400, 900),
    };

    LevelLayout {
        id: LevelId::Two,
        name: LevelId::Two.name().to_string(),
        world_width: LEVEL_TWO_WIDTH,
        world_height: crate::WORLD_HEIGHT,
        player_start: Vec2::new(100.0, 400.0),
        ground: Rect::new(0.0, 600.0, LEVEL_TWO_WIDTH, 120.0),
        platforms,
        enemies,
        foods,
        goal: Some(goal),
        background: Background {
            layers: sky_layers(0.15, 0.35),
            decoration_scroll: 0.45,
            decorations: decorations(&plan, LEVEL_TWO_WIDTH),
        },
        camera: CameraSettings { lerp: 0.1, deadzone: None },
        rules: LevelRules {
            stomp_enabled: false,
            goal_wins: false,
            clear_all_wins: false,
            completion_bonus: 100,
            pause_on_complete: true,
            ground_safety: Some(GroundSafety { threshold_y: 650.0, reset_y: 640.0 }),
        },
    }
}

fn ground_enemy(rng: &mut DeterministicRng, x: u32, stationary_chance: f32) -> EnemySpawn {
    let kind = EnemyKind::random(rng);
    EnemySpawn {
        x: x as f32,
        y: 520.0,
        kind,
        stationary: rng.chance(stationary_chance),
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use crate::config::LevelOverride;

    #[test]
    fn test_level_one_contents() {
        let layout = LevelLayout::for_level(LevelId::One, 1);

        assert_eq!(layout.world_width, 25_000.0);
        assert_eq!(layout.ground, Rect::new(0.0, 620.0, 25_000.0, 90.0));
        assert_eq!(layout.platforms.len(), 81);
        assert_eq!(layout.enemies.len(), 88);
        assert_eq!(layout.foods.len(), 50);
        assert_eq!(layout.foods.iter().filter(|f| f.is_final).count(), 1);
        assert_eq!(layout.goal.map(|g| g.position), Some(Vec2::new(24_700.0, 500.0)));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_level_one_platform_heights() {
        let layout = LevelLayout::for_level(LevelId::One, 1);
        let at = |x: f32| layout.platforms.iter().find(|p| p.x == x).copied();

        assert_eq!(at(300.0), Some(Rect::new(300.0, 520.0, 220.0, 34.0)));
        assert_eq!(at(600.0), Some(Rect::new(600.0, 430.0, 200.0, 34.0)));
        assert_eq!(at(2400.0).map(|p| p.y), Some(330.0));
        assert_eq!(at(2700.0).map(|p| p.y), Some(480.0));
        assert_eq!(at(3600.0).map(|p| p.y), Some(330.0));
        assert_eq!(at(24_300.0).map(|p| p.y), Some(480.0));
    }

    #[test]
    fn test_level_one_enemy_sections() {
        let layout = LevelLayout::for_level(LevelId::One, 1);
        let first = layout.enemies[0];
        assert_eq!((first.x, first.y, first.kind), (1000.0, 500.0, EnemyKind::Walker));

        let last = layout.enemies[87];
        assert_eq!((last.x, last.y, last.kind), (24_450.0, 450.0, EnemyKind::Tank));

        let tanks = layout.enemies.iter().filter(|e| e.kind == EnemyKind::Tank).count();
        assert_eq!(tanks, 3 + 5 + 9 + 11);
    }

    #[test]
    fn test_level_one_final_food() {
        let layout = LevelLayout::for_level(LevelId::One, 1);
        let last = layout.foods.last().copied().unwrap();
        assert!(last.is_final);
        assert_eq!((last.x, last.y), (24_620.0, 380.0));
        assert_eq!(last.scale, 1.83);
    }

    #[test]
    fn test_stationary_share_is_seeded() {
        let a = LevelLayout::for_level(LevelId::One, 99);
        let b = LevelLayout::for_level(LevelId::One, 99);
        assert_eq!(a, b);

        let stationary = a.enemies.iter().filter(|e| e.stationary).count();
        assert!((15..=60).contains(&stationary), "stationary {stationary}");
    }

    #[test]
    fn test_level_two_structure() {
        let layout = LevelLayout::for_level(LevelId::Two, 5);

        assert_eq!(layout.world_width, 6000.0);
        assert_eq!(layout.ground, Rect::new(0.0, 600.0, 6000.0, 120.0));
        assert_eq!(layout.foods.len(), 14 + 8 + 6 + 1);
        assert!((32..=38).contains(&layout.platforms.len()));
        assert!((26..=30).contains(&layout.enemies.len()));
        assert!(layout.platforms.iter().all(|p| p.right() <= 6000.0 && p.y > 0.0));
        assert!(!layout.rules.stomp_enabled);
        assert_eq!(layout.rules.completion_bonus, 100);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_level_two_depends_on_seed() {
        assert_eq!(LevelLayout::for_level(LevelId::Two, 7), LevelLayout::for_level(LevelId::Two, 7));
        assert_ne!(LevelLayout::for_level(LevelId::Two, 7), LevelLayout::for_level(LevelId::Two, 8));
    }

    #[test]
    fn test_level_two_final_food_and_goal() {
        let layout = LevelLayout::for_level(LevelId::Two, 5);
        let final_food = layout.foods.iter().find(|f| f.is_final).copied().unwrap();
        assert_eq!((final_food.x, final_food.y, final_food.scale), (5840.0, 400.0, 2.0));
        assert_eq!(layout.goal.map(|g| g.color), Some(0x00bcd4));
    }

    #[test]
    fn test_decorations_span_world() {
        let layout = LevelLayout::for_level(LevelId::Two, 5);
        let mushrooms: Vec<f32> = layout
            .background
            .decorations
            .iter()
            .filter_map(|d| match d {
                Decoration::Mushroom { center } => Some(center.x),
                _ => None,
            })
            .collect();
        assert_eq!(mushrooms, vec![400.0, 1300.0, 2200.0, 3100.0, 4000.0, 4900.0, 5800.0]);

        let first_cloud = layout.background.decorations.iter().find_map(|d| match d {
            Decoration::Cloud { center, .. } => Some(*center),
            _ => None,
        });
        assert_eq!(first_cloud, Some(Vec2::new(250.0, 140.0 + 250.0 / 12.0)));
    }

    #[test]
    fn test_parallax_offset() {
        assert_eq!(parallax_offset(1000.0, 0.1), 100.0);
        assert_eq!(parallax_offset(0.0, 0.45), 0.0);
    }

    #[test]
    fn test_json_layout() {
        let json = r#"{
            "id": "one",
            "name": "Backyard",
            "world_width": 2000,
            "player_start": { "x": 100, "y": 400 },
            "ground": { "x": 0, "y": 620, "w": 2000, "h": 100 },
            "enemies": [ { "x": 500, "y": 500, "kind": "chaser" } ],
            "foods": [ { "x": 300, "y": 400 }, { "x": 1900, "y": 400, "scale": 2.0, "is_final": true } ]
        }"#;

        let layout = LevelLayout::from_json(json).unwrap();
        assert_eq!(layout.world_height, 720.0);
        assert_eq!(layout.enemies[0].kind, EnemyKind::Chaser);
        assert!(!layout.enemies[0].stationary);
        assert_eq!(layout.foods[0].scale, 1.0);
        assert!(layout.rules.stomp_enabled);
        assert!(layout.goal.is_none());
    }

    #[test]
    fn test_validate_rejects_broken_layouts() {
        let good = LevelLayout::for_level(LevelId::One, 1);

        let mut no_ground = good.clone();
        no_ground.ground.w = 0.0;
        assert!(matches!(no_ground.validate(), Err(LevelError::Invalid(_))));

        let mut two_finals = good.clone();
        two_finals.foods[0].is_final = true;
        assert!(two_finals.validate().is_err());

        let mut outside = good.clone();
        outside.enemies[0].x = 30_000.0;
        assert!(outside.validate().is_err());

        let mut zero_width = good;
        zero_width.world_width = 0.0;
        assert!(zero_width.validate().is_err());
    }

    #[test]
    fn test_resolve_falls_back_on_bad_override() {
        let mut config = GameConfig::default();
        config.level_overrides.push(LevelOverride {
            level: LevelId::Two,
            path: PathBuf::from("/no/such/level.json"),
        });

        let layout = LevelLayout::resolve(&config, LevelId::Two, 3);
        assert_eq!(layout, LevelLayout::for_level(LevelId::Two, 3));
    }

    #[test]
    fn test_solids_include_ground_first() {
        let layout = LevelLayout::for_level(LevelId::One, 1);
        let solids = layout.solids();
        assert_eq!(solids.len(), 82);
        assert_eq!(solids[0], layout.ground);
    }
}
