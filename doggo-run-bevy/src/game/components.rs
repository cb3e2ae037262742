//! Components and resources for the world view

use bevy::prelude::*;

// ============================================================================
// CAMERA
// ============================================================================

/// The world camera
#[derive(Component)]
pub struct MainCamera;

/// Screen shake after the player is hurt
#[derive(Resource, Default)]
pub struct CameraShake {
    pub remaining: f32,
    pub intensity: f32,
}

impl CameraShake {
    pub fn start(&mut self, duration: f32, intensity: f32) {
        self.remaining = duration;
        self.intensity = intensity;
    }
}

// ============================================================================
// LEVEL ENTITIES
// ============================================================================

/// Everything belonging to the current level; despawned on rebuild
#[derive(Component)]
pub struct LevelEntity;

/// The dog
#[derive(Component)]
pub struct PlayerSprite;

/// Sprite of the enemy with this id
#[derive(Component)]
pub struct EnemySprite {
    pub id: u32,
    /// Phase offset so enemies don't bob in sync
    pub bob_phase: f32,
}

/// Sprite of the food with this id
#[derive(Component)]
pub struct FoodSprite {
    pub id: u32,
}

/// Goal flag
#[derive(Component)]
pub struct GoalFlag;

/// Tiled sky layer that scrolls slower than the world
#[derive(Component)]
pub struct SkyLayer {
    pub factor: f32,
    pub width: f32,
}

/// Background scenery scrolled by a parallax factor
#[derive(Component)]
pub struct Scenery {
    pub factor: f32,
    pub base_x: f32,
}

// ============================================================================
// EFFECTS
// ============================================================================

/// Eaten food shrinking and fading out
#[derive(Component)]
pub struct FoodZoom {
    pub timer: Timer,
}

/// Gold dot flying out of eaten food
#[derive(Component)]
pub struct Sparkle {
    pub velocity: Vec2,
    pub timer: Timer,
}

/// Rising "+N" text
#[derive(Component)]
pub struct FloatingText {
    pub timer: Timer,
}

/// Flickering attack beam
#[derive(Component)]
pub struct BeamFlash {
    pub timer: Timer,
}
