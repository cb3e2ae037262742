//! World view
//!
//! Draws the level owned by the simulation:
//! - the level is built from the session on every `LevelStarted`
//! - sprites copy their simulated bodies each frame
//! - effects react to gameplay events

use bevy::prelude::*;

use crate::AppState;

pub mod actors;
pub mod components;
pub mod visuals;
pub mod world;

pub use components::*;
pub use visuals::CameraFocus;

/// Draw order
pub mod z {
    pub const SKY: f32 = -100.0;
    pub const SCENERY: f32 = -50.0;
    pub const PLATFORM: f32 = 0.0;
    pub const GOAL: f32 = 5.0;
    pub const FOOD: f32 = 8.0;
    pub const ENEMY: f32 = 10.0;
    pub const PLAYER: f32 = 12.0;
    pub const EFFECT: f32 = 20.0;
    pub const TEXT: f32 = 30.0;
}

/// Colour from 0xRRGGBB
pub fn hex_color(rgb: u32) -> Color {
    Color::srgb_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

// ============================================================================
// GAME PLUGIN
// ============================================================================

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app
            // Resources
            .init_resource::<CameraShake>()
            .init_resource::<CameraFocus>()

            // Visuals follow the fixed-step simulation every frame
            .add_systems(Update, (
                world::rebuild_on_level_start,
                (
                    actors::sync_player,
                    actors::sync_enemies,
                    actors::sync_food,
                    actors::update_food_zoom,
                ),
                (
                    visuals::spawn_effects,
                    visuals::update_sparkles,
                    visuals::update_floating_text,
                    visuals::update_beams,
                    visuals::pulse_goal,
                ),
                (
                    visuals::camera_follow,
                    visuals::update_parallax,
                ).chain(),
            ).chain().run_if(in_state(AppState::InGame)))

            .add_systems(OnExit(AppState::InGame), world::cleanup_level);
    }
}
