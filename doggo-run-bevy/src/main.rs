//! Doggo Run - side-scrolling platformer client
//!
//! Renders the deterministic simulation from `doggo-run-core` with Bevy.
//! The session steps in `FixedUpdate`; everything visual follows it in
//! `Update`.

mod game;
mod loading;
mod sim;
mod ui;

use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::render::camera::ScalingMode;
use bevy::window::WindowMode;

use doggo_run::{GameConfig, WORLD_HEIGHT};
use game::GamePlugin;
use loading::LoadingPlugin;
use sim::SimPlugin;
use ui::UiPlugin;

/// Top-level app states
#[derive(States, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum AppState {
    #[default]
    Boot,
    Loading,
    InGame,
}

/// Mirrors the session phase while in game
#[derive(SubStates, Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
#[source(AppState = AppState::InGame)]
pub enum PlayPhase {
    #[default]
    Running,
    Paused,
    LevelComplete,
    GameOver,
}

/// Loaded game configuration
#[derive(Resource, Clone)]
pub struct Config(pub GameConfig);

/// Map a simulation point (y down) to a Bevy position (y up).
pub fn to_bevy(p: doggo_run::Vec2, z: f32) -> Vec3 {
    Vec3::new(p.x, WORLD_HEIGHT - p.y, z)
}

fn main() {
    let config = match GameConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error, using defaults: {e}");
            GameConfig::default()
        }
    };

    App::new()
        // Bevy defaults with custom window; core logs share the pipeline
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: config.title.clone(),
                        resolution: (config.view.width as f32, config.view.height as f32).into(),
                        mode: WindowMode::Windowed,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu=error,naga=warn,doggo_run=info".into(),
                    ..default()
                })
                .set(AssetPlugin {
                    file_path: config.asset_dir.clone(),
                    ..default()
                })
                .set(ImagePlugin::default_nearest()),
        )
        .insert_resource(Time::<Fixed>::from_hz(f64::from(config.physics.tick_rate)))
        .insert_resource(Config(config))
        // Game state
        .init_state::<AppState>()
        .add_sub_state::<PlayPhase>()
        // Our plugins
        .add_plugins((
            LoadingPlugin,
            SimPlugin,
            GamePlugin,
            UiPlugin,
        ))
        // Startup
        .add_systems(Startup, setup_2d_camera)
        .run();
}

/// 2D camera showing the whole world height
fn setup_2d_camera(mut commands: Commands, config: Res<Config>) {
    let view = config.0.view;
    commands.spawn((
        Camera2d,
        Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb_u8(0x0e, 0x11, 0x16)),
            ..default()
        },
        OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical { viewport_height: view.height as f32 },
            near: -1000.0,
            far: 1000.0,
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(view.width as f32 * 0.5, view.height as f32 * 0.5, 0.0),
        game::MainCamera,
    ));

    info!("Doggo Run v{} initialized", doggo_run::VERSION);
}
