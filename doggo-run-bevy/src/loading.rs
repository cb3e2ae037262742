//! Boot and loading screens
//!
//! Boot shows the title on a dark screen for a second. Loading pulls in the
//! manifest textures with a progress bar, strips near-white backgrounds,
//! substitutes solid colour squares for anything missing and then enters
//! the game.

use std::collections::HashMap;

use bevy::asset::{LoadState, RenderAssetUsages};
use bevy::prelude::*;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};

use doggo_run::assets::{self, AssetEntry, LoadProgress, MANIFEST};

use crate::AppState;

/// Seconds the boot screen stays up
const BOOT_SECS: f32 = 1.0;
/// Seconds between load completion and the first level
const START_DELAY_SECS: f32 = 1.0;

pub struct LoadingPlugin;

impl Plugin for LoadingPlugin {
    fn build(&self, app: &mut App) {
        app
            .init_resource::<GameTextures>()
            .add_systems(OnEnter(AppState::Boot), setup_boot)
            .add_systems(Update, boot_timer.run_if(in_state(AppState::Boot)))
            .add_systems(OnEnter(AppState::Loading), start_loading)
            .add_systems(Update, (
                track_loading,
                update_loading_ui,
            ).chain().run_if(in_state(AppState::Loading)))
            .add_systems(OnExit(AppState::Loading), cleanup_loading);
    }
}

// ============================================================================
// RESOURCES
// ============================================================================

/// Texture handles by manifest key
#[derive(Resource, Default)]
pub struct GameTextures {
    handles: HashMap<&'static str, Handle<Image>>,
}

impl GameTextures {
    /// Handle for a key (default handle if the key is unknown)
    pub fn get(&self, key: &str) -> Handle<Image> {
        self.handles.get(key).cloned().unwrap_or_default()
    }
}

#[derive(Resource)]
struct LoadingTracker {
    pending: Vec<(&'static AssetEntry, Handle<Image>)>,
    progress: LoadProgress,
    start_timer: Option<Timer>,
}

#[derive(Resource)]
struct BootTimer(Timer);

// ============================================================================
// UI MARKERS
// ============================================================================

#[derive(Component)]
struct BootUI;

#[derive(Component)]
struct LoadingUI;

#[derive(Component)]
struct LoadingBar;

#[derive(Component)]
struct PercentText;

#[derive(Component)]
struct StatusText;

// ============================================================================
// BOOT
// ============================================================================

fn setup_boot(mut commands: Commands) {
    commands.insert_resource(BootTimer(Timer::from_seconds(BOOT_SECS, TimerMode::Once)));

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgb_u8(0x0e, 0x11, 0x16)),
        BootUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new("Doggo Run"),
            TextFont {
                font_size: 48.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    });
}

fn boot_timer(
    mut commands: Commands,
    time: Res<Time>,
    mut timer: ResMut<BootTimer>,
    ui: Query<Entity, With<BootUI>>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if timer.0.tick(time.delta()).just_finished() {
        for entity in ui.iter() {
            commands.entity(entity).despawn_recursive();
        }
        commands.remove_resource::<BootTimer>();
        next_state.set(AppState::Loading);
    }
}

// ============================================================================
// LOADING
// ============================================================================

fn start_loading(mut commands: Commands, asset_server: Res<AssetServer>) {
    let pending: Vec<_> = MANIFEST
        .iter()
        .filter_map(|entry| {
            entry.file.map(|file| {
                debug!("Loading {} from {}", entry.key, file);
                (entry, asset_server.load::<Image>(file))
            })
        })
        .collect();

    commands.insert_resource(LoadingTracker {
        progress: LoadProgress::new(pending.len()),
        pending,
        start_timer: None,
    });

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            flex_direction: FlexDirection::Column,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgb_u8(0x0e, 0x11, 0x16)),
        LoadingUI,
    )).with_children(|parent| {
        parent.spawn((
            Text::new("Doggo Run"),
            TextFont {
                font_size: 48.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                margin: UiRect::bottom(Val::Px(50.0)),
                ..default()
            },
        ));

        // Progress box with bar and percent on top
        parent.spawn((
            Node {
                width: Val::Px(320.0),
                height: Val::Px(50.0),
                padding: UiRect::axes(Val::Px(10.0), Val::Px(10.0)),
                justify_content: JustifyContent::FlexStart,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb_u8(0x22, 0x22, 0x22)),
        )).with_children(|bar_box| {
            bar_box.spawn((
                Node {
                    width: Val::Percent(0.0),
                    height: Val::Percent(100.0),
                    ..default()
                },
                BackgroundColor(Color::srgb_u8(0x4c, 0xaf, 0x50)),
                LoadingBar,
            ));
            bar_box.spawn((
                Text::new("0%"),
                TextFont {
                    font_size: 18.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    position_type: PositionType::Absolute,
                    left: Val::Px(145.0),
                    ..default()
                },
                PercentText,
            ));
        });

        parent.spawn((
            Text::new("Loading..."),
            TextFont {
                font_size: 20.0,
                ..default()
            },
            TextColor(Color::WHITE),
            Node {
                margin: UiRect::top(Val::Px(25.0)),
                ..default()
            },
            StatusText,
        ));
    });
}

/// Settle finished loads, trim their backgrounds and build fallbacks.
fn track_loading(
    mut commands: Commands,
    time: Res<Time>,
    asset_server: Res<AssetServer>,
    mut images: ResMut<Assets<Image>>,
    mut tracker: ResMut<LoadingTracker>,
    mut textures: ResMut<GameTextures>,
    mut next_state: ResMut<NextState<AppState>>,
    loading_ui: Query<Entity, With<LoadingUI>>,
) {
    let tracker = &mut *tracker;

    if let Some(timer) = tracker.start_timer.as_mut() {
        if timer.tick(time.delta()).just_finished() {
            next_state.set(AppState::InGame);
        }
        return;
    }

    let mut still_pending = Vec::with_capacity(tracker.pending.len());
    for (entry, handle) in tracker.pending.drain(..) {
        match asset_server.get_load_state(&handle) {
            Some(LoadState::Loaded) => {
                if let Some(image) = images.get_mut(&handle) {
                    trim_image(entry.key, image);
                }
                info!("Loaded texture {}", entry.key);
                textures.handles.insert(entry.key, handle);
                tracker.progress.loaded();
            }
            Some(LoadState::Failed(err)) => {
                warn!("Failed to load {}: {}", entry.key, err);
                tracker.progress.failed(entry.key);
            }
            _ => still_pending.push((entry, handle)),
        }
    }
    tracker.pending = still_pending;

    if !tracker.progress.is_complete() {
        return;
    }

    // Generated textures and anything that failed get a solid square
    for entry in MANIFEST.iter() {
        if !textures.handles.contains_key(entry.key) {
            textures.handles.insert(entry.key, images.add(fallback_image(entry)));
            debug!("Created fallback texture for {}", entry.key);
        }
    }

    if !tracker.progress.missing.is_empty() {
        warn!("Missing assets: {:?}", tracker.progress.missing);
        if let Ok(root) = loading_ui.get_single() {
            commands.entity(root).with_children(|parent| {
                parent.spawn((
                    Text::new("MISSING TEXTURES - Check console"),
                    TextFont {
                        font_size: 16.0,
                        ..default()
                    },
                    TextColor(Color::srgb_u8(0xff, 0x44, 0x44)),
                    Node {
                        margin: UiRect::top(Val::Px(25.0)),
                        ..default()
                    },
                ));
            });
        }
    }

    tracker.start_timer = Some(Timer::from_seconds(START_DELAY_SECS, TimerMode::Once));
}

/// Strip near-white backgrounds from RGBA8 images.
fn trim_image(key: &str, image: &mut Image) {
    if !matches!(
        image.texture_descriptor.format,
        TextureFormat::Rgba8UnormSrgb | TextureFormat::Rgba8Unorm
    ) {
        return;
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    if assets::trim_background(&mut image.data, width, height) {
        info!("Applied background transparency to {}", key);
    }
}

fn fallback_image(entry: &AssetEntry) -> Image {
    let size = Extent3d {
        width: entry.fallback_size,
        height: entry.fallback_size,
        depth_or_array_layers: 1,
    };
    Image::new(
        size,
        TextureDimension::D2,
        assets::fallback_pixels(entry),
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::default(),
    )
}

fn update_loading_ui(
    tracker: Res<LoadingTracker>,
    mut bar: Query<&mut Node, With<LoadingBar>>,
    mut percent: Query<&mut Text, (With<PercentText>, Without<StatusText>)>,
    mut status: Query<&mut Text, (With<StatusText>, Without<PercentText>)>,
) {
    let progress = &tracker.progress;

    if let Ok(mut node) = bar.get_single_mut() {
        node.width = Val::Percent(progress.fraction() * 100.0);
    }
    if let Ok(mut text) = percent.get_single_mut() {
        **text = progress.percent_text();
    }
    if let Ok(mut text) = status.get_single_mut() {
        **text = match tracker.pending.first() {
            _ if progress.is_complete() => "Complete!".to_string(),
            Some((entry, _)) => format!("Loading: {}", entry.key),
            None => "Loading...".to_string(),
        };
    }
}

fn cleanup_loading(mut commands: Commands, query: Query<Entity, With<LoadingUI>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
    commands.remove_resource::<LoadingTracker>();
}
