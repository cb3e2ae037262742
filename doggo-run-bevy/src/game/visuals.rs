//! Visual effects - camera, parallax and event particles

use std::f32::consts::{PI, TAU};

use bevy::prelude::*;

use doggo_run::game::level::parallax_offset;
use doggo_run::game::GameEventData;

use super::components::*;
use super::z;
use crate::sim::{SimEvent, SimSession};
use crate::{to_bevy, Config};

/// Hurt shake length in seconds
const SHAKE_SECS: f32 = 0.2;
/// Hurt shake strength as a fraction of the view width
const SHAKE_INTENSITY: f32 = 0.01;
/// Seconds the beam stays on screen
const BEAM_SECS: f32 = 0.6;
/// One beam flicker cycle in seconds
const BEAM_FLICKER_SECS: f32 = 0.2;
/// Floating text rise in pixels
const FLOAT_RISE: f32 = 50.0;

const GOLD: Color = Color::srgb(1.0, 0.843, 0.0);

// ============================================================================
// CAMERA FOLLOW
// ============================================================================

/// Camera center before shake; `None` snaps to the player next frame
#[derive(Resource, Default)]
pub struct CameraFocus {
    pub center: Option<Vec2>,
}

/// Camera follows the dog with lerp and deadzone, clamped to the world
pub fn camera_follow(
    time: Res<Time>,
    config: Res<Config>,
    session: Res<SimSession>,
    mut focus: ResMut<CameraFocus>,
    mut shake: ResMut<CameraShake>,
    mut camera_query: Query<&mut Transform, With<MainCamera>>,
) {
    let Ok(mut camera_transform) = camera_query.get_single_mut() else {
        return;
    };

    let layout = session.0.layout();
    let view = Vec2::new(config.0.view.width as f32, config.0.view.height as f32);
    let target = to_bevy(session.0.level().player.position(), 0.0).truncate();

    let center = match focus.center {
        None => target,
        Some(current) => {
            // Only chase the part of the offset outside the deadzone
            let mut desired = current;
            if let Some(dz) = layout.camera.deadzone {
                let half = Vec2::new(dz.x, dz.y) * 0.5;
                let offset = target - current;
                desired += offset - offset.clamp(-half, half);
            } else {
                desired = target;
            }

            // Per-frame lerp made frame-rate independent
            let t = 1.0 - (1.0 - layout.camera.lerp).powf(time.delta_secs() * 60.0);
            current.lerp(desired, t)
        }
    };

    let min = view * 0.5;
    let max = Vec2::new(layout.world_width, layout.world_height) - view * 0.5;
    let center = center.clamp(min, max.max(min));
    focus.center = Some(center);

    let mut offset = Vec2::ZERO;
    if shake.remaining > 0.0 {
        shake.remaining -= time.delta_secs();
        let amount = shake.intensity * view.x;
        offset = Vec2::new(
            (rand::random::<f32>() * 2.0 - 1.0) * amount,
            (rand::random::<f32>() * 2.0 - 1.0) * amount,
        );
    }

    camera_transform.translation.x = center.x + offset.x;
    camera_transform.translation.y = center.y + offset.y;
}

/// Scroll sky layers and scenery slower than the camera
pub fn update_parallax(
    config: Res<Config>,
    camera_query: Query<&Transform, With<MainCamera>>,
    mut sky: Query<(&SkyLayer, &mut Transform), (Without<MainCamera>, Without<Scenery>)>,
    mut scenery: Query<(&Scenery, &mut Transform), (Without<MainCamera>, Without<SkyLayer>)>,
) {
    let Ok(camera) = camera_query.get_single() else {
        return;
    };
    let left = camera.translation.x - config.0.view.width as f32 * 0.5;

    for (layer, mut transform) in sky.iter_mut() {
        transform.translation.x = left - parallax_offset(left, layer.factor) + layer.width * 0.5;
    }
    for (item, mut transform) in scenery.iter_mut() {
        transform.translation.x = item.base_x + left - parallax_offset(left, item.factor);
    }
}

/// Goal flag breathes horizontally
pub fn pulse_goal(time: Res<Time>, mut query: Query<&mut Transform, With<GoalFlag>>) {
    let wave = 0.5 - 0.5 * (time.elapsed_secs() * PI).cos();
    for mut transform in query.iter_mut() {
        transform.scale.x = 1.0 + 0.1 * wave;
    }
}

// ============================================================================
// EVENT EFFECTS
// ============================================================================

/// Spawn effects for gameplay events
pub fn spawn_effects(
    mut commands: Commands,
    mut events: EventReader<SimEvent>,
    mut shake: ResMut<CameraShake>,
) {
    for SimEvent(event) in events.read() {
        match &event.data {
            GameEventData::FoodCollected { position, points, .. } => {
                let at = to_bevy(*position, z::EFFECT);
                spawn_sparkles(&mut commands, at);
                spawn_floating_text(&mut commands, at, format!("+{points}"), GOLD);
            }
            GameEventData::EnemyHit { position, points, killed: true, .. } => {
                spawn_floating_text(
                    &mut commands,
                    to_bevy(*position, z::EFFECT),
                    format!("+{points}"),
                    Color::WHITE,
                );
            }
            GameEventData::BeamFired { beam } => {
                let size = beam.size();
                commands.spawn((
                    Sprite {
                        color: Color::srgba(1.0, 1.0, 0.0, 0.8),
                        custom_size: Some(Vec2::new(size.x, size.y)),
                        ..default()
                    },
                    Transform::from_translation(to_bevy(beam.center(), z::EFFECT)),
                    BeamFlash { timer: Timer::from_seconds(BEAM_SECS, TimerMode::Once) },
                    LevelEntity,
                ));
            }
            GameEventData::PlayerHurt { .. } => {
                shake.start(SHAKE_SECS, SHAKE_INTENSITY);
            }
            _ => {}
        }
    }
}

/// Six gold dots flying outward
fn spawn_sparkles(commands: &mut Commands, at: Vec3) {
    let count = 6;
    for i in 0..count {
        let angle = (i as f32 / count as f32) * TAU;
        let distance = 30.0 + rand::random::<f32>() * 20.0;
        let secs = 0.4 + rand::random::<f32>() * 0.2;
        // Eased motion covers exactly `distance` over the lifetime
        let velocity = Vec2::new(angle.cos(), angle.sin()) * distance / secs;

        commands.spawn((
            Sparkle {
                velocity,
                timer: Timer::from_seconds(secs, TimerMode::Once),
            },
            Sprite {
                color: GOLD,
                custom_size: Some(Vec2::splat(6.0)),
                ..default()
            },
            Transform::from_translation(at),
            LevelEntity,
        ));
    }
}

fn spawn_floating_text(commands: &mut Commands, at: Vec3, text: String, color: Color) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(color),
        Transform::from_translation(at.with_z(z::TEXT)),
        FloatingText { timer: Timer::from_seconds(1.0, TimerMode::Once) },
        LevelEntity,
    ));
}

/// Move, fade and shrink sparkles
pub fn update_sparkles(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Sparkle, &mut Transform, &mut Sprite)>,
) {
    let dt = time.delta_secs();

    for (entity, mut sparkle, mut transform, mut sprite) in query.iter_mut() {
        if sparkle.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn();
            continue;
        }

        let progress = sparkle.timer.fraction();
        let step = sparkle.velocity * dt * 2.0 * (1.0 - progress);
        transform.translation.x += step.x;
        transform.translation.y += step.y;
        transform.scale = Vec3::splat(1.0 - 0.5 * progress);
        sprite.color = sprite.color.with_alpha(1.0 - progress);
    }
}

/// Rise and fade floating text
pub fn update_floating_text(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FloatingText, &mut Transform, &mut TextColor)>,
) {
    let dt = time.delta_secs();

    for (entity, mut text, mut transform, mut color) in query.iter_mut() {
        if text.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }

        let progress = text.timer.fraction();
        let duration = text.timer.duration().as_secs_f32();
        transform.translation.y += FLOAT_RISE / duration * dt * 2.0 * (1.0 - progress);
        color.0 = color.0.with_alpha(1.0 - progress);
    }
}

/// Flicker the beam between 0.8 and 0.2 alpha
pub fn update_beams(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut BeamFlash, &mut Sprite)>,
) {
    for (entity, mut beam, mut sprite) in query.iter_mut() {
        if beam.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn();
            continue;
        }
        let cycle = beam.timer.elapsed_secs() / BEAM_FLICKER_SECS * TAU;
        sprite.color = sprite.color.with_alpha(0.5 + 0.3 * cycle.cos());
    }
}
