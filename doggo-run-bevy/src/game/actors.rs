//! Sprite sync - copies the simulated bodies onto their sprites every frame

use bevy::prelude::*;

use doggo_run::game::player::Facing;

use super::components::*;
use super::{hex_color, z};
use crate::sim::SimSession;
use crate::to_bevy;

/// Enemy idle bob amplitude in pixels
const BOB_AMPLITUDE: f32 = 2.0;
/// Enemy idle bob speed in radians per second
const BOB_SPEED: f32 = 6.0;
/// Seconds for eaten food to zoom out
const FOOD_ZOOM_SECS: f32 = 0.3;

/// Dog position, facing and hurt blink
pub fn sync_player(
    time: Res<Time>,
    session: Res<SimSession>,
    mut query: Query<(&mut Transform, &mut Sprite), With<PlayerSprite>>,
) {
    let Ok((mut transform, mut sprite)) = query.get_single_mut() else {
        return;
    };
    let player = &session.0.level().player;

    transform.translation = to_bevy(player.position(), z::PLAYER);
    sprite.flip_x = player.facing == Facing::Left;

    let blink = player.is_invulnerable() && (time.elapsed_secs() * 12.0) as u32 % 2 == 0;
    sprite.color = Color::WHITE.with_alpha(if blink { 0.4 } else { 1.0 });
}

/// Enemy position, tint and death animation; despawns removed enemies
pub fn sync_enemies(
    mut commands: Commands,
    time: Res<Time>,
    session: Res<SimSession>,
    mut query: Query<(Entity, &EnemySprite, &mut Transform, &mut Sprite)>,
) {
    let level = session.0.level();
    let t = time.elapsed_secs();

    for (entity, marker, mut transform, mut sprite) in query.iter_mut() {
        let Some(enemy) = level.enemies.get(&marker.id) else {
            commands.entity(entity).despawn_recursive();
            continue;
        };

        let mut position = to_bevy(enemy.sprite_center(), z::ENEMY);
        let death = enemy.death_progress();

        if enemy.is_alive() {
            if enemy.body.blocked.down {
                position.y += (t * BOB_SPEED + marker.bob_phase).sin().abs() * BOB_AMPLITUDE;
            }
            sprite.flip_x = enemy.facing_left;
            sprite.flip_y = false;
            sprite.color = hex_color(enemy.tint().rgb());
        } else {
            // Flip over and fade out
            sprite.flip_y = true;
            sprite.color = hex_color(enemy.tint().rgb()).with_alpha(1.0 - death);
        }

        transform.translation = position;
    }
}

/// Food spin; eaten food switches to the zoom-out effect
pub fn sync_food(
    mut commands: Commands,
    session: Res<SimSession>,
    mut query: Query<(Entity, &FoodSprite, &mut Transform)>,
) {
    let level = session.0.level();

    for (entity, marker, mut transform) in query.iter_mut() {
        match level.foods.get(&marker.id) {
            Some(food) if !food.collected => {
                // Sim spins clockwise in y-down space
                transform.rotation = Quat::from_rotation_z(-food.spin.to_radians());
            }
            _ => {
                commands.entity(entity).remove::<FoodSprite>().insert(FoodZoom {
                    timer: Timer::from_seconds(FOOD_ZOOM_SECS, TimerMode::Once),
                });
            }
        }
    }
}

/// Shrink and fade eaten food, then despawn it
pub fn update_food_zoom(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut FoodZoom, &mut Transform, &mut Sprite)>,
) {
    for (entity, mut zoom, mut transform, mut sprite) in query.iter_mut() {
        if zoom.timer.tick(time.delta()).finished() {
            commands.entity(entity).despawn_recursive();
            continue;
        }
        // Shrink, fade and spin one full turn
        let progress = zoom.timer.fraction();
        let eased = 1.0 - (1.0 - progress).powi(2);
        transform.scale = Vec3::splat(1.0 - eased);
        transform.rotate_z(-std::f32::consts::TAU * time.delta_secs() / FOOD_ZOOM_SECS);
        sprite.color = sprite.color.with_alpha(1.0 - eased);
    }
}
