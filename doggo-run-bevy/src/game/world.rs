//! Level construction
//!
//! Builds every entity for the current level from the session's layout and
//! live state. The whole set is despawned and rebuilt whenever a level
//! (re)starts.

use bevy::prelude::*;

use doggo_run::game::enemy::ENEMY_DISPLAY_SIZE;
use doggo_run::game::level::{Decoration, LevelLayout, GOAL_SIZE, GROUND_TINT, PLATFORM_TINT};
use doggo_run::game::{GameEventData, LevelState};
use doggo_run::Rect;

use super::components::*;
use super::visuals::CameraFocus;
use super::{hex_color, z};
use crate::loading::GameTextures;
use crate::sim::{SimEvent, SimSession};
use crate::{to_bevy, Config};

/// Rebuild the level when the session reports a start
pub fn rebuild_on_level_start(
    mut commands: Commands,
    mut events: EventReader<SimEvent>,
    session: Res<SimSession>,
    config: Res<Config>,
    textures: Res<GameTextures>,
    mut focus: ResMut<CameraFocus>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    existing: Query<Entity, With<LevelEntity>>,
) {
    let started = events
        .read()
        .filter_map(|SimEvent(e)| match e.data {
            GameEventData::LevelStarted { level, attempt } => Some((level, attempt)),
            _ => None,
        })
        .last();
    let Some((level, attempt)) = started else {
        return;
    };

    for entity in existing.iter() {
        commands.entity(entity).despawn_recursive();
    }

    info!("Building {} (attempt {})", level.name(), attempt);
    focus.center = None;
    let mut builder = LevelBuilder {
        commands: &mut commands,
        textures: &textures,
        meshes: &mut meshes,
        materials: &mut materials,
        view_width: config.0.view.width as f32,
    };
    builder.build(session.0.layout(), session.0.level());
}

/// Despawn everything when leaving the game
pub fn cleanup_level(mut commands: Commands, query: Query<Entity, With<LevelEntity>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

struct LevelBuilder<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    textures: &'a GameTextures,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<ColorMaterial>,
    view_width: f32,
}

impl LevelBuilder<'_, '_, '_> {
    fn build(&mut self, layout: &LevelLayout, level: &LevelState) {
        self.sky(layout);
        self.scenery(layout);
        self.platforms(layout);
        self.goal(layout);
        self.actors(level);
    }

    fn sky(&mut self, layout: &LevelLayout) {
        for (i, layer) in layout.background.layers.iter().enumerate() {
            // Wide enough to cover the view at the far end of the scroll
            let width = layout.world_width * layer.scroll_factor + self.view_width;
            let height = layout.world_height;
            self.commands.spawn((
                Sprite {
                    image: self.textures.get(&layer.texture),
                    custom_size: Some(Vec2::new(width, height)),
                    image_mode: SpriteImageMode::Tiled {
                        tile_x: true,
                        tile_y: true,
                        stretch_value: 1.0,
                    },
                    ..default()
                },
                Transform::from_xyz(width * 0.5, height * 0.5, z::SKY + i as f32),
                SkyLayer { factor: layer.scroll_factor, width },
                LevelEntity,
            ));
        }
    }

    fn scenery(&mut self, layout: &LevelLayout) {
        let factor = layout.background.decoration_scroll;
        for decoration in &layout.background.decorations {
            let (center, shapes) = decoration_shapes(decoration);
            let anchor = to_bevy(center, z::SCENERY);

            let parent = self
                .commands
                .spawn((
                    Transform::from_translation(anchor),
                    Visibility::default(),
                    Scenery { factor, base_x: anchor.x },
                    LevelEntity,
                ))
                .id();

            for (i, shape) in shapes.into_iter().enumerate() {
                let mesh = self.meshes.add(Ellipse::new(shape.half.x, shape.half.y));
                let material = self.materials.add(shape.color);
                let child = self
                    .commands
                    .spawn((
                        Mesh2d(mesh),
                        MeshMaterial2d(material),
                        Transform::from_xyz(shape.offset.x, shape.offset.y, i as f32 * 0.01),
                    ))
                    .id();
                self.commands.entity(parent).add_child(child);
            }
        }
    }

    fn platforms(&mut self, layout: &LevelLayout) {
        self.solid(&layout.ground, GROUND_TINT);
        for rect in &layout.platforms {
            self.solid(rect, PLATFORM_TINT);
        }
    }

    fn solid(&mut self, rect: &Rect, tint: u32) {
        let size = rect.size();
        self.commands.spawn((
            Sprite {
                image: self.textures.get("tiles"),
                color: hex_color(tint),
                custom_size: Some(Vec2::new(size.x, size.y)),
                image_mode: SpriteImageMode::Tiled {
                    tile_x: true,
                    tile_y: true,
                    stretch_value: 1.0,
                },
                ..default()
            },
            Transform::from_translation(to_bevy(rect.center(), z::PLATFORM)),
            LevelEntity,
        ));
    }

    fn goal(&mut self, layout: &LevelLayout) {
        let Some(goal) = layout.goal else {
            return;
        };
        self.commands.spawn((
            Sprite {
                image: self.textures.get("tiles"),
                color: hex_color(goal.color),
                custom_size: Some(Vec2::new(GOAL_SIZE.x, GOAL_SIZE.y)),
                ..default()
            },
            Transform::from_translation(to_bevy(goal.position, z::GOAL)),
            GoalFlag,
            LevelEntity,
        ));
    }

    fn actors(&mut self, level: &LevelState) {
        let player = &level.player;
        self.commands.spawn((
            Sprite {
                image: self.textures.get("dog"),
                custom_size: Some(Vec2::new(player.body.size.x, player.body.size.y)),
                ..default()
            },
            Transform::from_translation(to_bevy(player.position(), z::PLAYER)),
            PlayerSprite,
            LevelEntity,
        ));

        for enemy in level.enemies.values() {
            self.commands.spawn((
                Sprite {
                    image: self.textures.get(enemy.kind.texture_key()),
                    custom_size: Some(Vec2::new(ENEMY_DISPLAY_SIZE.x, ENEMY_DISPLAY_SIZE.y)),
                    flip_x: enemy.facing_left,
                    ..default()
                },
                Transform::from_translation(to_bevy(enemy.sprite_center(), z::ENEMY)),
                EnemySprite { id: enemy.id, bob_phase: enemy.id as f32 * 0.7 },
                LevelEntity,
            ));
        }

        for food in level.foods.values().filter(|f| !f.collected) {
            let side = food.display_size();
            self.commands.spawn((
                Sprite {
                    image: self.textures.get("dogfood"),
                    custom_size: Some(Vec2::splat(side)),
                    ..default()
                },
                Transform::from_translation(to_bevy(food.position, z::FOOD)),
                FoodSprite { id: food.id },
                LevelEntity,
            ));
        }
    }
}

// ============================================================================
// SCENERY SHAPES
// ============================================================================

/// One ellipse of a decoration, relative to its anchor (y up)
struct Shape {
    offset: Vec2,
    half: Vec2,
    color: Color,
}

fn decoration_shapes(decoration: &Decoration) -> (doggo_run::Vec2, Vec<Shape>) {
    match *decoration {
        Decoration::Hill { center, size, color } => (
            center,
            vec![Shape {
                offset: Vec2::ZERO,
                half: Vec2::new(size.x, size.y) * 0.5,
                color: hex_color(color).with_alpha(0.8),
            }],
        ),
        Decoration::Cloud { center, scale } => {
            let white = Color::srgba(1.0, 1.0, 1.0, 0.8);
            let puffs = [
                (Vec2::new(0.0, 0.0), 25.0),
                (Vec2::new(25.0, 0.0), 30.0),
                (Vec2::new(50.0, 0.0), 25.0),
                (Vec2::new(12.0, 15.0), 20.0),
                (Vec2::new(38.0, 15.0), 20.0),
            ];
            let shapes = puffs
                .into_iter()
                .map(|(offset, r)| Shape {
                    offset: (offset - Vec2::new(25.0, 0.0)) * scale,
                    half: Vec2::splat(r * scale),
                    color: white,
                })
                .collect();
            (center, shapes)
        }
        Decoration::Mushroom { center } => (
            center,
            vec![
                Shape {
                    offset: Vec2::new(0.0, -14.0),
                    half: Vec2::new(5.0, 12.0),
                    color: Color::srgb_u8(0xf5, 0xf5, 0xdc),
                },
                Shape {
                    offset: Vec2::ZERO,
                    half: Vec2::new(16.0, 10.0),
                    color: Color::srgb_u8(0xe5, 0x39, 0x35),
                },
            ],
        ),
    }
}
