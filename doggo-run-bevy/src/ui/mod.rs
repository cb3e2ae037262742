//! UI module - HUD, phase overlays, touch controls and debug text

use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};

use doggo_run::game::hud::HudModel;
use doggo_run::game::state::GameState;
use doggo_run::game::level::LevelId;
use doggo_run::game::touch::{TouchButton, TouchLayout};
use doggo_run::{Phase, SessionCommand};

use crate::sim::{DebugInput, SessionRequest, SimSession, TouchState};
use crate::{AppState, Config, PlayPhase};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_systems(OnEnter(AppState::InGame), (setup_hud, setup_touch_overlay, setup_debug_text))
            .add_systems(OnExit(AppState::InGame), cleanup::<HudUI>)
            .add_systems(OnEnter(PlayPhase::Paused), setup_pause_overlay)
            .add_systems(OnExit(PlayPhase::Paused), cleanup::<OverlayUI>)
            .add_systems(OnEnter(PlayPhase::LevelComplete), setup_level_complete)
            .add_systems(OnExit(PlayPhase::LevelComplete), cleanup::<OverlayUI>)
            .add_systems(OnEnter(PlayPhase::GameOver), setup_game_over)
            .add_systems(OnExit(PlayPhase::GameOver), cleanup::<OverlayUI>)
            .add_systems(Update, (
                update_hud,
                handle_buttons,
                handle_hotkeys,
                update_touch_overlay,
                update_debug_text,
            ).run_if(in_state(AppState::InGame)));
    }
}

/// Marker for HUD UI (lives for the whole game)
#[derive(Component)]
struct HudUI;

/// Marker for the current phase overlay
#[derive(Component)]
struct OverlayUI;

/// Button actions
#[derive(Component, Clone, Copy, Debug)]
enum UiButton {
    Pause,
    Mute,
    Fullscreen,
    Resume,
    Restart,
    Continue,
    PlayAgain,
    LevelOne,
}

impl UiButton {
    /// Session command sent when pressed, if any
    fn command(self) -> Option<SessionCommand> {
        match self {
            UiButton::Pause | UiButton::Resume => Some(SessionCommand::TogglePause),
            UiButton::Mute => Some(SessionCommand::ToggleMute),
            UiButton::Fullscreen => None,
            UiButton::Restart => Some(SessionCommand::RestartGame),
            UiButton::Continue => Some(SessionCommand::ContinueToNext),
            UiButton::PlayAgain => Some(SessionCommand::ReplayLevel),
            UiButton::LevelOne => Some(SessionCommand::BackToLevelOne),
        }
    }
}

/// Heart icon by index
#[derive(Component)]
struct HeartIcon(usize);

#[derive(Component)]
struct ScoreText;

#[derive(Component)]
struct LivesText;

#[derive(Component)]
struct PauseLabel;

#[derive(Component)]
struct MuteLabel;

/// Root of the on-screen controls
#[derive(Component)]
struct TouchOverlay;

/// Which control a touch circle draws
#[derive(Component, Clone, Copy)]
enum TouchPad {
    Dpad,
    Left,
    Right,
    Jump,
    Attack,
}

#[derive(Component)]
struct DebugText;

const HEART_RED: Color = Color::srgb(1.0, 0.0, 0.0);
const SCORE_GOLD: Color = Color::srgb(1.0, 0.843, 0.0);
const BUTTON_BG: Color = Color::srgba(0.2, 0.2, 0.2, 0.8);
const BUTTON_HOVER: Color = Color::srgba(0.4, 0.4, 0.4, 0.9);

fn cleanup<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in query.iter() {
        commands.entity(entity).despawn_recursive();
    }
}

// ============================================================================
// HUD
// ============================================================================

/// Hearts top-left, score and control buttons top-right
fn setup_hud(mut commands: Commands, config: Res<Config>) {
    // The session is inserted in the same schedule, so start from a fresh state
    let hud = HudModel::from_state(&GameState::new(&config.0));

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::SpaceBetween,
            padding: UiRect::all(Val::Px(40.0)),
            ..default()
        },
        HudUI,
    )).with_children(|parent| {
        // Left column: hearts and lives
        parent.spawn(Node {
            flex_direction: FlexDirection::Column,
            ..default()
        }).with_children(|left| {
            left.spawn(Node {
                column_gap: Val::Px(10.0),
                ..default()
            }).with_children(|hearts| {
                for i in 0..hud.hearts.len() {
                    hearts.spawn((
                        Node {
                            width: Val::Px(30.0),
                            height: Val::Px(26.0),
                            ..default()
                        },
                        BackgroundColor(HEART_RED),
                        BorderRadius::new(Val::Px(13.0), Val::Px(13.0), Val::Px(4.0), Val::Px(13.0)),
                        HeartIcon(i),
                    ));
                }
            });

            left.spawn((
                Text::new(format!("Lives: {}", hud.lives)),
                TextFont {
                    font_size: 20.0,
                    ..default()
                },
                TextColor(Color::WHITE),
                Node {
                    margin: UiRect::top(Val::Px(8.0)),
                    ..default()
                },
                LivesText,
            ));
        });

        // Right column: score and buttons
        parent.spawn(Node {
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::FlexEnd,
            ..default()
        }).with_children(|right| {
            right.spawn((
                Text::new(hud.score_text.clone()),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(SCORE_GOLD),
                ScoreText,
            ));

            right.spawn(Node {
                column_gap: Val::Px(10.0),
                margin: UiRect::top(Val::Px(10.0)),
                ..default()
            }).with_children(|buttons| {
                spawn_icon_button(buttons, "||", UiButton::Pause, PauseLabel);
                spawn_icon_button(buttons, "SND", UiButton::Mute, MuteLabel);
                spawn_icon_button(buttons, "[ ]", UiButton::Fullscreen, ());
            });
        });
    });
}

/// Small square control button
fn spawn_icon_button(parent: &mut ChildBuilder, text: &str, action: UiButton, label: impl Bundle) {
    parent.spawn((
        Button,
        Node {
            min_width: Val::Px(40.0),
            height: Val::Px(40.0),
            padding: UiRect::horizontal(Val::Px(6.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(BUTTON_BG),
        BorderRadius::all(Val::Px(8.0)),
        action,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(text),
            TextFont {
                font_size: 18.0,
                ..default()
            },
            TextColor(Color::WHITE),
            label,
        ));
    });
}

/// Refresh hearts, score and button labels from the game state
fn update_hud(
    session: Res<SimSession>,
    mut hearts: Query<(&HeartIcon, &mut BackgroundColor, &mut Visibility)>,
    mut texts: ParamSet<(
        Query<&mut Text, With<ScoreText>>,
        Query<&mut Text, With<LivesText>>,
        Query<&mut Text, With<PauseLabel>>,
        Query<&mut Text, With<MuteLabel>>,
    )>,
) {
    let hud = HudModel::from_state(session.0.game());

    for (icon, mut color, mut visibility) in hearts.iter_mut() {
        let Some(heart) = hud.hearts.get(icon.0) else {
            continue;
        };
        color.0 = HEART_RED.with_alpha(heart.alpha);
        *visibility = if heart.filled { Visibility::Inherited } else { Visibility::Hidden };
    }

    if let Ok(mut text) = texts.p0().get_single_mut() {
        if text.0 != hud.score_text {
            text.0 = hud.score_text.clone();
        }
    }
    if let Ok(mut text) = texts.p1().get_single_mut() {
        text.0 = format!("Lives: {}", hud.lives);
    }
    if let Ok(mut text) = texts.p2().get_single_mut() {
        text.0 = if hud.paused { ">" } else { "||" }.to_string();
    }
    if let Ok(mut text) = texts.p3().get_single_mut() {
        text.0 = if hud.muted { "MUTE" } else { "SND" }.to_string();
    }
}

// ============================================================================
// OVERLAYS
// ============================================================================

/// Dimmed full-screen root with a centered panel
fn spawn_overlay(commands: &mut Commands, border: Color, build: impl FnOnce(&mut ChildBuilder)) {
    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, 0.7)),
        GlobalZIndex(10),
        OverlayUI,
    )).with_children(|parent| {
        parent.spawn((
            Node {
                width: Val::Px(500.0),
                padding: UiRect::all(Val::Px(30.0)),
                flex_direction: FlexDirection::Column,
                align_items: AlignItems::Center,
                border: UiRect::all(Val::Px(4.0)),
                ..default()
            },
            BackgroundColor(Color::srgba(0.2, 0.2, 0.2, 0.9)),
            BorderColor(border),
            BorderRadius::all(Val::Px(20.0)),
        )).with_children(build);
    });
}

fn spawn_label(parent: &mut ChildBuilder, text: impl Into<String>, size: f32, color: Color) {
    parent.spawn((
        Text::new(text),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color),
        Node {
            margin: UiRect::bottom(Val::Px(12.0)),
            ..default()
        },
    ));
}

/// Wide overlay button
fn spawn_menu_button(parent: &mut ChildBuilder, text: &str, color: Color, action: UiButton) {
    parent.spawn((
        Button,
        Node {
            width: Val::Px(200.0),
            height: Val::Px(50.0),
            margin: UiRect::top(Val::Px(12.0)),
            justify_content: JustifyContent::Center,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(color),
        BorderRadius::all(Val::Px(10.0)),
        action,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(text),
            TextFont {
                font_size: 24.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    });
}

fn setup_pause_overlay(mut commands: Commands) {
    spawn_overlay(&mut commands, Color::WHITE, |panel| {
        spawn_label(panel, "PAUSED", 48.0, Color::WHITE);
        spawn_menu_button(panel, "RESUME", Color::srgb(0.1, 0.55, 0.1), UiButton::Resume);
        spawn_menu_button(panel, "RESTART", Color::srgb(0.6, 0.55, 0.0), UiButton::Restart);
    });
}

fn setup_level_complete(mut commands: Commands, session: Res<SimSession>) {
    let Phase::LevelComplete { level, score } = session.0.phase() else {
        return;
    };
    info!("{} complete, score {}", level.name(), score);

    match level.next() {
        Some(next) => {
            spawn_overlay(&mut commands, SCORE_GOLD, |panel| {
                spawn_label(panel, "LEVEL COMPLETE!", 48.0, SCORE_GOLD);
                spawn_label(panel, format!("Score: {score}"), 32.0, Color::WHITE);
                spawn_label(
                    panel,
                    format!("Ready for {}?", next.name()),
                    24.0,
                    Color::srgb_u8(0xec, 0xef, 0xef),
                );
                spawn_menu_button(panel, "CONTINUE", Color::srgb_u8(0x4c, 0xaf, 0x50), UiButton::Continue);
            });
        }
        None => {
            let cyan = Color::srgb_u8(0x00, 0xbc, 0xd4);
            spawn_overlay(&mut commands, cyan, |panel| {
                spawn_label(panel, format!("LEVEL {} COMPLETE!", level.number()), 48.0, cyan);
                spawn_label(panel, "CONGRATULATIONS!", 32.0, SCORE_GOLD);
                spawn_label(panel, format!("Final Score: {score}"), 28.0, Color::WHITE);
                spawn_label(
                    panel,
                    "You have mastered both levels!",
                    20.0,
                    Color::srgb_u8(0xec, 0xef, 0xef),
                );
                spawn_menu_button(panel, "PLAY AGAIN", Color::srgb_u8(0x4c, 0xaf, 0x50), UiButton::PlayAgain);
                spawn_menu_button(
                    panel,
                    &LevelId::One.name().to_uppercase(),
                    Color::srgb_u8(0x21, 0x96, 0xf3),
                    UiButton::LevelOne,
                );
            });
        }
    }
}

fn setup_game_over(mut commands: Commands, session: Res<SimSession>) {
    let score = session.0.game().score;
    spawn_overlay(&mut commands, Color::srgb(0.8, 0.2, 0.2), |panel| {
        spawn_label(panel, "GAME OVER", 48.0, Color::srgb(1.0, 0.3, 0.3));
        spawn_label(panel, format!("Score: {score}"), 32.0, Color::WHITE);
        spawn_menu_button(panel, "RESTART", Color::srgb(0.6, 0.55, 0.0), UiButton::Restart);
    });
}

// ============================================================================
// INPUT
// ============================================================================

/// Handle button clicks
fn handle_buttons(
    mut interaction_query: Query<(&Interaction, &UiButton, &mut BackgroundColor), Changed<Interaction>>,
    mut requests: EventWriter<SessionRequest>,
    mut window: Query<&mut Window, With<PrimaryWindow>>,
) {
    for (interaction, button, mut bg_color) in interaction_query.iter_mut() {
        match *interaction {
            Interaction::Pressed => {
                debug!("{:?} clicked", button);
                match button.command() {
                    Some(command) => {
                        requests.send(SessionRequest(command));
                    }
                    None => toggle_fullscreen(&mut window),
                }
            }
            Interaction::Hovered => {
                if is_icon(*button) {
                    *bg_color = BackgroundColor(BUTTON_HOVER);
                }
            }
            Interaction::None => {
                if is_icon(*button) {
                    *bg_color = BackgroundColor(BUTTON_BG);
                }
            }
        }
    }
}

fn is_icon(button: UiButton) -> bool {
    matches!(button, UiButton::Pause | UiButton::Mute | UiButton::Fullscreen)
}

/// M toggles sound, F toggles fullscreen
fn handle_hotkeys(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut requests: EventWriter<SessionRequest>,
    mut window: Query<&mut Window, With<PrimaryWindow>>,
) {
    if keyboard.just_pressed(KeyCode::KeyM) {
        requests.send(SessionRequest(SessionCommand::ToggleMute));
    }
    if keyboard.just_pressed(KeyCode::KeyF) {
        toggle_fullscreen(&mut window);
    }
}

fn toggle_fullscreen(window: &mut Query<&mut Window, With<PrimaryWindow>>) {
    let Ok(mut window) = window.get_single_mut() else {
        return;
    };
    window.mode = match window.mode {
        WindowMode::Windowed => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        _ => WindowMode::Windowed,
    };
}

// ============================================================================
// TOUCH CONTROLS
// ============================================================================

fn setup_touch_overlay(mut commands: Commands, touch: Res<TouchState>) {
    let layout = *touch.controls.layout();

    commands.spawn((
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            ..default()
        },
        Visibility::Hidden,
        TouchOverlay,
        HudUI,
    )).with_children(|parent| {
        for pad in [TouchPad::Dpad, TouchPad::Left, TouchPad::Right, TouchPad::Jump, TouchPad::Attack] {
            spawn_touch_circle(parent, pad, pad_button(&layout, pad));
        }
    });
}

fn spawn_touch_circle(parent: &mut ChildBuilder, pad: TouchPad, button: TouchButton) {
    let label = match pad {
        TouchPad::Dpad => "",
        TouchPad::Left => "<",
        TouchPad::Right => ">",
        TouchPad::Jump => "JUMP",
        TouchPad::Attack => "ATK",
    };

    parent.spawn((
        circle_node(&button),
        BackgroundColor(touch_color(pad, false)),
        BorderRadius::MAX,
        pad,
    )).with_children(|parent| {
        parent.spawn((
            Text::new(label),
            TextFont {
                font_size: 16.0,
                ..default()
            },
            TextColor(Color::WHITE),
        ));
    });
}

fn pad_button(layout: &TouchLayout, pad: TouchPad) -> TouchButton {
    match pad {
        TouchPad::Dpad => layout.dpad,
        TouchPad::Left => layout.left,
        TouchPad::Right => layout.right,
        TouchPad::Jump => layout.jump,
        TouchPad::Attack => layout.attack,
    }
}

/// Circle covering exactly the button's hit area, in window pixels
fn circle_node(button: &TouchButton) -> Node {
    let r = button.radius;
    Node {
        position_type: PositionType::Absolute,
        left: Val::Px(button.center.x - r),
        top: Val::Px(button.center.y - r),
        width: Val::Px(r * 2.0),
        height: Val::Px(r * 2.0),
        justify_content: JustifyContent::Center,
        align_items: AlignItems::Center,
        ..default()
    }
}

fn touch_color(pad: TouchPad, held: bool) -> Color {
    let alpha = if held { 0.6 } else { 0.3 };
    match pad {
        TouchPad::Dpad => Color::srgba(0.2, 0.2, 0.2, 0.3),
        TouchPad::Left | TouchPad::Right => Color::srgba(1.0, 1.0, 1.0, alpha),
        TouchPad::Jump => Color::srgba(0.3, 0.7, 0.3, alpha),
        TouchPad::Attack => Color::srgba(0.8, 0.3, 0.3, alpha),
    }
}

/// Show the overlay once touch is in use, follow relayouts and highlight
/// held buttons
fn update_touch_overlay(
    touch: Res<TouchState>,
    mut root: Query<&mut Visibility, With<TouchOverlay>>,
    mut pads: Query<(&TouchPad, &mut Node, &mut BackgroundColor)>,
) {
    if let Ok(mut visibility) = root.get_single_mut() {
        let target = if touch.visible { Visibility::Inherited } else { Visibility::Hidden };
        if *visibility != target {
            *visibility = target;
        }
    }
    if !touch.visible {
        return;
    }

    let layout = touch.controls.layout();
    let (left, right, jump, attack) = touch.controls.held();
    for (pad, mut node, mut color) in pads.iter_mut() {
        let placed = circle_node(&pad_button(layout, *pad));
        if node.left != placed.left || node.top != placed.top {
            node.left = placed.left;
            node.top = placed.top;
        }

        let held = match pad {
            TouchPad::Dpad => false,
            TouchPad::Left => left,
            TouchPad::Right => right,
            TouchPad::Jump => jump,
            TouchPad::Attack => attack,
        };
        color.0 = touch_color(*pad, held);
    }
}

// ============================================================================
// DEBUG
// ============================================================================

fn setup_debug_text(mut commands: Commands, config: Res<Config>) {
    if !config.0.debug_overlay {
        return;
    }
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgb(0.0, 1.0, 0.0)),
        Node {
            position_type: PositionType::Absolute,
            left: Val::Px(20.0),
            bottom: Val::Px(20.0),
            ..default()
        },
        GlobalZIndex(20),
        DebugText,
        HudUI,
    ));
}

/// Input and player state readout
fn update_debug_text(
    session: Res<SimSession>,
    input: Res<DebugInput>,
    mut query: Query<&mut Text, With<DebugText>>,
) {
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };
    let level = session.0.level();
    let player = &level.player;
    let raw = &input.raw;

    text.0 = format!(
        "{} tick {}\nL:{} R:{} J:{} A:{} jumps:{}\npos ({:.0}, {:.0}) vel ({:.0}, {:.0}) grounded:{}\nfood left:{} enemies:{}",
        level.id.name(),
        level.tick,
        raw.left as u8,
        raw.right as u8,
        raw.jump as u8,
        raw.attack as u8,
        input.jumps,
        player.body.position.x,
        player.body.position.y,
        player.body.velocity.x,
        player.body.velocity.y,
        player.is_grounded(),
        level.remaining_food(),
        level.living_enemies(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use doggo_run::game::touch::TouchControls;

    fn center_of(node: &Node) -> doggo_run::Vec2 {
        let (Val::Px(left), Val::Px(top), Val::Px(width), Val::Px(height)) =
            (node.left, node.top, node.width, node.height)
        else {
            panic!("touch circles are placed in pixels");
        };
        doggo_run::Vec2::new(left + width * 0.5, top + height * 0.5)
    }

    #[test]
    fn test_touch_circle_covers_hit_area() {
        let layout = TouchLayout::new(1280.0, 720.0);
        for pad in [TouchPad::Dpad, TouchPad::Left, TouchPad::Right, TouchPad::Jump, TouchPad::Attack] {
            let button = pad_button(&layout, pad);
            let node = circle_node(&button);
            assert_eq!(center_of(&node), button.center);
            assert_eq!(node.width, Val::Px(button.radius * 2.0));
        }

        let jump = circle_node(&layout.jump);
        assert_eq!(jump.left, Val::Px(1110.0));
        assert_eq!(jump.top, Val::Px(510.0));
    }

    #[test]
    fn test_touch_circles_follow_relayout() {
        let mut controls = TouchControls::new(1280.0, 720.0);
        controls.relayout(1920.0, 1080.0);

        let jump = controls.layout().jump;
        let node = circle_node(&jump);
        assert_eq!(node.left, Val::Px(1920.0 - 120.0 - 50.0));
        assert_eq!(node.top, Val::Px(1080.0 - 160.0 - 50.0));

        // A touch drawn inside the circle hits the button
        controls.update([center_of(&node)]);
        assert!(controls.held().2);
    }
}
