//! Simulation bridge
//!
//! Owns the core [`Session`], feeds it keyboard and touch input at the fixed
//! tick rate, and republishes its events to the rest of the app.

use bevy::asset::LoadState;
use bevy::input::touch::Touches;
use bevy::prelude::*;
use bevy::window::{PrimaryWindow, WindowFocused, WindowResized};

use doggo_run::config::TouchMode;
use doggo_run::game::events::{sound_cues, GameEvent, GameEventData, SoundCue};
use doggo_run::game::input::RawInput;
use doggo_run::game::touch::TouchControls;
use doggo_run::{Phase, Session, SessionCommand};

use crate::{AppState, Config, PlayPhase};

pub struct SimPlugin;

impl Plugin for SimPlugin {
    fn build(&self, app: &mut App) {
        app
            .add_event::<SimEvent>()
            .add_event::<SessionRequest>()
            .add_event::<SoundEvent>()
            .init_resource::<DebugInput>()
            .add_systems(Startup, (setup_touch, load_sounds))
            .add_systems(OnEnter(AppState::InGame), start_session)
            .add_systems(Update, follow_resize)
            .add_systems(Update, (
                track_focus,
                gather_touch.after(follow_resize),
                apply_requests,
                play_sounds,
            ).run_if(in_state(AppState::InGame)))
            .add_systems(FixedUpdate, step_session.run_if(in_state(AppState::InGame)));
    }
}

// ============================================================================
// RESOURCES AND EVENTS
// ============================================================================

/// The running session
#[derive(Resource)]
pub struct SimSession(pub Session);

/// On-screen controls and whether they are shown
#[derive(Resource)]
pub struct TouchState {
    pub controls: TouchControls,
    pub visible: bool,
}

/// Last raw input and jump edge count, for the debug overlay
#[derive(Resource, Default)]
pub struct DebugInput {
    pub raw: RawInput,
    pub jumps: u32,
}

/// A gameplay event from the last tick
#[derive(Event, Clone)]
pub struct SimEvent(pub GameEvent);

/// Scene-flow request from the UI
#[derive(Event, Clone, Copy)]
pub struct SessionRequest(pub SessionCommand);

/// A sound to play
#[derive(Event, Clone, Copy)]
pub struct SoundEvent(pub SoundCue);

#[derive(Resource)]
struct SoundBank(Vec<(SoundCue, Handle<AudioSource>)>);

// ============================================================================
// SETUP
// ============================================================================

/// Controls are laid out in window pixels, anchored to the bottom corners
fn setup_touch(mut commands: Commands, config: Res<Config>, window: Query<&Window, With<PrimaryWindow>>) {
    let view = config.0.view;
    let (width, height) = window
        .get_single()
        .map(|w| (w.width(), w.height()))
        .unwrap_or((view.width as f32, view.height as f32));
    commands.insert_resource(TouchState {
        controls: TouchControls::new(width, height),
        visible: config.0.touch_controls == TouchMode::Always,
    });
}

/// Sound files are optional; missing ones just stay silent.
fn load_sounds(mut commands: Commands, asset_server: Res<AssetServer>) {
    let bank = [SoundCue::Jump, SoundCue::Pickup, SoundCue::Hit, SoundCue::EnemyDown]
        .into_iter()
        .map(|cue| (cue, asset_server.load(format!("{}.wav", cue.key()))))
        .collect();
    commands.insert_resource(SoundBank(bank));
}

fn start_session(mut commands: Commands, config: Res<Config>) {
    info!("Starting session (seed {})", config.0.seed);
    commands.insert_resource(SimSession(Session::new(config.0.clone())));
}

// ============================================================================
// INPUT
// ============================================================================

/// Hidden or unfocused window suspends the simulation
fn track_focus(mut focus_events: EventReader<WindowFocused>, mut session: ResMut<SimSession>) {
    for event in focus_events.read() {
        session.0.set_suspended(!event.focused);
    }
}

/// Re-anchor the controls after the window changes size
fn follow_resize(
    mut resized: EventReader<WindowResized>,
    primary: Query<Entity, With<PrimaryWindow>>,
    mut touch: ResMut<TouchState>,
) {
    let Ok(primary) = primary.get_single() else {
        resized.clear();
        return;
    };
    if let Some(event) = resized.read().filter(|e| e.window == primary).last() {
        debug!("Touch controls relaid for {}x{}", event.width, event.height);
        touch.controls.relayout(event.width, event.height);
    }
}

/// Feed active touches (window pixels) to the controls
fn gather_touch(touches: Res<Touches>, config: Res<Config>, mut touch: ResMut<TouchState>) {
    let pointers: Vec<doggo_run::Vec2> = touches
        .iter()
        .map(|t| doggo_run::Vec2::new(t.position().x, t.position().y))
        .collect();

    if !pointers.is_empty() && config.0.touch_controls == TouchMode::Auto {
        touch.visible = true;
    }
    touch.controls.update(pointers);
}

fn keyboard_input(keyboard: &ButtonInput<KeyCode>) -> RawInput {
    let any = |keys: &[KeyCode]| keys.iter().any(|k| keyboard.pressed(*k));
    RawInput {
        left: any(&[KeyCode::ArrowLeft, KeyCode::KeyA]),
        right: any(&[KeyCode::ArrowRight, KeyCode::KeyD]),
        jump: any(&[KeyCode::Space, KeyCode::ArrowUp, KeyCode::KeyW]),
        attack: any(&[KeyCode::KeyX]),
        pause: any(&[KeyCode::Escape, KeyCode::KeyP]),
        ..RawInput::default()
    }
}

// ============================================================================
// STEP
// ============================================================================

/// One fixed step of the session
fn step_session(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut touch: ResMut<TouchState>,
    mut session: ResMut<SimSession>,
    mut debug_input: ResMut<DebugInput>,
    mut sim_events: EventWriter<SimEvent>,
    mut sounds: EventWriter<SoundEvent>,
    phase: Res<State<PlayPhase>>,
    mut next_phase: ResMut<NextState<PlayPhase>>,
) {
    let mut raw = keyboard_input(&keyboard);
    raw.touch = touch.controls.take_input();

    let events = session.0.update(&raw);

    debug_input.raw = raw;
    debug_input.jumps += events
        .iter()
        .filter(|e| matches!(e.data, GameEventData::Jumped { .. }))
        .count() as u32;

    for cue in sound_cues(&events, session.0.game().is_muted) {
        sounds.send(SoundEvent(cue));
    }
    for event in events {
        sim_events.send(SimEvent(event));
    }

    let target = match session.0.phase() {
        Phase::Playing => PlayPhase::Running,
        Phase::Paused => PlayPhase::Paused,
        Phase::LevelComplete { .. } => PlayPhase::LevelComplete,
        Phase::GameOver => PlayPhase::GameOver,
    };
    if *phase.get() != target {
        next_phase.set(target);
    }
}

/// Apply UI requests between fixed steps
fn apply_requests(
    mut requests: EventReader<SessionRequest>,
    mut session: ResMut<SimSession>,
    mut next_phase: ResMut<NextState<PlayPhase>>,
) {
    for SessionRequest(command) in requests.read() {
        match session.0.apply(*command) {
            Ok(()) => {
                debug!("Applied {:?}", command);
                if matches!(
                    command,
                    SessionCommand::ContinueToNext
                        | SessionCommand::ReplayLevel
                        | SessionCommand::BackToLevelOne
                        | SessionCommand::RestartGame
                ) {
                    next_phase.set(PlayPhase::Running);
                }
                if *command == SessionCommand::TogglePause {
                    next_phase.set(match session.0.phase() {
                        Phase::Paused => PlayPhase::Paused,
                        _ => PlayPhase::Running,
                    });
                }
            }
            Err(e) => warn!("Ignored request: {}", e),
        }
    }
}

fn play_sounds(
    mut commands: Commands,
    mut sounds: EventReader<SoundEvent>,
    bank: Res<SoundBank>,
    asset_server: Res<AssetServer>,
) {
    for SoundEvent(cue) in sounds.read() {
        let Some((_, handle)) = bank.0.iter().find(|(c, _)| c == cue) else {
            continue;
        };
        if matches!(asset_server.get_load_state(handle), Some(LoadState::Loaded)) {
            commands.spawn((AudioPlayer::new(handle.clone()), PlaybackSettings::DESPAWN));
        }
    }
}
