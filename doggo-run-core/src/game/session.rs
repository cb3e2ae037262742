//! Session Flow
//!
//! Owns a whole run: the level being played, run progress, pause and
//! suspension, level transitions and lives. Engine-agnostic; the Bevy
//! client and the headless runner both drive it one fixed step at a time.
//!
//! Every frame's raw input and every scene-flow command is recorded, so
//! [`Session::replay`] can rebuild an identical run from the recording.

use serde::{Serialize, Deserialize};
use tracing::{debug, info, warn};

use crate::config::GameConfig;
use crate::core::hash::{StateHash, compute_state_hash};
use crate::core::rng::derive_level_seed;
use crate::error::SessionError;
use crate::game::events::{GameEvent, GameEventData};
use crate::game::input::{InputController, InputFrame, InputRecording, RawInput};
use crate::game::level::{LevelId, LevelLayout};
use crate::game::state::{GameState, LevelState};
use crate::game::tick::tick;

/// Session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Level in progress.
    Playing,
    /// Paused by the player.
    Paused,
    /// Level cleared, waiting for the player's choice.
    LevelComplete {
        /// Level that was cleared
        level: LevelId,
        /// Score when it was cleared
        score: u32,
    },
    /// Out of lives.
    GameOver,
}

/// Scene-flow command. Recorded with the frame it was applied before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionCommand {
    /// Pause button
    TogglePause,
    /// Window hidden (true) or shown again (false)
    SetSuspended(bool),
    /// Mute button
    ToggleMute,
    /// Level 1 complete: go to level 2
    ContinueToNext,
    /// Level 2 complete: play it again at the raised difficulty
    ReplayLevel,
    /// Level 2 complete: back to level 1 at difficulty 1
    BackToLevelOne,
    /// Fresh run
    RestartGame,
}

/// A single-player run.
pub struct Session {
    config: GameConfig,
    game: GameState,
    layout: LevelLayout,
    level: LevelState,
    phase: Phase,
    suspended: bool,
    input: InputController,
    recording: InputRecording,
    frame: u32,
    /// Levels started so far; each start gets its own seed
    starts: u32,
    /// Restarts of the current level after a lost life
    attempt: u32,
    /// Events from commands, handed out with the next update
    outbox: Vec<GameEvent>,
}

impl Session {
    /// Start a run on `config.start_level`.
    pub fn new(config: GameConfig) -> Self {
        let game = GameState::new(&config);
        let seed = derive_level_seed(config.seed, config.start_level.number(), 0);
        let layout = LevelLayout::resolve(&config, config.start_level, seed);
        let level = LevelState::new(
            &layout,
            seed,
            game.level,
            game.max_health,
            game.max_health,
            config.physics.gravity,
        );
        let recording = InputRecording::new(config.seed);

        info!(seed = config.seed, level = layout.name.as_str(), "Session started");

        let mut session = Self {
            config,
            game,
            layout,
            level,
            phase: Phase::Playing,
            suspended: false,
            input: InputController::new(),
            recording,
            frame: 0,
            starts: 1,
            attempt: 0,
            outbox: Vec::new(),
        };
        session.outbox.push(GameEvent::level_started(0, session.level.id, 0));
        session
    }

    /// Rebuild a run from a recording.
    ///
    /// The recording's seed replaces `config.seed`.
    pub fn replay(config: &GameConfig, recording: &InputRecording) -> Self {
        let mut config = config.clone();
        config.seed = recording.seed;
        let mut session = Session::new(config);

        for (frame, input) in recording.replay_iter() {
            session.apply_recorded(recording.commands_at(frame));
            session.update(&input.to_raw());
        }

        // Commands issued after the last update
        session.apply_recorded(recording.commands_at(recording.frames));

        session
    }

    fn apply_recorded(&mut self, commands: impl Iterator<Item = SessionCommand>) {
        for command in commands {
            if let Err(e) = self.apply(command) {
                warn!(frame = self.frame, error = %e, "Recorded command rejected");
            }
        }
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    /// Configuration the run uses.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Run progress.
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Live level.
    pub fn level(&self) -> &LevelState {
        &self.level
    }

    /// Layout the live level was built from.
    pub fn layout(&self) -> &LevelLayout {
        &self.layout
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Window hidden.
    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Frames processed so far.
    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Everything recorded so far.
    pub fn recording(&self) -> &InputRecording {
        &self.recording
    }

    /// Hash of the run and the live level.
    pub fn state_hash(&self) -> StateHash {
        let level_hash = self.level.compute_hash();
        compute_state_hash(self.frame, self.config.seed, |hasher| {
            hasher.update_u32(self.game.score);
            hasher.update_u32(self.game.health);
            hasher.update_u32(self.game.level);
            hasher.update_u32(self.game.lives);
            hasher.update_bool(self.game.is_muted);
            hasher.update_bytes(&level_hash);
        })
    }

    // =========================================================================
    // FRAME UPDATE
    // =========================================================================

    /// Process one fixed step (`config.tick_ms()`) of input.
    ///
    /// Returns the events produced since the previous update, including
    /// those from commands applied in between.
    pub fn update(&mut self, raw: &RawInput) -> Vec<GameEvent> {
        let dt_ms = self.config.tick_ms();
        self.recording.record(self.frame, InputFrame::from_raw(raw));
        self.frame += 1;

        let mut events = std::mem::take(&mut self.outbox);
        let update = self.input.update(raw);

        if update.pause_pressed && matches!(self.phase, Phase::Playing | Phase::Paused) {
            self.flip_pause();
            events.append(&mut self.outbox);
        }

        if !self.simulating() {
            return events;
        }

        let result = tick(&mut self.level, &update.state, dt_ms);

        let points: u32 = result.events.iter().map(GameEvent::points).sum();
        self.game.add_score(points);
        self.game.health = self.level.player.health;
        self.game.time_ms += f64::from(dt_ms);

        let defeated = result.player_defeated();
        events.extend(result.events);

        if self.phase == Phase::Playing {
            if let Some(reason) = result.cleared {
                self.game.add_score(self.level.rules.completion_bonus);
                self.game.level += 1;
                self.phase = Phase::LevelComplete { level: self.level.id, score: self.game.score };
                info!(
                    level = self.level.id.number(),
                    ?reason,
                    score = self.game.score,
                    difficulty = self.game.level,
                    "Level complete"
                );
            } else if defeated {
                self.lose_life();
            }
        }

        events.append(&mut self.outbox);
        events
    }

    /// Whether the level advances this frame.
    fn simulating(&self) -> bool {
        if self.suspended {
            return false;
        }
        match self.phase {
            Phase::Playing => true,
            Phase::LevelComplete { .. } => !self.level.rules.pause_on_complete,
            Phase::Paused | Phase::GameOver => false,
        }
    }

    fn lose_life(&mut self) {
        self.game.lives = self.game.lives.saturating_sub(1);

        if self.game.lives > 0 {
            info!(lives = self.game.lives, "Life lost");
            self.outbox.push(GameEvent::new(
                self.level.tick,
                GameEventData::LifeLost { lives_left: self.game.lives },
            ));
            self.attempt += 1;
            self.start_level(self.level.id);
        } else {
            info!(score = self.game.score, "Game over");
            self.phase = Phase::GameOver;
            self.outbox.push(GameEvent::new(
                self.level.tick,
                GameEventData::GameOver { score: self.game.score },
            ));
        }
    }

    /// Build a fresh level and enter `Playing` with full health.
    fn start_level(&mut self, id: LevelId) {
        let seed = derive_level_seed(self.config.seed, id.number(), self.starts);
        self.starts += 1;

        self.layout = LevelLayout::resolve(&self.config, id, seed);
        self.game.health = self.game.max_health;
        self.level = LevelState::new(
            &self.layout,
            seed,
            self.game.level,
            self.game.health,
            self.game.max_health,
            self.config.physics.gravity,
        );
        self.phase = Phase::Playing;
        self.game.is_paused = false;
        self.input.reset();

        debug!(level = id.number(), attempt = self.attempt, difficulty = self.game.level, "Level started");
        self.outbox.push(GameEvent::level_started(0, id, self.attempt));
    }

    fn flip_pause(&mut self) {
        let (phase, data) = match self.phase {
            Phase::Playing => (Phase::Paused, GameEventData::Paused),
            _ => (Phase::Playing, GameEventData::Resumed),
        };
        self.phase = phase;
        self.game.is_paused = phase == Phase::Paused;
        debug!(paused = self.game.is_paused, "Pause toggled");
        self.outbox.push(GameEvent::new(self.level.tick, data));
    }

    // =========================================================================
    // COMMANDS
    // =========================================================================

    /// Apply and record a scene-flow command.
    ///
    /// Only the level-flow commands can be rejected; the rest always apply.
    pub fn apply(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        match command {
            SessionCommand::TogglePause => self.toggle_pause()?,
            SessionCommand::SetSuspended(hidden) => self.set_suspended(hidden),
            SessionCommand::ToggleMute => self.toggle_mute(),
            SessionCommand::ContinueToNext => self.continue_to_next()?,
            SessionCommand::ReplayLevel => self.replay_level()?,
            SessionCommand::BackToLevelOne => self.back_to_level_one()?,
            SessionCommand::RestartGame => self.restart_game(),
        }
        Ok(())
    }

    /// Pause or resume.
    pub fn toggle_pause(&mut self) -> Result<(), SessionError> {
        self.require(matches!(self.phase, Phase::Playing | Phase::Paused), "toggle pause")?;
        self.flip_pause();
        self.record(SessionCommand::TogglePause);
        Ok(())
    }

    /// Window hidden or shown.
    pub fn set_suspended(&mut self, hidden: bool) {
        if self.suspended != hidden {
            debug!(hidden, "Visibility changed");
        }
        self.suspended = hidden;
        self.record(SessionCommand::SetSuspended(hidden));
    }

    /// Sound on or off.
    pub fn toggle_mute(&mut self) {
        self.game.is_muted = !self.game.is_muted;
        self.record(SessionCommand::ToggleMute);
    }

    /// Level 1 complete: start level 2.
    pub fn continue_to_next(&mut self) -> Result<(), SessionError> {
        let next = match self.phase {
            Phase::LevelComplete { level, .. } => level.next(),
            _ => None,
        };
        let next = next.ok_or_else(|| self.invalid("continue"))?;
        self.attempt = 0;
        self.start_level(next);
        self.record(SessionCommand::ContinueToNext);
        Ok(())
    }

    /// Level 2 complete: play it again, keeping the difficulty.
    pub fn replay_level(&mut self) -> Result<(), SessionError> {
        self.require(self.completed_final_level(), "replay level")?;
        self.attempt = 0;
        self.start_level(self.level.id);
        self.record(SessionCommand::ReplayLevel);
        Ok(())
    }

    /// Level 2 complete: back to level 1 with the difficulty reset.
    pub fn back_to_level_one(&mut self) -> Result<(), SessionError> {
        self.require(self.completed_final_level(), "go back to level 1")?;
        self.game.level = 1;
        self.attempt = 0;
        self.start_level(LevelId::One);
        self.record(SessionCommand::BackToLevelOne);
        Ok(())
    }

    /// Start a fresh run.
    pub fn restart_game(&mut self) {
        self.game.reset();
        self.attempt = 0;
        info!("Game restarted");
        self.start_level(LevelId::One);
        self.record(SessionCommand::RestartGame);
    }

    fn record(&mut self, command: SessionCommand) {
        self.recording.record_command(self.frame, command);
    }

    fn completed_final_level(&self) -> bool {
        matches!(self.phase, Phase::LevelComplete { level, .. } if level.next().is_none())
    }

    fn require(&self, allowed: bool, action: &'static str) -> Result<(), SessionError> {
        if allowed {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition { action, phase: format!("{:?}", self.phase) }
    }
}

// =============================================================================
// TESTS
// =============================================================================
