//! Input Capture and Edge Detection
//!
//! Devices report *held* state every frame ([`RawInput`]). The
//! [`InputController`] turns that into the per-frame [`InputState`] the
//! player reads, deriving one-frame "pressed" edges from held transitions
//! so OS key repeat can never re-trigger a jump.
//!
//! Every frame's raw input is packed into an [`InputFrame`] and stored
//! delta-compressed in an [`InputRecording`] for replay.

use serde::{Serialize, Deserialize};

use crate::core::hash::{StateHash, StateHasher};
use crate::game::session::SessionCommand;

// =============================================================================
// INPUT TYPES
// =============================================================================

/// Touch control snapshot for one frame.
///
/// Pulses are already consumed from the touch layer, so each is true for
/// exactly one frame per button press.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchInputState {
    /// Left d-pad button held
    pub left: bool,
    /// Right d-pad button held
    pub right: bool,
    /// Jump button held
    pub jump_held: bool,
    /// Jump button went down this frame
    pub jump_pulse: bool,
    /// Attack button went down this frame
    pub attack_pulse: bool,
}

/// Held state of every input device for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawInput {
    /// Arrow left or A
    pub left: bool,
    /// Arrow right or D
    pub right: bool,
    /// Up, Space or W
    pub jump: bool,
    /// X
    pub attack: bool,
    /// Esc or P
    pub pause: bool,
    /// On-screen touch controls
    pub touch: TouchInputState,
}

/// Input as the player controller sees it for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    /// Move left
    pub left: bool,
    /// Move right
    pub right: bool,
    /// One-frame edge trigger
    pub jump_pressed: bool,
    /// Held, for variable jump height
    pub jump_held: bool,
    /// One-frame edge trigger
    pub attack_pressed: bool,
}

/// Output of [`InputController::update`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputUpdate {
    /// Merged gameplay input
    pub state: InputState,
    /// Pause key went down this frame
    pub pause_pressed: bool,
}

// =============================================================================
// CONTROLLER
// =============================================================================

/// Merges keyboard and touch input and tracks held-state edges.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputController {
    last_jump_held: bool,
    last_attack_held: bool,
    last_pause_held: bool,
}

impl InputController {
    /// Create a controller with nothing held.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one frame of raw input.
    pub fn update(&mut self, raw: &RawInput) -> InputUpdate {
        let jump_held = raw.jump || raw.touch.jump_held;
        let jump_pressed = (jump_held && !self.last_jump_held) || raw.touch.jump_pulse;

        let attack_pressed = (raw.attack && !self.last_attack_held) || raw.touch.attack_pulse;
        let pause_pressed = raw.pause && !self.last_pause_held;

        self.last_jump_held = jump_held;
        self.last_attack_held = raw.attack;
        self.last_pause_held = raw.pause;

        InputUpdate {
            state: InputState {
                left: raw.left || raw.touch.left,
                right: raw.right || raw.touch.right,
                jump_pressed,
                jump_held,
                attack_pressed,
            },
            pause_pressed,
        }
    }

    /// Forget held state (used when a level restarts under a held key).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// =============================================================================
// PACKED FRAME
// =============================================================================

/// A [`RawInput`] packed into bit flags for recording.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Packed bits, see the `FLAG_*` constants
    pub flags: u16,
}

impl InputFrame {
    /// Keyboard left
    pub const FLAG_LEFT: u16 = 1 << 0;
    /// Keyboard right
    pub const FLAG_RIGHT: u16 = 1 << 1;
    /// Keyboard jump
    pub const FLAG_JUMP: u16 = 1 << 2;
    /// Keyboard attack
    pub const FLAG_ATTACK: u16 = 1 << 3;
    /// Keyboard pause
    pub const FLAG_PAUSE: u16 = 1 << 4;
    /// Touch left
    pub const FLAG_TOUCH_LEFT: u16 = 1 << 5;
    /// Touch right
    pub const FLAG_TOUCH_RIGHT: u16 = 1 << 6;
    /// Touch jump held
    pub const FLAG_TOUCH_JUMP: u16 = 1 << 7;
    /// Touch jump pulse
    pub const FLAG_TOUCH_JUMP_PULSE: u16 = 1 << 8;
    /// Touch attack pulse
    pub const FLAG_TOUCH_ATTACK_PULSE: u16 = 1 << 9;

    /// Idle frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Pack a raw input.
    pub fn from_raw(raw: &RawInput) -> Self {
        let bits = [
            (raw.left, Self::FLAG_LEFT),
            (raw.right, Self::FLAG_RIGHT),
            (raw.jump, Self::FLAG_JUMP),
            (raw.attack, Self::FLAG_ATTACK),
            (raw.pause, Self::FLAG_PAUSE),
            (raw.touch.left, Self::FLAG_TOUCH_LEFT),
            (raw.touch.right, Self::FLAG_TOUCH_RIGHT),
            (raw.touch.jump_held, Self::FLAG_TOUCH_JUMP),
            (raw.touch.jump_pulse, Self::FLAG_TOUCH_JUMP_PULSE),
            (raw.touch.attack_pulse, Self::FLAG_TOUCH_ATTACK_PULSE),
        ];
        let flags = bits
            .iter()
            .filter(|(set, _)| *set)
            .fold(0u16, |acc, (_, bit)| acc | bit);
        Self { flags }
    }

    /// Unpack into a raw input.
    pub fn to_raw(self) -> RawInput {
        RawInput {
            left: self.has(Self::FLAG_LEFT),
            right: self.has(Self::FLAG_RIGHT),
            jump: self.has(Self::FLAG_JUMP),
            attack: self.has(Self::FLAG_ATTACK),
            pause: self.has(Self::FLAG_PAUSE),
            touch: TouchInputState {
                left: self.has(Self::FLAG_TOUCH_LEFT),
                right: self.has(Self::FLAG_TOUCH_RIGHT),
                jump_held: self.has(Self::FLAG_TOUCH_JUMP),
                jump_pulse: self.has(Self::FLAG_TOUCH_JUMP_PULSE),
                attack_pulse: self.has(Self::FLAG_TOUCH_ATTACK_PULSE),
            },
        }
    }

    /// Check a flag.
    #[inline]
    pub fn has(self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    /// Check if nothing is held.
    #[inline]
    pub fn is_idle(self) -> bool {
        self.flags == 0
    }
}

/// Delta-compressed input entry.
///
/// Only stored when input CHANGES (not every frame).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputDelta {
    /// Frame when this input state began
    pub frame: u32,
    /// The new input state
    pub input: InputFrame,
}

/// A scene-flow command issued at a given frame (menu buttons, focus changes).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Frame the command was applied before
    pub frame: u32,
    /// The command
    pub command: SessionCommand,
}

// =============================================================================
// RECORDING
// =============================================================================

/// Complete input recording for one session.
///
/// Used for replay and determinism checks.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct InputRecording {
    /// Run seed the session started with
    pub seed: u64,

    /// Number of frames recorded
    pub frames: u32,

    /// Delta-compressed input data.
    deltas: Vec<InputDelta>,

    /// Scene-flow commands in frame order.
    commands: Vec<CommandEntry>,

    /// Last recorded input (for delta comparison)
    #[serde(skip)]
    last_input: InputFrame,
}

impl InputRecording {
    /// Create an empty recording.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            frames: 0,
            deltas: Vec::with_capacity(512),
            commands: Vec::new(),
            last_input: InputFrame::new(),
        }
    }

    /// Record input for a frame.
    ///
    /// Only stores if input changed from previous frame.
    pub fn record(&mut self, frame: u32, input: InputFrame) {
        self.frames = self.frames.max(frame + 1);

        if input != self.last_input {
            self.deltas.push(InputDelta { frame, input });
            self.last_input = input;
        }
    }

    /// Record a scene-flow command applied before `frame` runs.
    pub fn record_command(&mut self, frame: u32, command: SessionCommand) {
        self.commands.push(CommandEntry { frame, command });
    }

    /// Get input at a specific frame.
    ///
    /// Uses binary search for efficiency.
    pub fn get_input_at(&self, frame: u32) -> InputFrame {
        let idx = self.deltas.partition_point(|d| d.frame <= frame);
        if idx == 0 {
            InputFrame::new()
        } else {
            self.deltas[idx - 1].input
        }
    }

    /// Commands issued before a given frame, in order.
    pub fn commands_at(&self, frame: u32) -> impl Iterator<Item = SessionCommand> + '_ {
        let start = self.commands.partition_point(|c| c.frame < frame);
        self.commands[start..]
            .iter()
            .take_while(move |c| c.frame == frame)
            .map(|c| c.command)
    }

    /// Get all deltas.
    pub fn deltas(&self) -> &[InputDelta] {
        &self.deltas
    }

    /// Get all commands.
    pub fn commands(&self) -> &[CommandEntry] {
        &self.commands
    }

    /// Number of delta entries.
    pub fn delta_count(&self) -> usize {
        self.deltas.len()
    }

    /// Finalize the recording at `frames` frames.
    pub fn finalize(&mut self, frames: u32) {
        self.frames = frames;
    }

    /// Hash of the seed, frame count, deltas and commands.
    ///
    /// Two recordings with the same hash replay the same run.
    pub fn compute_hash(&self) -> StateHash {
        let mut hasher = StateHasher::for_input_recording();
        hasher.update_u64(self.seed);
        hasher.update_u32(self.frames);

        hasher.update_u32(self.deltas.len() as u32);
        for delta in &self.deltas {
            hasher.update_u32(delta.frame);
            hasher.update_bytes(&delta.input.flags.to_le_bytes());
        }

        hasher.update_u32(self.commands.len() as u32);
        for entry in &self.commands {
            let (code, flag) = match entry.command {
                SessionCommand::TogglePause => (0, false),
                SessionCommand::SetSuspended(hidden) => (1, hidden),
                SessionCommand::ToggleMute => (2, false),
                SessionCommand::ContinueToNext => (3, false),
                SessionCommand::ReplayLevel => (4, false),
                SessionCommand::BackToLevelOne => (5, false),
                SessionCommand::RestartGame => (6, false),
            };
            hasher.update_u32(entry.frame);
            hasher.update_u8(code);
            hasher.update_bool(flag);
        }

        hasher.finalize()
    }

    /// Create iterator over all inputs for replay.
    pub fn replay_iter(&self) -> ReplayIterator<'_> {
        ReplayIterator {
            recording: self,
            current_frame: 0,
            delta_idx: 0,
            current_input: InputFrame::new(),
        }
    }
}

/// Iterator for replaying inputs frame-by-frame.
pub struct ReplayIterator<'a> {
    recording: &'a InputRecording,
    current_frame: u32,
    delta_idx: usize,
    current_input: InputFrame,
}

impl<'a> Iterator for ReplayIterator<'a> {
    type Item = (u32, InputFrame);

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_frame >= self.recording.frames {
            return None;
        }

        while let Some(delta) = self.recording.deltas.get(self.delta_idx) {
            if delta.frame <= self.current_frame {
                self.current_input = delta.input;
                self.delta_idx += 1;
            } else {
                break;
            }
        }

        let result = (self.current_frame, self.current_input);
        self.current_frame += 1;
        Some(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn jump_held() -> RawInput {
        RawInput { jump: true, ..Default::default() }
    }

    #[test]
    fn test_jump_edge_only_on_press() {
        let mut ctl = InputController::new();

        let first = ctl.update(&jump_held());
        assert!(first.state.jump_pressed);
        assert!(first.state.jump_held);

        // Holding (or OS key repeat) never re-triggers
        for _ in 0..10 {
            let held = ctl.update(&jump_held());
            assert!(!held.state.jump_pressed);
            assert!(held.state.jump_held);
        }

        let released = ctl.update(&RawInput::default());
        assert!(!released.state.jump_held);

        let again = ctl.update(&jump_held());
        assert!(again.state.jump_pressed);
    }

    #[test]
    fn test_keyboard_and_touch_merge() {
        let mut ctl = InputController::new();
        let raw = RawInput {
            left: false,
            touch: TouchInputState { left: true, right: true, ..Default::default() },
            right: false,
            ..Default::default()
        };

        let out = ctl.update(&raw);
        assert!(out.state.left);
        assert!(out.state.right);
    }

    #[test]
    fn test_touch_jump_counts_as_held_for_edge() {
        let mut ctl = InputController::new();

        // Touch held without pulse still produces an edge from the merged held state
        let raw = RawInput {
            touch: TouchInputState { jump_held: true, ..Default::default() },
            ..Default::default()
        };
        assert!(ctl.update(&raw).state.jump_pressed);

        // Keyboard press while touch already held: no new edge
        let both = RawInput { jump: true, ..raw };
        assert!(!ctl.update(&both).state.jump_pressed);
    }

    #[test]
    fn test_touch_pulses() {
        let mut ctl = InputController::new();
        let raw = RawInput {
            touch: TouchInputState { attack_pulse: true, ..Default::default() },
            ..Default::default()
        };
        assert!(ctl.update(&raw).state.attack_pressed);
        assert!(!ctl.update(&RawInput::default()).state.attack_pressed);
    }

    #[test]
    fn test_attack_and_pause_edges() {
        let mut ctl = InputController::new();
        let raw = RawInput { attack: true, pause: true, ..Default::default() };

        let first = ctl.update(&raw);
        assert!(first.state.attack_pressed);
        assert!(first.pause_pressed);

        let second = ctl.update(&raw);
        assert!(!second.state.attack_pressed);
        assert!(!second.pause_pressed);
    }

    #[test]
    fn test_recording_delta_compression() {
        let mut rec = InputRecording::new(1);
        let frame = InputFrame::from_raw(&RawInput { right: true, ..Default::default() });

        for f in 0..4 {
            rec.record(f, frame);
        }
        assert_eq!(rec.delta_count(), 1);

        rec.record(4, InputFrame::from_raw(&jump_held()));
        assert_eq!(rec.delta_count(), 2);
    }

    #[test]
    fn test_recording_get_at() {
        let mut rec = InputRecording::new(1);
        let a = InputFrame { flags: InputFrame::FLAG_LEFT };
        let b = InputFrame { flags: InputFrame::FLAG_RIGHT };

        rec.record(10, a);
        rec.record(20, b);

        assert!(rec.get_input_at(5).is_idle());
        assert_eq!(rec.get_input_at(10), a);
        assert_eq!(rec.get_input_at(15), a);
        assert_eq!(rec.get_input_at(20), b);
        assert_eq!(rec.get_input_at(100), b);
    }

    #[test]
    fn test_replay_iterator() {
        let mut rec = InputRecording::new(1);
        rec.record(0, InputFrame { flags: InputFrame::FLAG_LEFT });
        rec.record(3, InputFrame { flags: InputFrame::FLAG_RIGHT });
        rec.finalize(6);

        let frames: Vec<_> = rec.replay_iter().collect();
        assert_eq!(frames.len(), 6);
        assert!(frames[2].1.has(InputFrame::FLAG_LEFT));
        assert!(frames[3].1.has(InputFrame::FLAG_RIGHT));
        assert!(frames[5].1.has(InputFrame::FLAG_RIGHT));
    }

    #[test]
    fn test_empty_recording_replays_nothing() {
        let mut rec = InputRecording::new(1);
        assert_eq!(rec.replay_iter().count(), 0);

        rec.record_command(0, SessionCommand::ToggleMute);
        assert_eq!(rec.frames, 0);
        assert_eq!(rec.replay_iter().count(), 0);

        rec.record(0, InputFrame::new());
        assert_eq!(rec.frames, 1);
        assert_eq!(rec.replay_iter().count(), 1);
    }

    #[test]
    fn test_recording_hash() {
        let build = |frames: u32, command: SessionCommand| {
            let mut rec = InputRecording::new(9);
            for f in 0..frames {
                let flags = if f % 3 == 0 { InputFrame::FLAG_JUMP } else { InputFrame::FLAG_RIGHT };
                rec.record(f, InputFrame { flags });
            }
            rec.record_command(frames, command);
            rec
        };

        let base = build(30, SessionCommand::SetSuspended(true)).compute_hash();
        assert_eq!(base, build(30, SessionCommand::SetSuspended(true)).compute_hash());
        assert_ne!(base, build(30, SessionCommand::SetSuspended(false)).compute_hash());
        assert_ne!(base, build(31, SessionCommand::SetSuspended(true)).compute_hash());

        let mut reseeded = build(30, SessionCommand::SetSuspended(true));
        reseeded.seed = 10;
        assert_ne!(base, reseeded.compute_hash());
    }

    #[test]
    fn test_commands_at() {
        let mut rec = InputRecording::new(1);
        rec.record_command(5, SessionCommand::TogglePause);
        rec.record_command(5, SessionCommand::ToggleMute);
        rec.record_command(9, SessionCommand::TogglePause);

        assert_eq!(rec.commands_at(4).count(), 0);
        let at5: Vec<_> = rec.commands_at(5).collect();
        assert_eq!(at5, vec![SessionCommand::TogglePause, SessionCommand::ToggleMute]);
        assert_eq!(rec.commands_at(9).count(), 1);
    }

    fn raw_strategy() -> impl Strategy<Value = RawInput> {
        (any::<[bool; 5]>(), any::<[bool; 5]>()).prop_map(|(k, t)| RawInput {
            left: k[0],
            right: k[1],
            jump: k[2],
            attack: k[3],
            pause: k[4],
            touch: TouchInputState {
                left: t[0],
                right: t[1],
                jump_held: t[2],
                jump_pulse: t[3],
                attack_pulse: t[4],
            },
        })
    }

    proptest! {
        #[test]
        fn prop_frame_packing_preserves_input(raw in raw_strategy()) {
            prop_assert_eq!(InputFrame::from_raw(&raw).to_raw(), raw);
        }

        #[test]
        fn prop_jump_pressed_needs_release_or_pulse(seq in prop::collection::vec(raw_strategy(), 1..64)) {
            let mut ctl = InputController::new();
            let mut prev_held = false;
            for raw in &seq {
                let out = ctl.update(raw);
                if out.state.jump_pressed && !raw.touch.jump_pulse {
                    prop_assert!(!prev_held);
                    prop_assert!(out.state.jump_held);
                }
                prev_held = out.state.jump_held;
            }
        }
    }
}
