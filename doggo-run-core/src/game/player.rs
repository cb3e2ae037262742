//! Player Controller
//!
//! Horizontal running, buffered variable-height jumps, the attack beam,
//! and hit handling with a short invulnerability window.

use serde::{Serialize, Deserialize};

use crate::core::geom::{Rect, Vec2};
use crate::core::hash::StateHasher;
use crate::game::input::InputState;
use crate::game::physics::Body;

// =============================================================================
// TUNING
// =============================================================================

/// Run speed (pixels/s).
pub const PLAYER_SPEED: f32 = 210.0;
/// Initial upward speed of a jump (pixels/s).
pub const JUMP_VELOCITY: f32 = 900.0;
/// Window in which releasing jump shortens it.
pub const MAX_JUMP_HOLD_MS: f32 = 150.0;
/// How long an early jump press is remembered before landing.
pub const JUMP_BUFFER_MS: f32 = 100.0;
/// Rising speed multiplier when jump is released early.
pub const JUMP_CUT_FACTOR: f32 = 0.5;
/// Minimum time between beams.
pub const ATTACK_COOLDOWN_MS: f32 = 300.0;
/// Beam length.
pub const BEAM_LENGTH: f32 = 200.0;
/// Beam thickness.
pub const BEAM_HEIGHT: f32 = 8.0;
/// Upward speed after stomping an enemy.
pub const STOMP_BOUNCE_VELOCITY: f32 = 450.0;
/// Invulnerability after taking a hit.
pub const INVULNERABLE_MS: f32 = 1000.0;
/// Upward hop when hurt.
pub const HURT_HOP_VELOCITY: f32 = 300.0;
/// Player display size (the hitbox uses the full sprite).
pub const PLAYER_SIZE: Vec2 = Vec2::new(64.0, 60.0);

/// Horizontal facing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Facing {
    /// Facing left (sprite flipped)
    Left,
    /// Facing right
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right.
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

/// What happened during a movement update.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementOutcome {
    /// A jump started this frame
    pub jumped: bool,
    /// A beam was fired this frame
    pub beam: Option<Rect>,
}

/// Result of [`Player::take_hit`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invulnerable or already down
    Ignored,
    /// Took damage and survived
    Hurt {
        /// Health left
        health: u32,
    },
    /// Health reached zero
    Defeated,
}

/// The dog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Physics body
    pub body: Body,
    /// Last horizontal direction pressed
    pub facing: Facing,
    /// In the variable-height part of a jump
    pub jumping: bool,
    /// Time spent in the current jump
    pub jump_hold_ms: f32,
    /// Remaining jump buffer
    pub jump_buffer_ms: f32,
    /// Remaining attack cooldown
    pub attack_cooldown_ms: f32,
    /// Remaining invulnerability
    pub invulnerable_ms: f32,
    /// Current hearts
    pub health: u32,
    /// Maximum hearts
    pub max_health: u32,
}

impl Player {
    /// Spawn the player.
    ///
    /// `spawn` is where the sprite's center would sit before the spawn lift;
    /// the body is raised by half its height so the feet start clear of
    /// whatever is below.
    pub fn new(spawn: Vec2, health: u32, max_health: u32) -> Self {
        let position = Vec2::new(spawn.x, spawn.y - PLAYER_SIZE.y * 0.5);
        Self {
            body: Body::new(position, PLAYER_SIZE),
            facing: Facing::Right,
            jumping: false,
            jump_hold_ms: 0.0,
            jump_buffer_ms: 0.0,
            attack_cooldown_ms: 0.0,
            invulnerable_ms: 0.0,
            health: health.min(max_health),
            max_health,
        }
    }

    /// Center position.
    #[inline]
    pub fn position(&self) -> Vec2 {
        self.body.position
    }

    /// Hitbox.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Standing on something.
    #[inline]
    pub fn is_grounded(&self) -> bool {
        self.body.on_ground()
    }

    /// Moving downward.
    #[inline]
    pub fn is_falling(&self) -> bool {
        self.body.velocity.y > 0.0
    }

    /// Currently ignoring hits.
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_ms > 0.0
    }

    /// Apply one frame of input.
    pub fn update_movement(&mut self, dt_ms: f32, input: &InputState) -> MovementOutcome {
        let mut outcome = MovementOutcome::default();

        self.attack_cooldown_ms = (self.attack_cooldown_ms - dt_ms).max(0.0);
        self.invulnerable_ms = (self.invulnerable_ms - dt_ms).max(0.0);

        // Horizontal: exactly one direction held moves, anything else stops
        if input.left && !input.right {
            self.body.velocity.x = -PLAYER_SPEED;
            self.facing = Facing::Left;
        } else if input.right && !input.left {
            self.body.velocity.x = PLAYER_SPEED;
            self.facing = Facing::Right;
        } else {
            self.body.velocity.x = 0.0;
        }

        // Jump buffer
        if input.jump_pressed {
            self.jump_buffer_ms = JUMP_BUFFER_MS;
        }
        if self.jump_buffer_ms > 0.0 && self.is_grounded() {
            self.body.velocity.y = -JUMP_VELOCITY;
            self.jumping = true;
            self.jump_hold_ms = 0.0;
            self.jump_buffer_ms = 0.0;
            outcome.jumped = true;
        } else {
            self.jump_buffer_ms = (self.jump_buffer_ms - dt_ms).max(0.0);
        }

        // Variable height
        if self.jumping && !outcome.jumped {
            self.jump_hold_ms += dt_ms;
            if !input.jump_held {
                if self.body.velocity.y < 0.0 {
                    self.body.velocity.y *= JUMP_CUT_FACTOR;
                }
                self.jumping = false;
            } else if self.jump_hold_ms > MAX_JUMP_HOLD_MS
                || (self.is_grounded() && self.body.velocity.y >= 0.0)
            {
                self.jumping = false;
            }
        }

        if input.attack_pressed {
            outcome.beam = self.attack();
        }

        outcome
    }

    /// Fire the beam if the cooldown allows.
    pub fn attack(&mut self) -> Option<Rect> {
        if self.attack_cooldown_ms > 0.0 {
            return None;
        }
        self.attack_cooldown_ms = ATTACK_COOLDOWN_MS;
        Some(self.beam_rect())
    }

    /// Beam area: starts at the leading edge and extends in the facing direction.
    pub fn beam_rect(&self) -> Rect {
        let dir = self.facing.sign();
        let start_x = self.body.position.x + dir * self.body.size.x * 0.5;
        let center = Vec2::new(start_x + dir * BEAM_LENGTH * 0.5, self.body.position.y);
        Rect::from_center(center, Vec2::new(BEAM_LENGTH, BEAM_HEIGHT))
    }

    /// Take damage unless invulnerable.
    pub fn take_hit(&mut self, damage: u32) -> HitOutcome {
        if self.is_invulnerable() || self.health == 0 {
            return HitOutcome::Ignored;
        }

        self.health = self.health.saturating_sub(damage);
        if self.health == 0 {
            return HitOutcome::Defeated;
        }

        self.invulnerable_ms = INVULNERABLE_MS;
        self.body.velocity.y = -HURT_HOP_VELOCITY;
        self.jumping = false;
        HitOutcome::Hurt { health: self.health }
    }

    /// Bounce off a stomped enemy.
    pub fn bounce(&mut self) {
        self.body.velocity.y = -STOMP_BOUNCE_VELOCITY;
        self.jumping = false;
    }

    /// Add player state to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_vec2(self.body.position);
        hasher.update_vec2(self.body.velocity);
        hasher.update_bool(self.facing == Facing::Right);
        hasher.update_bool(self.jumping);
        hasher.update_f32(self.jump_buffer_ms);
        hasher.update_f32(self.attack_cooldown_ms);
        hasher.update_f32(self.invulnerable_ms);
        hasher.update_u32(self.health);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::physics::{step_body, WorldBounds};

    const DT_MS: f32 = 1000.0 / 60.0;

    fn grounded_player() -> Player {
        let mut p = Player::new(Vec2::new(100.0, 620.0), 3, 3);
        p.body.blocked.down = true;
        p
    }

    fn press_jump() -> InputState {
        InputState { jump_pressed: true, jump_held: true, ..Default::default() }
    }

    #[test]
    fn test_spawn_lift() {
        let p = Player::new(Vec2::new(100.0, 380.0), 3, 3);
        assert_eq!(p.position(), Vec2::new(100.0, 350.0));
    }

    #[test]
    fn test_horizontal_movement_and_facing() {
        let mut p = grounded_player();

        p.update_movement(DT_MS, &InputState { left: true, ..Default::default() });
        assert_eq!(p.body.velocity.x, -PLAYER_SPEED);
        assert_eq!(p.facing, Facing::Left);

        p.update_movement(DT_MS, &InputState { left: true, right: true, ..Default::default() });
        assert_eq!(p.body.velocity.x, 0.0);
        assert_eq!(p.facing, Facing::Left);

        p.update_movement(DT_MS, &InputState { right: true, ..Default::default() });
        assert_eq!(p.body.velocity.x, PLAYER_SPEED);
        assert_eq!(p.facing, Facing::Right);

        p.update_movement(DT_MS, &InputState::default());
        assert_eq!(p.body.velocity.x, 0.0);
        assert_eq!(p.facing, Facing::Right);
    }

    #[test]
    fn test_jump_requires_ground() {
        let mut p = grounded_player();
        let out = p.update_movement(DT_MS, &press_jump());
        assert!(out.jumped);
        assert_eq!(p.body.velocity.y, -JUMP_VELOCITY);

        let mut airborne = Player::new(Vec2::new(100.0, 300.0), 3, 3);
        let out = airborne.update_movement(DT_MS, &press_jump());
        assert!(!out.jumped);
        assert_eq!(airborne.body.velocity.y, 0.0);
    }

    #[test]
    fn test_jump_buffer_fires_on_landing() {
        let mut p = Player::new(Vec2::new(100.0, 300.0), 3, 3);

        // Pressed while airborne
        p.update_movement(DT_MS, &press_jump());
        let held = InputState { jump_held: true, ..Default::default() };
        p.update_movement(DT_MS, &held);

        // Lands within the buffer window
        p.body.blocked.down = true;
        let out = p.update_movement(DT_MS, &held);
        assert!(out.jumped);
    }

    #[test]
    fn test_jump_buffer_expires() {
        let mut p = Player::new(Vec2::new(100.0, 300.0), 3, 3);
        p.update_movement(DT_MS, &press_jump());

        for _ in 0..10 {
            p.update_movement(DT_MS, &InputState::default());
        }

        p.body.blocked.down = true;
        assert!(!p.update_movement(DT_MS, &InputState::default()).jumped);
    }

    #[test]
    fn test_early_release_cuts_jump() {
        let mut p = grounded_player();
        p.update_movement(DT_MS, &press_jump());
        p.body.blocked.down = false;

        p.update_movement(DT_MS, &InputState::default());
        assert_eq!(p.body.velocity.y, -JUMP_VELOCITY * JUMP_CUT_FACTOR);
        assert!(!p.jumping);
    }

    #[test]
    fn test_full_hold_keeps_velocity() {
        let mut p = grounded_player();
        p.update_movement(DT_MS, &press_jump());
        p.body.blocked.down = false;

        let held = InputState { jump_held: true, ..Default::default() };
        for _ in 0..12 {
            p.update_movement(DT_MS, &held);
        }
        assert!(!p.jumping);

        // Releasing after the hold window has no effect
        let vy = p.body.velocity.y;
        p.update_movement(DT_MS, &InputState::default());
        assert_eq!(p.body.velocity.y, vy);
    }

    #[test]
    fn test_tap_jump_is_lower_than_held_jump() {
        fn apex(hold_frames: usize) -> f32 {
            let bounds = WorldBounds { width: 2000.0, height: 720.0 };
            let ground = [Rect::new(0.0, 620.0, 2000.0, 90.0)];
            let mut p = Player::new(Vec2::new(100.0, 620.0), 3, 3);
            for _ in 0..5 {
                step_body(&mut p.body, &ground, &bounds, 1800.0, DT_MS / 1000.0);
            }
            let start = p.position().y;
            let mut top = start;
            for frame in 0..90 {
                let input = InputState {
                    jump_pressed: frame == 0,
                    jump_held: frame < hold_frames,
                    ..Default::default()
                };
                p.update_movement(DT_MS, &input);
                step_body(&mut p.body, &ground, &bounds, 1800.0, DT_MS / 1000.0);
                top = top.min(p.position().y);
            }
            start - top
        }

        let tap = apex(2);
        let held = apex(60);
        assert!(held > tap + 50.0, "held {held} tap {tap}");
        assert!(held > 200.0 && held < 230.0, "held {held}");
    }

    #[test]
    fn test_attack_beam_and_cooldown() {
        let mut p = grounded_player();
        let attack = InputState { attack_pressed: true, ..Default::default() };

        let beam = p.update_movement(DT_MS, &attack).beam.unwrap();
        assert_eq!(beam.left(), p.position().x + 32.0);
        assert_eq!(beam.w, BEAM_LENGTH);
        assert_eq!(beam.h, BEAM_HEIGHT);
        assert_eq!(beam.center().y, p.position().y);

        // Cooldown blocks an immediate second beam
        assert!(p.update_movement(DT_MS, &attack).beam.is_none());

        for _ in 0..20 {
            p.update_movement(DT_MS, &InputState::default());
        }
        assert!(p.update_movement(DT_MS, &attack).beam.is_some());
    }

    #[test]
    fn test_beam_faces_left() {
        let mut p = grounded_player();
        p.update_movement(DT_MS, &InputState { left: true, ..Default::default() });
        let beam = p.beam_rect();
        assert_eq!(beam.right(), p.position().x - 32.0);
    }

    #[test]
    fn test_take_hit_and_invulnerability() {
        let mut p = grounded_player();

        assert_eq!(p.take_hit(1), HitOutcome::Hurt { health: 2 });
        assert!(p.is_invulnerable());
        assert_eq!(p.take_hit(1), HitOutcome::Ignored);

        p.invulnerable_ms = 0.0;
        assert_eq!(p.take_hit(2), HitOutcome::Defeated);
        assert_eq!(p.health, 0);
        assert_eq!(p.take_hit(1), HitOutcome::Ignored);
    }

    #[test]
    fn test_invulnerability_wears_off() {
        let mut p = grounded_player();
        p.take_hit(1);
        for _ in 0..61 {
            p.update_movement(DT_MS, &InputState::default());
        }
        assert!(!p.is_invulnerable());
    }

    #[test]
    fn test_bounce() {
        let mut p = grounded_player();
        p.body.velocity.y = 300.0;
        p.bounce();
        assert_eq!(p.body.velocity.y, -STOMP_BOUNCE_VELOCITY);
    }
}
