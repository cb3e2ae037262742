//! Enemy Dogs
//!
//! Four kinds share one body setup and a small AI state machine:
//!
//! - **Walker**: patrols back and forth around its spawn point
//! - **Jumper**: patrols and hops on a randomized cooldown
//! - **Chaser**: patrols until the player comes close, then pursues
//! - **Tank**: slow, tough, hits for double damage
//!
//! Any kind may spawn stationary, in which case it never moves and acts
//! as a hazard.

use serde::{Serialize, Deserialize};

use crate::core::geom::{Rect, Vec2};
use crate::core::hash::StateHasher;
use crate::core::rng::DeterministicRng;
use crate::game::physics::Body;

// =============================================================================
// TUNING
// =============================================================================

/// Sprite display size.
pub const ENEMY_DISPLAY_SIZE: Vec2 = Vec2::new(54.0, 46.0);
/// Hitbox as a fraction of the display size.
pub const ENEMY_HITBOX_SCALE: Vec2 = Vec2::new(0.8, 0.9);
/// Horizontal bounce off walls.
pub const ENEMY_BOUNCE_X: f32 = 0.1;
/// Horizontal drag (pixels/s²).
pub const ENEMY_DRAG_X: f32 = 200.0;
/// Distance ahead checked for the end of the walkable world.
pub const LEDGE_PROBE: f32 = 40.0;
/// Margin from each world edge the ledge probe must stay inside.
pub const LEDGE_MARGIN: f32 = 50.0;
/// Jumper hop speed.
pub const JUMPER_JUMP_VELOCITY: f32 = 250.0;
/// First jumper cooldown.
pub const JUMPER_INITIAL_COOLDOWN_MS: f32 = 2000.0;
/// Chaser hop speed when the player is above.
pub const CHASER_JUMP_VELOCITY: f32 = 300.0;
/// How far above the chaser the player must be to trigger a hop.
pub const CHASER_JUMP_HEIGHT: f32 = 50.0;
/// Chase ends beyond this multiple of the aggro range.
pub const AGGRO_RELEASE_FACTOR: f32 = 1.5;
/// Horizontal knockback speed when damaged.
pub const KNOCKBACK_SPEED: f32 = 100.0;
/// White flash after a hit.
pub const HIT_FLASH_MS: f32 = 100.0;
/// Flip-and-fade duration before removal.
pub const DEATH_ANIMATION_MS: f32 = 500.0;
/// Speed gain per difficulty level above 1.
pub const DIFFICULTY_SPEED_STEP: f32 = 0.12;
/// Cap on horizontal speed after difficulty scaling.
pub const MAX_SCALED_VELOCITY: f32 = 500.0;

// =============================================================================
// KINDS
// =============================================================================

/// Enemy archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Back-and-forth patrol
    Walker,
    /// Patrol with periodic hops
    Jumper,
    /// Pursues the player inside its aggro range
    Chaser,
    /// Slow, two hits to kill
    Tank,
}

/// Per-kind statistics.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    /// Hits to kill
    pub health: i32,
    /// Patrol speed (pixels/s)
    pub speed: f32,
    /// Damage dealt on contact
    pub damage: u32,
    /// Points awarded per damaging hit
    pub points: u32,
    /// Distance from spawn before turning around
    pub patrol_range: f32,
    /// Distance at which a chaser notices the player
    pub aggro_range: Option<f32>,
    /// Forced turn-around interval
    pub direction_timeout_ms: f32,
}

impl EnemyKind {
    /// All kinds, in texture order.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Walker,
        EnemyKind::Jumper,
        EnemyKind::Chaser,
        EnemyKind::Tank,
    ];

    /// Base statistics.
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyKind::Walker => EnemyStats {
                health: 1,
                speed: 15.0,
                damage: 1,
                points: 10,
                patrol_range: 150.0,
                aggro_range: None,
                direction_timeout_ms: 3000.0,
            },
            EnemyKind::Jumper => EnemyStats {
                health: 1,
                speed: 12.0,
                damage: 1,
                points: 15,
                patrol_range: 100.0,
                aggro_range: None,
                direction_timeout_ms: 3000.0,
            },
            EnemyKind::Chaser => EnemyStats {
                health: 1,
                speed: 25.0,
                damage: 1,
                points: 20,
                patrol_range: 100.0,
                aggro_range: Some(200.0),
                direction_timeout_ms: 3000.0,
            },
            EnemyKind::Tank => EnemyStats {
                health: 2,
                speed: 8.0,
                damage: 2,
                points: 30,
                patrol_range: 80.0,
                aggro_range: None,
                direction_timeout_ms: 4000.0,
            },
        }
    }

    /// Texture key (`enemy1`..`enemy4`).
    pub fn texture_key(self) -> &'static str {
        match self {
            EnemyKind::Walker => "enemy1",
            EnemyKind::Jumper => "enemy2",
            EnemyKind::Chaser => "enemy3",
            EnemyKind::Tank => "enemy4",
        }
    }

    /// Uniformly random kind.
    pub fn random(rng: &mut DeterministicRng) -> Self {
        Self::ALL[rng.next_int(Self::ALL.len() as u32) as usize]
    }
}

/// AI state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    /// Stationary obstacle
    Idle,
    /// Walking around the spawn point
    #[default]
    Patrol,
    /// Pursuing the player
    Chase,
    /// Airborne from a jumper hop
    Jump,
    /// Playing the death animation
    Dead,
}

/// Presentation tint, highest priority first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyTint {
    /// Dying
    Dead,
    /// Just took damage
    HitFlash,
    /// Chaser with the player in range
    Aggro,
    /// Tank body colour
    TankGrey,
    /// Untinted
    Normal,
}

impl EnemyTint {
    /// Multiply colour as 0xRRGGBB.
    pub fn rgb(self) -> u32 {
        match self {
            EnemyTint::Dead => 0x666666,
            EnemyTint::HitFlash => 0xffffff,
            EnemyTint::Aggro => 0xff6666,
            EnemyTint::TankGrey => 0x888888,
            EnemyTint::Normal => 0xffffff,
        }
    }
}

/// Result of [`Enemy::take_damage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Already dead
    Ignored,
    /// Damaged but alive
    Hurt,
    /// Health reached zero
    Killed,
}

/// Change in a chaser's awareness of the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AggroChange {
    /// Player entered the aggro range
    Gained,
    /// Player left the release range
    Lost,
}

// =============================================================================
// ENEMY
// =============================================================================

/// One enemy dog.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Enemy {
    /// Stable id within the level
    pub id: u32,
    /// Archetype
    pub kind: EnemyKind,
    /// Statistics (speed already scaled by difficulty)
    pub stats: EnemyStats,
    /// Physics body (hitbox)
    pub body: Body,
    /// AI state
    pub state: AiState,
    /// Never moves
    pub stationary: bool,
    /// Player inside the aggro range (chasers only)
    pub aggro: bool,
    /// Remaining health
    pub health: i32,
    /// Sprite faces left
    pub facing_left: bool,
    patrol_origin_x: f32,
    patrol_dir: f32,
    direction_timer_ms: f32,
    last_jump_ms: f32,
    jump_cooldown_ms: f32,
    hit_flash_ms: f32,
    death_ms: f32,
}

impl Enemy {
    /// Spawn with the sprite centered on `position`.
    pub fn new(id: u32, kind: EnemyKind, position: Vec2, stationary: bool) -> Self {
        let stats = kind.stats();
        let size = Vec2::new(
            ENEMY_DISPLAY_SIZE.x * ENEMY_HITBOX_SCALE.x,
            ENEMY_DISPLAY_SIZE.y * ENEMY_HITBOX_SCALE.y,
        );

        // Hitbox shares the sprite's bottom edge
        let center = Vec2::new(position.x, position.y + (ENEMY_DISPLAY_SIZE.y - size.y) * 0.5);
        let mut body = Body::new(center, size);
        body.bounce_x = ENEMY_BOUNCE_X;
        body.drag_x = ENEMY_DRAG_X;

        let state = if stationary {
            body.make_static();
            AiState::Idle
        } else {
            AiState::Patrol
        };

        Self {
            id,
            kind,
            stats,
            body,
            state,
            stationary,
            aggro: false,
            health: stats.health,
            facing_left: false,
            patrol_origin_x: position.x,
            patrol_dir: 1.0,
            direction_timer_ms: 0.0,
            last_jump_ms: 0.0,
            jump_cooldown_ms: JUMPER_INITIAL_COOLDOWN_MS,
            hit_flash_ms: 0.0,
            death_ms: 0.0,
        }
    }

    /// Hitbox.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Where the sprite is drawn (hitbox is bottom-aligned with it).
    #[inline]
    pub fn sprite_center(&self) -> Vec2 {
        Vec2::new(
            self.body.position.x,
            self.body.position.y - (ENEMY_DISPLAY_SIZE.y - self.body.size.y) * 0.5,
        )
    }

    /// Alive and collidable.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.state != AiState::Dead && self.health > 0
    }

    /// Death animation finished.
    #[inline]
    pub fn is_removable(&self) -> bool {
        self.state == AiState::Dead && self.death_ms <= 0.0
    }

    /// Death animation progress in [0, 1].
    pub fn death_progress(&self) -> f32 {
        if self.state != AiState::Dead {
            return 0.0;
        }
        1.0 - (self.death_ms / DEATH_ANIMATION_MS).clamp(0.0, 1.0)
    }

    /// Current patrol direction (-1 or +1).
    #[inline]
    pub fn patrol_direction(&self) -> f32 {
        self.patrol_dir
    }

    /// Scale speed for the difficulty level (level 1 is unscaled).
    pub fn apply_difficulty(&mut self, level: u32) {
        let multiplier = 1.0 + level.saturating_sub(1) as f32 * DIFFICULTY_SPEED_STEP;
        if self.body.velocity.x != 0.0 {
            self.body.velocity.x = (self.body.velocity.x * multiplier)
                .clamp(-MAX_SCALED_VELOCITY, MAX_SCALED_VELOCITY);
        }
        self.stats.speed *= multiplier;
    }

    /// Run one frame of AI. `now_ms` is level time; `player` is the player center.
    ///
    /// Returns a chaser's aggro change, if any.
    pub fn update_ai(
        &mut self,
        now_ms: f32,
        dt_ms: f32,
        player: Vec2,
        world_width: f32,
        rng: &mut DeterministicRng,
    ) -> Option<AggroChange> {
        if self.state == AiState::Dead {
            return None;
        }

        self.direction_timer_ms += dt_ms;

        let change = match self.stats.aggro_range {
            Some(range) => self.check_aggro(player, range),
            None => None,
        };

        if self.stationary {
            return change;
        }

        match self.kind {
            EnemyKind::Walker | EnemyKind::Tank => self.patrol(world_width),
            EnemyKind::Jumper => self.jumper(now_ms, world_width, rng),
            EnemyKind::Chaser => {
                if self.state == AiState::Chase {
                    self.chase(player);
                } else {
                    self.patrol(world_width);
                }
            }
        }

        change
    }

    fn check_aggro(&mut self, player: Vec2, range: f32) -> Option<AggroChange> {
        let distance = self.body.position.distance(player);

        if distance < range && !self.aggro {
            self.aggro = true;
            if !self.stationary {
                self.state = AiState::Chase;
            }
            Some(AggroChange::Gained)
        } else if distance > range * AGGRO_RELEASE_FACTOR && self.aggro {
            self.aggro = false;
            if self.state == AiState::Chase {
                self.state = AiState::Patrol;
            }
            Some(AggroChange::Lost)
        } else {
            None
        }
    }

    fn patrol(&mut self, world_width: f32) {
        let dir = self.patrol_dir;
        let beyond_range = (self.body.position.x - self.patrol_origin_x) * dir > self.stats.patrol_range;
        let blocked = (dir < 0.0 && self.body.blocked.left) || (dir > 0.0 && self.body.blocked.right);
        let timed_out = self.direction_timer_ms > self.stats.direction_timeout_ms;
        let probe = self.body.position.x + LEDGE_PROBE * dir;
        let at_ledge = probe < LEDGE_MARGIN || probe > world_width - LEDGE_MARGIN;

        if beyond_range || blocked || timed_out || at_ledge {
            self.patrol_dir = -dir;
            self.direction_timer_ms = 0.0;
        }

        self.body.velocity.x = self.stats.speed * self.patrol_dir;
        self.facing_left = self.patrol_dir < 0.0;
    }

    fn jumper(&mut self, now_ms: f32, world_width: f32, rng: &mut DeterministicRng) {
        if self.state == AiState::Jump && self.body.on_ground() && self.body.velocity.y >= 0.0 {
            self.state = AiState::Patrol;
        }

        self.patrol(world_width);

        if self.body.on_ground() && now_ms - self.last_jump_ms > self.jump_cooldown_ms {
            self.body.velocity.y = -JUMPER_JUMP_VELOCITY;
            self.last_jump_ms = now_ms;
            self.jump_cooldown_ms = rng.next_range(1500.0, 3500.0);
            self.state = AiState::Jump;
        }
    }

    fn chase(&mut self, player: Vec2) {
        let dir = if player.x > self.body.position.x { 1.0 } else { -1.0 };
        self.body.velocity.x = self.stats.speed * dir;
        self.facing_left = dir < 0.0;

        if player.y < self.body.position.y - CHASER_JUMP_HEIGHT && self.body.on_ground() {
            self.body.velocity.y = -CHASER_JUMP_VELOCITY;
        }
    }

    /// Apply damage with flash and knockback.
    pub fn take_damage(&mut self, amount: i32) -> DamageOutcome {
        if !self.is_alive() {
            return DamageOutcome::Ignored;
        }

        self.health -= amount;
        self.hit_flash_ms = HIT_FLASH_MS;
        if self.body.moves {
            self.body.velocity.x = if self.facing_left { KNOCKBACK_SPEED } else { -KNOCKBACK_SPEED };
        }

        if self.health <= 0 {
            self.die();
            DamageOutcome::Killed
        } else {
            DamageOutcome::Hurt
        }
    }

    /// Start the death animation and drop out of collisions.
    pub fn die(&mut self) {
        self.state = AiState::Dead;
        self.aggro = false;
        self.body.enabled = false;
        self.death_ms = DEATH_ANIMATION_MS;
    }

    /// Advance flash and death timers.
    pub fn tick_timers(&mut self, dt_ms: f32) {
        self.hit_flash_ms = (self.hit_flash_ms - dt_ms).max(0.0);
        if self.state == AiState::Dead {
            self.death_ms = (self.death_ms - dt_ms).max(0.0);
        }
    }

    /// Tint for the renderer.
    pub fn tint(&self) -> EnemyTint {
        if self.state == AiState::Dead {
            EnemyTint::Dead
        } else if self.hit_flash_ms > 0.0 {
            EnemyTint::HitFlash
        } else if self.aggro {
            EnemyTint::Aggro
        } else if self.kind == EnemyKind::Tank {
            EnemyTint::TankGrey
        } else {
            EnemyTint::Normal
        }
    }

    /// Add enemy state to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_u8(self.kind as u8);
        hasher.update_u8(self.state as u8);
        hasher.update_vec2(self.body.position);
        hasher.update_vec2(self.body.velocity);
        hasher.update_i32(self.health);
        hasher.update_bool(self.aggro);
        hasher.update_f32(self.patrol_dir);
        hasher.update_f32(self.jump_cooldown_ms);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1000.0 / 60.0;
    const WORLD: f32 = 25_000.0;
    const FAR: Vec2 = Vec2::new(20_000.0, 100.0);

    fn grounded(kind: EnemyKind, x: f32) -> Enemy {
        let mut e = Enemy::new(0, kind, Vec2::new(x, 500.0), false);
        e.body.blocked.down = true;
        e
    }

    #[test]
    fn test_stats_table() {
        assert_eq!(EnemyKind::Walker.stats().points, 10);
        assert_eq!(EnemyKind::Jumper.stats().speed, 12.0);
        assert_eq!(EnemyKind::Chaser.stats().aggro_range, Some(200.0));
        assert_eq!(EnemyKind::Tank.stats().health, 2);
        assert_eq!(EnemyKind::Tank.stats().damage, 2);
        assert_eq!(EnemyKind::Tank.stats().direction_timeout_ms, 4000.0);
        assert_eq!(EnemyKind::Tank.texture_key(), "enemy4");
    }

    #[test]
    fn test_hitbox_bottom_aligned() {
        let e = Enemy::new(0, EnemyKind::Walker, Vec2::new(100.0, 500.0), false);
        assert!((e.body.size.x - 43.2).abs() < 1e-4);
        assert!((e.body.size.y - 41.4).abs() < 1e-4);
        assert!((e.rect().bottom() - 523.0).abs() < 1e-3);
        assert!((e.sprite_center().y - 500.0).abs() < 1e-3);
    }

    #[test]
    fn test_patrol_reverses_past_range() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Walker, 1000.0);
        e.body.position.x = 1151.0;

        e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.patrol_direction(), -1.0);
        assert_eq!(e.body.velocity.x, -15.0);
        assert!(e.facing_left);

        // Still past range but heading home: no flip-flop
        e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.patrol_direction(), -1.0);
    }

    #[test]
    fn test_patrol_turns_on_timeout() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Walker, 1000.0);

        for _ in 0..170 {
            e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        }
        assert_eq!(e.patrol_direction(), 1.0);

        for _ in 0..20 {
            e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        }
        assert_eq!(e.patrol_direction(), -1.0);
    }

    #[test]
    fn test_ledge_probe_reverses_once() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Walker, WORLD - 80.0);

        // Probe is past the margin AND patrol timed out: single reversal
        e.direction_timer_ms = 10_000.0;
        e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.patrol_direction(), -1.0);
    }

    #[test]
    fn test_blocked_side_reverses() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Tank, 1000.0);
        e.body.blocked.right = true;
        e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.patrol_direction(), -1.0);
        assert_eq!(e.body.velocity.x, -8.0);
    }

    #[test]
    fn test_jumper_jumps_after_cooldown() {
        let mut rng = DeterministicRng::new(7);
        let mut e = grounded(EnemyKind::Jumper, 1000.0);

        e.update_ai(1000.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.body.velocity.y, 0.0);

        e.update_ai(2001.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.body.velocity.y, -JUMPER_JUMP_VELOCITY);
        assert_eq!(e.state, AiState::Jump);
        assert!(e.jump_cooldown_ms >= 1500.0 && e.jump_cooldown_ms < 3500.0);

        // Airborne, then lands
        e.body.blocked.down = false;
        e.update_ai(2100.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.state, AiState::Jump);

        e.body.blocked.down = true;
        e.body.velocity.y = 0.0;
        e.update_ai(2200.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.state, AiState::Patrol);
    }

    #[test]
    fn test_chaser_aggro_hysteresis() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Chaser, 1000.0);
        let y = e.body.position.y;

        assert_eq!(
            e.update_ai(0.0, DT, Vec2::new(1150.0, y), WORLD, &mut rng),
            Some(AggroChange::Gained)
        );
        assert_eq!(e.state, AiState::Chase);
        assert_eq!(e.body.velocity.x, 25.0);
        assert_eq!(e.tint(), EnemyTint::Aggro);

        // Between 200 and 300: still chasing
        assert_eq!(e.update_ai(0.0, DT, Vec2::new(1250.0, y), WORLD, &mut rng), None);
        assert_eq!(e.state, AiState::Chase);

        assert_eq!(
            e.update_ai(0.0, DT, Vec2::new(1400.0, y), WORLD, &mut rng),
            Some(AggroChange::Lost)
        );
        assert_eq!(e.state, AiState::Patrol);
    }

    #[test]
    fn test_chaser_hops_toward_higher_player() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Chaser, 1000.0);
        let y = e.body.position.y;

        e.update_ai(0.0, DT, Vec2::new(900.0, y - 100.0), WORLD, &mut rng);
        assert_eq!(e.body.velocity.x, -25.0);
        assert_eq!(e.body.velocity.y, -CHASER_JUMP_VELOCITY);
        assert!(e.facing_left);
    }

    #[test]
    fn test_stationary_tracks_aggro_without_moving() {
        let mut rng = DeterministicRng::new(1);
        let mut e = Enemy::new(0, EnemyKind::Chaser, Vec2::new(1000.0, 500.0), true);
        let start = e.body.position;

        let change = e.update_ai(0.0, DT, Vec2::new(1050.0, 500.0), WORLD, &mut rng);
        assert_eq!(change, Some(AggroChange::Gained));
        assert_eq!(e.state, AiState::Idle);
        assert_eq!(e.body.velocity, Vec2::ZERO);
        assert_eq!(e.body.position, start);
        assert_eq!(e.tint(), EnemyTint::Aggro);
    }

    #[test]
    fn test_take_damage_and_death() {
        let mut e = grounded(EnemyKind::Tank, 1000.0);

        assert_eq!(e.take_damage(1), DamageOutcome::Hurt);
        assert_eq!(e.tint(), EnemyTint::HitFlash);
        assert_eq!(e.body.velocity.x, -KNOCKBACK_SPEED);

        e.tick_timers(DT * 7.0);
        assert_eq!(e.tint(), EnemyTint::TankGrey);

        assert_eq!(e.take_damage(1), DamageOutcome::Killed);
        assert!(!e.is_alive());
        assert!(!e.body.enabled);
        assert_eq!(e.tint(), EnemyTint::Dead);
        assert_eq!(e.take_damage(1), DamageOutcome::Ignored);

        assert!(!e.is_removable());
        for _ in 0..31 {
            e.tick_timers(DT);
        }
        assert!(e.is_removable());
        assert_eq!(e.death_progress(), 1.0);
    }

    #[test]
    fn test_knockback_away_from_facing() {
        let mut e = grounded(EnemyKind::Walker, 1000.0);
        e.facing_left = true;
        e.take_damage(0);
        assert_eq!(e.body.velocity.x, KNOCKBACK_SPEED);
    }

    #[test]
    fn test_apply_difficulty() {
        let mut e = grounded(EnemyKind::Chaser, 1000.0);
        e.apply_difficulty(1);
        assert_eq!(e.stats.speed, 25.0);

        e.body.velocity.x = -490.0;
        e.apply_difficulty(3);
        assert!((e.stats.speed - 31.0).abs() < 1e-4);
        assert_eq!(e.body.velocity.x, -MAX_SCALED_VELOCITY);
    }

    #[test]
    fn test_dead_enemy_skips_ai() {
        let mut rng = DeterministicRng::new(1);
        let mut e = grounded(EnemyKind::Walker, 1000.0);
        e.die();
        e.body.velocity.x = 0.0;
        e.update_ai(0.0, DT, FAR, WORLD, &mut rng);
        assert_eq!(e.body.velocity.x, 0.0);
    }
}
