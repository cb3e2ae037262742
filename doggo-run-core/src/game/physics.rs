//! Arcade Body Physics
//!
//! Velocity-based movement with gravity and axis-separated AABB resolution
//! against static rectangles. Each axis is integrated and resolved in turn
//! (X then Y), which keeps corner cases stable for a side-scroller.

use serde::{Serialize, Deserialize};

use crate::core::geom::{Rect, Vec2};

/// Which sides of a body were blocked during the last step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blocked {
    /// Hit a ceiling
    pub up: bool,
    /// Standing on something
    pub down: bool,
    /// Hit something on the left
    pub left: bool,
    /// Hit something on the right
    pub right: bool,
}

impl Blocked {
    /// Nothing blocked.
    pub const NONE: Self = Self { up: false, down: false, left: false, right: false };
}

/// Static world limits.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    /// World width (x in [0, width])
    pub width: f32,
    /// World height (y in [0, height])
    pub height: f32,
}

/// A kinematic arcade body. Position is the body center.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Center position
    pub position: Vec2,
    /// Velocity (pixels/s)
    pub velocity: Vec2,
    /// Hitbox size
    pub size: Vec2,
    /// Affected by world gravity
    pub allow_gravity: bool,
    /// Integrates velocity at all (false = immovable)
    pub moves: bool,
    /// Takes part in collisions
    pub enabled: bool,
    /// Fraction of horizontal speed kept (reversed) on a side hit
    pub bounce_x: f32,
    /// Horizontal deceleration (pixels/s²)
    pub drag_x: f32,
    /// Clamp inside the world bounds
    pub collide_world_bounds: bool,
    /// Sides blocked during the last step
    pub blocked: Blocked,
}

impl Body {
    /// New dynamic body at a center position.
    pub fn new(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            allow_gravity: true,
            moves: true,
            enabled: true,
            bounce_x: 0.0,
            drag_x: 0.0,
            collide_world_bounds: true,
            blocked: Blocked::NONE,
        }
    }

    /// Hitbox in world space.
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, self.size)
    }

    /// Standing on a platform or the world floor.
    #[inline]
    pub fn on_ground(&self) -> bool {
        self.blocked.down
    }

    /// Bottom edge y.
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.y * 0.5
    }

    /// Make the body an immovable hazard.
    pub fn make_static(&mut self) {
        self.velocity = Vec2::ZERO;
        self.allow_gravity = false;
        self.moves = false;
    }
}

/// Advance a body by `dt` seconds against static solids.
pub fn step_body(body: &mut Body, solids: &[Rect], bounds: &WorldBounds, gravity: f32, dt: f32) {
    if !body.enabled || !body.moves {
        return;
    }

    body.blocked = Blocked::NONE;

    // 1. Forces
    if body.allow_gravity {
        body.velocity.y += gravity * dt;
    }
    if body.drag_x > 0.0 {
        let slow = body.drag_x * dt;
        body.velocity.x = if body.velocity.x.abs() <= slow {
            0.0
        } else {
            body.velocity.x - slow * body.velocity.x.signum()
        };
    }

    // 2. Horizontal move + resolve
    body.position.x += body.velocity.x * dt;
    resolve_x(body, solids);

    // 3. Vertical move + resolve
    body.position.y += body.velocity.y * dt;
    resolve_y(body, solids);

    // 4. World bounds
    if body.collide_world_bounds {
        clamp_to_bounds(body, bounds);
    }
}

fn resolve_x(body: &mut Body, solids: &[Rect]) {
    let half_w = body.size.x * 0.5;
    for solid in solids {
        let rect = body.rect();
        if !rect.penetrates(solid) {
            continue;
        }
        if body.velocity.x > 0.0 {
            body.position.x = solid.left() - half_w;
            body.blocked.right = true;
        } else if body.velocity.x < 0.0 {
            body.position.x = solid.right() + half_w;
            body.blocked.left = true;
        } else {
            continue;
        }
        body.velocity.x = -body.velocity.x * body.bounce_x;
    }
}

fn resolve_y(body: &mut Body, solids: &[Rect]) {
    let half_h = body.size.y * 0.5;
    for solid in solids {
        let rect = body.rect();
        if !rect.penetrates(solid) {
            continue;
        }
        if body.velocity.y > 0.0 {
            body.position.y = solid.top() - half_h;
            body.blocked.down = true;
        } else if body.velocity.y < 0.0 {
            body.position.y = solid.bottom() + half_h;
            body.blocked.up = true;
        } else {
            continue;
        }
        body.velocity.y = 0.0;
    }
}

fn clamp_to_bounds(body: &mut Body, bounds: &WorldBounds) {
    let half = body.size * 0.5;

    if body.position.x - half.x < 0.0 {
        body.position.x = half.x;
        body.velocity.x = body.velocity.x.max(0.0);
        body.blocked.left = true;
    } else if body.position.x + half.x > bounds.width {
        body.position.x = bounds.width - half.x;
        body.velocity.x = body.velocity.x.min(0.0);
        body.blocked.right = true;
    }

    if body.position.y - half.y < 0.0 {
        body.position.y = half.y;
        body.velocity.y = body.velocity.y.max(0.0);
        body.blocked.up = true;
    } else if body.position.y + half.y > bounds.height {
        body.position.y = bounds.height - half.y;
        body.velocity.y = body.velocity.y.min(0.0);
        body.blocked.down = true;
    }
}

// =============================================================================
// TESTS
// =============================================================================
