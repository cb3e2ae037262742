//! Dog Food Collectibles

use serde::{Serialize, Deserialize};

use crate::core::geom::{Rect, Vec2};
use crate::core::hash::StateHasher;

/// Base display size before scaling.
pub const FOOD_BASE_SIZE: f32 = 32.0;
/// Hitbox as a fraction of the display size.
pub const FOOD_HITBOX_SCALE: f32 = 0.6;
/// One full turn takes this long.
pub const FOOD_SPIN_PERIOD_MS: f32 = 4000.0;
/// Points per pickup.
pub const FOOD_POINTS: u32 = 1;

/// A bowl of dog food.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DogFood {
    /// Stable id within the level
    pub id: u32,
    /// Center position
    pub position: Vec2,
    /// Display scale
    pub scale: f32,
    /// Eating this one ends the level
    pub is_final: bool,
    /// Already eaten
    pub collected: bool,
    /// Rotation in degrees, [0, 360)
    pub spin: f32,
}

impl DogFood {
    /// Place a food item.
    pub fn new(id: u32, position: Vec2, scale: f32, is_final: bool) -> Self {
        Self {
            id,
            position,
            scale,
            is_final,
            collected: false,
            spin: 0.0,
        }
    }

    /// Rendered edge length.
    #[inline]
    pub fn display_size(&self) -> f32 {
        FOOD_BASE_SIZE * self.scale
    }

    /// Pickup area.
    pub fn rect(&self) -> Rect {
        let side = self.display_size() * FOOD_HITBOX_SCALE;
        Rect::from_center(self.position, Vec2::new(side, side))
    }

    /// Advance the idle spin.
    pub fn update_spin(&mut self, dt_ms: f32) {
        self.spin = (self.spin + 360.0 * dt_ms / FOOD_SPIN_PERIOD_MS) % 360.0;
    }

    /// Mark as eaten. Returns false if it was already gone.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }

    /// Add food state to a state hash.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u32(self.id);
        hasher.update_vec2(self.position);
        hasher.update_bool(self.collected);
    }
}
