//! Core deterministic primitives.
//!
//! Geometry, seeded randomness and state hashing. Nothing in here knows
//! about dogs or levels.

pub mod geom;
pub mod rng;
pub mod hash;

// Re-export core types
pub use geom::{Rect, Vec2};
pub use rng::DeterministicRng;
pub use hash::{compute_state_hash, StateHash, StateHasher};
