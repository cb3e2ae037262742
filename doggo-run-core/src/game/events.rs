//! Game Events
//!
//! Events generated during simulation. The session scores from them, the
//! client turns them into effects and sounds, and the headless runner logs
//! them.

use serde::{Serialize, Deserialize};

use crate::core::geom::{Rect, Vec2};
use crate::game::enemy::EnemyKind;
use crate::game::level::LevelId;

/// How an enemy was damaged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HitCause {
    /// Player landed on it
    Stomp,
    /// Attack beam
    Beam,
}

/// Why a level was cleared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearReason {
    /// Touched the goal flag
    Goal,
    /// Ate the final food
    FinalFood,
    /// Ate every food item
    AllFood,
}

/// Named sound effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Jump started
    Jump,
    /// Food eaten
    Pickup,
    /// Player hurt
    Hit,
    /// Enemy damaged
    EnemyDown,
}

impl SoundCue {
    /// Audio asset key.
    pub fn key(self) -> &'static str {
        match self {
            SoundCue::Jump => "jump",
            SoundCue::Pickup => "pickup",
            SoundCue::Hit => "hit",
            SoundCue::EnemyDown => "enemy_down",
        }
    }
}

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// A level (re)started
    LevelStarted {
        /// Level
        level: LevelId,
        /// Restart count within this visit
        attempt: u32,
    },

    /// Player left the ground
    Jumped {
        /// Player center at take-off
        position: Vec2,
    },

    /// Attack beam fired
    BeamFired {
        /// Beam area
        beam: Rect,
    },

    /// An enemy took damage
    EnemyHit {
        /// Enemy id
        enemy_id: u32,
        /// Enemy kind
        kind: EnemyKind,
        /// Stomp or beam
        cause: HitCause,
        /// Health reached zero
        killed: bool,
        /// Points awarded
        points: u32,
        /// Enemy sprite center
        position: Vec2,
    },

    /// A chaser noticed or lost the player
    EnemyAggro {
        /// Enemy id
        enemy_id: u32,
        /// Now chasing
        aggro: bool,
    },

    /// Death animation finished
    EnemyRemoved {
        /// Enemy id
        enemy_id: u32,
    },

    /// Food eaten
    FoodCollected {
        /// Food id
        food_id: u32,
        /// Food center
        position: Vec2,
        /// The level-ending bowl
        is_final: bool,
        /// Points awarded
        points: u32,
    },

    /// Player took damage and survived
    PlayerHurt {
        /// Enemy that caused it
        enemy_id: u32,
        /// Damage taken
        damage: u32,
        /// Health left
        health: u32,
    },

    /// Player health reached zero
    PlayerDefeated,

    /// Level clear condition met
    LevelCleared {
        /// Level
        level: LevelId,
        /// Condition that fired
        reason: ClearReason,
    },

    /// A life was spent on a restart
    LifeLost {
        /// Lives remaining
        lives_left: u32,
    },

    /// Session paused
    Paused,

    /// Session resumed
    Resumed,

    /// No lives left
    GameOver {
        /// Final score
        score: u32,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Create a new event.
    pub fn new(tick: u32, data: GameEventData) -> Self {
        Self { tick, data }
    }

    /// Create level started event.
    pub fn level_started(tick: u32, level: LevelId, attempt: u32) -> Self {
        Self::new(tick, GameEventData::LevelStarted { level, attempt })
    }

    /// Create jumped event.
    pub fn jumped(tick: u32, position: Vec2) -> Self {
        Self::new(tick, GameEventData::Jumped { position })
    }

    /// Create beam fired event.
    pub fn beam_fired(tick: u32, beam: Rect) -> Self {
        Self::new(tick, GameEventData::BeamFired { beam })
    }

    /// Create food collected event.
    pub fn food_collected(tick: u32, food_id: u32, position: Vec2, is_final: bool, points: u32) -> Self {
        Self::new(
            tick,
            GameEventData::FoodCollected {
                food_id,
                position,
                is_final,
                points,
            },
        )
    }

    /// Create player hurt event.
    pub fn player_hurt(tick: u32, enemy_id: u32, damage: u32, health: u32) -> Self {
        Self::new(tick, GameEventData::PlayerHurt { enemy_id, damage, health })
    }

    /// Create level cleared event.
    pub fn level_cleared(tick: u32, level: LevelId, reason: ClearReason) -> Self {
        Self::new(tick, GameEventData::LevelCleared { level, reason })
    }

    /// Points this event adds to the score.
    pub fn points(&self) -> u32 {
        match &self.data {
            GameEventData::EnemyHit { points, .. } => *points,
            GameEventData::FoodCollected { points, .. } => *points,
            _ => 0,
        }
    }

    /// Sound to play for this event, if any.
    pub fn sound(&self) -> Option<SoundCue> {
        match &self.data {
            GameEventData::Jumped { .. } => Some(SoundCue::Jump),
            GameEventData::FoodCollected { .. } => Some(SoundCue::Pickup),
            GameEventData::PlayerHurt { .. } => Some(SoundCue::Hit),
            GameEventData::EnemyHit { .. } => Some(SoundCue::EnemyDown),
            _ => None,
        }
    }
}

/// Sounds for a batch of events; empty while muted.
pub fn sound_cues<'a>(events: &'a [GameEvent], muted: bool) -> impl Iterator<Item = SoundCue> + 'a {
    events
        .iter()
        .filter(move |_| !muted)
        .filter_map(GameEvent::sound)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(points: u32) -> GameEvent {
        GameEvent::new(
            3,
            GameEventData::EnemyHit {
                enemy_id: 1,
                kind: EnemyKind::Tank,
                cause: HitCause::Beam,
                killed: false,
                points,
                position: Vec2::ZERO,
            },
        )
    }

    #[test]
    fn test_points() {
        assert_eq!(hit(30).points(), 30);
        assert_eq!(GameEvent::food_collected(0, 0, Vec2::ZERO, false, 1).points(), 1);
        assert_eq!(GameEvent::jumped(0, Vec2::ZERO).points(), 0);
    }

    #[test]
    fn test_sound_mapping() {
        assert_eq!(GameEvent::jumped(0, Vec2::ZERO).sound(), Some(SoundCue::Jump));
        assert_eq!(hit(10).sound().map(SoundCue::key), Some("enemy_down"));
        assert_eq!(GameEvent::player_hurt(0, 1, 1, 2).sound(), Some(SoundCue::Hit));
        assert_eq!(GameEvent::new(0, GameEventData::Paused).sound(), None);
    }

    #[test]
    fn test_muted_drops_cues() {
        let events = vec![GameEvent::jumped(0, Vec2::ZERO), hit(10)];
        assert_eq!(sound_cues(&events, false).count(), 2);
        assert_eq!(sound_cues(&events, true).count(), 0);
    }
}
