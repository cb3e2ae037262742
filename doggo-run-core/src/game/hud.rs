//! HUD model: what the overlay shows, derived from [`GameState`].

use serde::{Serialize, Deserialize};

use crate::game::state::GameState;

/// Alpha of a full heart.
pub const HEART_FULL_ALPHA: f32 = 1.0;
/// Alpha of a lost heart.
pub const HEART_EMPTY_ALPHA: f32 = 0.15;

/// One heart icon.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Heart {
    /// Still has this point of health
    pub filled: bool,
    /// Draw alpha
    pub alpha: f32,
}

/// Everything the HUD draws.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HudModel {
    /// One per point of max health, left to right
    pub hearts: Vec<Heart>,
    /// `"Score: N"`
    pub score_text: String,
    /// Lives remaining
    pub lives: u32,
    /// Show the paused state on the pause button
    pub paused: bool,
    /// Sound off
    pub muted: bool,
}

impl HudModel {
    /// Snapshot the HUD for a game state.
    pub fn from_state(state: &GameState) -> Self {
        let hearts = (0..state.max_health)
            .map(|i| {
                let filled = i < state.health;
                Heart {
                    filled,
                    alpha: if filled { HEART_FULL_ALPHA } else { HEART_EMPTY_ALPHA },
                }
            })
            .collect();

        Self {
            hearts,
            score_text: format!("Score: {}", state.score),
            lives: state.lives,
            paused: state.is_paused,
            muted: state.is_muted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    #[test]
    fn test_hearts_follow_health() {
        let mut state = GameState::new(&GameConfig::default());
        state.health = 1;
        state.add_score(42);

        let hud = HudModel::from_state(&state);
        assert_eq!(hud.hearts.len(), 3);
        assert!(hud.hearts[0].filled);
        assert_eq!(hud.hearts[1].alpha, HEART_EMPTY_ALPHA);
        assert!(!hud.hearts[2].filled);
        assert_eq!(hud.score_text, "Score: 42");
    }

    #[test]
    fn test_pause_flag() {
        let mut state = GameState::new(&GameConfig::default());
        assert!(!HudModel::from_state(&state).paused);
        state.is_paused = true;
        assert!(HudModel::from_state(&state).paused);
    }
}
