//! Level Tick Simulation
//!
//! Advances a [`LevelState`] by one frame. The step order is fixed and every
//! collection is walked in id order, so the same inputs always produce the
//! same state hash.

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::geom::Rect;
use crate::game::enemy::{AggroChange, DamageOutcome};
use crate::game::events::{ClearReason, GameEvent, GameEventData, HitCause};
use crate::game::food::FOOD_POINTS;
use crate::game::input::InputState;
use crate::game::physics::step_body;
use crate::game::player::HitOutcome;
use crate::game::state::LevelState;

/// Vertical margin (px) the player must be above an enemy's center to stomp it.
pub const STOMP_MARGIN: f32 = 10.0;

/// Result of a single tick.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,

    /// Set on the tick the level was cleared
    pub cleared: Option<ClearReason>,
}

impl TickResult {
    /// Player health reached zero this tick.
    pub fn player_defeated(&self) -> bool {
        self.events
            .iter()
            .any(|e| matches!(e.data, GameEventData::PlayerDefeated))
    }
}

/// Execute one level tick.
///
/// Order:
/// 1. Player movement and attack
/// 2. Beam hits
/// 3. Enemy AI, then physics
/// 4. Ground safety
/// 5. Food spin
/// 6. Player vs enemies
/// 7. Player vs food
/// 8. Clear checks
/// 9. Remove finished enemies, advance timers
pub fn tick(level: &mut LevelState, input: &InputState, dt_ms: f32) -> TickResult {
    let mut result = TickResult::default();
    let was_cleared = level.cleared.is_some();

    // 1. Player movement and attack
    let beam = process_player_input(level, input, dt_ms);

    // 2. Beam hits
    if let Some(beam) = beam {
        process_beam_hits(level, &beam);
    }

    // 3. Enemy AI, then physics
    update_enemy_ai(level, dt_ms);
    update_physics(level, dt_ms);

    // 4. Ground safety
    apply_ground_safety(level);

    // 5. Food spin
    for food in level.foods.values_mut() {
        food.update_spin(dt_ms);
    }

    // 6. Player vs enemies
    process_enemy_contacts(level);

    // 7. Player vs food
    process_food_pickups(level);

    // 8. Clear checks
    check_clear_conditions(level);

    // 9. Remove finished enemies, advance timers
    remove_finished_enemies(level, dt_ms);

    level.tick += 1;
    level.elapsed_ms += dt_ms;

    if !was_cleared {
        result.cleared = level.cleared;
    }
    result.events = level.take_events();

    #[cfg(feature = "debug-tracing")]
    tracing::trace!(
        tick = level.tick,
        x = level.player.body.position.x,
        y = level.player.body.position.y,
        events = result.events.len(),
        "Tick"
    );

    result
}

/// Apply input to the player. Returns the beam if one was fired.
fn process_player_input(level: &mut LevelState, input: &InputState, dt_ms: f32) -> Option<Rect> {
    let outcome = level.player.update_movement(dt_ms, input);

    if outcome.jumped {
        let event = GameEvent::jumped(level.tick, level.player.position());
        level.push_event(event);
    }

    if let Some(beam) = outcome.beam {
        level.push_event(GameEvent::beam_fired(level.tick, beam));
    }

    outcome.beam
}

/// Damage every living enemy the beam touches.
fn process_beam_hits(level: &mut LevelState, beam: &Rect) {
    let tick = level.tick;
    let mut events = Vec::new();

    for enemy in level.enemies.values_mut() {
        if !enemy.is_alive() || !enemy.rect().intersects(beam) {
            continue;
        }

        let outcome = enemy.take_damage(1);
        if outcome == DamageOutcome::Ignored {
            continue;
        }

        events.push(GameEvent::new(
            tick,
            GameEventData::EnemyHit {
                enemy_id: enemy.id,
                kind: enemy.kind,
                cause: HitCause::Beam,
                killed: outcome == DamageOutcome::Killed,
                points: enemy.stats.points,
                position: enemy.sprite_center(),
            },
        ));
    }

    for event in events {
        level.push_event(event);
    }
}

/// Run enemy AI against the current player position.
fn update_enemy_ai(level: &mut LevelState, dt_ms: f32) {
    let now_ms = level.elapsed_ms;
    let player = level.player.position();
    let world_width = level.bounds.width;
    let tick = level.tick;
    let mut events = Vec::new();

    // BTreeMap values_mut iterates in sorted order, so RNG draws are stable
    for enemy in level.enemies.values_mut() {
        if let Some(change) = enemy.update_ai(now_ms, dt_ms, player, world_width, &mut level.rng) {
            let aggro = change == AggroChange::Gained;
            debug!(enemy = enemy.id, aggro, "Aggro changed");
            events.push(GameEvent::new(
                tick,
                GameEventData::EnemyAggro { enemy_id: enemy.id, aggro },
            ));
        }
    }

    for event in events {
        level.push_event(event);
    }
}

/// Integrate the player and every enemy against the level solids.
fn update_physics(level: &mut LevelState, dt_ms: f32) {
    let dt = dt_ms / 1000.0;

    step_body(&mut level.player.body, &level.solids, &level.bounds, level.gravity, dt);

    for enemy in level.enemies.values_mut() {
        step_body(&mut enemy.body, &level.solids, &level.bounds, level.gravity, dt);
    }
}

/// Pull the player back up if they sank through the ground.
fn apply_ground_safety(level: &mut LevelState) {
    let Some(safety) = level.rules.ground_safety else {
        return;
    };

    let body = &mut level.player.body;
    if body.position.y > safety.threshold_y {
        body.position.y = safety.reset_y;
        body.velocity.y = 0.0;
    }
}

/// Resolve touches between the player and living enemies.
fn process_enemy_contacts(level: &mut LevelState) {
    let tick = level.tick;
    let stomp_enabled = level.rules.stomp_enabled;
    let mut events = Vec::new();

    for enemy in level.enemies.values_mut() {
        if !enemy.is_alive() || !level.player.rect().intersects(&enemy.rect()) {
            continue;
        }

        let player_y = level.player.position().y;
        let stomp = stomp_enabled
            && level.player.is_falling()
            && player_y < enemy.sprite_center().y - STOMP_MARGIN;

        if stomp {
            let outcome = enemy.take_damage(1);
            level.player.bounce();
            if outcome != DamageOutcome::Ignored {
                events.push(GameEvent::new(
                    tick,
                    GameEventData::EnemyHit {
                        enemy_id: enemy.id,
                        kind: enemy.kind,
                        cause: HitCause::Stomp,
                        killed: outcome == DamageOutcome::Killed,
                        points: enemy.stats.points,
                        position: enemy.sprite_center(),
                    },
                ));
            }
            continue;
        }

        match level.player.take_hit(enemy.stats.damage) {
            HitOutcome::Ignored => {}
            HitOutcome::Hurt { health } => {
                debug!(enemy = enemy.id, health, "Player hurt");
                events.push(GameEvent::player_hurt(tick, enemy.id, enemy.stats.damage, health));
            }
            HitOutcome::Defeated => {
                debug!(enemy = enemy.id, "Player defeated");
                events.push(GameEvent::player_hurt(tick, enemy.id, enemy.stats.damage, 0));
                events.push(GameEvent::new(tick, GameEventData::PlayerDefeated));
            }
        }
    }

    for event in events {
        level.push_event(event);
    }
}

/// Collect food the player overlaps.
fn process_food_pickups(level: &mut LevelState) {
    let tick = level.tick;
    let player_rect = level.player.rect();
    let mut events = Vec::new();
    let mut final_eaten = false;

    for food in level.foods.values_mut() {
        if food.collected || !player_rect.intersects(&food.rect()) {
            continue;
        }
        if food.collect() {
            final_eaten |= food.is_final;
            events.push(GameEvent::food_collected(tick, food.id, food.position, food.is_final, FOOD_POINTS));
        }
    }

    for event in events {
        level.push_event(event);
    }

    if final_eaten {
        mark_cleared(level, ClearReason::FinalFood);
    }
}

/// Goal and all-food clear conditions.
fn check_clear_conditions(level: &mut LevelState) {
    if level.rules.goal_wins {
        if let Some(goal) = level.goal {
            if level.player.rect().intersects(&goal.rect()) {
                mark_cleared(level, ClearReason::Goal);
            }
        }
    }

    if level.rules.clear_all_wins && !level.foods.is_empty() && level.remaining_food() == 0 {
        mark_cleared(level, ClearReason::AllFood);
    }
}

/// Latch the clear. Later conditions in the same or any following tick are ignored.
fn mark_cleared(level: &mut LevelState, reason: ClearReason) {
    if level.cleared.is_some() {
        return;
    }
    level.cleared = Some(reason);
    debug!(level = level.id.number(), ?reason, "Level cleared");
    let event = GameEvent::level_cleared(level.tick, level.id, reason);
    level.push_event(event);
}

/// Drop enemies whose death animation finished and advance per-enemy timers.
fn remove_finished_enemies(level: &mut LevelState, dt_ms: f32) {
    let removed: Vec<u32> = level
        .enemies
        .values()
        .filter(|e| e.is_removable())
        .map(|e| e.id)
        .collect();

    for id in removed {
        level.enemies.remove(&id);
        level.push_event(GameEvent::new(level.tick, GameEventData::EnemyRemoved { enemy_id: id }));
    }

    for enemy in level.enemies.values_mut() {
        enemy.tick_timers(dt_ms);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use crate::core::geom::Vec2;
    use crate::game::enemy::{Enemy, EnemyKind};
    use crate::game::food::DogFood;
    use crate::game::level::{Goal, LevelId, LevelLayout, LevelRules};
    use crate::game::player::{Player, STOMP_BOUNCE_VELOCITY};

    const DT_MS: f32 = 1000.0 / 60.0;

    /// A flat test level: ground top at 620, nothing else.
    fn empty_level(rules: LevelRules) -> LevelState {
        let mut layout = LevelLayout::for_level(LevelId::One, 1);
        layout.rules = rules;
        let mut level = LevelState::new(&layout, 1, 1, 3, 3, 1800.0);
        level.enemies = BTreeMap::new();
        level.foods = BTreeMap::new();
        level.solids = vec![Rect::new(0.0, 620.0, 25_000.0, 100.0)];
        level.goal = None;
        level.player = Player::new(Vec2::new(300.0, 620.0), 3, 3);
        level
    }

    fn settle(level: &mut LevelState) {
        for _ in 0..30 {
            tick(level, &InputState::default(), DT_MS);
        }
    }

    fn events_of(result: &TickResult, pred: impl Fn(&GameEventData) -> bool) -> usize {
        result.events.iter().filter(|e| pred(&e.data)).count()
    }

    #[test]
    fn test_player_lands_on_ground() {
        let mut level = empty_level(LevelRules::default());
        settle(&mut level);
        assert!(level.player.is_grounded());
        assert!((level.player.rect().bottom() - 620.0).abs() < 1e-3);
        assert_eq!(level.tick, 30);
    }

    #[test]
    fn test_jump_emits_event() {
        let mut level = empty_level(LevelRules::default());
        settle(&mut level);

        let input = InputState { jump_pressed: true, jump_held: true, ..Default::default() };
        let result = tick(&mut level, &input, DT_MS);
        assert_eq!(events_of(&result, |d| matches!(d, GameEventData::Jumped { .. })), 1);
        assert!(level.player.body.velocity.y < 0.0);
    }

    #[test]
    fn test_beam_damages_enemy_in_front() {
        let mut level = empty_level(LevelRules::default());
        settle(&mut level);

        // Stationary tank to the right, inside beam reach
        let mut enemy = Enemy::new(7, EnemyKind::Tank, Vec2::new(420.0, 597.0), true);
        enemy.body.position.y = level.player.position().y;
        level.enemies.insert(7, enemy);

        let input = InputState { attack_pressed: true, ..Default::default() };
        let result = tick(&mut level, &input, DT_MS);

        assert_eq!(events_of(&result, |d| matches!(d, GameEventData::BeamFired { .. })), 1);
        let hit = result.events.iter().find_map(|e| match e.data {
            GameEventData::EnemyHit { enemy_id, cause, killed, points, .. } => Some((enemy_id, cause, killed, points)),
            _ => None,
        });
        assert_eq!(hit, Some((7, HitCause::Beam, false, 30)));
        assert_eq!(level.enemies[&7].health, 1);

        // Cooldown blocks an immediate second shot
        let result = tick(&mut level, &input, DT_MS);
        assert_eq!(events_of(&result, |d| matches!(d, GameEventData::BeamFired { .. })), 0);
    }

    #[test]
    fn test_stomp_kills_and_bounces() {
        let mut level = empty_level(LevelRules::default());
        let mut enemy = Enemy::new(1, EnemyKind::Walker, Vec2::new(300.0, 597.0), true);
        enemy.body.allow_gravity = false;
        level.enemies.insert(1, enemy);

        // Falling onto the walker from above
        level.player.body.position = Vec2::new(300.0, 548.0);
        level.player.body.velocity = Vec2::new(0.0, 200.0);

        let result = tick(&mut level, &InputState::default(), DT_MS);
        let hit = result.events.iter().find_map(|e| match e.data {
            GameEventData::EnemyHit { cause, killed, points, .. } => Some((cause, killed, points)),
            _ => None,
        });
        assert_eq!(hit, Some((HitCause::Stomp, true, 10)));
        assert_eq!(level.player.body.velocity.y, -STOMP_BOUNCE_VELOCITY);
        assert_eq!(level.player.health, 3);
        assert!(!level.enemies[&1].is_alive());
    }

    #[test]
    fn test_no_stomp_rule_hurts_player() {
        let rules = LevelRules { stomp_enabled: false, ..LevelRules::default() };
        let mut level = empty_level(rules);
        let mut enemy = Enemy::new(1, EnemyKind::Walker, Vec2::new(300.0, 597.0), true);
        enemy.body.allow_gravity = false;
        level.enemies.insert(1, enemy);

        level.player.body.position = Vec2::new(300.0, 548.0);
        level.player.body.velocity = Vec2::new(0.0, 200.0);

        let result = tick(&mut level, &InputState::default(), DT_MS);
        assert_eq!(events_of(&result, |d| matches!(d, GameEventData::PlayerHurt { .. })), 1);
        assert_eq!(level.player.health, 2);
        assert!(level.enemies[&1].is_alive());

        // Invulnerable on the next contact
        let result = tick(&mut level, &InputState::default(), DT_MS);
        assert_eq!(events_of(&result, |d| matches!(d, GameEventData::PlayerHurt { .. })), 0);
    }

    #[test]
    fn test_defeat_event() {
        let rules = LevelRules { stomp_enabled: false, ..LevelRules::default() };
        let mut level = empty_level(rules);
        settle(&mut level);
        level.player.health = 1;

        let mut enemy = Enemy::new(1, EnemyKind::Tank, level.player.position(), true);
        enemy.body.position = level.player.position();
        level.enemies.insert(1, enemy);

        let result = tick(&mut level, &InputState::default(), DT_MS);
        assert!(result.player_defeated());
        assert_eq!(level.player.health, 0);
    }

    #[test]
    fn test_food_pickup_and_final_clear_latch() {
        let mut level = empty_level(LevelRules::default());
        settle(&mut level);
        let at = level.player.position();
        level.foods.insert(0, DogFood::new(0, at, 1.0, false));
        level.foods.insert(1, DogFood::new(1, at, 2.0, true));
        level.foods.insert(2, DogFood::new(2, Vec2::new(5000.0, 500.0), 1.0, false));

        let result = tick(&mut level, &InputState::default(), DT_MS);
        let points: u32 = result.events.iter().map(GameEvent::points).sum();
        assert_eq!(points, 2);
        assert_eq!(result.cleared, Some(ClearReason::FinalFood));
        assert_eq!(level.remaining_food(), 1);

        // Latched: later conditions never clear again
        let at = level.player.position();
        if let Some(food) = level.foods.get_mut(&2) {
            food.position = at;
        }
        let result = tick(&mut level, &InputState::default(), DT_MS);
        assert_eq!(result.cleared, None);
        assert_eq!(events_of(&result, |d| matches!(d, GameEventData::LevelCleared { .. })), 0);
        assert_eq!(level.cleared, Some(ClearReason::FinalFood));
    }

    #[test]
    fn test_goal_clear_respects_rules() {
        let mut level = empty_level(LevelRules::default());
        settle(&mut level);
        level.goal = Some(Goal { position: level.player.position(), color: 0xffd700 });
        let result = tick(&mut level, &InputState::default(), DT_MS);
        assert_eq!(result.cleared, Some(ClearReason::Goal));

        let rules = LevelRules { goal_wins: false, ..LevelRules::default() };
        let mut level = empty_level(rules);
        settle(&mut level);
        level.goal = Some(Goal { position: level.player.position(), color: 0x00ffff });
        let result = tick(&mut level, &InputState::default(), DT_MS);
        assert_eq!(result.cleared, None);
    }

    #[test]
    fn test_ground_safety_reset() {
        let rules = LevelLayout::for_level(LevelId::Two, 1).rules;
        let mut level = empty_level(rules);
        level.solids.clear();
        level.player.body.position.y = 660.0;
        level.player.body.velocity.y = 100.0;

        tick(&mut level, &InputState::default(), DT_MS);
        assert_eq!(level.player.position().y, 640.0);
        assert_eq!(level.player.body.velocity.y, 0.0);
    }

    #[test]
    fn test_dead_enemy_removed_after_animation() {
        let mut level = empty_level(LevelRules::default());
        let mut enemy = Enemy::new(4, EnemyKind::Walker, Vec2::new(3000.0, 597.0), true);
        enemy.die();
        level.enemies.insert(4, enemy);

        let mut removed = 0;
        for _ in 0..40 {
            let result = tick(&mut level, &InputState::default(), DT_MS);
            removed += events_of(&result, |d| matches!(d, GameEventData::EnemyRemoved { enemy_id: 4 }));
        }
        assert_eq!(removed, 1);
        assert!(level.enemies.is_empty());
    }

    #[test]
    fn test_tick_determinism() {
        let layout = LevelLayout::for_level(LevelId::Two, 99);
        let mut a = LevelState::new(&layout, 99, 2, 3, 3, 1800.0);
        let mut b = LevelState::new(&layout, 99, 2, 3, 3, 1800.0);

        for i in 0..300u32 {
            let input = InputState {
                right: i % 90 < 60,
                jump_pressed: i % 45 == 0,
                jump_held: i % 45 < 10,
                attack_pressed: i % 20 == 0,
                ..Default::default()
            };
            let ra = tick(&mut a, &input, DT_MS);
            let rb = tick(&mut b, &input, DT_MS);
            assert_eq!(ra, rb);
        }

        assert_eq!(a.compute_hash(), b.compute_hash());
    }
}
