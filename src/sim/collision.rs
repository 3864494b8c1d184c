//! Collision detection and resolution
//!
//! All hit tests are axis-aligned proximity checks: two things touch when both
//! the horizontal and vertical centre distances are under the summed
//! half-extents.

use glam::Vec2;

use super::spawn::booster_drop;
use super::state::{GameEvent, GameState, ItemKind, MAX_WEAPON_TIER, Phase, RunEnd};
use crate::rng::RandomSource;

/// Extra reach given to bullets on either axis
pub const BULLET_RADIUS: f32 = 5.0;
/// Half-size used for pickups
pub const ITEM_HALF_EXTENT: f32 = 15.0;

/// Axis-aligned proximity test between two centred boxes
#[inline]
pub fn overlaps(a: Vec2, a_half: f32, b: Vec2, b_half: f32) -> bool {
    let d = (a - b).abs();
    let reach = a_half + b_half;
    d.x < reach && d.y < reach
}

/// Player bullets against enemies. Each bullet is spent on the first live
/// enemy it touches; destroyed enemies score `max_hp * 10` and may drop a
/// booster.
pub fn resolve_player_fire(
    state: &mut GameState,
    rng: &mut dyn RandomSource,
    events: &mut Vec<GameEvent>,
) {
    let enemies = &mut state.enemies;
    let mut kills = Vec::new();

    state.bullets.retain(|bullet| {
        if !bullet.from_player {
            return true;
        }
        let hit = enemies
            .iter_mut()
            .find(|e| e.is_alive() && overlaps(bullet.pos, BULLET_RADIUS, e.pos, e.half_extent));
        let Some(enemy) = hit else {
            return true;
        };
        enemy.hp -= bullet.damage;
        if !enemy.is_alive() {
            kills.push((enemy.kind, enemy.pos, enemy.points()));
        }
        false
    });
    state.enemies.retain(|e| e.is_alive());

    for (kind, pos, points) in kills {
        state.score += points;
        events.push(GameEvent::EnemyDestroyed { kind, points });
        state.spawn_explosion(pos);
        if rng.chance(state.tuning.booster_drop_chance) {
            state.items.push(booster_drop(pos));
        }
    }
}

/// Enemy bullets and enemy bodies against the player. At most one hit is
/// applied per tick. Returns whether the player was hit.
pub fn resolve_player_contacts(state: &mut GameState, events: &mut Vec<GameEvent>) -> bool {
    let player_pos = state.player.pos;
    let player_half = state.player.half_extent;

    let shot = state
        .bullets
        .iter()
        .any(|b| !b.from_player && overlaps(b.pos, BULLET_RADIUS, player_pos, player_half));
    if shot {
        player_hit(state, events);
        return true;
    }

    let rammed = state
        .enemies
        .iter()
        .position(|e| overlaps(e.pos, e.half_extent, player_pos, player_half));
    if let Some(index) = rammed {
        // Destroyed by the collision, no score
        let enemy = state.enemies.remove(index);
        state.spawn_explosion(enemy.pos);
        player_hit(state, events);
        return true;
    }

    false
}

/// Pickups touching the player
pub fn resolve_pickups(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let player_pos = state.player.pos;
    let player_half = state.player.half_extent;

    let mut collected = Vec::new();
    state.items.retain(|item| {
        if overlaps(item.pos, ITEM_HALF_EXTENT, player_pos, player_half) {
            collected.push(item.kind);
            false
        } else {
            true
        }
    });

    for kind in collected {
        apply_item(state, kind);
        events.push(GameEvent::ItemCollected { kind });
    }
}

fn apply_item(state: &mut GameState, kind: ItemKind) {
    log::debug!("Picked up {:?}", kind);
    match kind {
        ItemKind::Booster => state.booster_ticks = state.tuning.booster_ticks,
        ItemKind::BombRefill => state.bombs = state.bombs.saturating_add(1),
        ItemKind::Health => state.lives = state.lives.saturating_add(1),
        ItemKind::WeaponUpgrade => {
            state.weapon_tier = (state.weapon_tier + 1).min(MAX_WEAPON_TIER);
        }
    }
}

/// Lose a life. With lives left: respawn, clear enemies near the respawn
/// band and all bullets, drop back to the base weapon. Otherwise end the run.
fn player_hit(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.lives = state.lives.saturating_sub(1);
    events.push(GameEvent::PlayerHit {
        lives_left: state.lives,
    });
    state.spawn_explosion(state.player.pos);

    if state.lives == 0 {
        state.phase = Phase::GameOver(RunEnd::Defeated);
        events.push(GameEvent::GameOver {
            end: RunEnd::Defeated,
            score: state.score,
        });
        log::info!("Game over on round {} with {} points", state.level, state.score);
        return;
    }

    state.player.respawn(&state.tuning);
    let respawn_y = state.player.pos.y;
    let band = state.tuning.respawn_clear_band;
    state.enemies.retain(|e| (e.pos.y - respawn_y).abs() > band);
    state.bullets.clear();
    state.weapon_tier = 1;

    log::info!("Player hit, {} lives left", state.lives);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedSource;
    use crate::sim::state::{Bullet, Enemy, EnemyKind, Item};
    use crate::tuning::Tuning;

    fn playing() -> GameState {
        let mut state = GameState::new(Tuning::default());
        state.phase = Phase::Playing;
        state
    }

    #[test]
    fn test_overlaps_is_strict() {
        let a = Vec2::new(0.0, 0.0);
        assert!(overlaps(a, 5.0, Vec2::new(19.9, 0.0), 15.0));
        assert!(!overlaps(a, 5.0, Vec2::new(20.0, 0.0), 15.0));
        assert!(!overlaps(a, 5.0, Vec2::new(0.0, -20.0), 15.0));
    }

    #[test]
    fn test_kill_scores_max_hp_times_ten() {
        let mut state = playing();
        let mut tank = Enemy::new(EnemyKind::Tank, Vec2::new(100.0, 100.0), Vec2::ZERO, 1);
        tank.hp = 1;
        state.enemies.push(tank);
        state.bullets.push(Bullet::player(Vec2::new(100.0, 110.0), Vec2::ZERO, 1));

        let mut rng = ScriptedSource::constant(0.99);
        let mut events = Vec::new();
        resolve_player_fire(&mut state, &mut rng, &mut events);

        assert_eq!(state.score, 50);
        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!(state.items.is_empty());
        assert_eq!(
            events,
            vec![GameEvent::EnemyDestroyed {
                kind: EnemyKind::Tank,
                points: 50
            }]
        );
    }

    #[test]
    fn test_wounded_enemy_spends_bullet_without_score() {
        let mut state = playing();
        state.enemies.push(Enemy::new(EnemyKind::Tank, Vec2::new(100.0, 100.0), Vec2::ZERO, 1));
        state.bullets.push(Bullet::player(Vec2::new(100.0, 100.0), Vec2::ZERO, 2));
        state.bullets.push(Bullet::player(Vec2::new(500.0, 100.0), Vec2::ZERO, 2));

        let mut rng = ScriptedSource::constant(0.0);
        let mut events = Vec::new();
        resolve_player_fire(&mut state, &mut rng, &mut events);

        assert_eq!(state.enemies[0].hp, 3);
        assert_eq!(state.bullets.len(), 1);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_dead_enemy_is_not_scored_twice() {
        let mut state = playing();
        state.enemies.push(Enemy::new(EnemyKind::Basic, Vec2::new(100.0, 100.0), Vec2::ZERO, 1));
        for _ in 0..3 {
            state.bullets.push(Bullet::player(Vec2::new(100.0, 100.0), Vec2::ZERO, 1));
        }
        let mut rng = ScriptedSource::constant(0.99);
        let mut events = Vec::new();
        resolve_player_fire(&mut state, &mut rng, &mut events);

        assert_eq!(state.score, 10);
        assert_eq!(state.bullets.len(), 2);
    }

    #[test]
    fn test_lucky_kill_drops_booster() {
        let mut state = playing();
        state.enemies.push(Enemy::new(EnemyKind::Basic, Vec2::new(100.0, 100.0), Vec2::ZERO, 1));
        state.bullets.push(Bullet::player(Vec2::new(100.0, 100.0), Vec2::ZERO, 1));
        let mut rng = ScriptedSource::constant(0.05);
        let mut events = Vec::new();
        resolve_player_fire(&mut state, &mut rng, &mut events);

        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].kind, ItemKind::Booster);
        assert_eq!(state.items[0].pos, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_hit_respawns_and_resets() {
        let mut state = playing();
        state.weapon_tier = 3;
        state.booster_ticks = 300;
        state.player.pos = Vec2::new(100.0, 300.0);
        state.bullets.push(Bullet::enemy(Vec2::new(100.0, 300.0), Vec2::ZERO));
        state.bullets.push(Bullet::player(Vec2::new(100.0, 50.0), Vec2::ZERO, 1));
        // Near the respawn band and far above it
        state.enemies.push(Enemy::new(EnemyKind::Basic, Vec2::new(700.0, 450.0), Vec2::ZERO, 1));
        state.enemies.push(Enemy::new(EnemyKind::Basic, Vec2::new(700.0, 50.0), Vec2::ZERO, 1));

        let mut events = Vec::new();
        assert!(resolve_player_contacts(&mut state, &mut events));

        assert_eq!(state.lives, 2);
        assert_eq!(state.weapon_tier, 1);
        assert_eq!(state.booster_ticks, 300);
        assert_eq!(state.player.pos, Vec2::new(400.0, 500.0));
        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].pos.y, 50.0);
        assert_eq!(events, vec![GameEvent::PlayerHit { lives_left: 2 }]);
    }

    #[test]
    fn test_ramming_destroys_enemy_without_score() {
        let mut state = playing();
        let pos = state.player.pos;
        state.enemies.push(Enemy::new(EnemyKind::Tank, pos + Vec2::new(30.0, 0.0), Vec2::ZERO, 1));

        let mut events = Vec::new();
        assert!(resolve_player_contacts(&mut state, &mut events));
        assert!(state.enemies.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 2);
    }

    #[test]
    fn test_last_life_ends_run() {
        let mut state = playing();
        state.lives = 1;
        state.score = 120;
        state.bullets.push(Bullet::enemy(state.player.pos, Vec2::ZERO));

        let mut events = Vec::new();
        resolve_player_contacts(&mut state, &mut events);
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, Phase::GameOver(RunEnd::Defeated));
        assert!(events.contains(&GameEvent::GameOver {
            end: RunEnd::Defeated,
            score: 120
        }));
    }

    #[test]
    fn test_pickups_saturate_counters() {
        let mut state = playing();
        state.lives = u32::MAX;
        state.bombs = u32::MAX;
        let pos = state.player.pos;
        for kind in [ItemKind::Health, ItemKind::BombRefill] {
            state.items.push(Item {
                pos,
                vel: Vec2::ZERO,
                kind,
            });
        }

        let mut events = Vec::new();
        resolve_pickups(&mut state, &mut events);
        assert_eq!(state.lives, u32::MAX);
        assert_eq!(state.bombs, u32::MAX);
    }

    #[test]
    fn test_pickups_apply_effects() {
        let mut state = playing();
        let pos = state.player.pos;
        for kind in [
            ItemKind::Booster,
            ItemKind::BombRefill,
            ItemKind::Health,
            ItemKind::WeaponUpgrade,
            ItemKind::WeaponUpgrade,
            ItemKind::WeaponUpgrade,
        ] {
            state.items.push(Item {
                pos,
                vel: Vec2::ZERO,
                kind,
            });
        }
        state.items.push(Item {
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            kind: ItemKind::Health,
        });

        let mut events = Vec::new();
        resolve_pickups(&mut state, &mut events);

        assert_eq!(state.booster_ticks, 600);
        assert_eq!(state.bombs, 2);
        assert_eq!(state.lives, 4);
        assert_eq!(state.weapon_tier, MAX_WEAPON_TIER);
        assert_eq!(state.items.len(), 1);
        assert_eq!(events.len(), 6);
    }
}
