//! Player movement and weapons

use glam::Vec2;

use super::state::{Bullet, GameEvent, GameState, Player};
use super::tick::TickInput;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};
use crate::tuning::Tuning;

/// Apply held directions, friction and the speed cap, then move and keep
/// the ship inside the margins.
pub fn integrate(player: &mut Player, input: &TickInput, tuning: &Tuning) {
    let mut accel = Vec2::ZERO;
    if input.left {
        accel.x -= tuning.player_accel;
    }
    if input.right {
        accel.x += tuning.player_accel;
    }
    if input.up {
        accel.y -= tuning.player_accel;
    }
    if input.down {
        accel.y += tuning.player_accel;
    }

    player.vel = ((player.vel + accel) * tuning.friction).clamp_length_max(tuning.max_speed);
    player.pos += player.vel;

    let min = Vec2::splat(tuning.field_margin);
    let max = Vec2::new(
        FIELD_WIDTH - tuning.field_margin,
        FIELD_HEIGHT - tuning.field_margin,
    );

    if player.pos.x < min.x {
        player.pos.x = min.x;
        player.vel.x = 0.0;
    } else if player.pos.x > max.x {
        player.pos.x = max.x;
        player.vel.x = 0.0;
    }
    if player.pos.y < min.y {
        player.pos.y = min.y;
        player.vel.y = 0.0;
    } else if player.pos.y > max.y {
        player.pos.y = max.y;
        player.vel.y = 0.0;
    }
}

/// Bullets of one volley for a weapon tier, fired from the ship's nose
pub fn volley(origin: Vec2, tier: u8, damage: i32) -> Vec<Bullet> {
    let nose = origin - Vec2::new(0.0, 20.0);
    match tier {
        0 | 1 => vec![Bullet::player(nose, Vec2::new(0.0, -12.0), damage)],
        2 => vec![
            Bullet::player(nose - Vec2::X * 10.0, Vec2::new(-2.0, -12.0), damage),
            Bullet::player(nose + Vec2::X * 10.0, Vec2::new(2.0, -12.0), damage),
        ],
        _ => vec![
            Bullet::player(nose, Vec2::new(0.0, -12.0), damage),
            Bullet::player(nose - Vec2::X * 15.0, Vec2::new(-3.0, -11.0), damage),
            Bullet::player(nose + Vec2::X * 15.0, Vec2::new(3.0, -11.0), damage),
        ],
    }
}

/// Fire (rate limited) and bomb (edge triggered), then run the booster down
pub(super) fn handle_weapons(
    state: &mut GameState,
    input: &TickInput,
    events: &mut Vec<GameEvent>,
) {
    let now = state.time_ticks;
    let cooldown = state.tuning.fire_cooldown_ticks as u64;
    let ready = state
        .latches
        .last_shot_tick
        .is_none_or(|last| now.saturating_sub(last) >= cooldown);

    if input.fire && ready {
        let bullets = volley(state.player.pos, state.weapon_tier, state.shot_damage());
        state.bullets.extend(bullets);
        state.latches.last_shot_tick = Some(now);
        events.push(GameEvent::ShotFired {
            tier: state.weapon_tier,
        });
    }

    let bomb_pressed = input.bomb && !state.latches.bomb_held;
    state.latches.bomb_held = input.bomb;
    if bomb_pressed && state.bombs > 0 {
        detonate_bomb(state);
        events.push(GameEvent::BombDetonated);
    }

    state.booster_ticks = state.booster_ticks.saturating_sub(1);
}

/// Damage every enemy and clear hostile fire. Kills score nothing.
fn detonate_bomb(state: &mut GameState) {
    state.bombs -= 1;

    let damage = state.tuning.bomb_damage;
    for enemy in state.enemies.iter_mut() {
        enemy.hp -= damage;
    }
    let killed: Vec<Vec2> = state
        .enemies
        .iter()
        .filter(|e| !e.is_alive())
        .map(|e| e.pos)
        .collect();
    state.enemies.retain(|e| e.is_alive());
    state.bullets.retain(|b| b.from_player);

    for pos in killed {
        state.spawn_explosion(pos);
    }
    state.spawn_bomb_burst();

    log::info!("Bomb detonated, {} left", state.bombs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Enemy, EnemyKind};
    use proptest::prelude::*;

    fn held(up: bool, down: bool, left: bool, right: bool) -> TickInput {
        TickInput {
            up,
            down,
            left,
            right,
            ..Default::default()
        }
    }

    #[test]
    fn test_acceleration_and_friction() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        integrate(&mut player, &held(false, false, false, true), &tuning);
        assert!((player.vel.x - 0.46).abs() < 1e-5);
        assert!((player.pos.x - 400.46).abs() < 1e-4);

        // Coasting decays
        let before = player.vel.x;
        integrate(&mut player, &TickInput::default(), &tuning);
        assert!(player.vel.x < before);
    }

    #[test]
    fn test_speed_is_capped() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(400.0, 300.0);
        player.vel = Vec2::new(50.0, 50.0);
        integrate(&mut player, &held(false, true, false, true), &tuning);
        assert!((player.vel.length() - tuning.max_speed).abs() < 1e-4);
        // Direction survives the cap
        assert!((player.vel.x - player.vel.y).abs() < 1e-4);
    }

    #[test]
    fn test_edge_clamp_zeroes_velocity() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.pos = Vec2::new(21.0, 300.0);
        player.vel = Vec2::new(-5.0, 0.0);
        integrate(&mut player, &held(false, false, true, false), &tuning);
        assert_eq!(player.pos.x, 20.0);
        assert_eq!(player.vel.x, 0.0);
    }

    #[test]
    fn test_volley_patterns() {
        let origin = Vec2::new(400.0, 500.0);

        let one = volley(origin, 1, 1);
        assert_eq!(one.len(), 1);
        assert_eq!(one[0].pos, Vec2::new(400.0, 480.0));
        assert_eq!(one[0].vel, Vec2::new(0.0, -12.0));

        let two = volley(origin, 2, 1);
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].pos.x, 390.0);
        assert_eq!(two[1].vel, Vec2::new(2.0, -12.0));

        let three = volley(origin, 3, 2);
        assert_eq!(three.len(), 3);
        assert!(three.iter().all(|b| b.from_player && b.damage == 2));
        assert_eq!(three[2].pos.x, 415.0);
        assert_eq!(three[1].vel, Vec2::new(-3.0, -11.0));
    }

    #[test]
    fn test_bomb_damages_all_and_clears_enemy_fire() {
        let mut state = GameState::new(Tuning::default());
        state.enemies.push(Enemy::new(EnemyKind::Basic, Vec2::new(100.0, 100.0), Vec2::ZERO, 1));
        state.enemies.push(Enemy::new(EnemyKind::Boss, Vec2::new(400.0, 100.0), Vec2::ZERO, 1));
        state.bullets.push(Bullet::enemy(Vec2::new(10.0, 10.0), Vec2::ZERO));
        state.bullets.push(Bullet::player(Vec2::new(10.0, 10.0), Vec2::ZERO, 1));

        let mut events = Vec::new();
        let input = TickInput {
            bomb: true,
            ..Default::default()
        };
        handle_weapons(&mut state, &input, &mut events);

        assert_eq!(state.bombs, 0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].hp, 5);
        assert_eq!(state.bullets.len(), 1);
        assert!(state.bullets[0].from_player);
        assert_eq!(state.score, 0);
        assert!(events.contains(&GameEvent::BombDetonated));
    }

    #[test]
    fn test_bomb_is_edge_triggered() {
        let mut state = GameState::new(Tuning::default());
        state.bombs = 3;
        let input = TickInput {
            bomb: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        handle_weapons(&mut state, &input, &mut events);
        handle_weapons(&mut state, &input, &mut events);
        assert_eq!(state.bombs, 2);

        handle_weapons(&mut state, &TickInput::default(), &mut events);
        handle_weapons(&mut state, &input, &mut events);
        assert_eq!(state.bombs, 1);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = GameState::new(Tuning::default());
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        for t in 1..=20 {
            state.time_ticks = t;
            handle_weapons(&mut state, &input, &mut events);
        }
        // Ticks 1, 10 and 19
        assert_eq!(state.bullets.len(), 3);
    }

    #[test]
    fn test_booster_doubles_damage_and_expires() {
        let mut state = GameState::new(Tuning::default());
        state.booster_ticks = 1;
        let input = TickInput {
            fire: true,
            ..Default::default()
        };
        let mut events = Vec::new();
        handle_weapons(&mut state, &input, &mut events);
        assert_eq!(state.bullets[0].damage, 2);
        assert_eq!(state.booster_ticks, 0);
        assert_eq!(state.shot_damage(), 1);
    }

    proptest! {
        #[test]
        fn prop_player_stays_inside_margins(
            moves in prop::collection::vec(any::<(bool, bool, bool, bool)>(), 1..400)
        ) {
            let tuning = Tuning::default();
            let mut player = Player::new(&tuning);
            for (up, down, left, right) in moves {
                integrate(&mut player, &held(up, down, left, right), &tuning);
                prop_assert!(player.pos.x >= tuning.field_margin);
                prop_assert!(player.pos.x <= FIELD_WIDTH - tuning.field_margin);
                prop_assert!(player.pos.y >= tuning.field_margin);
                prop_assert!(player.pos.y <= FIELD_HEIGHT - tuning.field_margin);
                prop_assert!(player.vel.length() <= tuning.max_speed + 1e-4);
            }
        }
    }
}
