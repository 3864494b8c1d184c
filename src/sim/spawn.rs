//! Wave director: when and what to spawn
//!
//! The director is a plain value threaded through [`step`], which returns the
//! next director together with the entities to add this tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnemyKind, Item, ItemKind, random_spawn_x};
use crate::consts::FIELD_WIDTH;
use crate::rng::RandomSource;
use crate::tuning::Tuning;

/// Ticks into the round at which each scheduled item falls
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSchedule {
    pub bomb: u32,
    pub health: u32,
    pub weapon: u32,
}

/// Per-round spawn bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveDirector {
    /// Non-boss enemies still to spawn this round
    pub enemies_to_spawn: u32,
    /// Ticks since the last enemy spawn
    pub spawn_timer: u32,
    pub boss_spawned: bool,
    /// Ticks since the round started
    pub round_tick: u32,
    pub items: ItemSchedule,
}

/// Something the director wants added to the field
#[derive(Debug, Clone)]
pub enum Spawn {
    Enemy(Enemy),
    Item(Item),
}

/// Vertical speed of scheduled item drops
const ITEM_FALL_SPEED: f32 = 1.5;
/// Vertical speed of booster drops from destroyed enemies
const BOOSTER_FALL_SPEED: f32 = 2.0;

impl WaveDirector {
    /// Fresh director for a 1-based level, with its item frames drawn
    pub fn new(level: u32, tuning: &Tuning, rng: &mut dyn RandomSource) -> Self {
        let mut frame = || rng.range_u32(tuning.item_window_start, tuning.item_window_end);
        let items = ItemSchedule {
            bomb: frame(),
            health: frame(),
            weapon: frame(),
        };
        Self {
            enemies_to_spawn: tuning.round_quota(level),
            spawn_timer: 0,
            boss_spawned: false,
            round_tick: 0,
            items,
        }
    }

    /// No regular enemies left to spawn
    pub fn quota_exhausted(&self) -> bool {
        self.enemies_to_spawn == 0
    }
}

/// Advance the director one tick.
///
/// Regular enemies appear once the spawn timer exceeds the interval, until
/// the quota is spent. The boss appears once, only after the quota is spent
/// and the field is empty. Scheduled items fall on their frame.
pub fn step(
    director: WaveDirector,
    level: u32,
    enemies_alive: usize,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> (WaveDirector, Vec<Spawn>) {
    let mut next = director;
    let mut spawns = Vec::new();

    next.round_tick += 1;

    if next.enemies_to_spawn > 0 {
        next.spawn_timer += 1;
        if next.spawn_timer > tuning.spawn_interval_ticks {
            let kind = enemy_kind_for_roll(rng.unit());
            spawns.push(Spawn::Enemy(spawn_enemy(kind, level, tuning, rng)));
            next.enemies_to_spawn -= 1;
            next.spawn_timer = 0;
        }
    } else if enemies_alive == 0 && !next.boss_spawned {
        spawns.push(Spawn::Enemy(spawn_enemy(EnemyKind::Boss, level, tuning, rng)));
        next.boss_spawned = true;
    }

    let scheduled = [
        (next.items.bomb, ItemKind::BombRefill),
        (next.items.health, ItemKind::Health),
        (next.items.weapon, ItemKind::WeaponUpgrade),
    ];
    for (frame, kind) in scheduled {
        if frame == next.round_tick {
            let pos = Vec2::new(random_spawn_x(rng), -30.0);
            spawns.push(Spawn::Item(Item {
                pos,
                vel: Vec2::new(0.0, ITEM_FALL_SPEED),
                kind,
            }));
        }
    }

    (next, spawns)
}

/// Map a uniform roll to a regular enemy type
pub fn enemy_kind_for_roll(roll: f32) -> EnemyKind {
    if roll < 0.3 {
        EnemyKind::Zigzag
    } else if roll < 0.5 {
        EnemyKind::Tank
    } else if roll < 0.7 {
        EnemyKind::Shooter
    } else {
        EnemyKind::Basic
    }
}

/// Build an enemy with its kind's entry position and level-scaled velocity
pub fn spawn_enemy(
    kind: EnemyKind,
    level: u32,
    tuning: &Tuning,
    rng: &mut dyn RandomSource,
) -> Enemy {
    let mult = tuning.speed_multiplier(level);
    let mut pos = Vec2::new(random_spawn_x(rng), -50.0);

    let vel = match kind {
        EnemyKind::Basic => Vec2::new(0.0, mult),
        EnemyKind::Zigzag => {
            let dir = if rng.chance(0.5) { 1.0 } else { -1.0 };
            Vec2::new(dir * mult, 0.7 * mult)
        }
        EnemyKind::Tank => Vec2::new(0.0, 0.5 * mult),
        EnemyKind::Shooter => {
            pos.y = rng.range(50.0, 250.0);
            let from_left = rng.chance(0.5);
            pos.x = if from_left { -30.0 } else { FIELD_WIDTH + 30.0 };
            let dir = if from_left { 1.0 } else { -1.0 };
            Vec2::new(dir * 1.5 * mult, 0.0)
        }
        EnemyKind::Boss => {
            pos.y = -150.0;
            Vec2::new(0.0, 0.5)
        }
    };

    if kind == EnemyKind::Boss {
        log::info!("Boss spawned for round {}", level);
    }

    Enemy::new(kind, pos, vel, level)
}

/// Booster dropped where an enemy was destroyed
pub fn booster_drop(at: Vec2) -> Item {
    Item {
        pos: at,
        vel: Vec2::new(0.0, BOOSTER_FALL_SPEED),
        kind: ItemKind::Booster,
    }
}
