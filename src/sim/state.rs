//! Game state and core simulation types
//!
//! Everything the drawing layer needs for a frame lives in `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::spawn::WaveDirector;
use crate::consts::*;
use crate::outcome::ReportLatch;
use crate::rng::RandomSource;
use crate::tuning::Tuning;

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunEnd {
    /// Final round cleared
    Completed,
    /// Out of lives
    Defeated,
}

/// Round/game progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Not started, waiting for advance
    Idle,
    /// Active gameplay
    Playing,
    /// Round cleared, waiting for advance
    StageClear,
    /// Run ended, waiting for advance to restart
    GameOver(RunEnd),
}

/// Progression notifications for HUD/audio layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RoundStarted { level: u32 },
    ShotFired { tier: u8 },
    BombDetonated,
    BossSpawned { level: u32 },
    EnemyDestroyed { kind: EnemyKind, points: u64 },
    PlayerHit { lives_left: u32 },
    ItemCollected { kind: ItemKind },
    StageCleared { level: u32 },
    GameOver { end: RunEnd, score: u64 },
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub half_extent: f32,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            pos: Self::spawn_point(tuning),
            vel: Vec2::ZERO,
            half_extent: tuning.player_half_extent,
        }
    }

    /// Default position: horizontally centred, above the bottom edge
    pub fn spawn_point(tuning: &Tuning) -> Vec2 {
        Vec2::new(FIELD_WIDTH / 2.0, FIELD_HEIGHT - tuning.respawn_offset)
    }

    pub fn respawn(&mut self, tuning: &Tuning) {
        self.pos = Self::spawn_point(tuning);
        self.vel = Vec2::ZERO;
    }
}

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Descends with a sine drift
    Basic,
    /// Descends bouncing between the side margins
    Zigzag,
    /// Slow, tough, large hitbox
    Tank,
    /// Sweeps sideways and fires downward
    Shooter,
    /// End-of-round boss
    Boss,
}

impl EnemyKind {
    /// Hit points at spawn for a 1-based level
    pub fn base_hp(self, level: u32) -> i32 {
        match self {
            EnemyKind::Basic => 1,
            EnemyKind::Zigzag => 2,
            EnemyKind::Tank => 5,
            EnemyKind::Shooter => 2,
            // 10 * (1 + (level - 1) * 0.1), kept integral
            EnemyKind::Boss => 10 + level.saturating_sub(1) as i32,
        }
    }

    pub fn half_extent(self) -> f32 {
        match self {
            EnemyKind::Tank => 20.0,
            EnemyKind::Boss => 60.0,
            _ => 15.0,
        }
    }

    /// Kinds that re-enter from the top after leaving through the bottom
    pub fn wraps(self) -> bool {
        !matches!(self, EnemyKind::Shooter | EnemyKind::Boss)
    }
}

/// An enemy entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: EnemyKind,
    pub hp: i32,
    pub max_hp: i32,
    pub half_extent: f32,
    /// Ticks since spawn
    pub age: u32,
}

/// Sine drift per tick for basic enemies
const BASIC_DRIFT: f32 = 2.0;
/// Altitude at which the boss stops descending
const BOSS_ALTITUDE: f32 = 100.0;
const SHOOTER_FIRE_PERIOD: u32 = 120;
const BOSS_FIRE_PERIOD: u32 = 100;
/// Horizontal band zigzag enemies bounce within
const ZIGZAG_MARGIN: f32 = 30.0;
/// Off-field distance after which shooters turn around
const SHOOTER_TURN_MARGIN: f32 = 50.0;
/// Distance below the field after which wrapping enemies re-enter
const WRAP_MARGIN: f32 = 50.0;

impl Enemy {
    pub fn new(kind: EnemyKind, pos: Vec2, vel: Vec2, level: u32) -> Self {
        let hp = kind.base_hp(level);
        Self {
            pos,
            vel,
            kind,
            hp,
            max_hp: hp,
            half_extent: kind.half_extent(),
            age: 0,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Score for destroying this enemy
    pub fn points(&self) -> u64 {
        self.max_hp.max(0) as u64 * 10
    }

    /// Advance one tick of kind-specific movement. Shots are appended to
    /// `bullets`.
    pub fn advance(&mut self, rng: &mut dyn RandomSource, bullets: &mut Vec<Bullet>) {
        self.age += 1;

        match self.kind {
            EnemyKind::Basic => {
                self.pos.x += (self.age as f32 * 0.05).sin() * BASIC_DRIFT;
                self.pos.y += self.vel.y;
            }
            EnemyKind::Zigzag => {
                self.pos += self.vel;
                if self.pos.x < ZIGZAG_MARGIN || self.pos.x > FIELD_WIDTH - ZIGZAG_MARGIN {
                    self.vel.x = -self.vel.x;
                }
            }
            EnemyKind::Tank => {
                self.pos.y += self.vel.y;
            }
            EnemyKind::Shooter => {
                self.pos.x += self.vel.x;
                if self.pos.x < -SHOOTER_TURN_MARGIN
                    || self.pos.x > FIELD_WIDTH + SHOOTER_TURN_MARGIN
                {
                    self.vel.x = -self.vel.x;
                }
                if self.age % SHOOTER_FIRE_PERIOD == 0 {
                    bullets.push(Bullet::enemy(
                        self.pos + Vec2::new(0.0, 20.0),
                        Vec2::new(0.0, 2.0),
                    ));
                }
            }
            EnemyKind::Boss => {
                if self.pos.y < BOSS_ALTITUDE {
                    self.pos.y += self.vel.y;
                } else {
                    self.pos.x += (self.age as f32 * 0.02).sin() * BASIC_DRIFT;
                }
                if self.age % BOSS_FIRE_PERIOD == 0 {
                    for i in -2..=2 {
                        bullets.push(Bullet::enemy(
                            self.pos + Vec2::new(0.0, 60.0),
                            Vec2::new(i as f32, 2.5),
                        ));
                    }
                }
            }
        }

        if self.kind.wraps() && self.pos.y > FIELD_HEIGHT + WRAP_MARGIN {
            self.pos = Vec2::new(random_spawn_x(rng), -WRAP_MARGIN);
        }
    }
}

/// Random x inside the spawn lane
pub fn random_spawn_x(rng: &mut dyn RandomSource) -> f32 {
    rng.range(30.0, FIELD_WIDTH - 30.0)
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub from_player: bool,
    pub damage: i32,
}

/// Bullets this far outside the field are discarded
const BULLET_CULL_MARGIN: f32 = 50.0;

impl Bullet {
    pub fn player(pos: Vec2, vel: Vec2, damage: i32) -> Self {
        Self {
            pos,
            vel,
            from_player: true,
            damage,
        }
    }

    pub fn enemy(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            from_player: false,
            damage: 1,
        }
    }

    pub fn is_on_field(&self) -> bool {
        self.pos.x > -BULLET_CULL_MARGIN
            && self.pos.x < FIELD_WIDTH + BULLET_CULL_MARGIN
            && self.pos.y > -BULLET_CULL_MARGIN
            && self.pos.y < FIELD_HEIGHT + BULLET_CULL_MARGIN
    }
}

/// Pickup types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Doubles bullet damage for a while
    Booster,
    BombRefill,
    Health,
    WeaponUpgrade,
}

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: ItemKind,
}

impl Item {
    pub fn is_on_field(&self) -> bool {
        self.pos.y < FIELD_HEIGHT + BULLET_CULL_MARGIN
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub color: u32,
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;
/// Life lost by every particle each tick
const PARTICLE_DECAY: f32 = 0.05;

pub const EXPLOSION_COLOR: u32 = 0xffaa00;
pub const BOMB_COLOR: u32 = 0xffffff;

/// Highest weapon tier
pub const MAX_WEAPON_TIER: u8 = 3;

/// Latches and timestamps derived from the held-action input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputLatches {
    /// Tick of the last volley
    pub last_shot_tick: Option<u64>,
    /// Bomb action was held last tick
    pub bomb_held: bool,
    /// Advance action was held last tick
    pub advance_held: bool,
}

/// Compact view for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub phase: Phase,
    pub score: u64,
    pub level: u32,
    pub lives: u32,
    pub bombs: u32,
    pub booster_ticks: u32,
    pub weapon_tier: u8,
}

/// Complete shooter state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Balance values
    pub tuning: Tuning,
    pub phase: Phase,
    pub score: u64,
    /// Current round (1-based)
    pub level: u32,
    pub lives: u32,
    pub bombs: u32,
    /// Ticks of booster remaining
    pub booster_ticks: u32,
    /// 1..=3
    pub weapon_tier: u8,
    /// Simulation tick counter (monotonic across runs)
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    pub items: Vec<Item>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    pub wave: WaveDirector,
    pub latches: InputLatches,
    /// Guards the outcome report of the current run
    pub report: ReportLatch,
}

impl GameState {
    /// Fresh idle state
    pub fn new(tuning: Tuning) -> Self {
        Self {
            phase: Phase::Idle,
            score: 0,
            level: 1,
            lives: tuning.starting_lives,
            bombs: tuning.starting_bombs,
            booster_ticks: 0,
            weapon_tier: 1,
            time_ticks: 0,
            player: Player::new(&tuning),
            enemies: Vec::new(),
            bullets: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            wave: WaveDirector::default(),
            latches: InputLatches::default(),
            report: ReportLatch::default(),
            tuning,
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            phase: self.phase,
            score: self.score,
            level: self.level,
            lives: self.lives,
            bombs: self.bombs,
            booster_ticks: self.booster_ticks,
            weapon_tier: self.weapon_tier,
        }
    }

    /// Damage a shot currently deals
    pub fn shot_damage(&self) -> i32 {
        if self.booster_ticks > 0 { 2 } else { 1 }
    }

    /// Reset score, resources and the first round for a new run
    pub fn start_run(&mut self, rng: &mut dyn RandomSource) {
        self.score = 0;
        self.lives = self.tuning.starting_lives;
        self.bombs = self.tuning.starting_bombs;
        self.booster_ticks = 0;
        self.weapon_tier = 1;
        self.player = Player::new(&self.tuning);
        self.latches.last_shot_tick = None;
        self.report.rearm();
        self.init_round(1, rng);
        log::info!("Run started");
    }

    /// Clear the field and schedule a round
    pub fn init_round(&mut self, level: u32, rng: &mut dyn RandomSource) {
        self.level = level.clamp(1, TOTAL_ROUNDS);
        self.wave = WaveDirector::new(self.level, &self.tuning, rng);
        self.enemies.clear();
        self.bullets.clear();
        self.items.clear();
        self.particles.clear();
        self.phase = Phase::Playing;
        log::info!(
            "Round {} started: {} enemies before the boss",
            self.level,
            self.wave.enemies_to_spawn
        );
    }

    /// Round objective met: quota spent, boss spawned, nothing left alive
    pub fn round_cleared(&self) -> bool {
        self.enemies.is_empty() && self.wave.quota_exhausted() && self.wave.boss_spawned
    }

    fn push_particle(&mut self, particle: Particle) {
        if self.particles.len() >= MAX_PARTICLES {
            // Remove oldest particles to make room
            self.particles.remove(0);
        }
        self.particles.push(particle);
    }

    /// Burst of debris where an enemy died
    pub fn spawn_explosion(&mut self, at: Vec2) {
        let seed = (self.time_ticks as u32) ^ (at.x as u32).wrapping_mul(31337);
        for i in 0..10u32 {
            let (r1, r2) = hash_pair(seed, i);
            self.push_particle(Particle {
                pos: at,
                vel: Vec2::new(r1 - 0.5, r2 - 0.5) * 10.0,
                life: 1.0,
                color: EXPLOSION_COLOR,
            });
        }
    }

    /// Full-screen flash of sparks for a bomb
    pub fn spawn_bomb_burst(&mut self) {
        let seed = self.time_ticks as u32;
        for i in 0..50u32 {
            let (r1, r2) = hash_pair(seed, i);
            let (r3, r4) = hash_pair(seed.wrapping_add(104729), i);
            self.push_particle(Particle {
                pos: Vec2::new(r1 * FIELD_WIDTH, r2 * FIELD_HEIGHT),
                vel: Vec2::new(r3 - 0.5, r4 - 0.5) * 20.0,
                life: 2.0,
                color: BOMB_COLOR,
            });
        }
    }

    /// Move and fade particles
    pub fn update_particles(&mut self) {
        for particle in self.particles.iter_mut() {
            particle.pos += particle.vel;
            particle.life -= PARTICLE_DECAY;
        }
        self.particles.retain(|p| p.life > 0.0);
    }
}

/// Deterministic "random" pair in [0, 1) from a seed and index
fn hash_pair(seed: u32, i: u32) -> (f32, f32) {
    let hash = seed.wrapping_mul(2654435761).wrapping_add(i.wrapping_mul(7919));
    let hash = hash.wrapping_mul(2654435761);
    let r1 = (hash % 1000) as f32 / 1000.0;
    let r2 = ((hash >> 10) % 1000) as f32 / 1000.0;
    (r1, r2)
}
