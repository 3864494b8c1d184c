//! Deterministic shooter simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Randomness only through an injected `RandomSource`
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod player;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::overlaps;
pub use session::ShooterSession;
pub use spawn::{Spawn, WaveDirector, enemy_kind_for_roll};
pub use state::{
    Bullet, Enemy, EnemyKind, GameEvent, GameState, Hud, Item, ItemKind, MAX_PARTICLES,
    MAX_WEAPON_TIER, Particle, Phase, Player, RunEnd,
};
pub use tick::{TickInput, TickOutput, tick};
