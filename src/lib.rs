//! Retro Arcade - simulation cores for the arcade portal
//!
//! Core modules:
//! - `puzzle`: Warehouse box-pushing puzzle (level parsing, moves, sessions)
//! - `sim`: Vertical shooter simulation (entities, spawning, collisions, rounds)
//! - `outcome`: Boundary to external score persistence
//! - `tuning`: Data-driven game balance
//! - `rng`: Injectable randomness

pub mod outcome;
pub mod puzzle;
pub mod rng;
pub mod sim;
pub mod tuning;

pub use outcome::{LogReporter, Outcome, OutcomeReporter, RecordingReporter, ReportLatch};
pub use rng::RandomSource;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate the tick-based timers are expressed in
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Simulation timestep (seconds)
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum ticks run per host frame
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 600.0;

    /// Number of rounds in a full shooter run
    pub const TOTAL_ROUNDS: u32 = 30;

    /// Identifiers attached to reported outcomes
    pub const PUZZLE_GAME_ID: &str = "warehouse";
    pub const SHOOTER_GAME_ID: &str = "starfighter";
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded)
#[inline]
pub fn millis_to_ticks(ms: u32) -> u32 {
    (ms * consts::TICKS_PER_SECOND + 500) / 1000
}
