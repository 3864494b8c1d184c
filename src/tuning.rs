//! Data-driven game balance for the shooter
//!
//! Defaults reproduce the reference feel. A JSON document may override any
//! subset of fields; missing fields keep their defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH, TOTAL_ROUNDS};
use crate::millis_to_ticks;

/// Errors raised while loading a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning document is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Upper bound for starting lives and bombs
pub const MAX_STARTING_RESOURCE: u32 = 99;
/// Upper bound for a single round's enemy quota
pub const MAX_ROUND_QUOTA: u32 = 10_000;

/// Shooter balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player handling ===
    /// Velocity added per tick while a direction is held
    pub player_accel: f32,
    /// Velocity multiplier applied every tick (0-1]
    pub friction: f32,
    /// Maximum velocity magnitude (pixels/tick)
    pub max_speed: f32,
    /// Distance kept between the player centre and each field edge
    pub field_margin: f32,
    /// Half-size of the player hitbox
    pub player_half_extent: f32,
    /// Respawn point distance above the bottom edge
    pub respawn_offset: f32,

    // === Weapons ===
    /// Minimum ticks between shots
    pub fire_cooldown_ticks: u32,
    /// Damage subtracted from every enemy by a bomb
    pub bomb_damage: i32,
    /// Booster duration after pickup (ticks)
    pub booster_ticks: u32,

    // === Starting resources ===
    pub starting_lives: u32,
    pub starting_bombs: u32,

    // === Waves ===
    /// Non-boss quota is `quota_base + level * quota_per_level`
    pub quota_base: u32,
    pub quota_per_level: u32,
    /// Spawn timer must exceed this many ticks before the next enemy
    pub spawn_interval_ticks: u32,
    /// Per-level enemy speed growth
    pub speed_growth_per_level: f32,
    /// Window (ticks into the round) in which scheduled items appear
    pub item_window_start: u32,
    pub item_window_end: u32,
    /// Chance that a kill drops a booster
    pub booster_drop_chance: f32,

    // === Respawn ===
    /// Enemies within this vertical distance of the respawn point are removed
    pub respawn_clear_band: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            // Player handling
            player_accel: 0.5,
            friction: 0.92,
            max_speed: 8.0,
            field_margin: 20.0,
            player_half_extent: 15.0,
            respawn_offset: 100.0,

            // Weapons
            fire_cooldown_ticks: millis_to_ticks(150),
            bomb_damage: 5,
            booster_ticks: 600,

            // Starting resources
            starting_lives: 3,
            starting_bombs: 1,

            // Waves
            quota_base: 10,
            quota_per_level: 2,
            spawn_interval_ticks: 60,
            speed_growth_per_level: 0.03,
            item_window_start: 300,
            item_window_end: 1200,
            booster_drop_chance: 0.1,

            // Respawn
            respawn_clear_band: 200.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON tuning document and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        if let Err(e) = tuning.validate() {
            log::warn!("Rejected tuning overrides: {}", e);
            return Err(e);
        }
        log::info!("Loaded tuning overrides");
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for authoring override files)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.friction > 0.0 && self.friction <= 1.0) {
            return Err(TuningError::Invalid {
                field: "friction",
                reason: "must be in (0, 1]",
            });
        }
        if self.max_speed <= 0.0 {
            return Err(TuningError::Invalid {
                field: "max_speed",
                reason: "must be positive",
            });
        }
        if self.field_margin < 0.0
            || self.field_margin * 2.0 >= FIELD_WIDTH.min(FIELD_HEIGHT)
        {
            return Err(TuningError::Invalid {
                field: "field_margin",
                reason: "must leave a non-empty playable area",
            });
        }
        if self.respawn_offset < self.field_margin
            || self.respawn_offset > FIELD_HEIGHT - self.field_margin
        {
            return Err(TuningError::Invalid {
                field: "respawn_offset",
                reason: "respawn point must lie inside the playable area",
            });
        }
        if self.starting_lives == 0 {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at least 1",
            });
        }
        if self.starting_lives > MAX_STARTING_RESOURCE {
            return Err(TuningError::Invalid {
                field: "starting_lives",
                reason: "must be at most 99",
            });
        }
        if self.starting_bombs > MAX_STARTING_RESOURCE {
            return Err(TuningError::Invalid {
                field: "starting_bombs",
                reason: "must be at most 99",
            });
        }
        let last_quota = self
            .quota_per_level
            .checked_mul(TOTAL_ROUNDS)
            .and_then(|q| q.checked_add(self.quota_base));
        if !last_quota.is_some_and(|q| q <= MAX_ROUND_QUOTA) {
            return Err(TuningError::Invalid {
                field: "quota_per_level",
                reason: "final round quota must not exceed 10000",
            });
        }
        if self.item_window_end <= self.item_window_start {
            return Err(TuningError::Invalid {
                field: "item_window_end",
                reason: "must be greater than item_window_start",
            });
        }
        if !(0.0..=1.0).contains(&self.booster_drop_chance) {
            return Err(TuningError::Invalid {
                field: "booster_drop_chance",
                reason: "must be a probability",
            });
        }
        Ok(())
    }

    /// Enemy speed multiplier for a 1-based level
    pub fn speed_multiplier(&self, level: u32) -> f32 {
        1.0 + level.saturating_sub(1) as f32 * self.speed_growth_per_level
    }

    /// Non-boss enemy quota for a 1-based level
    pub fn round_quota(&self, level: u32) -> u32 {
        self.quota_per_level
            .saturating_mul(level)
            .saturating_add(self.quota_base)
    }
}
