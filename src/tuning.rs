//! Data-driven game balance
//!
//! Defaults reproduce the shipped feel of the game. A JSON document may
//! override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::MAX_FRAME_DT;

/// Smallest chunk spacing; the spawn cursor must visibly move each step
pub const MIN_SPAWN_INTERVAL: f32 = 0.1;
/// Upper bound on coins emitted by one chunk
pub const MAX_COINS_PER_RUN: usize = 64;

/// Errors raised while loading tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Balance values for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Forward speed at the start of a run (units/s)
    pub start_speed: f32,
    /// Forward speed cap (units/s)
    pub max_speed: f32,
    /// Forward acceleration (units/s²)
    pub acceleration: f32,
    /// Lateral smoothing rate; x closes `min(1, rate * dt)` of the gap per tick
    pub lateral_rate: f32,

    // === Streaming ===
    /// Spawn cursor start, relative to the origin
    pub first_spawn_z: f32,
    /// Distance between chunk spawns
    pub spawn_interval: f32,
    /// How far ahead of the player chunks are kept spawned
    pub look_ahead: f32,
    /// Entities further than this behind the player are culled
    pub cleanup_behind: f32,
    /// Player z below which the world is shifted back
    pub recenter_threshold: f32,
    /// Amount added to every z on recenter
    pub recenter_shift: f32,

    // === Chunk mix ===
    /// Rolls below this spawn a coin run
    pub coin_run_cutoff: f32,
    /// Rolls below this (and not a coin run) spawn a barrel; the rest are static bombs
    pub obstacle_cutoff: f32,
    /// Coins per coin run
    pub coins_per_run: usize,
    /// Spacing between coins in a run
    pub coin_spacing: f32,

    // === Falling bombs ===
    /// Seconds between falling bomb spawns
    pub bomb_interval: f32,
    /// Falling bombs only spawn while the player is below this z
    pub bomb_start_z: f32,
    /// Fall acceleration per unit of forward speed
    pub bomb_gravity_factor: f32,
    /// Falling bombs further than this behind the player are culled
    pub bomb_cleanup_behind: f32,

    // === Finish ===
    /// Total distance that wins the run (None = endless)
    pub finish_distance: Option<f32>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            start_speed: 6.0,
            max_speed: 12.0,
            acceleration: 0.1,
            lateral_rate: 6.0,

            first_spawn_z: -20.0,
            spawn_interval: 5.0,
            look_ahead: 120.0,
            cleanup_behind: 20.0,
            recenter_threshold: -100.0,
            recenter_shift: 100.0,

            coin_run_cutoff: 0.4,
            obstacle_cutoff: 0.7,
            coins_per_run: 5,
            coin_spacing: 1.5,

            bomb_interval: 2.5,
            bomb_start_z: 100.0,
            bomb_gravity_factor: 0.4,
            bomb_cleanup_behind: 30.0,

            finish_distance: None,
        }
    }
}

impl Tuning {
    /// Parse and validate tuning from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Furthest the player can move in a single frame
    pub fn max_frame_travel(&self) -> f32 {
        self.max_speed * MAX_FRAME_DT
    }

    /// Check that the values keep the streaming windows sound and the run
    /// well-behaved (speed never drops, every spawn loop terminates)
    pub fn validate(&self) -> Result<(), TuningError> {
        let fields = [
            ("start_speed", self.start_speed),
            ("max_speed", self.max_speed),
            ("acceleration", self.acceleration),
            ("lateral_rate", self.lateral_rate),
            ("first_spawn_z", self.first_spawn_z),
            ("spawn_interval", self.spawn_interval),
            ("look_ahead", self.look_ahead),
            ("cleanup_behind", self.cleanup_behind),
            ("recenter_threshold", self.recenter_threshold),
            ("recenter_shift", self.recenter_shift),
            ("coin_run_cutoff", self.coin_run_cutoff),
            ("obstacle_cutoff", self.obstacle_cutoff),
            ("coin_spacing", self.coin_spacing),
            ("bomb_interval", self.bomb_interval),
            ("bomb_start_z", self.bomb_start_z),
            ("bomb_gravity_factor", self.bomb_gravity_factor),
            ("bomb_cleanup_behind", self.bomb_cleanup_behind),
        ];
        if let Some((name, value)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(invalid(format!("{name} must be finite, got {value}")));
        }

        let travel = self.max_frame_travel();
        if self.look_ahead <= travel {
            return Err(invalid(format!(
                "look_ahead {} must exceed max frame travel {}",
                self.look_ahead, travel
            )));
        }
        if self.cleanup_behind <= travel {
            return Err(invalid(format!(
                "cleanup_behind {} must exceed max frame travel {}",
                self.cleanup_behind, travel
            )));
        }
        if self.spawn_interval < MIN_SPAWN_INTERVAL {
            return Err(invalid(format!(
                "spawn_interval {} must be at least {}",
                self.spawn_interval, MIN_SPAWN_INTERVAL
            )));
        }
        if self.bomb_interval < MAX_FRAME_DT {
            return Err(invalid(format!(
                "bomb_interval {} must be at least one max frame ({})",
                self.bomb_interval, MAX_FRAME_DT
            )));
        }
        if self.recenter_threshold >= 0.0 || self.recenter_shift <= 0.0 {
            return Err(invalid(
                "recenter threshold must be negative and shift positive".into(),
            ));
        }
        if !(0.0 <= self.coin_run_cutoff
            && self.coin_run_cutoff <= self.obstacle_cutoff
            && self.obstacle_cutoff <= 1.0)
        {
            return Err(invalid(
                "chunk cutoffs must satisfy 0 <= coin_run <= obstacle <= 1".into(),
            ));
        }
        if self.coins_per_run > MAX_COINS_PER_RUN || self.coin_spacing < 0.0 {
            return Err(invalid(format!(
                "coin runs take 0..={} coins with non-negative spacing",
                MAX_COINS_PER_RUN
            )));
        }
        if self.start_speed < 0.0 || self.max_speed < self.start_speed {
            return Err(invalid(
                "speeds must satisfy 0 <= start_speed <= max_speed".into(),
            ));
        }
        if self.acceleration < 0.0 {
            return Err(invalid(format!(
                "acceleration {} would slow the runner down",
                self.acceleration
            )));
        }
        if self.lateral_rate <= 0.0 {
            return Err(invalid("lateral_rate must be positive".into()));
        }
        if self.bomb_gravity_factor < 0.0 || self.bomb_cleanup_behind <= 0.0 {
            return Err(invalid(
                "bomb gravity must be non-negative and cleanup distance positive".into(),
            ));
        }
        if let Some(finish) = self.finish_distance {
            if !(finish.is_finite() && finish > 0.0) {
                return Err(invalid(format!("finish_distance {finish} must be positive")));
            }
        }
        Ok(())
    }
}

fn invalid(msg: String) -> TuningError {
    TuningError::Invalid(msg)
}
