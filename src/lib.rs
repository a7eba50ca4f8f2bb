//! Lane Runner - A three-lane endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (streaming, player, collisions, game state)
//! - `camera`: View/projection math for the chase and first-person cameras
//! - `renderer`: Per-frame snapshot handed to the draw layer
//! - `best_score`: Persisted best coin count
//! - `tuning`: Data-driven game balance
//! - `game`: Frame driver tying clock, simulation and persistence together

pub mod best_score;
pub mod camera;
pub mod game;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use best_score::{BestScore, ScoreStore, StoreError};
pub use game::{Game, RunSummary};
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Longest frame step the simulation will take (seconds)
    pub const MAX_FRAME_DT: f32 = 0.05;

    /// Track layout
    pub const LANE_COUNT: usize = 3;
    pub const LANE_WIDTH: f32 = 2.0;
    pub const TOTAL_WIDTH: f32 = LANE_WIDTH * LANE_COUNT as f32;
    pub const LANE_CENTER_X: [f32; LANE_COUNT] = [-LANE_WIDTH, 0.0, LANE_WIDTH];
    /// Gap kept between the player and either wall
    pub const WALL_MARGIN: f32 = 0.4;

    /// Player defaults
    pub const PLAYER_START_LANE: usize = 1;
    pub const PLAYER_START_Z: f32 = -1.0;
    pub const PLAYER_Y: f32 = 0.5;
    pub const PLAYER_RADIUS: f32 = 0.5;

    /// Coins
    pub const COIN_Y: f32 = 0.5;
    /// Pickup distance between player and coin centers
    pub const COIN_PICKUP_DISTANCE: f32 = 0.7;
    /// Spin rate of an uncollected coin (rad/s)
    pub const COIN_SPIN_SPEED: f32 = 3.0;

    /// Barrels
    pub const OBSTACLE_Y: f32 = 0.4;
    pub const OBSTACLE_RADIUS: f32 = 0.45;

    /// Bombs (static and falling share a body)
    pub const BOMB_Y: f32 = 0.35;
    pub const BOMB_RADIUS: f32 = 0.35;
}

/// Lane center x for a lane index (clamped to the outermost lanes)
#[inline]
pub fn lane_center_x(lane: usize) -> f32 {
    consts::LANE_CENTER_X[lane.min(consts::LANE_COUNT - 1)]
}

/// Furthest |x| the player's center may reach
#[inline]
pub fn wall_half_extent() -> f32 {
    consts::TOTAL_WIDTH / 2.0 - consts::WALL_MARGIN
}

/// Clamp an x coordinate so the player stays between the walls
#[inline]
pub fn clamp_to_walls(x: f32) -> f32 {
    let half = wall_half_extent();
    x.clamp(-half, half)
}

/// Format a duration in seconds as `MM:SS`
pub fn format_clock(secs: f32) -> String {
    let whole = secs.max(0.0) as u32;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lane_centers_inside_walls() {
        for lane in 0..consts::LANE_COUNT {
            let x = lane_center_x(lane);
            assert_eq!(clamp_to_walls(x), x);
        }
        assert_eq!(lane_center_x(7), consts::LANE_WIDTH);
    }

    #[test]
    fn test_clamp_to_walls() {
        assert!((clamp_to_walls(10.0) - 2.6).abs() < 1e-6);
        assert!((clamp_to_walls(-10.0) + 2.6).abs() < 1e-6);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(61.9), "01:01");
        assert_eq!(format_clock(-3.0), "00:00");
    }
}
