//! Lane steering and forward motion

use crate::consts::LANE_COUNT;
use crate::tuning::Tuning;
use crate::{clamp_to_walls, lane_center_x};

use super::state::Player;

impl Player {
    /// Steer one lane left (clamped at lane 0)
    pub fn steer_left(&mut self) {
        self.target_lane = self.target_lane.saturating_sub(1);
    }

    /// Steer one lane right (clamped at the last lane)
    pub fn steer_right(&mut self) {
        self.target_lane = (self.target_lane + 1).min(LANE_COUNT - 1);
    }

    /// Ramp speed toward the cap. Never lowers speed.
    pub fn ramp_speed(&mut self, dt: f32, tuning: &Tuning) {
        if self.halted || self.forward_speed >= tuning.max_speed {
            return;
        }
        self.forward_speed = (self.forward_speed + tuning.acceleration * dt).min(tuning.max_speed);
    }

    /// Integrate forward and lateral motion. Returns distance travelled.
    ///
    /// Lateral x closes `min(1, lateral_rate * dt)` of the gap to the target
    /// lane each tick, then is clamped between the walls.
    pub fn integrate(&mut self, dt: f32, tuning: &Tuning) -> f32 {
        if self.halted {
            return 0.0;
        }
        let step = self.forward_speed * dt;
        self.pos.z -= step;

        let target_x = lane_center_x(self.target_lane);
        self.pos.x += (target_x - self.pos.x) * (tuning.lateral_rate * dt).min(1.0);
        self.pos.x = clamp_to_walls(self.pos.x);
        step
    }

    /// Ramp speed then integrate position
    pub fn advance(&mut self, dt: f32, tuning: &Tuning) -> f32 {
        self.ramp_speed(dt, tuning);
        self.integrate(dt, tuning)
    }

    /// Stop for good (run ended)
    pub fn halt(&mut self) {
        self.forward_speed = 0.0;
        self.halted = true;
    }
}
