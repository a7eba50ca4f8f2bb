//! Bombs dropped from the sky
//!
//! A timer spawns bombs ahead of the player at a fixed interval. Their fall
//! acceleration scales with forward speed so a bomb spends roughly the same
//! screen time in the air as the run speeds up.

use glam::Vec3;
use rand::Rng;

use crate::consts::LANE_COUNT;
use crate::lane_center_x;
use crate::tuning::Tuning;

use super::state::{Hazard, HazardKind, Player, World};

/// Build a falling bomb above a random lane ahead of the player
pub fn spawn_falling_bomb<R: Rng>(player_z: f32, rng: &mut R) -> Hazard {
    let lane = rng.random_range(0..LANE_COUNT);
    let x = lane_center_x(lane) + (rng.random::<f32>() - 0.5);
    let y = 15.0 + rng.random::<f32>() * 5.0;
    let z = player_z - 20.0 - rng.random::<f32>() * 30.0;
    let rotation = rng.random::<f32>() * std::f32::consts::TAU;
    let rotation_speed = (rng.random::<f32>() - 0.5) * 2.0;

    Hazard::falling_bomb(Vec3::new(x, y, z), rotation, rotation_speed)
}

impl World {
    /// Accumulate `dt` and spawn one bomb per elapsed interval.
    ///
    /// The timer only runs while the player is short of `bomb_start_z`. A long frame can spawn several bombs; leftover time carries over.
    /// Returns the number spawned.
    pub fn spawn_due_bombs<R: Rng>(
        &mut self,
        player_z: f32,
        dt: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        if player_z >= tuning.bomb_start_z {
            return 0;
        }
        self.bomb_timer += dt;

        let mut spawned = 0;
        while self.bomb_timer >= tuning.bomb_interval {
            let bomb = spawn_falling_bomb(player_z, rng);
            log::debug!("Falling bomb spawned at ({:.2}, {:.1}, {:.1})", bomb.pos.x, bomb.pos.y, bomb.pos.z);
            self.falling_bombs.push(bomb);
            self.bomb_timer -= tuning.bomb_interval;
            spawned += 1;
        }
        spawned
    }

    /// Integrate falling bombs and drop those that landed or fell behind
    pub fn update_falling_bombs(&mut self, player: &Player, dt: f32, tuning: &Tuning) {
        let gravity = player.forward_speed * tuning.bomb_gravity_factor;
        let cutoff = player.pos.z + tuning.bomb_cleanup_behind;

        self.falling_bombs.retain_mut(|bomb| {
            if let HazardKind::FallingBomb { velocity_y } = &mut bomb.kind {
                *velocity_y -= gravity * dt;
                bomb.pos.y += *velocity_y * dt;
            }
            bomb.rotate(dt);
            bomb.pos.y >= 0.0 && bomb.pos.z <= cutoff
        });
    }

    /// Spawn due bombs, then advance all of them
    pub fn update_bombs<R: Rng>(&mut self, player: &Player, dt: f32, tuning: &Tuning, rng: &mut R) {
        self.spawn_due_bombs(player.pos.z, dt, tuning, rng);
        self.update_falling_bombs(player, dt, tuning);
    }
}
