//! Track streaming
//!
//! The track is unbounded but coordinates are not: chunks are spawned in a
//! window ahead of the player, culled once they scroll behind the camera, and
//! every z in the world is periodically shifted back toward the origin.

use glam::Vec3;
use rand::Rng;

use crate::consts::*;
use crate::lane_center_x;
use crate::tuning::Tuning;

use super::state::{Coin, Hazard, Player, World};

/// What a single chunk spawns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    CoinRun,
    Obstacle,
    StaticBomb,
}

impl ChunkKind {
    /// Pick a chunk kind from a uniform roll in [0, 1)
    pub fn from_roll(roll: f32, tuning: &Tuning) -> Self {
        if roll < tuning.coin_run_cutoff {
            ChunkKind::CoinRun
        } else if roll < tuning.obstacle_cutoff {
            ChunkKind::Obstacle
        } else {
            ChunkKind::StaticBomb
        }
    }
}

impl World {
    /// Spawn chunks until the cursor is `look_ahead` past `player_z`.
    ///
    /// Returns the number of chunks spawned. Calling again without the player
    /// moving spawns nothing.
    pub fn ensure_streamed_ahead<R: Rng>(
        &mut self,
        player_z: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        let horizon = player_z - tuning.look_ahead;
        let mut spawned = 0;
        while self.next_spawn_z > horizon {
            self.spawn_chunk(self.next_spawn_z, tuning, rng);
            self.next_spawn_z -= tuning.spawn_interval;
            spawned += 1;
        }
        spawned
    }

    /// Spawn one randomly chosen chunk at `z`
    pub fn spawn_chunk<R: Rng>(&mut self, z: f32, tuning: &Tuning, rng: &mut R) -> ChunkKind {
        let kind = ChunkKind::from_roll(rng.random::<f32>(), tuning);
        let x = lane_center_x(rng.random_range(0..LANE_COUNT));

        match kind {
            ChunkKind::CoinRun => {
                for i in 0..tuning.coins_per_run {
                    self.coins.push(Coin {
                        pos: Vec3::new(x, COIN_Y, z - i as f32 * tuning.coin_spacing),
                        active: true,
                        rotation: rng.random::<f32>() * std::f32::consts::TAU,
                    });
                }
            }
            ChunkKind::Obstacle => {
                self.obstacles.push(Hazard::obstacle(Vec3::new(x, OBSTACLE_Y, z)));
            }
            ChunkKind::StaticBomb => {
                let rotation = rng.random::<f32>() * std::f32::consts::TAU;
                let rotation_speed = 0.5 + rng.random::<f32>();
                self.static_bombs
                    .push(Hazard::static_bomb(Vec3::new(x, BOMB_Y, z), rotation, rotation_speed));
            }
        }

        log::trace!("Spawned {:?} at z={:.1}", kind, z);
        kind
    }

    /// Drop chunk entities more than `cleanup_behind` behind the player.
    ///
    /// Falling bombs have their own lifetime rules and are untouched here.
    pub fn cleanup(&mut self, player_z: f32, tuning: &Tuning) {
        let cutoff = player_z + tuning.cleanup_behind;
        self.coins.retain(|c| c.pos.z <= cutoff);
        self.obstacles.retain(|h| h.pos.z <= cutoff);
        self.static_bombs.retain(|h| h.pos.z <= cutoff);
    }

    /// Shift the player, cursor and every store forward if the player has run
    /// past the recenter threshold. Returns the shift applied.
    pub fn recenter_if_needed(&mut self, player: &mut Player, tuning: &Tuning) -> Option<f32> {
        if player.pos.z >= tuning.recenter_threshold {
            return None;
        }
        let shift = tuning.recenter_shift;

        player.pos.z += shift;
        self.next_spawn_z += shift;
        for coin in &mut self.coins {
            coin.pos.z += shift;
        }
        for hazard in self
            .obstacles
            .iter_mut()
            .chain(self.static_bombs.iter_mut())
            .chain(self.falling_bombs.iter_mut())
        {
            hazard.pos.z += shift;
        }

        log::debug!("Recentered world by {} (player z now {:.2})", shift, player.pos.z);
        Some(shift)
    }

    /// Advance coin and static bomb spin
    pub fn animate(&mut self, dt: f32) {
        for coin in self.coins.iter_mut().filter(|c| c.active) {
            coin.rotation += COIN_SPIN_SPEED * dt;
        }
        for bomb in &mut self.static_bombs {
            bomb.rotate(dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_stream_from_empty() {
        let tuning = Tuning::default();
        let mut world = World::new(-20.0);
        let spawned = world.ensure_streamed_ahead(0.0, &tuning, &mut rng());

        assert!(world.next_spawn_z <= -120.0);
        assert_eq!(spawned, 20);
        assert!(world.entity_count() > 0);
    }

    #[test]
    fn test_stream_is_idempotent() {
        let tuning = Tuning::default();
        let mut world = World::new(-20.0);
        let mut rng = rng();
        world.ensure_streamed_ahead(-3.0, &tuning, &mut rng);
        let cursor = world.next_spawn_z;
        let count = world.entity_count();

        assert_eq!(world.ensure_streamed_ahead(-3.0, &tuning, &mut rng), 0);
        assert_eq!(world.next_spawn_z, cursor);
        assert_eq!(world.entity_count(), count);
    }

    #[test]
    fn test_chunk_roll_distribution() {
        let tuning = Tuning::default();
        assert_eq!(ChunkKind::from_roll(0.0, &tuning), ChunkKind::CoinRun);
        assert_eq!(ChunkKind::from_roll(0.39, &tuning), ChunkKind::CoinRun);
        assert_eq!(ChunkKind::from_roll(0.4, &tuning), ChunkKind::Obstacle);
        assert_eq!(ChunkKind::from_roll(0.69, &tuning), ChunkKind::Obstacle);
        assert_eq!(ChunkKind::from_roll(0.7, &tuning), ChunkKind::StaticBomb);
        assert_eq!(ChunkKind::from_roll(0.99, &tuning), ChunkKind::StaticBomb);
    }

    #[test]
    fn test_chunk_roll_boundaries_do_not_drift() {
        let tuning = Tuning {
            coin_run_cutoff: 0.1,
            obstacle_cutoff: 0.3,
            ..Default::default()
        };
        // Each cutoff is itself the boundary
        assert_eq!(ChunkKind::from_roll(0.1, &tuning), ChunkKind::Obstacle);
        assert_eq!(ChunkKind::from_roll(0.3, &tuning), ChunkKind::StaticBomb);
    }

    #[test]
    fn test_coin_run_layout() {
        let tuning = Tuning {
            coin_run_cutoff: 1.0,
            obstacle_cutoff: 1.0,
            ..Default::default()
        };
        let mut world = World::new(-20.0);
        let kind = world.spawn_chunk(-30.0, &tuning, &mut rng());

        assert_eq!(kind, ChunkKind::CoinRun);
        assert_eq!(world.coins.len(), 5);
        let x = world.coins[0].pos.x;
        assert!(LANE_CENTER_X.contains(&x));
        for (i, coin) in world.coins.iter().enumerate() {
            assert_eq!(coin.pos.x, x);
            assert!(coin.active);
            assert!((coin.pos.z - (-30.0 - 1.5 * i as f32)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_cleanup_removes_only_behind() {
        let tuning = Tuning::default();
        let mut world = World::new(-20.0);
        world.obstacles.push(Hazard::obstacle(Vec3::new(0.0, 0.4, 15.0)));
        world.obstacles.push(Hazard::obstacle(Vec3::new(0.0, 0.4, 10.0)));
        world.coins.push(Coin {
            pos: Vec3::new(2.0, 0.5, 10.5),
            active: false,
            rotation: 1.0,
        });
        world.falling_bombs.push(Hazard::falling_bomb(Vec3::new(0.0, 5.0, 50.0), 0.0, 0.0));

        world.cleanup(-10.0, &tuning);

        assert_eq!(world.obstacles.len(), 1);
        assert_eq!(world.obstacles[0].pos.z, 10.0);
        assert!(world.coins.is_empty());
        assert_eq!(world.falling_bombs.len(), 1);
    }

    #[test]
    fn test_recenter_threshold() {
        let tuning = Tuning::default();
        let mut world = World::new(-20.0);
        let mut player = Player::new(6.0);

        player.pos.z = -99.9;
        assert_eq!(world.recenter_if_needed(&mut player, &tuning), None);

        player.pos.z = -100.5;
        assert_eq!(world.recenter_if_needed(&mut player, &tuning), Some(100.0));
        assert!((player.pos.z - (-0.5)).abs() < 1e-4);
        assert_eq!(world.next_spawn_z, 80.0);
    }

    fn populated_world(seed: u64, player_z: f32) -> World {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut world = World::new(player_z - 20.0);
        world.ensure_streamed_ahead(player_z, &tuning, &mut rng);
        world.falling_bombs.push(Hazard::falling_bomb(
            Vec3::new(0.0, 12.0, player_z - 30.0),
            0.3,
            0.5,
        ));
        if let Some(coin) = world.coins.first_mut() {
            coin.active = false;
        }
        world
    }

    proptest! {
        #[test]
        fn prop_recenter_preserves_relative_layout(seed in any::<u64>(), player_z in -400.0f32..-100.01) {
            let tuning = Tuning::default();
            let mut world = populated_world(seed, player_z);
            let mut player = Player::new(6.0);
            player.pos.z = player_z;
            let before = world.clone();

            let shift = world.recenter_if_needed(&mut player, &tuning);
            prop_assert_eq!(shift, Some(100.0));
            prop_assert!((player.pos.z - (player_z + 100.0)).abs() < 1e-3);
            prop_assert!((world.next_spawn_z - (before.next_spawn_z + 100.0)).abs() < 1e-3);

            for (a, b) in before.coins.iter().zip(&world.coins) {
                prop_assert!((b.pos.z - a.pos.z - 100.0).abs() < 1e-3);
                prop_assert_eq!(a.pos.x, b.pos.x);
                prop_assert_eq!(a.active, b.active);
                prop_assert_eq!(a.rotation, b.rotation);
            }
            for (a, b) in before.hazards().zip(world.hazards()) {
                prop_assert!((b.pos.z - a.pos.z - 100.0).abs() < 1e-3);
                prop_assert_eq!(a.radius, b.radius);
                prop_assert_eq!(a.rotation, b.rotation);
                prop_assert_eq!(a.kind, b.kind);
            }
        }

        #[test]
        fn prop_cleanup_partitions_by_cutoff(seed in any::<u64>(), player_z in -60.0f32..0.0) {
            let tuning = Tuning::default();
            // Spawn around an earlier position so part of the world is behind the player
            let mut world = populated_world(seed, player_z + 60.0);
            let before = world.clone();
            let cutoff = player_z + tuning.cleanup_behind;

            world.cleanup(player_z, &tuning);

            let kept: Vec<_> = before.coins.iter().filter(|c| c.pos.z <= cutoff).cloned().collect();
            prop_assert_eq!(&kept, &world.coins);
            let kept: Vec<_> = before.obstacles.iter().filter(|h| h.pos.z <= cutoff).cloned().collect();
            prop_assert_eq!(&kept, &world.obstacles);
            let kept: Vec<_> = before.static_bombs.iter().filter(|h| h.pos.z <= cutoff).cloned().collect();
            prop_assert_eq!(&kept, &world.static_bombs);
        }
    }
}
