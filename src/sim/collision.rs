//! Sphere-vs-sphere contact tests between the player and world entities
//!
//! Every entity is treated as a sphere. Coins use a fixed pickup distance;
//! hazards use the sum of the two radii and end the run on contact.

use glam::Vec3;

use super::state::{Coin, Hazard, HazardKind, Player, World};
use crate::consts::COIN_PICKUP_DISTANCE;

/// Anything with a collision sphere
pub trait Sphere {
    fn center(&self) -> Vec3;
    fn radius(&self) -> f32;
}

impl Sphere for Player {
    fn center(&self) -> Vec3 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl Sphere for Hazard {
    fn center(&self) -> Vec3 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

/// True when the spheres overlap (touching does not count)
#[inline]
pub fn spheres_overlap(a: &impl Sphere, b: &impl Sphere) -> bool {
    a.center().distance(b.center()) < a.radius() + b.radius()
}

/// True when the player is close enough to pick the coin up
#[inline]
pub fn coin_in_reach(player: &Player, coin: &Coin) -> bool {
    player.pos.distance(coin.pos) < COIN_PICKUP_DISTANCE
}

/// Collect every active coin in reach. Returns how many were picked up.
///
/// Collected coins are only deactivated; removal is left to cleanup.
pub fn collect_coins(player: &mut Player, coins: &mut [Coin]) -> u32 {
    let mut collected = 0;
    for coin in coins.iter_mut() {
        if !coin.active {
            continue;
        }
        if coin_in_reach(player, coin) {
            coin.active = false;
            player.coins_collected += 1;
            collected += 1;
        }
    }
    collected
}

/// First hazard the player is touching, if any
pub fn first_hazard_hit<'a>(
    player: &Player,
    hazards: impl IntoIterator<Item = &'a Hazard>,
) -> Option<&'a Hazard> {
    hazards.into_iter().find(|h| spheres_overlap(player, *h))
}

/// First static hazard (barrel or lane bomb) the player is touching
pub fn static_hazard_hit(player: &Player, world: &World) -> Option<HazardKind> {
    first_hazard_hit(player, world.obstacles.iter().chain(world.static_bombs.iter())).map(|h| h.kind)
}

/// First falling bomb the player is touching
pub fn falling_bomb_hit(player: &Player, world: &World) -> Option<HazardKind> {
    first_hazard_hit(player, world.falling_bombs.iter()).map(|h| h.kind)
}
