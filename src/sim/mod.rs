//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Caller-supplied, clamped frame dt
//! - No rendering or platform dependencies

pub mod bombs;
pub mod collision;
pub mod player;
pub mod state;
pub mod tick;
pub mod world;

pub use collision::{Sphere, collect_coins, falling_bomb_hit, spheres_overlap, static_hazard_hit};
pub use state::{
    Coin, GameEvent, GamePhase, GameState, Hazard, HazardKind, Outcome, Player, World,
};
pub use tick::{FrameClock, InputEvent, sanitize_dt, tick};
pub use world::ChunkKind;
