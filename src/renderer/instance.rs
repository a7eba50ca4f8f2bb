//! Per-entity instance data handed to the draw layer

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use serde::{Deserialize, Serialize};

/// What an instance should be drawn as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum EntityTag {
    Player = 0,
    Coin = 1,
    Obstacle = 2,
    StaticBomb = 3,
    FallingBomb = 4,
}

impl EntityTag {
    /// Base color for the tag
    pub fn color(self) -> [f32; 4] {
        match self {
            EntityTag::Player => colors::PLAYER,
            EntityTag::Coin => colors::COIN,
            EntityTag::Obstacle => colors::BARREL,
            EntityTag::StaticBomb | EntityTag::FallingBomb => colors::BOMB,
        }
    }
}

/// One drawable entity: model matrix, color and tag
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Instance {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    pub tag: u32,
    /// Keeps the struct a multiple of 16 bytes for uniform/storage upload
    pub _pad: [u32; 3],
}

impl Instance {
    pub fn new(tag: EntityTag, model: Mat4) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: tag.color(),
            tag: tag as u32,
            _pad: [0; 3],
        }
    }

    /// Translation column of the model matrix
    pub fn position(&self) -> [f32; 3] {
        let [x, y, z, _] = self.model[3];
        [x, y, z]
    }
}

/// Colors for game elements
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.15, 0.35, 0.7, 1.0];
    pub const COIN: [f32; 4] = [1.0, 0.84, 0.0, 1.0];
    pub const BARREL: [f32; 4] = [0.55, 0.33, 0.15, 1.0];
    pub const BOMB: [f32; 4] = [0.1, 0.1, 0.1, 1.0];
}
