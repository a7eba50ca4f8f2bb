//! Render dispatch boundary
//!
//! The simulation never touches the GPU. Each frame it produces a
//! [`RenderFrame`]: camera matrices plus one [`Instance`] per live entity.
//! A [`RenderDispatcher`] turns that into draw calls.

pub mod instance;
pub mod lighting;

pub use instance::{EntityTag, Instance, colors};
pub use lighting::LightingUniform;

use crate::camera::{model_matrix, projection_matrix};
use crate::sim::{GameState, HazardKind};

/// Read-only snapshot of everything drawable this frame
#[derive(Debug, Clone)]
pub struct RenderFrame {
    pub view: [[f32; 4]; 4],
    pub projection: [[f32; 4]; 4],
    pub lighting: LightingUniform,
    pub instances: Vec<Instance>,
}

impl RenderFrame {
    /// Snapshot the state. Collected coins are left out.
    pub fn capture(state: &GameState, aspect: f32) -> Self {
        let view = state.camera.view_matrix(state.player.pos);
        let world = &state.world;

        let mut instances = Vec::with_capacity(1 + world.entity_count());
        instances.push(Instance::new(EntityTag::Player, model_matrix(state.player.pos, 0.0)));

        instances.extend(
            world
                .coins
                .iter()
                .filter(|c| c.active)
                .map(|c| Instance::new(EntityTag::Coin, model_matrix(c.pos, c.rotation))),
        );
        instances.extend(world.hazards().map(|h| {
            let tag = match h.kind {
                HazardKind::Obstacle => EntityTag::Obstacle,
                HazardKind::StaticBomb => EntityTag::StaticBomb,
                HazardKind::FallingBomb { .. } => EntityTag::FallingBomb,
            };
            Instance::new(tag, model_matrix(h.pos, h.rotation))
        }));

        Self {
            view: view.to_cols_array_2d(),
            projection: projection_matrix(aspect).to_cols_array_2d(),
            lighting: LightingUniform::from_model_view(view),
            instances,
        }
    }

    /// Instances as raw bytes for a GPU buffer
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }

    pub fn count(&self, tag: EntityTag) -> usize {
        self.instances.iter().filter(|i| i.tag == tag as u32).count()
    }
}

/// Consumer of per-frame snapshots (owns all GPU-resident state)
pub trait RenderDispatcher {
    fn dispatch(&mut self, frame: &RenderFrame);
}

/// Dispatcher that draws nothing (headless runs)
#[derive(Debug, Default)]
pub struct NullDispatcher {
    pub frames: u64,
}

impl RenderDispatcher for NullDispatcher {
    fn dispatch(&mut self, _frame: &RenderFrame) {
        self.frames += 1;
    }
}
