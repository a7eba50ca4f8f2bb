//! Camera placement and projection
//!
//! Two views follow the player: a chase camera above and behind, and a
//! first-person camera at head height.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Vertical field of view (radians)
pub const FOV_Y: f32 = std::f32::consts::FRAC_PI_3;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 2000.0;

/// Which view follows the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    ThirdPerson,
    FirstPerson,
}

impl CameraMode {
    pub fn toggled(self) -> Self {
        match self {
            CameraMode::ThirdPerson => CameraMode::FirstPerson,
            CameraMode::FirstPerson => CameraMode::ThirdPerson,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CameraMode::ThirdPerson => "Third person",
            CameraMode::FirstPerson => "First person",
        }
    }

    /// Eye and look-at target for a player at `player`
    pub fn eye_target(self, player: Vec3) -> (Vec3, Vec3) {
        match self {
            CameraMode::ThirdPerson => (
                Vec3::new(player.x * 0.3, 4.0, player.z + 6.5),
                Vec3::new(player.x, 0.8, player.z - 4.0),
            ),
            CameraMode::FirstPerson => {
                let eye = Vec3::new(player.x, player.y + 1.3, player.z);
                (eye, eye - Vec3::Z * 10.0)
            }
        }
    }

    /// World-to-view matrix
    pub fn view_matrix(self, player: Vec3) -> Mat4 {
        let (eye, target) = self.eye_target(player);
        Mat4::look_at_rh(eye, target, Vec3::Y)
    }
}

/// Perspective projection for the given aspect ratio (GL depth range)
pub fn projection_matrix(aspect: f32) -> Mat4 {
    let aspect = if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 };
    Mat4::perspective_rh_gl(FOV_Y, aspect, Z_NEAR, Z_FAR)
}

/// Model matrix for an entity at `pos` spun `rotation` radians about Y
#[inline]
pub fn model_matrix(pos: Vec3, rotation: f32) -> Mat4 {
    Mat4::from_translation(pos) * Mat4::from_rotation_y(rotation)
}
