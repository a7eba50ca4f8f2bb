//! Lighting uniforms for the lit coin shader

use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Mat4, Vec3};

pub const LIGHT_POSITION: Vec3 = Vec3::new(5.0, 5.0, 5.0);
pub const AMBIENT_COLOR: Vec3 = Vec3::new(0.2, 0.2, 0.2);
pub const LIGHT_COLOR: Vec3 = Vec3::new(1.0, 1.0, 1.0);

/// std140 layout: each mat3 column and vec3 is padded to 16 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct LightingUniform {
    pub normal_matrix: [[f32; 4]; 3],
    pub light_position: [f32; 4],
    pub ambient_color: [f32; 4],
    pub light_color: [f32; 4],
}

fn pad(v: Vec3) -> [f32; 4] {
    [v.x, v.y, v.z, 0.0]
}

impl LightingUniform {
    /// Build from a model-view matrix. The normal matrix is its upper-left
    /// 3x3, which is exact for the rigid transforms used in the game.
    pub fn from_model_view(model_view: Mat4) -> Self {
        let normal = Mat3::from_mat4(model_view);
        Self {
            normal_matrix: [pad(normal.x_axis), pad(normal.y_axis), pad(normal.z_axis)],
            light_position: pad(LIGHT_POSITION),
            ambient_color: pad(AMBIENT_COLOR),
            light_color: pad(LIGHT_COLOR),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_model_view() {
        let u = LightingUniform::from_model_view(Mat4::IDENTITY);
        assert_eq!(u.normal_matrix[0], [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(u.normal_matrix[2], [0.0, 0.0, 1.0, 0.0]);
        assert_eq!(u.light_position, [5.0, 5.0, 5.0, 0.0]);
    }

    #[test]
    fn test_translation_is_dropped() {
        let m = Mat4::from_translation(Vec3::new(3.0, 4.0, 5.0));
        assert_eq!(
            LightingUniform::from_model_view(m),
            LightingUniform::from_model_view(Mat4::IDENTITY)
        );
    }
}
