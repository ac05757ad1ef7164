//! Affine transform decomposition for placing merged scenes.
//!
//! AC3D groups carry a rotation matrix and a location but no scale, so a
//! transform is split into its translation, rotation and scale parts and the
//! scale is applied to vertices instead.

use cgmath::{Matrix3, Matrix4, Quaternion, SquareMatrix, Vector3};

const UNIT_SCALE_TOLERANCE: f32 = 1e-6;

/// Translation, rotation (as quaternion) and scale of an affine transform.
#[derive(Clone, Debug, PartialEq)]
pub struct Decomposed {
    pub translation: Vector3<f32>,
    pub rotation: Quaternion<f32>,
    pub scale: Vector3<f32>,
}

impl Decomposed {
    /// Split a column-major affine matrix into translation, rotation and scale.
    pub fn from_matrix(matrix: Matrix4<f32>) -> Self {
        let (translation, rotation, scale) =
            gltf::scene::Transform::Matrix { matrix: matrix.into() }.decomposed();
        Self {
            translation: translation.into(),
            rotation: rotation.into(),
            scale: scale.into(),
        }
    }

    pub fn rotation_matrix(&self) -> Matrix3<f32> {
        Matrix3::from(self.rotation)
    }

    /**
     * The scale to bake into vertex positions, if any.
     *
     * Returns `None` for a unit scale (up to rounding left by the
     * decomposition of a pure rotation) and for a scale with a non-finite
     * component, which only a degenerate transform produces.
     */
    pub fn vertex_scale(&self) -> Option<Vector3<f32>> {
        let s = self.scale;
        if !(s.x.is_finite() && s.y.is_finite() && s.z.is_finite()) {
            log::warn!(
                "transform decomposed into non-finite scale ({}, {}, {}); scale is ignored",
                s.x,
                s.y,
                s.z
            );
            return None;
        }
        let unit = |c: f32| (c - 1.0).abs() <= UNIT_SCALE_TOLERANCE;
        if unit(s.x) && unit(s.y) && unit(s.z) {
            None
        } else {
            Some(s)
        }
    }
}

pub fn is_identity(matrix: &Matrix4<f32>) -> bool {
    *matrix == Matrix4::identity()
}
