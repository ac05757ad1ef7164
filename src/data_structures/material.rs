//! AC3D materials and the deduplication used while extracting meshes.

use cgmath::Vector3;

/// Transparency values closer than this are considered equal.
pub const TRANSPARENCY_EPSILON: f32 = 0.001;

/// A flat-shaded AC3D material.
///
/// Materials are plain values. Two materials are equal when their names,
/// colours and shininess match exactly and their transparencies differ by less
/// than [`TRANSPARENCY_EPSILON`].
#[derive(Clone, Debug)]
pub struct Material {
    pub name: String,
    pub rgb: Vector3<f32>,
    pub ambient: Vector3<f32>,
    pub emissive: Vector3<f32>,
    pub specular: Vector3<f32>,
    pub shininess: i32,
    pub transparency: f32,
}

impl Material {
    /// Create a material with the given name and base colour. The remaining
    /// channels use the defaults AC3D tools apply to new materials.
    pub fn new(name: impl Into<String>, rgb: Vector3<f32>) -> Self {
        Self {
            name: name.into(),
            rgb,
            ambient: Vector3::new(0.2, 0.2, 0.2),
            emissive: Vector3::new(0.0, 0.0, 0.0),
            specular: Vector3::new(0.5, 0.5, 0.5),
            shininess: 10,
            transparency: 0.0,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new("", Vector3::new(1.0, 1.0, 1.0))
    }
}

impl PartialEq for Material {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.rgb == other.rgb
            && self.ambient == other.ambient
            && self.emissive == other.emissive
            && self.specular == other.specular
            && self.shininess == other.shininess
            && (self.transparency - other.transparency).abs() < TRANSPARENCY_EPSILON
    }
}

/// Return the index of a material equal to `material` in `materials`,
/// appending it first if there is none.
///
/// The table is owned by the caller and is expected to live for a whole
/// conversion session, so that meshes sharing a material end up sharing a
/// single entry.
pub fn dedup_material(materials: &mut Vec<Material>, material: Material) -> usize {
    match materials.iter().position(|m| *m == material) {
        Some(idx) => idx,
        None => {
            materials.push(material);
            materials.len() - 1
        }
    }
}
