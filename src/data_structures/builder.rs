//! The root container of an AC3D scene and the operations that compose scenes.

use std::{collections::BTreeSet, path::PathBuf};

use cgmath::Matrix4;

use crate::{
    data_structures::{
        material::Material,
        scene_graph::{Object, ObjectKind, Placement},
        transform::{Decomposed, is_identity},
    },
    error::SceneError,
};

/// Materials, top-level objects and the texture files the objects use.
///
/// Surfaces refer to materials by their index in [`materials`](Self::materials),
/// which is why materials are only ever appended.
#[derive(Clone, Debug, Default)]
pub struct SceneBuilder {
    pub materials: Vec<Material>,
    pub objects: Vec<Object>,
    /// Source paths of every texture referenced by a poly in this scene.
    pub textures: BTreeSet<PathBuf>,
}

impl SceneBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Append a top-level object and return a reference to it.
    pub fn add_object(&mut self, object: Object) -> &mut Object {
        self.objects.push(object);
        let idx = self.objects.len() - 1;
        &mut self.objects[idx]
    }

    pub fn add_world(&mut self, name: impl Into<String>) -> &mut Object {
        self.add_object(Object::world(name))
    }

    pub fn add_group(&mut self, name: impl Into<String>) -> &mut Object {
        self.add_object(Object::group(name))
    }

    pub fn add_poly(&mut self, name: impl Into<String>) -> &mut Object {
        self.add_object(Object::poly(name))
    }

    pub fn add_texture(&mut self, path: impl Into<PathBuf>) {
        self.textures.insert(path.into());
    }

    /**
     * Appends a copy of everything in `other` to this scene.
     *
     * Without a transform (or with the identity) the top-level objects of
     * `other` become top-level objects here. Otherwise they are placed under a
     * new group named `name` that carries the transform's rotation and
     * translation; its scale, having no place in an AC3D group, is multiplied
     * into the copied vertex positions.
     */
    pub fn merge(&mut self, other: &SceneBuilder, transform: Option<Matrix4<f32>>, name: Option<&str>) {
        let material_offset = self.materials.len();

        match transform.filter(|t| !is_identity(t)) {
            None => {
                for object in &other.objects {
                    self.objects.push(object.clone_rebased(material_offset, None));
                }
            }
            Some(transform) => {
                let decomposed = Decomposed::from_matrix(transform);
                let vertex_scale = decomposed.vertex_scale();
                let mut wrapper = Object::new(
                    name.unwrap_or_default(),
                    ObjectKind::Group(Placement {
                        rotation: Some(decomposed.rotation_matrix()),
                        location: Some(decomposed.translation),
                    }),
                );
                for object in &other.objects {
                    wrapper.add_child(object.clone_rebased(material_offset, vertex_scale));
                }
                self.objects.push(wrapper);
            }
        }

        self.materials.extend(other.materials.iter().cloned());
        self.textures.extend(other.textures.iter().cloned());
        log::debug!(
            "merged {} objects and {} materials (material offset {})",
            other.objects.len(),
            other.materials.len(),
            material_offset
        );
    }

    /// Check that every surface references an existing material and only
    /// vertices of its own poly.
    pub fn validate(&self) -> Result<(), SceneError> {
        self.objects
            .iter()
            .try_for_each(|object| validate_object(object, self.materials.len()))
    }

    /// Number of objects in the whole tree.
    pub fn object_count(&self) -> usize {
        fn count(object: &Object) -> usize {
            1 + object.children.iter().map(count).sum::<usize>()
        }
        self.objects.iter().map(count).sum()
    }
}

fn validate_object(object: &Object, materials: usize) -> Result<(), SceneError> {
    if let ObjectKind::Poly(poly) = &object.kind {
        for (surface_idx, surface) in poly.surfaces.iter().enumerate() {
            if let Some(index) = surface.material {
                if index >= materials {
                    return Err(SceneError::MaterialOutOfRange {
                        object: object.name.clone(),
                        surface: surface_idx,
                        index,
                        materials,
                    });
                }
            }
            if let Some(r) = surface.refs.iter().find(|r| r.vertex >= poly.vertices.len()) {
                return Err(SceneError::VertexOutOfRange {
                    object: object.name.clone(),
                    surface: surface_idx,
                    index: r.vertex,
                    vertices: poly.vertices.len(),
                });
            }
        }
    }
    object
        .children
        .iter()
        .try_for_each(|child| validate_object(child, materials))
}
