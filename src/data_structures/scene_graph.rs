//! Scene graph and hierarchical scene organization.
//!
//! An AC3D scene is a tree of [`Object`]s. Every object carries a name, an
//! optional URL and its children; what kind of object it is lives in
//! [`ObjectKind`], a closed set of variants matched exhaustively wherever the
//! tree is walked (cloning, validation, serialization).

use cgmath::{Matrix3, Vector2, Vector3};

/// Flags of a shaded polygon surface. Default for new surfaces.
pub const SURFACE_SHADED: u32 = 0x20;

/// Optional placement of a group or poly relative to its parent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Placement {
    pub rotation: Option<Matrix3<f32>>,
    pub location: Option<Vector3<f32>>,
}

/// One corner of a surface: a vertex of the owning poly plus its texture
/// coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceRef {
    pub vertex: usize,
    pub uv: Vector2<f32>,
}

/// A polygon of a poly, referencing its vertices by index.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    pub flags: u32,
    /// Index into the owning [`SceneBuilder`](super::builder::SceneBuilder)'s materials.
    pub material: Option<usize>,
    pub refs: Vec<SurfaceRef>,
}

impl Surface {
    pub fn new(flags: u32) -> Self {
        Self {
            flags,
            material: None,
            refs: Vec::new(),
        }
    }

    pub fn add_ref(&mut self, vertex: usize, u: f32, v: f32) {
        self.refs.push(SurfaceRef {
            vertex,
            uv: Vector2::new(u, v),
        });
    }
}

impl Default for Surface {
    fn default() -> Self {
        Self::new(SURFACE_SHADED)
    }
}

/// Geometry payload of a poly object.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Poly {
    pub placement: Placement,
    /// Texture file name, relative to the directory the model is written to.
    pub texture: Option<String>,
    pub texrep: Option<Vector2<f32>>,
    pub vertices: Vec<Vector3<f32>>,
    pub surfaces: Vec<Surface>,
}

impl Poly {
    pub fn add_vertex(&mut self, vertex: Vector3<f32>) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn add_surface(&mut self, flags: u32) -> &mut Surface {
        self.surfaces.push(Surface::new(flags));
        let idx = self.surfaces.len() - 1;
        &mut self.surfaces[idx]
    }

    /// Add a shaded polygon surface.
    pub fn add_default_surface(&mut self) -> &mut Surface {
        self.add_surface(SURFACE_SHADED)
    }
}

/// The closed set of AC3D object types.
#[derive(Clone, Debug, PartialEq)]
pub enum ObjectKind {
    World,
    Group(Placement),
    Poly(Poly),
}

impl ObjectKind {
    /// Type tag as written after `OBJECT`.
    pub fn tag(&self) -> &'static str {
        match self {
            ObjectKind::World => "world",
            ObjectKind::Group(_) => "group",
            ObjectKind::Poly(_) => "poly",
        }
    }
}

/// A node of the scene graph. Children are owned exclusively by their parent.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub name: String,
    pub url: Option<String>,
    pub kind: ObjectKind,
    pub children: Vec<Object>,
}

impl Object {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            url: None,
            kind,
            children: Vec::new(),
        }
    }

    pub fn world(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::World)
    }

    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Group(Placement::default()))
    }

    pub fn poly(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Poly(Poly::default()))
    }

    /// Append `child` and return a reference to it in its new place.
    pub fn add_child(&mut self, child: Object) -> &mut Object {
        self.children.push(child);
        let idx = self.children.len() - 1;
        &mut self.children[idx]
    }

    pub fn as_poly(&self) -> Option<&Poly> {
        match &self.kind {
            ObjectKind::Poly(poly) => Some(poly),
            _ => None,
        }
    }

    pub fn as_poly_mut(&mut self) -> Option<&mut Poly> {
        match &mut self.kind {
            ObjectKind::Poly(poly) => Some(poly),
            _ => None,
        }
    }

    /// Placement of a group or poly; worlds have none.
    pub fn placement(&self) -> Option<&Placement> {
        match &self.kind {
            ObjectKind::World => None,
            ObjectKind::Group(placement) => Some(placement),
            ObjectKind::Poly(poly) => Some(&poly.placement),
        }
    }

    /**
     * Deep-copies this subtree for insertion into another scene.
     *
     * Every surface's material index is shifted by `material_offset` so it keeps
     * pointing at the same material once the source scene's materials are
     * appended behind the destination's. If `vertex_scale` is given, every vertex
     * position is multiplied by it component-wise; placements, names and texture
     * settings are copied as they are.
     */
    pub fn clone_rebased(&self, material_offset: usize, vertex_scale: Option<Vector3<f32>>) -> Object {
        let kind = match &self.kind {
            ObjectKind::World => ObjectKind::World,
            ObjectKind::Group(placement) => ObjectKind::Group(placement.clone()),
            ObjectKind::Poly(poly) => ObjectKind::Poly(Poly {
                placement: poly.placement.clone(),
                texture: poly.texture.clone(),
                texrep: poly.texrep,
                vertices: poly
                    .vertices
                    .iter()
                    .map(|v| match vertex_scale {
                        Some(s) => Vector3::new(v.x * s.x, v.y * s.y, v.z * s.z),
                        None => *v,
                    })
                    .collect(),
                surfaces: poly
                    .surfaces
                    .iter()
                    .map(|surface| Surface {
                        flags: surface.flags,
                        material: surface.material.map(|m| m + material_offset),
                        refs: surface.refs.clone(),
                    })
                    .collect(),
            }),
        };
        Object {
            name: self.name.clone(),
            url: self.url.clone(),
            kind,
            children: self
                .children
                .iter()
                .map(|child| child.clone_rebased(material_offset, vertex_scale))
                .collect(),
        }
    }
}
