use std::path::PathBuf;

use cgmath::{Vector2, Vector3};
use gltf::{
    accessor::{DataType, Dimensions},
    mesh::Semantic,
};

use crate::{
    data_structures::{
        material::{Material, dedup_material},
        scene_graph::{Object, ObjectKind, Poly, SURFACE_SHADED},
    },
    error::DecodeError,
    resources::{
        accessor::{check_extent, check_format, check_indices},
        extensions::{image_index, is_hidden, uri_file_name},
        texture::TextureResolver,
    },
};

/// Everything about the asset a mesh is extracted from.
#[derive(Clone, Copy, Debug)]
pub struct ExtractContext<'a> {
    pub document: &'a gltf::Document,
    pub bin: &'a [u8],
    /// Where texture files are looked up; without one, polys stay untextured.
    pub textures: Option<&'a TextureResolver>,
    /// Path the texture resolver prefers candidates close to.
    pub reference: &'a str,
}

/// A poly object produced from one mesh, plus the source path of its texture.
#[derive(Clone, Debug)]
pub struct ExtractedPoly {
    pub object: Object,
    pub texture_path: Option<PathBuf>,
}

/**
 * Converts the first primitive of `mesh` into a poly object.
 *
 * The primitive is triangulated into one shaded surface per triangle. Corners
 * are written in reverse order and texture coordinates are flipped vertically,
 * which turns glTF's counter-clockwise, top-left-origin convention into the
 * one AC3D uses.
 *
 * `materials` is the deduplication table of the conversion session: the
 * primitive's material is looked up there and only appended if no equal
 * material exists yet.
 *
 * Returns `Ok(None)` for primitives that contribute no visible geometry: those
 * with a hidden material or without positions.
 */
pub fn extract_poly(
    mesh: &gltf::Mesh<'_>,
    ctx: &ExtractContext<'_>,
    materials: &mut Vec<Material>,
) -> Result<Option<ExtractedPoly>, DecodeError> {
    let name = mesh.name().unwrap_or_default();
    let Some(primitive) = mesh.primitives().next() else {
        log::debug!("mesh {name:?} has no primitives");
        return Ok(None);
    };

    let gltf_material = primitive.material();
    let gltf_material = gltf_material.index().map(|_| gltf_material);
    if gltf_material.as_ref().is_some_and(is_hidden) {
        log::debug!("mesh {name:?} uses an invisible material");
        return Ok(None);
    }

    let Some(position_accessor) = primitive.get(&Semantic::Positions) else {
        log::debug!("mesh {name:?} has no positions");
        return Ok(None);
    };
    check_format(&position_accessor, "POSITION", &[DataType::F32], Dimensions::Vec3)?;
    check_extent(&position_accessor, ctx.bin.len())?;

    let tex_accessor = primitive.get(&Semantic::TexCoords(0));
    if let Some(accessor) = &tex_accessor {
        check_format(
            accessor,
            "TEXCOORD_0",
            &[DataType::U8, DataType::U16, DataType::F32],
            Dimensions::Vec2,
        )?;
        check_extent(accessor, ctx.bin.len())?;
    }
    let index_accessor = primitive.indices();
    if let Some(accessor) = &index_accessor {
        check_indices(accessor)?;
        check_extent(accessor, ctx.bin.len())?;
    }

    // the reader cannot fail once the extents are checked, except for empty accessors
    let unreadable = |accessor: &gltf::Accessor<'_>| DecodeError::OutOfBounds {
        accessor: accessor.index(),
        offset: accessor.offset(),
        needed: accessor.count().saturating_mul(accessor.size()),
        available: ctx.bin.len(),
    };
    let bin = ctx.bin;
    let reader = primitive.reader(|buffer| (buffer.index() == 0).then_some(bin));

    let positions: Vec<Vector3<f32>> = if position_accessor.count() == 0 {
        Vec::new()
    } else {
        reader
            .read_positions()
            .ok_or_else(|| unreadable(&position_accessor))?
            .map(Vector3::from)
            .collect()
    };
    let tex_coords: Vec<Vector2<f32>> = match &tex_accessor {
        Some(accessor) if accessor.count() > 0 => reader
            .read_tex_coords(0)
            .ok_or_else(|| unreadable(accessor))?
            .into_f32()
            .map(Vector2::from)
            .collect(),
        _ => Vec::new(),
    };
    let indices: Vec<usize> = match &index_accessor {
        Some(accessor) if accessor.count() > 0 => reader
            .read_indices()
            .ok_or_else(|| unreadable(accessor))?
            .into_u32()
            .map(|i| i as usize)
            .collect(),
        Some(_) => Vec::new(),
        None => (0..positions.len()).collect(),
    };

    let mut texture_path = None;
    let material_idx = match &gltf_material {
        Some(gltf_material) => {
            let (material, texture) = convert_material(gltf_material, ctx)?;
            texture_path = texture;
            Some(dedup_material(materials, material))
        }
        None => None,
    };

    let mut poly = Poly::default();
    poly.texture = texture_path
        .as_ref()
        .and_then(|path| path.file_name())
        .map(|file_name| file_name.to_string_lossy().into_owned());
    for position in positions {
        poly.add_vertex(position);
    }

    let vertex_count = poly.vertices.len();
    for triangle in indices.chunks_exact(3) {
        let surface = poly.add_surface(SURFACE_SHADED);
        surface.material = material_idx;
        for &index in triangle.iter().rev() {
            if index >= vertex_count {
                return Err(DecodeError::IndexOutOfRange {
                    index,
                    vertex_count,
                });
            }
            let uv = match tex_coords.get(index) {
                Some(uv) => Vector2::new(uv.x, 1.0 - uv.y),
                None => Vector2::new(0.0, 0.0),
            };
            surface.add_ref(index, uv.x, uv.y);
        }
    }
    log::debug!(
        "extracted mesh {name:?}: {} vertices, {} surfaces",
        vertex_count,
        poly.surfaces.len()
    );

    Ok(Some(ExtractedPoly {
        object: Object::new(name, ObjectKind::Poly(poly)),
        texture_path,
    }))
}

/// Build the AC3D material for a glTF material and resolve its base colour
/// texture to a file, if it has one that can be found.
fn convert_material(
    material: &gltf::Material<'_>,
    ctx: &ExtractContext<'_>,
) -> Result<(Material, Option<PathBuf>), DecodeError> {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, _] = pbr.base_color_factor();
    let converted = Material::new(material.name().unwrap_or_default(), Vector3::new(r, g, b));

    let Some(info) = pbr.base_color_texture() else {
        return Ok((converted, None));
    };
    let texture = info.texture();
    let Some(image_idx) = image_index(&texture) else {
        log::warn!("texture {} has no image source", texture.index());
        return Ok((converted, None));
    };
    // extension sources are not covered by validation
    let image = ctx
        .document
        .as_json()
        .images
        .get(image_idx)
        .ok_or(DecodeError::MissingImage(image_idx))?;
    let Some(file_name) = image.uri.as_deref().and_then(uri_file_name) else {
        log::warn!("image {image_idx} has no URI");
        return Ok((converted, None));
    };

    let resolved = ctx
        .textures
        .and_then(|resolver| resolver.resolve(file_name, ctx.reference));
    if resolved.is_none() {
        log::warn!("texture {file_name:?} could not be found; surfaces stay untextured");
    }
    Ok((converted, resolved))
}
