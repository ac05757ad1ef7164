//! Vendor glTF extensions written by flight-simulator scenery exporters.
//!
//! The `gltf` crate keeps extensions it does not know as raw JSON, reachable
//! through `extension_value`/`extensions` on materials and textures.

use serde_json::Value;

/// Material extension marking geometry that is never drawn.
pub const EXT_MATERIAL_INVISIBLE: &str = "ASOBO_material_invisible";
/// Material extension marking geometry that only occludes the environment.
pub const EXT_MATERIAL_ENVIRONMENT_OCCLUDER: &str = "ASOBO_material_environment_occluder";
/// Texture extension whose `source` points at the DDS image of a texture.
pub const EXT_TEXTURE_DDS: &str = "MSFT_texture_dds";

/// Whether `material` marks geometry that contributes nothing visible.
pub fn is_hidden(material: &gltf::Material<'_>) -> bool {
    material.extension_value(EXT_MATERIAL_INVISIBLE).is_some()
        || material
            .extension_value(EXT_MATERIAL_ENVIRONMENT_OCCLUDER)
            .is_some()
}

/// The image `texture` samples.
///
/// A `source` given by a vendor extension wins over the core one: exporters
/// that write DDS images point the extension at the DDS file and the core
/// field at a fallback (or nothing).
pub fn image_index(texture: &gltf::Texture<'_>) -> Option<usize> {
    let from_extension = |value: &Value| {
        value
            .get("source")
            .and_then(Value::as_u64)
            .map(|s| s as usize)
    };
    texture
        .extension_value(EXT_TEXTURE_DDS)
        .and_then(from_extension)
        .or_else(|| {
            texture
                .extensions()
                .and_then(|extensions| extensions.values().find_map(from_extension))
        })
        .or_else(|| texture.source().map(|image| image.index()))
}

/// Last path segment of an image URI, accepting both separators.
pub fn uri_file_name(uri: &str) -> Option<&str> {
    uri.rsplit(['/', '\\']).next().filter(|name| !name.is_empty())
}
