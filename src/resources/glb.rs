//! Binary glTF containers.

use std::borrow::Cow;

use gltf::json::{self, Path, validation};
use serde_json::Value;

use crate::error::GlbError;

/// A parsed GLB: the document and the raw binary chunk its buffer views
/// point into.
#[derive(Clone, Debug)]
pub struct GlbAsset {
    pub document: gltf::Document,
    pub bin: Vec<u8>,
    json: Vec<u8>,
}

impl GlbAsset {
    /**
     * Parse a GLB container.
     *
     * Scenery exporters are known to leave stray control bytes in the JSON
     * chunk, so every byte outside printable ASCII is replaced with a space
     * before the JSON is parsed. A missing binary chunk yields an empty buffer.
     *
     * The document is validated, but omissions and required extensions the
     * `gltf` crate does not know are tolerated: scenery assets list their
     * vendor extensions as required and often skip optional-in-practice data
     * such as position bounds.
     */
    pub fn from_slice(bytes: &[u8]) -> Result<Self, GlbError> {
        let glb = gltf::Glb::from_slice(bytes)?;
        let json = sanitize_json(&glb.json);
        let root: json::Root = serde_json::from_slice(&json)?;
        validate(&root)?;
        let bin = glb.bin.map(Cow::into_owned).unwrap_or_default();
        Ok(Self {
            document: gltf::Document::from_json_without_validation(root),
            bin,
            json,
        })
    }

    /// The sanitized JSON chunk as an untyped value.
    pub fn json_value(&self) -> Result<Value, GlbError> {
        Ok(serde_json::from_slice(&self.json)?)
    }
}

pub fn sanitize_json(json: &[u8]) -> Vec<u8> {
    json.iter()
        .map(|&b| if (0x20..=0x7e).contains(&b) { b } else { b' ' })
        .collect()
}

/// Reject documents with dangling indices, invalid enum values or oversized
/// offsets.
fn validate(root: &json::Root) -> Result<(), gltf::Error> {
    use validation::Validate;

    // the validator itself indexes accessors through POSITION attributes
    let mut errors = dangling_attributes(root);
    if errors.is_empty() {
        root.validate(root, Path::new, &mut |path, error| match error {
            validation::Error::Missing | validation::Error::Unsupported => {
                log::debug!("tolerating glTF validation error at {}: {error}", path());
            }
            _ => errors.push((path(), error)),
        });
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(gltf::Error::Validation(errors))
    }
}

fn dangling_attributes(root: &json::Root) -> Vec<(Path, validation::Error)> {
    let mut errors = Vec::new();
    for (m, mesh) in root.meshes.iter().enumerate() {
        for (p, primitive) in mesh.primitives.iter().enumerate() {
            for (semantic, accessor) in &primitive.attributes {
                if accessor.value() >= root.accessors.len() {
                    let path = Path::new()
                        .field("meshes")
                        .index(m)
                        .field("primitives")
                        .index(p)
                        .field("attributes")
                        .key(&semantic.to_string());
                    errors.push((path, validation::Error::IndexOutOfBounds));
                }
            }
        }
    }
    errors
}
