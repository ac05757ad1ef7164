//! Error types shared across the converter.
//!
//! Decoding and validation failures are reported through these enums so that
//! callers can tell a defective asset apart from a mesh that simply has
//! nothing to contribute (which is signalled with `Ok(None)` instead).

use std::path::PathBuf;

/// Errors raised while decoding a mesh primitive from a glTF document and its
/// binary chunk.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("accessor {0} is sparse or has no buffer view")]
    SparseAccessor(usize),
    #[error("accessor {accessor} reads from buffer {buffer}, which is not the binary chunk")]
    ExternalBuffer { accessor: usize, buffer: usize },
    #[error("accessor {accessor} has stride {stride}, shorter than its {element} byte elements")]
    InvalidStride {
        accessor: usize,
        stride: usize,
        element: usize,
    },
    #[error("image {0} does not exist")]
    MissingImage(usize),
    #[error("unsupported index component type {component_type} on accessor {accessor}")]
    UnsupportedComponentType { accessor: usize, component_type: u32 },
    #[error("accessor {accessor} has an unsupported format for {attribute}")]
    UnsupportedAttribute {
        accessor: usize,
        attribute: &'static str,
    },
    #[error(
        "accessor {accessor} reads {needed} bytes starting at {offset}, but only {available} bytes are available"
    )]
    OutOfBounds {
        accessor: usize,
        offset: usize,
        needed: usize,
        available: usize,
    },
    #[error("vertex index {index} is out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: usize, vertex_count: usize },
}

/// Violations of the scene graph's index invariants, found by
/// [`SceneBuilder::validate`](crate::data_structures::builder::SceneBuilder::validate).
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("surface {surface} of {object:?} references material {index}, but only {materials} exist")]
    MaterialOutOfRange {
        object: String,
        surface: usize,
        index: usize,
        materials: usize,
    },
    #[error("surface {surface} of {object:?} references vertex {index}, but only {vertices} exist")]
    VertexOutOfRange {
        object: String,
        surface: usize,
        index: usize,
        vertices: usize,
    },
}

/// Errors raised while reading a binary glTF container.
#[derive(Debug, thiserror::Error)]
pub enum GlbError {
    #[error(transparent)]
    Container(#[from] gltf::Error),
    #[error("invalid glTF JSON chunk: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while reading a BGL scenery package.
#[derive(Debug, thiserror::Error)]
pub enum BglError {
    #[error("file is too small to be a BGL package: {0} bytes")]
    TooSmall(usize),
    #[error("invalid BGL header magic")]
    InvalidHeader,
}

/// Errors raised while writing an AC3D model and its textures.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to copy texture {path:?}: {source}")]
    TextureCopy {
        path: PathBuf,
        #[source]
        source: fs_extra::error::Error,
    },
    #[error(transparent)]
    InvalidScene(#[from] SceneError),
}
