//! scone
//!
//! Converts the meshes of binary glTF assets, standalone or embedded in BGL
//! scenery packages, into AC3D models for flight-simulator scenery pipelines.
//! Meshes are decoded into an in-memory scene graph that can be built by hand,
//! merged with other scenes under a transform, and written out as AC3D text
//! together with the texture files it references.
//!
//! High-level modules
//! - `data_structures`: the scene graph (materials, worlds, groups, polys, surfaces) and scene merging
//! - `resources`: loading GLB and BGL files and extracting meshes, materials and textures from them
//! - `export`: the AC3D writer and texture placement
//! - `error`: error types of decoding, validation and export
//!

pub mod data_structures;
pub mod error;
pub mod export;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use data_structures::{
    builder::SceneBuilder,
    material::Material,
    scene_graph::{Object, ObjectKind, Placement, Poly, Surface, SurfaceRef},
};
pub use export::write_ac_file;
pub use resources::{ConvertOptions, Converter};
