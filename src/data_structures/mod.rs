//! Scene data structures: materials, the object tree and the scene container.
//!
//! - `material` holds AC3D materials and their deduplication
//! - `scene_graph` holds the object tree (worlds, groups, polys) and surfaces
//! - `builder` holds [`SceneBuilder`](builder::SceneBuilder), the root container, and scene merging
//! - `transform` decomposes the affine transforms scenes are merged under

pub mod builder;
pub mod material;
pub mod scene_graph;
pub mod transform;
