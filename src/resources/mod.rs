/**
 * This module contains all logic for loading meshes, materials and textures from external files.
 */
pub mod accessor;
pub mod bgl;
pub mod extensions;
pub mod glb;
pub mod mesh;
pub mod texture;

use std::path::{Path, PathBuf};

use anyhow::Context;
use cgmath::Matrix4;

use crate::{
    data_structures::{builder::SceneBuilder, scene_graph::Object},
    resources::{
        glb::GlbAsset,
        mesh::{ExtractContext, extract_poly},
        texture::TextureResolver,
    },
};

/// Settings of a conversion run.
#[derive(Clone, Debug, Default)]
pub struct ConvertOptions {
    /// Directory searched for texture files. Textures are not resolved without one.
    pub texture_root: Option<PathBuf>,
    /// Transform every converted input is placed under in the output.
    pub transform: Option<Matrix4<f32>>,
    /// Descend into subdirectories when an input is a directory.
    pub recursive: bool,
}

/**
 * A conversion session: turns the meshes of one or more GLB assets into a single scene.
 *
 * The session owns the material table all extractions deduplicate against, so
 * meshes of one input file sharing a material (for example across the GLBs of
 * one BGL) share one AC3D material. Every input file gets its own session.
 */
pub struct Converter<'a> {
    builder: SceneBuilder,
    textures: Option<&'a TextureResolver>,
    reference: String,
}

impl<'a> Converter<'a> {
    pub fn new(textures: Option<&'a TextureResolver>, reference: impl Into<String>) -> Self {
        Self {
            builder: SceneBuilder::new(),
            textures,
            reference: reference.into(),
        }
    }

    /// Convert every mesh of `asset` into a poly under a new world named `name`.
    ///
    /// Returns the number of polys produced.
    pub fn convert_asset(&mut self, name: &str, asset: &GlbAsset) -> anyhow::Result<usize> {
        let ctx = ExtractContext {
            document: &asset.document,
            bin: &asset.bin,
            textures: self.textures,
            reference: &self.reference,
        };
        let mut world = Object::world(name);
        let meshes = asset.document.meshes().len();
        for mesh in asset.document.meshes() {
            let idx = mesh.index();
            let extracted = extract_poly(&mesh, &ctx, &mut self.builder.materials)
                .with_context(|| format!("failed to decode mesh {idx} of {name}"))?;
            match extracted {
                Some(extracted) => {
                    if let Some(path) = extracted.texture_path {
                        self.builder.add_texture(path);
                    }
                    world.add_child(extracted.object);
                }
                None => log::warn!("mesh {idx} ({:?}) of {name} produced no geometry", mesh.name()),
            }
        }
        let polys = world.children.len();
        self.builder.add_object(world);
        log::info!("{name}: converted {polys} of {meshes} meshes");
        Ok(polys)
    }

    pub fn finish(self) -> SceneBuilder {
        self.builder
    }
}

/**
 * Read every GLB of a `.glb` or `.bgl` file, labelled with a name derived from the file.
 *
 * BGL blocks are named `<stem>_<guid>_<n>`, where `n` counts the blocks of the
 * same `GLBD` chunk that parsed. Blocks that fail to parse are skipped and do
 * not take a number.
 */
pub fn load_assets(path: &Path) -> anyhow::Result<Vec<(String, GlbAsset)>> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    if bgl::is_bgl(&data) {
        let mut assets = Vec::new();
        let mut current: Option<(String, usize)> = None;
        let mut parsed = 0;
        for model in bgl::read_bgl(&data)? {
            let key = (model.guid, model.chunk);
            if current.as_ref() != Some(&key) {
                parsed = 0;
                current = Some(key.clone());
            }
            let (guid, chunk) = key;
            match GlbAsset::from_slice(&model.glb) {
                Ok(asset) => {
                    assets.push((format!("{stem}_{guid}_{parsed}"), asset));
                    parsed += 1;
                }
                Err(e) => log::warn!("skipping a GLB block in chunk {chunk} of model {guid}: {e}"),
            }
        }
        Ok(assets)
    } else {
        let asset = GlbAsset::from_slice(&data)
            .with_context(|| format!("{} is neither a BGL package nor a GLB file", path.display()))?;
        Ok(vec![(stem, asset)])
    }
}

/// Convert all GLBs in the file at `path` into one scene.
pub fn convert_path(path: &Path, textures: Option<&TextureResolver>) -> anyhow::Result<SceneBuilder> {
    let mut converter = Converter::new(textures, path.to_string_lossy());
    for (name, asset) in load_assets(path)? {
        converter.convert_asset(&name, &asset)?;
    }
    Ok(converter.finish())
}

/**
 * Convert every input and merge the results into one scene.
 *
 * Each input's scene is merged under `options.transform`; the wrapper group is
 * named after the input's file stem.
 */
pub fn convert_all(inputs: &[PathBuf], options: &ConvertOptions) -> anyhow::Result<SceneBuilder> {
    let resolver = match &options.texture_root {
        Some(root) => {
            let resolver = TextureResolver::scan(root)?;
            if resolver.is_empty() {
                log::warn!("no texture files found under {}", root.display());
            } else {
                log::info!("indexed {} texture files under {}", resolver.len(), root.display());
            }
            Some(resolver)
        }
        None => None,
    };
    let mut output = SceneBuilder::new();
    for input in inputs {
        let scene = convert_path(input, resolver.as_ref())?;
        let name = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned());
        output.merge(&scene, options.transform, name.as_deref());
    }
    Ok(output)
}

/**
 * Writes the sanitized JSON document of every GLB in `path` to `output_dir`.
 *
 * Files are named `<stem>.json` for GLB inputs and
 * `<stem>_<guid>_<n>.json` for BGL inputs, numbered as in [`load_assets`]. Returns the written paths.
 */
pub fn extract_json(path: &Path, output_dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create {}", output_dir.display()))?;
    let mut written = Vec::new();
    for (name, asset) in load_assets(path)? {
        let target = output_dir.join(format!("{name}.json"));
        let json = serde_json::to_string_pretty(&asset.json_value()?)?;
        std::fs::write(&target, json).with_context(|| format!("failed to write {}", target.display()))?;
        log::info!("extracted {}", target.display());
        written.push(target);
    }
    Ok(written)
}

/// Expand `inputs` into the `.glb` and `.bgl` files they name or contain.
pub fn collect_inputs(inputs: &[PathBuf], recursive: bool) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found: Vec<PathBuf> = if recursive {
                fs_extra::dir::get_dir_content(input)
                    .with_context(|| format!("failed to list {}", input.display()))?
                    .files
                    .into_iter()
                    .map(PathBuf::from)
                    .collect()
            } else {
                std::fs::read_dir(input)
                    .with_context(|| format!("failed to list {}", input.display()))?
                    .filter_map(|entry| entry.ok().map(|e| e.path()))
                    .filter(|path| path.is_file())
                    .collect()
            };
            found.retain(|path| is_supported(path));
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            anyhow::bail!("{} does not exist", input.display());
        }
    }
    Ok(files)
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("glb") || ext.eq_ignore_ascii_case("bgl"))
}
