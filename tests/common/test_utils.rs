#![allow(dead_code)]

use std::path::PathBuf;

use scone::resources::glb::GlbAsset;
use serde_json::{Value, json};

pub const FLOAT: u32 = 5126;
pub const UNSIGNED_BYTE: u32 = 5121;
pub const UNSIGNED_SHORT: u32 = 5123;
pub const UNSIGNED_INT: u32 = 5125;

/// Offset of the model size field of the single model entry written by [`bgl_bytes`].
pub const BGL_MODEL_LEN_OFFSET: usize = 0x70;

pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn pad_to_four(bytes: &mut Vec<u8>, fill: u8) {
    while bytes.len() % 4 != 0 {
        bytes.push(fill);
    }
}

/// Assemble a GLB container from raw JSON bytes and a binary chunk.
pub fn glb_from_raw_json(json: &[u8], bin: &[u8]) -> Vec<u8> {
    let mut json = json.to_vec();
    pad_to_four(&mut json, b' ');
    let mut bin = bin.to_vec();
    pad_to_four(&mut bin, 0);

    let mut total = 12 + 8 + json.len();
    if !bin.is_empty() {
        total += 8 + bin.len();
    }
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F_534Au32.to_le_bytes());
    out.extend_from_slice(&json);
    if !bin.is_empty() {
        out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
        out.extend_from_slice(&0x004E_4942u32.to_le_bytes());
        out.extend_from_slice(&bin);
    }
    out
}

pub fn glb_bytes(json: &Value, bin: &[u8]) -> Vec<u8> {
    glb_from_raw_json(json.to_string().as_bytes(), bin)
}

/// Builds glTF documents together with their binary chunk.
#[derive(Clone, Debug, Default)]
pub struct GltfFixture {
    pub bin: Vec<u8>,
    pub buffer_views: Vec<Value>,
    pub accessors: Vec<Value>,
    pub meshes: Vec<Value>,
    pub materials: Vec<Value>,
    pub textures: Vec<Value>,
    pub images: Vec<Value>,
}

impl GltfFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `bytes` to the binary chunk as a new buffer view.
    pub fn push_view(&mut self, bytes: &[u8], byte_stride: Option<usize>) -> usize {
        pad_to_four(&mut self.bin, 0);
        let offset = self.bin.len();
        self.bin.extend_from_slice(bytes);
        let mut view = json!({ "buffer": 0, "byteOffset": offset, "byteLength": bytes.len() });
        if let Some(stride) = byte_stride {
            view["byteStride"] = json!(stride);
        }
        self.buffer_views.push(view);
        self.buffer_views.len() - 1
    }

    pub fn push_accessor(
        &mut self,
        view: usize,
        byte_offset: usize,
        component_type: u32,
        count: usize,
        kind: &str,
    ) -> usize {
        self.accessors.push(json!({
            "bufferView": view,
            "byteOffset": byte_offset,
            "componentType": component_type,
            "count": count,
            "type": kind,
        }));
        self.accessors.len() - 1
    }

    pub fn push_positions(&mut self, positions: &[[f32; 3]]) -> usize {
        let flat: Vec<f32> = positions.iter().flatten().copied().collect();
        let view = self.push_view(&f32_bytes(&flat), None);
        self.push_accessor(view, 0, FLOAT, positions.len(), "VEC3")
    }

    pub fn push_tex_coords(&mut self, uvs: &[[f32; 2]]) -> usize {
        let flat: Vec<f32> = uvs.iter().flatten().copied().collect();
        let view = self.push_view(&f32_bytes(&flat), None);
        self.push_accessor(view, 0, FLOAT, uvs.len(), "VEC2")
    }

    pub fn push_indices_u8(&mut self, indices: &[u8]) -> usize {
        let view = self.push_view(indices, None);
        self.push_accessor(view, 0, UNSIGNED_BYTE, indices.len(), "SCALAR")
    }

    pub fn push_indices_u16(&mut self, indices: &[u16]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.push_accessor(view, 0, UNSIGNED_SHORT, indices.len(), "SCALAR")
    }

    pub fn push_indices_u32(&mut self, indices: &[u32]) -> usize {
        let bytes: Vec<u8> = indices.iter().flat_map(|i| i.to_le_bytes()).collect();
        let view = self.push_view(&bytes, None);
        self.push_accessor(view, 0, UNSIGNED_INT, indices.len(), "SCALAR")
    }

    pub fn add_material(&mut self, material: Value) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    /// Add a texture whose image has the given URI; returns the texture index.
    pub fn add_texture(&mut self, uri: &str) -> usize {
        self.images.push(json!({ "uri": uri }));
        self.textures.push(json!({ "source": self.images.len() - 1 }));
        self.textures.len() - 1
    }

    pub fn add_mesh(&mut self, name: &str, primitive: Value) -> usize {
        self.meshes.push(json!({ "name": name, "primitives": [primitive] }));
        self.meshes.len() - 1
    }

    pub fn to_json(&self) -> Value {
        json!({
            "asset": { "version": "2.0" },
            "buffers": [{ "byteLength": self.bin.len() }],
            "bufferViews": self.buffer_views,
            "accessors": self.accessors,
            "meshes": self.meshes,
            "materials": self.materials,
            "textures": self.textures,
            "images": self.images,
        })
    }

    pub fn to_glb(&self) -> Vec<u8> {
        glb_bytes(&self.to_json(), &self.bin)
    }

    pub fn to_asset(&self) -> GlbAsset {
        GlbAsset::from_slice(&self.to_glb()).expect("fixture is a valid GLB")
    }
}

/// A unit quad made of two triangles, mapped onto the full texture.
pub fn quad_fixture(material: Option<Value>) -> GltfFixture {
    let mut fixture = GltfFixture::new();
    let positions = fixture.push_positions(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
    ]);
    let uvs = fixture.push_tex_coords(&[[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]]);
    let indices = fixture.push_indices_u16(&[0, 1, 2, 0, 2, 3]);
    let mut primitive = json!({
        "attributes": { "POSITION": positions, "TEXCOORD_0": uvs },
        "indices": indices,
    });
    if let Some(material) = material {
        primitive["material"] = json!(fixture.add_material(material));
    }
    fixture.add_mesh("quad", primitive);
    fixture
}

/**
 * Wrap GLB blocks into a minimal BGL package: one ModelData record whose table
 * holds a single model entry with GUID `guid`. The entry's RIFF file carries
 * one `GLBD` chunk containing every block.
 */
pub fn bgl_bytes(guid: [u8; 16], glbs: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = Vec::new();
    for glb in glbs {
        let mut glb = glb.clone();
        pad_to_four(&mut glb, 0);
        payload.extend_from_slice(b"GLB\0");
        payload.extend_from_slice(&(glb.len() as u32).to_le_bytes());
        payload.extend_from_slice(&glb);
    }
    let mut riff = Vec::new();
    riff.extend_from_slice(b"RIFF");
    riff.extend_from_slice(&((payload.len() + 12) as u32).to_le_bytes());
    riff.extend_from_slice(b"MDL ");
    riff.extend_from_slice(b"GLBD");
    riff.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    riff.extend_from_slice(&payload);

    let mut data = vec![0u8; 0x38];
    data[0..4].copy_from_slice(&[0x01, 0x02, 0x92, 0x19]);
    data[0x10..0x14].copy_from_slice(&[0x03, 0x18, 0x05, 0x08]);
    data[0x14..0x18].copy_from_slice(&1u32.to_le_bytes());

    let model_data = 0x38 + 0x14;
    let mut record = [0u8; 0x14];
    record[0..4].copy_from_slice(&0x2bu32.to_le_bytes());
    record[0x0c..0x10].copy_from_slice(&(model_data as u32).to_le_bytes());
    data.extend_from_slice(&record);

    let table = model_data + 16;
    let mut model_data_header = [0u8; 16];
    model_data_header[8..12].copy_from_slice(&(table as u32).to_le_bytes());
    model_data_header[12..16].copy_from_slice(&((24 + riff.len()) as u32).to_le_bytes());
    data.extend_from_slice(&model_data_header);

    data.extend_from_slice(&guid);
    data.extend_from_slice(&24u32.to_le_bytes());
    data.extend_from_slice(&(riff.len() as u32).to_le_bytes());
    data.extend_from_slice(&riff);
    data
}

/// A fresh, empty directory below the system temp dir.
pub fn temp_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scone-{name}-{}", std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).expect("failed to clear temp dir");
    }
    std::fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}
