//! BGL scenery packages and the GLB models embedded in them.
//!
//! A BGL starts with a 0x38 byte header followed by 0x14 byte record headers.
//! ModelData records point at a table of 24 byte entries (GUID, offset, size),
//! each of which locates a RIFF file. Inside the RIFF, `GLBD` chunks hold
//! one or more `GLB\0`-tagged binary glTF blocks.
//!
//! Offsets in these files are not trusted: anything pointing outside the file
//! is skipped with a warning.

use crate::error::BglError;

const HEADER_LEN: usize = 0x38;
const RECORD_HEADER_LEN: usize = 0x14;
const MODEL_ENTRY_LEN: usize = 24;
const MAGIC_START: [u8; 4] = [0x01, 0x02, 0x92, 0x19];
const MAGIC_MIDDLE: [u8; 4] = [0x03, 0x18, 0x05, 0x08];
const RECORD_MODEL_DATA: u32 = 0x002b;

/// One GLB block found in a BGL package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BglModel {
    /// Hex-encoded GUID of the model entry the block belongs to.
    pub guid: String,
    /// Ordinal of the `GLBD` chunk holding the block within its model entry.
    pub chunk: usize,
    pub glb: Vec<u8>,
}

fn read_u32(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

fn read_usize(data: &[u8], offset: usize) -> Option<usize> {
    read_u32(data, offset).map(|v| v as usize)
}

pub fn is_bgl(data: &[u8]) -> bool {
    data.len() >= HEADER_LEN && data[0..4] == MAGIC_START && data[0x10..0x14] == MAGIC_MIDDLE
}

/// Collect every GLB block embedded in the BGL package `data`.
pub fn read_bgl(data: &[u8]) -> Result<Vec<BglModel>, BglError> {
    if data.len() < HEADER_LEN {
        return Err(BglError::TooSmall(data.len()));
    }
    if !is_bgl(data) {
        return Err(BglError::InvalidHeader);
    }

    let record_count = read_usize(data, 0x14).unwrap_or_default();
    let mut model_data_offsets = Vec::new();
    for record in 0..record_count {
        let offset = HEADER_LEN + record * RECORD_HEADER_LEN;
        if offset + RECORD_HEADER_LEN > data.len() {
            log::warn!("BGL declares {record_count} records but only {record} fit into the file");
            break;
        }
        if read_u32(data, offset) == Some(RECORD_MODEL_DATA) {
            if let Some(start) = read_usize(data, offset + 0x0c) {
                model_data_offsets.push(start);
            }
        }
    }

    let mut models = Vec::new();
    for start in model_data_offsets {
        let (Some(table), Some(table_len)) = (read_usize(data, start + 8), read_usize(data, start + 12)) else {
            log::warn!("ModelData record at {start:#x} lies outside the file");
            continue;
        };
        read_model_table(data, table, table_len, &mut models);
    }
    log::debug!("found {} GLB blocks in BGL", models.len());
    Ok(models)
}

fn read_model_table(data: &[u8], table: usize, table_len: usize, models: &mut Vec<BglModel>) {
    let mut consumed = 0usize;
    let mut entry = 0usize;
    while consumed < table_len {
        let entry_offset = table + MODEL_ENTRY_LEN * entry;
        let (Some(guid), Some(model_start), Some(model_len)) = (
            data.get(entry_offset..entry_offset + 16),
            read_usize(data, entry_offset + 16),
            read_usize(data, entry_offset + 20),
        ) else {
            break;
        };
        let guid: String = guid.iter().map(|b| format!("{b:02x}")).collect();
        consumed = consumed.saturating_add(model_len).saturating_add(MODEL_ENTRY_LEN);
        entry += 1;

        let model_offset = table + model_start;
        let Some(model) = data.get(model_offset..model_offset.saturating_add(model_len)) else {
            log::warn!("model {guid} lies outside the file");
            continue;
        };
        if !model.starts_with(b"RIFF") {
            log::debug!("model {guid} is not a RIFF file");
            continue;
        }
        read_riff_model(model, &guid, models);
    }
}

fn read_riff_model(model: &[u8], guid: &str, models: &mut Vec<BglModel>) {
    let mut chunk = 0;
    let mut i = 8;
    while i + 4 < model.len() {
        if &model[i..i + 4] == b"GLBD" {
            let Some(chunk_len) = read_usize(model, i + 4) else {
                break;
            };
            let payload_end = (i + 8).saturating_add(chunk_len).min(model.len());
            let mut j = i + 8;
            while j + 8 <= payload_end {
                if &model[j..j + 4] != b"GLB\0" {
                    j += 4;
                    continue;
                }
                let glb_len = read_usize(model, j + 4).unwrap_or_default();
                match model.get(j + 8..(j + 8).saturating_add(glb_len)) {
                    Some(glb) => {
                        models.push(BglModel {
                            guid: guid.to_owned(),
                            chunk,
                            glb: glb.to_vec(),
                        });
                        j += 8 + glb_len;
                    }
                    None => {
                        log::warn!("GLB block of {glb_len} bytes in model {guid} exceeds the model");
                        j += 4;
                    }
                }
            }
            chunk += 1;
            i = i.saturating_add(chunk_len);
        }
        i += 4;
    }
}
