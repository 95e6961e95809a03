//! GLB container assembly.

use gltf_json as json;

const CHUNK_JSON: u32 = 0x4E4F534A;
const CHUNK_BIN: u32 = 0x004E4942;

fn padding_for(len: usize) -> usize {
    (4 - len % 4) % 4
}

/// Wrap a document and its single binary buffer into a GLB
pub(crate) fn assemble_glb(root: &json::Root, buffer_data: &[u8]) -> Vec<u8> {
    let mut root = root.clone();
    root.buffers[0].byte_length = buffer_data.len().into();

    let json_string = json::serialize::to_string(&root).expect("Failed to serialize JSON");
    let json_bytes = json_string.as_bytes();

    let json_padding = padding_for(json_bytes.len());
    let json_chunk_length = json_bytes.len() + json_padding;
    let bin_padding = padding_for(buffer_data.len());
    let bin_chunk_length = buffer_data.len() + bin_padding;
    let total_length = 12 + 8 + json_chunk_length + 8 + bin_chunk_length;

    let mut glb = Vec::with_capacity(total_length);
    glb.extend_from_slice(b"glTF");
    glb.extend_from_slice(&2u32.to_le_bytes());
    glb.extend_from_slice(&(total_length as u32).to_le_bytes());

    // JSON is padded with spaces, binary with zeros
    glb.extend_from_slice(&(json_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_JSON.to_le_bytes());
    glb.extend_from_slice(json_bytes);
    glb.extend(std::iter::repeat_n(b' ', json_padding));

    glb.extend_from_slice(&(bin_chunk_length as u32).to_le_bytes());
    glb.extend_from_slice(&CHUNK_BIN.to_le_bytes());
    glb.extend_from_slice(buffer_data);
    glb.extend(std::iter::repeat_n(0u8, bin_padding));

    glb
}
