//! glTF → BMD conversion entry points

use crate::formats::write_bmd;
use crate::import::load_gltf;
use crate::model::Model;
use crate::scene::Scene;
use anyhow::{Context, Result};
use j3d_common::ByteStream;
use std::io::{Cursor, Seek, Write};
use std::path::Path;

/// Knobs that change the produced bytes
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Alignment filler text; the format's standard text when `None`
    pub padding: Option<String>,
}

/// Result of in-memory conversion
#[derive(Debug, Clone)]
pub struct ConvertedModel {
    pub data: Vec<u8>,
    pub vertex_count: u32,
    pub joint_count: usize,
    pub shape_count: usize,
    pub envelope_count: usize,
    pub draw_matrix_count: usize,
}

/// Compile a scene and encode it as a BMD file into `writer`
pub fn write_model<W: Write + Seek>(scene: &Scene, writer: W, options: &ExportOptions) -> Result<(Model, u32)> {
    // Compile everything before the first byte is written
    let model = Model::compile(scene)?;

    let mut stream = ByteStream::new(writer)?;
    if let Some(padding) = &options.padding {
        stream = stream.with_padding(padding);
    }
    let size = write_bmd(&mut stream, &model)?;
    stream.into_inner().flush()?;

    Ok((model, size))
}

/// Convert a glTF/GLB file to BMD bytes in memory
pub fn convert_gltf_to_memory(input: &Path, options: &ExportOptions) -> Result<ConvertedModel> {
    let scene = load_gltf(input)?;

    let mut cursor = Cursor::new(Vec::new());
    let (model, _) = write_model(&scene, &mut cursor, options)
        .with_context(|| format!("Failed to convert {:?}", input))?;

    Ok(ConvertedModel {
        data: cursor.into_inner(),
        vertex_count: model.vertex_count(),
        joint_count: model.skeleton.len(),
        shape_count: model.shapes.len(),
        envelope_count: model.envelopes.envelopes().len(),
        draw_matrix_count: model.envelopes.draw_matrix_count(),
    })
}

/// Convert a glTF/GLB file to a BMD file.
///
/// The output file is only created once the whole model has been encoded.
pub fn convert_gltf(input: &Path, output: &Path, options: &ExportOptions) -> Result<()> {
    let scene = load_gltf(input)?;

    let mut cursor = Cursor::new(Vec::new());
    let (model, size) = write_model(&scene, &mut cursor, options)
        .with_context(|| format!("Failed to convert {:?}", input))?;

    std::fs::write(output, cursor.into_inner())
        .with_context(|| format!("Failed to write output: {:?}", output))?;

    tracing::info!(
        "Converted model: {} vertices, {} joints, {} shapes, {} envelopes, {} bytes",
        model.vertex_count(),
        model.skeleton.len(),
        model.shapes.len(),
        model.envelopes.envelopes().len(),
        size
    );

    Ok(())
}
