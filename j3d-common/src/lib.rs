//! Shared types and utilities for the J3D model formats
//!
//! This crate provides the format-level building blocks shared between
//! `bmd-export` (asset pipeline) and any future J3D tooling:
//!
//! - [`packing`] - Fixed-point and color quantization (f32 → s16 / u8)
//! - [`formats`] - Section writer, name tables, GX enumerations, file header

pub mod formats;
pub mod packing;

// Re-export commonly used packing items
pub use packing::{
    angle_to_s16, from_fixed_point, pack_color_rgba8, to_fixed_point, FIXED_POINT_EXP_NORMAL,
    FIXED_POINT_EXP_TEXCOORD,
};

// Re-export commonly used format items
pub use formats::{
    finish_file_header, write_file_header, ByteStream, GxComponentCount, GxComponentType,
    GxPrimitiveType, HierarchyNodeType, JutNameTable, OffsetField, SectionWriter, VertexAttribute,
    BMD_FILE_TYPE, DEFAULT_ALIGNMENT, FILE_HEADER_SIZE, GX_VA_NULL, J3D_MAGIC, PADDING_TEXT,
};
