//! bmd-export library
//!
//! Compiles scenes into J3D BMD models: vertex attribute deduplication,
//! joint hierarchy flattening, skin envelope compilation and section
//! encoding. Usable by other tools without going through the CLI.

pub mod convert;
pub mod envelope;
pub mod error;
pub mod formats;
pub mod import;
pub mod manifest;
pub mod model;
pub mod scene;
pub mod shape;
pub mod skeleton;
pub mod vertex;

// Re-export format primitives from j3d-common
pub use j3d_common::{
    angle_to_s16, pack_color_rgba8, to_fixed_point, ByteStream, GxPrimitiveType, HierarchyNodeType,
    JutNameTable, VertexAttribute, PADDING_TEXT,
};

// Re-export key types for model conversion
pub use convert::{convert_gltf, convert_gltf_to_memory, write_model, ConvertedModel, ExportOptions};
pub use error::ConvertError;
pub use formats::write_bmd;
pub use import::{load_gltf, scene_from_document};
pub use model::Model;
pub use scene::Scene;
