//! Conversion errors
//!
//! Every variant except [`ConvertError::Io`] describes malformed source data;
//! none of them is recoverable for the model being converted.

use j3d_common::VertexAttribute;

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// A primitive or skin references an accessor that does not exist
    #[error("accessor {0} referenced by the scene does not exist")]
    MissingAccessor(usize),

    /// An accessor holds a different kind of data than its user expects
    #[error("accessor {index} holds {found}, expected {expected}")]
    AccessorKind {
        index: usize,
        expected: &'static str,
        found: &'static str,
    },

    #[error("primitive has no {0:?} attribute")]
    MissingAttribute(VertexAttribute),

    /// The format addresses vertices with u16 indices
    #[error("index {value} at position {position} exceeds maximum {max} for u16 indices", max = u16::MAX)]
    IndexOutOfRange { position: usize, value: u32 },

    #[error("non-indexed primitive has {0} vertices, maximum is 65536")]
    TooManyVertices(usize),

    #[error("vertex index {index} is out of range for {attribute:?} ({count} values)")]
    VertexOutOfRange {
        attribute: VertexAttribute,
        index: u16,
        count: usize,
    },

    #[error("primitive has tangents but no normals")]
    TangentWithoutNormal,

    #[error("{attribute:?} table holds more than {max} distinct values", max = u16::MAX as usize + 1)]
    AttributeTableFull { attribute: VertexAttribute },

    #[error("primitive mode {0} is not supported")]
    UnsupportedTopology(&'static str),

    #[error("primitive has {present} but no {missing}")]
    PartialSkinData {
        present: &'static str,
        missing: &'static str,
    },

    /// Only the scene's first skin becomes the joint table
    #[error("node {node} is bound to skin {skin}, only skin 0 can be converted")]
    UnsupportedSkin { node: usize, skin: usize },

    #[error("material {0} referenced by a primitive does not exist")]
    MissingMaterial(usize),

    #[error("joint and weight tables have different lengths ({joints} vs {weights})")]
    SkinTableMismatch { joints: usize, weights: usize },

    /// Skin data present, but every weight of the vertex is zero
    #[error("vertex {vertex} of shape {shape} has no nonzero skin weight")]
    ZeroSkinWeights { shape: usize, vertex: usize },

    #[error("skin has no joints")]
    EmptySkin,

    #[error("skin root could not be determined")]
    UnknownSkinRoot,

    #[error("node {0} does not exist")]
    MissingNode(usize),

    #[error("mesh {0} referenced by a node does not exist")]
    MissingMesh(usize),

    #[error("joint '{name}' (node {node}) is not reachable from the skin root")]
    UnreachableJoint { name: String, node: usize },

    #[error("joint '{name}' (node {node}) is reached more than once while linking")]
    DuplicateJoint { name: String, node: usize },

    #[error("model has {0} joints, maximum is 65535")]
    TooManyJoints(usize),

    #[error("shape {shape} references joint {joint}, which does not exist")]
    MissingJoint { shape: usize, joint: usize },

    #[error("{what} count {count} exceeds the format limit")]
    TableOverflow { what: &'static str, count: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
