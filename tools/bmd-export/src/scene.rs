//! Neutral scene description consumed by the model compiler
//!
//! The layout mirrors what a general-purpose asset loader exposes: flat node,
//! skin, mesh and accessor lists cross-referenced by index. The glTF importer
//! fills it from a file; tests build it by hand.

use crate::error::{ConvertError, Result};
use glam::{Mat4, Quat, Vec3, Vec4};
use j3d_common::{GxPrimitiveType, VertexAttribute};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub nodes: Vec<Node>,
    pub skins: Vec<Skin>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub accessors: Vec<Accessor>,
    /// Root nodes of the default scene
    pub root_nodes: Vec<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Node {
    pub name: String,
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
    /// Skin binding the node's mesh
    pub skin: Option<usize>,
}

impl Node {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn translation(&self) -> Vec3 {
        self.translation.unwrap_or(Vec3::ZERO)
    }

    pub fn rotation(&self) -> Quat {
        self.rotation.unwrap_or(Quat::IDENTITY)
    }

    pub fn scale(&self) -> Vec3 {
        self.scale.unwrap_or(Vec3::ONE)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Skin {
    pub name: Option<String>,
    /// Joint node indices; the position in this list is the joint index
    pub joints: Vec<usize>,
    /// Accessor holding one matrix per joint
    pub inverse_bind_matrices: Option<usize>,
    /// Declared skeleton root node, if the source names one
    pub skeleton: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<Primitive>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PrimitiveMode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
}

impl PrimitiveMode {
    pub fn to_gx(self) -> Result<GxPrimitiveType> {
        Ok(match self {
            Self::Points => GxPrimitiveType::Points,
            Self::Lines => GxPrimitiveType::Lines,
            Self::LineStrip => GxPrimitiveType::LineStrip,
            Self::Triangles => GxPrimitiveType::Triangles,
            Self::TriangleStrip => GxPrimitiveType::TriangleStrip,
            Self::TriangleFan => GxPrimitiveType::TriangleFan,
            Self::LineLoop => return Err(ConvertError::UnsupportedTopology("line loop")),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct Primitive {
    pub mode: PrimitiveMode,
    /// Vertex attribute accessors. Tangents are stored under
    /// [`VertexAttribute::Nbt`].
    pub attributes: BTreeMap<VertexAttribute, usize>,
    pub joints: Option<usize>,
    pub weights: Option<usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct Material {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct Texture {
    pub name: String,
}

/// Decoded accessor contents
#[derive(Debug, Clone)]
pub enum Accessor {
    /// Vector data widened to four components
    Vectors(Vec<Vec4>),
    /// Integer scalars (index buffers)
    Scalars(Vec<u32>),
    Matrices(Vec<Mat4>),
}

impl Accessor {
    fn kind_name(&self) -> &'static str {
        match self {
            Self::Vectors(_) => "vectors",
            Self::Scalars(_) => "scalars",
            Self::Matrices(_) => "matrices",
        }
    }
}

impl Scene {
    /// Append an accessor, returning its index
    pub fn push_accessor(&mut self, accessor: Accessor) -> usize {
        self.accessors.push(accessor);
        self.accessors.len() - 1
    }

    fn accessor(&self, index: usize) -> Result<&Accessor> {
        self.accessors
            .get(index)
            .ok_or(ConvertError::MissingAccessor(index))
    }

    pub fn vectors(&self, index: usize) -> Result<&[Vec4]> {
        match self.accessor(index)? {
            Accessor::Vectors(values) => Ok(values),
            other => Err(ConvertError::AccessorKind {
                index,
                expected: "vectors",
                found: other.kind_name(),
            }),
        }
    }

    pub fn scalars(&self, index: usize) -> Result<&[u32]> {
        match self.accessor(index)? {
            Accessor::Scalars(values) => Ok(values),
            other => Err(ConvertError::AccessorKind {
                index,
                expected: "scalars",
                found: other.kind_name(),
            }),
        }
    }

    pub fn matrices(&self, index: usize) -> Result<&[Mat4]> {
        match self.accessor(index)? {
            Accessor::Matrices(values) => Ok(values),
            other => Err(ConvertError::AccessorKind {
                index,
                expected: "matrices",
                found: other.kind_name(),
            }),
        }
    }

    pub fn node(&self, index: usize) -> Result<&Node> {
        self.nodes.get(index).ok_or(ConvertError::MissingNode(index))
    }

    /// Roots to walk: the default scene's roots, or every parentless node
    /// when the source declares no scene.
    pub fn effective_roots(&self) -> Vec<usize> {
        if !self.root_nodes.is_empty() {
            return self.root_nodes.clone();
        }

        let parents = self.parent_map();
        (0..self.nodes.len())
            .filter(|&i| parents[i].is_none())
            .collect()
    }

    /// Parent of every node (the first one, if the graph is malformed)
    pub fn parent_map(&self) -> Vec<Option<usize>> {
        let mut parents = vec![None; self.nodes.len()];
        for (index, node) in self.nodes.iter().enumerate() {
            for &child in &node.children {
                if let Some(slot) = parents.get_mut(child) {
                    slot.get_or_insert(index);
                }
            }
        }
        parents
    }
}
