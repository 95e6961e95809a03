//! Shape compilation
//!
//! A shape is the set of primitives of one mesh instance that share a
//! material. Compiling a shape reads the primitives' accessors, validates
//! their indices and pushes their vertices through [`VertexData`].

use crate::error::{ConvertError, Result};
use crate::scene::{self, Scene};
use crate::vertex::{self, AttributeTables, VertexData};
use glam::{Vec3, Vec4};
use j3d_common::VertexAttribute;
use std::collections::BTreeSet;

/// Shape drawn with one matrix
pub const MATRIX_TYPE_SINGLE: u8 = 0;
/// Shape with at least one blended vertex
pub const MATRIX_TYPE_MULTI: u8 = 3;

/// Bounding sphere and axis-aligned box
///
/// The sphere is centered on the box center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingVolume {
    pub radius: f32,
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingVolume {
    /// Bounds of a point set. Empty input yields zero bounds.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::default();
        }

        let (min, max) = points
            .iter()
            .fold((Vec3::splat(f32::MAX), Vec3::splat(f32::MIN)), |(min, max), &p| {
                (min.min(p), max.max(p))
            });

        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|p| p.distance(center))
            .fold(0.0f32, f32::max);

        Self { radius, min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Smallest box holding both boxes, with a sphere holding both spheres
    pub fn union(&self, other: &Self) -> Self {
        let min = self.min.min(other.min);
        let max = self.max.max(other.max);
        let center = (min + max) * 0.5;

        let radius = [self, other]
            .iter()
            .map(|b| b.center().distance(center) + b.radius)
            .fold(0.0f32, f32::max);

        Self { radius, min, max }
    }
}

#[derive(Debug, Clone)]
pub struct Shape {
    pub primitives: Vec<vertex::Primitive>,
    pub material_name: String,
    pub index: u16,
    pub material_index: u16,
    pub joint_index: u16,
    /// Attribute kinds used by any primitive, in GX id order
    pub attributes: BTreeSet<VertexAttribute>,
    pub matrix_type: u8,
    pub bounds: BoundingVolume,
}

impl Shape {
    pub fn vertices(&self) -> impl Iterator<Item = &vertex::Vertex> {
        self.primitives.iter().flat_map(|p| p.vertices.iter())
    }

    pub fn vertices_mut(&mut self) -> impl Iterator<Item = &mut vertex::Vertex> {
        self.primitives.iter_mut().flat_map(|p| p.vertices.iter_mut())
    }
}

/// Identity of a shape, decided by the model compiler
#[derive(Debug, Clone)]
pub struct ShapeInfo {
    pub index: u16,
    pub material_name: String,
    pub material_index: u16,
    pub joint_index: u16,
}

/// Compile a group of source primitives into one shape.
///
/// The matrix type starts out single; envelope compilation raises it when a
/// vertex turns out to be blended.
pub fn compile_shape(
    scene: &Scene,
    data: &mut VertexData,
    primitives: &[&scene::Primitive],
    info: ShapeInfo,
) -> Result<Shape> {
    let mut compiled = Vec::with_capacity(primitives.len());
    let mut attributes = BTreeSet::new();
    let mut positions = Vec::new();

    for primitive in primitives {
        let tables = read_attributes(scene, primitive)?;
        let position_values = tables
            .get(&VertexAttribute::Position)
            .ok_or(ConvertError::MissingAttribute(VertexAttribute::Position))?;
        positions.extend(position_values.iter().map(|p| p.truncate()));

        let indices = match primitive.indices {
            Some(accessor) => read_indices(scene.scalars(accessor)?)?,
            None => sequential_indices(position_values.len())?,
        };

        let skin = match (primitive.joints, primitive.weights) {
            (Some(joints), Some(weights)) => Some((scene.vectors(joints)?, scene.vectors(weights)?)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConvertError::PartialSkinData {
                    present: "joints",
                    missing: "weights",
                })
            }
            (None, Some(_)) => {
                return Err(ConvertError::PartialSkinData {
                    present: "weights",
                    missing: "joints",
                })
            }
        };

        let kind = primitive.mode.to_gx()?;
        compiled.push(data.compile_primitive(kind, &tables, &indices, skin)?);

        for &attribute in tables.keys() {
            attributes.insert(attribute);
        }
    }

    Ok(Shape {
        primitives: compiled,
        material_name: info.material_name,
        index: info.index,
        material_index: info.material_index,
        joint_index: info.joint_index,
        attributes,
        matrix_type: MATRIX_TYPE_SINGLE,
        bounds: BoundingVolume::from_points(&positions),
    })
}

fn read_attributes(scene: &Scene, primitive: &scene::Primitive) -> Result<AttributeTables> {
    let mut tables = AttributeTables::new();
    for (&attribute, &accessor) in &primitive.attributes {
        let values: Vec<Vec4> = scene.vectors(accessor)?.to_vec();
        tables.insert(attribute, values);
    }
    Ok(tables)
}

/// Narrow an index buffer to u16
pub fn read_indices(raw: &[u32]) -> Result<Vec<u16>> {
    raw.iter()
        .enumerate()
        .map(|(position, &value)| {
            u16::try_from(value).map_err(|_| ConvertError::IndexOutOfRange { position, value })
        })
        .collect()
}

/// Indices `0..count` for a non-indexed primitive
pub fn sequential_indices(count: usize) -> Result<Vec<u16>> {
    if count > u16::MAX as usize + 1 {
        return Err(ConvertError::TooManyVertices(count));
    }
    Ok((0..count).map(|i| i as u16).collect())
}
