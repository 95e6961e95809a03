//! Vertex attribute deduplication
//!
//! J3D models store every attribute kind in its own table of distinct
//! values and describe vertices as tuples of table indices. [`VertexData`]
//! owns those tables for the whole model and turns raw per-primitive
//! attribute arrays into indexed [`Vertex`] records.
//!
//! Equality is exact `f32` equality per component. No epsilon is applied:
//! the runtime's vertex cache only reuses bit-identical entries.

use crate::error::{ConvertError, Result};
use glam::{Vec3, Vec4};
use hashbrown::HashMap;
use j3d_common::{GxPrimitiveType, VertexAttribute};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Raw attribute arrays of one primitive, keyed by kind.
/// Tangents (xyz + handedness in w) are stored under [`VertexAttribute::Nbt`].
pub type AttributeTables = BTreeMap<VertexAttribute, Vec<Vec4>>;

/// Per-vertex joint indices and weights (one `Vec4` of each per vertex)
pub type SkinTables<'a> = (&'a [Vec4], &'a [Vec4]);

/// Skin influences of a single vertex, in source slot order
pub type Influences = SmallVec<[Influence; 4]>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Influence {
    pub joint: u16,
    pub weight: f32,
}

/// One vertex of a primitive, as indices into the model's attribute tables
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Vertex {
    pub position: Option<u16>,
    /// Index into the normal table, or the NBT table when `use_nbt` is set
    pub normal: Option<u16>,
    pub use_nbt: bool,
    pub colors: [Option<u16>; 2],
    pub tex_coords: [Option<u16>; 8],
    /// `None` when the primitive carries no skin data
    pub influences: Option<Influences>,
    /// Slot in the draw matrix table, assigned by envelope compilation
    pub draw_matrix: Option<u16>,
}

impl Vertex {
    pub fn set_index(&mut self, attribute: VertexAttribute, index: u16) {
        match attribute {
            VertexAttribute::Position => self.position = Some(index),
            VertexAttribute::Normal | VertexAttribute::Nbt => self.normal = Some(index),
            VertexAttribute::Color0 | VertexAttribute::Color1 => {
                if let Some(slot) = attribute.color_slot() {
                    self.colors[slot] = Some(index);
                }
            }
            _ => {
                if let Some(slot) = attribute.tex_coord_slot() {
                    self.tex_coords[slot] = Some(index);
                }
            }
        }
    }

    pub fn index(&self, attribute: VertexAttribute) -> Option<u16> {
        match attribute {
            VertexAttribute::Position => self.position,
            VertexAttribute::Normal => self.normal.filter(|_| !self.use_nbt),
            VertexAttribute::Nbt => self.normal.filter(|_| self.use_nbt),
            VertexAttribute::Color0 | VertexAttribute::Color1 => {
                attribute.color_slot().and_then(|slot| self.colors[slot])
            }
            _ => attribute.tex_coord_slot().and_then(|slot| self.tex_coords[slot]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Primitive {
    pub kind: GxPrimitiveType,
    pub vertices: Vec<Vertex>,
}

/// Normal/tangent/bitangent triple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NbtRecord {
    pub normal: Vec3,
    pub tangent: Vec3,
    pub bitangent: Vec3,
}

impl NbtRecord {
    fn key(&self) -> Option<[u32; 9]> {
        let n = self.normal.to_array();
        let t = self.tangent.to_array();
        let b = self.bitangent.to_array();
        let mut key = [0u32; 9];
        for (slot, value) in key.iter_mut().zip(n.iter().chain(&t).chain(&b)) {
            *slot = component_key(*value)?;
        }
        Some(key)
    }
}

/// Hash key of one component. `-0.0` folds into `0.0` so the key agrees
/// with `==`; NaN has no key because it equals nothing.
fn component_key(value: f32) -> Option<u32> {
    if value.is_nan() {
        None
    } else if value == 0.0 {
        Some(0)
    } else {
        Some(value.to_bits())
    }
}

fn value_key(value: Vec4) -> Option<[u32; 4]> {
    Some([
        component_key(value.x)?,
        component_key(value.y)?,
        component_key(value.z)?,
        component_key(value.w)?,
    ])
}

#[derive(Debug, Clone, Default)]
struct AttributeTable {
    values: Vec<Vec4>,
    lookup: HashMap<[u32; 4], u16>,
}

/// Deduplicated attribute tables of a whole model
#[derive(Debug, Clone, Default)]
pub struct VertexData {
    tables: BTreeMap<VertexAttribute, AttributeTable>,
    nbt: Vec<NbtRecord>,
    nbt_lookup: HashMap<[u32; 9], u16>,
}

impl VertexData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains_value(&self, attribute: VertexAttribute, value: Vec4) -> bool {
        self.index_of(attribute, value).is_some()
    }

    pub fn index_of(&self, attribute: VertexAttribute, value: Vec4) -> Option<u16> {
        let table = self.tables.get(&attribute)?;
        let key = value_key(value)?;
        table.lookup.get(&key).copied()
    }

    /// Append `value` to the table of `attribute`.
    ///
    /// Does not check for duplicates; callers test [`Self::contains_value`]
    /// first to keep the table distinct.
    pub fn add_value(&mut self, attribute: VertexAttribute, value: Vec4) -> Result<u16> {
        let table = self.tables.entry(attribute).or_default();
        let index = u16::try_from(table.values.len())
            .map_err(|_| ConvertError::AttributeTableFull { attribute })?;

        table.values.push(value);
        if let Some(key) = value_key(value) {
            table.lookup.entry(key).or_insert(index);
        }
        Ok(index)
    }

    fn find_or_add(&mut self, attribute: VertexAttribute, value: Vec4) -> Result<u16> {
        match self.index_of(attribute, value) {
            Some(index) => Ok(index),
            None => self.add_value(attribute, value),
        }
    }

    /// Distinct values of one kind, in index order
    pub fn values(&self, attribute: VertexAttribute) -> &[Vec4] {
        self.tables
            .get(&attribute)
            .map(|t| t.values.as_slice())
            .unwrap_or(&[])
    }

    /// Kinds that hold at least one value, in ascending GX id order
    pub fn attributes(&self) -> impl Iterator<Item = (VertexAttribute, &[Vec4])> + '_ {
        self.tables
            .iter()
            .filter(|(_, table)| !table.values.is_empty())
            .map(|(&attribute, table)| (attribute, table.values.as_slice()))
    }

    pub fn nbt_records(&self) -> &[NbtRecord] {
        &self.nbt
    }

    /// Number of distinct positions; the vertex count of the model header
    pub fn vertex_count(&self) -> u32 {
        self.values(VertexAttribute::Position).len() as u32
    }

    /// Build a primitive of indexed vertices from raw attribute arrays.
    ///
    /// `indices` address the raw arrays. When `skin` is given, each vertex
    /// keeps its nonzero joint weights in slot order.
    pub fn compile_primitive(
        &mut self,
        kind: GxPrimitiveType,
        attributes: &AttributeTables,
        indices: &[u16],
        skin: Option<SkinTables>,
    ) -> Result<Primitive> {
        let tangents = attributes
            .get(&VertexAttribute::Nbt)
            .filter(|t| !t.is_empty());
        if tangents.is_some() && !attributes.contains_key(&VertexAttribute::Normal) {
            return Err(ConvertError::TangentWithoutNormal);
        }

        let mut vertices = Vec::with_capacity(indices.len());

        for &vertex_index in indices {
            let mut vertex = Vertex {
                use_nbt: tangents.is_some(),
                ..Default::default()
            };

            if let Some((joints, weights)) = skin {
                vertex.influences = Some(read_influences(joints, weights, vertex_index)?);
            }

            for (&attribute, values) in attributes {
                let value = lookup(attribute, values, vertex_index)?;

                if attribute == VertexAttribute::Nbt {
                    self.process_nbt(value, &mut vertex)?;
                    continue;
                }

                let index = self.find_or_add(attribute, value)?;
                vertex.set_index(attribute, index);
            }

            vertices.push(vertex);
        }

        Ok(Primitive { kind, vertices })
    }

    /// Replace the vertex's normal index with the index of its NBT record.
    /// Runs after the normal slot has been filled.
    fn process_nbt(&mut self, tangent: Vec4, vertex: &mut Vertex) -> Result<()> {
        let normal_index = vertex.normal.ok_or(ConvertError::TangentWithoutNormal)?;
        let normal = self.values(VertexAttribute::Normal)[normal_index as usize].truncate();
        let tangent_xyz = tangent.truncate();

        let record = NbtRecord {
            normal,
            tangent: tangent_xyz,
            bitangent: normal.cross(tangent_xyz) * tangent.w,
        };

        let key = record.key();
        let existing = key.and_then(|k| self.nbt_lookup.get(&k).copied());
        let index = match existing {
            Some(index) => index,
            None => {
                let index = u16::try_from(self.nbt.len()).map_err(|_| {
                    ConvertError::AttributeTableFull {
                        attribute: VertexAttribute::Nbt,
                    }
                })?;
                self.nbt.push(record);
                if let Some(k) = key {
                    self.nbt_lookup.insert(k, index);
                }
                index
            }
        };

        vertex.normal = Some(index);
        Ok(())
    }
}

fn lookup(attribute: VertexAttribute, values: &[Vec4], index: u16) -> Result<Vec4> {
    values
        .get(index as usize)
        .copied()
        .ok_or(ConvertError::VertexOutOfRange {
            attribute,
            index,
            count: values.len(),
        })
}

fn read_influences(joints: &[Vec4], weights: &[Vec4], index: u16) -> Result<Influences> {
    let (Some(joint), Some(weight)) = (joints.get(index as usize), weights.get(index as usize))
    else {
        return Err(ConvertError::SkinTableMismatch {
            joints: joints.len(),
            weights: weights.len(),
        });
    };

    Ok(joint
        .to_array()
        .into_iter()
        .zip(weight.to_array())
        .filter(|&(_, w)| w != 0.0)
        .map(|(j, w)| Influence {
            joint: j as u16,
            weight: w,
        })
        .collect())
}
